pub mod sse;

pub use sse::SquaredError;
