pub mod idx;
pub mod truth_table;

/// Ordered feature vectors and their expected outputs.
pub type Dataset = (Vec<Vec<f64>>, Vec<Vec<f64>>);

pub use idx::{load_idx_pair, parse_idx_pair};
pub use truth_table::full_adder;
