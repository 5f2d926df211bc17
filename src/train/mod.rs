pub mod trainer;
pub mod epoch_stats;
pub mod train_config;
pub mod loop_fn;
pub mod metrics;

pub use trainer::train_network;
pub use epoch_stats::{TrainReport, TrainStats};
pub use train_config::TrainConfig;
pub use loop_fn::train_loop;
pub use metrics::{accuracy, argmax, bits_match, to_bit};
