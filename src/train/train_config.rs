use std::sync::mpsc;
use std::sync::{Arc, atomic::AtomicBool};

use serde::{Serialize, Deserialize};

use crate::error::{FlowError, Result};
use crate::train::epoch_stats::TrainStats;

/// Configuration for a `train_loop` run.
///
/// # Fields
/// - `learning_rate` — fixed SGD step size
/// - `max_steps`     — upper bound on single-example updates
/// - `target_error`  — training stops once the whole-dataset sum of squared
///                     errors drops below this
/// - `check_every`   — measure the dataset error every N updates
/// - `seed`          — RNG seed for weight init and example order; `None`
///                     seeds from entropy
/// - `progress_tx`   — optional channel; one `TrainStats` per error check.
///                     If the receiver is dropped the loop stops early.
/// - `stop_flag`     — optional atomic flag, read before every update; once
///                     set the loop stops without applying another one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    pub learning_rate: f64,
    pub max_steps: usize,
    pub target_error: f64,
    pub check_every: usize,
    pub seed: Option<u64>,
    #[serde(skip)]
    pub progress_tx: Option<mpsc::Sender<TrainStats>>,
    #[serde(skip)]
    pub stop_flag: Option<Arc<AtomicBool>>,
}

impl Default for TrainConfig {
    fn default() -> Self {
        TrainConfig {
            learning_rate: 0.5,
            max_steps: 100_000,
            target_error: 0.2,
            check_every: 1,
            seed: None,
            progress_tx: None,
            stop_flag: None,
        }
    }
}

impl TrainConfig {
    /// Creates a `TrainConfig` with no progress channel and no stop flag.
    pub fn new(learning_rate: f64, max_steps: usize, target_error: f64) -> Self {
        TrainConfig {
            learning_rate,
            max_steps,
            target_error,
            ..TrainConfig::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.learning_rate > 0.0) {
            return Err(FlowError::InvalidConfig(format!(
                "learning_rate must be positive, got {}", self.learning_rate
            )));
        }
        if self.check_every == 0 {
            return Err(FlowError::InvalidConfig("check_every must be at least 1".to_owned()));
        }
        Ok(())
    }

    /// Deserializes and validates a `TrainConfig` from a JSON file. Missing
    /// fields take their defaults.
    pub fn load_json(path: &str) -> Result<TrainConfig> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        let config: TrainConfig = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }
}
