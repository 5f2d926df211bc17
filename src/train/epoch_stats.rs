use serde::{Serialize, Deserialize};

/// Progress snapshot emitted by `train_loop` at every error check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainStats {
    /// Number of single-example updates applied so far.
    pub step: usize,
    /// `max_steps` of the run.
    pub max_steps: usize,
    /// Sum of squared errors over the whole training set.
    pub error: f64,
    /// Wall-clock time since the run started, in milliseconds.
    pub elapsed_ms: u64,
}

/// Outcome of a `train_loop` run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainReport {
    /// Updates applied.
    pub steps: usize,
    /// Dataset error at the last check.
    pub final_error: f64,
    /// Whether `final_error` went below the target.
    pub converged: bool,
}
