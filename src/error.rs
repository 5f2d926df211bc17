//! Error types for the dataflow network.

use crate::graph::{LinkId, NeuronId};

/// Result type alias using FlowError
pub type Result<T> = std::result::Result<T, FlowError>;

/// Everything that can go wrong while wiring, driving or feeding a network.
///
/// Most wiring mistakes in a dataflow graph show up as a thread blocked
/// forever, not as a value. The variants below cover the cases that can be
/// caught before that happens.
#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    /// The neuron has no incoming link, so its input sum would never complete.
    #[error("neuron {neuron} has no incoming link")]
    DanglingInput { neuron: NeuronId },

    /// A second reader thread would compete for the same input links.
    #[error("neuron {neuron} is already active")]
    AlreadyActive { neuron: NeuronId },

    /// A back error is tagged with a link that no neuron in the group sends on.
    #[error("back error for link {link} does not match any output link of the group")]
    UnmatchedBackError { link: LinkId },

    /// The channel behind a link was closed.
    #[error("link {link} is disconnected")]
    Disconnected { link: LinkId },

    /// Input or expected vector has the wrong length for the network boundary.
    #[error("expected {expected} values, got {got}")]
    InputSize { expected: usize, got: usize },

    /// Malformed IDX image/label data.
    #[error("IDX error: {0}")]
    Idx(String),

    /// Invalid network or training configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
