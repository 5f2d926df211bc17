pub mod activation;
pub mod dataset;
pub mod error;
pub mod graph;
pub mod loss;
pub mod network;
pub mod optim;
pub mod train;

// Convenience re-exports
pub use activation::{sigmoid, ActivationFunction};
pub use error::{FlowError, Result};
pub use graph::{
    connect, connect_random_weight, BackError, Group, Input, Layer, LayerBuilder, Link, LinkId,
    Neuron, NeuronBuilder, Output, Publication, Publisher, Subscription,
};
pub use loss::SquaredError;
pub use network::{Network, NetworkSpec};
pub use optim::Sgd;
pub use train::{train_loop, train_network, TrainConfig, TrainReport};
