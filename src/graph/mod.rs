//! The dataflow graph: links, ports, neurons, groups and boundary taps.

pub mod group;
pub mod layer;
pub mod link;
pub mod neuron;
pub mod port;
pub mod tap;

pub use group::{connect, connect_random_weight, BackError, Group};
pub use layer::{Layer, LayerBuilder};
pub use link::{Link, LinkId, NEVER_RECEIVED};
pub use neuron::{Neuron, NeuronBuilder, NeuronId, ReceiveHandler};
pub use port::{Input, Output};
pub use tap::{Publication, Publisher, Subscription};
