use std::sync::Arc;

use log::debug;
use rand::Rng;

use crate::error::Result;
use crate::graph::link::{Link, LinkId};
use crate::graph::port::{Input, Output};

/// A set of nodes wired and trained as one unit.
pub trait Group {
    /// Starts every neuron of the group.
    fn activate(&self) -> Result<()>;

    /// Ports through which the group receives values.
    fn inputs(&self) -> Vec<&Input>;

    /// Ports through which the group sends values.
    fn outputs(&self) -> Vec<&Output>;

    /// Updates the weights of the group's incoming links and its biases,
    /// returning the errors for the group that feeds this one.
    fn back_prop(&self, errors: &[BackError], rate: f64) -> Vec<BackError>;
}

/// Error flowing backwards over one link.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackError {
    link: LinkId,
    err: f64,
}

impl BackError {
    pub fn new(link: LinkId, err: f64) -> BackError {
        BackError { link, err }
    }

    pub fn link(&self) -> LinkId {
        self.link
    }

    pub fn err(&self) -> f64 {
        self.err
    }
}

/// Wires every output of `from` to every input of `to`.
pub fn connect<F, T>(from: &F, to: &T) -> Vec<Arc<Link>>
where
    F: Group + ?Sized,
    T: Group + ?Sized,
{
    let inputs = to.inputs();
    let links: Vec<Arc<Link>> = from
        .outputs()
        .into_iter()
        .flat_map(|o| inputs.iter().map(move |i| i.register(o)))
        .collect();
    debug!("connected {} links", links.len());
    links
}

/// Same as [`connect`], with each weight drawn uniformly from `[min, max)`.
pub fn connect_random_weight<F, T, R>(from: &F, to: &T, min: f64, max: f64, rng: &mut R) -> Vec<Arc<Link>>
where
    F: Group + ?Sized,
    T: Group + ?Sized,
    R: Rng + ?Sized,
{
    let links = connect(from, to);
    for link in &links {
        link.set_weight((max - min) * rng.gen::<f64>() + min);
    }
    links
}
