//! Boundary taps: reading values out of a graph and pushing values into it
//! without being a neuron.

use std::sync::Arc;
use std::time::Duration;

use crossbeam::channel::RecvTimeoutError;

use crate::error::{FlowError, Result};
use crate::graph::group::{BackError, Group};
use crate::graph::link::Link;
use crate::graph::port::{Input, Output};

/// Read tap on a single link hanging off an [`Output`].
#[derive(Debug)]
pub struct Subscription {
    link: Arc<Link>,
}

impl Subscription {
    pub(crate) fn new(link: Arc<Link>) -> Subscription {
        Subscription { link }
    }

    pub fn link(&self) -> &Arc<Link> {
        &self.link
    }

    /// Blocks until the output broadcasts its next value.
    pub fn result(&self) -> Result<f64> {
        let value = self
            .link
            .receiver()
            .recv()
            .map_err(|_| FlowError::Disconnected { link: self.link.id() })?;
        self.link.absorb(value);
        Ok(value)
    }

    /// Like [`Subscription::result`], giving up after `timeout`.
    pub fn result_timeout(&self, timeout: Duration) -> Result<Option<f64>> {
        match self.link.receiver().recv_timeout(timeout) {
            Ok(value) => {
                self.link.absorb(value);
                Ok(Some(value))
            }
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(FlowError::Disconnected { link: self.link.id() }),
        }
    }

    pub fn try_result(&self) -> Option<f64> {
        let value = self.link.receiver().try_recv().ok()?;
        self.link.absorb(value);
        Some(value)
    }

    /// A back error for the neuron feeding this tap, seeded by the caller.
    pub fn error(&self, err: f64) -> BackError {
        BackError::new(self.link.id(), err)
    }
}

/// Write tap: a synthetic output with one link into an [`Input`].
#[derive(Debug, Clone)]
pub struct Publication {
    output: Arc<Output>,
}

impl Publication {
    pub(crate) fn new(output: Arc<Output>) -> Publication {
        Publication { output }
    }

    pub fn send(&self, value: f64) -> Result<()> {
        self.output.send(value)
    }

    pub fn output(&self) -> &Output {
        &self.output
    }

    /// Links carrying this publication's values: exactly one for a
    /// publication made by [`Input::publish`], one per wired neuron for a
    /// [`Publisher`] output.
    pub fn links(&self) -> Vec<Arc<Link>> {
        self.output.links()
    }
}

/// Input boundary of a network: a group of bare outputs that are fed from
/// outside instead of by neurons.
#[derive(Debug)]
pub struct Publisher {
    outputs: Vec<Arc<Output>>,
}

impl Publisher {
    pub fn new(size: usize) -> Publisher {
        Publisher {
            outputs: (0..size).map(|_| Arc::new(Output::new())).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }

    /// One publication per output, in order.
    pub fn publications(&self) -> Vec<Publication> {
        self.outputs.iter().map(|o| Publication::new(Arc::clone(o))).collect()
    }
}

impl Group for Publisher {
    fn activate(&self) -> Result<()> {
        Ok(())
    }

    fn inputs(&self) -> Vec<&Input> {
        Vec::new()
    }

    fn outputs(&self) -> Vec<&Output> {
        self.outputs.iter().map(|o| o.as_ref()).collect()
    }

    fn back_prop(&self, _errors: &[BackError], _rate: f64) -> Vec<BackError> {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::group::connect;
    use crate::graph::layer::Layer;

    #[test]
    fn subscription_sees_every_broadcast() {
        let output = Output::new();
        let subscription = output.subscribe();
        output.send(0.25).unwrap();
        assert_eq!(subscription.result().unwrap(), 0.25);
        assert_eq!(subscription.try_result(), None);
        output.send(0.5).unwrap();
        assert_eq!(subscription.try_result(), Some(0.5));
    }

    #[test]
    fn subscription_times_out_when_nothing_arrives() {
        let output = Output::new();
        let subscription = output.subscribe();
        let got = subscription.result_timeout(Duration::from_millis(10)).unwrap();
        assert_eq!(got, None);
    }

    #[test]
    fn subscription_error_is_tagged_with_its_link() {
        let output = Output::new();
        let subscription = output.subscribe();
        let err = subscription.error(-0.3);
        assert_eq!(err.link(), subscription.link().id());
        assert_eq!(err.err(), -0.3);
    }

    #[test]
    fn publisher_is_an_inert_group() {
        let publisher = Publisher::new(3);
        assert_eq!(publisher.outputs().len(), 3);
        assert!(publisher.inputs().is_empty());
        assert!(publisher.activate().is_ok());
        assert!(publisher.back_prop(&[], 0.5).is_empty());
    }

    #[test]
    fn publications_feed_connected_layer() {
        let publisher = Publisher::new(2);
        let layer = Layer::new("sink", 1);
        connect(&publisher, &layer);

        let publications = publisher.publications();
        publications[0].send(1.0).unwrap();
        publications[1].send(2.0).unwrap();
        assert_eq!(layer.neurons()[0].input().sum().unwrap(), 3.0);
    }
}
