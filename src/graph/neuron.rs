use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;

use log::{debug, error, trace};

use crate::activation::ActivationFunction;
use crate::error::{FlowError, Result};
use crate::graph::group::BackError;
use crate::graph::link::{Link, Scalar};
use crate::graph::port::{Input, Output};
use crate::graph::tap::Subscription;

static NEXT_NEURON_ID: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NeuronId(u64);

impl fmt::Display for NeuronId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Called by a running neuron with every completed input sum.
pub type ReceiveHandler = Box<dyn Fn(&Neuron, f64) -> Result<()> + Send + Sync>;

/// A node of the graph.
///
/// Once activated, a neuron owns a thread that waits for one value on every
/// input link, then hands the weighted sum to its receive handler. The
/// default handler sends `activation(sum + bias)` on the output.
pub struct Neuron {
    id: NeuronId,
    input: Input,
    output: Output,
    bias: Scalar,
    activation: ActivationFunction,
    handler: Option<ReceiveHandler>,
    active: AtomicBool,
}

impl Neuron {
    /// A sigmoid neuron with zero bias.
    pub fn new() -> Arc<Neuron> {
        NeuronBuilder::new().build()
    }

    pub fn builder() -> NeuronBuilder {
        NeuronBuilder::new()
    }

    pub fn id(&self) -> NeuronId {
        self.id
    }

    pub fn input(&self) -> &Input {
        &self.input
    }

    pub fn output(&self) -> &Output {
        &self.output
    }

    pub fn bias(&self) -> f64 {
        self.bias.get()
    }

    pub fn set_bias(&self, bias: f64) {
        self.bias.set(bias)
    }

    pub fn activation(&self) -> ActivationFunction {
        self.activation
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Starts the neuron's thread. The thread runs until the process exits.
    ///
    /// Fails if the input has no link (the first sum would never complete)
    /// or if the neuron was already activated.
    pub fn activate(self: &Arc<Self>) -> Result<()> {
        if self.input.is_empty() {
            return Err(FlowError::DanglingInput { neuron: self.id });
        }
        if self.active.swap(true, Ordering::SeqCst) {
            return Err(FlowError::AlreadyActive { neuron: self.id });
        }

        let neuron = Arc::clone(self);
        let spawned = thread::Builder::new()
            .name(format!("neuron-{}", self.id))
            .spawn(move || neuron.run());
        if let Err(e) = spawned {
            self.active.store(false, Ordering::SeqCst);
            return Err(e.into());
        }

        debug!(
            "activated {} ({} in, {} out, {:?})",
            self.id,
            self.input.len(),
            self.output.len(),
            self.activation
        );
        Ok(())
    }

    fn run(&self) {
        loop {
            let sum = match self.input.sum() {
                Ok(sum) => sum,
                Err(e) => {
                    error!("{} stopped: {}", self.id, e);
                    return;
                }
            };
            trace!("{} received sum {}", self.id, sum);
            if let Err(e) = self.receive(sum) {
                error!("{} stopped: {}", self.id, e);
                return;
            }
        }
    }

    fn receive(&self, sum: f64) -> Result<()> {
        match &self.handler {
            Some(handler) => handler(self, sum),
            None => self.fire(sum),
        }
    }

    /// Sends `activation(sum + bias)` to every output link.
    pub fn fire(&self, sum: f64) -> Result<()> {
        self.output.send(self.activation.function(sum + self.bias()))
    }

    /// Attaches a read tap to this neuron's output.
    pub fn subscribe(&self) -> Subscription {
        self.output.subscribe()
    }

    /// The link running from this neuron's output into `to`'s input, if any.
    pub fn find_link_to(&self, to: &Neuron) -> Option<Arc<Link>> {
        self.output.links().into_iter().find(|l| to.input.contains(l))
    }

    /// Applies the accumulated error `err` to every incoming link and the
    /// bias, returning one back error per incoming link for the upstream
    /// group. Each returned error uses the weight from before the update.
    pub(crate) fn back_prop(&self, err: f64, rate: f64) -> Vec<BackError> {
        let errors = self
            .input
            .links()
            .iter()
            .map(|l| {
                let last = l.last();
                let back = BackError::new(l.id(), err * l.weight() * last * (1.0 - last));
                l.adjust_weight(rate * err * last);
                back
            })
            .collect();
        self.bias.add(rate * err);
        errors
    }
}

impl fmt::Debug for Neuron {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Neuron")
            .field("id", &self.id)
            .field("inputs", &self.input.len())
            .field("outputs", &self.output.len())
            .field("bias", &self.bias())
            .field("activation", &self.activation)
            .field("custom_handler", &self.handler.is_some())
            .field("active", &self.is_active())
            .finish()
    }
}

/// Collects a neuron's fixed settings before it is shared.
#[derive(Default)]
pub struct NeuronBuilder {
    activation: ActivationFunction,
    bias: f64,
    handler: Option<ReceiveHandler>,
}

impl NeuronBuilder {
    pub fn new() -> NeuronBuilder {
        NeuronBuilder::default()
    }

    pub fn activation(mut self, activation: ActivationFunction) -> Self {
        self.activation = activation;
        self
    }

    pub fn bias(mut self, bias: f64) -> Self {
        self.bias = bias;
        self
    }

    /// Replaces the default "fire on every sum" behaviour.
    pub fn on_receive<F>(mut self, handler: F) -> Self
    where
        F: Fn(&Neuron, f64) -> Result<()> + Send + Sync + 'static,
    {
        self.handler = Some(Box::new(handler));
        self
    }

    pub fn build(self) -> Arc<Neuron> {
        Arc::new(Neuron {
            id: NeuronId(NEXT_NEURON_ID.fetch_add(1, Ordering::Relaxed)),
            input: Input::new(),
            output: Output::new(),
            bias: Scalar::new(self.bias),
            activation: self.activation,
            handler: self.handler,
            active: AtomicBool::new(false),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam::channel::unbounded;
    use std::time::Duration;

    #[test]
    fn activation_requires_an_input_link() {
        let neuron = Neuron::new();
        match neuron.activate() {
            Err(FlowError::DanglingInput { neuron: id }) => assert_eq!(id, neuron.id()),
            other => panic!("expected DanglingInput, got {:?}", other),
        }
        assert!(!neuron.is_active());
    }

    #[test]
    fn second_activation_is_rejected() {
        let neuron = Neuron::new();
        let _publication = neuron.input().publish();
        neuron.activate().unwrap();
        assert!(matches!(neuron.activate(), Err(FlowError::AlreadyActive { .. })));
    }

    #[test]
    fn default_handler_sends_activation_of_sum_plus_bias() {
        let neuron = Neuron::builder()
            .activation(ActivationFunction::Identity)
            .bias(0.5)
            .build();
        let publication = neuron.input().publish();
        let subscription = neuron.subscribe();
        neuron.activate().unwrap();

        publication.send(1.0).unwrap();
        assert_eq!(subscription.result().unwrap(), 1.5);
        publication.send(-2.0).unwrap();
        assert_eq!(subscription.result().unwrap(), -1.5);
    }

    #[test]
    fn sigmoid_neuron_with_zero_input_outputs_one_half() {
        let neuron = Neuron::new();
        let publication = neuron.input().publish();
        let subscription = neuron.subscribe();
        neuron.activate().unwrap();

        publication.send(0.0).unwrap();
        assert_eq!(subscription.result().unwrap(), 0.5);
    }

    #[test]
    fn published_value_is_weighted_once() {
        let (tx, rx) = unbounded();
        let neuron = Neuron::builder()
            .on_receive(move |_, sum| {
                tx.send(sum).ok();
                Ok(())
            })
            .build();
        let publication = neuron.input().publish();
        publication.links()[0].set_weight(2.0);
        neuron.activate().unwrap();

        publication.send(1.0).unwrap();
        assert_eq!(rx.recv_timeout(Duration::from_secs(5)).unwrap(), 2.0);
        assert!(rx.recv_timeout(Duration::from_millis(50)).is_err());
    }

    #[test]
    fn find_link_to_follows_shared_link() {
        let a = Neuron::new();
        let b = Neuron::new();
        let c = Neuron::new();
        let link = b.input().register(a.output());

        let found = a.find_link_to(&b).expect("a feeds b");
        assert_eq!(found.id(), link.id());
        assert!(a.find_link_to(&c).is_none());
        assert!(b.find_link_to(&a).is_none());
    }

    #[test]
    fn back_prop_uses_pre_update_weight() {
        let neuron = Neuron::builder().bias(0.1).build();
        let source = Output::new();
        let link = neuron.input().register(&source);
        link.set_weight(0.4);
        source.send(0.3).unwrap();
        neuron.input().sum().unwrap();

        let errors = neuron.back_prop(0.2, 0.5);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].link(), link.id());
        assert_eq!(errors[0].err(), 0.2 * 0.4 * 0.3 * (1.0 - 0.3));
        assert_eq!(link.weight(), 0.4 + 0.5 * 0.2 * 0.3);
        assert_eq!(neuron.bias(), 0.1 + 0.5 * 0.2);
    }
}
