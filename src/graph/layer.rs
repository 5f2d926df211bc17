use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use log::{debug, warn};

use crate::activation::ActivationFunction;
use crate::error::{FlowError, Result};
use crate::graph::group::{BackError, Group};
use crate::graph::link::LinkId;
use crate::graph::neuron::Neuron;
use crate::graph::port::{Input, Output};

/// A named, ordered set of neurons forming one layer of the network.
///
/// Layers are immutable once built; use [`LayerBuilder`] to assemble one.
#[derive(Debug)]
pub struct Layer {
    name: String,
    neurons: Vec<Arc<Neuron>>,
}

impl Layer {
    /// `size` sigmoid neurons with zero bias.
    pub fn new(name: impl Into<String>, size: usize) -> Layer {
        LayerBuilder::new(name).size(size, ActivationFunction::Sigmoid).build()
    }

    pub fn builder(name: impl Into<String>) -> LayerBuilder {
        LayerBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn neurons(&self) -> &[Arc<Neuron>] {
        &self.neurons
    }

    pub fn len(&self) -> usize {
        self.neurons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neurons.is_empty()
    }

    /// Links of `errors` that are not an output link of any neuron here.
    /// Such errors are ignored by [`Group::back_prop`].
    pub fn unmatched_errors(&self, errors: &[BackError]) -> Vec<LinkId> {
        let owned: HashSet<LinkId> = self
            .neurons
            .iter()
            .flat_map(|n| n.output().links())
            .map(|l| l.id())
            .collect();
        errors
            .iter()
            .map(|e| e.link())
            .filter(|id| !owned.contains(id))
            .collect()
    }

    /// [`Group::back_prop`] that refuses errors it cannot attribute to one of
    /// its neurons. Nothing is updated when it fails.
    pub fn try_back_prop(&self, errors: &[BackError], rate: f64) -> Result<Vec<BackError>> {
        if let Some(link) = self.unmatched_errors(errors).into_iter().next() {
            return Err(FlowError::UnmatchedBackError { link });
        }
        Ok(self.propagate(errors, rate))
    }

    fn propagate(&self, errors: &[BackError], rate: f64) -> Vec<BackError> {
        let mut incoming: HashMap<LinkId, f64> = HashMap::with_capacity(errors.len());
        for e in errors {
            *incoming.entry(e.link()).or_insert(0.0) += e.err();
        }

        let mut back = Vec::new();
        for neuron in &self.neurons {
            let err: f64 = neuron
                .output()
                .links()
                .iter()
                .filter_map(|l| incoming.get(&l.id()))
                .sum();
            back.extend(neuron.back_prop(err, rate));
        }
        back
    }
}

impl Group for Layer {
    fn activate(&self) -> Result<()> {
        for neuron in &self.neurons {
            neuron.activate()?;
        }
        debug!("layer {} activated ({} neurons)", self.name, self.neurons.len());
        Ok(())
    }

    fn inputs(&self) -> Vec<&Input> {
        self.neurons.iter().map(|n| n.input()).collect()
    }

    fn outputs(&self) -> Vec<&Output> {
        self.neurons.iter().map(|n| n.output()).collect()
    }

    /// Errors tagged with a link no neuron here sends on contribute nothing.
    fn back_prop(&self, errors: &[BackError], rate: f64) -> Vec<BackError> {
        let unmatched = self.unmatched_errors(errors);
        if !unmatched.is_empty() {
            warn!(
                "layer {}: ignoring {} back errors on foreign links (first {})",
                self.name,
                unmatched.len(),
                unmatched[0]
            );
        }
        self.propagate(errors, rate)
    }
}

/// Append-only collection of neurons, frozen into a [`Layer`] by `build`.
pub struct LayerBuilder {
    name: String,
    neurons: Vec<Arc<Neuron>>,
}

impl LayerBuilder {
    pub fn new(name: impl Into<String>) -> LayerBuilder {
        LayerBuilder {
            name: name.into(),
            neurons: Vec::new(),
        }
    }

    /// Appends `size` fresh neurons using `activation`.
    pub fn size(mut self, size: usize, activation: ActivationFunction) -> Self {
        self.neurons
            .extend((0..size).map(|_| Neuron::builder().activation(activation).build()));
        self
    }

    pub fn add(mut self, neurons: impl IntoIterator<Item = Arc<Neuron>>) -> Self {
        self.neurons.extend(neurons);
        self
    }

    pub fn build(self) -> Layer {
        Layer {
            name: self.name,
            neurons: self.neurons,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::sigmoid;
    use crate::graph::group::connect;
    use crate::graph::tap::Publisher;

    #[test]
    fn builder_keeps_insertion_order() {
        let a = Neuron::new();
        let b = Neuron::new();
        let layer = Layer::builder("mixed")
            .add([Arc::clone(&a)])
            .size(2, ActivationFunction::Tanh)
            .add([Arc::clone(&b)])
            .build();
        assert_eq!(layer.name(), "mixed");
        assert_eq!(layer.len(), 4);
        assert_eq!(layer.neurons()[0].id(), a.id());
        assert_eq!(layer.neurons()[1].activation(), ActivationFunction::Tanh);
        assert_eq!(layer.neurons()[3].id(), b.id());
    }

    #[test]
    fn activate_fails_on_unwired_layer() {
        let layer = Layer::new("orphan", 2);
        assert!(matches!(layer.activate(), Err(FlowError::DanglingInput { .. })));
    }

    #[test]
    fn single_link_update_follows_delta_rule() {
        let (w, b, x, t, alpha) = (0.6, -0.2, 0.8, 1.0, 0.5);

        let publisher = Publisher::new(1);
        let out = Layer::builder("out").add([Neuron::builder().bias(b).build()]).build();
        let link = connect(&publisher, &out).remove(0);
        link.set_weight(w);
        let subscription = out.neurons()[0].subscribe();
        out.activate().unwrap();

        publisher.publications()[0].send(x).unwrap();
        let y = subscription.result().unwrap();
        assert_eq!(y, sigmoid(w * x + b));

        let e = (t - y) * y * (1.0 - y);
        let back = out.back_prop(&[subscription.error(e)], alpha);

        assert_eq!(link.weight(), w + alpha * e * x);
        assert_eq!(out.neurons()[0].bias(), b + alpha * e);
        assert_eq!(back, vec![BackError::new(link.id(), e * w * x * (1.0 - x))]);
    }

    #[test]
    fn errors_are_routed_by_link_identity() {
        let hidden = Layer::new("hidden", 2);
        let out = Layer::new("out", 2);
        let inputs: Vec<_> = hidden.neurons().iter().map(|n| n.input().publish()).collect();
        connect(&hidden, &out);

        // One forward step by hand, so every link has carried a value.
        for (p, v) in inputs.iter().zip([0.0, 0.0]) {
            p.send(v).unwrap();
        }
        for n in hidden.neurons() {
            n.input().sum().unwrap();
            n.fire(0.0).unwrap();
        }
        for n in out.neurons() {
            n.input().sum().unwrap();
        }

        // Only hidden neuron 1 feeds these errors, through out[0] and out[1].
        let link_10 = hidden.neurons()[1].find_link_to(&out.neurons()[0]).unwrap();
        let link_11 = hidden.neurons()[1].find_link_to(&out.neurons()[1]).unwrap();
        let errors = [BackError::new(link_10.id(), 0.25), BackError::new(link_11.id(), 0.5)];
        let bias_before: Vec<f64> = hidden.neurons().iter().map(|n| n.bias()).collect();

        let back = hidden.back_prop(&errors, 1.0);

        assert_eq!(hidden.neurons()[0].bias(), bias_before[0]);
        assert_eq!(hidden.neurons()[1].bias(), bias_before[1] + 0.75);
        assert_eq!(back.len(), 2);
        assert_eq!(back[0].err(), 0.0);
        assert_eq!(back[1].link(), inputs[1].links()[0].id());
    }

    #[test]
    fn unmatched_errors_are_ignored_or_reported() {
        let publisher = Publisher::new(1);
        let out = Layer::new("out", 1);
        connect(&publisher, &out);
        let subscription = out.neurons()[0].subscribe();
        let stranger = Publisher::new(1).publications()[0].output().subscribe();

        let errors = [subscription.error(0.1), stranger.error(9.0)];
        assert_eq!(out.unmatched_errors(&errors), vec![stranger.link().id()]);
        assert!(matches!(
            out.try_back_prop(&errors, 0.5),
            Err(FlowError::UnmatchedBackError { link }) if link == stranger.link().id()
        ));
        // Rejected call changed nothing.
        assert_eq!(out.neurons()[0].bias(), 0.0);

        out.back_prop(&errors, 0.5);
        assert_eq!(out.neurons()[0].bias(), 0.5 * 0.1);
    }
}
