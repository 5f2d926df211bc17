use log::info;
use rand::Rng;

use crate::error::{FlowError, Result};
use crate::graph::{connect_random_weight, BackError, Group, Layer, Publication, Publisher, Subscription};
use crate::loss::SquaredError;
use crate::network::spec::NetworkSpec;
use crate::optim::Sgd;

/// A fully-connected stack of layers with taps on both ends.
///
/// Values enter through one [`Publication`] per input and leave through one
/// [`Subscription`] per output neuron. Every neuron runs on its own thread
/// from the moment the network is built.
pub struct Network {
    name: String,
    publisher: Publisher,
    publications: Vec<Publication>,
    layers: Vec<Layer>,
    subscriptions: Vec<Subscription>,
}

impl Network {
    /// Wires and activates the network described by `spec`, drawing the
    /// initial weights from `rng`.
    pub fn build<R: Rng + ?Sized>(spec: &NetworkSpec, rng: &mut R) -> Result<Network> {
        spec.validate()?;
        let [min, max] = spec.weight_range;

        let publisher = Publisher::new(spec.inputs);
        let layers: Vec<Layer> = spec
            .layers
            .iter()
            .enumerate()
            .map(|(i, l)| {
                Layer::builder(format!("{}.{}", spec.name, i))
                    .size(l.size, l.activation)
                    .build()
            })
            .collect();

        let mut upstream: &dyn Group = &publisher;
        for layer in &layers {
            connect_random_weight(upstream, layer, min, max, rng);
            upstream = layer;
        }

        let subscriptions: Vec<Subscription> = layers
            .last()
            .map(|l| l.neurons().iter().map(|n| n.subscribe()).collect())
            .unwrap_or_default();

        for layer in &layers {
            layer.activate()?;
        }

        let sizes: Vec<usize> = layers.iter().map(|l| l.len()).collect();
        info!("network {} running: {} inputs, layers {:?}", spec.name, spec.inputs, sizes);

        Ok(Network {
            name: spec.name.clone(),
            publications: publisher.publications(),
            publisher,
            layers,
            subscriptions,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn input_size(&self) -> usize {
        self.publications.len()
    }

    pub fn output_size(&self) -> usize {
        self.subscriptions.len()
    }

    /// Layers from the input side to the output side.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn publisher(&self) -> &Publisher {
        &self.publisher
    }

    pub fn subscriptions(&self) -> &[Subscription] {
        &self.subscriptions
    }

    /// Runs one forward pass and waits for every output.
    pub fn forward(&self, input: &[f64]) -> Result<Vec<f64>> {
        check_len(self.input_size(), input.len())?;
        for (publication, &v) in self.publications.iter().zip(input) {
            publication.send(v)?;
        }
        self.subscriptions.iter().map(|s| s.result()).collect()
    }

    /// Backward pass seeded with one error per output neuron. Must follow
    /// the forward pass whose values it corrects.
    pub fn backward(&self, deltas: &[f64], optimizer: &Sgd) -> Result<Vec<BackError>> {
        check_len(self.output_size(), deltas.len())?;
        let seed = self
            .subscriptions
            .iter()
            .zip(deltas)
            .map(|(s, &d)| s.error(d))
            .collect();
        let groups: Vec<&dyn Group> = self.layers.iter().rev().map(|l| l as &dyn Group).collect();
        Ok(optimizer.step(&groups, seed))
    }

    /// One stochastic update on a single example. Returns the outputs seen
    /// before the weights changed.
    pub fn train_example(&self, input: &[f64], expected: &[f64], optimizer: &Sgd) -> Result<Vec<f64>> {
        check_len(self.output_size(), expected.len())?;
        let output = self.forward(input)?;
        let deltas = SquaredError::sigmoid_delta(&output, expected);
        self.backward(&deltas, optimizer)?;
        Ok(output)
    }

    /// Sum of squared errors over a whole dataset, without updating anything.
    pub fn squared_error(&self, inputs: &[Vec<f64>], labels: &[Vec<f64>]) -> Result<f64> {
        check_len(inputs.len(), labels.len())?;
        let mut total = 0.0;
        for (input, label) in inputs.iter().zip(labels) {
            total += SquaredError::loss(&self.forward(input)?, label);
        }
        Ok(total)
    }
}

fn check_len(expected: usize, got: usize) -> Result<()> {
    if expected != got {
        return Err(FlowError::InputSize { expected, got });
    }
    Ok(())
}
