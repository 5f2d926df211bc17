use serde::{Serialize, Deserialize};

use crate::activation::ActivationFunction;
use crate::error::{FlowError, Result};

/// Describes one layer of neurons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSpec {
    pub size: usize,
    #[serde(default)]
    pub activation: ActivationFunction,
}

impl LayerSpec {
    pub fn sigmoid(size: usize) -> LayerSpec {
        LayerSpec { size, activation: ActivationFunction::Sigmoid }
    }
}

fn default_weight_range() -> [f64; 2] {
    [-0.1, 0.1]
}

/// Architecture of a fully-connected feed-forward network.
///
/// This is configuration only: trained weights are never written out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSpec {
    /// Human-readable name, used in logs and as layer name prefix.
    pub name: String,
    /// Number of values fed into the network per pass.
    pub inputs: usize,
    /// Neuron layers, input side first. The last one is the output layer.
    pub layers: Vec<LayerSpec>,
    /// Initial link weights are drawn uniformly from `[min, max)`.
    #[serde(default = "default_weight_range")]
    pub weight_range: [f64; 2],
}

impl NetworkSpec {
    /// Sigmoid network with the given layer sizes, e.g. `[3, 2, 2]`.
    pub fn dense(name: impl Into<String>, sizes: &[usize]) -> Result<NetworkSpec> {
        let (inputs, layers) = sizes.split_first().ok_or_else(|| {
            FlowError::InvalidConfig("a network needs at least an input size".to_owned())
        })?;
        let spec = NetworkSpec {
            name: name.into(),
            inputs: *inputs,
            layers: layers.iter().map(|&size| LayerSpec::sigmoid(size)).collect(),
            weight_range: default_weight_range(),
        };
        spec.validate()?;
        Ok(spec)
    }

    pub fn validate(&self) -> Result<()> {
        if self.inputs == 0 {
            return Err(FlowError::InvalidConfig("inputs must be at least 1".to_owned()));
        }
        if self.layers.is_empty() {
            return Err(FlowError::InvalidConfig("at least one layer is required".to_owned()));
        }
        if let Some(i) = self.layers.iter().position(|l| l.size == 0) {
            return Err(FlowError::InvalidConfig(format!("layer {} has no neurons", i)));
        }
        let [min, max] = self.weight_range;
        if !(min < max) {
            return Err(FlowError::InvalidConfig(format!(
                "weight_range [{}, {}] is empty", min, max
            )));
        }
        Ok(())
    }

    pub fn outputs(&self) -> usize {
        self.layers.last().map(|l| l.size).unwrap_or(0)
    }

    /// Serializes the spec to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes and validates a `NetworkSpec` from a JSON file.
    pub fn load_json(path: &str) -> Result<NetworkSpec> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        let spec: NetworkSpec = serde_json::from_reader(reader)?;
        spec.validate()?;
        Ok(spec)
    }
}
