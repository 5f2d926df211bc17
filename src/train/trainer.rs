use crate::{
    error::{FlowError, Result},
    loss::sse::SquaredError,
    network::network::Network,
    optim::sgd::Sgd,
};

/// One in-order pass over the dataset, one update per example.
///
/// Returns the summed squared error of the outputs seen *before* each
/// update, a cheap running estimate of how well the pass went.
pub fn train_network(
    network: &Network,
    inputs: &[Vec<f64>],
    expected_outputs: &[Vec<f64>],
    optimizer: &Sgd,
) -> Result<f64> {
    if inputs.len() != expected_outputs.len() {
        return Err(FlowError::InputSize { expected: inputs.len(), got: expected_outputs.len() });
    }
    let mut total_loss = 0.0;

    for (input, expected) in inputs.iter().zip(expected_outputs.iter()) {
        let output = network.train_example(input, expected, optimizer)?;
        total_loss += SquaredError::loss(&output, expected);
    }

    Ok(total_loss)
}
