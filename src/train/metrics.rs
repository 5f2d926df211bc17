use crate::error::{FlowError, Result};
use crate::network::network::Network;

/// Thresholds an output at 0.5.
pub fn to_bit(v: f64) -> u8 {
    if v >= 0.5 { 1 } else { 0 }
}

/// Whether every output rounds to the same bit as its expected value.
pub fn bits_match(output: &[f64], expected: &[f64]) -> bool {
    output.len() == expected.len()
        && output.iter().zip(expected).all(|(&o, &e)| to_bit(o) == to_bit(e))
}

/// Index of the maximum element in a slice.
pub fn argmax(v: &[f64]) -> usize {
    v.iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Fraction of samples whose largest output is the expected class.
pub fn accuracy(network: &Network, inputs: &[Vec<f64>], labels: &[Vec<f64>]) -> Result<f64> {
    if inputs.len() != labels.len() {
        return Err(FlowError::InputSize { expected: inputs.len(), got: labels.len() });
    }
    if inputs.is_empty() {
        return Ok(0.0);
    }
    let mut correct = 0usize;
    for (input, label) in inputs.iter().zip(labels) {
        let output = network.forward(input)?;
        if argmax(&output) == argmax(label) {
            correct += 1;
        }
    }
    Ok(correct as f64 / inputs.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::spec::NetworkSpec;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn to_bit_threshold_is_inclusive() {
        assert_eq!(to_bit(0.5), 1);
        assert_eq!(to_bit(0.4999), 0);
        assert_eq!(to_bit(0.93), 1);
    }

    #[test]
    fn bits_match_compares_rounded_values() {
        assert!(bits_match(&[0.9, 0.1], &[1.0, 0.0]));
        assert!(!bits_match(&[0.9, 0.6], &[1.0, 0.0]));
        assert!(!bits_match(&[0.9], &[1.0, 0.0]));
    }

    #[test]
    fn argmax_picks_last_of_equal_maxima() {
        assert_eq!(argmax(&[0.1, 0.7, 0.2]), 1);
        assert_eq!(argmax(&[0.5, 0.5]), 1);
        assert_eq!(argmax(&[]), 0);
    }

    #[test]
    fn accuracy_rejects_unlabelled_samples() {
        let spec = NetworkSpec::dense("classes", &[1, 2]).unwrap();
        let net = Network::build(&spec, &mut StdRng::seed_from_u64(12)).unwrap();
        let inputs = vec![vec![0.0], vec![1.0], vec![0.5], vec![0.25]];
        let labels = vec![vec![1.0, 0.0]];
        assert!(matches!(
            accuracy(&net, &inputs, &labels),
            Err(FlowError::InputSize { expected: 4, got: 1 })
        ));
        assert_eq!(accuracy(&net, &[], &[]).unwrap(), 0.0);
    }
}
