pub struct SquaredError;

impl SquaredError {
    /// Sum of squared residuals: Σ(expected - predicted)²
    pub fn loss(predicted: &[f64], expected: &[f64]) -> f64 {
        predicted.iter().zip(expected.iter())
            .map(|(y, t)| (t - y).powi(2))
            .sum()
    }

    /// Per-output error seeding the backward pass of a sigmoid output layer:
    /// (expected - predicted) · y · (1 - y)
    pub fn sigmoid_delta(predicted: &[f64], expected: &[f64]) -> Vec<f64> {
        predicted.iter().zip(expected.iter())
            .map(|(y, t)| (t - y) * y * (1.0 - y))
            .collect()
    }
}
