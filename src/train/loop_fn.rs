use std::sync::atomic::Ordering;
use std::time::Instant;

use log::{debug, info};
use rand::Rng;

use crate::error::{FlowError, Result};
use crate::network::network::Network;
use crate::optim::sgd::Sgd;
use crate::train::epoch_stats::{TrainReport, TrainStats};
use crate::train::train_config::TrainConfig;

// ---------------------------------------------------------------------------
// Public entry point
// ---------------------------------------------------------------------------

/// Trains `network` one randomly drawn example at a time until the
/// whole-dataset squared error drops below `config.target_error`.
///
/// # Arguments
/// - `network` — a built network; its weights are updated in place
/// - `inputs`  — training samples, each of length `network.input_size()`
/// - `labels`  — expected outputs, same length as `inputs`
/// - `config`  — learning rate, limits, optional progress channel and stop flag
/// - `rng`     — picks the example for every update
///
/// # Early termination
/// The loop stops before `config.max_steps` when the target error is
/// reached, when `config.stop_flag` is set, or when the `progress_tx`
/// receiver has been dropped.
pub fn train_loop<R: Rng + ?Sized>(
    network: &Network,
    inputs: &[Vec<f64>],
    labels: &[Vec<f64>],
    config: &TrainConfig,
    rng: &mut R,
) -> Result<TrainReport> {
    config.validate()?;
    if inputs.is_empty() {
        return Err(FlowError::InvalidConfig("training set is empty".to_owned()));
    }
    if inputs.len() != labels.len() {
        return Err(FlowError::InputSize { expected: inputs.len(), got: labels.len() });
    }

    let optimizer = Sgd::new(config.learning_rate);
    let started = Instant::now();

    let mut error = network.squared_error(inputs, labels)?;
    let mut checked_at = 0;
    let mut steps = 0;

    while error >= config.target_error && steps < config.max_steps {
        if stop_requested(config) {
            info!("training stopped by flag after {} steps", steps);
            break;
        }

        let n = rng.gen_range(0..inputs.len());
        network.train_example(&inputs[n], &labels[n], &optimizer)?;
        steps += 1;

        if steps % config.check_every != 0 {
            continue;
        }
        error = network.squared_error(inputs, labels)?;
        checked_at = steps;

        let stats = TrainStats {
            step: steps,
            max_steps: config.max_steps,
            error,
            elapsed_ms: started.elapsed().as_millis() as u64,
        };
        debug!("step {}: error {:.6}", steps, error);

        if let Some(ref tx) = config.progress_tx {
            if tx.send(stats).is_err() {
                info!("progress receiver dropped, stopping after {} steps", steps);
                break;
            }
        }
    }

    if checked_at != steps {
        error = network.squared_error(inputs, labels)?;
    }
    let converged = error < config.target_error;
    info!(
        "{}: {} steps, error {:.6} ({})",
        network.name(),
        steps,
        error,
        if converged { "converged" } else { "not converged" }
    );

    Ok(TrainReport { steps, final_error: error, converged })
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn stop_requested(config: &TrainConfig) -> bool {
    config
        .stop_flag
        .as_ref()
        .map(|flag| flag.load(Ordering::Relaxed))
        .unwrap_or(false)
}
