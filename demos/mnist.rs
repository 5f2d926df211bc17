//! MNIST digit classification on a 784-15-10 network of neuron threads.
//!
//! Run with:
//!   cargo run --example mnist --release -- \
//!     train-images.idx3-ubyte train-labels.idx1-ubyte \
//!     t10k-images.idx3-ubyte t10k-labels.idx1-ubyte
//!
//! One in-order pass over the training set, one update per image, then
//! argmax accuracy on the evaluation set.

use std::env;

use dataflow_nn::dataset::load_idx_pair;
use dataflow_nn::train::accuracy;
use dataflow_nn::{train_network, Network, NetworkSpec, Sgd};
use rand::rngs::StdRng;
use rand::SeedableRng;

const HIDDEN_SIZE: usize = 15;
const LEARNING_RATE: f64 = 0.5;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 5 {
        eprintln!("usage: mnist <train-images> <train-labels> <eval-images> <eval-labels>");
        std::process::exit(2);
    }

    let (train_inputs, train_labels) = load_idx_pair(&args[1], &args[2], 10)?;
    let (eval_inputs, eval_labels) = load_idx_pair(&args[3], &args[4], 10)?;
    let pixels = train_inputs.first().map(|v| v.len()).unwrap_or(0);

    let spec = NetworkSpec::dense("mnist", &[pixels, HIDDEN_SIZE, 10])?;
    let network = Network::build(&spec, &mut StdRng::from_entropy())?;

    let loss = train_network(&network, &train_inputs, &train_labels, &Sgd::new(LEARNING_RATE))?;
    println!("training pass done, summed error {:.2}", loss);

    let acc = accuracy(&network, &eval_inputs, &eval_labels)?;
    let success = (acc * eval_inputs.len() as f64).round() as usize;
    println!("success {}", success);
    println!("fail {}", eval_inputs.len() - success);
    Ok(())
}
