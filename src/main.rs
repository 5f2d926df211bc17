use std::path::PathBuf;

use clap::Parser;
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;

use dataflow_nn::dataset::full_adder;
use dataflow_nn::train::{bits_match, to_bit};
use dataflow_nn::{train_loop, Network, NetworkSpec, TrainConfig};

/// Trains a thread-per-neuron network on the 3-bit full adder and prints
/// the resulting truth table.
#[derive(Parser, Debug)]
#[command(name = "dataflow-nn", version, long_about = None)]
struct Args {
    /// Network architecture as JSON (must take 3 inputs and produce 2 outputs)
    #[arg(short, long)]
    network: Option<PathBuf>,

    /// Training configuration as JSON
    #[arg(short, long)]
    train: Option<PathBuf>,

    /// Hidden layer size when no network file is given
    #[arg(long, default_value_t = 2)]
    hidden: usize,

    /// RNG seed; overrides the one in the training configuration
    #[arg(long)]
    seed: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    env_logger::Builder::from_default_env()
        .filter_level(if args.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .init();

    let spec = match &args.network {
        Some(path) => NetworkSpec::load_json(&path.to_string_lossy())?,
        None => NetworkSpec::dense("full-adder", &[3, args.hidden, 2])?,
    };
    let mut config = match &args.train {
        Some(path) => TrainConfig::load_json(&path.to_string_lossy())?,
        None => TrainConfig::default(),
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let (inputs, labels) = full_adder();
    let network = Network::build(&spec, &mut rng)?;
    let report = train_loop(&network, &inputs, &labels, &config, &mut rng)?;
    info!("done after {} steps (error {:.4})", report.steps, report.final_error);

    let bits = |v: &[f64]| v.iter().map(|&x| to_bit(x).to_string()).collect::<Vec<_>>().join(" ");
    for (input, expected) in inputs.iter().zip(&labels) {
        let output = network.forward(input)?;
        let raw = output.iter().map(|v| format!("{:.6}", v)).collect::<Vec<_>>().join(" ");
        println!(" input( {} )", bits(input));
        println!("output( {} ) ( {} )", bits(&output), raw);
        println!("expect( {} )", bits(expected));
        println!("{}\n", if bits_match(&output, expected) { "success" } else { "fail" });
    }

    Ok(())
}
