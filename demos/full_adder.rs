//! Full adder on a 3-2-2 network of neuron threads.
//!
//! Run with:
//!   cargo run --example full_adder --release
//!
//! `RUST_LOG=debug` shows every error check.

use std::sync::mpsc;
use std::thread;

use dataflow_nn::dataset::full_adder;
use dataflow_nn::train::{bits_match, to_bit, TrainStats};
use dataflow_nn::{train_loop, Network, NetworkSpec, TrainConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let (inputs, labels) = full_adder();
    let spec = NetworkSpec::dense("full-adder", &[3, 2, 2])?;
    let mut rng = StdRng::from_entropy();
    let network = Network::build(&spec, &mut rng)?;

    let (tx, rx) = mpsc::channel::<TrainStats>();
    let printer = thread::spawn(move || {
        for stats in rx.iter().filter(|s| s.step % 10_000 == 0) {
            println!("step {:>6}: error = {:.6}", stats.step, stats.error);
        }
    });

    let config = TrainConfig {
        progress_tx: Some(tx),
        ..TrainConfig::new(0.5, 100_000, 0.2)
    };
    let report = train_loop(&network, &inputs, &labels, &config, &mut rng)?;
    drop(config);
    printer.join().ok();
    println!("done when {} (converged: {})\n", report.steps, report.converged);

    for (input, expected) in inputs.iter().zip(&labels) {
        let output = network.forward(input)?;
        let show = |v: &[f64]| v.iter().map(|&x| to_bit(x).to_string()).collect::<Vec<_>>().join(" ");
        println!("{} -> {} (expect {}) {:?}", show(input), show(&output), show(expected), output);
        println!("{}", if bits_match(&output, expected) { "success" } else { "fail" });
    }
    Ok(())
}
