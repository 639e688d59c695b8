//! Trains the burglary alarm network from a file of observations and estimates how likely a
//! burglary is when the neighbours call.
//!
//! Each line of the training file holds five 0/1 columns:
//! Burglary, Earthquake, Alarm, JohnCalls, MaryCalls

use clap::Parser;
use env_logger::{Builder, Env};
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;

use rvnet::data::{self, Format};
use rvnet::{BayesianNetwork, ConditionalInferenceEngine, NetworkBuilder, RejectionSamplingEngine};

use std::io::Write;
use std::path::PathBuf;
use std::process;

/// These options define the inputs from the user.
#[derive(Parser, Debug)]
#[command(name = "rvnet", version, about = "Train a Bayesian network and estimate posteriors by sampling.")]
struct Config {

    /// The delimited file of training rows
    training: PathBuf,

    /// The character separating fields
    #[arg(long, default_value_t = ',')]
    delimiter: char,

    /// Skip the first line of the training file
    #[arg(long)]
    header: bool,

    /// The number of joint samples drawn per estimate
    #[arg(long, default_value_t = 100_000)]
    samples: usize,

    /// Seed for the random number generator; drawn from the OS when absent
    #[arg(long)]
    seed: Option<u64>,
}

fn alarm_network() -> rvnet::Result<BayesianNetwork<u8>> {
    NetworkBuilder::new().with_variable("Burglary", vec![0, 1], &[])
                         .with_variable("Earthquake", vec![0, 1], &[])
                         .with_variable("Alarm", vec![0, 1], &["Burglary", "Earthquake"])
                         .with_variable("JohnCalls", vec![0, 1], &["Alarm"])
                         .with_variable("MaryCalls", vec![0, 1], &["JohnCalls"])
                         .build()
}

fn run(config: Config) -> rvnet::Result<()> {
    let format = Format { delimiter: config.delimiter, header: config.header };
    let rows: Vec<Vec<u8>> = data::load_rows(&config.training, format)?;
    info!("loaded {} rows from {}", rows.len(), config.training.display());

    let mut model = alarm_network()?;
    model.train(&rows)?;

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy()
    };

    let sample = model.sample(&mut rng)?;
    println!("sample: {:?}", model.topological_order().iter().zip(sample.iter()).collect::<Vec<_>>());

    let engine = RejectionSamplingEngine::new(&model, config.samples);

    let queries: [&[(&str, u8)]; 2] = [
        &[("MaryCalls", 1)],
        &[("MaryCalls", 1), ("JohnCalls", 1)]
    ];

    for evidence in queries.iter() {
        let estimate = engine.infer("Burglary", evidence, &mut rng)?;
        let given: Vec<String> = evidence.iter().map(|(n, v)| format!("{} = {}", n, v)).collect();
        println!(
            "P(Burglary = 1 | {}) ~= {:.4}  ({} of {} samples accepted)",
            given.join(", "),
            estimate.probability(&1),
            estimate.accepted,
            estimate.drawn
        );
    }

    Ok(())
}

fn main() {
    Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| writeln!(buf, "{} [{}] {}", record.level(), record.target(), record.args()))
        .init();

    let config = Config::parse();
    info!("{:?}", config);

    if let Err(e) = run(config) {
        eprintln!("error: {}", e);
        process::exit(1);
    }
}
