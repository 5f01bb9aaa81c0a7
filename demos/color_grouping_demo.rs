// Demonstration: run the color grouping simulation and evaluate a baseline policy.
//
// Run from the repo root:
//   RUST_LOG=color_grouping=debug cargo run --example color_grouping_demo -- --policy heuristic --rounds 5

use std::env;

use color_grouping::{
    EvaluationMetrics, GroupingHeuristicPolicy, Policy, RandomPolicy, SimConfig, Simulation,
};

fn main() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let args: Vec<String> = env::args().collect();
    let policy_name = arg_value(&args, "--policy").unwrap_or("heuristic");
    let rounds: usize = arg_value(&args, "--rounds")
        .and_then(|s| s.parse().ok())
        .unwrap_or(5);
    let seed: u64 = arg_value(&args, "--seed")
        .and_then(|s| s.parse().ok())
        .unwrap_or(42);

    let config = SimConfig {
        seed,
        max_ticks: 500,
        ..SimConfig::default()
    };
    let mut sim = match Simulation::new(config) {
        Ok(sim) => sim,
        Err(err) => {
            eprintln!("Invalid configuration: {}", err);
            std::process::exit(2);
        }
    };

    let mut policy: Box<dyn Policy> = match policy_name {
        "random" => Box::new(RandomPolicy::new(seed)),
        "heuristic" => Box::new(GroupingHeuristicPolicy::default()),
        other => {
            eprintln!("Unknown --policy '{}'; expected 'heuristic' or 'random'.", other);
            std::process::exit(2);
        }
    };

    let metrics = EvaluationMetrics::evaluate(&mut sim, policy.as_mut(), rounds);
    println!("Policy: {}", policy.name());
    println!("{}", metrics);
}

fn arg_value<'a>(args: &'a [String], key: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == key)
        .and_then(|i| args.get(i + 1))
        .map(|s| s.as_str())
}
