#![forbid(unsafe_code)]

use clap::Parser;
use kvsim::config::SimulatorConfig;
use log::LevelFilter;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(
    name = "kvsim",
    version,
    about = "Trace-driven KV cache simulator for LLM prefill serving"
)]
struct Args {
    /// Path to the YAML simulation config.
    #[arg(long)]
    config: PathBuf,

    /// Also print the final cache statistics as JSON.
    #[arg(long)]
    cache_stats: bool,

    /// Log verbosity (off, error, warn, info, debug, trace).
    #[arg(long, default_value = "warn")]
    log_level: LevelFilter,
}

fn main() -> ExitCode {
    let args = Args::parse();
    if let Err(e) = kvsim::logger::init(args.log_level) {
        eprintln!("logger init failed: {e}");
    }
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let cfg = SimulatorConfig::from_file(&args.config)?;
    let outcome = kvsim::run(&cfg)?;
    print!("{}", outcome.report.to_text());
    if args.cache_stats {
        println!("{}", serde_json::to_string_pretty(&outcome.cache_stats)?);
    }
    Ok(())
}
