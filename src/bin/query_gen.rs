//! Query generator for range-query workloads
//!
//! Usage:
//!   query_gen 100 tests/data/q100.txt
//!   query_gen 100 tests/data/q100_ordered.txt --ordered

use std::path::PathBuf;

use anyhow::Context;
use clap::{ArgGroup, Parser};
use range_probe::core_types::{EXIT_FAILURE, EXIT_OK, ExitCode, VERSION};
use range_probe::{AppConfig, ElementCount, PairingMode, generate, write_workload};

#[derive(Parser, Debug)]
#[command(name = "query_gen", version = VERSION)]
#[command(
    about = "Generate a sequence of insert (k) and range (q) queries for a range-query program"
)]
#[command(group(ArgGroup::new("mode").args(["unordered", "ordered"])))]
struct Args {
    /// Number of elements to insert (>= 0)
    #[arg(allow_negative_numbers = true)]
    element_count: i64,

    /// Output filename for generated queries
    output_path: PathBuf,

    /// One q-query per unordered pair {i, j} with i < j (default)
    #[arg(long)]
    unordered: bool,

    /// One q-query per ordered pair (i, j) and (j, i), both printed as 'q min max'
    #[arg(long)]
    ordered: bool,

    /// Configuration environment (reads config/<env>.yaml)
    #[arg(short, long, default_value = "dev")]
    env: String,
}

fn real_main(args: Args) -> anyhow::Result<ExitCode> {
    // Reject before touching config, logging or the output path.
    let count = match ElementCount::try_from(args.element_count) {
        Ok(count) => count,
        Err(e) => {
            eprintln!("error: {}", e);
            return Ok(EXIT_FAILURE);
        }
    };

    let config = AppConfig::load(&args.env).context("Failed to load configuration")?;
    let _log_guard = range_probe::logging::init_logging(&config.logging)
        .context("Failed to initialize logging")?;

    let mode = if args.ordered {
        PairingMode::Ordered
    } else if args.unordered {
        PairingMode::Unordered
    } else {
        config.generator.default_mode
    };

    let summary = write_workload(&args.output_path, generate(count, mode)).with_context(|| {
        format!("Failed to write workload to {}", args.output_path.display())
    })?;

    println!("{}", summary);
    Ok(EXIT_OK)
}

fn main() {
    let args = Args::parse();
    let code = match real_main(args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {:#}", e);
            EXIT_FAILURE
        }
    };
    std::process::exit(code);
}
