//! Render a Graphviz DOT file to an image
//!
//! Usage:
//!   render_dot graphviz/file_graph.dot graphviz/tree.png

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use range_probe::AppConfig;
use range_probe::core_types::{EXIT_FAILURE, EXIT_OK, ExitCode, VERSION};
use range_probe::render::render;

#[derive(Parser, Debug)]
#[command(name = "render_dot", version = VERSION)]
#[command(about = "Render Graphviz DOT to PNG")]
struct Args {
    /// Input .dot file
    dot: PathBuf,

    /// Output image file
    png: PathBuf,

    /// Configuration environment (reads config/<env>.yaml)
    #[arg(short, long, default_value = "dev")]
    env: String,
}

fn real_main(args: Args) -> anyhow::Result<ExitCode> {
    let config = AppConfig::load(&args.env).context("Failed to load configuration")?;
    let _log_guard = range_probe::logging::init_logging(&config.logging)
        .context("Failed to initialize logging")?;

    match render(&args.dot, &args.png, &config.render) {
        Ok(()) => {
            println!(
                "[OK] {} written to: {}",
                config.render.format.to_uppercase(),
                args.png.display()
            );
            Ok(EXIT_OK)
        }
        Err(e) => {
            eprintln!("[ERROR] {}", e);
            Ok(e.exit_code())
        }
    }
}

fn main() {
    let args = Args::parse();
    let code = match real_main(args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("[ERROR] {:#}", e);
            EXIT_FAILURE
        }
    };
    std::process::exit(code);
}
