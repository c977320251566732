use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod build;
mod commands;
mod config;

use crate::config::Syntax;

/// Expand include, setenv and get markers in an HTML page
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// The HTML file containing template markers
    input: Option<PathBuf>,

    /// The path to the configuration file (defaults to stitch.yaml next to the executable)
    #[arg(short, long)]
    config_file: Option<PathBuf>,

    /// Directory holding <name>.template.html fragments
    #[arg(short, long)]
    template_dir: Option<PathBuf>,

    /// Directory the expanded page is written to
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Marker syntax
    #[arg(long, value_enum)]
    syntax: Option<Syntax>,

    /// Replace an existing output instead of backing it up
    #[arg(long, default_value = "false")]
    overwrite: bool,

    /// Bind a variable before expansion (repeatable)
    #[arg(long = "var", value_name = "KEY=VALUE")]
    vars: Vec<String>,

    /// Print the expanded page instead of writing it
    #[arg(long, default_value = "false")]
    stdout: bool,

    /// Print the effective configuration and exit
    #[arg(long, default_value = "false")]
    show_config: bool,

    /// Log every marker as it is resolved
    #[arg(short, long, default_value = "false")]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<(), anyhow::Error> {
    let args = Args::parse();
    init_logging(args.verbose);

    if args.show_config {
        return commands::show::run(&args);
    }

    let Some(input) = args.input.as_deref() else {
        eprintln!("Usage: {} <INPUT>", env!("CARGO_PKG_NAME"));
        std::process::exit(1);
    };

    commands::build::run(&args, input)
}
