//! Syslog streaming parser CLI.
//!
//! # Usage
//!
//! ```bash
//! # Parse a file
//! syslog-cli --input messages.log
//!
//! # Parse standard input, in 64-byte chunks
//! syslog-cli --chunk-size 64 < messages.log
//! ```

use std::{fs::File, io, path::PathBuf};

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Syslog streaming parser
#[derive(Parser, Debug)]
#[command(name = "syslog-cli")]
#[command(about = "Feeds a file or stdin through the syslog streaming parser")]
#[command(version)]
struct Args {
    /// Input file to parse; reads standard input if omitted
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Size in bytes of each chunk fed to the parser
    #[arg(long, default_value = "4096")]
    chunk_size: usize,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    match &args.input {
        Some(path) => {
            tracing::info!(path = %path.display(), "reading syslog stream from file");
            let file = File::open(path)?;
            syslog_cli::run(file, args.chunk_size)?;
        },
        None => {
            tracing::info!("reading syslog stream from stdin");
            syslog_cli::run(io::stdin().lock(), args.chunk_size)?;
        },
    }

    Ok(())
}
