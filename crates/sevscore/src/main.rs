use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod http;

use commands::PredictorArgs;

#[derive(Parser)]
#[command(name = "sevscore")]
#[command(
    author,
    version,
    about = "Severity scoring for IT support tickets (English and Hindi)"
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(flatten)]
    predictor: PredictorArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a single ticket
    Predict {
        /// Ticket text (several words may be given unquoted)
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,

        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Score a file with one ticket per line, printing JSON lines
    Batch {
        /// Input file ('-' for stdin)
        file: PathBuf,
    },

    /// Show the calibration profile and model details
    Profile,

    /// Fit a calibration profile from raw model scores
    Calibrate {
        /// File with one raw score per line ('#' starts a comment)
        raw_scores: PathBuf,

        /// Write a model artifact with the fitted profile
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Start the HTTP API server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "8000", env = "SEVSCORE_PORT")]
        port: u16,

        /// Allowed CORS origin (default: any)
        #[arg(long, env = "SEVSCORE_CORS_ORIGIN")]
        cors_origin: Option<String>,

        /// Requests served at the same time
        #[arg(long, default_value = "64", env = "SEVSCORE_MAX_CONCURRENT_REQUESTS")]
        max_concurrent_requests: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.json_logs);

    match cli.command {
        Commands::Predict { text, json } => {
            commands::predict(&cli.predictor, &text.join(" "), json).await
        }
        Commands::Batch { file } => commands::batch(&cli.predictor, &file).await,
        Commands::Profile => commands::profile(&cli.predictor),
        Commands::Calibrate { raw_scores, output } => {
            commands::calibrate(&cli.predictor, &raw_scores, output.as_deref())
        }
        Commands::Serve {
            port,
            cors_origin,
            max_concurrent_requests,
        } => commands::serve(&cli.predictor, port, cors_origin, max_concurrent_requests).await,
    }
}

fn init_logging(verbose: bool, json: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}
