use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use yubimoji_runtime::cli::serve::ServeArgs;
use yubimoji_runtime::cli::{inspect_cmd, predict_cmd};
use yubimoji_runtime::config::DEFAULT_MODEL_PATH;
use yubimoji_runtime::logging;

#[derive(Parser)]
#[command(name = "yubimoji", version, about = "Fingerspelling recognition service")]
struct Cli {
    /// Machine-readable JSON output.
    #[arg(long, global = true)]
    json: bool,

    /// Suppress decorative output.
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Extra detail, including debug logs.
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines.
    #[arg(long, global = true, env = "YUBIMOJI_LOG_JSON")]
    log_json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the web service (default).
    Serve(ServeArgs),
    /// Classify a landmark payload file without starting the server.
    Predict {
        /// JSON file shaped like a /predict_sign request body.
        input: PathBuf,
        #[arg(long, env = "YUBIMOJI_MODEL", default_value = DEFAULT_MODEL_PATH)]
        model: PathBuf,
    },
    /// Check a model artifact against the label table.
    Inspect {
        #[arg(long, env = "YUBIMOJI_MODEL", default_value = DEFAULT_MODEL_PATH)]
        model: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.json {
        std::env::set_var("YUBIMOJI_JSON", "1");
    }
    if cli.quiet {
        std::env::set_var("YUBIMOJI_QUIET", "1");
    }
    if cli.verbose {
        std::env::set_var("YUBIMOJI_VERBOSE", "1");
    }

    logging::init_logging(cli.log_json, cli.verbose);

    match cli.command {
        None => yubimoji_runtime::cli::serve::run(ServeArgs::parse_from(["yubimoji"])).await,
        Some(Commands::Serve(args)) => yubimoji_runtime::cli::serve::run(args).await,
        Some(Commands::Predict { input, model }) => predict_cmd::run(&input, &model),
        Some(Commands::Inspect { model }) => inspect_cmd::run(&model),
    }
}
