//! `yubimoji serve`: run the recognition web service.

use crate::cli::output::{self, Styled};
use crate::config::{ServerConfig, DEFAULT_MODEL_PATH, DEFAULT_WEB_ROOT};
use crate::server::Server;
use anyhow::Result;
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::info;

/// Options for the `serve` command.
#[derive(Debug, Clone, Parser)]
pub struct ServeArgs {
    /// Address to listen on.
    #[arg(long, env = "YUBIMOJI_ADDR", default_value = "0.0.0.0:5001")]
    pub addr: SocketAddr,

    /// Path to the model artifact.
    #[arg(long, env = "YUBIMOJI_MODEL", default_value = DEFAULT_MODEL_PATH)]
    pub model: PathBuf,

    /// Directory containing `templates/` and `static/`.
    #[arg(long, env = "YUBIMOJI_WEB_ROOT", default_value = DEFAULT_WEB_ROOT)]
    pub web_root: PathBuf,

    /// Disable permissive CORS headers.
    #[arg(long, env = "YUBIMOJI_NO_CORS")]
    pub no_cors: bool,
}

impl ServeArgs {
    pub fn to_config(&self) -> ServerConfig {
        ServerConfig::builder()
            .addr(self.addr)
            .model_path(&self.model)
            .web_root(&self.web_root)
            .cors(!self.no_cors)
            .build()
    }
}

/// Load the model and serve until shutdown.
pub async fn run(args: ServeArgs) -> Result<()> {
    let s = Styled::new();
    let config = args.to_config();
    info!("starting Yubimoji v{}", env!("CARGO_PKG_VERSION"));

    let server = Server::new(config.clone());

    if !output::is_quiet() {
        eprintln!(
            "  {} Yubimoji v{} listening on http://{}",
            s.ok_sym(),
            env!("CARGO_PKG_VERSION"),
            config.addr
        );
        eprintln!("  Press Ctrl+C to stop");
    }

    server.run().await?;

    if !output::is_quiet() {
        eprintln!("  {} Yubimoji stopped.", s.ok_sym());
    }
    Ok(())
}
