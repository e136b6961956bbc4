//! Serve command: starts the web API.

use std::net::SocketAddr;

use clap::Args;
use tracing::info;

use crate::cli::common::{CliError, CliResult};
use crate::config::Config;
use crate::web;

/// Start the web server
#[derive(Debug, Clone, Args)]
pub struct ServeArgs {
    /// Port to listen on (defaults to the configured one)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Host to bind to (defaults to the configured one)
    #[arg(long)]
    pub host: Option<String>,

    /// Backend base URL (defaults to the configured one)
    #[arg(long, value_name = "URL")]
    pub backend: Option<String>,
}

impl ServeArgs {
    /// Applies command-line overrides on top of the loaded configuration.
    pub fn apply(&self, config: &mut Config) {
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(host) = &self.host {
            config.server.host.clone_from(host);
        }
        if let Some(url) = &self.backend {
            config.backend.base_url.clone_from(url);
        }
    }

    /// Execute the serve command
    pub async fn execute(&self) -> CliResult<()> {
        let mut config = Config::load()
            .map_err(|e| CliError::validation(format!("Failed to load configuration: {e}")))?;
        self.apply(&mut config);
        config
            .validate()
            .map_err(|e| CliError::validation(e.to_string()))?;

        let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
            .parse()
            .map_err(|e| CliError::validation(format!("Invalid bind address: {e}")))?;

        info!("Backend: {}", config.backend.base_url);
        web::run_server(config, addr)
            .await
            .map_err(|e| CliError::io(format!("Server error: {e}")))
    }
}
