//! Configuration management CLI commands.

use crate::cli::common::{CliError, CliResult};
use crate::config::Config;
use clap::{Args, Subcommand};

/// Configuration management commands
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Display current configuration
    Show(ConfigShowArgs),
    /// Write a default configuration file
    Init(ConfigInitArgs),
    /// Print the configuration file path
    Path,
}

/// Display current configuration
#[derive(Args, Debug)]
pub struct ConfigShowArgs {
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

/// Write a default configuration file
#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Overwrite an existing file
    #[arg(long)]
    force: bool,
}

impl ConfigArgs {
    /// Execute config subcommand
    pub fn execute(&self) -> CliResult<()> {
        match &self.command {
            ConfigCommand::Show(args) => args.execute(),
            ConfigCommand::Init(args) => args.execute(),
            ConfigCommand::Path => {
                let path = Config::config_file_path()
                    .map_err(|e| CliError::io(format!("Failed to resolve config path: {e}")))?;
                println!("{}", path.display());
                Ok(())
            }
        }
    }
}

impl ConfigShowArgs {
    /// Execute show command
    pub fn execute(&self) -> CliResult<()> {
        let config = Config::load()
            .map_err(|e| CliError::validation(format!("Failed to load configuration: {e}")))?;

        if self.json {
            let json = serde_json::to_string_pretty(&config)
                .map_err(|e| CliError::io(format!("Failed to serialize JSON: {e}")))?;
            println!("{json}");
        } else {
            output_human_readable(&config);
        }

        Ok(())
    }
}

impl ConfigInitArgs {
    /// Execute init command
    pub fn execute(&self) -> CliResult<()> {
        if Config::exists() && !self.force {
            return Err(CliError::validation(
                "Configuration already exists (use --force to overwrite)",
            ));
        }

        Config::new()
            .save()
            .map_err(|e| CliError::io(format!("Failed to save configuration: {e}")))?;

        if let Ok(path) = Config::config_file_path() {
            println!("Wrote {}", path.display());
        }
        Ok(())
    }
}

fn output_human_readable(config: &Config) {
    println!("Backend:");
    println!("  URL:             {}", config.backend.base_url);
    println!("  Timeout:         {}s", config.backend.request_timeout_secs);
    println!("  Search results:  {}", config.backend.search_k);
    println!();
    println!("Assets:");
    println!("  Models:          {}", config.model_base_url());
    println!("  Thumbnails:      {}", config.assets.thumbnail_base_url);
    println!();
    println!("Design:");
    println!("  Room type:       {}", config.design.room_type);
    println!("  Styles:          {}", config.design.styles.join(", "));
    println!();
    println!("Server:");
    println!("  Address:         {}:{}", config.server.host, config.server.port);
}
