use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::Password;
use weather_core::{ApiKey, Config};

use crate::server;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "weather-api",
    version,
    about = "HTTP facade over the OpenWeatherMap API"
)]
pub struct Cli {
    /// Config file path; defaults to the platform config directory.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP server (default).
    Serve {
        /// Port to listen on; overrides the config file and `PORT`.
        #[arg(long)]
        port: Option<u16>,
    },

    /// Store the OpenWeatherMap API key in the config file.
    Configure,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command.unwrap_or(Command::Serve { port: None }) {
            Command::Serve { port } => {
                let mut config = Config::load(self.config.as_deref())?;
                if let Some(port) = port {
                    config.port = port;
                }
                server::serve(config).await
            }
            Command::Configure => configure(self.config),
        }
    }
}

fn configure(explicit_path: Option<PathBuf>) -> anyhow::Result<()> {
    let path = Config::resolve_path(explicit_path.as_deref())?;
    let mut config = Config::load_file(&path)?;

    let entered = Password::new("OpenWeatherMap API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    let key = ApiKey::new(entered).context("API key must not be empty")?;

    config.set_api_key(key);
    config.save(&path)?;

    println!("Saved API key to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_means_serve() {
        let cli = Cli::try_parse_from(["weather-api"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn serve_accepts_port_and_config() {
        let args = [
            "weather-api",
            "serve",
            "--port",
            "8080",
            "--config",
            "/tmp/w.toml",
        ];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/w.toml")));
        assert!(matches!(cli.command, Some(Command::Serve { port: Some(8080) })));
    }

    #[test]
    fn configure_parses() {
        let cli = Cli::try_parse_from(["weather-api", "configure"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Configure)));
    }
}
