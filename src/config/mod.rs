pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::schema::SchemaFormat;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use std::path::PathBuf;
#[cfg(feature = "cli")]
use toml_config::ServiceConfig;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "thought-shape", version)]
#[command(about = "Validate, describe and evaluate arithmetic thought records")]
pub struct CliConfig {
    #[arg(long, short, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Check a JSON record (or array of records) against the shape
    Validate {
        /// Input file; stdin when omitted or `-`
        file: Option<PathBuf>,
        #[arg(long, help = "Print the report as JSON")]
        json: bool,
    },
    /// Print the shape as a schema document
    Schema {
        #[arg(long, value_enum, default_value_t = SchemaFormat::Json)]
        format: SchemaFormat,
    },
    /// Validate records and evaluate each thought
    Eval {
        /// Input file; stdin when omitted or `-`
        file: Option<PathBuf>,
    },
    /// Run the TCP listener
    Serve {
        #[arg(short, long, help = "Path to TOML configuration file")]
        config: Option<PathBuf>,
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
}

/// Loads the service config (or defaults) and applies command-line overrides.
#[cfg(feature = "cli")]
pub fn load_service_config(
    path: Option<&std::path::Path>,
    host: Option<String>,
    port: Option<u16>,
) -> Result<ServiceConfig> {
    let mut config = match path {
        Some(path) => ServiceConfig::from_file(path)?,
        None => ServiceConfig::default(),
    };

    if let Some(host) = host {
        config.listener.host = host;
    }
    if let Some(port) = port {
        config.listener.port = port;
    }

    Ok(config)
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;

    #[test]
    fn test_parse_validate_command() {
        let cli = CliConfig::parse_from(["thought-shape", "validate", "input.json", "--json"]);
        match cli.command {
            Command::Validate { file, json } => {
                assert_eq!(file, Some(PathBuf::from("input.json")));
                assert!(json);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_schema_format() {
        let cli = CliConfig::parse_from(["thought-shape", "-v", "schema", "--format", "grammar"]);
        assert!(cli.verbose);
        assert!(matches!(
            cli.command,
            Command::Schema {
                format: SchemaFormat::Grammar
            }
        ));
    }

    #[test]
    fn test_overrides_apply_on_defaults() {
        let config = load_service_config(None, Some("127.0.0.1".to_string()), Some(0)).unwrap();
        assert_eq!(config.listener.bind_address(), "127.0.0.1:0");
    }
}
