//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Veil using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Veil - streaming de-anonymization of LLM replies
#[derive(Parser, Debug)]
#[command(name = "veil")]
#[command(version, about, long_about = None)]
#[command(author = "Veil Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "veil.toml", env = "VEIL_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "VEIL_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Stream text through the de-anonymizer
    Deanonymize(commands::deanonymize::DeanonymizeArgs),

    /// Show the reverse map built from an anonymization map
    Inspect(commands::inspect::InspectArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_deanonymize() {
        let cli = Cli::parse_from(["veil", "deanonymize", "--map", "map.json"]);
        assert_eq!(cli.config, "veil.toml");
        let Commands::Deanonymize(args) = cli.command else {
            panic!("expected deanonymize");
        };
        assert_eq!(args.map.to_str(), Some("map.json"));
        assert_eq!(args.chunk_size, 16);
        assert!(args.input.is_none());
        assert!(!args.stats);
    }

    #[test]
    fn test_cli_parse_deanonymize_options() {
        let cli = Cli::parse_from([
            "veil",
            "deanonymize",
            "--map",
            "map.json",
            "--input",
            "reply.txt",
            "--chunk-size",
            "1",
            "--stats",
        ]);
        let Commands::Deanonymize(args) = cli.command else {
            panic!("expected deanonymize");
        };
        assert_eq!(args.chunk_size, 1);
        assert!(args.stats);
        assert!(args.input.is_some());
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["veil", "--config", "custom.toml", "validate-config"]);
        assert_eq!(cli.config, "custom.toml");
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["veil", "--log-level", "debug", "validate-config"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_cli_parse_inspect() {
        let cli = Cli::parse_from(["veil", "inspect", "--map", "map.json", "--json"]);
        assert!(matches!(cli.command, Commands::Inspect(ref args) if args.json));
    }

    #[test]
    fn test_cli_parse_init() {
        let cli = Cli::parse_from(["veil", "init"]);
        assert!(matches!(cli.command, Commands::Init(_)));
    }

    #[test]
    fn test_cli_requires_map() {
        assert!(Cli::try_parse_from(["veil", "deanonymize"]).is_err());
    }
}
