//! CLI definitions using clap derive API
//!
//! This module is organized into submodules for each command's argument types:
//! - init: Init command arguments
//! - component: Component subcommands
//! - models: Models subcommands
//! - services: Start/stop command arguments
//! - doctor: Doctor command arguments
//! - completions: Completions command arguments

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod completions;
pub mod component;
pub mod doctor;
pub mod init;
pub mod models;
pub mod services;

pub use completions::CompletionsArgs;
pub use component::{ComponentArgs, ComponentSubcommand};
pub use doctor::DoctorArgs;
pub use init::InitArgs;
pub use models::{ModelsArgs, ModelsSubcommand};
pub use services::{StartArgs, StopArgs};

/// Localdev - local AI development stack
///
/// Manage AI components and their backing services on a developer machine.
#[derive(Parser, Debug)]
#[command(
    name = "localdev",
    author,
    version,
    color = clap::ColorChoice::Always,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Local AI development stack manager",
    long_about = "Localdev assembles a local AI development stack from components \
                  (language models, embeddings, databases, caches, queues, storage), \
                  synthesizes their service configuration, and manages the backing \
                  containers and models.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n   \
                  localdev init --template rag          \x1b[90m# New project from the RAG template\x1b[0m\n   \
                  localdev component add vector         \x1b[90m# Add pgvector (pulls in database)\x1b[0m\n   \
                  localdev component remove database    \x1b[90m# Remove postgres and its dependents\x1b[0m\n   \
                  localdev models pull qwen2.5:3b       \x1b[90m# Download a model with progress\x1b[0m\n   \
                  localdev start                        \x1b[90m# Start all configured services\x1b[0m\n   \
                  localdev doctor --fix                 \x1b[90m# Check and repair the configuration\x1b[0m\n\n\
                  "
)]
pub struct Cli {
    /// Project directory (defaults to current directory)
    #[arg(long, short = 'w', global = true, env = "LOCALDEV_WORKSPACE")]
    pub workspace: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Answer yes to all prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a new project
    Init(InitArgs),

    /// Manage stack components
    Component(ComponentArgs),

    /// Manage AI models
    Models(ModelsArgs),

    /// Start configured services
    Start(StartArgs),

    /// Stop running services
    Stop(StopArgs),

    /// Check project configuration health
    Doctor(DoctorArgs),

    /// Show version information
    #[command(hide = true)]
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing_init() {
        let cli = Cli::try_parse_from(["localdev", "init", "--template", "rag"]).unwrap();
        match cli.command {
            Commands::Init(args) => {
                assert_eq!(args.template, Some("rag".to_string()));
                assert_eq!(args.name, None);
            }
            _ => panic!("Expected Init command"),
        }
    }

    #[test]
    fn test_cli_parsing_component_add() {
        let cli = Cli::try_parse_from(["localdev", "component", "add", "vector"]).unwrap();
        match cli.command {
            Commands::Component(args) => match args.command {
                ComponentSubcommand::Add { id } => assert_eq!(id, "vector"),
                _ => panic!("Expected component add"),
            },
            _ => panic!("Expected Component command"),
        }
    }

    #[test]
    fn test_cli_parsing_component_list() {
        let cli = Cli::try_parse_from(["localdev", "component", "list"]).unwrap();
        match cli.command {
            Commands::Component(args) => {
                assert!(matches!(args.command, ComponentSubcommand::List));
            }
            _ => panic!("Expected Component command"),
        }
    }

    #[test]
    fn test_cli_parsing_models_pull() {
        let cli = Cli::try_parse_from(["localdev", "models", "pull", "qwen2.5:3b"]).unwrap();
        match cli.command {
            Commands::Models(args) => match args.command {
                ModelsSubcommand::Pull { name } => assert_eq!(name, "qwen2.5:3b"),
                _ => panic!("Expected models pull"),
            },
            _ => panic!("Expected Models command"),
        }
    }

    #[test]
    fn test_cli_parsing_start_with_services() {
        let cli = Cli::try_parse_from(["localdev", "start", "postgres", "cache"]).unwrap();
        match cli.command {
            Commands::Start(args) => {
                assert_eq!(args.services, vec!["postgres", "cache"]);
            }
            _ => panic!("Expected Start command"),
        }
    }

    #[test]
    fn test_cli_parsing_stop() {
        let cli = Cli::try_parse_from(["localdev", "stop", "--service", "cache"]).unwrap();
        match cli.command {
            Commands::Stop(args) => {
                assert_eq!(args.service, Some("cache".to_string()));
            }
            _ => panic!("Expected Stop command"),
        }
    }

    #[test]
    fn test_cli_parsing_doctor_fix() {
        let cli = Cli::try_parse_from(["localdev", "doctor", "--fix"]).unwrap();
        match cli.command {
            Commands::Doctor(args) => assert!(args.fix),
            _ => panic!("Expected Doctor command"),
        }
    }

    #[test]
    fn test_cli_parsing_version() {
        let cli = Cli::try_parse_from(["localdev", "version"]).unwrap();
        assert!(matches!(cli.command, Commands::Version));
    }

    #[test]
    fn test_cli_global_options() {
        let cli =
            Cli::try_parse_from(["localdev", "-v", "-y", "-w", "/tmp/project", "component", "list"])
                .unwrap();
        assert!(cli.verbose);
        assert!(cli.yes);
        assert_eq!(cli.workspace, Some(PathBuf::from("/tmp/project")));
    }

    #[test]
    fn test_cli_parsing_completions() {
        let cli = Cli::try_parse_from(["localdev", "completions", "--shell", "zsh"]).unwrap();
        match cli.command {
            Commands::Completions(args) => assert_eq!(args.shell, "zsh"),
            _ => panic!("Expected Completions command"),
        }
    }
}
