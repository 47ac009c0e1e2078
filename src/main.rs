//! Localdev - local AI development stack manager
//!
//! A command line tool that assembles a local AI development environment
//! from components (language models, embeddings, databases, caches, queues,
//! object storage), synthesizes their service configuration, and manages
//! the backing containers and models.

use clap::Parser;

mod cli;
mod commands;
mod config;
mod error;
mod models;
mod prompt;
mod registry;
mod resolver;
mod services;
mod system;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init(args) => commands::init::run(cli.workspace, cli.yes, args),
        Commands::Component(args) => commands::component::run(cli.workspace, cli.yes, args),
        Commands::Models(args) => commands::models::run(cli.workspace, cli.yes, args),
        Commands::Start(args) => commands::services::run_start(cli.workspace, args),
        Commands::Stop(args) => commands::services::run_stop(cli.workspace, args),
        Commands::Doctor(args) => commands::doctor::run(cli.workspace, args),
        Commands::Version => commands::version::run(),
        Commands::Completions(args) => commands::completions::run(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
