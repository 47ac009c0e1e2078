//! Init command arguments

use clap::Parser;

/// Arguments for the init command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Initialize interactively:\n    localdev init\n\n\
                  Initialize from a template:\n    localdev init --template rag\n\n\
                  Initialize with an explicit project name:\n    localdev init --name my-app --template chatbot")]
pub struct InitArgs {
    /// Project name (defaults to the directory name)
    #[arg(long)]
    pub name: Option<String>,

    /// Project template (custom, simple, chatbot, rag, fullstack)
    #[arg(long, short = 't')]
    pub template: Option<String>,
}
