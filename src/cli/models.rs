//! Models subcommand arguments

use clap::{Parser, Subcommand};

/// Arguments for the models command
#[derive(Parser, Debug)]
pub struct ModelsArgs {
    #[command(subcommand)]
    pub command: ModelsSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ModelsSubcommand {
    /// List installed and recommended models
    List,

    /// Download a model
    #[command(after_help = "EXAMPLES:\n  \
                  Pull the default generation model:\n    localdev models pull qwen2.5:3b\n\n\
                  Pull an embedding model:\n    localdev models pull nomic-embed-text")]
    Pull {
        /// Model name (e.g. qwen2.5:3b)
        name: String,
    },

    /// Delete an installed model
    Remove {
        /// Model name to delete
        name: String,
    },
}
