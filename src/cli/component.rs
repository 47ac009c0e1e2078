//! Component subcommand arguments

use clap::{Parser, Subcommand};

/// Arguments for the component command
#[derive(Parser, Debug)]
pub struct ComponentArgs {
    #[command(subcommand)]
    pub command: ComponentSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ComponentSubcommand {
    /// List available components and their status
    List,

    /// Show details for a component
    Info {
        /// Component id (e.g. llm, database, vector)
        id: String,
    },

    /// Add a component to the project
    #[command(after_help = "EXAMPLES:\n  \
                  Add the language model component:\n    localdev component add llm\n\n\
                  Add pgvector (pulls in database automatically):\n    localdev component add vector\n\n\
                  Add without prompts:\n    localdev component add cache -y")]
    Add {
        /// Component id to add
        id: String,
    },

    /// Remove a component from the project
    Remove {
        /// Component id to remove
        id: String,
    },

    /// Change the model used by an AI component
    Update {
        /// Component id to update (llm or embedding)
        id: String,
    },
}
