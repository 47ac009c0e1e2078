//! Start and stop command arguments

use clap::Parser;

/// Arguments for the start command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Start everything the project configures:\n    localdev start\n\n\
                  Start specific services:\n    localdev start postgres cache\n\n\
                  Start a comma-separated subset:\n    localdev start --only postgres,cache")]
pub struct StartArgs {
    /// Services to start (defaults to all configured services)
    pub services: Vec<String>,

    /// Comma-separated subset of services to start
    #[arg(long, value_delimiter = ',')]
    pub only: Vec<String>,
}

/// Arguments for the stop command
#[derive(Parser, Debug)]
pub struct StopArgs {
    /// Stop a single service instead of all of them
    #[arg(long)]
    pub service: Option<String>,
}
