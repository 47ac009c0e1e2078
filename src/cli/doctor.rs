//! Doctor command arguments

use clap::Parser;

/// Arguments for the doctor command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Check the project configuration:\n    localdev doctor\n\n\
                  Check and repair derived state:\n    localdev doctor --fix")]
pub struct DoctorArgs {
    /// Repair inconsistencies instead of just reporting them
    #[arg(long)]
    pub fix: bool,
}
