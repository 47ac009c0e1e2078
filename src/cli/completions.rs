//! Completions command arguments

use clap::Parser;

/// Arguments for completions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate bash completions:\n    localdev completions --shell bash > ~/.bash_completion.d/localdev\n\n\
                  Generate zsh completions:\n    localdev completions --shell zsh > ~/.zfunc/_localdev\n\n\
                  Generate fish completions:\n    localdev completions --shell fish > ~/.config/fish/completions/localdev.fish")]
pub struct CompletionsArgs {
    /// Shell type (bash, elvish, fish, powershell, zsh)
    #[arg(long)]
    pub shell: String,
}
