//! Command implementations for the localdev CLI
//!
//! Each command wrapper resolves the project root, loads the configuration,
//! runs the engine, and saves at most once per invocation.

pub mod completions;
pub mod component;
pub mod doctor;
pub mod init;
pub mod models;
pub mod services;
pub mod version;

use std::path::PathBuf;

use crate::config::store;
use crate::error::{LocaldevError, Result};
use crate::prompt::{AssumeYes, InteractivePrompt, Prompt};

/// Workspace path from the CLI argument or the current directory
pub fn workspace_path(workspace: Option<PathBuf>) -> Result<PathBuf> {
    match workspace {
        Some(path) => Ok(path),
        None => std::env::current_dir().map_err(|e| LocaldevError::IoError {
            message: format!("Failed to get current directory: {e}"),
            source: Some(Box::new(e)),
        }),
    }
}

/// Locate the project root by walking up from the workspace path
pub fn project_root(workspace: Option<PathBuf>) -> Result<PathBuf> {
    let start = workspace_path(workspace)?;
    store::find_project_root(&start).ok_or_else(|| LocaldevError::ProjectNotFound {
        path: start.display().to_string(),
    })
}

/// Prompt implementation for this invocation; `--yes` answers everything
pub fn prompt_for(yes: bool) -> Box<dyn Prompt> {
    if yes {
        Box::new(AssumeYes)
    } else {
        Box::new(InteractivePrompt)
    }
}
