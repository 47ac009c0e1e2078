//! Models command implementation
//!
//! Talks to the local model source for the installed state and merges it
//! with the catalog's recommendations for display.

use std::path::PathBuf;

use console::Style;

use crate::cli::{ModelsArgs, ModelsSubcommand};
use crate::config::{store, synthesize};
use crate::error::Result;
use crate::models::{classify, pull, InstalledModel, OllamaClient};
use crate::registry;
use crate::system;

/// Run models command
pub fn run(workspace: Option<PathBuf>, yes: bool, args: ModelsArgs) -> Result<()> {
    match args.command {
        ModelsSubcommand::List => list(),
        ModelsSubcommand::Pull { name } => pull_model(workspace, &name),
        ModelsSubcommand::Remove { name } => remove(workspace, yes, &name),
    }
}

fn list() -> Result<()> {
    let client = OllamaClient::new(None);
    let installed = if client.is_available() {
        client.list()?
    } else {
        println!(
            "{}",
            Style::new()
                .dim()
                .apply_to("Model source is not running; showing recommendations only")
        );
        Vec::new()
    };

    println!("Recommended models:");
    for def in registry::all().iter().filter(|d| d.is_ai()) {
        println!("  {}:", Style::new().bold().apply_to(def.id));
        for model in def.models {
            let mark = if is_installed(&installed, model.name) {
                Style::new().green().apply_to("[installed]").to_string()
            } else {
                String::new()
            };
            println!("    {:<22} {} download {}", model.name, model.size, mark);
        }
    }

    let extras: Vec<&InstalledModel> = installed
        .iter()
        .filter(|m| !in_catalog(&m.name))
        .collect();
    if !extras.is_empty() {
        println!();
        println!("Other installed models:");
        for model in extras {
            println!(
                "  {:<22} {} ({})",
                model.name,
                system::format_bytes(model.size),
                classify::classify(&model.name)
            );
        }
    }

    Ok(())
}

fn is_installed(installed: &[InstalledModel], name: &str) -> bool {
    installed
        .iter()
        .any(|m| m.name == name || m.name == format!("{name}:latest"))
}

fn in_catalog(name: &str) -> bool {
    let base = name.strip_suffix(":latest").unwrap_or(name);
    registry::all()
        .iter()
        .flat_map(|d| d.models)
        .any(|m| m.name == base || m.name == name)
}

fn pull_model(workspace: Option<PathBuf>, name: &str) -> Result<()> {
    let client = OllamaClient::new(None);
    let handle = client.pull(name);
    let mut reporter = pull::ProgressBarReporter::new(name);
    pull::monitor(&handle, name, &mut reporter)?;

    // Record the model in the project configuration when there is one
    if let Ok(root) = super::project_root(workspace) {
        let mut cfg = store::load(&root)?;
        if !cfg.services.ai.is_empty() {
            synthesize::add_model(&mut cfg, name);
            store::save(&root, &cfg)?;
        }
    }

    Ok(())
}

fn remove(workspace: Option<PathBuf>, yes: bool, name: &str) -> Result<()> {
    let prompt = super::prompt_for(yes);
    if !prompt.confirm(&format!("Delete model '{name}'?"), false)? {
        return Err(crate::error::LocaldevError::Cancelled);
    }

    let client = OllamaClient::new(None);
    client.remove(name)?;
    println!("{} Deleted '{name}'", Style::new().green().apply_to("✓"));

    // Keep the configured model list in sync
    if let Ok(root) = super::project_root(workspace) {
        let mut cfg = store::load(&root)?;
        let ai = &mut cfg.services.ai;
        if ai.models.iter().any(|m| m == name) {
            ai.models.retain(|m| m != name);
            if ai.default == name {
                ai.default = classify::select_default(&ai.models)
                    .unwrap_or_default()
                    .to_string();
            }
            store::save(&root, &cfg)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn installed(names: &[&str]) -> Vec<InstalledModel> {
        names
            .iter()
            .map(|n| InstalledModel {
                name: (*n).to_string(),
                size: 0,
            })
            .collect()
    }

    #[test]
    fn test_is_installed_matches_latest_tag() {
        let models = installed(&["nomic-embed-text:latest", "qwen2.5:3b"]);
        assert!(is_installed(&models, "nomic-embed-text"));
        assert!(is_installed(&models, "qwen2.5:3b"));
        assert!(!is_installed(&models, "phi3:mini"));
    }

    #[test]
    fn test_in_catalog() {
        assert!(in_catalog("qwen2.5:3b"));
        assert!(in_catalog("nomic-embed-text:latest"));
        assert!(!in_catalog("mistral:7b"));
    }
}
