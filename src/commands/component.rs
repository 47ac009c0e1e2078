//! Component command implementation
//!
//! Add and remove follow the same shape: compute a plan without mutating
//! anything, confirm it once, then apply and save. A declined plan leaves
//! both memory and disk untouched.

use std::path::PathBuf;

use console::Style;

use crate::cli::{ComponentArgs, ComponentSubcommand};
use crate::config::{store, synthesize, ProjectConfig};
use crate::error::{LocaldevError, Result};
use crate::models::{pull, OllamaClient};
use crate::prompt::Prompt;
use crate::registry::{self, ComponentDefinition};
use crate::resolver::{self, AddPlan};
use crate::system;

/// Run component command
pub fn run(workspace: Option<PathBuf>, yes: bool, args: ComponentArgs) -> Result<()> {
    match args.command {
        ComponentSubcommand::List => list(workspace),
        ComponentSubcommand::Info { id } => info(workspace, &id),
        ComponentSubcommand::Add { id } => add(workspace, yes, &id),
        ComponentSubcommand::Remove { id } => remove(workspace, yes, &id),
        ComponentSubcommand::Update { id } => update(workspace, yes, &id),
    }
}

/// List the catalog; enabled status is shown when run inside a project
fn list(workspace: Option<PathBuf>) -> Result<()> {
    let cfg = super::project_root(workspace)
        .and_then(|root| store::load(&root))
        .ok();

    println!("Available components:");
    println!();

    for def in registry::all() {
        let enabled = cfg.as_ref().is_some_and(|c| c.is_enabled(def.id));
        let marker = if enabled {
            Style::new().green().apply_to("[enabled]").to_string()
        } else {
            String::new()
        };
        println!(
            "  {:<10} {} {}",
            Style::new().bold().yellow().apply_to(def.id),
            def.name,
            marker
        );
        println!("             {}", Style::new().dim().apply_to(def.description));
    }

    Ok(())
}

fn info(workspace: Option<PathBuf>, id: &str) -> Result<()> {
    let def = registry::get(id)?;
    let cfg = super::project_root(workspace)
        .and_then(|root| store::load(&root))
        .ok();

    println!("{}", Style::new().bold().yellow().apply_to(def.name));
    println!("  {}", def.description);
    println!();
    println!(
        "  {} {}",
        Style::new().bold().apply_to("Minimum RAM:"),
        system::format_bytes(def.min_ram)
    );
    if !def.dependencies.is_empty() {
        println!(
            "  {} {}",
            Style::new().bold().apply_to("Depends on:"),
            def.dependencies.join(", ")
        );
    }
    if let Some(cfg) = &cfg {
        let status = if cfg.is_enabled(def.id) {
            Style::new().green().apply_to("enabled")
        } else {
            Style::new().dim().apply_to("not enabled")
        };
        println!("  {} {}", Style::new().bold().apply_to("Status:"), status);
    }
    if !def.models.is_empty() {
        println!();
        println!("  {}", Style::new().bold().apply_to("Models:"));
        for model in def.models {
            let default = if model.default { " (default)" } else { "" };
            println!(
                "    {} - {} download, {} RAM{}",
                model.name,
                model.size,
                system::format_bytes(model.ram),
                default
            );
        }
    }

    Ok(())
}

/// Outcome of planning and applying an addition
#[derive(Debug, PartialEq, Eq)]
pub enum AddOutcome {
    AlreadyEnabled,
    Applied {
        added: Vec<String>,
        model: Option<String>,
    },
}

/// Plan, confirm, and apply a component addition in memory.
///
/// Nothing is mutated until every confirmation has passed, so a declined
/// prompt leaves `cfg` exactly as loaded.
pub fn add_component(
    cfg: &mut ProjectConfig,
    id: &str,
    prompt: &dyn Prompt,
    available_ram: u64,
) -> Result<AddOutcome> {
    let plan = resolver::resolve_add(id, &cfg.project.components)?;

    let to_add = match plan {
        AddPlan::AlreadyEnabled => return Ok(AddOutcome::AlreadyEnabled),
        AddPlan::Add { to_add } => to_add,
    };

    let mut future = cfg.project.components.clone();
    future.extend(to_add.iter().cloned());
    let required = registry::ram_requirement(&future);
    if required > available_ram {
        println!(
            "{} components need {}, {} available",
            Style::new().yellow().apply_to("Warning:"),
            system::format_bytes(required),
            system::format_bytes(available_ram)
        );
        if !prompt.confirm("Continue anyway?", false)? {
            return Err(LocaldevError::InsufficientResources {
                required: system::format_bytes(required),
                available: system::format_bytes(available_ram),
            });
        }
    }

    if to_add.len() > 1 {
        println!("Adding '{id}' also requires:");
        for dep in &to_add[..to_add.len() - 1] {
            println!("  - {dep}");
        }
        if !prompt.confirm("Add these components?", true)? {
            return Err(LocaldevError::UnsatisfiedDependency {
                id: id.to_string(),
                dependency: to_add[..to_add.len() - 1].join(", "),
            });
        }
    }

    for comp in &to_add {
        cfg.enable(comp);
        synthesize::apply_add(cfg, comp)?;
    }

    let def = registry::get(id)?;
    let model = if def.is_ai() {
        Some(select_model(cfg, def, prompt)?)
    } else {
        None
    };

    Ok(AddOutcome::Applied {
        added: to_add,
        model,
    })
}

/// Pick one of the component's catalog models and record it in the config
fn select_model(
    cfg: &mut ProjectConfig,
    def: &ComponentDefinition,
    prompt: &dyn Prompt,
) -> Result<String> {
    let options: Vec<String> = def
        .models
        .iter()
        .map(|m| format!("{} ({} download, {} RAM)", m.name, m.size, system::format_bytes(m.ram)))
        .collect();
    let default = def.models.iter().position(|m| m.default).unwrap_or(0);

    let index = prompt.select(
        &format!("Select a model for '{}'", def.id),
        &options,
        default,
    )?;
    let name = def.models[index].name.to_string();

    synthesize::add_model(cfg, &name);
    Ok(name)
}

fn add(workspace: Option<PathBuf>, yes: bool, id: &str) -> Result<()> {
    let root = super::project_root(workspace)?;
    let mut cfg = store::load(&root)?;
    let prompt = super::prompt_for(yes);

    match add_component(&mut cfg, id, prompt.as_ref(), system::available_memory())? {
        AddOutcome::AlreadyEnabled => {
            println!("Component '{id}' is already enabled.");
            Ok(())
        }
        AddOutcome::Applied { added, model } => {
            store::save(&root, &cfg)?;
            for comp in &added {
                println!("{} Added '{comp}'", Style::new().green().apply_to("✓"));
            }
            if let Some(model) = model {
                offer_pull(prompt.as_ref(), &model)?;
            }
            Ok(())
        }
    }
}

/// Download a freshly selected model if the model source is reachable
fn offer_pull(prompt: &dyn Prompt, model: &str) -> Result<()> {
    let client = OllamaClient::new(None);
    if !client.is_available() {
        println!(
            "Model source is not running; download later with 'localdev models pull {model}'"
        );
        return Ok(());
    }

    if !prompt.confirm(&format!("Download '{model}' now?"), true)? {
        return Ok(());
    }

    let handle = client.pull(model);
    let mut reporter = pull::ProgressBarReporter::new(model);
    pull::monitor(&handle, model, &mut reporter)
}

/// Outcome of planning and applying a removal
#[derive(Debug, PartialEq, Eq)]
pub enum RemoveOutcome {
    NotEnabled,
    Removed { removed: Vec<String> },
}

/// Plan, confirm, and apply a component removal in memory.
pub fn remove_component(
    cfg: &mut ProjectConfig,
    id: &str,
    prompt: &dyn Prompt,
) -> Result<RemoveOutcome> {
    registry::get(id)?;
    if !cfg.is_enabled(id) {
        return Ok(RemoveOutcome::NotEnabled);
    }

    let plan = resolver::resolve_remove(id, &cfg.project.components)?;

    if !plan.cascaded().is_empty() {
        println!("Removing '{id}' also removes components that depend on it:");
        for dep in plan.cascaded() {
            println!("  - {dep}");
        }
        if !prompt.confirm(&format!("Remove '{id}' and its dependents?"), true)? {
            return Err(LocaldevError::DependentConflict {
                id: id.to_string(),
                dependents: plan.cascaded().join(", "),
            });
        }
    } else if !prompt.confirm(&format!("Remove '{id}'?"), true)? {
        return Err(LocaldevError::Cancelled);
    }

    for comp in &plan.to_remove {
        cfg.disable(comp);
        synthesize::apply_remove(cfg, comp)?;
    }

    Ok(RemoveOutcome::Removed {
        removed: plan.to_remove,
    })
}

fn remove(workspace: Option<PathBuf>, yes: bool, id: &str) -> Result<()> {
    let root = super::project_root(workspace)?;
    let mut cfg = store::load(&root)?;
    let prompt = super::prompt_for(yes);

    match remove_component(&mut cfg, id, prompt.as_ref())? {
        RemoveOutcome::NotEnabled => {
            println!("Component '{id}' is not enabled.");
            Ok(())
        }
        RemoveOutcome::Removed { removed } => {
            store::save(&root, &cfg)?;
            for comp in &removed {
                println!("{} Removed '{comp}'", Style::new().green().apply_to("✓"));
            }
            Ok(())
        }
    }
}

/// Swap the model backing an AI component
fn update(workspace: Option<PathBuf>, yes: bool, id: &str) -> Result<()> {
    let root = super::project_root(workspace)?;
    let mut cfg = store::load(&root)?;
    let prompt = super::prompt_for(yes);

    let def = registry::get(id)?;
    let Some(role) = def.model_role() else {
        println!("Component '{id}' has no model to update.");
        return Ok(());
    };
    if !cfg.is_enabled(id) {
        println!("Component '{id}' is not enabled.");
        return Ok(());
    }

    let options: Vec<String> = def
        .models
        .iter()
        .map(|m| format!("{} ({} download, {} RAM)", m.name, m.size, system::format_bytes(m.ram)))
        .collect();
    let current = cfg
        .services
        .ai
        .models
        .iter()
        .find(|m| crate::models::classify::classify(m) == role)
        .cloned();
    let default = current
        .as_deref()
        .and_then(|c| def.models.iter().position(|m| m.name == c))
        .unwrap_or_else(|| def.models.iter().position(|m| m.default).unwrap_or(0));

    let index = prompt.select(&format!("Select a model for '{id}'"), &options, default)?;
    let name = def.models[index].name.to_string();

    if current.as_deref() == Some(name.as_str()) {
        println!("Component '{id}' already uses '{name}'.");
        return Ok(());
    }

    synthesize::replace_model(&mut cfg, role, &name);
    store::save(&root, &cfg)?;
    println!("{} '{id}' now uses '{name}'", Style::new().green().apply_to("✓"));

    offer_pull(prompt.as_ref(), &name)
}
