//! Doctor command implementation
//!
//! Re-derives what the configuration should look like from the enabled
//! component set and reports every divergence. `--fix` applies the same
//! derivation to repair the file in place.

use std::fmt;
use std::path::PathBuf;

use console::Style;

use crate::cli::DoctorArgs;
use crate::config::{store, synthesize, ProjectConfig};
use crate::error::Result;
use crate::models::classify;
use crate::registry::{self, ComponentKind};

/// Run doctor command
pub fn run(workspace: Option<PathBuf>, args: DoctorArgs) -> Result<()> {
    let root = super::project_root(workspace)?;
    let mut cfg = store::load(&root)?;
    println!("{} configuration parses", Style::new().green().apply_to("✓"));

    let problems = check(&cfg)?;
    if problems.is_empty() {
        println!("{} all checks passed", Style::new().green().apply_to("✓"));
        return Ok(());
    }

    for problem in &problems {
        println!("{} {problem}", Style::new().red().apply_to("✗"));
    }

    if args.fix {
        repair(&mut cfg)?;
        store::save(&root, &cfg)?;
        println!(
            "{} repaired {} problem(s)",
            Style::new().green().apply_to("✓"),
            problems.len()
        );
    } else {
        println!("Run 'localdev doctor --fix' to repair.");
    }

    Ok(())
}

/// One configuration inconsistency
#[derive(Debug, PartialEq, Eq)]
pub enum Problem {
    UnknownComponent { id: String },
    MissingDependency { id: String, dependency: String },
    DuplicateModel { name: String },
    DanglingDefault { name: String },
    ExtensionMismatch,
    MissingBlock { id: String },
    OrphanBlock { block: &'static str },
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Problem::UnknownComponent { id } => {
                write!(f, "enabled component '{id}' is not in the catalog")
            }
            Problem::MissingDependency { id, dependency } => {
                write!(f, "'{id}' requires '{dependency}' which is not enabled")
            }
            Problem::DuplicateModel { name } => {
                write!(f, "model '{name}' is listed more than once")
            }
            Problem::DanglingDefault { name } => {
                write!(f, "default model '{name}' is not in the model list")
            }
            Problem::ExtensionMismatch => {
                write!(f, "pgvector extension does not match the vector component")
            }
            Problem::MissingBlock { id } => {
                write!(f, "'{id}' is enabled but its service block is missing")
            }
            Problem::OrphanBlock { block } => {
                write!(f, "service block '{block}' has no enabled component")
            }
        }
    }
}

/// Check the configuration's invariants without mutating it
pub fn check(cfg: &ProjectConfig) -> Result<Vec<Problem>> {
    let mut problems = Vec::new();

    for id in &cfg.project.components {
        let Ok(def) = registry::get(id) else {
            problems.push(Problem::UnknownComponent { id: id.clone() });
            continue;
        };
        for dep in def.dependencies {
            if !cfg.is_enabled(dep) {
                problems.push(Problem::MissingDependency {
                    id: id.clone(),
                    dependency: (*dep).to_string(),
                });
            }
        }
    }

    let models = &cfg.services.ai.models;
    for (i, name) in models.iter().enumerate() {
        if models[..i].contains(name) {
            problems.push(Problem::DuplicateModel { name: name.clone() });
        }
    }
    let default = &cfg.services.ai.default;
    if !default.is_empty() && !models.contains(default) {
        problems.push(Problem::DanglingDefault {
            name: default.clone(),
        });
    }

    let has_pgvector = cfg
        .services
        .database
        .extensions
        .iter()
        .any(|e| e == synthesize::POSTGRES_EXTENSION_PGVECTOR);
    if has_pgvector != cfg.is_enabled("vector") {
        problems.push(Problem::ExtensionMismatch);
    }

    for id in &cfg.project.components {
        if let Ok(def) = registry::get(id) {
            if block_is_empty(cfg, def.kind) {
                problems.push(Problem::MissingBlock { id: id.clone() });
            }
        }
    }

    for (block, live, required) in block_usage(cfg) {
        if live && !required {
            problems.push(Problem::OrphanBlock { block });
        }
    }

    Ok(problems)
}

/// Re-derive the configuration from the enabled component set
pub fn repair(cfg: &mut ProjectConfig) -> Result<()> {
    cfg.project
        .components
        .retain(|id| registry::get(id).is_ok());

    // Close the dependency set; one pass per dependency depth level
    loop {
        let mut missing = Vec::new();
        for id in &cfg.project.components {
            for dep in registry::get(id)?.dependencies {
                if !cfg.is_enabled(dep) && !missing.contains(&(*dep).to_string()) {
                    missing.push((*dep).to_string());
                }
            }
        }
        if missing.is_empty() {
            break;
        }
        for dep in missing {
            cfg.enable(&dep);
        }
    }

    // Blank blocks nothing requires, then re-apply canonical defaults
    for (block, live, required) in block_usage(cfg) {
        if live && !required {
            blank_block(cfg, block);
        }
    }
    for id in cfg.project.components.clone() {
        synthesize::apply_add(cfg, &id)?;
    }

    if !cfg.is_enabled("vector") {
        cfg.services
            .database
            .extensions
            .retain(|e| e != synthesize::POSTGRES_EXTENSION_PGVECTOR);
    }

    let ai = &mut cfg.services.ai;
    let mut seen = Vec::new();
    ai.models.retain(|m| {
        if seen.contains(m) {
            false
        } else {
            seen.push(m.clone());
            true
        }
    });
    if !ai.default.is_empty() && !ai.models.contains(&ai.default) {
        ai.default = String::new();
    }
    if ai.default.is_empty() {
        if let Some(default) = classify::select_default(&ai.models) {
            ai.default = default.to_string();
        }
    }

    Ok(())
}

fn block_is_empty(cfg: &ProjectConfig, kind: ComponentKind) -> bool {
    match kind {
        ComponentKind::Ai { .. } => cfg.services.ai.is_empty(),
        ComponentKind::Database | ComponentKind::DatabaseExtension { .. } => {
            cfg.services.database.is_empty()
        }
        ComponentKind::DocumentStore => cfg.services.mongodb.is_empty(),
        ComponentKind::Cache => cfg.services.cache.is_empty(),
        ComponentKind::Queue => cfg.services.queue.is_empty(),
        ComponentKind::ObjectStorage => cfg.services.storage.is_empty(),
    }
}

/// (block name, block is live, some enabled component requires it)
fn block_usage(cfg: &ProjectConfig) -> Vec<(&'static str, bool, bool)> {
    let requires = |kinds: &[&str]| kinds.iter().any(|id| cfg.is_enabled(id));
    vec![
        ("ai", !cfg.services.ai.is_empty(), requires(&["llm", "embedding"])),
        (
            "database",
            !cfg.services.database.is_empty(),
            requires(&["database", "vector"]),
        ),
        ("mongodb", !cfg.services.mongodb.is_empty(), requires(&["mongodb"])),
        ("cache", !cfg.services.cache.is_empty(), requires(&["cache"])),
        ("queue", !cfg.services.queue.is_empty(), requires(&["queue"])),
        ("storage", !cfg.services.storage.is_empty(), requires(&["storage"])),
    ]
}

fn blank_block(cfg: &mut ProjectConfig, block: &str) {
    match block {
        "ai" => cfg.services.ai = Default::default(),
        "database" => cfg.services.database = Default::default(),
        "mongodb" => cfg.services.mongodb = Default::default(),
        "cache" => cfg.services.cache = Default::default(),
        "queue" => cfg.services.queue = Default::default(),
        "storage" => cfg.services.storage = Default::default(),
        _ => {}
    }
}
