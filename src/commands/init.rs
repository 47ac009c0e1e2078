//! Init command implementation

use std::path::PathBuf;

use console::Style;

use crate::cli::InitArgs;
use crate::config::{store, synthesize, ProjectConfig};
use crate::error::Result;
use crate::prompt::Prompt;
use crate::registry;

/// Run init command
pub fn run(workspace: Option<PathBuf>, yes: bool, args: InitArgs) -> Result<()> {
    let path = super::workspace_path(workspace)?;
    let prompt = super::prompt_for(yes);

    let name = match args.name {
        Some(name) => name,
        None => path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "localdev-project".to_string()),
    };

    let template = match args.template {
        Some(name) => registry::template(&name)?,
        None => select_template(prompt.as_ref())?,
    };

    let cfg = build_config(&name, template, prompt.as_ref())?;
    store::init(&path, &cfg)?;

    println!(
        "{} Initialized project '{}' from the '{}' template",
        Style::new().green().apply_to("✓"),
        name,
        template.name
    );
    if cfg.project.components.is_empty() {
        println!("Add components with 'localdev component add <id>'");
    } else {
        println!("Components: {}", cfg.project.components.join(", "));
        println!("Start the stack with 'localdev start'");
    }

    Ok(())
}

fn select_template(prompt: &dyn Prompt) -> Result<&'static registry::ProjectTemplate> {
    let templates = registry::templates();
    let options: Vec<String> = templates
        .iter()
        .map(|t| format!("{} - {}", t.name, t.description))
        .collect();

    let index = prompt.select("Select a project template", &options, 0)?;
    Ok(&templates[index])
}

/// Synthesize the initial configuration from a template.
///
/// AI components in the template go through model selection like an
/// interactive add would; the catalog default is preselected.
pub fn build_config(
    name: &str,
    template: &registry::ProjectTemplate,
    prompt: &dyn Prompt,
) -> Result<ProjectConfig> {
    let mut cfg = ProjectConfig::new(name, template.name);

    for id in template.components {
        cfg.enable(id);
        synthesize::apply_add(&mut cfg, id)?;
    }

    for id in template.components {
        let def = registry::get(id)?;
        if !def.is_ai() {
            continue;
        }
        let options: Vec<String> = def
            .models
            .iter()
            .map(|m| format!("{} ({} download)", m.name, m.size))
            .collect();
        let default = def.models.iter().position(|m| m.default).unwrap_or(0);
        let index = prompt.select(&format!("Select a model for '{id}'"), &options, default)?;
        synthesize::add_model(&mut cfg, def.models[index].name);
    }

    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::testing::Scripted;

    #[test]
    fn test_build_config_rag_template() {
        let prompt = Scripted::new(vec![]);
        let template = registry::template("rag").unwrap();
        let cfg = build_config("demo", template, &prompt).unwrap();

        assert_eq!(
            cfg.project.components,
            vec!["llm", "embedding", "database", "vector", "cache"]
        );
        assert_eq!(cfg.services.database.extensions, vec!["pgvector"]);
        // default models for both AI components, generation model as default
        assert_eq!(
            cfg.services.ai.models,
            vec!["qwen2.5:3b", "nomic-embed-text"]
        );
        assert_eq!(cfg.services.ai.default, "qwen2.5:3b");
        assert!(!cfg.services.cache.is_empty());
    }

    #[test]
    fn test_build_config_custom_template_is_empty() {
        let prompt = Scripted::new(vec![]);
        let template = registry::template("custom").unwrap();
        let cfg = build_config("demo", template, &prompt).unwrap();

        assert!(cfg.project.components.is_empty());
        assert!(cfg.services.is_empty());
        assert_eq!(cfg.project.kind, "custom");
    }

    #[test]
    fn test_build_config_honors_model_selection() {
        let prompt = Scripted::new(vec![]);
        // second entry of the llm catalog
        prompt.selections.borrow_mut().push(1);
        let template = registry::template("simple").unwrap();
        let cfg = build_config("demo", template, &prompt).unwrap();

        assert_eq!(cfg.services.ai.models, vec!["llama3.2:3b"]);
        assert_eq!(cfg.services.ai.default, "llama3.2:3b");
    }
}
