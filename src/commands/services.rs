//! Start and stop command implementations
//!
//! Both derive the service set from the synthesized configuration, hand it
//! to the orchestrator, and render the resulting progress stream. The
//! stream is display-only; the config is never mutated here.

use std::path::PathBuf;
use std::sync::mpsc::Receiver;

use console::Style;

use crate::cli::{StartArgs, StopArgs};
use crate::config::store;
use crate::error::{LocaldevError, Result};
use crate::services::docker::DockerCli;
use crate::services::{self, Orchestrator, ServiceName, ServiceProgress, ServiceStatus};

/// Run start command
pub fn run_start(workspace: Option<PathBuf>, args: StartArgs) -> Result<()> {
    let root = super::project_root(workspace)?;
    let cfg = store::load(&root)?;

    let mut specs = services::specs_from_config(&cfg);
    if specs.is_empty() {
        println!("No services configured. Add components with 'localdev component add <id>'.");
        return Ok(());
    }

    let selection = parse_selection(&args.services, &args.only)?;
    if let Some(selection) = &selection {
        specs.retain(|s| selection.contains(&s.name));
    }
    if specs.is_empty() {
        println!("None of the requested services are configured for this project.");
        return Ok(());
    }

    let docker = DockerCli::new();
    ensure_docker(&docker)?;

    println!("Starting {} service(s)...", specs.len());
    render_progress(docker.start(specs))
}

/// Run stop command
pub fn run_stop(workspace: Option<PathBuf>, args: StopArgs) -> Result<()> {
    let root = super::project_root(workspace)?;
    let cfg = store::load(&root)?;

    let mut names: Vec<ServiceName> = services::specs_from_config(&cfg)
        .into_iter()
        .map(|s| s.name)
        .collect();

    if let Some(service) = &args.service {
        let wanted: ServiceName = service.parse()?;
        names.retain(|n| *n == wanted);
        if names.is_empty() {
            println!("Service '{wanted}' is not configured for this project.");
            return Ok(());
        }
    }

    if names.is_empty() {
        println!("No services configured.");
        return Ok(());
    }

    // Teardown happens in reverse of the start order
    names.reverse();

    let docker = DockerCli::new();
    ensure_docker(&docker)?;

    println!("Stopping {} service(s)...", names.len());
    render_progress(docker.stop(names))
}

/// Requested subset of services, from positionals and `--only`
fn parse_selection(
    positional: &[String],
    only: &[String],
) -> Result<Option<Vec<ServiceName>>> {
    let requested: Vec<&String> = positional.iter().chain(only.iter()).collect();
    if requested.is_empty() {
        return Ok(None);
    }

    let mut names = Vec::new();
    for raw in requested {
        let name: ServiceName = raw.parse()?;
        if !names.contains(&name) {
            names.push(name);
        }
    }
    Ok(Some(names))
}

fn ensure_docker(docker: &DockerCli) -> Result<()> {
    if docker.is_available() {
        return Ok(());
    }
    Err(LocaldevError::IoError {
        message: "Docker daemon is not reachable; start Docker and retry".to_string(),
        source: None,
    })
}

/// Drain the orchestrator's progress stream and surface the first failure
fn render_progress(rx: Receiver<ServiceProgress>) -> Result<()> {
    let mut first_failure: Option<LocaldevError> = None;

    for progress in rx {
        match progress.status {
            ServiceStatus::Starting => {
                println!("  {} {}...", Style::new().dim().apply_to("starting"), progress.service);
            }
            ServiceStatus::Stopping => {
                println!("  {} {}...", Style::new().dim().apply_to("stopping"), progress.service);
            }
            ServiceStatus::Started | ServiceStatus::Stopped => {
                println!(
                    "  {} {} {}",
                    Style::new().green().apply_to("✓"),
                    progress.service,
                    progress.status
                );
            }
            ServiceStatus::Failed => {
                let reason = progress.error.clone().unwrap_or_else(|| "unknown".to_string());
                println!(
                    "  {} {} failed: {}",
                    Style::new().red().apply_to("✗"),
                    progress.service,
                    reason
                );
                if first_failure.is_none() {
                    first_failure = Some(LocaldevError::ServiceFailed {
                        service: progress.service.to_string(),
                        action: "run".to_string(),
                        reason,
                    });
                }
            }
        }
    }

    match first_failure {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
