//! Docker CLI orchestrator
//!
//! Minimal implementation of the [`Orchestrator`](super::Orchestrator) seam
//! that shells out to the `docker` binary. Container runtime internals are
//! deliberately out of scope; this just runs, stops, and removes the
//! containers described by the synthesized service specs.

use std::process::Command;
use std::sync::mpsc::{self, Receiver};
use std::thread;

use super::{Orchestrator, ServiceName, ServiceProgress, ServiceSpec, ServiceStatus};

/// Container name prefix so project containers are identifiable
const CONTAINER_PREFIX: &str = "localdev";

pub struct DockerCli;

impl DockerCli {
    pub fn new() -> Self {
        DockerCli
    }

    /// Whether the docker daemon answers at all
    pub fn is_available(&self) -> bool {
        Command::new("docker")
            .args(["info", "--format", "{{.ServerVersion}}"])
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }
}

impl Default for DockerCli {
    fn default() -> Self {
        DockerCli::new()
    }
}

fn container_name(service: ServiceName) -> String {
    format!("{CONTAINER_PREFIX}-{service}")
}

fn run_container(spec: &ServiceSpec) -> Result<(), String> {
    // Replace any stale container from a previous run
    let _ = Command::new("docker")
        .args(["rm", "-f", &container_name(spec.name)])
        .output();

    let mut cmd = Command::new("docker");
    cmd.args(["run", "-d", "--name", &container_name(spec.name)]);
    for (host, container) in &spec.ports {
        cmd.args(["-p", &format!("{host}:{container}")]);
    }
    for (key, value) in &spec.env {
        cmd.args(["-e", &format!("{key}={value}")]);
    }
    cmd.arg(&spec.image);
    cmd.args(&spec.args);

    let output = cmd.output().map_err(|e| e.to_string())?;
    if output.status.success() {
        Ok(())
    } else {
        Err(String::from_utf8_lossy(&output.stderr).trim().to_string())
    }
}

fn stop_container(service: ServiceName) -> Result<(), String> {
    let name = container_name(service);

    let output = Command::new("docker")
        .args(["stop", "--time", "10", &name])
        .output()
        .map_err(|e| e.to_string())?;
    if !output.status.success() {
        return Err(String::from_utf8_lossy(&output.stderr).trim().to_string());
    }

    let _ = Command::new("docker").args(["rm", &name]).output();
    Ok(())
}

impl Orchestrator for DockerCli {
    fn start(&self, specs: Vec<ServiceSpec>) -> Receiver<ServiceProgress> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            for spec in specs {
                let _ = tx.send(ServiceProgress {
                    service: spec.name,
                    status: ServiceStatus::Starting,
                    error: None,
                });

                let progress = match run_container(&spec) {
                    Ok(()) => ServiceProgress {
                        service: spec.name,
                        status: ServiceStatus::Started,
                        error: None,
                    },
                    Err(reason) => ServiceProgress {
                        service: spec.name,
                        status: ServiceStatus::Failed,
                        error: Some(reason),
                    },
                };
                let _ = tx.send(progress);
            }
        });

        rx
    }

    fn stop(&self, services: Vec<ServiceName>) -> Receiver<ServiceProgress> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            for service in services {
                let _ = tx.send(ServiceProgress {
                    service,
                    status: ServiceStatus::Stopping,
                    error: None,
                });

                let progress = match stop_container(service) {
                    Ok(()) => ServiceProgress {
                        service,
                        status: ServiceStatus::Stopped,
                        error: None,
                    },
                    Err(reason) => ServiceProgress {
                        service,
                        status: ServiceStatus::Failed,
                        error: Some(reason),
                    },
                };
                let _ = tx.send(progress);
            }
        });

        rx
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_container_names_are_prefixed() {
        assert_eq!(container_name(ServiceName::Postgres), "localdev-postgres");
        assert_eq!(container_name(ServiceName::Ai), "localdev-ai");
    }
}
