//! Service orchestration collaborator
//!
//! The engine synthesizes service configuration; actually running containers
//! is delegated to an [`Orchestrator`]. The engine only consumes the
//! resulting [`ServiceProgress`] stream for display, never for its own state.

pub mod docker;

use std::fmt;
use std::str::FromStr;
use std::sync::mpsc::Receiver;

use crate::config::ProjectConfig;
use crate::error::{LocaldevError, Result};

/// Backing service families, one per container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceName {
    Ai,
    Postgres,
    Mongodb,
    Cache,
    Queue,
    Minio,
}

impl ServiceName {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceName::Ai => "ai",
            ServiceName::Postgres => "postgres",
            ServiceName::Mongodb => "mongodb",
            ServiceName::Cache => "cache",
            ServiceName::Queue => "queue",
            ServiceName::Minio => "minio",
        }
    }
}

impl fmt::Display for ServiceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceName {
    type Err = LocaldevError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "ai" => Ok(ServiceName::Ai),
            "postgres" | "database" => Ok(ServiceName::Postgres),
            "mongodb" | "mongo" => Ok(ServiceName::Mongodb),
            "cache" => Ok(ServiceName::Cache),
            "queue" => Ok(ServiceName::Queue),
            "minio" | "storage" => Ok(ServiceName::Minio),
            other => Err(LocaldevError::UnknownService {
                service: other.to_string(),
            }),
        }
    }
}

/// Everything the orchestrator needs to run one service container
#[derive(Debug, Clone)]
pub struct ServiceSpec {
    pub name: ServiceName,
    pub image: String,
    /// host port -> container port
    pub ports: Vec<(u16, u16)>,
    pub env: Vec<(String, String)>,
    /// command appended after the image
    pub args: Vec<String>,
}

/// One status update from the orchestrator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceStatus {
    Starting,
    Started,
    Failed,
    Stopping,
    Stopped,
}

impl fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ServiceStatus::Starting => "starting",
            ServiceStatus::Started => "started",
            ServiceStatus::Failed => "failed",
            ServiceStatus::Stopping => "stopping",
            ServiceStatus::Stopped => "stopped",
        };
        f.write_str(s)
    }
}

/// Progress message emitted while starting or stopping services
#[derive(Debug, Clone)]
pub struct ServiceProgress {
    pub service: ServiceName,
    pub status: ServiceStatus,
    pub error: Option<String>,
}

/// Narrow interface to the container runtime
pub trait Orchestrator {
    /// Start the given services in order, streaming status updates.
    /// The receiver closes when all services have been processed.
    fn start(&self, specs: Vec<ServiceSpec>) -> Receiver<ServiceProgress>;

    /// Stop (and remove) the given services, streaming status updates.
    fn stop(&self, services: Vec<ServiceName>) -> Receiver<ServiceProgress>;
}

/// Build runnable service specs from the synthesized configuration.
///
/// Only services whose block is live are included; the order matches the
/// registry display order so databases come up before dependents.
pub fn specs_from_config(cfg: &ProjectConfig) -> Vec<ServiceSpec> {
    let mut specs = Vec::new();

    for service in crate::registry::services_for(&cfg.project.components) {
        match service {
            ServiceName::Ai if !cfg.services.ai.is_empty() => {
                specs.push(ServiceSpec {
                    name: ServiceName::Ai,
                    image: "ollama/ollama:latest".to_string(),
                    ports: vec![(cfg.services.ai.port, 11434)],
                    env: vec![],
                    args: vec![],
                });
            }
            ServiceName::Postgres if !cfg.services.database.is_empty() => {
                let image = if cfg.services.database.extensions.iter().any(|e| e == "pgvector") {
                    format!("pgvector/pgvector:pg{}", cfg.services.database.version)
                } else {
                    format!("postgres:{}", cfg.services.database.version)
                };
                specs.push(ServiceSpec {
                    name: ServiceName::Postgres,
                    image,
                    ports: vec![(cfg.services.database.port, 5432)],
                    env: vec![
                        ("POSTGRES_USER".to_string(), "localdev".to_string()),
                        ("POSTGRES_PASSWORD".to_string(), "localdev".to_string()),
                        ("POSTGRES_DB".to_string(), cfg.project.name.clone()),
                    ],
                    args: vec![],
                });
            }
            ServiceName::Mongodb if !cfg.services.mongodb.is_empty() => {
                specs.push(ServiceSpec {
                    name: ServiceName::Mongodb,
                    image: format!("mongo:{}", cfg.services.mongodb.version),
                    ports: vec![(cfg.services.mongodb.port, 27017)],
                    env: vec![
                        ("MONGO_INITDB_ROOT_USERNAME".to_string(), "localdev".to_string()),
                        ("MONGO_INITDB_ROOT_PASSWORD".to_string(), "localdev".to_string()),
                    ],
                    args: vec![],
                });
            }
            ServiceName::Cache if !cfg.services.cache.is_empty() => {
                specs.push(ServiceSpec {
                    name: ServiceName::Cache,
                    image: "redis:7-alpine".to_string(),
                    ports: vec![(cfg.services.cache.port, 6379)],
                    env: vec![],
                    args: vec![
                        "redis-server".to_string(),
                        "--maxmemory".to_string(),
                        "512mb".to_string(),
                        "--maxmemory-policy".to_string(),
                        cfg.services.cache.maxmemory_policy.clone(),
                    ],
                });
            }
            ServiceName::Queue if !cfg.services.queue.is_empty() => {
                let mut args = vec![
                    "redis-server".to_string(),
                    "--maxmemory-policy".to_string(),
                    cfg.services.queue.maxmemory_policy.clone(),
                ];
                if cfg.services.queue.appendonly {
                    args.push("--appendonly".to_string());
                    args.push("yes".to_string());
                    args.push("--appendfsync".to_string());
                    args.push(cfg.services.queue.appendfsync.clone());
                }
                specs.push(ServiceSpec {
                    name: ServiceName::Queue,
                    image: "redis:7-alpine".to_string(),
                    ports: vec![(cfg.services.queue.port, 6379)],
                    env: vec![],
                    args,
                });
            }
            ServiceName::Minio if !cfg.services.storage.is_empty() => {
                specs.push(ServiceSpec {
                    name: ServiceName::Minio,
                    image: "minio/minio:latest".to_string(),
                    ports: vec![
                        (cfg.services.storage.port, 9000),
                        (cfg.services.storage.console, 9001),
                    ],
                    env: vec![
                        ("MINIO_ROOT_USER".to_string(), "localdev".to_string()),
                        ("MINIO_ROOT_PASSWORD".to_string(), "localdev123".to_string()),
                    ],
                    args: vec![
                        "server".to_string(),
                        "/data".to_string(),
                        "--console-address".to_string(),
                        ":9001".to_string(),
                    ],
                });
            }
            _ => {}
        }
    }

    specs
}
