//! Configuration synthesis
//!
//! Maps the enabled-component set onto concrete service blocks. Addition
//! writes canonical defaults only into blocks that are not already
//! configured, so custom settings (e.g. a changed port) survive re-adds.
//! Removal applies component-specific teardown and blanks a block only when
//! no remaining enabled component still requires it.
//!
//! The default tables are a compatibility contract with existing persisted
//! configurations; do not change them casually.

use crate::config::{
    AiConfig, CacheConfig, DatabaseConfig, MongodbConfig, ProjectConfig, QueueConfig,
    StorageConfig,
};
use crate::error::Result;
use crate::models::classify;
use crate::registry::{self, ComponentKind};

pub const AI_DEFAULT_PORT: u16 = 11434;
pub const POSTGRES_EXTENSION_PGVECTOR: &str = "pgvector";

/// Apply a component's canonical defaults after it was enabled.
///
/// `cfg.project.components` must already contain `id`. Idempotent: a block
/// that is already live is left untouched.
pub fn apply_add(cfg: &mut ProjectConfig, id: &str) -> Result<()> {
    let def = registry::get(id)?;

    match def.kind {
        ComponentKind::Ai { .. } => {
            if cfg.services.ai.is_empty() {
                cfg.services.ai = AiConfig {
                    port: AI_DEFAULT_PORT,
                    models: Vec::new(),
                    default: String::new(),
                };
            }
        }
        ComponentKind::Database => {
            ensure_database_block(cfg);
        }
        ComponentKind::DatabaseExtension { extension } => {
            ensure_database_block(cfg);
            let extensions = &mut cfg.services.database.extensions;
            if !extensions.iter().any(|e| e == extension) {
                extensions.push(extension.to_string());
            }
        }
        ComponentKind::DocumentStore => {
            if cfg.services.mongodb.is_empty() {
                cfg.services.mongodb = MongodbConfig {
                    kind: "mongodb".to_string(),
                    version: "7.0".to_string(),
                    port: 27017,
                };
            }
        }
        ComponentKind::Cache => {
            if cfg.services.cache.is_empty() {
                cfg.services.cache = CacheConfig {
                    kind: "redis".to_string(),
                    port: 6379,
                    maxmemory_policy: "allkeys-lru".to_string(),
                    appendonly: false,
                };
            }
        }
        ComponentKind::Queue => {
            if cfg.services.queue.is_empty() {
                cfg.services.queue = QueueConfig {
                    kind: "redis".to_string(),
                    port: 6380,
                    maxmemory_policy: "noeviction".to_string(),
                    appendonly: true,
                    appendfsync: "everysec".to_string(),
                };
            }
        }
        ComponentKind::ObjectStorage => {
            if cfg.services.storage.is_empty() {
                cfg.services.storage = StorageConfig {
                    kind: "minio".to_string(),
                    port: 9000,
                    console: 9001,
                };
            }
        }
    }

    Ok(())
}

/// Tear down a component's share of the configuration after it was disabled.
///
/// `cfg.project.components` must no longer contain `id`; the remaining set
/// decides whether shared blocks survive.
pub fn apply_remove(cfg: &mut ProjectConfig, id: &str) -> Result<()> {
    let def = registry::get(id)?;

    match def.kind {
        ComponentKind::Ai { role } => {
            // The block is shared between the AI components; a remaining
            // enabled one keeps it alive even with an empty model list.
            let ai_still_enabled = cfg.project.components.iter().any(|other| {
                matches!(registry::get(other), Ok(d) if matches!(d.kind, ComponentKind::Ai { .. }))
            });

            let ai = &mut cfg.services.ai;
            let removed_default = ai.models.iter().any(|m| {
                classify::classify(m) == role && *m == ai.default
            });

            ai.models.retain(|m| classify::classify(m) != role);

            if removed_default {
                ai.default = ai.models.first().cloned().unwrap_or_default();
            }

            if !ai_still_enabled {
                *ai = AiConfig::default();
            }
        }
        ComponentKind::Database => {
            // The block is shared with the vector extension; the resolver
            // cascades vector out first, so a lingering `vector` here means
            // teardown must keep the block alive.
            if !cfg.is_enabled("vector") {
                cfg.services.database = DatabaseConfig::default();
            }
        }
        ComponentKind::DatabaseExtension { extension } => {
            cfg.services.database.extensions.retain(|e| e != extension);
            if !cfg.is_enabled("database") {
                cfg.services.database = DatabaseConfig::default();
            }
        }
        ComponentKind::DocumentStore => {
            cfg.services.mongodb = MongodbConfig::default();
        }
        ComponentKind::Cache => {
            cfg.services.cache = CacheConfig::default();
        }
        ComponentKind::Queue => {
            cfg.services.queue = QueueConfig::default();
        }
        ComponentKind::ObjectStorage => {
            cfg.services.storage = StorageConfig::default();
        }
    }

    Ok(())
}

/// Record a selected model in the AI block.
///
/// The same physical model name never appears twice; the first generation
/// model becomes the default and an existing default is never overwritten.
pub fn add_model(cfg: &mut ProjectConfig, name: &str) {
    let ai = &mut cfg.services.ai;

    if ai.models.iter().any(|m| m == name) {
        return;
    }
    ai.models.push(name.to_string());

    if ai.default.is_empty() {
        if let Some(default) = classify::select_default(&ai.models) {
            ai.default = default.to_string();
        }
    }
}

/// Swap the model serving `role` for `name`, re-pointing the default if it
/// referenced the replaced model.
pub fn replace_model(cfg: &mut ProjectConfig, role: crate::models::ModelRole, name: &str) {
    let ai = &mut cfg.services.ai;

    let old = ai
        .models
        .iter()
        .find(|m| classify::classify(m) == role)
        .cloned();

    ai.models.retain(|m| classify::classify(m) != role);
    if !ai.models.iter().any(|m| m == name) {
        ai.models.push(name.to_string());
    }

    if let Some(old) = old {
        if ai.default == old {
            ai.default = name.to_string();
        }
    } else if ai.default.is_empty() {
        if let Some(default) = classify::select_default(&ai.models) {
            ai.default = default.to_string();
        }
    }
}

fn ensure_database_block(cfg: &mut ProjectConfig) {
    if cfg.services.database.is_empty() {
        cfg.services.database = DatabaseConfig {
            kind: "postgres".to_string(),
            version: "16".to_string(),
            port: 5432,
            extensions: Vec::new(),
        };
    }
}
