//! Project configuration data structures
//!
//! The persisted `.localdev/config.yaml` holds the ordered enabled-component
//! list (the single source of truth) plus one block per service family. A
//! block is written only while some enabled component requires it; an
//! empty/zero-valued block is semantically absent and is skipped on save.

pub mod store;
pub mod synthesize;

use serde::{Deserialize, Serialize};

pub const CONFIG_VERSION: &str = "1";

/// Persisted project configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProjectConfig {
    #[serde(default)]
    pub version: String,

    #[serde(default)]
    pub project: ProjectSection,

    #[serde(default, skip_serializing_if = "ServicesSection::is_empty")]
    pub services: ServicesSection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProjectSection {
    #[serde(default)]
    pub name: String,

    #[serde(rename = "type", default)]
    pub kind: String,

    /// Ordered enabled-component set; insertion order is preserved on save
    #[serde(default)]
    pub components: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ServicesSection {
    #[serde(default, skip_serializing_if = "AiConfig::is_empty")]
    pub ai: AiConfig,

    #[serde(default, skip_serializing_if = "DatabaseConfig::is_empty")]
    pub database: DatabaseConfig,

    #[serde(default, skip_serializing_if = "MongodbConfig::is_empty")]
    pub mongodb: MongodbConfig,

    #[serde(default, skip_serializing_if = "CacheConfig::is_empty")]
    pub cache: CacheConfig,

    #[serde(default, skip_serializing_if = "QueueConfig::is_empty")]
    pub queue: QueueConfig,

    #[serde(default, skip_serializing_if = "StorageConfig::is_empty")]
    pub storage: StorageConfig,
}

impl ServicesSection {
    pub fn is_empty(&self) -> bool {
        self.ai.is_empty()
            && self.database.is_empty()
            && self.mongodb.is_empty()
            && self.cache.is_empty()
            && self.queue.is_empty()
            && self.storage.is_empty()
    }
}

/// AI service block (one runtime serves both generation and embedding models)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AiConfig {
    #[serde(default)]
    pub port: u16,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub models: Vec<String>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub default: String,
}

impl AiConfig {
    pub fn is_empty(&self) -> bool {
        self.port == 0 && self.models.is_empty()
    }
}

/// Relational database block, shared by the `database` and `vector` components
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DatabaseConfig {
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub kind: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub version: String,

    #[serde(default)]
    pub port: u16,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extensions: Vec<String>,
}

impl DatabaseConfig {
    pub fn is_empty(&self) -> bool {
        self.kind.is_empty() && self.port == 0
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MongodbConfig {
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub kind: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub version: String,

    #[serde(default)]
    pub port: u16,
}

impl MongodbConfig {
    pub fn is_empty(&self) -> bool {
        self.kind.is_empty() && self.port == 0
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CacheConfig {
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub kind: String,

    #[serde(default)]
    pub port: u16,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub maxmemory_policy: String,

    /// Cache data is disposable; persistence stays off
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub appendonly: bool,
}

impl CacheConfig {
    pub fn is_empty(&self) -> bool {
        self.kind.is_empty() && self.port == 0
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct QueueConfig {
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub kind: String,

    #[serde(default)]
    pub port: u16,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub maxmemory_policy: String,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub appendonly: bool,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub appendfsync: String,
}

impl QueueConfig {
    pub fn is_empty(&self) -> bool {
        self.kind.is_empty() && self.port == 0
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StorageConfig {
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub kind: String,

    #[serde(default)]
    pub port: u16,

    #[serde(default)]
    pub console: u16,
}

impl StorageConfig {
    pub fn is_empty(&self) -> bool {
        self.kind.is_empty() && self.port == 0
    }
}

impl ProjectConfig {
    /// Fresh configuration with no components enabled
    pub fn new(name: &str, kind: &str) -> Self {
        ProjectConfig {
            version: CONFIG_VERSION.to_string(),
            project: ProjectSection {
                name: name.to_string(),
                kind: kind.to_string(),
                components: Vec::new(),
            },
            services: ServicesSection::default(),
        }
    }

    pub fn is_enabled(&self, id: &str) -> bool {
        self.project.components.iter().any(|c| c == id)
    }

    /// Append a component id, preserving insertion order; no-op if present
    pub fn enable(&mut self, id: &str) {
        if !self.is_enabled(id) {
            self.project.components.push(id.to_string());
        }
    }

    /// Drop a component id from the enabled set
    pub fn disable(&mut self, id: &str) {
        self.project.components.retain(|c| c != id);
    }
}
