//! Static component catalog
//!
//! The registry is a fixed, in-process table of component definitions and
//! project templates. It is constructed once and read-only thereafter; all
//! lifecycle operations (add/remove/update) consult it but never mutate it.

use crate::error::{LocaldevError, Result};
use crate::models::ModelRole;
use crate::services::ServiceName;

pub const GB: u64 = 1024 * 1024 * 1024;
pub const MB: u64 = 1024 * 1024;

/// Base memory overhead assumed for Docker and the OS when summing
/// component requirements.
const BASE_OVERHEAD: u64 = 1 * GB;

/// What a component actually is, with typed per-kind payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentKind {
    /// AI runtime backed by the model source; `role` partitions its models
    Ai { role: ModelRole },
    /// Relational database (PostgreSQL)
    Database,
    /// Extension loaded into the relational database
    DatabaseExtension { extension: &'static str },
    /// Document-oriented store (MongoDB)
    DocumentStore,
    /// In-memory cache (Redis)
    Cache,
    /// Job queue (Redis, persistent)
    Queue,
    /// S3-compatible object storage (MinIO)
    ObjectStorage,
}

/// An AI model option offered by a component
#[derive(Debug, Clone, Copy)]
pub struct ModelOption {
    pub name: &'static str,
    pub size: &'static str,
    pub ram: u64,
    pub default: bool,
    /// Vector dimensions, 0 for non-embedding models
    pub dimensions: u32,
}

/// Immutable definition of a selectable capability unit
#[derive(Debug, Clone, Copy)]
pub struct ComponentDefinition {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub kind: ComponentKind,
    pub dependencies: &'static [&'static str],
    pub services: &'static [ServiceName],
    pub models: &'static [ModelOption],
    pub min_ram: u64,
}

impl ComponentDefinition {
    /// AI components carry models and participate in model selection
    pub fn is_ai(&self) -> bool {
        matches!(self.kind, ComponentKind::Ai { .. }) && !self.models.is_empty()
    }

    /// Role of this component's models, if it is an AI component
    pub fn model_role(&self) -> Option<ModelRole> {
        match self.kind {
            ComponentKind::Ai { role } => Some(role),
            _ => None,
        }
    }
}

/// A named bundle of component ids used by `localdev init`
#[derive(Debug, Clone, Copy)]
pub struct ProjectTemplate {
    pub name: &'static str,
    pub description: &'static str,
    pub components: &'static [&'static str],
}

/// Display order for listings; also the iteration order of [`all`]
const DISPLAY_ORDER: &[&str] = &[
    "llm",
    "embedding",
    "database",
    "vector",
    "mongodb",
    "cache",
    "queue",
    "storage",
];

static CATALOG: &[ComponentDefinition] = &[
    ComponentDefinition {
        id: "llm",
        name: "LLM (Text generation)",
        description: "Large language models for text generation, chat, and completion",
        kind: ComponentKind::Ai {
            role: ModelRole::Generation,
        },
        dependencies: &[],
        services: &[ServiceName::Ai],
        models: &[
            ModelOption {
                name: "qwen2.5:3b",
                size: "2.3GB",
                ram: 4 * GB,
                default: true,
                dimensions: 0,
            },
            ModelOption {
                name: "llama3.2:3b",
                size: "2.0GB",
                ram: 4 * GB,
                default: false,
                dimensions: 0,
            },
            ModelOption {
                name: "deepseek-coder:1.3b",
                size: "1.5GB",
                ram: 3 * GB,
                default: false,
                dimensions: 0,
            },
            ModelOption {
                name: "phi3:mini",
                size: "2.3GB",
                ram: 4 * GB,
                default: false,
                dimensions: 0,
            },
            ModelOption {
                name: "gemma2:2b",
                size: "1.6GB",
                ram: 3 * GB,
                default: false,
                dimensions: 0,
            },
        ],
        min_ram: 4 * GB,
    },
    ComponentDefinition {
        id: "embedding",
        name: "Embeddings (Semantic search)",
        description: "Text embeddings for semantic search and similarity",
        kind: ComponentKind::Ai {
            role: ModelRole::Embedding,
        },
        dependencies: &[],
        services: &[ServiceName::Ai],
        models: &[
            ModelOption {
                name: "nomic-embed-text",
                size: "274MB",
                ram: 768 * MB,
                default: true,
                dimensions: 768,
            },
            ModelOption {
                name: "mxbai-embed-large",
                size: "670MB",
                ram: 1 * GB,
                default: false,
                dimensions: 1024,
            },
            ModelOption {
                name: "all-minilm",
                size: "46MB",
                ram: 256 * MB,
                default: false,
                dimensions: 384,
            },
            ModelOption {
                name: "bge-small",
                size: "134MB",
                ram: 512 * MB,
                default: false,
                dimensions: 384,
            },
        ],
        min_ram: 2 * GB,
    },
    ComponentDefinition {
        id: "database",
        name: "Database (PostgreSQL)",
        description: "Standard relational database for data storage",
        kind: ComponentKind::Database,
        dependencies: &[],
        services: &[ServiceName::Postgres],
        models: &[],
        min_ram: 512 * MB,
    },
    ComponentDefinition {
        id: "vector",
        name: "Vector Search (pgvector)",
        description: "Add vector similarity search to PostgreSQL",
        kind: ComponentKind::DatabaseExtension {
            extension: "pgvector",
        },
        dependencies: &["database"],
        services: &[ServiceName::Postgres],
        models: &[],
        min_ram: 512 * MB,
    },
    ComponentDefinition {
        id: "mongodb",
        name: "NoSQL Database (MongoDB)",
        description: "Document-oriented database for flexible data storage",
        kind: ComponentKind::DocumentStore,
        dependencies: &[],
        services: &[ServiceName::Mongodb],
        models: &[],
        min_ram: 1 * GB,
    },
    ComponentDefinition {
        id: "cache",
        name: "Cache (Redis)",
        description: "In-memory cache for temporary data and sessions",
        kind: ComponentKind::Cache,
        dependencies: &[],
        services: &[ServiceName::Cache],
        models: &[],
        min_ram: 512 * MB,
    },
    ComponentDefinition {
        id: "queue",
        name: "Queue (Redis)",
        description: "Reliable job queue for background processing",
        kind: ComponentKind::Queue,
        dependencies: &[],
        services: &[ServiceName::Queue],
        models: &[],
        min_ram: 512 * MB,
    },
    ComponentDefinition {
        id: "storage",
        name: "Object Storage (MinIO)",
        description: "S3-compatible object storage for files and media",
        kind: ComponentKind::ObjectStorage,
        dependencies: &[],
        services: &[ServiceName::Minio],
        models: &[],
        min_ram: 1 * GB,
    },
];

static TEMPLATES: &[ProjectTemplate] = &[
    ProjectTemplate {
        name: "custom",
        description: "Select components manually",
        components: &[],
    },
    ProjectTemplate {
        name: "rag",
        description: "Retrieval-augmented generation with vector search",
        components: &["llm", "embedding", "database", "vector", "cache"],
    },
    ProjectTemplate {
        name: "chatbot",
        description: "Create conversational AI interfaces",
        components: &["llm", "database", "cache"],
    },
    ProjectTemplate {
        name: "fullstack",
        description: "Complete application with all necessary components",
        components: &["llm", "database", "cache", "queue", "storage"],
    },
    ProjectTemplate {
        name: "simple",
        description: "Just language model, no additional services",
        components: &["llm"],
    },
];

/// Look up a component by id
pub fn get(id: &str) -> Result<&'static ComponentDefinition> {
    CATALOG
        .iter()
        .find(|c| c.id == id)
        .ok_or_else(|| LocaldevError::UnknownComponent { id: id.to_string() })
}

/// All components in display order
pub fn all() -> Vec<&'static ComponentDefinition> {
    DISPLAY_ORDER
        .iter()
        .filter_map(|id| CATALOG.iter().find(|c| c.id == *id))
        .collect()
}

/// Look up a project template by name
pub fn template(name: &str) -> Result<&'static ProjectTemplate> {
    TEMPLATES
        .iter()
        .find(|t| t.name == name)
        .ok_or_else(|| LocaldevError::UnknownTemplate {
            name: name.to_string(),
        })
}

/// All project templates
pub fn templates() -> &'static [ProjectTemplate] {
    TEMPLATES
}

/// Total RAM needed to run the given components, including base overhead.
///
/// Unknown ids are ignored; validation happens earlier in the resolver.
pub fn ram_requirement(component_ids: &[String]) -> u64 {
    let total: u64 = component_ids
        .iter()
        .filter_map(|id| CATALOG.iter().find(|c| c.id == id))
        .map(|c| c.min_ram)
        .sum();
    total + BASE_OVERHEAD
}

/// Deduplicated services backing the given components, in display order
pub fn services_for(component_ids: &[String]) -> Vec<ServiceName> {
    let mut services = Vec::new();
    for def in all() {
        if !component_ids.iter().any(|id| id == def.id) {
            continue;
        }
        for service in def.services {
            if !services.contains(service) {
                services.push(*service);
            }
        }
    }
    services
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_known_component() {
        let comp = get("llm").unwrap();
        assert_eq!(comp.id, "llm");
        assert!(comp.is_ai());
        assert_eq!(comp.model_role(), Some(ModelRole::Generation));
    }

    #[test]
    fn test_get_unknown_component() {
        let err = get("nope").unwrap_err();
        assert!(matches!(err, LocaldevError::UnknownComponent { .. }));
    }

    #[test]
    fn test_vector_depends_on_database() {
        let vector = get("vector").unwrap();
        assert_eq!(vector.dependencies, &["database"]);
        assert!(matches!(
            vector.kind,
            ComponentKind::DatabaseExtension {
                extension: "pgvector"
            }
        ));
    }

    #[test]
    fn test_all_dependencies_exist_in_catalog() {
        for comp in all() {
            for dep in comp.dependencies {
                assert!(get(dep).is_ok(), "{} depends on unknown {}", comp.id, dep);
            }
        }
    }

    #[test]
    fn test_all_in_display_order() {
        let ids: Vec<&str> = all().iter().map(|c| c.id).collect();
        assert_eq!(ids, DISPLAY_ORDER);
    }

    #[test]
    fn test_each_ai_component_has_exactly_one_default_model() {
        for comp in all().iter().filter(|c| c.is_ai()) {
            let defaults = comp.models.iter().filter(|m| m.default).count();
            assert_eq!(defaults, 1, "{} has {} default models", comp.id, defaults);
        }
    }

    #[test]
    fn test_ram_requirement_includes_overhead() {
        let ram = ram_requirement(&["database".to_string()]);
        assert_eq!(ram, 512 * MB + GB);
    }

    #[test]
    fn test_services_shared_by_database_and_vector() {
        let services = services_for(&["database".to_string(), "vector".to_string()]);
        assert_eq!(services, vec![ServiceName::Postgres]);
    }

    #[test]
    fn test_llm_and_embedding_share_ai_service() {
        let services = services_for(&["llm".to_string(), "embedding".to_string()]);
        assert_eq!(services, vec![ServiceName::Ai]);
    }

    #[test]
    fn test_rag_template() {
        let tmpl = template("rag").unwrap();
        assert!(tmpl.components.contains(&"vector"));
        assert!(tmpl.components.contains(&"database"));
        assert!(template("nope").is_err());
    }
}
