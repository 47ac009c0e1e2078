//! Model role classification
//!
//! Partitions model identifiers into generation / embedding / transcription
//! roles using a naming heuristic, not a registry lookup. Unrecognized names
//! default to generation, so interactive selection stays the override path
//! for custom models.

use std::fmt;

/// Role partition of a model identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelRole {
    Generation,
    Embedding,
    Transcription,
}

impl fmt::Display for ModelRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ModelRole::Generation => "generation",
            ModelRole::Embedding => "embedding",
            ModelRole::Transcription => "transcription",
        };
        f.write_str(s)
    }
}

/// Known embedding models, checked before any pattern matching
const KNOWN_EMBEDDING_MODELS: &[&str] = &[
    "nomic-embed-text",
    "mxbai-embed-large",
    "all-minilm",
    "bge-base",
    "bge-small",
    "bge-large",
    "e5-base",
    "e5-large",
];

/// Name prefixes of embedding model families
const EMBEDDING_PREFIXES: &[&str] = &[
    "bge-",
    "gte-",
    "e5-",
    "instructor-",
    "sentence-transformers",
    "all-minilm",
    "text-embedding-",
    "stella-",
];

/// Whether a model name looks like an embedding model.
///
/// Best-effort: custom models with unusual names can be misclassified.
pub fn is_embedding_model(name: &str) -> bool {
    let base = base_name(name);

    if KNOWN_EMBEDDING_MODELS.contains(&base) {
        return true;
    }

    let lower = name.to_lowercase();
    if lower.contains("embed") {
        return true;
    }

    EMBEDDING_PREFIXES.iter().any(|p| lower.starts_with(p))
}

/// Classify a model name into its role
pub fn classify(name: &str) -> ModelRole {
    if name.to_lowercase().contains("whisper") {
        return ModelRole::Transcription;
    }
    if is_embedding_model(name) {
        return ModelRole::Embedding;
    }
    ModelRole::Generation
}

/// First generation-classified model, used when no default is set yet
pub fn select_default(models: &[String]) -> Option<&str> {
    models
        .iter()
        .find(|m| classify(m) == ModelRole::Generation)
        .map(String::as_str)
}

/// Strip the `:tag` suffix so `nomic-embed-text:latest` matches the known list
fn base_name(name: &str) -> &str {
    name.split(':').next().unwrap_or(name)
}
