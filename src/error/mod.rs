//! Error types and handling for localdev
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//! Every externally surfaced error names the component or model that
//! triggered it.

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for localdev operations
#[derive(Error, Diagnostic, Debug)]
pub enum LocaldevError {
    // Component errors
    #[error("Unknown component: {id}")]
    #[diagnostic(
        code(localdev::component::unknown),
        help("Run 'localdev component list' to see available components")
    )]
    UnknownComponent { id: String },

    #[error("Component '{id}' requires '{dependency}' which is not enabled")]
    #[diagnostic(
        code(localdev::component::unsatisfied_dependency),
        help("Add the missing dependency first, or confirm the cascade when prompted")
    )]
    UnsatisfiedDependency { id: String, dependency: String },

    #[error("Component '{id}' is required by: {dependents}")]
    #[diagnostic(
        code(localdev::component::dependent_conflict),
        help("Remove the dependent components first, or confirm the cascade when prompted")
    )]
    DependentConflict { id: String, dependents: String },

    #[error("Dependency cycle in the component registry involving '{id}'")]
    #[diagnostic(
        code(localdev::component::registry_cycle),
        help("This is a bug in the built-in component catalog, not a project problem")
    )]
    RegistryCycle { id: String },

    #[error("Operation cancelled")]
    #[diagnostic(code(localdev::cancelled))]
    Cancelled,

    // Template errors
    #[error("Unknown template: {name}")]
    #[diagnostic(
        code(localdev::template::unknown),
        help("Available templates: custom, rag, chatbot, fullstack, simple")
    )]
    UnknownTemplate { name: String },

    // Configuration errors
    #[error("No localdev project found at: {path}")]
    #[diagnostic(
        code(localdev::config::not_found),
        help("Run 'localdev init' to initialize a project")
    )]
    ProjectNotFound { path: String },

    #[error("Project already initialized at: {path}")]
    #[diagnostic(code(localdev::config::already_initialized))]
    AlreadyInitialized { path: String },

    #[error("Failed to read configuration file: {path}")]
    #[diagnostic(
        code(localdev::config::read_failed),
        help("If the file is corrupt, re-run 'localdev init' to regenerate it")
    )]
    ConfigReadFailed { path: String, reason: String },

    #[error("Failed to parse configuration file: {path}")]
    #[diagnostic(
        code(localdev::config::parse_failed),
        help("If the file is corrupt, re-run 'localdev init' to regenerate it")
    )]
    ConfigParseFailed { path: String, reason: String },

    #[error("Failed to write configuration file: {path}")]
    #[diagnostic(code(localdev::config::write_failed))]
    ConfigWriteFailed { path: String, reason: String },

    // Resource errors
    #[error("Insufficient resources: components need {required}, {available} available")]
    #[diagnostic(
        code(localdev::resources::insufficient),
        help("Free up memory or choose smaller models, then retry")
    )]
    InsufficientResources { required: String, available: String },

    // Model source errors
    #[error("Model source is not reachable at {endpoint}")]
    #[diagnostic(
        code(localdev::models::source_unavailable),
        help("Start the Ollama service and retry")
    )]
    ModelSourceUnavailable { endpoint: String },

    #[error("Model '{model}' not found")]
    #[diagnostic(code(localdev::models::not_found))]
    ModelNotFound { model: String },

    #[error("Download of '{model}' timed out")]
    #[diagnostic(
        code(localdev::models::acquisition_timeout),
        help("Check your network connection, then retry with 'localdev models pull <model>'")
    )]
    AcquisitionTimeout { model: String },

    #[error("Failed to download '{model}': {reason}")]
    #[diagnostic(
        code(localdev::models::acquisition_failed),
        help("Retry with 'localdev models pull <model>'")
    )]
    AcquisitionFailure { model: String, reason: String },

    // Service orchestration errors
    #[error("Service '{service}' failed to {action}: {reason}")]
    #[diagnostic(code(localdev::services::operation_failed))]
    ServiceFailed {
        service: String,
        action: String,
        reason: String,
    },

    #[error("Unknown service: {service}")]
    #[diagnostic(
        code(localdev::services::unknown),
        help("Run 'localdev start' without arguments to start all enabled services")
    )]
    UnknownService { service: String },

    // IO/interaction errors
    #[error("{message}")]
    #[diagnostic(code(localdev::io))]
    IoError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl LocaldevError {
    /// Wrap a prompt failure (terminal not interactive, EOF, ...);
    /// Esc or Ctrl-C during a prompt becomes [`LocaldevError::Cancelled`].
    pub fn prompt(err: inquire::InquireError) -> Self {
        match err {
            inquire::InquireError::OperationCanceled
            | inquire::InquireError::OperationInterrupted => LocaldevError::Cancelled,
            err => LocaldevError::IoError {
                message: format!("Failed to read input: {err}"),
                source: Some(Box::new(err)),
            },
        }
    }
}

/// Result type alias for localdev operations
pub type Result<T> = std::result::Result<T, LocaldevError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_errors_name_the_offending_identifier() {
        let err = LocaldevError::UnknownComponent {
            id: "nope".to_string(),
        };
        assert!(err.to_string().contains("nope"));

        let err = LocaldevError::AcquisitionTimeout {
            model: "qwen2.5:3b".to_string(),
        };
        assert!(err.to_string().contains("qwen2.5:3b"));

        let err = LocaldevError::DependentConflict {
            id: "database".to_string(),
            dependents: "vector".to_string(),
        };
        assert!(err.to_string().contains("database"));
        assert!(err.to_string().contains("vector"));
    }

    #[test]
    fn test_timeout_and_failure_are_distinct_messages() {
        let timeout = LocaldevError::AcquisitionTimeout {
            model: "m".to_string(),
        }
        .to_string();
        let failure = LocaldevError::AcquisitionFailure {
            model: "m".to_string(),
            reason: "connection reset".to_string(),
        }
        .to_string();
        assert_ne!(timeout, failure);
        assert!(timeout.contains("timed out"));
        assert!(failure.contains("connection reset"));
    }
}
