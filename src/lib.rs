use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("SerializationError: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("YamlError: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("IoError: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Unknown resource kind {0}")]
    UnknownKind(String),

    #[error("Catalog lint found {0} issue(s)")]
    LintFailed(usize),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The typed catalog of Knative Serving and Kourier records
pub mod catalog;

/// Rendering of catalog records as YAML or JSON
pub mod emit;

/// Cross-reference checks over catalog records
pub mod lint;

/// Log integrations
pub mod telemetry;

/// Knative CRDs that have no k8s-openapi counterpart
pub mod resources;

pub use catalog::KubernetesResource;
