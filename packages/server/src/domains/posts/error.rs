//! Review workflow error taxonomy.
//!
//! Every workflow operation returns `Result<_, WorkflowError>`; failures are
//! always a discriminated value, never a panic across the API boundary.
//! Gateway and store errors arrive as `anyhow::Error` and are mapped to a
//! category at the activity boundary.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkflowError {
    /// Platform inactive, missing credential, unresolved platform reference,
    /// or locally-rejected input (blank feedback, wrong state). Detected
    /// before any external call is made.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Text or image generation failed. Text failures abort the operation;
    /// image failures are logged and swallowed by the caller.
    #[error("generation failed: {0}")]
    Generation(String),

    /// Delivery to the platform failed. The post is left in `failed` and the
    /// user retries by re-approving.
    #[error("publish failed: {0}")]
    Publish(String),

    /// Store/save failed. Surfaced as-is, never retried by the workflow.
    #[error("persistence error: {0}")]
    Persistence(String),

    /// The referenced entity does not exist.
    #[error("not found: {0}")]
    NotFound(String),
}

impl WorkflowError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Store failures become persistence errors.
    pub fn persistence(err: anyhow::Error) -> Self {
        Self::Persistence(format!("{err:#}"))
    }

    /// Generation gateway failures.
    pub fn generation(err: anyhow::Error) -> Self {
        Self::Generation(format!("{err:#}"))
    }

    /// Publishing gateway failures.
    pub fn publish(err: anyhow::Error) -> Self {
        Self::Publish(format!("{err:#}"))
    }
}

pub type WorkflowResult<T> = Result<T, WorkflowError>;
