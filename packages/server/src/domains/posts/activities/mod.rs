//! Review workflow activities.
//!
//! Every state transition of a post happens through the functions in this
//! module. Activities run their gateway-touching sections on spawned tasks:
//! a caller dropping its future (client disconnect) cannot discard a
//! completed gateway result, so stored state always reflects what actually
//! happened.

pub mod core;
pub mod create_post;
pub mod publish;
pub mod revision;

pub use self::core::{delete_post, get_post, list_posts};
pub use create_post::create_post;
pub use publish::{approve_post, publish_approved, PublishReport};
pub use revision::submit_feedback;

use std::future::Future;
use std::time::Duration;

use crate::domains::posts::error::{WorkflowError, WorkflowResult};

/// Run a workflow section on its own task and await it. The spawned task
/// survives the caller dropping this future, so completed results are still
/// applied to the store.
pub(crate) async fn detached<F, T>(fut: F) -> WorkflowResult<T>
where
    F: Future<Output = WorkflowResult<T>> + Send + 'static,
    T: Send + 'static,
{
    tokio::spawn(fut)
        .await
        .map_err(|e| WorkflowError::Persistence(format!("workflow task failed: {e}")))?
}

/// Apply the configured timeout to a gateway call.
pub(crate) async fn with_gateway_timeout<T>(
    timeout: Duration,
    fut: impl Future<Output = anyhow::Result<T>>,
) -> anyhow::Result<T> {
    match tokio::time::timeout(timeout, fut).await {
        Ok(result) => result,
        Err(_) => Err(anyhow::anyhow!(
            "gateway call timed out after {}s",
            timeout.as_secs()
        )),
    }
}
