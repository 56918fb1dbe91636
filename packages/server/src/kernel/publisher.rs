// Publishing gateway - delivers approved posts over HTTP
//
// Thin client. The workflow owns retry/failure semantics; any error here is
// surfaced as a uniform publish failure.

use anyhow::{Context, Result};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::Serialize;

use super::BasePublisher;
use crate::domains::platforms::models::Platform;
use crate::domains::posts::models::Post;

#[derive(Debug, Serialize)]
struct PublishRequest<'a> {
    platform: &'a str,
    credential_ref: Option<&'a str>,
    topic: &'a str,
    content: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_b64: Option<String>,
}

/// HTTP implementation of the publishing gateway
#[derive(Clone)]
pub struct HttpPublisher {
    endpoint: Option<String>,
    client: reqwest::Client,
}

impl HttpPublisher {
    pub fn new(endpoint: Option<String>) -> Self {
        Self {
            endpoint,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl BasePublisher for HttpPublisher {
    async fn publish(&self, post: &Post, platform: &Platform) -> Result<()> {
        let endpoint = self
            .endpoint
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("PUBLISH_ENDPOINT is not configured"))?;

        let request = PublishRequest {
            platform: &platform.name,
            credential_ref: platform.credential_ref.as_deref(),
            topic: &post.topic,
            content: &post.content,
            image_b64: post.image.as_ref().map(|bytes| BASE64.encode(bytes)),
        };

        tracing::info!(
            platform = %platform.name,
            post_id = %post.id,
            "Delivering post to publish endpoint"
        );

        let response = self
            .client
            .post(endpoint)
            .json(&request)
            .send()
            .await
            .context("Failed to reach publish endpoint")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Publish endpoint returned {}: {}", status, body);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::PlatformId;

    #[tokio::test]
    async fn publish_without_endpoint_fails() {
        let publisher = HttpPublisher::new(None);
        let platform = Platform::new("Facebook", "Casual tone");
        let post = Post::new("Brakes", "Brake check time.", PlatformId::new());

        let result = publisher.publish(&post, &platform).await;

        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("PUBLISH_ENDPOINT"));
    }
}
