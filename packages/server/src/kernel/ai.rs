// Content generation using OpenAI
//
// This is the infrastructure implementation of BaseContentGenerator.
// The review workflow decides when to generate; this module only builds
// prompts and talks to the provider.

use anyhow::{Context, Result};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use rig::completion::Prompt;
use rig::providers::openai;
use serde::{Deserialize, Serialize};

use super::BaseContentGenerator;
use crate::domains::platforms::models::Platform;
use crate::domains::posts::models::{Post, RecentPost};

const IMAGE_MODEL: &str = "dall-e-3";

#[derive(Debug, Serialize)]
struct ImageRequest {
    model: String,
    prompt: String,
    n: u8,
    size: String,
    response_format: String,
}

#[derive(Debug, Deserialize)]
struct ImageResponse {
    data: Vec<ImageData>,
}

#[derive(Debug, Deserialize)]
struct ImageData {
    b64_json: String,
}

/// OpenAI implementation of the content generation gateway
#[derive(Clone)]
pub struct OpenAIClient {
    client: openai::Client,
    api_key: String,
    http: reqwest::Client,
}

impl OpenAIClient {
    pub fn new(api_key: String) -> Self {
        let client = openai::Client::new(&api_key);
        Self {
            client,
            api_key,
            http: reqwest::Client::new(),
        }
    }

    async fn complete(&self, preamble: &str, prompt: &str) -> Result<String> {
        let agent = self
            .client
            .agent(openai::GPT_4O)
            .preamble(preamble)
            .max_tokens(2048)
            .build();

        tracing::debug!(prompt_length = prompt.len(), "Calling OpenAI completion");

        let response = agent
            .prompt(prompt)
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    prompt_preview = %prompt.chars().take(200).collect::<String>(),
                    "OpenAI completion failed"
                );
                e
            })
            .context("Failed to call OpenAI API")?;

        Ok(response)
    }
}

/// Prompt for fresh content. Recent topics go into the prompt so the model
/// can steer away from repeats.
pub fn build_generation_prompt(platform: &Platform, topic: &str, recent: &[RecentPost]) -> String {
    let mut prompt = format!(
        "Write a social media post for {} about: {}\n\nFormat requirements: {}\n",
        platform.name, topic, platform.format_requirements
    );
    if !recent.is_empty() {
        prompt.push_str("\nRecently covered topics - do not repeat these:\n");
        for r in recent {
            if r.excerpt.is_empty() {
                prompt.push_str(&format!("- {}\n", r.topic));
            } else {
                prompt.push_str(&format!("- {} ({})\n", r.topic, r.excerpt));
            }
        }
    }
    prompt.push_str("\nReturn only the post text, no commentary.");
    prompt
}

/// Prompt for a revision pass over existing content.
pub fn build_refine_prompt(post: &Post, feedback: &str) -> String {
    format!(
        "Revise the following social media post.\n\nOriginal post:\n{}\n\nReviewer feedback:\n{}\n\nReturn only the revised post text, no commentary.",
        post.content, feedback
    )
}

/// Prompt for an accompanying image.
pub fn build_image_prompt(post: &Post, platform: &Platform) -> String {
    format!(
        "A professional social media image for an automotive repair shop's {} post about: {}. No text in the image.",
        platform.name, post.topic
    )
}

#[async_trait]
impl BaseContentGenerator for OpenAIClient {
    async fn generate_text(
        &self,
        platform: &Platform,
        topic: &str,
        recent: &[RecentPost],
    ) -> Result<String> {
        let prompt = build_generation_prompt(platform, topic, recent);
        self.complete(
            "You are a social media copywriter for a small automotive repair shop.",
            &prompt,
        )
        .await
    }

    async fn generate_image(&self, post: &Post, platform: &Platform) -> Result<Vec<u8>> {
        let request = ImageRequest {
            model: IMAGE_MODEL.to_string(),
            prompt: build_image_prompt(post, platform),
            n: 1,
            size: "1024x1024".to_string(),
            response_format: "b64_json".to_string(),
        };

        let response = self
            .http
            .post("https://api.openai.com/v1/images/generations")
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .context("Failed to send image generation request")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("OpenAI image API error {}: {}", status, body);
        }

        let image_response: ImageResponse = response
            .json()
            .await
            .context("Failed to parse image response")?;

        let first = image_response
            .data
            .first()
            .ok_or_else(|| anyhow::anyhow!("No image returned"))?;

        BASE64
            .decode(&first.b64_json)
            .context("Failed to decode image payload")
    }

    async fn refine(&self, post: &Post, feedback: &str) -> Result<String> {
        let prompt = build_refine_prompt(post, feedback);
        self.complete(
            "You are a social media copywriter revising a post from reviewer feedback.",
            &prompt,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::PlatformId;

    #[test]
    fn generation_prompt_carries_format_and_recent_topics() {
        let platform = Platform::new("X", "Max 280 characters");
        let recent = vec![
            RecentPost {
                topic: "Oil changes".to_string(),
                excerpt: "Change your oil".to_string(),
            },
            RecentPost {
                topic: "Winter tires".to_string(),
                excerpt: String::new(),
            },
        ];

        let prompt = build_generation_prompt(&platform, "Brake safety", &recent);

        assert!(prompt.contains("Brake safety"));
        assert!(prompt.contains("Max 280 characters"));
        assert!(prompt.contains("Oil changes"));
        assert!(prompt.contains("Winter tires"));
    }

    #[test]
    fn refine_prompt_carries_original_and_feedback() {
        let post = Post::new("Brakes", "Squeaky brakes? Come see us.", PlatformId::new());
        let prompt = build_refine_prompt(&post, "Mention the free inspection");

        assert!(prompt.contains("Squeaky brakes? Come see us."));
        assert!(prompt.contains("Mention the free inspection"));
    }
}
