// TestDependencies - mock implementations for testing
//
// Provides mock gateways that can be injected into ServerDeps for tests.
// Mocks record every call and pop queued responses, falling back to a
// canned default when the queue is empty.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

use super::{ArchivedPost, BaseContentGenerator, BasePostArchive, BasePublisher, ServerDeps};
use crate::common::PostId;
use crate::domains::platforms::models::Platform;
use crate::domains::platforms::store::InMemoryPlatformStore;
use crate::domains::posts::models::{Post, RecentPost};
use crate::domains::posts::store::InMemoryPostStore;
use crate::domains::settings::store::InMemorySettingsStore;

// =============================================================================
// Mock Content Generator
// =============================================================================

/// Arguments captured from a generate_text call
#[derive(Debug, Clone)]
pub struct TextCall {
    pub platform: String,
    pub topic: String,
    pub recent_topics: Vec<String>,
}

pub struct MockContentGenerator {
    text_responses: Mutex<Vec<Result<String, String>>>,
    refine_responses: Mutex<Vec<Result<String, String>>>,
    image_fails: Mutex<bool>,
    stall_text: Mutex<bool>,
    text_calls: Mutex<Vec<TextCall>>,
    refine_calls: Mutex<Vec<(PostId, String)>>,
    image_calls: Mutex<Vec<PostId>>,
}

impl MockContentGenerator {
    pub fn new() -> Self {
        Self {
            text_responses: Mutex::new(Vec::new()),
            refine_responses: Mutex::new(Vec::new()),
            image_fails: Mutex::new(false),
            stall_text: Mutex::new(false),
            text_calls: Mutex::new(Vec::new()),
            refine_calls: Mutex::new(Vec::new()),
            image_calls: Mutex::new(Vec::new()),
        }
    }

    /// Queue a text generation response
    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.text_responses.lock().unwrap().push(Ok(text.into()));
        self
    }

    /// Queue a text generation failure
    pub fn with_text_error(self, msg: impl Into<String>) -> Self {
        self.text_responses.lock().unwrap().push(Err(msg.into()));
        self
    }

    /// Queue a refine response
    pub fn with_refined(self, text: impl Into<String>) -> Self {
        self.refine_responses.lock().unwrap().push(Ok(text.into()));
        self
    }

    /// Queue a refine failure
    pub fn with_refine_error(self, msg: impl Into<String>) -> Self {
        self.refine_responses.lock().unwrap().push(Err(msg.into()));
        self
    }

    /// Make every image generation fail
    pub fn failing_images(self) -> Self {
        *self.image_fails.lock().unwrap() = true;
        self
    }

    /// Make generate_text hang forever (for timeout tests)
    pub fn stalled(self) -> Self {
        *self.stall_text.lock().unwrap() = true;
        self
    }

    /// All generate_text calls with their arguments
    pub fn text_calls(&self) -> Vec<TextCall> {
        self.text_calls.lock().unwrap().clone()
    }

    /// All refine calls as (post id, feedback)
    pub fn refine_calls(&self) -> Vec<(PostId, String)> {
        self.refine_calls.lock().unwrap().clone()
    }

    /// All generate_image calls
    pub fn image_calls(&self) -> Vec<PostId> {
        self.image_calls.lock().unwrap().clone()
    }
}

impl Default for MockContentGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseContentGenerator for MockContentGenerator {
    async fn generate_text(
        &self,
        platform: &Platform,
        topic: &str,
        recent: &[RecentPost],
    ) -> Result<String> {
        self.text_calls.lock().unwrap().push(TextCall {
            platform: platform.name.clone(),
            topic: topic.to_string(),
            recent_topics: recent.iter().map(|r| r.topic.clone()).collect(),
        });

        if *self.stall_text.lock().unwrap() {
            std::future::pending::<()>().await;
        }

        let mut responses = self.text_responses.lock().unwrap();
        if !responses.is_empty() {
            responses.remove(0).map_err(|e| anyhow::anyhow!(e))
        } else {
            Ok("Mock generated content".to_string())
        }
    }

    async fn generate_image(&self, post: &Post, _platform: &Platform) -> Result<Vec<u8>> {
        self.image_calls.lock().unwrap().push(post.id);

        if *self.image_fails.lock().unwrap() {
            anyhow::bail!("mock image generation failure");
        }
        Ok(vec![0x89, 0x50, 0x4e, 0x47])
    }

    async fn refine(&self, post: &Post, feedback: &str) -> Result<String> {
        self.refine_calls
            .lock()
            .unwrap()
            .push((post.id, feedback.to_string()));

        let mut responses = self.refine_responses.lock().unwrap();
        if !responses.is_empty() {
            responses.remove(0).map_err(|e| anyhow::anyhow!(e))
        } else {
            Ok("Mock revised content".to_string())
        }
    }
}

// =============================================================================
// Mock Publisher
// =============================================================================

pub struct MockPublisher {
    fail_all: Mutex<bool>,
    fail_next: Mutex<bool>,
    fail_topics: Mutex<HashSet<String>>,
    gate: Mutex<Option<Arc<Notify>>>,
    calls: Mutex<Vec<PostId>>,
}

impl MockPublisher {
    pub fn new() -> Self {
        Self {
            fail_all: Mutex::new(false),
            fail_next: Mutex::new(false),
            fail_topics: Mutex::new(HashSet::new()),
            gate: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Every publish fails
    pub fn failing(self) -> Self {
        *self.fail_all.lock().unwrap() = true;
        self
    }

    /// Only the next publish fails
    pub fn failing_once(self) -> Self {
        *self.fail_next.lock().unwrap() = true;
        self
    }

    /// Publishes of posts with this topic fail (deterministic under fan-out)
    pub fn with_failure_for_topic(self, topic: impl Into<String>) -> Self {
        self.fail_topics.lock().unwrap().insert(topic.into());
        self
    }

    /// Block every publish until the notify fires, so a test can hold the
    /// workflow inside the gateway call
    pub fn gated(self, gate: Arc<Notify>) -> Self {
        *self.gate.lock().unwrap() = Some(gate);
        self
    }

    /// All post IDs that were submitted for delivery
    pub fn calls(&self) -> Vec<PostId> {
        self.calls.lock().unwrap().clone()
    }

    pub fn was_called_for(&self, post_id: PostId) -> bool {
        self.calls.lock().unwrap().contains(&post_id)
    }
}

impl Default for MockPublisher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BasePublisher for MockPublisher {
    async fn publish(&self, post: &Post, _platform: &Platform) -> Result<()> {
        self.calls.lock().unwrap().push(post.id);

        let gate = self.gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        if *self.fail_all.lock().unwrap() {
            anyhow::bail!("mock publish failure");
        }
        {
            let mut fail_next = self.fail_next.lock().unwrap();
            if *fail_next {
                *fail_next = false;
                anyhow::bail!("mock publish failure (once)");
            }
        }
        if self.fail_topics.lock().unwrap().contains(&post.topic) {
            anyhow::bail!("mock publish failure for topic {}", post.topic);
        }
        Ok(())
    }
}

// =============================================================================
// Mock Post Archive
// =============================================================================

pub struct MockPostArchive {
    rules: Mutex<HashMap<String, String>>,
    duplicate_topics: Mutex<HashSet<String>>,
    recent: Mutex<Vec<ArchivedPost>>,
    appended: Mutex<Vec<(String, String)>>,
}

impl MockPostArchive {
    pub fn new() -> Self {
        Self {
            rules: Mutex::new(HashMap::new()),
            duplicate_topics: Mutex::new(HashSet::new()),
            recent: Mutex::new(Vec::new()),
            appended: Mutex::new(Vec::new()),
        }
    }

    /// Add a formatting rule override for a platform
    pub fn with_rule(self, platform: impl Into<String>, text: impl Into<String>) -> Self {
        self.rules.lock().unwrap().insert(platform.into(), text.into());
        self
    }

    /// Mark a topic as already covered
    pub fn with_duplicate(self, topic: impl Into<String>) -> Self {
        self.duplicate_topics.lock().unwrap().insert(topic.into());
        self
    }

    /// Add an archived summary to the readable history
    pub fn with_summary(self, platform: impl Into<String>, topic: impl Into<String>) -> Self {
        self.recent.lock().unwrap().push(ArchivedPost {
            platform: platform.into(),
            topic: topic.into(),
            posted_at: Utc::now(),
        });
        self
    }

    /// (platform, topic) pairs appended by publishes
    pub fn appended(&self) -> Vec<(String, String)> {
        self.appended.lock().unwrap().clone()
    }
}

impl Default for MockPostArchive {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BasePostArchive for MockPostArchive {
    async fn formatting_rules(&self) -> Result<HashMap<String, String>> {
        Ok(self.rules.lock().unwrap().clone())
    }

    async fn is_duplicate_topic(&self, topic: &str) -> Result<bool> {
        Ok(self.duplicate_topics.lock().unwrap().contains(topic))
    }

    async fn append_summary(
        &self,
        platform: &str,
        topic: &str,
        _posted_at: DateTime<Utc>,
    ) -> Result<()> {
        self.appended
            .lock()
            .unwrap()
            .push((platform.to_string(), topic.to_string()));
        Ok(())
    }

    async fn recent_summaries(&self, limit: usize, offset: usize) -> Result<Vec<ArchivedPost>> {
        Ok(self
            .recent
            .lock()
            .unwrap()
            .iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }
}

// =============================================================================
// TestDependencies - Builder for test dependencies
// =============================================================================

#[derive(Clone)]
pub struct TestDependencies {
    pub platforms: Arc<InMemoryPlatformStore>,
    pub posts: Arc<InMemoryPostStore>,
    pub settings: Arc<InMemorySettingsStore>,
    pub generator: Arc<MockContentGenerator>,
    pub publisher: Arc<MockPublisher>,
    pub archive: Arc<MockPostArchive>,
    gateway_timeout: Duration,
}

impl TestDependencies {
    pub fn new() -> Self {
        Self {
            platforms: Arc::new(InMemoryPlatformStore::new()),
            posts: Arc::new(InMemoryPostStore::new()),
            settings: Arc::new(InMemorySettingsStore::new()),
            generator: Arc::new(MockContentGenerator::new()),
            publisher: Arc::new(MockPublisher::new()),
            archive: Arc::new(MockPostArchive::new()),
            gateway_timeout: Duration::from_secs(5),
        }
    }

    /// Override the gateway timeout (defaults to 5s)
    pub fn gateway_timeout(mut self, timeout: Duration) -> Self {
        self.gateway_timeout = timeout;
        self
    }

    /// Set a mock content generator
    pub fn mock_generator(mut self, generator: MockContentGenerator) -> Self {
        self.generator = Arc::new(generator);
        self
    }

    /// Set a mock publisher
    pub fn mock_publisher(mut self, publisher: MockPublisher) -> Self {
        self.publisher = Arc::new(publisher);
        self
    }

    /// Set a mock archive
    pub fn mock_archive(mut self, archive: MockPostArchive) -> Self {
        self.archive = Arc::new(archive);
        self
    }

    /// Store a platform and hand it back for the test to use
    pub async fn seed_platform(&self, deps: &ServerDeps, platform: Platform) -> Platform {
        deps.platforms
            .upsert(platform.clone())
            .await
            .expect("seed platform");
        platform
    }

    /// Convert into ServerDeps for the code under test
    pub fn into_deps(self) -> ServerDeps {
        ServerDeps::new(
            self.platforms,
            self.posts,
            self.settings,
            self.generator,
            self.publisher,
            self.archive,
            self.gateway_timeout,
        )
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}
