//! Server dependencies for workflow activities (using traits for testability)
//!
//! Central dependency container passed into every activity. All external
//! services and stores sit behind trait objects so tests can substitute
//! fakes.

use std::sync::Arc;
use std::time::Duration;

use crate::domains::platforms::store::PlatformStore;
use crate::domains::posts::store::PostStore;
use crate::domains::settings::store::SettingsStore;
use crate::kernel::traits::{BaseContentGenerator, BasePostArchive, BasePublisher};

/// Dependencies accessible to workflow activities
#[derive(Clone)]
pub struct ServerDeps {
    pub platforms: Arc<dyn PlatformStore>,
    pub posts: Arc<dyn PostStore>,
    pub settings: Arc<dyn SettingsStore>,
    pub generator: Arc<dyn BaseContentGenerator>,
    pub publisher: Arc<dyn BasePublisher>,
    pub archive: Arc<dyn BasePostArchive>,
    /// Applied to every generation and publish call
    pub gateway_timeout: Duration,
}

impl ServerDeps {
    pub fn new(
        platforms: Arc<dyn PlatformStore>,
        posts: Arc<dyn PostStore>,
        settings: Arc<dyn SettingsStore>,
        generator: Arc<dyn BaseContentGenerator>,
        publisher: Arc<dyn BasePublisher>,
        archive: Arc<dyn BasePostArchive>,
        gateway_timeout: Duration,
    ) -> Self {
        Self {
            platforms,
            posts,
            settings,
            generator,
            publisher,
            archive,
            gateway_timeout,
        }
    }
}
