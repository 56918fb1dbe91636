//! Settings repository seam. At most one `AppSettings` exists process-wide;
//! the first read creates the defaults.

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;

use super::models::AppSettings;

#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// The singleton settings, created with defaults on first access.
    async fn get_or_default(&self) -> Result<AppSettings>;

    /// Replace the singleton (atomic, last write wins).
    async fn put(&self, settings: AppSettings) -> Result<()>;
}

/// In-memory settings store.
#[derive(Default)]
pub struct InMemorySettingsStore {
    inner: RwLock<Option<AppSettings>>,
}

impl InMemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SettingsStore for InMemorySettingsStore {
    async fn get_or_default(&self) -> Result<AppSettings> {
        let mut guard = self.inner.write().await;
        Ok(guard.get_or_insert_with(AppSettings::default).clone())
    }

    async fn put(&self, settings: AppSettings) -> Result<()> {
        *self.inner.write().await = Some(settings);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn first_access_creates_defaults() {
        let store = InMemorySettingsStore::new();
        let settings = store.get_or_default().await.unwrap();
        assert_eq!(settings.company_name, "Automotive Repair Shop");
    }

    #[tokio::test]
    async fn put_replaces_singleton() {
        let store = InMemorySettingsStore::new();
        let mut settings = store.get_or_default().await.unwrap();
        settings.default_topic = "Brake service specials".to_string();
        store.put(settings.clone()).await.unwrap();

        assert_eq!(store.get_or_default().await.unwrap(), settings);
    }
}
