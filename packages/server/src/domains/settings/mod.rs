pub mod models;
pub mod store;

pub use models::AppSettings;
pub use store::{InMemorySettingsStore, SettingsStore};
