pub mod activities;
pub mod models;
pub mod store;

pub use models::{Platform, UpdatePlatformParams};
pub use store::{InMemoryPlatformStore, PlatformStore};
