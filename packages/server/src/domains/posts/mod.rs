pub mod activities;
pub mod error;
pub mod models;
pub mod store;

pub use error::{WorkflowError, WorkflowResult};
pub use models::{Post, PostStatus, RecentPost};
pub use store::{InMemoryPostStore, PostStore};
