//! Infrastructure kernel: dependency container, gateway traits, and their
//! production implementations. Business rules live in domains/; everything
//! here only talks to the outside world.

pub mod ai;
pub mod deps;
pub mod publisher;
pub mod scheduled_tasks;
pub mod sheets;
pub mod test_dependencies;
pub mod traits;

pub use ai::OpenAIClient;
pub use deps::ServerDeps;
pub use publisher::HttpPublisher;
pub use sheets::{NullArchive, SheetsArchive};
pub use test_dependencies::TestDependencies;
pub use traits::{ArchivedPost, BaseContentGenerator, BasePostArchive, BasePublisher};
