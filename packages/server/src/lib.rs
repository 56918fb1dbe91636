// Shop Social - API Core
//
// Backend for generating, reviewing and publishing social media posts for a
// small business. Content comes from an AI generation gateway, goes through a
// human review workflow (pending review -> revision loop -> approved), and is
// delivered to its bound platform by a publishing gateway.
//
// All external collaborators (generation, publishing, archive, persistence)
// sit behind traits in kernel/ and domains/*/store.rs so tests can inject
// fakes.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
