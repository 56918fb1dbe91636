// Business domains
pub mod platforms;
pub mod posts;
pub mod settings;
