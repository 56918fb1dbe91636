pub mod platform;

pub use platform::{Platform, UpdatePlatformParams};
