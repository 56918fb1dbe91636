pub mod health;
pub mod platforms;
pub mod posts;
pub mod settings;

pub use health::health_handler;
pub use platforms::{create_platform_handler, list_platforms_handler, update_platform_handler};
pub use posts::{
    approve_handler, delete_post_handler, feedback_handler, generate_post_handler,
    get_post_handler, list_posts_handler, publish_approved_handler,
};
pub use settings::{get_settings_handler, put_settings_handler};
