use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub openai_api_key: String,
    /// Endpoint posts are delivered to. Absent means publishing is not
    /// configured and every publish attempt fails with a configuration error.
    pub publish_endpoint: Option<String>,
    /// Google Sheets archive (optional - archive calls become no-ops without it)
    pub sheets_api_key: Option<String>,
    pub sheets_spreadsheet_id: Option<String>,
    /// Timeout applied to every gateway call (generation and publishing)
    pub gateway_timeout_secs: u64,
    /// Cron expression for the recurring generation sweep
    pub schedule_cron: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            openai_api_key: env::var("OPENAI_API_KEY")
                .context("OPENAI_API_KEY must be set")?,
            publish_endpoint: env::var("PUBLISH_ENDPOINT").ok(),
            sheets_api_key: env::var("SHEETS_API_KEY").ok(),
            sheets_spreadsheet_id: env::var("SHEETS_SPREADSHEET_ID").ok(),
            gateway_timeout_secs: env::var("GATEWAY_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .context("GATEWAY_TIMEOUT_SECS must be a valid number")?,
            // Default: every day at 09:00
            schedule_cron: env::var("SCHEDULE_CRON")
                .unwrap_or_else(|_| "0 0 9 * * *".to_string()),
        })
    }
}
