//! Settings endpoints.
//!
//! The wire shape uses lowercase weekday names ("mon".."sun"); the model
//! keeps `chrono::Weekday`. Logo bytes never travel through this surface,
//! a PUT preserves whatever logo is stored.

use axum::extract::Extension;
use axum::Json;
use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::domains::posts::error::WorkflowError;
use crate::domains::settings::models::AppSettings;
use crate::kernel::ServerDeps;
use crate::server::error::ApiResult;

#[derive(Serialize)]
pub struct SettingsResponse {
    pub instructions_doc_url: Option<String>,
    pub tracking_sheet_url: Option<String>,
    pub generator_connected: bool,
    pub active_days: Vec<String>,
    pub topic_overrides: HashMap<String, String>,
    pub default_topic: String,
    pub company_name: String,
    pub business_type: Option<String>,
    pub has_logo: bool,
}

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "mon",
        Weekday::Tue => "tue",
        Weekday::Wed => "wed",
        Weekday::Thu => "thu",
        Weekday::Fri => "fri",
        Weekday::Sat => "sat",
        Weekday::Sun => "sun",
    }
}

fn parse_weekday(s: &str) -> Result<Weekday, WorkflowError> {
    s.parse::<Weekday>()
        .map_err(|_| WorkflowError::configuration(format!("invalid weekday: {s}")))
}

impl From<AppSettings> for SettingsResponse {
    fn from(settings: AppSettings) -> Self {
        // Mon..Sun order, not hash order
        let mut active_days: Vec<Weekday> = settings.active_days.iter().copied().collect();
        active_days.sort_by_key(|d| d.num_days_from_monday());

        Self {
            instructions_doc_url: settings.instructions_doc_url,
            tracking_sheet_url: settings.tracking_sheet_url,
            generator_connected: settings.generator_connected,
            active_days: active_days
                .into_iter()
                .map(|d| weekday_name(d).to_string())
                .collect(),
            topic_overrides: settings
                .topic_overrides
                .into_iter()
                .map(|(day, topic)| (weekday_name(day).to_string(), topic))
                .collect(),
            default_topic: settings.default_topic,
            company_name: settings.company_name,
            business_type: settings.business_type,
            has_logo: settings.logo.is_some(),
        }
    }
}

pub async fn get_settings_handler(
    Extension(deps): Extension<ServerDeps>,
) -> ApiResult<Json<SettingsResponse>> {
    let settings = deps
        .settings
        .get_or_default()
        .await
        .map_err(WorkflowError::persistence)?;
    Ok(Json(settings.into()))
}

#[derive(Deserialize)]
pub struct SettingsRequest {
    pub instructions_doc_url: Option<String>,
    pub tracking_sheet_url: Option<String>,
    #[serde(default)]
    pub generator_connected: bool,
    pub active_days: Vec<String>,
    #[serde(default)]
    pub topic_overrides: HashMap<String, String>,
    pub default_topic: String,
    pub company_name: String,
    pub business_type: Option<String>,
}

pub async fn put_settings_handler(
    Extension(deps): Extension<ServerDeps>,
    Json(request): Json<SettingsRequest>,
) -> ApiResult<Json<SettingsResponse>> {
    let mut active_days = HashSet::new();
    for day in &request.active_days {
        active_days.insert(parse_weekday(day)?);
    }

    let mut topic_overrides = HashMap::new();
    for (day, topic) in request.topic_overrides {
        topic_overrides.insert(parse_weekday(&day)?, topic);
    }

    let current = deps
        .settings
        .get_or_default()
        .await
        .map_err(WorkflowError::persistence)?;

    let settings = AppSettings {
        instructions_doc_url: request.instructions_doc_url,
        tracking_sheet_url: request.tracking_sheet_url,
        generator_connected: request.generator_connected,
        active_days,
        topic_overrides,
        default_topic: request.default_topic,
        logo: current.logo,
        company_name: request.company_name,
        business_type: request.business_type,
    };

    deps.settings
        .put(settings.clone())
        .await
        .map_err(WorkflowError::persistence)?;

    Ok(Json(settings.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn active_days_serialize_in_week_order() {
        let settings = AppSettings::default();
        let response = SettingsResponse::from(settings);
        assert_eq!(response.active_days, vec!["mon", "wed", "fri"]);
    }

    #[test]
    fn unknown_weekday_is_rejected() {
        assert!(parse_weekday("mon").is_ok());
        assert!(parse_weekday("someday").is_err());
    }
}
