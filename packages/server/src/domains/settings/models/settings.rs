use chrono::Weekday;
use std::collections::{HashMap, HashSet};

/// Application-wide settings. Exactly zero or one instance exists; the
/// settings store creates the defaults on first access.
#[derive(Debug, Clone, PartialEq)]
pub struct AppSettings {
    /// External document with standing generation instructions
    pub instructions_doc_url: Option<String>,
    /// External sheet tracking published posts
    pub tracking_sheet_url: Option<String>,
    /// Whether the generation provider has been connected
    pub generator_connected: bool,
    /// Weekdays on which the recurring sweep generates content
    pub active_days: HashSet<Weekday>,
    /// Per-weekday topic overrides; missing entries fall back to the default
    pub topic_overrides: HashMap<Weekday, String>,
    pub default_topic: String,
    // Branding
    pub logo: Option<Vec<u8>>,
    pub company_name: String,
    pub business_type: Option<String>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            instructions_doc_url: None,
            tracking_sheet_url: None,
            generator_connected: false,
            active_days: HashSet::from([Weekday::Mon, Weekday::Wed, Weekday::Fri]),
            topic_overrides: HashMap::new(),
            default_topic: "Automotive maintenance tips".to_string(),
            logo: None,
            company_name: "Automotive Repair Shop".to_string(),
            business_type: None,
        }
    }
}

impl AppSettings {
    /// Topic for a given weekday: the override if one exists, otherwise the
    /// configured default.
    pub fn topic_for(&self, day: Weekday) -> &str {
        self.topic_overrides
            .get(&day)
            .map(String::as_str)
            .unwrap_or(&self.default_topic)
    }

    /// Whether the recurring sweep should generate content on this day.
    pub fn is_active_day(&self, day: Weekday) -> bool {
        self.active_days.contains(&day)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_first_run_expectations() {
        let settings = AppSettings::default();
        assert_eq!(settings.company_name, "Automotive Repair Shop");
        assert_eq!(settings.default_topic, "Automotive maintenance tips");
        assert_eq!(
            settings.active_days,
            HashSet::from([Weekday::Mon, Weekday::Wed, Weekday::Fri])
        );
        assert!(settings.topic_overrides.is_empty());
        assert!(!settings.generator_connected);
    }

    #[test]
    fn topic_falls_back_to_default() {
        let mut settings = AppSettings::default();
        settings
            .topic_overrides
            .insert(Weekday::Mon, "Winter tire specials".to_string());

        assert_eq!(settings.topic_for(Weekday::Mon), "Winter tire specials");
        assert_eq!(
            settings.topic_for(Weekday::Wed),
            "Automotive maintenance tips"
        );
    }

    #[test]
    fn active_day_check() {
        let settings = AppSettings::default();
        assert!(settings.is_active_day(Weekday::Fri));
        assert!(!settings.is_active_day(Weekday::Sun));
    }
}
