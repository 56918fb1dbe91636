use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::common::PlatformId;

/// Platform - a social media destination posts can target.
///
/// Platforms are seeded from a fixed default set on first run and never
/// hard-deleted in normal flow; deactivating one stops new content from
/// being generated for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Platform {
    pub id: PlatformId,
    pub name: String,
    /// Whether new content should be generated for this platform
    pub active: bool,
    /// Free-text format requirements fed to the generation prompt
    pub format_requirements: String,
    /// Opaque reference to stored credentials. Publishing requires one.
    pub credential_ref: Option<String>,
    /// Timestamp of the last successful publish to this platform
    pub last_post_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Platform {
    pub fn new(name: impl Into<String>, format_requirements: impl Into<String>) -> Self {
        Self {
            id: PlatformId::new(),
            name: name.into(),
            active: true,
            format_requirements: format_requirements.into(),
            credential_ref: None,
            last_post_at: None,
            created_at: Utc::now(),
        }
    }

    /// Whether posts for this platform should carry a generated image.
    ///
    /// Decided from the free-text format requirements: a platform whose
    /// requirements mention an image gets one.
    pub fn requires_image(&self) -> bool {
        self.format_requirements.to_lowercase().contains("image")
    }

    /// The default set created at first run.
    pub fn default_set() -> Vec<Self> {
        vec![
            Platform::new(
                "Facebook",
                "Conversational tone, 1-3 short paragraphs, include an image",
            ),
            Platform::new(
                "Instagram",
                "Caption under 150 words, heavy on hashtags, always include an image",
            ),
            Platform::new("X", "Max 280 characters, punchy, 1-2 hashtags"),
            Platform::new(
                "LinkedIn",
                "Professional tone, 2-4 paragraphs, light on hashtags",
            ),
            Platform::new(
                "Google Business Profile",
                "Short update, plain language, include a call to action",
            ),
        ]
    }
}

/// Partial update applied to a platform. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, TypedBuilder)]
#[builder(field_defaults(default))]
pub struct UpdatePlatformParams {
    pub name: Option<String>,
    pub active: Option<bool>,
    pub format_requirements: Option<String>,
    /// `Some(None)` clears the credential, `Some(Some(_))` replaces it
    pub credential_ref: Option<Option<String>>,
}

impl Platform {
    pub fn apply(&mut self, params: UpdatePlatformParams) {
        if let Some(name) = params.name {
            self.name = name;
        }
        if let Some(active) = params.active {
            self.active = active;
        }
        if let Some(format_requirements) = params.format_requirements {
            self.format_requirements = format_requirements;
        }
        if let Some(credential_ref) = params.credential_ref {
            self.credential_ref = credential_ref;
        }
    }
}
