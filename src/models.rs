// Core data structures for bannerwheel

use serde::{Deserialize, Serialize};

/// A single promotable banner item
///
/// Field names follow the feed wire format (`buttonText`, `bgColor`).
/// Optional attribution lines are omitted from JSON when absent and
/// accept either a missing key or `null` when decoding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ad {
    pub title: String,
    pub subtitle: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructor: Option<String>, // e.g. "講師: 七星恵一"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    pub button_text: String,
    pub bg_color: String, // CSS color token, e.g. "#4ECDC4"
}

impl Ad {
    /// Create an ad without attribution lines
    pub fn new(
        title: impl Into<String>,
        subtitle: impl Into<String>,
        description: impl Into<String>,
        button_text: impl Into<String>,
        bg_color: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            subtitle: subtitle.into(),
            description: description.into(),
            instructor: None,
            company: None,
            button_text: button_text.into(),
            bg_color: bg_color.into(),
        }
    }

    /// Attach an instructor line
    #[must_use]
    pub fn with_instructor(mut self, instructor: impl Into<String>) -> Self {
        self.instructor = Some(instructor.into());
        self
    }

    /// Attach a company line
    #[must_use]
    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = Some(company.into());
        self
    }
}

/// The random subset of ads produced for one feed request
pub type Selection = Vec<Ad>;
