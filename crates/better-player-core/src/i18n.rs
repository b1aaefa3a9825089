//! User-facing messages with per-player overrides

use serde::{Deserialize, Serialize};

use crate::config::Config;

/// Message table. Empty entries fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct I18n {
    pub not_support_video_format: String,
    pub not_found_video: String,
}

impl Default for I18n {
    fn default() -> Self {
        Self {
            not_support_video_format:
                "This video format is not supported by your browser. Please try another browser."
                    .to_string(),
            not_found_video: "The video could not be found. Press the button below to reload it."
                .to_string(),
        }
    }
}

/// Message identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKey {
    NotSupportVideoFormat,
    NotFoundVideo,
}

impl I18n {
    fn lookup(&self, key: MessageKey) -> &str {
        match key {
            MessageKey::NotSupportVideoFormat => &self.not_support_video_format,
            MessageKey::NotFoundVideo => &self.not_found_video,
        }
    }
}

/// Look up `key` in the player's messages, falling back to the default text
pub fn message(config: &Config, key: MessageKey) -> String {
    let text = config.i18n.lookup(key);
    if text.is_empty() {
        I18n::default().lookup(key).to_string()
    } else {
        text.to_string()
    }
}
