//! Player configuration
//!
//! [`Config::default`] is an immutable template: every player resolves its own
//! copy and applies [`ConfigOverrides`] on top, so no instance can leak settings
//! into another.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::i18n::I18n;

/// Sprite published with release builds
pub const RELEASE_ICON_URL: &str = "https://unpkg.com/@mando212/better-player/dist/better-player.svg";

/// Sprite served next to the page during development
pub const DEV_ICON_URL: &str = "better-player.svg";

/// Resolved configuration of one player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Media URL, including its extension
    pub source: String,
    /// Toggle playback by clicking the video
    pub click_to_play: bool,
    /// Enable keyboard shortcuts
    pub keyboard: bool,
    /// Seconds skipped by the arrow-key shortcuts
    pub seek_time: f64,
    /// Volume change applied by the arrow-key shortcuts
    pub volume_step: f64,
    pub i18n: I18n,
    pub icon_url: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
    /// Id of the element the player is appended to
    pub parent_id: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: String::new(),
            click_to_play: true,
            keyboard: true,
            seek_time: 5.0,
            volume_step: 0.1,
            i18n: I18n::default(),
            icon_url: if cfg!(debug_assertions) {
                DEV_ICON_URL.to_string()
            } else {
                RELEASE_ICON_URL.to_string()
            },
            width: None,
            height: None,
            parent_id: None,
        }
    }
}

/// Embedder-supplied options; every field is optional
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigOverrides {
    pub source: Option<String>,
    pub click_to_play: Option<bool>,
    pub keyboard: Option<bool>,
    pub seek_time: Option<f64>,
    pub volume_step: Option<f64>,
    pub i18n: Option<I18nOverrides>,
    pub icon_url: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub parent_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct I18nOverrides {
    pub not_support_video_format: Option<String>,
    pub not_found_video: Option<String>,
}

impl ConfigOverrides {
    /// Overrides that only set the media source
    pub fn source(source: impl Into<String>) -> Self {
        Self {
            source: Some(source.into()),
            ..Default::default()
        }
    }
}

impl Config {
    /// Apply `overrides` to a fresh copy of the defaults
    pub fn resolve(overrides: ConfigOverrides) -> Result<Self> {
        let mut config = Self::default();

        if let Some(source) = overrides.source {
            config.source = source;
        }
        if let Some(click_to_play) = overrides.click_to_play {
            config.click_to_play = click_to_play;
        }
        if let Some(keyboard) = overrides.keyboard {
            config.keyboard = keyboard;
        }
        if let Some(seek_time) = overrides.seek_time {
            config.seek_time = seek_time;
        }
        if let Some(volume_step) = overrides.volume_step {
            config.volume_step = volume_step;
        }
        if let Some(i18n) = overrides.i18n {
            if let Some(text) = i18n.not_support_video_format {
                config.i18n.not_support_video_format = text;
            }
            if let Some(text) = i18n.not_found_video {
                config.i18n.not_found_video = text;
            }
        }
        if let Some(icon_url) = overrides.icon_url {
            config.icon_url = icon_url;
        }
        config.width = overrides.width.or(config.width);
        config.height = overrides.height.or(config.height);
        config.parent_id = overrides.parent_id.or(config.parent_id);

        config.validate()?;
        Ok(config)
    }

    /// Parse overrides from JSON and resolve them
    pub fn from_json(json: &str) -> Result<Self> {
        let overrides: ConfigOverrides = serde_json::from_str(json)?;
        Self::resolve(overrides)
    }

    /// Reject tuning values the shortcuts cannot use
    pub fn validate(&self) -> Result<()> {
        if !self.seek_time.is_finite() || self.seek_time < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "seekTime must be a non-negative number, got {}",
                self.seek_time
            )));
        }
        if !self.volume_step.is_finite() || !(0.0..=1.0).contains(&self.volume_step) {
            return Err(Error::InvalidConfig(format!(
                "volumeStep must be between 0 and 1, got {}",
                self.volume_step
            )));
        }
        Ok(())
    }
}
