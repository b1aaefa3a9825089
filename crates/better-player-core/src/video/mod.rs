//! Media backends
//!
//! A backend drives actual playback and reports low-level events on its own
//! [`EventBus`] using the `video:*` names. The core selects one backend per
//! player through [`VideoFactory`]:
//!
//! - [`HtmlVideo`] wraps a platform media element ([`MediaElement`])
//! - [`NoVideo`] is the terminal fallback when nothing can play the source

mod factory;
mod html;
pub mod mime;
mod none;

use serde::{Deserialize, Serialize};
use std::rc::Rc;

use crate::config::Config;
use crate::events::EventBus;
use crate::host::Scheduler;

pub use factory::VideoFactory;
pub use html::{HtmlVideo, HtmlVideoBackend, MediaCapabilities, MediaElement};
pub use none::NoVideo;

/// Payload of [`names::VIDEO_ERROR`](crate::events::names::VIDEO_ERROR)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoError {
    /// User-facing message
    pub message: String,
}

impl VideoError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Playback commands and state accessors of a media backend.
///
/// Defaults describe a backend that cannot play anything.
pub trait Video {
    /// Bus carrying the backend's `video:*` events
    fn events(&self) -> &EventBus;

    fn name(&self) -> &'static str;

    /// Whether this backend can actually play media
    fn can_play(&self) -> bool {
        false
    }

    fn is_paused(&self) -> bool {
        true
    }

    /// Total length in seconds; NaN while unknown or for live streams
    fn duration(&self) -> f64 {
        f64::NAN
    }

    /// Playback position in seconds
    fn current_time(&self) -> f64 {
        0.0
    }

    /// Volume between 0 and 1
    fn volume(&self) -> f64 {
        1.0
    }

    fn play(&self) {}

    fn pause(&self) {}

    /// Seek to `time` seconds
    fn seek(&self, _time: f64) {}

    /// Set volume; values outside 0..=1 are clamped
    fn set_volume(&self, _volume: f64) {}

    fn mute(&self) {}

    /// Restore the volume used before muting
    fn unmute(&self) {}

    /// Reload the configured source without replacing the backend
    fn reload(&self) {}

    /// Release the media resource and every listener
    fn destroy(&self);
}

/// A backend type the factory can probe and instantiate
pub trait VideoBackend {
    fn name(&self) -> &'static str;

    /// Whether this backend can play `source`
    fn can_play_type(&self, source: &str) -> bool;

    fn create(&self, config: &Rc<Config>, scheduler: &Rc<dyn Scheduler>) -> Rc<dyn Video>;
}
