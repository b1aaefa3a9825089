//! `HTMLVideoElement` behind the core's media element seam

use better_player_core::{MediaCapabilities, MediaElement};
use tracing::debug;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::HtmlVideoElement;

/// The page's `<video>` element
#[derive(Clone)]
pub struct VideoElement(pub HtmlVideoElement);

impl MediaElement for VideoElement {
    fn set_source(&self, source: &str) {
        self.0.set_src(source);
    }

    fn clear_source(&self) {
        if let Err(err) = self.0.remove_attribute("src") {
            debug!(?err, "failed to clear video source");
        }
    }

    fn load(&self) {
        self.0.load();
    }

    fn play(&self) {
        match self.0.play() {
            // rejected when interrupted by pause() or blocked by autoplay policy
            Ok(promise) => spawn_local(async move {
                if let Err(err) = JsFuture::from(promise).await {
                    debug!(?err, "play() rejected");
                }
            }),
            Err(err) => debug!(?err, "play() threw"),
        }
    }

    fn pause(&self) {
        if let Err(err) = self.0.pause() {
            debug!(?err, "pause() threw");
        }
    }

    fn paused(&self) -> bool {
        self.0.paused()
    }

    fn duration(&self) -> f64 {
        self.0.duration()
    }

    fn current_time(&self) -> f64 {
        self.0.current_time()
    }

    fn set_current_time(&self, time: f64) {
        self.0.set_current_time(time);
    }

    fn volume(&self) -> f64 {
        self.0.volume()
    }

    fn set_volume(&self, volume: f64) {
        self.0.set_volume(volume);
    }
}

/// `canPlayType` on a probe element; `"maybe"` and `"probably"` both count
pub struct BrowserCapabilities {
    probe: HtmlVideoElement,
}

impl BrowserCapabilities {
    pub fn new(probe: HtmlVideoElement) -> Self {
        Self { probe }
    }
}

impl MediaCapabilities for BrowserCapabilities {
    fn can_play_mime(&self, mime: &str) -> bool {
        !self.probe.can_play_type(mime).is_empty()
    }
}
