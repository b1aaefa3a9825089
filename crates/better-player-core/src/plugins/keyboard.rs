use std::rc::{Rc, Weak};
use tracing::trace;

use super::KEYBOARD;
use crate::composition::CoreHandle;
use crate::events::{names, Payload};
use crate::plugin::{bind, Plugin, PluginBase};

/// Keyboard shortcut, keyed by `KeyboardEvent.key`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    SeekBackward,
    SeekForward,
    VolumeUp,
    VolumeDown,
    TogglePlay,
}

impl Shortcut {
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" => Some(Shortcut::SeekBackward),
            "ArrowRight" => Some(Shortcut::SeekForward),
            "ArrowUp" => Some(Shortcut::VolumeUp),
            "ArrowDown" => Some(Shortcut::VolumeDown),
            " " => Some(Shortcut::TogglePlay),
            _ => None,
        }
    }
}

/// Keyboard shortcuts on the player root. Gated by `keyboard`.
///
/// Every keydown reaching the plugin has its default action prevented, so the
/// arrow keys and space never scroll the page while the player has focus.
pub struct Keyboard {
    weak: Weak<Keyboard>,
    base: PluginBase,
    core: CoreHandle,
}

impl Keyboard {
    pub fn new(core: CoreHandle) -> Rc<Self> {
        let allowed = core.config().keyboard;
        let plugin = Rc::new_cyclic(|weak| Keyboard {
            weak: weak.clone(),
            base: PluginBase::gated(KEYBOARD, allowed),
            core,
        });
        plugin.base.activate(|| plugin.add_event_listeners());
        plugin
    }

    fn on_keydown(&self, payload: &Payload) {
        let Some(event) = payload.as_dom() else {
            return;
        };
        event.prevent_default();
        if let Some(shortcut) = event.key.as_deref().and_then(Shortcut::from_key) {
            trace!(?shortcut, "shortcut");
            self.apply(shortcut);
        }
    }

    fn on_error(&self, _: &Payload) {
        self.disable();
    }

    pub fn apply(&self, shortcut: Shortcut) {
        let video = self.core.video();
        let config = self.core.config();
        match shortcut {
            Shortcut::SeekBackward => video.seek(video.current_time() - config.seek_time),
            Shortcut::SeekForward => video.seek(video.current_time() + config.seek_time),
            Shortcut::VolumeUp => video.set_volume(video.volume() + config.volume_step),
            Shortcut::VolumeDown => video.set_volume(video.volume() - config.volume_step),
            Shortcut::TogglePlay => {
                if video.is_paused() {
                    video.play();
                } else {
                    video.pause();
                }
            }
        }
    }
}

impl Plugin for Keyboard {
    fn base(&self) -> &PluginBase {
        &self.base
    }

    fn add_event_listeners(&self) {
        let events = self.base.events();
        events.listen_to(
            self.core.events(),
            names::CORE_KEYDOWN,
            bind(&self.weak, Self::on_keydown),
        );
        events.listen_to(
            self.core.video().events(),
            names::VIDEO_ERROR,
            bind(&self.weak, Self::on_error),
        );
    }
}
