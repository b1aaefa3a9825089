use std::rc::{Rc, Weak};

use super::CLICK_TO_PLAY;
use crate::composition::CoreHandle;
use crate::events::{names, Payload};
use crate::plugin::{bind, Plugin, PluginBase};

/// Toggles playback when the video is clicked. Gated by `clickToPlay`.
pub struct ClickToPlay {
    weak: Weak<ClickToPlay>,
    base: PluginBase,
    core: CoreHandle,
}

impl ClickToPlay {
    pub fn new(core: CoreHandle) -> Rc<Self> {
        let allowed = core.config().click_to_play;
        let plugin = Rc::new_cyclic(|weak| ClickToPlay {
            weak: weak.clone(),
            base: PluginBase::gated(CLICK_TO_PLAY, allowed),
            core,
        });
        plugin.base.activate(|| plugin.add_event_listeners());
        plugin
    }

    fn on_click(&self, _: &Payload) {
        let video = self.core.video();
        if video.is_paused() {
            video.play();
        } else {
            video.pause();
        }
    }

    fn on_error(&self, _: &Payload) {
        self.disable();
    }
}

impl Plugin for ClickToPlay {
    fn base(&self) -> &PluginBase {
        &self.base
    }

    fn add_event_listeners(&self) {
        let video = self.core.video().events();
        let events = self.base.events();
        events.listen_to(video, names::VIDEO_CLICK, bind(&self.weak, Self::on_click));
        events.listen_to(video, names::VIDEO_ERROR, bind(&self.weak, Self::on_error));
    }
}
