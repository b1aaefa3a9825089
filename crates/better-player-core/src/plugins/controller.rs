use std::cell::RefCell;
use std::rc::{Rc, Weak};

use super::{CONTROLLER, PRESSED};
use crate::composition::CoreHandle;
use crate::error::Result;
use crate::events::{names, DomEvent, Payload};
use crate::plugin::{bind, Plugin, PluginBase};
use crate::time::format_time;
use crate::ui_object::{Binding, DomHandler};
use crate::ui_plugin::{UiPlugin, UiPluginBase};

const PLAY_TOGGLE: &str = "[data-play-toggle]";
const MUTE_TOGGLE: &str = "[data-mute-toggle]";
const FULLSCREEN_TOGGLE: &str = "[data-fullscreen-toggle]";
const SEEK_BAR: &str = "[data-seek-bar]";
const VOLUME_BAR: &str = "[data-volume-bar]";
const CURRENT_TIME: &str = "[data-current-time]";
const DURATION: &str = "[data-duration]";

const SELECTORS: &[&str] = &[
    PLAY_TOGGLE,
    MUTE_TOGGLE,
    FULLSCREEN_TOGGLE,
    SEEK_BAR,
    VOLUME_BAR,
    CURRENT_TIME,
    DURATION,
];

const HANDLERS: &[DomHandler<Controller>] = &[
    DomHandler {
        event_type: "click",
        selector: Some(PLAY_TOGGLE),
        handler: Controller::toggle_play,
    },
    DomHandler {
        event_type: "click",
        selector: Some(SEEK_BAR),
        handler: Controller::seek,
    },
    DomHandler {
        event_type: "click",
        selector: Some(MUTE_TOGGLE),
        handler: Controller::toggle_mute,
    },
    DomHandler {
        event_type: "click",
        selector: Some(FULLSCREEN_TOGGLE),
        handler: Controller::toggle_fullscreen,
    },
    DomHandler {
        event_type: "mousedown",
        selector: Some(SEEK_BAR),
        handler: Controller::start_seek_drag,
    },
    DomHandler {
        event_type: "input",
        selector: Some(SEEK_BAR),
        handler: Controller::update_current_time,
    },
    DomHandler {
        event_type: "input",
        selector: Some(VOLUME_BAR),
        handler: Controller::set_volume,
    },
];

const TEMPLATE: &str = r##"
    <div class="better-player__controller-top-panel">
      <input type="range" class="better-player__seek-bar" min="0" max="1" value="0" step="any" data-seek-bar>
    </div>
    <div class="better-player__controller-bottom-panel">
      <div class="better-player__controller-left-panel">
        <div class="better-player__toggle-button better-player__play-toggle-button" data-play-toggle>
          <svg class="better-player__toggle-icon--not-pressed better-player__icon"><use href="#better-player-play"></use></svg>
          <svg class="better-player__toggle-icon--pressed better-player__icon"><use href="#better-player-pause"></use></svg>
        </div>
        <div class="better-player__current-time" data-current-time>00:00</div>
        <div class="better-player__duration" data-duration>00:00</div>
        <div class="better-player__toggle-button better-player__mute-toggle-button" data-mute-toggle>
          <svg class="better-player__toggle-icon--not-pressed better-player__icon"><use href="#better-player-volume"></use></svg>
          <svg class="better-player__toggle-icon--pressed better-player__icon"><use href="#better-player-mute"></use></svg>
        </div>
        <input type="range" class="better-player__volume-bar" min="0" max="1" value="1" step="any" data-volume-bar>
      </div>
      <div class="better-player__controller-right-panel">
        <div class="better-player__toggle-button better-player__fullscreen-toggle-button" data-fullscreen-toggle>
          <svg class="better-player__toggle-icon--not-pressed better-player__icon"><use href="#better-player-fullscreen-in"></use></svg>
          <svg class="better-player__toggle-icon--pressed better-player__icon"><use href="#better-player-fullscreen-out"></use></svg>
        </div>
      </div>
    </div>"##;

#[derive(Debug, Clone, PartialEq)]
struct View {
    playing: bool,
    muted: bool,
    fullscreen: bool,
    /// Seek bar position, 0..=1
    seek_value: f64,
    volume_value: f64,
    current_time: String,
    duration: String,
    dragging: bool,
    play_on_seeked: bool,
}

impl Default for View {
    fn default() -> Self {
        Self {
            playing: false,
            muted: false,
            fullscreen: false,
            seek_value: 0.0,
            volume_value: 1.0,
            current_time: format_time(0.0),
            duration: format_time(0.0),
            dragging: false,
            play_on_seeked: false,
        }
    }
}

/// Control bar: play, mute and fullscreen toggles, seek and volume bars,
/// current time and duration
pub struct Controller {
    weak: Weak<Controller>,
    base: UiPluginBase<Controller>,
    core: CoreHandle,
    view: RefCell<View>,
}

impl Controller {
    pub fn new(core: CoreHandle) -> Result<Rc<Self>> {
        let base = UiPluginBase::new(
            CONTROLLER,
            "better-player__controller",
            SELECTORS,
            HANDLERS,
        )?;
        let plugin = Rc::new_cyclic(|weak| Controller {
            weak: weak.clone(),
            base,
            core,
            view: RefCell::new(View::default()),
        });
        plugin.base.plugin().activate(|| plugin.add_event_listeners());
        Ok(plugin)
    }

    fn update(&self, apply: impl FnOnce(&mut View)) {
        apply(&mut self.view.borrow_mut());
        self.base.invalidate();
    }

    fn duration_or_zero(&self) -> f64 {
        let duration = self.core.video().duration();
        if duration.is_finite() {
            duration
        } else {
            0.0
        }
    }

    // DOM handlers

    fn toggle_play(&self, _: &DomEvent) {
        let video = self.core.video();
        if video.is_paused() {
            video.play();
        } else {
            video.pause();
        }
    }

    fn start_seek_drag(&self, _: &DomEvent) {
        let video = self.core.video();
        if !video.is_paused() {
            video.pause();
            self.view.borrow_mut().play_on_seeked = true;
        }
        self.view.borrow_mut().dragging = true;
    }

    fn seek(&self, event: &DomEvent) {
        let video = self.core.video();
        let value = event
            .target_value
            .unwrap_or_else(|| self.view.borrow().seek_value);
        let play_on_seeked = {
            let mut view = self.view.borrow_mut();
            view.seek_value = value;
            view.dragging = false;
            std::mem::take(&mut view.play_on_seeked)
        };
        video.seek(value * video.duration());
        if play_on_seeked {
            video.play();
        }
    }

    fn update_current_time(&self, event: &DomEvent) {
        let duration = self.duration_or_zero();
        self.update(|view| {
            if let Some(value) = event.target_value {
                view.seek_value = value;
            }
            view.current_time = format_time(view.seek_value * duration);
        });
    }

    fn set_volume(&self, event: &DomEvent) {
        if let Some(volume) = event.target_value {
            self.core.video().set_volume(volume);
        }
    }

    fn toggle_mute(&self, _: &DomEvent) {
        let video = self.core.video();
        if video.volume() > 0.0 {
            video.mute();
        } else {
            video.unmute();
        }
    }

    fn toggle_fullscreen(&self, _: &DomEvent) {
        if self.core.is_fullscreen() {
            self.core.exit_fullscreen();
        } else {
            self.core.request_fullscreen();
        }
    }

    // Bus listeners

    fn update_play_toggle(&self, _: &Payload) {
        let playing = !self.core.video().is_paused();
        self.update(|view| view.playing = playing);
    }

    fn on_timeupdate(&self, _: &Payload) {
        let video = self.core.video();
        let position = video.current_time() / video.duration();
        let duration = self.duration_or_zero();
        self.update(|view| {
            // the bar follows the pointer while dragging
            if !view.dragging {
                view.seek_value = if position.is_finite() { position } else { 0.0 };
            }
            view.current_time = format_time(view.seek_value * duration);
        });
    }

    fn update_duration(&self, _: &Payload) {
        let duration = self.duration_or_zero();
        self.update(|view| view.duration = format_time(duration));
    }

    fn on_volume_change(&self, _: &Payload) {
        let volume = self.core.video().volume();
        self.update(|view| {
            view.volume_value = volume;
            view.muted = volume == 0.0;
        });
    }

    fn update_fullscreen_toggle(&self, _: &Payload) {
        let fullscreen = self.core.is_fullscreen();
        self.update(|view| view.fullscreen = fullscreen);
    }

    fn on_error(&self, _: &Payload) {
        self.disable();
    }
}

impl Plugin for Controller {
    fn base(&self) -> &PluginBase {
        self.base.plugin()
    }

    fn add_event_listeners(&self) {
        let events = self.base.plugin().events();
        let video = self.core.video().events();
        let weak = &self.weak;
        events.listen_to(video, names::VIDEO_PLAY, bind(weak, Self::update_play_toggle));
        events.listen_to(video, names::VIDEO_PAUSE, bind(weak, Self::update_play_toggle));
        events.listen_to(video, names::VIDEO_TIMEUPDATE, bind(weak, Self::on_timeupdate));
        events.listen_to(video, names::VIDEO_DURATIONCHANGE, bind(weak, Self::update_duration));
        events.listen_to(video, names::VIDEO_VOLUMECHANGE, bind(weak, Self::on_volume_change));
        events.listen_to(video, names::VIDEO_ERROR, bind(weak, Self::on_error));
        events.listen_to(
            self.core.events(),
            names::CORE_FULLSCREENCHANGE,
            bind(weak, Self::update_fullscreen_toggle),
        );
    }

    fn enable(&self) {
        self.base.enable_with(|| self.add_event_listeners());
    }

    fn disable(&self) {
        self.base.disable();
    }

    fn destroy(&self) {
        self.base.destroy();
    }
}

impl UiPlugin for Controller {
    fn class_name(&self) -> &'static str {
        self.base.ui().class_name()
    }

    fn template(&self) -> String {
        TEMPLATE.to_string()
    }

    fn bindings(&self) -> Vec<Binding> {
        let view = self.view.borrow();
        vec![
            self.base.visibility(),
            Binding::Class {
                selector: PLAY_TOGGLE,
                class: PRESSED,
                enabled: view.playing,
            },
            Binding::Class {
                selector: MUTE_TOGGLE,
                class: PRESSED,
                enabled: view.muted,
            },
            Binding::Class {
                selector: FULLSCREEN_TOGGLE,
                class: PRESSED,
                enabled: view.fullscreen,
            },
            Binding::Value {
                selector: SEEK_BAR,
                value: view.seek_value,
            },
            Binding::Value {
                selector: VOLUME_BAR,
                value: view.volume_value,
            },
            Binding::Text {
                selector: CURRENT_TIME,
                text: view.current_time.clone(),
            },
            Binding::Text {
                selector: DURATION,
                text: view.duration.clone(),
            },
        ]
    }

    fn event_types(&self) -> Vec<&'static str> {
        self.base.ui().event_types()
    }

    fn render(&self) -> Result<()> {
        self.base.render(TEMPLATE)
    }

    fn is_rendered(&self) -> bool {
        self.base.ui().is_mounted()
    }

    fn handle_dom_event(&self, event: &DomEvent, target_within: &dyn Fn(&str) -> bool) {
        self.base.ui().dispatch(self, event, target_within);
    }

    fn as_plugin(&self) -> &dyn Plugin {
        self
    }
}
