//! Core - the composition root of one player
//!
//! Owns the selected media backend, the fullscreen controller and the fixed
//! plugin list. Plugins never reference each other; they reach the backend and
//! the core through a [`CoreHandle`] and react to events on their buses.
//!
//! ```text
//!   backend events ──▶ plugins (listen_to video)
//!   core:keydown / core:fullscreenchange ──▶ plugins (listen_to core)
//!
//!   destroy: plugins ─▶ backend ─▶ fullscreen ─▶ root element ─▶ own listeners
//! ```

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use tracing::{debug, info, instrument};

use crate::component::Component;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::events::{names, DomEvent, EventBus, Payload};
use crate::fullscreen::Fullscreen;
use crate::host::{Host, SpriteLoader};
use crate::plugin::bind;
use crate::plugins::{ClickToPlay, Controller, ErrorScreen, Keyboard};
use crate::ui_object::{DomHandler, UiObject};
use crate::video::{Video, VideoFactory};

const ROOT_CLASS: &str = "better-player";

const ROOT_ATTRIBUTES: &[(&str, &str)] = &[("tabindex", "-1")];

const ROOT_HANDLERS: &[DomHandler<Core>] = &[DomHandler {
    event_type: "keydown",
    selector: None,
    handler: Core::on_keydown,
}];

/// What plugins see of the core
#[derive(Clone)]
pub struct CoreHandle {
    core: Weak<Core>,
    events: EventBus,
    video: Rc<dyn Video>,
    config: Rc<Config>,
}

impl CoreHandle {
    /// The core's bus (`core:*` events)
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn video(&self) -> &Rc<dyn Video> {
        &self.video
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The core, unless it has been dropped
    pub fn core(&self) -> Option<Rc<Core>> {
        self.core.upgrade()
    }

    pub fn is_fullscreen(&self) -> bool {
        self.core().is_some_and(|core| core.is_fullscreen())
    }

    pub fn request_fullscreen(&self) {
        if let Some(core) = self.core() {
            core.request_fullscreen();
        }
    }

    pub fn exit_fullscreen(&self) {
        if let Some(core) = self.core() {
            core.exit_fullscreen();
        }
    }

    pub fn reload(&self) {
        if let Some(core) = self.core() {
            core.reload();
        }
    }

    /// Handle not attached to any core, for exercising a plugin on its own
    #[cfg(test)]
    pub(crate) fn detached(video: Rc<dyn Video>, config: Config) -> Self {
        Self {
            core: Weak::new(),
            events: EventBus::new(),
            video,
            config: Rc::new(config),
        }
    }
}

/// Composition root
pub struct Core {
    weak: Weak<Core>,
    events: EventBus,
    ui: UiObject<Core>,
    config: Rc<Config>,
    video: Rc<dyn Video>,
    fullscreen: Fullscreen,
    plugins: RefCell<Vec<Component>>,
    sprite_loader: Option<Rc<dyn SpriteLoader>>,
    destroyed: Cell<bool>,
}

impl Core {
    /// Select a backend, then build the plugins in their fixed order
    #[instrument(skip_all, fields(source = %config.source))]
    pub fn new(config: Config, host: Host) -> Result<Rc<Self>> {
        let config = Rc::new(config);
        let video = VideoFactory::new(&host.backends).create(&config, &host.scheduler);
        let ui = UiObject::new("core", ROOT_CLASS, &[], ROOT_HANDLERS)?.with_attributes(ROOT_ATTRIBUTES);

        let core = Rc::new_cyclic(|weak| Core {
            weak: weak.clone(),
            events: EventBus::new(),
            ui,
            config,
            video,
            fullscreen: Fullscreen::new(host.fullscreen.clone()),
            plugins: RefCell::new(Vec::new()),
            sprite_loader: host.sprite_loader.clone(),
            destroyed: Cell::new(false),
        });

        let handle = core.handle();
        let plugins = vec![
            Component::Visual(Controller::new(handle.clone())?),
            Component::Visual(ErrorScreen::new(handle.clone())?),
            Component::Headless(ClickToPlay::new(handle.clone())),
            Component::Headless(Keyboard::new(handle)),
        ];
        *core.plugins.borrow_mut() = plugins;
        core.add_event_listeners();

        debug!(backend = core.video.name(), "core created");
        Ok(core)
    }

    fn add_event_listeners(&self) {
        self.events.listen_to(
            self.fullscreen.events(),
            names::FULLSCREEN_CHANGE,
            bind(&self.weak, Core::on_fullscreen_change),
        );
    }

    pub fn handle(&self) -> CoreHandle {
        CoreHandle {
            core: self.weak.clone(),
            events: self.events.clone(),
            video: self.video.clone(),
            config: self.config.clone(),
        }
    }

    fn on_fullscreen_change(&self, payload: &Payload) {
        self.events.emit(names::CORE_FULLSCREENCHANGE, payload);
    }

    fn on_keydown(&self, event: &DomEvent) {
        self.events.emit(names::CORE_KEYDOWN, &Payload::Dom(event.clone()));
    }

    /// Route a DOM event received on the root element
    pub fn handle_dom_event(&self, event: &DomEvent) -> bool {
        self.ui.dispatch(self, event, &|_| false)
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn video(&self) -> &Rc<dyn Video> {
        &self.video
    }

    pub fn fullscreen(&self) -> &Fullscreen {
        &self.fullscreen
    }

    /// Root element description
    pub fn ui(&self) -> &UiObject<Core> {
        &self.ui
    }

    /// Plugins in construction order
    pub fn plugins(&self) -> Vec<Component> {
        self.plugins.borrow().clone()
    }

    pub fn plugin(&self, name: &str) -> Option<Component> {
        self.plugins
            .borrow()
            .iter()
            .find(|plugin| plugin.name() == name)
            .cloned()
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed.get()
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen.is_active()
    }

    pub fn request_fullscreen(&self) {
        self.fullscreen.request();
    }

    pub fn exit_fullscreen(&self) {
        self.fullscreen.exit();
    }

    /// Inline `width`/`height` styles of the root element; empty when unset
    pub fn size_styles(&self) -> [(&'static str, String); 2] {
        let px = |value: Option<u32>| value.map(|v| format!("{v}px")).unwrap_or_default();
        [("width", px(self.config.width)), ("height", px(self.config.height))]
    }

    /// Reload the source on the same backend and re-enable every plugin
    pub fn reload(&self) {
        if self.destroyed.get() {
            return;
        }
        info!(backend = self.video.name(), "reload");
        self.video.reload();
        for plugin in self.plugins() {
            plugin.enable();
        }
    }

    /// Render visual plugins and load the icon sprite
    #[instrument(skip(self))]
    pub fn render(&self) -> Result<()> {
        if self.destroyed.get() {
            return Err(Error::Destroyed);
        }
        self.ui.render("")?;
        for plugin in self.plugins() {
            plugin.render()?;
        }
        if let Some(loader) = &self.sprite_loader {
            loader.load(&self.config.icon_url);
        }
        Ok(())
    }

    /// Tear everything down. Plugins release their edges on the backend
    /// before the backend goes away. Idempotent.
    pub fn destroy(&self) {
        if self.destroyed.replace(true) {
            return;
        }
        let plugins = std::mem::take(&mut *self.plugins.borrow_mut());
        for plugin in &plugins {
            plugin.destroy();
        }
        self.video.destroy();
        self.fullscreen.destroy();
        self.ui.destroy();
        self.events.off_all();
        self.events.stop_listening(None);
        debug!(plugins = plugins.len(), "core destroyed");
    }
}
