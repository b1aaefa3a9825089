//! Fullscreen state of the player root element

use std::cell::Cell;
use std::rc::Rc;
use tracing::debug;

use crate::events::{names, DomEvent, EventBus, Payload};

/// Platform fullscreen API, bound by the host to the player's root element
pub trait FullscreenDriver {
    fn request(&self);
    fn exit(&self);
    /// Whether the player's root element is the current fullscreen element
    fn is_active(&self) -> bool;
}

/// Driver for hosts without a fullscreen API; only tracks the requested state
#[derive(Debug, Default)]
pub struct HeadlessFullscreen {
    active: Cell<bool>,
}

impl FullscreenDriver for HeadlessFullscreen {
    fn request(&self) {
        self.active.set(true);
    }

    fn exit(&self) {
        self.active.set(false);
    }

    fn is_active(&self) -> bool {
        self.active.get()
    }
}

/// Fullscreen controller. Emits [`names::FULLSCREEN_CHANGE`] whenever the host
/// reports a change through [`Fullscreen::notify_change`].
pub struct Fullscreen {
    events: EventBus,
    driver: Rc<dyn FullscreenDriver>,
}

impl Fullscreen {
    pub fn new(driver: Rc<dyn FullscreenDriver>) -> Self {
        Self {
            events: EventBus::new(),
            driver,
        }
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn is_active(&self) -> bool {
        self.driver.is_active()
    }

    pub fn request(&self) {
        debug!("request fullscreen");
        self.driver.request();
    }

    pub fn exit(&self) {
        debug!("exit fullscreen");
        self.driver.exit();
    }

    /// Called by the host when the page's fullscreen element changed
    pub fn notify_change(&self, event: DomEvent) {
        self.events.emit(names::FULLSCREEN_CHANGE, &Payload::Dom(event));
    }

    pub fn destroy(&self) {
        self.events.off_all();
    }
}
