//! Plugin activation - the enabled/disabled state machine shared by every plugin
//!
//! A plugin owns an [`EventBus`] and wires itself to other buses exclusively
//! through [`EventBus::listen_to`] inside its activation hook
//! ([`Plugin::add_event_listeners`]). That is what makes `disable` exact:
//! it drops every observation edge and nothing else.
//!
//! ```text
//!   new ──hook──▶ Enabled ──disable──▶ Disabled ──enable──▶ (hook) Enabled
//!                    │                     │
//!                    └──────destroy────────┴──▶ Destroyed (own listeners cleared)
//! ```
//!
//! A gated plugin whose configuration flag is off disables itself right after
//! construction and ignores every later `enable` call.

use std::cell::Cell;
use std::rc::Weak;
use tracing::debug;

use crate::events::{Callback, EventBus, Payload};

/// Activation state shared by headless and visual plugins
#[derive(Debug)]
pub struct PluginBase {
    name: &'static str,
    events: EventBus,
    enabled: Cell<bool>,
    allowed: bool,
    destroyed: Cell<bool>,
}

impl PluginBase {
    /// Create an ungated plugin base, initially enabled
    pub fn new(name: &'static str) -> Self {
        Self::gated(name, true)
    }

    /// Create a plugin base gated by a configuration flag
    pub fn gated(name: &'static str, allowed: bool) -> Self {
        Self {
            name,
            events: EventBus::new(),
            enabled: Cell::new(true),
            allowed,
            destroyed: Cell::new(false),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The plugin's own bus; also the observer identity of its edges
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.get()
    }

    /// Whether configuration permits this plugin to run
    pub fn is_allowed(&self) -> bool {
        self.allowed
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed.get()
    }

    /// Run the activation hook once at construction, then apply the gate
    pub fn activate(&self, hook: impl FnOnce()) {
        hook();
        if !self.allowed {
            debug!(plugin = self.name, "disabled by configuration");
            self.disable();
        }
    }

    /// Re-run the activation hook if currently disabled. Returns whether the
    /// plugin transitioned. A destroyed plugin never transitions.
    pub fn enable_with(&self, hook: impl FnOnce()) -> bool {
        if self.destroyed.get() || !self.allowed || self.enabled.get() {
            return false;
        }
        hook();
        self.enabled.set(true);
        debug!(plugin = self.name, "enabled");
        true
    }

    /// Drop every observation edge. Safe to call repeatedly. Returns whether
    /// the plugin was enabled before the call.
    pub fn disable(&self) -> bool {
        self.events.stop_listening(None);
        let was_enabled = self.enabled.replace(false);
        if was_enabled {
            debug!(plugin = self.name, "disabled");
        }
        was_enabled
    }

    /// Clear listeners registered on the plugin itself, then disable
    pub fn destroy(&self) {
        self.events.off_all();
        self.disable();
        if !self.destroyed.replace(true) {
            debug!(plugin = self.name, "destroyed");
        }
    }
}

/// A unit with enabled/disabled state whose edges are (re)built by one hook
pub trait Plugin {
    fn base(&self) -> &PluginBase;

    /// Register every observation edge through [`EventBus::listen_to`] on
    /// `self.base().events()`
    fn add_event_listeners(&self);

    fn name(&self) -> &'static str {
        self.base().name()
    }

    fn events(&self) -> &EventBus {
        self.base().events()
    }

    fn is_enabled(&self) -> bool {
        self.base().is_enabled()
    }

    /// Only meaningful after `disable`; a no-op while enabled
    fn enable(&self) {
        self.base().enable_with(|| self.add_event_listeners());
    }

    fn disable(&self) {
        self.base().disable();
    }

    fn destroy(&self) {
        self.base().destroy();
    }
}

/// Build a listener that calls `method` on the component behind `weak`.
///
/// The callback holds no strong reference, so registering it on another bus
/// never keeps the component alive.
pub fn bind<T: 'static>(weak: &Weak<T>, method: fn(&T, &Payload)) -> Callback {
    let weak = weak.clone();
    Callback::new(move |payload| {
        if let Some(target) = weak.upgrade() {
            method(&target, payload);
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    /// Minimal plugin listening to one subject bus
    struct Probe {
        weak: Weak<Probe>,
        base: PluginBase,
        subject: EventBus,
        hook_calls: Cell<u32>,
        hits: Cell<u32>,
    }

    impl Probe {
        fn new(subject: &EventBus, allowed: bool) -> Rc<Self> {
            let probe = Rc::new_cyclic(|weak| Probe {
                weak: weak.clone(),
                base: PluginBase::gated("probe", allowed),
                subject: subject.clone(),
                hook_calls: Cell::new(0),
                hits: Cell::new(0),
            });
            probe.base.activate(|| probe.add_event_listeners());
            probe
        }

        fn on_ping(&self, _: &Payload) {
            self.hits.set(self.hits.get() + 1);
        }
    }

    impl Plugin for Probe {
        fn base(&self) -> &PluginBase {
            &self.base
        }

        fn add_event_listeners(&self) {
            self.hook_calls.set(self.hook_calls.get() + 1);
            self.base
                .events()
                .listen_to(&self.subject, "ping", bind(&self.weak, Probe::on_ping));
        }
    }

    #[test]
    fn test_constructed_enabled_with_hook_called_once() {
        let subject = EventBus::new();
        let probe = Probe::new(&subject, true);

        assert!(probe.is_enabled());
        assert_eq!(probe.hook_calls.get(), 1);
    }

    #[test]
    fn test_enable_twice_does_not_rerun_hook() {
        let subject = EventBus::new();
        let probe = Probe::new(&subject, true);

        probe.enable();
        probe.enable();
        subject.emit("ping", &Payload::None);

        assert_eq!(probe.hook_calls.get(), 1);
        assert_eq!(probe.hits.get(), 1);
    }

    #[test]
    fn test_disable_drops_edges_idempotently() {
        let subject = EventBus::new();
        let probe = Probe::new(&subject, true);

        probe.disable();
        probe.disable();
        subject.emit("ping", &Payload::None);

        assert!(!probe.is_enabled());
        assert_eq!(probe.hits.get(), 0);
        assert!(subject.is_empty());
    }

    #[test]
    fn test_enable_after_disable_rebuilds_edges() {
        let subject = EventBus::new();
        let probe = Probe::new(&subject, true);

        probe.disable();
        probe.enable();
        subject.emit("ping", &Payload::None);

        assert!(probe.is_enabled());
        assert_eq!(probe.hook_calls.get(), 2);
        assert_eq!(probe.hits.get(), 1);
        assert_eq!(subject.listener_count("ping"), 1);
    }

    #[test]
    fn test_gated_plugin_stays_disabled() {
        let subject = EventBus::new();
        let probe = Probe::new(&subject, false);

        assert!(!probe.is_enabled());
        probe.enable();
        subject.emit("ping", &Payload::None);

        assert!(!probe.is_enabled());
        assert_eq!(probe.hits.get(), 0);
        assert_eq!(probe.hook_calls.get(), 1);
    }

    #[test]
    fn test_disable_keeps_own_listeners() {
        let subject = EventBus::new();
        let probe = Probe::new(&subject, true);
        let own = Rc::new(Cell::new(0));
        let handle = own.clone();
        probe
            .events()
            .on("own", Callback::new(move |_| handle.set(handle.get() + 1)), None);

        probe.disable();
        probe.events().emit("own", &Payload::None);

        assert_eq!(own.get(), 1);
    }

    #[test]
    fn test_destroy_clears_own_and_observed_listeners() {
        let subject = EventBus::new();
        let probe = Probe::new(&subject, true);
        let own = Rc::new(Cell::new(0));
        let handle = own.clone();
        probe
            .events()
            .on("own", Callback::new(move |_| handle.set(handle.get() + 1)), None);

        probe.destroy();
        probe.events().emit("own", &Payload::None);
        subject.emit("ping", &Payload::None);

        assert_eq!(own.get(), 0);
        assert_eq!(probe.hits.get(), 0);
        assert!(probe.base().is_destroyed());
    }

    #[test]
    fn test_enable_after_destroy_is_ignored() {
        let subject = EventBus::new();
        let probe = Probe::new(&subject, true);

        probe.destroy();
        probe.enable();
        subject.emit("ping", &Payload::None);

        assert!(!probe.is_enabled());
        assert!(subject.is_empty());
        assert_eq!(probe.hook_calls.get(), 1);
        assert_eq!(probe.hits.get(), 0);
    }

    #[test]
    fn test_bound_callback_does_not_keep_plugin_alive() {
        let subject = EventBus::new();
        let probe = Probe::new(&subject, true);
        let weak = Rc::downgrade(&probe);

        drop(probe);
        subject.emit("ping", &Payload::None);

        assert!(weak.upgrade().is_none());
    }
}
