//! Event Bus - per-instance registry of named-event listeners
//!
//! Every component owns one [`EventBus`]. Listeners are appended in
//! registration order and dispatched in that order. Each listener may carry a
//! [`ContextId`] naming its owner, which lets the owner remove everything it
//! registered without keeping the callbacks around (see `observer.rs`).
//!
//! Dispatch takes a snapshot of the listener sequence when `emit` starts:
//! - a listener added during dispatch is not called until the next emit
//! - a listener removed during dispatch is skipped for the rest of it
//! - a `once` listener is unregistered before its callback runs, so a nested
//!   emit of the same event can never fire it a second time

use serde::Serialize;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::trace;

use crate::video::VideoError;

static NEXT_CONTEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Event names shared by backends, the core, plugins and embedders
pub mod names {
    /// Playback was requested. Does not guarantee frames are rendering.
    pub const VIDEO_PLAY: &str = "video:play";
    pub const VIDEO_PAUSE: &str = "video:pause";
    pub const VIDEO_TIMEUPDATE: &str = "video:timeupdate";
    pub const VIDEO_DURATIONCHANGE: &str = "video:durationchange";
    pub const VIDEO_VOLUMECHANGE: &str = "video:volumechange";
    pub const VIDEO_ENDED: &str = "video:ended";
    pub const VIDEO_SEEKING: &str = "video:seeking";
    pub const VIDEO_SEEKED: &str = "video:seeked";
    /// Carries a [`Payload::Error`].
    pub const VIDEO_ERROR: &str = "video:error";
    pub const VIDEO_CLICK: &str = "video:click";

    pub const CORE_FULLSCREENCHANGE: &str = "core:fullscreenchange";
    pub const CORE_KEYDOWN: &str = "core:keydown";

    /// Page-level fullscreen state changed.
    pub const FULLSCREEN_CHANGE: &str = "fullscreen:change";

    /// A visual plugin's view model changed and should be re-applied.
    pub const UI_UPDATE: &str = "ui:update";

    pub const PLAYER_PLAY: &str = "play";
    pub const PLAYER_PAUSE: &str = "pause";
    pub const PLAYER_VOLUMECHANGE: &str = "volumechange";
    pub const PLAYER_TIMEUPDATE: &str = "timeupdate";
    pub const PLAYER_ENDED: &str = "ended";
    pub const PLAYER_SEEKING: &str = "seeking";
    pub const PLAYER_SEEKED: &str = "seeked";
    pub const PLAYER_REQUESTFULLSCREEN: &str = "requestfullscreen";
    pub const PLAYER_EXITFULLSCREEN: &str = "exitfullscreen";
    pub const PLAYER_ERROR: &str = "error";
}

/// Identity of a listener owner, used as the context slot of a listener record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContextId(u64);

impl ContextId {
    /// Allocate a fresh, process-unique context identity
    pub fn next() -> Self {
        Self(NEXT_CONTEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ctx#{}", self.0)
    }
}

/// Platform event forwarded through the bus (media element events, key presses,
/// clicks on plugin elements, fullscreen changes)
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DomEvent {
    /// Native event type, e.g. `"click"` or `"timeupdate"`
    #[serde(rename = "type")]
    pub event_type: String,
    /// `KeyboardEvent.key`, for keyboard events
    pub key: Option<String>,
    /// Value of the target input element, for `input`/`click` on range inputs
    pub target_value: Option<f64>,
    /// Shared by clones, so a listener handed a copy can still cancel the
    /// host's event
    #[serde(skip)]
    default_prevented: Rc<Cell<bool>>,
}

impl DomEvent {
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            ..Default::default()
        }
    }

    /// Create a `keydown` event for the given `KeyboardEvent.key`
    pub fn keydown(key: impl Into<String>) -> Self {
        Self {
            event_type: "keydown".to_string(),
            key: Some(key.into()),
            ..Default::default()
        }
    }

    /// Attach the value of the event target
    pub fn with_value(mut self, value: f64) -> Self {
        self.target_value = Some(value);
        self
    }

    /// Ask the host to cancel the platform's default action
    pub fn prevent_default(&self) {
        self.default_prevented.set(true);
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented.get()
    }
}

/// Arguments forwarded by `emit` to every listener
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(untagged)]
pub enum Payload {
    #[default]
    None,
    Dom(DomEvent),
    Error(VideoError),
    /// Free-form data for embedder-defined events
    Json(serde_json::Value),
}

impl Payload {
    pub fn as_dom(&self) -> Option<&DomEvent> {
        match self {
            Payload::Dom(event) => Some(event),
            _ => None,
        }
    }

    pub fn as_error(&self) -> Option<&VideoError> {
        match self {
            Payload::Error(error) => Some(error),
            _ => None,
        }
    }
}

impl From<DomEvent> for Payload {
    fn from(event: DomEvent) -> Self {
        Payload::Dom(event)
    }
}

impl From<VideoError> for Payload {
    fn from(error: VideoError) -> Self {
        Payload::Error(error)
    }
}

/// Listener callback. Two callbacks are the same listener only if they are
/// clones of the same `Callback`.
#[derive(Clone)]
pub struct Callback(Rc<dyn Fn(&Payload)>);

impl Callback {
    pub fn new(f: impl Fn(&Payload) + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub fn call(&self, payload: &Payload) {
        (self.0)(payload)
    }

    pub fn ptr_eq(&self, other: &Callback) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for Callback {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Callback({:p})", Rc::as_ptr(&self.0) as *const ())
    }
}

/// A registered listener record
#[derive(Clone)]
struct Listener {
    id: u64,
    callback: Callback,
    context: Option<ContextId>,
    once: bool,
    /// Cleared when the record leaves the registry; checked during dispatch
    live: Rc<Cell<bool>>,
}

impl Listener {
    fn matches(&self, callback: Option<&Callback>, context: Option<ContextId>) -> bool {
        let callback_matches = callback.map_or(true, |cb| self.callback.ptr_eq(cb));
        let context_matches = context.map_or(true, |ctx| self.context == Some(ctx));
        callback_matches && context_matches
    }
}

#[derive(Default)]
struct Registry {
    listeners: HashMap<String, Vec<Listener>>,
    next_listener_id: u64,
}

pub(crate) struct BusInner {
    pub(crate) id: ContextId,
    registry: RefCell<Registry>,
    /// Subjects this bus is observing (see `observer.rs`)
    pub(crate) listening_to: RefCell<Vec<Weak<BusInner>>>,
}

/// Handle to an event bus. Clones share the same registry.
#[derive(Clone)]
pub struct EventBus {
    pub(crate) inner: Rc<BusInner>,
}

impl EventBus {
    /// Create an empty bus with a fresh identity
    pub fn new() -> Self {
        Self {
            inner: Rc::new(BusInner {
                id: ContextId::next(),
                registry: RefCell::new(Registry::default()),
                listening_to: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Identity of this bus, used as the context of edges it creates
    pub fn id(&self) -> ContextId {
        self.inner.id
    }

    /// Whether two handles refer to the same bus
    pub fn same_bus(&self, other: &EventBus) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Register a listener. Registering the same pair twice yields two calls per emit.
    pub fn on(&self, event: &str, callback: Callback, context: Option<ContextId>) {
        self.insert(event, callback, context, false);
    }

    /// Register a listener that is removed after its first invocation
    pub fn once(&self, event: &str, callback: Callback, context: Option<ContextId>) {
        self.insert(event, callback, context, true);
    }

    fn insert(&self, event: &str, callback: Callback, context: Option<ContextId>, once: bool) {
        let mut registry = self.inner.registry.borrow_mut();
        registry.next_listener_id += 1;
        let id = registry.next_listener_id;
        registry
            .listeners
            .entry(event.to_string())
            .or_default()
            .push(Listener {
                id,
                callback,
                context,
                once,
                live: Rc::new(Cell::new(true)),
            });
        trace!(bus = %self.inner.id, event, once, "listener added");
    }

    /// Remove every listener matching all supplied criteria.
    ///
    /// `None` is a wildcard in each slot; `off(None, None, None)` clears the bus.
    /// Event names left without listeners are deleted from the registry.
    pub fn off(&self, event: Option<&str>, callback: Option<&Callback>, context: Option<ContextId>) {
        let removed = {
            let mut registry = self.inner.registry.borrow_mut();
            let names: Vec<String> = match event {
                Some(name) => vec![name.to_string()],
                None => registry.listeners.keys().cloned().collect(),
            };

            let mut removed = Vec::new();
            for name in names {
                let Some(listeners) = registry.listeners.get_mut(&name) else {
                    continue;
                };
                let (gone, kept): (Vec<_>, Vec<_>) = std::mem::take(listeners)
                    .into_iter()
                    .partition(|listener| listener.matches(callback, context));
                *listeners = kept;
                if listeners.is_empty() {
                    registry.listeners.remove(&name);
                }
                removed.extend(gone);
            }
            removed
        };

        for listener in &removed {
            listener.live.set(false);
        }
        if !removed.is_empty() {
            trace!(bus = %self.inner.id, count = removed.len(), "listeners removed");
        }
        // callbacks are dropped here, after the registry borrow is released
    }

    /// Remove every listener on this bus
    pub fn off_all(&self) {
        self.off(None, None, None);
    }

    /// Invoke every listener of `event` in registration order
    pub fn emit(&self, event: &str, payload: &Payload) {
        let snapshot = {
            let registry = self.inner.registry.borrow();
            match registry.listeners.get(event) {
                Some(listeners) => listeners.clone(),
                None => return,
            }
        };

        for listener in snapshot {
            if !listener.live.get() {
                continue;
            }
            if listener.once {
                self.remove_listener(event, listener.id);
            }
            listener.callback.call(payload);
        }
    }

    fn remove_listener(&self, event: &str, id: u64) {
        let removed = {
            let mut registry = self.inner.registry.borrow_mut();
            let Some(listeners) = registry.listeners.get_mut(event) else {
                return;
            };
            let removed = listeners
                .iter()
                .position(|listener| listener.id == id)
                .map(|index| listeners.remove(index));
            if listeners.is_empty() {
                registry.listeners.remove(event);
            }
            removed
        };
        if let Some(listener) = removed {
            listener.live.set(false);
        }
    }

    /// Event names that currently have at least one listener, sorted
    pub fn event_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .inner
            .registry
            .borrow()
            .listeners
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }

    pub fn listener_count(&self, event: &str) -> usize {
        self.inner
            .registry
            .borrow()
            .listeners
            .get(event)
            .map_or(0, Vec::len)
    }

    /// True when no listener is registered for any event
    pub fn is_empty(&self) -> bool {
        self.inner.registry.borrow().listeners.is_empty()
    }

    /// Whether any listener on this bus was registered with `context`
    pub fn has_context(&self, context: ContextId) -> bool {
        self.inner
            .registry
            .borrow()
            .listeners
            .values()
            .flatten()
            .any(|listener| listener.context == Some(context))
    }

    pub(crate) fn has_context_for(&self, event: &str, context: ContextId) -> bool {
        self.inner
            .registry
            .borrow()
            .listeners
            .get(event)
            .is_some_and(|listeners| listeners.iter().any(|l| l.context == Some(context)))
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("id", &self.inner.id)
            .field("events", &self.event_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counter() -> (Rc<Cell<u32>>, Callback) {
        let count = Rc::new(Cell::new(0));
        let handle = count.clone();
        (count, Callback::new(move |_| handle.set(handle.get() + 1)))
    }

    #[test]
    fn test_on_and_emit() {
        let bus = EventBus::new();
        let (count, callback) = counter();

        bus.on("test", callback, None);
        bus.emit("test", &Payload::None);

        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_emit_in_registration_order() {
        let bus = EventBus::new();
        let order = Rc::new(RefCell::new(Vec::new()));
        for i in 0..3 {
            let order = order.clone();
            bus.on("test", Callback::new(move |_| order.borrow_mut().push(i)), None);
        }

        bus.emit("test", &Payload::None);

        assert_eq!(*order.borrow(), vec![0, 1, 2]);
    }

    #[test]
    fn test_same_listener_twice_fires_twice() {
        let bus = EventBus::new();
        let (count, callback) = counter();

        bus.on("test", callback.clone(), None);
        bus.on("test", callback, None);
        bus.emit("test", &Payload::None);

        assert_eq!(count.get(), 2);
    }

    #[test]
    fn test_emit_unknown_event_is_noop() {
        let bus = EventBus::new();
        let (count, callback) = counter();
        bus.on("other", callback, None);

        bus.emit("test", &Payload::None);

        assert_eq!(count.get(), 0);
    }

    #[test]
    fn test_emit_forwards_payload() {
        let bus = EventBus::new();
        let seen = Rc::new(RefCell::new(None));
        let sink = seen.clone();
        bus.on(
            names::VIDEO_ERROR,
            Callback::new(move |payload| *sink.borrow_mut() = payload.as_error().cloned()),
            None,
        );

        bus.emit(names::VIDEO_ERROR, &VideoError::new("boom").into());

        assert_eq!(seen.borrow().as_ref().map(|e| e.message.as_str()), Some("boom"));
    }

    #[test]
    fn test_off_without_arguments_clears_registry() {
        let bus = EventBus::new();
        let (_, callback) = counter();
        bus.on("a", callback.clone(), None);
        bus.on("b", callback, Some(ContextId::next()));

        bus.off_all();

        assert!(bus.is_empty());
        assert!(bus.event_names().is_empty());
    }

    #[test]
    fn test_off_removes_empty_event_names() {
        let bus = EventBus::new();
        let (_, callback) = counter();
        bus.on("a", callback.clone(), None);

        bus.off(Some("a"), Some(&callback), None);

        assert!(bus.event_names().is_empty());
    }

    #[test]
    fn test_off_unknown_listener_is_noop() {
        let bus = EventBus::new();
        let (count, callback) = counter();
        let (_, other) = counter();
        bus.on("test", callback, None);

        bus.off(Some("test"), Some(&other), None);
        bus.off(Some("missing"), Some(&other), None);
        bus.off(None, None, Some(ContextId::next()));
        bus.emit("test", &Payload::None);

        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_off_wildcard_callback_across_events() {
        let bus = EventBus::new();
        let ctx_a = ContextId::next();
        let ctx_b = ContextId::next();
        let (_, c1) = counter();
        let (c2_count, c2) = counter();

        bus.on("e1", c1.clone(), Some(ctx_a));
        bus.on("e1", c2, Some(ctx_a));
        bus.on("e2", c1.clone(), Some(ctx_b));

        bus.off(None, Some(&c1), None);

        assert_eq!(bus.event_names(), vec!["e1".to_string()]);
        assert_eq!(bus.listener_count("e1"), 1);
        bus.emit("e1", &Payload::None);
        assert_eq!(c2_count.get(), 1);
    }

    #[test]
    fn test_off_by_context() {
        let bus = EventBus::new();
        let ctx = ContextId::next();
        let (kept, keep) = counter();
        let (dropped, drop_cb) = counter();
        bus.on("test", keep, None);
        bus.on("test", drop_cb, Some(ctx));

        bus.off(None, None, Some(ctx));
        bus.emit("test", &Payload::None);

        assert_eq!(kept.get(), 1);
        assert_eq!(dropped.get(), 0);
        assert!(!bus.has_context(ctx));
    }

    #[test]
    fn test_once_fires_once_with_first_payload() {
        let bus = EventBus::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        bus.once(
            "test",
            Callback::new(move |p| sink.borrow_mut().push(p.clone())),
            None,
        );

        bus.emit("test", &Payload::Json(serde_json::json!(1)));
        bus.emit("test", &Payload::Json(serde_json::json!(2)));

        assert_eq!(*seen.borrow(), vec![Payload::Json(serde_json::json!(1))]);
        assert!(bus.is_empty());
    }

    #[test]
    fn test_once_among_persistent_listeners() {
        let bus = EventBus::new();
        let (a, cb_a) = counter();
        let (b, cb_b) = counter();
        let (once, cb_once) = counter();
        bus.on("test", cb_a, None);
        bus.on("test", cb_b, None);
        bus.once("test", cb_once, None);

        for _ in 0..3 {
            bus.emit("test", &Payload::None);
        }

        assert_eq!(a.get(), 3);
        assert_eq!(b.get(), 3);
        assert_eq!(once.get(), 1);
    }

    #[test]
    fn test_independent_once_listeners() {
        let bus = EventBus::new();
        let (first, cb_first) = counter();
        let (second, cb_second) = counter();
        bus.once("test", cb_first, None);
        bus.once("test", cb_second, None);

        bus.emit("test", &Payload::None);
        bus.emit("test", &Payload::None);

        assert_eq!(first.get(), 1);
        assert_eq!(second.get(), 1);
    }

    #[test]
    fn test_once_not_refired_by_nested_emit() {
        let bus = EventBus::new();
        let count = Rc::new(Cell::new(0));
        let weak_bus = Rc::downgrade(&bus.inner);
        let handle = count.clone();
        bus.once(
            "test",
            Callback::new(move |_| {
                handle.set(handle.get() + 1);
                if let Some(inner) = weak_bus.upgrade() {
                    EventBus { inner }.emit("test", &Payload::None);
                }
            }),
            None,
        );

        bus.emit("test", &Payload::None);

        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_listener_added_during_emit_waits_for_next_emit() {
        let bus = EventBus::new();
        let (late, late_cb) = counter();
        let weak_bus = Rc::downgrade(&bus.inner);
        bus.once(
            "test",
            Callback::new(move |_| {
                if let Some(inner) = weak_bus.upgrade() {
                    EventBus { inner }.on("test", late_cb.clone(), None);
                }
            }),
            None,
        );

        bus.emit("test", &Payload::None);
        assert_eq!(late.get(), 0);

        bus.emit("test", &Payload::None);
        assert_eq!(late.get(), 1);
    }

    #[test]
    fn test_listener_removed_during_emit_is_skipped() {
        let bus = EventBus::new();
        let (victim, victim_cb) = counter();
        let weak_bus = Rc::downgrade(&bus.inner);
        let target = victim_cb.clone();
        bus.on(
            "test",
            Callback::new(move |_| {
                if let Some(inner) = weak_bus.upgrade() {
                    EventBus { inner }.off(Some("test"), Some(&target), None);
                }
            }),
            None,
        );
        bus.on("test", victim_cb, None);

        bus.emit("test", &Payload::None);

        assert_eq!(victim.get(), 0);
    }

    #[test]
    fn test_dom_event_prevent_default_is_shared() {
        let bus = EventBus::new();
        bus.on(
            "keydown",
            Callback::new(|p| {
                if let Some(event) = p.as_dom() {
                    event.prevent_default();
                }
            }),
            None,
        );
        let payload = Payload::Dom(DomEvent::keydown("ArrowLeft"));

        bus.emit("keydown", &payload);

        assert!(payload.as_dom().is_some_and(DomEvent::default_prevented));
    }

    #[test]
    fn test_dom_event_clones_share_prevent_default() {
        let original = DomEvent::keydown(" ");
        let forwarded = Payload::Dom(original.clone());

        if let Some(event) = forwarded.as_dom() {
            event.prevent_default();
        }

        assert!(original.default_prevented());
    }
}
