//! HTML video backend
//!
//! Wraps a platform media element and translates its native events into the
//! `video:*` vocabulary. The element itself is supplied by the host through
//! the [`MediaElement`] trait so this logic runs (and is tested) off-browser.

use std::cell::Cell;
use std::rc::Rc;
use tracing::{debug, trace};

use super::{mime, Video, VideoBackend, VideoError};
use crate::config::Config;
use crate::events::{names, DomEvent, EventBus, Payload};
use crate::host::Scheduler;
use crate::i18n::{self, MessageKey};

/// Native media event type -> bus event name
const NATIVE_EVENTS: &[(&str, &str)] = &[
    ("play", names::VIDEO_PLAY),
    ("pause", names::VIDEO_PAUSE),
    ("timeupdate", names::VIDEO_TIMEUPDATE),
    ("durationchange", names::VIDEO_DURATIONCHANGE),
    ("volumechange", names::VIDEO_VOLUMECHANGE),
    ("ended", names::VIDEO_ENDED),
    ("seeking", names::VIDEO_SEEKING),
    ("seeked", names::VIDEO_SEEKED),
    ("click", names::VIDEO_CLICK),
];

const NATIVE_ERROR: &str = "error";

/// Platform media element (e.g. `HTMLVideoElement`)
pub trait MediaElement {
    fn set_source(&self, source: &str);
    /// Remove the source attribute
    fn clear_source(&self);
    fn load(&self);
    fn play(&self);
    fn pause(&self);
    fn paused(&self) -> bool;
    fn duration(&self) -> f64;
    fn current_time(&self) -> f64;
    fn set_current_time(&self, time: f64);
    fn volume(&self) -> f64;
    fn set_volume(&self, volume: f64);
}

/// Answers whether the platform can decode a MIME type
pub trait MediaCapabilities {
    fn can_play_mime(&self, mime: &str) -> bool;
}

/// Backend driving a [`MediaElement`]
pub struct HtmlVideo<E: MediaElement> {
    element: E,
    events: EventBus,
    config: Rc<Config>,
    /// Volume restored by `unmute`
    last_volume: Cell<f64>,
    destroyed: Cell<bool>,
}

impl<E: MediaElement> HtmlVideo<E> {
    pub fn new(element: E, config: Rc<Config>) -> Self {
        element.set_source(&config.source);
        let last_volume = element.volume();
        Self {
            element,
            events: EventBus::new(),
            config,
            last_volume: Cell::new(last_volume),
            destroyed: Cell::new(false),
        }
    }

    pub fn element(&self) -> &E {
        &self.element
    }

    /// Native event types the host must forward to [`HtmlVideo::handle_native_event`]
    pub fn native_event_types() -> impl Iterator<Item = &'static str> {
        NATIVE_EVENTS
            .iter()
            .map(|(native, _)| *native)
            .chain(std::iter::once(NATIVE_ERROR))
    }

    /// Translate one native media event onto the bus
    pub fn handle_native_event(&self, event: &DomEvent) {
        if self.destroyed.get() {
            return;
        }
        if event.event_type == NATIVE_ERROR {
            let error = VideoError::new(i18n::message(&self.config, MessageKey::NotFoundVideo));
            debug!(source = %self.config.source, "media element error");
            self.events.emit(names::VIDEO_ERROR, &Payload::Error(error));
            return;
        }
        match NATIVE_EVENTS
            .iter()
            .find(|(native, _)| *native == event.event_type)
        {
            Some((_, name)) => self.events.emit(name, &Payload::Dom(event.clone())),
            None => trace!(event_type = %event.event_type, "ignored native event"),
        }
    }
}

impl<E: MediaElement> Video for HtmlVideo<E> {
    fn events(&self) -> &EventBus {
        &self.events
    }

    fn name(&self) -> &'static str {
        "html-video"
    }

    fn can_play(&self) -> bool {
        true
    }

    fn is_paused(&self) -> bool {
        self.element.paused()
    }

    fn duration(&self) -> f64 {
        self.element.duration()
    }

    fn current_time(&self) -> f64 {
        self.element.current_time()
    }

    fn volume(&self) -> f64 {
        self.element.volume()
    }

    fn play(&self) {
        self.element.play();
    }

    fn pause(&self) {
        self.element.pause();
    }

    fn seek(&self, time: f64) {
        let duration = self.duration();
        let mut time = time.max(0.0);
        if time > duration {
            time = duration;
        }
        self.element.set_current_time(time);
    }

    fn set_volume(&self, volume: f64) {
        let volume = volume.clamp(0.0, 1.0);
        self.last_volume.set(volume);
        self.element.set_volume(volume);
    }

    fn mute(&self) {
        self.element.set_volume(0.0);
    }

    fn unmute(&self) {
        let last = self.last_volume.get();
        self.element.set_volume(if last > 0.0 { last } else { 1.0 });
    }

    fn reload(&self) {
        self.element.load();
    }

    fn destroy(&self) {
        if self.destroyed.replace(true) {
            return;
        }
        self.events.off_all();
        self.events.stop_listening(None);
        // stop any in-flight download
        self.element.clear_source();
        self.element.load();
        debug!("html video destroyed");
    }
}

type CreatedHook<E> = Box<dyn Fn(&Rc<HtmlVideo<E>>)>;

/// Factory entry for [`HtmlVideo`]: plays every source whose guessed MIME type
/// the platform reports as playable
pub struct HtmlVideoBackend<E: MediaElement> {
    capabilities: Rc<dyn MediaCapabilities>,
    make_element: Box<dyn Fn() -> E>,
    on_created: Option<CreatedHook<E>>,
}

impl<E: MediaElement> HtmlVideoBackend<E> {
    pub fn new(
        capabilities: Rc<dyn MediaCapabilities>,
        make_element: impl Fn() -> E + 'static,
    ) -> Self {
        Self {
            capabilities,
            make_element: Box::new(make_element),
            on_created: None,
        }
    }

    /// Hook run on every created backend, e.g. to forward native events
    pub fn on_created(mut self, hook: impl Fn(&Rc<HtmlVideo<E>>) + 'static) -> Self {
        self.on_created = Some(Box::new(hook));
        self
    }
}

impl<E: MediaElement + 'static> VideoBackend for HtmlVideoBackend<E> {
    fn name(&self) -> &'static str {
        "html-video"
    }

    fn can_play_type(&self, source: &str) -> bool {
        mime::guess(source).is_some_and(|mime| self.capabilities.can_play_mime(mime))
    }

    fn create(&self, config: &Rc<Config>, _scheduler: &Rc<dyn Scheduler>) -> Rc<dyn Video> {
        let video = Rc::new(HtmlVideo::new((self.make_element)(), config.clone()));
        if let Some(hook) = &self.on_created {
            hook(&video);
        }
        video
    }
}
