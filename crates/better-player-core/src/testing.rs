//! In-memory backend for unit tests

use std::cell::{Cell, RefCell};

use crate::events::{EventBus, Payload};
use crate::video::Video;

/// Backend that records commands and lets tests drive its state
pub(crate) struct FakeVideo {
    events: EventBus,
    pub paused: Cell<bool>,
    pub duration: Cell<f64>,
    pub time: Cell<f64>,
    pub volume: Cell<f64>,
    pub commands: RefCell<Vec<String>>,
}

impl FakeVideo {
    pub fn new() -> Self {
        Self {
            events: EventBus::new(),
            paused: Cell::new(true),
            duration: Cell::new(100.0),
            time: Cell::new(0.0),
            volume: Cell::new(1.0),
            commands: RefCell::new(Vec::new()),
        }
    }

    pub fn emit(&self, event: &str) {
        self.events.emit(event, &Payload::None);
    }

    pub fn commands(&self) -> Vec<String> {
        self.commands.borrow().clone()
    }

    fn record(&self, command: String) {
        self.commands.borrow_mut().push(command);
    }
}

impl Video for FakeVideo {
    fn events(&self) -> &EventBus {
        &self.events
    }

    fn name(&self) -> &'static str {
        "fake"
    }

    fn can_play(&self) -> bool {
        true
    }

    fn is_paused(&self) -> bool {
        self.paused.get()
    }

    fn duration(&self) -> f64 {
        self.duration.get()
    }

    fn current_time(&self) -> f64 {
        self.time.get()
    }

    fn volume(&self) -> f64 {
        self.volume.get()
    }

    fn play(&self) {
        self.paused.set(false);
        self.record("play".into());
    }

    fn pause(&self) {
        self.paused.set(true);
        self.record("pause".into());
    }

    fn seek(&self, time: f64) {
        self.time.set(time);
        self.record(format!("seek {time}"));
    }

    fn set_volume(&self, volume: f64) {
        self.volume.set(volume);
        self.record(format!("volume {volume}"));
    }

    fn mute(&self) {
        self.volume.set(0.0);
        self.record("mute".into());
    }

    fn unmute(&self) {
        self.volume.set(1.0);
        self.record("unmute".into());
    }

    fn destroy(&self) {
        self.events.off_all();
    }
}
