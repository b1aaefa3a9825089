//! Fallback backend used when no other backend can play the source

use std::cell::Cell;
use std::rc::{Rc, Weak};
use tracing::debug;

use super::{Video, VideoError};
use crate::config::Config;
use crate::events::{names, EventBus, Payload};
use crate::host::Scheduler;
use crate::i18n::{self, MessageKey};

/// Plays nothing. Reports `video:error` with the "format not supported"
/// message on the next macro-task after construction and after every reload,
/// so listeners wired up in between still receive it.
pub struct NoVideo {
    weak: Weak<NoVideo>,
    events: EventBus,
    message: String,
    scheduler: Rc<dyn Scheduler>,
    destroyed: Cell<bool>,
}

impl NoVideo {
    pub fn new(config: &Config, scheduler: Rc<dyn Scheduler>) -> Rc<Self> {
        let video = Rc::new_cyclic(|weak| NoVideo {
            weak: weak.clone(),
            events: EventBus::new(),
            message: i18n::message(config, MessageKey::NotSupportVideoFormat),
            scheduler,
            destroyed: Cell::new(false),
        });
        video.throw_error();
        video
    }

    fn throw_error(&self) {
        let weak = self.weak.clone();
        self.scheduler.defer(Box::new(move || {
            let Some(video) = weak.upgrade() else {
                return;
            };
            if video.destroyed.get() {
                return;
            }
            debug!(message = %video.message, "no playable backend");
            let error = VideoError::new(video.message.clone());
            video.events.emit(names::VIDEO_ERROR, &Payload::Error(error));
        }));
    }
}

impl Video for NoVideo {
    fn events(&self) -> &EventBus {
        &self.events
    }

    fn name(&self) -> &'static str {
        "no-video"
    }

    fn reload(&self) {
        if !self.destroyed.get() {
            self.throw_error();
        }
    }

    fn destroy(&self) {
        if self.destroyed.replace(true) {
            return;
        }
        self.events.off_all();
        self.events.stop_listening(None);
    }
}
