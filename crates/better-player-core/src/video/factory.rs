//! Backend selection

use std::rc::Rc;
use tracing::{debug, warn};

use super::{NoVideo, Video, VideoBackend};
use crate::config::Config;
use crate::host::Scheduler;

/// Picks the first backend able to play the configured source
pub struct VideoFactory<'a> {
    backends: &'a [Box<dyn VideoBackend>],
}

impl<'a> VideoFactory<'a> {
    /// `backends` are probed in slice order
    pub fn new(backends: &'a [Box<dyn VideoBackend>]) -> Self {
        Self { backends }
    }

    /// First backend whose probe accepts `source`
    pub fn select(&self, source: &str) -> Option<&'a dyn VideoBackend> {
        self.backends
            .iter()
            .map(Box::as_ref)
            .find(|backend| backend.can_play_type(source))
    }

    /// Instantiate the selected backend, or [`NoVideo`] when none matches
    pub fn create(&self, config: &Rc<Config>, scheduler: &Rc<dyn Scheduler>) -> Rc<dyn Video> {
        match self.select(&config.source) {
            Some(backend) => {
                debug!(backend = backend.name(), source = %config.source, "backend selected");
                backend.create(config, scheduler)
            }
            None => {
                warn!(
                    source = %config.source,
                    probed = self.backends.len(),
                    "no backend can play source, using fallback"
                );
                NoVideo::new(config, scheduler.clone())
            }
        }
    }
}
