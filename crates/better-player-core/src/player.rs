//! Player - the embedder-facing facade
//!
//! Resolves configuration, builds and renders a [`Core`], and republishes
//! backend events under the player-level vocabulary (`play`, `pause`,
//! `timeupdate`, ..., `error`). Embedders subscribe with
//! `player.events().on(..)` / `once(..)`.

use serde::Serialize;
use std::cell::Cell;
use std::fmt;
use std::rc::{Rc, Weak};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::composition::Core;
use crate::config::{Config, ConfigOverrides};
use crate::error::Result;
use crate::events::{names, Callback, EventBus, Payload};
use crate::host::Host;
use crate::plugin::bind;

/// Backend event -> player event
const FORWARDED: &[(&str, &str)] = &[
    (names::VIDEO_PLAY, names::PLAYER_PLAY),
    (names::VIDEO_PAUSE, names::PLAYER_PAUSE),
    (names::VIDEO_VOLUMECHANGE, names::PLAYER_VOLUMECHANGE),
    (names::VIDEO_TIMEUPDATE, names::PLAYER_TIMEUPDATE),
    (names::VIDEO_ENDED, names::PLAYER_ENDED),
    (names::VIDEO_SEEKING, names::PLAYER_SEEKING),
    (names::VIDEO_SEEKED, names::PLAYER_SEEKED),
    (names::VIDEO_ERROR, names::PLAYER_ERROR),
];

/// Unique identifier of a player instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PlayerId(Uuid);

impl PlayerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PlayerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Video player
pub struct Player {
    id: PlayerId,
    weak: Weak<Player>,
    events: EventBus,
    core: Rc<Core>,
    destroyed: Cell<bool>,
}

impl Player {
    /// Build and render a player. Only integration mistakes (bad
    /// configuration, broken templates) fail; media errors arrive as `error`
    /// events.
    #[instrument(skip_all)]
    pub fn new(overrides: ConfigOverrides, host: Host) -> Result<Rc<Self>> {
        let config = Config::resolve(overrides)?;
        let id = PlayerId::new();
        let core = Core::new(config, host)?;

        let player = Rc::new_cyclic(|weak| Player {
            id,
            weak: weak.clone(),
            events: EventBus::new(),
            core,
            destroyed: Cell::new(false),
        });
        player.add_event_listeners();
        player.core.render()?;

        info!(player = %id, backend = player.core.video().name(), "player created");
        Ok(player)
    }

    /// Build a player from JSON options (`{"source": "...", "keyboard": false}`)
    pub fn from_json(json: &str, host: Host) -> Result<Rc<Self>> {
        let overrides: ConfigOverrides = serde_json::from_str(json)?;
        Self::new(overrides, host)
    }

    fn add_event_listeners(&self) {
        let video = self.core.video().events();
        for &(from, to) in FORWARDED {
            let weak = self.weak.clone();
            self.events.listen_to(
                video,
                from,
                Callback::new(move |payload| {
                    if let Some(player) = weak.upgrade() {
                        player.events.emit(to, payload);
                    }
                }),
            );
        }
        self.events.listen_to(
            self.core.events(),
            names::CORE_FULLSCREENCHANGE,
            bind(&self.weak, Player::on_fullscreen_change),
        );
    }

    fn on_fullscreen_change(&self, payload: &Payload) {
        let event = if self.core.is_fullscreen() {
            names::PLAYER_REQUESTFULLSCREEN
        } else {
            names::PLAYER_EXITFULLSCREEN
        };
        self.events.emit(event, payload);
    }

    pub fn id(&self) -> PlayerId {
        self.id
    }

    /// Player-level events
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn core(&self) -> &Rc<Core> {
        &self.core
    }

    pub fn config(&self) -> &Config {
        self.core.config()
    }

    pub fn is_paused(&self) -> bool {
        self.core.video().is_paused()
    }

    /// Seconds
    pub fn current_time(&self) -> f64 {
        self.core.video().current_time()
    }

    /// Seconds; NaN when unknown
    pub fn duration(&self) -> f64 {
        self.core.video().duration()
    }

    pub fn volume(&self) -> f64 {
        self.core.video().volume()
    }

    pub fn is_muted(&self) -> bool {
        self.volume() == 0.0
    }

    pub fn is_fullscreen(&self) -> bool {
        self.core.is_fullscreen()
    }

    pub fn play(&self) {
        self.core.video().play();
    }

    pub fn pause(&self) {
        self.core.video().pause();
    }

    pub fn seek(&self, time: f64) {
        self.core.video().seek(time);
    }

    pub fn set_volume(&self, volume: f64) {
        self.core.video().set_volume(volume);
    }

    pub fn mute(&self) {
        self.core.video().mute();
    }

    /// Restores the volume used before muting
    pub fn unmute(&self) {
        self.core.video().unmute();
    }

    pub fn request_fullscreen(&self) {
        self.core.request_fullscreen();
    }

    pub fn exit_fullscreen(&self) {
        self.core.exit_fullscreen();
    }

    pub fn reload(&self) {
        self.core.reload();
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed.get()
    }

    /// Drop every embedder listener and tear down the core. Idempotent.
    pub fn destroy(&self) {
        if self.destroyed.replace(true) {
            return;
        }
        self.events.off_all();
        self.events.stop_listening(None);
        self.core.destroy();
        debug!(player = %self.id, "player destroyed");
    }
}
