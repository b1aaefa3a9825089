//! Better Player Core - embeddable video player engine
//!
//! This crate provides the platform-independent part of the player:
//! - Per-instance event buses with tracked observer links
//! - Plugins with an enabled/disabled lifecycle gated by configuration
//! - A composition root that selects a media backend and owns the plugins
//! - The fallback and HTML-element media backends
//! - Control bar, error screen, click-to-play and keyboard plugins
//!
//! The browser binding lives in `better-player-wasm`; it implements the
//! [`host`] traits and mounts visual plugins into the page.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                          Player                                 │
//! │          (config, player-level events, commands)                │
//! ├─────────────────────────────────────────────────────────────────┤
//! │                           Core                                  │
//! │                                                                 │
//! │  ┌──────────────┐   video:*    ┌──────────────────────────────┐ │
//! │  │    Video     │ ───────────▶ │ Controller   ErrorScreen     │ │
//! │  │   Backend    │              │ ClickToPlay  Keyboard        │ │
//! │  └──────┬───────┘              └──────────────┬───────────────┘ │
//! │         │ VideoFactory                        │ core:*          │
//! │  ┌──────┴───────┐  ┌──────────────┐  ┌────────┴───────┐         │
//! │  │  HtmlVideo / │  │  Fullscreen  │  │   Event Bus /  │         │
//! │  │   NoVideo    │  │              │  │ Observer Links │         │
//! │  └──────────────┘  └──────────────┘  └────────────────┘         │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use better_player_core::{names, Callback, ConfigOverrides, Host, Player, TaskQueue};
//!
//! let queue = Rc::new(TaskQueue::new());
//! let player = Player::new(ConfigOverrides::source("movie.avi"), Host::headless(queue.clone()))?;
//!
//! player.events().on(
//!     names::PLAYER_ERROR,
//!     Callback::new(|payload| println!("{:?}", payload.as_error())),
//!     None,
//! );
//! queue.run_pending();
//! player.destroy();
//! # Ok::<(), better_player_core::Error>(())
//! ```

pub mod component;
pub mod composition;
pub mod config;
pub mod error;
pub mod events;
pub mod fullscreen;
pub mod host;
pub mod i18n;
mod observer;
pub mod player;
pub mod plugin;
pub mod plugins;
pub mod time;
pub mod ui_object;
pub mod ui_plugin;
pub mod video;

#[cfg(test)]
pub(crate) mod testing;

pub use component::Component;
pub use composition::{Core, CoreHandle};
pub use config::{Config, ConfigOverrides, I18nOverrides};
pub use error::{Error, Result};
pub use events::{names, Callback, ContextId, DomEvent, EventBus, Payload};
pub use fullscreen::{Fullscreen, FullscreenDriver, HeadlessFullscreen};
pub use host::{Host, Scheduler, SpriteLoader, Task, TaskQueue};
pub use i18n::{I18n, MessageKey};
pub use player::{Player, PlayerId};
pub use plugin::{bind, Plugin, PluginBase};
pub use ui_object::{Binding, DomHandler, UiObject};
pub use ui_plugin::{UiPlugin, UiPluginBase};
pub use video::{
    HtmlVideo, HtmlVideoBackend, MediaCapabilities, MediaElement, NoVideo, Video, VideoBackend,
    VideoError, VideoFactory,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the player library
pub fn init() {
    tracing::info!(version = VERSION, "Better Player Core initialized");
}
