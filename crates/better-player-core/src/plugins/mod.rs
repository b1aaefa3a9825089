//! Built-in plugins, in the order the core constructs them

mod click_to_play;
mod controller;
mod error_screen;
mod keyboard;

pub use click_to_play::ClickToPlay;
pub use controller::Controller;
pub use error_screen::ErrorScreen;
pub use keyboard::{Keyboard, Shortcut};

pub const CONTROLLER: &str = "controller";
pub const ERROR_SCREEN: &str = "error-screen";
pub const CLICK_TO_PLAY: &str = "click-to-play";
pub const KEYBOARD: &str = "keyboard";

/// Class toggled on pressed toggle buttons
pub(crate) const PRESSED: &str = "better-player__toggle-button--pressed";
