//! Better Player WASM - browser binding
//!
//! Implements the core's host seams with `web-sys` and exposes the player to
//! JavaScript:
//! - `<video>` element backend and `canPlayType` capability probe
//! - `setTimeout` scheduler, document fullscreen, sprite fetch
//! - DOM mounting of the visual plugins
//!
//! ```javascript
//! import init, { BetterPlayer } from '@mando212/better-player';
//!
//! await init();
//! const player = new BetterPlayer({ source: 'movie.mp4', parentId: 'app' });
//! player.on('error', (error) => console.log(error.message));
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use better_player_core::{ConfigOverrides, Host, HtmlVideo, HtmlVideoBackend, Payload, Player};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlElement, HtmlVideoElement};

mod dom;
mod host;
mod media;
mod registry;

pub use dom::Mount;
pub use host::{DocumentFullscreen, FetchSpriteLoader, TimeoutScheduler};
pub use media::{BrowserCapabilities, VideoElement};

use registry::ListenerRegistry;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    web_sys::console::log_1(
        &format!("[Better Player WASM] Initialized v{}", better_player_core::VERSION).into(),
    );
}

/// Library version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn to_js(err: better_player_core::Error) -> JsValue {
    js_sys::Error::new(&format!("{}: {}", err.error_code(), err)).into()
}

/// Video player mounted into the page
#[wasm_bindgen]
pub struct BetterPlayer {
    player: Rc<Player>,
    mount: RefCell<Mount>,
    listeners: ListenerRegistry<js_sys::Function>,
}

#[wasm_bindgen]
impl BetterPlayer {
    /// Create a player from an options object (`{ source, parentId, keyboard, ... }`)
    #[wasm_bindgen(constructor)]
    pub fn new(options: JsValue) -> Result<BetterPlayer, JsValue> {
        let overrides: ConfigOverrides = if options.is_undefined() || options.is_null() {
            ConfigOverrides::default()
        } else {
            serde_wasm_bindgen::from_value(options)?
        };

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        let root: HtmlElement = document.create_element("div")?.dyn_into()?;
        let video_element: HtmlVideoElement = document.create_element("video")?.dyn_into()?;

        let created = Rc::new(RefCell::new(None));
        let slot = created.clone();
        let element = video_element.clone();
        let backend = HtmlVideoBackend::new(
            Rc::new(BrowserCapabilities::new(video_element.clone())),
            move || VideoElement(element.clone()),
        )
        .on_created(move |video: &Rc<HtmlVideo<VideoElement>>| {
            *slot.borrow_mut() = Some(video.clone());
        });

        let host = Host::headless(Rc::new(TimeoutScheduler))
            .with_backend(backend)
            .with_fullscreen(Rc::new(DocumentFullscreen::new(root.clone().into())))
            .with_sprite_loader(Rc::new(FetchSpriteLoader));
        let player = Player::new(overrides, host).map_err(to_js)?;

        let html_video = created.borrow_mut().take();
        let mount = Mount::new(&document, &root, &player, &video_element, html_video)?;
        if let Some(parent_id) = &player.config().parent_id {
            match document.get_element_by_id(parent_id) {
                Some(parent) => {
                    parent.append_child(&root)?;
                }
                None => tracing::warn!(%parent_id, "parent element not found"),
            }
        }

        Ok(Self {
            player,
            mount: RefCell::new(mount),
            listeners: ListenerRegistry::new(),
        })
    }

    /// Player root element, for embedders without `parentId`
    #[wasm_bindgen(getter)]
    pub fn element(&self) -> HtmlElement {
        self.mount.borrow().root().clone()
    }

    #[wasm_bindgen(getter)]
    pub fn id(&self) -> String {
        self.player.id().to_string()
    }

    /// Subscribe `listener` to a player event (`play`, `error`, ...)
    pub fn on(&self, event: String, listener: js_sys::Function) {
        self.subscribe(event, listener, false);
    }

    /// Subscribe `listener` for the next occurrence only
    pub fn once(&self, event: String, listener: js_sys::Function) {
        self.subscribe(event, listener, true);
    }

    /// Remove listeners; omitted arguments match everything
    pub fn off(&self, event: Option<String>, listener: Option<js_sys::Function>) {
        let events = self.player.events();
        if listener.is_none() {
            events.off(event.as_deref(), None, None);
        }
        self.listeners.remove(events, event.as_deref(), |function| {
            listener.as_ref().map_or(true, |f| same_function(f, function))
        });
    }

    pub fn play(&self) {
        self.player.play();
    }

    pub fn pause(&self) {
        self.player.pause();
    }

    /// Seek to `time` seconds
    pub fn seek(&self, time: f64) {
        self.player.seek(time);
    }

    #[wasm_bindgen(js_name = setVolume)]
    pub fn set_volume(&self, volume: f64) {
        self.player.set_volume(volume);
    }

    pub fn mute(&self) {
        self.player.mute();
    }

    pub fn unmute(&self) {
        self.player.unmute();
    }

    #[wasm_bindgen(js_name = requestFullscreen)]
    pub fn request_fullscreen(&self) {
        self.player.request_fullscreen();
    }

    #[wasm_bindgen(js_name = exitFullscreen)]
    pub fn exit_fullscreen(&self) {
        self.player.exit_fullscreen();
    }

    pub fn reload(&self) {
        self.player.reload();
    }

    #[wasm_bindgen(getter)]
    pub fn paused(&self) -> bool {
        self.player.is_paused()
    }

    #[wasm_bindgen(getter, js_name = currentTime)]
    pub fn current_time(&self) -> f64 {
        self.player.current_time()
    }

    #[wasm_bindgen(getter)]
    pub fn duration(&self) -> f64 {
        self.player.duration()
    }

    #[wasm_bindgen(getter)]
    pub fn volume(&self) -> f64 {
        self.player.volume()
    }

    #[wasm_bindgen(getter)]
    pub fn muted(&self) -> bool {
        self.player.is_muted()
    }

    #[wasm_bindgen(getter)]
    pub fn fullscreen(&self) -> bool {
        self.player.is_fullscreen()
    }

    /// Tear down the player and remove it from the page. Idempotent.
    pub fn destroy(&self) {
        if self.player.is_destroyed() {
            return;
        }
        self.listeners.clear();
        self.player.destroy();
        self.mount.borrow_mut().unmount();
    }
}

impl BetterPlayer {
    fn subscribe(&self, event: String, listener: js_sys::Function, once: bool) {
        let invoke = |function: &js_sys::Function, payload: &Payload| {
            let value = serde_wasm_bindgen::to_value(payload).unwrap_or(JsValue::UNDEFINED);
            if let Err(err) = function.call1(&JsValue::NULL, &value) {
                web_sys::console::error_1(&err);
            }
        };
        self.listeners
            .subscribe(self.player.events(), event, listener, once, invoke);
    }
}

fn same_function(a: &js_sys::Function, b: &js_sys::Function) -> bool {
    let a: &JsValue = a;
    let b: &JsValue = b;
    a == b
}
