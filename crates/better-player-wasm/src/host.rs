//! Browser implementations of the core's host seams

use std::cell::RefCell;
use std::collections::HashSet;

use better_player_core::{FullscreenDriver, Scheduler, SpriteLoader, Task};
use tracing::{debug, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{Element, Response};

thread_local! {
    /// Sprites already requested by any player on this page
    static LOADED_SPRITES: RefCell<HashSet<String>> = RefCell::new(HashSet::new());
}

/// Defers tasks with `setTimeout(task, 0)`
#[derive(Default)]
pub struct TimeoutScheduler;

impl Scheduler for TimeoutScheduler {
    fn defer(&self, task: Task) {
        let Some(window) = web_sys::window() else {
            warn!("no window; deferred task dropped");
            return;
        };
        let callback = Closure::once_into_js(move || task());
        if let Err(err) =
            window.set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), 0)
        {
            warn!(?err, "setTimeout failed");
        }
    }
}

/// Fullscreen API of the document, bound to the player's root element
pub struct DocumentFullscreen {
    root: Element,
}

impl DocumentFullscreen {
    pub fn new(root: Element) -> Self {
        Self { root }
    }
}

impl FullscreenDriver for DocumentFullscreen {
    fn request(&self) {
        if let Err(err) = self.root.request_fullscreen() {
            debug!(?err, "requestFullscreen rejected");
        }
    }

    fn exit(&self) {
        if let Some(document) = web_sys::window().and_then(|w| w.document()) {
            document.exit_fullscreen();
        }
    }

    fn is_active(&self) -> bool {
        web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.fullscreen_element())
            .is_some_and(|element| element == self.root)
    }
}

/// Fetches the SVG icon sprite and inserts it, hidden, at the top of `<body>`
#[derive(Default)]
pub struct FetchSpriteLoader;

impl SpriteLoader for FetchSpriteLoader {
    fn load(&self, url: &str) {
        let first = LOADED_SPRITES.with(|loaded| loaded.borrow_mut().insert(url.to_string()));
        if !first {
            return;
        }
        let url = url.to_string();
        spawn_local(async move {
            if let Err(err) = insert_sprite(&url).await {
                warn!(%url, ?err, "sprite load failed");
                LOADED_SPRITES.with(|loaded| loaded.borrow_mut().remove(&url));
            }
        });
    }
}

async fn insert_sprite(url: &str) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or("no window")?;
    let response: Response = JsFuture::from(window.fetch_with_str(url)).await?.dyn_into()?;
    if !response.ok() {
        return Err(format!("HTTP {}", response.status()).into());
    }
    let svg = JsFuture::from(response.text()?)
        .await?
        .as_string()
        .ok_or("sprite body is not text")?;

    let document = window.document().ok_or("no document")?;
    let body = document.body().ok_or("no body")?;
    let wrapper: web_sys::HtmlElement = document.create_element("div")?.dyn_into()?;
    wrapper.set_inner_html(&svg);
    wrapper.set_hidden(true);
    wrapper.style().set_property("display", "none")?;
    body.insert_before(&wrapper, body.first_child().as_ref())?;
    debug!(%url, "sprite inserted");
    Ok(())
}
