//! Mounting a player into the page
//!
//! The core describes elements and view state; this module creates the real
//! elements, applies [`Binding`]s on every `ui:update`, and forwards DOM events
//! back into the core. Every listener added to the page is owned by the
//! [`Mount`] and removed when it is dropped.

use std::rc::{Rc, Weak};

use better_player_core::{
    names, Binding, Callback, Component, DomEvent, HtmlVideo, Player, Plugin, UiPlugin,
};
use tracing::debug;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, Event, EventTarget, HtmlElement, HtmlInputElement, HtmlVideoElement,
    KeyboardEvent, Node,
};

use crate::media::VideoElement;

/// DOM listener removed from its target on drop
struct Listener {
    target: EventTarget,
    event_type: String,
    closure: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn new(
        target: &EventTarget,
        event_type: &str,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<Self, JsValue> {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        target.add_event_listener_with_callback(event_type, closure.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            event_type: event_type.to_string(),
            closure,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(&self.event_type, self.closure.as_ref().unchecked_ref());
    }
}

/// A player's elements and page listeners
pub struct Mount {
    root: HtmlElement,
    listeners: Vec<Listener>,
}

impl Mount {
    /// Build the player's element tree under `root` and wire its events
    pub fn new(
        document: &Document,
        root: &HtmlElement,
        player: &Rc<Player>,
        video_element: &HtmlVideoElement,
        html_video: Option<Rc<HtmlVideo<VideoElement>>>,
    ) -> Result<Self, JsValue> {
        let core = player.core();
        let mut listeners = Vec::new();

        root.class_list().add_1(core.ui().class_name())?;
        for (name, value) in core.ui().attributes() {
            root.set_attribute(name, value)?;
        }
        for (property, value) in core.size_styles() {
            root.style().set_property(property, &value)?;
        }

        if let Some(video) = html_video {
            root.append_child(video_element)?;
            for event_type in HtmlVideo::<VideoElement>::native_event_types() {
                let weak = Rc::downgrade(&video);
                listeners.push(Listener::new(video_element, event_type, move |event| {
                    if let Some(video) = weak.upgrade() {
                        video.handle_native_event(&dom_event(&event));
                    }
                })?);
            }
        }

        for plugin in core.plugins() {
            if let Component::Visual(visual) = plugin {
                listeners.extend(mount_plugin(document, root, &visual)?);
            }
        }

        let weak = Rc::downgrade(player);
        listeners.push(Listener::new(root, "keydown", move |event| {
            if let Some(player) = weak.upgrade() {
                let dom = dom_event(&event);
                player.core().handle_dom_event(&dom);
                if dom.default_prevented() {
                    event.prevent_default();
                }
            }
        })?);

        let weak = Rc::downgrade(player);
        listeners.push(Listener::new(document, "fullscreenchange", move |event| {
            if let Some(player) = weak.upgrade() {
                player.core().fullscreen().notify_change(dom_event(&event));
            }
        })?);

        debug!(listeners = listeners.len(), "player mounted");
        Ok(Self {
            root: root.clone(),
            listeners,
        })
    }

    pub fn root(&self) -> &HtmlElement {
        &self.root
    }

    /// Remove page listeners and detach the root element
    pub fn unmount(&mut self) {
        self.listeners.clear();
        self.root.remove();
    }
}

fn mount_plugin(
    document: &Document,
    root: &HtmlElement,
    visual: &Rc<dyn UiPlugin>,
) -> Result<Vec<Listener>, JsValue> {
    let element: HtmlElement = document.create_element("div")?.dyn_into()?;
    element.class_list().add_1(visual.class_name())?;
    element.set_inner_html(&visual.template());
    root.append_child(&element)?;
    apply_bindings(&element, &visual.bindings());

    // held by the plugin's own bus, so only a weak reference back
    let weak: Weak<dyn UiPlugin> = Rc::downgrade(visual);
    let target = element.clone();
    visual.events().on(
        names::UI_UPDATE,
        Callback::new(move |_| {
            if let Some(plugin) = weak.upgrade() {
                apply_bindings(&target, &plugin.bindings());
            }
        }),
        None,
    );

    let mut listeners = Vec::new();
    for event_type in visual.event_types() {
        let weak: Weak<dyn UiPlugin> = Rc::downgrade(visual);
        let scope = element.clone();
        listeners.push(Listener::new(&element, event_type, move |event| {
            let Some(plugin) = weak.upgrade() else {
                return;
            };
            let dom = dom_event(&event);
            let target = event.target().and_then(|t| t.dyn_into::<Element>().ok());
            let within = |selector: &str| {
                target
                    .as_ref()
                    .and_then(|t| t.closest(selector).ok().flatten())
                    .is_some_and(|found| {
                        let node: &Node = &found;
                        scope.contains(Some(node))
                    })
            };
            plugin.handle_dom_event(&dom, &within);
            if dom.default_prevented() {
                event.prevent_default();
            }
        })?);
    }
    Ok(listeners)
}

fn dom_event(event: &Event) -> DomEvent {
    let mut dom = DomEvent::new(event.type_());
    dom.key = event.dyn_ref::<KeyboardEvent>().map(KeyboardEvent::key);
    dom.target_value = event
        .target()
        .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
        .map(|input| input.value_as_number())
        .filter(|value| value.is_finite());
    dom
}

fn apply_bindings(element: &HtmlElement, bindings: &[Binding]) {
    for binding in bindings {
        if let Err(err) = apply_binding(element, binding) {
            debug!(?err, ?binding, "binding not applied");
        }
    }
}

fn apply_binding(element: &HtmlElement, binding: &Binding) -> Result<(), JsValue> {
    match binding {
        Binding::Class {
            selector,
            class,
            enabled,
        } => {
            if let Some(child) = element.query_selector(selector)? {
                child.class_list().toggle_with_force(class, *enabled)?;
            }
        }
        Binding::Text { selector, text } => {
            if let Some(child) = element.query_selector(selector)? {
                child.set_text_content(Some(text));
            }
        }
        Binding::Value { selector, value } => {
            let input = element
                .query_selector(selector)?
                .and_then(|child| child.dyn_into::<HtmlInputElement>().ok());
            if let Some(input) = input {
                input.set_value(&value.to_string());
            }
        }
        Binding::RootClass { class, enabled } => {
            element.class_list().toggle_with_force(class, *enabled)?;
        }
        Binding::Hidden { hidden } => element.set_hidden(*hidden),
    }
    Ok(())
}
