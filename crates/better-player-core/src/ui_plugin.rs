//! Visual plugins - activatable components with a rendered element
//!
//! [`UiPluginBase`] combines the activation state of a [`PluginBase`] with a
//! [`UiObject`] and a visibility flag: disabling hides the element, enabling
//! shows it again. View changes are announced on the plugin's own bus with
//! [`names::UI_UPDATE`] so the host can re-apply [`UiPlugin::bindings`].

use std::cell::Cell;
use tracing::debug;

use crate::error::Result;
use crate::events::{names, DomEvent, Payload};
use crate::plugin::{Plugin, PluginBase};
use crate::ui_object::{Binding, DomHandler, UiObject};

/// Activation and element state shared by visual plugins
pub struct UiPluginBase<T: 'static> {
    plugin: PluginBase,
    ui: UiObject<T>,
    visible: Cell<bool>,
}

impl<T: 'static> UiPluginBase<T> {
    pub fn new(
        name: &'static str,
        class_name: &'static str,
        selectors: &'static [&'static str],
        handlers: &'static [DomHandler<T>],
    ) -> Result<Self> {
        Ok(Self {
            plugin: PluginBase::new(name),
            ui: UiObject::new(name, class_name, selectors, handlers)?,
            visible: Cell::new(true),
        })
    }

    pub fn plugin(&self) -> &PluginBase {
        &self.plugin
    }

    pub fn ui(&self) -> &UiObject<T> {
        &self.ui
    }

    pub fn is_visible(&self) -> bool {
        self.visible.get()
    }

    /// Ask the host to re-apply bindings
    pub fn invalidate(&self) {
        self.plugin.events().emit(names::UI_UPDATE, &Payload::None);
    }

    /// Re-run `hook` and show the element if the plugin was disabled
    pub fn enable_with(&self, hook: impl FnOnce()) -> bool {
        let enabled = self.plugin.enable_with(hook);
        if enabled {
            self.set_visible(true);
        }
        enabled
    }

    /// Drop observation edges and hide the element
    pub fn disable(&self) {
        self.plugin.disable();
        self.set_visible(false);
    }

    /// Undelegate DOM events, then clear own listeners and edges
    pub fn destroy(&self) {
        self.ui.destroy();
        self.plugin.destroy();
        debug!(plugin = self.plugin.name(), "element released");
    }

    /// Validate and mount `template`
    pub fn render(&self, template: &str) -> Result<()> {
        self.ui.render(template)?;
        self.invalidate();
        Ok(())
    }

    /// Binding for the element's visibility
    pub fn visibility(&self) -> Binding {
        Binding::Hidden {
            hidden: !self.visible.get(),
        }
    }

    fn set_visible(&self, visible: bool) {
        if self.visible.replace(visible) != visible {
            self.invalidate();
        }
    }
}

/// A plugin with a rendered element
pub trait UiPlugin: Plugin {
    fn class_name(&self) -> &'static str;

    /// Inner markup of the root element
    fn template(&self) -> String;

    /// Current view state as patches for the mounted template
    fn bindings(&self) -> Vec<Binding>;

    /// Native event types to forward to [`UiPlugin::handle_dom_event`]
    fn event_types(&self) -> Vec<&'static str>;

    fn render(&self) -> Result<()>;

    fn is_rendered(&self) -> bool;

    /// Route a DOM event from the plugin's element through its handler table
    fn handle_dom_event(&self, event: &DomEvent, target_within: &dyn Fn(&str) -> bool);

    fn as_plugin(&self) -> &dyn Plugin;
}
