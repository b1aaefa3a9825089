//! Components owned by the core

use std::rc::Rc;

use crate::error::Result;
use crate::plugin::Plugin;
use crate::ui_plugin::UiPlugin;

/// A plugin tagged by whether it has a render step
#[derive(Clone)]
pub enum Component {
    Visual(Rc<dyn UiPlugin>),
    Headless(Rc<dyn Plugin>),
}

impl Component {
    pub fn plugin(&self) -> &dyn Plugin {
        match self {
            Component::Visual(plugin) => plugin.as_plugin(),
            Component::Headless(plugin) => plugin.as_ref(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.plugin().name()
    }

    pub fn is_enabled(&self) -> bool {
        self.plugin().is_enabled()
    }

    pub fn enable(&self) {
        self.plugin().enable();
    }

    pub fn disable(&self) {
        self.plugin().disable();
    }

    pub fn destroy(&self) {
        self.plugin().destroy();
    }

    pub fn as_visual(&self) -> Option<&Rc<dyn UiPlugin>> {
        match self {
            Component::Visual(plugin) => Some(plugin),
            Component::Headless(_) => None,
        }
    }

    /// Render visual components; headless ones have nothing to render
    pub fn render(&self) -> Result<()> {
        match self {
            Component::Visual(plugin) => plugin.render(),
            Component::Headless(_) => Ok(()),
        }
    }
}

impl std::fmt::Debug for Component {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self {
            Component::Visual(_) => "Visual",
            Component::Headless(_) => "Headless",
        };
        f.debug_struct(kind)
            .field("name", &self.name())
            .field("enabled", &self.is_enabled())
            .finish()
    }
}
