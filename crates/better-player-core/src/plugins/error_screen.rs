use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use tracing::debug;

use super::ERROR_SCREEN;
use crate::composition::CoreHandle;
use crate::error::Result;
use crate::events::{names, DomEvent, Payload};
use crate::plugin::{bind, Plugin, PluginBase};
use crate::ui_object::{Binding, DomHandler};
use crate::ui_plugin::{UiPlugin, UiPluginBase};

const ERROR_MESSAGE: &str = "[data-error-message]";
const RELOAD: &str = "[data-reload]";

const SELECTORS: &[&str] = &[ERROR_MESSAGE, RELOAD];

const HANDLERS: &[DomHandler<ErrorScreen>] = &[DomHandler {
    event_type: "click",
    selector: Some(RELOAD),
    handler: ErrorScreen::reload,
}];

const HIDE: &str = "better-player__error-screen--hide";

const TEMPLATE: &str = r##"
    <div class="better-player__error-screen-message" data-error-message></div>
    <div class="better-player__reload-button" data-reload>
      <svg class="better-player__icon"><use href="#better-player-reload"></use></svg>
    </div>"##;

/// Shows media errors with a reload button. Hidden until an error arrives.
pub struct ErrorScreen {
    weak: Weak<ErrorScreen>,
    base: UiPluginBase<ErrorScreen>,
    core: CoreHandle,
    message: RefCell<String>,
    hidden: Cell<bool>,
}

impl ErrorScreen {
    pub fn new(core: CoreHandle) -> Result<Rc<Self>> {
        let base = UiPluginBase::new(
            ERROR_SCREEN,
            "better-player__error-screen",
            SELECTORS,
            HANDLERS,
        )?;
        let plugin = Rc::new_cyclic(|weak| ErrorScreen {
            weak: weak.clone(),
            base,
            core,
            message: RefCell::new(String::new()),
            hidden: Cell::new(true),
        });
        plugin.base.plugin().activate(|| plugin.add_event_listeners());
        Ok(plugin)
    }

    pub fn is_shown(&self) -> bool {
        !self.hidden.get()
    }

    pub fn message(&self) -> String {
        self.message.borrow().clone()
    }

    fn on_error(&self, payload: &Payload) {
        if let Some(error) = payload.as_error() {
            *self.message.borrow_mut() = error.message.clone();
        }
        self.hidden.set(false);
        self.base.invalidate();
    }

    fn reload(&self, _: &DomEvent) {
        debug!("reload requested");
        self.hidden.set(true);
        self.base.invalidate();
        self.core.reload();
    }
}

impl Plugin for ErrorScreen {
    fn base(&self) -> &PluginBase {
        self.base.plugin()
    }

    fn add_event_listeners(&self) {
        self.base.plugin().events().listen_to(
            self.core.video().events(),
            names::VIDEO_ERROR,
            bind(&self.weak, Self::on_error),
        );
    }

    fn enable(&self) {
        self.base.enable_with(|| self.add_event_listeners());
    }

    fn disable(&self) {
        self.base.disable();
    }

    fn destroy(&self) {
        self.base.destroy();
    }
}

impl UiPlugin for ErrorScreen {
    fn class_name(&self) -> &'static str {
        self.base.ui().class_name()
    }

    fn template(&self) -> String {
        TEMPLATE.to_string()
    }

    fn bindings(&self) -> Vec<Binding> {
        vec![
            self.base.visibility(),
            Binding::RootClass {
                class: HIDE,
                enabled: self.hidden.get(),
            },
            Binding::Text {
                selector: ERROR_MESSAGE,
                text: self.message(),
            },
        ]
    }

    fn event_types(&self) -> Vec<&'static str> {
        self.base.ui().event_types()
    }

    fn render(&self) -> Result<()> {
        self.base.render(TEMPLATE)
    }

    fn is_rendered(&self) -> bool {
        self.base.ui().is_mounted()
    }

    fn handle_dom_event(&self, event: &DomEvent, target_within: &dyn Fn(&str) -> bool) {
        self.base.ui().dispatch(self, event, target_within);
    }

    fn as_plugin(&self) -> &dyn Plugin {
        self
    }
}
