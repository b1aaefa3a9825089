//! UI objects - components backed by one platform element
//!
//! A UI object declares its root element (class and attributes), the child
//! selectors its template must provide, and a static table of DOM handlers.
//! The table is checked against the declared selectors when the object is
//! built, so a handler bound to a missing child is a construction error
//! instead of a silent no-op at dispatch time.
//!
//! The core never touches real elements. The host mounts the template,
//! forwards DOM events to [`UiObject::dispatch`] and applies [`Binding`]s.

use serde::Serialize;
use std::cell::Cell;

use crate::error::{Error, Result};
use crate::events::DomEvent;

/// One row of a DOM handler table
pub struct DomHandler<T> {
    /// Native event type, e.g. `"click"`
    pub event_type: &'static str,
    /// Child the event target must be inside; `None` matches the root element
    pub selector: Option<&'static str>,
    pub handler: fn(&T, &DomEvent),
}

/// Declarative view patch applied by the host
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Binding {
    /// Toggle `class` on the child matching `selector`
    Class {
        selector: &'static str,
        class: &'static str,
        enabled: bool,
    },
    /// Replace the text content of a child
    Text { selector: &'static str, text: String },
    /// Set the value of a child input element
    Value { selector: &'static str, value: f64 },
    /// Toggle `class` on the root element
    RootClass { class: &'static str, enabled: bool },
    /// Hide the root element
    Hidden { hidden: bool },
}

/// Element-backed part of a component
pub struct UiObject<T: 'static> {
    component: &'static str,
    class_name: &'static str,
    attributes: &'static [(&'static str, &'static str)],
    selectors: &'static [&'static str],
    handlers: &'static [DomHandler<T>],
    delegated: Cell<bool>,
    mounted: Cell<bool>,
}

impl<T: 'static> UiObject<T> {
    /// Validate `handlers` against `selectors` and start delegating events
    pub fn new(
        component: &'static str,
        class_name: &'static str,
        selectors: &'static [&'static str],
        handlers: &'static [DomHandler<T>],
    ) -> Result<Self> {
        for handler in handlers {
            if let Some(selector) = handler.selector {
                if !selectors.contains(&selector) {
                    return Err(Error::UnknownSelector {
                        component,
                        selector,
                    });
                }
            }
        }

        Ok(Self {
            component,
            class_name,
            attributes: &[],
            selectors,
            handlers,
            delegated: Cell::new(true),
            mounted: Cell::new(false),
        })
    }

    /// Extra attributes of the root element
    pub fn with_attributes(mut self, attributes: &'static [(&'static str, &'static str)]) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn class_name(&self) -> &'static str {
        self.class_name
    }

    pub fn attributes(&self) -> &'static [(&'static str, &'static str)] {
        self.attributes
    }

    pub fn selectors(&self) -> &'static [&'static str] {
        self.selectors
    }

    /// Native event types the host must listen for on the root element,
    /// without duplicates, in table order
    pub fn event_types(&self) -> Vec<&'static str> {
        let mut types: Vec<&'static str> = Vec::new();
        for handler in self.handlers {
            if !types.contains(&handler.event_type) {
                types.push(handler.event_type);
            }
        }
        types
    }

    pub fn is_delegated(&self) -> bool {
        self.delegated.get()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.get()
    }

    /// Run every handler matching `event`. `target_within(selector)` tells
    /// whether the event target lies inside the child matching `selector`.
    /// Returns whether any handler ran.
    pub fn dispatch(&self, owner: &T, event: &DomEvent, target_within: &dyn Fn(&str) -> bool) -> bool {
        if !self.delegated.get() {
            return false;
        }
        let mut handled = false;
        for handler in self.handlers {
            if handler.event_type != event.event_type {
                continue;
            }
            if handler.selector.is_some_and(|selector| !target_within(selector)) {
                continue;
            }
            (handler.handler)(owner, event);
            handled = true;
        }
        handled
    }

    /// Check that `template` provides every declared child, then mark mounted
    pub fn render(&self, template: &str) -> Result<()> {
        if let Some(selector) = self
            .selectors
            .iter()
            .find(|selector| !template_provides(template, **selector))
        {
            return Err(Error::InvalidTemplate {
                component: self.component,
                selector: *selector,
            });
        }
        self.mounted.set(true);
        Ok(())
    }

    /// Stop dispatching DOM events
    pub fn undelegate(&self) {
        self.delegated.set(false);
    }

    /// Undelegate and unmount
    pub fn destroy(&self) {
        self.undelegate();
        self.mounted.set(false);
    }
}

/// Whether `template` contains an element matching a simple selector
/// (`[data-attr]` or `.class`)
fn template_provides(template: &str, selector: &str) -> bool {
    if let Some(attribute) = selector
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
    {
        return template
            .match_indices(attribute)
            .any(|(index, _)| is_attribute_at(template, index, attribute.len()));
    }
    if let Some(class) = selector.strip_prefix('.') {
        return template.split(['"', ' ', '\'']).any(|token| token == class);
    }
    template.contains(selector)
}

fn is_attribute_at(template: &str, index: usize, len: usize) -> bool {
    let before = template[..index].chars().next_back();
    let after = template[index + len..].chars().next();
    before.is_some_and(char::is_whitespace)
        && after.map_or(true, |c| c.is_whitespace() || matches!(c, '>' | '=' | '/'))
}
