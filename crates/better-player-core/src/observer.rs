//! Observer links - tracked subscriptions from one bus onto another
//!
//! `observer.listen_to(subject, ..)` registers a listener on `subject` whose
//! context is the observer's [`ContextId`], and remembers `subject` on the
//! observer. The observer can later drop every edge it created with
//! [`EventBus::stop_listening`] without the subject knowing anything beyond the
//! context slot of its listener records.
//!
//! Subjects are remembered weakly: an observer never keeps a subject alive.

use std::rc::{Rc, Weak};
use tracing::debug;

use crate::events::{BusInner, Callback, EventBus};

impl EventBus {
    /// Listen to `event` on `subject`, recording the edge on this bus
    pub fn listen_to(&self, subject: &EventBus, event: &str, callback: Callback) {
        {
            let mut subjects = self.inner.listening_to.borrow_mut();
            if !subjects.iter().any(|item| is_same(item, &subject.inner)) {
                subjects.push(Rc::downgrade(&subject.inner));
            }
        }
        subject.on(event, callback, Some(self.id()));
    }

    /// Remove the edges this bus created.
    ///
    /// With a subject, every listener on it whose context is this bus is removed
    /// regardless of event name or callback. Without one, this is done for
    /// every tracked subject and the subject set is cleared.
    pub fn stop_listening(&self, subject: Option<&EventBus>) {
        match subject {
            Some(subject) => {
                subject.off(None, None, Some(self.id()));
                self.inner
                    .listening_to
                    .borrow_mut()
                    .retain(|item| !is_same(item, &subject.inner));
            }
            None => {
                let subjects = std::mem::take(&mut *self.inner.listening_to.borrow_mut());
                if !subjects.is_empty() {
                    debug!(observer = %self.id(), subjects = subjects.len(), "stop listening");
                }
                for inner in subjects.iter().filter_map(Weak::upgrade) {
                    EventBus { inner }.off(None, None, Some(self.id()));
                }
            }
        }
    }

    /// Remove only this bus's edges for `event` on `subject`. The subject leaves
    /// the tracked set once no edge to it remains.
    pub fn stop_listening_to(&self, subject: &EventBus, event: &str) {
        subject.off(Some(event), None, Some(self.id()));
        if !subject.has_context(self.id()) {
            self.inner
                .listening_to
                .borrow_mut()
                .retain(|item| !is_same(item, &subject.inner));
        }
    }

    /// Whether `subject` is in this bus's tracked set
    pub fn is_listening_to(&self, subject: &EventBus) -> bool {
        self.inner
            .listening_to
            .borrow()
            .iter()
            .any(|item| is_same(item, &subject.inner))
    }

    /// Whether this bus has a live edge for `event` on `subject`
    pub fn is_listening_to_event(&self, subject: &EventBus, event: &str) -> bool {
        subject.has_context_for(event, self.id())
    }

    /// Number of tracked subjects
    pub fn listening_to_count(&self) -> usize {
        self.inner.listening_to.borrow().len()
    }
}

fn is_same(item: &Weak<BusInner>, inner: &Rc<BusInner>) -> bool {
    std::ptr::eq(item.as_ptr(), Rc::as_ptr(inner))
}
