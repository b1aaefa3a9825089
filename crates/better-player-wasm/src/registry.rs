//! Page listeners registered through `on` / `once`
//!
//! Each entry pairs the page's function with the [`Callback`] registered on the
//! player bus, so `off(event, fn)` can find the callback again. A `once` entry
//! removes itself after it fires.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use better_player_core::{Callback, EventBus, Payload};

struct Entry<F> {
    id: u64,
    event: String,
    function: F,
    callback: Callback,
}

type Entries<F> = RefCell<Vec<Entry<F>>>;

pub(crate) struct ListenerRegistry<F> {
    entries: Rc<Entries<F>>,
    next_id: Cell<u64>,
}

impl<F: Clone + 'static> ListenerRegistry<F> {
    pub(crate) fn new() -> Self {
        Self {
            entries: Rc::new(RefCell::new(Vec::new())),
            next_id: Cell::new(0),
        }
    }

    /// Register `function` on `bus`; `invoke` delivers a payload to it
    pub(crate) fn subscribe(
        &self,
        bus: &EventBus,
        event: String,
        function: F,
        once: bool,
        invoke: impl Fn(&F, &Payload) + 'static,
    ) {
        let id = self.next_id.replace(self.next_id.get() + 1);
        let target = function.clone();
        let entries: Option<Weak<Entries<F>>> = once.then(|| Rc::downgrade(&self.entries));
        let callback = Callback::new(move |payload: &Payload| {
            invoke(&target, payload);
            if let Some(entries) = entries.as_ref().and_then(Weak::upgrade) {
                forget(&entries, id);
            }
        });

        if once {
            bus.once(&event, callback.clone(), None);
        } else {
            bus.on(&event, callback.clone(), None);
        }
        self.entries.borrow_mut().push(Entry {
            id,
            event,
            function,
            callback,
        });
    }

    /// Unregister entries matching `event` (all when `None`) and `matches`
    pub(crate) fn remove(&self, bus: &EventBus, event: Option<&str>, matches: impl Fn(&F) -> bool) {
        self.entries.borrow_mut().retain(|entry| {
            let hit = event.map_or(true, |e| e == entry.event) && matches(&entry.function);
            if hit {
                bus.off(Some(&entry.event), Some(&entry.callback), None);
            }
            !hit
        });
    }

    pub(crate) fn clear(&self) {
        self.entries.borrow_mut().clear();
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.borrow().len()
    }
}

fn forget<F>(entries: &Entries<F>, id: u64) {
    if let Ok(mut entries) = entries.try_borrow_mut() {
        entries.retain(|entry| entry.id != id);
    }
}
