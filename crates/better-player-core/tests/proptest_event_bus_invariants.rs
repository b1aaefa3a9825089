//! Property-based invariant tests for the event bus and observer links.
//!
//! Verifies structural guarantees of `EventBus`:
//!
//! 1. `off` with no arguments always empties the registry
//! 2. Wildcard removal by callback removes exactly that callback's listeners
//! 3. Emitting an event without listeners invokes nothing
//! 4. `once` fires exactly once, with the first payload
//! 5. Repeated `listen_to` on one subject tracks it once
//! 6. `stop_listening(subject)` only detaches that subject
//! 7. Dispatch order is registration order
//! 8. Targeted removals never leave empty event names behind

use std::cell::RefCell;
use std::rc::Rc;

use better_player_core::{Callback, ContextId, EventBus, Payload};
use proptest::prelude::*;

// ── Helpers ──────────────────────────────────────────────────────────

const EVENTS: &[&str] = &["play", "pause", "timeupdate", "error", "custom:event"];

#[derive(Debug, Clone)]
enum Op {
    On { event: usize, callback: usize, context: Option<usize> },
    Once { event: usize, callback: usize },
    Off { event: Option<usize>, callback: Option<usize>, context: Option<usize> },
    Emit { event: usize },
}

fn arb_op() -> impl Strategy<Value = Op> {
    let event = 0..EVENTS.len();
    prop_oneof![
        (event.clone(), 0..4usize, proptest::option::of(0..3usize)).prop_map(
            |(event, callback, context)| Op::On { event, callback, context }
        ),
        (event.clone(), 0..4usize).prop_map(|(event, callback)| Op::Once { event, callback }),
        (
            proptest::option::of(event.clone()),
            proptest::option::of(0..4usize),
            proptest::option::of(0..3usize),
        )
            .prop_map(|(event, callback, context)| Op::Off { event, callback, context }),
        event.prop_map(|event| Op::Emit { event }),
    ]
}

struct World {
    bus: EventBus,
    callbacks: Vec<Callback>,
    contexts: Vec<ContextId>,
    fired: Rc<RefCell<Vec<usize>>>,
}

impl World {
    fn new() -> Self {
        let fired = Rc::new(RefCell::new(Vec::new()));
        let callbacks = (0..4)
            .map(|index| {
                let sink = fired.clone();
                Callback::new(move |_| sink.borrow_mut().push(index))
            })
            .collect();
        Self {
            bus: EventBus::new(),
            callbacks,
            contexts: (0..3).map(|_| ContextId::next()).collect(),
            fired,
        }
    }

    fn apply(&self, op: &Op) {
        match *op {
            Op::On { event, callback, context } => self.bus.on(
                EVENTS[event],
                self.callbacks[callback].clone(),
                context.map(|c| self.contexts[c]),
            ),
            Op::Once { event, callback } => {
                self.bus
                    .once(EVENTS[event], self.callbacks[callback].clone(), None)
            }
            Op::Off { event, callback, context } => self.bus.off(
                event.map(|e| EVENTS[e]),
                callback.map(|c| &self.callbacks[c]),
                context.map(|c| self.contexts[c]),
            ),
            Op::Emit { event } => self.bus.emit(EVENTS[event], &Payload::None),
        }
    }
}

fn json(n: i64) -> Payload {
    Payload::Json(serde_json::json!(n))
}

// ═════════════════════════════════════════════════════════════════════════
// 1. off() always empties the registry
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn off_without_arguments_empties(ops in proptest::collection::vec(arb_op(), 0..60)) {
        let world = World::new();
        for op in &ops {
            world.apply(op);
        }

        world.bus.off(None, None, None);

        prop_assert!(world.bus.is_empty());
        prop_assert!(world.bus.event_names().is_empty());
        world.fired.borrow_mut().clear();
        for event in EVENTS {
            world.bus.emit(event, &Payload::None);
        }
        prop_assert!(world.fired.borrow().is_empty());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Wildcard removal by callback
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn off_by_callback_removes_exactly_that_callback(
        registrations in proptest::collection::vec((0..EVENTS.len(), 0..4usize), 1..40),
        target in 0..4usize,
    ) {
        let world = World::new();
        for &(event, callback) in &registrations {
            world.bus.on(EVENTS[event], world.callbacks[callback].clone(), None);
        }

        world.bus.off(None, Some(&world.callbacks[target]), None);

        for (index, event) in EVENTS.iter().enumerate() {
            let expected = registrations
                .iter()
                .filter(|(e, c)| *e == index && *c != target)
                .count();
            prop_assert_eq!(world.bus.listener_count(event), expected);
        }
        for event in EVENTS {
            world.bus.emit(event, &Payload::None);
        }
        prop_assert!(!world.fired.borrow().contains(&target));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Emit isolation
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn emit_without_listeners_invokes_nothing(
        registered in 0..EVENTS.len(),
        emitted in 0..EVENTS.len(),
        callback in 0..4usize,
    ) {
        prop_assume!(registered != emitted);
        let world = World::new();
        world.bus.on(EVENTS[registered], world.callbacks[callback].clone(), None);

        world.bus.emit(EVENTS[emitted], &Payload::None);

        prop_assert!(world.fired.borrow().is_empty());
        prop_assert_eq!(world.bus.event_names(), vec![EVENTS[registered].to_string()]);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. once fires exactly once with the first payload
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn once_fires_once_with_first_payload(
        payloads in proptest::collection::vec(any::<i64>(), 1..10),
        persistent in 0..3usize,
    ) {
        let bus = EventBus::new();
        let once_seen = Rc::new(RefCell::new(Vec::new()));
        let sink = once_seen.clone();
        let once = Callback::new(move |payload: &Payload| sink.borrow_mut().push(payload.clone()));
        bus.once("e", once.clone(), None);

        let persistent_count = Rc::new(RefCell::new(0usize));
        for _ in 0..persistent {
            let count = persistent_count.clone();
            bus.on("e", Callback::new(move |_| *count.borrow_mut() += 1), None);
        }

        for &n in &payloads {
            bus.emit("e", &json(n));
        }

        prop_assert_eq!(once_seen.borrow().clone(), vec![json(payloads[0])]);
        prop_assert_eq!(*persistent_count.borrow(), persistent * payloads.len());
        prop_assert_eq!(bus.listener_count("e"), persistent);
        bus.off(None, Some(&once), None);
        prop_assert_eq!(bus.listener_count("e"), persistent);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. listen_to tracks each subject once
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn listen_to_tracks_subject_once(events in proptest::collection::vec(0..EVENTS.len(), 1..20)) {
        let observer = EventBus::new();
        let subject = EventBus::new();
        for &event in &events {
            observer.listen_to(&subject, EVENTS[event], Callback::new(|_| {}));
        }

        prop_assert_eq!(observer.listening_to_count(), 1);
        prop_assert!(observer.is_listening_to(&subject));
        for &event in &events {
            prop_assert!(observer.is_listening_to_event(&subject, EVENTS[event]));
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. stop_listening selectivity
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn stop_listening_detaches_only_the_given_subject(
        subjects in 2..6usize,
        detached in 0..6usize,
        event in 0..EVENTS.len(),
    ) {
        let detached = detached % subjects;
        let observer = EventBus::new();
        let buses: Vec<EventBus> = (0..subjects).map(|_| EventBus::new()).collect();
        for bus in &buses {
            observer.listen_to(bus, EVENTS[event], Callback::new(|_| {}));
            // the subject's own listeners are not the observer's to remove
            bus.on(EVENTS[event], Callback::new(|_| {}), None);
        }

        observer.stop_listening(Some(&buses[detached]));

        prop_assert_eq!(observer.listening_to_count(), subjects - 1);
        for (index, bus) in buses.iter().enumerate() {
            prop_assert_eq!(bus.has_context(observer.id()), index != detached);
            prop_assert_eq!(bus.listener_count(EVENTS[event]), if index == detached { 1 } else { 2 });
        }

        observer.stop_listening(None);

        prop_assert_eq!(observer.listening_to_count(), 0);
        for bus in &buses {
            prop_assert!(!bus.has_context(observer.id()));
            prop_assert_eq!(bus.listener_count(EVENTS[event]), 1);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 7. Dispatch order is registration order
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn dispatch_follows_registration_order(order in proptest::collection::vec(0..4usize, 0..20)) {
        let world = World::new();
        for &callback in &order {
            world.bus.on("e", world.callbacks[callback].clone(), None);
        }

        world.bus.emit("e", &Payload::None);

        prop_assert_eq!(world.fired.borrow().clone(), order);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 8. No empty event names
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn targeted_removal_drops_empty_names(ops in proptest::collection::vec(arb_op(), 0..60)) {
        let world = World::new();
        for op in &ops {
            world.apply(op);
        }

        for name in world.bus.event_names() {
            prop_assert!(world.bus.listener_count(&name) > 0, "empty entry for {}", name);
        }
        let total: usize = EVENTS.iter().map(|e| world.bus.listener_count(e)).sum();
        prop_assert_eq!(total == 0, world.bus.is_empty());
    }
}
