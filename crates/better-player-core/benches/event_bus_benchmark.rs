//! Benchmark tests for better-player-core event dispatch and composition
//!
//! Run with: cargo bench -p better-player-core

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::cell::Cell;
use std::rc::Rc;

use better_player_core::{
    names, Callback, ConfigOverrides, EventBus, Host, Payload, Player, TaskQueue, Video,
};

// ============================================================================
// Helpers
// ============================================================================

fn bus_with_listeners(count: usize) -> (EventBus, Rc<Cell<u64>>) {
    let bus = EventBus::new();
    let hits = Rc::new(Cell::new(0));
    for _ in 0..count {
        let hits = hits.clone();
        bus.on("timeupdate", Callback::new(move |_| hits.set(hits.get() + 1)), None);
    }
    (bus, hits)
}

// ============================================================================
// Event Bus Benchmarks
// ============================================================================

fn bench_emit(c: &mut Criterion) {
    let mut group = c.benchmark_group("Event Bus Emit");

    for count in [1usize, 10, 100] {
        group.bench_with_input(BenchmarkId::new("listeners", count), &count, |b, &count| {
            let (bus, hits) = bus_with_listeners(count);
            b.iter(|| {
                bus.emit(black_box("timeupdate"), &Payload::None);
            });
            black_box(hits.get());
        });
    }

    group.bench_function("no_listeners", |b| {
        let (bus, _) = bus_with_listeners(10);
        b.iter(|| bus.emit(black_box("seeked"), &Payload::None));
    });

    group.finish();
}

fn bench_on_off(c: &mut Criterion) {
    let mut group = c.benchmark_group("Event Bus Registration");

    group.bench_function("on_then_off_callback", |b| {
        let (bus, _) = bus_with_listeners(10);
        let callback = Callback::new(|_| {});
        b.iter(|| {
            bus.on("timeupdate", callback.clone(), None);
            bus.off(None, Some(black_box(&callback)), None);
        });
    });

    group.bench_function("once_then_emit", |b| {
        let bus = EventBus::new();
        let callback = Callback::new(|_| {});
        b.iter(|| {
            bus.once("play", callback.clone(), None);
            bus.emit("play", &Payload::None);
        });
    });

    group.bench_function("listen_to_then_stop_listening", |b| {
        let observer = EventBus::new();
        let subjects: Vec<EventBus> = (0..8).map(|_| EventBus::new()).collect();
        b.iter(|| {
            for subject in &subjects {
                observer.listen_to(subject, "play", Callback::new(|_| {}));
            }
            observer.stop_listening(None);
        });
    });

    group.finish();
}

// ============================================================================
// Composition Benchmarks
// ============================================================================

fn bench_player_lifecycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("Player Lifecycle");

    group.bench_function("create_error_destroy", |b| {
        let queue = Rc::new(TaskQueue::new());
        b.iter(|| {
            let player =
                Player::new(ConfigOverrides::source("movie.avi"), Host::headless(queue.clone()))
                    .expect("player");
            queue.run_pending();
            black_box(player.core().plugins().len());
            player.destroy();
        });
    });

    group.bench_function("forward_video_event", |b| {
        let queue = Rc::new(TaskQueue::new());
        let player = Player::new(ConfigOverrides::default(), Host::headless(queue)).expect("player");
        player.events().on(names::PLAYER_PLAY, Callback::new(|_| {}), None);
        let video = player.core().video().clone();
        b.iter(|| video.events().emit(names::VIDEO_PLAY, &Payload::None));
    });

    group.finish();
}

criterion_group!(
    bus_benches,
    bench_emit,
    bench_on_off,
);

criterion_group!(
    lifecycle_benches,
    bench_player_lifecycle,
);

criterion_main!(
    bus_benches,
    lifecycle_benches,
);
