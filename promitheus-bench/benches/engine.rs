//! Promitheus Benchmark Suite
//!
//! Per-call costs of the hot paths:
//!   mood_classify_grid ............ 441 classifications
//!   event_log_into_full_history ... one event with 100 already stored
//!   decay_relax_partial ........... one partial decay step
//!   thoughts_generate_3 ........... candidate pool + shuffle
//!   render_markdown_full .......... report with thoughts and 5 events
//!   engine_log_event_memory_store . full read-modify-write cycle

use chrono::{Duration, TimeZone, Utc};
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::StdRng;

use promitheus_core::clock::ManualClock;
use promitheus_core::config::{DecayConfig, EventConfig, InjectConfig, PromitheusConfig};
use promitheus_core::decay;
use promitheus_core::engine::Engine;
use promitheus_core::events;
use promitheus_core::mood;
use promitheus_core::persistence::MemoryStore;
use promitheus_core::render;
use promitheus_core::thoughts::ThoughtPool;
use promitheus_core::types::{AgentId, Axes, EmotionalState, Event};

fn start() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

fn full_history(state: &mut EmotionalState) -> Vec<Event> {
    let mut history = Vec::new();
    let config = EventConfig::default();
    for i in 0..config.history_limit {
        events::log_event(state, &mut history, "learning", &format!("event {i}"), None, start(), &config);
    }
    history
}

fn bench_classify(c: &mut Criterion) {
    c.bench_function("mood_classify_grid", |b| {
        b.iter(|| {
            for vi in 0..21 {
                for ai in 0..21 {
                    let v = f64::from(vi) / 10.0 - 1.0;
                    let a = f64::from(ai) / 20.0;
                    black_box(mood::classify(black_box(v), black_box(a), black_box(0.5)));
                }
            }
        });
    });
}

fn bench_log_event(c: &mut Criterion) {
    let config = EventConfig::default();
    let mut state = EmotionalState::new(Axes::DEFAULT, start());
    let mut history = full_history(&mut state);

    c.bench_function("event_log_into_full_history", |b| {
        b.iter(|| {
            let outcome = events::log_event(
                black_box(&mut state),
                black_box(&mut history),
                "milestone",
                "Shipped",
                None,
                start(),
                &config,
            );
            black_box(outcome);
        });
    });
}

fn bench_decay(c: &mut Criterion) {
    let config = DecayConfig::default();
    let mut excited = EmotionalState::new(Axes::DEFAULT, start());
    excited.valence = 0.9;
    excited.arousal = 0.9;
    excited.energy = 0.2;
    let now = start() + Duration::hours(3);

    c.bench_function("decay_relax_partial", |b| {
        b.iter(|| {
            let mut state = excited.clone();
            black_box(decay::apply_decay(black_box(&mut state), now, &config));
        });
    });
}

fn bench_thoughts(c: &mut Criterion) {
    let pool = ThoughtPool::default();
    let state = EmotionalState::new(Axes::new(0.8, 0.9, 0.2), start());
    let mut rng = StdRng::seed_from_u64(1);

    c.bench_function("thoughts_generate_3", |b| {
        b.iter(|| black_box(pool.generate(black_box(&state), 3, &mut rng)));
    });
}

fn bench_render(c: &mut Criterion) {
    let mut state = EmotionalState::new(Axes::DEFAULT, start());
    let history = full_history(&mut state);
    let thoughts = vec!["One.".to_string(), "Two.".to_string(), "Three.".to_string()];
    let config = InjectConfig::default();

    c.bench_function("render_markdown_full", |b| {
        b.iter(|| {
            black_box(render::render_markdown(
                black_box(&state),
                &thoughts,
                &history,
                start(),
                &config,
            ))
        });
    });
}

fn bench_engine_cycle(c: &mut Criterion) {
    let Ok(agent) = AgentId::new("bench") else {
        return;
    };
    let mut engine = Engine::new(agent, MemoryStore::new(), PromitheusConfig::default())
        .with_clock(ManualClock::new(start()))
        .with_rng(StdRng::seed_from_u64(2));

    c.bench_function("engine_log_event_memory_store", |b| {
        b.iter(|| black_box(engine.log_event("success", "bench", Some(0.5)).ok()));
    });
}

criterion_group!(
    benches,
    bench_classify,
    bench_log_event,
    bench_decay,
    bench_thoughts,
    bench_render,
    bench_engine_cycle,
);
criterion_main!(benches);
