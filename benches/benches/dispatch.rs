// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::rc::Rc;

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use understory_event_dispatch::dispatcher::{DispatchMode, EventDispatcher};
use understory_event_dispatch::error::DispatchResult;
use understory_event_dispatch::event::{Event, EventState, EventType};
use understory_event_dispatch::strategy::{DispatchStrategy, StrategyChain};

const ROOT: EventType = EventType::new(1);
const CHILD: EventType = EventType::new(2);

struct Ev {
    kind: EventType,
    state: EventState,
}

impl Event for Ev {
    fn event_type(&self) -> EventType {
        self.kind
    }

    fn state(&self) -> &EventState {
        &self.state
    }
}

fn ev(kind: EventType) -> Rc<Ev> {
    Rc::new(Ev {
        kind,
        state: EventState::new(),
    })
}

/// Raises `fanout` child events for every root event.
struct FanOut {
    fanout: usize,
}

impl DispatchStrategy<Ev, u32> for FanOut {
    fn can_dispatch(&self, event: &Ev) -> bool {
        event.kind == ROOT
    }

    fn dispatch(&self, d: &EventDispatcher<Ev, u32>, _: &Ev, target: &u32) -> DispatchResult {
        for _ in 0..self.fanout {
            d.dispatch(&ev(CHILD), target, DispatchMode::Queued)?;
        }
        Ok(())
    }
}

/// Applies to everything and does nothing.
struct Pass;

impl DispatchStrategy<Ev, u32> for Pass {
    fn can_dispatch(&self, _: &Ev) -> bool {
        true
    }

    fn dispatch(&self, _: &EventDispatcher<Ev, u32>, _: &Ev, _: &u32) -> DispatchResult {
        Ok(())
    }
}

fn bench_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("understory_event_dispatch");
    group.sample_size(50);

    for &(roots, fanout) in &[(64_usize, 0_usize), (64, 4), (1_024, 4)] {
        let name = format!("queued_drain(roots={roots},fanout={fanout})");
        group.bench_function(name, |b| {
            b.iter_batched(
                || {
                    let d = EventDispatcher::new(StrategyChain::new().with(FanOut { fanout }));
                    let events: Vec<_> = (0..roots).map(|_| ev(ROOT)).collect();
                    (d, events)
                },
                |(d, events)| {
                    d.close_gate();
                    for e in &events {
                        d.dispatch(e, &0, DispatchMode::Queued).unwrap();
                    }
                    d.open_gate().unwrap();
                    black_box(d.stats());
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.bench_function("immediate_seven_strategies", |b| {
        let mut chain = StrategyChain::new();
        for _ in 0..7 {
            chain = chain.with(Pass);
        }
        let d = EventDispatcher::new(chain);
        b.iter(|| {
            let e = ev(ROOT);
            d.dispatch(&e, &0, DispatchMode::Immediate).unwrap();
            black_box(e);
        });
    });

    group.finish();
}

criterion_group!(benches, bench_dispatch);
criterion_main!(benches);
