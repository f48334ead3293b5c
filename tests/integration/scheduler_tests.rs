//! Integration tests for tick source → timer registry → heartbeat.
//!
//! Ticks are injected either directly or by the mock delay, which signals
//! the tick source for every simulated millisecond the loop is blocked.

use crate::mock_hw::{MockBoard, MockDelay, RecordingSink};

use cardgate::access::MASTER_CARD;
use cardgate::app::service::AccessService;
use cardgate::config::SystemConfig;
use cardgate::scheduler::{HEARTBEAT, TimerId};
use cardgate::tick::{TickPolicy, TickSource};

fn config(policy: TickPolicy, heartbeat_ticks: u32) -> SystemConfig {
    SystemConfig {
        tick_policy: policy,
        heartbeat_ticks,
        ..SystemConfig::default()
    }
}

#[test]
fn heartbeat_fires_once_per_period() {
    let tick = TickSource::new();
    let mut svc = AccessService::new(config(TickPolicy::Accumulate, 10), &tick);
    let mut sink = RecordingSink::new();
    let mut board = MockBoard::new();
    let mut delay = MockDelay::new(&board);
    svc.start(&mut sink);

    // One tick per cycle, 30 cycles.
    for _ in 0..30 {
        tick.signal();
        svc.cycle(&mut board, &mut delay, &mut sink);
    }

    assert_eq!(sink.heartbeats(), vec![1, 1, 1]);
    assert_eq!(svc.timers().get(HEARTBEAT).elapsed(), 0);
}

#[test]
fn cycle_without_pending_tick_leaves_timers_alone() {
    let tick = TickSource::new();
    let mut svc = AccessService::new(config(TickPolicy::Accumulate, 10), &tick);
    let mut sink = RecordingSink::new();
    let mut board = MockBoard::new();
    let mut delay = MockDelay::new(&board);
    svc.start(&mut sink);

    for _ in 0..100 {
        svc.cycle(&mut board, &mut delay, &mut sink);
    }

    assert!(sink.heartbeats().is_empty());
    assert_eq!(svc.timers().get(HEARTBEAT).elapsed(), 0);
}

#[test]
fn accumulate_replays_ticks_missed_during_a_session() {
    let tick = TickSource::new();
    let mut svc = AccessService::new(config(TickPolicy::Accumulate, 1000), &tick);
    let mut sink = RecordingSink::new();
    let mut board = MockBoard::new();
    board.tap(Ok(MASTER_CARD), 0);
    let mut delay = MockDelay::ticking(&board, &tick, 1);
    svc.start(&mut sink);

    svc.cycle(&mut board, &mut delay, &mut sink);

    // 1000 ms dwell + two 20 ms removal polls = 1040 ticks.
    assert_eq!(sink.heartbeats(), vec![1]);
    assert_eq!(svc.timers().get(HEARTBEAT).elapsed(), 40);
    assert!(!tick.is_pending());
}

#[test]
fn coalesce_counts_a_blocked_session_as_one_tick() {
    let tick = TickSource::new();
    let mut svc = AccessService::new(config(TickPolicy::Coalesce, 1000), &tick);
    let mut sink = RecordingSink::new();
    let mut board = MockBoard::new();
    board.tap(Ok(MASTER_CARD), 0);
    let mut delay = MockDelay::ticking(&board, &tick, 1);
    svc.start(&mut sink);

    svc.cycle(&mut board, &mut delay, &mut sink);

    assert!(sink.heartbeats().is_empty());
    assert_eq!(svc.timers().get(HEARTBEAT).elapsed(), 1);
    assert!(!tick.is_pending());
}

#[test]
fn overflows_missed_by_the_consumer_are_counted() {
    let tick = TickSource::new();
    let mut svc = AccessService::new(config(TickPolicy::Accumulate, 10), &tick);
    let mut sink = RecordingSink::new();
    let mut board = MockBoard::new();
    let mut delay = MockDelay::new(&board);
    svc.start(&mut sink);

    for _ in 0..35 {
        tick.signal();
    }
    svc.cycle(&mut board, &mut delay, &mut sink);

    assert_eq!(sink.heartbeats(), vec![3]);
    assert_eq!(svc.timers().get(HEARTBEAT).elapsed(), 5);
}

#[test]
fn application_timers_share_the_registry() {
    const BLINK: TimerId = TimerId::slot::<1>();

    let tick = TickSource::new();
    let mut svc = AccessService::new(config(TickPolicy::Accumulate, 1000), &tick);
    let mut sink = RecordingSink::new();
    let mut board = MockBoard::new();
    let mut delay = MockDelay::new(&board);
    svc.start(&mut sink);
    svc.timers_mut().start(BLINK, 4);
    assert_eq!(svc.timers().active_count(), 2);

    let mut fired = 0;
    for _ in 0..12 {
        tick.signal();
        svc.cycle(&mut board, &mut delay, &mut sink);
        if svc.timers_mut().take_pulse(BLINK).is_some() {
            fired += 1;
        }
    }
    assert_eq!(fired, 3);

    svc.timers_mut().stop(BLINK);
    tick.signal();
    svc.cycle(&mut board, &mut delay, &mut sink);
    assert_eq!(svc.timers_mut().take_pulse(BLINK), None);
    assert_eq!(svc.timers().active_count(), 1);
}
