//! Integration tests for the AccessService → FSM → reader/indicator loop.
//!
//! Each test scripts one or more card taps on the mock board and runs
//! whole main-loop cycles, then checks the side-effect timeline.

use crate::mock_hw::{HwCall, MockBoard, MockDelay, RecordingSink};

use cardgate::access::{BLOCKED_CARD, CardId, Decision, MASTER_CARD};
use cardgate::app::events::AppEvent;
use cardgate::app::ports::Channel;
use cardgate::app::service::AccessService;
use cardgate::config::SystemConfig;
use cardgate::error::ReaderError;
use cardgate::fsm::StateId;
use cardgate::tick::TickSource;

fn run_cycles(
    svc: &mut AccessService<'_>,
    board: &mut MockBoard,
    sink: &mut RecordingSink,
    n: usize,
) {
    let mut delay = MockDelay::new(board);
    for _ in 0..n {
        svc.cycle(&mut *board, &mut delay, &mut *sink);
    }
}

fn started(tick: &TickSource) -> (AccessService<'_>, RecordingSink) {
    let mut svc = AccessService::new(SystemConfig::default(), tick);
    let mut sink = RecordingSink::new();
    svc.start(&mut sink);
    (svc, sink)
}

// ── Idle ──────────────────────────────────────────────────────

#[test]
fn idle_loop_polls_once_per_cycle_and_never_actuates() {
    let tick = TickSource::new();
    let (mut svc, mut sink) = started(&tick);
    let mut board = MockBoard::new();

    run_cycles(&mut svc, &mut board, &mut sink, 5);

    let poll_ms = SystemConfig::default().presence_poll_ms;
    let expected: Vec<HwCall> = std::iter::repeat_n([HwCall::Poll(false), HwCall::Delay(poll_ms)], 5)
        .flatten()
        .collect();
    assert_eq!(board.calls(), expected);
    assert_eq!(svc.state(), StateId::WaitingForCard);
    assert_eq!(svc.cycles(), 5);
    assert_eq!(sink.events, vec![AppEvent::Started]);
}

#[test]
fn idle_cycle_yields_exactly_once() {
    let tick = TickSource::new();
    let (mut svc, mut sink) = started(&tick);
    let mut board = MockBoard::new();

    run_cycles(&mut svc, &mut board, &mut sink, 1);

    let delays: Vec<HwCall> = board
        .calls()
        .into_iter()
        .filter(|c| matches!(c, HwCall::Delay(_)))
        .collect();
    assert_eq!(
        delays,
        vec![HwCall::Delay(SystemConfig::default().presence_poll_ms)]
    );
}

// ── Decisions ─────────────────────────────────────────────────

#[test]
fn master_card_pulses_granted_for_dwell() {
    let tick = TickSource::new();
    let (mut svc, mut sink) = started(&tick);
    let mut board = MockBoard::new();
    board.tap(Ok(MASTER_CARD), 0);

    run_cycles(&mut svc, &mut board, &mut sink, 1);

    let cfg = SystemConfig::default();
    assert_eq!(board.pulses(), vec![(Channel::Granted, cfg.grant_dwell_ms)]);
    assert!(sink.contains(&AppEvent::CardRead(MASTER_CARD)));
    assert!(sink.contains(&AppEvent::AccessDecided {
        card: MASTER_CARD,
        decision: Decision::Granted,
    }));
    assert!(sink.contains(&AppEvent::CardRemoved));
    assert_eq!(svc.state(), StateId::WaitingForCard);
}

#[test]
fn blocked_card_pulses_denied_for_dwell() {
    let tick = TickSource::new();
    let (mut svc, mut sink) = started(&tick);
    let mut board = MockBoard::new();
    board.tap(Ok(BLOCKED_CARD), 0);

    run_cycles(&mut svc, &mut board, &mut sink, 1);

    let cfg = SystemConfig::default();
    assert_eq!(board.pulses(), vec![(Channel::Denied, cfg.deny_dwell_ms)]);
    assert!(sink.contains(&AppEvent::AccessDecided {
        card: BLOCKED_CARD,
        decision: Decision::Denied,
    }));
}

#[test]
fn unknown_card_gets_short_status_blink() {
    let tick = TickSource::new();
    let (mut svc, mut sink) = started(&tick);
    let mut board = MockBoard::new();
    let stranger = CardId::new([0xDE, 0xAD, 0xBE, 0xEF]);
    board.tap(Ok(stranger), 0);

    run_cycles(&mut svc, &mut board, &mut sink, 1);

    let cfg = SystemConfig::default();
    assert_eq!(board.pulses(), vec![(Channel::Status, cfg.unknown_pulse_ms)]);
    assert!(sink.contains(&AppEvent::AccessDecided {
        card: stranger,
        decision: Decision::Unrecognized,
    }));
}

#[test]
fn read_failure_skips_actuation_until_removed() {
    let tick = TickSource::new();
    let (mut svc, mut sink) = started(&tick);
    let mut board = MockBoard::new();
    board.tap(Err(ReaderError::Collision), 2);

    run_cycles(&mut svc, &mut board, &mut sink, 1);

    assert!(!board.any_indicator());
    assert_eq!(board.read_count(), 1);
    assert!(sink.contains(&AppEvent::ReadFailed(ReaderError::Collision)));
    assert!(!sink
        .events
        .iter()
        .any(|e| matches!(e, AppEvent::CardRead(_) | AppEvent::AccessDecided { .. })));
    assert!(sink.contains(&AppEvent::CardRemoved));
}

// ── Session ordering ──────────────────────────────────────────

#[test]
fn session_side_effects_are_strictly_ordered() {
    let tick = TickSource::new();
    let (mut svc, mut sink) = started(&tick);
    let mut board = MockBoard::new();
    board.tap(Ok(MASTER_CARD), 1);

    run_cycles(&mut svc, &mut board, &mut sink, 1);

    let cfg = SystemConfig::default();
    assert_eq!(
        board.calls(),
        vec![
            HwCall::Poll(true),
            HwCall::Read,
            HwCall::Indicator { channel: Channel::Granted, on: true },
            HwCall::Delay(cfg.grant_dwell_ms),
            HwCall::Indicator { channel: Channel::Granted, on: false },
            // Removal wait: still there, then two absent polls.
            HwCall::Poll(true),
            HwCall::Delay(cfg.removal_poll_ms),
            HwCall::Poll(false),
            HwCall::Delay(cfg.removal_poll_ms),
            HwCall::Poll(false),
        ]
    );
}

#[test]
fn card_left_on_reader_is_decided_once() {
    let tick = TickSource::new();
    let (mut svc, mut sink) = started(&tick);
    let mut board = MockBoard::new();
    board.tap(Ok(MASTER_CARD), 25);

    run_cycles(&mut svc, &mut board, &mut sink, 3);

    assert_eq!(board.read_count(), 1);
    assert_eq!(board.pulses().len(), 1);
}

#[test]
fn removal_flicker_does_not_end_session() {
    let tick = TickSource::new();
    let (mut svc, mut sink) = started(&tick);
    let mut board = MockBoard::new();
    // A single absent poll between present ones is RF noise, not removal.
    board.queue_read(Ok(MASTER_CARD));
    board.script_presence(&[true, false, true, false, false]);

    run_cycles(&mut svc, &mut board, &mut sink, 1);

    let polls: Vec<HwCall> = board
        .calls()
        .into_iter()
        .filter(|c| matches!(c, HwCall::Poll(_)))
        .collect();
    assert_eq!(
        polls,
        vec![
            HwCall::Poll(true),
            HwCall::Poll(false),
            HwCall::Poll(true),
            HwCall::Poll(false),
            HwCall::Poll(false),
        ]
    );
    assert_eq!(svc.state(), StateId::WaitingForCard);
    assert_eq!(
        sink.events.iter().filter(|e| **e == AppEvent::CardRemoved).count(),
        1
    );
}

#[test]
fn consecutive_taps_are_independent_sessions() {
    let tick = TickSource::new();
    let (mut svc, mut sink) = started(&tick);
    let mut board = MockBoard::new();
    board.tap(Ok(MASTER_CARD), 0);

    run_cycles(&mut svc, &mut board, &mut sink, 1);
    board.clear_field();
    board.tap(Ok(BLOCKED_CARD), 0);
    run_cycles(&mut svc, &mut board, &mut sink, 1);

    let cfg = SystemConfig::default();
    assert_eq!(
        board.pulses(),
        vec![
            (Channel::Granted, cfg.grant_dwell_ms),
            (Channel::Denied, cfg.deny_dwell_ms),
        ]
    );
    let removed = sink
        .events
        .iter()
        .filter(|e| **e == AppEvent::CardRemoved)
        .count();
    assert_eq!(removed, 2);
}

#[test]
fn state_changes_are_reported_in_order() {
    let tick = TickSource::new();
    let (mut svc, mut sink) = started(&tick);
    let mut board = MockBoard::new();
    board.tap(Ok(MASTER_CARD), 0);

    run_cycles(&mut svc, &mut board, &mut sink, 1);

    let path: Vec<(StateId, StateId)> = sink
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::StateChanged { from, to } => Some((*from, *to)),
            _ => None,
        })
        .collect();
    assert_eq!(
        path,
        vec![
            (StateId::WaitingForCard, StateId::ReadingUid),
            (StateId::ReadingUid, StateId::Granted),
            (StateId::Granted, StateId::WaitingForRemoval),
            (StateId::WaitingForRemoval, StateId::WaitingForCard),
        ]
    );
}
