//! Access service — the hexagonal core.
//!
//! [`AccessService`] owns the FSM, its context and the timer registry.
//! All I/O flows through port traits injected at call sites, making the
//! entire loop testable with mock adapters.
//!
//! ```text
//!  ReaderPort ───▶ ┌─────────────────────────┐ ──▶ EventSink
//!                  │      AccessService      │
//! IndicatorPort ◀──│  FSM · TimerRegistry    │ ◀── TickSource (ISR)
//!                  └─────────────────────────┘
//! ```
//!
//! One [`cycle`](AccessService::cycle) is one pass of the main loop: a
//! single presence poll, the complete card session if a card showed up
//! (read, decide, actuate and wait for removal, all blocking), then one
//! scheduler scan and the heartbeat check.

use embedded_hal::delay::DelayNs;
use log::{debug, info};

use crate::access::AccessList;
use crate::config::SystemConfig;
use crate::fsm::context::FsmContext;
use crate::fsm::states::build_state_table;
use crate::fsm::{Fsm, StateId};
use crate::scheduler::{HEARTBEAT, TimerRegistry};
use crate::tick::TickSource;

use super::events::AppEvent;
use super::ports::{EventSink, IndicatorPort, ReaderPort};

// ───────────────────────────────────────────────────────────────
// AccessService
// ───────────────────────────────────────────────────────────────

pub struct AccessService<'t> {
    fsm: Fsm,
    ctx: FsmContext,
    timers: TimerRegistry,
    tick: &'t TickSource,
    cycles: u64,
}

impl<'t> AccessService<'t> {
    /// Construct the service with the compiled-in access list.
    ///
    /// Does **not** start the FSM — call [`start`](Self::start) next.
    pub fn new(config: SystemConfig, tick: &'t TickSource) -> Self {
        Self::with_access_list(config, AccessList::default(), tick)
    }

    pub fn with_access_list(
        config: SystemConfig,
        access_list: AccessList<'static>,
        tick: &'t TickSource,
    ) -> Self {
        let timers = TimerRegistry::new(config.tick_policy);
        Self {
            fsm: Fsm::new(build_state_table(), StateId::WaitingForCard),
            ctx: FsmContext::new(config, access_list),
            timers,
            tick,
            cycles: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Arm the heartbeat timer and enter `WaitingForCard`.
    pub fn start(&mut self, sink: &mut impl EventSink) {
        self.timers.start(HEARTBEAT, self.ctx.config.heartbeat_ticks);
        self.fsm.start(&mut self.ctx);
        sink.emit(&AppEvent::Started);
        info!("System Init Done. Waiting for Card...");
    }

    /// The main loop.  Never returns.
    pub fn run(
        &mut self,
        hw: &mut (impl ReaderPort + IndicatorPort),
        delay: &mut impl DelayNs,
        sink: &mut impl EventSink,
    ) -> ! {
        loop {
            self.cycle(hw, delay, sink);
        }
    }

    // ── Per-iteration orchestration ───────────────────────────

    /// One main-loop iteration.
    ///
    /// `hw` must satisfy both [`ReaderPort`] and [`IndicatorPort`]; see
    /// [`Board`](crate::adapters::board::Board).
    pub fn cycle(
        &mut self,
        hw: &mut (impl ReaderPort + IndicatorPort),
        delay: &mut impl DelayNs,
        sink: &mut impl EventSink,
    ) {
        self.cycles += 1;

        // 1. One pass through WaitingForCard; a present card runs the whole
        //    session to completion before we come back here.
        self.step(hw, delay, sink);
        while self.fsm.current_state() != StateId::WaitingForCard {
            self.step(hw, delay, sink);
        }

        // 2. Scheduler scan + heartbeat.
        self.service_timers(sink);
    }

    /// Advance the FSM by one step: feed it the observation its current
    /// state needs, tick it, report transitions and apply indicator output.
    pub fn step(
        &mut self,
        hw: &mut (impl ReaderPort + IndicatorPort),
        delay: &mut impl DelayNs,
        sink: &mut impl EventSink,
    ) -> StateId {
        let prev = self.fsm.current_state();

        match prev {
            StateId::WaitingForCard | StateId::WaitingForRemoval => {
                self.ctx.card_present = hw.is_card_present();
            }
            StateId::ReadingUid => {
                self.ctx.read_result = Some(hw.read_uid());
            }
            StateId::Granted | StateId::Denied | StateId::Unrecognized => {}
        }

        let next = self.fsm.tick(&mut self.ctx);
        if next != prev {
            self.report_transition(prev, next, sink);
        }

        self.apply_indicators(hw, delay);

        match (prev, next) {
            (StateId::WaitingForCard, StateId::WaitingForCard) => {
                delay.delay_ms(self.ctx.config.presence_poll_ms);
            }
            (StateId::WaitingForRemoval, StateId::WaitingForRemoval) => {
                delay.delay_ms(self.ctx.config.removal_poll_ms);
            }
            _ => {}
        }

        next
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn state(&self) -> StateId {
        self.fsm.current_state()
    }

    pub fn timers(&self) -> &TimerRegistry {
        &self.timers
    }

    /// Application timers live in the same registry as the heartbeat;
    /// slot 0 is reserved for it.
    pub fn timers_mut(&mut self) -> &mut TimerRegistry {
        &mut self.timers
    }

    /// Main-loop iterations executed since startup.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn config(&self) -> &SystemConfig {
        &self.ctx.config
    }

    // ── Internal ──────────────────────────────────────────────

    fn service_timers(&mut self, sink: &mut impl EventSink) {
        let ticks = self.timers.scan(self.tick);
        if ticks > 1 {
            debug!("Scan replayed {} ticks", ticks);
        }
        if let Some(overflows) = self.timers.take_pulse(HEARTBEAT) {
            sink.emit(&AppEvent::Heartbeat { overflows });
        }
    }

    /// Translate FSM indicator commands into port calls.
    fn apply_indicators(&mut self, hw: &mut impl IndicatorPort, delay: &mut impl DelayNs) {
        if let Some(pulse) = self.ctx.commands.pulse.take() {
            hw.set_indicator(pulse.channel, true);
            delay.delay_ms(pulse.on_ms);
            hw.set_indicator(pulse.channel, false);
        }
    }

    fn report_transition(&self, from: StateId, to: StateId, sink: &mut impl EventSink) {
        match (from, to) {
            (StateId::WaitingForCard, StateId::ReadingUid) => {
                sink.emit(&AppEvent::CardDetected);
            }
            (StateId::ReadingUid, StateId::WaitingForRemoval) => {
                if let Some(e) = self.ctx.last_error {
                    sink.emit(&AppEvent::ReadFailed(e));
                }
            }
            (StateId::ReadingUid, _) => {
                if let (Some(card), Some(decision)) = (self.ctx.card, self.ctx.decision) {
                    sink.emit(&AppEvent::CardRead(card));
                    sink.emit(&AppEvent::AccessDecided { card, decision });
                }
            }
            (StateId::WaitingForRemoval, StateId::WaitingForCard) => {
                sink.emit(&AppEvent::CardRemoved);
            }
            _ => {}
        }
        sink.emit(&AppEvent::StateChanged { from, to });
    }
}
