//! Software timer registry.
//!
//! A fixed array of countdown/pulse timers advanced by the hardware tick.
//! The registry is allocated once for the lifetime of the process; slots
//! are armed with [`TimerRegistry::start`] and disarmed with
//! [`TimerRegistry::stop`], never created or destroyed at runtime.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                       TimerRegistry                          │
//! │                                                              │
//! │  slot 0        slot 1        slot 2              slot 19     │
//! │ ┌─────────┐   ┌─────────┐   ┌─────────┐        ┌─────────┐   │
//! │ │ en  ✔   │   │ en  ✘   │   │ en  ✔   │  ...   │ en  ✘   │   │
//! │ │ target  │   │   —     │   │ target  │        │   —     │   │
//! │ │ elapsed │   │   —     │   │ elapsed │        │   —     │   │
//! │ │ pulse   │   │   —     │   │ pulse   │        │   —     │   │
//! │ └─────────┘   └─────────┘   └─────────┘        └─────────┘   │
//! │        ▲                                                     │
//! │        └──────── scan(): one pass per consumed tick          │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Overflow reporting is edge-triggered: `pulse` is raised when a timer
//! overflows and stays raised until the owner consumes it with
//! [`TimerRegistry::take_pulse`].  Overflows that happen before the owner
//! gets around to consuming are folded into the same pending pulse and
//! counted, so a blocked consumer learns how many it missed.

use log::info;

use crate::tick::{TickPolicy, TickSource};

// ═══════════════════════════════════════════════════════════════
//  Timer handle
// ═══════════════════════════════════════════════════════════════

/// Number of timer slots in the registry.
pub const MAX_TIMERS: usize = 20;

/// Stable handle to one registry slot.
///
/// Handles are built with [`TimerId::slot`], which rejects out-of-range
/// indices at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(usize);

impl TimerId {
    /// Handle for slot `N`.  Fails to compile when `N >= MAX_TIMERS`.
    pub const fn slot<const N: usize>() -> Self {
        const { assert!(N < MAX_TIMERS, "timer slot out of range") };
        Self(N)
    }

    /// Runtime construction for table-driven callers.
    pub const fn from_index(idx: usize) -> Option<Self> {
        if idx < MAX_TIMERS { Some(Self(idx)) } else { None }
    }

    pub const fn index(self) -> usize {
        self.0
    }
}

/// Slot reserved for the main loop's heartbeat timer.
pub const HEARTBEAT: TimerId = TimerId::slot::<0>();

// ═══════════════════════════════════════════════════════════════
//  Timer slot
// ═══════════════════════════════════════════════════════════════

/// One software timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Timer {
    enabled: bool,
    /// Configured duration minus one.
    target: u32,
    /// Ticks accumulated since arm or last overflow.
    elapsed: u32,
    /// Raised on overflow, cleared by the consumer.
    pulse: bool,
    /// Overflows folded into the current pending pulse (saturating).
    overflows: u16,
}

impl Timer {
    const INERT: Self = Self {
        enabled: false,
        target: 0,
        elapsed: 0,
        pulse: false,
        overflows: 0,
    };

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn target(&self) -> u32 {
        self.target
    }

    pub fn elapsed(&self) -> u32 {
        self.elapsed
    }

    pub fn pulse(&self) -> bool {
        self.pulse
    }

    pub fn overflows(&self) -> u16 {
        self.overflows
    }

    /// Apply `ticks` ticks in closed form.  Equivalent to `ticks` single
    /// steps, each of which overflows once `elapsed` exceeds `target`.
    fn advance(&mut self, ticks: u32) {
        if !self.enabled || ticks == 0 {
            return;
        }
        let period = u64::from(self.target) + 1;
        let total = u64::from(self.elapsed) + u64::from(ticks);
        let laps = total / period;
        // Remainder is below `period`, which fits in u32.
        self.elapsed = (total % period) as u32;
        if laps > 0 {
            self.pulse = true;
            let laps = u16::try_from(laps).unwrap_or(u16::MAX);
            self.overflows = self.overflows.saturating_add(laps);
        }
    }
}

// ═══════════════════════════════════════════════════════════════
//  Registry
// ═══════════════════════════════════════════════════════════════

/// Fixed-capacity timer registry.  No heap, no growth.
pub struct TimerRegistry {
    slots: [Timer; MAX_TIMERS],
    policy: TickPolicy,
}

impl TimerRegistry {
    pub const fn new(policy: TickPolicy) -> Self {
        Self {
            slots: [Timer::INERT; MAX_TIMERS],
            policy,
        }
    }

    /// Arm a timer for `duration_ticks`.
    ///
    /// A no-op while the timer is already running, so a repeated start never
    /// loses an in-flight count.  Durations below one tick are treated as one.
    pub fn start(&mut self, id: TimerId, duration_ticks: u32) {
        let t = &mut self.slots[id.0];
        if t.enabled {
            return;
        }
        let duration = duration_ticks.max(1);
        *t = Timer {
            enabled: true,
            target: duration - 1,
            elapsed: 0,
            pulse: false,
            overflows: 0,
        };
        info!("Timer[{}]: armed for {} ticks", id.0, duration);
    }

    /// Disarm a timer and clear every field.
    pub fn stop(&mut self, id: TimerId) {
        self.slots[id.0] = Timer::INERT;
    }

    /// Consume pending ticks from `source` and advance every armed timer.
    ///
    /// Returns the number of ticks applied.  With nothing pending this
    /// touches no timer.  Call once per main-loop iteration, never from
    /// interrupt context.
    pub fn scan(&mut self, source: &TickSource) -> u32 {
        if !source.is_pending() {
            return 0;
        }
        let ticks = source.take(self.policy);
        self.advance(ticks);
        ticks
    }

    /// Apply `ticks` ticks to every slot.  Cost is independent of `ticks`.
    pub fn advance(&mut self, ticks: u32) {
        for t in &mut self.slots {
            t.advance(ticks);
        }
    }

    /// Consume the overflow pulse of an armed timer.
    ///
    /// Returns the number of overflows folded into the pulse, or `None`
    /// when the timer is disarmed or has not overflowed since the last take.
    pub fn take_pulse(&mut self, id: TimerId) -> Option<u16> {
        let t = &mut self.slots[id.0];
        if !(t.enabled && t.pulse) {
            return None;
        }
        let count = t.overflows;
        t.pulse = false;
        t.overflows = 0;
        Some(count)
    }

    /// Read-only view of a slot.
    pub fn get(&self, id: TimerId) -> &Timer {
        &self.slots[id.0]
    }

    pub fn policy(&self) -> TickPolicy {
        self.policy
    }

    /// Number of armed timers.
    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|t| t.enabled).count()
    }
}

impl Default for TimerRegistry {
    fn default() -> Self {
        Self::new(TickPolicy::default())
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
