//! Function-pointer finite state machine engine for the access-control loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │  StateTable                                                    │
//! │  ┌───────────────────┬───────────┬──────────┬────────────────┐ │
//! │  │ StateId           │ on_enter  │ on_exit  │ on_update      │ │
//! │  ├───────────────────┼───────────┼──────────┼────────────────┤ │
//! │  │ WaitingForCard    │ fn(ctx)   │ —        │ fn(ctx)->Opt<> │ │
//! │  │ ReadingUid        │ —         │ —        │ fn(ctx)->Opt<> │ │
//! │  │ Granted           │ fn(ctx)   │ —        │ fn(ctx)->Opt<> │ │
//! │  │ Denied            │ fn(ctx)   │ —        │ fn(ctx)->Opt<> │ │
//! │  │ Unrecognized      │ fn(ctx)   │ —        │ fn(ctx)->Opt<> │ │
//! │  │ WaitingForRemoval │ fn(ctx)   │ fn(ctx)  │ fn(ctx)->Opt<> │ │
//! │  └───────────────────┴───────────┴──────────┴────────────────┘ │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each tick the engine calls `on_update` for the **current** state.
//! If it returns `Some(next_id)`, the engine runs `on_exit` for the
//! current state, then `on_enter` for the next, and updates the
//! current pointer.  Handlers never touch hardware: they read the
//! reader observations stored in [`FsmContext`] and write indicator
//! commands back into it.

pub mod context;
pub mod states;

use context::FsmContext;
use log::debug;

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// Every state of the access-control loop.
/// Must stay in sync with the table built in [`states::build_state_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum StateId {
    WaitingForCard = 0,
    ReadingUid = 1,
    Granted = 2,
    Denied = 3,
    Unrecognized = 4,
    WaitingForRemoval = 5,
}

impl StateId {
    /// Total number of states — used to size the table array.
    pub const COUNT: usize = 6;

    /// Convert a table index back to `StateId`.  Out-of-range indices are a
    /// bug; release builds fall back to `WaitingForCard`.
    pub fn from_index(idx: usize) -> Self {
        match idx {
            0 => Self::WaitingForCard,
            1 => Self::ReadingUid,
            2 => Self::Granted,
            3 => Self::Denied,
            4 => Self::Unrecognized,
            5 => Self::WaitingForRemoval,
            _ => {
                debug_assert!(false, "invalid state index: {idx}");
                Self::WaitingForCard
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// Signature for `on_enter` and `on_exit` actions.
pub type StateActionFn = fn(&mut FsmContext);

/// Per-tick update handler.  `Some(next)` triggers a transition.
pub type StateUpdateFn = fn(&mut FsmContext) -> Option<StateId>;

/// Static descriptor for a single FSM state.
pub struct StateDescriptor {
    pub id: StateId,
    pub name: &'static str,
    pub on_enter: Option<StateActionFn>,
    pub on_exit: Option<StateActionFn>,
    pub on_update: StateUpdateFn,
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

/// The finite state machine engine.
pub struct Fsm {
    /// Fixed-size table indexed by `StateId as usize`.
    table: [StateDescriptor; StateId::COUNT],
    /// Index of the currently active state.
    current: usize,
}

impl Fsm {
    pub fn new(table: [StateDescriptor; StateId::COUNT], initial: StateId) -> Self {
        debug_assert!(
            table.iter().enumerate().all(|(i, d)| d.id as usize == i),
            "state table out of order"
        );
        Self {
            table,
            current: initial as usize,
        }
    }

    /// Run the initial `on_enter` for the starting state.
    /// Call once after construction, before the first `tick()`.
    pub fn start(&mut self, ctx: &mut FsmContext) {
        debug!("FSM starting in state: {}", self.table[self.current].name);
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }

    /// Advance the FSM by one step and return the state it ends in.
    pub fn tick(&mut self, ctx: &mut FsmContext) -> StateId {
        if let Some(next_id) = (self.table[self.current].on_update)(ctx) {
            self.transition(next_id, ctx);
        }
        self.current_state()
    }

    pub fn current_state(&self) -> StateId {
        StateId::from_index(self.current)
    }

    fn transition(&mut self, next_id: StateId, ctx: &mut FsmContext) {
        let next_idx = next_id as usize;

        debug!(
            "FSM transition: {} -> {}",
            self.table[self.current].name, self.table[next_idx].name
        );

        if let Some(exit) = self.table[self.current].on_exit {
            exit(ctx);
        }

        self.current = next_idx;

        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }
}
