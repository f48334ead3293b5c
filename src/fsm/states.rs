//! Concrete state handler functions and table builder.
//!
//! ```text
//!  WAITING_FOR_CARD ──[present]──▶ READING_UID
//!        ▲                            │
//!        │              ┌─────────────┼──────────────┬───────[read failed]
//!        │              ▼             ▼              ▼              │
//!        │          GRANTED        DENIED      UNRECOGNIZED         │
//!        │              │             │              │              │
//!        │              └─────────────┴──────┬───────┘              │
//!        │                                   ▼                      │
//!        └────[absent × N]──────── WAITING_FOR_REMOVAL ◀────────────┘
//! ```

use super::context::FsmContext;
use super::{StateDescriptor, StateId};
use crate::access::Decision;
use crate::app::ports::Channel;
use log::{info, warn};

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static state table.  Called once at startup.
pub fn build_state_table() -> [StateDescriptor; StateId::COUNT] {
    [
        StateDescriptor {
            id: StateId::WaitingForCard,
            name: "WaitingForCard",
            on_enter: Some(waiting_enter),
            on_exit: None,
            on_update: waiting_update,
        },
        StateDescriptor {
            id: StateId::ReadingUid,
            name: "ReadingUid",
            on_enter: None,
            on_exit: None,
            on_update: reading_update,
        },
        StateDescriptor {
            id: StateId::Granted,
            name: "Granted",
            on_enter: Some(granted_enter),
            on_exit: None,
            on_update: decided_update,
        },
        StateDescriptor {
            id: StateId::Denied,
            name: "Denied",
            on_enter: Some(denied_enter),
            on_exit: None,
            on_update: decided_update,
        },
        StateDescriptor {
            id: StateId::Unrecognized,
            name: "Unrecognized",
            on_enter: Some(unrecognized_enter),
            on_exit: None,
            on_update: decided_update,
        },
        StateDescriptor {
            id: StateId::WaitingForRemoval,
            name: "WaitingForRemoval",
            on_enter: Some(removal_enter),
            on_exit: Some(removal_exit),
            on_update: removal_update,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  WAITING_FOR_CARD
// ═══════════════════════════════════════════════════════════════════════════

fn waiting_enter(ctx: &mut FsmContext) {
    ctx.clear_session();
}

fn waiting_update(ctx: &mut FsmContext) -> Option<StateId> {
    ctx.card_present.then_some(StateId::ReadingUid)
}

// ═══════════════════════════════════════════════════════════════════════════
//  READING_UID — one attempt per presence, never retried
// ═══════════════════════════════════════════════════════════════════════════

fn reading_update(ctx: &mut FsmContext) -> Option<StateId> {
    match ctx.read_result.take()? {
        Ok(id) => {
            let decision = ctx.access_list.evaluate(&id);
            ctx.card = Some(id);
            ctx.decision = Some(decision);
            Some(match decision {
                Decision::Granted => StateId::Granted,
                Decision::Denied => StateId::Denied,
                Decision::Unrecognized => StateId::Unrecognized,
            })
        }
        Err(e) => {
            warn!("READ: UID read failed ({}), waiting for removal", e);
            ctx.last_error = Some(e);
            Some(StateId::WaitingForRemoval)
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  Decision states — queue the indicator pulse, then wait for removal
// ═══════════════════════════════════════════════════════════════════════════

fn granted_enter(ctx: &mut FsmContext) {
    info!("Access Granted - GREEN LED ON");
    ctx.request_pulse(Channel::Granted, ctx.config.grant_dwell_ms);
}

fn denied_enter(ctx: &mut FsmContext) {
    info!("Access Denied - RED LED ON");
    ctx.request_pulse(Channel::Denied, ctx.config.deny_dwell_ms);
}

fn unrecognized_enter(ctx: &mut FsmContext) {
    info!("Unknown card - status blink");
    ctx.request_pulse(Channel::Status, ctx.config.unknown_pulse_ms);
}

fn decided_update(_ctx: &mut FsmContext) -> Option<StateId> {
    Some(StateId::WaitingForRemoval)
}

// ═══════════════════════════════════════════════════════════════════════════
//  WAITING_FOR_REMOVAL
// ═══════════════════════════════════════════════════════════════════════════

fn removal_enter(ctx: &mut FsmContext) {
    ctx.absent_polls = 0;
}

fn removal_exit(ctx: &mut FsmContext) {
    info!("Card removed after {} absent polls", ctx.absent_polls);
}

fn removal_update(ctx: &mut FsmContext) -> Option<StateId> {
    if ctx.card_present {
        ctx.absent_polls = 0;
        return None;
    }
    ctx.absent_polls = ctx.absent_polls.saturating_add(1);
    (ctx.absent_polls >= ctx.config.removal_confirm_polls).then_some(StateId::WaitingForCard)
}
