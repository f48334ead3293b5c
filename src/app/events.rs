//! Outbound application events.
//!
//! The [`AccessService`](super::service::AccessService) emits these through
//! the [`EventSink`](super::ports::EventSink) port.  Adapters decide where
//! they go (serial log, test recorder, ...).

use crate::access::{CardId, Decision};
use crate::error::ReaderError;
use crate::fsm::StateId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// The service started and is waiting for the first card.
    Started,

    /// A card entered the field.
    CardDetected,

    /// A UID was read successfully.
    CardRead(CardId),

    /// The UID read failed; the card is skipped until removed.
    ReadFailed(ReaderError),

    /// The access list produced a decision for `card`.
    AccessDecided { card: CardId, decision: Decision },

    /// The card left the field.
    CardRemoved,

    /// The FSM transitioned between states.
    StateChanged { from: StateId, to: StateId },

    /// The heartbeat timer overflowed `overflows` times since last seen.
    Heartbeat { overflows: u16 },
}
