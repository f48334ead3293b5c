//! Shared mutable context threaded through every FSM handler.
//!
//! The access service writes reader observations in before each tick;
//! state handlers write indicator commands out.  Handlers never see the
//! hardware itself.

use crate::access::{AccessList, CardId, Decision};
use crate::app::ports::Channel;
use crate::config::SystemConfig;
use crate::error::ReaderError;

// ---------------------------------------------------------------------------
// Indicator commands (written by state handlers; applied by the service)
// ---------------------------------------------------------------------------

/// Turn `channel` on, hold for `on_ms`, then turn it off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndicatorPulse {
    pub channel: Channel,
    pub on_ms: u32,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct IndicatorCommands {
    /// Pending pulse; the service takes it after the tick that set it.
    pub pulse: Option<IndicatorPulse>,
}

// ---------------------------------------------------------------------------
// FsmContext
// ---------------------------------------------------------------------------

pub struct FsmContext {
    // -- Reader observations --
    /// Result of the latest presence poll.
    pub card_present: bool,
    /// Result of the UID read requested in `ReadingUid`.
    pub read_result: Option<Result<CardId, ReaderError>>,
    /// Consecutive absent polls seen while waiting for removal.
    pub absent_polls: u8,

    // -- Current session --
    pub card: Option<CardId>,
    pub decision: Option<Decision>,
    pub last_error: Option<ReaderError>,

    // -- Outputs --
    pub commands: IndicatorCommands,

    // -- Configuration --
    pub config: SystemConfig,
    pub access_list: AccessList<'static>,
}

impl FsmContext {
    pub fn new(config: SystemConfig, access_list: AccessList<'static>) -> Self {
        Self {
            card_present: false,
            read_result: None,
            absent_polls: 0,
            card: None,
            decision: None,
            last_error: None,
            commands: IndicatorCommands::default(),
            config,
            access_list,
        }
    }

    /// Forget everything about the previous card.
    pub fn clear_session(&mut self) {
        self.read_result = None;
        self.absent_polls = 0;
        self.card = None;
        self.decision = None;
        self.last_error = None;
        self.commands = IndicatorCommands::default();
    }

    /// Queue an indicator pulse for the service to apply.
    pub fn request_pulse(&mut self, channel: Channel, on_ms: u32) {
        self.commands.pulse = Some(IndicatorPulse { channel, on_ms });
    }
}
