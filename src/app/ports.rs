//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AccessService (domain)
//! ```
//!
//! The reader, the indicator outputs and the diagnostic sink are driven
//! adapters behind these traits.  Blocking delays use
//! [`embedded_hal::delay::DelayNs`] directly.

use crate::access::CardId;
use crate::error::ReaderError;

// ───────────────────────────────────────────────────────────────
// Reader port (driven adapter: card reader → domain)
// ───────────────────────────────────────────────────────────────

/// Contactless card reader.
pub trait ReaderPort {
    /// Single presence poll.  May block for the duration of one RF
    /// exchange, never longer.
    fn is_card_present(&mut self) -> bool;

    /// Read the UID of the card currently in the field.
    fn read_uid(&mut self) -> Result<CardId, ReaderError>;
}

// ───────────────────────────────────────────────────────────────
// Indicator port (driven adapter: domain → GPIO)
// ───────────────────────────────────────────────────────────────

/// Logical output channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Access granted (green LED / door strike).
    Granted,
    /// Access denied (red LED).
    Denied,
    /// Neutral status indicator (on-board LED).
    Status,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Granted, Channel::Denied, Channel::Status];
}

/// Binary indicator outputs.  Infallible by contract: adapters log and
/// swallow pin errors.
pub trait IndicatorPort {
    fn set_indicator(&mut self, channel: Channel, on: bool);

    /// Every channel off.
    fn all_off(&mut self) {
        for ch in Channel::ALL {
            self.set_indicator(ch, false);
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → diagnostic output)
// ───────────────────────────────────────────────────────────────

/// Line-oriented, fire-and-forget diagnostic output.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from configuration parsing and validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The override could not be parsed.
    Corrupted,
    /// A field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}

impl core::error::Error for ConfigError {}
