//! Unified error types for the cardgate firmware.
//!
//! A single `Error` enum that every subsystem converts into, keeping the
//! top-level error handling uniform.  All variants are `Copy` so they pass
//! through the FSM context without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The card reader failed to produce a UID.
    Reader(ReaderError),
    /// Peripheral or clock initialisation failed.
    Init(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reader(e) => write!(f, "reader: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Reader errors
// ---------------------------------------------------------------------------

/// Why a UID read did not produce a usable identifier.
///
/// Every variant is transient from the access loop's point of view: the
/// card is skipped and the loop waits for it to leave the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderError {
    /// No card answered.
    NoCard,
    /// More than one card answered and anticollision failed.
    Collision,
    /// CRC / BCC / parity check failed on the received frame.
    Integrity,
    /// The card answered with a UID that is not 4 bytes long.
    UnsupportedUid,
    /// SPI or reader-chip level failure.
    Communication,
}

impl fmt::Display for ReaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoCard => write!(f, "no card"),
            Self::Collision => write!(f, "collision"),
            Self::Integrity => write!(f, "frame integrity check failed"),
            Self::UnsupportedUid => write!(f, "unsupported UID length"),
            Self::Communication => write!(f, "communication error"),
        }
    }
}

impl core::error::Error for ReaderError {}

impl From<ReaderError> for Error {
    fn from(e: ReaderError) -> Self {
        Self::Reader(e)
    }
}
