//! Card identifiers and the compiled-in access list.
//!
//! The access list is a static table; there is no enrollment and nothing is
//! persisted.  Evaluation is first-match-wins in table order.

use core::fmt::{self, Write};

/// Length of a single-size ISO 14443A UID.
pub const UID_LEN: usize = 4;

/// A 4-byte card identifier as read from the reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CardId(pub [u8; UID_LEN]);

impl CardId {
    pub const fn new(bytes: [u8; UID_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; UID_LEN] {
        &self.0
    }

    /// Build from a raw UID.  `None` unless the UID is exactly 4 bytes.
    pub fn from_slice(raw: &[u8]) -> Option<Self> {
        <[u8; UID_LEN]>::try_from(raw).ok().map(Self)
    }

    /// Space-separated upper-case hex, e.g. `20 00 01 E4`.
    pub fn to_hex(&self) -> heapless::String<11> {
        let mut s = heapless::String::new();
        // 4 × "XX" + 3 separators = 11 bytes, always fits.
        let _ = write!(s, "{self}");
        s
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d] = self.0;
        write!(f, "{a:02X} {b:02X} {c:02X} {d:02X}")
    }
}

/// Outcome of evaluating a card against the access list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Granted,
    Denied,
    Unrecognized,
}

/// One access-list row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessRule {
    pub id: CardId,
    pub decision: Decision,
}

/// Master card: lights the "granted" output.
pub const MASTER_CARD: CardId = CardId::new([0x20, 0x00, 0x01, 0xE4]);
/// Known but blocked card: lights the "denied" output.
pub const BLOCKED_CARD: CardId = CardId::new([0x1D, 0x7D, 0xCD, 0x73]);

/// The compiled-in access list.
pub static ACCESS_LIST: [AccessRule; 2] = [
    AccessRule {
        id: MASTER_CARD,
        decision: Decision::Granted,
    },
    AccessRule {
        id: BLOCKED_CARD,
        decision: Decision::Denied,
    },
];

/// Borrowed view over a rule table.
#[derive(Debug, Clone, Copy)]
pub struct AccessList<'a> {
    rules: &'a [AccessRule],
}

impl<'a> AccessList<'a> {
    pub const fn new(rules: &'a [AccessRule]) -> Self {
        Self { rules }
    }

    /// First matching rule decides; no match is `Unrecognized`.
    pub fn evaluate(&self, id: &CardId) -> Decision {
        self.rules
            .iter()
            .find(|r| r.id == *id)
            .map_or(Decision::Unrecognized, |r| r.decision)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for AccessList<'static> {
    fn default() -> Self {
        Self::new(&ACCESS_LIST)
    }
}
