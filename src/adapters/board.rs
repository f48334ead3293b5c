//! Board adapter — one value that satisfies both hardware ports.
//!
//! The access service takes a single `hw` handle for the reader and the
//! indicators; this pairs any reader with any indicator bank.

use crate::access::CardId;
use crate::app::ports::{Channel, IndicatorPort, ReaderPort};
use crate::error::ReaderError;

pub struct Board<R, I> {
    reader: R,
    indicators: I,
}

impl<R, I> Board<R, I>
where
    R: ReaderPort,
    I: IndicatorPort,
{
    pub fn new(reader: R, mut indicators: I) -> Self {
        indicators.all_off();
        Self { reader, indicators }
    }
}

// ── ReaderPort ────────────────────────────────────────────────

impl<R: ReaderPort, I> ReaderPort for Board<R, I> {
    fn is_card_present(&mut self) -> bool {
        self.reader.is_card_present()
    }

    fn read_uid(&mut self) -> Result<CardId, ReaderError> {
        self.reader.read_uid()
    }
}

// ── IndicatorPort ─────────────────────────────────────────────

impl<R, I: IndicatorPort> IndicatorPort for Board<R, I> {
    fn set_indicator(&mut self, channel: Channel, on: bool) {
        self.indicators.set_indicator(channel, on);
    }

    fn all_off(&mut self) {
        self.indicators.all_off();
    }
}
