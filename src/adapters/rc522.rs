//! RC522 reader adapter.
//!
//! Implements [`ReaderPort`] on top of a minimal proximity-coupling-device
//! abstraction ([`Pcd`]).  On ESP-IDF the `mfrc522` crate provides it over
//! SPI; tests plug in a scripted double.
//!
//! Presence is probed with WUPA rather than REQA so a card parked in HALT
//! after a read keeps answering, which is what removal detection relies on.
//! A successful probe leaves the card READY; the answer is kept for the
//! following SELECT, and the card is halted again before the next probe.

use log::debug;

use crate::access::CardId;
use crate::app::ports::ReaderPort;
use crate::error::ReaderError;

/// Longest ISO 14443-3 UID (triple size).
pub const MAX_UID_LEN: usize = 10;

/// Raw UID bytes as returned by anticollision/select.
pub type RawUid = heapless::Vec<u8, MAX_UID_LEN>;

/// The three ISO 14443-3 commands the access loop needs.
pub trait Pcd {
    /// Answer-to-request from the card, needed by [`select`](Self::select).
    type Atqa;

    /// Wake-up (WUPA).  Reaches IDLE and HALT cards.
    fn wupa(&mut self) -> Result<Self::Atqa, ReaderError>;

    /// Anticollision + SELECT at all cascade levels.
    fn select(&mut self, atqa: &Self::Atqa) -> Result<RawUid, ReaderError>;

    /// Put the selected card into HALT.
    fn hlta(&mut self) -> Result<(), ReaderError>;
}

pub struct Rc522Reader<P: Pcd> {
    pcd: P,
    /// ATQA from the last successful presence probe; the card is READY.
    ready: Option<P::Atqa>,
}

impl<P: Pcd> Rc522Reader<P> {
    pub fn new(pcd: P) -> Self {
        Self { pcd, ready: None }
    }

    pub fn inner(&self) -> &P {
        &self.pcd
    }

    pub fn release(self) -> P {
        self.pcd
    }

    fn halt(&mut self) {
        if let Err(e) = self.pcd.hlta() {
            debug!("rc522: HLTA failed ({})", e);
        }
    }
}

impl<P: Pcd> ReaderPort for Rc522Reader<P> {
    fn is_card_present(&mut self) -> bool {
        if self.ready.take().is_some() {
            self.halt();
        }
        match self.pcd.wupa() {
            Ok(atqa) => {
                self.ready = Some(atqa);
                true
            }
            Err(_) => false,
        }
    }

    fn read_uid(&mut self) -> Result<CardId, ReaderError> {
        let atqa = match self.ready.take() {
            Some(atqa) => atqa,
            None => self.pcd.wupa()?,
        };
        let uid = self.pcd.select(&atqa);
        self.halt();
        let uid = uid?;
        CardId::from_slice(&uid).ok_or(ReaderError::UnsupportedUid)
    }
}

// ═══════════════════════════════════════════════════════════════
//  mfrc522 crate binding (`espidf` feature)
// ═══════════════════════════════════════════════════════════════

#[cfg(feature = "espidf")]
mod mfrc522_pcd {
    use super::{Pcd, RawUid};
    use crate::error::ReaderError;
    use mfrc522::comm::Interface;
    use mfrc522::{AtqA, Initialized, Mfrc522};

    fn map_err<E: core::fmt::Debug>(e: mfrc522::Error<E>) -> ReaderError {
        match e {
            mfrc522::Error::Timeout => ReaderError::NoCard,
            mfrc522::Error::Collision => ReaderError::Collision,
            mfrc522::Error::Crc | mfrc522::Error::Parity => ReaderError::Integrity,
            other => {
                log::debug!("rc522: {:?}", other);
                ReaderError::Communication
            }
        }
    }

    impl<E, COMM> Pcd for Mfrc522<COMM, Initialized>
    where
        E: core::fmt::Debug,
        COMM: Interface<Error = E>,
    {
        type Atqa = AtqA;

        fn wupa(&mut self) -> Result<AtqA, ReaderError> {
            Mfrc522::wupa(self).map_err(map_err)
        }

        fn select(&mut self, atqa: &AtqA) -> Result<RawUid, ReaderError> {
            let uid = Mfrc522::select(self, atqa).map_err(map_err)?;
            RawUid::from_slice(uid.as_bytes()).map_err(|_| ReaderError::UnsupportedUid)
        }

        fn hlta(&mut self) -> Result<(), ReaderError> {
            Mfrc522::hlta(self).map_err(map_err)
        }
    }
}
