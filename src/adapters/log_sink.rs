//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing application events to the ESP-IDF
//! logger (UART / USB-CDC in production).  The card line keeps the
//! `CARD ID: XX XX XX XX` shape that bench tooling greps for.

use log::{debug, info, warn};

use crate::access::Decision;
use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink {
    heartbeats: u32,
}

impl LogEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Heartbeats logged so far.
    pub fn heartbeats(&self) -> u32 {
        self.heartbeats
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started => {
                info!("START | waiting for card");
            }
            AppEvent::CardDetected => {
                debug!("CARD | detected");
            }
            AppEvent::CardRead(id) => {
                info!("CARD ID: {}", id);
            }
            AppEvent::ReadFailed(e) => {
                warn!("CARD | read failed: {}", e);
            }
            AppEvent::AccessDecided { card, decision } => {
                let verdict = match decision {
                    Decision::Granted => "GRANTED",
                    Decision::Denied => "DENIED",
                    Decision::Unrecognized => "UNKNOWN",
                };
                info!("ACCESS | {} -> {}", card, verdict);
            }
            AppEvent::CardRemoved => {
                info!("CARD | removed");
            }
            AppEvent::StateChanged { from, to } => {
                debug!("STATE | {:?} -> {:?}", from, to);
            }
            AppEvent::Heartbeat { overflows } => {
                self.heartbeats = self.heartbeats.wrapping_add(1);
                if *overflows > 1 {
                    warn!("HEARTBEAT | #{} ({} periods folded)", self.heartbeats, overflows);
                } else {
                    debug!("HEARTBEAT | #{}", self.heartbeats);
                }
            }
        }
    }
}
