//! Discrete indicator outputs: granted LED, denied LED, status LED.
//!
//! Generic over [`embedded_hal::digital::OutputPin`] so the same driver
//! runs on `esp_idf_hal::gpio::PinDriver` and on test doubles.  Each
//! channel has its own polarity; the on-board status LED of the
//! reference board is active-low.

use embedded_hal::digital::{Error as _, OutputPin};
use log::warn;

use crate::app::ports::{Channel, IndicatorPort};

/// Electrical level that lights the LED.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    ActiveHigh,
    ActiveLow,
}

struct Output<P> {
    pin: P,
    polarity: Polarity,
    on: bool,
}

impl<P: OutputPin> Output<P> {
    fn new(pin: P, polarity: Polarity) -> Self {
        let mut out = Self { pin, polarity, on: false };
        out.set(false);
        out
    }

    fn set(&mut self, on: bool) {
        let high = match self.polarity {
            Polarity::ActiveHigh => on,
            Polarity::ActiveLow => !on,
        };
        let res = if high { self.pin.set_high() } else { self.pin.set_low() };
        match res {
            Ok(()) => self.on = on,
            Err(e) => warn!("indicator: pin write failed ({:?})", e.kind()),
        }
    }
}

/// Three indicator channels behind [`IndicatorPort`].  All channels are
/// driven off on construction.
pub struct GpioIndicators<G, D, S> {
    granted: Output<G>,
    denied: Output<D>,
    status: Output<S>,
}

impl<G, D, S> GpioIndicators<G, D, S>
where
    G: OutputPin,
    D: OutputPin,
    S: OutputPin,
{
    /// Granted and denied are active-high; status is active-low.
    pub fn new(granted: G, denied: D, status: S) -> Self {
        Self::with_polarity(
            (granted, Polarity::ActiveHigh),
            (denied, Polarity::ActiveHigh),
            (status, Polarity::ActiveLow),
        )
    }

    pub fn with_polarity(granted: (G, Polarity), denied: (D, Polarity), status: (S, Polarity)) -> Self {
        Self {
            granted: Output::new(granted.0, granted.1),
            denied: Output::new(denied.0, denied.1),
            status: Output::new(status.0, status.1),
        }
    }

    /// Logical state of `channel` as last written successfully.
    pub fn is_on(&self, channel: Channel) -> bool {
        match channel {
            Channel::Granted => self.granted.on,
            Channel::Denied => self.denied.on,
            Channel::Status => self.status.on,
        }
    }
}

impl<G, D, S> IndicatorPort for GpioIndicators<G, D, S>
where
    G: OutputPin,
    D: OutputPin,
    S: OutputPin,
{
    fn set_indicator(&mut self, channel: Channel, on: bool) {
        match channel {
            Channel::Granted => self.granted.set(on),
            Channel::Denied => self.denied.set(on),
            Channel::Status => self.status.set(on),
        }
    }
}
