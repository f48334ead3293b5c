//! GPIO / peripheral pin assignments for the card-reader board.
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// RC522 reader (SPI2 / FSPI)
// ---------------------------------------------------------------------------

pub const RC522_SCK_GPIO: i32 = 12;
pub const RC522_MOSI_GPIO: i32 = 11;
pub const RC522_MISO_GPIO: i32 = 13;
/// Chip select, driven by the SPI peripheral.
pub const RC522_CS_GPIO: i32 = 10;
/// Hard reset, active low.  Held high after boot.
pub const RC522_RST_GPIO: i32 = 9;

/// SPI clock for the RC522 (chip maximum is 10 MHz).
pub const RC522_SPI_HZ: u32 = 4_000_000;

// ---------------------------------------------------------------------------
// Indicators
// ---------------------------------------------------------------------------

/// "Access granted" LED (green), active high.
pub const LED_GRANTED_GPIO: i32 = 4;
/// "Access denied" LED (red), active high.
pub const LED_DENIED_GPIO: i32 = 5;
/// On-board status LED, active low.
pub const LED_STATUS_GPIO: i32 = 2;
