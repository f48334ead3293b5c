//! Cardgate Firmware — Main Entry Point
//!
//! Hexagonal architecture around a cooperative tick-driven loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  Rc522Reader        GpioIndicators       LogEventSink          │
//! │  (ReaderPort)       (IndicatorPort)      (EventSink)           │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │            AccessService (pure logic)                  │    │
//! │  │  FSM · TimerRegistry                                   │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  esp_timer ──signal──▶ TICK (AtomicU32) ──scan──▶ registry     │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

// ── Imports ───────────────────────────────────────────────────
use anyhow::{Context, Result};
use log::info;

use esp_idf_svc::hal::delay::FreeRtos;
use esp_idf_svc::hal::gpio::{AnyInputPin, AnyOutputPin, PinDriver};
use esp_idf_svc::hal::peripherals::Peripherals;
use esp_idf_svc::hal::spi::config::{Config as SpiConfig, DriverConfig};
use esp_idf_svc::hal::spi::{SpiDeviceDriver, SpiDriver};
use esp_idf_svc::hal::units::Hertz;
use mfrc522::Mfrc522;
use mfrc522::comm::blocking::spi::SpiInterface;

use cardgate::adapters::board::Board;
use cardgate::adapters::log_sink::LogEventSink;
use cardgate::adapters::rc522::Rc522Reader;
use cardgate::app::service::AccessService;
use cardgate::config::SystemConfig;
use cardgate::drivers::indicator::GpioIndicators;
use cardgate::drivers::tick_timer;
use cardgate::error::Error;
use cardgate::tick::TICK;
use cardgate::{diagnostics, pins};

// ── Main ──────────────────────────────────────────────────────

fn main() {
    esp_idf_svc::sys::link_patches();
    if let Err(e) = esp_idf_logger::init() {
        // No logger yet; halt still parks the core.
        diagnostics::halt(&format_args!("logger init failed: {:?}", e));
    }

    info!("╔══════════════════════════════════════╗");
    info!("║  Cardgate v{}                     ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    diagnostics::install_panic_handler();

    if let Err(e) = run() {
        diagnostics::halt(&format_args!("{:#}", e));
    }
}

fn run() -> Result<()> {
    // ── 1. Configuration ──────────────────────────────────────
    let config = SystemConfig::resolve(option_env!("CARDGATE_CONFIG_JSON"));
    info!("Config: {:?}", config);

    // ── 2. Peripherals ────────────────────────────────────────
    let peripherals = Peripherals::take().context("peripherals already taken")?;

    // SAFETY: every pin number below comes from `pins` and is claimed
    // exactly once here, at boot, before any other driver exists.
    let (sck, mosi, miso, cs, rst, led_granted, led_denied, led_status) = unsafe {
        (
            AnyOutputPin::new(pins::RC522_SCK_GPIO),
            AnyOutputPin::new(pins::RC522_MOSI_GPIO),
            AnyInputPin::new(pins::RC522_MISO_GPIO),
            AnyOutputPin::new(pins::RC522_CS_GPIO),
            AnyOutputPin::new(pins::RC522_RST_GPIO),
            AnyOutputPin::new(pins::LED_GRANTED_GPIO),
            AnyOutputPin::new(pins::LED_DENIED_GPIO),
            AnyOutputPin::new(pins::LED_STATUS_GPIO),
        )
    };

    // ── 3. Indicators ─────────────────────────────────────────
    let indicators = GpioIndicators::new(
        PinDriver::output(led_granted).context("granted LED")?,
        PinDriver::output(led_denied).context("denied LED")?,
        PinDriver::output(led_status).context("status LED")?,
    );

    // ── 4. RC522 over SPI2 ────────────────────────────────────
    // Kept alive for the lifetime of `run`; dropping the driver would
    // float RST and reset the chip.
    let mut rst = PinDriver::output(rst).context("RC522 reset pin")?;
    rst.set_high().context("RC522 reset release")?;

    let spi = SpiDriver::new(
        peripherals.spi2,
        sck,
        mosi,
        Some(miso),
        &DriverConfig::new(),
    )
    .context("SPI bus")?;
    let spi = SpiDeviceDriver::new(
        spi,
        Some(cs),
        &SpiConfig::new().baudrate(Hertz(pins::RC522_SPI_HZ)),
    )
    .context("SPI device")?;

    let mut rc522 = Mfrc522::new(SpiInterface::new(spi))
        .init()
        .map_err(|_| Error::Init("RC522 did not respond"))?;
    match rc522.version() {
        Ok(v) => info!("RC522 version 0x{:02X}", v),
        Err(_) => return Err(Error::Init("RC522 version read failed").into()),
    }

    let mut board = Board::new(Rc522Reader::new(rc522), indicators);

    // ── 5. Tick source ────────────────────────────────────────
    tick_timer::start(config.tick_period_ms).context("tick timer")?;

    // ── 6. Service loop ───────────────────────────────────────
    let mut sink = LogEventSink::new();
    let mut delay = FreeRtos;
    let mut service = AccessService::new(config, &TICK);
    service.start(&mut sink);
    service.run(&mut board, &mut delay, &mut sink)
}
