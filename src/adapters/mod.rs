//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements              | Connects to              |
//! |------------|-------------------------|--------------------------|
//! | `board`    | ReaderPort              | any reader               |
//! |            | IndicatorPort           | any indicator bank       |
//! | `rc522`    | ReaderPort              | MFRC522 over SPI         |
//! | `log_sink` | EventSink               | Serial log output        |
//!
//! GPIO indicators live in [`crate::drivers::indicator`].

pub mod board;
pub mod log_sink;
pub mod rc522;
