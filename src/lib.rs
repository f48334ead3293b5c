//! Cardgate firmware library.
//!
//! Exposes the pure-logic modules for integration testing and the ESP-IDF
//! binary.  All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod access;
pub mod app;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod fsm;
pub mod pins;
pub mod scheduler;
pub mod tick;

pub mod adapters;
pub mod drivers;
