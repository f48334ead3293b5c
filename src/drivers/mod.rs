//! Peripheral drivers: indicator outputs and the periodic tick timer.

pub mod indicator;
pub mod tick_timer;
