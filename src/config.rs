//! System configuration parameters
//!
//! All tunable timing for the access controller.  Defaults match the
//! reference board; a JSON override can be baked in at build time.

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;
use crate::tick::TickPolicy;

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    // --- Tick source ---
    /// Hardware tick period (milliseconds).
    pub tick_period_ms: u32,
    /// How ticks missed while the loop is blocked are accounted.
    pub tick_policy: TickPolicy,

    // --- Scheduler ---
    /// Heartbeat timer duration (ticks).
    pub heartbeat_ticks: u32,

    // --- Indicators ---
    /// How long the "granted" output stays on (milliseconds).
    pub grant_dwell_ms: u32,
    /// How long the "denied" output stays on (milliseconds).
    pub deny_dwell_ms: u32,
    /// Status pulse for an unrecognized card (milliseconds).
    pub unknown_pulse_ms: u32,

    // --- Reader ---
    /// Delay after an empty presence poll while waiting for a card
    /// (milliseconds).  Yields the main task to the scheduler.
    pub presence_poll_ms: u32,
    /// Delay between presence polls while waiting for removal (milliseconds).
    pub removal_poll_ms: u32,
    /// Consecutive "absent" polls needed to confirm removal.
    pub removal_confirm_polls: u8,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Tick source
            tick_period_ms: 1,
            tick_policy: TickPolicy::Accumulate,

            // Scheduler
            heartbeat_ticks: 1000, // 1 s at 1 ms ticks

            // Indicators
            grant_dwell_ms: 1000,
            deny_dwell_ms: 1000,
            unknown_pulse_ms: 200,

            // Reader
            presence_poll_ms: 10,
            removal_poll_ms: 20,
            removal_confirm_polls: 2,
        }
    }
}

impl SystemConfig {
    /// Range-check every field.  Invalid values are rejected, not clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_period_ms == 0 {
            return Err(ConfigError::ValidationFailed("tick_period_ms must be > 0"));
        }
        if self.heartbeat_ticks == 0 {
            return Err(ConfigError::ValidationFailed("heartbeat_ticks must be > 0"));
        }
        if self.grant_dwell_ms == 0 || self.deny_dwell_ms == 0 || self.unknown_pulse_ms == 0 {
            return Err(ConfigError::ValidationFailed("indicator durations must be > 0"));
        }
        if self.unknown_pulse_ms >= self.grant_dwell_ms.min(self.deny_dwell_ms) {
            return Err(ConfigError::ValidationFailed(
                "unknown_pulse_ms must be shorter than both dwell times",
            ));
        }
        if self.presence_poll_ms == 0 {
            return Err(ConfigError::ValidationFailed("presence_poll_ms must be > 0"));
        }
        if self.removal_confirm_polls == 0 {
            return Err(ConfigError::ValidationFailed("removal_confirm_polls must be > 0"));
        }
        Ok(())
    }

    /// Parse a JSON override.  Missing fields take their default value.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(json).map_err(|_| ConfigError::Corrupted)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Defaults, or `json` applied on top of them.  A bad override is logged
    /// and ignored.
    pub fn resolve(json: Option<&str>) -> Self {
        let Some(json) = json else {
            return Self::default();
        };
        match Self::from_json(json) {
            Ok(cfg) => {
                info!("Config override applied");
                cfg
            }
            Err(e) => {
                warn!("Config override rejected ({}), using defaults", e);
                Self::default()
            }
        }
    }

    /// Convert a millisecond duration into whole ticks (at least one).
    pub fn ms_to_ticks(&self, ms: u32) -> u32 {
        (ms / self.tick_period_ms.max(1)).max(1)
    }
}
