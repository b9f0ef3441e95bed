//! Show configuration

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{LaughError, Result};
use crate::types::Money;
use crate::{
    ACKNOWLEDGMENT_MS, COOLDOWN_PERIOD_MS, LAUGH_THRESHOLD, MAX_CHARGE_CENTS,
    PRICE_PER_LAUGH_CENTS, TARGET_FRAME_RATE,
};

/// Pricing and detection settings, fixed for the lifetime of a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaughConfig {
    /// Price of one laugh (cents)
    pub price_per_laugh: Money,
    /// Session cap (cents)
    pub max_charge: Money,
    /// Smile score must be strictly above this
    pub laugh_threshold: f64,
    /// Minimum spacing between billed laughs (ms)
    pub cooldown_ms: u64,
    /// How long the laugh notification stays up (ms)
    pub acknowledgment_ms: u64,
    /// Capture loop rate (frames per second)
    pub frame_rate: u32,
}

impl Default for LaughConfig {
    fn default() -> Self {
        Self {
            price_per_laugh: Money::from_cents(PRICE_PER_LAUGH_CENTS),
            max_charge: Money::from_cents(MAX_CHARGE_CENTS),
            laugh_threshold: LAUGH_THRESHOLD,
            cooldown_ms: COOLDOWN_PERIOD_MS,
            acknowledgment_ms: ACKNOWLEDGMENT_MS,
            frame_rate: TARGET_FRAME_RATE,
        }
    }
}

impl LaughConfig {
    /// Load from a JSON file; missing fields take their defaults
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.price_per_laugh.is_zero() {
            return Err(LaughError::InvalidConfig("price_per_laugh must be positive".into()));
        }
        if self.max_charge.is_zero() {
            return Err(LaughError::InvalidConfig("max_charge must be positive".into()));
        }
        if !(0.0..1.0).contains(&self.laugh_threshold) {
            return Err(LaughError::InvalidConfig(format!(
                "laugh_threshold {} must be in [0, 1)",
                self.laugh_threshold
            )));
        }
        if self.frame_rate == 0 {
            return Err(LaughError::InvalidConfig("frame_rate must be positive".into()));
        }
        Ok(())
    }

    /// Time between two frame-loop ticks
    pub fn frame_interval(&self) -> std::time::Duration {
        std::time::Duration::from_micros(1_000_000 / self.frame_rate.max(1) as u64)
    }
}
