//! Laughmeter: pay-per-laugh billing engine
//!
//! Frame → smile score → LaughDetector → laugh event → Ledger → display

pub mod config;
pub mod core;
pub mod error;
pub mod logging;
pub mod types;

pub use config::LaughConfig;
pub use error::{LaughError, Result, SessionFault};

// =============================================================================
// BILLING [C] - Pricing shown on the welcome screen
// =============================================================================

/// Price of one recognized laugh, in euro cents (€0.30)
pub const PRICE_PER_LAUGH_CENTS: u64 = 30;

/// Maximum charge per show, in euro cents (€24.00)
pub const MAX_CHARGE_CENTS: u64 = 2400;

// =============================================================================
// DETECTION [C]
// =============================================================================

/// Smile score must be strictly above this to count as smiling
pub const LAUGH_THRESHOLD: f64 = 0.65;

/// Minimum time between two billed laughs (milliseconds)
pub const COOLDOWN_PERIOD_MS: u64 = 1000;

/// How long the "laugh billed" notification stays up (milliseconds)
pub const ACKNOWLEDGMENT_MS: u64 = 1000;

// =============================================================================
// CAPTURE [C]
// =============================================================================

/// Target frame rate of the capture loop
pub const TARGET_FRAME_RATE: u32 = 30;

/// Requested capture resolution
pub const CAPTURE_WIDTH: u32 = 640;
pub const CAPTURE_HEIGHT: u32 = 480;

// =============================================================================
// VERSION
// =============================================================================

pub const VERSION: &str = "1.0.0";
