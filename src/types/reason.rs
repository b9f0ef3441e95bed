//! Reason codes for per-frame decisions

use serde::{Deserialize, Serialize};

/// Why a frame did or did not produce a billed laugh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(non_camel_case_types)]
pub enum ReasonCode {
    // =========================================================================
    // L001: Face
    // =========================================================================
    /// No face in frame, nothing to score
    L001_NO_FACE,

    // =========================================================================
    // L002: Threshold
    // =========================================================================
    /// Smile score at or below threshold
    L002_BELOW_THRESHOLD,

    // =========================================================================
    // L003: Cooldown
    // =========================================================================
    /// Smiling, but the last laugh was too recent
    L003_COOLDOWN_ACTIVE,

    // =========================================================================
    // L004: Billing
    // =========================================================================
    /// Laugh recognized and charged
    L004_LAUGH_BILLED,
    /// Laugh recognized, session cap already reached
    L004_LAUGH_AT_CAP,
}

impl ReasonCode {
    /// Get the code string (for logging)
    pub fn code(&self) -> &'static str {
        match self {
            Self::L001_NO_FACE => "L001_NO_FACE",
            Self::L002_BELOW_THRESHOLD => "L002_BELOW_THRESHOLD",
            Self::L003_COOLDOWN_ACTIVE => "L003_COOLDOWN_ACTIVE",
            Self::L004_LAUGH_BILLED => "L004_LAUGH_BILLED",
            Self::L004_LAUGH_AT_CAP => "L004_LAUGH_AT_CAP",
        }
    }

    /// Get human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Self::L001_NO_FACE => "No face detected",
            Self::L002_BELOW_THRESHOLD => "Monitoring face",
            Self::L003_COOLDOWN_ACTIVE => "Still laughing - cooldown",
            Self::L004_LAUGH_BILLED => "Laugh billed",
            Self::L004_LAUGH_AT_CAP => "Laugh counted - session cap reached",
        }
    }

    /// Did this frame produce a laugh event?
    pub fn is_laugh(&self) -> bool {
        matches!(self, Self::L004_LAUGH_BILLED | Self::L004_LAUGH_AT_CAP)
    }
}

impl std::fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code(), self.description())
    }
}
