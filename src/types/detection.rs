//! Detector state and per-frame decisions

use serde::{Deserialize, Serialize};

/// State owned by the laugh detector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DetectionState {
    /// When the last laugh was billed (ms), `None` = never
    pub last_event_ms: Option<u64>,
    /// Smiling on the most recent frame
    pub currently_smiling: bool,
}

/// Result of feeding one frame to the detector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameDecision {
    pub is_smiling: bool,
    pub laugh_event_emitted: bool,
}
