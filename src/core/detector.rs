//! Laugh Detector: threshold + cooldown over per-frame smile scores
//!
//! Per frame:
//! - smiling: score > threshold (strict)
//! - laugh:   smiling AND (never laughed OR now - last_laugh > cooldown)
//! - no face: not smiling, no laugh, cooldown timer untouched

use crate::{COOLDOWN_PERIOD_MS, LAUGH_THRESHOLD};
use crate::types::{DetectionState, FrameDecision};

/// Turns a stream of smile scores into discrete laugh events
#[derive(Debug, Clone)]
pub struct LaughDetector {
    /// Smile threshold (exclusive)
    threshold: f64,
    /// Minimum spacing between events (ms)
    cooldown_ms: u64,
    /// Detector-owned state
    state: DetectionState,
    /// Number of frames processed
    frame_count: u64,
}

impl Default for LaughDetector {
    fn default() -> Self {
        Self::new(LAUGH_THRESHOLD, COOLDOWN_PERIOD_MS)
    }
}

impl LaughDetector {
    /// Create new detector
    pub fn new(threshold: f64, cooldown_ms: u64) -> Self {
        Self {
            threshold,
            cooldown_ms,
            state: DetectionState::default(),
            frame_count: 0,
        }
    }

    /// Feed one frame. `smile_score` is `None` when no face was found.
    pub fn process_frame(&mut self, smile_score: Option<f64>, now_ms: u64) -> FrameDecision {
        self.frame_count += 1;

        let Some(score) = smile_score else {
            self.state.currently_smiling = false;
            return FrameDecision {
                is_smiling: false,
                laugh_event_emitted: false,
            };
        };

        let is_smiling = score > self.threshold;
        self.state.currently_smiling = is_smiling;

        let laugh_event_emitted = is_smiling && self.cooldown_elapsed(now_ms);
        if laugh_event_emitted {
            self.state.last_event_ms = Some(now_ms);
        }

        FrameDecision {
            is_smiling,
            laugh_event_emitted,
        }
    }

    /// Has the cooldown passed since the last event? "Never" always has.
    pub fn cooldown_elapsed(&self, now_ms: u64) -> bool {
        match self.state.last_event_ms {
            None => true,
            Some(last) => now_ms > last && now_ms - last > self.cooldown_ms,
        }
    }

    /// Get current state
    pub fn state(&self) -> DetectionState {
        self.state
    }

    pub fn is_smiling(&self) -> bool {
        self.state.currently_smiling
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn cooldown_ms(&self) -> u64 {
        self.cooldown_ms
    }

    /// Get frame count
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Reset detector to initial state, keeping threshold and cooldown
    pub fn reset(&mut self) {
        *self = Self::new(self.threshold, self.cooldown_ms);
    }
}

// =============================================================================
// TESTS
// =============================================================================
