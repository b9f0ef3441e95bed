//! Output structures for display

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use crate::types::{BoundingBox, ReasonCode, SessionPhase, SessionStats};
use crate::{CAPTURE_HEIGHT, CAPTURE_WIDTH};

/// Output of each processed frame, consumed by the display
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameReport {
    /// Wall-clock time of the report
    pub timestamp: DateTime<Utc>,
    /// Frame time on the session clock (ms)
    pub frame_ms: u64,
    /// Smile score, `None` when no face was found
    pub smile_score: Option<f64>,
    /// Smiling indicator for this frame
    pub is_smiling: bool,
    /// Did this frame produce a laugh?
    pub laugh_event_emitted: bool,
    /// Is the "laugh billed" notification on screen?
    pub acknowledging: bool,
    /// Totals after this frame
    pub stats: SessionStats,
    /// Phase the session is in
    pub phase: SessionPhase,
    /// Reason for the decision
    pub reason: ReasonCode,
    /// Box around the face for the overlay, normalized coordinates
    #[serde(default)]
    pub face_box: Option<BoundingBox>,
}

impl FrameReport {
    /// "Laughing Detected" / "Monitoring Face"
    pub fn indicator_label(&self) -> &'static str {
        if self.is_smiling {
            "Laughing Detected"
        } else {
            "Monitoring Face"
        }
    }

    /// Format for terminal display (with colors)
    pub fn to_terminal_string(&self) -> String {
        let color = if self.is_smiling { "\x1b[35m" } else { "\x1b[32m" };
        let reset = SessionPhase::color_reset();
        let bell = if self.acknowledging { " 🔔" } else { "" };
        let face = match self.face_box {
            Some(b) => {
                let (x, y, w, h) = b.to_pixels(CAPTURE_WIDTH, CAPTURE_HEIGHT);
                format!(" | face={:.0},{:.0} {:.0}x{:.0}", x, y, w, h)
            }
            None => String::new(),
        };

        format!(
            "{}● {} | score={} | laughs={} | due={}{}{} | {}{}",
            color,
            self.indicator_label(),
            self.score_display(),
            self.stats.laugh_count,
            self.stats.amount_due,
            face,
            bell,
            self.reason.code(),
            reset
        )
    }

    /// Format for parseable output (no colors)
    pub fn to_parseable_string(&self) -> String {
        format!(
            "t={}ms | score={} | smiling={} | laugh={} | count={} | due={:.2} | reason={}",
            self.frame_ms,
            self.score_display(),
            self.is_smiling,
            self.laugh_event_emitted,
            self.stats.laugh_count,
            self.stats.amount_due.as_euros(),
            self.reason.code()
        )
    }

    fn score_display(&self) -> String {
        match self.smile_score {
            Some(s) => format!("{:.3}", s),
            None => "-".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Money;

    fn report(face_box: Option<BoundingBox>) -> FrameReport {
        FrameReport {
            timestamp: Utc::now(),
            frame_ms: 66,
            smile_score: Some(0.8),
            is_smiling: true,
            laugh_event_emitted: false,
            acknowledging: false,
            stats: SessionStats::zero(Money::from_cents(30), Money::from_cents(2400)),
            phase: SessionPhase::Showtime,
            reason: ReasonCode::L003_COOLDOWN_ACTIVE,
            face_box,
        }
    }

    #[test]
    fn test_terminal_string_shows_face_box_in_pixels() {
        let b = BoundingBox { min_x: 0.25, min_y: 0.5, max_x: 0.75, max_y: 1.0 };
        let text = report(Some(b)).to_terminal_string();
        assert!(text.contains("face=160,240 320x240"), "{}", text);
        assert!(text.contains("Laughing Detected"));
        assert!(!report(None).to_terminal_string().contains("face="));
    }
}
