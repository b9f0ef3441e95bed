//! Session phase definitions

use serde::{Deserialize, Serialize};

/// The phases of one show. The cycle has no terminal phase:
/// `Idle -> Showtime -> Finished -> (restart) -> Idle`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionPhase {
    /// Welcome screen, nothing billed yet
    #[default]
    Idle,
    /// Camera on, laughs are being billed
    Showtime,
    /// Show over, receipt on screen (read-only totals)
    Finished,
}

impl SessionPhase {
    /// Get ANSI color code for terminal display
    pub fn color_code(&self) -> &'static str {
        match self {
            SessionPhase::Idle => "\x1b[90m",     // Gray
            SessionPhase::Showtime => "\x1b[35m", // Magenta
            SessionPhase::Finished => "\x1b[32m", // Green
        }
    }

    /// Reset ANSI color
    pub fn color_reset() -> &'static str {
        "\x1b[0m"
    }

    /// Get emoji for phase
    pub fn emoji(&self) -> &'static str {
        match self {
            SessionPhase::Idle => "🎟",
            SessionPhase::Showtime => "🎤",
            SessionPhase::Finished => "🧾",
        }
    }

    /// Frames are only analyzed during the show
    pub fn accepts_frames(&self) -> bool {
        *self == SessionPhase::Showtime
    }
}

impl std::fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SessionPhase::Idle => "IDLE",
            SessionPhase::Showtime => "SHOWTIME",
            SessionPhase::Finished => "FINISHED",
        };
        write!(f, "{}", name)
    }
}
