//! Error types for Laughmeter

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::SessionPhase;

pub type Result<T> = std::result::Result<T, LaughError>;

/// Everything that can go wrong while running a show.
///
/// A missing face is not an error: it arrives as a `None` smile score.
#[derive(Debug, Error)]
pub enum LaughError {
    /// The face analyzer could not be loaded
    #[error("AI initialization failed: {0}")]
    InferenceInitFailure(String),

    /// The user refused camera access
    #[error("Camera permission denied: {0}")]
    CameraPermissionDenied(String),

    /// No camera, or the camera went away mid-show
    #[error("Camera unavailable: {0}")]
    CameraUnavailable(String),

    /// The analyzer failed on a running frame
    #[error("Face analysis failed: {0}")]
    InferenceFailed(String),

    #[error("Cannot {action} while {phase}")]
    InvalidTransition {
        phase: SessionPhase,
        action: &'static str,
    },

    /// A fatal error is on record; the user has to retry first
    #[error("Retry required after {0}")]
    RetryRequired(String),

    #[error("Smile score {0} is outside [0, 1]")]
    InvalidScore(f64),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl LaughError {
    /// Fatal errors end the show; the user has to retry explicitly.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::InferenceInitFailure(_)
                | Self::CameraPermissionDenied(_)
                | Self::CameraUnavailable(_)
                | Self::InferenceFailed(_)
        )
    }

    /// Stable code for logs and API bodies
    pub fn code(&self) -> &'static str {
        match self {
            Self::InferenceInitFailure(_) => "INFERENCE_INIT_FAILURE",
            Self::CameraPermissionDenied(_) => "CAMERA_PERMISSION_DENIED",
            Self::CameraUnavailable(_) => "CAMERA_UNAVAILABLE",
            Self::InferenceFailed(_) => "INFERENCE_FAILED",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::RetryRequired(_) => "RETRY_REQUIRED",
            Self::InvalidScore(_) => "INVALID_SCORE",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::Io(_) => "IO",
            Self::Json(_) => "JSON",
        }
    }

    /// Message shown to the user for a fatal error
    pub fn user_message(&self) -> String {
        match self {
            Self::InferenceInitFailure(_) => "AI initialization failed. Please check your internet \
                connection or try a different browser."
                .to_string(),
            Self::CameraPermissionDenied(_) => {
                "Camera permission denied. We need to see you laugh!".to_string()
            }
            other => other.to_string(),
        }
    }
}

/// A fatal error as remembered by a session until the user retries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionFault {
    pub code: String,
    pub message: String,
    pub user_message: String,
}

impl From<&LaughError> for SessionFault {
    fn from(error: &LaughError) -> Self {
        Self {
            code: error.code().to_string(),
            message: error.to_string(),
            user_message: error.user_message(),
        }
    }
}
