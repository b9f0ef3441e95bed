//! Core types for Laughmeter

mod state;
mod money;
mod stats;
mod detection;
mod face;
mod output;
mod reason;
mod receipt;

pub use state::SessionPhase;
pub use money::Money;
pub use stats::SessionStats;
pub use detection::{DetectionState, FrameDecision};
pub use face::{smile_score, Blendshape, BoundingBox, FaceObservation, Landmark, MOUTH_SMILE_LEFT, MOUTH_SMILE_RIGHT};
pub use output::FrameReport;
pub use reason::ReasonCode;
pub use receipt::{Receipt, Settlement};
