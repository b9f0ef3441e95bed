//! Core modules for Laughmeter

pub mod detector;
pub mod ledger;
pub mod session;
pub mod receipt;
pub mod capture;
pub mod frame_loop;
pub mod scripted;
pub mod api;

pub use detector::LaughDetector;
pub use ledger::Ledger;
pub use session::LaughSession;
pub use receipt::{issue_receipt, new_transaction_id, render_receipt, settle};
pub use capture::{Camera, CaptureConstraints, CaptureGuard, FaceAnalyzer, VideoFrame, VideoStream};
pub use frame_loop::{FrameLoop, LoopExit, TickOutcome};
pub use scripted::{ScriptedAnalyzer, ScriptedCamera};
pub use api::{create_router, run_server};
