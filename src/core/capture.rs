//! Camera and face-analysis collaborator boundaries
//!
//! The camera is acquired when the show starts and every track is stopped
//! when the show ends, through `CaptureGuard`.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::Result;
use crate::types::FaceObservation;
use crate::{CAPTURE_HEIGHT, CAPTURE_WIDTH, TARGET_FRAME_RATE};

/// Requested video format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureConstraints {
    pub width: u32,
    pub height: u32,
    pub frame_rate: u32,
}

impl Default for CaptureConstraints {
    fn default() -> Self {
        Self {
            width: CAPTURE_WIDTH,
            height: CAPTURE_HEIGHT,
            frame_rate: TARGET_FRAME_RATE,
        }
    }
}

/// One captured frame. Pixels stay opaque to this crate.
#[derive(Debug, Clone, Default)]
pub struct VideoFrame {
    /// Frame sequence number
    pub index: u64,
    pub width: u32,
    pub height: u32,
    /// Raw pixel data, format owned by the camera/analyzer pair
    pub data: Vec<u8>,
}

/// A live stream handed out by a camera
pub trait VideoStream {
    /// Next frame, `None` once the stream has ended
    fn next_frame(&mut self) -> Option<VideoFrame>;

    /// Stop every track of the stream
    fn stop_all_tracks(&mut self);
}

/// Camera / media capture collaborator
pub trait Camera {
    type Stream: VideoStream;

    /// Ask for a stream. Refusal is `CameraPermissionDenied`, not retried.
    fn open(&mut self, constraints: &CaptureConstraints) -> Result<Self::Stream>;
}

/// Face landmark / blendshape collaborator
pub trait FaceAnalyzer {
    /// Analyze one frame. `timestamp_ms` must increase monotonically.
    /// Returns the single face found, if any.
    fn detect(&mut self, frame: &VideoFrame, timestamp_ms: u64) -> Result<Option<FaceObservation>>;
}

/// Owns an open stream and stops it exactly once
#[derive(Debug)]
pub struct CaptureGuard<S: VideoStream> {
    stream: Option<S>,
}

impl<S: VideoStream> CaptureGuard<S> {
    /// Open the camera and take ownership of the stream
    pub fn acquire<C>(camera: &mut C, constraints: &CaptureConstraints) -> Result<Self>
    where
        C: Camera<Stream = S>,
    {
        let stream = camera.open(constraints)?;
        info!(
            width = constraints.width,
            height = constraints.height,
            fps = constraints.frame_rate,
            "camera acquired"
        );
        Ok(Self { stream: Some(stream) })
    }

    /// Next frame, `None` after release or end of stream
    pub fn next_frame(&mut self) -> Option<VideoFrame> {
        self.stream.as_mut()?.next_frame()
    }

    pub fn is_active(&self) -> bool {
        self.stream.is_some()
    }

    /// Stop all tracks now. Further calls do nothing.
    pub fn release(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.stop_all_tracks();
            debug!("camera released");
        }
    }
}

impl<S: VideoStream> Drop for CaptureGuard<S> {
    fn drop(&mut self) {
        self.release();
    }
}
