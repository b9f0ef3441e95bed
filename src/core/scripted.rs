//! Scripted collaborators: a camera that plays a fixed number of frames and
//! an analyzer that answers from a list of smile scores.
//!
//! Used by the `--demo` mode and by tests in place of a webcam and a model.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use crate::core::capture::{Camera, CaptureConstraints, FaceAnalyzer, VideoFrame, VideoStream};
use crate::error::{LaughError, Result};
use crate::types::{Blendshape, FaceObservation, Landmark, MOUTH_SMILE_LEFT, MOUTH_SMILE_RIGHT};

/// Camera handing out `frames` blank frames
#[derive(Debug, Clone)]
pub struct ScriptedCamera {
    frames: u64,
    deny: bool,
    stops: Arc<AtomicU32>,
}

impl ScriptedCamera {
    pub fn new(frames: u64) -> Self {
        Self {
            frames,
            deny: false,
            stops: Arc::new(AtomicU32::new(0)),
        }
    }

    /// A camera the user refuses access to
    pub fn denied() -> Self {
        Self {
            deny: true,
            ..Self::new(0)
        }
    }

    /// How many times a stream from this camera had its tracks stopped
    pub fn stop_count(&self) -> u32 {
        self.stops.load(Ordering::SeqCst)
    }
}

impl Camera for ScriptedCamera {
    type Stream = ScriptedStream;

    fn open(&mut self, constraints: &CaptureConstraints) -> Result<ScriptedStream> {
        if self.deny {
            return Err(LaughError::CameraPermissionDenied("NotAllowedError".into()));
        }
        Ok(ScriptedStream {
            next: 0,
            frames: self.frames,
            width: constraints.width,
            height: constraints.height,
            stops: Arc::clone(&self.stops),
        })
    }
}

#[derive(Debug)]
pub struct ScriptedStream {
    next: u64,
    frames: u64,
    width: u32,
    height: u32,
    stops: Arc<AtomicU32>,
}

impl VideoStream for ScriptedStream {
    fn next_frame(&mut self) -> Option<VideoFrame> {
        if self.next >= self.frames {
            return None;
        }
        let frame = VideoFrame {
            index: self.next,
            width: self.width,
            height: self.height,
            data: Vec::new(),
        };
        self.next += 1;
        Some(frame)
    }

    fn stop_all_tracks(&mut self) {
        self.stops.fetch_add(1, Ordering::SeqCst);
    }
}

/// Analyzer answering frame `i` with `scores[i % len]`; `None` is "no face"
#[derive(Debug, Clone)]
pub struct ScriptedAnalyzer {
    scores: Vec<Option<f64>>,
    fail_at: Option<u64>,
}

impl ScriptedAnalyzer {
    pub fn new(scores: Vec<Option<f64>>) -> Self {
        Self {
            scores,
            fail_at: None,
        }
    }

    /// Fail on the given frame index
    pub fn failing_at(mut self, index: u64) -> Self {
        self.fail_at = Some(index);
        self
    }

    /// A short show: a chuckle, a long laugh, a look away, another laugh
    pub fn comedy_set() -> Self {
        let mut scores = Vec::new();
        scores.extend(std::iter::repeat(Some(0.2)).take(15));
        scores.extend(std::iter::repeat(Some(0.8)).take(10));
        scores.extend(std::iter::repeat(Some(0.3)).take(20));
        scores.extend(std::iter::repeat(Some(0.95)).take(75));
        scores.extend(std::iter::repeat(None).take(15));
        scores.extend(std::iter::repeat(Some(0.7)).take(10));
        scores.extend(std::iter::repeat(Some(0.1)).take(15));
        Self::new(scores)
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

impl FaceAnalyzer for ScriptedAnalyzer {
    fn detect(&mut self, frame: &VideoFrame, _timestamp_ms: u64) -> Result<Option<FaceObservation>> {
        if self.fail_at == Some(frame.index) {
            return Err(LaughError::InferenceFailed(format!("frame {}", frame.index)));
        }
        if self.scores.is_empty() {
            return Ok(None);
        }
        let score = self.scores[(frame.index % self.scores.len() as u64) as usize];
        Ok(score.map(|s| {
            FaceObservation::new(vec![
                Blendshape::new(MOUTH_SMILE_LEFT, s),
                Blendshape::new(MOUTH_SMILE_RIGHT, s),
            ])
            .with_landmarks(face_outline())
        }))
    }
}

/// A centred face: forehead, chin and both cheeks
fn face_outline() -> Vec<Landmark> {
    vec![
        Landmark { x: 0.5, y: 0.25 },
        Landmark { x: 0.5, y: 0.75 },
        Landmark { x: 0.35, y: 0.5 },
        Landmark { x: 0.65, y: 0.5 },
    ]
}
