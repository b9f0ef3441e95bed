//! Frame loop: camera → analyzer → session, once per tick
//!
//! The loop owns the camera for the length of the show. Cancellation is a
//! token checked at the top of every tick; a tick already running finishes.

use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::core::capture::{Camera, CaptureConstraints, CaptureGuard, FaceAnalyzer, VideoStream};
use crate::core::LaughSession;
use crate::error::{LaughError, Result};
use crate::types::{smile_score, FaceObservation, FrameReport};

/// Why the loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    /// Token cancelled, view torn down, or the show left SHOWTIME
    Cancelled,
    /// Camera stopped delivering frames
    EndOfStream,
    /// Analyzer failed; recorded on the session
    Faulted,
}

/// Result of one tick
#[derive(Debug, Clone)]
pub enum TickOutcome {
    Frame(FrameReport),
    Stopped(LoopExit),
}

/// Drives one show from a camera and an analyzer
pub struct FrameLoop<A: FaceAnalyzer, S: VideoStream> {
    capture: CaptureGuard<S>,
    analyzer: A,
    token: CancellationToken,
}

impl<A: FaceAnalyzer, S: VideoStream> FrameLoop<A, S> {
    /// Start the show: load the analyzer, then open the camera.
    ///
    /// Either failure is fatal, recorded on the session and returned.
    pub fn start<C, F>(
        session: &mut LaughSession,
        camera: &mut C,
        init_analyzer: F,
        token: CancellationToken,
    ) -> Result<Self>
    where
        C: Camera<Stream = S>,
        F: FnOnce() -> Result<A>,
    {
        session.start_show()?;

        let analyzer = match init_analyzer() {
            Ok(analyzer) => analyzer,
            Err(err) => {
                let err = if matches!(err, LaughError::InferenceInitFailure(_)) {
                    err
                } else {
                    LaughError::InferenceInitFailure(err.to_string())
                };
                session.fail(&err)?;
                return Err(err);
            }
        };

        let constraints = CaptureConstraints {
            frame_rate: session.config().frame_rate,
            ..CaptureConstraints::default()
        };
        let capture = match CaptureGuard::acquire(camera, &constraints) {
            Ok(capture) => capture,
            Err(err) => {
                session.fail(&err)?;
                return Err(err);
            }
        };

        Ok(Self {
            capture,
            analyzer,
            token,
        })
    }

    /// Process at most one frame. The camera is released on any stop.
    pub fn tick(&mut self, session: &mut LaughSession, now_ms: u64) -> Result<TickOutcome> {
        if self.token.is_cancelled() {
            self.capture.release();
            return Ok(TickOutcome::Stopped(LoopExit::Cancelled));
        }

        // finished (or failed) elsewhere: the bill on screen is final
        if !session.phase().accepts_frames() {
            debug!(phase = %session.phase(), "show no longer running");
            self.capture.release();
            return Ok(TickOutcome::Stopped(LoopExit::Cancelled));
        }

        let Some(frame) = self.capture.next_frame() else {
            self.capture.release();
            return Ok(TickOutcome::Stopped(LoopExit::EndOfStream));
        };

        let face = match self.analyzer.detect(&frame, now_ms) {
            Ok(face) => face,
            Err(err) => {
                self.capture.release();
                session.fail(&err)?;
                return Ok(TickOutcome::Stopped(LoopExit::Faulted));
            }
        };

        match session.process_frame(smile_score(face.as_ref()), now_ms) {
            Ok(report) => Ok(TickOutcome::Frame(FrameReport {
                face_box: face.as_ref().and_then(FaceObservation::bounding_box),
                ..report
            })),
            Err(err) => {
                self.capture.release();
                Err(err)
            }
        }
    }

    /// Tick at the configured frame rate until the loop stops.
    pub async fn run<F>(mut self, session: &mut LaughSession, mut on_report: F) -> Result<LoopExit>
    where
        F: FnMut(&FrameReport),
    {
        let mut ticker = tokio::time::interval(session.config().frame_interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let epoch = Instant::now();
        info!(fps = session.config().frame_rate, "frame loop started");

        loop {
            ticker.tick().await;
            let now_ms = epoch.elapsed().as_millis() as u64;
            match self.tick(session, now_ms)? {
                TickOutcome::Frame(report) => on_report(&report),
                TickOutcome::Stopped(exit) => {
                    debug!(?exit, frames = session.frame_count(), "frame loop stopped");
                    return Ok(exit);
                }
            }
        }
    }

    /// Token that stops this loop
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub fn is_capturing(&self) -> bool {
        self.capture.is_active()
    }
}
