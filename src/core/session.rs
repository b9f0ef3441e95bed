//! Show session: phase machine over detector + ledger
//!
//! Transitions:
//! - IDLE → SHOWTIME: start_show
//! - SHOWTIME → FINISHED: finish_show (issues the receipt)
//! - FINISHED → IDLE: restart (ledger reset, detector reset)
//! - IDLE/SHOWTIME → IDLE: fail (totals dropped, fatal error kept for display)
//! - any → IDLE: retry (everything cleared)
//!
//! A finished show keeps its receipt: late failures are rejected, and a
//! recorded fault blocks start_show until retry.

use tracing::{debug, info, warn};

use crate::config::LaughConfig;
use crate::core::{issue_receipt, LaughDetector, Ledger};
use crate::error::{LaughError, Result, SessionFault};
use crate::types::{
    DetectionState, FrameReport, ReasonCode, Receipt, SessionPhase, SessionStats,
};

/// One visitor's show
#[derive(Debug)]
pub struct LaughSession {
    config: LaughConfig,
    phase: SessionPhase,
    ledger: Ledger,
    stats: SessionStats,
    detector: LaughDetector,
    /// Notification is up until this frame time (ms)
    acknowledge_until_ms: Option<u64>,
    receipt: Option<Receipt>,
    fault: Option<SessionFault>,
}

impl Default for LaughSession {
    fn default() -> Self {
        Self::new(LaughConfig::default())
    }
}

impl LaughSession {
    pub fn new(config: LaughConfig) -> Self {
        let ledger = Ledger::new(config.price_per_laugh, config.max_charge);
        let detector = LaughDetector::new(config.laugh_threshold, config.cooldown_ms);
        Self {
            phase: SessionPhase::Idle,
            stats: ledger.reset(),
            ledger,
            detector,
            acknowledge_until_ms: None,
            receipt: None,
            fault: None,
            config,
        }
    }

    /// "Enter Comedy Club"
    pub fn start_show(&mut self) -> Result<()> {
        self.expect_phase(SessionPhase::Idle, "start the show")?;
        if let Some(fault) = &self.fault {
            return Err(LaughError::RetryRequired(fault.code.clone()));
        }
        self.set_phase(SessionPhase::Showtime);
        Ok(())
    }

    /// Run one frame through the detector and bill any laugh
    pub fn process_frame(&mut self, smile_score: Option<f64>, now_ms: u64) -> Result<FrameReport> {
        self.expect_phase(SessionPhase::Showtime, "process a frame")?;

        let was_capped = self.ledger.is_capped(&self.stats);
        let decision = self.detector.process_frame(smile_score, now_ms);

        let reason = if decision.laugh_event_emitted {
            self.stats = self.ledger.apply_laugh_event(self.stats);
            self.acknowledge_until_ms = Some(now_ms.saturating_add(self.config.acknowledgment_ms));
            debug!(
                count = self.stats.laugh_count,
                due = %self.stats.amount_due,
                at_ms = now_ms,
                "laugh billed"
            );
            if was_capped {
                ReasonCode::L004_LAUGH_AT_CAP
            } else {
                ReasonCode::L004_LAUGH_BILLED
            }
        } else if smile_score.is_none() {
            ReasonCode::L001_NO_FACE
        } else if decision.is_smiling {
            ReasonCode::L003_COOLDOWN_ACTIVE
        } else {
            ReasonCode::L002_BELOW_THRESHOLD
        };

        Ok(FrameReport {
            timestamp: chrono::Utc::now(),
            frame_ms: now_ms,
            smile_score,
            is_smiling: decision.is_smiling,
            laugh_event_emitted: decision.laugh_event_emitted,
            acknowledging: self.is_acknowledging(now_ms),
            stats: self.stats,
            phase: self.phase,
            reason,
            face_box: None,
        })
    }

    /// "Finish & Pay"
    pub fn finish_show(&mut self) -> Result<&Receipt> {
        self.expect_phase(SessionPhase::Showtime, "finish the show")?;
        self.set_phase(SessionPhase::Finished);
        self.acknowledge_until_ms = None;
        let receipt = self.receipt.insert(issue_receipt(&self.stats));
        info!(
            invoice = %receipt.transaction_id,
            laughs = receipt.laugh_count,
            total = %receipt.total_due,
            "receipt issued"
        );
        Ok(&*receipt)
    }

    /// "Go Back To Entrance"
    pub fn restart(&mut self) -> Result<()> {
        self.expect_phase(SessionPhase::Finished, "restart")?;
        self.clear();
        self.set_phase(SessionPhase::Idle);
        Ok(())
    }

    /// Record a fatal error. The show stops and its totals are dropped;
    /// nothing is retried. A finished show is left alone.
    pub fn fail(&mut self, error: &LaughError) -> Result<()> {
        if self.phase == SessionPhase::Finished {
            return Err(LaughError::InvalidTransition {
                phase: self.phase,
                action: "record a failure",
            });
        }
        warn!(phase = %self.phase, error = %error, "show failed");
        self.clear();
        if self.phase != SessionPhase::Idle {
            self.set_phase(SessionPhase::Idle);
        }
        self.fault = Some(SessionFault::from(error));
        Ok(())
    }

    /// "Retry": start over from a fresh idle session
    pub fn retry(&mut self) {
        info!(phase = %self.phase, "retrying from scratch");
        self.clear();
        self.fault = None;
        self.phase = SessionPhase::Idle;
    }

    /// Is the laugh notification on screen at `now_ms`?
    pub fn is_acknowledging(&self, now_ms: u64) -> bool {
        self.acknowledge_until_ms.is_some_and(|until| now_ms < until)
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn detection(&self) -> DetectionState {
        self.detector.state()
    }

    pub fn receipt(&self) -> Option<&Receipt> {
        self.receipt.as_ref()
    }

    pub fn fault(&self) -> Option<&SessionFault> {
        self.fault.as_ref()
    }

    pub fn config(&self) -> &LaughConfig {
        &self.config
    }

    pub fn frame_count(&self) -> u64 {
        self.detector.frame_count()
    }

    fn clear(&mut self) {
        self.stats = self.ledger.reset();
        self.detector.reset();
        self.acknowledge_until_ms = None;
        self.receipt = None;
    }

    fn expect_phase(&self, expected: SessionPhase, action: &'static str) -> Result<()> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(LaughError::InvalidTransition {
                phase: self.phase,
                action,
            })
        }
    }

    fn set_phase(&mut self, phase: SessionPhase) {
        info!(from = %self.phase, to = %phase, "phase change");
        self.phase = phase;
    }
}
