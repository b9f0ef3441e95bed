//! Integration tests for billing
//!
//! Tests the full path: smile score → LaughDetector → Ledger → totals

use laughmeter::core::{LaughDetector, LaughSession, Ledger};
use laughmeter::types::{Money, ReasonCode, SessionPhase, SessionStats};
use laughmeter::{LaughConfig, COOLDOWN_PERIOD_MS, LAUGH_THRESHOLD};
use pretty_assertions::assert_eq;

fn show() -> LaughSession {
    let mut session = LaughSession::new(LaughConfig::default());
    session.start_show().unwrap();
    session
}

/// Laugh once per cooldown, `n` times
fn laugh_n_times(session: &mut LaughSession, n: u64) {
    for i in 0..n {
        let report = session.process_frame(Some(0.9), i * (COOLDOWN_PERIOD_MS + 1)).unwrap();
        assert!(report.laugh_event_emitted, "laugh {} should bill", i);
    }
}

/// 0.9 @0 bills, 0.9 @500 does not, 0.9 @1001 bills again
#[test]
fn test_cooldown_example() {
    let mut session = show();

    let first = session.process_frame(Some(0.9), 0).unwrap();
    assert!(first.laugh_event_emitted);

    let held = session.process_frame(Some(0.9), 500).unwrap();
    assert!(held.is_smiling);
    assert!(!held.laugh_event_emitted);

    let again = session.process_frame(Some(0.9), 1001).unwrap();
    assert!(again.laugh_event_emitted);
    assert_eq!(again.stats.laugh_count, 2);
    assert_eq!(again.stats.amount_due, Money::from_cents(60));
}

/// Exactly at the threshold is not a smile
#[test]
fn test_threshold_boundary() {
    let mut detector = LaughDetector::default();
    assert_eq!(detector.threshold(), LAUGH_THRESHOLD);

    assert!(!detector.process_frame(Some(0.65), 0).is_smiling);
    assert!(detector.process_frame(Some(0.6500001), 1).is_smiling);
}

/// 80 laughs hit the cap exactly, the 81st adds nothing
#[test]
fn test_cap_convergence() {
    let mut session = show();
    laugh_n_times(&mut session, 80);
    assert_eq!(session.stats().amount_due, Money::from_cents(2400));
    assert_eq!(session.stats().amount_due.to_string(), "€24.00");

    let report = session.process_frame(Some(0.9), 80 * (COOLDOWN_PERIOD_MS + 1)).unwrap();
    assert!(report.laugh_event_emitted);
    assert_eq!(report.reason, ReasonCode::L004_LAUGH_AT_CAP);
    assert_eq!(report.stats.laugh_count, 81);
    assert_eq!(report.stats.amount_due, Money::from_cents(2400));
}

/// amount_due == min(N * price, cap) for every N
#[test]
fn test_amount_formula_over_many_laughs() {
    let ledger = Ledger::new(Money::from_cents(30), Money::from_cents(2400));
    let mut stats = ledger.reset();
    for n in 1..=120u64 {
        stats = ledger.apply_laugh_event(stats);
        assert_eq!(stats.laugh_count, n);
        assert_eq!(stats.amount_due, Money::from_cents((n * 30).min(2400)));
    }
}

/// reset() always returns the zero state
#[test]
fn test_reset_idempotent() {
    let ledger = Ledger::new(Money::from_cents(30), Money::from_cents(2400));
    let zero = SessionStats {
        laugh_count: 0,
        amount_due: Money::ZERO,
        price_per_laugh: Money::from_cents(30),
        max_charge: Money::from_cents(2400),
    };

    let mut stats = ledger.reset();
    assert_eq!(stats, zero);
    for _ in 0..95 {
        stats = ledger.apply_laugh_event(stats);
    }
    assert_eq!(ledger.reset(), zero);
}

/// Frames without a face never move the timer or light the indicator
#[test]
fn test_missing_face_frames() {
    let mut session = show();
    session.process_frame(Some(0.9), 0).unwrap();

    for t in [100, 400, 900, 1500, 3000] {
        let report = session.process_frame(None, t).unwrap();
        assert!(!report.is_smiling);
        assert!(!report.laugh_event_emitted);
        assert_eq!(report.reason, ReasonCode::L001_NO_FACE);
        assert_eq!(session.detection().last_event_ms, Some(0));
        assert!(!session.detection().currently_smiling);
    }
}

/// A long smile at 30 fps bills once per second
#[test]
fn test_sustained_smile_at_frame_rate() {
    let mut session = show();
    // 3 seconds of frames, 33ms apart
    let billed = (0..90u64)
        .filter(|i| session.process_frame(Some(0.95), i * 33).unwrap().laugh_event_emitted)
        .count();
    // t=0, t=1023 (first frame >1000ms later), t=2046
    assert_eq!(billed, 3);
}

/// Restart brings the totals back to zero for the next visitor
#[test]
fn test_restart_resets_totals() {
    let mut session = show();
    laugh_n_times(&mut session, 5);
    let receipt = session.finish_show().unwrap().clone();
    assert_eq!(receipt.total_due, Money::from_cents(150));

    session.restart().unwrap();
    assert_eq!(session.phase(), SessionPhase::Idle);
    assert_eq!(session.stats().laugh_count, 0);

    session.start_show().unwrap();
    // cooldown starts over too: "never" laughed
    assert!(session.process_frame(Some(0.9), 0).unwrap().laugh_event_emitted);
}

/// Custom pricing flows through to the bill
#[test]
fn test_custom_pricing() {
    let config = LaughConfig {
        price_per_laugh: Money::from_cents(50),
        max_charge: Money::from_cents(120),
        ..Default::default()
    };
    let mut session = LaughSession::new(config);
    session.start_show().unwrap();
    laugh_n_times(&mut session, 3);

    let receipt = session.finish_show().unwrap();
    assert_eq!(receipt.total_due, Money::from_cents(120));
    assert!(receipt.cap_applied);
}

/// Frame report serializes for the display
#[test]
fn test_report_json() {
    let mut session = show();
    let report = session.process_frame(Some(0.9), 0).unwrap();
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["is_smiling"], true);
    assert_eq!(json["laugh_event_emitted"], true);
    assert_eq!(json["stats"]["amount_due"], 30);
    assert_eq!(json["phase"], "SHOWTIME");
    assert_eq!(json["reason"], "L004_LAUGH_BILLED");
}

/// Parseable output format
#[test]
fn test_parseable_output_format() {
    let mut session = show();
    let report = session.process_frame(None, 40).unwrap();
    let formatted = report.to_parseable_string();

    assert!(formatted.contains("t=40ms"));
    assert!(formatted.contains("score=-"));
    assert!(formatted.contains("smiling=false"));
    assert!(formatted.contains("due=0.00"));
    assert!(formatted.contains("reason=L001_NO_FACE"));
}
