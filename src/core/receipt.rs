//! Receipt issuing and the (stubbed) settlement

use colored::Colorize;
use uuid::Uuid;

use crate::types::{Receipt, SessionStats, Settlement};

/// Length of the printed invoice number
pub const TRANSACTION_ID_LEN: usize = 8;

/// Issue the bill for a finished show
pub fn issue_receipt(stats: &SessionStats) -> Receipt {
    Receipt::new(new_transaction_id(), chrono::Utc::now(), stats)
}

/// Random invoice number: 8 uppercase hex characters from a v4 UUID
pub fn new_transaction_id() -> String {
    Uuid::new_v4()
        .simple()
        .to_string()
        .to_uppercase()
        .chars()
        .take(TRANSACTION_ID_LEN)
        .collect()
}

/// "Settle Account". No payment is processed.
pub fn settle(receipt: &Receipt) -> Settlement {
    if receipt.total_due.is_zero() {
        return Settlement::NothingDue;
    }
    Settlement::DemoRedirect {
        provider: "stripe".to_string(),
        message: format!(
            "Redirecting to Stripe for {}... (This is a demo)",
            receipt.total_due
        ),
    }
}

/// Render the bill for the terminal
pub fn render_receipt(receipt: &Receipt, no_color: bool) -> String {
    let mut lines = Vec::new();
    let rule = "- - - - - - - - - - - - - - - - - - - -";

    lines.push(paint("COMEDY CLUB BILL", no_color, |s| s.bold().italic().to_string()));
    lines.push(format!("Invoice #{}", receipt.transaction_id));
    lines.push(receipt.issued_display());
    lines.push(rule.to_string());
    lines.push(format!("{:<28}{:>12}", "LAUGH EVENTS", format!("x{}", receipt.laugh_count)));
    lines.push(format!("{:<28}{:>12}", "UNIT PRICE", receipt.price_per_laugh.to_string()));
    if receipt.cap_applied {
        lines.push(paint(
            &format!("{:<28}{:>12}", "MEMBERSHIP CAP", "Applied"),
            no_color,
            |s| s.magenta().to_string(),
        ));
    }
    lines.push("========================================".to_string());
    lines.push(paint(
        &format!("{:<28}{:>12}", "TOTAL DUE", receipt.total_due.to_string()),
        no_color,
        |s| s.bold().to_string(),
    ));
    lines.push(String::new());
    lines.push("No refunds for bad jokes. Keep smiling.".to_string());

    lines.join("\n")
}

fn paint(text: &str, no_color: bool, style: impl Fn(&str) -> String) -> String {
    if no_color {
        text.to_string()
    } else {
        style(text)
    }
}
