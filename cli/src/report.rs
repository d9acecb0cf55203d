//! Relay-by-relay report rendering and the exit policy.

use laurel_relay::{PublishReport, PublishStatus, RelayOutcome};

/// Print the per-relay breakdown so the user can see exactly which relays
/// took the event and which to retry.
pub fn print_report(report: &PublishReport) {
    println!();
    println!(
        "Publish results ({} accepted / {} relays):",
        report.accepted_count(),
        report.reports.len()
    );
    for relay in &report.reports {
        let status = match &relay.outcome {
            RelayOutcome::Accepted if relay.confirmed => "accepted, verified".to_string(),
            RelayOutcome::Accepted => "accepted".to_string(),
            RelayOutcome::Rejected(reason) => format!("rejected: {reason}"),
            RelayOutcome::Unreachable(reason) => format!("unreachable: {reason}"),
            RelayOutcome::TimedOut => "timed out".to_string(),
        };
        println!("  {} — {}", relay.url, status);
        for notice in &relay.notices {
            println!("      notice: {notice}");
        }
    }
    if report.interrupted {
        println!("  (interrupted — only outcomes collected before the abort are shown)");
    }
}

/// Exit policy: any accepted relay counts as success; total failure does
/// not.
pub fn ensure_published(report: &PublishReport) -> anyhow::Result<()> {
    match report.status() {
        PublishStatus::TotalFailure => anyhow::bail!("the event was not accepted by any relay"),
        PublishStatus::PartialSuccess => {
            println!("Partial success — you can retry later against the relays that failed.");
            Ok(())
        }
        PublishStatus::FullSuccess => Ok(()),
    }
}
