//! Composition of the individualized notification for one recipient.
//!
//! Every message carries the alert's summary, severity and deadline together
//! with the organization-specific reason and risk from its affected-client
//! link.

use regwatch_db::models::affected_client::AffectedClient;
use regwatch_db::models::alert::RegulatoryAlert;

use crate::directory::Recipient;

/// A fully composed message ready for a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub to_email: String,
    pub to_name: String,
    pub subject: String,
    pub body: String,
}

/// Compose the message for `recipient` of the organization behind `link`.
pub fn compose(
    alert: &RegulatoryAlert,
    link: &AffectedClient,
    recipient: &Recipient,
) -> OutboundMessage {
    let content = &alert.content;
    let subject = format!("[{}] {}", content.severity.label(), content.title);

    let mut lines = vec![
        format!("Dear {},", recipient.name),
        String::new(),
        "a regulatory change has been assessed as relevant for your organization.".to_string(),
        String::new(),
        format!("Title:        {}", content.title),
        format!("Severity:     {}", content.severity.label()),
    ];
    if let Some(jurisdiction) = &content.jurisdiction {
        lines.push(format!("Jurisdiction: {jurisdiction}"));
    }
    if let Some(legal_basis) = &content.legal_basis {
        lines.push(format!("Legal basis:  {legal_basis}"));
    }
    lines.push(match content.deadline {
        Some(deadline) => format!("Deadline:     {}", deadline.format("%Y-%m-%d")),
        None => "Deadline:     none".to_string(),
    });

    if let Some(summary) = &content.summary {
        lines.extend([String::new(), "Summary:".to_string(), summary.clone()]);
    }

    lines.extend([String::new(), format!("Your risk: {}", link.risk)]);
    if let Some(reason) = &link.reason {
        lines.extend(["Why this affects you:".to_string(), reason.clone()]);
    }
    if let Some(comment) = &link.comment {
        lines.extend([String::new(), comment.clone()]);
    }

    OutboundMessage {
        to_email: recipient.email.clone(),
        to_name: recipient.name.clone(),
        subject,
        body: lines.join("\n"),
    }
}
