//! Notification outcome vocabulary and aggregation.

use serde::{Deserialize, Serialize};

crate::text_enum! {
    /// Outcome of a single delivery attempt.
    DeliveryStatus {
        Sent = "sent",
        Failed = "failed",
    }
}

crate::text_enum! {
    /// Per-organization outcome stored on the affected-client row.
    NotificationStatus {
        /// Every recipient was reached.
        Sent = "sent",
        /// Some recipients were reached, some failed.
        Partial = "partial",
        /// No recipient was reached.
        Failed = "failed",
        /// The organization has no notification-eligible contacts.
        NoRecipients = "no_recipients",
    }
}

/// Derive an organization's notification status from its attempt counts.
pub fn organization_status(sent: usize, failed: usize) -> NotificationStatus {
    match (sent, failed) {
        (0, 0) => NotificationStatus::NoRecipients,
        (_, 0) => NotificationStatus::Sent,
        (0, _) => NotificationStatus::Failed,
        _ => NotificationStatus::Partial,
    }
}

/// Aggregate `{sent, errors}` count returned by a dispatch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchSummary {
    pub sent: usize,
    pub errors: usize,
}

impl DispatchSummary {
    /// Count one attempt with the given outcome.
    pub fn record(&mut self, status: DeliveryStatus) {
        match status {
            DeliveryStatus::Sent => self.sent += 1,
            DeliveryStatus::Failed => self.errors += 1,
        }
    }

    /// Total number of recipients attempted.
    pub fn total(&self) -> usize {
        self.sent + self.errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_from_counts() {
        assert_eq!(organization_status(3, 0), NotificationStatus::Sent);
        assert_eq!(organization_status(2, 1), NotificationStatus::Partial);
        assert_eq!(organization_status(0, 4), NotificationStatus::Failed);
        assert_eq!(organization_status(0, 0), NotificationStatus::NoRecipients);
    }

    #[test]
    fn no_recipients_is_distinct_from_failed() {
        assert_ne!(organization_status(0, 0), organization_status(0, 1));
        assert_eq!(NotificationStatus::NoRecipients.as_str(), "no_recipients");
    }

    #[test]
    fn summary_counts_attempts() {
        let mut summary = DispatchSummary::default();
        summary.record(DeliveryStatus::Sent);
        summary.record(DeliveryStatus::Failed);
        summary.record(DeliveryStatus::Sent);
        assert_eq!(summary, DispatchSummary { sent: 2, errors: 1 });
        assert_eq!(summary.total(), 3);
    }
}
