//! Bounded concurrent dispatch of alert notifications.
//!
//! A dispatch runs in two phases. First every affected organization's
//! recipients are resolved. An organization whose lookup fails is reported
//! as `failed` and skipped; the dispatch only aborts when no lookup
//! succeeds at all. Then one message per recipient is sent through a
//! `buffer_unordered` stream, each send under its own timeout. A failed or
//! timed-out send is recorded against its recipient and never affects the
//! others.
//!
//! The dispatcher does not persist anything. The caller writes
//! [`DispatchReport::attempts`] to the notification log and each
//! [`OrganizationReport`] onto its affected-client row.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures::stream::{self, StreamExt};
use regwatch_core::notification::{
    organization_status, DeliveryStatus, DispatchSummary, NotificationStatus,
};
use regwatch_core::types::{DbId, Timestamp};
use regwatch_db::models::affected_client::AffectedClient;
use regwatch_db::models::alert::RegulatoryAlert;
use regwatch_db::models::notification_log::NewLogEntry;
use serde::Serialize;

use crate::directory::{DirectoryError, Recipient, RecipientDirectory};
use crate::message::{self, OutboundMessage};
use crate::transport::MessageTransport;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Default number of sends in flight.
const DEFAULT_CONCURRENCY: usize = 8;

/// Default per-send timeout in seconds.
const DEFAULT_SEND_TIMEOUT_SECS: u64 = 20;

/// Dispatcher tuning.
#[derive(Debug, Clone)]
pub struct DispatchConfig {
    /// Maximum number of concurrent sends. Always at least 1.
    pub concurrency: usize,
    /// Upper bound on a single send.
    ///
    /// Callers that await a dispatch inside an HTTP request should keep
    /// this below the request timeout.
    pub send_timeout: Duration,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            send_timeout: Duration::from_secs(DEFAULT_SEND_TIMEOUT_SECS),
        }
    }
}

impl DispatchConfig {
    /// Load from environment variables.
    ///
    /// | Variable                     | Default |
    /// |------------------------------|---------|
    /// | `DISPATCH_CONCURRENCY`       | `8`     |
    /// | `DISPATCH_SEND_TIMEOUT_SECS` | `20`    |
    pub fn from_env() -> Self {
        let concurrency = std::env::var("DISPATCH_CONCURRENCY")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(DEFAULT_CONCURRENCY);
        let send_timeout_secs = std::env::var("DISPATCH_SEND_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_SEND_TIMEOUT_SECS);

        Self {
            concurrency: concurrency.max(1),
            send_timeout: Duration::from_secs(send_timeout_secs),
        }
    }
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// Error that aborts a dispatch before any message is sent.
///
/// Raised only when every organization's recipient lookup failed, which
/// means the directory itself is unreachable.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("Recipient resolution failed for organization {organization_id}: {source}")]
    Directory {
        organization_id: DbId,
        #[source]
        source: DirectoryError,
    },
}

/// Outcome of one send to one recipient.
#[derive(Debug, Clone)]
pub struct DeliveryAttempt {
    pub affected_client_id: DbId,
    pub organization_id: DbId,
    pub recipient_email: String,
    pub recipient_name: String,
    pub status: DeliveryStatus,
    pub error_message: Option<String>,
    pub sent_at: Timestamp,
}

impl DeliveryAttempt {
    /// The notification log row for this attempt.
    pub fn to_log_entry(&self, alert_id: DbId) -> NewLogEntry {
        NewLogEntry {
            alert_id,
            organization_id: self.organization_id,
            recipient_email: self.recipient_email.clone(),
            recipient_name: self.recipient_name.clone(),
            status: self.status,
            error_message: self.error_message.clone(),
            sent_at: self.sent_at,
        }
    }
}

/// Aggregated outcome for one affected organization.
#[derive(Debug, Clone, Serialize)]
pub struct OrganizationReport {
    pub affected_client_id: DbId,
    pub organization_id: DbId,
    pub status: NotificationStatus,
    pub sent: usize,
    pub failed: usize,
    /// Set when the organization's recipients could not be resolved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub completed_at: Timestamp,
}

/// Everything a dispatch did.
#[derive(Debug, Clone)]
pub struct DispatchReport {
    pub alert_id: DbId,
    /// One entry per recipient attempted, grouped by organization.
    pub attempts: Vec<DeliveryAttempt>,
    /// One entry per affected organization, in link order.
    pub organizations: Vec<OrganizationReport>,
}

impl DispatchReport {
    /// Aggregate `{sent, errors}` over all recipients. An organization
    /// whose recipients could not be resolved counts as one error.
    pub fn summary(&self) -> DispatchSummary {
        let mut summary = DispatchSummary::default();
        for attempt in &self.attempts {
            summary.record(attempt.status);
        }
        for _ in self.organizations.iter().filter(|o| o.error.is_some()) {
            summary.record(DeliveryStatus::Failed);
        }
        summary
    }

    /// Log rows for every attempt.
    pub fn log_entries(&self) -> Vec<NewLogEntry> {
        self.attempts
            .iter()
            .map(|a| a.to_log_entry(self.alert_id))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

/// One message bound for one recipient of one organization.
struct SendJob {
    link_index: usize,
    affected_client_id: DbId,
    organization_id: DbId,
    message: OutboundMessage,
}

/// Resolves recipients and sends individualized alert notifications.
pub struct NotificationDispatcher {
    transport: Arc<dyn MessageTransport>,
    directory: Arc<dyn RecipientDirectory>,
    config: DispatchConfig,
}

impl NotificationDispatcher {
    pub fn new(
        transport: Arc<dyn MessageTransport>,
        directory: Arc<dyn RecipientDirectory>,
        config: DispatchConfig,
    ) -> Self {
        Self {
            transport,
            directory,
            config,
        }
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// Notify every organization in `links` about `alert`.
    pub async fn dispatch(
        &self,
        alert: &RegulatoryAlert,
        links: &[AffectedClient],
    ) -> Result<DispatchReport, DispatchError> {
        let resolved = self.resolve(links).await?;

        let jobs: Vec<SendJob> = links
            .iter()
            .zip(&resolved)
            .enumerate()
            .flat_map(|(link_index, (link, recipients))| {
                let recipients = recipients.as_deref().unwrap_or_default();
                recipients.iter().map(move |recipient| SendJob {
                    link_index,
                    affected_client_id: link.id,
                    organization_id: link.organization_id,
                    message: message::compose(alert, link, recipient),
                })
            })
            .collect();

        tracing::info!(
            alert_id = alert.id,
            organizations = links.len(),
            recipients = jobs.len(),
            "Dispatching alert notifications"
        );

        let send_timeout = self.config.send_timeout;
        let transport = &self.transport;
        let sends = jobs.into_iter().map(|job| async move {
            let outcome = tokio::time::timeout(send_timeout, transport.send(&job.message)).await;
            let (status, error_message) = match outcome {
                Ok(Ok(())) => (DeliveryStatus::Sent, None),
                Ok(Err(e)) => {
                    tracing::warn!(
                        alert_id = alert.id,
                        organization_id = job.organization_id,
                        to = %job.message.to_email,
                        error = %e,
                        "Alert notification failed",
                    );
                    (DeliveryStatus::Failed, Some(e.to_string()))
                }
                Err(_) => {
                    tracing::warn!(
                        alert_id = alert.id,
                        organization_id = job.organization_id,
                        to = %job.message.to_email,
                        timeout_secs = send_timeout.as_secs(),
                        "Alert notification timed out",
                    );
                    (
                        DeliveryStatus::Failed,
                        Some(format!("Send timed out after {}s", send_timeout.as_secs())),
                    )
                }
            };

            (
                job.link_index,
                DeliveryAttempt {
                    affected_client_id: job.affected_client_id,
                    organization_id: job.organization_id,
                    recipient_email: job.message.to_email,
                    recipient_name: job.message.to_name,
                    status,
                    error_message,
                    sent_at: Utc::now(),
                },
            )
        });

        let mut completed: Vec<(usize, DeliveryAttempt)> = stream::iter(sends)
            .buffer_unordered(self.config.concurrency.max(1))
            .collect()
            .await;
        completed.sort_by_key(|(link_index, _)| *link_index);

        let organizations = links
            .iter()
            .zip(&resolved)
            .enumerate()
            .map(|(link_index, (link, recipients))| {
                if let Err(error) = recipients {
                    return OrganizationReport {
                        affected_client_id: link.id,
                        organization_id: link.organization_id,
                        status: NotificationStatus::Failed,
                        sent: 0,
                        failed: 0,
                        error: Some(error.clone()),
                        completed_at: Utc::now(),
                    };
                }

                let mine = completed.iter().filter(|(i, _)| *i == link_index);
                let (mut sent, mut failed) = (0, 0);
                let mut completed_at = None;
                for (_, attempt) in mine {
                    match attempt.status {
                        DeliveryStatus::Sent => sent += 1,
                        DeliveryStatus::Failed => failed += 1,
                    }
                    completed_at = completed_at.max(Some(attempt.sent_at));
                }

                let status = organization_status(sent, failed);
                if status == NotificationStatus::NoRecipients {
                    tracing::warn!(
                        alert_id = alert.id,
                        organization_id = link.organization_id,
                        "No alert recipients configured for organization",
                    );
                }

                OrganizationReport {
                    affected_client_id: link.id,
                    organization_id: link.organization_id,
                    status,
                    sent,
                    failed,
                    error: None,
                    completed_at: completed_at.unwrap_or_else(Utc::now),
                }
            })
            .collect();

        let report = DispatchReport {
            alert_id: alert.id,
            attempts: completed.into_iter().map(|(_, attempt)| attempt).collect(),
            organizations,
        };

        let summary = report.summary();
        tracing::info!(
            alert_id = alert.id,
            sent = summary.sent,
            errors = summary.errors,
            "Alert dispatch finished"
        );
        Ok(report)
    }

    /// Resolve the recipients of every link, in link order.
    ///
    /// A failed lookup is kept per link as its error text. Only when no
    /// lookup succeeds is the first error returned.
    async fn resolve(
        &self,
        links: &[AffectedClient],
    ) -> Result<Vec<Result<Vec<Recipient>, String>>, DispatchError> {
        let mut resolved = Vec::with_capacity(links.len());
        let mut first_error = None;
        for link in links {
            match self.directory.recipients_for(link.organization_id).await {
                Ok(recipients) => resolved.push(Ok(recipients)),
                Err(e) => {
                    tracing::error!(
                        organization_id = link.organization_id,
                        error = %e,
                        "Recipient lookup failed",
                    );
                    resolved.push(Err(e.to_string()));
                    first_error.get_or_insert((link.organization_id, e));
                }
            }
        }

        if resolved.iter().all(Result::is_err) {
            if let Some((organization_id, source)) = first_error {
                return Err(DispatchError::Directory {
                    organization_id,
                    source,
                });
            }
        }
        Ok(resolved)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
