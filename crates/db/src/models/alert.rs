//! Regulatory alert entity models and DTOs.
//!
//! A `regulatory_alerts` row carries two field groups: the authoritative
//! [`AlertContent`] and the ingestion-supplied [`AlertSuggestion`]. The
//! suggestion group is only exposed while the alert is a draft; see
//! [`RegulatoryAlert::suggestion`].

use regwatch_core::alert::{self, AlertStatus, PublishRequirements, Severity};
use regwatch_core::types::{Date, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::action_item::ActionItem;
use crate::models::affected_client::AffectedClientEntry;

/// Authoritative, analyst-owned fields of an alert.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct AlertContent {
    pub title: String,
    pub source: Option<String>,
    pub jurisdiction: Option<String>,
    pub alert_date: Option<Date>,
    pub category: Option<String>,
    #[sqlx(try_from = "String")]
    pub severity: Severity,
    pub summary: Option<String>,
    pub legal_basis: Option<String>,
    pub deadline: Option<Date>,
    /// The analyst's plain-language interpretation.
    pub comment: Option<String>,
}

/// Staging mirrors written by feed ingestion.
#[derive(Debug, Clone, Default, PartialEq, FromRow, Serialize)]
pub struct AlertSuggestion {
    pub suggested_summary: Option<String>,
    pub suggested_legal_basis: Option<String>,
    pub suggested_severity: Option<String>,
    pub suggested_category: Option<String>,
    pub suggested_comment: Option<String>,
    pub feed_entry_ref: Option<String>,
    pub source_url: Option<String>,
}

/// A row from the `regulatory_alerts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RegulatoryAlert {
    pub id: DbId,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub content: AlertContent,
    #[sqlx(try_from = "String")]
    pub status: AlertStatus,
    #[sqlx(flatten)]
    #[serde(skip)]
    pub staged: AlertSuggestion,
    pub created_by: Option<DbId>,
    pub published_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl RegulatoryAlert {
    /// The staging field group, or `None` once the alert has left `draft`.
    pub fn suggestion(&self) -> Option<&AlertSuggestion> {
        (self.status == AlertStatus::Draft).then_some(&self.staged)
    }
}

impl AlertSuggestion {
    /// Parsed suggested severity; unknown text is ignored.
    pub fn severity(&self) -> Option<Severity> {
        self.suggested_severity.as_deref().and_then(|s| s.parse().ok())
    }
}

impl AlertContent {
    /// Apply a patch: every `Some` field replaces the current value.
    pub fn apply(&mut self, patch: &AlertFields) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(severity) = patch.severity {
            self.severity = severity;
        }
        let text_fields = [
            (&mut self.source, &patch.source),
            (&mut self.jurisdiction, &patch.jurisdiction),
            (&mut self.category, &patch.category),
            (&mut self.summary, &patch.summary),
            (&mut self.legal_basis, &patch.legal_basis),
            (&mut self.comment, &patch.comment),
        ];
        for (current, new) in text_fields {
            if new.is_some() {
                *current = new.clone();
            }
        }
        if patch.alert_date.is_some() {
            self.alert_date = patch.alert_date;
        }
        if patch.deadline.is_some() {
            self.deadline = patch.deadline;
        }
    }

    /// Fill empty authoritative fields from the staging group.
    ///
    /// Returns `true` if anything changed.
    pub fn adopt(&mut self, suggestion: &AlertSuggestion) -> bool {
        let mut changed = false;
        changed |= alert::promote_text(&mut self.summary, suggestion.suggested_summary.as_deref());
        changed |= alert::promote_text(
            &mut self.legal_basis,
            suggestion.suggested_legal_basis.as_deref(),
        );
        changed |= alert::promote_text(&mut self.category, suggestion.suggested_category.as_deref());
        changed |= alert::promote_text(&mut self.comment, suggestion.suggested_comment.as_deref());

        let severity = alert::promote_severity(self.severity, suggestion.severity());
        changed |= severity != self.severity;
        self.severity = severity;
        changed
    }

    /// Borrow the fields checked before publication.
    pub fn publish_requirements(&self) -> PublishRequirements<'_> {
        PublishRequirements {
            title: &self.title,
            category: self.category.as_deref(),
            legal_basis: self.legal_basis.as_deref(),
            summary: self.summary.as_deref(),
            deadline: self.deadline,
        }
    }
}

/// A row from the `alert_status_changes` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AlertStatusChange {
    pub id: DbId,
    pub alert_id: DbId,
    pub from_status: String,
    pub to_status: String,
    pub actor_id: Option<DbId>,
    pub created_at: Timestamp,
}

/// Alert with its affected clients and action items.
#[derive(Debug, Clone, Serialize)]
pub struct AlertDetail {
    #[serde(flatten)]
    pub alert: RegulatoryAlert,
    /// Staging values, present only while the alert is a draft.
    pub suggestion: Option<AlertSuggestion>,
    pub affected_clients: Vec<AffectedClientEntry>,
    pub action_items: Vec<ActionItem>,
}

/// Staging values supplied by feed ingestion when it creates a draft.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewAlertSuggestion {
    pub summary: Option<String>,
    pub legal_basis: Option<String>,
    pub severity: Option<Severity>,
    pub category: Option<String>,
    pub comment: Option<String>,
    pub feed_entry_ref: Option<String>,
    pub source_url: Option<String>,
}

/// DTO for creating an alert. Status is always `draft`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAlert {
    pub title: String,
    pub source: Option<String>,
    /// Defaults to the operator's home jurisdiction.
    pub jurisdiction: Option<String>,
    pub alert_date: Option<Date>,
    pub category: Option<String>,
    /// Defaults to `medium`.
    pub severity: Option<Severity>,
    pub summary: Option<String>,
    pub legal_basis: Option<String>,
    pub deadline: Option<Date>,
    pub comment: Option<String>,
    #[serde(default)]
    pub suggestion: Option<NewAlertSuggestion>,
}

/// Patch of the authoritative fields (all `Option`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AlertFields {
    pub title: Option<String>,
    pub source: Option<String>,
    pub jurisdiction: Option<String>,
    pub alert_date: Option<Date>,
    pub category: Option<String>,
    pub severity: Option<Severity>,
    pub summary: Option<String>,
    pub legal_basis: Option<String>,
    pub deadline: Option<Date>,
    pub comment: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content() -> AlertContent {
        AlertContent {
            title: "GwG-Revision".into(),
            source: None,
            jurisdiction: Some("DE".into()),
            alert_date: None,
            category: None,
            severity: Severity::Medium,
            summary: None,
            legal_basis: Some("GwG §10".into()),
            deadline: None,
            comment: None,
        }
    }

    #[test]
    fn apply_replaces_only_present_fields() {
        let mut c = content();
        c.apply(&AlertFields {
            summary: Some("New duties".into()),
            severity: Some(Severity::Critical),
            ..Default::default()
        });
        assert_eq!(c.summary.as_deref(), Some("New duties"));
        assert_eq!(c.severity, Severity::Critical);
        assert_eq!(c.legal_basis.as_deref(), Some("GwG §10"));
        assert_eq!(c.title, "GwG-Revision");
    }

    #[test]
    fn adopt_fills_gaps_but_keeps_analyst_values() {
        let mut c = content();
        let suggestion = AlertSuggestion {
            suggested_summary: Some("AI summary".into()),
            suggested_legal_basis: Some("AI basis".into()),
            suggested_severity: Some("high".into()),
            ..Default::default()
        };
        assert!(c.adopt(&suggestion));
        assert_eq!(c.summary.as_deref(), Some("AI summary"));
        assert_eq!(c.legal_basis.as_deref(), Some("GwG §10"));
        assert_eq!(c.severity, Severity::High);
        assert!(!c.adopt(&suggestion));
    }

    #[test]
    fn publish_requirements_borrow_content() {
        let c = content();
        let req = c.publish_requirements();
        assert_eq!(req.title, "GwG-Revision");
        assert!(alert::validate_publishable(&req).is_err());
    }
}
