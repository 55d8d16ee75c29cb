//! Regulatory alert vocabulary, state machine and publish validation.
//!
//! An alert is authored as a `draft`, published to `new`, and then worked
//! through `acknowledged` / `in_progress` / `resolved`. Drafts can be
//! dismissed and restored. All transitions go through [`next_status`].

use crate::error::CoreError;
use crate::types::Date;

// ---------------------------------------------------------------------------
// Vocabularies
// ---------------------------------------------------------------------------

crate::text_enum! {
    /// Lifecycle status of a regulatory alert.
    AlertStatus {
        Draft = "draft",
        New = "new",
        Acknowledged = "acknowledged",
        InProgress = "in_progress",
        Resolved = "resolved",
        Dismissed = "dismissed",
    }
}

crate::text_enum! {
    /// Severity of a regulatory change.
    Severity {
        Critical = "critical",
        High = "high",
        Medium = "medium",
        Info = "info",
    }
}

impl AlertStatus {
    /// Published statuses: visible and actionable for clients.
    pub fn is_published(self) -> bool {
        matches!(
            self,
            AlertStatus::New
                | AlertStatus::Acknowledged
                | AlertStatus::InProgress
                | AlertStatus::Resolved
        )
    }
}

impl Default for Severity {
    fn default() -> Self {
        Severity::Medium
    }
}

impl Severity {
    /// Upper-case label used in message subjects.
    pub fn label(self) -> &'static str {
        match self {
            Severity::Critical => "CRITICAL",
            Severity::High => "HIGH",
            Severity::Medium => "MEDIUM",
            Severity::Info => "INFO",
        }
    }
}

// ---------------------------------------------------------------------------
// State machine
// ---------------------------------------------------------------------------

/// A requested lifecycle operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertAction {
    /// `draft -> new`.
    Publish,
    /// `draft -> dismissed`.
    Dismiss,
    /// `dismissed -> draft`.
    Restore,
    /// Generic status update on a published alert.
    SetStatus(AlertStatus),
}

impl AlertAction {
    /// The status this action moves the alert to.
    pub fn target(self) -> AlertStatus {
        match self {
            AlertAction::Publish => AlertStatus::New,
            AlertAction::Dismiss => AlertStatus::Dismissed,
            AlertAction::Restore => AlertStatus::Draft,
            AlertAction::SetStatus(status) => status,
        }
    }
}

/// Returns the set of statuses that `from` may transition to.
///
/// Transition rules:
/// - `draft`     -> `new` (publish), `dismissed` (dismiss)
/// - `dismissed` -> `draft` (restore)
/// - `new` / `acknowledged` / `in_progress` / `resolved`
///   -> `acknowledged`, `in_progress`, `resolved`, `draft`
pub fn valid_transitions(from: AlertStatus) -> &'static [AlertStatus] {
    use AlertStatus::*;
    match from {
        Draft => &[New, Dismissed],
        Dismissed => &[Draft],
        New | Acknowledged | InProgress | Resolved => &[Acknowledged, InProgress, Resolved, Draft],
    }
}

/// Check whether a transition from `from` to `to` appears in the table.
pub fn can_transition(from: AlertStatus, to: AlertStatus) -> bool {
    valid_transitions(from).contains(&to)
}

/// Resolve the status produced by applying `action` to an alert in `current`.
///
/// `new` is reachable only through [`AlertAction::Publish`] and `dismissed`
/// only through [`AlertAction::Dismiss`]; the generic
/// [`AlertAction::SetStatus`] is limited to published alerts.
pub fn next_status(current: AlertStatus, action: AlertAction) -> Result<AlertStatus, CoreError> {
    use AlertStatus::*;
    let allowed = match (current, action) {
        (Draft, AlertAction::Publish) | (Draft, AlertAction::Dismiss) => true,
        (Dismissed, AlertAction::Restore) => true,
        (from, AlertAction::SetStatus(to)) if from.is_published() => {
            matches!(to, Acknowledged | InProgress | Resolved | Draft)
        }
        _ => false,
    };

    let target = action.target();
    if allowed && can_transition(current, target) {
        Ok(target)
    } else {
        Err(CoreError::InvalidTransition {
            from: current.to_string(),
            to: target.to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// Field validation
// ---------------------------------------------------------------------------

/// Maximum length of an alert title.
pub const MAX_TITLE_LENGTH: usize = 500;

/// Validate an alert title: non-blank and within [`MAX_TITLE_LENGTH`].
pub fn validate_title(title: &str) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        return Err(CoreError::Validation("Alert title must not be empty".into()));
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(CoreError::Validation(format!(
            "Alert title exceeds maximum length of {MAX_TITLE_LENGTH} characters"
        )));
    }
    Ok(())
}

/// The authoritative fields that must be present before publication.
///
/// Severity is not listed: it is never null and defaults to `medium`.
#[derive(Debug, Clone, Copy)]
pub struct PublishRequirements<'a> {
    pub title: &'a str,
    pub category: Option<&'a str>,
    pub legal_basis: Option<&'a str>,
    pub summary: Option<&'a str>,
    pub deadline: Option<Date>,
}

/// Validate that every required field is present and non-blank.
///
/// The error lists all missing fields at once.
pub fn validate_publishable(req: &PublishRequirements<'_>) -> Result<(), CoreError> {
    let blank = |value: Option<&str>| value.map_or(true, |v| v.trim().is_empty());

    let mut missing = Vec::new();
    if req.title.trim().is_empty() {
        missing.push("title");
    }
    if blank(req.category) {
        missing.push("category");
    }
    if blank(req.legal_basis) {
        missing.push("legal_basis");
    }
    if req.deadline.is_none() {
        missing.push("deadline");
    }
    if blank(req.summary) {
        missing.push("summary");
    }

    if missing.is_empty() {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Cannot publish alert, missing required fields: {}",
            missing.join(", ")
        )))
    }
}

// ---------------------------------------------------------------------------
// Suggestion promotion
// ---------------------------------------------------------------------------

/// Copy a suggested value into an empty authoritative field.
///
/// Returns `true` if the field was filled. Non-empty authoritative values are
/// never overwritten.
pub fn promote_text(current: &mut Option<String>, suggested: Option<&str>) -> bool {
    let current_blank = current.as_deref().map_or(true, |v| v.trim().is_empty());
    match suggested {
        Some(s) if current_blank && !s.trim().is_empty() => {
            *current = Some(s.to_string());
            true
        }
        _ => false,
    }
}

/// Adopt a suggested severity while the alert still carries the default.
pub fn promote_severity(current: Severity, suggested: Option<Severity>) -> Severity {
    match suggested {
        Some(s) if current == Severity::default() => s,
        _ => current,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
