//! Remediation vocabulary and audit text (alert action items and
//! per-client actions).

use crate::error::CoreError;

crate::text_enum! {
    /// Working status of an action item or client action.
    ActionStatus {
        Offen = "offen",
        InArbeit = "in_arbeit",
        Erledigt = "erledigt",
    }
}

crate::text_enum! {
    /// Priority of an alert-level action item.
    Priority {
        High = "high",
        Medium = "medium",
        Low = "low",
    }
}

/// Maximum length for action text.
pub const MAX_ACTION_TEXT_LENGTH: usize = 2_000;

/// Maximum length for a comment body.
pub const MAX_COMMENT_LENGTH: usize = 10_000;

/// Validate action text: non-blank and within [`MAX_ACTION_TEXT_LENGTH`].
pub fn validate_action_text(text: &str) -> Result<(), CoreError> {
    if text.trim().is_empty() {
        return Err(CoreError::Validation("Action text must not be empty".into()));
    }
    if text.chars().count() > MAX_ACTION_TEXT_LENGTH {
        return Err(CoreError::Validation(format!(
            "Action text exceeds maximum length of {MAX_ACTION_TEXT_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate a comment body: non-blank and within [`MAX_COMMENT_LENGTH`].
pub fn validate_comment_body(body: &str) -> Result<(), CoreError> {
    if body.trim().is_empty() {
        return Err(CoreError::Validation("Comment must not be empty".into()));
    }
    if body.chars().count() > MAX_COMMENT_LENGTH {
        return Err(CoreError::Validation(format!(
            "Comment exceeds maximum length of {MAX_COMMENT_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Body of the system comment appended on every client-action status update.
///
/// Written even when `from == to` so each request leaves one audit entry.
pub fn status_change_comment(from: ActionStatus, to: ActionStatus) -> String {
    if from == to {
        format!("Status confirmed: {to}")
    } else {
        format!("Status changed: {from} -> {to}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_status_wire_values() {
        assert_eq!(ActionStatus::InArbeit.as_str(), "in_arbeit");
        assert_eq!("erledigt".parse::<ActionStatus>().unwrap(), ActionStatus::Erledigt);
        assert!("done".parse::<ActionStatus>().is_err());
    }

    #[test]
    fn status_change_comment_records_both_ends() {
        let body = status_change_comment(ActionStatus::Offen, ActionStatus::InArbeit);
        assert_eq!(body, "Status changed: offen -> in_arbeit");
    }

    #[test]
    fn unchanged_status_still_produces_comment() {
        let body = status_change_comment(ActionStatus::Erledigt, ActionStatus::Erledigt);
        assert_eq!(body, "Status confirmed: erledigt");
    }

    #[test]
    fn action_text_validation() {
        assert!(validate_action_text("Update KYC policy").is_ok());
        assert!(validate_action_text("").is_err());
        assert!(validate_action_text(&"a".repeat(MAX_ACTION_TEXT_LENGTH + 1)).is_err());
    }

    #[test]
    fn comment_validation() {
        assert!(validate_comment_body("looks good").is_ok());
        assert!(validate_comment_body(" \n ").is_err());
        assert!(validate_comment_body(&"c".repeat(MAX_COMMENT_LENGTH + 1)).is_err());
    }
}
