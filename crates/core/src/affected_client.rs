//! Affected-client fan-out rules.
//!
//! The affected-client set of an alert is always written as a complete
//! snapshot; these helpers validate a snapshot before it replaces the
//! stored one.

use std::collections::HashSet;

use crate::error::CoreError;
use crate::types::DbId;

crate::text_enum! {
    /// Impact of an alert on one client organization.
    ClientRisk {
        High = "high",
        Medium = "medium",
        Low = "low",
    }
}

/// Maximum length of the free-text reason attached to an affected client.
pub const MAX_REASON_LENGTH: usize = 5_000;

/// Validate a fan-out snapshot given as `(organization_id, reason)` pairs.
///
/// Each organization may appear at most once and every reason must fit
/// within [`MAX_REASON_LENGTH`]. An empty snapshot is valid and clears the
/// set.
pub fn validate_fan_out<'a, I>(entries: I) -> Result<(), CoreError>
where
    I: IntoIterator<Item = (DbId, Option<&'a str>)>,
{
    let mut seen = HashSet::new();
    for (organization_id, reason) in entries {
        if !seen.insert(organization_id) {
            return Err(CoreError::Validation(format!(
                "Organization {organization_id} appears more than once in the affected-client set"
            )));
        }
        if reason.is_some_and(|r| r.chars().count() > MAX_REASON_LENGTH) {
            return Err(CoreError::Validation(format!(
                "Reason for organization {organization_id} exceeds maximum length of \
                 {MAX_REASON_LENGTH} characters"
            )));
        }
    }
    Ok(())
}
