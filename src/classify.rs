//! Pure projections over a finished batch.
//!
//! Everything here is side-effect-free and derived on demand, so rendering
//! layers can recompute any view freely without re-running verification.

use serde::Serialize;

use crate::domain::batch::{AggregateCounts, BatchResult};
use crate::domain::outcome::{KeyStatus, VerificationOutcome};

/// Style category a rendering layer maps to its own visual treatment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StyleTag {
    Danger,
    Warning,
    Success,
}

/// Display label and style category for one outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusLabel {
    pub text: &'static str,
    pub style: StyleTag,
}

/// Credentials whose account holds a strictly positive balance, in batch order.
pub fn valid_keys_with_balance(result: &BatchResult) -> Vec<&str> {
    result
        .outcomes
        .iter()
        .filter(|outcome| outcome.status() == KeyStatus::ValidWithBalance)
        .map(|outcome| outcome.credential.as_str())
        .collect()
}

/// All credentials that verified, funded or not, in batch order.
pub fn all_valid_keys(result: &BatchResult) -> Vec<&str> {
    result
        .outcomes
        .iter()
        .filter(|outcome| outcome.is_valid())
        .map(|outcome| outcome.credential.as_str())
        .collect()
}

/// Per-status outcome counts. Components always sum to the batch length.
pub fn counts(result: &BatchResult) -> AggregateCounts {
    let mut counts = AggregateCounts::default();
    for outcome in &result.outcomes {
        match outcome.status() {
            KeyStatus::Invalid => counts.invalid += 1,
            KeyStatus::ValidNoBalance => counts.valid_no_balance += 1,
            KeyStatus::ValidWithBalance => counts.valid_with_balance += 1,
        }
    }
    counts
}

/// Fixed display mapping for an outcome's status.
pub fn status_label(outcome: &VerificationOutcome) -> StatusLabel {
    match outcome.status() {
        KeyStatus::Invalid => StatusLabel {
            text: "invalid",
            style: StyleTag::Danger,
        },
        KeyStatus::ValidNoBalance => StatusLabel {
            text: "valid (no balance)",
            style: StyleTag::Warning,
        },
        KeyStatus::ValidWithBalance => StatusLabel {
            text: "valid",
            style: StyleTag::Success,
        },
    }
}

/// Mask a credential for display: `"abcdefghijkl"` becomes `"abcd****ijkl"`.
///
/// Credentials of eight characters or fewer are returned unchanged.
/// Display-only; never used for comparison or lookup.
pub fn mask_credential(credential: &str) -> String {
    let chars: Vec<char> = credential.chars().collect();
    if chars.len() <= 8 {
        return credential.to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}****{}", head, tail)
}

/// Serialize an exported key subset into the clipboard payload.
///
/// Keys are comma-joined, matching the delimiter operators paste back in.
pub fn export_payload(keys: &[&str]) -> String {
    keys.join(",")
}
