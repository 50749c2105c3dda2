//! Outcome types for a single credential verification.

use serde::Serialize;
use serde_json::Value;

/// Status taxonomy for a verified credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyStatus {
    /// Verification failed: bad status, malformed body, or transport error
    Invalid,
    /// The key is live but the account holds no usable balance
    ValidNoBalance,
    /// The key is live and the account balance is strictly positive
    ValidWithBalance,
}

/// Verdict for one credential.
///
/// The enum shape guarantees that a failure reason and an account payload
/// never coexist: `Invalid` carries only the reason, the valid variants
/// carry only the balance and the raw account object.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Verdict {
    /// Verification failed; `reason` is the human-readable message.
    Invalid { reason: String },
    /// The key verified but the balance is zero or negative.
    ValidNoBalance {
        balance: f64,
        /// Opaque account payload from the remote service, kept for display
        /// only and never interpreted further.
        account: Value,
    },
    /// The key verified with a strictly positive balance.
    ValidWithBalance { balance: f64, account: Value },
}

impl Verdict {
    /// Classify a live account by its balance.
    ///
    /// The boundary is strictly greater than zero: zero and negative
    /// balances both classify as no-balance.
    pub fn from_balance(balance: f64, account: Value) -> Self {
        if balance > 0.0 {
            Verdict::ValidWithBalance { balance, account }
        } else {
            Verdict::ValidNoBalance { balance, account }
        }
    }

    /// Failure verdict with the given reason.
    pub fn invalid(reason: impl Into<String>) -> Self {
        Verdict::Invalid {
            reason: reason.into(),
        }
    }

    /// The status this verdict classifies as.
    pub fn status(&self) -> KeyStatus {
        match self {
            Verdict::Invalid { .. } => KeyStatus::Invalid,
            Verdict::ValidNoBalance { .. } => KeyStatus::ValidNoBalance,
            Verdict::ValidWithBalance { .. } => KeyStatus::ValidWithBalance,
        }
    }
}

/// The classified result of verifying one credential.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerificationOutcome {
    /// The original credential string, untouched
    pub credential: String,
    #[serde(flatten)]
    pub verdict: Verdict,
}

impl VerificationOutcome {
    /// Status of this outcome.
    pub fn status(&self) -> KeyStatus {
        self.verdict.status()
    }

    /// True for either valid status, funded or not.
    pub fn is_valid(&self) -> bool {
        !matches!(self.verdict, Verdict::Invalid { .. })
    }

    /// Account balance, absent for invalid outcomes.
    pub fn balance(&self) -> Option<f64> {
        match &self.verdict {
            Verdict::Invalid { .. } => None,
            Verdict::ValidNoBalance { balance, .. }
            | Verdict::ValidWithBalance { balance, .. } => Some(*balance),
        }
    }

    /// Failure message, present only for invalid outcomes.
    pub fn failure_reason(&self) -> Option<&str> {
        match &self.verdict {
            Verdict::Invalid { reason } => Some(reason),
            _ => None,
        }
    }

    /// Raw account payload, absent for invalid outcomes.
    pub fn account(&self) -> Option<&Value> {
        match &self.verdict {
            Verdict::Invalid { .. } => None,
            Verdict::ValidNoBalance { account, .. }
            | Verdict::ValidWithBalance { account, .. } => Some(account),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn balance_boundary_is_strictly_positive() {
        assert_eq!(
            Verdict::from_balance(0.0, json!({})).status(),
            KeyStatus::ValidNoBalance
        );
        assert_eq!(
            Verdict::from_balance(0.01, json!({})).status(),
            KeyStatus::ValidWithBalance
        );
        assert_eq!(
            Verdict::from_balance(-3.5, json!({})).status(),
            KeyStatus::ValidNoBalance
        );
    }

    #[test]
    fn accessors_are_mutually_exclusive() {
        let invalid = VerificationOutcome {
            credential: "k1".to_string(),
            verdict: Verdict::invalid("request failed with status 401"),
        };
        assert_eq!(invalid.status(), KeyStatus::Invalid);
        assert!(invalid.failure_reason().is_some());
        assert!(invalid.balance().is_none());
        assert!(invalid.account().is_none());

        let valid = VerificationOutcome {
            credential: "k2".to_string(),
            verdict: Verdict::from_balance(14.0, json!({"balance": 14.0})),
        };
        assert_eq!(valid.status(), KeyStatus::ValidWithBalance);
        assert!(valid.failure_reason().is_none());
        assert_eq!(valid.balance(), Some(14.0));
        assert!(valid.account().is_some());
    }

    #[test]
    fn outcome_serializes_with_status_tag() {
        let outcome = VerificationOutcome {
            credential: "k1".to_string(),
            verdict: Verdict::invalid("timed out"),
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["credential"], "k1");
        assert_eq!(json["status"], "invalid");
        assert_eq!(json["reason"], "timed out");
    }
}
