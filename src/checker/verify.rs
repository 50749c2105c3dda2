//! Outcome mapping for a single verification call.
//!
//! Every failure shape a lookup can produce collapses into an `Invalid`
//! verdict here; nothing escapes to the batch runner as an error.

use serde_json::Value;

use crate::domain::outcome::{Verdict, VerificationOutcome};
use crate::error::KeysweepError;
use crate::http::AccountResponse;

/// Fallback reason when a transport error carries no message of its own.
pub(crate) const GENERIC_FAILURE: &str = "verification failed";

/// Reason used when a success body does not carry the expected account data.
pub(crate) const MALFORMED_RESPONSE: &str = "malformed account response";

/// Convert one settled account lookup into a classified outcome.
pub(crate) fn classify_response(
    credential: String,
    fetched: Result<AccountResponse, KeysweepError>,
) -> VerificationOutcome {
    let verdict = match fetched {
        Err(err) => Verdict::invalid(transport_reason(&err)),
        Ok(response) if !(200..300).contains(&response.status) => {
            Verdict::invalid(format!("request failed with status {}", response.status))
        }
        Ok(response) => match account_balance(&response.body) {
            Some((balance, account)) => Verdict::from_balance(balance, account),
            None => Verdict::invalid(MALFORMED_RESPONSE),
        },
    };

    VerificationOutcome {
        credential,
        verdict,
    }
}

/// Extract the account object and its numeric balance from a success body.
///
/// The expected shape is a JSON object whose `data` field is the account
/// object carrying a numeric `balance`. Anything else is malformed.
fn account_balance(body: &str) -> Option<(f64, Value)> {
    let parsed: Value = serde_json::from_str(body).ok()?;
    let account = parsed.get("data")?;
    if !account.is_object() {
        return None;
    }
    let balance = account.get("balance")?.as_f64()?;
    Some((balance, account.clone()))
}

fn transport_reason(err: &KeysweepError) -> String {
    let message = err.to_string();
    if message.is_empty() {
        GENERIC_FAILURE.to_string()
    } else {
        message
    }
}
