//! Concurrent batch verification of inference-service API keys.
//!
//! keysweep takes a pasted blob of credentials, verifies each one against
//! the provider's account-info endpoint in parallel, classifies every
//! outcome (invalid / valid without balance / valid with balance), and
//! exports the classified subsets to the clipboard.
//!
//! A batch settles as a whole: every lookup is dispatched at once, a
//! failing credential never aborts its siblings, and the finished result
//! is published only if no newer batch started in the meantime.

pub mod checker;
pub mod classify;
pub mod domain;
pub mod error;
pub mod export;
pub mod http;
pub mod parser;

// Re-export commonly used types
pub use checker::{BatchRunner, CheckerConfig};
pub use domain::batch::{AggregateCounts, BatchId, BatchResult};
pub use domain::outcome::{KeyStatus, Verdict, VerificationOutcome};
pub use error::{KeysweepError, Result};
pub use export::{ClipboardSink, ExportEngine, ExportStatus};
pub use http::{AccountClient, AccountResponse, MockAccountClient, ReqwestAccountClient};
