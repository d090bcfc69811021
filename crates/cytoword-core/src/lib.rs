// Public fallible APIs in this crate share one concrete error contract (`CytowordError`).
// Repeating per-function `# Errors` boilerplate obscures behavior more than it clarifies.
#![allow(
    clippy::missing_errors_doc,
    reason = "crate-wide fallible API uses one explicit error type; per-item boilerplate would duplicate contract"
)]

pub mod config;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod merge;
pub mod models;
pub mod pipeline;
pub mod query;
pub mod reconcile;
pub mod retry;
pub mod solutions;
pub mod sparql;
pub mod storage;
pub mod token;
pub mod whitelist;

pub use config::{FetchConfig, WordlistConfig};
pub use error::{CytowordError, FetchFailureKind, Result};
pub use fetch::ChunkedFetcher;
pub use merge::{MergeOutcome, TokenCollection, merge};
pub use reconcile::{FetchResultMap, LinkValue};
pub use retry::{RetryPolicy, Sleeper, ThreadSleeper};
pub use sparql::{QueryTransport, SparqlClient, SparqlRow};
pub use token::{CanonicalToken, TokenRejection, denormalize, normalize};
pub use whitelist::Whitelist;
