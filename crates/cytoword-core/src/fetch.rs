//! Batch-sequential retrieval against the query endpoint.
//!
//! Batches are issued strictly one at a time. Each batch gets the full retry
//! budget; a batch that exhausts it aborts the whole run. Successful batches
//! are separated by a fixed courtesy delay.

use std::time::Duration;

use crate::config::FetchConfig;
use crate::error::Result;
use crate::query::{VAR_ARTICLE, VAR_GENE_SYMBOL, article_query};
use crate::retry::{RetryPolicy, Sleeper};
use crate::sparql::{QueryTransport, SparqlRow};

/// An identifier and its candidate value; `None` means the row had no value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPair {
    pub symbol: String,
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOutcome {
    pub symbols: Vec<String>,
    pub pairs: Vec<FetchedPair>,
}

#[must_use]
pub const fn batch_count(total: usize, batch_size: usize) -> usize {
    if batch_size == 0 {
        return 0;
    }
    total.div_ceil(batch_size)
}

#[derive(Debug)]
pub struct ChunkedFetcher<T, S> {
    transport: T,
    sleeper: S,
    policy: RetryPolicy,
    batch_size: usize,
    courtesy_delay: Duration,
}

impl<T, S> ChunkedFetcher<T, S>
where
    T: QueryTransport,
    S: Sleeper,
{
    pub fn new(transport: T, sleeper: S, config: &FetchConfig) -> Self {
        Self {
            transport,
            sleeper,
            policy: config.retry_policy(),
            batch_size: config.batch_size.max(1),
            courtesy_delay: config.courtesy_delay(),
        }
    }

    /// One query with the retry policy applied, for result sets that are not batched.
    pub fn select_once(&self, label: &str, query: &str) -> Result<Vec<SparqlRow>> {
        self.policy
            .run(&self.sleeper, label, |_| self.transport.select(query))
    }

    /// Runs `query_for` over contiguous batches of `symbols`, preserving order,
    /// and maps each returned row through `pair_from_row`.
    pub fn fetch_batches<Q, P>(
        &self,
        symbols: &[String],
        query_for: Q,
        pair_from_row: P,
    ) -> Result<Vec<BatchOutcome>>
    where
        Q: Fn(&[String]) -> String,
        P: Fn(&SparqlRow) -> Option<FetchedPair>,
    {
        let total = batch_count(symbols.len(), self.batch_size);
        let mut outcomes = Vec::with_capacity(total);

        for (index, chunk) in symbols.chunks(self.batch_size).enumerate() {
            let label = format!("batch {}/{total}", index + 1);
            let query = query_for(chunk);
            log::debug!("{label}: {} symbols, {} query bytes", chunk.len(), query.len());

            let rows = self.select_once(&label, &query)?;
            let pairs = rows.iter().filter_map(&pair_from_row).collect::<Vec<_>>();
            log::info!("{label}: {} rows for {} symbols", pairs.len(), chunk.len());

            outcomes.push(BatchOutcome {
                symbols: chunk.to_vec(),
                pairs,
            });

            if index + 1 < total {
                self.sleeper.sleep(self.courtesy_delay);
            }
        }
        Ok(outcomes)
    }

    /// English Wikipedia article candidates for bare gene symbols.
    pub fn fetch_articles(&self, symbols: &[String]) -> Result<Vec<BatchOutcome>> {
        self.fetch_batches(symbols, article_query::<String>, article_pair)
    }
}

fn article_pair(row: &SparqlRow) -> Option<FetchedPair> {
    let symbol = row.value(VAR_GENE_SYMBOL)?;
    Some(FetchedPair {
        symbol: symbol.to_string(),
        value: row.value(VAR_ARTICLE).map(ToString::to_string),
    })
}
