use std::collections::BTreeMap;

use reqwest::blocking::{Client, ClientBuilder};
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use serde::Deserialize;

use crate::config::FetchConfig;
use crate::error::{CytowordError, FetchFailureKind, Result, fetch_status_kind};

const SPARQL_RESULTS_JSON: &str = "application/sparql-results+json";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SparqlTerm {
    #[serde(rename = "type", default)]
    pub kind: String,
    pub value: String,
}

/// One solution of a SELECT query, keyed by variable name. Unbound
/// variables are simply absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct SparqlRow(BTreeMap<String, SparqlTerm>);

impl SparqlRow {
    pub fn value(&self, var: &str) -> Option<&str> {
        self.0.get(var).map(|term| term.value.as_str())
    }

    #[cfg(test)]
    pub(crate) fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        Self(
            pairs
                .iter()
                .map(|(var, value)| {
                    (
                        (*var).to_string(),
                        SparqlTerm {
                            kind: "literal".to_string(),
                            value: (*value).to_string(),
                        },
                    )
                })
                .collect(),
        )
    }
}

#[derive(Debug, Deserialize)]
struct SparqlResponse {
    results: SparqlBindings,
}

#[derive(Debug, Deserialize)]
struct SparqlBindings {
    #[serde(default)]
    bindings: Vec<SparqlRow>,
}

pub fn parse_sparql_results(body: &str) -> Result<Vec<SparqlRow>> {
    serde_json::from_str::<SparqlResponse>(body)
        .map(|response| response.results.bindings)
        .map_err(|err| {
            CytowordError::fetch(
                FetchFailureKind::Schema,
                format!("invalid sparql results: {err}"),
            )
        })
}

/// Issues one SELECT query. Implementations make a single attempt; retry
/// policy lives with the caller.
pub trait QueryTransport {
    fn select(&self, query: &str) -> Result<Vec<SparqlRow>>;
}

impl<T: QueryTransport + ?Sized> QueryTransport for &T {
    fn select(&self, query: &str) -> Result<Vec<SparqlRow>> {
        (**self).select(query)
    }
}

#[derive(Clone)]
pub struct SparqlClient {
    endpoint: String,
    http: Client,
}

impl std::fmt::Debug for SparqlClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SparqlClient")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl SparqlClient {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        Self::with_builder(config, Client::builder())
    }

    pub(crate) fn with_builder(config: &FetchConfig, builder: ClientBuilder) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(SPARQL_RESULTS_JSON));
        let agent = HeaderValue::from_str(&config.user_agent)
            .map_err(|e| CytowordError::Config(format!("invalid user agent: {e}")))?;
        headers.insert(USER_AGENT, agent);

        let http = builder
            .default_headers(headers)
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            endpoint: config.endpoint.clone(),
            http,
        })
    }
}

impl QueryTransport for SparqlClient {
    fn select(&self, query: &str) -> Result<Vec<SparqlRow>> {
        // POST keeps large VALUES blocks clear of URL length limits.
        let response = self
            .http
            .post(&self.endpoint)
            .form(&[("query", query)])
            .send()
            .map_err(|err| {
                let kind = if err.is_builder() {
                    FetchFailureKind::Fatal
                } else {
                    FetchFailureKind::Transient
                };
                CytowordError::fetch(kind, format!("request failed: {err}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CytowordError::fetch(
                fetch_status_kind(status),
                format!("non-success status: {status}"),
            ));
        }

        let body = response.text().map_err(|err| {
            CytowordError::fetch(
                FetchFailureKind::Transient,
                format!("failed to read response body: {err}"),
            )
        })?;
        parse_sparql_results(&body)
    }
}
