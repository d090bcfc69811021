use std::path::PathBuf;
use std::time::Duration;

mod env;

pub use env::{EnvLookup, ProcessEnv};

use env::{read_env_u32, read_env_u64, read_env_usize, read_non_empty_env};

use crate::retry::RetryPolicy;

pub const ENV_SPARQL_ENDPOINT: &str = "CYTOWORD_SPARQL_ENDPOINT";
pub const ENV_USER_AGENT: &str = "CYTOWORD_USER_AGENT";
pub const ENV_LEGACY_USER_AGENT: &str = "WDQS_USER_AGENT";
pub const ENV_BATCH_SIZE: &str = "CYTOWORD_BATCH_SIZE";
pub const ENV_MAX_RETRIES: &str = "CYTOWORD_MAX_RETRIES";
pub const ENV_TIMEOUT_MS: &str = "CYTOWORD_TIMEOUT_MS";
pub const ENV_BASE_DELAY_MS: &str = "CYTOWORD_BASE_DELAY_MS";
pub const ENV_JITTER_MS: &str = "CYTOWORD_JITTER_MS";

pub const DEFAULT_SPARQL_ENDPOINT: &str = "https://query.wikidata.org/sparql";
pub const DEFAULT_USER_AGENT: &str =
    "CytokineWordle/1.0 (+https://github.com/edumenotti/cytokine-wordle)";
pub const DEFAULT_BATCH_SIZE: usize = 30;
pub const DEFAULT_MAX_RETRIES: u32 = 4;
pub const DEFAULT_TIMEOUT_MS: u64 = 60_000;
pub const DEFAULT_BASE_DELAY_MS: u64 = 1_200;
pub const DEFAULT_JITTER_MS: u64 = 400;

pub const DEFAULT_MAX_SOLUTIONS: usize = 1000;
pub const DEFAULT_WORDS_VAR: &str = "WORDS";
pub const DEFAULT_VALID_GUESSES_VAR: &str = "VALID_GUESSES";

/// Remote query tuning. Every field is independently overridable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchConfig {
    pub endpoint: String,
    pub user_agent: String,
    pub batch_size: usize,
    pub max_retries: u32,
    pub timeout_ms: u64,
    pub base_delay_ms: u64,
    pub jitter_ms: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_SPARQL_ENDPOINT.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
            max_retries: DEFAULT_MAX_RETRIES,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            base_delay_ms: DEFAULT_BASE_DELAY_MS,
            jitter_ms: DEFAULT_JITTER_MS,
        }
    }
}

impl FetchConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(&ProcessEnv)
    }

    #[must_use]
    pub fn from_lookup(env: &impl EnvLookup) -> Self {
        Self {
            endpoint: read_non_empty_env(env, ENV_SPARQL_ENDPOINT)
                .unwrap_or_else(|| DEFAULT_SPARQL_ENDPOINT.to_string()),
            user_agent: read_non_empty_env(env, ENV_USER_AGENT)
                .or_else(|| read_non_empty_env(env, ENV_LEGACY_USER_AGENT))
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            batch_size: read_env_usize(env, ENV_BATCH_SIZE, DEFAULT_BATCH_SIZE, 1),
            max_retries: read_env_u32(env, ENV_MAX_RETRIES, DEFAULT_MAX_RETRIES, 1),
            timeout_ms: read_env_u64(env, ENV_TIMEOUT_MS)
                .filter(|value| *value > 0)
                .unwrap_or(DEFAULT_TIMEOUT_MS),
            base_delay_ms: read_env_u64(env, ENV_BASE_DELAY_MS).unwrap_or(DEFAULT_BASE_DELAY_MS),
            jitter_ms: read_env_u64(env, ENV_JITTER_MS).unwrap_or(DEFAULT_JITTER_MS),
        }
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    #[must_use]
    pub fn courtesy_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }

    /// Policy for one run; each call draws a fresh jitter seed.
    #[must_use]
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_retries.max(1),
            base_delay: Duration::from_millis(self.base_delay_ms),
            jitter_bound: Duration::from_millis(self.jitter_ms),
            jitter_seed: RetryPolicy::random_jitter_seed(),
        }
    }
}

/// Inputs and outputs of the ranked word list build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordlistConfig {
    pub whitelist_path: Option<PathBuf>,
    pub inline_whitelist: Vec<String>,
    pub words_out: PathBuf,
    pub valid_guesses_out: PathBuf,
    pub max_solutions: usize,
    pub words_var: String,
    pub valid_guesses_var: String,
}

impl WordlistConfig {
    pub fn new(
        whitelist_path: impl Into<PathBuf>,
        words_out: impl Into<PathBuf>,
        valid_guesses_out: impl Into<PathBuf>,
    ) -> Self {
        Self {
            whitelist_path: Some(whitelist_path.into()),
            inline_whitelist: Vec::new(),
            words_out: words_out.into(),
            valid_guesses_out: valid_guesses_out.into(),
            max_solutions: DEFAULT_MAX_SOLUTIONS,
            words_var: DEFAULT_WORDS_VAR.to_string(),
            valid_guesses_var: DEFAULT_VALID_GUESSES_VAR.to_string(),
        }
    }
}
