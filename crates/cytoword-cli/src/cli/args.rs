use std::path::PathBuf;

use clap::Args;
use cytoword_core::FetchConfig;
use cytoword_core::config::{DEFAULT_MAX_SOLUTIONS, DEFAULT_VALID_GUESSES_VAR};

use super::parsers::{parse_min_one_u32, parse_min_one_usize, parse_positive_u64};

#[derive(Debug, Args)]
pub struct MergeArgs {
    /// Existing array file to extend.
    #[arg(long, default_value = "src/constants/validGuesses.ts")]
    pub base: PathBuf,
    /// Extra symbols: `.ts`/`.tsx` array file, or one symbol per line.
    #[arg(long)]
    pub extra: PathBuf,
    /// Exported constant name written to the base file.
    #[arg(long = "var", default_value = DEFAULT_VALID_GUESSES_VAR)]
    pub export_name: String,
    /// Report what would change without writing anything.
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}

/// Overrides for the query settings otherwise taken from `CYTOWORD_*` env vars.
#[derive(Debug, Clone, Default, Args)]
pub struct FetchArgs {
    #[arg(long)]
    pub endpoint: Option<String>,
    #[arg(long)]
    pub user_agent: Option<String>,
    #[arg(long, value_parser = parse_min_one_usize)]
    pub batch_size: Option<usize>,
    #[arg(long, value_parser = parse_min_one_u32)]
    pub max_retries: Option<u32>,
    #[arg(long, value_parser = parse_positive_u64)]
    pub timeout_ms: Option<u64>,
    #[arg(long)]
    pub base_delay_ms: Option<u64>,
    #[arg(long)]
    pub jitter_ms: Option<u64>,
}

impl FetchArgs {
    pub fn apply(&self, mut config: FetchConfig) -> FetchConfig {
        if let Some(endpoint) = &self.endpoint {
            config.endpoint.clone_from(endpoint);
        }
        if let Some(user_agent) = &self.user_agent {
            config.user_agent.clone_from(user_agent);
        }
        if let Some(value) = self.batch_size {
            config.batch_size = value;
        }
        if let Some(value) = self.max_retries {
            config.max_retries = value;
        }
        if let Some(value) = self.timeout_ms {
            config.timeout_ms = value;
        }
        if let Some(value) = self.base_delay_ms {
            config.base_delay_ms = value;
        }
        if let Some(value) = self.jitter_ms {
            config.jitter_ms = value;
        }
        config
    }
}

#[derive(Debug, Args)]
pub struct ArticlesArgs {
    /// Padded word list (array file).
    #[arg(long, default_value = "src/constants/wordlist.ts")]
    pub wordlist: PathBuf,
    /// JSON map output, token -> article URL or "None".
    #[arg(long, default_value = "src/constants/wikipedialist.json")]
    pub out: PathBuf,
    #[command(flatten)]
    pub fetch: FetchArgs,
}

#[derive(Debug, Args)]
pub struct WordlistArgs {
    /// One HGNC symbol per line.
    #[arg(long, default_value = "src/constants/cytokinesWhitelist.txt")]
    pub whitelist: PathBuf,
    /// Extra whitelist symbols in addition to the file.
    #[arg(long = "allow", value_name = "SYMBOL")]
    pub inline_whitelist: Vec<String>,
    #[arg(long, default_value = "src/constants/wordlist_2.ts")]
    pub words_out: PathBuf,
    #[arg(long, default_value = "src/constants/validGuesses_2.ts")]
    pub valid_out: PathBuf,
    #[arg(long, default_value_t = DEFAULT_MAX_SOLUTIONS)]
    pub max_solutions: usize,
    #[command(flatten)]
    pub fetch: FetchArgs,
}
