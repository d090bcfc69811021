use anyhow::{Context, Result};
use cytoword_core::models::MergeRequest;
use cytoword_core::pipeline::{build_article_map, build_wordlists, merge_lists};
use cytoword_core::{ChunkedFetcher, FetchConfig, SparqlClient, ThreadSleeper, WordlistConfig};

use crate::cli::{ArticlesArgs, Commands, FetchArgs, MergeArgs, WordlistArgs};

mod support;


pub(crate) use self::support::init_logging;
use self::support::print_json;

pub(crate) fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Merge(args) => run_merge(args),
        Commands::Articles(args) => run_articles(&args),
        Commands::Wordlist(args) => run_wordlist(args),
    }
}

fn run_merge(args: MergeArgs) -> Result<()> {
    let request = MergeRequest {
        base: args.base,
        extra: args.extra,
        export_name: args.export_name,
        dry_run: args.dry_run,
    };
    let report = merge_lists(&request)
        .with_context(|| format!("failed to merge into {}", request.base.display()))?;
    print_json(&report)
}

fn run_articles(args: &ArticlesArgs) -> Result<()> {
    let config = resolve_fetch_config(&args.fetch);
    let client = SparqlClient::new(&config).context("failed to build sparql client")?;
    let fetcher = ChunkedFetcher::new(client, ThreadSleeper, &config);
    let report = build_article_map(&args.wordlist, &args.out, &fetcher).with_context(|| {
        format!("failed to build article map from {}", args.wordlist.display())
    })?;
    print_json(&report)
}

fn run_wordlist(args: WordlistArgs) -> Result<()> {
    let fetch_config = resolve_fetch_config(&args.fetch);
    let mut config = WordlistConfig::new(args.whitelist, args.words_out, args.valid_out);
    config.inline_whitelist = args.inline_whitelist;
    config.max_solutions = args.max_solutions;

    let client = SparqlClient::new(&fetch_config).context("failed to build sparql client")?;
    let fetcher = ChunkedFetcher::new(client, ThreadSleeper, &fetch_config);
    let report = build_wordlists(&config, &fetcher).context("failed to build word lists")?;
    print_json(&report)
}

/// Env-derived settings with explicit flags layered on top.
pub(crate) fn resolve_fetch_config(args: &FetchArgs) -> FetchConfig {
    let config = args.apply(FetchConfig::from_env());
    log::debug!(
        "endpoint={} batch_size={} max_retries={} timeout_ms={} base_delay_ms={}",
        config.endpoint,
        config.batch_size,
        config.max_retries,
        config.timeout_ms,
        config.base_delay_ms
    );
    config
}
