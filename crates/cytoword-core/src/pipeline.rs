//! End-to-end runs over the file boundary.
//!
//! Each run computes everything in memory first and only touches output
//! files once the computation has succeeded.

use std::path::Path;

use crate::config::WordlistConfig;
use crate::error::{CytowordError, Result};
use crate::extract::{extract_from_array_literal_text, has_array_block, render_array_literal};
use crate::fetch::ChunkedFetcher;
use crate::merge::{TokenCollection, merge};
use crate::models::{
    ADDITIONS_SAMPLE_LIMIT, ArticleReport, MergeReport, MergeRequest, WordlistReport,
};
use crate::query::{VAR_GENE_SYMBOL, ranked_symbols_query};
use crate::reconcile::reconcile;
use crate::retry::Sleeper;
use crate::solutions::select_solutions;
use crate::sparql::QueryTransport;
use crate::storage::{read_required, read_symbols, stage_atomic, write_atomic, write_backup};
use crate::whitelist::Whitelist;

/// Folds an extra symbol list into the base array file.
pub fn merge_lists(request: &MergeRequest) -> Result<MergeReport> {
    let base_text = read_required(&request.base, "base list")?;
    if !has_array_block(&base_text) {
        return Err(CytowordError::Parse(format!(
            "no bracketed array found in {}",
            request.base.display()
        )));
    }
    let (base, base_rejected) =
        TokenCollection::from_raw(extract_from_array_literal_text(&base_text));
    if base_rejected > 0 {
        log::warn!(
            "{} unrepresentable entries dropped from {}",
            base_rejected,
            request.base.display()
        );
    }

    let extra_raw = read_symbols(&request.extra, "extra list")?;
    if extra_raw.is_empty() {
        return Err(CytowordError::Parse(format!(
            "no symbols extracted from {}",
            request.extra.display()
        )));
    }

    let outcome = merge(&base, &extra_raw);
    log::info!(
        "base: {} | extra (normalized): {} | new: {}",
        base.len(),
        outcome.extra_count,
        outcome.additions.len()
    );

    let mut report = MergeReport {
        base_path: request.base.clone(),
        base_count: base.len(),
        extra_count: outcome.extra_count,
        rejected_count: outcome.rejected,
        additions_count: outcome.additions.len(),
        merged_count: outcome.merged.len(),
        additions_sample: outcome
            .additions
            .iter()
            .take(ADDITIONS_SAMPLE_LIMIT)
            .cloned()
            .collect(),
        dry_run: request.dry_run,
        backup_path: None,
    };

    if request.dry_run {
        log::info!("dry run: nothing written");
        return Ok(report);
    }

    let rendered = render_array_literal(&request.export_name, &outcome.merged.to_vec());
    let backup = write_backup(&request.base)?;
    log::info!("backup written to {}", backup.display());
    write_atomic(&request.base, rendered.as_bytes())?;
    log::info!(
        "{} updated with {} entries",
        request.base.display(),
        report.merged_count
    );

    report.backup_path = Some(backup);
    Ok(report)
}

/// Looks up an article for every token of `wordlist` and writes the token map to `out`.
pub fn build_article_map<T, S>(
    wordlist: &Path,
    out: &Path,
    fetcher: &ChunkedFetcher<T, S>,
) -> Result<ArticleReport>
where
    T: QueryTransport,
    S: Sleeper,
{
    let text = read_required(wordlist, "word list")?;
    let (tokens, rejected) = TokenCollection::from_raw(extract_from_array_literal_text(&text));
    if tokens.is_empty() {
        return Err(CytowordError::Parse(format!(
            "no words extracted from {}",
            wordlist.display()
        )));
    }

    let symbols = tokens
        .iter()
        .map(|token| token.bare().to_string())
        .collect::<Vec<_>>();
    let outcomes = fetcher.fetch_articles(&symbols)?;
    let batches = outcomes.len();

    let pairs = outcomes
        .into_iter()
        .flat_map(|outcome| outcome.pairs)
        .map(|pair| (pair.symbol, pair.value));
    let map = reconcile(tokens.iter(), pairs);

    let mut json = serde_json::to_string_pretty(&map)?;
    json.push('\n');
    write_atomic(out, json.as_bytes())?;

    let found = map.found_count();
    log::info!("{} written with {} entries ({found} found)", out.display(), map.len());
    Ok(ArticleReport {
        output_path: out.to_path_buf(),
        entries: map.len(),
        found,
        not_found: map.len() - found,
        batches,
        rejected_count: rejected,
    })
}

/// Builds the solution list and the valid-guess list from the ranked upstream symbols.
pub fn build_wordlists<T, S>(
    config: &WordlistConfig,
    fetcher: &ChunkedFetcher<T, S>,
) -> Result<WordlistReport>
where
    T: QueryTransport,
    S: Sleeper,
{
    let whitelist = Whitelist::load(config.whitelist_path.as_deref(), &config.inline_whitelist)?;
    log::info!("whitelist: {} symbols", whitelist.len());

    let rows = fetcher.select_once("ranked symbols", &ranked_symbols_query())?;
    let ranked = rows
        .iter()
        .filter_map(|row| row.value(VAR_GENE_SYMBOL))
        .collect::<Vec<_>>();
    let selection = select_solutions(&ranked, &whitelist, config.max_solutions);
    if selection.valid_guesses.is_empty() {
        return Err(CytowordError::Parse(
            "no upstream symbol matched the whitelist".to_string(),
        ));
    }

    let words = render_array_literal(&config.words_var, &selection.solutions);
    let valid = render_array_literal(&config.valid_guesses_var, &selection.valid_guesses);
    // Both files are staged before either target is replaced.
    let staged_words = stage_atomic(&config.words_out, words.as_bytes())?;
    let staged_valid = stage_atomic(&config.valid_guesses_out, valid.as_bytes())?;
    staged_words.commit()?;
    staged_valid.commit()?;

    log::info!(
        "{} solutions, {} valid guesses",
        selection.solutions.len(),
        selection.valid_guesses.len()
    );
    Ok(WordlistReport {
        words_path: config.words_out.clone(),
        valid_guesses_path: config.valid_guesses_out.clone(),
        upstream_rows: rows.len(),
        solutions: selection.solutions.len(),
        valid_guesses: selection.valid_guesses.len(),
        unrepresentable: selection.unrepresentable,
        not_whitelisted: selection.not_whitelisted,
    })
}
