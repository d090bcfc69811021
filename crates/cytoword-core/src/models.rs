use std::path::PathBuf;

use serde::Serialize;

use crate::token::CanonicalToken;

pub const ADDITIONS_SAMPLE_LIMIT: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeRequest {
    pub base: PathBuf,
    pub extra: PathBuf,
    pub export_name: String,
    pub dry_run: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergeReport {
    pub base_path: PathBuf,
    pub base_count: usize,
    pub extra_count: usize,
    pub rejected_count: usize,
    pub additions_count: usize,
    pub merged_count: usize,
    pub additions_sample: Vec<CanonicalToken>,
    pub dry_run: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup_path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArticleReport {
    pub output_path: PathBuf,
    pub entries: usize,
    pub found: usize,
    pub not_found: usize,
    pub batches: usize,
    pub rejected_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordlistReport {
    pub words_path: PathBuf,
    pub valid_guesses_path: PathBuf,
    pub upstream_rows: usize,
    pub solutions: usize,
    pub valid_guesses: usize,
    pub unrepresentable: usize,
    pub not_whitelisted: usize,
}
