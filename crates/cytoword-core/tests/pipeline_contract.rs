use std::cell::RefCell;
use std::fs;
use std::time::Duration;

use cytoword_core::config::{FetchConfig, WordlistConfig};
use cytoword_core::models::MergeRequest;
use cytoword_core::pipeline::{build_article_map, build_wordlists, merge_lists};
use cytoword_core::sparql::parse_sparql_results;
use cytoword_core::{
    ChunkedFetcher, CytowordError, FetchFailureKind, QueryTransport, Result, Sleeper, SparqlRow,
};
use tempfile::tempdir;

#[derive(Default)]
struct NoSleep {
    slept: RefCell<Vec<Duration>>,
}

impl Sleeper for NoSleep {
    fn sleep(&self, duration: Duration) {
        self.slept.borrow_mut().push(duration);
    }
}

/// Serves canned SPARQL JSON bodies in order, repeating the last one.
struct CannedTransport {
    bodies: Vec<String>,
    calls: RefCell<usize>,
}

impl CannedTransport {
    fn new(bodies: &[&str]) -> Self {
        Self {
            bodies: bodies.iter().map(ToString::to_string).collect(),
            calls: RefCell::new(0),
        }
    }
}

impl QueryTransport for CannedTransport {
    fn select(&self, _query: &str) -> Result<Vec<SparqlRow>> {
        let mut calls = self.calls.borrow_mut();
        let body = &self.bodies[(*calls).min(self.bodies.len() - 1)];
        *calls += 1;
        parse_sparql_results(body)
    }
}

struct DownTransport;

impl QueryTransport for DownTransport {
    fn select(&self, _query: &str) -> Result<Vec<SparqlRow>> {
        Err(CytowordError::fetch(
            FetchFailureKind::Transient,
            "connection refused",
        ))
    }
}

fn fast_config(batch_size: usize) -> FetchConfig {
    FetchConfig {
        batch_size,
        max_retries: 3,
        base_delay_ms: 10,
        jitter_ms: 5,
        ..FetchConfig::default()
    }
}

#[test]
fn merge_rewrites_base_sorted_and_keeps_backup() {
    // Given base ["IL6--", "TNF--"] and extra ["IL10", "IL-6", "TOOLONG1"]
    // When merging for real
    // Then the base holds the sorted union and the old content sits in .bak.
    let dir = tempdir().expect("tempdir");
    let base = dir.path().join("validGuesses.ts");
    let extra = dir.path().join("extra.txt");
    let original = "export const VALID_GUESSES = [\n  'IL6--',\n  'TNF--',\n]\n";
    fs::write(&base, original).expect("base");
    fs::write(&extra, "IL10\nIL-6\nTOOLONG1\n").expect("extra");

    let report = merge_lists(&MergeRequest {
        base: base.clone(),
        extra,
        export_name: "VALID_GUESSES".to_string(),
        dry_run: false,
    })
    .expect("merge");

    assert_eq!(report.base_count, 2);
    assert_eq!(report.extra_count, 2);
    assert_eq!(report.rejected_count, 1);
    assert_eq!(report.additions_count, 1);
    assert_eq!(report.merged_count, 3);
    assert_eq!(
        report
            .additions_sample
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>(),
        vec!["IL10-"]
    );
    assert_eq!(
        fs::read_to_string(&base).expect("read base"),
        "export const VALID_GUESSES = [\n  'IL10-',\n  'IL6--',\n  'TNF--',\n]\n"
    );
    let backup = report.backup_path.expect("backup path");
    assert_eq!(fs::read_to_string(backup).expect("read backup"), original);
}

#[test]
fn merge_twice_is_stable() {
    let dir = tempdir().expect("tempdir");
    let base = dir.path().join("validGuesses.ts");
    let extra = dir.path().join("wordlist.ts");
    fs::write(&base, "export const VALID_GUESSES = ['TNF--']\n").expect("base");
    fs::write(&extra, "export const WORDS = ['IL1B-', \"CXCL8\"]\n").expect("extra");
    let request = MergeRequest {
        base: base.clone(),
        extra,
        export_name: "VALID_GUESSES".to_string(),
        dry_run: false,
    };

    merge_lists(&request).expect("first merge");
    let after_first = fs::read_to_string(&base).expect("read");
    let second = merge_lists(&request).expect("second merge");

    assert_eq!(second.additions_count, 0);
    assert_eq!(fs::read_to_string(&base).expect("read"), after_first);
}

#[test]
fn dry_run_reports_without_writing() {
    let dir = tempdir().expect("tempdir");
    let base = dir.path().join("validGuesses.ts");
    let extra = dir.path().join("extra.txt");
    let original = "export const VALID_GUESSES = ['IL6--']\n";
    fs::write(&base, original).expect("base");
    fs::write(&extra, "IFNG\n").expect("extra");

    let report = merge_lists(&MergeRequest {
        base: base.clone(),
        extra,
        export_name: "VALID_GUESSES".to_string(),
        dry_run: true,
    })
    .expect("dry run");

    assert!(report.dry_run);
    assert_eq!(report.additions_count, 1);
    assert!(report.backup_path.is_none());
    assert_eq!(fs::read_to_string(&base).expect("read"), original);
    assert!(!dir.path().join("validGuesses.ts.bak").exists());
}

#[test]
fn merge_fails_loudly_on_missing_or_empty_inputs() {
    let dir = tempdir().expect("tempdir");
    let base = dir.path().join("validGuesses.ts");
    let extra = dir.path().join("extra.txt");

    let request = MergeRequest {
        base: base.clone(),
        extra: extra.clone(),
        export_name: "VALID_GUESSES".to_string(),
        dry_run: false,
    };
    let err = merge_lists(&request).expect_err("missing base");
    assert!(matches!(err, CytowordError::Config(_)));

    fs::write(&base, "export const VALID_GUESSES = 1\n").expect("base");
    fs::write(&extra, "IL6\n").expect("extra");
    let err = merge_lists(&request).expect_err("no array");
    assert!(matches!(err, CytowordError::Parse(_)));

    fs::write(&base, "export const VALID_GUESSES = []\n").expect("base");
    fs::write(&extra, "# nothing here\n\n").expect("extra");
    let err = merge_lists(&request).expect_err("empty extra");
    assert!(matches!(err, CytowordError::Parse(_)));
    assert!(!dir.path().join("validGuesses.ts.bak").exists());
}

#[test]
fn article_map_covers_every_token_with_sentinel_default() {
    let dir = tempdir().expect("tempdir");
    let wordlist = dir.path().join("wordlist.ts");
    let out = dir.path().join("out").join("wikipedialist.json");
    fs::write(
        &wordlist,
        "export const WORDS = [\n  'TNF--',\n  'IL6--',\n  'IFNG-',\n]\n",
    )
    .expect("wordlist");

    let first_batch = r#"{"results":{"bindings":[
        {"gene_symbol":{"type":"literal","value":"IFNG"}},
        {"gene_symbol":{"type":"literal","value":"IL6"},
         "article":{"type":"uri","value":"https://en.wikipedia.org/wiki/Interleukin_6"}},
        {"gene_symbol":{"type":"literal","value":"IL6"},
         "article":{"type":"uri","value":"https://en.wikipedia.org/wiki/IL6_gene"}}
    ]}}"#;
    let second_batch = r#"{"results":{"bindings":[]}}"#;
    let transport = CannedTransport::new(&[first_batch, second_batch]);
    let sleeper = NoSleep::default();
    let fetcher = ChunkedFetcher::new(&transport, &sleeper, &fast_config(2));

    let report = build_article_map(&wordlist, &out, &fetcher).expect("articles");

    assert_eq!(report.entries, 3);
    assert_eq!(report.found, 1);
    assert_eq!(report.not_found, 2);
    assert_eq!(report.batches, 2);
    assert_eq!(*transport.calls.borrow(), 2);
    assert_eq!(*sleeper.slept.borrow(), vec![Duration::from_millis(10)]);

    let written: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&out).expect("read out")).expect("json");
    assert_eq!(
        written,
        serde_json::json!({
            "IFNG-": "None",
            "IL6--": "https://en.wikipedia.org/wiki/Interleukin_6",
            "TNF--": "None",
        })
    );
}

#[test]
fn article_map_writes_nothing_when_a_batch_exhausts_retries() {
    let dir = tempdir().expect("tempdir");
    let wordlist = dir.path().join("wordlist.ts");
    let out = dir.path().join("wikipedialist.json");
    fs::write(&wordlist, "export const WORDS = ['IL6--']\n").expect("wordlist");
    let sleeper = NoSleep::default();
    let fetcher = ChunkedFetcher::new(DownTransport, &sleeper, &fast_config(30));

    let err = build_article_map(&wordlist, &out, &fetcher).expect_err("down");

    assert!(matches!(err, CytowordError::Fetch { attempts: 3, .. }));
    assert!(!out.exists());
    assert_eq!(sleeper.slept.borrow().len(), 2);
}

#[test]
fn article_map_rejects_empty_word_list() {
    let dir = tempdir().expect("tempdir");
    let wordlist = dir.path().join("wordlist.ts");
    fs::write(&wordlist, "export const WORDS = []\n").expect("wordlist");
    let fetcher = ChunkedFetcher::new(DownTransport, NoSleep::default(), &fast_config(30));

    let err = build_article_map(&wordlist, &dir.path().join("out.json"), &fetcher)
        .expect_err("empty");
    assert!(matches!(err, CytowordError::Parse(_)));
}

#[test]
fn wordlists_split_ranked_symbols_into_solutions_and_guesses() {
    let dir = tempdir().expect("tempdir");
    let whitelist = dir.path().join("cytokinesWhitelist.txt");
    fs::write(&whitelist, "TNF\nIL-6\nIFNG\nCXCL12\n").expect("whitelist");
    let ranked = r#"{"results":{"bindings":[
        {"gene_symbol":{"value":"TNF"},"score":{"value":"900"}},
        {"gene_symbol":{"value":"BRCA1"},"score":{"value":"800"}},
        {"gene_symbol":{"value":"IL6"},"score":{"value":"700"}},
        {"gene_symbol":{"value":"CXCL12"},"score":{"value":"650"}},
        {"gene_symbol":{"value":"TNF"},"score":{"value":"600"}},
        {"gene_symbol":{"value":"IFNG"},"score":{"value":"500"}}
    ]}}"#;
    let transport = CannedTransport::new(&[ranked]);
    let fetcher = ChunkedFetcher::new(&transport, NoSleep::default(), &fast_config(30));

    let mut config = WordlistConfig::new(
        &whitelist,
        dir.path().join("wordlist_2.ts"),
        dir.path().join("validGuesses_2.ts"),
    );
    config.max_solutions = 2;

    let report = build_wordlists(&config, &fetcher).expect("wordlists");

    assert_eq!(report.upstream_rows, 6);
    assert_eq!(report.solutions, 2);
    assert_eq!(report.valid_guesses, 3);
    assert_eq!(report.not_whitelisted, 1);
    assert_eq!(report.unrepresentable, 1);
    assert_eq!(
        fs::read_to_string(&config.words_out).expect("words"),
        "export const WORDS = [\n  'TNF--',\n  'IL6--',\n]\n"
    );
    assert_eq!(
        fs::read_to_string(&config.valid_guesses_out).expect("valid"),
        "export const VALID_GUESSES = [\n  'TNF--',\n  'IL6--',\n  'IFNG-',\n]\n"
    );
}

#[test]
fn wordlists_require_a_whitelist() {
    let dir = tempdir().expect("tempdir");
    let transport = CannedTransport::new(&[r#"{"results":{"bindings":[]}}"#]);
    let fetcher = ChunkedFetcher::new(&transport, NoSleep::default(), &fast_config(30));
    let config = WordlistConfig::new(
        dir.path().join("missing.txt"),
        dir.path().join("w.ts"),
        dir.path().join("v.ts"),
    );

    let err = build_wordlists(&config, &fetcher).expect_err("no whitelist");

    assert!(matches!(err, CytowordError::Config(_)));
    assert_eq!(*transport.calls.borrow(), 0);
    assert!(!config.words_out.exists());
}

#[test]
fn wordlists_leave_both_outputs_alone_when_one_cannot_be_written() {
    // Given an existing WORDS file and a VALID_GUESSES target under a regular file
    // When the build fails staging the second output
    // Then the first output still holds its previous content.
    let dir = tempdir().expect("tempdir");
    let whitelist = dir.path().join("cytokinesWhitelist.txt");
    fs::write(&whitelist, "TNF\nIL6\n").expect("whitelist");
    let words_out = dir.path().join("wordlist_2.ts");
    let previous = "export const WORDS = ['OLD--']\n";
    fs::write(&words_out, previous).expect("seed words");
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, "regular file").expect("blocker");

    let ranked = r#"{"results":{"bindings":[
        {"gene_symbol":{"value":"TNF"}},
        {"gene_symbol":{"value":"IL6"}}
    ]}}"#;
    let transport = CannedTransport::new(&[ranked]);
    let fetcher = ChunkedFetcher::new(&transport, NoSleep::default(), &fast_config(30));
    let config = WordlistConfig::new(
        &whitelist,
        &words_out,
        blocker.join("validGuesses_2.ts"),
    );

    let err = build_wordlists(&config, &fetcher).expect_err("second target unwritable");

    assert!(matches!(err, CytowordError::Io(_)));
    assert_eq!(fs::read_to_string(&words_out).expect("words"), previous);
    let leftovers = fs::read_dir(dir.path())
        .expect("read dir")
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_name().to_string_lossy().contains(".tmp."))
        .count();
    assert_eq!(leftovers, 0);
}
