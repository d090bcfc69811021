use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use crate::error::{CytowordError, Result};
use crate::extract::extract_from_line_list;
use crate::token::{CanonicalToken, symbol_key};

/// Inclusion filter over unpadded symbol keys. Immutable once loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Whitelist {
    keys: BTreeSet<String>,
}

impl Whitelist {
    pub fn from_symbols<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keys = symbols
            .into_iter()
            .map(|raw| symbol_key(raw.as_ref()))
            .filter(|key| !key.is_empty())
            .collect();
        Self { keys }
    }

    /// Reads a line file (when present) and adds the inline symbols.
    /// An empty result is a configuration error.
    pub fn load(path: Option<&Path>, inline: &[String]) -> Result<Self> {
        let mut symbols = Vec::new();
        if let Some(path) = path {
            if path.is_file() {
                symbols = extract_from_line_list(&fs::read_to_string(path)?);
            } else {
                log::warn!("whitelist file {} not found", path.display());
            }
        }
        symbols.extend(inline.iter().cloned());

        let whitelist = Self::from_symbols(symbols);
        if whitelist.is_empty() {
            let location = path
                .map(|p| format!(" at {}", p.display()))
                .unwrap_or_default();
            return Err(CytowordError::Config(format!(
                "no whitelist symbols found{location}: provide one HGNC symbol per line"
            )));
        }
        Ok(whitelist)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn contains(&self, token: &CanonicalToken) -> bool {
        self.keys.contains(token.bare())
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::normalize;
    use tempfile::tempdir;

    #[test]
    fn whitelist_keys_are_unpadded_and_hyphen_free() {
        let wl = Whitelist::from_symbols(["il-6", "TNF", " ", "HLA-A"]);
        assert_eq!(wl.len(), 3);
        assert!(wl.contains_key("IL6"));
        assert!(wl.contains(&normalize("HLAA").unwrap()));
        assert!(wl.contains(&normalize("tnf").unwrap()));
        assert!(!wl.contains(&normalize("IFNG").unwrap()));
    }

    #[test]
    fn load_merges_file_and_inline_symbols() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("whitelist.txt");
        fs::write(&path, "# hgnc\nIL6\nTNF\n\n").expect("write");

        let wl = Whitelist::load(Some(&path), &["CXCL8".to_string()]).expect("load");
        assert_eq!(wl.len(), 3);
        assert!(wl.contains_key("CXCL8"));
    }

    #[test]
    fn load_rejects_missing_file_without_inline_symbols() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("absent.txt");
        let err = Whitelist::load(Some(&path), &[]).expect_err("must fail");
        assert!(matches!(err, CytowordError::Config(_)));
        assert!(err.to_string().contains("absent.txt"));
    }

    #[test]
    fn load_accepts_inline_symbols_without_file() {
        let wl = Whitelist::load(None, &["IL1B".to_string()]).expect("load");
        assert!(wl.contains_key("IL1B"));
    }
}
