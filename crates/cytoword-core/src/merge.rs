use std::collections::BTreeSet;

use crate::token::{CanonicalToken, normalize_all};

/// Duplicate-free token set, always iterated in ascending token order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenCollection {
    tokens: BTreeSet<CanonicalToken>,
}

impl TokenCollection {
    /// Normalizes raw symbols; returns the collection and the rejected count.
    pub fn from_raw<I, S>(raws: I) -> (Self, usize)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let batch = normalize_all(raws);
        (batch.tokens.into_iter().collect(), batch.rejected)
    }

    pub fn is_superset(&self, other: &Self) -> bool {
        self.tokens.is_superset(&other.tokens)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CanonicalToken> {
        self.tokens.iter()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn to_vec(&self) -> Vec<CanonicalToken> {
        self.tokens.iter().cloned().collect()
    }
}

impl FromIterator<CanonicalToken> for TokenCollection {
    fn from_iter<I: IntoIterator<Item = CanonicalToken>>(iter: I) -> Self {
        Self {
            tokens: iter.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome {
    pub merged: TokenCollection,
    /// Normalized extra tokens not already in the base, ascending.
    pub additions: Vec<CanonicalToken>,
    /// Distinct tokens the extra list normalized to.
    pub extra_count: usize,
    pub rejected: usize,
}

/// `merged = base ∪ normalize(extra)`, `additions = normalize(extra) − base`.
/// Pure; the base is left untouched.
pub fn merge<S: AsRef<str>>(base: &TokenCollection, extra: &[S]) -> MergeOutcome {
    let (extra_set, rejected) = TokenCollection::from_raw(extra);

    let additions = extra_set
        .tokens
        .difference(&base.tokens)
        .cloned()
        .collect::<Vec<_>>();
    let merged = base
        .tokens
        .union(&extra_set.tokens)
        .cloned()
        .collect::<TokenCollection>();

    MergeOutcome {
        merged,
        additions,
        extra_count: extra_set.len(),
        rejected,
    }
}
