use std::collections::BTreeMap;

use serde::{Serialize, Serializer};

use crate::token::{CanonicalToken, normalize};

/// Literal written for tokens with no auxiliary value.
pub const NOT_FOUND_SENTINEL: &str = "None";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkValue {
    NotFound,
    Found(String),
}

impl LinkValue {
    /// Absent, blank and sentinel-literal candidates all mean "not found".
    pub fn from_candidate(candidate: Option<&str>) -> Self {
        match candidate.map(str::trim) {
            Some(value) if !value.is_empty() && value != NOT_FOUND_SENTINEL => {
                Self::Found(value.to_string())
            }
            _ => Self::NotFound,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

impl Serialize for LinkValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Found(value) => serializer.serialize_str(value),
            Self::NotFound => serializer.serialize_str(NOT_FOUND_SENTINEL),
        }
    }
}

/// Token-keyed results where the first real value recorded for a key is final.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FetchResultMap {
    entries: BTreeMap<CanonicalToken, LinkValue>,
}

impl FetchResultMap {
    /// Every token starts at [`LinkValue::NotFound`].
    pub fn seeded<'a, I>(tokens: I) -> Self
    where
        I: IntoIterator<Item = &'a CanonicalToken>,
    {
        let entries = tokens
            .into_iter()
            .map(|token| (token.clone(), LinkValue::NotFound))
            .collect();
        Self { entries }
    }

    /// Records `candidate` only while the seeded key is still not found.
    /// Keys outside the seed set are ignored. Returns whether a value was stored.
    pub fn record_if_absent(&mut self, token: &CanonicalToken, candidate: Option<&str>) -> bool {
        let LinkValue::Found(value) = LinkValue::from_candidate(candidate) else {
            return false;
        };
        match self.entries.get_mut(token) {
            Some(slot) if !slot.is_found() => {
                *slot = LinkValue::Found(value);
                true
            }
            _ => false,
        }
    }

    /// Same as [`Self::record_if_absent`] for a raw identifier from the remote side.
    pub fn record_symbol(&mut self, symbol: &str, candidate: Option<&str>) -> bool {
        match normalize(symbol) {
            Ok(token) => self.record_if_absent(&token, candidate),
            Err(_) => false,
        }
    }

    pub fn get(&self, token: &CanonicalToken) -> Option<&LinkValue> {
        self.entries.get(token)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn found_count(&self) -> usize {
        self.entries.values().filter(|value| value.is_found()).count()
    }
}

/// Seeds every token and folds in the fetched pairs in delivery order.
pub fn reconcile<'a, T, P, S>(tokens: T, pairs: P) -> FetchResultMap
where
    T: IntoIterator<Item = &'a CanonicalToken>,
    P: IntoIterator<Item = (S, Option<String>)>,
    S: AsRef<str>,
{
    let mut map = FetchResultMap::seeded(tokens);
    for (symbol, candidate) in pairs {
        map.record_symbol(symbol.as_ref(), candidate.as_deref());
    }
    map
}
