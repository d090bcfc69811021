//! Fixed-width token codec.
//!
//! Every symbol stored by the game is exactly [`TOKEN_WIDTH`] upper-case
//! characters, right-padded with [`PAD_CHAR`]. Symbols that cannot be
//! represented are rejected rather than truncated.

use std::fmt;

use serde::{Serialize, Serializer};

pub const TOKEN_WIDTH: usize = 5;
pub const PAD_CHAR: char = '-';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenRejection {
    Empty,
    TooLong { len: usize },
}

impl fmt::Display for TokenRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("symbol is empty after normalization"),
            Self::TooLong { len } => write!(
                f,
                "symbol has {len} characters after normalization (max {TOKEN_WIDTH})"
            ),
        }
    }
}

impl std::error::Error for TokenRejection {}

/// A normalized, padded, upper-case symbol. Ordering is lexicographic over
/// the padded characters.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CanonicalToken(String);

impl CanonicalToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The identifier without its right padding.
    ///
    /// Lossy when an identifier would itself end in [`PAD_CHAR`]; normalization
    /// strips hyphens, so tokens built here never do.
    pub fn bare(&self) -> &str {
        self.0.trim_end_matches(PAD_CHAR)
    }
}

impl fmt::Display for CanonicalToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CanonicalToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for CanonicalToken {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// Uppercase, drop whitespace and hyphens, then pad to [`TOKEN_WIDTH`].
pub fn normalize(raw: &str) -> Result<CanonicalToken, TokenRejection> {
    let core = symbol_key(raw);
    let len = core.chars().count();
    if len == 0 {
        return Err(TokenRejection::Empty);
    }
    if len > TOKEN_WIDTH {
        return Err(TokenRejection::TooLong { len });
    }

    let mut padded = core;
    padded.extend(std::iter::repeat_n(PAD_CHAR, TOKEN_WIDTH - len));
    Ok(CanonicalToken(padded))
}

/// Strips right padding from a serialized token string.
#[must_use]
pub fn denormalize(token: &str) -> &str {
    token.trim_end_matches(PAD_CHAR)
}

/// The unpadded comparison key of a raw symbol (upper-case, no whitespace, no hyphens).
#[must_use]
pub fn symbol_key(raw: &str) -> String {
    raw.trim()
        .to_uppercase()
        .chars()
        .filter(|ch| !ch.is_whitespace() && *ch != PAD_CHAR)
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedBatch {
    pub tokens: Vec<CanonicalToken>,
    pub rejected: usize,
}

/// Normalizes in order, dropping and counting unrepresentable entries.
pub fn normalize_all<I, S>(raws: I) -> NormalizedBatch
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut batch = NormalizedBatch::default();
    for raw in raws {
        match normalize(raw.as_ref()) {
            Ok(token) => batch.tokens.push(token),
            Err(reason) => {
                log::debug!("dropping symbol {:?}: {reason}", raw.as_ref());
                batch.rejected += 1;
            }
        }
    }
    batch
}
