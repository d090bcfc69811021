//! Text extraction for stored symbol lists.
//!
//! The array form is not parsed as source code: only the first balanced
//! `[ ... ]` block is located and the quoted literals inside it are harvested.
//! Callers treat an empty result as "nothing to process".

use std::path::Path;

use crate::token::CanonicalToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListFormat {
    ArrayLiteral,
    LineList,
}

impl ListFormat {
    /// `.ts`/`.tsx` files hold an exported array, anything else is one symbol per line.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("ts" | "tsx") => Self::ArrayLiteral,
            _ => Self::LineList,
        }
    }

    #[must_use]
    pub fn extract(self, text: &str) -> Vec<String> {
        match self {
            Self::ArrayLiteral => extract_from_array_literal_text(text),
            Self::LineList => extract_from_line_list(text),
        }
    }
}

#[must_use]
pub fn extract_from_array_literal_text(text: &str) -> Vec<String> {
    let Some(block) = first_bracket_block(text) else {
        return Vec::new();
    };
    quoted_literals(block)
}

/// Whether the text contains a balanced `[ ... ]` block at all.
#[must_use]
pub fn has_array_block(text: &str) -> bool {
    first_bracket_block(text).is_some()
}

#[must_use]
pub fn extract_from_line_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(ToString::to_string)
        .collect()
}

/// Renders the array form: `<name> = [`, one `  'TOKEN',` line each, then `]`.
#[must_use]
pub fn render_array_literal(export_name: &str, tokens: &[CanonicalToken]) -> String {
    let mut out = String::with_capacity(export_name.len() + 32 + tokens.len() * 11);
    out.push_str("export const ");
    out.push_str(export_name);
    out.push_str(" = [\n");
    for token in tokens {
        out.push_str("  '");
        out.push_str(token.as_str());
        out.push_str("',\n");
    }
    out.push_str("]\n");
    out
}

fn first_bracket_block(text: &str) -> Option<&str> {
    let start = text.find('[')?;
    let mut depth = 0usize;
    for (offset, ch) in text[start..].char_indices() {
        match ch {
            '[' => depth += 1,
            ']' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=start + offset]);
                }
            }
            _ => {}
        }
    }
    None
}

// Single- or double-quoted, same quote to close, never spanning a line break.
fn quoted_literals(block: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut rest = block;
    while let Some(open) = rest.find(['\'', '"']) {
        let quote = rest[open..].chars().next().unwrap_or('\'');
        let body_start = open + quote.len_utf8();
        let body = &rest[body_start..];
        match body.find([quote, '\n']) {
            Some(close) if body[close..].starts_with(quote) => {
                out.push(body[..close].to_string());
                rest = &body[close + quote.len_utf8()..];
            }
            _ => rest = body,
        }
    }
    out
}
