use std::collections::HashSet;

use serde::Serialize;

use crate::token::{CanonicalToken, normalize};
use crate::whitelist::Whitelist;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SolutionSelection {
    /// Every accepted token, first-seen order.
    pub valid_guesses: Vec<CanonicalToken>,
    /// The first `cap` accepted tokens in upstream rank order.
    pub solutions: Vec<CanonicalToken>,
    pub unrepresentable: usize,
    pub not_whitelisted: usize,
    pub duplicates: usize,
}

/// Single pass over a score-ordered stream. Upstream order is never re-sorted.
pub fn select_solutions<I, S>(ranked: I, whitelist: &Whitelist, cap: usize) -> SolutionSelection
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut selection = SolutionSelection::default();
    let mut seen = HashSet::new();

    for raw in ranked {
        let token = match normalize(raw.as_ref()) {
            Ok(token) => token,
            Err(_) => {
                selection.unrepresentable += 1;
                continue;
            }
        };
        if !whitelist.contains(&token) {
            selection.not_whitelisted += 1;
            continue;
        }
        if !seen.insert(token.clone()) {
            selection.duplicates += 1;
            continue;
        }
        if selection.solutions.len() < cap {
            selection.solutions.push(token.clone());
        }
        selection.valid_guesses.push(token);
    }
    selection
}
