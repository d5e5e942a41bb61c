//! Heading widow prevention.
//!
//! Works on the markup string of an element: hyphens between word characters
//! become non-breaking hyphens, and the last two space-separated tokens are
//! glued with a non-breaking space.

use crate::dom::{ElementId, TextBlock};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

pub const NON_BREAKING_HYPHEN: &str = "&#8209;";
pub const NON_BREAKING_SPACE: &str = "&nbsp;";

static RE_INNER_HYPHEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([0-9A-Za-z_])-([0-9A-Za-z_])").unwrap());

/// Replace every hyphen sitting directly between two word characters.
pub fn protect_hyphens(html: &str) -> String {
    // Matches cannot overlap, so `a-b-c` needs a second pass for the `b-c` pair.
    let mut current = html.to_string();
    loop {
        let next = RE_INNER_HYPHEN
            .replace_all(&current, format!("${{1}}{NON_BREAKING_HYPHEN}${{2}}"))
            .into_owned();
        if next == current {
            return current;
        }
        current = next;
    }
}

/// Glue the final two tokens; `None` when there is nothing to do.
pub fn join_last_words(html: &str) -> Option<String> {
    let mut words: Vec<&str> = html.trim().split(' ').collect();
    if words.len() <= 2 {
        return None;
    }
    let last = words.pop()?;
    if is_already_joined(last) {
        return None;
    }
    let penultimate = words.pop()?;
    let joined = format!("{penultimate}{NON_BREAKING_SPACE}{last}");
    words.push(&joined);
    Some(words.join(" "))
}

fn is_already_joined(token: &str) -> bool {
    token.contains(NON_BREAKING_SPACE) || token.contains('\u{a0}')
}

/// Full transform for one element. `None` leaves the element untouched.
pub fn normalize_heading(html: &str) -> Option<String> {
    join_last_words(&protect_hyphens(html))
}

/// Union of default and forced targets, deduplicated by element identity.
pub fn select_targets(defaults: &[TextBlock], forced: &[TextBlock]) -> Vec<TextBlock> {
    let mut seen: HashSet<ElementId> = HashSet::new();
    defaults
        .iter()
        .chain(forced.iter())
        .filter(|block| seen.insert(block.element))
        .cloned()
        .collect()
}
