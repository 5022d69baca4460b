//! Layout composition engine
//!
//! This module turns a [`LayoutTemplate`](crate::template::LayoutTemplate) and a
//! [`DataContext`] into a [`LayoutDocument`]: positioned, styled elements in
//! page inches, ready for a render surface.

mod builders;
pub mod composer;
pub mod config;
pub mod document;
pub mod error;
pub mod extent;
pub mod geometry;

pub use composer::{compose, ComposeState, Composer, DataContext};
pub use config::LayoutConfig;
pub use document::*;
pub use error::{LayoutError, LayoutWarning};
pub use extent::{combined_extent, Camera, Extent};
pub use geometry::{anchor_point, rect, Anchor, Orientation, Page, PageUnit, Point, Rect};

/// Calculate Levenshtein distance between two strings
fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let m = a_chars.len();
    let n = b_chars.len();

    if m == 0 {
        return n;
    }
    if n == 0 {
        return m;
    }

    let mut prev: Vec<usize> = (0..=n).collect();
    let mut curr = vec![0usize; n + 1];

    for i in 1..=m {
        curr[0] = i;
        for j in 1..=n {
            let cost = usize::from(a_chars[i - 1] != b_chars[j - 1]);
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[n]
}

/// Names within `max_distance` edits of `target`, closest first, at most three
pub fn find_similar<'a>(
    defined: impl IntoIterator<Item = &'a str>,
    target: &str,
    max_distance: usize,
) -> Vec<String> {
    let mut candidates: Vec<(&str, usize)> = defined
        .into_iter()
        .filter_map(|name| {
            let dist = levenshtein_distance(name, target);
            (dist <= max_distance && dist > 0).then_some((name, dist))
        })
        .collect();

    candidates.sort_by_key(|(name, d)| (*d, *name));
    candidates
        .into_iter()
        .map(|(name, _)| name.to_string())
        .take(3)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levenshtein_same() {
        assert_eq!(levenshtein_distance("Core Map Frame", "Core Map Frame"), 0);
    }

    #[test]
    fn test_levenshtein_edits() {
        assert_eq!(levenshtein_distance("Core Map Frame", "Core Map Frme"), 1);
        assert_eq!(levenshtein_distance("kitten", "sitting"), 3);
        assert_eq!(levenshtein_distance("", "abc"), 3);
    }

    #[test]
    fn test_find_similar_closest_first() {
        let names = ["Core Map Frame", "Inset Map Frame", "Core Map Frames"];
        let similar = find_similar(names, "Core Map Frme", 2);
        assert_eq!(similar, vec!["Core Map Frame", "Core Map Frames"]);
        assert!(find_similar(names, "Legend", 2).is_empty());
    }
}
