//! Deterministic disambiguation of colliding file names.

use std::collections::{HashMap, HashSet};

use crate::sanitize::DOCX_EXTENSION;

/// Where the `(n)` counter goes in a disambiguated name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SuffixStyle {
    /// Append to the whole name: `Report.docx (1)`
    #[default]
    AfterName,
    /// Insert before a trailing `.docx`: `Report (1).docx`
    BeforeExtension,
}

impl SuffixStyle {
    fn candidate(self, base: &str, count: usize) -> String {
        match self {
            SuffixStyle::AfterName => format!("{} ({})", base, count),
            SuffixStyle::BeforeExtension => match base.strip_suffix(DOCX_EXTENSION) {
                Some(stem) => format!("{} ({}){}", stem, count, DOCX_EXTENSION),
                None => format!("{} ({})", base, count),
            },
        }
    }
}

/// Make every name in the sequence unique, appending ` (n)` to collisions.
///
/// Names that occur once are left untouched. For a colliding name, the
/// first occurrence not already taken by an earlier (possibly rewritten)
/// name keeps it; later ones get the smallest counter whose candidate is
/// not taken.
///
/// # Example
///
/// ```
/// let names = vec!["Report".to_string(), "Report".to_string(), "Summary".to_string()];
/// assert_eq!(redocx::resolve(names), ["Report", "Report (1)", "Summary"]);
/// ```
pub fn resolve(names: Vec<String>) -> Vec<String> {
    resolve_with(names, SuffixStyle::AfterName)
}

/// [`resolve`] with a choice of suffix placement.
pub fn resolve_with(mut names: Vec<String>, style: SuffixStyle) -> Vec<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for name in &names {
        *counts.entry(name.clone()).or_insert(0) += 1;
    }

    // Names at indices 0..index, after rewriting
    let mut taken: HashSet<String> = HashSet::with_capacity(names.len());

    for name in names.iter_mut() {
        if counts.get(name.as_str()).copied().unwrap_or(0) > 1 {
            let unique = unique_name(name, &taken, style);
            // A later literal equal to the minted name must collide with it
            *counts.entry(unique.clone()).or_insert(0) += 1;
            *name = unique;
        }
        taken.insert(name.clone());
    }

    names
}

/// The base name itself if free, otherwise the first free `base (n)`.
fn unique_name(base: &str, taken: &HashSet<String>, style: SuffixStyle) -> String {
    if !taken.contains(base) {
        return base.to_string();
    }

    let mut count = 1;
    loop {
        let candidate = style.candidate(base, count);
        if !taken.contains(&candidate) {
            return candidate;
        }
        count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn assert_unique(resolved: &[String]) {
        let set: HashSet<&String> = resolved.iter().collect();
        assert_eq!(set.len(), resolved.len(), "duplicates in {:?}", resolved);
    }

    #[test]
    fn test_simple_collision() {
        let resolved = resolve(names(&["Report", "Report", "Summary"]));
        assert_eq!(resolved, names(&["Report", "Report (1)", "Summary"]));
    }

    #[test]
    fn test_existing_suffix_is_skipped() {
        let resolved = resolve(names(&["Report", "Report (1)", "Report"]));
        assert_eq!(resolved, names(&["Report", "Report (1)", "Report (2)"]));
    }

    #[test]
    fn test_literal_after_minted_name() {
        let resolved = resolve(names(&["A", "A", "A (1)"]));
        assert_eq!(resolved, names(&["A", "A (1)", "A (1) (1)"]));
        assert_unique(&resolved);
    }

    #[test]
    fn test_literal_before_collisions() {
        let resolved = resolve(names(&["A (1)", "A", "A"]));
        assert_eq!(resolved, names(&["A (1)", "A", "A (2)"]));
    }

    #[test]
    fn test_all_identical() {
        let resolved = resolve(names(&["x", "x", "x", "x"]));
        assert_eq!(resolved, names(&["x", "x (1)", "x (2)", "x (3)"]));
    }

    #[test]
    fn test_unique_input_unchanged() {
        let input = names(&["b", "a", "c (1)", "C (1)"]);
        assert_eq!(resolve(input.clone()), input);
    }

    #[test]
    fn test_case_sensitive() {
        let input = names(&["Report", "report", "REPORT"]);
        assert_eq!(resolve(input.clone()), input);
    }

    #[test]
    fn test_empty_input() {
        assert!(resolve(Vec::new()).is_empty());
    }

    #[test]
    fn test_deterministic_and_unique_on_mixed_input() {
        let input = names(&[
            "a", "b", "a", "a (1)", "b", "a (1)", "a", "c", "a (2)", "b (1)", "b",
        ]);
        let first = resolve(input.clone());
        let second = resolve(input.clone());
        assert_eq!(first, second);
        assert_eq!(first.len(), input.len());
        assert_unique(&first);
    }

    #[test]
    fn test_before_extension_style() {
        let resolved = resolve_with(
            names(&["Report.docx", "Report.docx", "Report (1).docx", "Notes"]),
            SuffixStyle::BeforeExtension,
        );
        assert_eq!(
            resolved,
            names(&["Report.docx", "Report (1).docx", "Report (1) (1).docx", "Notes"])
        );
        assert_unique(&resolved);

        let resolved = resolve_with(names(&["x", "x"]), SuffixStyle::BeforeExtension);
        assert_eq!(resolved, names(&["x", "x (1)"]));
    }
}
