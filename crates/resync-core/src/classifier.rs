//! Eligibility of a selection for synchronization
//!
//! Everything here is pure: names and kinds are inspected, the filesystem is
//! not. Comparisons are ASCII case-insensitive so the outcome never depends
//! on the host locale.

use crate::constants::{MARKUP_EXTENSIONS, RESOURCE_FOLDERS};
use crate::entry::{EntryKind, ResourceEntry};

/// Decide whether a single entry is resource-relevant.
///
/// Files qualify by markup extension, directories by well-known resource
/// folder name.
pub fn is_sync_candidate(entry: &ResourceEntry) -> bool {
    match entry.kind {
        EntryKind::File => extension_of(&entry.name)
            .is_some_and(|ext| contains_ignore_case(MARKUP_EXTENSIONS, ext)),
        EntryKind::Directory => contains_ignore_case(RESOURCE_FOLDERS, &entry.name),
        EntryKind::Other => false,
    }
}

/// Decide whether a whole selection is eligible.
///
/// Only a single selected entry is ever considered; empty and multiple
/// selections are not eligible.
pub fn is_sync_selection(selection: &[ResourceEntry]) -> bool {
    match selection {
        [entry] => is_sync_candidate(entry),
        _ => false,
    }
}

fn extension_of(name: &str) -> Option<&str> {
    let idx = name.rfind('.')?;
    if idx == 0 { None } else { Some(&name[idx + 1..]) }
}

fn contains_ignore_case(haystack: &[&str], needle: &str) -> bool {
    haystack.iter().any(|s| s.eq_ignore_ascii_case(needle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("layout")]
    #[case("Layout")]
    #[case("LAYOUT")]
    #[case("lAyOuT")]
    fn layout_directory_in_any_case_is_candidate(#[case] name: &str) {
        assert!(is_sync_candidate(&ResourceEntry::directory(format!("Resources/{name}"))));
    }

    #[rstest]
    #[case("Resources", true)]
    #[case("drawable", true)]
    #[case("values", true)]
    #[case("animator", true)]
    #[case("anim", true)]
    #[case("color", true)]
    #[case("menu", true)]
    #[case("raw", true)]
    #[case("xml", true)]
    #[case("assets", false)]
    #[case("drawable-hdpi", false)]
    #[case("Properties", false)]
    fn directory_names(#[case] name: &str, #[case] expected: bool) {
        assert_eq!(is_sync_candidate(&ResourceEntry::directory(name)), expected);
    }

    #[rstest]
    #[case("Main.AXML", true)]
    #[case("Main.axml", true)]
    #[case("strings.xml", true)]
    #[case("Strings.XmL", true)]
    #[case("Main.png", false)]
    #[case("Main", false)]
    #[case("axml", false)]
    #[case("Main.axml.bak", false)]
    fn file_names(#[case] name: &str, #[case] expected: bool) {
        assert_eq!(is_sync_candidate(&ResourceEntry::file(name)), expected);
    }

    #[test]
    fn other_kinds_are_never_candidates() {
        let entry = ResourceEntry::new("Resources/layout", EntryKind::Other);
        assert!(!is_sync_candidate(&entry));
    }

    #[test]
    fn selection_must_have_exactly_one_entry() {
        let layout = ResourceEntry::directory("Resources/layout");
        assert!(is_sync_selection(std::slice::from_ref(&layout)));
        assert!(!is_sync_selection(&[]));
        assert!(!is_sync_selection(&[layout.clone(), layout]));
    }

    #[test]
    fn non_ascii_case_folding_is_not_applied() {
        // U+0130 lowercases to "i̇" under Unicode rules; ordinal matching must not.
        assert!(!is_sync_candidate(&ResourceEntry::directory("AN\u{130}M")));
    }
}
