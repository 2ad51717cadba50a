use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use crate::models::PreviewResult;

/// The set of previews the user has chosen for import, keyed by content hash
/// so a selection survives relisting (paths are only unique per listing).
///
/// All operations are idempotent: adding an already-selected hash or removing
/// an absent one is a no-op. The set is reconciled against every newly
/// published result set so it can never refer to a vanished file.
#[derive(Debug, Default)]
pub struct SelectionSet {
    selected: Mutex<HashMap<String, PreviewResult>>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, result: &PreviewResult) {
        let mut selected = self.selected.lock().unwrap();
        selected.insert(result.content_hash.clone(), result.clone());
    }

    pub fn add_many<'a>(&self, results: impl IntoIterator<Item = &'a PreviewResult>) {
        let mut selected = self.selected.lock().unwrap();
        for result in results {
            selected.insert(result.content_hash.clone(), result.clone());
        }
    }

    pub fn remove(&self, content_hash: &str) {
        let mut selected = self.selected.lock().unwrap();
        selected.remove(content_hash);
    }

    pub fn remove_many<'a>(&self, content_hashes: impl IntoIterator<Item = &'a str>) {
        let mut selected = self.selected.lock().unwrap();
        for hash in content_hashes {
            selected.remove(hash);
        }
    }

    /// Select-all semantics: the given results fully replace the current set.
    pub fn replace_all<'a>(&self, results: impl IntoIterator<Item = &'a PreviewResult>) {
        let mut selected = self.selected.lock().unwrap();
        selected.clear();
        for result in results {
            selected.insert(result.content_hash.clone(), result.clone());
        }
    }

    /// Select-none semantics.
    pub fn clear(&self) {
        self.selected.lock().unwrap().clear();
    }

    pub fn is_selected(&self, content_hash: &str) -> bool {
        self.selected.lock().unwrap().contains_key(content_hash)
    }

    pub fn len(&self) -> usize {
        self.selected.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.lock().unwrap().is_empty()
    }

    /// Drop every selected hash not present in the newly published set.
    pub fn reconcile(&self, published_hashes: &HashSet<String>) {
        let mut selected = self.selected.lock().unwrap();
        selected.retain(|hash, _| published_hashes.contains(hash));
    }

    /// Snapshot of the selected hashes.
    pub fn hashes(&self) -> HashSet<String> {
        self.selected.lock().unwrap().keys().cloned().collect()
    }

    /// Original path for a selected hash, if still selected.
    pub fn original_path(&self, content_hash: &str) -> Option<String> {
        self.selected
            .lock()
            .unwrap()
            .get(content_hash)
            .map(|r| r.original_path.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn preview(hash: &str) -> PreviewResult {
        PreviewResult {
            original_path: format!("/Volumes/SD1/DCIM/{hash}.arw"),
            thumbnail_path: format!("/tmp/thumbs/{hash}.jpg"),
            content_hash: hash.to_string(),
        }
    }

    #[test]
    fn add_and_remove_are_idempotent() {
        let selection = SelectionSet::new();
        let a = preview("a");

        selection.add(&a);
        selection.add(&a);
        assert_eq!(selection.len(), 1);
        assert!(selection.is_selected("a"));

        selection.remove("a");
        selection.remove("a");
        assert!(!selection.is_selected("a"));
        assert!(selection.is_empty());
    }

    #[test]
    fn remove_many_ignores_absent_hashes() {
        let selection = SelectionSet::new();
        selection.replace_all(&[preview("a"), preview("b"), preview("c")]);

        selection.remove_many(["a", "c", "never-there"]);

        assert!(!selection.is_selected("a"));
        assert!(selection.is_selected("b"));
        assert_eq!(selection.len(), 1);
    }

    #[test]
    fn replace_all_discards_previous_selection() {
        let selection = SelectionSet::new();
        selection.add(&preview("old"));

        let current = [preview("a"), preview("b")];
        selection.replace_all(&current);

        assert!(!selection.is_selected("old"));
        assert!(selection.is_selected("a"));
        assert!(selection.is_selected("b"));
        assert_eq!(selection.len(), 2);
    }

    #[test]
    fn clear_after_replace_all_empties_the_set() {
        let selection = SelectionSet::new();
        selection.replace_all(&[preview("a"), preview("b")]);
        selection.clear();
        assert!(selection.is_empty());
    }

    #[test]
    fn reconcile_drops_vanished_hashes() {
        let selection = SelectionSet::new();
        selection.replace_all(&[preview("a"), preview("b")]);

        let published: HashSet<String> = ["a".to_string()].into_iter().collect();
        selection.reconcile(&published);

        assert!(selection.is_selected("a"));
        assert!(!selection.is_selected("b"));
    }
}
