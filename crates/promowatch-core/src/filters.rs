use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::{error, info, warn};

use crate::Result;

/// Default location of the persisted filter list.
pub const DEFAULT_FILTERS_FILE: &str = "filters.json";

/// Ordered list of lowercase keywords, persisted as a JSON array.
///
/// Single-writer: the event loop owns the only handle, so no lock is needed
/// as long as events are processed one at a time. Entries are trusted as
/// persisted; `load` does not re-normalize them.
#[derive(Debug)]
pub struct FilterStore {
    path: PathBuf,
    entries: Vec<String>,
}

impl FilterStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: Vec::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current entries in insertion order.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Read the persisted list, creating an empty file if absent.
    ///
    /// Content that is not a JSON string array resets the store to empty and
    /// rewrites the file. Only storage errors propagate.
    pub fn load(&mut self) -> Result<()> {
        if !self.path.exists() {
            self.entries = Vec::new();
            self.persist()?;
            info!(
                "filter file {} not found, created empty",
                self.path.display()
            );
            return Ok(());
        }

        let contents = fs::read_to_string(&self.path)?;
        match serde_json::from_str::<Vec<String>>(&contents) {
            Ok(list) => {
                self.entries = list;
                info!("loaded {} filter(s)", self.entries.len());
            }
            Err(e) => {
                error!("invalid filter file {}: {e}", self.path.display());
                self.entries = Vec::new();
                self.persist()?;
            }
        }
        Ok(())
    }

    /// Persist the current list, logging and swallowing failures.
    ///
    /// Callers must not assume persistence succeeded; the in-memory list is
    /// authoritative until the next load.
    pub fn save(&self) {
        if let Err(e) = self.persist() {
            warn!("failed to save filters to {}: {e}", self.path.display());
        }
    }

    fn persist(&self) -> Result<()> {
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, serde_json::to_string(&self.entries)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    /// Append an already-normalized keyword.
    ///
    /// Empty or already-present input is rejected and nothing is written.
    pub fn add(&mut self, keyword: &str) -> bool {
        if keyword.is_empty() || self.entries.iter().any(|f| f == keyword) {
            return false;
        }
        self.entries.push(keyword.to_string());
        self.save();
        true
    }

    /// Remove an exact entry if present.
    pub fn remove(&mut self, keyword: &str) -> bool {
        let Some(idx) = self.entries.iter().position(|f| f == keyword) else {
            return false;
        };
        self.entries.remove(idx);
        self.save();
        true
    }

    /// True when any stored keyword occurs inside `text`.
    ///
    /// `text` must already be lowercased. Matching is literal substring
    /// containment, not whole-word. Linear scan; the list stays small.
    pub fn contains_any(&self, text: &str) -> bool {
        self.entries.iter().any(|f| text.contains(f.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tmp_store(name: &str) -> FilterStore {
        let ts = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        FilterStore::new(format!(
            "/tmp/promowatch-filters-{name}-{}-{ts}.json",
            std::process::id()
        ))
    }

    #[test]
    fn creates_empty_file_when_absent() {
        let mut store = tmp_store("absent");
        store.load().unwrap();
        assert!(store.entries().is_empty());
        assert_eq!(fs::read_to_string(store.path()).unwrap(), "[]");
        let _ = fs::remove_file(store.path());
    }

    #[test]
    fn save_then_load_round_trips_in_order() {
        let mut store = tmp_store("roundtrip");
        store.load().unwrap();
        assert!(store.add("promo"));
        assert!(store.add("desconto"));

        let mut reloaded = FilterStore::new(store.path());
        reloaded.load().unwrap();
        assert_eq!(reloaded.entries(), ["promo", "desconto"]);
        let _ = fs::remove_file(store.path());
    }

    #[test]
    fn corrupt_file_resets_to_empty_and_rewrites() {
        let mut store = tmp_store("corrupt");
        fs::write(store.path(), "{ not json").unwrap();
        store.load().unwrap();
        assert!(store.entries().is_empty());
        // The corrupt file was overwritten with a valid empty list.
        assert_eq!(fs::read_to_string(store.path()).unwrap(), "[]");
        let _ = fs::remove_file(store.path());
    }

    #[test]
    fn valid_json_that_is_not_a_list_also_resets() {
        let mut store = tmp_store("notalist");
        fs::write(store.path(), "42").unwrap();
        store.load().unwrap();
        assert!(store.entries().is_empty());
        assert_eq!(fs::read_to_string(store.path()).unwrap(), "[]");
        let _ = fs::remove_file(store.path());
    }

    #[test]
    fn duplicate_add_is_a_no_op() {
        let mut store = tmp_store("dup");
        store.load().unwrap();
        assert!(store.add("promo"));
        assert!(!store.add("promo"));
        assert_eq!(store.entries(), ["promo"]);
        let _ = fs::remove_file(store.path());
    }

    #[test]
    fn empty_keyword_is_rejected() {
        let mut store = tmp_store("empty");
        store.load().unwrap();
        assert!(!store.add(""));
        assert!(store.entries().is_empty());
        let _ = fs::remove_file(store.path());
    }

    #[test]
    fn removing_absent_keyword_reports_false() {
        let mut store = tmp_store("absent-remove");
        store.load().unwrap();
        store.add("promo");
        assert!(!store.remove("desconto"));
        assert_eq!(store.entries(), ["promo"]);
        assert!(store.remove("promo"));
        assert!(store.entries().is_empty());
        let _ = fs::remove_file(store.path());
    }

    #[test]
    fn substring_matching_is_literal() {
        let mut store = tmp_store("substring");
        store.load().unwrap();
        store.add("promo");
        assert!(store.contains_any("promocional hoje"));
        assert!(!store.contains_any("nada por aqui"));
        let _ = fs::remove_file(store.path());
    }

    #[test]
    fn trailing_space_entry_never_matches_joined_word() {
        // A hand-edited entry keeps its whitespace; "promo " is not a
        // substring of "promocional".
        let mut store = tmp_store("trailing");
        fs::write(store.path(), "[\"promo \"]").unwrap();
        store.load().unwrap();
        assert_eq!(store.entries(), ["promo "]);
        assert!(!store.contains_any("promocional"));
        assert!(store.contains_any("promo valendo"));
        let _ = fs::remove_file(store.path());
    }
}
