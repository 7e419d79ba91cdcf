use std::time::{SystemTime, UNIX_EPOCH};

use parla_types::{HistoryEntry, LanguageRef};

use crate::preprocess::{history_key, is_blank};
use crate::store::HistoryStore;

pub const DEFAULT_CAPACITY: usize = 20;

/// Bounded, newest-first, deduplicated record of committed translations.
///
/// The cache keeps no copy of its own: every operation reads the store,
/// mutates and writes back, so the store is the single source of truth and
/// concurrent writers resolve as last-writer-wins.
pub struct HistoryCache {
    store: Box<dyn HistoryStore>,
    capacity: usize,
}

impl HistoryCache {
    pub fn new(store: Box<dyn HistoryStore>) -> Self {
        Self::with_capacity(store, DEFAULT_CAPACITY)
    }

    pub fn with_capacity(store: Box<dyn HistoryStore>, capacity: usize) -> Self {
        Self {
            store,
            capacity: capacity.max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Stored entries, newest first. Missing or corrupt data reads as empty.
    pub fn load(&self) -> Vec<HistoryEntry> {
        match self.store.load() {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!("Discarding unreadable history: {}", e);
                Vec::new()
            }
        }
    }

    /// Prepend a translation pair, replacing any entry with the same
    /// case-folded source text and target language.
    pub fn record(
        &self,
        source_text: &str,
        translated_text: &str,
        source_lang: &LanguageRef,
        target_lang: &LanguageRef,
    ) -> Vec<HistoryEntry> {
        if is_blank(source_text) || is_blank(translated_text) {
            return self.load();
        }

        let entry = HistoryEntry {
            id: uuid::Uuid::new_v4().to_string(),
            source_text: source_text.trim().to_string(),
            translated_text: translated_text.trim().to_string(),
            source_lang: source_lang.clone(),
            target_lang: target_lang.clone(),
            created_at: now_millis(),
        };

        let key = history_key(&entry.source_text);
        let mut entries = Vec::with_capacity(self.capacity);
        entries.push(entry);
        entries.extend(self.load().into_iter().filter(|existing| {
            !(existing.target_lang.code == target_lang.code
                && history_key(&existing.source_text) == key)
        }));
        entries.truncate(self.capacity);

        tracing::debug!("Recorded history entry, {} stored", entries.len());
        self.persist(&entries);
        entries
    }

    /// Drop the entry with this id; unknown ids leave the history as is
    pub fn remove(&self, id: &str) -> Vec<HistoryEntry> {
        let mut entries = self.load();
        entries.retain(|entry| entry.id != id);
        self.persist(&entries);
        entries
    }

    pub fn clear(&self) -> Vec<HistoryEntry> {
        self.persist(&[]);
        Vec::new()
    }

    fn persist(&self, entries: &[HistoryEntry]) {
        if let Err(e) = self.store.save(entries) {
            tracing::error!("Failed to save history: {}", e);
        }
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::store::{
        HISTORY_KEY, KeyValueHistoryStore, KeyValueStore, MemoryStore, StoreError,
    };

    fn spanish() -> LanguageRef {
        LanguageRef::new("es", "Spanish")
    }

    fn english() -> LanguageRef {
        LanguageRef::new("en", "English")
    }

    fn french() -> LanguageRef {
        LanguageRef::new("fr", "French")
    }

    fn cache_over(kv: Arc<MemoryStore>) -> HistoryCache {
        HistoryCache::new(Box::new(KeyValueHistoryStore::new(kv)))
    }

    struct FailingStore;

    impl HistoryStore for FailingStore {
        fn load(&self) -> Result<Vec<HistoryEntry>, StoreError> {
            Ok(Vec::new())
        }

        fn save(&self, _entries: &[HistoryEntry]) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("quota exceeded".to_string()))
        }
    }

    #[test]
    fn length_never_exceeds_capacity() {
        let cache = cache_over(Arc::new(MemoryStore::new()));
        for i in 0..50 {
            let entries = cache.record(&format!("text {i}"), &format!("texto {i}"), &english(), &spanish());
            assert!(entries.len() <= DEFAULT_CAPACITY);
        }

        let entries = cache.load();
        assert_eq!(entries.len(), DEFAULT_CAPACITY);
        assert_eq!(entries[0].source_text, "text 49");
        assert_eq!(entries[DEFAULT_CAPACITY - 1].source_text, "text 30");
    }

    #[test]
    fn duplicate_pair_keeps_only_latest_translation() {
        let cache = cache_over(Arc::new(MemoryStore::new()));
        cache.record("Good morning", "Buenos días", &english(), &spanish());
        cache.record("unrelated", "no relacionado", &english(), &spanish());
        let entries = cache.record("GOOD MORNING ", "Buen día", &english(), &spanish());

        let matching: Vec<_> = entries
            .iter()
            .filter(|e| history_key(&e.source_text) == "good morning")
            .collect();
        assert_eq!(matching.len(), 1);
        assert_eq!(matching[0].translated_text, "Buen día");
        assert_eq!(entries[0].translated_text, "Buen día");
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn same_text_for_another_target_is_kept() {
        let cache = cache_over(Arc::new(MemoryStore::new()));
        cache.record("hello", "hola", &english(), &spanish());
        let entries = cache.record("hello", "bonjour", &english(), &french());
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn blank_texts_are_not_recorded() {
        let cache = cache_over(Arc::new(MemoryStore::new()));
        cache.record("hello", "hola", &english(), &spanish());

        let entries = cache.record("   ", "hola", &english(), &spanish());
        assert_eq!(entries.len(), 1);
        let entries = cache.record("hello again", "\n", &english(), &spanish());
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn stored_texts_are_trimmed_and_ids_unique() {
        let cache = cache_over(Arc::new(MemoryStore::new()));
        cache.record("  one ", " uno ", &english(), &spanish());
        let entries = cache.record("two", "dos", &english(), &spanish());
        assert_eq!(entries[1].source_text, "one");
        assert_eq!(entries[1].translated_text, "uno");
        assert_ne!(entries[0].id, entries[1].id);
    }

    #[test]
    fn remove_unknown_id_is_a_no_op() {
        let cache = cache_over(Arc::new(MemoryStore::new()));
        let before = cache.record("hello", "hola", &english(), &spanish());
        let after = cache.remove("does-not-exist");
        assert_eq!(before, after);
    }

    #[test]
    fn remove_drops_matching_entry() {
        let cache = cache_over(Arc::new(MemoryStore::new()));
        cache.record("one", "uno", &english(), &spanish());
        let entries = cache.record("two", "dos", &english(), &spanish());
        let remaining = cache.remove(&entries[0].id);
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].source_text, "one");
        assert_eq!(cache.load(), remaining);
    }

    #[test]
    fn clear_then_load_is_empty() {
        let cache = cache_over(Arc::new(MemoryStore::new()));
        cache.record("one", "uno", &english(), &spanish());
        assert!(cache.clear().is_empty());
        assert!(cache.load().is_empty());
    }

    #[test]
    fn corrupt_store_reads_as_empty_and_recovers() {
        let kv = Arc::new(MemoryStore::new());
        kv.set(HISTORY_KEY, "[{\"id\": 42").unwrap();
        let cache = cache_over(kv);

        assert!(cache.load().is_empty());
        let entries = cache.record("hello", "hola", &english(), &spanish());
        assert_eq!(entries.len(), 1);
        assert_eq!(cache.load().len(), 1);
    }

    #[test]
    fn failed_save_still_returns_new_state() {
        let cache = HistoryCache::new(Box::new(FailingStore));
        let entries = cache.record("hello", "hola", &english(), &spanish());
        assert_eq!(entries.len(), 1);
        assert!(cache.clear().is_empty());
    }

    #[test]
    fn writers_sharing_a_store_are_last_writer_wins() {
        let kv = Arc::new(MemoryStore::new());
        let first = cache_over(kv.clone());
        let second = cache_over(kv);

        first.record("one", "uno", &english(), &spanish());
        second.record("two", "dos", &english(), &spanish());

        let texts: Vec<_> = first.load().into_iter().map(|e| e.source_text).collect();
        assert_eq!(texts, vec!["two", "one"]);
    }

    #[test]
    fn zero_capacity_is_clamped() {
        let cache = HistoryCache::with_capacity(
            Box::new(KeyValueHistoryStore::new(Arc::new(MemoryStore::new()))),
            0,
        );
        assert_eq!(cache.capacity(), 1);
        cache.record("one", "uno", &english(), &spanish());
        assert_eq!(cache.record("two", "dos", &english(), &spanish()).len(), 1);
    }
}
