//! The template store.
//!
//! Until the template document is first written, reads return the built-in
//! seed set. The first write persists whatever the caller saw plus the
//! change, so the seeds become ordinary templates from then on.

use std::sync::{Arc, Mutex, MutexGuard};

use popt_types::{Template, Timestamp};
use serde::Deserialize;
use tracing::debug;

use crate::document::{decode_list, encode_list};
use crate::error::{StoreError, StoreResult};
use crate::observer::{StoreObserver, TracingObserver};
use crate::traits::KvStore;

/// Key of the template document.
pub const TEMPLATES_KEY: &str = "templates";

/// CRUD over reusable prompt templates. No retention cap.
pub struct TemplateStore {
    kv: Arc<dyn KvStore>,
    observer: Arc<dyn StoreObserver>,
    write_lock: Mutex<()>,
}

impl TemplateStore {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self {
            kv,
            observer: Arc::new(TracingObserver),
            write_lock: Mutex::new(()),
        }
    }

    /// Route swallowed errors to `observer`.
    pub fn with_observer(mut self, observer: Arc<dyn StoreObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Persisted templates, or the seed set if none were ever saved. A corrupt
    /// document yields an empty list.
    pub fn get_all(&self) -> Vec<Template> {
        self.try_get_all().unwrap_or_else(|e| {
            self.observer.on_error(TEMPLATES_KEY, &e);
            Vec::new()
        })
    }

    /// Look up one template by id.
    pub fn get(&self, id: &str) -> Option<Template> {
        self.get_all().into_iter().find(|t| t.id == id)
    }

    /// Insert (at the back) or replace `template`.
    pub fn upsert(&self, template: &Template) -> bool {
        self.report(self.try_upsert(template)).is_some()
    }

    /// Remove the template with `id`. Removing a missing id succeeds.
    pub fn delete(&self, id: &str) -> bool {
        self.report(self.try_delete(id)).is_some()
    }

    pub fn try_get_all(&self) -> StoreResult<Vec<Template>> {
        let Some(bytes) = self.kv.get(TEMPLATES_KEY)? else {
            return Ok(Template::defaults(&Timestamp::now()));
        };
        let decoded = decode_list(TEMPLATES_KEY, &bytes, |v| {
            Template::deserialize(v).ok().filter(|t| !t.id.is_empty()).ok_or(())
        })?;
        if decoded.dropped > 0 {
            self.observer.on_records_dropped(TEMPLATES_KEY, decoded.dropped);
        }
        Ok(decoded.items)
    }

    /// Insert or replace `template`. Returns `true` if it replaced an
    /// existing template.
    pub fn try_upsert(&self, template: &Template) -> StoreResult<bool> {
        let _guard = self.lock()?;
        let mut templates = self.load_for_write()?;
        let replaced = match templates.iter().position(|t| t.id == template.id) {
            Some(idx) => {
                templates[idx] = template.clone();
                true
            }
            None => {
                templates.push(template.clone());
                false
            }
        };
        self.save(&templates)?;
        debug!(id = %template.id, replaced, "upserted template");
        Ok(replaced)
    }

    /// Remove the template with `id`. Returns whether one was removed. The
    /// document is not rewritten when nothing matched.
    pub fn try_delete(&self, id: &str) -> StoreResult<bool> {
        let _guard = self.lock()?;
        let mut templates = self.load_for_write()?;
        let before = templates.len();
        templates.retain(|t| t.id != id);
        if templates.len() == before {
            return Ok(false);
        }
        self.save(&templates)?;
        debug!(id, "deleted template");
        Ok(true)
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, ()>> {
        self.write_lock
            .lock()
            .map_err(|e| StoreError::Unavailable(format!("lock poisoned: {e}")))
    }

    fn load_for_write(&self) -> StoreResult<Vec<Template>> {
        match self.try_get_all() {
            Err(e) if e.is_corrupt() => {
                self.observer.on_error(TEMPLATES_KEY, &e);
                Ok(Vec::new())
            }
            other => other,
        }
    }

    fn save(&self, templates: &[Template]) -> StoreResult<()> {
        let bytes = encode_list(templates)?;
        self.kv.set(TEMPLATES_KEY, &bytes)
    }

    fn report<T>(&self, result: StoreResult<T>) -> Option<T> {
        result
            .map_err(|e| self.observer.on_error(TEMPLATES_KEY, &e))
            .ok()
    }
}

impl std::fmt::Debug for TemplateStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateStore").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryKvStore;
    use popt_types::DEFAULT_TEMPLATE_IDS;

    fn store() -> (Arc<InMemoryKvStore>, TemplateStore) {
        let kv = Arc::new(InMemoryKvStore::new());
        (kv.clone(), TemplateStore::new(kv))
    }

    fn ids(templates: &[Template]) -> Vec<String> {
        templates.iter().map(|t| t.id.clone()).collect()
    }

    #[test]
    fn unwritten_store_returns_seeds() {
        let (kv, store) = store();
        assert_eq!(ids(&store.get_all()), DEFAULT_TEMPLATE_IDS);
        assert!(!kv.contains(TEMPLATES_KEY).unwrap());
    }

    #[test]
    fn first_save_persists_seeds_plus_new() {
        let (kv, store) = store();
        let t = Template::new("Template 5", "Summarize [text]", Timestamp::now());
        assert!(store.upsert(&t));
        assert!(kv.contains(TEMPLATES_KEY).unwrap());

        let all = store.get_all();
        assert_eq!(all.len(), 5);
        assert_eq!(all[4], t);
    }

    #[test]
    fn upsert_replaces_in_place() {
        let (_, store) = store();
        let mut t = Template::new("Mine", "v1", Timestamp::now());
        store.upsert(&t);
        t.content = "v2".into();
        assert!(store.try_upsert(&t).unwrap());
        let all = store.get_all();
        assert_eq!(all.len(), 5);
        assert_eq!(all[4].content, "v2");
    }

    #[test]
    fn deleting_every_template_leaves_empty_list() {
        let (_, store) = store();
        for id in DEFAULT_TEMPLATE_IDS {
            assert!(store.delete(id));
        }
        assert!(store.get_all().is_empty());
    }

    #[test]
    fn delete_missing_succeeds() {
        let (_, store) = store();
        assert!(store.delete("nope"));
        assert!(!store.try_delete("nope").unwrap());
        assert_eq!(store.get_all().len(), 4);
    }

    #[test]
    fn delete_missing_leaves_seeds_unwritten() {
        let (kv, store) = store();
        assert!(!store.try_delete("nope").unwrap());
        assert!(!kv.contains(TEMPLATES_KEY).unwrap());

        assert!(store.try_delete("default-code").unwrap());
        assert!(kv.contains(TEMPLATES_KEY).unwrap());
    }

    #[test]
    fn corrupt_document_reads_as_empty() {
        let (kv, store) = store();
        kv.set(TEMPLATES_KEY, b"not json").unwrap();
        assert!(store.get_all().is_empty());
    }

    #[test]
    fn get_finds_seed_by_id() {
        let (_, store) = store();
        let t = store.get("default-email").unwrap();
        assert_eq!(t.name, "Email Draft");
    }
}
