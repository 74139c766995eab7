use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use super::types::Security;
use crate::error::{DirectoryError, DirectoryResult};

#[derive(Debug)]
struct Slot {
    /// Insertion sequence; `list` enumerates in this order.
    seq: u64,
    security: Security,
}

#[derive(Debug, Default)]
struct Inner {
    records: HashMap<String, Slot>,
    next_seq: u64,
}

/// The authoritative in-memory collection of securities keyed by id.
///
/// Cloning is cheap and yields a handle to the same collection. Every operation takes
/// the lock exactly once, so a concurrent `list` sees either the state before or the
/// state after any single mutation.
#[derive(Clone, Default)]
pub struct SecurityStore {
    inner: Arc<RwLock<Inner>>,
}

impl SecurityStore {
    pub fn new() -> Self { Self::default() }

    pub fn get(&self, id: &str) -> DirectoryResult<Security> {
        self.inner
            .read()
            .records
            .get(id)
            .map(|slot| slot.security.clone())
            .ok_or_else(|| DirectoryError::not_found(id))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.inner.read().records.contains_key(id)
    }

    /// Insert or replace by id. A replaced record keeps its enumeration position.
    pub fn put(&self, security: Security) {
        let mut w = self.inner.write();
        if let Some(slot) = w.records.get_mut(&security.id) {
            slot.security = security;
            return;
        }
        let seq = w.next_seq;
        w.next_seq += 1;
        w.records.insert(security.id.clone(), Slot { seq, security });
    }

    /// Read-modify-write of one record under a single write lock.
    pub fn update<F>(&self, id: &str, f: F) -> DirectoryResult<Security>
    where
        F: FnOnce(&mut Security),
    {
        let mut w = self.inner.write();
        let slot = w.records.get_mut(id).ok_or_else(|| DirectoryError::not_found(id))?;
        f(&mut slot.security);
        Ok(slot.security.clone())
    }

    pub fn delete(&self, id: &str) -> DirectoryResult<()> {
        match self.inner.write().records.remove(id) {
            Some(_) => Ok(()),
            None => Err(DirectoryError::not_found(id)),
        }
    }

    /// Snapshot of every record in insertion order.
    pub fn list(&self) -> Vec<Security> {
        let r = self.inner.read();
        let mut slots: Vec<&Slot> = r.records.values().collect();
        slots.sort_by_key(|slot| slot.seq);
        slots.into_iter().map(|slot| slot.security.clone()).collect()
    }

    pub fn len(&self) -> usize { self.inner.read().records.len() }
    pub fn is_empty(&self) -> bool { self.inner.read().records.is_empty() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sec(id: &str, symbol: &str) -> Security {
        let now = Utc::now();
        Security {
            id: id.to_string(),
            symbol: symbol.to_string(),
            name: format!("{symbol} Corp"),
            price: 10.0,
            change: 0.0,
            change_percent: 0.0,
            volume: 0,
            market_cap: 0,
            sector: "Technology".to_string(),
            is_favorite: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn put_get_delete_roundtrip() {
        let store = SecurityStore::new();
        store.put(sec("a", "AAA"));
        assert_eq!(store.get("a").unwrap().symbol, "AAA");
        store.delete("a").unwrap();
        assert!(matches!(store.get("a"), Err(DirectoryError::NotFound { .. })));
        assert!(store.is_empty());
    }

    #[test]
    fn delete_missing_reports_not_found() {
        let store = SecurityStore::new();
        store.put(sec("a", "AAA"));
        let err = store.delete("nope").unwrap_err();
        assert_eq!(err.to_string(), "security with ID nope not found");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn list_enumerates_in_insertion_order_and_replace_keeps_position() {
        let store = SecurityStore::new();
        store.put(sec("3", "CCC"));
        store.put(sec("1", "AAA"));
        store.put(sec("2", "BBB"));
        store.put(sec("3", "ZZZ"));
        let ids: Vec<String> = store.list().into_iter().map(|s| s.id).collect();
        assert_eq!(ids, vec!["3", "1", "2"]);
        assert_eq!(store.get("3").unwrap().symbol, "ZZZ");
    }

    #[test]
    fn update_applies_closure_atomically() {
        let store = SecurityStore::new();
        store.put(sec("a", "AAA"));
        let updated = store.update("a", |s| s.is_favorite = true).unwrap();
        assert!(updated.is_favorite);
        assert!(store.get("a").unwrap().is_favorite);
        assert!(store.update("missing", |s| s.is_favorite = true).is_err());
    }

    #[test]
    fn contains_tracks_membership() {
        let store = SecurityStore::new();
        assert!(!store.contains("a"));
        store.put(sec("a", "AAA"));
        assert!(store.contains("a"));
        store.delete("a").unwrap();
        assert!(!store.contains("a"));
    }

    #[test]
    fn concurrent_writers_do_not_lose_records() {
        let store = SecurityStore::new();
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for i in 0..50 {
                        store.put(sec(&format!("{t}-{i}"), "SYM"));
                        let _ = store.list();
                    }
                })
            })
            .collect();
        for h in handles { h.join().unwrap(); }
        assert_eq!(store.len(), 400);
    }
}
