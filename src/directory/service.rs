use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use super::filter::matches;
use super::paging::{paginate, sort_by_symbol, Page};
use super::seed::demo_requests;
use super::store::SecurityStore;
use super::types::{SearchCriteria, Security, SecurityRequest};
use crate::error::{DirectoryError, DirectoryResult};

/// Orchestrates search and single-record mutations over a [`SecurityStore`].
///
/// This is the only surface the HTTP layer talks to. All operations are synchronous and
/// bounded by the size of the in-memory collection.
#[derive(Clone, Default)]
pub struct DirectoryService {
    store: SecurityStore,
}

impl DirectoryService {
    pub fn new(store: SecurityStore) -> Self { Self { store } }

    /// A directory preloaded with the demo catalogue, every entry marked favorite.
    pub fn with_demo_data() -> DirectoryResult<Self> {
        let svc = Self::default();
        for req in demo_requests() {
            let created = svc.create(req)?;
            svc.toggle_favorite(&created.id, true)?;
        }
        info!(target: "startup", count = svc.store.len(), "seeded demo securities");
        Ok(svc)
    }

    pub fn store(&self) -> &SecurityStore { &self.store }

    /// Filter, sort by symbol, then paginate. Never fails; no matches yields an empty page.
    pub fn search(&self, criteria: &SearchCriteria) -> Page<Security> {
        let criteria = criteria.clone().normalized();
        let mut hits: Vec<Security> = self
            .store
            .list()
            .into_iter()
            .filter(|s| matches(s, &criteria))
            .collect();
        sort_by_symbol(&mut hits);
        let page = paginate(hits, criteria.page_or_default(), criteria.limit_or_default());
        debug!(
            target: "bourse::directory",
            total = page.total,
            page = page.page,
            limit = page.limit,
            returned = page.items.len(),
            "search"
        );
        page
    }

    /// Same as [`search`](Self::search) with the favorite filter forced on.
    pub fn list_favorites(&self, criteria: &SearchCriteria) -> Page<Security> {
        self.search(&criteria.clone().favorites_only())
    }

    pub fn get(&self, id: &str) -> DirectoryResult<Security> {
        self.store.get(id)
    }

    pub fn create(&self, req: SecurityRequest) -> DirectoryResult<Security> {
        req.validate()?;
        let security = Security::from_request(Uuid::new_v4().to_string(), req, Utc::now());
        self.store.put(security.clone());
        info!(target: "bourse::directory", id = %security.id, symbol = %security.symbol, "security created");
        Ok(security)
    }

    /// Replace every mutable field. Validated the same way as [`create`](Self::create).
    pub fn update(&self, id: &str, req: SecurityRequest) -> DirectoryResult<Security> {
        // Existence first so an unknown id reports NotFound even with a bad payload.
        if !self.store.contains(id) {
            return Err(DirectoryError::not_found(id));
        }
        req.validate()?;
        let updated = self.store.update(id, |s| s.apply(req, Utc::now()))?;
        info!(target: "bourse::directory", id = %updated.id, symbol = %updated.symbol, "security updated");
        Ok(updated)
    }

    pub fn delete(&self, id: &str) -> DirectoryResult<()> {
        self.store.delete(id)?;
        info!(target: "bourse::directory", id = %id, "security deleted");
        Ok(())
    }

    /// Set the favorite flag. Repeating the same value is harmless but still advances
    /// `updated_at`.
    pub fn toggle_favorite(&self, id: &str, value: bool) -> DirectoryResult<Security> {
        let updated = self.store.update(id, |s| {
            s.is_favorite = value;
            s.touch(Utc::now());
        })?;
        info!(target: "bourse::directory", id = %updated.id, favorite = value, "favorite updated");
        Ok(updated)
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod service_tests;
