use std::str::FromStr;

use crate::error::ApiError;
use crate::pagination::{clamp_page, page_slice, total_pages};
use crate::resource::{Resource, ResourceAdapter};

/// What happens to the page index when the filtered list shrinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PagePolicy {
    /// Keep the active page within `1..=max(1, total_pages)` after every change.
    #[default]
    Clamp,
    /// Never revalidate the page index; a delete can leave the view on an empty page.
    Unclamped,
}

impl FromStr for PagePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "clamp" => Ok(PagePolicy::Clamp),
            "unclamped" | "legacy" => Ok(PagePolicy::Unclamped),
            other => Err(format!("Invalid page policy '{}'", other)),
        }
    }
}

/// Canonical list of one remote collection plus the search/page state of the
/// screen showing it.
///
/// The canonical list is a cache: it is only ever replaced by `load` or patched
/// with the server's answer to a successful mutation. The filtered view and the
/// current page are derived from it on demand, so they can never disagree
/// with it. Mutations borrow the controller mutably, which keeps at most one
/// request in flight per controller.
pub struct ListView<R: Resource, A: ResourceAdapter<R>> {
    adapter: A,
    records: Vec<R>,
    search_term: String,
    page: usize,
    page_size: usize,
    policy: PagePolicy,
}

impl<R: Resource, A: ResourceAdapter<R>> ListView<R, A> {
    pub fn new(adapter: A) -> Self {
        Self {
            adapter,
            records: Vec::new(),
            search_term: String::new(),
            page: 1,
            page_size: R::PAGE_SIZE,
            policy: PagePolicy::default(),
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn with_policy(mut self, policy: PagePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    /// Replaces the canonical list with a fresh fetch. On failure the previous
    /// list, search term and page are kept.
    pub async fn load(&mut self) -> Result<(), ApiError> {
        match self.adapter.fetch_all().await {
            Ok(records) => {
                tracing::debug!(collection = R::COLLECTION, count = records.len(), "list loaded");
                self.records = records;
                self.page = 1;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(collection = R::COLLECTION, error = %e, "failed to load list");
                Err(e)
            }
        }
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
        self.page = 1;
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = match self.policy {
            PagePolicy::Clamp => clamp_page(page, self.filtered_len(), self.page_size),
            PagePolicy::Unclamped => page,
        };
    }

    pub fn next_page(&mut self) {
        let last = self.total_pages().max(1);
        self.page = (self.page + 1).min(last);
    }

    pub fn prev_page(&mut self) {
        self.page = self.page.saturating_sub(1).max(1);
    }

    /// Appends the server's record. A record whose id is already cached is
    /// replaced instead, so an id never appears twice.
    pub async fn create(&mut self, draft: &R::Draft) -> Result<R, ApiError> {
        let created = self.adapter.create(draft).await.inspect_err(|e| {
            tracing::warn!(collection = R::COLLECTION, error = %e, "failed to create record");
        })?;

        match self.position(created.id()) {
            Some(idx) => self.records[idx] = created.clone(),
            None => self.records.push(created.clone()),
        }
        self.after_change();
        Ok(created)
    }

    pub async fn update(&mut self, id: i64, patch: &R::Patch) -> Result<R, ApiError> {
        let updated = self.adapter.update(id, patch).await.inspect_err(|e| {
            tracing::warn!(collection = R::COLLECTION, id, error = %e, "failed to update record");
        })?;

        match self.position(id) {
            Some(idx) => self.records[idx] = updated.clone(),
            None => tracing::debug!(collection = R::COLLECTION, id, "updated record not cached"),
        }
        self.after_change();
        Ok(updated)
    }

    pub async fn delete(&mut self, id: i64) -> Result<(), ApiError> {
        self.adapter.delete(id).await.inspect_err(|e| {
            tracing::warn!(collection = R::COLLECTION, id, error = %e, "failed to delete record");
        })?;

        self.records.retain(|record| record.id() != id);
        self.after_change();
        Ok(())
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn get(&self, id: i64) -> Option<&R> {
        self.records.iter().find(|record| record.id() == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Canonical records matching the search term, in canonical order.
    pub fn filtered(&self) -> Vec<&R> {
        let needle = self.search_term.to_lowercase();
        self.records
            .iter()
            .filter(|record| record.matches(&needle))
            .collect()
    }

    pub fn current_items(&self) -> Vec<&R> {
        let filtered = self.filtered();
        page_slice(&filtered, self.page, self.page_size).to_vec()
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.filtered_len(), self.page_size)
    }

    pub fn current_page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn policy(&self) -> PagePolicy {
        self.policy
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    fn filtered_len(&self) -> usize {
        let needle = self.search_term.to_lowercase();
        self.records
            .iter()
            .filter(|record| record.matches(&needle))
            .count()
    }

    fn position(&self, id: i64) -> Option<usize> {
        self.records.iter().position(|record| record.id() == id)
    }

    fn after_change(&mut self) {
        if self.policy == PagePolicy::Clamp {
            self.page = clamp_page(self.page, self.filtered_len(), self.page_size);
        }
    }
}
