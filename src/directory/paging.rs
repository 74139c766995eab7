use serde::Serialize;

use super::types::Security;

/// Stable ascending sort by symbol; equal symbols keep their incoming order.
pub fn sort_by_symbol(items: &mut [Security]) {
    items.sort_by(|a, b| a.symbol.cmp(&b.symbol));
}

/// One page of a filtered, sorted result set.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Number of matches before pagination.
    pub total: usize,
    pub page: usize,
    pub limit: usize,
}

/// Slice `items` into the 1-indexed `page` of size `limit`. Pages past the end are empty;
/// `total` is always the full length.
pub fn paginate<T>(items: Vec<T>, page: usize, limit: usize) -> Page<T> {
    let total = items.len();
    let start = page.saturating_sub(1).saturating_mul(limit);
    let items = if start >= total {
        Vec::new()
    } else {
        let end = start.saturating_add(limit).min(total);
        items.into_iter().skip(start).take(end - start).collect()
    };
    Page { items, total, page, limit }
}
