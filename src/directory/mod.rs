//! In-memory securities directory: the store, the filter/sort/paginate pipeline and the
//! service that orchestrates them. Keep the public surface thin; implementation lives in
//! the sub-modules.

mod filter;
mod paging;
mod seed;
mod service;
mod store;
mod types;

#[cfg(test)]
mod concurrency_tests;

pub use filter::matches;
pub use paging::{paginate, sort_by_symbol, Page};
pub use seed::demo_requests;
pub use service::DirectoryService;
pub use store::SecurityStore;
pub use types::{FavoriteRequest, SearchCriteria, Security, SecurityRequest, DEFAULT_LIMIT, DEFAULT_PAGE};
