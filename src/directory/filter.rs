use super::types::{SearchCriteria, Security};

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// True when `security` satisfies every criterion that is set. Unset criteria never filter.
pub fn matches(security: &Security, criteria: &SearchCriteria) -> bool {
    if let Some(symbol) = criteria.symbol.as_deref() {
        if !contains_ci(&security.symbol, symbol) { return false; }
    }
    if let Some(name) = criteria.name.as_deref() {
        if !contains_ci(&security.name, name) { return false; }
    }
    if let Some(min) = criteria.min_price {
        if security.price < min { return false; }
    }
    if let Some(max) = criteria.max_price {
        if security.price > max { return false; }
    }
    if let Some(sector) = criteria.sector.as_deref() {
        if !contains_ci(&security.sector, sector) { return false; }
    }
    if let Some(fav) = criteria.is_favorite {
        if security.is_favorite != fav { return false; }
    }
    true
}
