//! Lenient query-string binding for search endpoints. A value that does not parse is
//! treated as if it had not been sent.

use std::collections::HashMap;

use crate::directory::SearchCriteria;

/// Boolean spellings accepted on the query string.
fn parse_bool(s: &str) -> Option<bool> {
    match s.trim() {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

fn text(params: &HashMap<String, String>, key: &str) -> Option<String> {
    params.get(key).filter(|v| !v.is_empty()).cloned()
}

fn price(params: &HashMap<String, String>, key: &str) -> Option<f64> {
    params.get(key).and_then(|v| v.trim().parse::<f64>().ok()).filter(|p| p.is_finite())
}

fn positive(params: &HashMap<String, String>, key: &str) -> Option<i64> {
    params.get(key).and_then(|v| v.trim().parse::<i64>().ok()).filter(|n| *n > 0)
}

pub(crate) fn criteria_from_query(params: &HashMap<String, String>) -> SearchCriteria {
    SearchCriteria {
        symbol: text(params, "symbol"),
        name: text(params, "name"),
        min_price: price(params, "minPrice"),
        max_price: price(params, "maxPrice"),
        sector: text(params, "sector"),
        is_favorite: params.get("isFavorite").and_then(|v| parse_bool(v)),
        page: positive(params, "page"),
        limit: positive(params, "limit"),
    }
}
