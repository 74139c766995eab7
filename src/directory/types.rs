//! Directory data contracts: the security record, its create/update payload and the
//! search criteria value object. Keep this module about types, serde and light helpers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DirectoryError, DirectoryResult};

pub const DEFAULT_PAGE: usize = 1;
pub const DEFAULT_LIMIT: usize = 10;

/// One tradable security held by the directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Security {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub price: f64,
    pub change: f64,
    pub change_percent: f64,
    pub volume: i64,
    pub market_cap: i64,
    pub sector: String,
    pub is_favorite: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Security {
    /// Build a fresh, non-favorite record from a validated request.
    pub(crate) fn from_request(id: String, req: SecurityRequest, now: DateTime<Utc>) -> Self {
        Self {
            id,
            symbol: req.symbol,
            name: req.name,
            price: req.price,
            change: req.change,
            change_percent: req.change_percent,
            volume: req.volume,
            market_cap: req.market_cap,
            sector: req.sector,
            is_favorite: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrite every mutable field. `id`, `created_at` and `is_favorite` are kept.
    pub(crate) fn apply(&mut self, req: SecurityRequest, now: DateTime<Utc>) {
        self.symbol = req.symbol;
        self.name = req.name;
        self.price = req.price;
        self.change = req.change;
        self.change_percent = req.change_percent;
        self.volume = req.volume;
        self.market_cap = req.market_cap;
        self.sector = req.sector;
        self.touch(now);
    }

    /// Advance `updated_at`, never moving it backwards.
    pub(crate) fn touch(&mut self, now: DateTime<Utc>) {
        if now > self.updated_at {
            self.updated_at = now;
        }
    }
}

/// Payload for create and update. Missing fields deserialize to their zero value so
/// that absent required fields surface as validation errors, not decode errors.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct SecurityRequest {
    pub symbol: String,
    pub name: String,
    pub price: f64,
    pub change: f64,
    pub change_percent: f64,
    pub volume: i64,
    pub market_cap: i64,
    pub sector: String,
}

impl SecurityRequest {
    /// Check required fields and ranges, reporting every problem at once.
    pub fn validate(&self) -> DirectoryResult<()> {
        let mut problems = Vec::new();
        if self.symbol.trim().is_empty() { problems.push("symbol is required".to_string()); }
        if self.name.trim().is_empty() { problems.push("name is required".to_string()); }
        if self.sector.trim().is_empty() { problems.push("sector is required".to_string()); }
        if !self.price.is_finite() || self.price < 0.0 {
            problems.push("price must be a non-negative number".to_string());
        }
        if self.volume < 0 { problems.push("volume must be non-negative".to_string()); }
        if self.market_cap < 0 { problems.push("marketCap must be non-negative".to_string()); }
        if problems.is_empty() { Ok(()) } else { Err(DirectoryError::Validation(problems)) }
    }
}

/// Body of the favorite toggle endpoint. `security_id` is accepted for compatibility;
/// the id in the path is the one acted upon.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteRequest {
    #[serde(default)]
    pub security_id: Option<String>,
    #[serde(default)]
    pub is_favorite: bool,
}

/// Optional filter and pagination parameters of a search.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchCriteria {
    pub symbol: Option<String>,
    pub name: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub sector: Option<String>,
    pub is_favorite: Option<bool>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl SearchCriteria {
    /// Blank substring criteria mean "no filter" rather than "match the empty string".
    pub fn normalized(mut self) -> Self {
        fn blank_to_none(v: Option<String>) -> Option<String> {
            v.filter(|s| !s.trim().is_empty())
        }
        self.symbol = blank_to_none(self.symbol);
        self.name = blank_to_none(self.name);
        self.sector = blank_to_none(self.sector);
        self
    }

    /// Page number to serve; unset or non-positive falls back to the first page.
    pub fn page_or_default(&self) -> usize {
        match self.page {
            Some(p) if p > 0 => p as usize,
            _ => DEFAULT_PAGE,
        }
    }

    /// Page size to serve; unset or non-positive falls back to the default size.
    pub fn limit_or_default(&self) -> usize {
        match self.limit {
            Some(l) if l > 0 => l as usize,
            _ => DEFAULT_LIMIT,
        }
    }

    pub fn favorites_only(mut self) -> Self {
        self.is_favorite = Some(true);
        self
    }
}
