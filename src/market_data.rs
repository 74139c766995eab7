//!
//! Market data collaborators
//! -------------------------
//! Read-only data that lives outside the directory: per-day valuation ("bubble")
//! snapshots and dated market events. The directory never depends on these; the HTTP
//! layer exposes them on their own endpoints and maps any failure to an internal error.

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Per-day valuation snapshot of one security.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BubbleSnapshot {
    pub record_id: String,
    pub symbol: String,
    pub trading_date: String,
    pub market_cap: i64,
    pub beta_factor: f64,
    pub traded_amount: f64,
    pub traded_qty: f64,
    pub turnover_rate: f64,
    pub top_price: f64,
    pub bottom_price: f64,
    pub pe_ratio: f64,
    pub pb_ratio: f64,
    pub avg_price: f64,
    /// Date of the financial report the ratios are based on.
    pub fr_date: String,
}

/// A dated market event with its tags and expected impact.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct MarketEvent {
    pub event_id: String,
    pub tags: String,
    pub event: String,
    pub notes: String,
    pub impact: String,
    pub begin_time: i64,
    pub end_time: i64,
}

pub trait MarketDataSource: Send + Sync {
    /// Snapshots recorded for the security referenced by `sec_ref_id`.
    fn bubble_snapshots(&self, sec_ref_id: &str) -> anyhow::Result<Vec<BubbleSnapshot>>;
    /// At most `limit` events.
    fn events(&self, limit: usize) -> anyhow::Result<Vec<MarketEvent>>;
}

/// Market data served from a JSON fixture document, or nothing at all.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FixtureMarketData {
    pub bubble_snapshots: Vec<BubbleSnapshot>,
    pub events: Vec<MarketEvent>,
}

impl FixtureMarketData {
    pub fn empty() -> Self { Self::default() }

    pub fn from_json_str(s: &str) -> anyhow::Result<Self> {
        serde_json::from_str(s).context("parsing market data fixture")
    }

    pub fn from_path(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading market data fixture {}", path.display()))?;
        let data = Self::from_json_str(&text)
            .with_context(|| format!("in fixture file {}", path.display()))?;
        info!(
            target: "startup",
            snapshots = data.bubble_snapshots.len(),
            events = data.events.len(),
            "loaded market data fixture from {}",
            path.display()
        );
        Ok(data)
    }
}

impl MarketDataSource for FixtureMarketData {
    fn bubble_snapshots(&self, sec_ref_id: &str) -> anyhow::Result<Vec<BubbleSnapshot>> {
        Ok(self
            .bubble_snapshots
            .iter()
            .filter(|s| s.symbol.eq_ignore_ascii_case(sec_ref_id))
            .cloned()
            .collect())
    }

    fn events(&self, limit: usize) -> anyhow::Result<Vec<MarketEvent>> {
        Ok(self.events.iter().take(limit).cloned().collect())
    }
}
