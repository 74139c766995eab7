//! Demo catalogue loaded at startup when seeding is enabled.

use super::types::SecurityRequest;

struct DemoSecurity {
    symbol: &'static str,
    name: &'static str,
    price: f64,
    change: f64,
    change_percent: f64,
    volume: i64,
    market_cap: i64,
    sector: &'static str,
}

const DEMO: &[DemoSecurity] = &[
    DemoSecurity { symbol: "AAPL", name: "Apple Inc.", price: 175.43, change: 2.15, change_percent: 1.24, volume: 45_678_900, market_cap: 2_750_000_000_000, sector: "Technology" },
    DemoSecurity { symbol: "MSFT", name: "Microsoft Corporation", price: 378.85, change: -1.25, change_percent: -0.33, volume: 23_456_700, market_cap: 2_810_000_000_000, sector: "Technology" },
    DemoSecurity { symbol: "GOOGL", name: "Alphabet Inc.", price: 142.56, change: 3.42, change_percent: 2.46, volume: 18_923_400, market_cap: 1_780_000_000_000, sector: "Technology" },
    DemoSecurity { symbol: "TSLA", name: "Tesla, Inc.", price: 248.12, change: -5.67, change_percent: -2.23, volume: 67_890_100, market_cap: 789_000_000_000, sector: "Automotive" },
    DemoSecurity { symbol: "AMZN", name: "Amazon.com, Inc.", price: 155.78, change: 1.89, change_percent: 1.23, volume: 34_567_800, market_cap: 1_620_000_000_000, sector: "Consumer Discretionary" },
    DemoSecurity { symbol: "NVDA", name: "NVIDIA Corporation", price: 875.34, change: 12.45, change_percent: 1.44, volume: 45_678_900, market_cap: 2_150_000_000_000, sector: "Technology" },
    DemoSecurity { symbol: "META", name: "Meta Platforms, Inc.", price: 485.67, change: -2.34, change_percent: -0.48, volume: 23_456_700, market_cap: 1_230_000_000_000, sector: "Technology" },
    DemoSecurity { symbol: "JPM", name: "JPMorgan Chase & Co.", price: 198.45, change: 0.78, change_percent: 0.39, volume: 12_345_600, market_cap: 580_000_000_000, sector: "Financial Services" },
];

/// The demo securities as create requests. All of them start out as favorites.
pub fn demo_requests() -> Vec<SecurityRequest> {
    DEMO.iter()
        .map(|d| SecurityRequest {
            symbol: d.symbol.to_string(),
            name: d.name.to_string(),
            price: d.price,
            change: d.change,
            change_percent: d.change_percent,
            volume: d.volume,
            market_cap: d.market_cap,
            sector: d.sector.to_string(),
        })
        .collect()
}
