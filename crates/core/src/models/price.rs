use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// How far back a history request reaches.
///
/// Interactive actions always use `OneMonth`; the longer windows exist for
/// hosts that want more context on a chart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Lookback {
    #[default]
    OneMonth,
    ThreeMonths,
    SixMonths,
    OneYear,
}

impl Lookback {
    /// Range string understood by the chart endpoint of the market data provider.
    pub fn as_range(&self) -> &'static str {
        match self {
            Lookback::OneMonth => "1mo",
            Lookback::ThreeMonths => "3mo",
            Lookback::SixMonths => "6mo",
            Lookback::OneYear => "1y",
        }
    }
}

impl std::fmt::Display for Lookback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_range())
    }
}

/// One trading day of OHLCV data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    /// Unix timestamp (seconds) of the bar's open.
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl PriceBar {
    /// Calendar date (UTC) of this bar, if the timestamp is representable.
    pub fn date(&self) -> Option<NaiveDate> {
        chrono::DateTime::from_timestamp(self.timestamp, 0).map(|dt| dt.date_naive())
    }
}

/// A time-ordered daily price/volume history for one ticker.
///
/// Immutable once built: bars are sorted ascending by timestamp on
/// construction and never touched again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    ticker: String,
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    /// Build a series, uppercasing the ticker and sorting bars by timestamp.
    pub fn new(ticker: impl Into<String>, mut bars: Vec<PriceBar>) -> Self {
        bars.sort_by_key(|b| b.timestamp);
        Self {
            ticker: ticker.into().to_uppercase(),
            bars,
        }
    }

    /// Convenience for tests and synthetic data: one bar per close, one day apart.
    pub fn from_closes(ticker: impl Into<String>, closes: &[f64]) -> Self {
        const DAY: i64 = 86_400;
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| PriceBar {
                timestamp: i as i64 * DAY,
                open: close,
                high: close,
                low: close,
                close,
                volume: 0,
            })
            .collect();
        Self::new(ticker, bars)
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Closing prices, oldest first.
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// Volumes as floats, oldest first.
    pub fn volumes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.volume as f64).collect()
    }

    /// Most recent close.
    pub fn last_close(&self) -> Option<f64> {
        self.bars.last().map(|b| b.close)
    }
}
