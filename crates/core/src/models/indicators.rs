use serde::{Deserialize, Serialize};

/// Direction of the latest close relative to the short SMA.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trend {
    Up,
    Down,
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Trend::Up => write!(f, "Up"),
            Trend::Down => write!(f, "Down"),
        }
    }
}

/// Scalar indicators derived from one `PriceSeries`.
///
/// Fields that need more history than the series has are `None` rather
/// than NaN, so they can be rendered as "n/a" and never leak into prompts
/// as numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSet {
    pub current_close: f64,
    pub mean_close: f64,
    /// Sample standard deviation of close (N − 1). Needs two bars.
    pub stddev_close: Option<f64>,
    pub mean_volume: f64,
    /// Simple moving average over `sma_window` closes.
    pub sma: Option<f64>,
    pub sma_window: usize,
    /// RSI over `rsi_period` deltas. Needs `rsi_period + 1` bars.
    pub rsi: Option<f64>,
    pub rsi_period: usize,
    pub trend: Option<Trend>,
    /// `stddev / mean × 100`.
    pub volatility_pct: Option<f64>,
}

impl IndicatorSet {
    /// Percentage distance of the latest close from the SMA.
    pub fn close_vs_sma_pct(&self) -> Option<f64> {
        self.sma
            .filter(|sma| *sma != 0.0)
            .map(|sma| (self.current_close / sma - 1.0) * 100.0)
    }
}
