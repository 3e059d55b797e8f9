use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single data point for price chart rendering.
///
/// The core computes the numbers; the frontend only draws them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    /// Trading day of the bar
    pub date: NaiveDate,

    /// Closing price that day
    pub close: f64,

    /// Rolling SMA ending at this bar; `None` while history is shorter than the window
    pub sma: Option<f64>,
}

/// Chart-ready series for one ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceChart {
    pub ticker: String,
    pub sma_window: usize,
    pub points: Vec<ChartPoint>,
}
