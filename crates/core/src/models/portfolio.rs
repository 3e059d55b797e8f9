use serde::{Deserialize, Serialize};

/// A ticker being watched in the portfolio, with its last known price.
///
/// Created by an explicit add, its price is rewritten by the refresh
/// scheduler, and it is gone after an explicit remove.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioEntry {
    /// Ticker symbol, uppercased (e.g., "AAPL")
    pub ticker: String,
    pub last_price: f64,
    pub shares: u32,
}

impl PortfolioEntry {
    pub fn new(ticker: impl Into<String>, last_price: f64, shares: u32) -> Self {
        Self {
            ticker: ticker.into().to_uppercase(),
            last_price,
            shares,
        }
    }

    /// Market value of the holding at the last known price.
    pub fn value(&self) -> f64 {
        self.last_price * f64::from(self.shares)
    }
}
