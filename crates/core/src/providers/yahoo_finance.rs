use async_trait::async_trait;
use tracing::debug;

use crate::errors::CoreError;
use crate::models::price::{Lookback, PriceBar, PriceSeries};
use super::traits::MarketDataProvider;

const PROVIDER: &str = "Yahoo Finance";

/// Yahoo Finance market data provider for stock/equity history.
///
/// - **Free**: No API key required.
/// - **No strict rate limits** (unofficial public API).
/// - **Coverage**: Global equities, ETFs, indices, mutual funds.
/// - **Data**: Daily OHLCV bars over a named range (`1mo`, `3mo`, ...).
///
/// Uses the `yahoo_finance_api` crate which wraps Yahoo Finance's
/// public chart endpoint.
pub struct YahooFinanceProvider {
    connector: yahoo_finance_api::YahooConnector,
}

impl YahooFinanceProvider {
    pub fn new() -> Result<Self, CoreError> {
        let connector = yahoo_finance_api::YahooConnector::new()
            .map_err(|e| CoreError::Api {
                provider: PROVIDER.into(),
                message: format!("Failed to create connector: {e}"),
            })?;
        Ok(Self { connector })
    }
}

#[async_trait]
impl MarketDataProvider for YahooFinanceProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn get_history(
        &self,
        ticker: &str,
        lookback: Lookback,
    ) -> Result<PriceSeries, CoreError> {
        let resp = self
            .connector
            .get_quote_range(ticker, "1d", lookback.as_range())
            .await
            .map_err(|e| CoreError::Api {
                provider: PROVIDER.into(),
                message: format!("Failed to fetch {lookback} history for {ticker}: {e}"),
            })?;

        let quotes = resp.quotes().map_err(|e| CoreError::Api {
            provider: PROVIDER.into(),
            message: format!("Failed to parse quotes for {ticker}: {e}"),
        })?;

        // Yahoo pads gaps with zeroed rows; a zero close is never a real print.
        let bars: Vec<PriceBar> = quotes
            .iter()
            .filter(|q| q.close.is_finite() && q.close > 0.0)
            .map(|q| PriceBar {
                timestamp: q.timestamp as i64,
                open: q.open,
                high: q.high,
                low: q.low,
                close: q.close,
                volume: q.volume as u64,
            })
            .collect();

        debug!(ticker, rows = bars.len(), "fetched history");
        Ok(PriceSeries::new(ticker, bars))
    }
}
