use std::sync::Arc;
use tracing::{instrument, warn};

use crate::errors::CoreError;
use crate::models::price::{Lookback, PriceSeries};
use crate::providers::traits::MarketDataProvider;

/// Normalize user input into a ticker symbol: trimmed and uppercased.
///
/// Rejects empty input before any network call is made.
pub fn normalize_ticker(ticker: &str) -> Result<String, CoreError> {
    let ticker = ticker.trim();
    if ticker.is_empty() {
        return Err(CoreError::ValidationError(
            "Please enter a ticker symbol!".into(),
        ));
    }
    Ok(ticker.to_uppercase())
}

/// Fetches price history and collapses every failure into `DataNotFound`.
///
/// Cheap to clone; the UI-facing facade and the refresh scheduler share
/// one instance.
#[derive(Clone)]
pub struct MarketDataSource {
    provider: Arc<dyn MarketDataProvider>,
}

impl MarketDataSource {
    pub fn new(provider: Arc<dyn MarketDataProvider>) -> Self {
        Self { provider }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Fetch a non-empty series for `ticker`.
    ///
    /// Provider errors and empty responses both come back as
    /// `CoreError::DataNotFound`; the underlying cause is only logged.
    /// No retry.
    #[instrument(skip(self), fields(provider = self.provider.name()))]
    pub async fn fetch(&self, ticker: &str, lookback: Lookback) -> Result<PriceSeries, CoreError> {
        let ticker = normalize_ticker(ticker)?;

        match self.provider.get_history(&ticker, lookback).await {
            Ok(series) if !series.is_empty() => Ok(series),
            Ok(_) => {
                warn!(%ticker, "provider returned no rows");
                Err(CoreError::DataNotFound { ticker })
            }
            Err(e) => {
                warn!(%ticker, error = %e, "history fetch failed");
                Err(CoreError::DataNotFound { ticker })
            }
        }
    }

    /// Latest close for `ticker`, used by portfolio add and refresh.
    pub async fn latest_close(&self, ticker: &str, lookback: Lookback) -> Result<f64, CoreError> {
        let series = self.fetch(ticker, lookback).await?;
        series
            .last_close()
            .filter(|p| p.is_finite())
            .ok_or_else(|| CoreError::DataNotFound {
                ticker: series.ticker().to_string(),
            })
    }
}
