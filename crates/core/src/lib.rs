pub mod errors;
pub mod models;
pub mod providers;
pub mod services;

use std::sync::Arc;
use tracing::info;

use errors::CoreError;
use models::{
    chart::PriceChart,
    indicators::IndicatorSet,
    portfolio::PortfolioEntry,
    report::{AdviceReport, AnalysisReport, SignalKind, SignalReport},
    settings::Settings,
};
use providers::{
    deepseek::DeepSeekClient,
    traits::{MarketDataProvider, TextGenerator},
    yahoo_finance::YahooFinanceProvider,
};
use services::{
    chart_service::ChartService,
    indicator_engine::IndicatorEngine,
    insight_service::InsightService,
    market_data::{normalize_ticker, MarketDataSource},
    portfolio_store::PortfolioStore,
    refresh_scheduler::{RefreshHandle, RefreshScheduler},
    report_service::PromptBuilder,
};

/// Shares given to a ticker added from the UI.
const DEFAULT_SHARES: u32 = 1;

/// Main entry point for the Stock Insight core library.
///
/// The UI calls one async method per user action and renders what comes
/// back; the portfolio store and the refresh scheduler are owned here and
/// handed out as cheap handles.
#[must_use]
pub struct StockInsight {
    settings: Settings,
    market_data: MarketDataSource,
    engine: IndicatorEngine,
    insight_service: InsightService,
    prompts: PromptBuilder,
    chart_service: ChartService,
    portfolio: PortfolioStore,
}

impl std::fmt::Debug for StockInsight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StockInsight")
            .field("market_data", &self.market_data.provider_name())
            .field("lookback", &self.settings.lookback)
            .field("portfolio_entries", &self.portfolio.len())
            .finish()
    }
}

impl StockInsight {
    /// Build with the live Yahoo Finance and DeepSeek providers.
    pub fn new(settings: Settings) -> Result<Self, CoreError> {
        let market: Arc<dyn MarketDataProvider> = Arc::new(YahooFinanceProvider::new()?);
        let generator: Arc<dyn TextGenerator> = Arc::new(DeepSeekClient::new(&settings.insight));
        Ok(Self::with_providers(settings, market, generator))
    }

    /// Build from `STOCK_INSIGHT_*` environment variables.
    pub fn from_env() -> Result<Self, CoreError> {
        Self::new(Settings::from_env())
    }

    /// Build with explicit providers (alternative feeds, or mocks in tests).
    pub fn with_providers(
        settings: Settings,
        market: Arc<dyn MarketDataProvider>,
        generator: Arc<dyn TextGenerator>,
    ) -> Self {
        info!(
            market = market.name(),
            generator = generator.name(),
            lookback = %settings.lookback,
            "stock insight core initialised"
        );
        let engine = IndicatorEngine::new();
        let insight_service = InsightService::new(generator, &settings.insight);
        Self {
            market_data: MarketDataSource::new(market),
            engine,
            insight_service,
            prompts: PromptBuilder::new(),
            chart_service: ChartService::new(engine),
            portfolio: PortfolioStore::new(),
            settings,
        }
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    // ── Analysis ────────────────────────────────────────────────────

    /// Fetch the series for `ticker` and compute its indicators.
    /// Returns the normalized ticker alongside.
    pub async fn indicators(&self, ticker: &str) -> Result<(String, IndicatorSet), CoreError> {
        let series = self.market_data.fetch(ticker, self.settings.lookback).await?;
        let indicators = self.engine.compute(&series)?;
        Ok((series.ticker().to_string(), indicators))
    }

    /// Descriptive metrics plus AI commentary ("Analyze Stock").
    pub async fn analyze(&self, ticker: &str) -> Result<AnalysisReport, CoreError> {
        let (ticker, indicators) = self.indicators(ticker).await?;
        let prompt = self.prompts.analysis(&ticker, &indicators);
        let commentary = self.insight_service.request_insight(&prompt).await;
        Ok(AnalysisReport {
            ticker,
            indicators,
            commentary,
        })
    }

    /// Close prices with the SMA overlay ("View Chart").
    pub async fn chart(&self, ticker: &str) -> Result<PriceChart, CoreError> {
        let series = self.market_data.fetch(ticker, self.settings.lookback).await?;
        self.chart_service
            .price_chart(&series, self.engine.sma_window())
    }

    /// RSI and SMA distance plus AI commentary ("Get Insight").
    pub async fn insight(&self, ticker: &str) -> Result<SignalReport, CoreError> {
        self.signal_report(SignalKind::Insight, ticker).await
    }

    /// Same metrics as [`Self::insight`] for a portfolio row.
    pub async fn portfolio_insight(&self, ticker: &str) -> Result<SignalReport, CoreError> {
        self.signal_report(SignalKind::Portfolio, ticker).await
    }

    /// RSI, SMA distance and volatility plus AI advice ("Buy/Sell Advice").
    pub async fn advice(&self, ticker: &str) -> Result<AdviceReport, CoreError> {
        let (ticker, indicators) = self.indicators(ticker).await?;
        let prompt = self.prompts.advice(&ticker, &indicators);
        let commentary = self.insight_service.request_insight(&prompt).await;
        Ok(AdviceReport {
            ticker,
            indicators,
            commentary,
        })
    }

    async fn signal_report(&self, kind: SignalKind, ticker: &str) -> Result<SignalReport, CoreError> {
        let (ticker, indicators) = self.indicators(ticker).await?;
        let prompt = self.prompts.signal(kind, &ticker, &indicators);
        let commentary = self.insight_service.request_insight(&prompt).await;
        Ok(SignalReport {
            kind,
            ticker,
            indicators,
            commentary,
        })
    }

    // ── Portfolio ───────────────────────────────────────────────────

    /// Add `ticker` at its latest close with one share.
    ///
    /// Returns `Ok(false)` without fetching if the ticker is already held.
    /// On a fetch failure the store is left unchanged.
    pub async fn add_to_portfolio(&self, ticker: &str) -> Result<bool, CoreError> {
        let ticker = normalize_ticker(ticker)?;
        if self.portfolio.contains(&ticker) {
            return Ok(false);
        }

        let price = self
            .market_data
            .latest_close(&ticker, self.settings.lookback)
            .await?;
        let added = self
            .portfolio
            .add(PortfolioEntry::new(&ticker, price, DEFAULT_SHARES));
        if added {
            info!(%ticker, price, "added to portfolio");
        }
        Ok(added)
    }

    /// Remove `ticker`; `false` if it was not held.
    pub fn remove_from_portfolio(&self, ticker: &str) -> bool {
        let removed = self.portfolio.remove(ticker.trim());
        if removed {
            info!(ticker = %ticker.trim().to_uppercase(), "removed from portfolio");
        }
        removed
    }

    /// Entries in insertion order, for rendering.
    #[must_use]
    pub fn portfolio(&self) -> Vec<PortfolioEntry> {
        self.portfolio.snapshot()
    }

    /// Another handle on the shared portfolio store.
    #[must_use]
    pub fn portfolio_store(&self) -> PortfolioStore {
        self.portfolio.clone()
    }

    // ── Background refresh ──────────────────────────────────────────

    /// A scheduler wired to this instance's store and market data.
    #[must_use]
    pub fn refresh_scheduler(&self) -> RefreshScheduler {
        RefreshScheduler::new(
            self.portfolio.clone(),
            self.market_data.clone(),
            &self.settings.refresh,
            self.settings.lookback,
        )
    }

    /// Spawn the refresh loop on the current tokio runtime.
    pub fn start_refresh(&self) -> RefreshHandle {
        self.refresh_scheduler().spawn()
    }
}
