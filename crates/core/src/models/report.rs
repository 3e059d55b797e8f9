use serde::{Deserialize, Serialize};

use super::indicators::IndicatorSet;

/// Rendered in place of any indicator the history was too short for.
pub const NOT_AVAILABLE: &str = "n/a";

const RULE: &str = "------------------------";

/// Format an optional value with `decimals` places, or "n/a".
pub fn fmt_opt(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{v:.decimals$}"),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// Same as [`fmt_opt`] but with a leading dollar sign on real values.
pub fn fmt_money(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("${v:.2}"),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// Output of the "analyze" action: descriptive metrics plus commentary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub ticker: String,
    pub indicators: IndicatorSet,
    /// Generated text, or an `Error: ...` string if the service failed.
    pub commentary: String,
}

impl AnalysisReport {
    pub fn render(&self) -> String {
        let ind = &self.indicators;
        format!(
            "Stock Analysis - {ticker}\n\
             {RULE}\n\
             Current Price: {price}\n\
             30-day Avg: {avg}\n\
             Volatility: {vol}\n\
             Avg Volume: {volume:.0} shares\n\
             {w}-day SMA: {sma}\n\
             Trend: {trend}\n\
             \nAI Insight:\n{commentary}",
            ticker = self.ticker,
            price = fmt_money(Some(ind.current_close)),
            avg = fmt_money(Some(ind.mean_close)),
            vol = fmt_money(ind.stddev_close),
            volume = ind.mean_volume,
            w = ind.sma_window,
            sma = fmt_money(ind.sma),
            trend = ind
                .trend
                .map(|t| t.to_string())
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            commentary = self.commentary,
        )
    }
}

/// Which flavour of momentum report was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignalKind {
    /// The "insight" action on an arbitrary ticker.
    Insight,
    /// The per-entry insight button on a portfolio row.
    Portfolio,
}

/// Output of the "insight" actions: RSI and SMA distance plus commentary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalReport {
    pub kind: SignalKind,
    pub ticker: String,
    pub indicators: IndicatorSet,
    pub commentary: String,
}

impl SignalReport {
    pub fn render(&self) -> String {
        let ind = &self.indicators;
        let title = match self.kind {
            SignalKind::Insight => format!("Insight for {}", self.ticker),
            SignalKind::Portfolio => format!("Portfolio Insight - {}", self.ticker),
        };
        format!(
            "{title}\n\
             {RULE}\n\
             RSI ({p}-day): {rsi}\n\
             Current vs SMA: {diff}\n\
             \nAI Insight:\n{commentary}",
            p = ind.rsi_period,
            rsi = fmt_opt(ind.rsi, 1),
            diff = pct(ind.close_vs_sma_pct()),
            commentary = self.commentary,
        )
    }
}

/// Output of the "buy/sell advice" action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdviceReport {
    pub ticker: String,
    pub indicators: IndicatorSet,
    pub commentary: String,
}

impl AdviceReport {
    pub fn render(&self) -> String {
        let ind = &self.indicators;
        format!(
            "Buy/Sell Advice for {ticker}\n\
             {RULE}\n\
             Metrics:\n\
             RSI ({p}-day): {rsi}\n\
             Current vs SMA: {diff}\n\
             Volatility: {vol}\n\
             \nAI Advice:\n{commentary}",
            ticker = self.ticker,
            p = ind.rsi_period,
            rsi = fmt_opt(ind.rsi, 1),
            diff = pct(ind.close_vs_sma_pct()),
            vol = pct(ind.volatility_pct),
            commentary = self.commentary,
        )
    }
}

/// One-decimal percentage, or "n/a".
pub(crate) fn pct(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{v:.1}%"),
        _ => NOT_AVAILABLE.to_string(),
    }
}
