use crate::models::indicators::IndicatorSet;
use crate::models::report::{fmt_money, fmt_opt, pct, SignalKind};

/// Builds the prompts sent to the insight service from computed metrics.
///
/// Undefined indicators are written as "n/a" so the model never sees NaN.
pub struct PromptBuilder;

impl PromptBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Prompt for the "analyze" action.
    pub fn analysis(&self, ticker: &str, ind: &IndicatorSet) -> String {
        format!(
            "Analyze the stock {ticker} with current price {price}, \
             30-day average {avg}, volatility {vol}, \
             average volume {volume:.0} shares, and {w}-day SMA {sma}. \
             Provide a detailed analysis.",
            price = fmt_money(Some(ind.current_close)),
            avg = fmt_money(Some(ind.mean_close)),
            vol = fmt_money(ind.stddev_close),
            volume = ind.mean_volume,
            w = ind.sma_window,
            sma = fmt_money(ind.sma),
        )
    }

    /// Prompt for the "insight" and portfolio-insight actions.
    pub fn signal(&self, kind: SignalKind, ticker: &str, ind: &IndicatorSet) -> String {
        let what = match kind {
            SignalKind::Insight => "a detailed insight",
            SignalKind::Portfolio => "a portfolio insight",
        };
        format!(
            "Provide {what} for {ticker} with RSI {rsi}, \
             current price {price}, and {w}-day SMA {sma}. \
             Include market sentiment if possible.",
            rsi = fmt_opt(ind.rsi, 1),
            price = fmt_money(Some(ind.current_close)),
            w = ind.sma_window,
            sma = fmt_money(ind.sma),
        )
    }

    /// Prompt for the "buy/sell advice" action.
    pub fn advice(&self, ticker: &str, ind: &IndicatorSet) -> String {
        format!(
            "Provide buy/sell advice for {ticker} with RSI {rsi}, \
             current price {price}, {w}-day SMA {sma}, \
             and volatility {volatility}. Be conversational and detailed.",
            rsi = fmt_opt(ind.rsi, 1),
            price = fmt_money(Some(ind.current_close)),
            w = ind.sma_window,
            sma = fmt_money(ind.sma),
            volatility = pct(ind.volatility_pct),
        )
    }
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new()
    }
}
