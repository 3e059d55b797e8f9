use crate::errors::CoreError;
use crate::models::indicators::{IndicatorSet, Trend};
use crate::models::price::PriceSeries;

pub const DEFAULT_SMA_WINDOW: usize = 5;
pub const DEFAULT_RSI_PERIOD: usize = 14;

/// Computes technical indicators over the close and volume columns of a
/// `PriceSeries`.
///
/// Pure business logic: no I/O, no state beyond the configured windows.
/// Anything that needs more bars than the series has returns
/// `CoreError::InsufficientHistory` instead of NaN.
#[derive(Debug, Clone, Copy)]
pub struct IndicatorEngine {
    sma_window: usize,
    rsi_period: usize,
}

impl IndicatorEngine {
    pub fn new() -> Self {
        Self {
            sma_window: DEFAULT_SMA_WINDOW,
            rsi_period: DEFAULT_RSI_PERIOD,
        }
    }

    pub fn with_windows(sma_window: usize, rsi_period: usize) -> Self {
        Self {
            sma_window,
            rsi_period,
        }
    }

    pub fn sma_window(&self) -> usize {
        self.sma_window
    }

    pub fn rsi_period(&self) -> usize {
        self.rsi_period
    }

    /// Arithmetic mean of all closes.
    pub fn mean(&self, series: &PriceSeries) -> Result<f64, CoreError> {
        mean_of(&series.closes())
    }

    /// Sample standard deviation of closes (divides by N − 1).
    pub fn stddev(&self, series: &PriceSeries) -> Result<f64, CoreError> {
        sample_stddev(&series.closes())
    }

    /// Arithmetic mean of all volumes.
    pub fn mean_volume(&self, series: &PriceSeries) -> Result<f64, CoreError> {
        mean_of(&series.volumes())
    }

    /// Mean of the last `window` closes.
    pub fn sma(&self, series: &PriceSeries, window: usize) -> Result<f64, CoreError> {
        let closes = series.closes();
        if window == 0 {
            return Err(CoreError::ValidationError("SMA window must be positive".into()));
        }
        if closes.len() < window {
            return Err(CoreError::InsufficientHistory {
                required: window,
                available: closes.len(),
            });
        }
        mean_of(&closes[closes.len() - window..])
    }

    /// Rolling SMA aligned with the bars: entry `i` is the mean of closes
    /// `i + 1 - window ..= i`, or `None` for the first `window - 1` bars.
    pub fn sma_series(&self, series: &PriceSeries, window: usize) -> Vec<Option<f64>> {
        let closes = series.closes();
        let mut out = vec![None; closes.len()];
        if window == 0 || closes.len() < window {
            return out;
        }

        // Running sum keeps this O(n) for long charts.
        let mut sum: f64 = closes[..window].iter().sum();
        out[window - 1] = Some(sum / window as f64);
        for i in window..closes.len() {
            sum += closes[i] - closes[i - window];
            out[i] = Some(sum / window as f64);
        }
        out
    }

    /// Relative strength index over the last `period` day-over-day deltas.
    ///
    /// Gains and losses are averaged with a simple mean over the window.
    /// A window with no losses saturates at 100 instead of dividing by zero.
    pub fn rsi(&self, series: &PriceSeries, period: usize) -> Result<f64, CoreError> {
        let closes = series.closes();
        if period == 0 {
            return Err(CoreError::ValidationError("RSI period must be positive".into()));
        }
        // The first close has no delta, so `period` deltas need one extra bar.
        if closes.len() < period + 1 {
            return Err(CoreError::InsufficientHistory {
                required: period + 1,
                available: closes.len(),
            });
        }

        let window = &closes[closes.len() - period - 1..];
        let (gain_sum, loss_sum) = window.windows(2).fold((0.0, 0.0), |(g, l), pair| {
            let delta = pair[1] - pair[0];
            if delta > 0.0 {
                (g + delta, l)
            } else {
                (g, l - delta)
            }
        });
        let avg_gain = gain_sum / period as f64;
        let avg_loss = loss_sum / period as f64;

        if avg_loss == 0.0 {
            return Ok(100.0);
        }
        let rs = avg_gain / avg_loss;
        Ok((100.0 - 100.0 / (1.0 + rs)).clamp(0.0, 100.0))
    }

    /// "Up" when the latest close is strictly above the SMA, else "Down".
    pub fn trend(&self, series: &PriceSeries, window: usize) -> Result<Trend, CoreError> {
        let sma = self.sma(series, window)?;
        let close = last_close(series)?;
        Ok(trend_of(close, sma))
    }

    /// Standard deviation as a percentage of the mean close.
    pub fn volatility_pct(&self, series: &PriceSeries) -> Result<f64, CoreError> {
        let mean = self.mean(series)?;
        if mean == 0.0 {
            return Err(CoreError::ValidationError(
                "Mean close is zero; volatility is undefined".into(),
            ));
        }
        Ok(self.stddev(series)? / mean * 100.0)
    }

    /// Compute every indicator at once with the configured windows.
    ///
    /// Only an empty series is an error; indicators that need more history
    /// are left as `None`.
    pub fn compute(&self, series: &PriceSeries) -> Result<IndicatorSet, CoreError> {
        let current_close = last_close(series)?;
        let sma = self.sma(series, self.sma_window).ok();

        Ok(IndicatorSet {
            current_close,
            mean_close: self.mean(series)?,
            stddev_close: self.stddev(series).ok(),
            mean_volume: self.mean_volume(series)?,
            sma,
            sma_window: self.sma_window,
            rsi: self.rsi(series, self.rsi_period).ok(),
            rsi_period: self.rsi_period,
            trend: sma.map(|s| trend_of(current_close, s)),
            volatility_pct: self.volatility_pct(series).ok(),
        })
    }
}

impl Default for IndicatorEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn trend_of(close: f64, sma: f64) -> Trend {
    if close > sma {
        Trend::Up
    } else {
        Trend::Down
    }
}

fn last_close(series: &PriceSeries) -> Result<f64, CoreError> {
    series.last_close().ok_or(CoreError::InsufficientHistory {
        required: 1,
        available: 0,
    })
}

fn mean_of(values: &[f64]) -> Result<f64, CoreError> {
    if values.is_empty() {
        return Err(CoreError::InsufficientHistory {
            required: 1,
            available: 0,
        });
    }
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

fn sample_stddev(values: &[f64]) -> Result<f64, CoreError> {
    if values.len() < 2 {
        return Err(CoreError::InsufficientHistory {
            required: 2,
            available: values.len(),
        });
    }
    let mean = mean_of(values)?;
    let sum_sq: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    Ok((sum_sq / (values.len() - 1) as f64).sqrt())
}
