use crate::errors::CoreError;
use crate::models::chart::{ChartPoint, PriceChart};
use crate::models::price::PriceSeries;
use crate::services::indicator_engine::IndicatorEngine;

/// Generates chart-ready data sets from a price series.
///
/// The core computes all the numbers; the frontend only renders the close
/// line and the SMA overlay.
pub struct ChartService {
    engine: IndicatorEngine,
}

impl ChartService {
    pub fn new(engine: IndicatorEngine) -> Self {
        Self { engine }
    }

    /// One point per bar: date, close and the rolling SMA ending there.
    ///
    /// Bars whose timestamp cannot be turned into a date are skipped.
    pub fn price_chart(&self, series: &PriceSeries, window: usize) -> Result<PriceChart, CoreError> {
        if series.is_empty() {
            return Err(CoreError::DataNotFound {
                ticker: series.ticker().to_string(),
            });
        }

        let smas = self.engine.sma_series(series, window);
        let points = series
            .bars()
            .iter()
            .zip(smas)
            .filter_map(|(bar, sma)| {
                Some(ChartPoint {
                    date: bar.date()?,
                    close: bar.close,
                    sma,
                })
            })
            .collect();

        Ok(PriceChart {
            ticker: series.ticker().to_string(),
            sma_window: window,
            points,
        })
    }
}

impl Default for ChartService {
    fn default() -> Self {
        Self::new(IndicatorEngine::new())
    }
}
