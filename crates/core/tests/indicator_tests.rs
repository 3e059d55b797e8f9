// ═══════════════════════════════════════════════════════════════════
// Indicator Tests — mean, stddev, SMA, RSI, trend, volatility
// ═══════════════════════════════════════════════════════════════════

use stock_insight_core::errors::CoreError;
use stock_insight_core::models::indicators::Trend;
use stock_insight_core::models::price::{PriceBar, PriceSeries};
use stock_insight_core::services::indicator_engine::IndicatorEngine;

fn series(closes: &[f64]) -> PriceSeries {
    PriceSeries::from_closes("TEST", closes)
}

fn series_with_volume(rows: &[(f64, u64)]) -> PriceSeries {
    let bars = rows
        .iter()
        .enumerate()
        .map(|(i, &(close, volume))| PriceBar {
            timestamp: 1_700_000_000 + i as i64 * 86_400,
            open: close,
            high: close,
            low: close,
            close,
            volume,
        })
        .collect();
    PriceSeries::new("TEST", bars)
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

// ═══════════════════════════════════════════════════════════════════
// Descriptive statistics
// ═══════════════════════════════════════════════════════════════════

mod stats {
    use super::*;

    #[test]
    fn mean_of_closes() {
        let engine = IndicatorEngine::new();
        assert!(approx(engine.mean(&series(&[10.0, 11.0, 12.0, 11.0, 13.0])).unwrap(), 11.4));
    }

    #[test]
    fn stddev_is_sample_not_population() {
        let engine = IndicatorEngine::new();
        // mean 5, squared deviations sum to 32; 32 / 7 under N − 1
        let s = series(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert!(approx(engine.stddev(&s).unwrap(), (32.0_f64 / 7.0).sqrt()));
    }

    #[test]
    fn stddev_of_single_bar_is_insufficient() {
        let engine = IndicatorEngine::new();
        let err = engine.stddev(&series(&[42.0])).unwrap_err();
        assert!(matches!(
            err,
            CoreError::InsufficientHistory { required: 2, available: 1 }
        ));
    }

    #[test]
    fn mean_of_empty_series_is_insufficient() {
        let engine = IndicatorEngine::new();
        assert!(matches!(
            engine.mean(&series(&[])),
            Err(CoreError::InsufficientHistory { .. })
        ));
    }

    #[test]
    fn mean_volume_uses_volume_column() {
        let engine = IndicatorEngine::new();
        let s = series_with_volume(&[(10.0, 1_000), (11.0, 2_000), (12.0, 6_000)]);
        assert!(approx(engine.mean_volume(&s).unwrap(), 3_000.0));
    }

    #[test]
    fn volatility_pct_is_stddev_over_mean() {
        let engine = IndicatorEngine::new();
        let s = series(&[10.0, 11.0, 12.0, 11.0, 13.0]);
        let expected = engine.stddev(&s).unwrap() / 11.4 * 100.0;
        assert!(approx(engine.volatility_pct(&s).unwrap(), expected));
    }

    #[test]
    fn constant_series_has_zero_volatility() {
        let engine = IndicatorEngine::new();
        let s = series(&[50.0; 10]);
        assert!(approx(engine.volatility_pct(&s).unwrap(), 0.0));
    }
}

// ═══════════════════════════════════════════════════════════════════
// SMA
// ═══════════════════════════════════════════════════════════════════

mod sma {
    use super::*;

    #[test]
    fn five_day_sma_of_five_closes() {
        let engine = IndicatorEngine::new();
        let s = series(&[10.0, 11.0, 12.0, 11.0, 13.0]);
        assert!(approx(engine.sma(&s, 5).unwrap(), 11.4));
    }

    #[test]
    fn sma_uses_only_the_last_window_closes() {
        let engine = IndicatorEngine::new();
        let s = series(&[1000.0, 1.0, 2.0, 3.0]);
        assert!(approx(engine.sma(&s, 3).unwrap(), 2.0));
    }

    #[test]
    fn sma_matches_order_independent_sum_of_tail() {
        let engine = IndicatorEngine::new();
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + ((i * 7) % 11) as f64).collect();
        let s = series(&closes);
        for window in 1..=closes.len() {
            let mut tail = closes[closes.len() - window..].to_vec();
            tail.reverse();
            let expected = tail.iter().sum::<f64>() / window as f64;
            assert!(approx(engine.sma(&s, window).unwrap(), expected), "window {window}");
        }
    }

    #[test]
    fn sma_with_short_history_is_insufficient() {
        let engine = IndicatorEngine::new();
        let err = engine.sma(&series(&[1.0, 2.0, 3.0]), 5).unwrap_err();
        assert!(matches!(
            err,
            CoreError::InsufficientHistory { required: 5, available: 3 }
        ));
    }

    #[test]
    fn zero_window_is_rejected() {
        let engine = IndicatorEngine::new();
        assert!(matches!(
            engine.sma(&series(&[1.0]), 0),
            Err(CoreError::ValidationError(_))
        ));
    }

    #[test]
    fn rolling_series_is_aligned_with_bars() {
        let engine = IndicatorEngine::new();
        let s = series(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let rolling = engine.sma_series(&s, 3);
        assert_eq!(rolling.len(), 5);
        assert_eq!(rolling[0], None);
        assert_eq!(rolling[1], None);
        assert!(approx(rolling[2].unwrap(), 2.0));
        assert!(approx(rolling[3].unwrap(), 3.0));
        assert!(approx(rolling[4].unwrap(), 4.0));
    }

    #[test]
    fn rolling_series_last_value_equals_sma() {
        let engine = IndicatorEngine::new();
        let s = series(&[10.0, 11.0, 12.0, 11.0, 13.0, 14.0, 9.0]);
        let rolling = engine.sma_series(&s, 5);
        assert!(approx(rolling.last().unwrap().unwrap(), engine.sma(&s, 5).unwrap()));
    }

    #[test]
    fn rolling_series_too_short_is_all_none() {
        let engine = IndicatorEngine::new();
        let rolling = engine.sma_series(&series(&[1.0, 2.0]), 5);
        assert_eq!(rolling, vec![None, None]);
    }
}

// ═══════════════════════════════════════════════════════════════════
// RSI
// ═══════════════════════════════════════════════════════════════════

mod rsi {
    use super::*;

    #[test]
    fn strictly_rising_series_saturates_at_100() {
        let engine = IndicatorEngine::new();
        let closes: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
        let rsi = engine.rsi(&series(&closes), 14).unwrap();
        assert!(!rsi.is_nan());
        assert!(approx(rsi, 100.0));
    }

    #[test]
    fn strictly_falling_series_is_zero() {
        let engine = IndicatorEngine::new();
        let closes: Vec<f64> = (0..20).map(|i| 100.0 - i as f64).collect();
        assert!(approx(engine.rsi(&series(&closes), 14).unwrap(), 0.0));
    }

    #[test]
    fn equal_gains_and_losses_give_50() {
        let engine = IndicatorEngine::new();
        let closes: Vec<f64> = (0..15).map(|i| if i % 2 == 0 { 10.0 } else { 11.0 }).collect();
        assert!(approx(engine.rsi(&series(&closes), 14).unwrap(), 50.0));
    }

    #[test]
    fn known_value_over_small_period() {
        let engine = IndicatorEngine::new();
        // deltas over the last 4: +2, -1, +3, -2 → gain 5/4, loss 3/4, RS 5/3
        let s = series(&[50.0, 10.0, 12.0, 11.0, 14.0, 12.0]);
        let expected = 100.0 - 100.0 / (1.0 + 5.0 / 3.0);
        assert!(approx(engine.rsi(&s, 4).unwrap(), expected));
    }

    #[test]
    fn only_the_last_period_deltas_count() {
        let engine = IndicatorEngine::new();
        // A crash long before the window must not drag RSI down.
        let mut closes = vec![500.0, 100.0];
        closes.extend((1..=14).map(|i| 100.0 + i as f64));
        assert!(approx(engine.rsi(&series(&closes), 14).unwrap(), 100.0));
    }

    #[test]
    fn rsi_stays_in_bounds_for_mixed_moves() {
        let engine = IndicatorEngine::new();
        let closes: Vec<f64> = (0..40)
            .map(|i| 100.0 + ((i * 13) % 17) as f64 - ((i * 5) % 7) as f64)
            .collect();
        let s = series(&closes);
        for period in 1..30 {
            let rsi = engine.rsi(&s, period).unwrap();
            assert!((0.0..=100.0).contains(&rsi), "period {period}: {rsi}");
        }
    }

    #[test]
    fn needs_period_plus_one_bars() {
        let engine = IndicatorEngine::new();
        let closes: Vec<f64> = (0..14).map(|i| i as f64).collect();
        let err = engine.rsi(&series(&closes), 14).unwrap_err();
        assert!(matches!(
            err,
            CoreError::InsufficientHistory { required: 15, available: 14 }
        ));
    }

    #[test]
    fn fifteen_bars_are_enough_for_period_14() {
        let engine = IndicatorEngine::new();
        let closes: Vec<f64> = (0..15).map(|i| i as f64).collect();
        assert!(approx(engine.rsi(&series(&closes), 14).unwrap(), 100.0));
    }

    #[test]
    fn compute_leaves_rsi_empty_at_fourteen_bars() {
        let engine = IndicatorEngine::new();
        let fourteen: Vec<f64> = (0..14).map(|i| 10.0 + i as f64).collect();
        assert_eq!(engine.compute(&series(&fourteen)).unwrap().rsi, None);

        let mut fifteen = fourteen.clone();
        fifteen.push(30.0);
        assert!(engine.compute(&series(&fifteen)).unwrap().rsi.is_some());
    }

    #[test]
    fn zero_period_is_rejected() {
        let engine = IndicatorEngine::new();
        assert!(matches!(
            engine.rsi(&series(&[1.0, 2.0]), 0),
            Err(CoreError::ValidationError(_))
        ));
    }
}

// ═══════════════════════════════════════════════════════════════════
// Trend & full indicator set
// ═══════════════════════════════════════════════════════════════════

mod compute {
    use super::*;

    #[test]
    fn trend_up_when_close_strictly_above_sma() {
        let engine = IndicatorEngine::new();
        let s = series(&[10.0, 11.0, 12.0, 11.0, 13.0]);
        assert_eq!(engine.trend(&s, 5).unwrap(), Trend::Up);
    }

    #[test]
    fn trend_down_when_close_equals_sma() {
        let engine = IndicatorEngine::new();
        let s = series(&[10.0; 5]);
        assert_eq!(engine.trend(&s, 5).unwrap(), Trend::Down);
    }

    #[test]
    fn trend_down_when_close_below_sma() {
        let engine = IndicatorEngine::new();
        let s = series(&[13.0, 12.0, 11.0, 10.0, 9.0]);
        assert_eq!(engine.trend(&s, 5).unwrap(), Trend::Down);
    }

    #[test]
    fn full_history_fills_every_field() {
        let engine = IndicatorEngine::new();
        let closes: Vec<f64> = (0..22).map(|i| 100.0 + (i % 5) as f64).collect();
        let set = engine.compute(&series(&closes)).unwrap();

        assert!(approx(set.current_close, *closes.last().unwrap()));
        assert!(set.stddev_close.is_some());
        assert!(set.sma.is_some());
        assert!(set.rsi.is_some());
        assert!(set.trend.is_some());
        assert!(set.volatility_pct.is_some());
        assert_eq!(set.sma_window, 5);
        assert_eq!(set.rsi_period, 14);
    }

    #[test]
    fn short_history_leaves_windowed_fields_empty() {
        let engine = IndicatorEngine::new();
        let set = engine.compute(&series(&[10.0, 11.0, 12.0])).unwrap();

        assert!(approx(set.mean_close, 11.0));
        assert!(set.stddev_close.is_some());
        assert_eq!(set.sma, None);
        assert_eq!(set.rsi, None);
        assert_eq!(set.trend, None);
    }

    #[test]
    fn single_bar_has_no_stddev() {
        let engine = IndicatorEngine::new();
        let set = engine.compute(&series(&[10.0])).unwrap();
        assert_eq!(set.stddev_close, None);
        assert_eq!(set.volatility_pct, None);
    }

    #[test]
    fn empty_series_cannot_be_computed() {
        let engine = IndicatorEngine::new();
        assert!(engine.compute(&series(&[])).is_err());
    }

    #[test]
    fn custom_windows_are_used() {
        let engine = IndicatorEngine::with_windows(3, 2);
        let set = engine.compute(&series(&[10.0, 12.0, 11.0, 15.0])).unwrap();
        assert_eq!(set.sma_window, 3);
        assert_eq!(set.rsi_period, 2);
        assert!(approx(set.sma.unwrap(), 38.0 / 3.0));
        // last two deltas: -1, +4 → gain 2, loss 0.5, RS 4
        assert!(approx(set.rsi.unwrap(), 80.0));
    }

    #[test]
    fn close_vs_sma_percentage() {
        let engine = IndicatorEngine::new();
        let set = engine.compute(&series(&[10.0, 11.0, 12.0, 11.0, 13.0])).unwrap();
        let expected = (13.0 / 11.4 - 1.0) * 100.0;
        assert!(approx(set.close_vs_sma_pct().unwrap(), expected));
    }
}
