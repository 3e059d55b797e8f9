use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, instrument, warn};

use crate::models::price::Lookback;
use crate::models::settings::RefreshSettings;
use crate::services::market_data::MarketDataSource;
use crate::services::portfolio_store::PortfolioStore;

const SIGNAL_CAPACITY: usize = 16;

/// Lifecycle of the background refresh task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SchedulerState {
    Running,
    Stopped,
}

/// Emitted after every cycle so the UI re-renders the portfolio.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshSignal {
    /// 1-based cycle counter.
    pub cycle: u64,
    /// Entries whose price was rewritten.
    pub updated: usize,
    /// Tickers whose fetch failed; their stored price is unchanged.
    pub failed: usize,
}

/// Periodically re-prices every entry of a `PortfolioStore`.
///
/// Each cycle snapshots the tickers present at its start, fetches each in
/// turn, and writes back only to entries that still exist. A failed ticker
/// never aborts the cycle.
#[derive(Clone)]
pub struct RefreshScheduler {
    store: PortfolioStore,
    market_data: MarketDataSource,
    lookback: Lookback,
    interval: Duration,
    signals: broadcast::Sender<RefreshSignal>,
    cycles: Arc<AtomicU64>,
}

impl RefreshScheduler {
    pub fn new(
        store: PortfolioStore,
        market_data: MarketDataSource,
        settings: &RefreshSettings,
        lookback: Lookback,
    ) -> Self {
        let (signals, _) = broadcast::channel(SIGNAL_CAPACITY);
        Self {
            store,
            market_data,
            lookback,
            interval: settings.interval(),
            signals,
            cycles: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Receive a `RefreshSignal` after each completed cycle.
    pub fn subscribe(&self) -> broadcast::Receiver<RefreshSignal> {
        self.signals.subscribe()
    }

    /// Run one refresh cycle now and broadcast its signal.
    #[instrument(skip(self))]
    pub async fn run_cycle(&self) -> RefreshSignal {
        let tickers = self.store.tickers();
        debug!(tickers = tickers.len(), "refresh cycle starting");
        let mut updated = 0;
        let mut failed = 0;

        for ticker in &tickers {
            match self.market_data.latest_close(ticker, self.lookback).await {
                Ok(price) => {
                    if self.store.update_price(ticker, price) {
                        updated += 1;
                    } else {
                        debug!(%ticker, "entry removed during cycle; price dropped");
                    }
                }
                Err(e) => {
                    failed += 1;
                    warn!(%ticker, error = %e, "price refresh failed; keeping last price");
                }
            }
        }

        let cycle = self.cycles.fetch_add(1, Ordering::SeqCst) + 1;
        let signal = RefreshSignal {
            cycle,
            updated,
            failed,
        };
        info!(cycle, tickers = tickers.len(), updated, failed, "refresh cycle complete");

        // No subscribers is fine; nobody is rendering yet.
        let _ = self.signals.send(signal.clone());
        signal
    }

    /// Start the background loop. The first cycle runs immediately, then
    /// one per interval until [`RefreshHandle::shutdown`] is called or the
    /// handle is dropped.
    pub fn spawn(self) -> RefreshHandle {
        let (stop_tx, mut stop_rx) = watch::channel(false);
        let running = Arc::new(AtomicBool::new(true));
        let signals = self.signals.clone();
        let interval = self.interval;

        let task_running = Arc::clone(&running);
        let task = tokio::spawn(async move {
            info!(interval_secs = interval.as_secs(), "refresh scheduler started");
            let mut tick = tokio::time::interval(interval);
            tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;
                    // Err means the handle was dropped; treat it as a stop.
                    changed = stop_rx.changed() => {
                        if changed.is_err() || *stop_rx.borrow() {
                            break;
                        }
                    }
                    _ = tick.tick() => {
                        if *stop_rx.borrow() {
                            break;
                        }
                        self.run_cycle().await;
                    }
                }
            }

            task_running.store(false, Ordering::SeqCst);
            info!("refresh scheduler stopped");
        });

        RefreshHandle {
            stop_tx,
            running,
            signals,
            task: Some(task),
        }
    }
}

/// Owner's handle on a spawned `RefreshScheduler`.
pub struct RefreshHandle {
    stop_tx: watch::Sender<bool>,
    running: Arc<AtomicBool>,
    signals: broadcast::Sender<RefreshSignal>,
    task: Option<JoinHandle<()>>,
}

impl RefreshHandle {
    pub fn subscribe(&self) -> broadcast::Receiver<RefreshSignal> {
        self.signals.subscribe()
    }

    pub fn state(&self) -> SchedulerState {
        if self.running.load(Ordering::SeqCst) {
            SchedulerState::Running
        } else {
            SchedulerState::Stopped
        }
    }

    /// Stop the loop and wait for the task to finish. Calling it again
    /// after it has returned is a no-op.
    ///
    /// A sleeping scheduler wakes immediately. A cycle already in flight is
    /// allowed to complete first, and `state()` reports `Running` until it
    /// has. If this future is dropped early, calling it again resumes the wait.
    pub async fn shutdown(&mut self) {
        let _ = self.stop_tx.send(true);
        if let Some(task) = self.task.as_mut() {
            if let Err(e) = task.await {
                error!(error = %e, "refresh scheduler task ended abnormally");
            }
            self.task = None;
        }
        self.running.store(false, Ordering::SeqCst);
    }
}
