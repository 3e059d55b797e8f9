use std::sync::{Arc, Mutex, MutexGuard};

use crate::models::portfolio::PortfolioEntry;

/// In-memory watch list shared by the UI handlers and the refresh scheduler.
///
/// Cloning yields another handle to the same store. Every operation takes
/// the one mutex for its whole body and never across an `.await`, so there
/// is no nested locking. Entries are kept in insertion order with at most
/// one entry per ticker.
#[derive(Debug, Clone, Default)]
pub struct PortfolioStore {
    entries: Arc<Mutex<Vec<PortfolioEntry>>>,
}

impl PortfolioStore {
    pub fn new() -> Self {
        Self::default()
    }

    // Every mutation is a single push, remove or assign, so the data
    // behind a poisoned lock is still consistent.
    fn lock(&self) -> MutexGuard<'_, Vec<PortfolioEntry>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Insert `entry` under its ticker. First write wins: returns `false`
    /// and leaves the store untouched if the ticker is already present.
    /// The ticker is stored uppercased whatever the caller built.
    pub fn add(&self, mut entry: PortfolioEntry) -> bool {
        entry.ticker = entry.ticker.trim().to_uppercase();
        let mut entries = self.lock();
        if entries.iter().any(|e| e.ticker == entry.ticker) {
            return false;
        }
        entries.push(entry);
        true
    }

    /// Remove `ticker`. Returns `false` if it was not present.
    pub fn remove(&self, ticker: &str) -> bool {
        let ticker = ticker.to_uppercase();
        let mut entries = self.lock();
        match entries.iter().position(|e| e.ticker == ticker) {
            Some(idx) => {
                entries.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Overwrite the price of an existing entry. Returns `false` (and does
    /// not re-create anything) if the ticker has been removed meanwhile.
    pub fn update_price(&self, ticker: &str, price: f64) -> bool {
        let ticker = ticker.to_uppercase();
        let mut entries = self.lock();
        match entries.iter_mut().find(|e| e.ticker == ticker) {
            Some(entry) => {
                entry.last_price = price;
                true
            }
            None => false,
        }
    }

    /// Copy of all entries in insertion order.
    pub fn snapshot(&self) -> Vec<PortfolioEntry> {
        self.lock().clone()
    }

    /// Tickers in insertion order.
    pub fn tickers(&self) -> Vec<String> {
        self.lock().iter().map(|e| e.ticker.clone()).collect()
    }

    pub fn get(&self, ticker: &str) -> Option<PortfolioEntry> {
        let ticker = ticker.to_uppercase();
        self.lock().iter().find(|e| e.ticker == ticker).cloned()
    }

    pub fn contains(&self, ticker: &str) -> bool {
        self.get(ticker).is_some()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Sum of `last_price × shares` over all entries.
    pub fn total_value(&self) -> f64 {
        self.lock().iter().map(PortfolioEntry::value).sum()
    }
}
