use crate::engine::AnalyticsEngine;
use crate::error::AnalyticsError;
use crate::params::ReportParams;
use crate::report::PerformanceReport;
use core_types::Trade;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::hash::{Hash, Hasher};

pub const DEFAULT_CACHE_CAPACITY: usize = 32;

/// Caller-owned memoization of reports.
///
/// Entries are keyed by the caller's trade-set version together with the full
/// report parameters, so the caller must bump `version` whenever the trades change.
/// When the cache is full it is cleared before the next insertion.
#[derive(Debug)]
pub struct ReportCache {
    engine: AnalyticsEngine,
    capacity: usize,
    entries: HashMap<CacheKey, PerformanceReport>,
}

impl Default for ReportCache {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }
}

impl ReportCache {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            engine: AnalyticsEngine::new(),
            capacity: capacity.max(1),
            entries: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Returns the cached report for `(version, params)`, computing it on a miss.
    pub fn get_or_compute(
        &mut self,
        version: u64,
        trades: &[Trade],
        params: &ReportParams,
    ) -> Result<&PerformanceReport, AnalyticsError> {
        let key = CacheKey {
            version,
            params: params.clone(),
        };

        if !self.entries.contains_key(&key) && self.entries.len() >= self.capacity {
            tracing::debug!(capacity = self.capacity, "Report cache full, clearing.");
            self.entries.clear();
        }

        match self.entries.entry(key) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let report = self.engine.calculate(trades, params)?;
                Ok(entry.insert(report))
            }
        }
    }
}

/// Trade-set version plus parameters. The starting balance is compared by its
/// bits so that equality agrees with `ReportParams`' hash and stays reflexive.
#[derive(Debug, Clone)]
struct CacheKey {
    version: u64,
    params: ReportParams,
}

impl PartialEq for CacheKey {
    fn eq(&self, other: &Self) -> bool {
        let (a, b) = (&self.params, &other.params);
        self.version == other.version
            && a.zone == b.zone
            && a.starting_balance.map(f64::to_bits) == b.starting_balance.map(f64::to_bits)
            && a.filter == b.filter
            && a.sharpe == b.sharpe
            && a.ranking_size == b.ranking_size
    }
}

impl Eq for CacheKey {}

impl Hash for CacheKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.version.hash(state);
        self.params.hash(state);
    }
}
