// Per-processor series domain model
use super::observation::{Manufacturer, Metric};
use indexmap::IndexMap;
use serde::Serialize;

/// Processor name to series, in first-appearance order.
pub type SeriesMap = IndexMap<String, Series>;

/// One processor's timings, ordered by thread count.
///
/// `threads` is strictly increasing and `om_times` / `sa_times` are aligned with it
/// index for index.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub processor: String,
    pub manufacturer: Manufacturer,
    pub threads: Vec<u32>,
    pub om_times: Vec<f64>,
    pub sa_times: Vec<f64>,
}

impl Series {
    pub fn new(processor: String, manufacturer: Manufacturer) -> Self {
        Self {
            processor,
            manufacturer,
            threads: Vec::new(),
            om_times: Vec::new(),
            sa_times: Vec::new(),
        }
    }

    /// Append a point. Points must arrive in ascending thread order; a point with the
    /// same thread count as the last one replaces it.
    pub fn push(&mut self, threads: u32, om_time: f64, sa_time: f64) {
        debug_assert!(self.threads.last().is_none_or(|&last| last <= threads));

        if self.threads.last() == Some(&threads) {
            if let (Some(om), Some(sa)) = (self.om_times.last_mut(), self.sa_times.last_mut()) {
                *om = om_time;
                *sa = sa_time;
            }
            return;
        }

        self.threads.push(threads);
        self.om_times.push(om_time);
        self.sa_times.push(sa_time);
    }

    pub fn values(&self, metric: Metric) -> &[f64] {
        match metric {
            Metric::Om => &self.om_times,
            Metric::Sa => &self.sa_times,
        }
    }

    pub fn value_at(&self, threads: u32, metric: Metric) -> Option<f64> {
        self.threads
            .binary_search(&threads)
            .ok()
            .map(|idx| self.values(metric)[idx])
    }

    /// `(threads, om_time, sa_time)` triples in thread order.
    pub fn points(&self) -> impl Iterator<Item = (u32, f64, f64)> + '_ {
        self.threads
            .iter()
            .zip(self.om_times.iter().zip(self.sa_times.iter()))
            .map(|(&t, (&om, &sa))| (t, om, sa))
    }
}
