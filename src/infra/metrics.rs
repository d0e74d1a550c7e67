//! Lock-free metrics collection for batch classification runs
//!
//! Uses atomics for hot-path operations to avoid mutex contention when a
//! batch is processed from multiple threads. All counter updates are
//! lock-free; reporting is the only operation that needs synchronization
//! (via atomic swap).
//!
//! NOTE: All atomics use Relaxed ordering intentionally—these are
//! statistical counters only. Do NOT use these atomics for coordination or
//! logic decisions.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::info;

use crate::domain::Classification;

/// Exponential bucket boundaries for per-row classify latency (nanoseconds)
/// Buckets: ≤250, ≤500, ≤1000, ≤2000, ≤4000, ≤8000, ≤16000, ≤32000, ≤64000, ≤128000, >128000
const BUCKET_BOUNDS: [u64; 10] = [250, 500, 1000, 2000, 4000, 8000, 16000, 32000, 64000, 128000];
const NUM_BUCKETS: usize = 11;

/// Compute bucket index for a latency value using binary search
#[inline]
fn bucket_index(latency_ns: u64) -> usize {
    BUCKET_BOUNDS.partition_point(|&bound| bound < latency_ns)
}

/// Update an atomic max value using compare-and-swap loop
#[inline]
fn update_atomic_max(atomic_max: &AtomicU64, new_value: u64) {
    let mut current_max = atomic_max.load(Ordering::Relaxed);
    while new_value > current_max {
        match atomic_max.compare_exchange_weak(
            current_max,
            new_value,
            Ordering::Relaxed,
            Ordering::Relaxed,
        ) {
            Ok(_) => break,
            Err(actual) => current_max = actual,
        }
    }
}

/// Swap all buckets to zero and return their values
#[inline]
fn swap_buckets(buckets: &[AtomicU64; NUM_BUCKETS]) -> [u64; NUM_BUCKETS] {
    let mut result = [0u64; NUM_BUCKETS];
    for (i, bucket) in buckets.iter().enumerate() {
        result[i] = bucket.swap(0, Ordering::Relaxed);
    }
    result
}

/// Compute percentile from histogram buckets
/// Returns the upper bound of the bucket containing the percentile
fn percentile_from_buckets(buckets: &[u64; NUM_BUCKETS], percentile: f64) -> u64 {
    let total: u64 = buckets.iter().sum();
    if total == 0 {
        return 0;
    }

    let target = (total as f64 * percentile) as u64;
    let mut cumulative = 0u64;

    // Upper bounds for each bucket (last bucket uses 2x the previous bound)
    const BUCKET_UPPER_BOUNDS: [u64; NUM_BUCKETS] =
        [250, 500, 1000, 2000, 4000, 8000, 16000, 32000, 64000, 128000, 256000];

    for (i, &count) in buckets.iter().enumerate() {
        cumulative += count;
        if cumulative >= target {
            return BUCKET_UPPER_BOUNDS[i];
        }
    }
    BUCKET_UPPER_BOUNDS[NUM_BUCKETS - 1]
}

/// Lock-free metrics collector
///
/// All recording operations are lock-free using atomics.
/// The `report()` method atomically swaps periodic counters to get a
/// consistent snapshot.
pub struct Metrics {
    /// Total rows ever classified (monotonic)
    rows_total: AtomicU64,
    /// Rows since last report (reset on report)
    rows_since_report: AtomicU64,
    /// Rows classified STANDARD (monotonic)
    standard_total: AtomicU64,
    /// Rows classified SPECIAL (monotonic)
    special_total: AtomicU64,
    /// Rows classified REJECTED (monotonic)
    rejected_total: AtomicU64,
    /// Rows that failed validation (monotonic)
    invalid_total: AtomicU64,
    /// Sum of classify latencies in nanoseconds (reset on report)
    latency_sum_ns: AtomicU64,
    /// Max classify latency in nanoseconds (reset on report)
    latency_max_ns: AtomicU64,
    /// Classify latency histogram buckets (reset on report)
    latency_buckets: [AtomicU64; NUM_BUCKETS],
    /// Last report time (only accessed from reporter, not atomic)
    last_report_time: Mutex<Instant>,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            rows_total: AtomicU64::new(0),
            rows_since_report: AtomicU64::new(0),
            standard_total: AtomicU64::new(0),
            special_total: AtomicU64::new(0),
            rejected_total: AtomicU64::new(0),
            invalid_total: AtomicU64::new(0),
            latency_sum_ns: AtomicU64::new(0),
            latency_max_ns: AtomicU64::new(0),
            latency_buckets: std::array::from_fn(|_| AtomicU64::new(0)),
            last_report_time: Mutex::new(Instant::now()),
        }
    }

    /// Record one classified row with its classify latency (lock-free)
    #[inline]
    pub fn record_classified(&self, classification: Classification, latency_ns: u64) {
        self.rows_total.fetch_add(1, Ordering::Relaxed);
        self.rows_since_report.fetch_add(1, Ordering::Relaxed);

        let class_counter = match classification {
            Classification::Standard => &self.standard_total,
            Classification::Special => &self.special_total,
            Classification::Rejected => &self.rejected_total,
        };
        class_counter.fetch_add(1, Ordering::Relaxed);

        self.latency_sum_ns.fetch_add(latency_ns, Ordering::Relaxed);

        // Update histogram bucket
        let bucket = bucket_index(latency_ns);
        self.latency_buckets[bucket].fetch_add(1, Ordering::Relaxed);

        // Update max
        update_atomic_max(&self.latency_max_ns, latency_ns);
    }

    /// Record a row that failed validation (lock-free)
    #[inline]
    pub fn record_invalid(&self) {
        self.invalid_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Get total rows classified
    #[inline]
    pub fn rows_total(&self) -> u64 {
        self.rows_total.load(Ordering::Relaxed)
    }

    /// Get total invalid rows
    #[inline]
    pub fn invalid_total(&self) -> u64 {
        self.invalid_total.load(Ordering::Relaxed)
    }

    /// Get the running count for one classification
    #[inline]
    pub fn class_total(&self, classification: Classification) -> u64 {
        let counter = match classification {
            Classification::Standard => &self.standard_total,
            Classification::Special => &self.special_total,
            Classification::Rejected => &self.rejected_total,
        };
        counter.load(Ordering::Relaxed)
    }

    /// Calculate and return a metrics summary, then reset periodic counters
    ///
    /// This is the only method that resets counters. It uses atomic swap
    /// to get a consistent snapshot while allowing concurrent updates.
    pub fn report(&self) -> BatchSummary {
        // Swap periodic counters to zero and get their values
        let rows_count = self.rows_since_report.swap(0, Ordering::Relaxed);
        let latency_sum = self.latency_sum_ns.swap(0, Ordering::Relaxed);
        let max_latency = self.latency_max_ns.swap(0, Ordering::Relaxed);

        // Swap histogram buckets and collect values
        let lat_buckets = swap_buckets(&self.latency_buckets);

        // Get monotonic counters (don't reset)
        let rows_total = self.rows_total.load(Ordering::Relaxed);
        let standard_total = self.standard_total.load(Ordering::Relaxed);
        let special_total = self.special_total.load(Ordering::Relaxed);
        let rejected_total = self.rejected_total.load(Ordering::Relaxed);
        let invalid_total = self.invalid_total.load(Ordering::Relaxed);

        // Calculate elapsed time and reset
        let elapsed = {
            let mut last = self.last_report_time.lock();
            let elapsed = last.elapsed();
            *last = Instant::now();
            elapsed
        };

        // Calculate derived metrics
        let rows_per_sec = if elapsed.as_secs_f64() > 0.0 {
            rows_count as f64 / elapsed.as_secs_f64()
        } else {
            0.0
        };

        let avg_latency = if rows_count > 0 { latency_sum / rows_count } else { 0 };

        // Compute percentiles from histogram
        let lat_p50 = percentile_from_buckets(&lat_buckets, 0.50);
        let lat_p95 = percentile_from_buckets(&lat_buckets, 0.95);
        let lat_p99 = percentile_from_buckets(&lat_buckets, 0.99);

        BatchSummary {
            rows_total,
            rows_per_sec,
            standard_total,
            special_total,
            rejected_total,
            invalid_total,
            avg_classify_ns: avg_latency,
            max_classify_ns: max_latency,
            lat_buckets,
            lat_p50_ns: lat_p50,
            lat_p95_ns: lat_p95,
            lat_p99_ns: lat_p99,
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
#[allow(dead_code)]
pub struct BatchSummary {
    pub rows_total: u64,
    pub rows_per_sec: f64,
    pub standard_total: u64,
    pub special_total: u64,
    pub rejected_total: u64,
    pub invalid_total: u64,
    /// Average classify latency (ns)
    pub avg_classify_ns: u64,
    /// Max classify latency (ns)
    pub max_classify_ns: u64,
    /// Classify latency histogram buckets
    /// Bounds: ≤250, ≤500, ≤1000, ≤2000, ≤4000, ≤8000, ≤16000, ≤32000, ≤64000, ≤128000, >128000 ns
    pub lat_buckets: [u64; NUM_BUCKETS],
    /// 50th percentile classify latency (ns)
    pub lat_p50_ns: u64,
    /// 95th percentile classify latency (ns)
    pub lat_p95_ns: u64,
    /// 99th percentile classify latency (ns)
    pub lat_p99_ns: u64,
}

impl BatchSummary {
    pub fn log(&self) {
        info!(
            rows_total = %self.rows_total,
            rows_per_sec = format!("{:.1}", self.rows_per_sec),
            standard = %self.standard_total,
            special = %self.special_total,
            rejected = %self.rejected_total,
            invalid = %self.invalid_total,
            avg_classify_ns = %self.avg_classify_ns,
            max_classify_ns = %self.max_classify_ns,
            p50_ns = %self.lat_p50_ns,
            p95_ns = %self.lat_p95_ns,
            p99_ns = %self.lat_p99_ns,
            "metrics"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_new() {
        let metrics = Metrics::new();
        assert_eq!(metrics.rows_total(), 0);
        assert_eq!(metrics.invalid_total(), 0);
        assert_eq!(metrics.class_total(Classification::Standard), 0);
    }

    #[test]
    fn test_record_classified() {
        let metrics = Metrics::new();

        metrics.record_classified(Classification::Standard, 100);
        metrics.record_classified(Classification::Special, 200);
        metrics.record_classified(Classification::Special, 300);
        metrics.record_classified(Classification::Rejected, 400);

        assert_eq!(metrics.rows_total(), 4);
        assert_eq!(metrics.class_total(Classification::Standard), 1);
        assert_eq!(metrics.class_total(Classification::Special), 2);
        assert_eq!(metrics.class_total(Classification::Rejected), 1);
    }

    #[test]
    fn test_report() {
        let metrics = Metrics::new();

        metrics.record_classified(Classification::Standard, 100);
        metrics.record_classified(Classification::Standard, 200);
        metrics.record_classified(Classification::Rejected, 300);
        metrics.record_invalid();

        let summary = metrics.report();

        assert_eq!(summary.rows_total, 3);
        assert_eq!(summary.standard_total, 2);
        assert_eq!(summary.rejected_total, 1);
        assert_eq!(summary.invalid_total, 1);
        assert_eq!(summary.avg_classify_ns, 200); // (100+200+300)/3
        assert_eq!(summary.max_classify_ns, 300);

        // Periodic counters should be reset
        assert_eq!(metrics.rows_since_report.load(Ordering::Relaxed), 0);
        assert_eq!(metrics.latency_sum_ns.load(Ordering::Relaxed), 0);
        assert_eq!(metrics.latency_max_ns.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn test_report_empty() {
        let metrics = Metrics::new();
        let summary = metrics.report();

        assert_eq!(summary.rows_total, 0);
        assert_eq!(summary.avg_classify_ns, 0);
        assert_eq!(summary.max_classify_ns, 0);
        assert_eq!(summary.lat_p99_ns, 0);
    }

    #[test]
    fn test_max_latency_tracking() {
        let metrics = Metrics::new();

        metrics.record_classified(Classification::Standard, 100);
        metrics.record_classified(Classification::Standard, 500);
        metrics.record_classified(Classification::Standard, 200);

        assert_eq!(metrics.latency_max_ns.load(Ordering::Relaxed), 500);
    }

    #[test]
    fn test_concurrent_updates() {
        use std::sync::Arc;
        use std::thread;

        let metrics = Arc::new(Metrics::new());
        let mut handles = vec![];

        // Spawn 10 threads, each recording 1000 rows
        for _ in 0..10 {
            let m = metrics.clone();
            handles.push(thread::spawn(move || {
                for i in 0..1000 {
                    m.record_classified(Classification::Standard, i as u64);
                }
            }));
        }

        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(metrics.rows_total(), 10_000);
        assert_eq!(metrics.class_total(Classification::Standard), 10_000);
    }

    #[test]
    fn test_bucket_index() {
        // Test bucket boundaries
        assert_eq!(bucket_index(0), 0);
        assert_eq!(bucket_index(250), 0);
        assert_eq!(bucket_index(251), 1);
        assert_eq!(bucket_index(500), 1);
        assert_eq!(bucket_index(501), 2);
        assert_eq!(bucket_index(128000), 9);
        assert_eq!(bucket_index(128001), 10); // overflow
        assert_eq!(bucket_index(1_000_000), 10);
    }

    #[test]
    fn test_histogram_buckets() {
        let metrics = Metrics::new();

        // Record rows in different buckets
        metrics.record_classified(Classification::Standard, 100); // bucket 0 (≤250)
        metrics.record_classified(Classification::Standard, 400); // bucket 1 (≤500)
        metrics.record_classified(Classification::Standard, 900); // bucket 2 (≤1000)
        metrics.record_classified(Classification::Standard, 200_000); // bucket 10 (overflow)

        let summary = metrics.report();

        assert_eq!(summary.lat_buckets[0], 1);
        assert_eq!(summary.lat_buckets[1], 1);
        assert_eq!(summary.lat_buckets[2], 1);
        assert_eq!(summary.lat_buckets[10], 1);
    }

    #[test]
    fn test_percentile_computation() {
        let metrics = Metrics::new();

        // Record 100 rows, all at 400ns (bucket 1, ≤500)
        for _ in 0..100 {
            metrics.record_classified(Classification::Standard, 400);
        }

        let summary = metrics.report();

        // All percentiles should be 500 (upper bound of bucket 1)
        assert_eq!(summary.lat_p50_ns, 500);
        assert_eq!(summary.lat_p95_ns, 500);
        assert_eq!(summary.lat_p99_ns, 500);
    }
}
