//! Classification throughput benchmark
//!
//! Generates synthetic package measurements and classifies them
//! single-threaded and across worker threads. Every classification is a
//! pure function of its own four inputs, so throughput should scale close
//! to linearly with threads.

use clap::Parser;
use std::hint::black_box;
use std::time::Instant;

// Decision rule constants (from production sorter-poc domain/measurement.rs)
const BULKY_VOLUME_CM3: f64 = 1_000_000.0;
const BULKY_DIMENSION_CM: f64 = 150.0;
const HEAVY_MASS_KG: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Classification {
    Standard,
    Special,
    Rejected,
}

// From production sorter-poc domain/measurement.rs
fn classify(width: f64, height: f64, length: f64, mass: f64) -> Classification {
    let bulky = width * height * length >= BULKY_VOLUME_CM3
        || width.max(height).max(length) >= BULKY_DIMENSION_CM;
    let heavy = mass >= HEAVY_MASS_KG;

    match (bulky, heavy) {
        (true, true) => Classification::Rejected,
        (true, false) | (false, true) => Classification::Special,
        (false, false) => Classification::Standard,
    }
}

#[derive(Parser)]
#[command(name = "sort-bench")]
struct Args {
    /// Measurements to classify per run
    #[arg(short, long, default_value = "10000000")]
    rows: u64,

    /// Worker threads for the parallel run
    #[arg(short, long, default_value = "4")]
    threads: u64,

    /// RNG seed
    #[arg(long, default_value = "42")]
    seed: u64,
}

/// xorshift64 - deterministic, fast enough to stay out of the measurement
struct Rng(u64);

impl Rng {
    fn next(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }

    /// Uniform float in [low, high)
    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        let unit = (self.next() >> 11) as f64 / (1u64 << 53) as f64;
        low + unit * (high - low)
    }

    /// A measurement spread across all three categories
    fn measurement(&mut self) -> (f64, f64, f64, f64) {
        (
            self.uniform(1.0, 200.0),
            self.uniform(1.0, 200.0),
            self.uniform(1.0, 200.0),
            self.uniform(1.0, 40.0),
        )
    }
}

fn run_rows(seed: u64, rows: u64) -> [u64; 3] {
    let mut rng = Rng(seed);
    let mut counts = [0u64; 3];

    for _ in 0..rows {
        let (w, h, l, m) = rng.measurement();
        let class = classify(black_box(w), black_box(h), black_box(l), black_box(m));
        counts[class as usize] += 1;
    }

    counts
}

fn main() {
    let args = Args::parse();

    println!("sort-bench: {} rows, seed {}", args.rows, args.seed);

    // Single-threaded baseline
    let start = Instant::now();
    let counts = run_rows(args.seed, args.rows);
    let single = start.elapsed();

    let single_rate = args.rows as f64 / single.as_secs_f64();
    println!(
        "single thread: {:.2?} total, {:.1} ns/row, {:.0} rows/sec",
        single,
        single.as_nanos() as f64 / args.rows as f64,
        single_rate
    );
    println!(
        "  standard={} special={} rejected={}",
        counts[0], counts[1], counts[2]
    );

    // Parallel run: rows split across threads, distinct seeds
    let per_thread = args.rows / args.threads;
    let start = Instant::now();
    let handles: Vec<_> = (0..args.threads)
        .map(|i| {
            let seed = args.seed.wrapping_add(i).wrapping_mul(0x9E3779B97F4A7C15) | 1;
            std::thread::spawn(move || run_rows(seed, per_thread))
        })
        .collect();

    let mut totals = [0u64; 3];
    for handle in handles {
        let counts = handle.join().expect("worker thread panicked");
        for (total, count) in totals.iter_mut().zip(counts) {
            *total += count;
        }
    }
    let parallel = start.elapsed();

    let parallel_rate = (per_thread * args.threads) as f64 / parallel.as_secs_f64();
    println!(
        "{} threads: {:.2?} total, {:.0} rows/sec, {:.2}x speedup",
        args.threads,
        parallel,
        parallel_rate,
        parallel_rate / single_rate
    );
    println!(
        "  standard={} special={} rejected={}",
        totals[0], totals[1], totals[2]
    );
}
