//! Timed throughput measurement with cancellation, independent of the
//! mining driver's PoW-grading loop. Counts raw hashes per wall-clock
//! duration, independent of PoW grading.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::hash::Hash;

/// Runs `hash` against an incrementing nonce for `duration` (or until
/// `cancel` is set, whichever comes first), spread across `workers`
/// threads. Returns the number of hashes completed and the actual wall
/// time elapsed.
///
/// `workers == 0` defaults to `num_cpus::get()`. Passing an already-set
/// `cancel` returns immediately with whatever partial count workers
/// manage before checking it (at least zero, since the check happens
/// before each hash).
pub fn benchmark(hash: Arc<Hash>, duration: Duration, workers: usize) -> (u64, Duration) {
    benchmark_cancellable(hash, duration, workers, Arc::new(AtomicBool::new(false)))
}

/// Like [`benchmark`], but lets the caller supply its own cancellation
/// flag so a benchmark can be stopped from another thread before its
/// deadline.
pub fn benchmark_cancellable(
    hash: Arc<Hash>,
    duration: Duration,
    workers: usize,
    cancel: Arc<AtomicBool>,
) -> (u64, Duration) {
    let workers = if workers == 0 {
        num_cpus::get()
    } else {
        workers
    };

    let deadline = Instant::now() + duration;
    let count = Arc::new(AtomicU64::new(0));
    let base = vec![0u8; 32];

    let start = Instant::now();
    std::thread::scope(|scope| {
        for worker_id in 0..workers {
            let hash = Arc::clone(&hash);
            let cancel = Arc::clone(&cancel);
            let count = Arc::clone(&count);
            let mut base = base.clone();
            base.extend_from_slice(&[worker_id as u8, 0, 0, 0, 0]);
            let pos = base.len() - 4;

            scope.spawn(move || {
                let mut i: u32 = 0;
                loop {
                    if cancel.load(Ordering::Relaxed) || Instant::now() >= deadline {
                        return;
                    }
                    base[pos..].copy_from_slice(&i.to_be_bytes());
                    hash.hash(&base);
                    count.fetch_add(1, Ordering::Relaxed);
                    i = i.wrapping_add(1);
                }
            });
        }
    });

    (count.load(Ordering::Relaxed), start.elapsed())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HashConfig;

    #[test]
    fn runs_for_roughly_the_requested_duration() {
        let cfg = HashConfig::new(1, 12, 64, 1).unwrap();
        let hash = Arc::new(Hash::new(cfg));
        let (hashes, elapsed) = benchmark(hash, Duration::from_millis(100), 2);
        assert!(hashes > 0);
        assert!(elapsed < Duration::from_secs(1));
    }

    #[test]
    fn cancellation_stops_before_deadline() {
        let cfg = HashConfig::new(1, 12, 64, 1).unwrap();
        let hash = Arc::new(Hash::new(cfg));
        let cancel = Arc::new(AtomicBool::new(true));
        let (_, elapsed) = benchmark_cancellable(hash, Duration::from_secs(2), 1, cancel);
        assert!(elapsed < Duration::from_secs(1));
    }
}
