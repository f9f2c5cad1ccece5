//! Concurrent mining: spawn worker threads that hash `base ++ nonce`,
//! grade each digest, and stream improving proof-of-work back to a
//! consumer over an unbounded channel.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossbeam_channel::{unbounded, Receiver};

use crate::hash::Hash;
use crate::pow;

/// Default interval between heartbeat reports, absent an explicit override.
pub const DEFAULT_HEARTBEAT: Duration = Duration::from_secs(60);

/// A nonce counter that never touches its leading worker-id byte.
///
/// The counter advances from the least-significant byte, carrying into
/// higher bytes. When a carry would overwrite byte 0 (the worker-id
/// prefix), a fresh byte is inserted at position 1 instead, lengthening
/// the nonce rather than colliding with another worker's space.
pub struct NonceIncrementer {
    nonce: Vec<u8>,
}

impl NonceIncrementer {
    /// Starts a counter for worker `id`, with an initial one-byte counter
    /// of zero following the id prefix.
    pub fn new(worker_id: u8) -> Self {
        Self {
            nonce: vec![worker_id, 0],
        }
    }

    /// The current nonce bytes: `[worker_id, counter_bytes...]`.
    pub fn nonce(&self) -> &[u8] {
        &self.nonce
    }

    /// Advances to the next nonce in this worker's space.
    pub fn advance(&mut self) {
        let mut idx = self.nonce.len() - 1;
        loop {
            self.nonce[idx] = self.nonce[idx].wrapping_add(1);
            if self.nonce[idx] != 0 {
                return;
            }
            if idx == 1 {
                // Carry would overwrite the worker-id prefix at byte 0;
                // lengthen the nonce instead of colliding with it.
                self.nonce.insert(1, 1);
                return;
            }
            idx -= 1;
        }
    }
}

/// An event streamed out of the mining driver.
#[derive(Debug, Clone)]
pub enum MiningEvent {
    /// A new best proof-of-work was found.
    Improvement {
        worker_id: u8,
        nonce: Vec<u8>,
        digest: Vec<u8>,
        pow: u64,
    },
    /// A periodic liveness report, emitted roughly every heartbeat
    /// interval by one arbitrary worker.
    Heartbeat { hashes: u64, elapsed: Duration },
}

/// Runs until `deadline` elapses or `cancel` is set, hashing
/// `base ++ nonce` once per iteration per worker and reporting any digest
/// that beats the best-so-far PoW value.
///
/// Workers check `cancel` between hashes only; an in-flight hash always
/// completes. Improvements from different workers may arrive out of
/// order; the consumer is responsible for tracking the current best.
pub fn mine(
    hash: Arc<Hash>,
    base: Vec<u8>,
    workers: usize,
    cancel: Arc<AtomicBool>,
    deadline: Option<Instant>,
) -> Receiver<MiningEvent> {
    mine_with_heartbeat(hash, base, workers, cancel, deadline, DEFAULT_HEARTBEAT)
}

/// Same as [`mine`], but with a configurable heartbeat interval (mainly
/// useful for tests that don't want to wait 60 real seconds).
pub fn mine_with_heartbeat(
    hash: Arc<Hash>,
    base: Vec<u8>,
    workers: usize,
    cancel: Arc<AtomicBool>,
    deadline: Option<Instant>,
    heartbeat_interval: Duration,
) -> Receiver<MiningEvent> {
    let (tx, rx) = unbounded();
    let best = Arc::new(AtomicU64::new(0));
    let start = Instant::now();
    let total_hashes = Arc::new(AtomicU64::new(0));

    for worker_id in 0..workers {
        let hash = Arc::clone(&hash);
        let base = base.clone();
        let cancel = Arc::clone(&cancel);
        let best = Arc::clone(&best);
        let total_hashes = Arc::clone(&total_hashes);
        let tx = tx.clone();

        std::thread::spawn(move || {
            let mut nonce = NonceIncrementer::new(worker_id as u8);
            let mut last_heartbeat = Instant::now();

            loop {
                if cancel.load(Ordering::Relaxed) {
                    return;
                }
                if let Some(deadline) = deadline {
                    if Instant::now() >= deadline {
                        return;
                    }
                }

                let mut input = base.clone();
                input.extend_from_slice(nonce.nonce());
                let digest = hash.hash(&input);
                let value = pow::pow(&digest);
                total_hashes.fetch_add(1, Ordering::Relaxed);

                if value > 0 {
                    let prev_best = best.fetch_max(value, Ordering::Relaxed);
                    if value > prev_best {
                        let _ = tx.send(MiningEvent::Improvement {
                            worker_id: worker_id as u8,
                            nonce: nonce.nonce().to_vec(),
                            digest,
                            pow: value,
                        });
                    }
                }

                if last_heartbeat.elapsed() >= heartbeat_interval {
                    last_heartbeat = Instant::now();
                    let _ = tx.send(MiningEvent::Heartbeat {
                        hashes: total_hashes.load(Ordering::Relaxed),
                        elapsed: start.elapsed(),
                    });
                }

                nonce.advance();
            }
        });
    }

    rx
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HashConfig;
    use std::collections::HashSet;

    #[test]
    fn nonce_advances_without_touching_prefix() {
        let mut n = NonceIncrementer::new(7);
        assert_eq!(n.nonce(), &[7, 0]);
        for _ in 0..255 {
            n.advance();
        }
        assert_eq!(n.nonce(), &[7, 255]);
        n.advance();
        assert_eq!(n.nonce(), &[7, 1, 0]);
        assert_eq!(n.nonce()[0], 7);
    }

    #[test]
    fn worker_nonces_never_collide_over_a_short_run() {
        let cfg = HashConfig::new(1, 12, 64, 1).unwrap();
        let hash = Arc::new(Hash::new(cfg));
        let cancel = Arc::new(AtomicBool::new(false));
        let deadline = Some(Instant::now() + Duration::from_millis(300));

        let rx = mine_with_heartbeat(
            hash,
            vec![0u8; 4],
            4,
            Arc::clone(&cancel),
            deadline,
            Duration::from_millis(10),
        );

        let mut seen = HashSet::new();
        let mut collided = false;
        let deadline_wait = Instant::now() + Duration::from_secs(2);
        while Instant::now() < deadline_wait {
            match rx.recv_timeout(Duration::from_millis(50)) {
                Ok(MiningEvent::Improvement { nonce, .. }) => {
                    if !seen.insert(nonce) {
                        collided = true;
                    }
                }
                Ok(MiningEvent::Heartbeat { .. }) => {}
                Err(crossbeam_channel::RecvTimeoutError::Disconnected) => break,
                Err(crossbeam_channel::RecvTimeoutError::Timeout) => {
                    if cancel.load(Ordering::Relaxed) {
                        break;
                    }
                }
            }
        }
        assert!(!collided);
    }
}
