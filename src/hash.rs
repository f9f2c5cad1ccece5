//! The hash core: byte-serial mixing driven by ByteMap lookups.
//!
//! Every `B(...)` argument below folds in the latest accumulator state
//! together with the current input byte, so each table lookup depends on
//! the previous one. This is what makes the hash memory-bandwidth-bound
//! rather than pipelineable. The shift counts are not arbitrary: they
//! spread bits into both the low bits (which drive the next table index)
//! and the high bits (which keep the accumulator entropic). Preserve the
//! shift schedule and the `(s1, s2, s3) <- (s3, s1, s2)` rotation exactly;
//! they are load-bearing, not incidental.

use crate::bytemap::ByteMap;
use crate::config::HashConfig;

/// A ByteMap bound to a config, ready to hash input byte slices.
///
/// Immutable once constructed; `hash` has no observable side effects and
/// is safe to call concurrently from multiple threads.
pub struct Hash {
    config: HashConfig,
    map: ByteMap,
}

/// Running state for one hash evaluation: four 64-bit accumulators plus the
/// intermediate array `hs`. Threaded through `fast_step`/`full_step` by
/// value rather than captured in a closure over mutable locals, so the step
/// functions can be called uniformly from the serial driver and the batched
/// driver alike.
#[derive(Clone, Copy)]
struct State {
    acc: u64,
    s1: u64,
    s2: u64,
    s3: u64,
}

impl Hash {
    /// Binds a config to a freshly generated ByteMap.
    pub fn new(config: HashConfig) -> Self {
        let map = ByteMap::generate(&config);
        Self { config, map }
    }

    /// Binds a config to an already-built ByteMap (e.g. loaded from cache
    /// or shared via the singleton registry).
    pub fn with_map(config: HashConfig, map: ByteMap) -> Self {
        Self { config, map }
    }

    #[inline]
    pub fn config(&self) -> &HashConfig {
        &self.config
    }

    #[inline]
    pub fn map(&self) -> &ByteMap {
        &self.map
    }

    #[inline(always)]
    fn lookup(&self, x: u64) -> u64 {
        self.map.lookup(x, self.config.map_mask())
    }

    /// Fast step: state-priming pass used in Phase 1. Consumes one input
    /// byte, updates `acc` and one slot of `hs`, then rotates the trailing
    /// state words.
    #[inline(always)]
    fn fast_step(&self, st: &mut State, hs: &mut [u64], idx: usize, v2: u64) {
        let b = self.lookup(st.acc ^ v2);
        st.acc = (st.acc << 7)
            ^ (st.acc >> 5)
            ^ (v2 << 20)
            ^ (v2 << 16)
            ^ v2
            ^ (b << 20)
            ^ (b << 12)
            ^ (b << 4);
        st.s1 = (st.s1 << 9) ^ (st.s1 >> 3) ^ hs[idx];
        hs[idx] = st.s1 ^ st.acc;
        let (s1, s2, s3) = (st.s3, st.s1, st.s2);
        st.s1 = s1;
        st.s2 = s2;
        st.s3 = s3;
    }

    /// Full step: the main mixing function used in Phases 2 and 3.
    /// Verbatim mixing algebra; see module docs.
    #[inline(always)]
    fn full_step(&self, st: &mut State, hs: &mut [u64], idx: usize, v2: u64) {
        let State {
            mut acc,
            mut s1,
            mut s2,
            s3: _,
        } = *st;

        s1 = (s1 << 9) ^ (s1 >> 1) ^ acc ^ (self.lookup((acc >> 5) ^ v2) << 3);
        s1 = (s1 << 5) ^ (s1 >> 3) ^ (self.lookup(s1 ^ v2) << 7);
        s1 = (s1 << 7) ^ (s1 >> 7) ^ (self.lookup(acc ^ (s1 >> 7)) << 5);
        s1 = (s1 << 11) ^ (s1 >> 5) ^ (self.lookup(v2 ^ (acc >> 11) ^ s1) << 27);
        hs[idx] = s1 ^ acc ^ (hs[idx] << 7) ^ (hs[idx] >> 13);
        acc = (acc << 17) ^ (acc >> 5) ^ s1 ^ (self.lookup(acc ^ (s1 >> 27) ^ v2) << 3);
        acc = (acc << 13) ^ (acc >> 3) ^ (self.lookup(acc ^ s1) << 7);
        acc = (acc << 15) ^ (acc >> 7) ^ (self.lookup((acc >> 7) ^ s1) << 11);
        acc = (acc << 9) ^ (acc >> 11) ^ (self.lookup(v2 ^ acc ^ s1) << 3);
        s1 = (s1 << 7) ^ (s1 >> 27) ^ acc ^ (self.lookup(acc >> 3) << 13);
        s1 = (s1 << 3) ^ (s1 >> 13) ^ (self.lookup(s1 ^ v2) << 11);
        s1 = (s1 << 8) ^ (s1 >> 11) ^ (self.lookup(acc ^ (s1 >> 11)) << 9);
        s1 = (s1 << 6) ^ (s1 >> 9) ^ (self.lookup(v2 ^ acc ^ s1) << 3);
        acc = (acc << 23) ^ (acc >> 3) ^ s1 ^ (self.lookup(acc ^ v2 ^ (s1 >> 3)) << 7);
        acc = (acc << 17) ^ (acc >> 7) ^ (self.lookup(acc ^ (s1 >> 3)) << 5);
        acc = (acc << 13) ^ (acc >> 5) ^ (self.lookup((acc >> 5) ^ s1) << 1);
        acc = (acc << 11) ^ (acc >> 1) ^ (self.lookup(v2 ^ acc ^ s1) << 7);
        s1 = (s1 << 5) ^ (s1 >> 3) ^ acc ^ (self.lookup((acc >> 7) ^ (s1 >> 3)) << 6);
        s1 = (s1 << 8) ^ (s1 >> 6) ^ (self.lookup(s1 ^ v2) << 11);
        s1 = (s1 << 11) ^ (s1 >> 11) ^ (self.lookup(acc ^ (s1 >> 11)) << 5);
        s1 = (s1 << 7) ^ (s1 >> 5) ^ (self.lookup(v2 ^ (acc >> 7) ^ acc ^ s1) << 17);
        s2 = (s2 << 3) ^ (s2 >> 17) ^ s1 ^ (self.lookup(acc ^ (s2 >> 5) ^ v2) << 13);
        s2 = (s2 << 6) ^ (s2 >> 13) ^ (self.lookup(s2) << 11);
        s2 = (s2 << 11) ^ (s2 >> 11) ^ (self.lookup(acc ^ s1 ^ (s2 >> 11)) << 23);
        s2 = (s2 << 4) ^ (s2 >> 23) ^ (self.lookup(v2 ^ (acc >> 8) ^ acc ^ (s2 >> 10)) << 1);
        s1 = (s2 << 3) ^ (s2 >> 1) ^ hs[idx] ^ v2;
        acc = (acc << 9) ^ (acc >> 7) ^ (s1 >> 1) ^ (self.lookup((s2 >> 1) ^ hs[idx]) << 5);

        st.acc = acc;
        st.s1 = st.s3;
        st.s2 = s1;
        st.s3 = s2;
    }

    /// Computes the `hash_size_bytes`-long digest of `input`.
    ///
    /// Deterministic in `(ByteMap, seed, hash_size_bytes, input)`, re-entrant,
    /// and safe to call concurrently; `Hash` holds no mutable state.
    pub fn hash(&self, input: &[u8]) -> Vec<u8> {
        let h = self.config.hash_size_bytes() as usize;
        let mut hs = vec![0u64; h];
        let mut st = State {
            acc: self.config.seed(),
            s1: 0,
            s2: 0,
            s3: 0,
        };

        // Phase 1: fast step, priming the state.
        let mut idx = 0usize;
        for &byte in input {
            self.fast_step(&mut st, &mut hs, idx, byte as u64);
            idx += 1;
            if idx >= h {
                idx = 0;
            }
        }

        // Phase 2: full step, main mixing.
        idx = 0;
        for &byte in input {
            self.full_step(&mut st, &mut hs, idx, byte as u64);
            idx += 1;
            if idx >= h {
                idx = 0;
            }
        }

        // Phase 3: reduction, feeding hs back through the full step in
        // reverse so late input bytes avalanche into early output bytes.
        let mut digest = vec![0u8; h];
        for i in (0..h).rev() {
            let v2 = hs[i];
            self.full_step(&mut st, &mut hs, i, v2);
            digest[i] = (self.lookup(st.acc) as u8) ^ (self.lookup(hs[i]) as u8);
        }

        digest
    }

    /// Hashes many `prefix ++ suffix_i` inputs, interleaving the step
    /// application across items at each byte position instead of running
    /// each hash to completion serially.
    ///
    /// Numerically identical to calling [`Hash::hash`] on each
    /// `prefix ++ suffix_i` individually. See [`crate::batch::hash_batch`]
    /// for the implementation, which lives in its own module since it needs
    /// a struct-of-arrays layout rather than `Hash`'s single-item state.
    pub fn hash_batch(&self, prefix: &[u8], suffixes: &[&[u8]]) -> Vec<Vec<u8>> {
        crate::batch::hash_batch(self, prefix, suffixes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canonical() -> Hash {
        let cfg = HashConfig::new(0xFAFAECECFAFAECEC, 30, 256, 5).unwrap();
        Hash::new(cfg)
    }

    #[test]
    fn empty_input_matches_vector() {
        let h = canonical();
        assert_eq!(
            hex::encode(h.hash(b"")),
            "66afa4d58ff4b99ef77f7bc2dc7567a23ccb47edab1486fccc3e9556bc64e9cc"
        );
    }

    #[test]
    fn short_inputs_match_vectors() {
        let h = canonical();
        assert_eq!(
            hex::encode(h.hash(b"abcde")),
            "00e9ef8262f154b6aef3b4bb1a95644bbd651040df34c3d88dd696d519445989"
        );
        assert_eq!(
            hex::encode(h.hash(b"bar")),
            "66a7c02adcf00ed55a11877fa543ccc27a0a4c59268cc36cd8fe9616ce6cda63"
        );
        assert_eq!(
            hex::encode(h.hash(b"foo")),
            "93a2eaf76b8cc21610601fb5a87f8f6ea57ef0fc1e6eaf414e7b6eac186bca16"
        );
        assert_eq!(
            hex::encode(h.hash(b"pegnet")),
            "84c5bc3b47965e0fff9e66871b94dd7d2cd1f866102a6c1cd7ef30eb3ee737ef"
        );
    }

    #[test]
    fn deterministic_and_thread_safe() {
        let h = canonical();
        let a = h.hash(b"repeatme");
        let b = h.hash(b"repeatme");
        assert_eq!(a, b);

        std::thread::scope(|scope| {
            for _ in 0..4 {
                let h = &h;
                scope.spawn(move || {
                    assert_eq!(h.hash(b"repeatme"), a);
                });
            }
        });
    }

    #[test]
    fn digest_length_matches_config() {
        let cfg = HashConfig::new(42, 10, 128, 2).unwrap();
        let h = Hash::new(cfg);
        assert_eq!(h.hash(b"x").len(), 16);
    }
}
