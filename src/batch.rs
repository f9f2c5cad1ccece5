//! Batched hashing: many inputs sharing a common prefix, processed in
//! lockstep across a struct-of-arrays layout instead of one item at a time.
//!
//! At each byte position, every item's step sub-expressions run before
//! moving to the next sub-expression, which lets concurrent ByteMap
//! lookups be issued while earlier ones are still resolving, a
//! software-level memory-level-parallelism optimization. The numerical
//! result for each item is identical to [`crate::hash::Hash::hash`] applied
//! item-wise; this module exists purely for throughput, not semantics.

use crate::hash::Hash;

/// Per-item state, mirroring `hash::State` but kept as a parallel array so
/// each field is contiguous across items rather than interleaved.
struct Lane {
    acc: u64,
    s1: u64,
    s2: u64,
    s3: u64,
    hs: Vec<u64>,
}

impl Lane {
    fn new(seed: u64, hash_size: usize) -> Self {
        Self {
            acc: seed,
            s1: 0,
            s2: 0,
            s3: 0,
            hs: vec![0u64; hash_size],
        }
    }
}

/// Runs `hash(prefix ++ suffix_i)` for every suffix, interleaving the
/// mixing steps across items at each byte position.
///
/// `hash_batch(prefix, suffixes)[i] == hash.hash(&[prefix, suffixes[i]].concat())`
/// for every `i`.
pub fn hash_batch(hash: &Hash, prefix: &[u8], suffixes: &[&[u8]]) -> Vec<Vec<u8>> {
    let h = hash.config().hash_size_bytes() as usize;
    let seed = hash.config().seed();
    let mut lanes: Vec<Lane> = suffixes.iter().map(|_| Lane::new(seed, h)).collect();

    // Build the full input for each item up front; this keeps the
    // lockstep loop below a simple "byte position -> per-lane step" walk
    // without having to special-case the prefix/suffix boundary per step.
    let inputs: Vec<Vec<u8>> = suffixes
        .iter()
        .map(|suffix| {
            let mut full = Vec::with_capacity(prefix.len() + suffix.len());
            full.extend_from_slice(prefix);
            full.extend_from_slice(suffix);
            full
        })
        .collect();

    let max_len = inputs.iter().map(|v| v.len()).max().unwrap_or(0);

    // Phase 1: fast step, lockstep across lanes at each byte position.
    let mut idx = 0usize;
    for pos in 0..max_len {
        for (lane, input) in lanes.iter_mut().zip(inputs.iter()) {
            if let Some(&byte) = input.get(pos) {
                step_fast(hash, lane, idx, byte as u64);
            }
        }
        idx += 1;
        if idx >= h {
            idx = 0;
        }
    }

    // Phase 2: full step, lockstep across lanes.
    idx = 0;
    for pos in 0..max_len {
        for (lane, input) in lanes.iter_mut().zip(inputs.iter()) {
            if let Some(&byte) = input.get(pos) {
                step_full(hash, lane, idx, byte as u64);
            }
        }
        idx += 1;
        if idx >= h {
            idx = 0;
        }
    }

    // Phase 3: reduction, run per lane (each lane's hs values differ, so
    // there is no shared index to interleave on beyond what we already do).
    lanes
        .into_iter()
        .map(|mut lane| {
            let mut digest = vec![0u8; h];
            for i in (0..h).rev() {
                let v2 = lane.hs[i];
                step_full(hash, &mut lane, i, v2);
                digest[i] =
                    (hash.map().lookup(lane.acc, hash.config().map_mask()) as u8)
                        ^ (hash.map().lookup(lane.hs[i], hash.config().map_mask()) as u8);
            }
            digest
        })
        .collect()
}

#[inline(always)]
fn step_fast(hash: &Hash, lane: &mut Lane, idx: usize, v2: u64) {
    let mask = hash.config().map_mask();
    let map = hash.map();
    let b = map.lookup(lane.acc ^ v2, mask);
    lane.acc = (lane.acc << 7)
        ^ (lane.acc >> 5)
        ^ (v2 << 20)
        ^ (v2 << 16)
        ^ v2
        ^ (b << 20)
        ^ (b << 12)
        ^ (b << 4);
    lane.s1 = (lane.s1 << 9) ^ (lane.s1 >> 3) ^ lane.hs[idx];
    lane.hs[idx] = lane.s1 ^ lane.acc;
    let (s1, s2, s3) = (lane.s3, lane.s1, lane.s2);
    lane.s1 = s1;
    lane.s2 = s2;
    lane.s3 = s3;
}

#[inline(always)]
fn step_full(hash: &Hash, lane: &mut Lane, idx: usize, v2: u64) {
    let mask = hash.config().map_mask();
    let map = hash.map();
    let lookup = |x: u64| map.lookup(x, mask);

    let mut acc = lane.acc;
    let mut s1 = lane.s1;
    let mut s2 = lane.s2;

    s1 = (s1 << 9) ^ (s1 >> 1) ^ acc ^ (lookup((acc >> 5) ^ v2) << 3);
    s1 = (s1 << 5) ^ (s1 >> 3) ^ (lookup(s1 ^ v2) << 7);
    s1 = (s1 << 7) ^ (s1 >> 7) ^ (lookup(acc ^ (s1 >> 7)) << 5);
    s1 = (s1 << 11) ^ (s1 >> 5) ^ (lookup(v2 ^ (acc >> 11) ^ s1) << 27);
    lane.hs[idx] = s1 ^ acc ^ (lane.hs[idx] << 7) ^ (lane.hs[idx] >> 13);
    acc = (acc << 17) ^ (acc >> 5) ^ s1 ^ (lookup(acc ^ (s1 >> 27) ^ v2) << 3);
    acc = (acc << 13) ^ (acc >> 3) ^ (lookup(acc ^ s1) << 7);
    acc = (acc << 15) ^ (acc >> 7) ^ (lookup((acc >> 7) ^ s1) << 11);
    acc = (acc << 9) ^ (acc >> 11) ^ (lookup(v2 ^ acc ^ s1) << 3);
    s1 = (s1 << 7) ^ (s1 >> 27) ^ acc ^ (lookup(acc >> 3) << 13);
    s1 = (s1 << 3) ^ (s1 >> 13) ^ (lookup(s1 ^ v2) << 11);
    s1 = (s1 << 8) ^ (s1 >> 11) ^ (lookup(acc ^ (s1 >> 11)) << 9);
    s1 = (s1 << 6) ^ (s1 >> 9) ^ (lookup(v2 ^ acc ^ s1) << 3);
    acc = (acc << 23) ^ (acc >> 3) ^ s1 ^ (lookup(acc ^ v2 ^ (s1 >> 3)) << 7);
    acc = (acc << 17) ^ (acc >> 7) ^ (lookup(acc ^ (s1 >> 3)) << 5);
    acc = (acc << 13) ^ (acc >> 5) ^ (lookup((acc >> 5) ^ s1) << 1);
    acc = (acc << 11) ^ (acc >> 1) ^ (lookup(v2 ^ acc ^ s1) << 7);
    s1 = (s1 << 5) ^ (s1 >> 3) ^ acc ^ (lookup((acc >> 7) ^ (s1 >> 3)) << 6);
    s1 = (s1 << 8) ^ (s1 >> 6) ^ (lookup(s1 ^ v2) << 11);
    s1 = (s1 << 11) ^ (s1 >> 11) ^ (lookup(acc ^ (s1 >> 11)) << 5);
    s1 = (s1 << 7) ^ (s1 >> 5) ^ (lookup(v2 ^ (acc >> 7) ^ acc ^ s1) << 17);
    s2 = (s2 << 3) ^ (s2 >> 17) ^ s1 ^ (lookup(acc ^ (s2 >> 5) ^ v2) << 13);
    s2 = (s2 << 6) ^ (s2 >> 13) ^ (lookup(s2) << 11);
    s2 = (s2 << 11) ^ (s2 >> 11) ^ (lookup(acc ^ s1 ^ (s2 >> 11)) << 23);
    s2 = (s2 << 4) ^ (s2 >> 23) ^ (lookup(v2 ^ (acc >> 8) ^ acc ^ (s2 >> 10)) << 1);
    s1 = (s2 << 3) ^ (s2 >> 1) ^ lane.hs[idx] ^ v2;
    acc = (acc << 9) ^ (acc >> 7) ^ (s1 >> 1) ^ (lookup((s2 >> 1) ^ lane.hs[idx]) << 5);

    lane.acc = acc;
    lane.s1 = lane.s3;
    lane.s2 = s1;
    lane.s3 = s2;
}
