//! LXRHash: a memory-hard, byte-oriented hash function used as a
//! proof-of-work primitive.
//!
//! Evaluating the hash requires pseudo-random reads into a large
//! precomputed lookup table (the [`ByteMap`](bytemap::ByteMap)), typically
//! on the order of a gigabyte. That makes hashing bound by memory
//! bandwidth rather than ALU throughput: the table doesn't fit in on-chip
//! cache, and every mixing step depends on the previous table read, which
//! defeats pipelining and ASIC/GPU acceleration.
//!
//! Do not use this for anything that needs formal collision or preimage
//! resistance proofs. It targets empirical avalanche and uniform
//! byte-frequency properties, and proportionality between PoW difficulty
//! and random-access memory bandwidth, not cryptographic hardness.
//!
//! ```
//! use lxrhash::{HashConfig, Hash};
//!
//! let config = HashConfig::new(0xFAFAECECFAFAECEC, 16, 256, 2).unwrap();
//! let hash = Hash::new(config);
//! let digest = hash.hash(b"hello, lxrhash");
//! assert_eq!(digest.len(), 32);
//! ```

mod batch;
mod bench;
mod bytemap;
mod cache;
mod config;
mod error;
mod hash;
mod miner;
mod pow;
mod registry;

pub use bench::{benchmark, benchmark_cancellable};
pub use bytemap::ByteMap;
pub use cache::{default_table_dir, file_name, load_or_generate};
pub use config::{HashConfig, MAX_MAP_SIZE_BITS, MIN_MAP_SIZE_BITS};
pub use error::LxrError;
pub use hash::Hash;
pub use miner::{mine, mine_with_heartbeat, MiningEvent, NonceIncrementer, DEFAULT_HEARTBEAT};
pub use pow::{abort_settings, lxr_pow, pow};
pub use registry::SingletonRegistry;

/// The seed PegNet, the original adopter of LXRHash, uses for its default
/// table.
pub const DEFAULT_SEED: u64 = 0xFAFA_ECEC_FAFA_ECEC;

/// PegNet's default ByteMap size, in bits (`map_size = 2^25`).
pub const DEFAULT_MAP_SIZE_BITS: u64 = 25;

/// PegNet's default digest size, in bits.
pub const DEFAULT_HASH_SIZE_BITS: u64 = 256;

/// PegNet's default shuffle pass count.
pub const DEFAULT_PASSES: u64 = 10;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn readme_example_digest_length() {
        let config = HashConfig::new(DEFAULT_SEED, 16, DEFAULT_HASH_SIZE_BITS, 2).unwrap();
        let hash = Hash::new(config);
        assert_eq!(hash.hash(b"hello").len(), 32);
    }
}
