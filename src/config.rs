//! Hash configuration: the `(seed, map_size_bits, hash_size_bits, passes)`
//! tuple that fully determines a ByteMap and the digests produced from it.

use crate::error::LxrError;

/// Minimum allowed `map_size_bits`. Below this the ByteMap would be smaller
/// than a single pass over all 256 byte values, which breaks the frequency
/// invariant the generator relies on.
pub const MIN_MAP_SIZE_BITS: u64 = 8;

/// Maximum allowed `map_size_bits`. Beyond this a ByteMap no longer fits any
/// plausible memory budget; 2^40 bytes is already a full terabyte.
pub const MAX_MAP_SIZE_BITS: u64 = 40;

/// Parameters that determine a ByteMap and the digests derived from it.
///
/// Two configs with identical `(seed, map_size_bits, hash_size_bits,
/// passes)` always produce byte-identical ByteMaps and digests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HashConfig {
    seed: u64,
    map_size_bits: u64,
    hash_size_bytes: u64,
    passes: u64,
}

impl HashConfig {
    /// Builds a config, rejecting `map_size_bits` outside `8..=40`.
    ///
    /// `hash_size_bits` is rounded up to the nearest byte boundary.
    pub fn new(
        seed: u64,
        map_size_bits: u64,
        hash_size_bits: u64,
        passes: u64,
    ) -> Result<Self, LxrError> {
        if !(MIN_MAP_SIZE_BITS..=MAX_MAP_SIZE_BITS).contains(&map_size_bits) {
            return Err(LxrError::ConfigRejected {
                reason: format!(
                    "map_size_bits must be between {MIN_MAP_SIZE_BITS} and {MAX_MAP_SIZE_BITS}, got {map_size_bits}"
                ),
            });
        }
        let hash_size_bytes = (hash_size_bits + 7) / 8;
        if hash_size_bytes == 0 {
            return Err(LxrError::ConfigRejected {
                reason: "hash_size_bits must be at least 1".to_string(),
            });
        }
        Ok(Self {
            seed,
            map_size_bits,
            hash_size_bytes,
            passes,
        })
    }

    /// The seed used both for ByteMap generation and as the hash's initial
    /// accumulator state.
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// `k` in `map_size = 2^k`.
    #[inline]
    pub fn map_size_bits(&self) -> u64 {
        self.map_size_bits
    }

    /// `2^k`, the ByteMap length in bytes.
    #[inline]
    pub fn map_size(&self) -> u64 {
        1u64 << self.map_size_bits
    }

    /// `map_size - 1`; ANDing with this masks any `u64` into `0..map_size`.
    #[inline]
    pub fn map_mask(&self) -> u64 {
        self.map_size() - 1
    }

    /// Digest length in bytes.
    #[inline]
    pub fn hash_size_bytes(&self) -> u64 {
        self.hash_size_bytes
    }

    /// Number of shuffle passes the ByteMap generator performs.
    #[inline]
    pub fn passes(&self) -> u64 {
        self.passes
    }

    /// A string key uniquely identifying this parameter tuple, used by the
    /// singleton registry and the ByteMap cache filename.
    pub fn registry_key(&self) -> String {
        format!(
            "{:x}-{}-{}-{}",
            self.seed, self.map_size_bits, self.hash_size_bytes, self.passes
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_undersized_map() {
        assert!(HashConfig::new(0, 7, 256, 5).is_err());
    }

    #[test]
    fn rejects_oversized_map() {
        assert!(HashConfig::new(0, 41, 256, 5).is_err());
    }

    #[test]
    fn accepts_boundary_sizes() {
        assert!(HashConfig::new(0, 8, 256, 5).is_ok());
        assert!(HashConfig::new(0, 40, 256, 5).is_ok());
    }

    #[test]
    fn rounds_hash_size_up_to_byte_boundary() {
        let cfg = HashConfig::new(0, 10, 9, 1).unwrap();
        assert_eq!(cfg.hash_size_bytes(), 2);
    }

    #[test]
    fn map_mask_is_map_size_minus_one() {
        let cfg = HashConfig::new(0, 10, 256, 1).unwrap();
        assert_eq!(cfg.map_size(), 1024);
        assert_eq!(cfg.map_mask(), 1023);
    }
}
