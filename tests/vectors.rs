//! Byte-for-byte digest vectors against the canonical config
//! `seed = 0xFAFAECECFAFAECEC, k = 30, H_bits = 256, passes = 5`.

use lxrhash::{Hash, HashConfig};

fn canonical_hash() -> Hash {
    let config = HashConfig::new(0xFAFAECECFAFAECEC, 30, 256, 5).unwrap();
    Hash::new(config)
}

#[test]
fn canonical_vectors_match() {
    let hash = canonical_hash();

    let cases: &[(&[u8], &str)] = &[
        (
            b"",
            "66afa4d58ff4b99ef77f7bc2dc7567a23ccb47edab1486fccc3e9556bc64e9cc",
        ),
        (
            b"abcde",
            "00e9ef8262f154b6aef3b4bb1a95644bbd651040df34c3d88dd696d519445989",
        ),
        (
            b"bar",
            "66a7c02adcf00ed55a11877fa543ccc27a0a4c59268cc36cd8fe9616ce6cda63",
        ),
        (
            b"foo",
            "93a2eaf76b8cc21610601fb5a87f8f6ea57ef0fc1e6eaf414e7b6eac186bca16",
        ),
        (
            b"pegnet",
            "84c5bc3b47965e0fff9e66871b94dd7d2cd1f866102a6c1cd7ef30eb3ee737ef",
        ),
    ];

    for (input, expected_hex) in cases {
        assert_eq!(hex::encode(hash.hash(input)), *expected_hex, "input {:?}", input);
    }
}

#[test]
fn avalanche_smoke_test_matches_batched_single_item() {
    use rand::{Rng, SeedableRng};

    let config = HashConfig::new(0x1234_5678_9abc_def0, 16, 256, 2).unwrap();
    let hash = Hash::new(config);
    let mut rng = rand::rngs::SmallRng::seed_from_u64(42);

    for _ in 0..1000 {
        let len = rng.gen_range(0..100);
        let mut input = vec![0u8; len];
        rng.fill(input.as_mut_slice());

        let serial = hash.hash(&input);
        let batched = hash.hash_batch(&[], &[&input]);
        assert_eq!(serial, batched[0]);
    }
}

#[test]
fn hash_batch_matches_serial_for_shared_prefix() {
    let hash = canonical_hash();
    let prefix = b"pegnet-";
    let suffixes: Vec<&[u8]> = vec![b"one", b"two", b"three-longer-suffix", b""];

    let batched = hash.hash_batch(prefix, &suffixes);
    for (digest, suffix) in batched.iter().zip(suffixes.iter()) {
        let mut full = prefix.to_vec();
        full.extend_from_slice(suffix);
        assert_eq!(digest, &hash.hash(&full));
    }
}
