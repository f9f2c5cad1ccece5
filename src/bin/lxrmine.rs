//! Sample mining CLI. Not a prescriptive interface, just a thin driver over the
//! library's `mine`/`benchmark` entry points so the algorithm can be
//! exercised from a terminal.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Parser;
use lxrhash::{mine, HashConfig, MiningEvent};

#[derive(Parser, Debug)]
#[command(name = "lxrmine", about = "Mine with LXRHash proof-of-work")]
struct Args {
    /// Payload that every nonce is appended to.
    #[arg(long, default_value = "pegnet")]
    base: String,

    /// Number of worker threads (defaults to available CPU count).
    #[arg(long, default_value_t = 0)]
    workers: usize,

    /// ByteMap size in bits (2^k bytes).
    #[arg(long, default_value_t = 20)]
    map_size_bits: u64,

    /// Digest size in bits.
    #[arg(long, default_value_t = 256)]
    hash_size_bits: u64,

    /// ByteMap shuffle passes.
    #[arg(long, default_value_t = 5)]
    passes: u64,

    /// Optional run duration in seconds; mines forever if omitted.
    #[arg(long)]
    seconds: Option<u64>,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let workers = if args.workers == 0 {
        num_cpus::get()
    } else {
        args.workers
    };

    let config = HashConfig::new(
        lxrhash::DEFAULT_SEED,
        args.map_size_bits,
        args.hash_size_bits,
        args.passes,
    )
    .expect("invalid hash configuration");

    log::info!(
        "building ByteMap: {} bytes, {} passes",
        config.map_size(),
        config.passes()
    );
    let hash = Arc::new(lxrhash::Hash::new(config));

    let cancel = Arc::new(AtomicBool::new(false));
    let deadline = args.seconds.map(|s| Instant::now() + Duration::from_secs(s));

    let rx = mine(hash, args.base.into_bytes(), workers, cancel, deadline);

    let mut best = 0u64;
    for event in rx {
        match event {
            MiningEvent::Improvement {
                worker_id,
                nonce,
                pow,
                ..
            } => {
                if pow > best {
                    best = pow;
                    println!(
                        "worker {worker_id} improved: pow={pow:#018x} nonce={nonce:02x?}",
                    );
                }
            }
            MiningEvent::Heartbeat { hashes, elapsed } => {
                let hps = hashes as f64 / elapsed.as_secs_f64().max(0.001);
                println!("heartbeat: {hashes} hashes in {elapsed:?} ({hps:.0} h/s)");
            }
        }
    }
}
