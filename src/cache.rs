//! On-disk ByteMap caching: a raw, headerless blob named by the
//! parameters that produced it.
//!
//! An existing file is used verbatim if (and only if) its length exactly
//! matches `map_size`; otherwise it is treated as missing, regenerated,
//! and overwritten.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use crate::bytemap::ByteMap;
use crate::config::HashConfig;
use crate::error::LxrError;

/// Bytes written per chunk when persisting a ByteMap to disk.
const WRITE_CHUNK: usize = 4096;

/// Builds the content-addressed filename for a config's ByteMap:
/// `lxrhash-seed-<seed:hex>-passes-<passes>-size-<k>.dat`.
pub fn file_name(config: &HashConfig) -> String {
    format!(
        "lxrhash-seed-{:x}-passes-{}-size-{}.dat",
        config.seed(),
        config.passes(),
        config.map_size_bits()
    )
}

/// Resolves the user-local table directory default: `$HOME/.lxrhash` (or
/// the platform equivalent via the `dirs` crate).
pub fn default_table_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".lxrhash"))
}

/// Loads a config's ByteMap from `dir`, generating and persisting it if
/// absent or the wrong size.
///
/// Returns the map along with whether it was freshly generated. Write
/// failures after a fresh generation are reported via `LxrError`, but the
/// returned map is still usable; the instance just wasn't persisted.
pub fn load_or_generate(dir: &Path, config: &HashConfig) -> Result<ByteMap, LxrError> {
    let path = dir.join(file_name(config));
    let expected_len = config.map_size() as usize;

    if let Some(map) = try_read(&path, expected_len)? {
        log::info!("loaded ByteMap table from {}", path.display());
        return Ok(map);
    }

    log::info!(
        "generating ByteMap table ({} bytes, {} passes)",
        expected_len,
        config.passes()
    );
    let map = ByteMap::generate(config);
    if let Err(err) = write(&path, &map) {
        log::warn!("failed to persist ByteMap table to {}: {err}", path.display());
        return Err(LxrError::TableIoFailure {
            path,
            source: err,
        });
    }
    Ok(map)
}

/// Reads `path` if it exists and is exactly `expected_len` bytes long.
/// Any other length, or a read failure, is treated as "not cached" rather
/// than propagated; the caller falls back to generation.
fn try_read(path: &Path, expected_len: usize) -> Result<Option<ByteMap>, LxrError> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(_) => return Ok(None),
    };

    let mut reader = BufReader::new(file);
    let mut buf = Vec::with_capacity(expected_len);
    reader
        .read_to_end(&mut buf)
        .map_err(|source| LxrError::TableIoFailure {
            path: path.to_path_buf(),
            source,
        })?;

    if buf.len() != expected_len {
        return Ok(None);
    }
    Ok(Some(ByteMap::from_raw(buf.into_boxed_slice())))
}

/// Writes a ByteMap to `path` in 4 KiB chunks through a buffered writer,
/// creating parent directories as needed.
fn write(path: &Path, map: &ByteMap) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    for chunk in map.as_bytes().chunks(WRITE_CHUNK) {
        writer.write_all(chunk)?;
    }
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_cache() {
        let dir = std::env::temp_dir().join(format!("lxrhash-cache-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let cfg = HashConfig::new(0x1122_3344, 10, 256, 1).unwrap();
        let generated = load_or_generate(&dir, &cfg).unwrap();
        let reloaded = load_or_generate(&dir, &cfg).unwrap();
        assert_eq!(generated.as_bytes(), reloaded.as_bytes());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn mismatched_length_file_is_regenerated() {
        let dir = std::env::temp_dir().join(format!("lxrhash-cache-test-bad-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let cfg = HashConfig::new(7, 10, 256, 1).unwrap();
        let path = dir.join(file_name(&cfg));
        std::fs::write(&path, vec![0u8; 3]).unwrap();

        let map = load_or_generate(&dir, &cfg).unwrap();
        assert_eq!(map.len(), cfg.map_size() as usize);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn filename_matches_contract() {
        let cfg = HashConfig::new(0xFAFAECECFAFAECEC, 30, 256, 5).unwrap();
        assert_eq!(
            file_name(&cfg),
            "lxrhash-seed-fafaececfafaecec-passes-5-size-30.dat"
        );
    }
}
