//! Content hashing.
//!
//! SHA-256 digests for content-addressed deduplication. Digests are
//! chunking-independent: hashing a file streamed in blocks equals hashing
//! the same bytes in memory. The indexing flow does not consult these yet.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};

/// Bytes read per iteration when streaming a file.
const HASH_CHUNK_SIZE: usize = 1024 * 1024;

/// SHA-256 hex digest of a file's content, streamed in fixed-size chunks.
pub fn file_sha256(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let mut file = File::open(path)
        .with_context(|| format!("Failed to open file for hashing: {}", path.display()))?;

    let mut hasher = Sha256::new();
    let mut buf = vec![0_u8; HASH_CHUNK_SIZE];

    loop {
        let count = file
            .read(&mut buf)
            .with_context(|| format!("Failed to read file for hashing: {}", path.display()))?;
        if count == 0 {
            break;
        }
        hasher.update(&buf[..count]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

/// SHA-256 hex digest of an in-memory buffer.
pub fn bytes_sha256(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn empty_input_matches_known_digest() {
        assert_eq!(
            bytes_sha256(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn file_digest_equals_buffer_digest() {
        // Larger than one read chunk so the streaming path is exercised.
        let data: Vec<u8> = (0..(HASH_CHUNK_SIZE + 4096))
            .map(|i| (i % 251) as u8)
            .collect();

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&data).unwrap();
        file.flush().unwrap();

        assert_eq!(file_sha256(file.path()).unwrap(), bytes_sha256(&data));
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(file_sha256("/nonexistent/frame.jpg").is_err());
    }
}
