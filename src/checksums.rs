//! MD5 content hashing for resource files.
//!
//! Digests are written as hex, optionally prefixed (e.g. "md5:5a2e...").

use log::{debug, trace};
use md5::{Digest, Md5};
use std::fmt;
use std::io::Read;

/// Length of an MD5 digest in bytes
pub const DIGEST_LEN: usize = 16;

/// Read granularity of the verifier
const CHUNK_SIZE: usize = 1024;

/// 128-bit content digest
pub type Md5Digest = [u8; DIGEST_LEN];

/// Outcome of checking a file against its expected digest
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChecksumResult {
    /// The file exists and its digest matches
    Match,
    /// The file exists but its digest differs
    Mismatch,
    /// The file could not be opened
    NoFile,
}

impl ChecksumResult {
    /// Word used for this result in incompleteness reports
    pub fn label(self) -> &'static str {
        match self {
            ChecksumResult::Match => "valid",
            ChecksumResult::Mismatch => "corrupt",
            ChecksumResult::NoFile => "missing",
        }
    }
}

impl fmt::Display for ChecksumResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Parse a digest that may or may not carry an `md5:` prefix
pub fn parse_digest(digest_str: &str) -> Result<Md5Digest, String> {
    let hex_part = match digest_str.split_once(':') {
        Some(("md5", rest)) => rest,
        Some((algo, _)) => return Err(format!("Unknown checksum algorithm: {}", algo)),
        None => digest_str,
    };

    let bytes = hex::decode(hex_part.trim())
        .map_err(|e| format!("Invalid checksum '{}': {}", digest_str, e))?;
    bytes.try_into().map_err(|b: Vec<u8>| {
        format!(
            "Invalid checksum '{}': expected {} bytes, got {}",
            digest_str,
            DIGEST_LEN,
            b.len()
        )
    })
}

/// Compute the digest of at most `size` bytes of `reader`, stopping early
/// at end of stream. The reader is dropped before returning.
pub fn compute_md5<R: Read>(mut reader: R, size: u64) -> Md5Digest {
    let mut hasher = Md5::new();
    let mut buffer = [0u8; CHUNK_SIZE];
    let mut remaining = size;

    while remaining != 0 {
        let want = remaining.min(CHUNK_SIZE as u64) as usize;
        let len = match reader.read(&mut buffer[..want]) {
            Ok(0) => break,
            Ok(len) => len,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => {
                debug!("Read error while hashing, stopping early: {}", e);
                break;
            }
        };
        remaining -= len as u64;
        hasher.update(&buffer[..len]);
    }
    trace!("Hashed {} bytes", size - remaining);

    drop(reader);
    hasher.finalize().into()
}

/// Check at most `size` bytes of `reader` against `expected`. Takes
/// ownership of the reader so the underlying file is closed afterwards.
pub fn check_md5<R: Read>(reader: R, expected: &Md5Digest, size: u64) -> bool {
    compute_md5(reader, size) == *expected
}

/// Hex form of a digest
pub fn digest_to_hex(digest: &Md5Digest) -> String {
    hex::encode(digest)
}
