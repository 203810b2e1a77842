//! File hashing for content comparison using SHA-256

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use sha2::{Digest, Sha256};

/// File hash result
pub type FileHash = [u8; 32];

/// Streaming read buffer size
const BUFFER_SIZE: usize = 64 * 1024;

/// File hasher
pub struct FileHasher;

impl FileHasher {
    /// Compute SHA-256 hash of a file by streaming its contents
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or read.
    pub fn hash(path: &Path) -> io::Result<FileHash> {
        let file = File::open(path)?;
        Self::hash_reader(BufReader::new(file))
    }

    /// Compute SHA-256 hash of everything a reader yields
    ///
    /// # Errors
    ///
    /// Returns an error if reading fails.
    pub fn hash_reader(mut reader: impl Read) -> io::Result<FileHash> {
        let mut hasher = Sha256::new();
        let mut buffer = vec![0; BUFFER_SIZE];

        loop {
            match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => hasher.update(&buffer[..n]),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }

        Ok(hasher.finalize().into())
    }
}
