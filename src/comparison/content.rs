//! Content equality for two files of equal size
//!
//! Files up to the threshold are compared byte for byte, stopping at the
//! first difference. Larger files are compared by SHA-256 digest.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use super::hash::FileHasher;
use super::Side;

const CHUNK_SIZE: usize = 64 * 1024;

/// A read failure on one side of a content comparison
#[derive(Debug)]
pub struct ContentError {
    /// Which file failed
    pub side: Side,
    /// The failure
    pub error: io::Error,
}

impl ContentError {
    fn on(side: Side) -> impl FnOnce(io::Error) -> Self {
        move |error| Self { side, error }
    }
}

/// Compares file contents
#[derive(Debug, Clone, Copy)]
pub struct ContentComparator {
    checksum_threshold: u64,
}

impl ContentComparator {
    /// Create a comparator switching to checksums above `checksum_threshold` bytes
    #[must_use]
    pub const fn new(checksum_threshold: u64) -> Self {
        Self { checksum_threshold }
    }

    /// Whether two files of `size` bytes have the same content
    ///
    /// # Errors
    ///
    /// Returns the side and cause of the first read failure.
    pub fn equal(&self, left: &Path, right: &Path, size: u64) -> Result<bool, ContentError> {
        if size > self.checksum_threshold {
            let l = FileHasher::hash(left).map_err(ContentError::on(Side::Left))?;
            let r = FileHasher::hash(right).map_err(ContentError::on(Side::Right))?;
            return Ok(l == r);
        }

        let l = File::open(left).map_err(ContentError::on(Side::Left))?;
        let r = File::open(right).map_err(ContentError::on(Side::Right))?;
        bytes_equal(BufReader::new(l), BufReader::new(r))
    }
}

fn bytes_equal(mut left: impl Read, mut right: impl Read) -> Result<bool, ContentError> {
    let mut lbuf = vec![0; CHUNK_SIZE];
    let mut rbuf = vec![0; CHUNK_SIZE];

    loop {
        let n = fill(&mut left, &mut lbuf).map_err(ContentError::on(Side::Left))?;
        let m = fill(&mut right, &mut rbuf).map_err(ContentError::on(Side::Right))?;

        if n != m || lbuf[..n] != rbuf[..m] {
            return Ok(false);
        }
        if n == 0 {
            return Ok(true);
        }
    }
}

/// Read until the buffer is full or the reader is exhausted
fn fill(reader: &mut impl Read, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn pair(tmp: &TempDir, left: &[u8], right: &[u8]) -> (std::path::PathBuf, std::path::PathBuf) {
        let l = tmp.path().join("left");
        let r = tmp.path().join("right");
        fs::write(&l, left).unwrap();
        fs::write(&r, right).unwrap();
        (l, r)
    }

    #[test]
    fn test_bytewise_equal() {
        let tmp = TempDir::new().unwrap();
        let (l, r) = pair(&tmp, b"ACGT", b"ACGT");

        assert!(ContentComparator::new(1024).equal(&l, &r, 4).unwrap());
    }

    #[test]
    fn test_bytewise_differs() {
        let tmp = TempDir::new().unwrap();
        let (l, r) = pair(&tmp, b"ACGT", b"ACGA");

        assert!(!ContentComparator::new(1024).equal(&l, &r, 4).unwrap());
    }

    #[test]
    fn test_difference_past_first_chunk() {
        let tmp = TempDir::new().unwrap();
        let mut left = vec![b'N'; CHUNK_SIZE * 2 + 10];
        let right = left.clone();
        left[CHUNK_SIZE + 5] = b'A';
        let (l, r) = pair(&tmp, &left, &right);

        let size = left.len() as u64;
        assert!(!ContentComparator::new(u64::MAX).equal(&l, &r, size).unwrap());
    }

    #[test]
    fn test_checksum_above_threshold() {
        let tmp = TempDir::new().unwrap();
        let (l, r) = pair(&tmp, b"same bytes", b"same bytes");
        assert!(ContentComparator::new(1).equal(&l, &r, 10).unwrap());

        let (l, r) = pair(&tmp, b"same bytes", b"diff bytes");
        assert!(!ContentComparator::new(1).equal(&l, &r, 10).unwrap());
    }

    #[test]
    fn test_missing_right_reports_side() {
        let tmp = TempDir::new().unwrap();
        let l = tmp.path().join("left");
        fs::write(&l, b"x").unwrap();

        let err = ContentComparator::new(1024)
            .equal(&l, &tmp.path().join("absent"), 1)
            .unwrap_err();

        assert_eq!(err.side, Side::Right);
        assert_eq!(err.error.kind(), io::ErrorKind::NotFound);
    }
}
