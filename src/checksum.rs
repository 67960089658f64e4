//! Content checksums for deployable files
//!
//! Computes the md5/sha1 digest pair attached to every published artifact.
//! Both digests are produced from a single read of the file.

use md5::Md5;
use sha1::{Digest, Sha1};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Errors for checksum computation
#[derive(Debug, thiserror::Error)]
pub enum ChecksumError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Not a regular file: {0}")]
    NotAFile(PathBuf),
}

/// md5/sha1 digest pair, hex-encoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checksums {
    pub md5: String,
    pub sha1: String,
}

/// Compute md5 and sha1 for a regular file.
///
/// A missing or unreadable file is an error; callers that treat checksums as
/// optional decide themselves whether to recover.
pub fn compute_checksums(path: &Path) -> Result<Checksums, ChecksumError> {
    if !path.is_file() {
        return Err(ChecksumError::NotAFile(path.to_path_buf()));
    }

    let contents = fs::read(path)?;

    let md5 = {
        let mut hasher = Md5::new();
        hasher.update(&contents);
        hex::encode(hasher.finalize())
    };
    let sha1 = {
        let mut hasher = Sha1::new();
        hasher.update(&contents);
        hex::encode(hasher.finalize())
    };

    Ok(Checksums { md5, sha1 })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_known_digests() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("hello.txt");
        fs::write(&path, "hello").unwrap();

        let sums = compute_checksums(&path).unwrap();
        assert_eq!(sums.md5, "5d41402abc4b2a76b9719d911017c592");
        assert_eq!(sums.sha1, "aaf4c61ddcc5e8a2dabede0f3b482cd9aea9434d");
    }

    #[test]
    fn test_empty_file_digests() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty");
        fs::write(&path, "").unwrap();

        let sums = compute_checksums(&path).unwrap();
        assert_eq!(sums.md5, "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(sums.sha1, "da39a3ee5e6b4b0d3255bfef95601890afd80709");
    }

    #[test]
    fn test_missing_file_is_error() {
        let dir = TempDir::new().unwrap();
        let result = compute_checksums(&dir.path().join("absent.jar"));
        assert!(matches!(result, Err(ChecksumError::NotAFile(_))));
    }

    #[test]
    fn test_directory_is_error() {
        let dir = TempDir::new().unwrap();
        let result = compute_checksums(dir.path());
        assert!(matches!(result, Err(ChecksumError::NotAFile(_))));
    }
}
