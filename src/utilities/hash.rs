// File Hashing
// MD5 checksums used to verify backup archives

use anyhow::{Context, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// MD5 hash of a file's contents as lowercase hex, streamed in 4 KiB
/// chunks so large archives are not pulled into memory.
pub fn md5_file_hash(path: &Path) -> Result<String> {
    let mut file =
        File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let mut context = md5::Context::new();
    let mut buffer = [0u8; 4096];
    loop {
        let read = file
            .read(&mut buffer)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        if read == 0 {
            break;
        }
        context.consume(&buffer[..read]);
    }
    Ok(format!("{:x}", context.compute()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_known_digest() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.bin");
        File::create(&path)
            .unwrap()
            .write_all(b"hello world")
            .unwrap();

        assert_eq!(
            md5_file_hash(&path).unwrap(),
            "5eb63bbbe01eeed093cb22bb8f5acdc3"
        );
    }

    #[test]
    fn test_empty_file_digest() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty");
        File::create(&path).unwrap();

        assert_eq!(
            md5_file_hash(&path).unwrap(),
            "d41d8cd98f00b204e9800998ecf8427e"
        );
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(md5_file_hash(Path::new("/no/such/file")).is_err());
    }
}
