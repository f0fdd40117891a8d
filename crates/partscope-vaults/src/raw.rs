//! Raw vault - direct sector image container
//!
//! A raw sector image with no container metadata, as produced by `dd`.
//! Common file extensions: .img, .dd, .raw, .bin

use partscope_core::{ReadSeek, Result, Vault};
use partscope_pipeline::MmapPipeline;
use std::fs::File;
use std::io::{Cursor, Read, Seek};
use std::path::Path;

/// Configuration for opening a vault
#[derive(Debug, Clone)]
pub struct VaultConfig {
    /// Memory-map the image instead of issuing a read call per access
    pub use_mmap: bool,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self { use_mmap: true }
    }
}

/// Raw vault - a passthrough to the underlying image
///
/// # Example
///
/// ```rust,no_run
/// use partscope_vaults::{RawVault, VaultConfig};
/// use partscope_core::Vault;
/// use std::path::Path;
///
/// let vault = RawVault::open(Path::new("disk.img"), VaultConfig::default()).unwrap();
/// println!("Vault type: {}", vault.identify());
/// println!("Size: {} bytes", vault.length());
/// ```
pub struct RawVault {
    pipeline: Box<dyn ReadSeek>,
    length: u64,
}

impl RawVault {
    /// Open a raw vault from a file path
    ///
    /// # Errors
    ///
    /// Returns [`partscope_core::Error::SourceUnavailable`] if the file cannot
    /// be opened, inspected or mapped
    pub fn open(path: &Path, config: VaultConfig) -> Result<Self> {
        let file = File::open(path)?;
        let length = file.metadata()?.len();

        // Zero-length files cannot be mapped on every platform
        let pipeline: Box<dyn ReadSeek> = if config.use_mmap && length > 0 {
            Box::new(MmapPipeline::from_file(&file)?)
        } else {
            Box::new(file)
        };

        tracing::debug!(
            "Opened raw vault {} ({} bytes, mmap: {})",
            path.display(),
            length,
            config.use_mmap && length > 0
        );

        Ok(Self { pipeline, length })
    }

    /// Create a raw vault from any readable and seekable stream
    pub fn from_stream<R: Read + Seek + Send + 'static>(stream: R, length: u64) -> Self {
        Self {
            pipeline: Box::new(stream),
            length,
        }
    }

    /// Create a raw vault over an in-memory image
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        let length = bytes.len() as u64;
        Self::from_stream(Cursor::new(bytes), length)
    }
}

impl Vault for RawVault {
    fn identify(&self) -> &str {
        "Raw sector image"
    }

    fn length(&self) -> u64 {
        self.length
    }

    fn content(&mut self) -> &mut dyn ReadSeek {
        &mut *self.pipeline
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use partscope_core::Error;
    use std::io::{SeekFrom, Write};
    use tempfile::NamedTempFile;

    fn image_file(len: usize) -> NamedTempFile {
        let mut tmpfile = NamedTempFile::new().unwrap();
        let data: Vec<u8> = (0u8..=255).cycle().take(len).collect();
        tmpfile.write_all(&data).unwrap();
        tmpfile.flush().unwrap();
        tmpfile
    }

    #[test]
    fn test_raw_vault_from_bytes() {
        let mut vault = RawVault::from_bytes((0..100).collect());

        assert_eq!(vault.identify(), "Raw sector image");
        assert_eq!(vault.length(), 100);

        vault.content().seek(SeekFrom::Start(50)).unwrap();
        let mut buf = [0u8; 5];
        vault.content().read_exact(&mut buf).unwrap();
        assert_eq!(&buf, &[50, 51, 52, 53, 54]);
    }

    #[test]
    fn test_raw_vault_open_with_and_without_mmap() {
        let tmpfile = image_file(1000);

        for use_mmap in [true, false] {
            let mut vault = RawVault::open(tmpfile.path(), VaultConfig { use_mmap }).unwrap();
            assert_eq!(vault.length(), 1000);

            let mut buf = [0u8; 10];
            vault.content().read_exact(&mut buf).unwrap();
            assert_eq!(&buf, &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9]);
        }
    }

    #[test]
    fn test_raw_vault_open_empty_file() {
        let tmpfile = image_file(0);
        let mut vault = RawVault::open(tmpfile.path(), VaultConfig::default()).unwrap();

        assert_eq!(vault.length(), 0);
        let mut buf = Vec::new();
        assert_eq!(vault.content().read_to_end(&mut buf).unwrap(), 0);
    }

    #[test]
    fn test_raw_vault_missing_file() {
        let result = RawVault::open(
            Path::new("/nonexistent/partscope/disk.img"),
            VaultConfig::default(),
        );
        assert!(matches!(result, Err(Error::SourceUnavailable(_))));
    }
}
