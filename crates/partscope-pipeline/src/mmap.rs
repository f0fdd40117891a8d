//! Memory-mapped pipeline for whole-image access

use memmap2::Mmap;
use partscope_core::MAX_MMAP_SIZE;
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;

/// A read-only stream backed by a memory-mapped disk image.
///
/// # Example
///
/// ```rust,no_run
/// use partscope_pipeline::MmapPipeline;
/// use std::path::Path;
///
/// let pipeline = MmapPipeline::open(Path::new("disk.img")).unwrap();
/// println!("{} bytes mapped", pipeline.len());
/// ```
pub struct MmapPipeline {
    mmap: Mmap,
    position: u64,
}

impl MmapPipeline {
    /// Open and map a disk image
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened, is not a regular file,
    /// or exceeds [`MAX_MMAP_SIZE`].
    pub fn open(path: &Path) -> io::Result<Self> {
        let file = File::open(path)?;
        Self::from_file(&file)
    }

    /// Map an already opened disk image
    ///
    /// # Safety
    ///
    /// Uses `unsafe` for memory mapping. The mapping is read-only and the
    /// file must not be truncated while the pipeline is alive (caller
    /// responsibility).
    pub fn from_file(file: &File) -> io::Result<Self> {
        let metadata = file.metadata()?;

        if !metadata.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "Only regular files can be memory-mapped",
            ));
        }

        if metadata.len() > MAX_MMAP_SIZE {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "File size {} exceeds memory mapping limit {}",
                    metadata.len(),
                    MAX_MMAP_SIZE
                ),
            ));
        }

        // SAFETY: regular file, bounded size, read-only private mapping.
        let mmap = unsafe { Mmap::map(file)? };
        Ok(Self { mmap, position: 0 })
    }

    /// Get the length of the mapped region
    pub fn len(&self) -> u64 {
        self.mmap.len() as u64
    }

    /// Check if the mapped region is empty
    pub fn is_empty(&self) -> bool {
        self.mmap.is_empty()
    }

    /// Get the current position
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Get remaining bytes from current position
    pub fn remaining(&self) -> u64 {
        self.len().saturating_sub(self.position)
    }

    /// Borrow `len` bytes at `offset` without copying, clamped to the mapping
    pub fn slice_at(&self, offset: u64, len: usize) -> &[u8] {
        let start = offset.min(self.len()) as usize;
        let end = start.saturating_add(len).min(self.mmap.len());
        &self.mmap[start..end]
    }
}

impl Read for MmapPipeline {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let chunk = self.slice_at(self.position, buf.len());
        let n = chunk.len();
        buf[..n].copy_from_slice(chunk);
        self.position += n as u64;
        Ok(n)
    }
}

impl Seek for MmapPipeline {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let new_pos = match pos {
            SeekFrom::Start(offset) => Some(offset),
            SeekFrom::End(offset) => self.len().checked_add_signed(offset),
            SeekFrom::Current(offset) => self.position.checked_add_signed(offset),
        };

        // Seeking past EOF is allowed, reads there return 0 bytes
        match new_pos {
            Some(p) => {
                self.position = p;
                Ok(p)
            }
            None => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "Seek before beginning of image",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn image_with(data: &[u8]) -> NamedTempFile {
        let mut tmpfile = NamedTempFile::new().unwrap();
        tmpfile.write_all(data).unwrap();
        tmpfile.flush().unwrap();
        tmpfile
    }

    #[test]
    fn test_mmap_pipeline_read_and_seek() {
        let data: Vec<u8> = (0..100).collect();
        let tmpfile = image_with(&data);

        let mut pipeline = MmapPipeline::open(tmpfile.path()).unwrap();
        assert_eq!(pipeline.len(), 100);
        assert!(!pipeline.is_empty());

        let mut buf = [0u8; 10];
        assert_eq!(pipeline.read(&mut buf).unwrap(), 10);
        assert_eq!(&buf, &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9]);
        assert_eq!(pipeline.position(), 10);

        pipeline.seek(SeekFrom::End(-5)).unwrap();
        let mut tail = Vec::new();
        pipeline.read_to_end(&mut tail).unwrap();
        assert_eq!(tail, vec![95, 96, 97, 98, 99]);
        assert_eq!(pipeline.remaining(), 0);
    }

    #[test]
    fn test_mmap_pipeline_read_past_end() {
        let tmpfile = image_with(&[0xAB; 16]);
        let mut pipeline = MmapPipeline::open(tmpfile.path()).unwrap();

        pipeline.seek(SeekFrom::Start(1000)).unwrap();
        let mut buf = [0u8; 8];
        assert_eq!(pipeline.read(&mut buf).unwrap(), 0);
        assert!(pipeline.seek(SeekFrom::Current(-2000)).is_err());
    }

    #[test]
    fn test_mmap_pipeline_slice_at() {
        let data: Vec<u8> = (0..100).collect();
        let tmpfile = image_with(&data);
        let pipeline = MmapPipeline::open(tmpfile.path()).unwrap();

        assert_eq!(pipeline.slice_at(98, 10), &[98, 99]);
        assert!(pipeline.slice_at(500, 10).is_empty());
    }
}
