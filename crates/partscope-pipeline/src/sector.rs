//! Sector-addressed reads over a disk image stream

use partscope_core::{
    checked_add_u64, checked_multiply_u64, validate_sector_size, Error, ReadSeek, Result,
};
use std::io::{Read, Seek, SeekFrom};

/// Largest buffer reserved up front for a single read; bigger reads grow as data arrives
const PREALLOCATION_LIMIT: usize = 1024 * 1024;

/// Reads whole sectors and byte ranges from an image, distinguishing
/// "the image ended early" from I/O failures.
pub struct SectorReader<'a> {
    stream: &'a mut dyn ReadSeek,
    sector_size: u32,
}

impl<'a> SectorReader<'a> {
    /// Wrap a stream with a validated sector size
    pub fn new(stream: &'a mut dyn ReadSeek, sector_size: u32) -> Result<Self> {
        validate_sector_size(sector_size)?;
        Ok(Self {
            stream,
            sector_size,
        })
    }

    /// Sector size in bytes
    pub fn sector_size(&self) -> u32 {
        self.sector_size
    }

    /// Byte offset of `lba`
    pub fn sector_offset(&self, lba: u64) -> Result<u64> {
        checked_multiply_u64(lba, self.sector_size as u64, "sector offset")
    }

    /// Total length of the underlying stream
    pub fn stream_len(&mut self) -> Result<u64> {
        Ok(self.stream.seek(SeekFrom::End(0))?)
    }

    /// Read up to `len` bytes at `offset`, returning fewer if the image ends first
    pub fn read_up_to(&mut self, offset: u64, len: usize) -> Result<Vec<u8>> {
        checked_add_u64(offset, len as u64, "read range")?;
        self.stream.seek(SeekFrom::Start(offset))?;

        let mut buf = Vec::with_capacity(len.min(PREALLOCATION_LIMIT));
        (&mut *self.stream).take(len as u64).read_to_end(&mut buf)?;

        if buf.len() < len {
            tracing::debug!(
                "Read of {} bytes at offset {} returned {} bytes",
                len,
                offset,
                buf.len()
            );
        }
        Ok(buf)
    }

    /// Read exactly `len` bytes at `offset`
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShortRead`] naming `context` if the image ends first
    pub fn read_exact_at(&mut self, offset: u64, len: usize, context: &str) -> Result<Vec<u8>> {
        let buf = self.read_up_to(offset, len)?;
        if buf.len() < len {
            return Err(Error::short_read(context, len as u64, buf.len() as u64));
        }
        Ok(buf)
    }

    /// Read one full sector
    pub fn read_sector(&mut self, lba: u64, context: &str) -> Result<Vec<u8>> {
        let offset = self.sector_offset(lba)?;
        self.read_exact_at(offset, self.sector_size as usize, context)
    }
}
