//! Partial pipeline - a bounded window over one region of a disk image

use std::io::{self, Read, Seek, SeekFrom};

/// A stream that exposes only `start..start + length` of an underlying image.
///
/// Used to present a single partition as an independent stream, for example
/// to preview its first sector.
///
/// # Example
///
/// ```rust
/// use partscope_pipeline::PartialPipeline;
/// use std::io::{Cursor, Read};
///
/// let image: Vec<u8> = (0..=255).collect();
/// let mut window = PartialPipeline::new(Cursor::new(image), 16, 4).unwrap();
///
/// let mut buf = Vec::new();
/// window.read_to_end(&mut buf).unwrap();
/// assert_eq!(buf, vec![16, 17, 18, 19]);
/// ```
pub struct PartialPipeline<R: Read + Seek> {
    inner: R,
    start: u64,
    length: u64,
    position: u64,
}

impl<R: Read + Seek> PartialPipeline<R> {
    /// Create a window of `length` bytes beginning at `start`
    ///
    /// # Errors
    ///
    /// Returns an error if the inner stream cannot seek to `start`
    pub fn new(mut inner: R, start: u64, length: u64) -> io::Result<Self> {
        inner.seek(SeekFrom::Start(start))?;

        Ok(Self {
            inner,
            start,
            length,
            position: 0,
        })
    }

    /// Offset of the window within the inner stream
    pub fn start(&self) -> u64 {
        self.start
    }

    /// Length of the window
    pub fn length(&self) -> u64 {
        self.length
    }

    /// Current position relative to `start`
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Bytes left before the end of the window
    pub fn remaining(&self) -> u64 {
        self.length.saturating_sub(self.position)
    }

    /// Read up to `max` bytes from the beginning of the window
    ///
    /// Returns fewer bytes when the window or the inner stream ends first.
    pub fn head(&mut self, max: usize) -> io::Result<Vec<u8>> {
        self.seek(SeekFrom::Start(0))?;
        let mut buf = Vec::with_capacity(max.min(self.length as usize));
        self.by_ref().take(max as u64).read_to_end(&mut buf)?;
        Ok(buf)
    }
}

impl<R: Read + Seek> Read for PartialPipeline<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let remaining = self.remaining();
        if remaining == 0 {
            return Ok(0);
        }

        let to_read = (buf.len() as u64).min(remaining) as usize;

        // The inner stream may be shared with other readers, so always re-seek
        self.inner
            .seek(SeekFrom::Start(self.start + self.position))?;
        let bytes_read = self.inner.read(&mut buf[..to_read])?;

        self.position += bytes_read as u64;
        Ok(bytes_read)
    }
}

impl<R: Read + Seek> Seek for PartialPipeline<R> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let new_pos = match pos {
            SeekFrom::Start(offset) => Some(offset),
            SeekFrom::End(offset) => self.length.checked_add_signed(offset),
            SeekFrom::Current(offset) => self.position.checked_add_signed(offset),
        };

        match new_pos {
            Some(p) if p <= self.length => {
                self.position = p;
                Ok(p)
            }
            Some(_) => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "Seek beyond end of partial pipeline",
            )),
            None => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "Seek before beginning of partial pipeline",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn image() -> Cursor<Vec<u8>> {
        Cursor::new((0..100).collect())
    }

    #[test]
    fn test_partial_pipeline_read() {
        let mut partial = PartialPipeline::new(image(), 20, 10).unwrap();
        assert_eq!(partial.start(), 20);
        assert_eq!(partial.length(), 10);

        let mut buf = [0u8; 6];
        assert_eq!(partial.read(&mut buf).unwrap(), 6);
        assert_eq!(&buf, &[20, 21, 22, 23, 24, 25]);

        // Second read is clamped to the window
        assert_eq!(partial.read(&mut buf).unwrap(), 4);
        assert_eq!(&buf[..4], &[26, 27, 28, 29]);
        assert_eq!(partial.remaining(), 0);
        assert_eq!(partial.read(&mut buf).unwrap(), 0);
    }

    #[test]
    fn test_partial_pipeline_seek_bounds() {
        let mut partial = PartialPipeline::new(image(), 20, 10).unwrap();

        assert_eq!(partial.seek(SeekFrom::End(-3)).unwrap(), 7);
        let mut buf = [0u8; 3];
        partial.read_exact(&mut buf).unwrap();
        assert_eq!(&buf, &[27, 28, 29]);

        assert!(partial.seek(SeekFrom::Start(11)).is_err());
        assert!(partial.seek(SeekFrom::Current(-20)).is_err());
    }

    #[test]
    fn test_partial_pipeline_head() {
        let mut partial = PartialPipeline::new(image(), 90, 64).unwrap();
        partial.seek(SeekFrom::Start(5)).unwrap();

        // Window extends past the image, head stops at the image end
        assert_eq!(partial.head(64).unwrap(), (90..100).collect::<Vec<u8>>());

        let mut partial = PartialPipeline::new(image(), 0, 3).unwrap();
        assert_eq!(partial.head(64).unwrap(), vec![0, 1, 2]);
    }
}
