//! # partscope pipeline
//!
//! I/O abstractions over disk images.
//!
//! - **MmapPipeline**: Memory-mapped, read-only file access
//! - **PartialPipeline**: Bounded window into a stream (one partition)
//! - **SectorReader**: Sector-addressed reads that report short reads
//!
//! ## Example
//!
//! ```rust,no_run
//! use partscope_pipeline::{MmapPipeline, SectorReader};
//! use std::path::Path;
//!
//! let mut mmap = MmapPipeline::open(Path::new("disk.img")).unwrap();
//! let mut reader = SectorReader::new(&mut mmap, 512).unwrap();
//! let sector0 = reader.read_sector(0, "sector 0").unwrap();
//! assert_eq!(sector0.len(), 512);
//! ```

pub mod mmap;
pub mod partial;
pub mod sector;

pub use mmap::MmapPipeline;
pub use partial::PartialPipeline;
pub use sector::SectorReader;
