//! Core traits for partscope

use crate::types::PartitionEntry;
use std::io::{Read, Seek};

/// Trait for disk image vaults (byte sources)
pub trait Vault: Send {
    /// Get a human-readable identifier for this vault type
    fn identify(&self) -> &str;

    /// Get the total size of the vault in bytes
    fn length(&self) -> u64;

    /// Get a readable and seekable stream to the vault content
    fn content(&mut self) -> &mut dyn ReadSeek;
}

/// Trait for decoded partition tables (zone tables)
pub trait ZoneTable {
    /// Get a human-readable identifier for this zone table type
    fn identify(&self) -> &str;

    /// Get all decoded partitions, in on-disk order
    fn partitions(&self) -> &[PartitionEntry];

    /// Get a partition by its 1-based index
    fn get_partition(&self, index: usize) -> Option<&PartitionEntry> {
        self.partitions().iter().find(|p| p.index == index)
    }
}

/// Combined trait for Read + Seek
pub trait ReadSeek: Read + Seek + Send {}

/// Blanket implementation for any type that implements Read + Seek
impl<T: Read + Seek + Send> ReadSeek for T {}
