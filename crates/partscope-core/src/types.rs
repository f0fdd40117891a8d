//! Core types for partscope

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sector size used when the caller does not supply one
pub const DEFAULT_SECTOR_SIZE: u32 = 512;

/// Partition table scheme detected on a disk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TableType {
    /// Legacy Master Boot Record
    Mbr,
    /// GUID Partition Table without a boot-signed sector 0
    Gpt,
    /// GUID Partition Table shielded by a protective MBR (type 0xEE)
    GptProtectiveMbr,
    /// No recognizable partition table
    Unknown,
}

impl TableType {
    /// Get a human-readable name for this table type
    pub fn name(&self) -> &'static str {
        match self {
            TableType::Mbr => "MBR",
            TableType::Gpt => "GPT",
            TableType::GptProtectiveMbr => "GPT (protective MBR)",
            TableType::Unknown => "Unknown",
        }
    }

    /// True when partitions are described by a GPT entry array
    pub fn is_gpt(&self) -> bool {
        matches!(self, TableType::Gpt | TableType::GptProtectiveMbr)
    }
}

impl fmt::Display for TableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A decoded partition, independent of the table scheme it came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionEntry {
    /// 1-based ordinal among the emitted (non-empty) entries
    pub index: usize,

    /// Partition type description (e.g., "Linux Native", "EFI System Partition")
    pub kind: String,

    /// MBR type code; 0 for GPT entries
    pub raw_type: u8,

    /// First sector (inclusive)
    pub start_lba: u64,

    /// Last sector (inclusive)
    pub end_lba: u64,

    /// Number of sectors covered
    pub sector_count: u64,

    /// Size in bytes (saturates at `u64::MAX`)
    pub size_bytes: u64,

    /// Unique partition GUID as stored on disk (GPT only)
    pub guid: Option<[u8; 16]>,

    /// Partition label (GPT only)
    pub name: String,

    /// GPT attribute flags; 0 for MBR entries
    pub attributes: u64,

    /// MBR boot flag (status byte 0x80)
    pub is_active: bool,
}

impl PartitionEntry {
    /// Create a new partition entry spanning `start_lba..=end_lba`
    ///
    /// Callers guarantee `start_lba <= end_lba`.
    pub fn new(
        index: usize,
        kind: impl Into<String>,
        start_lba: u64,
        end_lba: u64,
        sector_size: u32,
    ) -> Self {
        debug_assert!(start_lba <= end_lba);
        let sector_count = end_lba - start_lba + 1;

        Self {
            index,
            kind: kind.into(),
            raw_type: 0,
            start_lba,
            end_lba,
            sector_count,
            size_bytes: sector_count.saturating_mul(sector_size as u64),
            guid: None,
            name: String::new(),
            attributes: 0,
            is_active: false,
        }
    }

    /// Set the MBR type code
    pub fn with_raw_type(mut self, raw_type: u8) -> Self {
        self.raw_type = raw_type;
        self
    }

    /// Set the unique partition GUID
    pub fn with_guid(mut self, guid: [u8; 16]) -> Self {
        self.guid = Some(guid);
        self
    }

    /// Set the partition label
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the attribute flags
    pub fn with_attributes(mut self, attributes: u64) -> Self {
        self.attributes = attributes;
        self
    }

    /// Set the boot flag
    pub fn with_active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }

    /// Byte offset of the first sector within the image
    pub fn byte_offset(&self, sector_size: u32) -> Option<u64> {
        self.start_lba.checked_mul(sector_size as u64)
    }
}

impl fmt::Display for PartitionEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Partition {} [{} @ LBA {}-{}, {}]",
            self.index,
            self.kind,
            self.start_lba,
            self.end_lba,
            format_size(self.size_bytes)
        )?;
        if !self.name.is_empty() {
            write!(f, " \"{}\"", self.name)?;
        }
        if self.is_active {
            write!(f, " *")?;
        }
        Ok(())
    }
}

/// Format size in human-readable format
///
/// Divides by 1024 until the value drops below 1024 or the unit reaches PB.
pub fn format_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB", "PB"];
    let mut size = bytes as f64;
    let mut unit_idx = 0;

    while size >= 1024.0 && unit_idx < UNITS.len() - 1 {
        size /= 1024.0;
        unit_idx += 1;
    }

    format!("{:.2} {}", size, UNITS[unit_idx])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0.00 B");
        assert_eq!(format_size(512), "512.00 B");
        assert_eq!(format_size(1024), "1.00 KB");
        assert_eq!(format_size(1536), "1.50 KB");
        assert_eq!(format_size(1024 * 1024 * 1024), "1.00 GB");
        assert_eq!(format_size(1024u64.pow(5)), "1.00 PB");
    }

    #[test]
    fn test_format_size_caps_at_petabytes() {
        assert_eq!(format_size(1024u64.pow(5) * 2048), "2048.00 PB");
        assert!(format_size(u64::MAX).ends_with(" PB"));
    }

    #[test]
    fn test_partition_entry_creation() {
        let entry = PartitionEntry::new(1, "Linux Native", 2048, 206_847, 512)
            .with_raw_type(0x83)
            .with_active(true);

        assert_eq!(entry.index, 1);
        assert_eq!(entry.sector_count, 204_800);
        assert_eq!(entry.size_bytes, 204_800 * 512);
        assert_eq!(entry.raw_type, 0x83);
        assert!(entry.is_active);
        assert!(entry.guid.is_none());
        assert!(entry.name.is_empty());
        assert_eq!(entry.byte_offset(512), Some(2048 * 512));
    }

    #[test]
    fn test_partition_entry_single_sector() {
        let entry = PartitionEntry::new(1, "EFI System", 34, 34, 4096);
        assert_eq!(entry.sector_count, 1);
        assert_eq!(entry.size_bytes, 4096);
    }

    #[test]
    fn test_partition_entry_size_saturates() {
        let entry = PartitionEntry::new(1, "Huge", 1, u64::MAX, 512);
        assert_eq!(entry.sector_count, u64::MAX);
        assert_eq!(entry.size_bytes, u64::MAX);
        assert_eq!(entry.byte_offset(512), Some(512));
    }

    #[test]
    fn test_partition_entry_display() {
        let entry = PartitionEntry::new(2, "Linux Filesystem", 100, 199, 512).with_name("root");
        assert_eq!(
            entry.to_string(),
            "Partition 2 [Linux Filesystem @ LBA 100-199, 50.00 KB] \"root\""
        );
    }

    #[test]
    fn test_table_type_serializes_by_name() {
        let json = serde_json::to_string(&TableType::GptProtectiveMbr).unwrap();
        assert_eq!(json, "\"GptProtectiveMbr\"");
        assert!(TableType::GptProtectiveMbr.is_gpt());
        assert!(!TableType::Mbr.is_gpt());
        assert_eq!(TableType::Unknown.to_string(), "Unknown");
    }
}
