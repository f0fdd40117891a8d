//! Decoded partition table aggregate

use crate::gpt::types::GptHeader;
use crate::gpt::GptIntegrity;
use crate::mbr::MbrSummary;
use partscope_core::{Error, PartitionEntry, Result, TableType, ZoneTable};
use serde::{Deserialize, Serialize};

/// GPT-specific results kept alongside the partition list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GptDetails {
    pub header: GptHeader,
    pub integrity: GptIntegrity,
}

/// Result of decoding a disk image
///
/// An [`TableType::Unknown`] table carries no partitions and is not an error
/// by itself; call [`PartitionTable::ensure_recognized`] to turn it into one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionTable {
    pub table_type: TableType,
    pub sector_size: u32,
    pub disk_size_bytes: u64,
    pub partitions: Vec<PartitionEntry>,
    /// Sector 0 fields; present for MBR and protective-MBR disks
    pub mbr: Option<MbrSummary>,
    pub gpt: Option<GptDetails>,
    /// The GPT entry array ended before all declared entries were read
    pub truncated: bool,
}

impl PartitionTable {
    /// Table for an image with neither an MBR nor a GPT signature
    pub fn unknown(sector_size: u32, disk_size_bytes: u64) -> Self {
        Self {
            table_type: TableType::Unknown,
            sector_size,
            disk_size_bytes,
            partitions: Vec::new(),
            mbr: None,
            gpt: None,
            truncated: false,
        }
    }

    /// True unless the table type is [`TableType::Unknown`]
    pub fn is_recognized(&self) -> bool {
        self.table_type != TableType::Unknown
    }

    /// Fail with [`Error::UnrecognizedTableType`] for unknown tables
    pub fn ensure_recognized(self) -> Result<Self> {
        if self.is_recognized() {
            Ok(self)
        } else {
            Err(Error::UnrecognizedTableType)
        }
    }

    /// Sum of all partition sizes in bytes
    pub fn allocated_bytes(&self) -> u64 {
        self.partitions
            .iter()
            .fold(0u64, |acc, p| acc.saturating_add(p.size_bytes))
    }
}

impl ZoneTable for PartitionTable {
    fn identify(&self) -> &str {
        self.table_type.name()
    }

    fn partitions(&self) -> &[PartitionEntry] {
        &self.partitions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PartitionTable {
        PartitionTable {
            table_type: TableType::Mbr,
            sector_size: 512,
            disk_size_bytes: 1024 * 1024,
            partitions: vec![
                PartitionEntry::new(1, "Linux Native".to_string(), 2048, 2147, 512),
                PartitionEntry::new(2, "Linux Swap".to_string(), 4096, 4195, 512),
            ],
            mbr: Some(MbrSummary {
                disk_signature: 0xDEAD_BEEF,
                boot_signature: 0xAA55,
            }),
            gpt: None,
            truncated: false,
        }
    }

    #[test]
    fn test_ensure_recognized() {
        assert!(sample().ensure_recognized().is_ok());

        let err = PartitionTable::unknown(512, 0)
            .ensure_recognized()
            .unwrap_err();
        assert!(matches!(err, Error::UnrecognizedTableType));
    }

    #[test]
    fn test_zone_table_lookup() {
        let table = sample();
        assert_eq!(table.identify(), TableType::Mbr.name());
        assert_eq!(table.get_partition(2).map(|p| p.start_lba), Some(4096));
        assert!(table.get_partition(3).is_none());
        assert_eq!(table.allocated_bytes(), 200 * 512);
        assert!(!table.truncated);
    }

    #[test]
    fn test_serializes_to_json() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["sector_size"], 512);
        assert_eq!(json["partitions"][0]["start_lba"], 2048);
        assert_eq!(json["mbr"]["disk_signature"], 0xDEAD_BEEFu32);
        assert!(json["gpt"].is_null());
    }
}
