//! MBR (Master Boot Record) partition table decoder

pub mod types;

use partscope_core::{Error, PartitionEntry, Result, ZoneTable};
use serde::{Deserialize, Serialize};
use types::{MbrPartitionRecord, MbrPartitionType};

/// MBR partition table
///
/// The Master Boot Record is the traditional partitioning scheme used by BIOS-based systems.
/// It holds up to 4 primary partition records in the first sector.
///
/// # Structure
///
/// ```text
/// Offset  Size  Field
/// ------  ----  -----
/// 0x000   440   Bootstrap code
/// 0x1B8   4     Disk signature
/// 0x1BE   16    Partition entry 1
/// 0x1CE   16    Partition entry 2
/// 0x1DE   16    Partition entry 3
/// 0x1EE   16    Partition entry 4
/// 0x1FE   2     Boot signature (55 AA)
/// ```
#[derive(Debug, Clone)]
pub struct MbrZoneTable {
    partitions: Vec<PartitionEntry>,
    disk_signature: u32,
    boot_signature: u16,
}

/// MBR fields that have no place in the normalized partition entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MbrSummary {
    pub disk_signature: u32,
    pub boot_signature: u16,
}

impl MbrZoneTable {
    /// The boot signature, read little-endian from bytes `55 AA`
    pub const BOOT_SIGNATURE: u16 = 0xAA55;

    /// Size of the MBR in bytes
    pub const MBR_SIZE: usize = 512;

    /// Offset of the first partition entry
    pub const PARTITION_TABLE_OFFSET: usize = 0x1BE;

    /// Offset of the disk signature
    pub const DISK_SIGNATURE_OFFSET: usize = 0x1B8;

    /// Offset of the boot signature
    pub const BOOT_SIGNATURE_OFFSET: usize = 0x1FE;

    /// Number of partition entries in MBR
    pub const NUM_PARTITIONS: usize = 4;

    /// Check the `55 AA` boot signature of a sector
    pub fn has_boot_signature(sector: &[u8]) -> bool {
        sector.get(Self::BOOT_SIGNATURE_OFFSET..Self::BOOT_SIGNATURE_OFFSET + 2)
            == Some(&[0x55, 0xAA][..])
    }

    /// Type code of the first partition slot
    pub fn first_partition_type(sector: &[u8]) -> Option<MbrPartitionType> {
        sector
            .get(Self::PARTITION_TABLE_OFFSET + 4)
            .map(|&code| MbrPartitionType(code))
    }

    /// Decode the partition table held in `sector`
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Fewer than 512 bytes are supplied
    /// - The boot signature is missing
    pub fn parse(sector: &[u8], sector_size: u32) -> Result<Self> {
        if sector.len() < Self::MBR_SIZE {
            return Err(Error::short_read(
                "MBR sector",
                Self::MBR_SIZE as u64,
                sector.len() as u64,
            ));
        }

        let boot_signature = u16::from_le_bytes([
            sector[Self::BOOT_SIGNATURE_OFFSET],
            sector[Self::BOOT_SIGNATURE_OFFSET + 1],
        ]);
        if boot_signature != Self::BOOT_SIGNATURE {
            return Err(Error::invalid_zone_table(format!(
                "Invalid MBR boot signature: expected 0x{:04X}, got 0x{:04X}",
                Self::BOOT_SIGNATURE,
                boot_signature
            )));
        }

        let disk_signature = u32::from_le_bytes([
            sector[Self::DISK_SIGNATURE_OFFSET],
            sector[Self::DISK_SIGNATURE_OFFSET + 1],
            sector[Self::DISK_SIGNATURE_OFFSET + 2],
            sector[Self::DISK_SIGNATURE_OFFSET + 3],
        ]);

        let records: [MbrPartitionRecord; 4] = std::array::from_fn(|slot| {
            let offset = Self::PARTITION_TABLE_OFFSET + slot * MbrPartitionRecord::SIZE;
            let mut raw = [0u8; MbrPartitionRecord::SIZE];
            raw.copy_from_slice(&sector[offset..offset + MbrPartitionRecord::SIZE]);
            MbrPartitionRecord::from_bytes(&raw)
        });

        let mut partitions = Vec::with_capacity(Self::NUM_PARTITIONS);

        for (slot, record) in records.iter().enumerate() {
            if record.is_empty() {
                continue;
            }

            if record.sector_count == 0 {
                tracing::warn!(
                    "MBR slot {} ({}) has zero sectors, skipping",
                    slot + 1,
                    record.partition_type
                );
                continue;
            }

            let start_lba = record.lba_start as u64;
            let end_lba = start_lba + record.sector_count as u64 - 1;

            let entry = PartitionEntry::new(
                partitions.len() + 1,
                record.partition_type.description(),
                start_lba,
                end_lba,
                sector_size,
            )
            .with_raw_type(record.partition_type.0)
            .with_active(record.is_active());

            tracing::debug!(
                "MBR slot {}: {} (CHS {} - {})",
                slot + 1,
                entry,
                record.chs_start,
                record.chs_end
            );
            partitions.push(entry);
        }

        Ok(Self {
            partitions,
            disk_signature,
            boot_signature,
        })
    }

    /// Signatures for reporting
    pub fn summary(&self) -> MbrSummary {
        MbrSummary {
            disk_signature: self.disk_signature,
            boot_signature: self.boot_signature,
        }
    }

    /// Consume the table, keeping only the decoded partitions
    pub fn into_partitions(self) -> Vec<PartitionEntry> {
        self.partitions
    }
}

impl ZoneTable for MbrZoneTable {
    fn identify(&self) -> &str {
        "Master Boot Record"
    }

    fn partitions(&self) -> &[PartitionEntry] {
        &self.partitions
    }
}
