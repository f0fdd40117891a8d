//! MBR partition types, CHS addressing and raw partition records

use serde::{Deserialize, Serialize};
use std::fmt;

/// Known MBR partition type codes and their descriptions
const MBR_TYPE_CATALOG: &[(u8, &str)] = &[
    (0x00, "Empty"),
    (0x01, "FAT12"),
    (0x04, "FAT16 <32MB"),
    (0x05, "Extended"),
    (0x06, "FAT16 >32MB"),
    (0x07, "NTFS/HPFS/exFAT"),
    (0x0B, "FAT32 (CHS)"),
    (0x0C, "FAT32 (LBA)"),
    (0x0E, "FAT16 (LBA)"),
    (0x0F, "Extended (LBA)"),
    (0x11, "Hidden FAT12"),
    (0x14, "Hidden FAT16 <32MB"),
    (0x16, "Hidden FAT16 >32MB"),
    (0x1B, "Hidden FAT32 (CHS)"),
    (0x1C, "Hidden FAT32 (LBA)"),
    (0x1E, "Hidden FAT16 (LBA)"),
    (0x82, "Linux Swap"),
    (0x83, "Linux Native"),
    (0x85, "Linux Extended"),
    (0x8E, "Linux LVM"),
    (0xA5, "FreeBSD"),
    (0xA6, "OpenBSD"),
    (0xA8, "macOS Darwin UFS"),
    (0xA9, "NetBSD"),
    (0xAB, "macOS Darwin Boot"),
    (0xAF, "macOS Darwin HFS/HFS+"),
    (0xB7, "BSDI"),
    (0xB8, "BSDI Swap"),
    (0xEE, "GPT Protective MBR"),
    (0xEF, "EFI System Partition"),
    (0xFC, "VMware VMFS"),
    (0xFD, "Linux RAID"),
];

/// MBR partition type code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MbrPartitionType(pub u8);

impl MbrPartitionType {
    /// Empty/unused slot
    pub const EMPTY: Self = Self(0x00);
    /// Extended partition, CHS
    pub const EXTENDED: Self = Self(0x05);
    /// Extended partition, LBA
    pub const EXTENDED_LBA: Self = Self(0x0F);
    /// Linux native (ext2/ext3/ext4)
    pub const LINUX_NATIVE: Self = Self(0x83);
    /// Linux extended partition
    pub const LINUX_EXTENDED: Self = Self(0x85);
    /// GPT protective MBR
    pub const GPT_PROTECTIVE: Self = Self(0xEE);
    /// EFI system partition
    pub const EFI_SYSTEM: Self = Self(0xEF);

    /// Catalog name for this code, if it is a known one
    pub fn name(&self) -> Option<&'static str> {
        MBR_TYPE_CATALOG
            .iter()
            .find(|(code, _)| *code == self.0)
            .map(|(_, name)| *name)
    }

    /// Description for display; unknown codes render as `Unknown (0xNN)`
    pub fn description(&self) -> String {
        match self.name() {
            Some(name) => name.to_string(),
            None => format!("Unknown (0x{:02X})", self.0),
        }
    }

    /// True for the extended container types, whose logical partitions are not decoded
    pub fn is_extended(&self) -> bool {
        matches!(
            *self,
            Self::EXTENDED | Self::EXTENDED_LBA | Self::LINUX_EXTENDED
        )
    }
}

impl fmt::Display for MbrPartitionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description())
    }
}

/// CHS (Cylinder-Head-Sector) address
///
/// Legacy geometry addressing. The LBA fields are authoritative; CHS is kept
/// for diagnostics only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChsAddress {
    pub cylinder: u16,
    pub head: u8,
    pub sector: u8,
}

impl ChsAddress {
    /// Parse CHS address from 3 bytes
    ///
    /// - Byte 0: Head
    /// - Byte 1: Sector (bits 0-5) + Cylinder high (bits 6-7)
    /// - Byte 2: Cylinder low
    pub fn from_bytes(bytes: [u8; 3]) -> Self {
        let cyl_high = ((bytes[1] & 0xC0) as u16) << 2;

        Self {
            cylinder: cyl_high | bytes[2] as u16,
            head: bytes[0],
            sector: bytes[1] & 0x3F,
        }
    }
}

impl fmt::Display for ChsAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "C:{}/H:{}/S:{}", self.cylinder, self.head, self.sector)
    }
}

/// One 16-byte slot of the MBR partition table, as stored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MbrPartitionRecord {
    pub status: u8,
    pub chs_start: ChsAddress,
    pub partition_type: MbrPartitionType,
    pub chs_end: ChsAddress,
    pub lba_start: u32,
    pub sector_count: u32,
}

impl MbrPartitionRecord {
    /// Size of a partition record in bytes
    pub const SIZE: usize = 16;

    /// Status byte marking the active (bootable) partition
    pub const ACTIVE: u8 = 0x80;

    /// Parse a record from its 16 bytes
    pub fn from_bytes(bytes: &[u8; Self::SIZE]) -> Self {
        Self {
            status: bytes[0],
            chs_start: ChsAddress::from_bytes([bytes[1], bytes[2], bytes[3]]),
            partition_type: MbrPartitionType(bytes[4]),
            chs_end: ChsAddress::from_bytes([bytes[5], bytes[6], bytes[7]]),
            lba_start: u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]),
            sector_count: u32::from_le_bytes([bytes[12], bytes[13], bytes[14], bytes[15]]),
        }
    }

    /// Empty slot: type 0x00 with LBA start 0
    pub fn is_empty(&self) -> bool {
        self.partition_type == MbrPartitionType::EMPTY && self.lba_start == 0
    }

    /// Active (bootable) flag
    pub fn is_active(&self) -> bool {
        self.status == Self::ACTIVE
    }
}
