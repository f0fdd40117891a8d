//! GPT partition types and structures

use partscope_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// GPT partition type GUID, stored as the 16 raw bytes found on disk
///
/// The first three GUID fields are little-endian on disk, so the raw bytes
/// differ from the textual form. Catalog keys below are raw bytes as well,
/// which keeps lookups a plain byte comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PartitionTypeGuid(pub [u8; 16]);

impl PartitionTypeGuid {
    /// Unused entry
    pub const UNUSED: Self = Self([0; 16]);

    /// EFI System Partition (C12A7328-F81F-11D2-BA4B-00A0C93EC93B)
    pub const EFI_SYSTEM: Self = Self([
        0x28, 0x73, 0x2a, 0xc1, 0x1f, 0xf8, 0xd2, 0x11,
        0xba, 0x4b, 0x00, 0xa0, 0xc9, 0x3e, 0xc9, 0x3b,
    ]);

    /// BIOS boot partition (21686148-6449-6E6F-744E-656564454649)
    pub const BIOS_BOOT: Self = Self([
        0x48, 0x61, 0x68, 0x21, 0x49, 0x64, 0x6f, 0x6e,
        0x74, 0x4e, 0x65, 0x65, 0x64, 0x45, 0x46, 0x49,
    ]);

    /// Microsoft Reserved (E3C9E316-0B5C-4DB8-817D-F92DF00215AE)
    pub const MICROSOFT_RESERVED: Self = Self([
        0x16, 0xe3, 0xc9, 0xe3, 0x5c, 0x0b, 0xb8, 0x4d,
        0x81, 0x7d, 0xf9, 0x2d, 0xf0, 0x02, 0x15, 0xae,
    ]);

    /// Microsoft Basic Data (EBD0A0A2-B9E5-4433-87C0-68B6B72699C7)
    pub const MICROSOFT_BASIC_DATA: Self = Self([
        0xa2, 0xa0, 0xd0, 0xeb, 0xe5, 0xb9, 0x33, 0x44,
        0x87, 0xc0, 0x68, 0xb6, 0xb7, 0x26, 0x99, 0xc7,
    ]);

    /// Microsoft LDM metadata (5808C8AA-7E8F-42E0-85D2-E1E90434CFB3)
    pub const MICROSOFT_LDM_METADATA: Self = Self([
        0xaa, 0xc8, 0x08, 0x58, 0x8f, 0x7e, 0xe0, 0x42,
        0x85, 0xd2, 0xe1, 0xe9, 0x04, 0x34, 0xcf, 0xb3,
    ]);

    /// Windows Recovery Environment (DE94BBA4-06D1-4D40-A16A-BFD50179D6AC)
    pub const WINDOWS_RECOVERY: Self = Self([
        0xa4, 0xbb, 0x94, 0xde, 0xd1, 0x06, 0x40, 0x4d,
        0xa1, 0x6a, 0xbf, 0xd5, 0x01, 0x79, 0xd6, 0xac,
    ]);

    /// Linux filesystem (0FC63DAF-8483-4772-8E79-3D69D8477DE4)
    pub const LINUX_FILESYSTEM: Self = Self([
        0xaf, 0x3d, 0xc6, 0x0f, 0x83, 0x84, 0x72, 0x47,
        0x8e, 0x79, 0x3d, 0x69, 0xd8, 0x47, 0x7d, 0xe4,
    ]);

    /// Linux root, x86-64 (4F68BCE3-E8CD-4DB1-96E7-FBCAF984B709)
    pub const LINUX_ROOT_X86_64: Self = Self([
        0xe3, 0xbc, 0x68, 0x4f, 0xcd, 0xe8, 0xb1, 0x4d,
        0x96, 0xe7, 0xfb, 0xca, 0xf9, 0x84, 0xb7, 0x09,
    ]);

    /// Linux /home (933AC7E1-2EB4-4F13-B844-0E14E2AEF915)
    pub const LINUX_HOME: Self = Self([
        0xe1, 0xc7, 0x3a, 0x93, 0xb4, 0x2e, 0x13, 0x4f,
        0xb8, 0x44, 0x0e, 0x14, 0xe2, 0xae, 0xf9, 0x15,
    ]);

    /// Linux swap (0657FD6D-A4AB-43C4-84E5-0933C84B4F4F)
    pub const LINUX_SWAP: Self = Self([
        0x6d, 0xfd, 0x57, 0x06, 0xab, 0xa4, 0xc4, 0x43,
        0x84, 0xe5, 0x09, 0x33, 0xc8, 0x4b, 0x4f, 0x4f,
    ]);

    /// Linux LVM (E6D6D379-F507-44C2-A23C-238F2A3DF928)
    pub const LINUX_LVM: Self = Self([
        0x79, 0xd3, 0xd6, 0xe6, 0x07, 0xf5, 0xc2, 0x44,
        0xa2, 0x3c, 0x23, 0x8f, 0x2a, 0x3d, 0xf9, 0x28,
    ]);

    /// Linux RAID (A19D880F-05FC-4D3B-A006-743F0F84911E)
    pub const LINUX_RAID: Self = Self([
        0x0f, 0x88, 0x9d, 0xa1, 0xfc, 0x05, 0x3b, 0x4d,
        0xa0, 0x06, 0x74, 0x3f, 0x0f, 0x84, 0x91, 0x1e,
    ]);

    /// Linux reserved (8DA63339-0007-60C0-C436-083AC8230908)
    pub const LINUX_RESERVED: Self = Self([
        0x39, 0x33, 0xa6, 0x8d, 0x07, 0x00, 0xc0, 0x60,
        0xc4, 0x36, 0x08, 0x3a, 0xc8, 0x23, 0x09, 0x08,
    ]);

    /// FreeBSD UFS (516E7CB6-6ECF-11D6-8FF8-00022D09712B)
    pub const FREEBSD_UFS: Self = Self([
        0xb6, 0x7c, 0x6e, 0x51, 0xcf, 0x6e, 0xd6, 0x11,
        0x8f, 0xf8, 0x00, 0x02, 0x2d, 0x09, 0x71, 0x2b,
    ]);

    /// Apple HFS+ (48465300-0000-11AA-AA11-00306543ECAC)
    pub const APPLE_HFS_PLUS: Self = Self([
        0x00, 0x53, 0x46, 0x48, 0x00, 0x00, 0xaa, 0x11,
        0xaa, 0x11, 0x00, 0x30, 0x65, 0x43, 0xec, 0xac,
    ]);

    /// Apple APFS container (7C3457EF-0000-11AA-AA11-00306543ECAC)
    pub const APPLE_APFS: Self = Self([
        0xef, 0x57, 0x34, 0x7c, 0x00, 0x00, 0xaa, 0x11,
        0xaa, 0x11, 0x00, 0x30, 0x65, 0x43, 0xec, 0xac,
    ]);

    /// Apple Boot / Recovery HD (426F6F74-0000-11AA-AA11-00306543ECAC)
    pub const APPLE_BOOT: Self = Self([
        0x74, 0x6f, 0x6f, 0x42, 0x00, 0x00, 0xaa, 0x11,
        0xaa, 0x11, 0x00, 0x30, 0x65, 0x43, 0xec, 0xac,
    ]);

    /// Catalog name for this type GUID, if it is a known one
    pub fn name(&self) -> Option<&'static str> {
        let name = match *self {
            Self::EFI_SYSTEM => "EFI System Partition",
            Self::BIOS_BOOT => "BIOS Boot",
            Self::MICROSOFT_RESERVED => "Microsoft Reserved",
            Self::MICROSOFT_BASIC_DATA => "Microsoft Basic Data",
            Self::MICROSOFT_LDM_METADATA => "Microsoft LDM Metadata",
            Self::WINDOWS_RECOVERY => "Windows Recovery Environment",
            Self::LINUX_FILESYSTEM => "Linux Filesystem",
            Self::LINUX_ROOT_X86_64 => "Linux Root (x86-64)",
            Self::LINUX_HOME => "Linux Home",
            Self::LINUX_SWAP => "Linux Swap",
            Self::LINUX_LVM => "Linux LVM",
            Self::LINUX_RAID => "Linux RAID",
            Self::LINUX_RESERVED => "Linux Reserved",
            Self::FREEBSD_UFS => "FreeBSD UFS",
            Self::APPLE_HFS_PLUS => "Apple HFS+",
            Self::APPLE_APFS => "Apple APFS Container",
            Self::APPLE_BOOT => "Apple Boot",
            _ => return None,
        };
        Some(name)
    }

    /// Description for display; unknown GUIDs render with their first 4 raw bytes
    pub fn description(&self) -> String {
        match self.name() {
            Some(name) => name.to_string(),
            None => format!("Unknown GUID ({}...)", hex::encode_upper(&self.0[..4])),
        }
    }

    /// Check if this entry is unused (all-zero type GUID)
    pub fn is_unused(&self) -> bool {
        *self == Self::UNUSED
    }
}

impl fmt::Display for PartitionTypeGuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description())
    }
}

/// Render raw on-disk GUID bytes in the canonical text form
pub fn format_guid(raw: &[u8; 16]) -> String {
    Uuid::from_bytes_le(*raw).hyphenated().to_string().to_uppercase()
}

/// GPT partition attribute flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GptAttributes(pub u64);

impl GptAttributes {
    /// Required for the platform to function
    pub const PLATFORM_REQUIRED: u64 = 1 << 0;
    /// Firmware should not produce block I/O protocols for it
    pub const EFI_IGNORE: u64 = 1 << 1;
    /// Bootable by legacy BIOS
    pub const LEGACY_BIOS_BOOTABLE: u64 = 1 << 2;
    /// Microsoft basic data: read-only
    pub const READ_ONLY: u64 = 1 << 60;
    /// Microsoft basic data: shadow copy
    pub const SHADOW_COPY: u64 = 1 << 61;
    /// Microsoft basic data: hidden
    pub const HIDDEN: u64 = 1 << 62;
    /// Microsoft basic data: no drive letter
    pub const NO_AUTOMOUNT: u64 = 1 << 63;

    const NAMES: &'static [(u64, &'static str)] = &[
        (Self::PLATFORM_REQUIRED, "platform-required"),
        (Self::EFI_IGNORE, "efi-ignore"),
        (Self::LEGACY_BIOS_BOOTABLE, "legacy-bios-bootable"),
        (Self::READ_ONLY, "read-only"),
        (Self::SHADOW_COPY, "shadow-copy"),
        (Self::HIDDEN, "hidden"),
        (Self::NO_AUTOMOUNT, "no-automount"),
    ];

    /// Check a flag
    pub fn contains(&self, flag: u64) -> bool {
        self.0 & flag == flag
    }

    /// Names of the well-known flags that are set
    pub fn names(&self) -> Vec<&'static str> {
        Self::NAMES
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect()
    }
}

impl fmt::Display for GptAttributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:016X}", self.0)?;
        let names = self.names();
        if !names.is_empty() {
            write!(f, " ({})", names.join(", "))?;
        }
        Ok(())
    }
}

/// GPT partition entry
///
/// Entries are usually 128 bytes; the header declares the actual size and
/// everything past the fixed 56 bytes is the UTF-16LE name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GptPartitionEntry {
    /// Partition type GUID
    pub partition_type_guid: PartitionTypeGuid,
    /// Unique partition GUID
    pub unique_partition_guid: [u8; 16],
    /// First LBA (inclusive)
    pub first_lba: u64,
    /// Last LBA (inclusive)
    pub last_lba: u64,
    /// Attribute flags
    pub attributes: u64,
    /// Partition name
    pub name: String,
}

impl GptPartitionEntry {
    /// Size of the fixed fields preceding the name
    pub const NAME_OFFSET: usize = 56;

    /// Parse a partition entry from bytes
    ///
    /// # Errors
    ///
    /// Returns a short read error if fewer than 56 bytes are supplied
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < Self::NAME_OFFSET {
            return Err(Error::short_read(
                "GPT partition entry",
                Self::NAME_OFFSET as u64,
                bytes.len() as u64,
            ));
        }

        let mut partition_type_guid = [0u8; 16];
        partition_type_guid.copy_from_slice(&bytes[0..16]);

        let mut unique_partition_guid = [0u8; 16];
        unique_partition_guid.copy_from_slice(&bytes[16..32]);

        Ok(Self {
            partition_type_guid: PartitionTypeGuid(partition_type_guid),
            unique_partition_guid,
            first_lba: read_u64(bytes, 32),
            last_lba: read_u64(bytes, 40),
            attributes: read_u64(bytes, 48),
            name: Self::parse_name(&bytes[Self::NAME_OFFSET..]),
        })
    }

    /// Check if this entry is unused
    pub fn is_unused(&self) -> bool {
        self.partition_type_guid.is_unused()
    }

    /// Decode a UTF-16LE name, dropping trailing NUL padding
    fn parse_name(bytes: &[u8]) -> String {
        let mut units: Vec<u16> = bytes
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect();

        while units.last() == Some(&0) {
            units.pop();
        }

        String::from_utf16_lossy(&units)
    }
}

/// GPT header
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GptHeader {
    /// Header signature ("EFI PART")
    pub signature: [u8; 8],
    /// GPT revision (usually 0x00010000)
    pub revision: u32,
    /// Header size in bytes (usually 92)
    pub header_size: u32,
    /// CRC32 checksum of header
    pub header_crc32: u32,
    /// Reserved (must be zero)
    pub reserved: u32,
    /// Current LBA (location of this header)
    pub current_lba: u64,
    /// Backup LBA (location of backup header)
    pub backup_lba: u64,
    /// First usable LBA for partitions
    pub first_usable_lba: u64,
    /// Last usable LBA for partitions
    pub last_usable_lba: u64,
    /// Disk GUID
    pub disk_guid: [u8; 16],
    /// Starting LBA of partition entries
    pub partition_entries_lba: u64,
    /// Number of partition entries
    pub num_partition_entries: u32,
    /// Size of each partition entry
    pub partition_entry_size: u32,
    /// CRC32 of partition entries array
    pub partition_array_crc32: u32,
}

impl GptHeader {
    /// GPT header signature
    pub const SIGNATURE: &'static [u8; 8] = b"EFI PART";

    /// Size of the defined header fields
    pub const HEADER_SIZE: usize = 92;

    /// Offset of the header CRC32 field
    const HEADER_CRC32_OFFSET: usize = 16;

    /// Parse GPT header from bytes
    ///
    /// A signature mismatch does not fail parsing; check
    /// [`GptHeader::has_valid_signature`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < Self::HEADER_SIZE {
            return Err(Error::short_read(
                "GPT header",
                Self::HEADER_SIZE as u64,
                bytes.len() as u64,
            ));
        }

        let mut signature = [0u8; 8];
        signature.copy_from_slice(&bytes[0..8]);

        let mut disk_guid = [0u8; 16];
        disk_guid.copy_from_slice(&bytes[56..72]);

        Ok(Self {
            signature,
            revision: read_u32(bytes, 8),
            header_size: read_u32(bytes, 12),
            header_crc32: read_u32(bytes, Self::HEADER_CRC32_OFFSET),
            reserved: read_u32(bytes, 20),
            current_lba: read_u64(bytes, 24),
            backup_lba: read_u64(bytes, 32),
            first_usable_lba: read_u64(bytes, 40),
            last_usable_lba: read_u64(bytes, 48),
            disk_guid,
            partition_entries_lba: read_u64(bytes, 72),
            num_partition_entries: read_u32(bytes, 80),
            partition_entry_size: read_u32(bytes, 84),
            partition_array_crc32: read_u32(bytes, 88),
        })
    }

    /// Check the "EFI PART" signature
    pub fn has_valid_signature(&self) -> bool {
        &self.signature == Self::SIGNATURE
    }

    /// Signature as text, non-ASCII bytes replaced
    pub fn signature_text(&self) -> String {
        String::from_utf8_lossy(&self.signature).into_owned()
    }

    /// Declared size of the whole entry array in bytes
    pub fn partition_array_len(&self) -> u64 {
        self.num_partition_entries as u64 * self.partition_entry_size as u64
    }

    /// Number of sectors between the first and last usable LBA
    pub fn usable_lba_count(&self) -> u64 {
        if self.last_usable_lba >= self.first_usable_lba {
            self.last_usable_lba - self.first_usable_lba + 1
        } else {
            0
        }
    }

    /// Verify the header CRC32 checksum
    ///
    /// `header_bytes` is the raw header sector; the CRC covers `header_size`
    /// bytes with the CRC field itself zeroed.
    pub fn verify_header_crc32(&self, header_bytes: &[u8]) -> bool {
        let size = self.header_size as usize;
        if size < Self::HEADER_SIZE || header_bytes.len() < size {
            return false;
        }

        let mut header_for_crc = header_bytes[..size].to_vec();
        header_for_crc[Self::HEADER_CRC32_OFFSET..Self::HEADER_CRC32_OFFSET + 4].fill(0);

        crc32fast::hash(&header_for_crc) == self.header_crc32
    }

    /// Verify the partition entries array CRC32 checksum
    pub fn verify_partition_array_crc32(&self, partition_array: &[u8]) -> bool {
        let expected_size = self.partition_array_len();
        if (partition_array.len() as u64) < expected_size {
            return false;
        }

        crc32fast::hash(&partition_array[..expected_size as usize]) == self.partition_array_crc32
    }
}

fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    let mut raw = [0u8; 4];
    raw.copy_from_slice(&bytes[offset..offset + 4]);
    u32::from_le_bytes(raw)
}

fn read_u64(bytes: &[u8], offset: usize) -> u64 {
    let mut raw = [0u8; 8];
    raw.copy_from_slice(&bytes[offset..offset + 8]);
    u64::from_le_bytes(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry_bytes(size: usize, type_guid: PartitionTypeGuid, first: u64, last: u64) -> Vec<u8> {
        let mut bytes = vec![0u8; size];
        bytes[0..16].copy_from_slice(&type_guid.0);
        bytes[32..40].copy_from_slice(&first.to_le_bytes());
        bytes[40..48].copy_from_slice(&last.to_le_bytes());
        bytes
    }

    #[test]
    fn test_partition_type_guid_names() {
        assert_eq!(PartitionTypeGuid::EFI_SYSTEM.description(), "EFI System Partition");
        assert_eq!(PartitionTypeGuid::LINUX_FILESYSTEM.description(), "Linux Filesystem");
        assert_eq!(PartitionTypeGuid::MICROSOFT_RESERVED.description(), "Microsoft Reserved");
        assert_eq!(PartitionTypeGuid::APPLE_HFS_PLUS.description(), "Apple HFS+");
        assert_eq!(PartitionTypeGuid::UNUSED.name(), None);
    }

    #[test]
    fn test_unknown_guid_keeps_prefix() {
        let guid = PartitionTypeGuid([
            0xde, 0xad, 0xbe, 0xef, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12,
        ]);
        assert_eq!(guid.description(), "Unknown GUID (DEADBEEF...)");
    }

    #[test]
    fn test_catalog_matches_canonical_text() {
        let cases = [
            (PartitionTypeGuid::EFI_SYSTEM, "C12A7328-F81F-11D2-BA4B-00A0C93EC93B"),
            (PartitionTypeGuid::MICROSOFT_RESERVED, "E3C9E316-0B5C-4DB8-817D-F92DF00215AE"),
            (PartitionTypeGuid::MICROSOFT_BASIC_DATA, "EBD0A0A2-B9E5-4433-87C0-68B6B72699C7"),
            (PartitionTypeGuid::LINUX_FILESYSTEM, "0FC63DAF-8483-4772-8E79-3D69D8477DE4"),
            (PartitionTypeGuid::LINUX_SWAP, "0657FD6D-A4AB-43C4-84E5-0933C84B4F4F"),
            (PartitionTypeGuid::LINUX_LVM, "E6D6D379-F507-44C2-A23C-238F2A3DF928"),
            (PartitionTypeGuid::LINUX_RESERVED, "8DA63339-0007-60C0-C436-083AC8230908"),
            (PartitionTypeGuid::APPLE_APFS, "7C3457EF-0000-11AA-AA11-00306543ECAC"),
            (PartitionTypeGuid::APPLE_HFS_PLUS, "48465300-0000-11AA-AA11-00306543ECAC"),
            (PartitionTypeGuid::BIOS_BOOT, "21686148-6449-6E6F-744E-656564454649"),
        ];

        for (guid, text) in cases {
            assert_eq!(format_guid(&guid.0), text);
        }
    }

    #[test]
    fn test_attributes() {
        let attrs = GptAttributes(GptAttributes::PLATFORM_REQUIRED | GptAttributes::HIDDEN);
        assert!(attrs.contains(GptAttributes::HIDDEN));
        assert!(!attrs.contains(GptAttributes::READ_ONLY));
        assert_eq!(attrs.names(), vec!["platform-required", "hidden"]);
        assert_eq!(
            attrs.to_string(),
            "0x4000000000000001 (platform-required, hidden)"
        );
        assert_eq!(GptAttributes::default().to_string(), "0x0000000000000000");
    }

    #[test]
    fn test_partition_entry_is_unused() {
        let mut bytes = vec![0u8; 128];
        assert!(GptPartitionEntry::from_bytes(&bytes).unwrap().is_unused());

        bytes[0] = 0x01;
        assert!(!GptPartitionEntry::from_bytes(&bytes).unwrap().is_unused());
    }

    #[test]
    fn test_partition_entry_fields() {
        let mut bytes = entry_bytes(128, PartitionTypeGuid::LINUX_SWAP, 100, 199);
        bytes[16..32].copy_from_slice(&[0x11; 16]);
        bytes[48..56].copy_from_slice(&GptAttributes::READ_ONLY.to_le_bytes());

        let entry = GptPartitionEntry::from_bytes(&bytes).unwrap();
        assert_eq!(entry.partition_type_guid, PartitionTypeGuid::LINUX_SWAP);
        assert_eq!(entry.unique_partition_guid, [0x11; 16]);
        assert_eq!((entry.first_lba, entry.last_lba), (100, 199));
        assert_eq!(entry.attributes, GptAttributes::READ_ONLY);
        assert!(entry.name.is_empty());
    }

    #[test]
    fn test_partition_entry_name_trimming() {
        let mut bytes = entry_bytes(128, PartitionTypeGuid::EFI_SYSTEM, 34, 2081);
        for (i, unit) in "EFI système".encode_utf16().enumerate() {
            bytes[56 + i * 2..58 + i * 2].copy_from_slice(&unit.to_le_bytes());
        }

        let entry = GptPartitionEntry::from_bytes(&bytes).unwrap();
        assert_eq!(entry.name, "EFI système");
    }

    #[test]
    fn test_partition_entry_long_name_in_large_entry() {
        let name = "a".repeat(60);
        let mut bytes = entry_bytes(256, PartitionTypeGuid::LINUX_HOME, 1, 1);
        for (i, unit) in name.encode_utf16().enumerate() {
            bytes[56 + i * 2..58 + i * 2].copy_from_slice(&unit.to_le_bytes());
        }

        let entry = GptPartitionEntry::from_bytes(&bytes).unwrap();
        assert_eq!(entry.name, name);
    }

    #[test]
    fn test_partition_entry_too_short() {
        let err = GptPartitionEntry::from_bytes(&[0u8; 40]).unwrap_err();
        assert!(err.is_short_read());
    }

    #[test]
    fn test_gpt_header_signature() {
        let mut header_bytes = vec![0u8; GptHeader::HEADER_SIZE];

        let header = GptHeader::from_bytes(&header_bytes).unwrap();
        assert!(!header.has_valid_signature());

        header_bytes[0..8].copy_from_slice(b"EFI PART");
        let header = GptHeader::from_bytes(&header_bytes).unwrap();
        assert!(header.has_valid_signature());
        assert_eq!(header.signature_text(), "EFI PART");
    }

    #[test]
    fn test_gpt_header_too_short() {
        let err = GptHeader::from_bytes(&[0u8; 91]).unwrap_err();
        assert!(err.is_short_read());
    }

    #[test]
    fn test_gpt_header_crc32() {
        let mut bytes = vec![0u8; 512];
        bytes[0..8].copy_from_slice(b"EFI PART");
        bytes[12..16].copy_from_slice(&92u32.to_le_bytes());
        bytes[80..84].copy_from_slice(&4u32.to_le_bytes());
        bytes[84..88].copy_from_slice(&128u32.to_le_bytes());

        let array = vec![0x5Au8; 4 * 128];
        bytes[88..92].copy_from_slice(&crc32fast::hash(&array).to_le_bytes());
        let crc = crc32fast::hash(&bytes[..92]);
        bytes[16..20].copy_from_slice(&crc.to_le_bytes());

        let header = GptHeader::from_bytes(&bytes).unwrap();
        assert!(header.verify_header_crc32(&bytes));
        assert!(header.verify_partition_array_crc32(&array));
        assert!(!header.verify_partition_array_crc32(&array[..100]));

        bytes[40] ^= 0xFF;
        assert!(!header.verify_header_crc32(&bytes));
    }
}
