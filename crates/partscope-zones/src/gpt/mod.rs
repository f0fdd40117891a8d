//! GPT (GUID Partition Table) decoder

pub mod types;

use partscope_core::{
    validate_allocation_size, Error, PartitionEntry, Result, ZoneTable, MAX_ALLOCATION_SIZE,
};
use partscope_pipeline::SectorReader;
use serde::{Deserialize, Serialize};
use types::{GptHeader, GptPartitionEntry};

/// GPT partition table
///
/// The GUID Partition Table is the partitioning scheme used by UEFI-based systems.
/// The header declares where the entry array lives, how many entries it holds
/// and how large each entry is.
///
/// # Structure
///
/// ```text
/// LBA 0:    Protective MBR (for backward compatibility)
/// LBA 1:    Primary GPT header
/// LBA 2-33: Partition entries array (typically 128 entries)
/// LBA 34+:  Usable disk space
/// ...
/// Last 33:  Backup partition entries array
/// Last 1:   Backup GPT header
/// ```
#[derive(Debug, Clone)]
pub struct GptZoneTable {
    partitions: Vec<PartitionEntry>,
    header: GptHeader,
    truncated: bool,
    integrity: GptIntegrity,
}

/// CRC32 outcomes, recorded but never enforced while decoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GptIntegrity {
    pub header_crc32_valid: bool,
    pub partition_array_crc32_valid: bool,
}

impl GptZoneTable {
    /// LBA of the primary GPT header
    pub const HEADER_LBA: u64 = 1;

    /// Decode the primary GPT header and its partition entry array
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Fewer than 92 header bytes are available
    /// - The declared entry size cannot hold the fixed entry fields
    /// - The readable part of the entry array exceeds [`MAX_ALLOCATION_SIZE`]
    /// - The stream cannot be read
    ///
    /// A short entry array is not an error: the entries that were read in
    /// full are kept and [`GptZoneTable::is_truncated`] reports it.
    pub fn parse(reader: &mut SectorReader<'_>) -> Result<Self> {
        let sector_size = reader.sector_size();

        let header_offset = reader.sector_offset(Self::HEADER_LBA)?;
        let header_bytes = reader.read_up_to(header_offset, sector_size as usize)?;
        let header = GptHeader::from_bytes(&header_bytes)?;

        if !header.has_valid_signature() {
            tracing::warn!(
                "GPT header signature mismatch: expected \"EFI PART\", got {:?}",
                header.signature_text()
            );
        }

        let entry_size = header.partition_entry_size as usize;
        if entry_size < GptPartitionEntry::NAME_OFFSET {
            return Err(Error::invalid_zone_table(format!(
                "GPT partition entry size {} is smaller than {} bytes",
                entry_size,
                GptPartitionEntry::NAME_OFFSET
            )));
        }

        let array_offset = reader.sector_offset(header.partition_entries_lba)?;
        let declared_len = header.partition_array_len();
        // Bytes past the end of the image can never be read; clamp before the limit check
        let available = reader.stream_len()?.saturating_sub(array_offset);
        let array_len = validate_allocation_size(
            declared_len.min(available),
            MAX_ALLOCATION_SIZE,
            "GPT partition entry array",
        )?;

        tracing::debug!(
            "GPT entry array at LBA {}: {} entries of {} bytes",
            header.partition_entries_lba,
            header.num_partition_entries,
            entry_size
        );

        let array = reader.read_up_to(array_offset, array_len)?;
        let truncated = (array.len() as u64) < declared_len;
        if truncated {
            tracing::warn!(
                "GPT entry array truncated: expected {} bytes, got {} ({} of {} entries readable)",
                declared_len,
                array.len(),
                array.len() / entry_size,
                header.num_partition_entries
            );
        }

        let partitions = Self::decode_entries(&array, entry_size, sector_size)?;

        let integrity = GptIntegrity {
            header_crc32_valid: header.verify_header_crc32(&header_bytes),
            partition_array_crc32_valid: header.verify_partition_array_crc32(&array),
        };
        if !integrity.header_crc32_valid || !integrity.partition_array_crc32_valid {
            tracing::debug!("GPT CRC32 mismatch: {:?}", integrity);
        }

        Ok(Self {
            partitions,
            header,
            truncated,
            integrity,
        })
    }

    /// Walk the entry array, numbering only the entries that are kept
    fn decode_entries(
        array: &[u8],
        entry_size: usize,
        sector_size: u32,
    ) -> Result<Vec<PartitionEntry>> {
        let mut partitions = Vec::new();

        for (slot, chunk) in array.chunks_exact(entry_size).enumerate() {
            let entry = GptPartitionEntry::from_bytes(chunk)?;

            if entry.is_unused() {
                continue;
            }

            if entry.first_lba == 0 {
                tracing::debug!("GPT slot {} is typed but starts at LBA 0, skipping", slot);
                continue;
            }

            if entry.last_lba < entry.first_lba {
                tracing::warn!(
                    "GPT slot {} ends before it starts (LBA {}-{}), skipping",
                    slot,
                    entry.first_lba,
                    entry.last_lba
                );
                continue;
            }

            let partition = PartitionEntry::new(
                partitions.len() + 1,
                entry.partition_type_guid.description(),
                entry.first_lba,
                entry.last_lba,
                sector_size,
            )
            .with_guid(entry.unique_partition_guid)
            .with_name(entry.name)
            .with_attributes(entry.attributes);

            tracing::debug!("GPT slot {}: {}", slot, partition);
            partitions.push(partition);
        }

        Ok(partitions)
    }

    /// Get the GPT header
    pub fn header(&self) -> &GptHeader {
        &self.header
    }

    /// True if the entry array ended before all declared entries were read
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// CRC32 outcomes for the header and entry array
    pub fn integrity(&self) -> GptIntegrity {
        self.integrity
    }

    /// Consume the table, keeping only the decoded partitions
    pub fn into_partitions(self) -> Vec<PartitionEntry> {
        self.partitions
    }
}

impl ZoneTable for GptZoneTable {
    fn identify(&self) -> &str {
        "GUID Partition Table"
    }

    fn partitions(&self) -> &[PartitionEntry] {
        &self.partitions
    }
}
