//! # partscope Zones
//!
//! Partition table decoders for raw disk images.
//!
//! This crate provides:
//! - **Detection**: classify sector 0 as MBR, protective MBR + GPT, bare GPT or unknown
//! - **MBR**: Master Boot Record (BIOS/legacy partitioning)
//! - **GPT**: GUID Partition Table (UEFI/modern partitioning)
//! - **Catalogs**: MBR type codes and GPT type GUIDs mapped to descriptions
//!
//! ## Example
//!
//! ```rust,no_run
//! use partscope_core::ZoneTable;
//! use partscope_vaults::{RawVault, VaultConfig};
//! use std::path::Path;
//!
//! let mut vault = RawVault::open(Path::new("disk.img"), VaultConfig::default()).unwrap();
//! let table = partscope_zones::decode(&mut vault, 512).unwrap();
//!
//! println!("Partition table: {}", table.identify());
//! for partition in table.partitions() {
//!     println!("  {}", partition);
//! }
//! ```

pub mod detect;
pub mod gpt;
pub mod mbr;
pub mod table;

pub use detect::{classify_boot_sector, detect_table_type};
pub use gpt::types::{format_guid, GptAttributes, GptHeader, GptPartitionEntry, PartitionTypeGuid};
pub use gpt::{GptIntegrity, GptZoneTable};
pub use mbr::types::{ChsAddress, MbrPartitionRecord, MbrPartitionType};
pub use mbr::{MbrSummary, MbrZoneTable};
pub use table::{GptDetails, PartitionTable};

use partscope_core::{ReadSeek, Result, TableType, Vault};
use partscope_pipeline::SectorReader;

/// Decode the partition table of a vault
///
/// `sector_size` is usually [`partscope_core::DEFAULT_SECTOR_SIZE`].
///
/// # Errors
///
/// Returns an error if:
/// - `sector_size` is not a power of two in 512..=4096
/// - Sector 0 (or, for GPT, the header) is shorter than required
/// - The GPT header describes an impossible entry array
/// - The vault cannot be read
///
/// An image with no recognizable table decodes to [`TableType::Unknown`].
pub fn decode(vault: &mut dyn Vault, sector_size: u32) -> Result<PartitionTable> {
    let disk_size = vault.length();
    tracing::debug!("Decoding {} ({} bytes)", vault.identify(), disk_size);
    decode_with_length(vault.content(), sector_size, disk_size)
}

/// Decode the partition table of any seekable stream
///
/// The disk size is measured by seeking to the end of the stream.
pub fn decode_stream(stream: &mut dyn ReadSeek, sector_size: u32) -> Result<PartitionTable> {
    let disk_size = SectorReader::new(&mut *stream, sector_size)?.stream_len()?;
    decode_with_length(stream, sector_size, disk_size)
}

fn decode_with_length(
    stream: &mut dyn ReadSeek,
    sector_size: u32,
    disk_size: u64,
) -> Result<PartitionTable> {
    let mut reader = SectorReader::new(stream, sector_size)?;

    let sector0 = reader.read_sector(0, "sector 0")?;
    let table_type = detect_table_type(&sector0, &mut reader)?;
    tracing::debug!("Detected partition table: {}", table_type);

    let mut table = PartitionTable::unknown(sector_size, disk_size);
    table.table_type = table_type;

    match table_type {
        TableType::Unknown => {}
        gpt_type if gpt_type.is_gpt() => {
            if gpt_type == TableType::GptProtectiveMbr {
                table.mbr = Some(MbrZoneTable::parse(&sector0, sector_size)?.summary());
            }

            let gpt = GptZoneTable::parse(&mut reader)?;
            table.truncated = gpt.is_truncated();
            table.gpt = Some(GptDetails {
                header: gpt.header().clone(),
                integrity: gpt.integrity(),
            });
            table.partitions = gpt.into_partitions();
        }
        _ => {
            let mbr = MbrZoneTable::parse(&sector0, sector_size)?;
            table.mbr = Some(mbr.summary());
            table.partitions = mbr.into_partitions();
        }
    }

    Ok(table)
}
