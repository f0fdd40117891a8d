//! Partition table type detection

use crate::gpt::types::GptHeader;
use crate::gpt::GptZoneTable;
use crate::mbr::types::MbrPartitionType;
use crate::mbr::MbrZoneTable;
use partscope_core::{Error, Result, TableType};
use partscope_pipeline::SectorReader;

/// Classify a boot sector by its `55 AA` signature alone
///
/// Returns `None` when the signature is absent and the GPT header has to be
/// consulted.
pub fn classify_boot_sector(sector0: &[u8]) -> Option<TableType> {
    if !MbrZoneTable::has_boot_signature(sector0) {
        return None;
    }

    match MbrZoneTable::first_partition_type(sector0) {
        Some(MbrPartitionType::GPT_PROTECTIVE) => Some(TableType::GptProtectiveMbr),
        _ => Some(TableType::Mbr),
    }
}

/// Detect the partition table type from sector 0 and, if needed, sector 1
///
/// # Errors
///
/// Returns [`Error::ShortRead`] if `sector0` is shorter than one sector.
/// A missing or short sector 1 only means "not GPT".
pub fn detect_table_type(sector0: &[u8], reader: &mut SectorReader<'_>) -> Result<TableType> {
    let sector_size = reader.sector_size() as usize;
    if sector0.len() < sector_size {
        return Err(Error::short_read(
            "sector 0",
            sector_size as u64,
            sector0.len() as u64,
        ));
    }

    if let Some(table_type) = classify_boot_sector(sector0) {
        return Ok(table_type);
    }

    let header_offset = reader.sector_offset(GptZoneTable::HEADER_LBA)?;
    let signature = reader.read_up_to(header_offset, GptHeader::SIGNATURE.len())?;

    if signature.as_slice() == GptHeader::SIGNATURE {
        Ok(TableType::Gpt)
    } else {
        Ok(TableType::Unknown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn detect(image: Vec<u8>, sector_size: u32) -> Result<TableType> {
        let mut stream = Cursor::new(image);
        let mut reader = SectorReader::new(&mut stream, sector_size)?;
        let sector0 = reader.read_up_to(0, sector_size as usize)?;
        detect_table_type(&sector0, &mut reader)
    }

    fn signed_sector(first_type: u8) -> Vec<u8> {
        let mut sector = vec![0u8; 512];
        sector[450] = first_type;
        sector[510] = 0x55;
        sector[511] = 0xAA;
        sector
    }

    #[test]
    fn test_boot_signature_means_mbr() {
        for code in [0x00u8, 0x07, 0x0C, 0x83, 0xEF, 0xED] {
            assert_eq!(classify_boot_sector(&signed_sector(code)), Some(TableType::Mbr));
        }
    }

    #[test]
    fn test_protective_entry_means_gpt_with_mbr() {
        assert_eq!(
            classify_boot_sector(&signed_sector(0xEE)),
            Some(TableType::GptProtectiveMbr)
        );
    }

    #[test]
    fn test_boot_signature_wins_over_gpt_header() {
        let mut image = signed_sector(0x83);
        image.extend_from_slice(b"EFI PART");
        image.resize(1024, 0);
        assert_eq!(detect(image, 512).unwrap(), TableType::Mbr);
    }

    #[test]
    fn test_gpt_signature_without_boot_signature() {
        let mut image = vec![0u8; 1024];
        image[512..520].copy_from_slice(b"EFI PART");
        assert_eq!(detect(image, 512).unwrap(), TableType::Gpt);
    }

    #[test]
    fn test_gpt_header_follows_sector_size() {
        let mut image = vec![0u8; 8192];
        image[4096..4104].copy_from_slice(b"EFI PART");
        assert_eq!(detect(image.clone(), 4096).unwrap(), TableType::Gpt);
        assert_eq!(detect(image, 512).unwrap(), TableType::Unknown);
    }

    #[test]
    fn test_unknown_without_signatures() {
        assert_eq!(detect(vec![0u8; 1024], 512).unwrap(), TableType::Unknown);
        // Single-sector image: sector 1 does not exist
        assert_eq!(detect(vec![0u8; 512], 512).unwrap(), TableType::Unknown);
    }

    #[test]
    fn test_short_sector0() {
        let err = detect(vec![0u8; 300], 512).unwrap_err();
        assert!(err.is_short_read());
    }
}
