//! Text and JSON renderers for decoded partition tables

use chrono::{DateTime, Local};
use partscope_core::{format_size, PartitionEntry, TableType};
use partscope_zones::{format_guid, GptAttributes, GptDetails, MbrPartitionType, PartitionTable};
use serde::Serialize;
use std::fmt::{self, Write};

const RULE_WIDTH: usize = 80;

/// Report envelope written by `analyze --format json`
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub image: &'a str,
    pub generated_at: DateTime<Local>,
    pub table: &'a PartitionTable,
}

/// Render the JSON report
pub fn render_json(report: &Report<'_>) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

/// Render the text report
pub fn render_text(report: &Report<'_>) -> Result<String, fmt::Error> {
    let table = report.table;
    let mut out = String::new();

    writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;
    writeln!(out, "Disk analysis: {}", report.image)?;
    writeln!(out, "Generated:     {}", report.generated_at.format("%Y-%m-%d %H:%M:%S"))?;
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;
    writeln!(out, "Partition table: {}", table.table_type)?;
    writeln!(
        out,
        "Disk size:       {} ({} bytes)",
        format_size(table.disk_size_bytes),
        table.disk_size_bytes
    )?;
    writeln!(out, "Sector size:     {} bytes", table.sector_size)?;

    if let Some(mbr) = &table.mbr {
        writeln!(out, "Disk signature:  0x{:08X}", mbr.disk_signature)?;
        writeln!(out, "Boot signature:  0x{:04X}", mbr.boot_signature)?;
    }

    if let Some(gpt) = &table.gpt {
        render_gpt_header(&mut out, gpt)?;
    }

    if table.truncated {
        writeln!(out)?;
        writeln!(
            out,
            "Warning: GPT entry array is truncated; only fully readable entries are listed"
        )?;
    }

    writeln!(out)?;
    if table.table_type == TableType::Unknown {
        writeln!(out, "No recognized partition table found.")?;
        return Ok(out);
    }

    writeln!(
        out,
        "Partitions ({}, {} allocated):",
        table.partitions.len(),
        format_size(table.allocated_bytes())
    )?;
    writeln!(out, "{}", "-".repeat(RULE_WIDTH))?;
    if table.partitions.is_empty() {
        writeln!(out, "No partitions found.")?;
    }
    for partition in &table.partitions {
        render_partition(&mut out, partition, table.sector_size)?;
    }

    Ok(out)
}

fn render_gpt_header(out: &mut String, gpt: &GptDetails) -> fmt::Result {
    let header = &gpt.header;
    writeln!(out)?;
    writeln!(out, "GPT header:")?;
    writeln!(
        out,
        "  Signature:     {:?} ({})",
        header.signature_text(),
        if header.has_valid_signature() { "valid" } else { "MISMATCH" }
    )?;
    writeln!(
        out,
        "  Revision:      {}.{}",
        header.revision >> 16,
        header.revision & 0xFFFF
    )?;
    writeln!(out, "  Disk GUID:     {}", format_guid(&header.disk_guid))?;
    writeln!(
        out,
        "  Header LBA:    {} (backup at {})",
        header.current_lba, header.backup_lba
    )?;
    writeln!(
        out,
        "  Usable LBAs:   {} - {} ({} sectors)",
        header.first_usable_lba,
        header.last_usable_lba,
        header.usable_lba_count()
    )?;
    writeln!(
        out,
        "  Entries:       {} x {} bytes at LBA {}",
        header.num_partition_entries, header.partition_entry_size, header.partition_entries_lba
    )?;
    writeln!(
        out,
        "  Header CRC32:  0x{:08X} ({})",
        header.header_crc32,
        crc_outcome(gpt.integrity.header_crc32_valid)
    )?;
    writeln!(
        out,
        "  Array CRC32:   0x{:08X} ({})",
        header.partition_array_crc32,
        crc_outcome(gpt.integrity.partition_array_crc32_valid)
    )
}

fn crc_outcome(valid: bool) -> &'static str {
    if valid {
        "ok"
    } else {
        "MISMATCH"
    }
}

fn render_partition(out: &mut String, partition: &PartitionEntry, sector_size: u32) -> fmt::Result {
    if partition.name.is_empty() {
        writeln!(out, "Partition {}:", partition.index)?;
    } else {
        writeln!(out, "Partition {}: {}", partition.index, partition.name)?;
    }

    if partition.guid.is_none() {
        let code = MbrPartitionType(partition.raw_type);
        writeln!(out, "  Type:          0x{:02X} - {}", partition.raw_type, code)?;
        writeln!(
            out,
            "  Status:        {}",
            if partition.is_active { "active (bootable)" } else { "inactive" }
        )?;
        if code.is_extended() {
            writeln!(out, "  Container:     extended (logical partitions not listed)")?;
        }
    } else {
        writeln!(out, "  Type:          {}", partition.kind)?;
    }

    writeln!(
        out,
        "  LBA range:     {} - {}",
        partition.start_lba, partition.end_lba
    )?;
    writeln!(
        out,
        "  Size:          {} sectors ({})",
        partition.sector_count,
        format_size(partition.size_bytes)
    )?;
    match partition.byte_offset(sector_size) {
        Some(offset) => writeln!(out, "  Offset:        {} bytes (0x{:X})", offset, offset)?,
        None => writeln!(out, "  Offset:        beyond 64-bit range")?,
    }

    if let Some(guid) = &partition.guid {
        writeln!(out, "  GUID:          {}", format_guid(guid))?;
        writeln!(out, "  Attributes:    {}", GptAttributes(partition.attributes))?;
    }

    writeln!(out, "{}", "-".repeat(RULE_WIDTH / 2))
}
