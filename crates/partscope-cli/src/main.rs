//! partscope CLI - MBR/GPT partition table inspector
//!
//! Decodes the partition table of a raw disk image and reports it as text or JSON.

mod hexdump;
mod render;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use partscope_core::{format_size, Vault, DEFAULT_SECTOR_SIZE};
use partscope_pipeline::PartialPipeline;
use partscope_vaults::{RawVault, VaultConfig};
use render::Report;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "partscope")]
#[command(about = "Inspect MBR and GPT partition tables in raw disk images", long_about = None)]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Log level (trace, debug, info, warn, error); overrides RUST_LOG
    #[arg(long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Decode and print the partition table
    Analyze {
        /// Disk image file
        image: PathBuf,

        /// Sector size in bytes
        #[arg(short = 's', long, default_value_t = DEFAULT_SECTOR_SIZE)]
        sector_size: u32,

        /// Save the report to this file instead of printing it
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        /// Report format
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,

        /// Read the image with plain file I/O instead of a memory map
        #[arg(long)]
        no_mmap: bool,
    },

    /// Hex dump of sector 0 tagged by MBR region
    Hexdump {
        /// Disk image file
        image: PathBuf,

        /// Sector size in bytes
        #[arg(short = 's', long, default_value_t = DEFAULT_SECTOR_SIZE)]
        sector_size: u32,

        /// Number of bytes to dump [default: one sector]
        #[arg(long)]
        bytes: Option<usize>,
    },

    /// Show the first bytes of every partition
    Preview {
        /// Disk image file
        image: PathBuf,

        /// Sector size in bytes
        #[arg(short = 's', long, default_value_t = DEFAULT_SECTOR_SIZE)]
        sector_size: u32,

        /// Number of bytes to show per partition
        #[arg(long, default_value_t = 64)]
        bytes: usize,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match &cli.log_level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match cli.command {
        Command::Analyze {
            image,
            sector_size,
            output,
            format,
            no_mmap,
        } => cmd_analyze(&image, sector_size, output.as_deref(), format, !no_mmap),
        Command::Hexdump {
            image,
            sector_size,
            bytes,
        } => cmd_hexdump(&image, sector_size, bytes),
        Command::Preview {
            image,
            sector_size,
            bytes,
        } => cmd_preview(&image, sector_size, bytes),
    }
}

fn open_vault(image: &Path, use_mmap: bool) -> Result<RawVault> {
    RawVault::open(image, VaultConfig { use_mmap })
        .with_context(|| format!("Failed to open {}", image.display()))
}

fn cmd_analyze(
    image: &Path,
    sector_size: u32,
    output: Option<&Path>,
    format: Format,
    use_mmap: bool,
) -> Result<()> {
    let mut vault = open_vault(image, use_mmap)?;
    let table = partscope_zones::decode(&mut vault, sector_size)
        .with_context(|| format!("Failed to decode {}", image.display()))?;

    let image_name = image.display().to_string();
    let report = Report {
        image: &image_name,
        generated_at: chrono::Local::now(),
        table: &table,
    };

    let rendered = match format {
        Format::Text => render::render_text(&report).context("Failed to render report")?,
        Format::Json => render::render_json(&report).context("Failed to serialize report")?,
    };

    match output {
        Some(path) => {
            std::fs::write(path, &rendered)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            println!("Report saved to: {}", path.display());
        }
        None => print!("{}", rendered),
    }

    Ok(())
}

fn cmd_hexdump(image: &Path, sector_size: u32, bytes: Option<usize>) -> Result<()> {
    partscope_core::validate_sector_size(sector_size)?;
    let bytes = bytes.unwrap_or(sector_size as usize);
    let mut vault = open_vault(image, true)?;

    let len = (bytes as u64).min(vault.length());
    let mut pipeline = PartialPipeline::new(vault.content(), 0, len)?;
    let data = pipeline.head(bytes)?;

    println!("Sector 0 of {} ({} bytes)", image.display(), data.len());
    println!("{}", "-".repeat(75));
    print!("{}", hexdump::dump_boot_sector(&data));

    Ok(())
}

fn cmd_preview(image: &Path, sector_size: u32, bytes: usize) -> Result<()> {
    let mut vault = open_vault(image, true)?;
    let table = partscope_zones::decode(&mut vault, sector_size)
        .with_context(|| format!("Failed to decode {}", image.display()))?
        .ensure_recognized()
        .with_context(|| format!("No partition table in {}", image.display()))?;

    if table.partitions.is_empty() {
        println!("No partitions found.");
        return Ok(());
    }

    let disk_len = vault.length();
    for partition in &table.partitions {
        println!();
        println!("Partition {}: {}", partition.index, partition.kind);

        let Some(offset) = partition.byte_offset(sector_size) else {
            println!("  Offset beyond 64-bit range, skipped");
            continue;
        };
        println!("  Offset:   {} bytes (0x{:X})", offset, offset);
        println!("  LBA:      {}", partition.start_lba);
        println!("  Size:     {}", format_size(partition.size_bytes));

        if offset >= disk_len {
            tracing::warn!(
                "Partition {} starts beyond the end of the image",
                partition.index
            );
            println!("  Starts beyond the end of the image");
            continue;
        }

        let window = partition.size_bytes.min(disk_len - offset);
        let mut pipeline = PartialPipeline::new(vault.content(), offset, window)
            .with_context(|| format!("Failed to seek to partition {}", partition.index))?;
        let head = pipeline
            .head(bytes)
            .with_context(|| format!("Failed to read partition {}", partition.index))?;

        println!("  First {} bytes:", head.len());
        for line in hexdump::dump(&head, offset).lines() {
            println!("    {}", line);
        }
    }

    Ok(())
}
