//! # partscope core
//!
//! Core traits, types, and error handling shared by the partscope crates.
//!
//! This crate provides the foundational abstractions for decoding partition tables:
//! - **Vaults**: Byte sources over a disk image (`Vault`, `ReadSeek`)
//! - **Zone tables**: Decoded partition tables (`ZoneTable`)
//! - **Partition entries**: The normalized, table-agnostic partition record
//!
//! ## Example
//!
//! ```rust,no_run
//! use partscope_core::{Vault, Result, format_size};
//!
//! fn describe_vault(vault: &dyn Vault) -> Result<()> {
//!     println!("Vault type: {}", vault.identify());
//!     println!("Vault size: {}", format_size(vault.length()));
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod security;
pub mod traits;
pub mod types;

// Re-export commonly used items
pub use error::{Error, Result};
pub use security::*;
pub use traits::{ReadSeek, Vault, ZoneTable};
pub use types::{format_size, PartitionEntry, TableType, DEFAULT_SECTOR_SIZE};
