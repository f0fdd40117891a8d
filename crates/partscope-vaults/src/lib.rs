//! # partscope vaults
//!
//! Byte sources over raw disk images.
//!
//! ## Example
//!
//! ```rust,no_run
//! use partscope_vaults::{RawVault, VaultConfig};
//! use partscope_core::Vault;
//! use std::path::Path;
//!
//! let vault = RawVault::open(Path::new("disk.img"), VaultConfig::default()).unwrap();
//!
//! println!("Type: {}", vault.identify());
//! println!("Size: {} bytes", vault.length());
//! ```

pub mod raw;

pub use raw::{RawVault, VaultConfig};
