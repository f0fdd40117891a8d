//! Security validation constants and helpers
//!
//! Limits and checked arithmetic used while decoding untrusted disk images.

use crate::Error;

/// Smallest sector size we accept (the MBR occupies 512 bytes)
pub const MIN_SECTOR_SIZE: u32 = 512;

/// Maximum sector size we'll accept (4KB - common for advanced format)
pub const MAX_SECTOR_SIZE: u32 = 4096;

/// Maximum allocation size for single buffer (256 MB)
pub const MAX_ALLOCATION_SIZE: usize = 256 * 1024 * 1024;

/// Maximum file size for memory mapping (16 GB - practical limit for most systems)
pub const MAX_MMAP_SIZE: u64 = 16 * 1024 * 1024 * 1024;

/// Validate that a size is within allocation limits
///
/// # Security
/// Prevents memory exhaustion from header fields that declare huge arrays
pub fn validate_allocation_size(size: u64, limit: usize, context: &str) -> crate::Result<usize> {
    if size > limit as u64 {
        return Err(Error::invalid_zone_table(format!(
            "{} size {} exceeds limit {}",
            context, size, limit
        )));
    }

    u64_to_usize(size, context)
}

/// Safely multiply two u64 values with overflow checking
///
/// # Security
/// Prevents integer overflow in LBA-to-offset calculations
pub fn checked_multiply_u64(a: u64, b: u64, context: &str) -> crate::Result<u64> {
    a.checked_mul(b)
        .ok_or_else(|| Error::invalid_zone_table(format!("{}: multiplication overflow", context)))
}

/// Safely add two u64 values with overflow checking
pub fn checked_add_u64(a: u64, b: u64, context: &str) -> crate::Result<u64> {
    a.checked_add(b)
        .ok_or_else(|| Error::invalid_zone_table(format!("{}: addition overflow", context)))
}

/// Safely convert u64 to usize with platform checking
///
/// # Security
/// Prevents truncation on 32-bit platforms
pub fn u64_to_usize(value: u64, context: &str) -> crate::Result<usize> {
    value.try_into().map_err(|_| {
        Error::invalid_zone_table(format!(
            "{}: value {} exceeds platform usize limit",
            context, value
        ))
    })
}

/// Validate sector size is reasonable
pub fn validate_sector_size(sector_size: u32) -> crate::Result<()> {
    if !(MIN_SECTOR_SIZE..=MAX_SECTOR_SIZE).contains(&sector_size) {
        return Err(Error::invalid_sector_size(format!(
            "{} (must be {}-{})",
            sector_size, MIN_SECTOR_SIZE, MAX_SECTOR_SIZE
        )));
    }

    // Sector size should be power of 2
    if !sector_size.is_power_of_two() {
        return Err(Error::invalid_sector_size(format!(
            "{} is not a power of 2",
            sector_size
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_allocation_size() {
        assert_eq!(
            validate_allocation_size(1024, MAX_ALLOCATION_SIZE, "test").unwrap(),
            1024
        );

        let err = validate_allocation_size(
            MAX_ALLOCATION_SIZE as u64 + 1,
            MAX_ALLOCATION_SIZE,
            "entry array",
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidZoneTable(_)));
        assert!(err.to_string().contains("entry array"));
    }

    #[test]
    fn test_checked_arithmetic() {
        assert_eq!(checked_multiply_u64(2048, 512, "test").unwrap(), 1_048_576);
        assert!(checked_multiply_u64(u64::MAX, 2, "test").is_err());

        assert_eq!(checked_add_u64(1, 2, "test").unwrap(), 3);
        assert!(checked_add_u64(u64::MAX, 1, "test").is_err());
    }

    #[test]
    fn test_validate_sector_size() {
        assert!(validate_sector_size(512).is_ok());
        assert!(validate_sector_size(1024).is_ok());
        assert!(validate_sector_size(4096).is_ok());

        assert!(validate_sector_size(0).is_err());
        assert!(validate_sector_size(256).is_err());
        assert!(validate_sector_size(8192).is_err());
        assert!(matches!(
            validate_sector_size(520),
            Err(Error::InvalidSectorSize(_))
        ));
    }

    #[test]
    fn test_u64_to_usize() {
        assert_eq!(u64_to_usize(1024, "test").unwrap(), 1024);

        #[cfg(target_pointer_width = "32")]
        {
            assert!(u64_to_usize(0xFFFFFFFF + 1, "test").is_err());
        }
    }
}
