//! Common types and constants for the disk layer

use bitflags::bitflags;

use crate::error::{DiskError, Result};

/// Logical sector size presented to the FAT driver (always 1024 bytes)
pub const SECTOR_SIZE: usize = 1024;

/// Size of the DIFC container header that prefixes DIM images
pub const DIFC_HEADER_SIZE: u64 = 0x100;

/// The only drive this layer serves
pub const DRIVE: u8 = 0;

bitflags! {
    /// Image-specific quirks that change how sectors are addressed.
    ///
    /// Bit values match the ones callers already store in their image
    /// tables, so masks can be passed through unchanged.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Hints: u8 {
        /// Present long file names to the FAT driver
        const USE_LFN = 0x01;
        /// Follow host symlinks when importing files
        const FOLLOW_SYMLINKS = 0x02;
        /// Serve the built-in boot sector and never write sector 0
        const REPLACE_SECTOR0 = 0x04;
        /// Image bytes start after a DIFC header
        const HAS_DIFC_HEADER = 0x10;
    }
}

bitflags! {
    /// Drive status bits. An empty set means the drive is ready.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct DiskStatus: u8 {
        /// Drive not initialized
        const NOINIT = 0x01;
        /// No medium in the drive
        const NODISK = 0x02;
        /// Medium is write protected
        const PROTECT = 0x04;
    }
}

impl DiskStatus {
    /// Whether reads (and possibly writes) may be issued
    pub fn is_ready(self) -> bool {
        !self.intersects(Self::NOINIT | Self::NODISK)
    }
}

/// Result codes of the low level disk functions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum DResult {
    /// Successful
    Ok = 0,
    /// R/W error
    Error = 1,
    /// Write protected
    WrPrt = 2,
    /// Not ready
    NotRdy = 3,
    /// Invalid parameter
    ParErr = 4,
}

impl<T> From<&Result<T>> for DResult {
    fn from(result: &Result<T>) -> Self {
        match result {
            Ok(_) => DResult::Ok,
            Err(e) => e.dresult(),
        }
    }
}

/// A run of sectors requested by the FAT driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectorAddress {
    /// First logical sector
    pub sector: u32,
    /// Number of sectors
    pub count: u32,
}

impl SectorAddress {
    /// Create an address, rejecting empty and wrapping ranges
    pub fn new(sector: u32, count: u32) -> Result<Self> {
        if count == 0 {
            return Err(DiskError::InvalidParameter("sector count is zero"));
        }
        if sector.checked_add(count - 1).is_none() {
            return Err(DiskError::InvalidParameter("sector range overflows"));
        }
        if (count as usize).checked_mul(SECTOR_SIZE).is_none() {
            return Err(DiskError::InvalidParameter("sector run too large for this target"));
        }
        Ok(Self { sector, count })
    }

    /// Number of bytes covered by this run
    pub fn byte_len(&self) -> usize {
        self.count as usize * SECTOR_SIZE
    }

    /// Whether logical sector 0 is part of the run
    pub fn includes_sector0(&self) -> bool {
        self.sector == 0 && self.count > 0
    }

    /// Drop the first sector of the run
    pub fn advance(self) -> Self {
        Self {
            sector: self.sector.saturating_add(1),
            count: self.count.saturating_sub(1),
        }
    }

    /// Whether nothing is left to transfer
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}
