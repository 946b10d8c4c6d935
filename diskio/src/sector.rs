//! Sector to byte offset translation
//!
//! Every seek into the backing store goes through [`translate`]. Nothing
//! else in the crate multiplies sector numbers.

use crate::types::{Hints, SectorAddress, DIFC_HEADER_SIZE, SECTOR_SIZE};

/// Bytes skipped at the start of the backing store
pub const fn header_len(hints: Hints) -> u64 {
    if hints.contains(Hints::HAS_DIFC_HEADER) {
        DIFC_HEADER_SIZE
    } else {
        0
    }
}

/// Byte offset of a logical sector in the backing store
pub const fn translate(sector: u32, hints: Hints) -> u64 {
    sector as u64 * SECTOR_SIZE as u64 + header_len(hints)
}

/// Whole sectors available in a backing store of `len` bytes
pub fn sectors_in(len: u64, hints: Hints) -> u64 {
    len.saturating_sub(header_len(hints)) / SECTOR_SIZE as u64
}

impl SectorAddress {
    /// Byte offset of the first sector of the run
    pub fn byte_offset(&self, hints: Hints) -> u64 {
        translate(self.sector, hints)
    }
}
