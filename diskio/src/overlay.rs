//! Sector 0 interception
//!
//! With [`Hints::REPLACE_SECTOR0`] set, logical sector 0 belongs to the
//! substitute boot sector:
//!
//! - reads of sector 0 are served from [`FAKE_BOOT_SECTOR`]
//! - writes to sector 0 are dropped, so formatting by the FAT driver
//!   never reaches the image's real boot sector
//!
//! Both functions only peel sector 0 off the front of a run. What is left
//! is returned as a [`Remainder`] for the raw backing-store transfer.

use crate::boot_sector::FAKE_BOOT_SECTOR;
use crate::types::{Hints, SectorAddress, SECTOR_SIZE};

/// Part of a request still to be transferred to or from the backing store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Remainder {
    /// Sectors left
    pub addr: SectorAddress,
    /// Where in the caller's buffer those sectors start
    pub buf_offset: usize,
}

impl Remainder {
    fn untouched(addr: SectorAddress) -> Self {
        Self { addr, buf_offset: 0 }
    }

    fn skip_first(addr: SectorAddress) -> Self {
        Self {
            addr: addr.advance(),
            buf_offset: SECTOR_SIZE,
        }
    }

    /// Whether the overlay consumed the whole request
    pub fn is_empty(&self) -> bool {
        self.addr.is_empty()
    }
}

fn intercepts(hints: Hints, addr: SectorAddress) -> bool {
    hints.contains(Hints::REPLACE_SECTOR0) && addr.includes_sector0()
}

/// Fill the sector 0 part of `dst` from the substitute image
///
/// `dst` must hold at least `addr.byte_len()` bytes.
pub fn overlay_read(hints: Hints, addr: SectorAddress, dst: &mut [u8]) -> Remainder {
    if !intercepts(hints, addr) {
        return Remainder::untouched(addr);
    }
    log::debug!("serving substitute boot sector");
    dst[..SECTOR_SIZE].copy_from_slice(&FAKE_BOOT_SECTOR);
    Remainder::skip_first(addr)
}

/// Drop the sector 0 part of a write
pub fn overlay_write(hints: Hints, addr: SectorAddress) -> Remainder {
    if !intercepts(hints, addr) {
        return Remainder::untouched(addr);
    }
    log::debug!("dropping write to protected boot sector");
    Remainder::skip_first(addr)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(sector: u32, count: u32) -> SectorAddress {
        SectorAddress::new(sector, count).unwrap()
    }

    #[test]
    fn test_read_substitutes_sector0() {
        let mut buf = vec![0xAAu8; 3 * SECTOR_SIZE];
        let rest = overlay_read(Hints::REPLACE_SECTOR0, addr(0, 3), &mut buf);
        assert_eq!(&buf[..SECTOR_SIZE], &FAKE_BOOT_SECTOR[..]);
        assert!(buf[SECTOR_SIZE..].iter().all(|&b| b == 0xAA));
        assert_eq!(rest.addr, addr(1, 2));
        assert_eq!(rest.buf_offset, SECTOR_SIZE);
    }

    #[test]
    fn test_read_without_hint_is_untouched() {
        let mut buf = vec![0xAAu8; SECTOR_SIZE];
        let rest = overlay_read(Hints::HAS_DIFC_HEADER, addr(0, 1), &mut buf);
        assert!(buf.iter().all(|&b| b == 0xAA));
        assert_eq!(rest, Remainder::untouched(addr(0, 1)));
    }

    #[test]
    fn test_read_past_sector0_is_untouched() {
        let mut buf = vec![0u8; SECTOR_SIZE];
        let rest = overlay_read(Hints::REPLACE_SECTOR0, addr(1, 1), &mut buf);
        assert_eq!(rest.addr, addr(1, 1));
        assert_eq!(rest.buf_offset, 0);
    }

    #[test]
    fn test_write_single_sector0_is_consumed() {
        let rest = overlay_write(Hints::REPLACE_SECTOR0, addr(0, 1));
        assert!(rest.is_empty());
    }

    #[test]
    fn test_write_run_keeps_tail() {
        let rest = overlay_write(Hints::REPLACE_SECTOR0, addr(0, 3));
        assert_eq!(rest.addr, addr(1, 2));
        assert_eq!(rest.buf_offset, SECTOR_SIZE);
    }

    #[test]
    fn test_write_without_hint_passes_through() {
        let rest = overlay_write(Hints::empty(), addr(0, 3));
        assert_eq!(rest.addr, addr(0, 3));
        assert_eq!(rest.buf_offset, 0);
    }
}
