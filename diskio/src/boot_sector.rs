//! Built-in substitute boot sector
//!
//! Human68k floppies carry an X68000 boot sector that a PC-style FAT driver
//! does not understand. When [`Hints::REPLACE_SECTOR0`] is set, reads of
//! logical sector 0 are served from [`FAKE_BOOT_SECTOR`] instead: a FAT12
//! BPB describing the 2HD layout that Human68k formats with.
//!
//! [`Hints::REPLACE_SECTOR0`]: crate::Hints::REPLACE_SECTOR0

use crate::types::SECTOR_SIZE;

/// Sectors on a 2HD floppy (77 cylinders, 2 heads, 8 sectors)
pub const SECTORS_2HD: u16 = 1232;

/// Serial number stored in the substitute BPB
pub const FAKE_VOLUME_SERIAL: u32 = 0x1987_0328;

/// Label stored in the substitute BPB
pub const FAKE_VOLUME_LABEL: &[u8; 11] = b"HUMAN68K   ";

/// Substitute boot sector served for logical sector 0
pub const FAKE_BOOT_SECTOR: [u8; SECTOR_SIZE] = build_boot_sector();

// BPB field offsets
const OFF_OEM: usize = 0x03;
const OFF_BYTES_PER_SECTOR: usize = 0x0B;
const OFF_SECTORS_PER_CLUSTER: usize = 0x0D;
const OFF_RESERVED_SECTORS: usize = 0x0E;
const OFF_NUM_FATS: usize = 0x10;
const OFF_ROOT_ENTRIES: usize = 0x11;
const OFF_TOTAL_SECTORS_16: usize = 0x13;
const OFF_MEDIA: usize = 0x15;
const OFF_FAT_SIZE_16: usize = 0x16;
const OFF_SECTORS_PER_TRACK: usize = 0x18;
const OFF_NUM_HEADS: usize = 0x1A;
/// Extended boot signature (0x29 when serial and label follow)
pub const OFF_EXT_SIGNATURE: usize = 0x26;
/// Volume serial number
pub const OFF_VOLUME_SERIAL: usize = 0x27;
/// Volume label (11 bytes, space padded)
pub const OFF_VOLUME_LABEL: usize = 0x2B;
const OFF_FS_TYPE: usize = 0x36;
const OFF_BOOT_CODE: usize = 0x3E;

/// Value of the extended boot signature byte
pub const EXT_BOOT_SIGNATURE: u8 = 0x29;

const fn put_bytes(mut sector: [u8; SECTOR_SIZE], at: usize, bytes: &[u8]) -> [u8; SECTOR_SIZE] {
    let mut i = 0;
    while i < bytes.len() {
        sector[at + i] = bytes[i];
        i += 1;
    }
    sector
}

const fn put_u16(sector: [u8; SECTOR_SIZE], at: usize, value: u16) -> [u8; SECTOR_SIZE] {
    put_bytes(sector, at, &value.to_le_bytes())
}

const fn build_boot_sector() -> [u8; SECTOR_SIZE] {
    let mut s = [0u8; SECTOR_SIZE];

    // JMP short to the boot code, NOP
    s = put_bytes(s, 0, &[0xEB, (OFF_BOOT_CODE - 2) as u8, 0x90]);
    s = put_bytes(s, OFF_OEM, b"HUMAN68K");

    s = put_u16(s, OFF_BYTES_PER_SECTOR, SECTOR_SIZE as u16);
    s[OFF_SECTORS_PER_CLUSTER] = 1;
    s = put_u16(s, OFF_RESERVED_SECTORS, 1);
    s[OFF_NUM_FATS] = 2;
    s = put_u16(s, OFF_ROOT_ENTRIES, 192);
    s = put_u16(s, OFF_TOTAL_SECTORS_16, SECTORS_2HD);
    s[OFF_MEDIA] = 0xFE;
    s = put_u16(s, OFF_FAT_SIZE_16, 2);
    s = put_u16(s, OFF_SECTORS_PER_TRACK, 8);
    s = put_u16(s, OFF_NUM_HEADS, 2);

    s[OFF_EXT_SIGNATURE] = EXT_BOOT_SIGNATURE;
    s = put_bytes(s, OFF_VOLUME_SERIAL, &FAKE_VOLUME_SERIAL.to_le_bytes());
    s = put_bytes(s, OFF_VOLUME_LABEL, FAKE_VOLUME_LABEL);
    s = put_bytes(s, OFF_FS_TYPE, b"FAT12   ");

    // HLT; JMP $-1
    s = put_bytes(s, OFF_BOOT_CODE, &[0xF4, 0xEB, 0xFD]);

    s[510] = 0x55;
    s[511] = 0xAA;
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    fn le16(at: usize) -> u16 {
        u16::from_le_bytes([FAKE_BOOT_SECTOR[at], FAKE_BOOT_SECTOR[at + 1]])
    }

    #[test]
    fn test_signature() {
        assert_eq!(FAKE_BOOT_SECTOR[510], 0x55);
        assert_eq!(FAKE_BOOT_SECTOR[511], 0xAA);
        assert_eq!(FAKE_BOOT_SECTOR[0], 0xEB);
    }

    #[test]
    fn test_bpb_describes_2hd() {
        assert_eq!(le16(OFF_BYTES_PER_SECTOR), 1024);
        assert_eq!(le16(OFF_TOTAL_SECTORS_16), 1232);
        assert_eq!(le16(OFF_ROOT_ENTRIES), 192);
        assert_eq!(FAKE_BOOT_SECTOR[OFF_MEDIA], 0xFE);

        // 1 reserved + 2 FATs * 2 + 192 * 32 / 1024 root sectors
        let first_data = 1 + 2 * le16(OFF_FAT_SIZE_16) as u32 + 6;
        let clusters = SECTORS_2HD as u32 - first_data;
        assert!(clusters < 4085, "must stay a FAT12 volume");
        // Both FAT copies must be able to map every cluster
        assert!((clusters + 2) * 12 <= le16(OFF_FAT_SIZE_16) as u32 * 1024 * 8);
    }

    #[test]
    fn test_jump_lands_on_boot_code() {
        assert_eq!(FAKE_BOOT_SECTOR[1] as usize + 2, OFF_BOOT_CODE);
        assert_eq!(FAKE_BOOT_SECTOR[OFF_BOOT_CODE], 0xF4);
    }
}
