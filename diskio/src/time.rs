//! Packed FAT timestamps
//!
//! The FAT driver stamps directory entries with a 32-bit value:
//!
//! ```text
//! 31..25  years since 1980
//! 24..21  month (1-12)
//! 20..16  day (1-31)
//! 15..11  hour (0-23)
//! 10..5   minute (0-59)
//!  4..0   seconds / 2
//! ```

use chrono::{Datelike, Local, Timelike};

/// First year a packed timestamp can express
pub const FAT_EPOCH_YEAR: i32 = 1980;

/// Pack a calendar time; years before 1980 clamp to 1980
pub fn pack_fat_datetime<T: Datelike + Timelike>(t: &T) -> u32 {
    let year = (t.year() - FAT_EPOCH_YEAR).clamp(0, 0x7F) as u32;
    (year << 25)
        | (t.month() << 21)
        | (t.day() << 16)
        | (t.hour() << 11)
        | (t.minute() << 5)
        | (t.second() >> 1)
}

/// Current local time, packed
pub fn now_packed() -> u32 {
    pack_fat_datetime(&Local::now())
}

/// Fields of a packed timestamp
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FatDateTime {
    /// Full year (1980-2107)
    pub year: u16,
    /// Month (1-12)
    pub month: u8,
    /// Day (1-31)
    pub day: u8,
    /// Hour (0-23)
    pub hour: u8,
    /// Minute (0-59)
    pub minute: u8,
    /// Seconds, always even
    pub second: u8,
}

impl FatDateTime {
    /// Split a packed timestamp into its fields
    pub fn from_packed(packed: u32) -> Self {
        Self {
            year: FAT_EPOCH_YEAR as u16 + (packed >> 25) as u16,
            month: ((packed >> 21) & 0x0F) as u8,
            day: ((packed >> 16) & 0x1F) as u8,
            hour: ((packed >> 11) & 0x1F) as u8,
            minute: ((packed >> 5) & 0x3F) as u8,
            second: ((packed & 0x1F) * 2) as u8,
        }
    }
}
