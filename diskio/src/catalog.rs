//! Filesystem result codes and their descriptions
//!
//! The FAT driver reports outcomes as small integers (0-19). This table is
//! fixed for the life of the process; anything outside it is reported as
//! `"Unknown error"`.

use core::fmt;

/// Text returned for codes outside the catalog
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// Outcome codes of FAT filesystem operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum FResult {
    /// (0) Succeeded
    Ok = 0,
    /// (1) A hard error occurred in the low level disk I/O layer
    DiskErr = 1,
    /// (2) Assertion failed
    IntErr = 2,
    /// (3) The physical drive cannot work
    NotReady = 3,
    /// (4) Could not find the file
    NoFile = 4,
    /// (5) Could not find the path
    NoPath = 5,
    /// (6) The path name format is invalid
    InvalidName = 6,
    /// (7) Access denied due to prohibited access or directory full
    Denied = 7,
    /// (8) Access denied due to prohibited access
    Exist = 8,
    /// (9) The file/directory object is invalid
    InvalidObject = 9,
    /// (10) The physical drive is write protected
    WriteProtected = 10,
    /// (11) The logical drive number is invalid
    InvalidDrive = 11,
    /// (12) The volume has no work area
    NotEnabled = 12,
    /// (13) There is no valid FAT volume
    NoFilesystem = 13,
    /// (14) The mkfs call aborted due to a parameter error
    MkfsAborted = 14,
    /// (15) Could not get a grant to access the volume within defined period
    Timeout = 15,
    /// (16) The operation is rejected according to the file sharing policy
    Locked = 16,
    /// (17) LFN working buffer could not be allocated
    NotEnoughCore = 17,
    /// (18) Too many open files
    TooManyOpenFiles = 18,
    /// (19) Given parameter is invalid
    InvalidParameter = 19,
}

const DESCRIPTIONS: [&str; 20] = [
    "Succeeded",
    "A hard error occurred in the low level disk I/O layer",
    "Assertion failed",
    "The physical drive cannot work",
    "Could not find the file",
    "Could not find the path",
    "The path name format is invalid",
    "Access denied due to prohibited access or directory full",
    "Access denied due to prohibited access",
    "The file/directory object is invalid",
    "The physical drive is write protected",
    "The logical drive number is invalid",
    "The volume has no work area",
    "There is no valid FAT volume",
    "The f_mkfs() aborted due to any parameter error",
    "Could not get a grant to access the volume within defined period",
    "The operation is rejected according to the file sharing policy",
    "LFN working buffer could not be allocated",
    "Number of open files > _FS_SHARE",
    "Given parameter is invalid",
];

const ALL: [FResult; 20] = [
    FResult::Ok,
    FResult::DiskErr,
    FResult::IntErr,
    FResult::NotReady,
    FResult::NoFile,
    FResult::NoPath,
    FResult::InvalidName,
    FResult::Denied,
    FResult::Exist,
    FResult::InvalidObject,
    FResult::WriteProtected,
    FResult::InvalidDrive,
    FResult::NotEnabled,
    FResult::NoFilesystem,
    FResult::MkfsAborted,
    FResult::Timeout,
    FResult::Locked,
    FResult::NotEnoughCore,
    FResult::TooManyOpenFiles,
    FResult::InvalidParameter,
];

impl FResult {
    /// Look up a raw code
    pub fn from_code(code: i32) -> Option<Self> {
        usize::try_from(code).ok().and_then(|i| ALL.get(i).copied())
    }

    /// Raw numeric code
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Fixed description of this outcome
    pub const fn description(self) -> &'static str {
        DESCRIPTIONS[self as usize]
    }
}

impl fmt::Display for FResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Describe a raw result code
pub fn errstr(code: i32) -> &'static str {
    FResult::from_code(code).map_or(UNKNOWN_ERROR, FResult::description)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_errstr_bounds() {
        assert_eq!(errstr(0), "Succeeded");
        assert_eq!(errstr(19), "Given parameter is invalid");
        assert_eq!(errstr(20), UNKNOWN_ERROR);
        assert_eq!(errstr(-1), UNKNOWN_ERROR);
        assert_eq!(errstr(i32::MIN), UNKNOWN_ERROR);
    }

    #[test]
    fn test_codes_match_table_positions() {
        for (i, r) in ALL.iter().enumerate() {
            assert_eq!(r.code() as usize, i);
            assert_eq!(FResult::from_code(i as i32), Some(*r));
            assert_eq!(errstr(i as i32), r.description());
        }
    }

    #[test]
    fn test_display_uses_description() {
        assert_eq!(
            FResult::WriteProtected.to_string(),
            "The physical drive is write protected"
        );
    }
}
