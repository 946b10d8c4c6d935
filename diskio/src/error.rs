//! Error types for disk operations

use core::fmt;
use std::io;
use std::path::PathBuf;

use crate::catalog::FResult;
use crate::types::DResult;

/// Result type for disk operations
pub type Result<T> = core::result::Result<T, DiskError>;

/// Errors that can occur while serving the FAT driver
#[derive(Debug)]
pub enum DiskError {
    /// Session used before a successful initialize
    NotReady,

    /// Drive number other than 0
    InvalidDrive(u8),

    /// Request arguments make no sense (empty run, short buffer, ...)
    InvalidParameter(&'static str),

    /// Write issued against a read-only session
    WriteProtected,

    /// Seeking the backing store failed
    Seek {
        /// Byte offset that was requested
        offset: u64,
        /// Underlying I/O error
        source: io::Error,
    },

    /// Backing store returned fewer bytes than requested
    ShortRead {
        /// First logical sector of the request
        sector: u32,
        /// Bytes requested
        expected: usize,
        /// Bytes actually read
        actual: usize,
    },

    /// Backing store accepted fewer bytes than requested
    ShortWrite {
        /// First logical sector of the request
        sector: u32,
        /// Bytes requested
        expected: usize,
        /// Bytes actually written
        actual: usize,
    },

    /// Any other I/O failure of the backing store
    Io(io::Error),

    /// The image file could not be opened or verified
    NoBackingStore {
        /// Path that was opened
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },

    /// Backing store cannot hold a single sector after the header
    ImageTooSmall {
        /// Length of the backing store in bytes
        len: u64,
    },

    /// Control command the device does not implement
    UnsupportedCommand(u8),
}

impl DiskError {
    /// Low level result code for this error
    pub fn dresult(&self) -> DResult {
        match self {
            Self::NotReady | Self::NoBackingStore { .. } | Self::ImageTooSmall { .. } => {
                DResult::NotRdy
            }
            Self::InvalidDrive(_) | Self::InvalidParameter(_) | Self::UnsupportedCommand(_) => {
                DResult::ParErr
            }
            Self::WriteProtected => DResult::WrPrt,
            Self::Seek { .. } | Self::ShortRead { .. } | Self::ShortWrite { .. } | Self::Io(_) => {
                DResult::Error
            }
        }
    }

    /// Filesystem level result code for this error
    pub fn fresult(&self) -> FResult {
        match self {
            Self::NotReady | Self::NoBackingStore { .. } | Self::ImageTooSmall { .. } => {
                FResult::NotReady
            }
            Self::InvalidDrive(_) => FResult::InvalidDrive,
            Self::InvalidParameter(_) | Self::UnsupportedCommand(_) => FResult::InvalidParameter,
            Self::WriteProtected => FResult::WriteProtected,
            Self::Seek { .. } | Self::ShortRead { .. } | Self::ShortWrite { .. } | Self::Io(_) => {
                FResult::DiskErr
            }
        }
    }
}

impl fmt::Display for DiskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotReady => write!(f, "Disk session is not initialized"),
            Self::InvalidDrive(drive) => write!(f, "Invalid drive number {}", drive),
            Self::InvalidParameter(what) => write!(f, "Invalid parameter: {}", what),
            Self::WriteProtected => write!(f, "Disk image is write protected"),
            Self::Seek { offset, source } => {
                write!(f, "Seek to offset {:#x} failed: {}", offset, source)
            }
            Self::ShortRead {
                sector,
                expected,
                actual,
            } => write!(
                f,
                "Short read at sector {}: got {} of {} bytes",
                sector, actual, expected
            ),
            Self::ShortWrite {
                sector,
                expected,
                actual,
            } => write!(
                f,
                "Short write at sector {}: wrote {} of {} bytes",
                sector, actual, expected
            ),
            Self::Io(e) => write!(f, "I/O error: {}", e),
            Self::NoBackingStore { path, source } => {
                write!(f, "Cannot use image {}: {}", path.display(), source)
            }
            Self::ImageTooSmall { len } => {
                write!(f, "Image of {} bytes holds no complete sector", len)
            }
            Self::UnsupportedCommand(cmd) => write!(f, "Unsupported control command {}", cmd),
        }
    }
}

impl std::error::Error for DiskError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Seek { source, .. } | Self::NoBackingStore { source, .. } => Some(source),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for DiskError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<DiskError> for io::Error {
    fn from(e: DiskError) -> Self {
        let kind = match &e {
            DiskError::Io(inner) => inner.kind(),
            DiskError::ShortRead { .. } => io::ErrorKind::UnexpectedEof,
            DiskError::ShortWrite { .. } => io::ErrorKind::WriteZero,
            DiskError::InvalidParameter(_) | DiskError::InvalidDrive(_) => {
                io::ErrorKind::InvalidInput
            }
            DiskError::WriteProtected => io::ErrorKind::PermissionDenied,
            DiskError::NoBackingStore { .. } => io::ErrorKind::NotFound,
            DiskError::UnsupportedCommand(_) => io::ErrorKind::Unsupported,
            DiskError::NotReady | DiskError::Seek { .. } | DiskError::ImageTooSmall { .. } => {
                io::ErrorKind::Other
            }
        };
        io::Error::new(kind, e)
    }
}
