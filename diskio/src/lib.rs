//! Human68k Disk Image I/O Layer
//!
//! Presents a Human68k disk image file as a FAT block device with 1024-byte
//! sectors.
//!
//! # Overview
//!
//! X68000 media images differ from what a PC FAT driver expects in two ways:
//! - DIM images start with a 256-byte DIFC header before sector 0
//! - floppies carry an X68000 boot sector instead of a FAT BPB
//!
//! This crate hides both behind a single [`DiskSession`]:
//! - sector numbers are translated to byte offsets past the header
//! - sector 0 reads can be served from a built-in FAT12 boot sector, and
//!   writes to it dropped, so the image's own boot sector survives
//! - capacity, block size and flush queries are answered from the image
//!
//! # Architecture
//!
//! 1. **Translation** - [`sector::translate`] is the only offset arithmetic
//! 2. **Overlay** - [`overlay`] peels sector 0 off reads and writes
//! 3. **Session** - [`DiskSession`] implements the [`DiskIo`] contract
//! 4. **Adapters** - [`gpt_disk_io::BlockIo`] and [`SectorStream`] views
//!
//! # Usage
//!
//! ```ignore
//! use diskio::{DiskIo, DiskSession, SessionConfig, SectorStream};
//!
//! let mut session = DiskSession::open("GAME.DIM", SessionConfig::default())?;
//! if !session.initialize(0).is_ready() {
//!     return Err(...);
//! }
//!
//! let mut sector = [0u8; diskio::SECTOR_SIZE];
//! session.read(0, &mut sector, 1, 1)?;
//!
//! // Or hand a byte stream to a FAT driver
//! let fs = fatfs::FileSystem::new(SectorStream::new(&mut session)?, fatfs::FsOptions::new())?;
//! ```

#![warn(missing_docs)]

pub mod block_io;
pub mod boot_sector;
pub mod catalog;
pub mod config;
pub mod control;
pub mod diag;
pub mod error;
pub mod image;
pub mod overlay;
pub mod sector;
pub mod session;
pub mod stream;
pub mod time;
pub mod types;

pub use catalog::{errstr, FResult};
pub use config::SessionConfig;
pub use control::{ControlCommand, ControlReply};
pub use error::{DiskError, Result};
pub use image::{ImageType, VolumeInfo};
pub use session::{DiskIo, DiskSession};
pub use stream::SectorStream;
pub use time::now_packed;
pub use types::{DResult, DiskStatus, Hints, SectorAddress, DIFC_HEADER_SIZE, SECTOR_SIZE};
