//! Disk session: the block device the FAT driver talks to
//!
//! A [`DiskSession`] owns the backing store of the single mounted image.
//! It is created once at mount time, handed to the FAT driver by
//! reference, and dropped (or turned back into its storage with
//! [`DiskSession::into_inner`]) at unmount.
//!
//! # Request flow
//!
//! ```text
//! FAT driver ── read/write(sector, count) ──► DiskSession
//!                                               │ overlay: sector 0
//!                                               ▼
//!                                        translate(sector) ──► seek + read/write
//! ```

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::config::SessionConfig;
use crate::control::{ControlCommand, ControlReply};
use crate::error::{DiskError, Result};
use crate::image::{ImageType, VolumeInfo};
use crate::overlay::{overlay_read, overlay_write};
use crate::types::{DiskStatus, Hints, SectorAddress, DRIVE};

/// Block device contract offered to the FAT driver
///
/// Only drive 0 exists. Requests for other drives fail with
/// [`DiskError::InvalidDrive`]; status queries for them report
/// [`DiskStatus::NOINIT`].
pub trait DiskIo {
    /// Verify the backing store and make the drive ready
    fn initialize(&mut self, drive: u8) -> DiskStatus;

    /// Current drive status
    fn status(&self, drive: u8) -> DiskStatus;

    /// Read `count` sectors starting at `sector` into `buf`
    fn read(&mut self, drive: u8, buf: &mut [u8], sector: u32, count: u32) -> Result<()>;

    /// Write `count` sectors starting at `sector` from `buf`
    fn write(&mut self, drive: u8, buf: &[u8], sector: u32, count: u32) -> Result<()>;

    /// Capability and control queries
    fn control(&mut self, drive: u8, command: ControlCommand) -> Result<ControlReply>;

    /// Control query by raw command code
    fn control_code(&mut self, drive: u8, code: u8) -> Result<ControlReply> {
        let command = ControlCommand::try_from(code)?;
        self.control(drive, command)
    }
}

/// The single open disk image
pub struct DiskSession<S> {
    pub(crate) storage: S,
    pub(crate) path: Option<PathBuf>,
    pub(crate) basename: Option<String>,
    pub(crate) hints: Hints,
    pub(crate) image_type: ImageType,
    pub(crate) info: VolumeInfo,
    pub(crate) status: DiskStatus,
    pub(crate) config: SessionConfig,
}

impl DiskSession<File> {
    /// Open an image file on the host
    ///
    /// The format is guessed from the extension. The drive stays
    /// uninitialized until [`DiskIo::initialize`] is called.
    pub fn open<P: AsRef<Path>>(path: P, config: SessionConfig) -> Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .read(true)
            .write(!config.read_only)
            .open(path)
            .map_err(|source| DiskError::NoBackingStore {
                path: path.to_path_buf(),
                source,
            })?;

        let image_type = ImageType::from_path(path);
        let mut session = Self::with_storage(file, image_type, config);
        session.path = Some(path.to_path_buf());
        session.basename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned());

        log::info!(
            "opened {} as {} image (hints {:#04x})",
            path.display(),
            image_type.name(),
            session.hints.bits()
        );
        Ok(session)
    }
}

impl<S> DiskSession<S> {
    /// Wrap an already open backing store
    pub fn with_storage(storage: S, image_type: ImageType, config: SessionConfig) -> Self {
        let hints = config.hints.unwrap_or_else(|| image_type.default_hints());
        Self {
            storage,
            path: None,
            basename: None,
            hints,
            image_type,
            info: VolumeInfo::default(),
            status: DiskStatus::NOINIT,
            config,
        }
    }

    /// Hints in effect
    pub fn hints(&self) -> Hints {
        self.hints
    }

    /// Detected image format
    pub fn image_type(&self) -> ImageType {
        self.image_type
    }

    /// Label and serial read at initialize
    pub fn volume_info(&self) -> &VolumeInfo {
        &self.info
    }

    /// Host path of the image, if opened from a file
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// File name of the image, if opened from a file
    pub fn basename(&self) -> Option<&str> {
        self.basename.as_deref()
    }

    /// Mount-time configuration
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Borrow the backing store
    pub fn get_ref(&self) -> &S {
        &self.storage
    }

    /// Mutably borrow the backing store
    ///
    /// Writing to it directly bypasses the sector 0 overlay.
    pub fn get_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    /// Give the backing store back (unmount)
    pub fn into_inner(self) -> S {
        self.storage
    }

    pub(crate) fn display_name(&self) -> &str {
        self.basename.as_deref().unwrap_or("<memory>")
    }

    fn check_drive(drive: u8) -> Result<()> {
        if drive == DRIVE {
            Ok(())
        } else {
            Err(DiskError::InvalidDrive(drive))
        }
    }

    pub(crate) fn ensure_ready(&self) -> Result<()> {
        if self.status.is_ready() {
            Ok(())
        } else {
            Err(DiskError::NotReady)
        }
    }
}

impl<S: Read + Write + Seek> DiskSession<S> {
    fn seek_to(&mut self, addr: SectorAddress) -> Result<()> {
        let offset = addr.byte_offset(self.hints);
        self.storage
            .seek(SeekFrom::Start(offset))
            .map_err(|source| DiskError::Seek { offset, source })?;
        Ok(())
    }

    /// Read sectors straight from the backing store, bypassing the overlay
    pub(crate) fn read_raw(&mut self, addr: SectorAddress, dst: &mut [u8]) -> Result<()> {
        self.seek_to(addr)?;
        let actual = read_full(&mut self.storage, dst)?;
        if actual < dst.len() {
            return Err(DiskError::ShortRead {
                sector: addr.sector,
                expected: dst.len(),
                actual,
            });
        }
        Ok(())
    }

    fn write_raw(&mut self, addr: SectorAddress, src: &[u8]) -> Result<()> {
        self.seek_to(addr)?;
        let actual = write_full(&mut self.storage, src)?;
        if actual < src.len() {
            return Err(DiskError::ShortWrite {
                sector: addr.sector,
                expected: src.len(),
                actual,
            });
        }
        Ok(())
    }

    /// Log each byte the coming write changes
    fn audit_write(&mut self, addr: SectorAddress, src: &[u8]) -> Result<()> {
        let mut old = vec![0u8; src.len()];
        self.seek_to(addr)?;
        let available = read_full(&mut self.storage, &mut old)?;
        log::debug!(
            "write audit: sector {} at offset {:#x}",
            addr.sector,
            addr.byte_offset(self.hints)
        );
        for (i, (&before, &after)) in old[..available].iter().zip(src).enumerate() {
            if before != after {
                log::debug!(
                    "FAT driver changed byte {:#x} from {:#04x} to {:#04x}",
                    i,
                    before,
                    after
                );
            }
        }
        if available < src.len() {
            log::debug!(
                "write extends the image by {} bytes",
                src.len() - available
            );
        }
        Ok(())
    }
}

impl<S: Read + Write + Seek> DiskIo for DiskSession<S> {
    fn initialize(&mut self, drive: u8) -> DiskStatus {
        log::debug!("FAT driver requested disk initialize");
        if Self::check_drive(drive).is_err() {
            return DiskStatus::NOINIT;
        }
        self.bring_up()
    }

    fn status(&self, drive: u8) -> DiskStatus {
        log::debug!("FAT driver requested disk status");
        if Self::check_drive(drive).is_err() {
            return DiskStatus::NOINIT;
        }
        self.status
    }

    fn read(&mut self, drive: u8, buf: &mut [u8], sector: u32, count: u32) -> Result<()> {
        log::debug!("FAT driver requested to read {} sectors at {}", count, sector);
        Self::check_drive(drive)?;
        self.ensure_ready()?;
        let addr = SectorAddress::new(sector, count)?;
        let dst = buf
            .get_mut(..addr.byte_len())
            .ok_or(DiskError::InvalidParameter("buffer smaller than request"))?;

        let rest = overlay_read(self.hints, addr, dst);
        if rest.is_empty() {
            return Ok(());
        }
        self.read_raw(rest.addr, &mut dst[rest.buf_offset..])
    }

    fn write(&mut self, drive: u8, buf: &[u8], sector: u32, count: u32) -> Result<()> {
        log::debug!("FAT driver requested to write {} sectors at {}", count, sector);
        Self::check_drive(drive)?;
        self.ensure_ready()?;
        if self.status.contains(DiskStatus::PROTECT) {
            return Err(DiskError::WriteProtected);
        }
        let addr = SectorAddress::new(sector, count)?;
        let src = buf
            .get(..addr.byte_len())
            .ok_or(DiskError::InvalidParameter("buffer smaller than request"))?;

        let rest = overlay_write(self.hints, addr);
        if rest.is_empty() {
            return Ok(());
        }
        let src = &src[rest.buf_offset..];
        if self.config.audit_writes {
            self.audit_write(rest.addr, src)?;
        }
        self.write_raw(rest.addr, src)
    }

    fn control(&mut self, drive: u8, command: ControlCommand) -> Result<ControlReply> {
        log::debug!("FAT driver requested control {:?}", command);
        Self::check_drive(drive)?;
        self.ensure_ready()?;
        self.dispatch_control(command)
    }
}

/// Read until `buf` is full or the source hits end of file
pub(crate) fn read_full<R: Read + ?Sized>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut done = 0;
    while done < buf.len() {
        match reader.read(&mut buf[done..]) {
            Ok(0) => break,
            Ok(n) => done += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(done)
}

/// Write until `buf` is drained or the sink stops accepting bytes
fn write_full<W: Write + ?Sized>(writer: &mut W, buf: &[u8]) -> io::Result<usize> {
    let mut done = 0;
    while done < buf.len() {
        match writer.write(&buf[done..]) {
            Ok(0) => break,
            Ok(n) => done += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(done)
}
