//! Byte stream view of a disk session
//!
//! Rust FAT drivers such as `fatfs` take a `Read + Write + Seek` volume
//! rather than a sector interface. [`SectorStream`] provides one on top of
//! a session. All traffic still goes through the session's sector
//! operations, so the substitute boot sector and its write protection
//! apply to byte-level access as well: a partial write into sector 0 is a
//! read-modify-write that the overlay drops.

use std::io::{self, Read, Seek, SeekFrom, Write};

use crate::control::ControlCommand;
use crate::error::Result;
use crate::session::{DiskIo, DiskSession};
use crate::types::{DRIVE, SECTOR_SIZE};

/// `Read + Write + Seek` adapter over a borrowed session
pub struct SectorStream<'a, S> {
    session: &'a mut DiskSession<S>,
    pos: u64,
    len: u64,
    scratch: Box<[u8; SECTOR_SIZE]>,
}

impl<'a, S: Read + Write + Seek> SectorStream<'a, S> {
    /// Wrap an initialized session; the stream length is fixed at its current capacity
    pub fn new(session: &'a mut DiskSession<S>) -> Result<Self> {
        session.ensure_ready()?;
        let len = u64::from(session.sector_count()?) * SECTOR_SIZE as u64;
        Ok(Self {
            session,
            pos: 0,
            len,
            scratch: Box::new([0u8; SECTOR_SIZE]),
        })
    }

    /// Stream length in bytes
    pub fn len(&self) -> u64 {
        self.len
    }

    /// Whether the volume has no sectors
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Current position in bytes
    pub fn position(&self) -> u64 {
        self.pos
    }

    fn split_pos(&self) -> (u32, usize) {
        let sector = (self.pos / SECTOR_SIZE as u64) as u32;
        let offset = (self.pos % SECTOR_SIZE as u64) as usize;
        (sector, offset)
    }

    fn chunk_len(&self, offset: usize, wanted: usize) -> usize {
        let left = (self.len - self.pos).min(usize::MAX as u64) as usize;
        wanted.min(SECTOR_SIZE - offset).min(left)
    }
}

impl<S: Read + Write + Seek> Read for SectorStream<'_, S> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() || self.pos >= self.len {
            return Ok(0);
        }
        let (sector, offset) = self.split_pos();
        let n = self.chunk_len(offset, buf.len());

        self.session.read(DRIVE, &mut self.scratch[..], sector, 1)?;
        buf[..n].copy_from_slice(&self.scratch[offset..offset + n]);
        self.pos += n as u64;
        Ok(n)
    }
}

impl<S: Read + Write + Seek> Write for SectorStream<'_, S> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if buf.is_empty() || self.pos >= self.len {
            return Ok(0);
        }
        let (sector, offset) = self.split_pos();

        // Whole sectors go straight through
        if offset == 0 && buf.len() >= SECTOR_SIZE {
            let left = ((self.len - self.pos) / SECTOR_SIZE as u64).min(u32::MAX as u64) as u32;
            let count = ((buf.len() / SECTOR_SIZE) as u64).min(u64::from(left)) as u32;
            if count > 0 {
                let n = count as usize * SECTOR_SIZE;
                self.session.write(DRIVE, &buf[..n], sector, count)?;
                self.pos += n as u64;
                return Ok(n);
            }
        }

        let n = self.chunk_len(offset, buf.len());
        self.session.read(DRIVE, &mut self.scratch[..], sector, 1)?;
        self.scratch[offset..offset + n].copy_from_slice(&buf[..n]);
        self.session.write(DRIVE, &self.scratch[..], sector, 1)?;
        self.pos += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.session.control(DRIVE, ControlCommand::Sync)?;
        Ok(())
    }
}

impl<S: Read + Write + Seek> Seek for SectorStream<'_, S> {
    fn seek(&mut self, from: SeekFrom) -> io::Result<u64> {
        let target = match from {
            SeekFrom::Start(n) => Some(n),
            SeekFrom::End(d) => self.len.checked_add_signed(d),
            SeekFrom::Current(d) => self.pos.checked_add_signed(d),
        };
        match target {
            Some(pos) => {
                self.pos = pos;
                Ok(pos)
            }
            None => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "seek before start of volume",
            )),
        }
    }
}
