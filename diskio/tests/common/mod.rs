//! Common test utilities: in-memory images and an instrumented backing store

#![allow(dead_code)]

use diskio::{DiskIo, DiskSession, Hints, ImageType, SessionConfig, DIFC_HEADER_SIZE, SECTOR_SIZE};
use std::io::{self, Cursor, Read, Seek, SeekFrom, Write};

/// Sectors on a 2HD floppy
pub const FLOPPY_SECTORS: usize = 1232;

/// Byte every position of `sector` is filled with in patterned images
pub fn sector_byte(sector: usize) -> u8 {
    (sector % 200) as u8 + 1
}

/// Image whose sector N is filled with `sector_byte(N)`, optionally behind a DIFC header
pub fn patterned_image(sectors: usize, with_header: bool) -> Vec<u8> {
    let header = if with_header { DIFC_HEADER_SIZE as usize } else { 0 };
    let mut data = vec![0xEEu8; header];
    if with_header {
        // Media byte: 2HD
        data[0] = 0x00;
    }
    for sector in 0..sectors {
        data.extend(std::iter::repeat(sector_byte(sector)).take(SECTOR_SIZE));
    }
    data
}

/// Blank floppy image whose real boot sector holds X68000 code (BRA.W)
pub fn blank_floppy(with_header: bool) -> Vec<u8> {
    let header = if with_header { DIFC_HEADER_SIZE as usize } else { 0 };
    let mut data = vec![0u8; header + FLOPPY_SECTORS * SECTOR_SIZE];
    data[header] = 0x60;
    data[header + 1] = 0x3C;
    for b in &mut data[header + 2..header + SECTOR_SIZE] {
        *b = 0x4E;
    }
    data
}

/// Backing store that records what the session does to it
#[derive(Debug, Default)]
pub struct CountingStorage {
    pub inner: Cursor<Vec<u8>>,
    pub reads: usize,
    pub writes: usize,
    pub flushes: usize,
    /// Byte offsets at which writes started
    pub write_offsets: Vec<u64>,
    /// Total bytes written
    pub bytes_written: usize,
    /// Stop accepting bytes after this many have been written
    pub write_limit: Option<usize>,
}

impl CountingStorage {
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            inner: Cursor::new(data),
            ..Default::default()
        }
    }

    pub fn data(&self) -> &[u8] {
        self.inner.get_ref()
    }
}

impl Read for CountingStorage {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reads += 1;
        self.inner.read(buf)
    }
}

impl Write for CountingStorage {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let allowed = match self.write_limit {
            Some(limit) => buf.len().min(limit.saturating_sub(self.bytes_written)),
            None => buf.len(),
        };
        if allowed == 0 {
            return Ok(0);
        }
        self.writes += 1;
        self.write_offsets.push(self.inner.position());
        let n = self.inner.write(&buf[..allowed])?;
        self.bytes_written += n;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.flushes += 1;
        Ok(())
    }
}

impl Seek for CountingStorage {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.inner.seek(pos)
    }
}

/// Initialized session over an in-memory image
pub fn ready_session(data: Vec<u8>, config: SessionConfig) -> DiskSession<CountingStorage> {
    let mut session = DiskSession::with_storage(CountingStorage::new(data), ImageType::Unknown, config);
    let status = session.initialize(0);
    assert!(status.is_ready(), "session should initialize, got {:?}", status);
    session
}

/// Initialized session with explicit hints
pub fn session_with_hints(data: Vec<u8>, hints: Hints) -> DiskSession<CountingStorage> {
    ready_session(data, SessionConfig::default().hints(hints))
}
