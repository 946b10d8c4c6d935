//! `gpt_disk_io::BlockIo` over a disk session
//!
//! Lets code written against the `BlockIo` trait (partition scanners,
//! filesystem probes) read the image the same way the FAT driver does,
//! substitute boot sector and header skipping included.

use std::io::{Read, Seek, Write};

use gpt_disk_io::BlockIo;
use gpt_disk_types::{BlockSize, Lba};

use crate::control::ControlCommand;
use crate::error::{DiskError, Result};
use crate::session::{DiskIo, DiskSession};
use crate::types::{DRIVE, SECTOR_SIZE};

const SECTOR_BLOCK_SIZE: BlockSize = match BlockSize::new(SECTOR_SIZE as u32) {
    Some(bs) => bs,
    None => panic!("sector size is not a valid block size"),
};

/// Split a block buffer into (first sector, sector count)
fn block_range(start_lba: Lba, len: usize) -> Result<(u32, u32)> {
    if len % SECTOR_SIZE != 0 {
        return Err(DiskError::InvalidParameter("buffer is not a whole number of blocks"));
    }
    let sector = u32::try_from(start_lba.to_u64())
        .map_err(|_| DiskError::InvalidParameter("LBA beyond 32-bit sector range"))?;
    let count = u32::try_from(len / SECTOR_SIZE)
        .map_err(|_| DiskError::InvalidParameter("too many blocks in one request"))?;
    Ok((sector, count))
}

impl<S: Read + Write + Seek> BlockIo for DiskSession<S> {
    type Error = DiskError;

    fn block_size(&self) -> BlockSize {
        SECTOR_BLOCK_SIZE
    }

    fn num_blocks(&mut self) -> Result<u64> {
        self.sector_count().map(u64::from)
    }

    fn read_blocks(&mut self, start_lba: Lba, dst: &mut [u8]) -> Result<()> {
        let (sector, count) = block_range(start_lba, dst.len())?;
        if count == 0 {
            return Ok(());
        }
        self.read(DRIVE, dst, sector, count)
    }

    fn write_blocks(&mut self, start_lba: Lba, src: &[u8]) -> Result<()> {
        let (sector, count) = block_range(start_lba, src.len())?;
        if count == 0 {
            return Ok(());
        }
        self.write(DRIVE, src, sector, count)
    }

    fn flush(&mut self) -> Result<()> {
        self.control(DRIVE, ControlCommand::Sync).map(|_| ())
    }
}
