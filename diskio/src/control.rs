//! Device status and control queries
//!
//! The FAT driver asks the device whether it is ready, how large it is and
//! to flush its writes. Commands that make sense only for real hardware
//! (power, eject, card registers) are recognized but refused.

use std::io::{Read, Seek, SeekFrom, Write};

use crate::error::{DiskError, Result};
use crate::image::VolumeInfo;
use crate::sector::{header_len, sectors_in};
use crate::session::{read_full, DiskIo, DiskSession};
use crate::types::{DiskStatus, DRIVE, SECTOR_SIZE};

/// Control commands of the block device contract
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ControlCommand {
    /// Flush pending writes
    Sync = 0,
    /// Number of addressable sectors
    GetSectorCount = 1,
    /// Sector size in bytes
    GetSectorSize = 2,
    /// Erase block size
    GetBlockSize = 3,
    /// Erase a range of sectors
    EraseSector = 4,
    /// Get/set power state
    Power = 5,
    /// Lock/unlock media removal
    Lock = 6,
    /// Eject media
    Eject = 7,
    /// Low level format
    Format = 8,
    /// MMC/SD card type
    MmcGetType = 10,
    /// MMC/SD CSD register
    MmcGetCsd = 11,
    /// MMC/SD CID register
    MmcGetCid = 12,
    /// MMC/SD OCR register
    MmcGetOcr = 13,
    /// MMC/SD status
    MmcGetSdStat = 14,
    /// ATA firmware revision
    AtaGetRev = 20,
    /// ATA model name
    AtaGetModel = 21,
    /// ATA serial number
    AtaGetSn = 22,
}

impl ControlCommand {
    /// Raw command code
    pub const fn code(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for ControlCommand {
    type Error = DiskError;

    fn try_from(code: u8) -> Result<Self> {
        Ok(match code {
            0 => Self::Sync,
            1 => Self::GetSectorCount,
            2 => Self::GetSectorSize,
            3 => Self::GetBlockSize,
            4 => Self::EraseSector,
            5 => Self::Power,
            6 => Self::Lock,
            7 => Self::Eject,
            8 => Self::Format,
            10 => Self::MmcGetType,
            11 => Self::MmcGetCsd,
            12 => Self::MmcGetCid,
            13 => Self::MmcGetOcr,
            14 => Self::MmcGetSdStat,
            20 => Self::AtaGetRev,
            21 => Self::AtaGetModel,
            22 => Self::AtaGetSn,
            _ => return Err(DiskError::UnsupportedCommand(code)),
        })
    }
}

/// Answer to a control command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlReply {
    /// Command carried out, nothing to report
    Done,
    /// Addressable sectors
    SectorCount(u32),
    /// Bytes per sector
    SectorSize(u16),
    /// Erase block size
    BlockSize(u32),
}

impl<S: Read + Write + Seek> DiskSession<S> {
    /// Length of the backing store in bytes
    fn storage_len(&mut self) -> Result<u64> {
        self.storage
            .seek(SeekFrom::End(0))
            .map_err(|source| DiskError::Seek { offset: 0, source })
    }

    /// Sectors the FAT driver may address
    ///
    /// A configured count wins; otherwise it is whatever fits in the
    /// backing store after the header.
    pub fn sector_count(&mut self) -> Result<u32> {
        if let Some(count) = self.config.sector_count {
            return Ok(count);
        }
        let len = self.storage_len()?;
        Ok(sectors_in(len, self.hints).min(u32::MAX as u64) as u32)
    }

    fn probe(&mut self) -> Result<()> {
        let len = self.storage_len()?;
        if len < header_len(self.hints) + SECTOR_SIZE as u64 {
            return Err(DiskError::ImageTooSmall { len });
        }
        if self.image_type.is_dim() {
            let mut media = [0u8; 1];
            self.storage
                .seek(SeekFrom::Start(0))
                .map_err(|source| DiskError::Seek { offset: 0, source })?;
            if read_full(&mut self.storage, &mut media)? == 1 {
                self.image_type = self.image_type.refine_dim(media[0]);
            }
        }
        Ok(())
    }

    fn load_volume_info(&mut self) -> VolumeInfo {
        let mut sector = [0u8; SECTOR_SIZE];
        match self.read(DRIVE, &mut sector, 0, 1) {
            Ok(()) => VolumeInfo::from_boot_sector(&sector),
            Err(e) => {
                log::warn!("{}: cannot read boot sector: {}", self.display_name(), e);
                VolumeInfo::default()
            }
        }
    }

    /// Verify the backing store and mark the drive ready
    pub(crate) fn bring_up(&mut self) -> DiskStatus {
        if let Err(e) = self.probe() {
            log::error!("{}: {}", self.display_name(), e);
            self.status = DiskStatus::NOINIT | DiskStatus::NODISK;
            return self.status;
        }

        self.status = if self.config.read_only {
            DiskStatus::PROTECT
        } else {
            DiskStatus::empty()
        };
        self.info = self.load_volume_info();
        log::info!(
            "{}: ready, {} image, label {:?}, serial {:X?}",
            self.display_name(),
            self.image_type.name(),
            self.info.label,
            self.info.serial
        );
        self.status
    }

    pub(crate) fn dispatch_control(&mut self, command: ControlCommand) -> Result<ControlReply> {
        match command {
            ControlCommand::Sync => {
                self.storage.flush()?;
                Ok(ControlReply::Done)
            }
            ControlCommand::GetSectorCount => Ok(ControlReply::SectorCount(self.sector_count()?)),
            ControlCommand::GetSectorSize => Ok(ControlReply::SectorSize(SECTOR_SIZE as u16)),
            ControlCommand::GetBlockSize => Ok(ControlReply::BlockSize(self.config.erase_block_size)),
            other => {
                log::warn!("unsupported control command {:?}", other);
                Err(DiskError::UnsupportedCommand(other.code()))
            }
        }
    }
}
