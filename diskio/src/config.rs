//! Session configuration
//!
//! Options fixed at mount time. Everything has a default that suits a
//! writable floppy image.

use crate::image::ImageType;
use crate::types::Hints;

/// Erase block size reported to the FAT driver by default
pub const DEFAULT_ERASE_BLOCK_SIZE: u32 = 1024;

/// Mount-time options of a [`crate::DiskSession`]
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Hints to use; `None` takes the image type's defaults
    pub hints: Option<Hints>,
    /// Open the image read-only and refuse writes
    pub read_only: bool,
    /// Capacity reported to the FAT driver; `None` derives it from the image size
    pub sector_count: Option<u32>,
    /// Erase block size reported by `GetBlockSize`
    pub erase_block_size: u32,
    /// Log every byte a write changes
    pub audit_writes: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            hints: None,
            read_only: false,
            sector_count: None,
            erase_block_size: DEFAULT_ERASE_BLOCK_SIZE,
            audit_writes: cfg!(feature = "write-audit"),
        }
    }
}

impl SessionConfig {
    /// Config with the hints of a known image type
    pub fn for_image(image_type: ImageType) -> Self {
        Self {
            hints: Some(image_type.default_hints()),
            ..Default::default()
        }
    }

    /// Set hints explicitly.
    pub fn hints(mut self, hints: Hints) -> Self {
        self.hints = Some(hints);
        self
    }

    /// Open read-only.
    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    /// Report a fixed capacity.
    pub fn sector_count(mut self, sectors: u32) -> Self {
        self.sector_count = Some(sectors);
        self
    }

    /// Set erase block size.
    pub fn erase_block_size(mut self, size: u32) -> Self {
        self.erase_block_size = size;
        self
    }

    /// Toggle the write diff diagnostic.
    pub fn audit_writes(mut self, enabled: bool) -> Self {
        self.audit_writes = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = SessionConfig::default();
        assert_eq!(config.hints, None);
        assert!(!config.read_only);
        assert_eq!(config.sector_count, None);
        assert_eq!(config.erase_block_size, 1024);
        assert_eq!(config.audit_writes, cfg!(feature = "write-audit"));
    }

    #[test]
    fn test_config_for_image() {
        let config = SessionConfig::for_image(ImageType::Dim2hd);
        assert_eq!(
            config.hints,
            Some(Hints::HAS_DIFC_HEADER | Hints::REPLACE_SECTOR0)
        );
    }

    #[test]
    fn test_config_builder() {
        let config = SessionConfig::default()
            .hints(Hints::USE_LFN)
            .read_only(true)
            .sector_count(0xC800)
            .erase_block_size(8)
            .audit_writes(true);
        assert_eq!(config.hints, Some(Hints::USE_LFN));
        assert!(config.read_only);
        assert_eq!(config.sector_count, Some(0xC800));
        assert_eq!(config.erase_block_size, 8);
        assert!(config.audit_writes);
    }
}
