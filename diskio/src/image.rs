//! Image format detection and volume information

use std::path::Path;

use crate::boot_sector::{EXT_BOOT_SIGNATURE, OFF_EXT_SIGNATURE, OFF_VOLUME_LABEL, OFF_VOLUME_SERIAL};
use crate::types::Hints;

/// Disk image formats Human68k media are distributed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageType {
    /// DIFC image of a 2HC (1.2MB PC/AT) floppy
    Dim2hc,
    /// DIFC image of a 2HD floppy
    Dim2hd,
    /// DIFC image of a 2HDA floppy
    Dim2hda,
    /// DIFC image of a 2HDE floppy
    Dim2hde,
    /// DIFC image of a 2HQ (1.44MB) floppy
    Dim2hq,
    /// DIFC image of a 2HS floppy
    Dim2hs,
    /// SASI hard disk image
    Hdf,
    /// SCSI hard disk image
    Hds,
    /// Raw 2HD floppy dump
    Xdf2hd,
    /// Not recognized
    Unknown,
}

impl ImageType {
    /// Guess the format from the file extension
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("dim") => Self::Dim2hd,
            Some("xdf") | Some("2hd") => Self::Xdf2hd,
            Some("hdf") => Self::Hdf,
            Some("hds") => Self::Hds,
            _ => Self::Unknown,
        }
    }

    /// Refine a DIM type from the media byte of its DIFC header
    pub fn refine_dim(self, media: u8) -> Self {
        if !self.is_dim() {
            return self;
        }
        match media {
            0x01 => Self::Dim2hs,
            0x02 => Self::Dim2hc,
            0x03 => Self::Dim2hde,
            0x09 => Self::Dim2hq,
            _ => Self::Dim2hd,
        }
    }

    /// Whether the image carries a DIFC header
    pub fn is_dim(self) -> bool {
        matches!(
            self,
            Self::Dim2hc | Self::Dim2hd | Self::Dim2hda | Self::Dim2hde | Self::Dim2hq | Self::Dim2hs
        )
    }

    /// Whether the image holds a floppy with an X68000 boot sector
    pub fn is_floppy(self) -> bool {
        self.is_dim() || self == Self::Xdf2hd
    }

    /// Hints a session uses for this format unless told otherwise
    pub fn default_hints(self) -> Hints {
        let mut hints = Hints::empty();
        if self.is_dim() {
            hints |= Hints::HAS_DIFC_HEADER;
        }
        if self.is_floppy() {
            hints |= Hints::REPLACE_SECTOR0;
        }
        hints
    }

    /// Short display name
    pub fn name(self) -> &'static str {
        match self {
            Self::Dim2hc => "DIM (2HC)",
            Self::Dim2hd => "DIM (2HD)",
            Self::Dim2hda => "DIM (2HDA)",
            Self::Dim2hde => "DIM (2HDE)",
            Self::Dim2hq => "DIM (2HQ)",
            Self::Dim2hs => "DIM (2HS)",
            Self::Hdf => "HDF",
            Self::Hds => "HDS",
            Self::Xdf2hd => "XDF (2HD)",
            Self::Unknown => "unknown",
        }
    }
}

/// Label and serial number of the mounted volume
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VolumeInfo {
    /// Volume label, trailing padding removed
    pub label: Option<String>,
    /// Volume serial number
    pub serial: Option<u32>,
}

impl VolumeInfo {
    /// Read label and serial from the extended BPB of a boot sector
    pub fn from_boot_sector(sector: &[u8]) -> Self {
        if sector.len() < OFF_VOLUME_LABEL + 11 || sector[OFF_EXT_SIGNATURE] != EXT_BOOT_SIGNATURE {
            return Self::default();
        }
        let serial = u32::from_le_bytes([
            sector[OFF_VOLUME_SERIAL],
            sector[OFF_VOLUME_SERIAL + 1],
            sector[OFF_VOLUME_SERIAL + 2],
            sector[OFF_VOLUME_SERIAL + 3],
        ]);
        let raw = &sector[OFF_VOLUME_LABEL..OFF_VOLUME_LABEL + 11];
        let label = String::from_utf8_lossy(raw)
            .trim_end_matches(&[' ', '\0'][..])
            .to_string();
        Self {
            label: (!label.is_empty()).then_some(label),
            serial: Some(serial),
        }
    }
}
