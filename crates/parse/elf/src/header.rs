//! ELF file header parsing and validation.
//!
//! Reads the fixed 52-byte ELF32 e-header from the start of an image and
//! validates it against the one encoding this crate accepts: 32-bit,
//! little-endian, version 1, System V ABI, ARM machine code, with a
//! section header table present.

use std::io::Read;

use crate::{ElfError, FormatError};

/// ELF identification magic: `0x7F` followed by `"ELF"`.
pub const MAGIC: [u8; 4] = *b"\x7FELF";

/// Byte index of the file class within `e_ident`.
pub const EI_CLASS: usize = 4;
/// Byte index of the data encoding within `e_ident`.
pub const EI_DATA: usize = 5;
/// Byte index of the identification version within `e_ident`.
pub const EI_VERSION: usize = 6;
/// Byte index of the OS/ABI marker within `e_ident`.
pub const EI_OSABI: usize = 7;

/// File class marker for a 32-bit object.
pub const ELFCLASS32: u8 = 1;
/// Data encoding marker for two's-complement little-endian.
pub const ELFDATA2LSB: u8 = 1;
/// The current (and only) ELF version.
pub const EV_CURRENT: u8 = 1;
/// OS/ABI marker for "none" / System V.
pub const ELFOSABI_NONE: u8 = 0;
/// Machine code for ARM.
pub const EM_ARM: u16 = 0x28;

/// Size in bytes of the ELF32 e-header.
pub const EHDR_SIZE: usize = 52;

/// Decodes a little-endian `u16` at `offset` within `data`.
pub(crate) fn le_u16(data: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([data[offset], data[offset + 1]])
}

/// Decodes a little-endian `u32` at `offset` within `data`.
pub(crate) fn le_u32(data: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        data[offset],
        data[offset + 1],
        data[offset + 2],
        data[offset + 3],
    ])
}

/// A validated ELF32 file header.
///
/// Only the fields the rest of the pipeline consumes are retained; the
/// identification bytes are checked during [`ElfHeader::parse`] and kept
/// here for inspection. The header is transient: it lives for one parse
/// call and is not part of the returned symbol data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElfHeader {
    /// File class from `e_ident` (always [`ELFCLASS32`] after validation).
    pub class: u8,
    /// Data encoding from `e_ident` (always [`ELFDATA2LSB`] after validation).
    pub data: u8,
    /// Identification version from `e_ident` (always [`EV_CURRENT`]).
    pub version: u8,
    /// OS/ABI marker from `e_ident` (always [`ELFOSABI_NONE`]).
    pub osabi: u8,
    /// Machine architecture code (always [`EM_ARM`] after validation).
    pub machine: u16,
    /// Byte offset of the section header table.
    pub shoff: u32,
    /// Number of entries in the section header table.
    pub shnum: u16,
}

impl ElfHeader {
    /// Reads and validates the e-header from the current stream position,
    /// which must be byte 0 of the ELF image.
    ///
    /// Consumes exactly [`EHDR_SIZE`] bytes. Checks run in a fixed order
    /// and the first violation determines the reported
    /// [`FormatError`] kind: magic, class, data encoding, version (both
    /// the identification byte and `e_version`), OS/ABI, machine, and
    /// finally presence of a section header table.
    ///
    /// # Errors
    ///
    /// [`ElfError::Io`] if the read fails or the stream is shorter than
    /// the header; a specific [`ElfError::Format`] kind for the first
    /// failed check.
    pub fn parse<R: Read>(stream: &mut R) -> Result<Self, ElfError> {
        let mut raw = [0u8; EHDR_SIZE];
        stream.read_exact(&mut raw)?;

        if raw[..4] != MAGIC {
            return Err(FormatError::InvalidMagic.into());
        }
        if raw[EI_CLASS] != ELFCLASS32 {
            return Err(FormatError::Not32Bit.into());
        }
        if raw[EI_DATA] != ELFDATA2LSB {
            return Err(FormatError::NotLittleEndian.into());
        }
        if raw[EI_VERSION] != EV_CURRENT || le_u32(&raw, 20) != u32::from(EV_CURRENT) {
            return Err(FormatError::UnsupportedVersion.into());
        }
        if raw[EI_OSABI] != ELFOSABI_NONE {
            return Err(FormatError::UnsupportedAbi.into());
        }
        let machine = le_u16(&raw, 18);
        if machine != EM_ARM {
            return Err(FormatError::UnsupportedArchitecture.into());
        }
        let shoff = le_u32(&raw, 32);
        if shoff == 0 {
            return Err(FormatError::MissingSectionHeaders.into());
        }

        Ok(Self {
            class: raw[EI_CLASS],
            data: raw[EI_DATA],
            version: raw[EI_VERSION],
            osabi: raw[EI_OSABI],
            machine,
            shoff,
            shnum: le_u16(&raw, 48),
        })
    }
}
