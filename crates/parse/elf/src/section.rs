//! Section header table loading.
//!
//! The e-header gives the table's byte offset and entry count; each entry
//! is a fixed 40-byte ELF32 record. Only the fields the symbol extractor
//! consumes are decoded.

use std::io::{Read, Seek, SeekFrom};

use crate::header::{ElfHeader, le_u32};
use crate::{ElfError, alloc_err};

/// Section type code for a symbol table (`SHT_SYMTAB`).
pub const SHT_SYMTAB: u32 = 2;
/// Section type code for a string table (`SHT_STRTAB`).
pub const SHT_STRTAB: u32 = 3;

/// Size in bytes of one ELF32 section header record.
const SHDR_SIZE: usize = 40;

/// One decoded section header.
///
/// Held only as part of the ordered sequence returned by
/// [`load_section_headers`] during a single parse call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionHeader {
    /// Section type code (`sh_type`), e.g. [`SHT_SYMTAB`].
    pub kind: u32,
    /// Byte offset of the section's data in the file.
    pub offset: u32,
    /// Byte size of the section's data.
    pub size: u32,
    /// Index of an associated section; for a symbol table, its companion
    /// string table.
    pub link: u32,
    /// Size of one entry when the section is an array of fixed-size
    /// records.
    pub entry_size: u32,
}

/// Loads the full section header table described by `header`.
///
/// Seeks to `header.shoff` and reads exactly `header.shnum` records
/// sequentially in file order; the returned sequence has exactly that
/// length.
///
/// # Errors
///
/// [`ElfError::Io`] on seek failure or short read;
/// [`ElfError::OutOfMemory`] if the backing allocation for the full count
/// cannot be satisfied (never silently truncated to fewer entries).
pub fn load_section_headers<R: Read + Seek>(
    stream: &mut R,
    header: &ElfHeader,
) -> Result<Vec<SectionHeader>, ElfError> {
    let count = usize::from(header.shnum);
    let mut sections = Vec::new();
    sections.try_reserve_exact(count).map_err(alloc_err)?;

    stream.seek(SeekFrom::Start(u64::from(header.shoff)))?;

    let mut raw = [0u8; SHDR_SIZE];
    for _ in 0..count {
        stream.read_exact(&mut raw)?;
        sections.push(SectionHeader {
            kind: le_u32(&raw, 4),
            offset: le_u32(&raw, 16),
            size: le_u32(&raw, 20),
            link: le_u32(&raw, 24),
            entry_size: le_u32(&raw, 36),
        });
    }

    Ok(sections)
}
