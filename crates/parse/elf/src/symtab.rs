//! Symbol table extraction and symbol record decoding.
//!
//! Walks the loaded section headers, and for every `SHT_SYMTAB` section
//! loads its companion string table plus its raw record bytes, then
//! decodes each 16-byte ELF32 symbol record field by field. No struct
//! reinterpretation: every field is read at a computed byte offset, so
//! decoding is independent of host alignment and layout rules.

use std::fmt;
use std::io::{Read, Seek, SeekFrom};

use crate::header::le_u32;
use crate::section::{SHT_SYMTAB, SectionHeader};
use crate::{ElfError, FormatError, alloc_err};

/// Size in bytes of one ELF32 symbol record.
const SYM_ENTRY_SIZE: usize = 16;

/// Symbol type code, the low 4 bits of a record's info byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    /// No type (`STT_NOTYPE`).
    None,
    /// Data object (`STT_OBJECT`).
    Object,
    /// Function or other executable code (`STT_FUNC`).
    Func,
    /// The symbol names a section (`STT_SECTION`).
    Section,
    /// Source file name (`STT_FILE`).
    File,
    /// Common block (`STT_COMMON`).
    Common,
    /// Thread-local storage (`STT_TLS`).
    Tls,
    /// Any other code; the raw 4-bit value is preserved.
    Other(u8),
}

impl SymbolKind {
    /// Decodes a 4-bit type code.
    #[must_use]
    pub fn from_code(code: u8) -> Self {
        match code {
            0 => Self::None,
            1 => Self::Object,
            2 => Self::Func,
            3 => Self::Section,
            4 => Self::File,
            5 => Self::Common,
            6 => Self::Tls,
            other => Self::Other(other),
        }
    }

    /// Returns the raw 4-bit type code.
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            Self::None => 0,
            Self::Object => 1,
            Self::Func => 2,
            Self::Section => 3,
            Self::File => 4,
            Self::Common => 5,
            Self::Tls => 6,
            Self::Other(code) => code,
        }
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "NOTYPE"),
            Self::Object => write!(f, "OBJECT"),
            Self::Func => write!(f, "FUNC"),
            Self::Section => write!(f, "SECTION"),
            Self::File => write!(f, "FILE"),
            Self::Common => write!(f, "COMMON"),
            Self::Tls => write!(f, "TLS"),
            Self::Other(code) => write!(f, "TYPE({code})"),
        }
    }
}

/// Symbol binding code, the high 4 bits of a record's info byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolBind {
    /// Not visible outside the defining object (`STB_LOCAL`).
    Local,
    /// Visible to all objects being combined (`STB_GLOBAL`).
    Global,
    /// Global with lower precedence (`STB_WEAK`).
    Weak,
    /// Any other code; the raw 4-bit value is preserved.
    Other(u8),
}

impl SymbolBind {
    /// Decodes a 4-bit binding code.
    #[must_use]
    pub fn from_code(code: u8) -> Self {
        match code {
            0 => Self::Local,
            1 => Self::Global,
            2 => Self::Weak,
            other => Self::Other(other),
        }
    }

    /// Returns the raw 4-bit binding code.
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            Self::Local => 0,
            Self::Global => 1,
            Self::Weak => 2,
            Self::Other(code) => code,
        }
    }
}

impl fmt::Display for SymbolBind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => write!(f, "LOCAL"),
            Self::Global => write!(f, "GLOBAL"),
            Self::Weak => write!(f, "WEAK"),
            Self::Other(code) => write!(f, "BIND({code})"),
        }
    }
}

/// One decoded symbol table entry.
///
/// Owned by the sequence returned from [`crate::get_symbols`]; its
/// lifetime is independent of the parse call and the input stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    /// Symbol name, resolved from the companion string table.
    pub name: String,
    /// Symbol value, typically an address.
    pub value: u32,
    /// Symbol size in bytes; 0 means unknown.
    pub size: u32,
    /// Symbol type from the info byte's low nibble.
    pub kind: SymbolKind,
    /// Symbol binding from the info byte's high nibble.
    pub bind: SymbolBind,
}

/// Decodes every symbol record from every symbol table section.
///
/// Sections are scanned in ascending index order and every `SHT_SYMTAB`
/// section is processed; when an image carries several symbol tables
/// their symbols are concatenated in section-index order. The buffers
/// for each symbol-table/string-table pair are dropped as soon as that
/// section's decoding completes or fails.
///
/// # Errors
///
/// [`ElfError::Io`] on seek failure or short read,
/// [`ElfError::OutOfMemory`] if a section buffer cannot be allocated,
/// and [`ElfError::Format`] for structural violations (bad section link,
/// empty string table, zero entry size, truncated record, name offset
/// outside the string table). Any failure aborts the whole call; no
/// partial symbol list is returned.
pub fn extract_symbols<R: Read + Seek>(
    stream: &mut R,
    sections: &[SectionHeader],
) -> Result<Vec<Symbol>, ElfError> {
    let mut symbols = Vec::new();

    for shdr in sections.iter().filter(|s| s.kind == SHT_SYMTAB) {
        let strtab_hdr = sections
            .get(shdr.link as usize)
            .ok_or(ElfError::Format(FormatError::BadSectionLink))?;
        if strtab_hdr.size == 0 {
            return Err(FormatError::EmptyStringTable.into());
        }

        let mut strtab = read_section(stream, strtab_hdr)?;
        // Force a terminator so every name lookup stops inside the
        // buffer. A name that legitimately ends at the last byte is
        // truncated by one character; never read past the end instead.
        let last = strtab.len() - 1;
        strtab[last] = 0;

        if shdr.entry_size == 0 {
            return Err(FormatError::ZeroEntrySize.into());
        }
        let count = (shdr.size / shdr.entry_size) as usize;
        let records = read_section(stream, shdr)?;
        let stride = shdr.entry_size as usize;

        for index in 0..count {
            let offset = index * stride;
            let record = records
                .get(offset..offset + SYM_ENTRY_SIZE)
                .ok_or(ElfError::Format(FormatError::TruncatedSymbol))?;

            let name_index = le_u32(record, 0) as usize;
            let info = record[12];

            symbols.push(Symbol {
                name: read_name(&strtab, name_index)?,
                value: le_u32(record, 4),
                size: le_u32(record, 8),
                kind: SymbolKind::from_code(info & 0x0f),
                bind: SymbolBind::from_code(info >> 4),
            });
        }
    }

    Ok(symbols)
}

/// Reads a section's full byte range into a freshly allocated buffer.
fn read_section<R: Read + Seek>(
    stream: &mut R,
    shdr: &SectionHeader,
) -> Result<Vec<u8>, ElfError> {
    let len = shdr.size as usize;
    let mut buf = Vec::new();
    buf.try_reserve_exact(len).map_err(alloc_err)?;
    buf.resize(len, 0);

    stream.seek(SeekFrom::Start(u64::from(shdr.offset)))?;
    stream.read_exact(&mut buf)?;
    Ok(buf)
}

/// Resolves a name index to the NUL-terminated string starting there.
///
/// The caller guarantees the table's final byte is NUL, so the scan
/// always terminates inside the buffer. Invalid UTF-8 decodes lossily.
fn read_name(strtab: &[u8], index: usize) -> Result<String, ElfError> {
    if index >= strtab.len() {
        return Err(FormatError::NameOutOfRange.into());
    }
    let tail = &strtab[index..];
    let end = tail.iter().position(|&b| b == 0).unwrap_or(tail.len());
    Ok(String::from_utf8_lossy(&tail[..end]).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn info_byte_nibble_split() {
        // STB_GLOBAL (1) << 4 | STT_FUNC (2)
        let info = 0x12u8;
        assert_eq!(SymbolKind::from_code(info & 0x0f), SymbolKind::Func);
        assert_eq!(SymbolBind::from_code(info >> 4), SymbolBind::Global);
    }

    #[test]
    fn unknown_codes_round_trip() {
        assert_eq!(SymbolKind::from_code(0xd), SymbolKind::Other(0xd));
        assert_eq!(SymbolKind::Other(0xd).code(), 0xd);
        assert_eq!(SymbolBind::from_code(0xa), SymbolBind::Other(0xa));
        assert_eq!(SymbolBind::Other(0xa).code(), 0xa);
    }

    #[test]
    fn display_codes() {
        assert_eq!(SymbolKind::Func.to_string(), "FUNC");
        assert_eq!(SymbolKind::Other(13).to_string(), "TYPE(13)");
        assert_eq!(SymbolBind::Weak.to_string(), "WEAK");
        assert_eq!(SymbolBind::Other(10).to_string(), "BIND(10)");
    }

    #[test]
    fn name_lookup_stops_at_nul() {
        let strtab = b"\0main\0helper\0";
        assert_eq!(read_name(strtab, 1).unwrap(), "main");
        assert_eq!(read_name(strtab, 6).unwrap(), "helper");
        assert_eq!(read_name(strtab, 0).unwrap(), "");
    }

    #[test]
    fn name_lookup_out_of_range() {
        let strtab = b"\0main\0";
        assert!(matches!(
            read_name(strtab, strtab.len()),
            Err(ElfError::Format(FormatError::NameOutOfRange))
        ));
    }
}
