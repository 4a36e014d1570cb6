//! `muon-elf` --- symbol table extraction from ELF32/ARM binaries.
//!
//! This crate reads a 32-bit, little-endian, ARM ELF image from a
//! seekable stream and returns its symbol table as a sequence of owned
//! [`Symbol`] records (name, value, size, type, binding). It is aimed at
//! tools that inspect compiled binaries without carrying a full
//! linker/loader: debuggers, disassemblers, static analyzers.
//!
//! All offsets and lengths come from the file itself and are treated as
//! untrusted: every read is bounds-checked, every field is decoded at an
//! explicit byte offset, and malformed input fails deterministically
//! with a specific [`FormatError`] kind. Relocations, dynamic linking,
//! ELF64, and non-ARM machines are out of scope; big-endian images are
//! rejected, not adapted.
//!
//! # Usage
//!
//! ```ignore
//! let mut file = File::open("firmware.elf")?;
//! for sym in muon_elf::get_symbols(&mut file)? {
//!     println!("{:#010x} {} {}", sym.value, sym.kind, sym.name);
//! }
//! ```
//!
//! A parse call is one linear chain of blocking reads and seeks over the
//! caller's stream; there is no shared state between calls, and the
//! stream handle stays owned (and open) by the caller throughout.

pub mod header;
pub mod section;
pub mod symtab;

pub use header::ElfHeader;
pub use section::SectionHeader;
pub use symtab::{Symbol, SymbolBind, SymbolKind, extract_symbols};

use std::collections::TryReserveError;
use std::fmt;
use std::io::{Read, Seek};

/// A structural violation of the expected ELF32/ARM encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatError {
    /// The identification magic is not `\x7FELF`.
    InvalidMagic,
    /// The file class is not the 32-bit marker.
    Not32Bit,
    /// The data encoding is not little-endian.
    NotLittleEndian,
    /// A version field differs from the current ELF version.
    UnsupportedVersion,
    /// The OS/ABI marker is not "none" / System V.
    UnsupportedAbi,
    /// The machine code is not ARM.
    UnsupportedArchitecture,
    /// The section header table offset is zero (no section headers).
    MissingSectionHeaders,
    /// A symbol table's linked string table has size zero.
    EmptyStringTable,
    /// A symbol table declares an entry size of zero.
    ZeroEntrySize,
    /// A symbol's name index lies outside its string table.
    NameOutOfRange,
    /// A symbol table's link is not a valid section index.
    BadSectionLink,
    /// A symbol record extends past the end of its section.
    TruncatedSymbol,
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidMagic => write!(f, "invalid ELF magic"),
            Self::Not32Bit => write!(f, "not a 32-bit ELF"),
            Self::NotLittleEndian => write!(f, "not a little-endian ELF"),
            Self::UnsupportedVersion => write!(f, "unsupported ELF version"),
            Self::UnsupportedAbi => write!(f, "unsupported ABI"),
            Self::UnsupportedArchitecture => write!(f, "unsupported architecture"),
            Self::MissingSectionHeaders => write!(f, "no section header table"),
            Self::EmptyStringTable => write!(f, "empty string table"),
            Self::ZeroEntrySize => write!(f, "symbol table entry size is zero"),
            Self::NameOutOfRange => write!(f, "symbol name offset outside string table"),
            Self::BadSectionLink => write!(f, "symbol table links to an invalid section"),
            Self::TruncatedSymbol => write!(f, "symbol record extends past its section"),
        }
    }
}

impl std::error::Error for FormatError {}

/// Any failure surfaced by [`get_symbols`].
///
/// One value per call; nothing is retried internally and no partial
/// result is ever returned alongside a failure. Presentation (exit
/// codes, log messages) is the caller's concern.
#[derive(Debug)]
pub enum ElfError {
    /// An underlying read or seek failed; carries the OS-level cause.
    Io(std::io::Error),
    /// The input violates the expected ELF32/ARM encoding.
    Format(FormatError),
    /// A section buffer allocation could not be satisfied.
    OutOfMemory,
}

impl fmt::Display for ElfError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "I/O error: {err}"),
            Self::Format(err) => err.fmt(f),
            Self::OutOfMemory => write!(f, "out of memory sizing a section buffer"),
        }
    }
}

impl std::error::Error for ElfError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Format(err) => Some(err),
            Self::OutOfMemory => None,
        }
    }
}

impl From<std::io::Error> for ElfError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<FormatError> for ElfError {
    fn from(err: FormatError) -> Self {
        Self::Format(err)
    }
}

/// Maps a failed `try_reserve` into [`ElfError::OutOfMemory`].
pub(crate) fn alloc_err(_: TryReserveError) -> ElfError {
    ElfError::OutOfMemory
}

/// Extracts every symbol from an ELF32/ARM image.
///
/// `stream` must be positioned at byte 0 of the image; section reads
/// seek to absolute offsets from that origin. The stream stays owned by
/// the caller and is not closed. Parsing the same bytes twice yields an
/// identical sequence.
///
/// Pipeline: validate the e-header ([`ElfHeader::parse`]), load the
/// section header table ([`section::load_section_headers`]), then decode
/// every symbol table ([`extract_symbols`]).
///
/// # Errors
///
/// The first failure anywhere in the pipeline, as an [`ElfError`].
pub fn get_symbols<R: Read + Seek>(stream: &mut R) -> Result<Vec<Symbol>, ElfError> {
    let elf_header = ElfHeader::parse(stream)?;
    let sections = section::load_section_headers(stream, &elf_header)?;
    extract_symbols(stream, &sections)
}
