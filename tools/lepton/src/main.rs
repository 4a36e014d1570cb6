//! Lepton --- symbol table inspector for ARM ELF binaries.
//!
//! A thin host-side front end over `muon-elf`: opens a file, extracts
//! the symbol table, and renders it as a table or JSON, or resolves an
//! address to the function containing it.

mod cli;
mod resolver;

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result, bail};
use clap::Parser;
use muon_elf::Symbol;
use serde::Serialize;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    match cli.command {
        cli::Command::Dump(ref args) => cmd_dump(args),
        cli::Command::Resolve(ref args) => cmd_resolve(args),
    }
}

/// Opens `path` and extracts its full symbol table.
fn load_symbols(path: &Path) -> Result<Vec<Symbol>> {
    let mut file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    muon_elf::get_symbols(&mut file).with_context(|| format!("parsing {}", path.display()))
}

/// A symbol row for `--json` output.
#[derive(Serialize)]
struct JsonSymbol {
    name: String,
    value: u32,
    size: u32,
    kind: String,
    bind: String,
}

fn cmd_dump(args: &cli::DumpArgs) -> Result<()> {
    let mut symbols = load_symbols(&args.file)?;

    if args.functions {
        symbols.retain(|s| s.kind == muon_elf::SymbolKind::Func);
    }
    if args.demangle {
        for sym in &mut symbols {
            sym.name = demangle(&sym.name);
        }
    }

    if args.json {
        let rows: Vec<JsonSymbol> = symbols
            .into_iter()
            .map(|s| JsonSymbol {
                name: s.name,
                value: s.value,
                size: s.size,
                kind: s.kind.to_string(),
                bind: s.bind.to_string(),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        println!("{:>10} {:>8} {:<8} {:<7} NAME", "VALUE", "SIZE", "TYPE", "BIND");
        for sym in &symbols {
            println!("{}", table_row(sym));
        }
    }

    Ok(())
}

fn cmd_resolve(args: &cli::ResolveArgs) -> Result<()> {
    let addr = parse_address(&args.address)?;
    let index = resolver::SymbolIndex::new(load_symbols(&args.file)?);

    let Some((name, offset)) = index.resolve(addr) else {
        bail!("no function covers address {addr:#x}");
    };

    let name = if args.demangle {
        demangle(name)
    } else {
        name.to_string()
    };
    if offset == 0 {
        println!("{name}");
    } else {
        println!("{name}+{offset:#x}");
    }
    Ok(())
}

/// Formats one fixed-width table line for a symbol.
fn table_row(sym: &Symbol) -> String {
    format!(
        "{:#010x} {:>8} {:<8} {:<7} {}",
        sym.value,
        sym.size,
        sym.kind.to_string(),
        sym.bind.to_string(),
        sym.name
    )
}

/// Demangles a Rust or C++ symbol name; unmangled names pass through.
fn demangle(name: &str) -> String {
    rustc_demangle::demangle(name).to_string()
}

/// Parses a `0x`-prefixed hex or plain decimal address.
fn parse_address(text: &str) -> Result<u32> {
    let parsed = if let Some(hex) = text.strip_prefix("0x") {
        u32::from_str_radix(hex, 16)
    } else {
        text.parse()
    };
    parsed.with_context(|| format!("invalid address {text:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use muon_elf::{SymbolBind, SymbolKind};

    #[test]
    fn address_forms() {
        assert_eq!(parse_address("0x8000").unwrap(), 0x8000);
        assert_eq!(parse_address("4096").unwrap(), 4096);
        assert!(parse_address("0xzz").is_err());
        assert!(parse_address("").is_err());
    }

    #[test]
    fn table_row_layout() {
        let sym = Symbol {
            name: "main".into(),
            value: 0x8000,
            size: 64,
            kind: SymbolKind::Func,
            bind: SymbolBind::Global,
        };
        assert_eq!(table_row(&sym), "0x00008000       64 FUNC     GLOBAL  main");
    }

    #[test]
    fn demangle_passthrough() {
        assert_eq!(demangle("main"), "main");
    }
}
