//! Command-line interface definitions for lepton.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Symbol table inspector for ARM ELF binaries.
#[derive(Parser)]
#[command(name = "lepton", version, about)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Print every symbol in the binary.
    Dump(DumpArgs),
    /// Resolve an address to the function containing it.
    Resolve(ResolveArgs),
}

/// Arguments for the `dump` subcommand.
#[derive(Parser)]
pub struct DumpArgs {
    /// ELF binary to inspect.
    pub file: PathBuf,

    /// Emit a JSON array instead of a table.
    #[arg(long)]
    pub json: bool,

    /// Demangle Rust and C++ symbol names.
    #[arg(long, short = 'd')]
    pub demangle: bool,

    /// Show only function symbols.
    #[arg(long)]
    pub functions: bool,
}

/// Arguments for the `resolve` subcommand.
#[derive(Parser)]
pub struct ResolveArgs {
    /// ELF binary to inspect.
    pub file: PathBuf,

    /// Address to resolve (hex with `0x` prefix, or decimal).
    pub address: String,

    /// Demangle the resolved name.
    #[arg(long, short = 'd')]
    pub demangle: bool,
}
