//! Address-to-symbol resolution over an extracted symbol table.

use muon_elf::{Symbol, SymbolKind};

/// Resolves addresses to the function symbols that contain them.
pub struct SymbolIndex {
    entries: Vec<Entry>,
}

struct Entry {
    addr: u32,
    size: u32,
    name: String,
}

impl SymbolIndex {
    /// Builds an index over the function symbols in `symbols`, sorted by
    /// address. Non-function and unnamed symbols are dropped.
    pub fn new(symbols: Vec<Symbol>) -> Self {
        let mut entries: Vec<Entry> = symbols
            .into_iter()
            .filter(|s| s.kind == SymbolKind::Func && !s.name.is_empty())
            .map(|s| Entry {
                addr: s.value,
                size: s.size,
                name: s.name,
            })
            .collect();
        entries.sort_by_key(|e| e.addr);
        Self { entries }
    }

    /// Resolves an address to `(name, offset_into_function)`.
    ///
    /// Returns `None` if no function covers the address. A function of
    /// size 0 (unknown extent) matches any address from its start up to
    /// the next function.
    pub fn resolve(&self, addr: u32) -> Option<(&str, u32)> {
        // Last entry with addr <= target.
        let idx = self.entries.partition_point(|e| e.addr <= addr);
        if idx == 0 {
            return None;
        }

        let entry = &self.entries[idx - 1];
        let offset = addr - entry.addr;
        if entry.size > 0 && offset >= entry.size {
            return None;
        }
        Some((&entry.name, offset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use muon_elf::SymbolBind;

    fn func(name: &str, value: u32, size: u32) -> Symbol {
        Symbol {
            name: name.into(),
            value,
            size,
            kind: SymbolKind::Func,
            bind: SymbolBind::Global,
        }
    }

    fn index() -> SymbolIndex {
        SymbolIndex::new(vec![
            func("main", 0x8000, 0x40),
            func("helper", 0x8040, 0x10),
            Symbol {
                name: "data".into(),
                value: 0x9000,
                size: 4,
                kind: SymbolKind::Object,
                bind: SymbolBind::Global,
            },
        ])
    }

    #[test]
    fn hit_start_and_interior() {
        let idx = index();
        assert_eq!(idx.resolve(0x8000), Some(("main", 0)));
        assert_eq!(idx.resolve(0x803f), Some(("main", 0x3f)));
        assert_eq!(idx.resolve(0x8041), Some(("helper", 1)));
    }

    #[test]
    fn miss_before_first_and_past_end() {
        let idx = index();
        assert_eq!(idx.resolve(0x7fff), None);
        assert_eq!(idx.resolve(0x8050), None);
    }

    #[test]
    fn non_functions_excluded() {
        let idx = index();
        assert_eq!(idx.resolve(0x9000), None);
    }

    #[test]
    fn zero_size_function_is_open_ended() {
        let idx = SymbolIndex::new(vec![func("start", 0x100, 0)]);
        assert_eq!(idx.resolve(0xffff_0000), Some(("start", 0xfffe_ff00)));
    }
}
