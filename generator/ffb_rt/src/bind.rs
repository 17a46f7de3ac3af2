//! One-time symbol binding for generated interfaces.

use rustc_hash::FxHashMap;

use crate::RtError;

/// Resolved address of one native symbol.
///
/// Opaque to this crate; the host's symbol source produces it and the
/// generated thunk hands it back when invoking.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct SymbolAddr(pub usize);

/// Process-wide symbol lookup the host supplies at bind time.
///
/// `library == None` resolves in the platform default namespace;
/// otherwise in the named library, with an optional version selector.
pub trait SymbolSource {
    fn lookup(
        &self,
        library: Option<&str>,
        version: Option<&str>,
        symbol: &str,
    ) -> Option<SymbolAddr>;
}

/// The immutable symbol table of one bound interface.
///
/// Built once by the generated `bind` routine before any call and
/// stored in a `OnceLock`; lookups afterwards are plain reads with no
/// lock. Binding fails as a whole if any symbol is missing, so a bound
/// table always answers every symbol its interface declared.
#[derive(Debug)]
pub struct BindingTable {
    library: Option<String>,
    entries: FxHashMap<String, SymbolAddr>,
}

impl BindingTable {
    /// Resolve every symbol of an interface against the source.
    ///
    /// Fails on the first missing symbol; a partially bound interface
    /// is worse than an unbound one.
    pub fn bind(
        library: Option<(&str, Option<&str>)>,
        symbols: &[&str],
        source: &dyn SymbolSource,
    ) -> Result<Self, RtError> {
        let library_name = library.map(|(name, _)| name);
        let version = library.and_then(|(_, version)| version);

        let mut entries = FxHashMap::default();
        for symbol in symbols {
            let addr = source.lookup(library_name, version, symbol).ok_or_else(|| {
                RtError::UnboundSymbol {
                    symbol: (*symbol).to_owned(),
                    library: library_name.map(str::to_owned),
                }
            })?;
            entries.insert((*symbol).to_owned(), addr);
        }

        Ok(BindingTable {
            library: library_name.map(str::to_owned),
            entries,
        })
    }

    /// Address of a bound symbol.
    pub fn address(&self, symbol: &str) -> Result<SymbolAddr, RtError> {
        self.entries
            .get(symbol)
            .copied()
            .ok_or_else(|| RtError::NotBound {
                symbol: symbol.to_owned(),
            })
    }

    pub fn library(&self) -> Option<&str> {
        self.library.as_deref()
    }
}
