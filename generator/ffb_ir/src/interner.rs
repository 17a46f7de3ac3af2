//! String interner for identifier storage.
//!
//! Provides O(1) interning and lookup with thread-safe access via a
//! `RwLock`, so the driver can plan independent interfaces in parallel
//! while sharing one interner.

// Arc is needed here for SharedInterner - one interner is shared across
// worker threads during parallel planning.
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::Name;

/// Error when interning a string fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternError {
    /// Storage exceeded capacity (over 4 billion strings).
    Overflow { count: usize },
}

impl std::fmt::Display for InternError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InternError::Overflow { count } => write!(
                f,
                "interner exceeded capacity: {} strings, max is {}",
                count,
                u32::MAX
            ),
        }
    }
}

impl std::error::Error for InternError {}

/// Interner storage behind the lock.
struct Inner {
    /// Map from string content to index.
    map: FxHashMap<Box<str>, u32>,
    /// Storage for string contents, indexed by `Name::raw()`.
    strings: Vec<Box<str>>,
}

impl Inner {
    fn with_empty() -> Self {
        let mut inner = Inner {
            map: FxHashMap::default(),
            strings: Vec::with_capacity(64),
        };
        // Pre-intern empty string at index 0 so `Name::EMPTY` is valid.
        inner.map.insert(Box::from(""), 0);
        inner.strings.push(Box::from(""));
        inner
    }
}

/// Thread-safe string interner.
///
/// Interning the same string twice yields the same [`Name`]; lookups
/// never fail for a `Name` produced by this interner.
pub struct NameInterner {
    inner: RwLock<Inner>,
}

impl NameInterner {
    pub fn new() -> Self {
        NameInterner {
            inner: RwLock::new(Inner::with_empty()),
        }
    }

    /// Try to intern a string, returning its handle or an error on
    /// overflow.
    ///
    /// This is the fallible version of [`intern`](Self::intern); use it
    /// when the overflow case must be handled instead of panicking.
    pub fn try_intern(&self, s: &str) -> Result<Name, InternError> {
        // Fast path: already interned, shared read lock only.
        {
            let inner = self.inner.read();
            if let Some(&idx) = inner.map.get(s) {
                return Ok(Name::from_raw(idx));
            }
        }

        let mut inner = self.inner.write();
        // Re-check under the write lock: another thread may have won.
        if let Some(&idx) = inner.map.get(s) {
            return Ok(Name::from_raw(idx));
        }

        let idx = u32::try_from(inner.strings.len()).map_err(|_| InternError::Overflow {
            count: inner.strings.len(),
        })?;
        inner.strings.push(Box::from(s));
        inner.map.insert(Box::from(s), idx);
        Ok(Name::from_raw(idx))
    }

    /// Intern a string, returning its stable handle.
    ///
    /// # Panics
    /// Panics when the interner exceeds capacity (over 4 billion
    /// distinct strings). Use [`try_intern`](Self::try_intern) for
    /// fallible interning.
    pub fn intern(&self, s: &str) -> Name {
        self.try_intern(s).unwrap_or_else(|e| panic!("{e}"))
    }

    /// Look up the string for a previously interned name.
    ///
    /// Returns an owned copy; display and emission paths hold the
    /// result across further interning.
    pub fn resolve(&self, name: Name) -> String {
        let inner = self.inner.read();
        inner
            .strings
            .get(name.index())
            .map(|s| s.to_string())
            .unwrap_or_default()
    }

    /// Number of interned strings (including the pre-interned empty one).
    pub fn len(&self) -> usize {
        self.inner.read().strings.len()
    }

    pub fn is_empty(&self) -> bool {
        // Never empty: the empty string is pre-interned.
        false
    }
}

impl Default for NameInterner {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared handle to an interner, for parallel planning.
pub type SharedInterner = Arc<NameInterner>;
