//! Descriptors for the declared native surface.
//!
//! A [`Module`] is the complete input to one generation run: the set of
//! declared aggregates (structs and unions) and the set of declared
//! function interfaces. Every descriptor is immutable once the module
//! is built and owned by exactly one parent.

use smallvec::SmallVec;

use crate::{Markers, Name, ScalarKind};

/// A description of one value's native representation.
///
/// Exactly one variant is active; the mutual exclusion of by-value and
/// by-address markers on a `Named` use is checked by the resolver, not
/// by construction.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum TypeDesc {
    /// Fixed-width integer or float.
    Scalar(ScalarKind),
    /// Reference to a declared nominal type, with use-site markers.
    Named { target: Name, markers: Markers },
    /// String-like value. Always crosses the boundary as an address.
    Str,
    /// Opaque pointer-sized handle to native memory.
    Handle,
    /// Element repeated `count` times. `count == 1` behaves as scalar.
    Sequence { elem: ScalarKind, count: u64 },
    /// The explicit scratch-allocator slot a signature may declare when
    /// its return value must be materialized caller-agnostically.
    ScratchAllocator,
}

impl TypeDesc {
    /// Declared repeat count: the sequence count, or 1 for anything else.
    pub fn repeat(&self) -> u64 {
        match self {
            TypeDesc::Sequence { count, .. } => *count,
            _ => 1,
        }
    }
}

/// One named field of an aggregate.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct FieldDesc {
    /// Structural name, unique within the owning aggregate. Used for
    /// layout lookups regardless of any accessor rename.
    pub name: Name,
    /// Accessor-name override for the generated symbol only.
    pub rename: Option<Name>,
    pub ty: TypeDesc,
}

impl FieldDesc {
    pub fn new(name: Name, ty: TypeDesc) -> Self {
        FieldDesc {
            name,
            rename: None,
            ty,
        }
    }

    /// The name the generated accessor is emitted under.
    pub fn accessor_name(&self) -> Name {
        self.rename.unwrap_or(self.name)
    }
}

/// Struct or union.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum AggregateKind {
    /// Fields laid out sequentially with padding between them.
    Struct,
    /// Fields all at offset 0; size is the padded maximum member size.
    Union,
}

/// A declared aggregate with ordered named fields.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct AggregateDesc {
    pub name: Name,
    pub kind: AggregateKind,
    /// Markers the declaration itself carries. Consulted when a use
    /// site has none of its own; a use-site marker always wins.
    pub default_markers: Markers,
    /// Declaration order determines offsets; no reordering is done.
    pub fields: SmallVec<[FieldDesc; 8]>,
}

/// One declared parameter of a native function.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct ParamDesc {
    pub name: Name,
    pub ty: TypeDesc,
}

/// A declared native function.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct FunctionDesc {
    /// High-level name of the generated call.
    pub name: Name,
    /// Override for the native symbol; defaults to `name`.
    pub symbol: Option<Name>,
    pub params: SmallVec<[ParamDesc; 8]>,
    /// `None` means void.
    pub ret: Option<TypeDesc>,
}

impl FunctionDesc {
    /// The symbol resolved in the native namespace.
    pub fn native_symbol(&self) -> Name {
        self.symbol.unwrap_or(self.name)
    }
}

/// A native library the interface's symbols live in.
///
/// When absent, symbols resolve in the platform default namespace.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct LibraryRef {
    pub name: Name,
    /// Library version selector; `None` means the current version.
    pub version: Option<Name>,
}

/// A declared function interface: a group of native functions bound
/// against one symbol namespace.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct InterfaceDesc {
    pub name: Name,
    pub library: Option<LibraryRef>,
    pub functions: Vec<FunctionDesc>,
}

/// The complete description graph for one generation run.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct Module {
    pub aggregates: Vec<AggregateDesc>,
    pub interfaces: Vec<InterfaceDesc>,
}

impl Module {
    /// Find a declared aggregate by name.
    pub fn aggregate(&self, name: Name) -> Option<&AggregateDesc> {
        self.aggregates.iter().find(|a| a.name == name)
    }
}
