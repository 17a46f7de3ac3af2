use ffb_ir::{Name, ScalarKind};
use ffb_layout::Layout;

/// How a resolved value crosses the native boundary.
///
/// Size and alignment alone are not enough for call planning: the
/// planner needs to know whether a pointer-sized value is a tagged
/// address, a string, or an opaque handle, and whether a by-value
/// aggregate was marked explicitly at the use site or inherited its
/// semantics from the declaration default.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum ValueClass {
    /// Fixed-width integer or float.
    Scalar(ScalarKind),
    /// Address of native memory, optionally tagged with the referenced
    /// aggregate. The tag never affects size or alignment.
    Address { of: Option<Name> },
    /// Aggregate embedded by value. `explicit` records whether the use
    /// site carried the marker (true) or the declaration default
    /// supplied it (false); call planning passes defaulted uses as raw
    /// handles because the caller already owns a native region.
    ByValueAggregate { target: Name, explicit: bool },
    /// String-like value, always passed by address.
    StrPtr,
    /// Opaque pointer-sized handle.
    RawHandle,
    /// `count` elements of `elem`, densely packed.
    Sequence { elem: ScalarKind, count: u64 },
    /// The explicit scratch-allocator slot of a signature.
    ScratchAllocator,
}

/// A layout descriptor paired with its boundary-crossing class.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct ResolvedType {
    pub layout: Layout,
    pub class: ValueClass,
}

/// Marker for a type that failed to resolve.
///
/// The diagnostic has already been reported against the member's
/// origin; callers mark the surrounding artifact invalid and continue
/// with sibling members.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Unresolved;
