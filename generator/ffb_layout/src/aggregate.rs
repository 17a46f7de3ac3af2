//! Aggregate layout assembly on top of [`pad`].

use rustc_hash::FxHashMap;

use ffb_ir::Name;

use crate::layout::round_up;
use crate::{pad, Layout};

/// Computed layout of an aggregate: overall size and alignment plus the
/// byte offset of every field, keyed by structural field name.
///
/// Invariants (guaranteed by construction, checked in tests):
/// - `byte_size` is a multiple of `byte_align`;
/// - every field offset is a multiple of that field's alignment.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct AggregateLayout {
    pub byte_size: u64,
    pub byte_align: u64,
    pub offsets: FxHashMap<Name, u64>,
}

impl AggregateLayout {
    /// Offset of a field by structural name.
    pub fn offset_of(&self, field: Name) -> Option<u64> {
        self.offsets.get(&field).copied()
    }

    /// Size/alignment pair for embedding this aggregate by value.
    pub fn as_layout(&self) -> Layout {
        Layout::new(self.byte_size, self.byte_align.max(1))
    }
}

/// Sequential layout with inter-member and trailing padding.
pub fn struct_layout(fields: &[(Name, Layout)]) -> AggregateLayout {
    let layouts: Vec<Layout> = fields.iter().map(|&(_, l)| l).collect();
    let seq = pad(&layouts);

    let mut offsets = FxHashMap::default();
    for (index, &(name, _)) in fields.iter().enumerate() {
        if let Some(offset) = seq.offset_of(index) {
            offsets.insert(name, offset);
        }
    }

    AggregateLayout {
        byte_size: seq.byte_size,
        byte_align: seq.byte_align,
        offsets,
    }
}

/// Union layout: every member at offset 0, size is the maximum member
/// size rounded up to the maximum member alignment.
pub fn union_layout(fields: &[(Name, Layout)]) -> AggregateLayout {
    let mut offsets = FxHashMap::default();
    let mut max_size = 0u64;
    let mut max_align = 1u64;

    for &(name, layout) in fields {
        offsets.insert(name, 0);
        max_size = max_size.max(layout.byte_size);
        max_align = max_align.max(layout.byte_align);
    }

    AggregateLayout {
        byte_size: round_up(max_size, max_align),
        byte_align: max_align,
        offsets,
    }
}
