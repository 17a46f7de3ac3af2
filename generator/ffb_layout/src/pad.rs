//! Padding insertion for sequential (struct) layout.
//!
//! Single left-to-right scan maintaining a running offset, O(n) in
//! member count:
//! 1. before each member, insert a padding entry of exactly the bytes
//!    needed to reach a multiple of that member's alignment;
//! 2. after the last member, pad the total size up to a multiple of the
//!    maximum alignment among all members, so the aggregate can repeat
//!    contiguously in an array without misaligning element N+1;
//! 3. empty input yields an empty, zero-sized result.

use smallvec::SmallVec;

use crate::layout::round_up;
use crate::Layout;

/// What one entry of a padded sequence is.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Entry {
    /// Original member, by index into the input slice.
    Member(usize),
    /// Inserted padding pseudo-member.
    Padding,
}

/// One entry of the padded sequence, placed at a concrete offset.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct PaddedEntry {
    pub entry: Entry,
    pub offset: u64,
    pub layout: Layout,
}

/// Result of padding an ordered member sequence.
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct PaddedSeq {
    /// Members interleaved with padding entries, in offset order.
    pub entries: SmallVec<[PaddedEntry; 8]>,
    /// Total size including trailing padding.
    pub byte_size: u64,
    /// Maximum member alignment; 1 for the empty sequence.
    pub byte_align: u64,
}

impl PaddedSeq {
    /// Offset of the `index`-th input member.
    pub fn offset_of(&self, index: usize) -> Option<u64> {
        self.entries
            .iter()
            .find(|e| e.entry == Entry::Member(index))
            .map(|e| e.offset)
    }
}

/// Pad an ordered sequence of member layouts.
pub fn pad(members: &[Layout]) -> PaddedSeq {
    if members.is_empty() {
        return PaddedSeq {
            entries: SmallVec::new(),
            byte_size: 0,
            byte_align: 1,
        };
    }

    let mut entries = SmallVec::new();
    let mut offset = 0u64;
    let mut max_align = 1u64;

    for (index, member) in members.iter().enumerate() {
        max_align = max_align.max(member.byte_align);

        let aligned = round_up(offset, member.byte_align);
        if aligned != offset {
            entries.push(PaddedEntry {
                entry: Entry::Padding,
                offset,
                layout: Layout::new(aligned - offset, 1),
            });
        }

        entries.push(PaddedEntry {
            entry: Entry::Member(index),
            offset: aligned,
            layout: *member,
        });
        offset = aligned + member.byte_size;
    }

    // Trailing padding so the aggregate tiles in arrays.
    let total = round_up(offset, max_align);
    if total != offset {
        entries.push(PaddedEntry {
            entry: Entry::Padding,
            offset,
            layout: Layout::new(total - offset, 1),
        });
    }

    PaddedSeq {
        entries,
        byte_size: total,
        byte_align: max_align,
    }
}

#[cfg(test)]
mod tests;
