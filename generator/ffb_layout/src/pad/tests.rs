//! Tests for padding insertion: concrete layout scenarios and
//! property checks over arbitrary member sequences.

#![allow(
    clippy::unwrap_used,
    reason = "test code uses unwrap for concise assertions"
)]

use pretty_assertions::assert_eq;
use proptest::prelude::*;

use super::*;

fn l(size: u64, align: u64) -> Layout {
    Layout::new(size, align)
}

#[test]
fn empty_input_is_empty_output() {
    let seq = pad(&[]);
    assert!(seq.entries.is_empty());
    assert_eq!(seq.byte_size, 0);
    assert_eq!(seq.byte_align, 1);
}

#[test]
fn three_i32_need_no_padding() {
    // Three i32 members: offsets 0,4,8, size 12, align 4.
    let seq = pad(&[l(4, 4), l(4, 4), l(4, 4)]);
    assert_eq!(seq.offset_of(0), Some(0));
    assert_eq!(seq.offset_of(1), Some(4));
    assert_eq!(seq.offset_of(2), Some(8));
    assert_eq!(seq.byte_size, 12);
    assert_eq!(seq.byte_align, 4);
    // No padding entries at all.
    assert!(seq.entries.iter().all(|e| e.entry != Entry::Padding));
}

#[test]
fn i8_then_i32_inserts_three_pad_bytes() {
    // i8 then i32: offsets 0,4, size 8, align 4.
    let seq = pad(&[l(1, 1), l(4, 4)]);
    assert_eq!(seq.offset_of(0), Some(0));
    assert_eq!(seq.offset_of(1), Some(4));
    assert_eq!(seq.byte_size, 8);
    assert_eq!(seq.byte_align, 4);

    let pads: Vec<_> = seq
        .entries
        .iter()
        .filter(|e| e.entry == Entry::Padding)
        .collect();
    assert_eq!(pads.len(), 1);
    assert_eq!(pads[0].offset, 1);
    assert_eq!(pads[0].layout.byte_size, 3);
}

#[test]
fn trailing_pad_to_max_alignment() {
    // i64 then i8: the i8 fits at offset 8, but seven trailing bytes
    // are needed so two of these tile at offsets 0 and 16.
    let seq = pad(&[l(8, 8), l(1, 1)]);
    assert_eq!(seq.byte_size, 16);
    let last = seq.entries.last().unwrap();
    assert_eq!(last.entry, Entry::Padding);
    assert_eq!(last.offset, 9);
    assert_eq!(last.layout.byte_size, 7);
}

#[test]
fn single_member_trailing_pad_uses_own_alignment() {
    // A single 6-byte member with alignment 4 needs two trailing bytes.
    let seq = pad(&[l(6, 4)]);
    assert_eq!(seq.offset_of(0), Some(0));
    assert_eq!(seq.byte_size, 8);
}

#[test]
fn declaration_order_is_preserved() {
    // Reversing the members changes the offsets: no reordering.
    let forward = pad(&[l(1, 1), l(8, 8)]);
    let backward = pad(&[l(8, 8), l(1, 1)]);
    assert_eq!(forward.offset_of(1), Some(8));
    assert_eq!(backward.offset_of(1), Some(8));
    assert_eq!(forward.byte_size, 16);
    assert_eq!(backward.byte_size, 16);
    // But forward wastes 7 leading bytes while backward pads at the tail.
    assert_eq!(forward.entries[1].entry, Entry::Padding);
}

proptest! {
    /// Every member offset is a multiple of that member's alignment.
    #[test]
    fn offsets_respect_alignment(
        members in prop::collection::vec((1u64..64, 0u32..4), 0..12)
    ) {
        let layouts: Vec<Layout> = members
            .iter()
            .map(|&(size, align_log)| l(size, 1 << align_log))
            .collect();
        let seq = pad(&layouts);
        for entry in &seq.entries {
            if let Entry::Member(i) = entry.entry {
                prop_assert_eq!(entry.offset % layouts[i].byte_align, 0);
            }
        }
    }

    /// Total size is a multiple of the maximum alignment present.
    #[test]
    fn size_is_multiple_of_max_align(
        members in prop::collection::vec((1u64..64, 0u32..4), 1..12)
    ) {
        let layouts: Vec<Layout> = members
            .iter()
            .map(|&(size, align_log)| l(size, 1 << align_log))
            .collect();
        let seq = pad(&layouts);
        let max_align = layouts.iter().map(|m| m.byte_align).max().unwrap();
        prop_assert_eq!(seq.byte_align, max_align);
        prop_assert_eq!(seq.byte_size % max_align, 0);
    }

    /// Re-running the computation yields an identical result.
    #[test]
    fn padding_is_idempotent(
        members in prop::collection::vec((1u64..64, 0u32..4), 0..12)
    ) {
        let layouts: Vec<Layout> = members
            .iter()
            .map(|&(size, align_log)| l(size, 1 << align_log))
            .collect();
        prop_assert_eq!(pad(&layouts), pad(&layouts));
    }

    /// Members never overlap and padding exactly fills the gaps.
    #[test]
    fn entries_are_contiguous(
        members in prop::collection::vec((1u64..64, 0u32..4), 1..12)
    ) {
        let layouts: Vec<Layout> = members
            .iter()
            .map(|&(size, align_log)| l(size, 1 << align_log))
            .collect();
        let seq = pad(&layouts);
        let mut cursor = 0u64;
        for entry in &seq.entries {
            prop_assert_eq!(entry.offset, cursor);
            cursor += entry.layout.byte_size;
        }
        prop_assert_eq!(cursor, seq.byte_size);
    }
}
