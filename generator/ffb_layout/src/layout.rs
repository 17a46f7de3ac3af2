use std::fmt;

use ffb_ir::ScalarKind;

/// Resolved size and alignment of one value.
///
/// Alignment is always a power of two and at least 1.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Layout {
    pub byte_size: u64,
    pub byte_align: u64,
}

impl Layout {
    pub const fn new(byte_size: u64, byte_align: u64) -> Self {
        debug_assert!(byte_align >= 1);
        debug_assert!(byte_align.is_power_of_two());
        Layout {
            byte_size,
            byte_align,
        }
    }

    /// Layout of a fixed-width scalar.
    pub const fn scalar(kind: ScalarKind) -> Self {
        Layout::new(kind.byte_size(), kind.byte_align())
    }

    /// Layout of a pointer-sized value for the given pointer width.
    pub const fn address(pointer_width: u64) -> Self {
        Layout::new(pointer_width, pointer_width)
    }

    /// Layout of `count` elements of `kind`, densely packed.
    ///
    /// Element alignment equals element size, so no intra-sequence
    /// padding can occur. Returns `None` when the total byte size
    /// does not fit in `u64`.
    pub const fn sequence(kind: ScalarKind, count: u64) -> Option<Self> {
        match kind.byte_size().checked_mul(count) {
            Some(byte_size) => Some(Layout::new(byte_size, kind.byte_align())),
            None => None,
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}b/{}", self.byte_size, self.byte_align)
    }
}

/// Round `offset` up to the next multiple of `align`.
///
/// `align` must be non-zero; layouts guarantee this.
#[inline]
pub(crate) const fn round_up(offset: u64, align: u64) -> u64 {
    let misalignment = offset % align;
    if misalignment == 0 {
        offset
    } else {
        offset + (align - misalignment)
    }
}
