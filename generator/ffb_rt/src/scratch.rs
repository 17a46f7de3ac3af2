//! Call-scoped scratch allocation.

use ffb_layout::Layout;

use crate::Segment;

/// Anything that can allocate zero-initialized native regions.
///
/// Generated allocation routines take one of these instead of a
/// concrete arena so callers decide where instances live; [`Scratch`]
/// is the implementation a generated thunk uses for its own marshal
/// copies.
pub trait SegmentAllocator {
    fn allocate(&mut self, layout: Layout) -> Segment;
}

/// The scratch arena of one generated call activation.
///
/// Created inside the thunk when its plan needs scratch, dropped when
/// the call returns on any path. Never shared: each invocation owns
/// its own, so concurrent calls through the same binding need no lock.
#[derive(Default, Debug)]
pub struct Scratch {
    allocations: u64,
    bytes: u64,
}

impl Scratch {
    pub fn new() -> Self {
        Scratch::default()
    }

    /// Copy a string into the region as NUL-terminated UTF-8 bytes,
    /// the form a string-like parameter crosses the boundary in.
    pub fn alloc_str(&mut self, value: &str) -> Segment {
        let bytes = value.as_bytes();
        let mut segment = self.allocate(Layout::new(bytes.len() as u64 + 1, 1));
        if let Ok(span) = segment.span_mut(0, bytes.len() as u64) {
            span.copy_from_slice(bytes);
        }
        segment
    }

    /// Copy an existing region into scratch, the outbound form of an
    /// explicitly by-value argument.
    pub fn alloc_copy(&mut self, source: &Segment) -> Segment {
        let mut segment = self.allocate(source.layout());
        // Same layout, so the span always exists.
        if let Ok(span) = segment.span_mut(0, source.byte_size()) {
            span.copy_from_slice(source.as_bytes());
        }
        segment
    }

    /// Number of allocations this activation has made.
    pub fn allocations(&self) -> u64 {
        self.allocations
    }

    /// Total bytes this activation has allocated.
    pub fn allocated_bytes(&self) -> u64 {
        self.bytes
    }
}

impl SegmentAllocator for Scratch {
    fn allocate(&mut self, layout: Layout) -> Segment {
        self.allocations += 1;
        self.bytes += layout.byte_size;
        Segment::zeroed(layout)
    }
}

#[cfg(test)]
mod tests {
    #![allow(
        clippy::unwrap_used,
        reason = "test code uses unwrap for concise assertions"
    )]

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn alloc_str_appends_nul() {
        let mut scratch = Scratch::new();
        let segment = scratch.alloc_str("hi");
        assert_eq!(segment.as_bytes(), b"hi\0");
        assert_eq!(scratch.allocations(), 1);
        assert_eq!(scratch.allocated_bytes(), 3);
    }

    #[test]
    fn empty_string_is_a_single_nul() {
        let mut scratch = Scratch::new();
        let segment = scratch.alloc_str("");
        assert_eq!(segment.as_bytes(), b"\0");
    }

    #[test]
    fn alloc_copy_duplicates_bytes_and_layout() {
        let mut source = Segment::zeroed(Layout::new(8, 8));
        source.set::<i64>(0, 42).unwrap();

        let mut scratch = Scratch::new();
        let copy = scratch.alloc_copy(&source);
        assert_eq!(copy.layout(), source.layout());
        assert_eq!(copy.get::<i64>(0).unwrap(), 42);

        // The copy is independent of its source.
        source.set::<i64>(0, 7).unwrap();
        assert_eq!(copy.get::<i64>(0).unwrap(), 42);
    }

    #[test]
    fn allocator_hands_out_zeroed_regions() {
        let mut scratch = Scratch::new();
        let segment = scratch.allocate(Layout::new(12, 4));
        assert!(segment.as_bytes().iter().all(|b| *b == 0));
        assert_eq!(scratch.allocated_bytes(), 12);
    }
}
