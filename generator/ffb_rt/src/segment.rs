//! Byte regions with typed, checked access.

use std::fmt;

use ffb_layout::Layout;

use crate::RtError;

/// A fixed-width value that can cross the native boundary.
///
/// Implementations read and write native-endian bytes; the trait is
/// sealed to the scalar kinds the generator resolves.
pub trait Scalar: Copy + sealed::Sealed {
    /// Size and alignment, both `size_of::<Self>()` for every scalar.
    const LAYOUT: Layout;

    fn read(bytes: &[u8]) -> Self;
    fn write(self, bytes: &mut [u8]);
}

mod sealed {
    pub trait Sealed {}
}

macro_rules! impl_scalar {
    ($($ty:ty),* $(,)?) => {$(
        impl sealed::Sealed for $ty {}

        impl Scalar for $ty {
            const LAYOUT: Layout = Layout::new(
                std::mem::size_of::<$ty>() as u64,
                std::mem::align_of::<$ty>() as u64,
            );

            fn read(bytes: &[u8]) -> Self {
                let mut raw = [0u8; std::mem::size_of::<$ty>()];
                raw.copy_from_slice(bytes);
                <$ty>::from_ne_bytes(raw)
            }

            fn write(self, bytes: &mut [u8]) {
                bytes.copy_from_slice(&self.to_ne_bytes());
            }
        }
    )*};
}

impl_scalar!(i8, i16, i32, i64, u8, u16, u32, u64, f32, f64);

/// An owned, zero-initialized native-format memory region.
///
/// All access is offset-checked and alignment-checked; an access that
/// fails leaves the region untouched. The region's bytes are the
/// aggregate's native representation, laid out by the generator's
/// offsets.
pub struct Segment {
    bytes: Box<[u8]>,
    layout: Layout,
}

impl Segment {
    /// Allocate a zero-initialized region of the given layout.
    pub fn zeroed(layout: Layout) -> Self {
        #[allow(
            clippy::cast_possible_truncation,
            reason = "layout sizes are host-addressable by construction"
        )]
        let bytes = vec![0u8; layout.byte_size as usize].into_boxed_slice();
        Segment { bytes, layout }
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn byte_size(&self) -> u64 {
        self.layout.byte_size
    }

    /// Read one scalar at a checked offset.
    pub fn get<T: Scalar>(&self, offset: u64) -> Result<T, RtError> {
        let range = self.checked_range(offset, T::LAYOUT)?;
        Ok(T::read(&self.bytes[range]))
    }

    /// Write one scalar at a checked offset.
    pub fn set<T: Scalar>(&mut self, offset: u64, value: T) -> Result<(), RtError> {
        let range = self.checked_range(offset, T::LAYOUT)?;
        value.write(&mut self.bytes[range]);
        Ok(())
    }

    /// Read element `index` of a sequence field starting at `offset`.
    pub fn get_indexed<T: Scalar>(&self, offset: u64, index: u64) -> Result<T, RtError> {
        self.get(self.element_offset::<T>(offset, index)?)
    }

    /// Write element `index` of a sequence field starting at `offset`.
    pub fn set_indexed<T: Scalar>(
        &mut self,
        offset: u64,
        index: u64,
        value: T,
    ) -> Result<(), RtError> {
        let at = self.element_offset::<T>(offset, index)?;
        self.set(at, value)
    }

    /// Byte offset of element `index`, rejecting arithmetic overflow
    /// the same way an offset past the segment end is rejected.
    fn element_offset<T: Scalar>(&self, offset: u64, index: u64) -> Result<u64, RtError> {
        index
            .checked_mul(T::LAYOUT.byte_size)
            .and_then(|delta| offset.checked_add(delta))
            .ok_or(RtError::OffsetOutOfBounds {
                offset,
                len: T::LAYOUT.byte_size,
                size: self.layout.byte_size,
            })
    }

    /// Replace all `count` elements of a sequence field in one bulk
    /// copy.
    ///
    /// Fails with [`RtError::LengthMismatch`] when `values` is not
    /// exactly `count` long; on any failure no element is written.
    pub fn replace_all<T: Scalar>(
        &mut self,
        offset: u64,
        count: u64,
        values: &[T],
    ) -> Result<(), RtError> {
        if values.len() as u64 != count {
            return Err(RtError::LengthMismatch {
                expected: count,
                actual: values.len() as u64,
            });
        }
        let elem = T::LAYOUT.byte_size;
        let total = elem.checked_mul(count).ok_or(RtError::OffsetOutOfBounds {
            offset,
            len: elem.saturating_mul(count),
            size: self.layout.byte_size,
        })?;
        // Validate the whole span before touching any byte.
        let range = self.checked_range(offset, Layout::new(total, T::LAYOUT.byte_align))?;
        let span = &mut self.bytes[range];
        #[allow(
            clippy::cast_possible_truncation,
            reason = "element sizes fit in usize"
        )]
        for (value, chunk) in values.iter().zip(span.chunks_exact_mut(elem as usize)) {
            value.write(chunk);
        }
        Ok(())
    }

    /// Read all `count` elements of a sequence field.
    pub fn read_all<T: Scalar>(&self, offset: u64, count: u64) -> Result<Vec<T>, RtError> {
        let mut out = Vec::with_capacity(usize::try_from(count).unwrap_or(0));
        for index in 0..count {
            out.push(self.get_indexed(offset, index)?);
        }
        Ok(out)
    }

    /// Borrow the raw bytes of a field's span.
    pub fn span(&self, offset: u64, len: u64) -> Result<&[u8], RtError> {
        let range = self.checked_range(offset, Layout::new(len, 1))?;
        Ok(&self.bytes[range])
    }

    /// Mutably borrow the raw bytes of a field's span.
    pub fn span_mut(&mut self, offset: u64, len: u64) -> Result<&mut [u8], RtError> {
        let range = self.checked_range(offset, Layout::new(len, 1))?;
        Ok(&mut self.bytes[range])
    }

    /// Copy another segment's bytes into a field's span. Lengths must
    /// match exactly; used by embedded-aggregate setters.
    pub fn write_segment(&mut self, offset: u64, source: &Segment) -> Result<(), RtError> {
        let span = self.span_mut(offset, source.byte_size())?;
        span.copy_from_slice(&source.bytes);
        Ok(())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    fn checked_range(&self, offset: u64, value: Layout) -> Result<std::ops::Range<usize>, RtError> {
        if offset % value.byte_align != 0 {
            return Err(RtError::MisalignedOffset {
                offset,
                align: value.byte_align,
            });
        }
        let end = offset
            .checked_add(value.byte_size)
            .filter(|end| *end <= self.layout.byte_size)
            .ok_or(RtError::OffsetOutOfBounds {
                offset,
                len: value.byte_size,
                size: self.layout.byte_size,
            })?;
        #[allow(
            clippy::cast_possible_truncation,
            reason = "bounds were checked against the host-sized region"
        )]
        Ok(offset as usize..end as usize)
    }
}

impl fmt::Debug for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Segment")
            .field("layout", &self.layout)
            .finish_non_exhaustive()
    }
}
