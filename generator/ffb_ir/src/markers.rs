//! Annotation markers on a type use.
//!
//! A declaration site may mark a nominal type use as embedded by value
//! or as an address of native memory. The two are mutually exclusive;
//! carrying both is a definition error surfaced by the resolver, never
//! silently disambiguated.

use bitflags::bitflags;

bitflags! {
    /// Marker annotations attached to one type use.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct Markers: u8 {
        /// The referenced aggregate is embedded inline at the use site.
        const BY_VALUE = 1 << 0;
        /// The use site holds a pointer to the referenced aggregate.
        const ADDRESS = 1 << 1;
    }
}

impl Markers {
    /// Both markers present: a definition error the resolver reports.
    #[inline]
    pub fn is_ambiguous(self) -> bool {
        self.contains(Markers::BY_VALUE | Markers::ADDRESS)
    }
}
