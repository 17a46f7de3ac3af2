use ffb_layout::Layout;

/// Target platform parameters the resolver needs.
///
/// The only parameter that affects layout is the pointer width;
/// scalar kinds carry their own fixed sizes.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Target {
    /// Pointer size and alignment in bytes.
    pub pointer_width: u64,
}

impl Target {
    /// 64-bit target, the platform the original bindings assume.
    pub const LP64: Target = Target { pointer_width: 8 };

    /// Layout of any pointer-sized value on this target.
    pub const fn address_layout(self) -> Layout {
        Layout::address(self.pointer_width)
    }
}

impl Default for Target {
    fn default() -> Self {
        Target::LP64
    }
}
