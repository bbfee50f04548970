#![forbid(unsafe_code)]

//! Native clamping capabilities of the host renderer.
//!
//! Some renderers clamp on their own: single-line overflow with an
//! ellipsis, or multi-line clamping. When the native mechanism can express
//! the requested clamp, the measured fit is skipped entirely.

use bitflags::bitflags;

bitflags! {
    /// What the host renderer can clamp without measurement.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct NativeClamp: u8 {
        /// Single-line overflow ellipsis (`text-overflow: ellipsis`).
        const TEXT_OVERFLOW = 0b01;
        /// Multi-line clamp (`line-clamp`).
        const LINE_CLAMP    = 0b10;
    }
}

impl NativeClamp {
    /// Whether a native clamp can replace measurement for this request.
    ///
    /// An expand control needs the measured cut, so expandable blocks never
    /// clamp natively.
    #[must_use]
    pub fn can_clamp(self, rows: u32, expandable: bool) -> bool {
        if expandable {
            return false;
        }
        if rows == 1 {
            self.contains(Self::TEXT_OVERFLOW)
        } else {
            self.contains(Self::LINE_CLAMP)
        }
    }
}
