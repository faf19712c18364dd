/// A signed 16-bit quantity measured in font design units.
pub type FWord = i16;

/// An unsigned 16-bit quantity measured in font design units.
pub type UfWord = u16;
