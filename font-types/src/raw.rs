//! Big-endian scalar encoding, shared by readers and writers.

use crate::{Offset16, Offset24, Offset32, Uint24};

/// A type with a fixed-width big-endian on-disk representation.
///
/// This is implemented for the primitive integers used throughout sfnt
/// tables. It intentionally does not attempt zero-copy struct overlays (no
/// `bytemuck::AnyBitPattern` derive on table structs): every table parser in
/// `font-read` decodes fields explicitly through a [`Cursor`], which keeps
/// the bounds-checking story simple and auditable at the cost of a few
/// memcpys per field.
///
/// [`Cursor`]: ../font_read/struct.Cursor.html
pub trait Scalar: Sized + Copy {
    /// Number of bytes in the big-endian encoding.
    const SIZE: usize;

    fn read_be_bytes(bytes: &[u8]) -> Option<Self>;
    fn write_be_bytes(self, out: &mut Vec<u8>);
}

macro_rules! impl_scalar_int {
    ($ty:ty) => {
        impl Scalar for $ty {
            const SIZE: usize = std::mem::size_of::<$ty>();

            fn read_be_bytes(bytes: &[u8]) -> Option<Self> {
                let arr = bytes.get(..Self::SIZE)?.try_into().ok()?;
                Some(<$ty>::from_be_bytes(arr))
            }

            fn write_be_bytes(self, out: &mut Vec<u8>) {
                out.extend_from_slice(&self.to_be_bytes());
            }
        }
    };
}

impl_scalar_int!(u8);
impl_scalar_int!(u16);
impl_scalar_int!(u32);
impl_scalar_int!(i8);
impl_scalar_int!(i16);
impl_scalar_int!(i32);
impl_scalar_int!(i64);

impl Scalar for Uint24 {
    const SIZE: usize = 3;

    fn read_be_bytes(bytes: &[u8]) -> Option<Self> {
        let b = bytes.get(..3)?;
        Some(Uint24::new(u32::from_be_bytes([0, b[0], b[1], b[2]])))
    }

    fn write_be_bytes(self, out: &mut Vec<u8>) {
        let v = self.to_u32().to_be_bytes();
        out.extend_from_slice(&v[1..]);
    }
}

impl Scalar for Offset16 {
    const SIZE: usize = 2;
    fn read_be_bytes(bytes: &[u8]) -> Option<Self> {
        u16::read_be_bytes(bytes).map(Offset16::new)
    }
    fn write_be_bytes(self, out: &mut Vec<u8>) {
        self.to_u32().write_be_bytes_as_u16(out)
    }
}

impl Scalar for Offset24 {
    const SIZE: usize = 3;
    fn read_be_bytes(bytes: &[u8]) -> Option<Self> {
        Uint24::read_be_bytes(bytes).map(|v| Offset24::new(v.to_u32()))
    }
    fn write_be_bytes(self, out: &mut Vec<u8>) {
        Uint24::new(self.to_u32()).write_be_bytes(out)
    }
}

impl Scalar for Offset32 {
    const SIZE: usize = 4;
    fn read_be_bytes(bytes: &[u8]) -> Option<Self> {
        u32::read_be_bytes(bytes).map(Offset32::new)
    }
    fn write_be_bytes(self, out: &mut Vec<u8>) {
        self.to_u32().write_be_bytes(out)
    }
}

trait WriteU16Helper {
    fn write_be_bytes_as_u16(self, out: &mut Vec<u8>);
}

impl WriteU16Helper for u32 {
    fn write_be_bytes_as_u16(self, out: &mut Vec<u8>) {
        (self as u16).write_be_bytes(out)
    }
}

/// A value held in its big-endian, on-disk byte layout.
///
/// Used by `font-write` table builders so that in-memory structs mirror the
/// byte order they will be serialized to, the way `read-fonts`' generated
/// table structs do.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct BigEndian<T: Scalar>(T);

impl<T: Scalar> BigEndian<T> {
    pub fn new(value: T) -> Self {
        BigEndian(value)
    }

    pub fn get(self) -> T {
        self.0
    }
}

impl<T: Scalar + std::fmt::Debug> std::fmt::Debug for BigEndian<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl<T: Scalar> From<T> for BigEndian<T> {
    fn from(value: T) -> Self {
        BigEndian::new(value)
    }
}
