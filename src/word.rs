//! The width dimension: one sealed trait instead of a per-width API family.

use core::fmt::Debug;
use core::ops::{BitAnd, BitOr, BitXor, Not};

use zeroize::Zeroize;

mod sealed {
    pub trait Sealed {}
    impl Sealed for u8 {}
    impl Sealed for u16 {}
    impl Sealed for u32 {}
    impl Sealed for u64 {}
}

/// An unsigned machine word usable as a share.
///
/// Implemented for `u8`, `u16`, `u32` and `u64` only; the trait is sealed
/// because every gadget's security argument is stated over words of these
/// widths. All arithmetic is wrapping (shares live in `Z/2^BITS`).
pub trait Word:
    sealed::Sealed
    + Copy
    + Eq
    + Default
    + Debug
    + Zeroize
    + BitXor<Output = Self>
    + BitAnd<Output = Self>
    + BitOr<Output = Self>
    + Not<Output = Self>
    + Send
    + Sync
    + 'static
{
    /// Width of the word in bits.
    const BITS: u32;
    /// Width of the word in bytes.
    const BYTES: usize;
    const ZERO: Self;
    const ONE: Self;
    const MAX: Self;

    fn wrapping_add(self, rhs: Self) -> Self;
    fn wrapping_sub(self, rhs: Self) -> Self;
    fn wrapping_mul(self, rhs: Self) -> Self;

    /// Plain left shift; callers reduce `n` below `BITS` first.
    fn shl(self, n: u32) -> Self;
    /// Plain right shift; callers reduce `n` below `BITS` first.
    fn shr(self, n: u32) -> Self;
    fn rotate_left(self, n: u32) -> Self;
    fn rotate_right(self, n: u32) -> Self;

    /// Assembles a word from exactly `BYTES` little-endian bytes.
    fn from_le_slice(bytes: &[u8]) -> Self;

    /// Zero-extends into the widest supported word (lane packing).
    fn widen(self) -> u64;
    /// Truncates the widest supported word back down (lane packing).
    fn truncate(v: u64) -> Self;
}

macro_rules! impl_word {
    ($($ty:ty),* $(,)?) => {$(
        impl Word for $ty {
            const BITS: u32 = <$ty>::BITS;
            const BYTES: usize = core::mem::size_of::<$ty>();
            const ZERO: Self = 0;
            const ONE: Self = 1;
            const MAX: Self = <$ty>::MAX;

            #[inline(always)]
            fn wrapping_add(self, rhs: Self) -> Self {
                <$ty>::wrapping_add(self, rhs)
            }

            #[inline(always)]
            fn wrapping_sub(self, rhs: Self) -> Self {
                <$ty>::wrapping_sub(self, rhs)
            }

            #[inline(always)]
            fn wrapping_mul(self, rhs: Self) -> Self {
                <$ty>::wrapping_mul(self, rhs)
            }

            #[inline(always)]
            fn shl(self, n: u32) -> Self {
                self << n
            }

            #[inline(always)]
            fn shr(self, n: u32) -> Self {
                self >> n
            }

            #[inline(always)]
            fn rotate_left(self, n: u32) -> Self {
                <$ty>::rotate_left(self, n)
            }

            #[inline(always)]
            fn rotate_right(self, n: u32) -> Self {
                <$ty>::rotate_right(self, n)
            }

            #[inline(always)]
            fn from_le_slice(bytes: &[u8]) -> Self {
                let mut buf = [0u8; core::mem::size_of::<$ty>()];
                buf.copy_from_slice(bytes);
                <$ty>::from_le_bytes(buf)
            }

            #[inline(always)]
            fn widen(self) -> u64 {
                self as u64
            }

            #[inline(always)]
            fn truncate(v: u64) -> Self {
                v as $ty
            }
        }
    )*};
}

impl_word!(u8, u16, u32, u64);
