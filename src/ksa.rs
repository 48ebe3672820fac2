//! Kogge-Stone prefix networks over masked shares: logarithmic-depth
//! carry and borrow words for the masked adder, subtractor and
//! comparators.

use crate::error::Result;
use crate::masked::{Domain, Masked};
use crate::word::Word;

impl<W: Word> Masked<W> {
    /// Masked carry word of `a + b`, aligned so that
    /// `a ^ b ^ carry == a + b (mod 2^width)`.
    ///
    /// Runs `ceil(log2 width)` rounds of propagate/generate updates; each
    /// round costs two DOM AND gadgets plus linear shifts. Operands are
    /// coerced to the boolean domain in place.
    pub fn ksa_carry(a: &mut Self, b: &mut Self) -> Result<Self> {
        Self::coerce2(a, b, Domain::Boolean)?;

        let mut p = a.xor(b)?;
        let mut g = a.and(b)?;

        let mut dist = 1u32;
        while dist < W::BITS {
            let mut p_shift = p.clone();
            let mut g_shift = g.clone();
            p_shift.shl(dist)?;
            g_shift.shl(dist)?;

            let tmp = p.and(&mut g_shift)?;
            g.xor_assign(&tmp);
            p = p.and(&mut p_shift)?;

            dist <<= 1;
        }
        g.shl(1)?;
        Ok(g)
    }

    /// Masked borrow word of `a - b`, aligned so that
    /// `a ^ b ^ borrow == a - b (mod 2^width)`.
    ///
    /// Same network as the carry, seeded with `!a` and carrying the extra
    /// `g & tmp` cancellation term of the subtractor prefix.
    pub fn ksa_borrow(a: &mut Self, b: &mut Self) -> Result<Self> {
        Self::coerce2(a, b, Domain::Boolean)?;

        let mut a_inv = a.clone();
        a_inv.not()?;
        let mut p = a_inv.xor(b)?;
        let mut g = a_inv.and(b)?;

        let mut dist = 1u32;
        while dist < W::BITS {
            let mut p_shift = p.clone();
            let mut g_shift = g.clone();
            p_shift.shl(dist)?;
            g_shift.shl(dist)?;

            let mut tmp = p.and(&mut g_shift)?;
            let cancel = g.and(&mut tmp)?;
            g.xor_assign(&tmp);
            g.xor_assign(&cancel);
            p = p.and(&mut p_shift)?;

            dist <<= 1;
        }
        g.shl(1)?;
        Ok(g)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng;
    use rand::RngCore;

    fn plain_carry(a: u32, b: u32) -> u32 {
        a.wrapping_add(b) ^ a ^ b
    }

    fn plain_borrow(a: u32, b: u32) -> u32 {
        a.wrapping_sub(b) ^ a ^ b
    }

    #[test]
    fn test_carry_matches_plaintext() {
        for order in 1..=4 {
            for _ in 0..8 {
                let (a, b) = (OsRng.next_u32(), OsRng.next_u32());
                let mut ma = Masked::mask(a, order, Domain::Boolean).unwrap();
                let mut mb = Masked::mask(b, order, Domain::Boolean).unwrap();
                let carry = Masked::ksa_carry(&mut ma, &mut mb).unwrap();
                assert_eq!(carry.unmask(), plain_carry(a, b), "a={a:#x} b={b:#x}");
            }
        }
    }

    #[test]
    fn test_borrow_matches_plaintext() {
        for order in 1..=4 {
            for _ in 0..8 {
                let (a, b) = (OsRng.next_u32(), OsRng.next_u32());
                let mut ma = Masked::mask(a, order, Domain::Boolean).unwrap();
                let mut mb = Masked::mask(b, order, Domain::Boolean).unwrap();
                let borrow = Masked::ksa_borrow(&mut ma, &mut mb).unwrap();
                assert_eq!(borrow.unmask(), plain_borrow(a, b), "a={a:#x} b={b:#x}");
            }
        }
    }

    #[test]
    fn test_carry_boundaries() {
        let cases = [(0u32, 0u32), (u32::MAX, 1), (u32::MAX, u32::MAX), (1, 0)];
        for (a, b) in cases {
            let mut ma = Masked::mask(a, 2, Domain::Boolean).unwrap();
            let mut mb = Masked::mask(b, 2, Domain::Boolean).unwrap();
            let carry = Masked::ksa_carry(&mut ma, &mut mb).unwrap();
            assert_eq!(carry.unmask(), plain_carry(a, b));
        }
    }

    #[test]
    fn test_prefix_coerces_arithmetic_inputs() {
        let mut ma = Masked::<u8>::mask(200, 2, Domain::Arithmetic).unwrap();
        let mut mb = Masked::<u8>::mask(100, 2, Domain::Arithmetic).unwrap();
        let borrow = Masked::ksa_borrow(&mut ma, &mut mb).unwrap();
        assert_eq!(ma.domain(), Domain::Boolean);
        assert_eq!(borrow.unmask(), 200u8.wrapping_sub(100) ^ 200 ^ 100);
    }

    #[test]
    fn test_all_widths() {
        let mut a8 = Masked::<u8>::mask(0xFF, 1, Domain::Boolean).unwrap();
        let mut b8 = Masked::<u8>::mask(0x01, 1, Domain::Boolean).unwrap();
        assert_eq!(
            Masked::ksa_carry(&mut a8, &mut b8).unwrap().unmask(),
            0xFFu8.wrapping_add(1) ^ 0xFF ^ 0x01
        );

        let mut a64 = Masked::<u64>::mask(u64::MAX, 1, Domain::Boolean).unwrap();
        let mut b64 = Masked::<u64>::mask(u64::MAX, 1, Domain::Boolean).unwrap();
        assert_eq!(
            Masked::ksa_carry(&mut a64, &mut b64).unwrap().unmask(),
            u64::MAX.wrapping_add(u64::MAX) ^ u64::MAX ^ u64::MAX
        );
    }
}
