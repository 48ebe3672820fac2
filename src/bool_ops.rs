//! Boolean-domain operations: per-share linear ops, the DOM-independent
//! AND gadget, and the KSA-backed masked adder/subtractor.

use alloc::vec;

use zeroize::Zeroizing;

use crate::error::Result;
use crate::masked::{Domain, Masked};
use crate::rng;
use crate::word::Word;

impl<W: Word> Masked<W> {
    /// Coerces a pair of operands into `target` in place, checking shape.
    pub(crate) fn coerce2(a: &mut Self, b: &mut Self, target: Domain) -> Result<()> {
        Self::convert_many(&mut [&mut *a, &mut *b], target)
    }

    /// Masked bitwise AND via the DOM-independent multiplication gadget
    /// (Gross et al., "Domain-Oriented Masking", CHES 2016,
    /// <https://eprint.iacr.org/2016/486.pdf>).
    ///
    /// Both operands are coerced to the boolean domain in place. One fresh
    /// random word is drawn per unordered share pair; within each pair the
    /// lower-index output share is updated before the higher one, so no
    /// probe sees both cross terms without the blinding word. The output
    /// is refreshed before it is returned.
    pub fn and(&mut self, rhs: &mut Self) -> Result<Self> {
        Self::coerce2(self, rhs, Domain::Boolean)?;

        let order = self.order() as usize;
        let count = order + 1;
        let pair_count = count * order / 2;

        let mut rnd = Zeroizing::new(vec![W::ZERO; pair_count]);
        rng::fill_words(&mut rnd)?;

        let mut out = Self::from_parts(Domain::Boolean, self.order(), vec![W::ZERO; count]);
        {
            let a = self.shares();
            let b = rhs.shares();
            let c = out.shares_mut();

            for i in 0..count {
                c[i] = a[i] & b[i];
            }
            let mut r_idx = 0;
            for i in 0..order {
                for j in (i + 1)..count {
                    let r = rnd[r_idx];
                    r_idx += 1;
                    c[i] = c[i] ^ (a[i] & b[j]) ^ r;
                    c[j] = c[j] ^ (a[j] & b[i]) ^ r;
                }
            }
        }
        out.refresh()?;
        Ok(out)
    }

    /// Masked bitwise OR: `a | b = (a & b) ^ a ^ b`, with the AND term
    /// produced by the secure gadget.
    pub fn or(&mut self, rhs: &mut Self) -> Result<Self> {
        let mut out = self.and(rhs)?;
        for i in 0..out.share_count() {
            let v = out.shares()[i] ^ self.shares()[i] ^ rhs.shares()[i];
            out.shares_mut()[i] = v;
        }
        Ok(out)
    }

    /// Masked bitwise XOR: linear, one XOR per share pair.
    pub fn xor(&mut self, rhs: &mut Self) -> Result<Self> {
        Self::coerce2(self, rhs, Domain::Boolean)?;
        let shares = self
            .shares()
            .iter()
            .zip(rhs.shares())
            .map(|(&a, &b)| a ^ b)
            .collect();
        Ok(Self::from_parts(Domain::Boolean, self.order(), shares))
    }

    /// In-place XOR of another boolean sharing of the same shape.
    pub(crate) fn xor_assign(&mut self, rhs: &Self) {
        debug_assert_eq!(self.order(), rhs.order());
        debug_assert_eq!(self.domain(), Domain::Boolean);
        debug_assert_eq!(rhs.domain(), Domain::Boolean);
        for i in 0..self.share_count() {
            let v = self.shares()[i] ^ rhs.shares()[i];
            self.shares_mut()[i] = v;
        }
    }

    /// Masked bitwise NOT. Inverting the body share alone inverts the
    /// logical value under XOR sharing.
    pub fn not(&mut self) -> Result<()> {
        self.to_boolean()?;
        let body = !self.shares()[0];
        self.shares_mut()[0] = body;
        Ok(())
    }

    /// Masked left shift by `n % width`, applied to every share.
    pub fn shl(&mut self, n: u32) -> Result<()> {
        self.to_boolean()?;
        let n = n % W::BITS;
        if n == 0 {
            return Ok(());
        }
        for s in self.shares_mut() {
            *s = s.shl(n);
        }
        Ok(())
    }

    /// Masked logical right shift by `n % width`, applied to every share.
    pub fn shr(&mut self, n: u32) -> Result<()> {
        self.to_boolean()?;
        let n = n % W::BITS;
        if n == 0 {
            return Ok(());
        }
        for s in self.shares_mut() {
            *s = s.shr(n);
        }
        Ok(())
    }

    /// Masked left rotation by `n % width`.
    pub fn rotl(&mut self, n: u32) -> Result<()> {
        self.to_boolean()?;
        let n = n % W::BITS;
        if n == 0 {
            return Ok(());
        }
        for s in self.shares_mut() {
            *s = s.rotate_left(n);
        }
        Ok(())
    }

    /// Masked right rotation by `n % width`.
    pub fn rotr(&mut self, n: u32) -> Result<()> {
        self.to_boolean()?;
        let n = n % W::BITS;
        if n == 0 {
            return Ok(());
        }
        for s in self.shares_mut() {
            *s = s.rotate_right(n);
        }
        Ok(())
    }

    /// Masked addition in the boolean domain:
    /// `a + b = a ^ b ^ carry(a, b)` with the carry word from the
    /// Kogge-Stone network.
    pub fn add(&mut self, rhs: &mut Self) -> Result<Self> {
        let carry = Self::ksa_carry(self, rhs)?;
        let mut out = self.xor(rhs)?;
        out.xor_assign(&carry);
        Ok(out)
    }

    /// Masked subtraction in the boolean domain:
    /// `a - b = a ^ b ^ borrow(a, b)`.
    pub fn sub(&mut self, rhs: &mut Self) -> Result<Self> {
        let borrow = Self::ksa_borrow(self, rhs)?;
        let mut out = self.xor(rhs)?;
        out.xor_assign(&borrow);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mask2<W: Word>(a: W, b: W, order: u8, domain: Domain) -> (Masked<W>, Masked<W>) {
        (
            Masked::mask(a, order, domain).unwrap(),
            Masked::mask(b, order, domain).unwrap(),
        )
    }

    fn check_binary<W: Word>(
        a: W,
        b: W,
        expected: W,
        op: fn(&mut Masked<W>, &mut Masked<W>) -> Result<Masked<W>>,
    ) {
        for order in 1..=4 {
            // Start from the arithmetic domain as well to exercise the
            // in-place coercion path.
            for domain in [Domain::Boolean, Domain::Arithmetic] {
                let (mut ma, mut mb) = mask2(a, b, order, domain);
                let out = op(&mut ma, &mut mb).unwrap();
                assert_eq!(ma.domain(), Domain::Boolean);
                assert_eq!(mb.domain(), Domain::Boolean);
                assert_eq!(out.unmask(), expected, "order {order} domain {domain:?}");
                // Inputs keep their values across the coercion.
                assert_eq!(ma.unmask(), a);
                assert_eq!(mb.unmask(), b);
            }
        }
    }

    #[test]
    fn test_and_matches_plaintext() {
        check_binary(0xFF00_FF00u32, 0x0F0F_0F0Fu32, 0x0F00_0F00, Masked::and);
        check_binary(0xA5u8, 0x0Fu8, 0x05, Masked::and);
        check_binary(u64::MAX, 0x1234_5678_9ABC_DEF0u64, 0x1234_5678_9ABC_DEF0, Masked::and);
    }

    #[test]
    fn test_or_matches_plaintext() {
        check_binary(0xF0F0u16, 0x0F0Fu16, 0xFFFF, Masked::or);
        check_binary(0x12u8, 0x00u8, 0x12, Masked::or);
        check_binary(0x8000_0000u32, 0x0000_0001u32, 0x8000_0001, Masked::or);
    }

    #[test]
    fn test_xor_matches_plaintext() {
        check_binary(0xAAAAu16, 0xFFFFu16, 0x5555, Masked::xor);
        check_binary(0xDEAD_BEEFu32, 0xDEAD_BEEFu32, 0, Masked::xor);
    }

    #[test]
    fn test_add_matches_plaintext() {
        check_binary(1000u16, 2345u16, 3345, Masked::add);
        check_binary(u32::MAX, 1u32, 0, Masked::add); // wraparound
        check_binary(0x7FFF_FFFF_FFFF_FFFFu64, 1u64, 0x8000_0000_0000_0000, Masked::add);
        check_binary(0xFFu8, 0xFFu8, 0xFE, Masked::add);
    }

    #[test]
    fn test_sub_matches_plaintext() {
        check_binary(3345u16, 2345u16, 1000, Masked::sub);
        check_binary(0u32, 1u32, u32::MAX, Masked::sub); // wraparound
        check_binary(0x8000_0000u32, 1u32, 0x7FFF_FFFF, Masked::sub);
        check_binary(0x01u8, 0xFFu8, 0x02, Masked::sub);
    }

    #[test]
    fn test_not() {
        let mut mv = Masked::<u32>::mask(0x0F0F_0F0F, 2, Domain::Boolean).unwrap();
        mv.not().unwrap();
        assert_eq!(mv.unmask(), 0xF0F0_F0F0);
        mv.not().unwrap();
        assert_eq!(mv.unmask(), 0x0F0F_0F0F);
    }

    #[test]
    fn test_shifts_and_rotates() {
        let value = 0x8000_0001u32;
        for order in 1..=3 {
            for n in [0u32, 1, 4, 31, 32, 33] {
                let mut mv = Masked::mask(value, order, Domain::Boolean).unwrap();
                mv.shl(n).unwrap();
                assert_eq!(mv.unmask(), value << (n % 32), "shl {n}");

                let mut mv = Masked::mask(value, order, Domain::Boolean).unwrap();
                mv.shr(n).unwrap();
                assert_eq!(mv.unmask(), value >> (n % 32), "shr {n}");

                let mut mv = Masked::mask(value, order, Domain::Boolean).unwrap();
                mv.rotl(n).unwrap();
                assert_eq!(mv.unmask(), value.rotate_left(n % 32), "rotl {n}");

                let mut mv = Masked::mask(value, order, Domain::Boolean).unwrap();
                mv.rotr(n).unwrap();
                assert_eq!(mv.unmask(), value.rotate_right(n % 32), "rotr {n}");
            }
        }
    }

    #[test]
    fn test_shift_coerces_arithmetic_input() {
        let mut mv = Masked::<u16>::mask(0x00FF, 2, Domain::Arithmetic).unwrap();
        mv.shl(8).unwrap();
        assert_eq!(mv.domain(), Domain::Boolean);
        assert_eq!(mv.unmask(), 0xFF00);
    }

    #[test]
    fn test_and_rejects_order_mismatch() {
        let mut a = Masked::<u32>::mask(1, 2, Domain::Boolean).unwrap();
        let mut b = Masked::<u32>::mask(2, 3, Domain::Boolean).unwrap();
        assert_eq!(
            a.and(&mut b).unwrap_err(),
            crate::Error::OrderMismatch(2, 3)
        );
    }

    #[test]
    fn test_gadget_output_is_reshared() {
        // The AND gadget must not return a trivial sharing of its output:
        // the mask shares are random with overwhelming probability.
        let mut a = Masked::<u64>::mask(u64::MAX, 4, Domain::Boolean).unwrap();
        let mut b = Masked::<u64>::mask(u64::MAX, 4, Domain::Boolean).unwrap();
        let out = a.and(&mut b).unwrap();
        assert_eq!(out.unmask(), u64::MAX);
        assert!(out.shares()[1..].iter().any(|&s| s != 0));
    }
}
