//! Masked comparators and the oblivious selector. Comparisons are
//! unsigned and produce either a single masked bit or a full-width mask
//! suitable for driving `select` directly.

use crate::error::Result;
use crate::masked::{Domain, Masked};
use crate::word::Word;

impl<W: Word> Masked<W> {
    /// Masked `a < b` (unsigned), via the sign bit of `a - b` corrected
    /// for overflow: `msb(a ^ ((a ^ b) | ((a - b) ^ b)))`.
    ///
    /// With `full_mask` the single result bit is expanded to an all-ones
    /// word (`!(bit - 1)` on masked values); otherwise the result holds
    /// 0 or 1 in bit 0. The output is refreshed before it is returned.
    pub fn lt(&mut self, rhs: &mut Self, full_mask: bool) -> Result<Self> {
        Self::coerce2(self, rhs, Domain::Boolean)?;

        let mut diff = self.sub(rhs)?;
        let mut t0 = self.xor(rhs)?;
        let mut t1 = diff.xor(rhs)?;
        let mut t2 = t0.or(&mut t1)?;
        let mut t3 = self.xor(&mut t2)?;
        t3.shr(W::BITS - 1)?;

        if full_mask {
            let mut one = Self::mask(W::ONE, self.order(), Domain::Boolean)?;
            t3 = t3.sub(&mut one)?;
            t3.not()?;
        }
        t3.refresh()?;
        Ok(t3)
    }

    /// Masked `a <= b` (unsigned): `!(b < a)`.
    pub fn le(&mut self, rhs: &mut Self, full_mask: bool) -> Result<Self> {
        let mut out = rhs.lt(self, full_mask)?;
        out.flip_body(full_mask);
        Ok(out)
    }

    /// Masked `a > b` (unsigned): `b < a`.
    pub fn gt(&mut self, rhs: &mut Self, full_mask: bool) -> Result<Self> {
        rhs.lt(self, full_mask)
    }

    /// Masked `a >= b` (unsigned): `!(a < b)`.
    pub fn ge(&mut self, rhs: &mut Self, full_mask: bool) -> Result<Self> {
        let mut out = self.lt(rhs, full_mask)?;
        out.flip_body(full_mask);
        Ok(out)
    }

    /// Flips the comparator result in place by inverting the body share
    /// under the single-bit or full-width mask.
    fn flip_body(&mut self, full_mask: bool) {
        let mask = if full_mask { W::MAX } else { W::ONE };
        let body = self.shares()[0] ^ mask;
        self.shares_mut()[0] = body;
    }

    /// Oblivious selection: `mask ? a : b` without branching on the
    /// condition. `mask` must hold all-ones to pick `a` and zero to pick
    /// `b` (a `full_mask` comparator output); the identity is
    /// `((a ^ b) & mask) ^ b`. The output is refreshed.
    pub fn select(a: &mut Self, b: &mut Self, mask: &mut Self) -> Result<Self> {
        Self::convert_many(&mut [&mut *a, &mut *b, &mut *mask], Domain::Boolean)?;
        let mut t0 = a.xor(b)?;
        let mut t1 = mask.and(&mut t0)?;
        let mut out = t1.xor(b)?;
        out.refresh()?;
        Ok(out)
    }

    /// `(a_cmp < b_cmp) ? if_true : if_false` as one masked expression.
    pub fn select_lt(
        a_cmp: &mut Self,
        b_cmp: &mut Self,
        if_true: &mut Self,
        if_false: &mut Self,
    ) -> Result<Self> {
        let mut cond = a_cmp.lt(b_cmp, true)?;
        Self::select(if_true, if_false, &mut cond)
    }

    /// `(a_cmp <= b_cmp) ? if_true : if_false` as one masked expression.
    pub fn select_le(
        a_cmp: &mut Self,
        b_cmp: &mut Self,
        if_true: &mut Self,
        if_false: &mut Self,
    ) -> Result<Self> {
        let mut cond = a_cmp.le(b_cmp, true)?;
        Self::select(if_true, if_false, &mut cond)
    }

    /// `(a_cmp > b_cmp) ? if_true : if_false` as one masked expression.
    pub fn select_gt(
        a_cmp: &mut Self,
        b_cmp: &mut Self,
        if_true: &mut Self,
        if_false: &mut Self,
    ) -> Result<Self> {
        let mut cond = a_cmp.gt(b_cmp, true)?;
        Self::select(if_true, if_false, &mut cond)
    }

    /// `(a_cmp >= b_cmp) ? if_true : if_false` as one masked expression.
    pub fn select_ge(
        a_cmp: &mut Self,
        b_cmp: &mut Self,
        if_true: &mut Self,
        if_false: &mut Self,
    ) -> Result<Self> {
        let mut cond = a_cmp.ge(b_cmp, true)?;
        Self::select(if_true, if_false, &mut cond)
    }
}
