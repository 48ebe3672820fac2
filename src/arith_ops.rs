//! Arithmetic-domain operations: linear wrapping add/sub per share and
//! the DOM-independent multiplication gadget.

use alloc::vec;

use zeroize::Zeroizing;

use crate::error::Result;
use crate::masked::{Domain, Masked};
use crate::rng;
use crate::word::Word;

impl<W: Word> Masked<W> {
    /// Masked addition modulo `2^width`: one wrapping add per share pair.
    pub fn arith_add(&mut self, rhs: &mut Self) -> Result<Self> {
        Self::coerce2(self, rhs, Domain::Arithmetic)?;
        let shares = self
            .shares()
            .iter()
            .zip(rhs.shares())
            .map(|(&a, &b)| a.wrapping_add(b))
            .collect();
        Ok(Self::from_parts(Domain::Arithmetic, self.order(), shares))
    }

    /// Masked subtraction modulo `2^width`: one wrapping sub per share pair.
    pub fn arith_sub(&mut self, rhs: &mut Self) -> Result<Self> {
        Self::coerce2(self, rhs, Domain::Arithmetic)?;
        let shares = self
            .shares()
            .iter()
            .zip(rhs.shares())
            .map(|(&a, &b)| a.wrapping_sub(b))
            .collect();
        Ok(Self::from_parts(Domain::Arithmetic, self.order(), shares))
    }

    /// Masked multiplication modulo `2^width` via the DOM-independent
    /// gadget (Gross et al., CHES 2016): the arithmetic variant blinds
    /// each cross-term pair with `+r` on the lower-index share and `-r`
    /// on the higher one, so the blinding cancels in the share sum.
    /// The output is refreshed before it is returned.
    pub fn arith_mul(&mut self, rhs: &mut Self) -> Result<Self> {
        Self::coerce2(self, rhs, Domain::Arithmetic)?;

        let order = self.order() as usize;
        let count = order + 1;
        let pair_count = count * order / 2;

        let mut rnd = Zeroizing::new(vec![W::ZERO; pair_count]);
        rng::fill_words(&mut rnd)?;

        let mut out = Self::from_parts(Domain::Arithmetic, self.order(), vec![W::ZERO; count]);
        {
            let a = self.shares();
            let b = rhs.shares();
            let c = out.shares_mut();

            for i in 0..count {
                c[i] = a[i].wrapping_mul(b[i]);
            }
            let mut r_idx = 0;
            for i in 0..order {
                for j in (i + 1)..count {
                    let r = rnd[r_idx];
                    r_idx += 1;
                    c[i] = c[i].wrapping_add(a[i].wrapping_mul(b[j]).wrapping_add(r));
                    c[j] = c[j].wrapping_add(a[j].wrapping_mul(b[i]).wrapping_sub(r));
                }
            }
        }
        out.refresh()?;
        Ok(out)
    }
}
