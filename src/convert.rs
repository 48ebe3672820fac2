//! Domain converters: arithmetic-to-boolean by boolean lifting plus a
//! recursive carry-save-adder tree, boolean-to-arithmetic by the affine
//! psi recursion.

use alloc::vec;
use alloc::vec::Vec;

use zeroize::Zeroizing;

use crate::error::{Error, Result};
use crate::masked::{Domain, Masked};
use crate::rng;
use crate::word::Word;

impl<W: Word> Masked<W> {
    /// Converts this sharing into `target`; no-op when already there.
    pub fn convert(&mut self, target: Domain) -> Result<()> {
        match target {
            Domain::Boolean => self.to_boolean(),
            Domain::Arithmetic => self.to_arithmetic(),
        }
    }

    /// Converts a batch in order after checking that all members agree in
    /// security order. The first failing element aborts the batch; members
    /// converted before it stay in `target`.
    pub fn convert_many(mvs: &mut [&mut Self], target: Domain) -> Result<()> {
        let first_order = match mvs.first() {
            Some(mv) => mv.order(),
            None => return Err(Error::EmptyBatch),
        };
        for mv in mvs.iter() {
            if mv.order() != first_order {
                return Err(Error::OrderMismatch(first_order, mv.order()));
            }
        }
        for mv in mvs.iter_mut() {
            mv.convert(target)?;
        }
        Ok(())
    }

    /// Arithmetic-to-boolean conversion using the high-order recursive
    /// carry-save-adder method of Liu et al., "A Low-Latency High-Order
    /// Arithmetic to Boolean Masking Conversion"
    /// (<https://eprint.iacr.org/2024/045.pdf>).
    ///
    /// Each arithmetic share is re-masked as its own boolean sharing, the
    /// `d + 1` boolean summands are CSA-reduced to a sum/carry pair, and
    /// one Kogge-Stone carry finishes the addition without ever exposing
    /// a ripple.
    pub fn to_boolean(&mut self) -> Result<()> {
        if self.domain() == Domain::Boolean {
            return Ok(());
        }

        let mut lifted = Self::mask_many(self.shares(), self.order(), Domain::Boolean)?;
        let (mut s, mut c) = if lifted.len() == 2 {
            let c = lifted.remove(1);
            let s = lifted.remove(0);
            (s, c)
        } else {
            Self::csa_tree(&mut lifted)?
        };

        let mut k = Self::ksa_carry(&mut s, &mut c)?;
        k.xor_assign(&s);
        k.xor_assign(&c);

        self.shares_mut().copy_from_slice(k.shares());
        self.set_domain(Domain::Boolean);
        Ok(())
    }

    /// One carry-save step: reduces three boolean summands to a
    /// sum/carry pair with a single DOM AND.
    fn csa(x: &mut Self, y: &mut Self, z: &mut Self) -> Result<(Self, Self)> {
        let mut a = x.xor(y)?;
        let s = a.xor(z)?;
        let mut w = x.xor(z)?;
        let mut v = a.and(&mut w)?;
        let mut c = x.xor(&mut v)?;
        c.shl(1)?;
        Ok((s, c))
    }

    /// Recursive 3-to-2 reduction of `vals` into one sum/carry pair.
    fn csa_tree(vals: &mut [Self]) -> Result<(Self, Self)> {
        debug_assert!(vals.len() >= 2);
        if let [x, y] = vals {
            return Ok((x.clone(), y.clone()));
        }
        if let [x, y, z] = vals {
            return Self::csa(x, y, z);
        }
        let split = vals.len() - 1;
        let (head, tail) = vals.split_at_mut(split);
        let (mut s, mut c) = Self::csa_tree(head)?;
        Self::csa(&mut s, &mut c, &mut tail[0])
    }

    /// Boolean-to-arithmetic conversion using the affine psi recursive
    /// decomposition of Bettale et al., "Improved High-Order Conversion
    /// From Boolean to Arithmetic Masking"
    /// (<https://eprint.iacr.org/2018/328.pdf>).
    ///
    /// Works on raw share words: the `d + 1` boolean shares are padded
    /// with one zero word and handed to the recursive kernel, which
    /// returns `d + 1` arithmetic shares of the same value.
    pub fn to_arithmetic(&mut self) -> Result<()> {
        if self.domain() == Domain::Arithmetic {
            return Ok(());
        }

        let count = self.share_count();
        let mut padded = Zeroizing::new(vec![W::ZERO; count + 1]);
        padded[..count].copy_from_slice(self.shares());

        let out = Self::psi_convert(&padded)?;
        self.shares_mut().copy_from_slice(&out);
        self.set_domain(Domain::Arithmetic);
        Ok(())
    }

    /// `psi(masked, mask) = (masked ^ mask) - mask`, affine over the mask.
    #[inline(always)]
    fn psi(masked: W, mask: W) -> W {
        (masked ^ mask).wrapping_sub(mask)
    }

    /// Recursive kernel: `x` holds `n + 1` boolean shares, the result is
    /// `n` arithmetic shares of the same value. Every temporary vector is
    /// wiped when it leaves scope, on error paths included.
    fn psi_convert(x: &[W]) -> Result<Zeroizing<Vec<W>>> {
        let n = x.len() - 1;
        if n == 1 {
            return Ok(Zeroizing::new(vec![x[0] ^ x[1]]));
        }
        // The tail writes below index out[n-2] and out[n-1] separately,
        // which requires the inductive branch to only ever see n >= 2.
        debug_assert!(n >= 2);

        let mut rnd = Zeroizing::new(vec![W::ZERO; n]);
        rng::fill_words(&mut rnd)?;

        let mut x_mut = Zeroizing::new(x.to_vec());
        for i in 1..=n {
            let r = rnd[i - 1];
            x_mut[i] = x_mut[i] ^ r;
            x_mut[0] = x_mut[0] ^ r;
        }

        let mut y = Zeroizing::new(vec![W::ZERO; n]);
        let first_term = if (n - 1) & 1 == 1 { x_mut[0] } else { W::ZERO };
        y[0] = first_term ^ Self::psi(x_mut[0], x_mut[1]);
        for i in 1..n {
            y[i] = Self::psi(x_mut[0], x_mut[i + 1]);
        }

        let first = Self::psi_convert(&x_mut[1..])?;
        let second = Self::psi_convert(&y)?;

        let mut out = Zeroizing::new(vec![W::ZERO; n]);
        for i in 0..n - 2 {
            out[i] = first[i].wrapping_add(second[i]);
        }
        out[n - 2] = first[n - 2];
        out[n - 1] = second[n - 2];
        Ok(out)
    }
}
