//! The masked-value data model: share storage, lifecycle, and the
//! mask / unmask / refresh algebra.

use alloc::vec;
use alloc::vec::Vec;

use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::error::{Error, Result};
use crate::rng;
use crate::word::Word;
use crate::MAX_ORDER;

/// The representation domain of a sharing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Domain {
    /// Shares combine by XOR.
    Boolean,
    /// Shares combine by addition modulo `2^width`.
    Arithmetic,
}

/// A secret value split into `order + 1` shares of width `W`.
///
/// Any combination of up to `order` shares is statistically independent
/// of the secret; the logical value is the fold of all shares under the
/// domain operator (XOR or wrapping addition). The first share is the
/// masked body, the rest are the masks.
///
/// The share buffer is wiped with volatile writes when the value is
/// dropped, cleared or overwritten on an error path, so secrets never
/// outlive their container.
#[derive(Debug, Clone, Zeroize, ZeroizeOnDrop)]
pub struct Masked<W: Word> {
    #[zeroize(skip)]
    domain: Domain,
    #[zeroize(skip)]
    order: u8,
    shares: Vec<W>,
}

impl<W: Word> Masked<W> {
    /// Creates an all-zero sharing (logical value 0) of the given order.
    ///
    /// # Errors
    /// [`Error::InvalidOrder`] unless `1 <= order <= 30`.
    pub fn zeroed(order: u8, domain: Domain) -> Result<Self> {
        if order == 0 || order > MAX_ORDER {
            return Err(Error::InvalidOrder(order));
        }
        Ok(Self {
            domain,
            order,
            shares: vec![W::ZERO; order as usize + 1],
        })
    }

    /// Creates `count` all-zero sharings of identical shape.
    pub fn zeroed_many(count: usize, order: u8, domain: Domain) -> Result<Vec<Self>> {
        if count == 0 {
            return Err(Error::EmptyBatch);
        }
        let mut out = Vec::with_capacity(count);
        for _ in 0..count {
            out.push(Self::zeroed(order, domain)?);
        }
        Ok(out)
    }

    /// Splits `value` into a fresh `order + 1` sharing.
    ///
    /// The mask shares are drawn from the OS CSPRNG; the body is
    /// `value ^ s1 ^ .. ^ sd` (boolean) or `value - s1 - .. - sd`
    /// (arithmetic, wrapping), so the fold over all shares restores
    /// `value` exactly.
    ///
    /// # Errors
    /// [`Error::InvalidOrder`] for an out-of-range order, [`Error::Csprng`]
    /// if the randomness source fails. A partially built sharing is wiped
    /// before the error returns.
    pub fn mask(value: W, order: u8, domain: Domain) -> Result<Self> {
        let mut mv = Self::zeroed(order, domain)?;
        rng::fill_words(&mut mv.shares[1..])?;
        let mut body = value;
        match domain {
            Domain::Boolean => {
                for i in 1..mv.shares.len() {
                    body = body ^ mv.shares[i];
                }
            }
            Domain::Arithmetic => {
                for i in 1..mv.shares.len() {
                    body = body.wrapping_sub(mv.shares[i]);
                }
            }
        }
        mv.shares[0] = body;
        Ok(mv)
    }

    /// Masks each element of `values` into its own sharing.
    pub fn mask_many(values: &[W], order: u8, domain: Domain) -> Result<Vec<Self>> {
        if values.is_empty() {
            return Err(Error::EmptyBatch);
        }
        values
            .iter()
            .map(|&v| Self::mask(v, order, domain))
            .collect()
    }

    /// Recombines the shares into the logical value. Non-destructive.
    pub fn unmask(&self) -> W {
        let mut result = self.shares[0];
        match self.domain {
            Domain::Boolean => {
                for &s in &self.shares[1..] {
                    result = result ^ s;
                }
            }
            Domain::Arithmetic => {
                for &s in &self.shares[1..] {
                    result = result.wrapping_add(s);
                }
            }
        }
        result
    }

    /// Unmasks every element of a batch in order.
    pub fn unmask_many(mvs: &[Self]) -> Vec<W> {
        mvs.iter().map(Self::unmask).collect()
    }

    /// Re-randomizes the mask shares while preserving the logical value.
    ///
    /// Mandatory at every non-linear gadget output; recommended whenever
    /// a publicly known word has been folded into the body share.
    pub fn refresh(&mut self) -> Result<()> {
        let mut rnd = Zeroizing::new(vec![W::ZERO; self.order as usize]);
        rng::fill_words(&mut rnd)?;
        match self.domain {
            Domain::Boolean => {
                for i in 1..self.shares.len() {
                    let r = rnd[i - 1];
                    self.shares[0] = self.shares[0] ^ r;
                    self.shares[i] = self.shares[i] ^ r;
                }
            }
            Domain::Arithmetic => {
                for i in 1..self.shares.len() {
                    let r = rnd[i - 1];
                    self.shares[0] = self.shares[0].wrapping_sub(r);
                    self.shares[i] = self.shares[i].wrapping_add(r);
                }
            }
        }
        Ok(())
    }

    /// Refreshes every element of a batch.
    pub fn refresh_many(mvs: &mut [Self]) -> Result<()> {
        if mvs.is_empty() {
            return Err(Error::EmptyBatch);
        }
        for mv in mvs.iter_mut() {
            mv.refresh()?;
        }
        Ok(())
    }

    /// Wipes all shares in place; shape metadata is preserved and the
    /// logical value becomes 0.
    pub fn clear(&mut self) {
        for s in self.shares.iter_mut() {
            s.zeroize();
        }
    }

    /// Wipes every element of a batch in place.
    pub fn clear_many(mvs: &mut [Self]) {
        for mv in mvs.iter_mut() {
            mv.clear();
        }
    }

    /// A shape-identical copy whose shares are all zero.
    pub fn clone_cleared(&self) -> Self {
        Self {
            domain: self.domain,
            order: self.order,
            shares: vec![W::ZERO; self.shares.len()],
        }
    }

    /// `count` copies of this value; cleared copies when `clear_shares`.
    pub fn clone_many(&self, count: usize, clear_shares: bool) -> Result<Vec<Self>> {
        if count == 0 {
            return Err(Error::EmptyBatch);
        }
        let mut out = Vec::with_capacity(count);
        for _ in 0..count {
            out.push(if clear_shares {
                self.clone_cleared()
            } else {
                self.clone()
            });
        }
        Ok(out)
    }

    /// Security order `d`: the number of probes this sharing resists.
    pub fn order(&self) -> u8 {
        self.order
    }

    /// The representation domain the shares currently combine under.
    pub fn domain(&self) -> Domain {
        self.domain
    }

    /// Number of shares, always `order + 1`.
    pub fn share_count(&self) -> usize {
        self.shares.len()
    }

    /// Read-only view of the raw shares. Combining these outside the
    /// library defeats the probing-security guarantee; the accessor
    /// exists for serialization and statistical testing.
    pub fn shares(&self) -> &[W] {
        &self.shares
    }

    pub(crate) fn shares_mut(&mut self) -> &mut [W] {
        &mut self.shares
    }

    pub(crate) fn set_domain(&mut self, domain: Domain) {
        self.domain = domain;
    }

    pub(crate) fn from_parts(domain: Domain, order: u8, shares: Vec<W>) -> Self {
        debug_assert_eq!(shares.len(), order as usize + 1);
        Self {
            domain,
            order,
            shares,
        }
    }
}
