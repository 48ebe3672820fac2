//! Lane packers: reassemble 2/4/8 narrow sharings into one wide sharing
//! and back, share by share. Pure bit-slicing through explicit per-lane
//! copies; the narrow inputs are never consumed.
//!
//! Packing is value-preserving for boolean sharings (XOR distributes
//! over lanes). Arithmetic sharings pack share-wise without lane-carry
//! propagation, so only the individual shares round-trip, not the sum.

use alloc::vec::Vec;

use crate::error::{Error, Result};
use crate::masked::Masked;
use crate::word::Word;

/// Relates a wide word to the narrow word it can be sliced into.
/// The valid width combinations are fixed at compile time.
pub trait Lanes<N: Word>: Word {
    /// How many narrow lanes fit into one wide word.
    const COUNT: usize;
}

impl Lanes<u8> for u16 {
    const COUNT: usize = 2;
}
impl Lanes<u8> for u32 {
    const COUNT: usize = 4;
}
impl Lanes<u8> for u64 {
    const COUNT: usize = 8;
}
impl Lanes<u16> for u32 {
    const COUNT: usize = 2;
}
impl Lanes<u16> for u64 {
    const COUNT: usize = 4;
}
impl Lanes<u32> for u64 {
    const COUNT: usize = 2;
}

/// Packs `COUNT` narrow sharings into one wide sharing, lane by lane;
/// `parts[0]` becomes the least significant lane of every share.
///
/// # Errors
/// [`Error::LaneMismatch`] for a wrong part count, [`Error::OrderMismatch`]
/// or [`Error::DomainMismatch`] when the parts disagree in shape.
pub fn pack<N, Wd>(parts: &[Masked<N>]) -> Result<Masked<Wd>>
where
    N: Word,
    Wd: Word + Lanes<N>,
{
    let lanes = <Wd as Lanes<N>>::COUNT;
    if parts.len() != lanes {
        return Err(Error::LaneMismatch {
            expected: lanes,
            got: parts.len(),
        });
    }
    let first = &parts[0];
    for p in parts {
        if p.order() != first.order() {
            return Err(Error::OrderMismatch(first.order(), p.order()));
        }
        if p.domain() != first.domain() {
            return Err(Error::DomainMismatch);
        }
    }

    let mut out = Masked::<Wd>::zeroed(first.order(), first.domain())?;
    for i in 0..out.share_count() {
        let mut acc = 0u64;
        for (k, p) in parts.iter().enumerate() {
            acc |= p.shares()[i].widen() << (k as u32 * N::BITS);
        }
        out.shares_mut()[i] = Wd::truncate(acc);
    }
    Ok(out)
}

/// Splits one wide sharing into `COUNT` narrow sharings, lane by lane;
/// the least significant lane of every share lands in element 0.
pub fn unpack<Wd, N>(mv: &Masked<Wd>) -> Result<Vec<Masked<N>>>
where
    N: Word,
    Wd: Word + Lanes<N>,
{
    let lanes = <Wd as Lanes<N>>::COUNT;
    let mut parts = Masked::<N>::zeroed_many(lanes, mv.order(), mv.domain())?;
    for i in 0..mv.share_count() {
        let wide = mv.shares()[i].widen();
        for (k, p) in parts.iter_mut().enumerate() {
            p.shares_mut()[i] = N::truncate(wide >> (k as u32 * N::BITS));
        }
    }
    Ok(parts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::masked::Domain;

    #[test]
    fn test_pack_2x32_preserves_boolean_value() {
        let lo = Masked::<u32>::mask(0xDEAD_BEEF, 2, Domain::Boolean).unwrap();
        let hi = Masked::<u32>::mask(0x0123_4567, 2, Domain::Boolean).unwrap();
        let wide: Masked<u64> = pack(&[lo.clone(), hi.clone()]).unwrap();
        assert_eq!(wide.unmask(), 0x0123_4567_DEAD_BEEF);
        // Inputs are not consumed and keep their values.
        assert_eq!(lo.unmask(), 0xDEAD_BEEF);
        assert_eq!(hi.unmask(), 0x0123_4567);
    }

    #[test]
    fn test_pack_4x8_and_8x8() {
        let parts: Vec<Masked<u8>> = [0x11u8, 0x22, 0x33, 0x44]
            .iter()
            .map(|&v| Masked::mask(v, 3, Domain::Boolean).unwrap())
            .collect();
        let wide: Masked<u32> = pack(&parts).unwrap();
        assert_eq!(wide.unmask(), 0x4433_2211);

        let parts: Vec<Masked<u8>> = (1..=8u8)
            .map(|v| Masked::mask(v, 1, Domain::Boolean).unwrap())
            .collect();
        let wide: Masked<u64> = pack(&parts).unwrap();
        assert_eq!(wide.unmask(), 0x0807_0605_0403_0201);
    }

    #[test]
    fn test_unpack_is_pack_inverse() {
        let wide = Masked::<u64>::mask(0x0123_4567_89AB_CDEF, 2, Domain::Boolean).unwrap();
        let parts: Vec<Masked<u16>> = unpack(&wide).unwrap();
        assert_eq!(parts.len(), 4);
        let values = Masked::unmask_many(&parts);
        assert_eq!(values, [0xCDEF, 0x89AB, 0x4567, 0x0123]);

        let repacked: Masked<u64> = pack(&parts).unwrap();
        assert_eq!(repacked.unmask(), 0x0123_4567_89AB_CDEF);
    }

    #[test]
    fn test_unpack_splits_raw_shares() {
        // Lane slicing happens share by share, so each narrow share is
        // exactly the corresponding lane of the wide share.
        let wide = Masked::<u16>::mask(0xA55A, 2, Domain::Boolean).unwrap();
        let parts: Vec<Masked<u8>> = unpack(&wide).unwrap();
        for i in 0..wide.share_count() {
            let w = wide.shares()[i];
            assert_eq!(parts[0].shares()[i], (w & 0xFF) as u8);
            assert_eq!(parts[1].shares()[i], (w >> 8) as u8);
        }
    }

    #[test]
    fn test_pack_rejects_wrong_lane_count() {
        let parts: Vec<Masked<u8>> = (0..3u8)
            .map(|v| Masked::mask(v, 1, Domain::Boolean).unwrap())
            .collect();
        let err = pack::<u8, u32>(&parts).unwrap_err();
        assert_eq!(err, Error::LaneMismatch { expected: 4, got: 3 });
    }

    #[test]
    fn test_pack_rejects_shape_mismatch() {
        let a = Masked::<u32>::mask(1, 2, Domain::Boolean).unwrap();
        let b = Masked::<u32>::mask(2, 3, Domain::Boolean).unwrap();
        assert_eq!(
            pack::<u32, u64>(&[a.clone(), b]).unwrap_err(),
            Error::OrderMismatch(2, 3)
        );

        let c = Masked::<u32>::mask(2, 2, Domain::Arithmetic).unwrap();
        assert_eq!(
            pack::<u32, u64>(&[a, c]).unwrap_err(),
            Error::DomainMismatch
        );
    }
}
