//! The single randomness capability behind every mask, refresh and gadget.

use alloc::vec;

use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::Zeroizing;

use crate::error::{Error, Result};
use crate::word::Word;

/// Fills `out` with uniformly random words from the operating system
/// CSPRNG in one read. The intermediate byte buffer is wiped on every
/// exit path; any RNG failure or short read surfaces as [`Error::Csprng`].
pub(crate) fn fill_words<W: Word>(out: &mut [W]) -> Result<()> {
    if out.is_empty() {
        return Ok(());
    }
    let mut buf = Zeroizing::new(vec![0u8; out.len() * W::BYTES]);
    OsRng
        .try_fill_bytes(buf.as_mut_slice())
        .map_err(|_| Error::Csprng)?;
    for (word, chunk) in out.iter_mut().zip(buf.chunks_exact(W::BYTES)) {
        *word = W::from_le_slice(chunk);
    }
    Ok(())
}
