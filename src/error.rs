//! Error taxonomy for masked-share operations.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = core::result::Result<T, Error>;

/// Everything that can go wrong while operating on masked values.
///
/// Shape errors (`InvalidOrder`, `OrderMismatch`, `DomainMismatch`,
/// `LaneMismatch`, `EmptyBatch`) are caller mistakes and deterministic;
/// `Csprng` is environmental and may succeed on retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// Security order outside the supported `1..=30` range.
    #[error("security order {0} is outside the supported range 1..=30")]
    InvalidOrder(u8),

    /// A batch operation received no elements.
    #[error("batch operation received no elements")]
    EmptyBatch,

    /// Two masked values combined in one operation carry different orders.
    #[error("masked values disagree in security order ({0} vs {1})")]
    OrderMismatch(u8, u8),

    /// Masked values combined in one operation carry different domains
    /// where identical domains are required (lane packing).
    #[error("masked values disagree in representation domain")]
    DomainMismatch,

    /// Lane packing received the wrong number of narrow parts.
    #[error("lane packing expected {expected} parts, got {got}")]
    LaneMismatch { expected: usize, got: usize },

    /// The system randomness source failed or returned a short read.
    #[error("csprng failed to produce randomness")]
    Csprng,
}
