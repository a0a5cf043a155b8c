//! The error taxonomy for the HPKE engine.
//!
//! Every distinct failure mode gets its own variant; none are collapsed
//! except `OpenFailed`, which intentionally hides *why* an AEAD open
//! failed so that callers can't use error variance as a padding oracle.

use thiserror::Error;

/// Errors returned by the HPKE engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HpkeError {
    /// One or more suite components (KEM, KDF, AEAD) are not in the
    /// algorithm registry.
    #[error("unsupported suite")]
    UnsupportedSuite,

    /// `mode` was not one of the four defined HPKE modes.
    #[error("bad mode")]
    BadMode,

    /// `psk`/`psk_id` presence is inconsistent with `mode`.
    #[error("bad psk usage")]
    BadPskUsage,

    /// A required buffer was empty, the wrong length, or exceeded an
    /// internal size limit.
    #[error("bad input")]
    BadInput,

    /// Private-key import failed through every decode strategy.
    #[error("bad key")]
    BadKey,

    /// A caller-supplied output buffer was too small.
    ///
    /// `needed` carries the required size when it is known.
    #[error("buffer too small, need {needed} bytes")]
    BufferTooSmall {
        /// The number of bytes the caller's buffer needed to hold the result.
        needed: usize,
    },

    /// AEAD authentication failed. This is the only error surfaced for a
    /// failed `open`; the specific cause (bad tag, corrupted ciphertext,
    /// wrong key) is never distinguished to a caller.
    #[error("open failed")]
    OpenFailed,

    /// The underlying cryptographic backend (KDF, ECDH, AEAD) failed in a
    /// way not otherwise classified above.
    #[error("internal crypto error")]
    InternalCryptoError,
}
