//! This implements RFC 9180 Hybrid Public Key Encryption, plus the suite
//! utilities (string parsing, random sampling, GREASE) that consumers
//! building the Encrypted ClientHello extension need on top of it.
//! https://www.rfc-editor.org/rfc/rfc9180

mod aead;
mod dh_kem;
mod error;
mod import;
mod kdf;
mod kem;
mod keys;
mod labeled;
mod mode;
mod registry;
mod schedule;
mod suite;
mod util;

pub use error::HpkeError;
pub use import::import_priv;
pub use keys::{KeyPair, PrivateKey, PublicKey};
pub use mode::Mode;
pub use registry::{AeadInfo, KdfInfo, KemInfo};
pub use suite::{expansion, grease, random_suite, suite_format, suite_parse, suite_supported, Grease, Suite};

use util::xor_seq_into_nonce;

/// The result of a single-shot encryption: the encapsulated key and the
/// ciphertext.
pub type EncapsulatedKey = Vec<u8>;

fn nonce_for(base_nonce: &[u8], seq: Option<&[u8]>) -> Result<Vec<u8>, HpkeError> {
    match seq {
        None => Ok(base_nonce.to_vec()),
        Some(seq) => {
            if seq.len() > base_nonce.len() {
                return Err(HpkeError::BadInput);
            }
            Ok(xor_seq_into_nonce(base_nonce, seq))
        }
    }
}

fn aead_alg_for(suite: Suite) -> Result<aead::AeadAlg, HpkeError> {
    let info = registry::lookup_aead(suite.aead)?;
    aead::AeadAlg::from_id(info.id)
}

/// Single-shot HPKE encryption (§4.6). Runs `Encap` (or `AuthEncap` in
/// AUTH/PSK_AUTH mode), derives the key schedule, then seals `pt`.
///
/// `seq`, when present, is XORed right-aligned into the base nonce —
/// this is not part of vanilla RFC 9180 single-shot, it exists to let
/// ECH replay/HRR handling layer per-call sequence numbers on top. When
/// absent, this call is byte-identical to RFC 9180.
#[allow(clippy::too_many_arguments)]
pub fn seal(
    mode: Mode,
    suite: Suite,
    pk_r: &PublicKey,
    info: &[u8],
    aad: &[u8],
    pt: &[u8],
    psk: Option<(&[u8], &[u8])>,
    sk_s: Option<&PrivateKey>,
    seq: Option<&[u8]>,
) -> Result<(EncapsulatedKey, Vec<u8>), HpkeError> {
    if !suite::suite_supported(suite) {
        return Err(HpkeError::UnsupportedSuite);
    }
    let kem = registry::lookup_kem(suite.kem)?;
    let aead_alg = aead_alg_for(suite)?;

    let (enc, shared_secret) = if mode.uses_auth() {
        let sk_s = sk_s.ok_or(HpkeError::BadInput)?;
        kem::auth_encap(kem, pk_r.as_bytes(), sk_s.as_bytes())?
    } else {
        kem::encap(kem, pk_r.as_bytes())?
    };

    let (psk_id, psk_bytes) = psk.unwrap_or((b"", b""));
    let schedule = schedule::key_schedule(mode, suite, &shared_secret, info, psk_bytes, psk_id)?;
    let nonce = nonce_for(&schedule.base_nonce, seq)?;
    let ct = aead::seal(aead_alg, &schedule.key, &nonce, aad, pt)?;
    Ok((enc, ct))
}

/// As `seal`, but the sender's ephemeral KEM key pair is supplied by the
/// caller instead of generated internally. The returned `enc` is always
/// exactly `pk_e`.
#[allow(clippy::too_many_arguments)]
pub fn seal_with_sender_kp(
    mode: Mode,
    suite: Suite,
    pk_r: &PublicKey,
    sk_e: &PrivateKey,
    pk_e: &PublicKey,
    info: &[u8],
    aad: &[u8],
    pt: &[u8],
    psk: Option<(&[u8], &[u8])>,
    sk_s: Option<&PrivateKey>,
    seq: Option<&[u8]>,
) -> Result<Vec<u8>, HpkeError> {
    if !suite::suite_supported(suite) {
        return Err(HpkeError::UnsupportedSuite);
    }
    let kem = registry::lookup_kem(suite.kem)?;
    let aead_alg = aead_alg_for(suite)?;

    let shared_secret = if mode.uses_auth() {
        let sk_s = sk_s.ok_or(HpkeError::BadInput)?;
        kem::auth_encap_with_keypair(
            kem,
            sk_e.as_bytes(),
            pk_e.as_bytes(),
            pk_r.as_bytes(),
            sk_s.as_bytes(),
        )?
    } else {
        kem::encap_with_keypair(kem, sk_e.as_bytes(), pk_e.as_bytes(), pk_r.as_bytes())?
    };

    let (psk_id, psk_bytes) = psk.unwrap_or((b"", b""));
    let schedule = schedule::key_schedule(mode, suite, &shared_secret, info, psk_bytes, psk_id)?;
    let nonce = nonce_for(&schedule.base_nonce, seq)?;
    aead::seal(aead_alg, &schedule.key, &nonce, aad, pt)
}

/// Single-shot HPKE decryption (§4.6), the mirror of `seal`. Any AEAD
/// authentication failure surfaces as `OpenFailed`; no partial plaintext
/// is ever returned.
#[allow(clippy::too_many_arguments)]
pub fn open(
    mode: Mode,
    suite: Suite,
    sk_r: &PrivateKey,
    enc: &[u8],
    info: &[u8],
    aad: &[u8],
    ct: &[u8],
    psk: Option<(&[u8], &[u8])>,
    pk_s: Option<&PublicKey>,
    seq: Option<&[u8]>,
) -> Result<Vec<u8>, HpkeError> {
    if !suite::suite_supported(suite) {
        return Err(HpkeError::UnsupportedSuite);
    }
    let kem = registry::lookup_kem(suite.kem)?;
    let aead_alg = aead_alg_for(suite)?;

    let shared_secret = if mode.uses_auth() {
        let pk_s = pk_s.ok_or(HpkeError::BadInput)?;
        kem::auth_decap(kem, enc, sk_r.as_bytes(), pk_s.as_bytes())?
    } else {
        kem::decap(kem, enc, sk_r.as_bytes())?
    };

    let (psk_id, psk_bytes) = psk.unwrap_or((b"", b""));
    let schedule = schedule::key_schedule(mode, suite, &shared_secret, info, psk_bytes, psk_id)?;
    let nonce = nonce_for(&schedule.base_nonce, seq)?;
    aead::open(aead_alg, &schedule.key, &nonce, aad, ct)
}

/// Generate a fresh key pair for `suite`'s KEM.
pub fn keygen(suite: Suite) -> Result<KeyPair, HpkeError> {
    let kem = registry::lookup_kem(suite.kem)?;
    let (priv_bytes, pub_bytes) = kem::keygen(kem);
    Ok(KeyPair::new(priv_bytes, pub_bytes))
}

/// As `keygen`, but returns the raw encoded bytes instead of opaque
/// handles.
pub fn keygen_raw(suite: Suite) -> Result<(Vec<u8>, Vec<u8>), HpkeError> {
    let kem = registry::lookup_kem(suite.kem)?;
    let (priv_bytes, pub_bytes) = kem::keygen(kem);
    Ok((pub_bytes, priv_bytes))
}

/// RFC 9180 §7.1.3 `DeriveKeyPair`: deterministically derive `suite`'s KEM
/// key pair from input key material instead of sampling fresh randomness.
/// Callers reproducing a known-answer test vector supply the vector's
/// `ikmE`/`ikmR` here rather than calling `keygen`.
pub fn derive_keypair(suite: Suite, ikm: &[u8]) -> Result<KeyPair, HpkeError> {
    let kem = registry::lookup_kem(suite.kem)?;
    let (priv_bytes, pub_bytes) = kem::derive_key_pair(kem, ikm)?;
    Ok(KeyPair::new(priv_bytes, pub_bytes))
}
