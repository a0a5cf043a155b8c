//! Raw (unlabeled) HKDF adapter (§4.2). `hkdf::Hkdf` is generic over the
//! hash, but the KDF to use is a runtime suite choice, so — same pattern
//! as `aead.rs` — we hide the three concrete hashes behind one small
//! vtable.

use hkdf::Hkdf;
use sha2::{Sha256, Sha384, Sha512};
use std::fmt::Debug;

use crate::error::HpkeError;
use crate::registry::{self, KDF_HKDF_SHA256, KDF_HKDF_SHA384, KDF_HKDF_SHA512};

/// Which KDF a suite selected. Mirrors the registry codepoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KdfAlg {
    HkdfSha256,
    HkdfSha384,
    HkdfSha512,
}

impl KdfAlg {
    pub(crate) fn from_id(id: u16) -> Result<Self, HpkeError> {
        match id {
            KDF_HKDF_SHA256 => Ok(Self::HkdfSha256),
            KDF_HKDF_SHA384 => Ok(Self::HkdfSha384),
            KDF_HKDF_SHA512 => Ok(Self::HkdfSha512),
            _ => Err(HpkeError::UnsupportedSuite),
        }
    }

    pub(crate) fn id(self) -> u16 {
        match self {
            Self::HkdfSha256 => KDF_HKDF_SHA256,
            Self::HkdfSha384 => KDF_HKDF_SHA384,
            Self::HkdfSha512 => KDF_HKDF_SHA512,
        }
    }

    pub(crate) fn hash_len(self) -> usize {
        registry::lookup_kdf(self.id())
            .expect("KdfAlg always maps to a registered codepoint")
            .hash_len
    }
}

trait KdfPrimitive: Debug {
    fn extract(&self, salt: &[u8], ikm: &[u8]) -> Vec<u8>;
    fn expand(&self, prk: &[u8], info: &[u8], len: usize) -> Result<Vec<u8>, HpkeError>;
}

#[derive(Debug)]
struct HkdfSha256Impl;
#[derive(Debug)]
struct HkdfSha384Impl;
#[derive(Debug)]
struct HkdfSha512Impl;

impl KdfPrimitive for HkdfSha256Impl {
    fn extract(&self, salt: &[u8], ikm: &[u8]) -> Vec<u8> {
        let (prk, _) = Hkdf::<Sha256>::extract(Some(salt), ikm);
        prk.to_vec()
    }

    fn expand(&self, prk: &[u8], info: &[u8], len: usize) -> Result<Vec<u8>, HpkeError> {
        let hk = Hkdf::<Sha256>::from_prk(prk).map_err(|_| HpkeError::InternalCryptoError)?;
        let mut okm = vec![0u8; len];
        hk.expand(info, &mut okm)
            .map_err(|_| HpkeError::BadInput)?;
        Ok(okm)
    }
}

impl KdfPrimitive for HkdfSha384Impl {
    fn extract(&self, salt: &[u8], ikm: &[u8]) -> Vec<u8> {
        let (prk, _) = Hkdf::<Sha384>::extract(Some(salt), ikm);
        prk.to_vec()
    }

    fn expand(&self, prk: &[u8], info: &[u8], len: usize) -> Result<Vec<u8>, HpkeError> {
        let hk = Hkdf::<Sha384>::from_prk(prk).map_err(|_| HpkeError::InternalCryptoError)?;
        let mut okm = vec![0u8; len];
        hk.expand(info, &mut okm)
            .map_err(|_| HpkeError::BadInput)?;
        Ok(okm)
    }
}

impl KdfPrimitive for HkdfSha512Impl {
    fn extract(&self, salt: &[u8], ikm: &[u8]) -> Vec<u8> {
        let (prk, _) = Hkdf::<Sha512>::extract(Some(salt), ikm);
        prk.to_vec()
    }

    fn expand(&self, prk: &[u8], info: &[u8], len: usize) -> Result<Vec<u8>, HpkeError> {
        let hk = Hkdf::<Sha512>::from_prk(prk).map_err(|_| HpkeError::InternalCryptoError)?;
        let mut okm = vec![0u8; len];
        hk.expand(info, &mut okm)
            .map_err(|_| HpkeError::BadInput)?;
        Ok(okm)
    }
}

fn primitive(alg: KdfAlg) -> Box<dyn KdfPrimitive> {
    match alg {
        KdfAlg::HkdfSha256 => Box::new(HkdfSha256Impl),
        KdfAlg::HkdfSha384 => Box::new(HkdfSha384Impl),
        KdfAlg::HkdfSha512 => Box::new(HkdfSha512Impl),
    }
}

/// `HKDF-Extract(salt, ikm) -> prk`, `hash_len` bytes.
pub(crate) fn extract(alg: KdfAlg, salt: &[u8], ikm: &[u8]) -> Vec<u8> {
    primitive(alg).extract(salt, ikm)
}

/// `HKDF-Expand(prk, info, L) -> okm`. `L` must be at most `255 *
/// hash_len`; `hkdf` enforces this itself and we surface it as `BadInput`.
pub(crate) fn expand(alg: KdfAlg, prk: &[u8], info: &[u8], len: usize) -> Result<Vec<u8>, HpkeError> {
    primitive(alg).expand(prk, info, len)
}
