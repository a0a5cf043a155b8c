//! AEAD primitive adapter (§4.2). Thin wrappers over `aes-gcm` and
//! `chacha20poly1305` behind one small vtable, the same shape the teacher
//! used to hide its own backend behind `AeadTrait`.

use aead::{Aead as _, KeyInit, Payload};
use aes_gcm::{Aes128Gcm, Aes256Gcm};
use chacha20poly1305::ChaCha20Poly1305;
use std::fmt::Debug;

use crate::registry::{self, AEAD_AES_128_GCM, AEAD_AES_256_GCM, AEAD_CHACHA20_POLY1305};
use crate::error::HpkeError;

/// Which AEAD a suite selected. Mirrors the registry codepoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AeadAlg {
    Aes128Gcm,
    Aes256Gcm,
    ChaCha20Poly1305,
}

impl AeadAlg {
    pub(crate) fn from_id(id: u16) -> Result<Self, HpkeError> {
        match id {
            AEAD_AES_128_GCM => Ok(Self::Aes128Gcm),
            AEAD_AES_256_GCM => Ok(Self::Aes256Gcm),
            AEAD_CHACHA20_POLY1305 => Ok(Self::ChaCha20Poly1305),
            _ => Err(HpkeError::UnsupportedSuite),
        }
    }

    pub(crate) fn id(self) -> u16 {
        match self {
            Self::Aes128Gcm => AEAD_AES_128_GCM,
            Self::Aes256Gcm => AEAD_AES_256_GCM,
            Self::ChaCha20Poly1305 => AEAD_CHACHA20_POLY1305,
        }
    }
}

trait AeadPrimitive: Debug {
    fn seal(&self, key: &[u8], nonce: &[u8], aad: &[u8], pt: &[u8]) -> Result<Vec<u8>, HpkeError>;
    fn open(&self, key: &[u8], nonce: &[u8], aad: &[u8], ct: &[u8]) -> Result<Vec<u8>, HpkeError>;
}

#[derive(Debug)]
struct Aes128GcmImpl;
#[derive(Debug)]
struct Aes256GcmImpl;
#[derive(Debug)]
struct ChaCha20Poly1305Impl;

impl AeadPrimitive for Aes128GcmImpl {
    fn seal(&self, key: &[u8], nonce: &[u8], aad: &[u8], pt: &[u8]) -> Result<Vec<u8>, HpkeError> {
        let cipher = Aes128Gcm::new_from_slice(key).map_err(|_| HpkeError::InternalCryptoError)?;
        cipher
            .encrypt(nonce.into(), Payload { msg: pt, aad })
            .map_err(|_| HpkeError::InternalCryptoError)
    }

    fn open(&self, key: &[u8], nonce: &[u8], aad: &[u8], ct: &[u8]) -> Result<Vec<u8>, HpkeError> {
        let cipher = Aes128Gcm::new_from_slice(key).map_err(|_| HpkeError::InternalCryptoError)?;
        cipher
            .decrypt(nonce.into(), Payload { msg: ct, aad })
            .map_err(|_| HpkeError::OpenFailed)
    }
}

impl AeadPrimitive for Aes256GcmImpl {
    fn seal(&self, key: &[u8], nonce: &[u8], aad: &[u8], pt: &[u8]) -> Result<Vec<u8>, HpkeError> {
        let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| HpkeError::InternalCryptoError)?;
        cipher
            .encrypt(nonce.into(), Payload { msg: pt, aad })
            .map_err(|_| HpkeError::InternalCryptoError)
    }

    fn open(&self, key: &[u8], nonce: &[u8], aad: &[u8], ct: &[u8]) -> Result<Vec<u8>, HpkeError> {
        let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| HpkeError::InternalCryptoError)?;
        cipher
            .decrypt(nonce.into(), Payload { msg: ct, aad })
            .map_err(|_| HpkeError::OpenFailed)
    }
}

impl AeadPrimitive for ChaCha20Poly1305Impl {
    fn seal(&self, key: &[u8], nonce: &[u8], aad: &[u8], pt: &[u8]) -> Result<Vec<u8>, HpkeError> {
        let cipher =
            ChaCha20Poly1305::new_from_slice(key).map_err(|_| HpkeError::InternalCryptoError)?;
        cipher
            .encrypt(nonce.into(), Payload { msg: pt, aad })
            .map_err(|_| HpkeError::InternalCryptoError)
    }

    fn open(&self, key: &[u8], nonce: &[u8], aad: &[u8], ct: &[u8]) -> Result<Vec<u8>, HpkeError> {
        let cipher =
            ChaCha20Poly1305::new_from_slice(key).map_err(|_| HpkeError::InternalCryptoError)?;
        cipher
            .decrypt(nonce.into(), Payload { msg: ct, aad })
            .map_err(|_| HpkeError::OpenFailed)
    }
}

fn primitive(alg: AeadAlg) -> Box<dyn AeadPrimitive> {
    match alg {
        AeadAlg::Aes128Gcm => Box::new(Aes128GcmImpl),
        AeadAlg::Aes256Gcm => Box::new(Aes256GcmImpl),
        AeadAlg::ChaCha20Poly1305 => Box::new(ChaCha20Poly1305Impl),
    }
}

/// Seal `pt` under `key`/`nonce`, returning `ct || tag`.
///
/// Fails with `BadInput` if `key` or `nonce` don't match the AEAD's
/// registered lengths.
pub(crate) fn seal(
    alg: AeadAlg,
    key: &[u8],
    nonce: &[u8],
    aad: &[u8],
    pt: &[u8],
) -> Result<Vec<u8>, HpkeError> {
    let info = registry::lookup_aead(alg.id())?;
    if key.len() != info.key_len || nonce.len() != info.nonce_len {
        return Err(HpkeError::BadInput);
    }
    primitive(alg).seal(key, nonce, aad, pt)
}

/// Open `ct` (which is `encrypted || tag`) under `key`/`nonce`.
///
/// Any authentication failure, length mismatch included, is reported as
/// `OpenFailed` — never anything more specific.
pub(crate) fn open(
    alg: AeadAlg,
    key: &[u8],
    nonce: &[u8],
    aad: &[u8],
    ct: &[u8],
) -> Result<Vec<u8>, HpkeError> {
    let info = registry::lookup_aead(alg.id())?;
    if key.len() != info.key_len || nonce.len() != info.nonce_len {
        return Err(HpkeError::OpenFailed);
    }
    primitive(alg).open(key, nonce, aad, ct)
}
