//! Diffie-Hellman KEM primitives (§4.2, §4.4): keygen, ECDH, DeriveKeyPair
//! and raw-point validation for each of the five registered curves.
//!
//! Each curve gets its own small implementation behind `DhKemPrimitive`,
//! mirroring the `AeadTrait`/`KdfPrimitive` boxed-dispatch shape used
//! elsewhere in the engine — the suite's KEM choice is a runtime value,
//! so the concrete curve type can't appear in the engine's public API.

use elliptic_curve::sec1::ToEncodedPoint;
use rand_core::OsRng;
use std::fmt::Debug;

use crate::error::HpkeError;
use crate::labeled::LabeledKdf;
use crate::registry::{self, KemInfo, KEM_P256, KEM_P384, KEM_P521, KEM_X25519, KEM_X448};

pub(crate) trait DhKemPrimitive: Debug {
    fn keygen(&self) -> (Vec<u8>, Vec<u8>);
    fn derive_key_pair(&self, dkp: &LabeledKdf, ikm: &[u8]) -> Result<(Vec<u8>, Vec<u8>), HpkeError>;
    fn ecdh(&self, priv_bytes: &[u8], peer_pub: &[u8]) -> Result<Vec<u8>, HpkeError>;
    /// Validate (and, for NIST curves, normalize) an encoded public key.
    fn raw_to_pub(&self, bytes: &[u8]) -> Result<Vec<u8>, HpkeError>;
    /// Recover the encoded public key belonging to an encoded private key.
    fn pub_from_priv(&self, priv_bytes: &[u8]) -> Result<Vec<u8>, HpkeError>;
}

pub(crate) fn primitive(kem: &KemInfo) -> Result<Box<dyn DhKemPrimitive>, HpkeError> {
    match kem.id {
        KEM_P256 => Ok(Box::new(NistP256)),
        KEM_P384 => Ok(Box::new(NistP384)),
        KEM_P521 => Ok(Box::new(NistP521)),
        KEM_X25519 => Ok(Box::new(X25519Kem)),
        KEM_X448 => Ok(Box::new(X448Kem)),
        _ => Err(HpkeError::UnsupportedSuite),
    }
}

fn reject_zero(z: Vec<u8>) -> Result<Vec<u8>, HpkeError> {
    if z.iter().all(|b| *b == 0) {
        return Err(HpkeError::InternalCryptoError);
    }
    Ok(z)
}

mod p256_curve {
    pub(crate) use p256::{PublicKey, SecretKey};
    pub(crate) const SK_LEN: usize = 32;
}
mod p384_curve {
    pub(crate) use p384::{PublicKey, SecretKey};
    pub(crate) const SK_LEN: usize = 48;
}
mod p521_curve {
    pub(crate) use p521::{PublicKey, SecretKey};
    pub(crate) const SK_LEN: usize = 66;
}

#[derive(Debug)]
struct NistP256;
#[derive(Debug)]
struct NistP384;
#[derive(Debug)]
struct NistP521;

impl DhKemPrimitive for NistP256 {
    fn keygen(&self) -> (Vec<u8>, Vec<u8>) {
        let sk = p256_curve::SecretKey::random(&mut OsRng);
        let pk = sk.public_key();
        (
            sk.to_bytes().to_vec(),
            pk.to_encoded_point(false).as_bytes().to_vec(),
        )
    }

    fn derive_key_pair(&self, dkp: &LabeledKdf, ikm: &[u8]) -> Result<(Vec<u8>, Vec<u8>), HpkeError> {
        let dkp_prk = dkp.labeled_extract(b"", "dkp_prk", ikm);
        for counter in 0u8..=255 {
            let candidate = dkp.labeled_expand(&dkp_prk, "candidate", &[counter], p256_curve::SK_LEN)?;
            if let Ok(sk) = p256_curve::SecretKey::from_slice(&candidate) {
                let pk = sk.public_key();
                return Ok((sk.to_bytes().to_vec(), pk.to_encoded_point(false).as_bytes().to_vec()));
            }
        }
        Err(HpkeError::InternalCryptoError)
    }

    fn ecdh(&self, priv_bytes: &[u8], peer_pub: &[u8]) -> Result<Vec<u8>, HpkeError> {
        let sk = p256_curve::SecretKey::from_slice(priv_bytes).map_err(|_| HpkeError::BadInput)?;
        let pk = p256_curve::PublicKey::from_sec1_bytes(peer_pub).map_err(|_| HpkeError::BadInput)?;
        let shared = elliptic_curve::ecdh::diffie_hellman(sk.to_nonzero_scalar(), pk.as_affine());
        reject_zero(shared.raw_secret_bytes().to_vec())
    }

    fn raw_to_pub(&self, bytes: &[u8]) -> Result<Vec<u8>, HpkeError> {
        let pk = p256_curve::PublicKey::from_sec1_bytes(bytes).map_err(|_| HpkeError::BadInput)?;
        Ok(pk.to_encoded_point(false).as_bytes().to_vec())
    }

    fn pub_from_priv(&self, priv_bytes: &[u8]) -> Result<Vec<u8>, HpkeError> {
        let sk = p256_curve::SecretKey::from_slice(priv_bytes).map_err(|_| HpkeError::BadInput)?;
        Ok(sk.public_key().to_encoded_point(false).as_bytes().to_vec())
    }
}

impl DhKemPrimitive for NistP384 {
    fn keygen(&self) -> (Vec<u8>, Vec<u8>) {
        let sk = p384_curve::SecretKey::random(&mut OsRng);
        let pk = sk.public_key();
        (
            sk.to_bytes().to_vec(),
            pk.to_encoded_point(false).as_bytes().to_vec(),
        )
    }

    fn derive_key_pair(&self, dkp: &LabeledKdf, ikm: &[u8]) -> Result<(Vec<u8>, Vec<u8>), HpkeError> {
        let dkp_prk = dkp.labeled_extract(b"", "dkp_prk", ikm);
        for counter in 0u8..=255 {
            let candidate = dkp.labeled_expand(&dkp_prk, "candidate", &[counter], p384_curve::SK_LEN)?;
            if let Ok(sk) = p384_curve::SecretKey::from_slice(&candidate) {
                let pk = sk.public_key();
                return Ok((sk.to_bytes().to_vec(), pk.to_encoded_point(false).as_bytes().to_vec()));
            }
        }
        Err(HpkeError::InternalCryptoError)
    }

    fn ecdh(&self, priv_bytes: &[u8], peer_pub: &[u8]) -> Result<Vec<u8>, HpkeError> {
        let sk = p384_curve::SecretKey::from_slice(priv_bytes).map_err(|_| HpkeError::BadInput)?;
        let pk = p384_curve::PublicKey::from_sec1_bytes(peer_pub).map_err(|_| HpkeError::BadInput)?;
        let shared = elliptic_curve::ecdh::diffie_hellman(sk.to_nonzero_scalar(), pk.as_affine());
        reject_zero(shared.raw_secret_bytes().to_vec())
    }

    fn raw_to_pub(&self, bytes: &[u8]) -> Result<Vec<u8>, HpkeError> {
        let pk = p384_curve::PublicKey::from_sec1_bytes(bytes).map_err(|_| HpkeError::BadInput)?;
        Ok(pk.to_encoded_point(false).as_bytes().to_vec())
    }

    fn pub_from_priv(&self, priv_bytes: &[u8]) -> Result<Vec<u8>, HpkeError> {
        let sk = p384_curve::SecretKey::from_slice(priv_bytes).map_err(|_| HpkeError::BadInput)?;
        Ok(sk.public_key().to_encoded_point(false).as_bytes().to_vec())
    }
}

impl DhKemPrimitive for NistP521 {
    fn keygen(&self) -> (Vec<u8>, Vec<u8>) {
        let sk = p521_curve::SecretKey::random(&mut OsRng);
        let pk = sk.public_key();
        (
            sk.to_bytes().to_vec(),
            pk.to_encoded_point(false).as_bytes().to_vec(),
        )
    }

    fn derive_key_pair(&self, dkp: &LabeledKdf, ikm: &[u8]) -> Result<(Vec<u8>, Vec<u8>), HpkeError> {
        let dkp_prk = dkp.labeled_extract(b"", "dkp_prk", ikm);
        for counter in 0u8..=255 {
            let mut candidate =
                dkp.labeled_expand(&dkp_prk, "candidate", &[counter], p521_curve::SK_LEN)?;
            // RFC 9180 §7.1.3 bitmask table: P-521's order is 521 bits but
            // SK_LEN is 66 bytes (528 bits), so the top 7 bits of the
            // first byte must be cleared before the candidate is checked.
            candidate[0] &= 0x01;
            if let Ok(sk) = p521_curve::SecretKey::from_slice(&candidate) {
                let pk = sk.public_key();
                return Ok((sk.to_bytes().to_vec(), pk.to_encoded_point(false).as_bytes().to_vec()));
            }
        }
        Err(HpkeError::InternalCryptoError)
    }

    fn ecdh(&self, priv_bytes: &[u8], peer_pub: &[u8]) -> Result<Vec<u8>, HpkeError> {
        let sk = p521_curve::SecretKey::from_slice(priv_bytes).map_err(|_| HpkeError::BadInput)?;
        let pk = p521_curve::PublicKey::from_sec1_bytes(peer_pub).map_err(|_| HpkeError::BadInput)?;
        let shared = elliptic_curve::ecdh::diffie_hellman(sk.to_nonzero_scalar(), pk.as_affine());
        reject_zero(shared.raw_secret_bytes().to_vec())
    }

    fn raw_to_pub(&self, bytes: &[u8]) -> Result<Vec<u8>, HpkeError> {
        let pk = p521_curve::PublicKey::from_sec1_bytes(bytes).map_err(|_| HpkeError::BadInput)?;
        Ok(pk.to_encoded_point(false).as_bytes().to_vec())
    }

    fn pub_from_priv(&self, priv_bytes: &[u8]) -> Result<Vec<u8>, HpkeError> {
        let sk = p521_curve::SecretKey::from_slice(priv_bytes).map_err(|_| HpkeError::BadInput)?;
        Ok(sk.public_key().to_encoded_point(false).as_bytes().to_vec())
    }
}

#[derive(Debug)]
struct X25519Kem;

impl DhKemPrimitive for X25519Kem {
    fn keygen(&self) -> (Vec<u8>, Vec<u8>) {
        let sk = x25519_dalek::StaticSecret::random_from_rng(OsRng);
        let pk = x25519_dalek::PublicKey::from(&sk);
        (sk.to_bytes().to_vec(), pk.as_bytes().to_vec())
    }

    fn derive_key_pair(&self, dkp: &LabeledKdf, ikm: &[u8]) -> Result<(Vec<u8>, Vec<u8>), HpkeError> {
        let dkp_prk = dkp.labeled_extract(b"", "dkp_prk", ikm);
        let sk_bytes = dkp.labeled_expand(&dkp_prk, "sk", b"", 32)?;
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&sk_bytes);
        let sk = x25519_dalek::StaticSecret::from(arr);
        let pk = x25519_dalek::PublicKey::from(&sk);
        Ok((sk.to_bytes().to_vec(), pk.as_bytes().to_vec()))
    }

    fn ecdh(&self, priv_bytes: &[u8], peer_pub: &[u8]) -> Result<Vec<u8>, HpkeError> {
        if priv_bytes.len() != 32 || peer_pub.len() != 32 {
            return Err(HpkeError::BadInput);
        }
        let mut sk_arr = [0u8; 32];
        sk_arr.copy_from_slice(priv_bytes);
        let mut pk_arr = [0u8; 32];
        pk_arr.copy_from_slice(peer_pub);
        let sk = x25519_dalek::StaticSecret::from(sk_arr);
        let pk = x25519_dalek::PublicKey::from(pk_arr);
        let shared = sk.diffie_hellman(&pk);
        reject_zero(shared.as_bytes().to_vec())
    }

    fn raw_to_pub(&self, bytes: &[u8]) -> Result<Vec<u8>, HpkeError> {
        if bytes.len() != 32 {
            return Err(HpkeError::BadInput);
        }
        Ok(bytes.to_vec())
    }

    fn pub_from_priv(&self, priv_bytes: &[u8]) -> Result<Vec<u8>, HpkeError> {
        if priv_bytes.len() != 32 {
            return Err(HpkeError::BadInput);
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(priv_bytes);
        let sk = x25519_dalek::StaticSecret::from(arr);
        Ok(x25519_dalek::PublicKey::from(&sk).as_bytes().to_vec())
    }
}

#[derive(Debug)]
struct X448Kem;

impl DhKemPrimitive for X448Kem {
    fn keygen(&self) -> (Vec<u8>, Vec<u8>) {
        let sk = x448::Secret::new(&mut rand_core05::OsRng);
        let pk = x448::PublicKey::from(&sk);
        (sk.as_bytes().to_vec(), pk.as_bytes().to_vec())
    }

    fn derive_key_pair(&self, dkp: &LabeledKdf, ikm: &[u8]) -> Result<(Vec<u8>, Vec<u8>), HpkeError> {
        let dkp_prk = dkp.labeled_extract(b"", "dkp_prk", ikm);
        let sk_bytes = dkp.labeled_expand(&dkp_prk, "sk", b"", 56)?;
        let sk = x448::Secret::from_bytes(sk_bytes.as_slice()).ok_or(HpkeError::InternalCryptoError)?;
        let pk = x448::PublicKey::from(&sk);
        Ok((sk.as_bytes().to_vec(), pk.as_bytes().to_vec()))
    }

    fn ecdh(&self, priv_bytes: &[u8], peer_pub: &[u8]) -> Result<Vec<u8>, HpkeError> {
        let sk = x448::Secret::from_bytes(priv_bytes).ok_or(HpkeError::BadInput)?;
        let pk = x448::PublicKey::from_bytes(peer_pub).ok_or(HpkeError::BadInput)?;
        let shared = sk
            .as_diffie_hellman(&pk)
            .ok_or(HpkeError::InternalCryptoError)?;
        reject_zero(shared.as_bytes().to_vec())
    }

    fn raw_to_pub(&self, bytes: &[u8]) -> Result<Vec<u8>, HpkeError> {
        let pk = x448::PublicKey::from_bytes(bytes).ok_or(HpkeError::BadInput)?;
        Ok(pk.as_bytes().to_vec())
    }

    fn pub_from_priv(&self, priv_bytes: &[u8]) -> Result<Vec<u8>, HpkeError> {
        let sk = x448::Secret::from_bytes(priv_bytes).ok_or(HpkeError::BadInput)?;
        Ok(x448::PublicKey::from(&sk).as_bytes().to_vec())
    }
}

/// Look up the KEM's `KemInfo` and its primitive implementation together,
/// since nearly every caller needs both.
pub(crate) fn kem_and_primitive(
    kem_id: u16,
) -> Result<(&'static KemInfo, Box<dyn DhKemPrimitive>), HpkeError> {
    let info = registry::lookup_kem(kem_id)?;
    let prim = primitive(info)?;
    Ok((info, prim))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn x25519_ecdh_is_symmetric() {
        let (info, prim) = kem_and_primitive(KEM_X25519).unwrap();
        let (sk_a, pk_a) = prim.keygen();
        let (sk_b, pk_b) = prim.keygen();
        assert_eq!(pk_a.len(), info.pub_len);
        let z_ab = prim.ecdh(&sk_a, &pk_b).unwrap();
        let z_ba = prim.ecdh(&sk_b, &pk_a).unwrap();
        assert_eq!(z_ab, z_ba);
    }

    #[test]
    fn p256_ecdh_is_symmetric() {
        let (info, prim) = kem_and_primitive(KEM_P256).unwrap();
        let (sk_a, pk_a) = prim.keygen();
        let (sk_b, pk_b) = prim.keygen();
        assert_eq!(pk_a.len(), info.pub_len);
        let z_ab = prim.ecdh(&sk_a, &pk_b).unwrap();
        let z_ba = prim.ecdh(&sk_b, &pk_a).unwrap();
        assert_eq!(z_ab, z_ba);
    }

    #[test]
    fn pub_from_priv_matches_keygen_output() {
        let (_, prim) = kem_and_primitive(KEM_X25519).unwrap();
        let (sk, pk) = prim.keygen();
        assert_eq!(prim.pub_from_priv(&sk).unwrap(), pk);
    }

    #[test]
    fn unknown_kem_is_rejected() {
        assert!(kem_and_primitive(0xffff).is_err());
    }
}
