//! KEM Engine (§4.4): `Encap`/`Decap`, with optional sender
//! authentication, plus the `ExtractAndExpand` shared-secret derivation
//! they both bottom out in.
//!
//! The `kem_context` byte order is asymmetric by design (DESIGN.md,
//! "dual enc/dec kem_context ordering"): encap writes
//! (my-ephemeral-pub, peer-pub), decap writes (peer-enc, my-pub). Both
//! sides land on the same bytes because on decap the peer's `enc` *is*
//! the sender's ephemeral public key — the logical order is always
//! ephemeral-first, static-second.

use zeroize::Zeroizing;

use crate::dh_kem;
use crate::error::HpkeError;
use crate::labeled::LabeledKdf;
use crate::registry::KemInfo;
use crate::util::concat;

/// `enc`, the encapsulated ephemeral public key.
pub(crate) type Enc = Vec<u8>;
/// The KEM shared secret, zeroised on drop.
pub(crate) type SharedSecret = Zeroizing<Vec<u8>>;

fn extract_and_expand(
    kem: &KemInfo,
    z: &[u8],
    kem_context: &[u8],
) -> Result<SharedSecret, HpkeError> {
    let labeled = LabeledKdf::for_kem(kem);
    let eae_prk = Zeroizing::new(labeled.labeled_extract(b"", "eae_prk", z));
    let secret = labeled.labeled_expand(&eae_prk, "shared_secret", kem_context, kem.secret_len)?;
    Ok(Zeroizing::new(secret))
}

/// `Encap(pkR) -> (enc, shared_secret)`.
pub(crate) fn encap(kem: &KemInfo, pk_r: &[u8]) -> Result<(Enc, SharedSecret), HpkeError> {
    let prim = dh_kem::primitive(kem)?;
    let (sk_e, pk_e) = prim.keygen();
    let sk_e = Zeroizing::new(sk_e);
    let z = Zeroizing::new(prim.ecdh(&sk_e, pk_r)?);
    let kem_context = concat(&[&pk_e, pk_r]);
    let shared_secret = extract_and_expand(kem, &z, &kem_context)?;
    Ok((pk_e, shared_secret))
}

/// `Encap(pkR)` using an externally generated ephemeral key pair instead
/// of generating one internally, for `seal_with_sender_kp`.
pub(crate) fn encap_with_keypair(
    kem: &KemInfo,
    sk_e: &[u8],
    pk_e: &[u8],
    pk_r: &[u8],
) -> Result<SharedSecret, HpkeError> {
    let prim = dh_kem::primitive(kem)?;
    let z = Zeroizing::new(prim.ecdh(sk_e, pk_r)?);
    let kem_context = concat(&[pk_e, pk_r]);
    extract_and_expand(kem, &z, &kem_context)
}

/// `AuthEncap(pkR, skS) -> (enc, shared_secret)`: as `encap`, but the
/// ECDH output and `kem_context` also bind the sender's static key pair.
pub(crate) fn auth_encap(
    kem: &KemInfo,
    pk_r: &[u8],
    sk_s: &[u8],
) -> Result<(Enc, SharedSecret), HpkeError> {
    let prim = dh_kem::primitive(kem)?;
    let (sk_e, pk_e) = prim.keygen();
    let sk_e = Zeroizing::new(sk_e);
    let z_e = Zeroizing::new(prim.ecdh(&sk_e, pk_r)?);
    let z_s = Zeroizing::new(prim.ecdh(sk_s, pk_r)?);
    let z = Zeroizing::new(concat(&[z_e.as_slice(), z_s.as_slice()]));
    let pk_s = prim.pub_from_priv(sk_s)?;
    let kem_context = concat(&[&pk_e, pk_r, &pk_s]);
    let shared_secret = extract_and_expand(kem, &z, &kem_context)?;
    Ok((pk_e, shared_secret))
}

/// `AuthEncap(pkR, skS)` using an externally generated ephemeral key
/// pair, for `seal_with_sender_kp` in AUTH/PSK_AUTH mode.
pub(crate) fn auth_encap_with_keypair(
    kem: &KemInfo,
    sk_e: &[u8],
    pk_e: &[u8],
    pk_r: &[u8],
    sk_s: &[u8],
) -> Result<SharedSecret, HpkeError> {
    let prim = dh_kem::primitive(kem)?;
    let z_e = Zeroizing::new(prim.ecdh(sk_e, pk_r)?);
    let z_s = Zeroizing::new(prim.ecdh(sk_s, pk_r)?);
    let z = Zeroizing::new(concat(&[z_e.as_slice(), z_s.as_slice()]));
    let pk_s = prim.pub_from_priv(sk_s)?;
    let kem_context = concat(&[pk_e, pk_r, &pk_s]);
    extract_and_expand(kem, &z, &kem_context)
}

/// `Decap(enc, skR) -> shared_secret`.
pub(crate) fn decap(kem: &KemInfo, enc: &[u8], sk_r: &[u8]) -> Result<SharedSecret, HpkeError> {
    let prim = dh_kem::primitive(kem)?;
    let z = Zeroizing::new(prim.ecdh(sk_r, enc)?);
    let pk_r = prim.pub_from_priv(sk_r)?;
    let kem_context = concat(&[enc, &pk_r]);
    extract_and_expand(kem, &z, &kem_context)
}

/// `AuthDecap(enc, skR, pkS) -> shared_secret`.
pub(crate) fn auth_decap(
    kem: &KemInfo,
    enc: &[u8],
    sk_r: &[u8],
    pk_s: &[u8],
) -> Result<SharedSecret, HpkeError> {
    let prim = dh_kem::primitive(kem)?;
    let z_e = Zeroizing::new(prim.ecdh(sk_r, enc)?);
    let z_s = Zeroizing::new(prim.ecdh(sk_r, pk_s)?);
    let z = Zeroizing::new(concat(&[z_e.as_slice(), z_s.as_slice()]));
    let pk_r = prim.pub_from_priv(sk_r)?;
    let kem_context = concat(&[enc, &pk_r, pk_s]);
    extract_and_expand(kem, &z, &kem_context)
}

/// `(priv_bytes, pub_bytes)` for a freshly generated ephemeral or static
/// key pair under `kem`.
pub(crate) fn keygen(kem: &KemInfo) -> (Vec<u8>, Vec<u8>) {
    // Safe to unwrap: `kem` came from the registry, so it always has a
    // primitive.
    dh_kem::primitive(kem)
        .expect("registered KemInfo always has a primitive")
        .keygen()
}

/// RFC 9180 §7.1.3 `DeriveKeyPair`: deterministically derive a key pair
/// from input key material.
pub(crate) fn derive_key_pair(kem: &KemInfo, ikm: &[u8]) -> Result<(Vec<u8>, Vec<u8>), HpkeError> {
    let prim = dh_kem::primitive(kem)?;
    let labeled = LabeledKdf::for_kem(kem);
    prim.derive_key_pair(&labeled, ikm)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{lookup_kem, KEM_P256, KEM_X25519};

    #[test]
    fn encap_decap_roundtrip() {
        for kem_id in [KEM_X25519, KEM_P256] {
            let kem = lookup_kem(kem_id).unwrap();
            let (sk_r, pk_r) = keygen(kem);
            let (enc, ss_sender) = encap(kem, &pk_r).unwrap();
            let ss_receiver = decap(kem, &enc, &sk_r).unwrap();
            assert_eq!(*ss_sender, *ss_receiver);
            assert_eq!(ss_sender.len(), kem.secret_len);
        }
    }

    #[test]
    fn auth_encap_decap_roundtrip() {
        let kem = lookup_kem(KEM_X25519).unwrap();
        let (sk_r, pk_r) = keygen(kem);
        let (sk_s, pk_s) = keygen(kem);
        let (enc, ss_sender) = auth_encap(kem, &pk_r, &sk_s).unwrap();
        let ss_receiver = auth_decap(kem, &enc, &sk_r, &pk_s).unwrap();
        assert_eq!(*ss_sender, *ss_receiver);
    }

    #[test]
    fn auth_decap_fails_with_wrong_sender_key() {
        let kem = lookup_kem(KEM_X25519).unwrap();
        let (sk_r, pk_r) = keygen(kem);
        let (sk_s, _pk_s) = keygen(kem);
        let (_other_sk_s, other_pk_s) = keygen(kem);
        let (enc, ss_sender) = auth_encap(kem, &pk_r, &sk_s).unwrap();
        let ss_receiver = auth_decap(kem, &enc, &sk_r, &other_pk_s).unwrap();
        assert_ne!(*ss_sender, *ss_receiver);
    }

    #[test]
    fn derive_key_pair_is_deterministic() {
        let kem = lookup_kem(KEM_X25519).unwrap();
        let ikm = b"some deterministic input key material, 32+ bytes long";
        let (sk1, pk1) = derive_key_pair(kem, ikm).unwrap();
        let (sk2, pk2) = derive_key_pair(kem, ikm).unwrap();
        assert_eq!(sk1, sk2);
        assert_eq!(pk1, pk2);
    }
}
