//! Key Import (§4.8): raw / PEM / base64-without-armour heuristic
//! decoder for private keys, as needed by ECH configuration loaders that
//! don't always carry PEM armour.
//!
//! Attempt outcomes are logged at debug level only, and only after every
//! attempt has already run — so a timing observer watching this call
//! learns nothing about which branch succeeded (this only runs during
//! configuration load, off the seal/open hot path).

use crate::dh_kem;
use crate::error::HpkeError;
use crate::keys::KeyPair;
use crate::registry::{self, KemInfo};

const PEM_TAG: &str = "PRIVATE KEY";

fn finish(kem: &KemInfo, priv_bytes: Vec<u8>, pub_hint: Option<Vec<u8>>) -> Result<KeyPair, HpkeError> {
    if priv_bytes.len() != kem.priv_len {
        return Err(HpkeError::BadKey);
    }
    let prim = dh_kem::primitive(kem)?;
    let pub_bytes = match pub_hint {
        Some(hint) => prim.raw_to_pub(&hint)?,
        None => prim.pub_from_priv(&priv_bytes)?,
    };
    Ok(KeyPair::new(priv_bytes, pub_bytes))
}

/// Import a private key for `kem_id` from `input`, trying raw decoding,
/// then PEM, then PEM with synthetic armour wrapped around the input.
/// Fails with `BadKey` if none of the three succeed.
pub fn import_priv(
    kem_id: u16,
    input: &[u8],
    pub_hint: Option<Vec<u8>>,
) -> Result<KeyPair, HpkeError> {
    let kem = registry::lookup_kem(kem_id)?;

    let raw_result = if input.len() == kem.priv_len {
        finish(kem, input.to_vec(), pub_hint.clone())
    } else {
        Err(HpkeError::BadInput)
    };
    if raw_result.is_ok() {
        tracing::debug!(kem = kem.name, "key import: raw decode succeeded");
        return raw_result;
    }

    let text = std::str::from_utf8(input).ok();

    let pem_result = text.and_then(|s| pem::parse(s).ok()).and_then(|parsed| {
        finish(kem, parsed.contents().to_vec(), pub_hint.clone()).ok()
    });
    if let Some(kp) = pem_result {
        tracing::debug!(kem = kem.name, "key import: pem decode succeeded");
        return Ok(kp);
    }

    let wrapped_result = text.and_then(|s| {
        let wrapped = format!(
            "-----BEGIN {tag}-----\n{body}\n-----END {tag}-----\n",
            tag = PEM_TAG,
            body = s.trim()
        );
        pem::parse(wrapped).ok()
    });
    let wrapped_result = wrapped_result.and_then(|parsed| finish(kem, parsed.contents().to_vec(), pub_hint).ok());

    match wrapped_result {
        Some(kp) => {
            tracing::debug!(kem = kem.name, "key import: wrap-and-pem decode succeeded");
            Ok(kp)
        }
        None => {
            tracing::debug!(kem = kem.name, "key import: all decode attempts failed");
            Err(HpkeError::BadKey)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kem;
    use crate::registry::KEM_X25519;

    #[test]
    fn imports_raw_bytes_of_exact_length() {
        let kem_info = registry::lookup_kem(KEM_X25519).unwrap();
        let (sk, pk) = kem::keygen(kem_info);
        let imported = import_priv(KEM_X25519, &sk, None).unwrap();
        assert_eq!(imported.private_key.as_bytes(), sk.as_slice());
        assert_eq!(imported.public_key.as_bytes(), pk.as_slice());
    }

    #[test]
    fn imports_pem_armoured_key() {
        let kem_info = registry::lookup_kem(KEM_X25519).unwrap();
        let (sk, _pk) = kem::keygen(kem_info);
        let armoured = pem::encode(&pem::Pem::new(PEM_TAG, sk.clone()));
        let imported = import_priv(KEM_X25519, armoured.as_bytes(), None).unwrap();
        assert_eq!(imported.private_key.as_bytes(), sk.as_slice());
    }

    #[test]
    fn imports_base64_body_without_armour() {
        use base64ct::{Base64, Encoding};
        let kem_info = registry::lookup_kem(KEM_X25519).unwrap();
        let (sk, _pk) = kem::keygen(kem_info);
        let body = Base64::encode_string(&sk);
        let imported = import_priv(KEM_X25519, body.as_bytes(), None).unwrap();
        assert_eq!(imported.private_key.as_bytes(), sk.as_slice());
    }

    #[test]
    fn rejects_garbage_input() {
        assert_eq!(
            import_priv(KEM_X25519, b"not a key in any format", None),
            Err(HpkeError::BadKey)
        );
    }
}
