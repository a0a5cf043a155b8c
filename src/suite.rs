//! Suite Utilities (§4.7): the (kem, kdf, aead) triple, its string form,
//! random sampling, GREASE, and the ciphertext-length predictor.

use rand_core::{OsRng, RngCore};
#[cfg(feature = "serialization")]
use serde::{Deserialize, Serialize};

use crate::error::HpkeError;
use crate::registry::{self, aead_ids, kdf_ids, kem_ids};

/// A suite is a triple of IANA codepoints. It travels by value, never by
/// reference (§3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct Suite {
    pub kem: u16,
    pub kdf: u16,
    pub aead: u16,
}

/// The output of `grease()`: a suite plus decoy sender-public and
/// ciphertext values, indistinguishable from genuine HPKE traffic.
#[derive(Debug, Clone)]
pub struct Grease {
    pub suite: Suite,
    pub random_pub: Vec<u8>,
    pub random_ct: Vec<u8>,
}

/// `true` iff every component of `suite` is in the algorithm registry.
pub fn suite_supported(suite: Suite) -> bool {
    registry::lookup_kem(suite.kem).is_ok()
        && registry::lookup_kdf(suite.kdf).is_ok()
        && registry::lookup_aead(suite.aead).is_ok()
}

/// `expansion(suite, pt_len) = pt_len + tag_len(aead)`. Callers size
/// ciphertext buffers from this.
pub fn expansion(suite: Suite, pt_len: usize) -> Result<usize, HpkeError> {
    let aead = registry::lookup_aead(suite.aead)?;
    Ok(pt_len + aead.tag_len)
}

/// Uniformly sample one entry from each of the KEM, KDF and AEAD tables.
pub fn random_suite() -> Suite {
    Suite {
        kem: pick_uniform(kem_ids()),
        kdf: pick_uniform(kdf_ids()),
        aead: pick_uniform(aead_ids()),
    }
}

fn pick_uniform(ids: impl Iterator<Item = u16>) -> u16 {
    let pool: Vec<u16> = ids.collect();
    debug_assert!(!pool.is_empty());
    let idx = (OsRng.next_u32() as usize) % pool.len();
    pool[idx]
}

/// Produce a GREASE suite/public-value/ciphertext triple for a decoy ECH
/// extension (RFC 8701 pattern). `suite_in` pins the suite if the caller
/// wants deterministic decoy shape; otherwise one is sampled.
pub fn grease(suite_in: Option<Suite>, ct_len: usize) -> Result<Grease, HpkeError> {
    let suite = match suite_in {
        Some(s) => {
            if !suite_supported(s) {
                return Err(HpkeError::UnsupportedSuite);
            }
            s
        }
        None => random_suite(),
    };
    let kem = registry::lookup_kem(suite.kem)?;
    let mut random_pub = vec![0u8; kem.pub_len];
    OsRng.fill_bytes(&mut random_pub);
    let mut random_ct = vec![0u8; ct_len];
    OsRng.fill_bytes(&mut random_ct);
    Ok(Grease {
        suite,
        random_pub,
        random_ct,
    })
}

struct Mnemonic {
    names: &'static [&'static str],
    id: u16,
}

const KEM_MNEMONICS: &[Mnemonic] = &[
    Mnemonic {
        names: &["p-256", "p256", "secp256r1"],
        id: registry::KEM_P256,
    },
    Mnemonic {
        names: &["p-384", "p384", "secp384r1"],
        id: registry::KEM_P384,
    },
    Mnemonic {
        names: &["p-521", "p521", "secp521r1"],
        id: registry::KEM_P521,
    },
    Mnemonic {
        names: &["x25519"],
        id: registry::KEM_X25519,
    },
    Mnemonic {
        names: &["x448"],
        id: registry::KEM_X448,
    },
];

const KDF_MNEMONICS: &[Mnemonic] = &[
    Mnemonic {
        names: &["sha256", "hkdf-sha256"],
        id: registry::KDF_HKDF_SHA256,
    },
    Mnemonic {
        names: &["sha384", "hkdf-sha384"],
        id: registry::KDF_HKDF_SHA384,
    },
    Mnemonic {
        names: &["sha512", "hkdf-sha512"],
        id: registry::KDF_HKDF_SHA512,
    },
];

const AEAD_MNEMONICS: &[Mnemonic] = &[
    Mnemonic {
        names: &["aes-128-gcm", "aes128gcm"],
        id: registry::AEAD_AES_128_GCM,
    },
    Mnemonic {
        names: &["aes-256-gcm", "aes256gcm"],
        id: registry::AEAD_AES_256_GCM,
    },
    Mnemonic {
        names: &["chacha20poly1305", "chacha20-poly1305"],
        id: registry::AEAD_CHACHA20_POLY1305,
    },
];

fn parse_token(token: &str, mnemonics: &[Mnemonic]) -> Result<u16, HpkeError> {
    let lower = token.trim().to_ascii_lowercase();
    for m in mnemonics {
        if m.names.contains(&lower.as_str()) {
            return Ok(m.id);
        }
    }
    if let Some(hex) = lower.strip_prefix("0x") {
        return u16::from_str_radix(hex, 16).map_err(|_| HpkeError::BadInput);
    }
    lower.parse::<u16>().map_err(|_| HpkeError::BadInput)
}

/// Parse `"kem,kdf,aead"`, where each token is a mnemonic or a
/// decimal/`0x`-prefixed hex codepoint. Matching is case-insensitive;
/// exactly three comma-separated tokens are required.
pub fn suite_parse(s: &str) -> Result<Suite, HpkeError> {
    let tokens: Vec<&str> = s.split(',').collect();
    if tokens.len() != 3 {
        return Err(HpkeError::BadInput);
    }
    let suite = Suite {
        kem: parse_token(tokens[0], KEM_MNEMONICS)?,
        kdf: parse_token(tokens[1], KDF_MNEMONICS)?,
        aead: parse_token(tokens[2], AEAD_MNEMONICS)?,
    };
    if !suite_supported(suite) {
        return Err(HpkeError::UnsupportedSuite);
    }
    Ok(suite)
}

/// Render a suite back to its canonical mnemonic string. Always a valid
/// input to `suite_parse`, and always round-trips: `suite_parse(&suite_format(s)) == Ok(s)`.
pub fn suite_format(suite: Suite) -> String {
    fn canonical(id: u16, mnemonics: &[Mnemonic]) -> String {
        mnemonics
            .iter()
            .find(|m| m.id == id)
            .map(|m| m.names[0].to_string())
            .unwrap_or_else(|| format!("0x{:04x}", id))
    }
    format!(
        "{},{},{}",
        canonical(suite.kem, KEM_MNEMONICS),
        canonical(suite.kdf, KDF_MNEMONICS),
        canonical(suite.aead, AEAD_MNEMONICS)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_mnemonics_and_codepoints_to_the_same_suite() {
        let expected = Suite {
            kem: 0x0010,
            kdf: 0x0001,
            aead: 0x0001,
        };
        assert_eq!(suite_parse("P-256,SHA256,AES-128-GCM").unwrap(), expected);
        assert_eq!(suite_parse("0x10,1,1").unwrap(), expected);
        assert_eq!(suite_parse("16,0x01,1").unwrap(), expected);
    }

    #[test]
    fn rejects_wrong_token_count() {
        assert_eq!(
            suite_parse("P-256,SHA256"),
            Err(HpkeError::BadInput)
        );
    }

    #[test]
    fn rejects_unknown_mnemonic() {
        assert!(suite_parse("made-up,SHA256,AES-128-GCM").is_err());
    }

    #[test]
    fn format_then_parse_round_trips() {
        for suite in [
            Suite { kem: 0x0010, kdf: 0x0001, aead: 0x0001 },
            Suite { kem: 0x0020, kdf: 0x0003, aead: 0x0003 },
            Suite { kem: 0x0012, kdf: 0x0002, aead: 0x0002 },
        ] {
            let formatted = suite_format(suite);
            assert_eq!(suite_parse(&formatted).unwrap(), suite);
        }
    }

    #[test]
    fn expansion_adds_tag_length() {
        let suite = Suite { kem: 0x0020, kdf: 0x0001, aead: 0x0001 };
        assert_eq!(expansion(suite, 100).unwrap(), 116);
    }

    #[test]
    fn grease_output_lengths_match_request() {
        let suite_in = Suite { kem: 0x0020, kdf: 0x0001, aead: 0x0001 };
        let g = grease(Some(suite_in), 48).unwrap();
        assert_eq!(g.random_pub.len(), 32);
        assert_eq!(g.random_ct.len(), 48);
    }

    #[test]
    fn random_suite_is_always_supported() {
        for _ in 0..20 {
            assert!(suite_supported(random_suite()));
        }
    }
}
