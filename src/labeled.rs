//! RFC 9180 `LabeledExtract`/`LabeledExpand` (§4.3).
//!
//! Label concatenation order is exactly version-label, suite-label,
//! codepoint bytes big-endian, caller-label, caller-payload — any
//! deviation here silently breaks interoperability with every other
//! HPKE implementation, so this is the one place in the engine that
//! must not be "simplified".

use crate::error::HpkeError;
use crate::kdf::{self, KdfAlg};
use crate::registry::KemInfo;
use crate::suite::Suite;
use crate::util::{concat, i2osp2};

const VERSION_LABEL: &[u8] = b"HPKE-v1";

/// Which `suite_id` form to use: the narrower "KEM" form used inside the
/// KEM engine's own `ExtractAndExpand`, or the full "HPKE" form used
/// everywhere else (key schedule, key import).
#[derive(Debug, Clone, Copy)]
pub(crate) enum SuiteId {
    Kem(u16),
    Hpke(Suite),
}

impl SuiteId {
    fn encode(self) -> Vec<u8> {
        match self {
            SuiteId::Kem(kem_id) => concat(&[b"KEM", &i2osp2(kem_id)]),
            SuiteId::Hpke(suite) => concat(&[
                b"HPKE",
                &i2osp2(suite.kem),
                &i2osp2(suite.kdf),
                &i2osp2(suite.aead),
            ]),
        }
    }
}

/// A labeled-KDF context bound to one suite_id and one hash.
pub(crate) struct LabeledKdf {
    hash: KdfAlg,
    suite_id: Vec<u8>,
}

impl LabeledKdf {
    pub(crate) fn for_kem(kem: &KemInfo) -> Self {
        Self {
            hash: kem_hash_kdf(kem),
            suite_id: SuiteId::Kem(kem.id).encode(),
        }
    }

    pub(crate) fn for_hpke(suite: Suite, hash: KdfAlg) -> Self {
        Self {
            hash,
            suite_id: SuiteId::Hpke(suite).encode(),
        }
    }

    /// `LabeledExtract(salt, label, ikm) = HKDF-Extract(salt, "HPKE-v1" ||
    /// suite_id || label || ikm)`
    pub(crate) fn labeled_extract(&self, salt: &[u8], label: &str, ikm: &[u8]) -> Vec<u8> {
        let labeled_ikm = concat(&[VERSION_LABEL, &self.suite_id, label.as_bytes(), ikm]);
        kdf::extract(self.hash, salt, &labeled_ikm)
    }

    /// `LabeledExpand(prk, label, info, L) = HKDF-Expand(prk, I2OSP(L,2) ||
    /// "HPKE-v1" || suite_id || label || info, L)`
    pub(crate) fn labeled_expand(
        &self,
        prk: &[u8],
        label: &str,
        info: &[u8],
        len: usize,
    ) -> Result<Vec<u8>, HpkeError> {
        let labeled_info = concat(&[
            &i2osp2(len as u16),
            VERSION_LABEL,
            &self.suite_id,
            label.as_bytes(),
            info,
        ]);
        kdf::expand(self.hash, prk, &labeled_info, len)
    }
}

/// The KEM's own `ExtractAndExpand` hash is the KEM's registered hash,
/// not the suite's KDF.
fn kem_hash_kdf(kem: &KemInfo) -> KdfAlg {
    use crate::registry::HashAlg;
    match kem.hash {
        HashAlg::Sha256 => KdfAlg::HkdfSha256,
        HashAlg::Sha384 => KdfAlg::HkdfSha384,
        HashAlg::Sha512 => KdfAlg::HkdfSha512,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::lookup_kem;

    #[test]
    fn kem_suite_id_is_kem_prefixed() {
        let kem = lookup_kem(crate::registry::KEM_X25519).unwrap();
        let l = LabeledKdf::for_kem(kem);
        assert_eq!(l.suite_id, concat(&[b"KEM", &i2osp2(0x0020)]));
    }

    #[test]
    fn hpke_suite_id_concatenates_all_three_codepoints() {
        let suite = Suite {
            kem: 0x0020,
            kdf: 0x0001,
            aead: 0x0001,
        };
        let l = LabeledKdf::for_hpke(suite, KdfAlg::HkdfSha256);
        assert_eq!(
            l.suite_id,
            concat(&[b"HPKE", &i2osp2(0x0020), &i2osp2(0x0001), &i2osp2(0x0001)])
        );
    }

    #[test]
    fn labeled_expand_respects_requested_length() {
        let suite = Suite {
            kem: 0x0020,
            kdf: 0x0001,
            aead: 0x0001,
        };
        let l = LabeledKdf::for_hpke(suite, KdfAlg::HkdfSha256);
        let prk = l.labeled_extract(b"", "secret", b"ikm");
        let out = l.labeled_expand(&prk, "key", b"ctx", 16).unwrap();
        assert_eq!(out.len(), 16);
    }
}
