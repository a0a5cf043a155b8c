//! Static algorithm tables mapping IANA HPKE codepoints to the parameters
//! the rest of the engine needs. Tables are immutable process-wide data;
//! index 0 of every table is reserved as "unknown" and is never a valid
//! lookup result (see DESIGN.md, "sentinel-zero codepoints").

use crate::error::HpkeError;

/// Parameters for one registered KEM.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KemInfo {
    pub id: u16,
    pub name: &'static str,
    /// Nsecret: length of the KEM shared secret.
    pub secret_len: usize,
    /// Nenc: length of the encapsulated key.
    pub enc_len: usize,
    /// Npk: length of an encoded public key.
    pub pub_len: usize,
    /// Npriv: length of an encoded private key.
    pub priv_len: usize,
    /// Hash used by the KEM's internal ExtractAndExpand.
    pub hash: HashAlg,
    /// Uncompressed SEC1 NIST-curve point encoding vs. fixed-length
    /// Montgomery-curve encoding.
    pub is_nist_curve: bool,
}

/// Parameters for one registered KDF.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfInfo {
    pub id: u16,
    pub name: &'static str,
    pub hash: HashAlg,
    /// Nh: hash output length.
    pub hash_len: usize,
}

/// Parameters for one registered AEAD.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AeadInfo {
    pub id: u16,
    pub name: &'static str,
    /// Nk: key length.
    pub key_len: usize,
    /// Nn: nonce length.
    pub nonce_len: usize,
    /// Tag length. Fixed at 16 for every registered AEAD; §3 requires
    /// rejecting any table entry that would drift from this.
    pub tag_len: usize,
}

/// The hash function backing a KEM or KDF.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashAlg {
    Sha256,
    Sha384,
    Sha512,
}

pub const KEM_P256: u16 = 0x0010;
pub const KEM_P384: u16 = 0x0011;
pub const KEM_P521: u16 = 0x0012;
pub const KEM_X25519: u16 = 0x0020;
pub const KEM_X448: u16 = 0x0021;

pub const KDF_HKDF_SHA256: u16 = 0x0001;
pub const KDF_HKDF_SHA384: u16 = 0x0002;
pub const KDF_HKDF_SHA512: u16 = 0x0003;

pub const AEAD_AES_128_GCM: u16 = 0x0001;
pub const AEAD_AES_256_GCM: u16 = 0x0002;
pub const AEAD_CHACHA20_POLY1305: u16 = 0x0003;

const KEM_TABLE: &[KemInfo] = &[
    KemInfo {
        id: KEM_P256,
        name: "DHKEM(P-256, HKDF-SHA256)",
        secret_len: 32,
        enc_len: 65,
        pub_len: 65,
        priv_len: 32,
        hash: HashAlg::Sha256,
        is_nist_curve: true,
    },
    KemInfo {
        id: KEM_P384,
        name: "DHKEM(P-384, HKDF-SHA384)",
        secret_len: 48,
        enc_len: 97,
        pub_len: 97,
        priv_len: 48,
        hash: HashAlg::Sha384,
        is_nist_curve: true,
    },
    KemInfo {
        id: KEM_P521,
        name: "DHKEM(P-521, HKDF-SHA512)",
        secret_len: 64,
        enc_len: 133,
        pub_len: 133,
        priv_len: 66,
        hash: HashAlg::Sha512,
        is_nist_curve: true,
    },
    KemInfo {
        id: KEM_X25519,
        name: "DHKEM(X25519, HKDF-SHA256)",
        secret_len: 32,
        enc_len: 32,
        pub_len: 32,
        priv_len: 32,
        hash: HashAlg::Sha256,
        is_nist_curve: false,
    },
    KemInfo {
        id: KEM_X448,
        name: "DHKEM(X448, HKDF-SHA512)",
        secret_len: 64,
        enc_len: 56,
        pub_len: 56,
        priv_len: 56,
        hash: HashAlg::Sha512,
        is_nist_curve: false,
    },
];

const KDF_TABLE: &[KdfInfo] = &[
    KdfInfo {
        id: KDF_HKDF_SHA256,
        name: "HKDF-SHA256",
        hash: HashAlg::Sha256,
        hash_len: 32,
    },
    KdfInfo {
        id: KDF_HKDF_SHA384,
        name: "HKDF-SHA384",
        hash: HashAlg::Sha384,
        hash_len: 48,
    },
    KdfInfo {
        id: KDF_HKDF_SHA512,
        name: "HKDF-SHA512",
        hash: HashAlg::Sha512,
        hash_len: 64,
    },
];

const AEAD_TABLE: &[AeadInfo] = &[
    AeadInfo {
        id: AEAD_AES_128_GCM,
        name: "AES-128-GCM",
        key_len: 16,
        nonce_len: 12,
        tag_len: 16,
    },
    AeadInfo {
        id: AEAD_AES_256_GCM,
        name: "AES-256-GCM",
        key_len: 32,
        nonce_len: 12,
        tag_len: 16,
    },
    AeadInfo {
        id: AEAD_CHACHA20_POLY1305,
        name: "ChaCha20Poly1305",
        key_len: 32,
        nonce_len: 12,
        tag_len: 16,
    },
];

/// Look up a KEM by its IANA codepoint. Codepoint 0 is the reserved
/// sentinel and always fails.
pub fn lookup_kem(id: u16) -> Result<&'static KemInfo, HpkeError> {
    KEM_TABLE
        .iter()
        .find(|k| k.id == id)
        .ok_or(HpkeError::UnsupportedSuite)
}

/// Look up a KDF by its IANA codepoint.
pub fn lookup_kdf(id: u16) -> Result<&'static KdfInfo, HpkeError> {
    KDF_TABLE
        .iter()
        .find(|k| k.id == id)
        .ok_or(HpkeError::UnsupportedSuite)
}

/// Look up an AEAD by its IANA codepoint.
pub fn lookup_aead(id: u16) -> Result<&'static AeadInfo, HpkeError> {
    let info = AEAD_TABLE
        .iter()
        .find(|a| a.id == id)
        .ok_or(HpkeError::UnsupportedSuite)?;
    // Every registered AEAD must carry a 16-byte tag; a table entry that
    // drifted from this would silently break `expansion()`.
    debug_assert_eq!(info.tag_len, 16);
    Ok(info)
}

/// All registered KEM ids, in table order. Index 0 is reserved and is
/// never returned by `random_suite`/`grease`.
pub(crate) fn kem_ids() -> impl Iterator<Item = u16> {
    KEM_TABLE.iter().map(|k| k.id)
}

pub(crate) fn kdf_ids() -> impl Iterator<Item = u16> {
    KDF_TABLE.iter().map(|k| k.id)
}

pub(crate) fn aead_ids() -> impl Iterator<Item = u16> {
    AEAD_TABLE.iter().map(|a| a.id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_codepoints_are_rejected() {
        assert_eq!(lookup_kem(0), Err(HpkeError::UnsupportedSuite));
        assert_eq!(lookup_kdf(0), Err(HpkeError::UnsupportedSuite));
        assert_eq!(lookup_aead(0), Err(HpkeError::UnsupportedSuite));
        assert_eq!(lookup_kem(0xffff), Err(HpkeError::UnsupportedSuite));
    }

    #[test]
    fn known_codepoints_resolve() {
        assert_eq!(lookup_kem(KEM_X25519).unwrap().secret_len, 32);
        assert_eq!(lookup_kdf(KDF_HKDF_SHA256).unwrap().hash_len, 32);
        assert_eq!(lookup_aead(AEAD_AES_128_GCM).unwrap().key_len, 16);
    }

    #[test]
    fn all_aeads_have_a_16_byte_tag() {
        for id in aead_ids() {
            assert_eq!(lookup_aead(id).unwrap().tag_len, 16);
        }
    }
}
