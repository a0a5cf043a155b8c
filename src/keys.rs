//! Key handles (§3). A `KeyPair` is exclusively owned by its creator;
//! dropping it zeroises the private scalar. Public keys travel as plain
//! byte vectors — there's nothing sensitive in them.

use zeroize::{Zeroize, ZeroizeOnDrop};

/// An HPKE public key, RFC 9180 byte-exact (uncompressed SEC1 for NIST
/// curves, fixed-length little-endian for X25519/X448).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey(pub(crate) Vec<u8>);

impl PublicKey {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for PublicKey {
    fn from(v: Vec<u8>) -> Self {
        Self(v)
    }
}

/// An HPKE private key handle. Zeroised on drop.
#[derive(Debug, Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey(Vec<u8>);

impl PrivateKey {
    pub(crate) fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// A generated or imported key pair. Exclusively owned by its creator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPair {
    pub private_key: PrivateKey,
    pub public_key: PublicKey,
}

impl KeyPair {
    pub(crate) fn new(priv_bytes: Vec<u8>, pub_bytes: Vec<u8>) -> Self {
        Self {
            private_key: PrivateKey::new(priv_bytes),
            public_key: PublicKey(pub_bytes),
        }
    }
}
