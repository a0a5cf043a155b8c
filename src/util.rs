//! Small byte-plumbing helpers shared by the labeled KDF, key schedule and
//! single-shot seal/open.

/// Concatenate a list of byte slices into one owned buffer.
pub(crate) fn concat(parts: &[&[u8]]) -> Vec<u8> {
    let mut out = Vec::with_capacity(parts.iter().map(|p| p.len()).sum());
    for p in parts {
        out.extend_from_slice(p);
    }
    out
}

/// `I2OSP(x, 2)`: big-endian two-byte encoding of a length, as used by
/// `LabeledExpand`.
pub(crate) fn i2osp2(x: u16) -> [u8; 2] {
    x.to_be_bytes()
}

/// XOR `nonce` with `seq` right-aligned to `nonce`'s length, zero-extended
/// on the left. `seq` must not be longer than `nonce`.
pub(crate) fn xor_seq_into_nonce(base_nonce: &[u8], seq: &[u8]) -> Vec<u8> {
    debug_assert!(seq.len() <= base_nonce.len());
    let mut out = base_nonce.to_vec();
    let offset = out.len() - seq.len();
    for (i, b) in seq.iter().enumerate() {
        out[offset + i] ^= b;
    }
    out
}
