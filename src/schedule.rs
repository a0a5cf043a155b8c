//! Key Schedule (§4.5): derives `(key, base_nonce, exporter_secret)` from
//! the KEM's shared secret, the mode, and the optional PSK.

use zeroize::Zeroizing;

use crate::error::HpkeError;
use crate::kdf::KdfAlg;
use crate::labeled::LabeledKdf;
use crate::mode::Mode;
use crate::registry::{self, AeadInfo, KdfInfo};
use crate::suite::Suite;
use crate::util::concat;

/// `(key, base_nonce, exporter_secret)`, all zeroised on drop.
#[derive(Debug)]
pub(crate) struct KeyScheduleOutput {
    pub(crate) key: Zeroizing<Vec<u8>>,
    pub(crate) base_nonce: Zeroizing<Vec<u8>>,
    #[allow(dead_code)] // part of the RFC 9180 data model; no exporter op is exposed yet
    pub(crate) exporter_secret: Zeroizing<Vec<u8>>,
}

/// §4.5 PSK validation: in PSK/PSK_AUTH mode both `psk_id` and `psk` must
/// be non-empty; in BASE/AUTH they must both be empty.
fn verify_psk_inputs(mode: Mode, psk: &[u8], psk_id: &[u8]) -> Result<(), HpkeError> {
    let got_psk = !psk.is_empty();
    let got_psk_id = !psk_id.is_empty();
    if got_psk != got_psk_id {
        return Err(HpkeError::BadPskUsage);
    }
    if got_psk && !mode.uses_psk() {
        return Err(HpkeError::BadPskUsage);
    }
    if !got_psk && mode.uses_psk() {
        return Err(HpkeError::BadPskUsage);
    }
    Ok(())
}

fn kdf_alg_for(kdf: &KdfInfo) -> KdfAlg {
    KdfAlg::from_id(kdf.id).expect("registry KdfInfo always maps to a KdfAlg")
}

pub(crate) fn key_schedule(
    mode: Mode,
    suite: Suite,
    shared_secret: &[u8],
    info: &[u8],
    psk: &[u8],
    psk_id: &[u8],
) -> Result<KeyScheduleOutput, HpkeError> {
    verify_psk_inputs(mode, psk, psk_id)?;

    let kdf: &'static KdfInfo = registry::lookup_kdf(suite.kdf)?;
    let aead: &'static AeadInfo = registry::lookup_aead(suite.aead)?;
    let labeled = LabeledKdf::for_hpke(suite, kdf_alg_for(kdf));

    let psk_id_hash = labeled.labeled_extract(b"", "psk_id_hash", psk_id);
    let info_hash = labeled.labeled_extract(b"", "info_hash", info);
    let key_schedule_context = concat(&[&[mode.byte()], &psk_id_hash, &info_hash]);

    let secret = Zeroizing::new(labeled.labeled_extract(shared_secret, "secret", psk));

    let key = labeled.labeled_expand(&secret, "key", &key_schedule_context, aead.key_len)?;
    let base_nonce =
        labeled.labeled_expand(&secret, "base_nonce", &key_schedule_context, aead.nonce_len)?;
    let exporter_secret =
        labeled.labeled_expand(&secret, "exp", &key_schedule_context, kdf.hash_len)?;

    Ok(KeyScheduleOutput {
        key: Zeroizing::new(key),
        base_nonce: Zeroizing::new(base_nonce),
        exporter_secret: Zeroizing::new(exporter_secret),
    })
}
