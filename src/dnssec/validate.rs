//! RRSIG validation.

use std::collections::BTreeMap;

use chrono::Utc;

use crate::error::DnssecError;
use crate::name::Name;
use crate::rdata::dnskey::DNSKEY;
use crate::rdata::rrsig::RRSIG;
use crate::zone::Rrset;

use super::{crypto, sign};

/// The DNSKEY sets a validator trusts, keyed by their owner name (the signer name the RRSIGs
/// refer to).
pub type KeyMap = BTreeMap<Name, Vec<DNSKEY>>;

/// Returns the keys from the signer's DNSKEY set whose algorithm and key tag match the RRSIG.
///
/// Returns [`None`] when no DNSKEY set is known for the signer at all.
fn find_candidate_keys<'a>(keys: &'a KeyMap, rrsig: &RRSIG) -> Option<Vec<&'a DNSKEY>> {
    let rdataset = keys.get(&rrsig.signer_name)?;
    Some(
        rdataset
            .iter()
            .filter(|key| {
                key.algorithm == rrsig.algorithm && key.key_tag().ok() == Some(rrsig.key_tag)
            })
            .collect(),
    )
}

/// Validates a record set against a single signature.
///
/// The owner name of the signature is assumed to be the same as the owner name of the record
/// set; wildcard expansions are undone based on the RRSIG's labels field. `now` is the validation
/// time and defaults to the current time.
///
/// A failure of one candidate key (malformed key data, wrong signature) does not abort the scan;
/// the error is returned only when no candidate verifies the signature.
pub fn validate_rrsig(
    owner: &Name,
    rrset: &Rrset,
    rrsig: &RRSIG,
    keys: &KeyMap,
    now: Option<u32>,
) -> Result<(), DnssecError> {
    let candidates = find_candidate_keys(keys, rrsig).ok_or(DnssecError::UnknownKey)?;

    let now = now.unwrap_or_else(|| Utc::now().timestamp() as u32);
    if rrsig.signature_expiration < now {
        return Err(DnssecError::SignatureExpired);
    }
    if rrsig.signature_inception > now {
        return Err(DnssecError::SignatureNotYetValid);
    }

    if !crypto::is_rsa(rrsig.algorithm) && !crypto::is_dsa(rrsig.algorithm) {
        return Err(DnssecError::UnsupportedAlgorithm(rrsig.algorithm.to_text()));
    }

    let data = sign::signed_data(owner, rrset, rrsig)?;
    let digest = crypto::digest(rrsig.algorithm, &data)?;

    for key in candidates {
        let verified = if crypto::is_rsa(rrsig.algorithm) {
            crypto::verify_rsa(rrsig.algorithm, &key.key, &digest, &rrsig.signature)
        } else {
            crypto::verify_dsa(&key.key, &digest, &rrsig.signature)
        };
        if verified.is_ok() {
            return Ok(());
        }
    }

    Err(DnssecError::VerifyFailure)
}

/// Validates a record set against a signature set.
///
/// `owner` is the record set's owner, `sig_owner` the signature set's; the two must name the
/// same node. Validation succeeds as soon as one signature of the set validates, and fails with
/// [`DnssecError::NoRrsigsValidated`] when none does.
pub fn validate(
    owner: &Name,
    rrset: &Rrset,
    sig_owner: &Name,
    rrsigs: &[RRSIG],
    keys: &KeyMap,
    now: Option<u32>,
) -> Result<(), DnssecError> {
    if owner != sig_owner {
        return Err(DnssecError::OwnerMismatch);
    }

    for rrsig in rrsigs {
        if validate_rrsig(owner, rrset, rrsig, keys, now).is_ok() {
            return Ok(());
        }
    }
    Err(DnssecError::NoRrsigsValidated)
}
