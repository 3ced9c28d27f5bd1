//! Cryptographic primitives behind RRSIG signing and verification.
//!
//! The rest of the crate hands this module raw digests and algorithm numbers; key parsing
//! (RFC 3110 for RSA, RFC 2536 for DSA), PKCS#1 v1.5 DigestInfo construction, and the actual
//! modular arithmetic live here.

use dsa::signature::hazmat::PrehashVerifier;
use num_bigint_dig::BigUint;
use rsa::{Pkcs1v15Sign, RsaPrivateKey, RsaPublicKey};
use sha1::{Digest, Sha1};
use sha2::{Sha256, Sha512};

use crate::error::DnssecError;
use crate::rdata::dnskey::Algorithm;

/// DigestInfo prefix for SHA-1, i.e. the DER encoding of the AlgorithmIdentifier and the OCTET
/// STRING header that precede the raw digest in PKCS#1 v1.5 signatures (RFC 3110, RFC 8017).
const SHA1_DIGEST_INFO: [u8; 15] = [
    0x30, 0x21, 0x30, 0x09, 0x06, 0x05, 0x2b, 0x0e, 0x03, 0x02, 0x1a, 0x05, 0x00, 0x04, 0x14,
];

/// DigestInfo prefix for SHA-256 (RFC 5702).
const SHA256_DIGEST_INFO: [u8; 19] = [
    0x30, 0x31, 0x30, 0x0d, 0x06, 0x09, 0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04, 0x02, 0x01,
    0x05, 0x00, 0x04, 0x20,
];

/// DigestInfo prefix for SHA-512 (RFC 5702).
const SHA512_DIGEST_INFO: [u8; 19] = [
    0x30, 0x51, 0x30, 0x0d, 0x06, 0x09, 0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04, 0x02, 0x03,
    0x05, 0x00, 0x04, 0x40,
];

/// Returns true iff the given algorithm signs with RSA.
pub(crate) fn is_rsa(algorithm: Algorithm) -> bool {
    matches!(
        algorithm,
        Algorithm::RSASHA1
            | Algorithm::RSASHA1NSEC3SHA1
            | Algorithm::RSASHA256
            | Algorithm::RSASHA512
    )
}

/// Returns true iff the given algorithm signs with DSA.
pub(crate) fn is_dsa(algorithm: Algorithm) -> bool {
    matches!(algorithm, Algorithm::DSA | Algorithm::DSANSEC3SHA1)
}

/// Hashes `data` with the hash function the given signing algorithm uses.
pub(crate) fn digest(algorithm: Algorithm, data: &[u8]) -> Result<Vec<u8>, DnssecError> {
    match algorithm {
        Algorithm::DSA
        | Algorithm::RSASHA1
        | Algorithm::DSANSEC3SHA1
        | Algorithm::RSASHA1NSEC3SHA1 => Ok(Sha1::digest(data).to_vec()),
        Algorithm::RSASHA256 => Ok(Sha256::digest(data).to_vec()),
        Algorithm::RSASHA512 => Ok(Sha512::digest(data).to_vec()),
        other => Err(DnssecError::UnsupportedAlgorithm(other.to_text())),
    }
}

/// Returns the PKCS#1 v1.5 signature scheme for the given RSA algorithm, carrying the DigestInfo
/// prefix that gets prepended to the raw digest before type-1 padding.
fn pkcs1v15_padding(algorithm: Algorithm) -> Result<Pkcs1v15Sign, DnssecError> {
    let (prefix, digest_len): (&[u8], usize) = match algorithm {
        Algorithm::RSASHA1 | Algorithm::RSASHA1NSEC3SHA1 => (&SHA1_DIGEST_INFO, 20),
        Algorithm::RSASHA256 => (&SHA256_DIGEST_INFO, 32),
        Algorithm::RSASHA512 => (&SHA512_DIGEST_INFO, 64),
        other => return Err(DnssecError::UnsupportedAlgorithm(other.to_text())),
    };

    Ok(Pkcs1v15Sign {
        hash_len: Some(digest_len),
        prefix: prefix.into(),
    })
}

/// Parses an RSA public key from its DNSKEY representation (RFC 3110): a one-octet exponent
/// length (or a zero octet followed by a two-octet length), the exponent, and the modulus.
pub(crate) fn parse_rsa_key(key: &[u8]) -> Result<RsaPublicKey, DnssecError> {
    if key.is_empty() {
        return Err(DnssecError::MalformedKey);
    }

    let (exponent_len, offset) = if key[0] != 0 {
        (key[0] as usize, 1)
    } else {
        if key.len() < 3 {
            return Err(DnssecError::MalformedKey);
        }
        (u16::from_be_bytes([key[1], key[2]]) as usize, 3)
    };

    // the modulus must not be empty
    if key.len() <= offset + exponent_len {
        return Err(DnssecError::MalformedKey);
    }

    let e = BigUint::from_bytes_be(&key[offset..offset + exponent_len]);
    let n = BigUint::from_bytes_be(&key[offset + exponent_len..]);

    RsaPublicKey::new(n, e).map_err(|_| DnssecError::MalformedKey)
}

/// Verifies an RSA signature over the given message digest against a DNSKEY-format public key.
pub(crate) fn verify_rsa(
    algorithm: Algorithm,
    key: &[u8],
    digest: &[u8],
    signature: &[u8],
) -> Result<(), DnssecError> {
    let pubkey = parse_rsa_key(key)?;
    let padding = pkcs1v15_padding(algorithm)?;
    pubkey
        .verify(padding, digest, signature)
        .map_err(|_| DnssecError::VerifyFailure)
}

/// Verifies a DSA signature over the given message digest against a DNSKEY-format public key.
///
/// The key layout is defined by RFC 2536: a one-octet size parameter T, then q (20 octets) and
/// p, g, y of 64 + 8·T octets each. The signature is a one-octet T followed by r and s (20
/// octets each).
pub(crate) fn verify_dsa(key: &[u8], digest: &[u8], signature: &[u8]) -> Result<(), DnssecError> {
    if key.is_empty() {
        return Err(DnssecError::MalformedKey);
    }
    let t = key[0] as usize;
    let octets = 64 + 8 * t;
    if key.len() < 1 + 20 + 3 * octets {
        return Err(DnssecError::MalformedKey);
    }

    let q = BigUint::from_bytes_be(&key[1..21]);
    let p = BigUint::from_bytes_be(&key[21..21 + octets]);
    let g = BigUint::from_bytes_be(&key[21 + octets..21 + 2 * octets]);
    let y = BigUint::from_bytes_be(&key[21 + 2 * octets..21 + 3 * octets]);

    if signature.len() != 41 {
        return Err(DnssecError::MalformedSignature);
    }
    let r = BigUint::from_bytes_be(&signature[1..21]);
    let s = BigUint::from_bytes_be(&signature[21..41]);

    let components =
        dsa::Components::from_components(p, q, g).map_err(|_| DnssecError::MalformedKey)?;
    let pubkey =
        dsa::VerifyingKey::from_components(components, y).map_err(|_| DnssecError::MalformedKey)?;
    let sig =
        dsa::Signature::from_components(r, s).map_err(|_| DnssecError::MalformedSignature)?;

    pubkey
        .verify_prehash(digest, &sig)
        .map_err(|_| DnssecError::VerifyFailure)
}

/// Produces an RSA PKCS#1 v1.5 signature over the given message digest.
pub(crate) fn sign_rsa(
    algorithm: Algorithm,
    key: &RsaPrivateKey,
    digest: &[u8],
) -> Result<Vec<u8>, DnssecError> {
    let padding = pkcs1v15_padding(algorithm)?;
    key.sign(padding, digest)
        .map_err(|_| DnssecError::SigningFailed)
}
