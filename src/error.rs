//! Custom error type definitions.

use thiserror::Error;

/// Errors that may arise when constructing names or parsing key material.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Invalid name length: must be smaller than 255, is {0}.")]
    NameTooLong(usize),

    #[error("Invalid label length in name: must be smaller than 64, is {0}.")]
    LabelTooLong(usize),

    #[error("Invalid name: labels must contain only a-z, A-Z, 0-9, underscores, and hyphens, and must not start or end with a hyphen.")]
    NameInvalidChars,

    #[error("Invalid name: contains an empty label.")]
    EmptyLabel,

    #[error("Invalid DNSSEC algorithm: {0}.")]
    InvalidAlgorithm(String),

    #[error("Truncated type bitmap.")]
    TruncatedBitmap,
}

/// Errors that may arise during encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("Tried to encode non-ASCII string: {0}.")]
    NonAsciiString(String),

    #[error("IO error.")]
    IoError(#[from] std::io::Error),
}

/// Errors that may arise during DNSSEC signing and validation.
///
/// These stem either from incorrect usage (e.g. trying to sign with a key whose
/// algorithm is not supported) or are actual validation errors (e.g. the
/// signature has expired).
#[derive(Debug, Error)]
pub enum DnssecError {
    #[error("Unsupported DNSSEC algorithm: {0}.")]
    UnsupportedAlgorithm(String),

    #[error("The RRSIG signature has expired.")]
    SignatureExpired,

    #[error("The RRSIG signature is not valid yet.")]
    SignatureNotYetValid,

    #[error("No DNSKEY set is known for the RRSIG's signer name.")]
    UnknownKey,

    #[error("The signature did not verify under any candidate key.")]
    VerifyFailure,

    #[error("No RRSIGs validated.")]
    NoRrsigsValidated,

    #[error("The record set's owner differs from the signature set's owner.")]
    OwnerMismatch,

    #[error("Could not parse the DNSKEY public key data.")]
    MalformedKey,

    #[error("Could not parse the RRSIG signature data.")]
    MalformedSignature,

    #[error("Malformed private key: {0}.")]
    MalformedPrivateKey(String),

    #[error("Key generation failed.")]
    KeyGeneration,

    #[error("Signing failed: the private key rejected the digest.")]
    SigningFailed,

    #[error("Two owner names hash to the same NSEC3 owner digest.")]
    Nsec3Collision,

    #[error("The zone has no SOA record set at its origin.")]
    NoSoa,

    #[error("Error assembling a DNS name.")]
    Name(#[from] ParseError),

    #[error("Encoding during signing or validation failed.")]
    Encoding(#[from] EncodeError),
}
