//! `DNSKEY` RDATA definition.

use std::fmt::Display;
use std::io::Write;
use std::str::FromStr;

use byteorder::{NetworkEndian, WriteBytesExt};
use data_encoding::BASE64;
use repr_with_fallback::repr_with_fallback;
use strum_macros::EnumString;

use crate::error::{DnssecError, EncodeError, ParseError};

use super::RdataTrait;

#[cfg(feature = "serde")]
use serde::Serialize;

repr_with_fallback! {
    /// Algorithms for use in zone signing.
    ///
    /// See <https://www.iana.org/assignments/dns-sec-alg-numbers/dns-sec-alg-numbers.xhtml> for the
    /// official list. The variant names are the IANA mnemonics, so they double as the text form of
    /// the algorithm (see [`Algorithm::from_text()`]).
    #[cfg_attr(feature = "serde", derive(Serialize))]
    #[derive(PartialEq, Eq, Copy, Clone, EnumString, Debug)]
    #[non_exhaustive]
    #[allow(non_camel_case_types)]
    pub enum Algorithm {
        /// DON'T USE THIS! MD5 is broken, and this is only provided so the number maps to its
        /// mnemonic. Key tags for RSAMD5 keys are computed differently and are not supported.
        RSAMD5 = 1,
        /// Diffie-Hellman [\[RFC 2539\]](https://www.rfc-editor.org/rfc/rfc2539); not a zone
        /// signing algorithm.
        DH = 2,
        /// DON'T USE THIS! DSA is not considered secure anymore, and this is only provided for
        /// compatibility. Verify-only.
        DSA = 3,
        /// DON'T USE THIS! SHA1 is not considered secure anymore, and this is only provided for
        /// compatibility.
        RSASHA1 = 5,
        /// DON'T USE THIS! DSA and SHA1 are not considered secure anymore, and this is only
        /// provided for compatibility. Verify-only.
        DSANSEC3SHA1 = 6,
        /// DON'T USE THIS! SHA1 is not considered secure anymore, and this is only provided for
        /// compatibility.
        RSASHA1NSEC3SHA1 = 7,
        /// RSA with SHA256 [\[RFC 5702\]](https://www.rfc-editor.org/rfc/rfc5702)
        RSASHA256 = 8,
        /// RSA with SHA512 [\[RFC 5702\]](https://www.rfc-editor.org/rfc/rfc5702)
        RSASHA512 = 10,
        /// GOST R 34.10-2001 [\[RFC 5933\]](https://www.rfc-editor.org/rfc/rfc5933); recognised
        /// but not supported for signing or verification.
        ECCGOST = 12,
        /// ECDSA Curve P-256 with SHA-256 [\[RFC 6605\]](https://www.rfc-editor.org/rfc/rfc6605);
        /// recognised but not supported for signing or verification.
        ECDSAP256SHA256 = 13,
        /// ECDSA Curve P-384 with SHA-384 [\[RFC 6605\]](https://www.rfc-editor.org/rfc/rfc6605);
        /// recognised but not supported for signing or verification.
        ECDSAP384SHA384 = 14,
        /// Reserved for indirect keys. [\[RFC 4034\]](https://www.rfc-editor.org/rfc/rfc4034)
        INDIRECT = 252,
        /// Private algorithm, keyed by domain name.
        /// [\[RFC 4034\]](https://www.rfc-editor.org/rfc/rfc4034)
        PRIVATEDNS = 253,
        /// Private algorithm, keyed by OID. [\[RFC 4034\]](https://www.rfc-editor.org/rfc/rfc4034)
        PRIVATEOID = 254,
        Unassigned(u8), // 0, 4, 9, 11, 15-251, 255 (some of these values have been assigned
                        // to algorithms this crate does not know about, but we treat them as
                        // Unassigned)
    }
}

impl Algorithm {
    /// Converts the text form of an algorithm into an `Algorithm`.
    ///
    /// The IANA mnemonics are recognised case-insensitively; any other text is parsed as a
    /// decimal algorithm number.
    ///
    /// # Examples
    /// ```rust
    /// use zonesign::dnssec::Algorithm;
    ///
    /// assert_eq!(Algorithm::from_text("RSASHA256").ok(), Some(Algorithm::RSASHA256));
    /// assert_eq!(Algorithm::from_text("rsasha1nsec3sha1").ok(), Some(Algorithm::RSASHA1NSEC3SHA1));
    /// assert_eq!(Algorithm::from_text("8").ok(), Some(Algorithm::RSASHA256));
    /// assert_eq!(Algorithm::from_text("200").ok(), Some(Algorithm::Unassigned(200)));
    /// assert!(Algorithm::from_text("NOT-AN-ALGORITHM").is_err());
    /// ```
    pub fn from_text(text: impl AsRef<str>) -> Result<Self, ParseError> {
        let text = text.as_ref().to_ascii_uppercase();
        if let Ok(algorithm) = Self::from_str(&text) {
            return Ok(algorithm);
        }
        text.parse::<u8>()
            .map(Self::from)
            .map_err(|_| ParseError::InvalidAlgorithm(text))
    }

    /// Converts an `Algorithm` into its text form: the IANA mnemonic, or the decimal algorithm
    /// number for values without one.
    ///
    /// # Examples
    /// ```rust
    /// use zonesign::dnssec::Algorithm;
    ///
    /// assert_eq!(Algorithm::RSASHA512.to_text(), "RSASHA512");
    /// assert_eq!(Algorithm::Unassigned(200).to_text(), "200");
    /// ```
    pub fn to_text(self) -> String {
        match self {
            Self::Unassigned(value) => value.to_string(),
            _ => format!("{:?}", self),
        }
    }
}

/// A record containing the public key used to sign record sets of the zone.
/// [\[RFC 4034\]](https://www.rfc-editor.org/rfc/rfc4034)
#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct DNSKEY {
    /// Indicates whether this key is used to sign record sets (flag bit 0x0100).
    pub zone: bool,
    /// A key is considered revoked when the resolver sees the key in a self-signed record set and
    /// the key has this set to true. [\[RFC 5011\]](https://www.rfc-editor.org/rfc/rfc5011)
    pub revoked: bool,
    /// Indicates whether this key is a key signing key, i.e. used to sign the key(s) that sign
    /// record sets (flag bit 0x0001).
    pub secure_entry_point: bool,

    // the wire format also contains a "Protocol" field, but that must always be 3 (see
    // https://www.iana.org/assignments/dns-key-rr/dns-key-rr.xhtml), so we don't store it
    // explicitly
    /// The public key's cryptographic algorithm; determines the format of [`Self::key`].
    pub algorithm: Algorithm,
    /// The public key material, in the algorithm-specific format (RFC 3110 for RSA, RFC 2536 for
    /// DSA).
    pub key: Vec<u8>,
}

impl DNSKEY {
    /// Calculates this key's key tag. Key tags are used in [`RRSIG`](super::RRSIG) and
    /// [`DS`](super::DS) records to "help select the corresponding `DNSKEY` record efficiently when
    /// more than one candidate `DNSKEY` record is available."
    /// [\[RFC 4034\]](https://www.rfc-editor.org/rfc/rfc4034)
    ///
    /// Returns an error for [`Algorithm::RSAMD5`], whose key tag is defined differently for
    /// historical reasons and is not supported.
    ///
    /// # Note from [RFC 4034](https://www.rfc-editor.org/rfc/rfc4034)
    /// However, it is essential to note that the key tag is not a unique identifier. It is
    /// theoretically possible for two distinct `DNSKEY` records to have the same owner name, the
    /// same algorithm, and the same key tag. The key tag is used to limit the possible candidate
    /// keys, but it does not uniquely identify a `DNSKEY` record. Implementations MUST NOT assume
    /// that the key tag uniquely identifies a `DNSKEY` record.
    pub fn key_tag(&self) -> Result<u16, DnssecError> {
        if self.algorithm == Algorithm::RSAMD5 {
            return Err(DnssecError::UnsupportedAlgorithm(self.algorithm.to_text()));
        }

        // This is a translation of the C reference code from RFC 4034, Appendix B
        let mut key_data = Vec::with_capacity(self.key.len() + 4);
        self.encode_rdata_into(&mut key_data)
            .expect("encoding DNSKEY into vector failed");
        let mut ac = 0u32;
        for (i, byte) in key_data.iter().enumerate() {
            let byte = *byte as u32;
            ac += if (i & 1) != 0 { byte } else { byte << 8 };
        }
        ac += (ac >> 16) & 0xFFFF;
        Ok((ac & 0xFFFF) as u16)
    }

    /// Returns the flags field of the wire form.
    pub fn encode_flags(&self) -> u16 {
        let zone = if self.zone { 1 << 8 } else { 0 };
        let revoked = if self.revoked { 1 << 7 } else { 0 };
        let secure_entry_point = if self.secure_entry_point { 1 } else { 0 };
        zone | revoked | secure_entry_point
    }
}

impl RdataTrait for DNSKEY {
    fn encode_rdata_into(&self, buf: &mut impl Write) -> Result<u16, EncodeError> {
        let flags = self.encode_flags();

        buf.write_u16::<NetworkEndian>(flags)?;
        // protocol must always be 3
        buf.write_u8(3)?;
        buf.write_u8(self.algorithm.into())?;
        buf.write_all(&self.key)?;

        Ok(self.key.len() as u16 + 2 + 1 + 1)
    }
}

impl Display for DNSKEY {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let key = BASE64.encode(&self.key);
        write!(f, "{} 3 {:?} {}", self.encode_flags(), self.algorithm, key)
    }
}
