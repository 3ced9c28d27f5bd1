//! DNSSEC zone signing and signature validation.
//!
//! The entry points are [`sign_zone()`] and [`validate()`], with the individual building blocks
//! (NSEC/NSEC3 chain construction, per-record-set signing, DS construction) exposed alongside
//! them.

use sha1::{Digest, Sha1};
use sha2::Sha256;

use crate::error::DnssecError;
use crate::name::Name;
use crate::rdata::dnskey::DNSKEY;
use crate::rdata::ds::{DigestType, DS};
use crate::rdata::RdataTrait;

mod crypto;
pub mod denial;
pub mod keys;
pub mod sign;
pub mod validate;

pub use crate::rdata::dnskey::Algorithm;
pub use denial::{add_nsec, add_nsec3};
pub use keys::SigningKey;
pub use sign::{sign_rrset, sign_zone, sigs_expire_before, unsign_zone, SignOptions};
pub use validate::{validate, validate_rrsig, KeyMap};

/// Constructs a DS record summarising the given DNSKEY.
///
/// The digest covers the canonical wire form of `owner` followed by the DNSKEY's RDATA wire
/// form. Only [`DigestType::SHA1`] and [`DigestType::SHA256`] are supported; any other digest
/// type is rejected with [`DnssecError::UnsupportedAlgorithm`].
///
/// # Examples
/// ```rust
/// use data_encoding::BASE64;
/// use zonesign::dnssec::{make_ds, Algorithm};
/// use zonesign::rdata::dnskey::DNSKEY;
/// use zonesign::rdata::ds::DigestType;
/// use zonesign::Name;
///
/// let key = DNSKEY {
///     zone: true,
///     revoked: false,
///     secure_entry_point: true,
///     algorithm: Algorithm::RSASHA256,
///     key: BASE64.decode(b"AwEAAbwPwkos3jZeAODOzW6AE0qf2ezpSEK6x7VAU2gMVTWAjN9IlkQAmxcNfBBFy9ny4o/8kZTTWyw7pyALzNx9jxhrnwiIdoWR/7N0Qq1Ia/CWfszWjlXvzDEwwkM/Qs41/8evCEShJBuk17wMJKmuHkAPoEgUcN4v0tnB892Aeq0v").unwrap(),
/// };
/// let ds = make_ds(&Name::from_ascii("example.com").unwrap(), &key, DigestType::SHA256).unwrap();
/// assert_eq!(ds.algorithm, Algorithm::RSASHA256);
/// assert_eq!(ds.digest.len(), 32);
/// ```
pub fn make_ds(owner: &Name, key: &DNSKEY, digest_type: DigestType) -> Result<DS, DnssecError> {
    let rdata = key.encode()?;

    let digest = match digest_type {
        DigestType::SHA1 => {
            let mut hash = Sha1::new();
            hash.update(owner.to_digestable());
            hash.update(&rdata);
            hash.finalize().to_vec()
        }
        DigestType::SHA256 => {
            let mut hash = Sha256::new();
            hash.update(owner.to_digestable());
            hash.update(&rdata);
            hash.finalize().to_vec()
        }
        other => {
            let number: u8 = other.into();
            return Err(DnssecError::UnsupportedAlgorithm(format!(
                "DS digest type {}",
                number
            )));
        }
    };

    Ok(DS {
        key_tag: key.key_tag()?,
        algorithm: key.algorithm,
        digest_type,
        digest,
    })
}

#[cfg(test)]
mod tests {
    use data_encoding::{BASE64, HEXLOWER};

    use crate::name::Name;
    use crate::rdata::dnskey::{Algorithm, DNSKEY};
    use crate::rdata::ds::DigestType;

    use super::make_ds;

    fn dnskey(flags: u16, algorithm: Algorithm, key_b64: &str) -> DNSKEY {
        let key_b64: String = key_b64.split_whitespace().collect();
        DNSKEY {
            zone: (flags & 0x0100) != 0,
            revoked: (flags & 0x0080) != 0,
            secure_entry_point: (flags & 0x0001) != 0,
            algorithm,
            key: BASE64.decode(key_b64.as_bytes()).unwrap(),
        }
    }

    fn dnspython_org_sep_key() -> DNSKEY {
        dnskey(
            257,
            Algorithm::RSASHA1,
            "AwEAAenVTr9L1OMlL1/N2ta0Qj9LLLnnmFWIr1dJoAsWM9BQfsbV7kFZ XbAkER/FY9Ji2o7cELxBwAsVBuWn6IUUAJXLH74YbC1anY0lifjgt29z SwDzuB7zmC7yVYZzUunBulVW4zT0tg1aePbpVL2EtTL8VzREqbJbE25R KuQYHZtFwG8S4iBxJUmT2Bbd0921LLxSQgVoFXlQx/gFV2+UERXcJ5ce iX6A6wc02M/pdg/YbJd2rBa0MYL3/Fz/Xltre0tqsImZGxzi6YtYDs45 NC8gH+44egz82e2DATCVM1ICPmRDjXYTLldQiWA2ZXIWnK0iitl5ue24 7EsWJefrIhE=",
        )
    }

    fn example_dsa_sep_key() -> DNSKEY {
        dnskey(
            257,
            Algorithm::DSA,
            "CI3nCqyJsiCJHTjrNsJOT4RaszetzcJPYuoH3F9ZTVt3KJXncCVR3bwn 1w0iavKljb9hDlAYSfHbFCp4ic/rvg4p1L8vh5s8ToMjqDNl40A0hUGQ Ybx5hsECyK+qHoajilUX1phYSAD8d9WAGO3fDWzUPBuzR7o85NiZCDxz yXuNVfni0uhj9n1KYhEO5yAbbruDGN89wIZcxMKuQsdUY2GYD93ssnBv a55W6XRABYWayKZ90WkRVODLVYLSn53Pj/wwxGH+XdhIAZJXimrZL4yl My7rtBsLMqq8Ihs4Tows7LqYwY7cp6y/50tw6pj8tFqMYcPUjKZV36l1 M/2t5BVg3i7IK61Aidt6aoC3TDJtzAxg3ZxfjZWJfhHjMJqzQIfbW5b9 q1mjFsW5EUv39RaNnX+3JWPRLyDqD4pIwDyqfutMsdk/Py3paHn82FGp CaOg+nicqZ9TiMZURN/XXy5JoXUNQ3RNvbHCUiPUe18KUkY6mTfnyHld 1l9YCWmzXQVClkx/hOYxjJ4j8Ife58+Obu5X",
        )
    }

    #[test]
    fn sha256_ds_of_dnspython_org() {
        let ds = make_ds(
            &Name::from_ascii("dnspython.org").unwrap(),
            &dnspython_org_sep_key(),
            DigestType::SHA256,
        )
        .unwrap();

        assert_eq!(ds.key_tag, 57349);
        assert_eq!(ds.algorithm, Algorithm::RSASHA1);
        assert_eq!(ds.digest_type, DigestType::SHA256);
        assert_eq!(
            ds.digest,
            HEXLOWER
                .decode(b"53a79a3e7488ab44ffc56b2d1109f0699d1796dd977e72108b841f96e47d7013")
                .unwrap()
        );
    }

    #[test]
    fn sha1_ds_of_example() {
        let ds = make_ds(
            &Name::from_ascii("example").unwrap(),
            &example_dsa_sep_key(),
            DigestType::SHA1,
        )
        .unwrap();

        assert_eq!(ds.key_tag, 18673);
        assert_eq!(ds.digest_type, DigestType::SHA1);
        assert_eq!(
            ds.digest,
            HEXLOWER
                .decode(b"71b71d4f3e11bbd71b4eff12cde69f7f9215bbe7")
                .unwrap()
        );
    }

    #[test]
    fn sha256_ds_of_example() {
        let ds = make_ds(
            &Name::from_ascii("example").unwrap(),
            &example_dsa_sep_key(),
            DigestType::SHA256,
        )
        .unwrap();

        assert_eq!(ds.key_tag, 18673);
        assert_eq!(
            ds.digest,
            HEXLOWER
                .decode(b"eb8344cbbf07c9d3d3d6c81d10c76653e28d8611a65e639ef8f716e4e4e5d913")
                .unwrap()
        );
    }

    #[test]
    fn unsupported_digest_type_is_rejected() {
        let result = make_ds(
            &Name::from_ascii("example").unwrap(),
            &dnspython_org_sep_key(),
            DigestType::GOST,
        );
        assert!(result.is_err());
    }
}
