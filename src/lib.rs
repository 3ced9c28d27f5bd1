//! `zonesign` signs DNS zones with DNSSEC and validates DNSSEC signatures. Given an in-memory
//! [`Zone`] and a set of [`SigningKey`](dnssec::SigningKey)s, it inserts the DNSKEY records,
//! builds the NSEC or NSEC3 chain and generates an RRSIG for every authoritative record set.
//! The reverse direction is covered as well: a record set can be verified against a signature
//! set and a DNSKEY set, and DS records summarising a DNSKEY can be constructed.
//!
//! Zone file parsing, DNS message parsing and key storage are deliberately out of scope; the
//! crate operates on structured records only and performs no I/O.
//!
//! # Basic usage example
//! ```rust
//! use zonesign::dnssec::{sign_zone, Algorithm, SignOptions, SigningKey};
//! use zonesign::rdata::{Rdata, A, SOA};
//! use zonesign::{Name, RecordType, Zone};
//!
//! let origin = Name::from_ascii("example.com").unwrap();
//! let mut zone = Zone::new(origin.clone());
//! zone.insert(
//!     origin.clone(),
//!     3600,
//!     Rdata::SOA(SOA {
//!         mname: Name::from_ascii("ns1.example.com").unwrap(),
//!         rname: Name::from_ascii("hostmaster.example.com").unwrap(),
//!         serial: 1,
//!         refresh: 3600,
//!         retry: 1800,
//!         expire: 604800,
//!         minimum: 3600,
//!     }),
//! );
//! zone.insert(
//!     Name::from_ascii("www.example.com").unwrap(),
//!     3600,
//!     Rdata::A(A {
//!         address: "192.0.2.1".parse().unwrap(),
//!     }),
//! );
//!
//! let key = SigningKey::generate(Algorithm::RSASHA256, 1024, false).unwrap();
//! sign_zone(&mut zone, std::slice::from_ref(&key), &SignOptions::default()).unwrap();
//!
//! assert!(zone.find_rrset(&origin, RecordType::DNSKEY, None).is_some());
//! assert!(zone.find_rrset(&origin, RecordType::NSEC, None).is_some());
//! ```
//!
//! # Usage note
//! You can construct most structs directly, without using any `new()` method. This library does
//! not stop you from creating inconsistent data (e.g. a zone without a SOA record set at its
//! origin); operations that need an invariant to hold return an error when it does not.

use std::fmt::{self, Display};

use repr_with_fallback::repr_with_fallback;
#[cfg(feature = "serde")]
use serde::Serialize;
use strum_macros::EnumString;

pub mod dnssec;
pub mod error;
pub mod name;
pub mod rdata;
pub mod zone;

pub use name::Name;
pub use rdata::Rdata;
pub use zone::{Rrset, Zone};

repr_with_fallback! {
    /// Represents a DNS TYPE.
    ///
    /// See the documentation in the [`rdata`] module for explanations of the different types.
    ///
    /// This enum is non-exhaustive and limited to the types a signed zone is made of; other
    /// types are carried through as [`RecordType::Unknown`].
    #[cfg_attr(feature = "serde", derive(Serialize))]
    #[derive(PartialEq, Eq, Copy, Clone, EnumString, Debug)]
    #[non_exhaustive]
    pub enum RecordType {
        A = 1,
        NS = 2,
        CNAME = 5,
        SOA = 6,
        PTR = 12,
        MX = 15,
        TXT = 16,
        AAAA = 28,
        SRV = 33,
        DNAME = 39,
        DS = 43,
        RRSIG = 46,
        NSEC = 47,
        DNSKEY = 48,
        NSEC3 = 50,
        NSEC3PARAM = 51,
        Unknown(u16),
    }
}

/// Represents a DNS CLASS.
///
/// Other classes than `IN` are included only for completeness and historical reasons.
///
/// See [RFC 1035](https://www.rfc-editor.org/rfc/rfc1035) for further information.
#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(PartialEq, Eq, Copy, Clone, Debug)]
pub enum Class {
    IN,
    CH,
    HS,
    NONE,
    /// See also [RFC 8482](https://www.rfc-editor.org/rfc/rfc8482).
    ANY,
}

impl Class {
    /// Encodes a `Class` as a two-byte value.
    pub fn encode(&self) -> u16 {
        match self {
            Class::IN => 1,
            Class::CH => 3,
            Class::HS => 4,
            Class::NONE => 254,
            Class::ANY => 255,
        }
    }
}

impl Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordType::Unknown(x) => write!(f, "TYPE{}", x),
            _ => write!(f, "{:?}", self),
        }
    }
}
