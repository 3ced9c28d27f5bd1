//! RDATA type definitions.

use std::fmt::Display;
use std::io::Write;

use data_encoding::HEXUPPER;

use crate::error::EncodeError;
use crate::RecordType;

#[cfg(feature = "serde")]
use serde::Serialize;

pub mod a;
pub mod aaaa;
pub mod cname;
pub mod dname;
pub mod dnskey;
pub mod ds;
pub mod mx;
pub mod ns;
pub mod nsec;
pub mod nsec3;
pub mod ptr;
pub mod rrsig;
pub mod soa;
pub mod srv;
pub mod txt;

pub use a::A;
pub use aaaa::AAAA;
pub use cname::CNAME;
pub use dname::DNAME;
pub use dnskey::DNSKEY;
pub use ds::DS;
pub use mx::MX;
pub use ns::NS;
pub use nsec::NSEC;
pub use nsec3::{NSEC3, NSEC3PARAM};
pub use ptr::PTR;
pub use rrsig::RRSIG;
pub use soa::SOA;
pub use srv::SRV;
pub use txt::TXT;

/// The record data (RDATA) for a record in a [`Zone`][crate::Zone].
#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(PartialEq, Eq, Clone, Debug)]
#[non_exhaustive]
pub enum Rdata {
    A(A),
    NS(NS),
    CNAME(CNAME),
    SOA(SOA),
    PTR(PTR),
    MX(MX),
    TXT(TXT),
    AAAA(AAAA),
    SRV(SRV),
    DNAME(DNAME),
    DS(DS),
    RRSIG(RRSIG),
    NSEC(NSEC),
    DNSKEY(DNSKEY),
    NSEC3(NSEC3),
    NSEC3PARAM(NSEC3PARAM),

    /// Unknown RDATA, containing the raw RDATA bytes.
    Unknown(Vec<u8>),
}

/// A trait for working with the different RDATA variants.
pub trait RdataTrait: Sized + Display {
    /// Encodes the RDATA into the given `buf` and returns the number of written bytes on success.
    ///
    /// If an error is returned, no guarantees for the state of `buf` are given.
    fn encode_rdata_into(&self, buf: &mut impl Write) -> Result<u16, EncodeError>;

    /// Ensures the RDATA is in canonical format, as defined in
    /// [RFC 4034, Section 6.2](https://www.rfc-editor.org/rfc/rfc4034#section-6.2).
    ///
    /// Canonical format means that for [`NS`], [`CNAME`], [`SOA`], [`PTR`], [`MX`], [`SRV`],
    /// [`DNAME`], [`RRSIG`], and [`NSEC`], all [`Name`](crate::Name)s contained within the RDATA
    /// are in canonical format (see [`Name::canonicalize()`](crate::Name::canonicalize)).
    fn canonicalize(&mut self) {}

    /// Encodes the RDATA and returns the encoded bytes.
    fn encode(&self) -> Result<Vec<u8>, EncodeError> {
        let mut rdata = Vec::new();
        self.encode_rdata_into(&mut rdata)?;
        Ok(rdata)
    }
}

#[doc(hidden)]
macro_rules! impl_from_rtype {
    ($variant:ident) => {
        impl From<$variant> for Rdata {
            fn from(rdata: $variant) -> Self {
                Self::$variant(rdata)
            }
        }
    };
}

#[doc(hidden)]
macro_rules! impl_as_rtype {
    // shoutout to https://stackoverflow.com/a/43353854 for the idea to use a recursive macro and
    // stringify! to put $variant inside the doc comment
    ($method:ident, $method_mut:ident, $variant:ident, $doc:expr) => {
        #[doc = "Returns a reference to the inner [`"]
        #[doc = $doc]
        #[doc = "`] when called on the `"]
        #[doc = $doc]
        #[doc = "` variant. For all other variants, returns [`None`]."]
        pub fn $method(&self) -> Option<&$variant> {
            if let Self::$variant(inner) = self {
                Some(inner)
            } else {
                None
            }
        }

        #[doc = "Returns a mutable reference to the inner [`"]
        #[doc = $doc]
        #[doc = "`] when called on the `"]
        #[doc = $doc]
        #[doc = "` variant. For all other variants, returns [`None`]."]
        pub fn $method_mut(&mut self) -> Option<&mut $variant> {
            if let Self::$variant(ref mut inner) = self {
                Some(inner)
            } else {
                None
            }
        }
    };

    ($method:ident, $method_mut:ident, $variant:ident) => {
        impl_as_rtype!($method, $method_mut, $variant, stringify!($variant));
    };
}

/// Match on every [`Rdata`] variant and execute a block for it.
///
/// Matches $self, using $arm as the match arm for the non-[`Rdata::Unknown`] variants and
/// $unknown_arm as the match arm for the [`Rdata::Unknown`] variant. $inner and $inner_unknown are
/// the identifiers for the inner field that can be used in $arm and $unknown_arm, respectively.
#[macro_export]
macro_rules! match_rdata {
    ($self:ident, $inner:ident, $arm:block, $inner_unknown:ident, $unknown_arm:block) => {
        match $self {
            Rdata::A($inner) => $arm,
            Rdata::NS($inner) => $arm,
            Rdata::CNAME($inner) => $arm,
            Rdata::SOA($inner) => $arm,
            Rdata::PTR($inner) => $arm,
            Rdata::MX($inner) => $arm,
            Rdata::TXT($inner) => $arm,
            Rdata::AAAA($inner) => $arm,
            Rdata::SRV($inner) => $arm,
            Rdata::DNAME($inner) => $arm,
            Rdata::DS($inner) => $arm,
            Rdata::RRSIG($inner) => $arm,
            Rdata::NSEC($inner) => $arm,
            Rdata::DNSKEY($inner) => $arm,
            Rdata::NSEC3($inner) => $arm,
            Rdata::NSEC3PARAM($inner) => $arm,
            Rdata::Unknown($inner_unknown) => $unknown_arm,
        }
    };
}

impl Rdata {
    /// See [`RdataTrait::canonicalize()`].
    pub fn canonicalize(&mut self) {
        match_rdata!(self, rdata, { rdata.canonicalize() }, _rdata, {})
    }

    /// See [`RdataTrait::encode()`].
    pub fn encode(&self) -> Result<Vec<u8>, EncodeError> {
        match_rdata!(self, rdata, { rdata.encode() }, unknown_rdata, {
            Ok(unknown_rdata.clone())
        })
    }

    /// See [`RdataTrait::encode_rdata_into()`].
    pub fn encode_into(&self, buf: &mut impl Write) -> Result<u16, EncodeError> {
        match_rdata!(
            self,
            rdata,
            { rdata.encode_rdata_into(buf) },
            unknown_rdata,
            {
                buf.write_all(unknown_rdata)?;
                Ok(unknown_rdata.len() as u16)
            }
        )
    }

    /// Returns the canonical wire form of this RDATA, i.e. the encoding of the
    /// [canonicalized](Self::canonicalize) value. This is the form fed to DNSSEC digests.
    pub fn digestable(&self) -> Result<Vec<u8>, EncodeError> {
        let mut rdata = self.clone();
        rdata.canonicalize();
        rdata.encode()
    }

    /// Returns the [`RecordType`] that matches this `RDATA`.
    ///
    /// # Note
    /// As [`Rdata::Unknown`] does not know its type, calling this method on it will return
    /// [`RecordType::Unknown(0)`].
    pub fn rtype(&self) -> RecordType {
        match self {
            Rdata::A(_) => RecordType::A,
            Rdata::NS(_) => RecordType::NS,
            Rdata::CNAME(_) => RecordType::CNAME,
            Rdata::SOA(_) => RecordType::SOA,
            Rdata::PTR(_) => RecordType::PTR,
            Rdata::MX(_) => RecordType::MX,
            Rdata::TXT(_) => RecordType::TXT,
            Rdata::AAAA(_) => RecordType::AAAA,
            Rdata::SRV(_) => RecordType::SRV,
            Rdata::DNAME(_) => RecordType::DNAME,
            Rdata::DS(_) => RecordType::DS,
            Rdata::RRSIG(_) => RecordType::RRSIG,
            Rdata::NSEC(_) => RecordType::NSEC,
            Rdata::DNSKEY(_) => RecordType::DNSKEY,
            Rdata::NSEC3(_) => RecordType::NSEC3,
            Rdata::NSEC3PARAM(_) => RecordType::NSEC3PARAM,
            Rdata::Unknown(_) => RecordType::Unknown(0),
        }
    }

    impl_as_rtype!(as_a, as_mut_a, A);
    impl_as_rtype!(as_ns, as_mut_ns, NS);
    impl_as_rtype!(as_cname, as_mut_cname, CNAME);
    impl_as_rtype!(as_soa, as_mut_soa, SOA);
    impl_as_rtype!(as_ptr, as_mut_ptr, PTR);
    impl_as_rtype!(as_mx, as_mut_mx, MX);
    impl_as_rtype!(as_txt, as_mut_txt, TXT);
    impl_as_rtype!(as_aaaa, as_mut_aaaa, AAAA);
    impl_as_rtype!(as_srv, as_mut_srv, SRV);
    impl_as_rtype!(as_dname, as_mut_dname, DNAME);
    impl_as_rtype!(as_ds, as_mut_ds, DS);
    impl_as_rtype!(as_rrsig, as_mut_rrsig, RRSIG);
    impl_as_rtype!(as_nsec, as_mut_nsec, NSEC);
    impl_as_rtype!(as_dnskey, as_mut_dnskey, DNSKEY);
    impl_as_rtype!(as_nsec3, as_mut_nsec3, NSEC3);
    impl_as_rtype!(as_nsec3param, as_mut_nsec3param, NSEC3PARAM);
}

impl_from_rtype!(A);
impl_from_rtype!(NS);
impl_from_rtype!(CNAME);
impl_from_rtype!(SOA);
impl_from_rtype!(PTR);
impl_from_rtype!(MX);
impl_from_rtype!(TXT);
impl_from_rtype!(AAAA);
impl_from_rtype!(SRV);
impl_from_rtype!(DNAME);
impl_from_rtype!(DS);
impl_from_rtype!(RRSIG);
impl_from_rtype!(NSEC);
impl_from_rtype!(DNSKEY);
impl_from_rtype!(NSEC3);
impl_from_rtype!(NSEC3PARAM);

impl Display for Rdata {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match_rdata!(self, rdata, { write!(f, "{}", rdata) }, data, {
            write!(f, "\\# {} {}", data.len(), HEXUPPER.encode(data))
        })
    }
}

/// Encodes a string as a character string as defined in
/// [RFC 1035](https://www.rfc-editor.org/rfc/rfc1035), i.e. writes the length of the string as a
/// byte and then the string bytes, into the given `buf`.
///
/// `string` must consist of only ASCII characters.
///
/// Returns the number of bytes written on success.
pub fn encode_string_into(
    string: impl AsRef<str>,
    buf: &mut impl Write,
) -> Result<u16, EncodeError> {
    let string = string.as_ref();

    if !string.is_ascii() {
        return Err(EncodeError::NonAsciiString(string.to_string()));
    }

    let len = string.len();
    buf.write_all(&(len as u8).to_be_bytes())?;
    write!(buf, "{}", string)?;
    Ok(1 + len as u16)
}
