//! `PTR` RDATA definition.

use std::fmt::Display;
use std::io::Write;

use crate::error::EncodeError;
use crate::name::Name;

use super::RdataTrait;

#[cfg(feature = "serde")]
use serde::Serialize;

/// A record containing a domain name pointer.
/// [\[RFC 1035\]](https://www.rfc-editor.org/rfc/rfc1035)
///
/// These records are used in special domains to point to some other location in the domain space.
#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct PTR {
    /// A domain name which points to some location in the domain name space.
    pub location: Name,
}

impl RdataTrait for PTR {
    fn encode_rdata_into(&self, buf: &mut impl Write) -> Result<u16, EncodeError> {
        self.location.encode_into(buf)
    }

    fn canonicalize(&mut self) {
        self.location.canonicalize();
    }
}

impl Display for PTR {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.location)
    }
}
