//! `SRV` RDATA definition.

use std::fmt::Display;
use std::io::Write;

use byteorder::{NetworkEndian, WriteBytesExt};

use crate::error::EncodeError;
use crate::name::Name;

use super::RdataTrait;

#[cfg(feature = "serde")]
use serde::Serialize;

/// A record which specifies the location of the server(s) for a specific protocol and domain.
/// [\[RFC 2782\]](https://www.rfc-editor.org/rfc/rfc2782)
///
/// The name this record is for must be of the format "_Service._Proto.Name".
#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct SRV {
    /// The priority of this target host. A client MUST attempt to contact the target host with the
    /// lowest-numbered priority it can reach.
    pub priority: u16,
    /// A server selection mechanism. The weight field specifies a relative weight for entries with
    /// the same priority.
    pub weight: u16,
    /// The port on this target host of this service.
    pub port: u16,
    /// The domain name of the target host. Name compression is not to be used for this field.
    pub target: Name,
}

impl RdataTrait for SRV {
    fn encode_rdata_into(&self, buf: &mut impl Write) -> Result<u16, EncodeError> {
        buf.write_u16::<NetworkEndian>(self.priority)?;
        buf.write_u16::<NetworkEndian>(self.weight)?;
        buf.write_u16::<NetworkEndian>(self.port)?;
        self.target
            .encode_into(buf)
            .map(|bytes_written| bytes_written + 2 + 2 + 2)
    }

    fn canonicalize(&mut self) {
        self.target.canonicalize();
    }
}

impl Display for SRV {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.priority, self.weight, self.port, self.target
        )
    }
}
