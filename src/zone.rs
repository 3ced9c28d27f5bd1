//! In-memory zone model and zone introspection.

use std::collections::BTreeMap;
use std::fmt::Display;

use crate::error::DnssecError;
use crate::name::Name;
use crate::rdata::Rdata;
use crate::{Class, RecordType};

#[cfg(feature = "serde")]
use serde::Serialize;

/// A set of resource records sharing owner name, class, type, and (for RRSIG sets) covered type.
///
/// The owner name is not stored here; an `Rrset` lives under its owner's [`Node`] inside a
/// [`Zone`].
#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct Rrset {
    /// The type of the records in this set.
    pub rtype: RecordType,
    /// For `RRSIG` sets, the type the signatures cover. [`None`] for all other types.
    pub covers: Option<RecordType>,
    /// The class of the records in this set (will almost always be [`Class::IN`]).
    pub class: Class,
    /// The amount of seconds the records in this set may be cached for.
    pub ttl: u32,
    /// The data of the individual records. The order is insignificant; DNSSEC digests sort the
    /// values by their canonical wire form.
    pub rdatas: Vec<Rdata>,
}

impl Rrset {
    /// Creates a record set holding the single given value.
    pub fn new(ttl: u32, rdata: Rdata) -> Self {
        Self {
            rtype: rdata.rtype(),
            covers: covers_of(&rdata),
            class: Class::IN,
            ttl,
            rdatas: vec![rdata],
        }
    }
}

/// Returns the covered type an RRSIG value carries, or [`None`] for any other RDATA.
fn covers_of(rdata: &Rdata) -> Option<RecordType> {
    rdata.as_rrsig().map(|rrsig| rrsig.type_covered)
}

/// The record sets at one owner name.
#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(Default, PartialEq, Eq, Clone, Debug)]
pub struct Node {
    rrsets: Vec<Rrset>,
}

impl Node {
    /// Returns the record sets at this node.
    pub fn rrsets(&self) -> &[Rrset] {
        &self.rrsets
    }

    /// Returns the record set with the given type (and covered type), if present.
    pub fn find(&self, rtype: RecordType, covers: Option<RecordType>) -> Option<&Rrset> {
        self.rrsets
            .iter()
            .find(|rrset| rrset.rtype == rtype && rrset.covers == covers)
    }
}

/// An in-memory DNS zone: a mapping from fully qualified owner names to the record sets at those
/// names, plus the zone origin.
///
/// The map is ordered by the canonical name ordering of [`Name`], so iteration yields owners in
/// the order the NSEC chain walks them.
#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct Zone {
    origin: Name,
    nodes: BTreeMap<Name, Node>,
}

impl Zone {
    /// Creates an empty zone with the given origin.
    pub fn new(origin: Name) -> Self {
        Self {
            origin,
            nodes: BTreeMap::new(),
        }
    }

    /// Returns the zone origin.
    pub fn origin(&self) -> &Name {
        &self.origin
    }

    /// Inserts a record into the zone, creating the owner's node and the record set as needed.
    ///
    /// When the record set already exists, its TTL is left untouched and the value is appended.
    pub fn insert(&mut self, owner: Name, ttl: u32, rdata: Rdata) {
        let rtype = rdata.rtype();
        let covers = covers_of(&rdata);
        let node = self.nodes.entry(owner).or_default();
        match node
            .rrsets
            .iter_mut()
            .find(|rrset| rrset.rtype == rtype && rrset.covers == covers)
        {
            Some(rrset) => rrset.rdatas.push(rdata),
            None => node.rrsets.push(Rrset::new(ttl, rdata)),
        }
    }

    /// Returns the node at the given owner name, if present.
    pub fn node(&self, owner: &Name) -> Option<&Node> {
        self.nodes.get(owner)
    }

    /// Returns the record set with the given owner, type, and covered type, if present.
    pub fn find_rrset(
        &self,
        owner: &Name,
        rtype: RecordType,
        covers: Option<RecordType>,
    ) -> Option<&Rrset> {
        self.nodes.get(owner)?.find(rtype, covers)
    }

    /// Removes and returns the record set with the given owner, type, and covered type.
    ///
    /// A node that is left without record sets is removed from the zone.
    pub fn remove_rrset(
        &mut self,
        owner: &Name,
        rtype: RecordType,
        covers: Option<RecordType>,
    ) -> Option<Rrset> {
        let node = self.nodes.get_mut(owner)?;
        let idx = node
            .rrsets
            .iter()
            .position(|rrset| rrset.rtype == rtype && rrset.covers == covers)?;
        let rrset = node.rrsets.remove(idx);
        if node.rrsets.is_empty() {
            self.nodes.remove(owner);
        }
        Some(rrset)
    }

    /// Iterates over every record set in the zone, together with its owner name, in canonical
    /// owner order.
    pub fn iter(&self) -> impl Iterator<Item = (&Name, &Rrset)> {
        self.nodes
            .iter()
            .flat_map(|(name, node)| node.rrsets.iter().map(move |rrset| (name, rrset)))
    }

    /// Returns the minimum TTL of the zone, i.e. the `minimum` field of the SOA record at the
    /// origin. This is the TTL NSEC and NSEC3 records are created with.
    ///
    /// Returns an error if the zone has no SOA record set at its origin.
    pub fn minimum_ttl(&self) -> Result<u32, DnssecError> {
        self.find_rrset(&self.origin, RecordType::SOA, None)
            .and_then(|rrset| rrset.rdatas.first())
            .and_then(|rdata| rdata.as_soa())
            .map(|soa| soa.minimum)
            .ok_or(DnssecError::NoSoa)
    }

    /// Returns the owner names of all delegation points, i.e. every name other than the origin
    /// that carries an NS record set.
    pub fn delegations(&self) -> Vec<Name> {
        self.nodes
            .iter()
            .filter(|(name, node)| {
                *name != &self.origin && node.find(RecordType::NS, None).is_some()
            })
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Returns true iff the given record set is a subzone delegation.
    pub fn is_delegation(&self, owner: &Name, rrset: &Rrset) -> bool {
        rrset.rtype == RecordType::NS && owner != &self.origin
    }

    /// Returns true iff the given record set is authoritative data of this zone.
    ///
    /// A record set is authoritative when its owner lies within the zone and not below a zone
    /// cut. At a delegation point itself only DS, NSEC, and NSEC3 record sets remain
    /// authoritative; the delegation NS set and everything below it (glue) belong to the child
    /// zone.
    ///
    /// `delegations` must be the result of [`Self::delegations()`]; it is taken as a parameter so
    /// callers checking many record sets compute it once.
    pub fn is_authoritative(&self, owner: &Name, rrset: &Rrset, delegations: &[Name]) -> bool {
        if !self.origin.zone_of(owner) {
            return false;
        }

        for delegation in delegations {
            let below_cut = delegation.zone_of(owner) && owner != delegation;
            let at_cut = owner == delegation
                && !matches!(
                    rrset.rtype,
                    RecordType::DS | RecordType::NSEC | RecordType::NSEC3
                );
            if below_cut || at_cut {
                return false;
            }
        }

        true
    }

    /// Returns the owner names carrying at least one authoritative record set.
    pub fn authoritative_names(&self, delegations: &[Name]) -> Vec<Name> {
        self.nodes
            .iter()
            .filter(|(name, node)| {
                node.rrsets
                    .iter()
                    .any(|rrset| self.is_authoritative(name, rrset, delegations))
            })
            .map(|(name, _)| name.clone())
            .collect()
    }
}

impl Display for Zone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (owner, rrset) in self.iter() {
            for rdata in &rrset.rdatas {
                writeln!(
                    f,
                    "{}. {} {} {} {}",
                    owner, rrset.ttl, rrset.class, rrset.rtype, rdata
                )?;
            }
        }
        Ok(())
    }
}
