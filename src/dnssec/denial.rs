//! NSEC and NSEC3 chain construction for authenticated denial of existence.

use std::collections::BTreeSet;

use data_encoding::BASE32_DNSSEC;
use rand::Rng;
use sha1::{Digest, Sha1};

use crate::error::DnssecError;
use crate::name::Name;
use crate::rdata::nsec3::{HashAlgorithm, NSEC3, NSEC3PARAM};
use crate::rdata::{Rdata, NSEC};
use crate::zone::Zone;
use crate::RecordType;

/// The iteration count used when the caller of [`add_nsec3()`] does not supply one.
const DEFAULT_NSEC3_ITERATIONS: u16 = 10;

/// Adds the NSEC records providing authenticated denial of existence to the given zone (see
/// [RFC 4034](https://www.rfc-editor.org/rfc/rfc4034) for details).
///
/// An NSEC record is created for every owner name carrying authoritative data or a zone
/// delegation. The records form a single circular chain in canonical name order; their TTL is
/// the zone's minimum TTL.
///
/// Returns an error if the zone has no SOA record set at its origin.
pub fn add_nsec(zone: &mut Zone) -> Result<(), DnssecError> {
    let ttl = zone.minimum_ttl()?;

    // Only add NSEC records to owner names containing authoritative data or zone delegations
    let delegations = zone.delegations();
    let mut names: BTreeSet<Name> = delegations.iter().cloned().collect();
    names.extend(zone.authoritative_names(&delegations));
    // BTreeSet iteration yields the names in canonical order thanks to Name's Ord impl
    let ordered: Vec<Name> = names.into_iter().collect();

    let mut chain = Vec::with_capacity(ordered.len());
    for (i, name) in ordered.iter().enumerate() {
        // Compute the RDATA types covered by this NSEC record. RRSIG and NSEC itself are always
        // present once the zone is signed.
        let mut types = vec![RecordType::RRSIG, RecordType::NSEC];
        if let Some(node) = zone.node(name) {
            for rrset in node.rrsets() {
                // Only include RDATA types of authoritative records or delegations
                if zone.is_authoritative(name, rrset, &delegations)
                    || zone.is_delegation(name, rrset)
                {
                    types.push(rrset.rtype);
                }
            }
        }
        types.sort_by_key(|rtype| u16::from(*rtype));
        types.dedup();

        let nsec = NSEC {
            next_domain_name: ordered[(i + 1) % ordered.len()].clone(),
            types,
        };
        chain.push((name.clone(), nsec));
    }

    for (name, nsec) in chain {
        zone.insert(name, ttl, Rdata::NSEC(nsec));
    }
    Ok(())
}

/// Adds the NSEC3 records providing hashed authenticated denial of existence to the given zone,
/// along with the NSEC3PARAM record at the apex (see
/// [RFC 5155](https://www.rfc-editor.org/rfc/rfc5155) for details).
///
/// When no `salt` is given, a random 8-octet salt is used, and a fresh one is drawn should the
/// astronomically unlikely hash collision occur; a caller-supplied salt is never replaced, so a
/// collision under it is reported as [`DnssecError::Nsec3Collision`]. `iterations` defaults to
/// 10.
///
/// Returns an error if the zone has no SOA record set at its origin.
pub fn add_nsec3(
    zone: &mut Zone,
    salt: Option<Vec<u8>>,
    iterations: Option<u16>,
) -> Result<(), DnssecError> {
    let can_resalt = salt.is_none();
    let mut salt = salt.unwrap_or_else(random_salt);
    let iterations = iterations.unwrap_or(DEFAULT_NSEC3_ITERATIONS);

    // Only add NSEC3 records for owner names containing authoritative data or zone delegations
    let delegations = zone.delegations();
    let mut names: BTreeSet<Name> = delegations.iter().cloned().collect();
    names.extend(zone.authoritative_names(&delegations));
    let names: Vec<Name> = names.into_iter().collect();

    let hashed = loop {
        match hashed_order(&names, zone.origin(), &salt, iterations) {
            Ok(hashed) => break hashed,
            Err(DnssecError::Nsec3Collision) if can_resalt => salt = random_salt(),
            Err(e) => return Err(e),
        }
    };

    let ttl = zone.minimum_ttl()?;
    let origin = zone.origin().clone();
    zone.insert(
        origin.clone(),
        ttl,
        Rdata::NSEC3PARAM(NSEC3PARAM {
            hash_algorithm: HashAlgorithm::SHA1,
            flags: 0,
            iterations,
            salt: Some(salt.clone()),
        }),
    );

    let mut chain = Vec::with_capacity(hashed.len());
    for (i, (name, hash)) in hashed.iter().enumerate() {
        let mut types = Vec::new();
        // Empty non-terminals have no node and get an empty type bitmap
        if let Some(node) = zone.node(name) {
            for rrset in node.rrsets() {
                if zone.is_authoritative(name, rrset, &delegations) {
                    types.push(rrset.rtype);
                    types.push(RecordType::RRSIG);
                }
                if zone.is_delegation(name, rrset) {
                    types.push(rrset.rtype);
                }
            }
        }
        types.sort_by_key(|rtype| u16::from(*rtype));
        types.dedup();

        let mut owner = origin.clone();
        owner.prepend_label(BASE32_DNSSEC.encode(hash))?;

        let nsec3 = NSEC3 {
            hash_algorithm: HashAlgorithm::SHA1,
            opt_out: false,
            iterations,
            salt: Some(salt.clone()),
            next_hashed_owner: hashed[(i + 1) % hashed.len()].1.clone(),
            types,
        };
        chain.push((owner, nsec3));
    }

    for (owner, nsec3) in chain {
        zone.insert(owner, ttl, Rdata::NSEC3(nsec3));
    }
    Ok(())
}

/// Hashes the given names with SHA-1 under the given salt and iteration count, and returns
/// (name, hash) pairs sorted by hash value. Used for NSEC3 record generation; see
/// [RFC 5155, Section 5](https://www.rfc-editor.org/rfc/rfc5155#section-5).
///
/// Before hashing, the name set is expanded with every empty non-terminal between a name and the
/// origin (RFC 5155, Section 7.1). The hash is applied `iterations` + 1 times in total, salting
/// each application.
///
/// Returns [`DnssecError::Nsec3Collision`] when two distinct names produce the same hash.
pub(crate) fn hashed_order(
    names: &[Name],
    origin: &Name,
    salt: &[u8],
    iterations: u16,
) -> Result<Vec<(Name, Vec<u8>)>, DnssecError> {
    // Add empty non-terminals to the set, see RFC 5155, section 7.1
    let mut nameset: BTreeSet<Name> = names.iter().cloned().collect();
    for name in names {
        let mut name = name.clone();
        while let Some(parent) = name.parent() {
            if parent.label_count() <= origin.label_count() {
                break;
            }
            nameset.insert(parent.clone());
            name = parent;
        }
    }

    let mut hashed: Vec<(Name, Vec<u8>)> = Vec::with_capacity(nameset.len());
    for name in nameset {
        let mut hash = name.to_digestable();
        for _ in 0..=iterations {
            let mut sha = Sha1::new();
            sha.update(&hash);
            sha.update(salt);
            hash = sha.finalize().to_vec();
        }
        hashed.push((name, hash));
    }

    hashed.sort_by(|a, b| a.1.cmp(&b.1));

    if hashed.windows(2).any(|pair| pair[0].1 == pair[1].1) {
        return Err(DnssecError::Nsec3Collision);
    }
    Ok(hashed)
}

/// Draws a fresh 8-octet NSEC3 salt from the platform RNG.
fn random_salt() -> Vec<u8> {
    let mut salt = [0u8; 8];
    rand::thread_rng().fill(&mut salt[..]);
    salt.to_vec()
}

#[cfg(test)]
mod tests {
    use data_encoding::{BASE32_DNSSEC, HEXLOWER};

    use crate::name::Name;
    use crate::rdata::{Rdata, A, NS, SOA};
    use crate::zone::Zone;
    use crate::RecordType;

    use super::{add_nsec, hashed_order};

    fn name(name: &str) -> Name {
        Name::from_ascii(name).unwrap()
    }

    fn reference_salt() -> Vec<u8> {
        HEXLOWER.decode(b"05d67bb3fe7bf907").unwrap()
    }

    #[test]
    fn hashed_owner_matches_the_reference_vector() {
        // example.com hashed with the reference salt and 10 iterations, as produced by BIND
        // and dnspython
        let hashed = hashed_order(
            &[name("example.com")],
            &name("example.com"),
            &reference_salt(),
            10,
        )
        .unwrap();

        assert_eq!(hashed.len(), 1);
        assert_eq!(
            BASE32_DNSSEC.encode(&hashed[0].1),
            "6r1v3vosorqt80kb3ailjib5a7n3cnlk"
        );
    }

    #[test]
    fn empty_non_terminals_are_hashed_too() {
        let hashed = hashed_order(
            &[name("_sip._tcp.example.com"), name("example.com")],
            &name("example.com"),
            &reference_salt(),
            10,
        )
        .unwrap();

        let names: Vec<_> = hashed.iter().map(|(name, _)| name.clone()).collect();
        assert!(names.contains(&name("_tcp.example.com")));

        let sip = hashed
            .iter()
            .find(|(owner, _)| owner == &name("_sip._tcp.example.com"))
            .unwrap();
        assert_eq!(
            BASE32_DNSSEC.encode(&sip.1),
            "vju5kq0s3pj4fig4aev90i6m30m4ccsk"
        );
    }

    #[test]
    fn hashes_are_strictly_increasing() {
        let hashed = hashed_order(
            &[
                name("example.com"),
                name("a.example.com"),
                name("www.example.com"),
                name("deep.empty.nonterminal.example.com"),
            ],
            &name("example.com"),
            &reference_salt(),
            10,
        )
        .unwrap();

        // the two empty non-terminals were inserted
        assert_eq!(hashed.len(), 6);
        assert!(hashed.windows(2).all(|pair| pair[0].1 < pair[1].1));
    }

    #[test]
    fn nsec_chain_covers_delegations_but_not_glue() {
        let mut zone = Zone::new(name("example.com"));
        zone.insert(
            name("example.com"),
            3600,
            Rdata::SOA(SOA {
                mname: name("ns1.example.com"),
                rname: name("hostmaster.example.com"),
                serial: 1,
                refresh: 3600,
                retry: 1800,
                expire: 604800,
                minimum: 300,
            }),
        );
        zone.insert(
            name("sub.example.com"),
            3600,
            Rdata::NS(NS {
                name: name("ns1.sub.example.com"),
            }),
        );
        zone.insert(
            name("ns1.sub.example.com"),
            3600,
            Rdata::A(A {
                address: "192.0.2.2".parse().unwrap(),
            }),
        );

        add_nsec(&mut zone).unwrap();

        // glue got no NSEC record
        assert!(zone
            .find_rrset(&name("ns1.sub.example.com"), RecordType::NSEC, None)
            .is_none());

        // the delegation point did, with the NS type but without A
        let cut = zone
            .find_rrset(&name("sub.example.com"), RecordType::NSEC, None)
            .unwrap();
        assert_eq!(cut.ttl, 300);
        let nsec = cut.rdatas[0].as_nsec().unwrap();
        assert_eq!(nsec.next_domain_name, name("example.com"));
        assert_eq!(
            nsec.types,
            vec![RecordType::NS, RecordType::RRSIG, RecordType::NSEC]
        );

        // the chain wraps around to the apex
        let apex = zone
            .find_rrset(&name("example.com"), RecordType::NSEC, None)
            .unwrap();
        assert_eq!(
            apex.rdatas[0].as_nsec().unwrap().next_domain_name,
            name("sub.example.com")
        );
    }
}
