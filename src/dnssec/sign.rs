//! Zone and record-set signing.

use byteorder::{NetworkEndian, WriteBytesExt};
use chrono::Utc;

use crate::error::{DnssecError, EncodeError};
use crate::name::Name;
use crate::rdata::rrsig::RRSIG;
use crate::rdata::Rdata;
use crate::zone::{Rrset, Zone};
use crate::RecordType;

use super::{crypto, denial, keys::SigningKey};

/// Options for [`sign_zone()`].
///
/// The defaults mirror common operational practice: signatures valid from one day in the past
/// until 90 days in the future, NSEC denial, and a DNSKEY TTL of one hour.
pub struct SignOptions {
    /// Signature expiration as seconds since the epoch. Defaults to now + 90 days.
    pub expiration: Option<u32>,
    /// Signature inception as seconds since the epoch. Defaults to now - 1 day.
    pub inception: Option<u32>,
    /// Build an NSEC3 chain instead of an NSEC chain.
    pub nsec3: bool,
    /// The TTL of the DNSKEY record set inserted at the apex.
    pub key_ttl: u32,
    /// The NSEC3 salt. When [`None`], a random 8-octet salt is drawn. Ignored without
    /// [`Self::nsec3`].
    pub nsec3_salt: Option<Vec<u8>>,
    /// The NSEC3 iteration count. When [`None`], 10 is used. Ignored without [`Self::nsec3`].
    pub nsec3_iterations: Option<u16>,
}

impl Default for SignOptions {
    fn default() -> Self {
        Self {
            expiration: None,
            inception: None,
            nsec3: false,
            key_ttl: 3600,
            nsec3_salt: None,
            nsec3_iterations: None,
        }
    }
}

/// Computes the byte stream a signature over the given record set covers, as defined in
/// [RFC 4034, Section 3.1.8.1](https://www.rfc-editor.org/rfc/rfc4034#section-3.1.8.1):
///
/// ```text
/// signature = sign(RRSIG_RDATA | RR(1) | RR(2)...) where
///     RRSIG_RDATA is the wire format of the RRSIG RDATA fields
///         with the Signer's Name field in canonical form and
///         the Signature field excluded;
///     RR(i) = owner | type | class | TTL | RDATA length | RDATA
/// ```
///
/// The record set is brought into canonical form first: the owner is lowercased (and, when the
/// RRSIG's labels field indicates a wildcard expansion, the original wildcard owner is
/// reconstructed per [RFC 4035, Section 5.3.2](https://www.rfc-editor.org/rfc/rfc4035#section-5.3.2)),
/// the TTL is replaced by the original TTL, and the RDATA values are canonicalized and sorted.
pub(crate) fn signed_data(
    owner: &Name,
    rrset: &Rrset,
    rrsig: &RRSIG,
) -> Result<Vec<u8>, EncodeError> {
    let mut data = Vec::with_capacity(1024);

    let mut rrsig = rrsig.clone();
    rrsig.signer_name.canonicalize();
    rrsig.encode_into_without_signature(&mut data)?;

    // undo a wildcard expansion: keep the rightmost `labels` labels and prepend "*"
    let mut owner = owner.clone();
    if rrsig.labels < owner.label_count() {
        while owner.label_count() > rrsig.labels {
            owner.pop_front_label();
        }
        owner.prepend_wildcard();
    }
    let owner_wire = owner.to_digestable();

    let mut rrfixed = Vec::with_capacity(8);
    rrfixed.write_u16::<NetworkEndian>(rrset.rtype.into())?;
    rrfixed.write_u16::<NetworkEndian>(rrset.class.encode())?;
    rrfixed.write_u32::<NetworkEndian>(rrsig.original_ttl)?;

    let mut rdatas = rrset
        .rdatas
        .iter()
        .map(|rdata| rdata.digestable())
        .collect::<Result<Vec<_>, _>>()?;
    rdatas.sort();

    for rdata in &rdatas {
        data.extend_from_slice(&owner_wire);
        data.extend_from_slice(&rrfixed);
        data.write_u16::<NetworkEndian>(rdata.len() as u16)?;
        data.extend_from_slice(rdata);
    }

    Ok(data)
}

/// Generates an RRSIG record for the given record set.
///
/// `origin` becomes the signer name; `expiration` and `inception` bound the validity period.
///
/// Returns an error if the key's algorithm cannot sign (only RSA algorithms can).
pub fn sign_rrset(
    owner: &Name,
    rrset: &Rrset,
    key: &SigningKey,
    origin: &Name,
    expiration: u32,
    inception: u32,
) -> Result<RRSIG, DnssecError> {
    let mut signer_name = origin.clone();
    signer_name.canonicalize();

    let mut rrsig = RRSIG {
        type_covered: rrset.rtype,
        algorithm: key.algorithm(),
        labels: owner.label_count(),
        original_ttl: rrset.ttl,
        signature_expiration: expiration,
        signature_inception: inception,
        key_tag: key.key_tag(),
        signer_name,
        signature: Vec::new(),
    };

    let data = signed_data(owner, rrset, &rrsig)?;
    let digest = crypto::digest(key.algorithm(), &data)?;
    rrsig.signature = key.sign_digest(&digest)?;

    Ok(rrsig)
}

/// Signs the given zone with DNSSEC.
///
/// The public projections of all `keys` are inserted as the apex DNSKEY record set, the NSEC or
/// NSEC3 chain is built, the DNSKEY set is signed with every key, and every other authoritative
/// record set is signed with every zone signing key (the keys without the secure-entry-point
/// flag; when all keys carry it, all keys sign). RRSIG sets are never signed, and neither are
/// delegation NS sets or the glue below them.
///
/// On error the zone may have been partially mutated and should be discarded.
pub fn sign_zone(
    zone: &mut Zone,
    keys: &[SigningKey],
    options: &SignOptions,
) -> Result<(), DnssecError> {
    let zsks: Vec<&SigningKey> = {
        let without_sep: Vec<&SigningKey> = keys
            .iter()
            .filter(|key| !key.dnskey().secure_entry_point)
            .collect();
        if without_sep.is_empty() {
            keys.iter().collect()
        } else {
            without_sep
        }
    };

    let now = Utc::now().timestamp() as u32;
    let expiration = options.expiration.unwrap_or(now + 90 * 24 * 3600);
    let inception = options.inception.unwrap_or(now - 24 * 3600);

    // Add the DNSKEY records to the zone
    let origin = zone.origin().clone();
    for key in keys {
        zone.insert(origin.clone(), options.key_ttl, Rdata::DNSKEY(key.dnskey().clone()));
    }

    // Add the NSEC / NSEC3 records
    if options.nsec3 {
        denial::add_nsec3(zone, options.nsec3_salt.clone(), options.nsec3_iterations)?;
    } else {
        denial::add_nsec(zone)?;
    }

    // Sign the DNSKEY record set with all keys
    let dnskey_rrset = zone
        .find_rrset(&origin, RecordType::DNSKEY, None)
        .cloned()
        .expect("the apex DNSKEY set was inserted above");
    for key in keys {
        let rrsig = sign_rrset(&origin, &dnskey_rrset, key, &origin, expiration, inception)?;
        zone.insert(origin.clone(), dnskey_rrset.ttl, Rdata::RRSIG(rrsig));
    }

    // Sign the other record sets. DNSKEY is already signed; RRSIG record sets MUST NOT be
    // signed, and delegations and their glue MUST NOT be signed (RFC 4035, section 2.2).
    let delegations = zone.delegations();
    let work: Vec<(Name, Rrset)> = zone
        .iter()
        .filter(|(name, rrset)| {
            rrset.rtype != RecordType::DNSKEY
                && rrset.rtype != RecordType::RRSIG
                && zone.is_authoritative(name, rrset, &delegations)
        })
        .map(|(name, rrset)| (name.clone(), rrset.clone()))
        .collect();

    for (name, rrset) in work {
        for key in &zsks {
            let rrsig = sign_rrset(&name, &rrset, key, &origin, expiration, inception)?;
            zone.insert(name.clone(), rrset.ttl, Rdata::RRSIG(rrsig));
        }
    }

    Ok(())
}

/// Returns true iff the zone contains at least one RRSIG expiring before `limit`. This tells
/// whether the zone needs to be signed again soon.
pub fn sigs_expire_before(zone: &Zone, limit: u32) -> bool {
    zone.iter()
        .filter(|(_, rrset)| rrset.rtype == RecordType::RRSIG)
        .flat_map(|(_, rrset)| rrset.rdatas.iter())
        .filter_map(|rdata| rdata.as_rrsig())
        .any(|rrsig| rrsig.signature_expiration < limit)
}

/// Removes all DNSSEC records from the given zone: every RRSIG, NSEC, and NSEC3 record set, the
/// NSEC3PARAM set and the DNSKEY set at the apex. Owner names left without record sets (such as
/// the hashed NSEC3 owners) disappear with them.
pub fn unsign_zone(zone: &mut Zone) {
    let signed: Vec<(Name, RecordType, Option<RecordType>)> = zone
        .iter()
        .filter(|(_, rrset)| {
            matches!(
                rrset.rtype,
                RecordType::RRSIG | RecordType::NSEC | RecordType::NSEC3
            )
        })
        .map(|(name, rrset)| (name.clone(), rrset.rtype, rrset.covers))
        .collect();
    for (name, rtype, covers) in signed {
        zone.remove_rrset(&name, rtype, covers);
    }

    let origin = zone.origin().clone();
    zone.remove_rrset(&origin, RecordType::NSEC3PARAM, None);
    zone.remove_rrset(&origin, RecordType::DNSKEY, None);
}

#[cfg(test)]
mod tests {
    use data_encoding::{BASE32_DNSSEC, BASE64, HEXLOWER};

    use crate::dnssec::keys::tests::reference_key;
    use crate::dnssec::validate::{validate, KeyMap};
    use crate::dnssec::Algorithm;
    use crate::name::Name;
    use crate::rdata::{Rdata, A, AAAA, CNAME, DNAME, MX, NS, SOA, SRV, TXT};
    use crate::zone::Zone;
    use crate::RecordType;

    use super::{sign_zone, sigs_expire_before, unsign_zone, SignOptions};

    const EXPIRATION: u32 = 1398843106; // 20140430073146
    const INCEPTION: u32 = 1366443141; // 20130420073221

    fn name(name: &str) -> Name {
        Name::from_ascii(name).unwrap()
    }

    fn a(address: &str) -> Rdata {
        Rdata::A(A {
            address: address.parse().unwrap(),
        })
    }

    fn ns(target: &str) -> Rdata {
        Rdata::NS(NS { name: name(target) })
    }

    /// The unsigned example.com test zone the reference zones were produced from.
    fn test_zone() -> Zone {
        let origin = name("example.com");
        let mut zone = Zone::new(origin.clone());
        zone.insert(
            origin.clone(),
            3600,
            Rdata::SOA(SOA {
                mname: name("cns1.example.com"),
                rname: name("hostmaster.example.com"),
                serial: 2013042903,
                refresh: 3600,
                retry: 1800,
                expire: 1209600,
                minimum: 3600,
            }),
        );
        zone.insert(origin.clone(), 3600, ns("cns1.example.com"));
        zone.insert(origin.clone(), 3600, ns("cns2.example.com"));
        zone.insert(origin.clone(), 3200, a("10.128.128.10"));
        zone.insert(
            origin.clone(),
            3200,
            Rdata::AAAA(AAAA {
                address: "fc00::fc00".parse().unwrap(),
            }),
        );
        zone.insert(
            origin.clone(),
            3200,
            Rdata::MX(MX {
                preference: 10,
                exchange: name("mx1.example.org"),
            }),
        );
        zone.insert(
            origin,
            3200,
            Rdata::MX(MX {
                preference: 20,
                exchange: name("mx2.example.org"),
            }),
        );
        zone.insert(name("*.example.com"), 3200, a("10.1.2.4"));
        zone.insert(
            name("_sip._tcp.example.com"),
            3200,
            Rdata::SRV(SRV {
                priority: 0,
                weight: 5,
                port: 5060,
                target: name("sipserver.example.org"),
            }),
        );
        zone.insert(name("a.example.com"), 3200, a("10.1.2.4"));
        zone.insert(name("yljkjljk.a.example.com"), 3200, a("10.1.2.4"));
        zone.insert(name("Z.a.example.com"), 3200, a("10.1.2.4"));
        zone.insert(name("zABC.a.example.com"), 3200, a("10.1.2.4"));
        zone.insert(name("delegated.example.com"), 3200, ns("ns1.example.org"));
        zone.insert(
            name("delegation2.example.com"),
            3200,
            ns("ns1.delegation2.example.com"),
        );
        zone.insert(name("delegation2.example.com"), 3200, a("10.2.3.4"));
        zone.insert(name("ns1.delegation2.example.com"), 3200, a("10.34.12.34"));
        zone.insert(name("empty.non.terminal.example.com"), 3200, a("10.1.2.4"));
        zone.insert(
            name("test.example.com"),
            3200,
            Rdata::TXT(TXT {
                text: vec!["aaa".to_string()],
            }),
        );
        zone.insert(
            name("test.example.com"),
            3200,
            Rdata::TXT(TXT {
                text: vec!["bbb".to_string()],
            }),
        );
        zone.insert(
            name("test.example.com"),
            3200,
            Rdata::DNAME(DNAME {
                target: name("example.org"),
            }),
        );
        zone.insert(name("www.example.com"), 3200, a("10.1.2.3"));
        zone.insert(name("www.example.com"), 3200, a("10.1.2.5"));
        zone.insert(name("www.example.com"), 3200, a("10.1.2.4"));
        zone.insert(name("z.example.com"), 3200, a("10.1.2.4"));
        zone.insert(name("cns1.example.com"), 3200, a("10.4.4.3"));
        zone.insert(name("cns2.example.com"), 3200, a("10.5.4.3"));
        zone.insert(
            name("uppercase.example.com"),
            3200,
            Rdata::CNAME(CNAME {
                cname: name("UPPERCASE.EXAMPLE.ORG"),
            }),
        );
        zone
    }

    fn options(nsec3: bool) -> SignOptions {
        SignOptions {
            expiration: Some(EXPIRATION),
            inception: Some(INCEPTION),
            nsec3,
            key_ttl: 3600,
            nsec3_salt: nsec3.then(|| HEXLOWER.decode(b"05d67bb3fe7bf907").unwrap()),
            nsec3_iterations: nsec3.then_some(10),
        }
    }

    fn signature_of(
        zone: &Zone,
        owner: &Name,
        covers: RecordType,
    ) -> (crate::rdata::RRSIG, u32) {
        let rrset = zone
            .find_rrset(owner, RecordType::RRSIG, Some(covers))
            .unwrap_or_else(|| panic!("no RRSIG covering {} at {}", covers, owner));
        assert_eq!(rrset.rdatas.len(), 1);
        (rrset.rdatas[0].as_rrsig().unwrap().clone(), rrset.ttl)
    }

    fn assert_signature(zone: &Zone, owner: &str, covers: RecordType, expected_b64: &str) {
        let (rrsig, _) = signature_of(zone, &name(owner), covers);
        assert_eq!(
            BASE64.encode(&rrsig.signature),
            expected_b64,
            "unexpected signature covering {} at {}",
            covers,
            owner
        );
    }

    /// Validates every RRSIG the zone carries against the zone's own DNSKEY set.
    fn validate_whole_zone(zone: &Zone, now: u32) {
        let mut keys = KeyMap::new();
        keys.insert(
            zone.origin().clone(),
            zone.find_rrset(zone.origin(), RecordType::DNSKEY, None)
                .unwrap()
                .rdatas
                .iter()
                .map(|rdata| rdata.as_dnskey().unwrap().clone())
                .collect(),
        );

        let mut validated = 0;
        for (owner, rrset) in zone.iter() {
            if rrset.rtype == RecordType::RRSIG {
                continue;
            }
            let Some(sig_set) = zone.find_rrset(owner, RecordType::RRSIG, Some(rrset.rtype))
            else {
                continue;
            };
            let rrsigs: Vec<_> = sig_set
                .rdatas
                .iter()
                .map(|rdata| rdata.as_rrsig().unwrap().clone())
                .collect();
            validate(owner, rrset, owner, &rrsigs, &keys, Some(now)).unwrap_or_else(|e| {
                panic!("validation of {} {} failed: {}", owner, rrset.rtype, e)
            });
            validated += 1;
        }
        assert!(validated > 0);
    }

    #[test]
    fn rsasha1_nsec_zone_matches_the_reference() {
        let mut zone = test_zone();
        let key = reference_key(Algorithm::RSASHA1, false);
        sign_zone(&mut zone, std::slice::from_ref(&key), &options(false)).unwrap();

        let origin = name("example.com");

        // the apex SOA signature, byte for byte
        let (soa_sig, soa_sig_ttl) = signature_of(&zone, &origin, RecordType::SOA);
        assert_eq!(soa_sig.algorithm, Algorithm::RSASHA1);
        assert_eq!(soa_sig.labels, 2);
        assert_eq!(soa_sig.original_ttl, 3600);
        assert_eq!(soa_sig_ttl, 3600);
        assert_eq!(soa_sig.signature_expiration, EXPIRATION);
        assert_eq!(soa_sig.signature_inception, INCEPTION);
        assert_eq!(soa_sig.key_tag, 8560);
        assert_eq!(soa_sig.signer_name, origin);
        assert_eq!(
            BASE64.encode(&soa_sig.signature),
            "WvNC5PAnRTsFLHkzDUmWWxAwe2ZzhMAGz40N400PmToMAKC1xDnOD9tJi5Zxx9lhON89x1ncmmfPnIZ+Ki9U3qDbt9U0mjiE6ESmm1b+zvqFmX5lAS8jBW12OYzC6Bu6cHi2v48Y+PdHT93NlMz3HW6YJfckbq/U/NbIwEtrB1E="
        );

        assert_signature(
            &zone,
            "example.com",
            RecordType::A,
            "AbZC4qkQOeEHrt7az6QYq4PdG1GuTScsYXbI/IM1Bpw7YJD2LiQfaOSE+IrWiVHH7XniiCdOU2IT1W9R/fdUJJWk9aROE9qaCb6sNK8GgC7Kw8P76N9oMrMB0CBqqQiWZxm2vUACKkFleHljKnb3TAzVUEaZ/CInkIbgp1E4xmk=",
        );
        assert_signature(
            &zone,
            "example.com",
            RecordType::DNSKEY,
            "OVtvMgztmU7mI0zFz+YYI3MSbcLoZeSOn0a1NxT1yC1NK1ImHxnA6ewQA2X9vxrUdXSdoZu9yhEVkpuj2hhtBOWp1B2GHNLpy9Mj/8TMrmOHRT8fih/1uyuWeMQZlxwakVyGNgh6iWGXcav+96tCyWtk4bSNmRG7iwxM9huQOTo=",
        );
        assert_signature(
            &zone,
            "example.com",
            RecordType::NSEC,
            "CM6/tFqCBcX/6shqUlTMzLMzZCkuMjBr3nrUbHhu+5a4mfQt5zJuZ8LqgVojP6+ADi62kFWLNEk9rPeH5Pg30aRvaD//NfAuNV860QGF3a2c2eZiJwPXwm6ChpbIV2Z6Wb3eSx9D74rzUgcfKkhVHxD6hQh/zoqGVN+t3BzgShI=",
        );
        // the three www A records are sorted by rdata before digesting
        assert_signature(
            &zone,
            "www.example.com",
            RecordType::A,
            "mYzi3SmhzGN4zFY0IGLI04QB8h7d+I+5XVDW3mB3MFq/Zz7beOBIk6RSPovXMRpnagdmvGsp7cAT2c2Zkk1x1Hef5a10UkVd9tLMDXNpQHY+ieKZvOEhQhRci36YEBjOWSr/k8YriuBH0zECS0h/rq/VSqh/1Kwj1jB59G32lSc=",
        );
        // the uppercase CNAME target is lowercased in the canonical form
        assert_signature(
            &zone,
            "uppercase.example.com",
            RecordType::CNAME,
            "WNjX5AfwazukmXLLu3EsV2MlLKb5ShUyyf0YRSOcvS4yQyVQC3vaoeR3FjN5lj5rcFyhY1aBjn4RsjMirgZ6pJ2ACeADS6aQB3/BWoxdgvgDynf/xyiWiNDLgfxH3rJaI0y4+tprppkZC+F2gdnoUVJpYAZR7w0l31Y8lRbP3DQ=",
        );

        // the wildcard's own record is signed with labels = 2 and its unexpanded owner
        let (wildcard_sig, _) = signature_of(&zone, &name("*.example.com"), RecordType::A);
        assert_eq!(wildcard_sig.labels, 2);
        assert_eq!(
            BASE64.encode(&wildcard_sig.signature),
            "pi4NU0oru/PRLSaOu9qbPMRXXmyIhfmythEWd/qEnT0X6XoKZ/+cncYtI2/nvknM4ui88eb/uL5+g1V/JXC2ozbCwSDovZ1biz4GIVkR+fFFX04tUYwpeKSbVZcPUMiXGZHbQk/AhVMzpfEFBcDPIAbBiEFo8AiVvEMdvHtPBNA=",
        );

        // the NSEC chain in canonical order, as one circular list
        let expected_chain = [
            "example.com",
            "*.example.com",
            "_sip._tcp.example.com",
            "a.example.com",
            "yljkjljk.a.example.com",
            "Z.a.example.com",
            "zABC.a.example.com",
            "cns1.example.com",
            "cns2.example.com",
            "delegated.example.com",
            "delegation2.example.com",
            "empty.non.terminal.example.com",
            "test.example.com",
            "uppercase.example.com",
            "www.example.com",
            "z.example.com",
        ];
        for (i, owner) in expected_chain.iter().enumerate() {
            let next = expected_chain[(i + 1) % expected_chain.len()];
            let rrset = zone
                .find_rrset(&name(owner), RecordType::NSEC, None)
                .unwrap_or_else(|| panic!("no NSEC at {}", owner));
            assert_eq!(rrset.ttl, 3600);
            assert_eq!(
                rrset.rdatas[0].as_nsec().unwrap().next_domain_name,
                name(next),
                "wrong NSEC successor of {}",
                owner
            );
        }

        // apex type bitmap
        let apex_nsec = zone.find_rrset(&origin, RecordType::NSEC, None).unwrap();
        assert_eq!(
            apex_nsec.rdatas[0].as_nsec().unwrap().types,
            vec![
                RecordType::A,
                RecordType::NS,
                RecordType::SOA,
                RecordType::MX,
                RecordType::AAAA,
                RecordType::RRSIG,
                RecordType::NSEC,
                RecordType::DNSKEY,
            ]
        );

        // the delegation NS set and the glue are not signed
        assert!(zone
            .find_rrset(&name("delegated.example.com"), RecordType::RRSIG, Some(RecordType::NS))
            .is_none());
        assert!(zone
            .node(&name("ns1.delegation2.example.com"))
            .unwrap()
            .find(RecordType::NSEC, None)
            .is_none());
        assert!(zone
            .node(&name("ns1.delegation2.example.com"))
            .unwrap()
            .find(RecordType::RRSIG, Some(RecordType::A))
            .is_none());

        validate_whole_zone(&zone, 1390000000);
    }

    #[test]
    fn rsasha1_nsec3_zone_matches_the_reference() {
        let mut zone = test_zone();
        let key = reference_key(Algorithm::RSASHA1NSEC3SHA1, false);
        sign_zone(&mut zone, std::slice::from_ref(&key), &options(true)).unwrap();

        let origin = name("example.com");

        // NSEC3PARAM at the apex
        let param_set = zone
            .find_rrset(&origin, RecordType::NSEC3PARAM, None)
            .unwrap();
        assert_eq!(param_set.ttl, 3600);
        let param = param_set.rdatas[0].as_nsec3param().unwrap();
        assert_eq!(param.flags, 0);
        assert_eq!(param.iterations, 10);
        assert_eq!(
            param.salt.as_deref(),
            Some(HEXLOWER.decode(b"05d67bb3fe7bf907").unwrap().as_slice())
        );

        assert_signature(
            &zone,
            "example.com",
            RecordType::SOA,
            "ouKIq416BC64zpChwdw4/HcHqQLgDiNHIZqdSMOnFGW5UmOtqYzC6TN6TXN2nVCi2cC0wZJdpgX//wTCAkzh3UPD6lcPpoMvG6v5zt0NYesa/fy5z2Ms5/UCwnrtw32jSUjomY0KIhLHL5yO9aItrIMh/CqmGb12H/tBor4Rp5Q=",
        );
        assert_signature(
            &zone,
            "*.example.com",
            RecordType::A,
            "JTFtpPH9+CSoanwr7cCrtFmfuifiVV8CQBWpGbOr3Er3cj4boYxQhpPm1upCPhuI41x+um1BWd9tBxL6o+qjOeyj9rBzVAGDsZdF87n34qvY741cv/Z4trIoco2lFvizf8rouFvC+TNxZ2Xwmnx58VQddhrF+3xH5WL9fAMxJxg=",
        );

        // every data name (plus the three empty non-terminals) got exactly one hashed owner
        let expected_owners = [
            "1iohp8j7vsr7h24al82qi9b0n3m7o2jt", // delegated
            "55quulbf2cj6nvm5odj6rmmer1985s95", // delegation2
            "61fcihg3gtvgh50kcnm0k3nlprqhvk0j", // uppercase
            "6nvejcs9vh19cvlaipno1p94s20t3eu3", // z
            "6r1v3vosorqt80kb3ailjib5a7n3cnlk", // the apex
            "884sems3cdr70nhc4d9qhno9a449gslj", // Z.a
            "9kpaurblh2ncekbdnnuml8o6tegktpve", // a
            "a6t3254d1semge7fq420mfvqjkg7bgtf",
            "d34nh4783sq7etvv6s4u35hn2dar42v4", // www
            "djikj02ef37hp4d50jij9v3g79u5aee5",
            "fiqcf70a6339k96ef2scbk4vkmm0p1j8", // the wildcard
            "i2ferdohnjamei8n3rpmbv4lf5pt4ubg", // cns2
            "i887uaqoprdnmesu0ughr7sheqaug3h1", // zABC.a
            "iu0ms05m0tb8if6q0hsa6pnppi75ap3g", // test
            "n5cr9nt1bf55rgf5rirpoc8dh48bdm1r", // empty.non.terminal
            "q4s8hrhd7c8s824nkql0a52ng50mhtut",
            "rdkf8d33qe24o2v2q21na3lbk3oaakcu", // cns1
            "vcfnvpc2eqaspricadp3cigdgm8ujef8", // yljkjljk.a
            "vju5kq0s3pj4fig4aev90i6m30m4ccsk", // _sip._tcp
        ];

        let nsec3_owners: Vec<String> = zone
            .iter()
            .filter(|(_, rrset)| rrset.rtype == RecordType::NSEC3)
            .map(|(owner, _)| {
                let mut owner = owner.clone();
                owner.pop_front_label().unwrap().to_string()
            })
            .collect();
        // hashed owners sort like their hashes, so the canonical zone walk is the hash order
        assert_eq!(nsec3_owners, expected_owners.map(String::from));

        // the chain is circular in hash order
        for (i, owner_hash) in expected_owners.iter().enumerate() {
            let next = expected_owners[(i + 1) % expected_owners.len()];
            let owner = name(&format!("{}.example.com", owner_hash));
            let rrset = zone.find_rrset(&owner, RecordType::NSEC3, None).unwrap();
            assert_eq!(rrset.ttl, 3600);
            let nsec3 = rrset.rdatas[0].as_nsec3().unwrap();
            assert_eq!(nsec3.iterations, 10);
            assert!(!nsec3.opt_out);
            assert_eq!(
                BASE32_DNSSEC.encode(&nsec3.next_hashed_owner),
                next,
                "wrong NSEC3 successor of {}",
                owner_hash
            );
        }

        // the apex bitmap includes NSEC3PARAM, the delegation's only its NS set, and the empty
        // non-terminals none at all
        let apex_owner = name("6r1v3vosorqt80kb3ailjib5a7n3cnlk.example.com");
        let apex = zone.find_rrset(&apex_owner, RecordType::NSEC3, None).unwrap();
        assert_eq!(
            apex.rdatas[0].as_nsec3().unwrap().types,
            vec![
                RecordType::A,
                RecordType::NS,
                RecordType::SOA,
                RecordType::MX,
                RecordType::AAAA,
                RecordType::RRSIG,
                RecordType::DNSKEY,
                RecordType::NSEC3PARAM,
            ]
        );

        let delegated_owner = name("1iohp8j7vsr7h24al82qi9b0n3m7o2jt.example.com");
        let delegated = zone
            .find_rrset(&delegated_owner, RecordType::NSEC3, None)
            .unwrap();
        assert_eq!(delegated.rdatas[0].as_nsec3().unwrap().types, vec![RecordType::NS]);
        // the delegation's bitmap has no RRSIG bit, but the NSEC3 record itself is still signed
        assert!(zone
            .find_rrset(&delegated_owner, RecordType::RRSIG, Some(RecordType::NSEC3))
            .is_some());

        let ent_owner = name("q4s8hrhd7c8s824nkql0a52ng50mhtut.example.com");
        let ent = zone.find_rrset(&ent_owner, RecordType::NSEC3, None).unwrap();
        assert!(ent.rdatas[0].as_nsec3().unwrap().types.is_empty());

        // the NSEC3 record of the apex is signed like any other authoritative set
        assert_signature(
            &zone,
            "6r1v3vosorqt80kb3ailjib5a7n3cnlk.example.com",
            RecordType::NSEC3,
            "bW0wMJq3OHsSlRuTpvb6Zr01L+OdJ+UjHR3ACeT/76nA10Vzl3VfO9SyLaQX6hYjq6y7Lo+2vCuwy0IhylDJfex/UtcNjCsa/n8qzI2Gy/UvFVOC27sAnQLKuN7p1oSWtBhI7ZtuAhW8+aJfQMwLsZ9PIXXdkFHAC4ei88VZq34=",
        );

        validate_whole_zone(&zone, 1390000000);
    }

    #[test]
    fn a_lone_ksk_signs_the_whole_zone() {
        let mut zone = test_zone();
        let key = reference_key(Algorithm::RSASHA256, true);
        sign_zone(&mut zone, std::slice::from_ref(&key), &options(true)).unwrap();

        let (dnskey_sig, _) = signature_of(&zone, &name("example.com"), RecordType::DNSKEY);
        assert_eq!(dnskey_sig.key_tag, 8564);
        assert_eq!(
            BASE64.encode(&dnskey_sig.signature),
            "prfzEAXyF17efx4vIfbTcP5OrTtFiEXxhzoW2bhFjs/UNdJi/SRGSg9mUGDePq0l93cnaYMvkO+FEi3cc3Tqh4g6AGayhmeU/GSWsmU1+oP+fnBroOdtxseci9hxY4bTh4cBl77pMzveJzNvORK3/cMLP+OR4kPOcZna45KFKIc="
        );
        // no zone signing key is present, so the key signing key signs the zone data too
        assert_signature(
            &zone,
            "example.com",
            RecordType::SOA,
            "GndSN/VPy5aFMWP+BqS80Z189CCXs/iOeYvO++6g6xOKrFhvEylpzsWys6QUBxLxfzSIfxohdW0kiPnYwcufHAjNgzWzpwJ7OnZ38TD+h1iCFVhXkSyYMmDCupF4D2KFLbPuXxRNPhnVYLE8TiBdOS+JnBQc7jBEpCH1vS/rIEk="
        );

        validate_whole_zone(&zone, 1390000000);
    }

    #[test]
    fn rsasha512_signatures_match_the_reference() {
        let mut zone = test_zone();
        let key = reference_key(Algorithm::RSASHA512, true);
        sign_zone(&mut zone, std::slice::from_ref(&key), &options(true)).unwrap();

        let (soa_sig, _) = signature_of(&zone, &name("example.com"), RecordType::SOA);
        assert_eq!(soa_sig.key_tag, 8566);
        assert_eq!(
            BASE64.encode(&soa_sig.signature),
            "Tjgd1g5iVvdfnJYFI5XSDQNiZCU9BG2hOLVzcdxgJMd7FGQVrv1XTJVO3SG5RulDVd5Vi6QRtM1kqkTIdAJ7w4Kjc3OiFX/jcMMCITtZdujmVlzZwrUOodDQqzq/obl3zgdaAWtvsPwdTamYWRY+eCZTsNFLbB+PS7r5M69rllg="
        );

        validate_whole_zone(&zone, 1390000000);
    }

    #[test]
    fn signing_and_unsigning_restores_the_original_zone() {
        let original = test_zone();

        for nsec3 in [false, true] {
            let mut zone = original.clone();
            let key = reference_key(Algorithm::RSASHA1, false);
            sign_zone(&mut zone, std::slice::from_ref(&key), &options(nsec3)).unwrap();
            assert_ne!(zone, original);

            unsign_zone(&mut zone);
            assert_eq!(zone, original);
        }
    }

    #[test]
    fn expiring_signatures_are_detected() {
        let mut zone = test_zone();
        assert!(!sigs_expire_before(&zone, u32::MAX));

        let key = reference_key(Algorithm::RSASHA1, false);
        sign_zone(&mut zone, std::slice::from_ref(&key), &options(false)).unwrap();

        assert!(!sigs_expire_before(&zone, EXPIRATION));
        assert!(sigs_expire_before(&zone, EXPIRATION + 1));
    }

    #[test]
    fn signing_a_zone_without_soa_fails() {
        let mut zone = Zone::new(name("example.com"));
        zone.insert(name("www.example.com"), 3600, a("192.0.2.1"));

        let key = reference_key(Algorithm::RSASHA1, false);
        let result = sign_zone(&mut zone, std::slice::from_ref(&key), &options(false));
        assert!(result.is_err());
    }
}
