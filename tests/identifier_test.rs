use std::collections::HashSet;

use galactic_netconf::identifier::{Allocator, Keyspace, MAX_VPC, MAX_VPC_ATTACHMENT};
use galactic_netconf::{Error, MAX_ATTEMPTS};

fn set(ids: &[&str]) -> HashSet<String> {
    ids.iter().map(|id| id.to_string()).collect()
}

#[test]
fn test_render_vpc_identifiers() {
    let cases: &[(&str, u64, Option<&str>)] = &[
        ("special min", 0, None),
        ("special max", MAX_VPC, None),
        ("valid min", 1, Some("000000000001")),
        ("valid max", MAX_VPC - 1, Some("fffffffffffe")),
        ("valid", 12345, Some("000000003039")),
        ("above max", MAX_VPC + 1, None),
    ];

    for (name, value, want) in cases {
        let got = Keyspace::VPC.render(*value).ok();
        assert_eq!(got.as_deref(), *want, "{name}");
    }
}

#[test]
fn test_render_vpc_attachment_identifiers() {
    let cases: &[(&str, u64, Option<&str>)] = &[
        ("special min", 0, None),
        ("special max", MAX_VPC_ATTACHMENT, None),
        ("valid min", 1, Some("0001")),
        ("valid max", MAX_VPC_ATTACHMENT - 1, Some("fffe")),
        ("valid", 12345, Some("3039")),
        ("above max", MAX_VPC_ATTACHMENT + 1, None),
    ];

    for (name, value, want) in cases {
        let got = Keyspace::VPC_ATTACHMENT.render(*value).ok();
        assert_eq!(got.as_deref(), *want, "{name}");
    }
}

#[test]
fn test_parse_rejects_malformed_identifiers() {
    assert_eq!(Keyspace::VPC_ATTACHMENT.parse("3039").unwrap(), 12345);
    for bad in ["", "039", "03039", "FFFE", "+fff", "0000", "ffff", "zzzz"] {
        let err = Keyspace::VPC_ATTACHMENT.parse(bad).unwrap_err();
        assert!(matches!(err, Error::InvalidIdentifier(_)), "{bad:?}");
    }
}

#[test]
fn test_allocate_attachment_identifier_in_range() -> Result<(), Box<dyn std::error::Error>> {
    let mut allocator = Allocator::from_seed(424242);
    for _ in 0..1000 {
        let id = allocator.allocate(&HashSet::new(), Keyspace::VPC_ATTACHMENT)?;
        assert_eq!(id.len(), 4);
        let value = u64::from_str_radix(&id, 16)?;
        assert!((1..=0xFFFE).contains(&value), "{id}");
    }
    Ok(())
}

#[test]
fn test_allocate_vpc_identifier_width() -> Result<(), Box<dyn std::error::Error>> {
    let mut allocator = Allocator::from_entropy();
    let id = allocator.for_vpc(&HashSet::new())?;
    assert_eq!(id.len(), 12);
    assert!(id.bytes().all(|b| b.is_ascii_hexdigit() && !b.is_ascii_uppercase()));
    Keyspace::VPC.parse(&id)?;
    Ok(())
}

#[test]
fn test_allocate_skips_existing_identifiers() -> Result<(), Box<dyn std::error::Error>> {
    let keyspace = Keyspace::new(4)?;
    let existing = set(&["1", "3"]);
    for seed in 0..20 {
        let mut allocator = Allocator::from_seed(seed);
        assert_eq!(allocator.allocate(&existing, keyspace)?, "2");
    }
    Ok(())
}

#[test]
fn test_allocate_fails_when_keyspace_is_full() -> Result<(), Box<dyn std::error::Error>> {
    let mut allocator = Allocator::from_seed(7);
    let err = allocator
        .allocate(&set(&["1", "2", "3"]), Keyspace::new(4)?)
        .unwrap_err();

    assert!(err.is_transient());
    assert!(matches!(err, Error::Exhausted { attempts } if attempts == MAX_ATTEMPTS));
    assert_eq!(MAX_ATTEMPTS, 100);
    Ok(())
}

#[test]
fn test_allocate_fails_when_attachment_keyspace_is_full() {
    let existing: HashSet<String> = (1..MAX_VPC_ATTACHMENT)
        .map(|value| format!("{value:04x}"))
        .collect();
    let mut allocator = Allocator::from_seed(1);
    let err = allocator.for_vpc_attachment(&existing).unwrap_err();
    assert!(matches!(err, Error::Exhausted { attempts: 100 }));
}

#[test]
fn test_same_seed_same_sequence() -> Result<(), Box<dyn std::error::Error>> {
    let mut a = Allocator::from_seed(424242);
    let mut b = Allocator::from_seed(424242);
    let none = HashSet::new();
    for _ in 0..10 {
        assert_eq!(a.for_vpc(&none)?, b.for_vpc(&none)?);
    }
    Ok(())
}

#[test]
fn test_repeated_allocation_with_growing_snapshot() -> Result<(), Box<dyn std::error::Error>> {
    let keyspace = Keyspace::new(0x100)?;
    let mut allocator = Allocator::from_seed(99);
    let mut existing = HashSet::new();

    for _ in 0..64 {
        let id = allocator.allocate(&existing, keyspace)?;
        assert!(!existing.contains(&id));
        existing.insert(id);
    }
    assert_eq!(existing.len(), 64);
    Ok(())
}

#[test]
fn test_allocation_is_uniform() -> Result<(), Box<dyn std::error::Error>> {
    let keyspace = Keyspace::new(3)?;
    let mut allocator = Allocator::from_seed(2024);
    let none = HashSet::new();

    let mut ones = 0;
    for _ in 0..2000 {
        if allocator.allocate(&none, keyspace)? == "1" {
            ones += 1;
        }
    }
    assert!((850..=1150).contains(&ones), "{ones} of 2000 draws were 1");
    Ok(())
}

#[test]
fn test_injected_generator() -> Result<(), Box<dyn std::error::Error>> {
    use rand::rngs::mock::StepRng;

    // A generator that always yields zero lands on the bottom of the range
    let mut allocator = Allocator::new(StepRng::new(0, 0));
    assert_eq!(allocator.for_vpc_attachment(&HashSet::new())?, "0001");

    let err = allocator.for_vpc_attachment(&set(&["0001"])).unwrap_err();
    assert!(matches!(err, Error::Exhausted { .. }));
    Ok(())
}
