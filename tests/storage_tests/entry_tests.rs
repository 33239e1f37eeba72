//! Tests for the entry reader
//!
//! These tests verify:
//! - Length-prefixed entries are sliced exactly
//! - Reads never run past the declared length
//! - Offsets and lengths outside the entries region are rejected

use std::io::Cursor;

use wikistore::storage::{read_entry, ByteReader, ENTRY_LENGTH_WIDTH};
use wikistore::StoreError;

#[path = "../common/mod.rs"]
mod common;

use common::{assemble, encode_record, StoreFixture};

fn entry_bytes(payload: &[u8]) -> Vec<u8> {
    let mut bytes = (payload.len() as u32).to_le_bytes()[..3].to_vec();
    bytes.extend_from_slice(payload);
    bytes
}

#[test]
fn test_read_entry_round_trip() {
    let mut region = entry_bytes(b"first");
    let second_at = region.len() as u64;
    region.extend(entry_bytes(b"second payload"));
    let end = region.len() as u64;
    let mut reader = ByteReader::new(Cursor::new(region)).unwrap();

    let first = read_entry(&mut reader, 0, end).unwrap();
    let second = read_entry(&mut reader, second_at, end).unwrap();

    assert_eq!(&first[..], b"first");
    assert_eq!(&second[..], b"second payload");
}

#[test]
fn test_read_entry_consumes_exactly_its_length() {
    let payload = vec![0x5a; 300];
    let mut region = vec![0u8; 17];
    let offset = region.len() as u64;
    region.extend(entry_bytes(&payload));
    region.extend_from_slice(b"trailing");
    let end = region.len() as u64;
    let mut reader = ByteReader::new(Cursor::new(region)).unwrap();

    let entry = read_entry(&mut reader, offset, end).unwrap();

    assert_eq!(entry.len(), 300);
    assert_eq!(
        reader.position(),
        offset + ENTRY_LENGTH_WIDTH as u64 + payload.len() as u64
    );
}

#[test]
fn test_read_empty_entry() {
    let region = entry_bytes(b"");
    let mut reader = ByteReader::new(Cursor::new(region)).unwrap();

    let entry = read_entry(&mut reader, 0, 3).unwrap();

    assert!(entry.is_empty());
}

#[test]
fn test_read_entry_large_length_prefix() {
    // Lengths use all three bytes
    let payload = vec![7u8; 0x01_0203];
    let region = entry_bytes(&payload);
    assert_eq!(&region[..3], &[0x03, 0x02, 0x01]);
    let end = region.len() as u64;
    let mut reader = ByteReader::new(Cursor::new(region)).unwrap();

    assert_eq!(read_entry(&mut reader, 0, end).unwrap().len(), 0x01_0203);
}

#[test]
fn test_read_entry_offset_outside_region() {
    let region = entry_bytes(b"abc");
    let end = region.len() as u64;
    let mut reader = ByteReader::new(Cursor::new(region)).unwrap();

    for offset in [end, end - 2, u64::MAX] {
        let result = read_entry(&mut reader, offset, end);
        assert!(
            matches!(result, Err(StoreError::InvalidArgument(_))),
            "offset {} accepted",
            offset
        );
    }
}

#[test]
fn test_read_entry_length_past_region() {
    let mut region = entry_bytes(b"abc");
    // Claim more bytes than the region holds
    region[0] = 200;
    let end = region.len() as u64;
    let mut reader = ByteReader::new(Cursor::new(region)).unwrap();

    let result = read_entry(&mut reader, 0, end);

    assert!(matches!(result, Err(StoreError::MalformedStore(_))));
}

#[test]
fn test_entry_cannot_reach_into_index() {
    // The entries region ends where the second-level index begins
    let entries = entry_bytes(b"xy");
    let mut entries_claiming_more = entries.clone();
    entries_claiming_more[0] = 10;
    let records = encode_record(0, "abcd", 0);
    let bytes = assemble(&entries_claiming_more, &records, &[("abcd", 0)]);
    let store = wikistore::Store::from_source(Cursor::new(bytes), Default::default()).unwrap();

    let result = store.fetch_entry_bytes(0);

    assert!(matches!(result, Err(StoreError::MalformedStore(_))));
}

#[test]
fn test_fetch_entry_from_fixture() {
    let built = StoreFixture::new()
        .entry("a", b"payload-a")
        .entry("b", b"payload-b")
        .build();
    let store = built.open();

    let entry = store.fetch_entry_bytes(built.offset_of("b")).unwrap();

    assert_eq!(&entry[..], b"payload-b");
}
