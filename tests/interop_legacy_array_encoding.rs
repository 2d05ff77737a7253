#![forbid(unsafe_code)]

use levinode::wire::constants::PORTABLE_STORAGE_HEADER;
use levinode::wire::storage::{decode_payload, Section, Value};

// Some real peers still emit the legacy two-byte "array of entry" form
// (tag 13, then a second byte with the array bit set) instead of the
// collapsed single-byte `0x8C` this codec's own encoder produces. Build
// that legacy byte layout by hand to confirm the decoder still accepts
// peerlists shaped that way.
#[test]
fn decoder_accepts_legacy_two_byte_array_of_section_tag() {
    let mut payload = PORTABLE_STORAGE_HEADER.to_vec();
    payload.push(0x04); // varint(1): one field in the root section
    payload.push(0x12); // name_len = 18 (raw byte, not a varint)
    payload.extend_from_slice(b"local_peerlist_old");
    payload.push(13); // legacy ARRAY_OF_ENTRY_TAG
    payload.push(0x0C | 0x80); // inner tag: section (12) | array bit
    payload.push(0x04); // varint(1): one entry
    payload.push(0x04); // varint(1): that section has one field
    payload.push(0x02); // name_len = 2
    payload.extend_from_slice(b"id");
    payload.push(0x05); // tag: U64
    payload.extend_from_slice(&7u64.to_le_bytes());

    let decoded = decode_payload(&payload).expect("legacy array form decodes");

    let mut expected_entry = Section::new();
    expected_entry.insert("id", Value::U64(7));
    assert_eq!(
        decoded.get("local_peerlist_old"),
        Some(&Value::ArrayOfSection(vec![expected_entry]))
    );
}

#[test]
fn decoder_warns_but_still_accepts_malformed_legacy_inner_tag() {
    // Here the byte following the legacy tag 13 does NOT have the array
    // bit set, which real implementations treat as malformed but still
    // parse by stripping the (absent) bit and reading one section.
    let mut payload = PORTABLE_STORAGE_HEADER.to_vec();
    payload.push(0x04); // varint(1): one field in the root section
    payload.push(0x01); // name_len = 1
    payload.push(b'a');
    payload.push(13);
    payload.push(0x0C); // array bit NOT set
    payload.push(0x04); // varint(1): one entry
    payload.push(0x00); // varint(0): empty section

    let decoded = decode_payload(&payload).expect("malformed legacy tag still decodes");
    assert_eq!(decoded.get("a"), Some(&Value::ArrayOfSection(vec![Section::new()])));
}
