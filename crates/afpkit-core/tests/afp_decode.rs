use afpkit_core::afp::{AfpHeader, string_table_entries};
use afpkit_core::decode_afp;
use afpkit_core::error::AfpKitError;

const TABLE_OFFSET: usize = 0x40;
const TABLE: &[u8; 16] = b"00\0\0aeplib\0\0abc\0";

fn mask(x: u8, i: usize) -> u8 {
    x.wrapping_sub(0x80).wrapping_add(i as u8)
}

/// Buffer as stored on disk: magic and size big-endian, string table masked.
fn obfuscated() -> Vec<u8> {
    let mut buf = vec![0u8; TABLE_OFFSET + TABLE.len()];
    buf[0..4].copy_from_slice(b"FPGN");
    let len = buf.len() as u32;
    buf[4..8].copy_from_slice(&len.to_be_bytes());
    buf[8..10].copy_from_slice(&7u16.to_le_bytes());
    buf[0x30..0x34].copy_from_slice(&(TABLE_OFFSET as u32).to_le_bytes());
    buf[0x34..0x38].copy_from_slice(&(TABLE.len() as u32).to_le_bytes());
    for (i, &b) in TABLE.iter().enumerate() {
        buf[TABLE_OFFSET + i] = mask(b, i);
    }
    buf
}

#[test]
fn swaps_then_unmasks() {
    let afp = obfuscated();
    // one instruction: two u32 swaps from offset 0
    let bsi = [0x80, 0x40, 0x00, 0x00];
    let decoded = decode_afp(&afp, &bsi).expect("decode");

    assert_eq!(decoded.swaps, 2);
    assert_eq!(&decoded.header.magic, b"NGPF");
    assert_eq!(decoded.header.magic_display(), "NGPF");
    assert_eq!(decoded.header.declared_size as usize, afp.len());
    assert_eq!(decoded.header.flag, 7);
    assert_eq!(&decoded.data[TABLE_OFFSET..], TABLE.as_slice());

    let entries = string_table_entries(&decoded.data, &decoded.header).expect("entries");
    assert_eq!(entries, vec!["00", "aeplib", "abc"]);
    assert_eq!(AfpHeader::parse(&decoded.data).expect("header"), decoded.header);
}

#[test]
fn leading_terminator_only_unmasks() {
    let afp = obfuscated();
    let decoded = decode_afp(&afp, &[0x00, 0x00, 0x80, 0x40]).expect("decode");
    assert_eq!(decoded.swaps, 0);
    assert_eq!(&decoded.data[..TABLE_OFFSET], &afp[..TABLE_OFFSET]);
    assert_eq!(&decoded.data[TABLE_OFFSET..], TABLE.as_slice());
}

#[test]
fn empty_bsi_is_a_terminator() {
    let afp = obfuscated();
    let decoded = decode_afp(&afp, &[]).expect("decode");
    assert_eq!(&decoded.data[..TABLE_OFFSET], &afp[..TABLE_OFFSET]);
}

#[test]
fn failed_decode_leaves_input_alone() {
    let afp = obfuscated();
    let before = afp.clone();
    // valid swap followed by a type-0 instruction
    let err = decode_afp(&afp, &[0x00, 0x20, 0x01, 0x00]).unwrap_err();
    assert!(matches!(err, AfpKitError::UnsupportedSwapType { bsi_offset: 2, .. }));
    assert_eq!(afp, before);
}

#[test]
fn swapped_descriptor_is_read_after_swapping() {
    // descriptor stored big-endian; BSI flips both u32 fields at 0x30
    let mut afp = obfuscated();
    afp[0x30..0x34].copy_from_slice(&(TABLE_OFFSET as u32).to_be_bytes());
    afp[0x34..0x38].copy_from_slice(&(TABLE.len() as u32).to_be_bytes());
    // offset 0x18 units = 0x30 bytes, type 2, two loops
    let word: u16 = (2 << 13) | (1 << 7) | 0x18;
    let decoded = decode_afp(&afp, &word.to_le_bytes()).expect("decode");
    assert_eq!(decoded.header.string_table_offset as usize, TABLE_OFFSET);
    assert_eq!(decoded.header.string_table_size as usize, TABLE.len());
    assert_eq!(&decoded.data[TABLE_OFFSET..], TABLE.as_slice());
}
