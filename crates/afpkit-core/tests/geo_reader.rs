use afpkit_core::error::AfpKitError;
use afpkit_core::geo::parse_geo;

fn be32(buf: &mut Vec<u8>, v: u32) {
    buf.extend_from_slice(&v.to_be_bytes());
}

/// Blank 16x16 shape with rect points, an unknown block and a label.
fn shape() -> Vec<u8> {
    shape_labelled(b"00_shape5\0")
}

fn shape_labelled(label: &[u8]) -> Vec<u8> {
    let mut b = Vec::new();
    b.extend_from_slice(b"GE2D");
    be32(&mut b, 0x0001_0000);
    be32(&mut b, 0x0001_0100);
    be32(&mut b, 0); // file size, unused here
    be32(&mut b, 0);
    b.extend_from_slice(&1024u16.to_le_bytes());
    b.extend_from_slice(&0u16.to_le_bytes());
    be32(&mut b, 0);
    be32(&mut b, 0x0001_0000);
    // offsets at 0x20
    be32(&mut b, 0x34); // rect points
    be32(&mut b, 0x54); // texture points
    be32(&mut b, 0); // reserved
    be32(&mut b, 0x80); // label pointer slot
    be32(&mut b, 0x74); // unknown
    assert_eq!(b.len(), 0x34);
    for v in [0.0f32, 0.0, 8.0, 0.0, 0.0, 8.0, 8.0, 8.0] {
        b.extend_from_slice(&v.to_be_bytes());
    }
    for v in [0.0f32, 0.0, 0.25, 0.0, 0.0, 0.25, 0.25, 0.25] {
        b.extend_from_slice(&v.to_be_bytes());
    }
    assert_eq!(b.len(), 0x74);
    for v in [3i32, -1, 0x10] {
        b.extend_from_slice(&v.to_le_bytes());
    }
    b.resize(0x80, 0);
    be32(&mut b, 0x84);
    b.extend_from_slice(label);
    b
}

#[test]
fn parses_every_section() {
    let info = parse_geo(&shape()).expect("parse");
    assert_eq!(info.texture_width, 1024);
    assert_eq!(info.texture_height, 0);
    assert_eq!(info.offsets.rect_points, 0x34);
    assert_eq!(info.label.as_deref(), Some("00_shape5"));
    assert_eq!(
        info.rect_points,
        Some([(0.0, 0.0), (16.0, 0.0), (0.0, 16.0), (16.0, 16.0)])
    );
    assert_eq!(
        info.texture_points,
        Some([(0.0, 0.0), (512.0, 0.0), (0.0, 512.0), (512.0, 512.0)])
    );
    assert_eq!(info.unknown, Some([3, -1, 0x10]));
}

#[test]
fn labels_are_shift_jis() {
    // "テスト"
    let buf = shape_labelled(&[0x83, 0x65, 0x83, 0x58, 0x83, 0x67, 0x00]);
    let info = parse_geo(&buf).expect("parse");
    assert_eq!(info.label.as_deref(), Some("テスト"));
}

#[test]
fn zero_offsets_are_absent() {
    let mut buf = shape();
    buf[0x20..0x34].fill(0);
    let info = parse_geo(&buf).expect("parse");
    assert!(info.label.is_none());
    assert!(info.rect_points.is_none());
    assert!(info.texture_points.is_none());
    assert!(info.unknown.is_none());
}

#[test]
fn rejects_bad_magic_and_reserved_offset() {
    let mut buf = shape();
    buf[..4].copy_from_slice(b"GE3D");
    assert!(matches!(parse_geo(&buf), Err(AfpKitError::InvalidGeo(_))));

    let mut buf = shape();
    buf[0x28..0x2c].copy_from_slice(&1u32.to_be_bytes());
    assert!(matches!(parse_geo(&buf), Err(AfpKitError::InvalidGeo(_))));
}

#[test]
fn truncated_sections_are_overruns() {
    let buf = shape();
    assert!(matches!(
        parse_geo(&buf[..0x40]),
        Err(AfpKitError::BufferOverrun { .. })
    ));

    let mut unterminated = buf.clone();
    unterminated.pop();
    assert!(matches!(
        parse_geo(&unterminated),
        Err(AfpKitError::InvalidGeo(_))
    ));
}
