use afpkit_core::prelude::*;
use afpkit_core::{image_name, img_rect, texture_name, uv_rect};

#[test]
fn rect_encodings_double_and_inset() {
    let r = Rect::new(10, 20, 30, 40);
    assert_eq!(img_rect(&r), Some([20, 80, 40, 120]));
    assert_eq!(uv_rect(&r), Some([22, 78, 42, 118]));
    assert_eq!(texture_name(0), "tex000");
    assert_eq!(texture_name(12), "tex012");
    assert_eq!(image_name("frames/a00.png"), "a00");
    assert_eq!(image_name("plain"), "plain");
}

#[test]
fn rect_encodings_stop_at_u16() {
    // 32767 * 2 is the last edge that fits a u16 field
    assert_eq!(img_rect(&Rect::new(0, 0, 32767, 1)), Some([0, 65534, 0, 2]));
    assert_eq!(img_rect(&Rect::new(0, 0, 32768, 1)), None);
    assert_eq!(uv_rect(&Rect::new(32767, 0, 1, 1)), None);
    assert_eq!(img_rect(&Rect::new(u32::MAX, 0, u32::MAX, 1)), None);
}

#[test]
fn oversized_pages_fail_instead_of_overflowing() {
    let cfg = PackerConfig::builder()
        .with_page_size(u32::MAX, 4)
        .build();
    let atlas = pack_layout(vec![("a", u32::MAX, 1)], cfg.clone()).expect("pack");
    assert!(matches!(
        to_texturelist_xml(&atlas, &cfg),
        Err(AfpKitError::InvalidDimensions { width: u32::MAX, height: 4 })
    ));

    // page fits u16 but the doubled placement edge does not
    let cfg = PackerConfig::builder().with_page_size(40000, 8).build();
    let atlas = pack_layout(vec![("wide", 40000, 8)], cfg.clone()).expect("pack");
    assert!(to_texturelist_xml(&atlas, &cfg).is_err());

    let cfg = PackerConfig::builder().with_page_size(32767, 8).build();
    let atlas = pack_layout(vec![("edge", 32767, 8)], cfg.clone()).expect("pack");
    let xml = to_texturelist_xml(&atlas, &cfg).expect("xml");
    assert!(xml.contains("<imgrect __type=\"4u16\">0 65534 0 16</imgrect>"));
}

#[test]
fn texturelist_xml_lists_every_page_and_image() {
    let cfg = PackerConfig::default();
    let atlas = pack_layout(
        vec![("in/a00.png", 600, 600), ("in/a01.png", 600, 600), ("in/dot.png", 4, 4)],
        cfg.clone(),
    )
    .expect("pack");
    let xml = to_texturelist_xml(&atlas, &cfg).expect("xml");

    assert!(xml.starts_with("<texturelist compress=\"avslz\">\n"));
    assert!(xml.trim_end().ends_with("</texturelist>"));
    assert_eq!(xml.matches("<texture ").count(), 2);
    assert!(xml.contains(
        "<texture format=\"argb8888rev\" mag_filter=\"nearest\" min_filter=\"nearest\" name=\"tex000\" wrap_s=\"clamp\" wrap_t=\"clamp\">"
    ));
    assert!(xml.contains("name=\"tex001\""));
    assert!(xml.contains("<size __type=\"2u16\">1024 1024</size>"));
    assert!(xml.contains("<image name=\"a00\">"));
    assert!(xml.contains("<uvrect __type=\"4u16\">2 1198 2 1198</uvrect>"));
    assert!(xml.contains("<imgrect __type=\"4u16\">0 1200 0 1200</imgrect>"));
    // dot lands right of a00 on page 0
    assert!(xml.contains("<imgrect __type=\"4u16\">1200 1208 0 8</imgrect>"));
}

#[test]
fn xml_attributes_are_escaped() {
    let cfg = PackerConfig::default();
    let atlas = pack_layout(vec![("a&b<c>.png", 8, 8)], cfg.clone()).expect("pack");
    let xml = to_texturelist_xml(&atlas, &cfg).expect("xml");
    assert!(xml.contains("<image name=\"a&amp;b&lt;c&gt;\">"));
}

#[test]
fn json_hash_is_keyed_by_identifier() {
    let atlas = pack_layout(vec![("a", 600, 600), ("b", 600, 600)], PackerConfig::default())
        .expect("pack");
    let v = to_json_hash(&atlas);
    let frames = v["frames"].as_object().expect("frames object");
    assert_eq!(frames.len(), 2);
    assert_eq!(v["frames"]["b"]["page"], 1);
    assert_eq!(v["frames"]["b"]["texture"], "tex001");
    assert_eq!(v["frames"]["a"]["frame"]["w"], 600);
    assert_eq!(v["pages"], 2);
    assert_eq!(v["meta"]["app"], "afpkit");
}
