use image::{Rgba, RgbaImage, imageops};
use uv_packer_core::prelude::*;
use uv_packer_core::to_json_hash;

fn sample() -> (RgbaImage, RgbaImage) {
    let a = RgbaImage::from_fn(4, 4, |x, y| Rgba([x as u8, y as u8, 1, 255]));
    let b = imageops::flip_vertical(&a);
    (a, b)
}

#[test]
fn json_array_shape() {
    let (a, b) = sample();
    let rects = vec![
        PackRect::new(FaceKey::new("cube", "north"), Region::new(0, 0, 4, 4)).with_pixels(&a),
        PackRect::new(FaceKey::new("cube", "south"), Region::new(4, 0, 4, 4)).with_pixels(&b),
        PackRect::new(FaceKey::new("cube", "up"), Region::new(8, 0, 0, 4)),
    ];
    let opts = PackOptions::builder()
        .max_size(32)
        .similar_check(true)
        .similarity_threshold(100.0)
        .build();
    let out = pack(&rects, &opts).expect("pack");
    let v = to_json(&out);

    assert_eq!(v["width"], 4);
    assert_eq!(v["height"], 4);
    let list = v["rects"].as_array().unwrap();
    assert_eq!(list.len(), 3);

    let south = list.iter().find(|r| r["key"] == "cube#south").unwrap();
    assert_eq!(south["duplicateOf"], "cube#north");
    assert_eq!(south["mirror"], "y");
    assert_eq!(south["uv"], serde_json::json!([0.0, 4.0, 4.0, 0.0]));
    assert_eq!(south["sourceUv"], serde_json::json!([4.0, 0.0, 8.0, 4.0]));

    let up = list.iter().find(|r| r["key"] == "cube#up").unwrap();
    assert_eq!(up["empty"], true);
    assert!(up["duplicateOf"].is_null());

    assert_eq!(v["stats"]["num_duplicates"], 1);
    assert_eq!(v["stats"]["num_empty"], 1);
}

#[test]
fn json_hash_is_keyed_by_face() {
    let rects = vec![
        PackRect::sized(FaceKey::new("arm", "east"), 2, 6),
        PackRect::sized(FaceKey::new("arm", "west"), 2, 6),
    ];
    let out = pack(&rects, &PackOptions::default()).expect("pack");
    let v = to_json_hash(&out);
    let map = v["rects"].as_object().unwrap();
    assert!(map.contains_key("arm#east"));
    assert!(map.contains_key("arm#west"));
    assert_eq!(map["arm#west"]["frame"]["w"], 2);
    assert_eq!(map["arm#west"]["frame"]["h"], 6);
}

#[test]
fn result_round_trips_through_serde() {
    let rects = vec![PackRect::sized("a".to_string(), 3, 3)];
    let out = pack(&rects, &PackOptions::default()).expect("pack");
    let text = serde_json::to_string(&out).unwrap();
    let back: PackResult = serde_json::from_str(&text).unwrap();
    assert_eq!(back, out);
}
