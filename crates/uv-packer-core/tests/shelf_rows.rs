use uv_packer_core::packer::Packer;
use uv_packer_core::packer::shelf::ShelfPacker;
use uv_packer_core::prelude::*;

fn opts(max_size: u32, padding: u32, sort: bool) -> PackOptions {
    PackOptions::builder()
        .algorithm(Algorithm::Shelf)
        .max_size(max_size)
        .padding(padding)
        .sort(sort)
        .build()
}

fn pos(out: &PackResult<&'static str>, key: &'static str) -> (u32, u32) {
    let r = out.find(&key).expect("key present");
    (r.placed.x, r.placed.y)
}

#[test]
fn three_faces_sorted_by_longest_side() {
    let rects = vec![
        PackRect::sized("a", 10, 10),
        PackRect::sized("b", 10, 10),
        PackRect::sized("c", 5, 20),
    ];
    let out = pack(&rects, &opts(32, 0, true)).expect("pack");
    // width 16 gives 16x32 (area 512), width 32 gives 32x32
    assert_eq!((out.width, out.height), (16, 32));
    assert_eq!(out.rects[0].key, "c");
    assert_eq!(pos(&out, "c"), (0, 0));
    assert_eq!(pos(&out, "a"), (5, 0));
    assert_eq!(pos(&out, "b"), (0, 20));
}

#[test]
fn three_faces_in_input_order() {
    let rects = vec![
        PackRect::sized("a", 10, 10),
        PackRect::sized("b", 10, 10),
        PackRect::sized("c", 5, 20),
    ];
    let out = pack(&rects, &opts(32, 0, false)).expect("pack");
    assert_eq!((out.width, out.height), (16, 32));
    assert_eq!(pos(&out, "a"), (0, 0));
    assert_eq!(pos(&out, "b"), (0, 10));
    assert_eq!(pos(&out, "c"), (10, 10));
}

#[test]
fn equal_area_prefers_smaller_height() {
    // 16x32 and 32x16 tie on area; the flatter canvas keeps both on one shelf
    let rects = vec![PackRect::sized("a", 10, 10), PackRect::sized("b", 10, 10)];
    let out = pack(&rects, &opts(32, 0, false)).expect("pack");
    assert_eq!((out.width, out.height), (32, 16));
    assert_eq!(pos(&out, "a"), (0, 0));
    assert_eq!(pos(&out, "b"), (10, 0));
}

#[test]
fn padding_is_reserved_right_and_below() {
    let rects = vec![
        PackRect::sized("a", 6, 6),
        PackRect::sized("b", 6, 6),
        PackRect::sized("c", 6, 6),
    ];
    let out = pack(&rects, &opts(64, 2, false)).expect("pack");
    assert_eq!(pos(&out, "a"), (0, 0));
    assert_eq!(pos(&out, "b"), (8, 0));
    // 8-wide slots: two per 16 px shelf, but 32x8 wins on area
    assert_eq!((out.width, out.height), (32, 8));
    assert_eq!(pos(&out, "c"), (16, 0));
}

#[test]
fn packer_reports_out_of_space_when_no_width_fits() {
    let o = opts(16, 0, false);
    let mut packer = ShelfPacker::new(&o);
    let err = packer.pack(&[(16, 16), (16, 16)]).unwrap_err();
    assert!(err.is_out_of_space());
}

#[test]
fn empty_slot_is_first_free_pixel() {
    let rects = vec![
        PackRect::sized("a", 4, 4),
        PackRect::sized("gap", 0, 3),
    ];
    let out = pack(&rects, &opts(16, 0, false)).expect("pack");
    assert_eq!((out.width, out.height), (4, 4));
    // the canvas is full, so the degenerate face falls back to the origin
    let gap = out.find(&"gap").unwrap();
    assert!(gap.empty);
    assert_eq!((gap.placed.x, gap.placed.y, gap.placed.w, gap.placed.h), (0, 0, 1, 1));
}
