use uv_packer_core::packer::Packer;
use uv_packer_core::packer::skyline::SkylinePacker;
use uv_packer_core::prelude::*;

fn opts(max_size: u32) -> PackOptions {
    PackOptions::builder()
        .algorithm(Algorithm::Skyline)
        .max_size(max_size)
        .build()
}

#[test]
fn starts_at_half_max_size() {
    let o = opts(64);
    let packer = SkylinePacker::new(&o);
    assert_eq!(packer.canvas_size(), (32, 32));
    let tiny = SkylinePacker::new(&opts(1));
    assert_eq!(tiny.canvas_size(), (1, 1));
}

#[test]
fn grows_height_before_width() {
    let o = opts(64);
    let mut packer = SkylinePacker::new(&o);
    let layout = packer.pack(&[(8, 40)]).expect("pack");
    assert_eq!(packer.canvas_size(), (32, 64));
    assert_eq!(layout.positions, vec![(0, 0)]);
    assert_eq!((layout.width, layout.height), (8, 64));
}

#[test]
fn grows_width_once_height_is_maxed() {
    let o = opts(64);
    let mut packer = SkylinePacker::new(&o);
    let layout = packer.pack(&[(40, 10)]).expect("pack");
    assert_eq!(packer.canvas_size(), (64, 64));
    assert_eq!((layout.width, layout.height), (64, 16));
}

#[test]
fn exact_fit_to_canvas_edge_is_accepted() {
    let o = opts(32);
    let mut packer = SkylinePacker::new(&o);
    let layout = packer.pack(&[(16, 16)]).expect("pack");
    assert_eq!(packer.canvas_size(), (16, 16));
    assert_eq!((layout.width, layout.height), (16, 16));
}

#[test]
fn repeated_pack_starts_from_a_fresh_canvas() {
    let o = opts(32);
    let mut packer = SkylinePacker::new(&o);
    let first = packer.pack(&[(16, 16)]).expect("first pack");
    let second = packer.pack(&[(16, 16)]).expect("second pack");
    assert_eq!(first.positions, vec![(0, 0)]);
    assert_eq!(second.positions, vec![(0, 0)]);
    assert_eq!(first, second);
    assert_eq!(packer.canvas_size(), (16, 16));

    // growth from an earlier call does not leak into the next one
    packer.pack(&[(8, 40)]).unwrap_err();
    let after_growth = packer.pack(&[(4, 4)]).expect("pack after growth");
    assert_eq!(after_growth.positions, vec![(0, 0)]);
    assert_eq!(packer.canvas_size(), (16, 16));
}

#[test]
fn lowest_then_leftmost() {
    let rects = vec![
        PackRect::sized("a", 10, 10),
        PackRect::sized("b", 10, 10),
        PackRect::sized("c", 5, 20),
    ];
    let out = pack(&rects, &opts(32)).expect("pack");
    assert_eq!((out.width, out.height), (16, 32));
    let at = |k: &'static str| {
        let r = out.find(&k).unwrap();
        (r.placed.x, r.placed.y)
    };
    assert_eq!(at("c"), (0, 0));
    assert_eq!(at("a"), (5, 0));
    assert_eq!(at("b"), (5, 10));
}

#[test]
fn degenerate_face_uses_first_uncovered_pixel() {
    let rects = vec![
        PackRect::sized("a", 10, 10),
        PackRect::sized("b", 10, 10),
        PackRect::sized("c", 5, 20),
        PackRect::sized("flat", 4, 0),
    ];
    let out = pack(&rects, &opts(32)).expect("pack");
    let flat = out.find(&"flat").unwrap();
    assert!(flat.empty);
    assert_eq!((flat.placed.x, flat.placed.y), (15, 0));
    assert_eq!((flat.placed.w, flat.placed.h), (1, 1));
}

#[test]
fn exhausted_growth_is_out_of_space() {
    let o = opts(32);
    let mut packer = SkylinePacker::new(&o);
    let err = packer.pack(&[(20, 20), (20, 20), (20, 20)]).unwrap_err();
    match err {
        UvPackError::OutOfSpace { placed, total } => {
            assert_eq!(placed, 1);
            assert_eq!(total, 3);
        }
        other => panic!("expected OutOfSpace, got {other:?}"),
    }
}
