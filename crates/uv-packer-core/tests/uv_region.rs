use uv_packer_core::model::{Mirror, Region};

#[test]
fn reversed_corners_encode_mirroring() {
    let r = Region::from_uv([8.0, 0.0, 0.0, 4.0]);
    assert_eq!((r.x, r.y, r.w, r.h), (0, 0, 8, 4));
    assert_eq!(r.mirror, Mirror::X);

    let r = Region::from_uv([2.0, 10.0, 6.0, 2.0]);
    assert_eq!((r.x, r.y, r.w, r.h), (2, 2, 4, 8));
    assert_eq!(r.mirror, Mirror::Y);

    let r = Region::from_uv([6.0, 10.0, 2.0, 2.0]);
    assert_eq!(r.mirror, Mirror::XY);
}

#[test]
fn fractional_sizes_round_up() {
    let r = Region::from_uv([1.5, 0.25, 4.0, 3.0]);
    assert_eq!((r.x, r.y), (1, 0));
    assert_eq!((r.w, r.h), (3, 3));
}

#[test]
fn uv_round_trip_for_every_mirror() {
    for mirror in Mirror::ALL {
        let r = Region::new(3, 5, 7, 2).with_mirror(mirror);
        assert_eq!(Region::from_uv(r.to_uv()), r, "{mirror}");
    }
}

#[test]
fn to_uv_corner_order() {
    let r = Region::new(1, 2, 3, 4);
    assert_eq!(r.to_uv(), [1.0, 2.0, 4.0, 6.0]);
    assert_eq!(r.with_mirror(Mirror::X).to_uv(), [4.0, 2.0, 1.0, 6.0]);
    assert_eq!(r.with_mirror(Mirror::Y).to_uv(), [1.0, 6.0, 4.0, 2.0]);
    assert_eq!(r.with_mirror(Mirror::XY).to_uv(), [4.0, 6.0, 1.0, 2.0]);
}

#[test]
fn flipping_twice_restores_region() {
    let r = Region::new(0, 4, 8, 8).with_mirror(Mirror::Y);
    for axis in Mirror::ALL {
        assert_eq!(r.flip(axis).flip(axis), r);
    }
    let flipped = r.flip(Mirror::X);
    assert_eq!(flipped.mirror, Mirror::XY);
    assert_eq!(flipped.rect(), r.rect());
}

#[test]
fn composition_is_the_klein_four_group() {
    use Mirror::*;
    assert_eq!(X.compose(Y), XY);
    assert_eq!(XY.compose(X), Y);
    assert_eq!(XY.compose(Y), X);
    for a in Mirror::ALL {
        assert_eq!(a.compose(None), a);
        assert_eq!(a.compose(a), None);
        for b in Mirror::ALL {
            assert_eq!(a.compose(b), b.compose(a));
            for c in Mirror::ALL {
                assert_eq!(a.compose(b).compose(c), a.compose(b.compose(c)));
            }
        }
    }
}

#[test]
fn mirror_flags() {
    assert_eq!(Mirror::from_flags(true, true), Mirror::XY);
    assert!(Mirror::XY.flips_x() && Mirror::XY.flips_y());
    assert!(!Mirror::Y.flips_x());
    assert!(Mirror::None.is_none());
}

#[test]
fn zero_sized_quads() {
    let r = Region::from_uv([4.0, 4.0, 4.0, 9.0]);
    assert!(r.is_zero_sized());
}
