use image::RgbaImage;
use uv_packer_core::error::UvPackError;
use uv_packer_core::prelude::*;

const ALL: [Algorithm; 3] = [Algorithm::Shelf, Algorithm::MaxRects, Algorithm::Skyline];

fn opts(algorithm: Algorithm, max_size: u32) -> PackOptions {
    PackOptions::builder()
        .algorithm(algorithm)
        .max_size(max_size)
        .build()
}

/// Test empty input list
#[test]
fn test_empty_input() {
    let rects: Vec<PackRect<'_, String>> = Vec::new();
    for algorithm in ALL {
        let result = pack(&rects, &opts(algorithm, 64));
        assert!(matches!(result, Err(UvPackError::InvalidInput(_))));
    }
}

/// Test a face larger than the maximum size on either axis
#[test]
fn test_face_larger_than_max_size() {
    for algorithm in ALL {
        for (w, h) in [(65, 8), (8, 65)] {
            let rects = vec![PackRect::sized("big", w, h)];
            let result = pack(&rects, &opts(algorithm, 64));
            match result {
                Err(e) => assert!(e.is_out_of_space(), "{algorithm:?} {w}x{h}: {e}"),
                Ok(out) => panic!(
                    "{algorithm:?} packed {w}x{h} into {}x{}",
                    out.width, out.height
                ),
            }
        }
    }
}

/// Test that padding pushes an exact fit over the limit
#[test]
fn test_padding_exceeds_max_size() {
    for algorithm in ALL {
        let rects = vec![PackRect::sized("a", 64, 64)];
        let mut o = opts(algorithm, 64);
        assert!(pack(&rects, &o).is_ok(), "{algorithm:?}");
        o.padding = 1;
        let err = pack(&rects, &o).unwrap_err();
        assert!(err.is_out_of_space(), "{algorithm:?}");
    }
}

#[test]
fn test_max_size_not_pow2() {
    for max_size in [0, 3, 1000] {
        let o = PackOptions {
            max_size,
            ..Default::default()
        };
        assert!(matches!(o.validate(), Err(UvPackError::InvalidInput(_))));
        let rects = vec![PackRect::sized("a", 1, 1)];
        assert!(pack(&rects, &o).is_err());
    }
}

#[test]
fn test_threshold_out_of_range() {
    for t in [-1.0, 100.5, f32::NAN, f32::INFINITY] {
        let o = PackOptions::builder().similarity_threshold(t).build();
        assert!(o.validate().is_err(), "{t}");
    }
    assert!(PackOptions::builder().similarity_threshold(0.0).build().validate().is_ok());
    assert!(PackOptions::builder().similarity_threshold(100.0).build().validate().is_ok());
}

#[test]
fn test_pixel_size_mismatch() {
    let px = RgbaImage::new(4, 4);
    let rects = vec![PackRect::sized("a", 8, 4).with_pixels(&px)];
    let err = pack(&rects, &PackOptions::default()).unwrap_err();
    assert!(matches!(err, UvPackError::InvalidInput(_)));
}

#[test]
fn test_only_degenerate_faces() {
    for algorithm in ALL {
        let rects = vec![
            PackRect::sized("a", 0, 0),
            PackRect::sized("b", 5, 5).with_empty(true),
        ];
        let out = pack(&rects, &opts(algorithm, 64)).expect("pack");
        assert_eq!((out.width, out.height), (1, 1), "{algorithm:?}");
        for r in &out.rects {
            assert!(r.empty);
            assert_eq!(r.placed, Region::new(0, 0, 1, 1));
        }
    }
}

#[test]
fn test_single_pixel_face_with_max_size_one() {
    for algorithm in ALL {
        let rects = vec![PackRect::sized("dot", 1, 1)];
        let out = pack(&rects, &opts(algorithm, 1)).expect("pack");
        assert_eq!((out.width, out.height), (1, 1));
    }
}

#[test]
fn test_results_follow_processing_order() {
    let rects = vec![
        PackRect::sized("short", 4, 2),
        PackRect::sized("tall", 2, 8),
        PackRect::sized("mid", 4, 4),
    ];
    let keys = |o: &PackOptions| -> Vec<&'static str> {
        pack(&rects, o).unwrap().rects.iter().map(|r| r.key).collect()
    };
    let sorted = opts(Algorithm::Skyline, 64);
    assert_eq!(keys(&sorted), vec!["tall", "mid", "short"]);
    let unsorted = PackOptions {
        sort: false,
        ..sorted
    };
    assert_eq!(keys(&unsorted), vec!["short", "tall", "mid"]);
}

#[test]
fn test_algorithm_from_str() {
    assert_eq!("Shelf".parse::<Algorithm>(), Ok(Algorithm::Shelf));
    assert_eq!("max_rects".parse::<Algorithm>(), Ok(Algorithm::MaxRects));
    assert_eq!("skyline".parse::<Algorithm>(), Ok(Algorithm::Skyline));
    assert!("guillotine".parse::<Algorithm>().is_err());
}

#[test]
fn test_options_serde_defaults() {
    let o: PackOptions = serde_json::from_str(r#"{"algorithm":"maxrects","padding":2}"#).unwrap();
    assert_eq!(o.algorithm, Algorithm::MaxRects);
    assert_eq!(o.padding, 2);
    assert_eq!(o.max_size, 1024);
    assert!(o.sort);
    assert!(!o.similar_check);
    assert_eq!(o.similarity_threshold, 90.0);
}
