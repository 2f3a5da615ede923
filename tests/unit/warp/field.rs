use super::*;
use crate::foundation::core::Rgba8;

fn f(px: f64, py: f64, qx: f64, qy: f64) -> Feature {
    Feature::new(Point::new(px, py), Point::new(qx, qy))
}

fn gradient(width: u32, height: u32) -> Image {
    let mut img = Image::new(width, height).unwrap();
    for y in 0..height {
        for x in 0..width {
            img.set(
                i64::from(x),
                i64::from(y),
                Rgba8::new((x * 16) as u8, (y * 16) as u8, ((x + y) * 8) as u8, 255),
            );
        }
    }
    img
}

fn sequential() -> WarpSettings {
    WarpSettings {
        parallel_rows: false,
        ..WarpSettings::default()
    }
}

#[test]
fn output_keeps_input_dimensions() {
    let img = gradient(7, 5);
    let src = [f(1.0, 1.0, 5.0, 2.0)];
    let dst = [f(2.0, 1.0, 6.0, 3.0)];
    let out = field_warp(&img, &src, &dst, &WarpSettings::default()).unwrap();
    assert_eq!(out.dimensions(), (7, 5));
}

#[test]
fn identical_lines_reproduce_the_image() {
    let img = gradient(4, 4);
    let lines = [f(0.0, 0.0, 4.0, 0.0), f(0.0, 0.0, 0.0, 4.0)];
    let out = field_warp(&img, &lines, &lines, &sequential()).unwrap();
    assert_eq!(out, img);
}

#[test]
fn moved_line_translates_and_leaves_sentinel_behind() {
    let img = gradient(4, 4);
    let src = [f(0.0, 0.0, 0.0, 4.0)];
    let dst = [f(1.0, 0.0, 1.0, 4.0)];
    let out = field_warp(&img, &src, &dst, &sequential()).unwrap();

    for y in 0..4 {
        assert_eq!(out.get(0, y), Some(Rgba8::TRANSPARENT));
        for x in 1..4 {
            assert_eq!(out.get(x, y), img.get(x - 1, y), "pixel ({x},{y})");
        }
    }
}

#[test]
fn source_point_follows_a_single_line_rigidly() {
    let params = WarpParams::default();
    // Destination segment is the source segment rotated a quarter turn about the origin.
    let src = [f(0.0, 0.0, 0.0, 4.0)];
    let dst = [f(0.0, 0.0, 4.0, 0.0)];
    let at = source_point(Point::new(2.0, 1.0), &src, &dst, &params).unwrap();
    assert!((at.x - -1.0).abs() < 1e-12, "{at:?}");
    assert!((at.y - 2.0).abs() < 1e-12, "{at:?}");
}

#[test]
fn row_parallel_output_matches_sequential() {
    let img = gradient(16, 12);
    let src = [f(2.0, 2.0, 12.0, 3.0), f(3.0, 9.0, 8.0, 11.0)];
    let dst = [f(3.0, 1.5, 13.0, 4.0), f(2.0, 8.0, 9.5, 10.0)];
    let seq = field_warp(&img, &src, &dst, &sequential()).unwrap();
    let par = field_warp(&img, &src, &dst, &WarpSettings::default()).unwrap();
    assert_eq!(seq, par);
}

#[test]
fn weight_peaks_on_the_line_and_fades_with_distance() {
    let params = WarpParams::default();
    let near = feature_weight(10.0, 0.0, &params);
    let mid = feature_weight(10.0, 5.0, &params);
    let far = feature_weight(10.0, 1e9, &params);
    assert!(near > mid && mid > far);
    assert!(far < 1e-8);
    assert!((near - 10f64.powf(0.2) / 0.5).abs() < 1e-12);
}

#[test]
fn longer_lines_pull_harder_when_p_is_positive() {
    let params = WarpParams {
        p: 1.0,
        ..WarpParams::default()
    };
    assert!(feature_weight(20.0, 3.0, &params) > feature_weight(10.0, 3.0, &params));
}

#[test]
fn invalid_line_sets_are_rejected() {
    let img = gradient(4, 4);
    let s = WarpSettings::default();
    let good = [f(0.0, 0.0, 4.0, 0.0)];

    assert!(field_warp(&img, &[], &[], &s).is_err());
    assert!(field_warp(&img, &good, &[], &s).is_err());
    assert!(field_warp(&img, &good, &[f(1.0, 1.0, 1.0, 1.0)], &s).is_err());
    assert!(field_warp(&img, &[f(2.0, 2.0, 2.0, 2.0)], &good, &s).is_err());
}

#[test]
fn invalid_params_are_rejected() {
    let lines = [f(0.0, 0.0, 4.0, 0.0)];
    for params in [
        WarpParams {
            a: 0.0,
            ..WarpParams::default()
        },
        WarpParams {
            b: f64::NAN,
            ..WarpParams::default()
        },
    ] {
        assert!(source_point(Point::ZERO, &lines, &lines, &params).is_err());
    }
}
