use super::*;

fn f(px: f64, py: f64, qx: f64, qy: f64) -> Feature {
    Feature::new(Point::new(px, py), Point::new(qx, qy))
}

#[test]
fn vector_and_length() {
    let a = f(1.0, 1.0, 4.0, 5.0);
    assert_eq!(a.vector(), Vec2::new(3.0, 4.0));
    assert_eq!(a.length(), 5.0);
}

#[test]
fn lerp_moves_both_endpoints() {
    let a = f(0.0, 0.0, 10.0, 0.0);
    let b = f(10.0, 10.0, 20.0, 30.0);
    assert_eq!(a.lerp(&b, 0.0), a);
    assert_eq!(a.lerp(&b, 1.0), b);
    assert_eq!(a.lerp(&b, 0.5), f(5.0, 5.0, 15.0, 15.0));
}

#[test]
fn degenerate_and_non_finite_features_are_rejected() {
    assert!(f(2.0, 2.0, 2.0, 2.0).validate().is_err());
    assert!(f(f64::NAN, 0.0, 1.0, 1.0).validate().is_err());
    assert!(f(0.0, 0.0, f64::INFINITY, 1.0).validate().is_err());
    assert!(f(0.0, 0.0, 0.0, 1.0).validate().is_ok());
}

#[test]
fn segments_too_short_to_square_are_degenerate() {
    // Squared length underflows to zero.
    assert!(f(0.0, 0.0, 1e-160, 0.0).validate().is_err());
    assert!(f(0.0, 0.0, 1e-150, 0.0).validate().is_ok());
}

#[test]
fn reversed_pair_is_rejected_with_its_index() {
    let set = FeatureSet::new(
        vec![f(0.0, 0.0, 0.0, 4.0), f(1.0, 1.0, 6.0, 1.0)],
        vec![f(0.0, 0.0, 0.0, 4.0), f(6.0, 1.0, 1.0, 1.0)],
    );
    let err = set.validate().unwrap_err().to_string();
    assert!(err.contains("feature pair #1"), "{err}");
    assert!(set.interpolate(0.5)[1].validate().is_err());

    // Opposite but unequal lengths still pass through zero.
    let set = FeatureSet::new(vec![f(0.0, 0.0, 2.0, 0.0)], vec![f(5.0, 5.0, -1.0, 5.0)]);
    assert!(set.validate().is_err());
}

#[test]
fn rotated_and_parallel_pairs_are_accepted() {
    let set = FeatureSet::new(
        vec![f(0.0, 0.0, 4.0, 0.0), f(0.0, 0.0, 4.0, 0.0)],
        vec![f(1.0, 1.0, 1.0, 5.0), f(2.0, 3.0, 9.0, 3.0)],
    );
    assert!(set.validate().is_ok());
}

#[test]
fn empty_set_is_rejected() {
    let err = FeatureSet::default().validate().unwrap_err();
    assert!(err.to_string().contains("at least one feature"));
}

#[test]
fn mismatched_counts_are_rejected() {
    let set = FeatureSet::new(vec![f(0.0, 0.0, 1.0, 0.0)], vec![]);
    assert!(set.validate().is_err());

    let set = FeatureSet::new(
        vec![f(0.0, 0.0, 1.0, 0.0)],
        vec![f(0.0, 0.0, 1.0, 0.0), f(0.0, 0.0, 0.0, 1.0)],
    );
    let err = set.validate().unwrap_err();
    assert!(err.to_string().contains("mismatch"));
}

#[test]
fn degenerate_member_names_its_side_and_index() {
    let set = FeatureSet::new(
        vec![f(0.0, 0.0, 1.0, 0.0), f(0.0, 0.0, 0.0, 1.0)],
        vec![f(0.0, 0.0, 1.0, 0.0), f(3.0, 3.0, 3.0, 3.0)],
    );
    let err = set.validate().unwrap_err().to_string();
    assert!(err.contains("target feature #1"), "{err}");
}

#[test]
fn interpolate_and_swap() {
    let set = FeatureSet::new(vec![f(0.0, 0.0, 4.0, 0.0)], vec![f(0.0, 4.0, 4.0, 4.0)]);
    assert_eq!(set.interpolate(0.25), vec![f(0.0, 1.0, 4.0, 1.0)]);
    assert_eq!(set.swapped().source, set.target);
    assert_eq!(set.swapped().interpolate(0.75), set.interpolate(0.25));
    assert_eq!(set.len(), 1);
    assert!(!set.is_empty());
}
