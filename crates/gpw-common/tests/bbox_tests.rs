//! Tests for BoundingBox parsing and geometry helpers.

use gpw_common::bbox::{BboxParseError, BoundingBox};

// ============================================================================
// Constructor tests
// ============================================================================

#[test]
fn test_bbox_new() {
    let bbox = BoundingBox::new(-180.0, -90.0, 180.0, 90.0);
    assert_eq!(bbox.min_x, -180.0);
    assert_eq!(bbox.min_y, -90.0);
    assert_eq!(bbox.max_x, 180.0);
    assert_eq!(bbox.max_y, 90.0);
    assert_eq!(bbox, BoundingBox::global());
}

#[test]
fn test_bbox_from_values() {
    let bbox = BoundingBox::from_values(&[-180.0, -77.0, -95.0, 7.0]).unwrap();
    assert_eq!(bbox, BoundingBox::new(-180.0, -77.0, -95.0, 7.0));
}

#[test]
fn test_bbox_from_published_corners() {
    let bbox = BoundingBox::from_corners(gpw_common::GPW_BOUNDING_BOX);
    assert_eq!(bbox, BoundingBox::global());
    assert!(bbox.is_valid());
}

#[test]
fn test_bbox_from_values_wrong_arity() {
    let result = BoundingBox::from_values(&[0.0, 1.0, 2.0]);
    assert!(matches!(result, Err(BboxParseError::WrongArity(3))));

    let result = BoundingBox::from_values(&[0.0, 1.0, 2.0, 3.0, 4.0]);
    assert!(matches!(result, Err(BboxParseError::WrongArity(5))));
}

// ============================================================================
// from_cli_string tests
// ============================================================================

#[test]
fn test_parse_cli_bbox_floating() {
    let bbox = BoundingBox::from_cli_string("-125.5,24.75,-66.25,50.125").unwrap();
    assert!((bbox.min_x - (-125.5)).abs() < 0.001);
    assert!((bbox.min_y - 24.75).abs() < 0.001);
    assert!((bbox.max_x - (-66.25)).abs() < 0.001);
    assert!((bbox.max_y - 50.125).abs() < 0.001);
}

#[test]
fn test_parse_cli_bbox_tolerates_spaces() {
    let bbox = BoundingBox::from_cli_string(" -180, -90, 180, 90 ").unwrap();
    assert_eq!(bbox, BoundingBox::global());
}

#[test]
fn test_parse_cli_bbox_too_few() {
    let result = BoundingBox::from_cli_string("0,0,100");
    assert!(matches!(result, Err(BboxParseError::InvalidFormat(_))));
}

#[test]
fn test_parse_cli_bbox_invalid_number() {
    let result = BoundingBox::from_cli_string("abc,0,100,100");
    assert!(matches!(result, Err(BboxParseError::InvalidNumber(_))));
}

#[test]
fn test_parse_cli_bbox_empty_string() {
    let result = BoundingBox::from_cli_string("");
    assert!(matches!(result, Err(BboxParseError::InvalidFormat(_))));
}

// ============================================================================
// Dimension and validity tests
// ============================================================================

#[test]
fn test_bbox_width_height() {
    let bbox = BoundingBox::new(-180.0, -77.0, -95.0, 7.0);
    assert_eq!(bbox.width(), 85.0);
    assert_eq!(bbox.height(), 84.0);
}

#[test]
fn test_bbox_valid() {
    assert!(BoundingBox::global().is_valid());
    assert!(BoundingBox::new(-180.0, -77.0, -95.0, 7.0).is_valid());
}

#[test]
fn test_bbox_inverted_is_invalid() {
    // Constructor doesn't validate; is_valid does
    let bbox = BoundingBox::new(10.0, 10.0, 0.0, 0.0);
    assert_eq!(bbox.width(), -10.0);
    assert!(!bbox.is_valid());
}

#[test]
fn test_bbox_degenerate_is_invalid() {
    assert!(!BoundingBox::new(5.0, 5.0, 5.0, 5.0).is_valid());
    assert!(!BoundingBox::new(f64::NAN, 0.0, 1.0, 1.0).is_valid());
}

// ============================================================================
// GeoJSON helpers
// ============================================================================

#[test]
fn test_bbox_to_vec_order() {
    let bbox = BoundingBox::new(1.0, 2.0, 3.0, 4.0);
    assert_eq!(bbox.to_vec(), vec![1.0, 2.0, 3.0, 4.0]);
}

#[test]
fn test_bbox_polygon_counter_clockwise() {
    let ring = BoundingBox::new(0.0, 0.0, 10.0, 5.0).to_polygon();
    assert_eq!(ring.len(), 5);
    assert_eq!(ring[0], ring[4]);

    // Shoelace: positive area means counter-clockwise
    let area: f64 = ring
        .windows(2)
        .map(|w| w[0][0] * w[1][1] - w[1][0] * w[0][1])
        .sum();
    assert!(area > 0.0);
    assert_eq!(area / 2.0, 50.0);
}

#[test]
fn test_bbox_clamp_to_global() {
    let bbox = BoundingBox::new(-180.0083, -90.5, 180.0, 89.0);
    let clamped = bbox.clamp_to(&BoundingBox::global());
    assert_eq!(clamped, BoundingBox::new(-180.0, -90.0, 180.0, 89.0));
}

// ============================================================================
// Tolerance matching
// ============================================================================

#[test]
fn test_bbox_matches_within_pixel() {
    let requested = BoundingBox::new(-180.0, -77.0, -95.0, 7.0);
    let produced = BoundingBox::new(-180.0, -77.000_001, -94.999_999, 7.0);
    assert!(produced.matches_within(&requested, 1.0 / 120.0));
}

#[test]
fn test_bbox_matches_within_rejects_shifted_edge() {
    let requested = BoundingBox::new(-180.0, -77.0, -95.0, 7.0);
    let produced = BoundingBox::new(-180.0, -77.0, -94.0, 7.0);
    assert!(!produced.matches_within(&requested, 1.0 / 120.0));
}
