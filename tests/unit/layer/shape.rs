use super::*;
use kurbo::Point;

#[test]
fn rectangle_has_no_clip_path() {
    assert!(clip_path(ClipShape::Rectangle, Size::new(10, 10)).unwrap().is_none());
}

#[test]
fn degenerate_box_is_invalid_geometry() {
    for shape in [ClipShape::Rectangle, ClipShape::Circle, ClipShape::rounded(4)] {
        let err = clip_path(shape, Size::new(0, 10)).unwrap_err();
        assert!(matches!(err, LayerError::InvalidLayerGeometry(_)));
    }
}

#[test]
fn circle_is_inscribed_in_box() {
    let path = clip_path(ClipShape::Circle, Size::new(40, 20)).unwrap().unwrap();
    let bbox = path.bounding_box();
    assert!((bbox.x0 - 0.0).abs() < 1e-6 && (bbox.x1 - 40.0).abs() < 1e-6);
    assert!((bbox.y0 - 0.0).abs() < 1e-6 && (bbox.y1 - 20.0).abs() < 1e-6);
    assert!(path.contains(Point::new(20.0, 10.0)));
    assert!(!path.contains(Point::new(1.0, 1.0)));
}

#[test]
fn oversized_radii_are_clamped() {
    let path = clip_path(ClipShape::rounded(500), Size::new(40, 20)).unwrap().unwrap();
    let bbox = path.bounding_box();
    assert!((bbox.width() - 40.0).abs() < 1e-6);
    assert!((bbox.height() - 20.0).abs() < 1e-6);
    // Fully rounded ends: the corner pixel is outside, the center is inside.
    assert!(!path.contains(Point::new(0.5, 0.5)));
    assert!(path.contains(Point::new(20.0, 10.0)));
}

#[test]
fn per_corner_radii_only_round_their_corner() {
    let shape = ClipShape::RoundedRectangle {
        top_left: 10,
        top_right: 0,
        bottom_right: 0,
        bottom_left: 0,
    };
    let path = clip_path(shape, Size::new(40, 40)).unwrap().unwrap();
    assert!(!path.contains(Point::new(0.5, 0.5)));
    assert!(path.contains(Point::new(39.5, 0.5)));
    assert!(path.contains(Point::new(39.5, 39.5)));
    assert!(path.contains(Point::new(0.5, 39.5)));
}
