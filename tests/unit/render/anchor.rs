use super::*;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-6
}

#[test]
fn zero_offset_is_origin_for_any_bitmap() {
    for (w, h) in [(1, 1), (100, 100), (1080, 1920), (5000, 3)] {
        let a = calculate_frame_anchor(Size::new(1080, 1920), Offset::ZERO, w, h);
        assert_eq!(a, FrameAnchor::ORIGIN);
    }
}

#[test]
fn centered_bitmap_in_square_frame() {
    let a = calculate_frame_anchor(Size::new(100, 100), Offset::new(50, 50), 10, 10);
    assert!(approx(a.x, 0.1), "x = {}", a.x);
    assert!(approx(a.y, -0.1), "y = {}", a.y);
}

#[test]
fn formula_applies_to_offsets_on_one_axis() {
    let a = calculate_frame_anchor(Size::new(200, 100), Offset::new(0, 25), 50, 20);
    assert!(approx(a.x, -1.0 + 0.25));
    assert!(approx(a.y, 0.5 - 0.2));
}

#[test]
fn bottom_right_corner_overlay() {
    let a = calculate_frame_anchor(Size::new(100, 100), Offset::new(90, 90), 10, 10);
    assert!(approx(a.x, 0.9));
    assert!(approx(a.y, -0.9));
}

#[test]
fn negative_offsets_extend_past_the_frame() {
    let a = calculate_frame_anchor(Size::new(100, 100), Offset::new(-10, -10), 10, 10);
    assert!(approx(a.x, -1.1));
    assert!(approx(a.y, 1.1));
}
