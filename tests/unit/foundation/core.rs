use super::*;

#[test]
fn offset_addition_is_componentwise() {
    assert_eq!(Offset::new(180, 348) + Offset::new(2, 2), Offset::new(182, 350));
    assert_eq!(Offset::ZERO + Offset::new(-4, 7), Offset::new(-4, 7));
}

#[test]
fn scale_one_is_identity() {
    let o = Offset::new(13, -27);
    let s = Size::new(724, 1228);
    assert_eq!(o.scaled(1.0), o);
    assert_eq!(s.scaled(1.0), s);
}

#[test]
fn scaling_rounds_to_nearest_with_ties_up() {
    assert_eq!(Offset::new(3, 5).scaled(0.5), Offset::new(2, 3));
    assert_eq!(Offset::new(-3, -5).scaled(0.5), Offset::new(-1, -2));
    assert_eq!(Size::new(45, 1).scaled(1.0 / 3.0), Size::new(15, 0));
    assert_eq!(Size::new(100, 50).scaled(2.0), Size::new(200, 100));
}

#[test]
fn square_and_empty() {
    assert_eq!(Size::square(46), Size::new(46, 46));
    assert!(Size::new(0, 10).is_empty());
    assert!(!Size::new(1, 1).is_empty());
    assert_eq!(Size::new(3, 4).area(), 12);
}
