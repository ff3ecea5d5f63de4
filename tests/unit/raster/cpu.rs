use super::*;
use crate::foundation::core::Offset;

fn shape(size: Size, colors: Vec<Argb>, clip: ClipShape) -> Layer {
    ShapeLayer::new(Offset::ZERO, size, colors, clip)
        .unwrap()
        .into()
}

fn close(a: [u8; 4], b: [u8; 4], tol: u8) -> bool {
    a.iter().zip(b.iter()).all(|(x, y)| x.abs_diff(*y) <= tol)
}

#[test]
fn solid_rectangle_fills_every_pixel() {
    let mut r = Rasterizer::new(RasterOpts::default());
    let bmp = r
        .rasterize(&shape(
            Size::new(8, 4),
            vec![Argb::RED],
            ClipShape::Rectangle,
        ))
        .unwrap();
    assert_eq!(bmp.size(), Size::new(8, 4));
    assert!(bmp.premultiplied);
    for y in 0..4 {
        for x in 0..8 {
            assert_eq!(bmp.raw_pixel(x, y), [255, 0, 0, 255], "pixel ({x}, {y})");
        }
    }
}

#[test]
fn low_alpha_fill_is_normalized_by_default() {
    let color = Argb::from_argb(100, 255, 255, 255);
    let layer = shape(Size::new(4, 4), vec![color], ClipShape::Rectangle);

    let boosted = Rasterizer::new(RasterOpts::default())
        .rasterize(&layer)
        .unwrap();
    assert!(boosted.raw_pixel(2, 2)[3].abs_diff(150) <= 1);

    let raw = Rasterizer::new(RasterOpts::default().with_normalize_alpha(false))
        .rasterize(&layer)
        .unwrap();
    assert!(raw.raw_pixel(2, 2)[3].abs_diff(100) <= 1);
}

#[test]
fn gradient_runs_top_to_bottom() {
    let mut r = Rasterizer::new(RasterOpts::default());
    let bmp = r
        .rasterize(&shape(
            Size::new(4, 100),
            vec![Argb::from_argb(255, 255, 0, 0), Argb::from_argb(255, 0, 0, 255)],
            ClipShape::Rectangle,
        ))
        .unwrap();
    assert!(close(bmp.raw_pixel(1, 0), [255, 0, 0, 255], 4));
    assert!(close(bmp.raw_pixel(1, 99), [0, 0, 255, 255], 4));
    let mid = bmp.raw_pixel(1, 50);
    assert!(mid[0] > 90 && mid[0] < 160, "mid red {}", mid[0]);
    assert!(mid[2] > 90 && mid[2] < 160, "mid blue {}", mid[2]);
    // Constant across each row.
    assert_eq!(bmp.raw_pixel(0, 30), bmp.raw_pixel(3, 30));
}

#[test]
fn three_stop_gradient_hits_middle_color() {
    let stops = [Argb::RED, Argb::WHITE, Argb::BLACK];
    assert_eq!(sample_stops(&stops, 0.0), [255, 0, 0, 255]);
    assert_eq!(sample_stops(&stops, 0.5), [255, 255, 255, 255]);
    assert_eq!(sample_stops(&stops, 1.0), [0, 0, 0, 255]);
    assert_eq!(sample_stops(&stops, 2.0), [0, 0, 0, 255]);
}

#[test]
fn circle_leaves_corners_transparent() {
    let mut r = Rasterizer::new(RasterOpts::default());
    let bmp = r
        .rasterize(&shape(
            Size::new(40, 40),
            vec![Argb::WHITE],
            ClipShape::Circle,
        ))
        .unwrap();
    assert_eq!(bmp.raw_pixel(0, 0)[3], 0);
    assert_eq!(bmp.raw_pixel(39, 39)[3], 0);
    assert_eq!(bmp.raw_pixel(20, 20), [255, 255, 255, 255]);
}

#[test]
fn legacy_mode_ignores_clip_shape() {
    let opts = RasterOpts::default().with_clip_shapes(false);
    let mut r = Rasterizer::new(opts);
    let bmp = r
        .rasterize(&shape(
            Size::new(20, 20),
            vec![Argb::WHITE],
            ClipShape::Circle,
        ))
        .unwrap();
    assert_eq!(bmp.raw_pixel(0, 0), [255, 255, 255, 255]);
}

#[test]
fn rounded_rectangle_clips_corners_only() {
    let mut r = Rasterizer::new(RasterOpts::default());
    let bmp = r
        .rasterize(&shape(
            Size::new(40, 20),
            vec![Argb::WHITE],
            ClipShape::rounded(8),
        ))
        .unwrap();
    assert_eq!(bmp.raw_pixel(0, 0)[3], 0);
    assert_eq!(bmp.raw_pixel(20, 0)[3], 255);
    assert_eq!(bmp.raw_pixel(0, 10)[3], 255);
}

#[test]
fn zero_size_is_invalid_geometry() {
    let mut r = Rasterizer::new(RasterOpts::default());
    let err = r
        .rasterize(&shape(Size::new(0, 10), vec![Argb::RED], ClipShape::Rectangle))
        .unwrap_err();
    assert!(matches!(err, LayerError::InvalidLayerGeometry(_)));
}

#[test]
fn oversized_layer_is_invalid_geometry() {
    let err = surface_dims(Size::new(70_000, 1)).unwrap_err();
    assert!(matches!(err, LayerError::InvalidLayerGeometry(_)));
}

#[test]
fn empty_text_is_transparent() {
    let mut r = Rasterizer::new(RasterOpts::default());
    let layer: Layer = TextLayer::new(Offset::ZERO, Size::new(10, 10), "", Argb::BLACK, 26).into();
    let bmp = r.rasterize(&layer).unwrap();
    assert!(bmp.data.iter().all(|&v| v == 0));
}

#[test]
fn text_ink_sits_on_the_line_baseline() {
    let mut r = Rasterizer::new(RasterOpts::default());
    let layer: Layer =
        TextLayer::new(Offset::ZERO, Size::new(200, 60), "Hello", Argb::BLACK, 52).into();
    let bmp = r.rasterize(&layer).unwrap();
    assert_eq!(bmp.size(), Size::new(200, 60));

    let inked_rows: Vec<u32> = (0..60)
        .filter(|&y| (0..200).any(|x| bmp.raw_pixel(x, y)[3] > 0))
        .collect();
    assert!(!inked_rows.is_empty(), "no glyph ink");
    // Glyph bodies hang above a baseline well inside the surface.
    assert!(inked_rows.iter().any(|&y| y >= 20), "rows {inked_rows:?}");
    // Nothing is drawn past the wrapped text on the far right.
    assert_eq!(bmp.raw_pixel(199, 59)[3], 0);
}

#[test]
fn second_line_is_drawn_below_the_first() {
    let mut r = Rasterizer::new(RasterOpts::default());
    let one: Layer = TextLayer::new(Offset::ZERO, Size::new(60, 120), "Hi", Argb::BLACK, 40).into();
    let two: Layer =
        TextLayer::new(Offset::ZERO, Size::new(60, 120), "Hi Hi", Argb::BLACK, 40).into();
    let lowest_ink = |bmp: &Bitmap| {
        (0..120u32)
            .rev()
            .find(|&y| (0..60).any(|x| bmp.raw_pixel(x, y)[3] > 0))
            .unwrap()
    };
    let a = r.rasterize(&one).unwrap();
    let b = r.rasterize(&two).unwrap();
    assert!(lowest_ink(&b) > lowest_ink(&a) + 10);
}

#[test]
fn unusable_font_bytes_are_rejected() {
    let font = FontSource::from_bytes(vec![0u8; 16]).unwrap();
    let mut r = Rasterizer::new(RasterOpts::default().with_font(Some(font)));
    let layer: Layer = TextLayer::new(Offset::ZERO, Size::new(40, 20), "x", Argb::BLACK, 12).into();
    assert!(matches!(r.rasterize(&layer), Err(LayerError::Validation(_))));
}

#[test]
fn render_context_is_reused_across_sizes() {
    let mut r = Rasterizer::new(RasterOpts::default());
    let a = shape(Size::new(5, 5), vec![Argb::RED], ClipShape::Rectangle);
    let b = shape(Size::new(3, 7), vec![Argb::WHITE], ClipShape::Rectangle);
    let first = r.rasterize(&a).unwrap();
    let second = r.rasterize(&b).unwrap();
    let third = r.rasterize(&a).unwrap();
    assert_eq!(second.size(), Size::new(3, 7));
    assert_eq!(first, third);
}
