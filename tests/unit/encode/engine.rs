use super::*;
use crate::foundation::core::Offset;
use crate::raster::bitmap::Bitmap;
use crate::render::anchor::FrameAnchor;
use crate::render::overlay::{BitmapOverlay, TextureRef};

fn overlay(offset: Offset) -> TextureOverlay {
    BitmapOverlay {
        bitmap: Bitmap::from_premul_rgba8(2, 2, vec![255; 16]).unwrap(),
        offset,
        anchor: FrameAnchor::ORIGIN,
    }
    .into()
}

fn request(overlays: Vec<TextureOverlay>, setting: ExportSetting) -> ExportRequest {
    ExportRequest {
        overlays,
        audio: PathBuf::from("audio.m4a"),
        output_size: Size::new(8, 8),
        out_dir: PathBuf::from("out"),
        setting,
    }
}

fn probe() -> FixedDurationProbe {
    FixedDurationProbe(Duration::from_millis(2500))
}

struct FailingProbe;

impl AudioDurationProbe for FailingProbe {
    fn probe(&self, audio: &Path) -> LayerResult<Duration> {
        Err(LayerError::validation(format!(
            "failed to extract audio duration from {}",
            audio.display()
        )))
    }
}

#[test]
fn empty_overlays_are_rejected_before_probing() {
    let mut engine = InMemoryEngine::default();
    let err = export_video(
        &mut engine,
        &FailingProbe,
        request(Vec::new(), ExportSetting::separate()),
        &mut |_| {},
    )
    .unwrap_err();
    assert!(matches!(err, LayerError::Validation(msg) if msg.contains("empty")));
    assert!(engine.requests.is_empty());
}

#[test]
fn separate_export_passes_overlays_through() {
    let mut engine = InMemoryEngine::with_progress([10, 50, 100]);
    let overlays = vec![overlay(Offset::ZERO), overlay(Offset::new(4, 4))];
    let out = export_video(
        &mut engine,
        &probe(),
        request(overlays.clone(), ExportSetting::separate()),
        &mut |_| {},
    )
    .unwrap();

    assert_eq!(out, PathBuf::from("out").join("separate-output.mp4"));
    let req = &engine.requests[0];
    assert_eq!(req.overlays, overlays);
    assert_eq!(req.frame_rate, EXPORT_FRAME_RATE);
    assert_eq!(req.audio_duration, Duration::from_millis(2500));
    assert_eq!(req.output_size, Size::new(8, 8));
}

#[test]
fn merged_export_sends_one_canvas_overlay() {
    let mut engine = InMemoryEngine::default();
    export_video(
        &mut engine,
        &probe(),
        request(
            vec![overlay(Offset::ZERO), overlay(Offset::new(6, 6))],
            ExportSetting::merged(),
        ),
        &mut |_| {},
    )
    .unwrap();

    let req = &engine.requests[0];
    assert_eq!(req.overlays.len(), 1);
    let TextureOverlay::Bitmap(merged) = &req.overlays[0] else {
        panic!("merged overlay must be a bitmap");
    };
    assert_eq!(merged.bitmap.size(), Size::new(8, 8));
    assert_eq!(merged.bitmap.raw_pixel(7, 7), [255, 255, 255, 255]);
    assert_eq!(merged.bitmap.raw_pixel(3, 3), [0, 0, 0, 0]);
    assert!(req.out_path.ends_with("merged-output.mp4"));
}

#[test]
fn merged_export_rejects_texture_overlays() {
    let mut engine = InMemoryEngine::default();
    let err = export_video(
        &mut engine,
        &probe(),
        request(
            vec![TextureOverlay::Texture(TextureRef {
                id: 1,
                size: Size::new(2, 2),
            })],
            ExportSetting::merged(),
        ),
        &mut |_| {},
    )
    .unwrap_err();
    assert!(matches!(err, LayerError::UnsupportedOverlayKind(_)));
    assert!(engine.requests.is_empty());
}

#[test]
fn progress_is_strictly_increasing_from_zero() {
    let mut engine = InMemoryEngine::with_progress([0, 0, 5, 5, 3, 40, 40, 100, 100, 120]);
    let mut seen = Vec::new();
    export_video(
        &mut engine,
        &probe(),
        request(vec![overlay(Offset::ZERO)], ExportSetting::separate()),
        &mut |p| seen.push(p),
    )
    .unwrap();
    assert_eq!(seen, vec![0, 5, 40, 100]);
}

#[test]
fn engine_failure_maps_to_export_error() {
    let mut engine = InMemoryEngine::with_progress([20]).failing("encoder crashed");
    let err = export_video(
        &mut engine,
        &probe(),
        request(vec![overlay(Offset::ZERO)], ExportSetting::separate()),
        &mut |_| {},
    )
    .unwrap_err();
    assert!(matches!(err, LayerError::Export(cause) if cause == "encoder crashed"));
}

#[test]
fn probe_failure_propagates() {
    let mut engine = InMemoryEngine::default();
    let err = export_video(
        &mut engine,
        &FailingProbe,
        request(vec![overlay(Offset::ZERO)], ExportSetting::separate()),
        &mut |_| {},
    )
    .unwrap_err();
    assert!(matches!(err, LayerError::Validation(_)));
    assert!(engine.requests.is_empty());
}

#[test]
fn variants_run_in_order_and_report_per_setting() {
    let mut engine = InMemoryEngine::with_progress([100]);
    let mut seen = Vec::new();
    let outputs = export_variants(
        &mut engine,
        &probe(),
        &[overlay(Offset::ZERO), overlay(Offset::new(2, 2))],
        Path::new("audio.m4a"),
        Size::new(8, 8),
        Path::new("out"),
        &[ExportSetting::separate(), ExportSetting::merged()],
        &mut |s, p| seen.push((s.output_prefix.clone(), p)),
    )
    .unwrap();

    assert_eq!(
        outputs,
        vec![
            PathBuf::from("out/separate-output.mp4"),
            PathBuf::from("out/merged-output.mp4"),
        ]
    );
    assert_eq!(engine.requests[0].overlays.len(), 2);
    assert_eq!(engine.requests[1].overlays.len(), 1);
    assert_eq!(
        seen,
        vec![
            ("separate".to_owned(), 0),
            ("separate".to_owned(), 100),
            ("merged".to_owned(), 0),
            ("merged".to_owned(), 100),
        ]
    );
}
