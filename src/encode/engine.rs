use crate::foundation::core::Size;
use crate::foundation::error::{LayerError, LayerResult};
use crate::render::merge::merge_overlays;
use crate::render::overlay::TextureOverlay;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Frame rate every export is composed at.
pub const EXPORT_FRAME_RATE: u32 = 30;

/// Everything the composition engine needs to produce one video.
#[derive(Clone, Debug)]
pub struct CompositionRequest {
    /// Overlays in paint order.
    pub overlays: Vec<TextureOverlay>,
    /// Audio track to mux under the video.
    pub audio: PathBuf,
    /// Video duration, taken from the audio track.
    pub audio_duration: Duration,
    /// Output frame size.
    pub output_size: Size,
    /// Output frame rate.
    pub frame_rate: u32,
    /// Destination file.
    pub out_path: PathBuf,
}

/// Terminal result of a composition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExportStatus {
    /// The video was written.
    Success {
        /// Path of the produced file.
        output: PathBuf,
    },
    /// The engine gave up.
    Failure {
        /// Engine-reported reason.
        cause: String,
    },
}

/// External video/audio composition engine.
///
/// Implementations report progress as integer percentages in `0..=100` before returning the
/// terminal status. Duplicate or skipped values are allowed.
pub trait CompositionEngine {
    /// Compose `request` into a video file.
    fn compose(
        &mut self,
        request: CompositionRequest,
        on_progress: &mut dyn FnMut(u8),
    ) -> ExportStatus;
}

/// Reads the duration of an audio file.
pub trait AudioDurationProbe {
    /// Duration of `audio`.
    fn probe(&self, audio: &Path) -> LayerResult<Duration>;
}

/// How one export variant passes overlays to the engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportSetting {
    /// Flatten all overlays into one before composing.
    pub use_merged_overlay: bool,
    /// Output file name prefix; the file is `<prefix>-output.mp4`.
    pub output_prefix: String,
}

impl ExportSetting {
    /// One overlay per layer.
    pub fn separate() -> Self {
        Self {
            use_merged_overlay: false,
            output_prefix: "separate".to_owned(),
        }
    }

    /// A single pre-merged overlay.
    pub fn merged() -> Self {
        Self {
            use_merged_overlay: true,
            output_prefix: "merged".to_owned(),
        }
    }

    /// File name this variant writes.
    pub fn output_file_name(&self) -> String {
        format!("{}-output.mp4", self.output_prefix)
    }
}

/// Input to [`export_video`].
#[derive(Clone, Debug)]
pub struct ExportRequest {
    /// Overlays in paint order; must be non-empty.
    pub overlays: Vec<TextureOverlay>,
    /// Audio track.
    pub audio: PathBuf,
    /// Output frame size (also the merge canvas).
    pub output_size: Size,
    /// Directory the output file is written into.
    pub out_dir: PathBuf,
    /// Variant settings.
    pub setting: ExportSetting,
}

/// Compose overlays and audio into a video through `engine`.
///
/// The audio duration sets the video length and the frame rate is [`EXPORT_FRAME_RATE`]. With
/// `use_merged_overlay` the overlays are flattened first. Progress is forwarded only when it
/// increases, starting from 0. An engine failure maps to [`LayerError::Export`].
#[tracing::instrument(skip(engine, probe, request, on_progress), fields(
    overlays = request.overlays.len(),
    prefix = %request.setting.output_prefix,
))]
pub fn export_video(
    engine: &mut dyn CompositionEngine,
    probe: &dyn AudioDurationProbe,
    request: ExportRequest,
    on_progress: &mut dyn FnMut(u8),
) -> LayerResult<PathBuf> {
    if request.overlays.is_empty() {
        return Err(LayerError::validation("overlays must not be empty"));
    }

    let audio_duration = probe.probe(&request.audio)?;
    let overlays = if request.setting.use_merged_overlay {
        vec![merge_overlays(&request.overlays, request.output_size)?.into()]
    } else {
        request.overlays
    };
    let out_path = request.out_dir.join(request.setting.output_file_name());

    let composition = CompositionRequest {
        overlays,
        audio: request.audio,
        audio_duration,
        output_size: request.output_size,
        frame_rate: EXPORT_FRAME_RATE,
        out_path,
    };

    let mut filter = ProgressFilter::default();
    on_progress(0);
    let status = engine.compose(composition, &mut |p| {
        if let Some(p) = filter.accept(p) {
            on_progress(p);
        }
    });

    match status {
        ExportStatus::Success { output } => {
            tracing::debug!(output = %output.display(), "export finished");
            Ok(output)
        }
        ExportStatus::Failure { cause } => Err(LayerError::export(cause)),
    }
}

/// Run [`export_video`] once per setting over the same overlays, in order.
///
/// Stops at the first failing variant.
#[allow(clippy::too_many_arguments)]
pub fn export_variants(
    engine: &mut dyn CompositionEngine,
    probe: &dyn AudioDurationProbe,
    overlays: &[TextureOverlay],
    audio: &Path,
    output_size: Size,
    out_dir: &Path,
    settings: &[ExportSetting],
    on_progress: &mut dyn FnMut(&ExportSetting, u8),
) -> LayerResult<Vec<PathBuf>> {
    let mut outputs = Vec::with_capacity(settings.len());
    for setting in settings {
        let request = ExportRequest {
            overlays: overlays.to_vec(),
            audio: audio.to_path_buf(),
            output_size,
            out_dir: out_dir.to_path_buf(),
            setting: setting.clone(),
        };
        outputs.push(export_video(engine, probe, request, &mut |p| {
            on_progress(setting, p)
        })?);
    }
    Ok(outputs)
}

/// Forwards strictly increasing progress values; `0` is treated as already reported.
#[derive(Debug, Default)]
struct ProgressFilter {
    last: u8,
}

impl ProgressFilter {
    fn accept(&mut self, p: u8) -> Option<u8> {
        let p = p.min(100);
        if p > self.last {
            self.last = p;
            Some(p)
        } else {
            None
        }
    }
}

/// In-memory engine for tests and debugging.
///
/// Records every request and replays a scripted progress sequence before returning the scripted
/// status (success at the request's `out_path` by default).
#[derive(Debug, Default)]
pub struct InMemoryEngine {
    /// Requests in the order they were composed.
    pub requests: Vec<CompositionRequest>,
    /// Progress values reported on every compose call.
    pub progress: Vec<u8>,
    /// Failure cause to report instead of success.
    pub fail_with: Option<String>,
}

impl InMemoryEngine {
    /// Engine that succeeds after reporting `progress`.
    pub fn with_progress(progress: impl Into<Vec<u8>>) -> Self {
        Self {
            progress: progress.into(),
            ..Self::default()
        }
    }

    /// Make every subsequent compose call fail with `cause`.
    pub fn failing(mut self, cause: impl Into<String>) -> Self {
        self.fail_with = Some(cause.into());
        self
    }
}

impl CompositionEngine for InMemoryEngine {
    fn compose(
        &mut self,
        request: CompositionRequest,
        on_progress: &mut dyn FnMut(u8),
    ) -> ExportStatus {
        for &p in &self.progress {
            on_progress(p);
        }
        let output = request.out_path.clone();
        self.requests.push(request);
        match &self.fail_with {
            Some(cause) => ExportStatus::Failure {
                cause: cause.clone(),
            },
            None => ExportStatus::Success { output },
        }
    }
}

/// Probe returning a fixed duration for every file.
#[derive(Clone, Copy, Debug)]
pub struct FixedDurationProbe(pub Duration);

impl AudioDurationProbe for FixedDurationProbe {
    fn probe(&self, _audio: &Path) -> LayerResult<Duration> {
        Ok(self.0)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/engine.rs"]
mod tests;
