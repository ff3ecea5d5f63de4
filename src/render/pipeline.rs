use crate::foundation::core::Size;
use crate::foundation::error::{LayerError, LayerResult};
use crate::layer::model::{Layer, LayerCollection};
use crate::layer::scale::adjust_for_frame;
use crate::raster::bitmap::Bitmap;
use crate::raster::cpu::{RasterOpts, Rasterizer};
use crate::render::anchor::calculate_frame_anchor;
use crate::render::overlay::BitmapOverlay;
use rayon::prelude::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Worker pool sizing for layer rasterization.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderThreading {
    /// Worker thread count; `None` lets rayon decide. `Some(0)` is rejected.
    pub threads: Option<usize>,
}

/// Options for a full rasterization pass.
#[derive(Clone, Debug, Default)]
pub struct PipelineOpts {
    /// Per-layer rasterizer options.
    pub raster: RasterOpts,
    /// Worker pool sizing.
    pub threading: RenderThreading,
    /// Cancellation flag observed by the scaling and rasterizing entry points.
    pub cancel: CancelToken,
}

impl PipelineOpts {
    /// Replace the rasterizer options.
    pub fn with_raster(mut self, raster: RasterOpts) -> Self {
        self.raster = raster;
        self
    }

    /// Pin the worker thread count.
    pub fn with_threads(mut self, threads: Option<usize>) -> Self {
        self.threading.threads = threads;
        self
    }

    /// Share `cancel` with the caller so an enclosing export can stop the pass.
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }
}

/// Cooperative cancellation flag shared between a caller and an in-flight render pass.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Fresh, uncancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Tasks observe it before starting and after rasterizing.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Rasterize every layer concurrently, then apply `transform` to each bitmap.
///
/// Results come back in input order regardless of completion order. Each worker thread owns its
/// own [`Rasterizer`]. When any layer fails, remaining tasks are skipped and the error of the
/// lowest-indexed failing layer is returned. A cancelled pass returns [`LayerError::Cancelled`]
/// and discards every partial result.
pub fn process_layers<T, F>(
    layers: &[Layer],
    opts: &PipelineOpts,
    cancel: &CancelToken,
    transform: F,
) -> LayerResult<Vec<T>>
where
    T: Send,
    F: Fn(usize, &Layer, Bitmap) -> LayerResult<T> + Sync,
{
    if cancel.is_cancelled() {
        return Err(LayerError::Cancelled);
    }
    if layers.is_empty() {
        return Ok(Vec::new());
    }

    let pool = build_thread_pool(opts.threading.threads)?;
    let failed = AtomicBool::new(false);

    let rendered = pool.install(|| {
        layers
            .par_iter()
            .enumerate()
            .map_init(
                || Rasterizer::new(opts.raster.clone()),
                |raster, (i, layer)| -> LayerResult<Option<(usize, T)>> {
                    if cancel.is_cancelled() || failed.load(Ordering::Acquire) {
                        return Ok(None);
                    }
                    let out = raster
                        .rasterize(layer)
                        .and_then(|bitmap| {
                            if cancel.is_cancelled() {
                                return Ok(None);
                            }
                            transform(i, layer, bitmap).map(|v| Some((i, v)))
                        })
                        .inspect_err(|e| {
                            tracing::debug!(index = i, error = %e, "layer failed");
                            failed.store(true, Ordering::Release);
                        })?;
                    Ok(out)
                },
            )
            .collect::<Vec<_>>()
    });

    let mut slots = Vec::with_capacity(layers.len());
    slots.resize_with(layers.len(), || None::<T>);
    let mut first_err = None;
    for r in rendered {
        match r {
            Ok(Some((i, v))) => slots[i] = Some(v),
            Ok(None) => {}
            Err(e) => {
                first_err.get_or_insert(e);
            }
        }
    }
    if let Some(e) = first_err {
        return Err(e);
    }
    if cancel.is_cancelled() {
        return Err(LayerError::Cancelled);
    }

    slots
        .into_iter()
        .map(|s| s.ok_or(LayerError::Cancelled))
        .collect()
}

/// Scale `collection` from `reference` to `target`, rasterize every layer, and anchor each bitmap
/// within the target frame.
///
/// The output is position-aligned with `collection`. Cancelling `opts.cancel` aborts the pass with
/// [`LayerError::Cancelled`].
#[tracing::instrument(skip(collection, opts), fields(layers = collection.len()))]
pub fn adjust_and_rasterize(
    collection: &LayerCollection,
    target: Size,
    reference: Size,
    opts: &PipelineOpts,
) -> LayerResult<Vec<BitmapOverlay>> {
    let adjusted = adjust_for_frame(collection, target, reference)?;
    process_layers(
        adjusted.layers(),
        opts,
        &opts.cancel,
        |_, layer, bitmap| {
            let offset = layer.offset();
            let anchor = calculate_frame_anchor(target, offset, bitmap.width, bitmap.height);
            Ok(BitmapOverlay {
                bitmap,
                offset,
                anchor,
            })
        },
    )
}

/// Scale `collection` from `reference` to `target` and rasterize it, without anchoring.
#[tracing::instrument(skip(collection, opts), fields(layers = collection.len()))]
pub fn adjust_and_rasterize_bitmaps(
    collection: &LayerCollection,
    target: Size,
    reference: Size,
    opts: &PipelineOpts,
) -> LayerResult<Vec<Bitmap>> {
    let adjusted = adjust_for_frame(collection, target, reference)?;
    process_layers(adjusted.layers(), opts, &opts.cancel, |_, _, b| Ok(b))
}

/// Rasterize `collection` as authored: no scaling, no anchors. Used for previews.
#[tracing::instrument(skip(collection, opts), fields(layers = collection.len()))]
pub fn rasterize(collection: &LayerCollection, opts: &PipelineOpts) -> LayerResult<Vec<Bitmap>> {
    process_layers(collection.layers(), opts, &opts.cancel, |_, _, b| Ok(b))
}

fn build_thread_pool(threads: Option<usize>) -> LayerResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(LayerError::validation("'threads' must be >= 1 when set"));
    }
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| LayerError::Other(anyhow::anyhow!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
