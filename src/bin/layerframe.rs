use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "layerframe", version)]
struct Cli {
    /// Log pipeline progress at debug level to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rasterize a layer document into per-layer PNGs and print their anchors.
    Raster(RasterArgs),
}

#[derive(Parser, Debug)]
struct RasterArgs {
    /// Input layer collection JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Directory receiving `layer_<i>.png` (and `merged.png`).
    #[arg(long)]
    out_dir: PathBuf,

    /// Output frame size as WxH; defaults to the reference frame.
    #[arg(long, value_parser = parse_size)]
    target: Option<layerframe::Size>,

    /// Frame size the layers were authored against, as WxH.
    #[arg(long, value_parser = parse_size, default_value = "1080x1920")]
    reference: layerframe::Size,

    /// Font file for text layers; falls back to `LAYERFRAME_FONT`, then the system sans-serif.
    #[arg(long)]
    font: Option<PathBuf>,

    /// Also write the flattened overlay as `merged.png`.
    #[arg(long, default_value_t = false)]
    merged: bool,

    /// Override rayon worker threads.
    #[arg(long)]
    threads: Option<usize>,

    /// Draw colors with their authored alpha.
    #[arg(long, default_value_t = false)]
    no_alpha_normalize: bool,

    /// Ignore clip shapes and fill every shape's whole bounding box.
    #[arg(long, default_value_t = false)]
    legacy_shapes: bool,
}

#[derive(serde::Serialize)]
struct OverlayReport {
    index: usize,
    offset: layerframe::Offset,
    width: u32,
    height: u32,
    anchor: layerframe::FrameAnchor,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Raster(args) => cmd_raster(args),
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .init();
}

fn parse_size(s: &str) -> Result<layerframe::Size, String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WxH, got '{s}'"))?;
    let w: u32 = w.trim().parse().map_err(|e| format!("bad width '{w}': {e}"))?;
    let h: u32 = h.trim().parse().map_err(|e| format!("bad height '{h}': {e}"))?;
    if w == 0 || h == 0 {
        return Err(format!("frame size must be positive, got '{s}'"));
    }
    Ok(layerframe::Size::new(w, h))
}

fn load_font(arg: Option<&Path>) -> anyhow::Result<Option<layerframe::FontSource>> {
    let path = match arg {
        Some(p) => Some(p.to_path_buf()),
        None => std::env::var_os("LAYERFRAME_FONT").map(PathBuf::from),
    };
    path.map(|p| {
        layerframe::FontSource::from_path(&p).with_context(|| format!("load font '{}'", p.display()))
    })
    .transpose()
}

fn write_png(path: &Path, bitmap: &layerframe::Bitmap) -> anyhow::Result<()> {
    image::save_buffer_with_format(
        path,
        &bitmap.to_straight_rgba8(),
        bitmap.width,
        bitmap.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))
}

fn cmd_raster(args: RasterArgs) -> anyhow::Result<()> {
    let collection = layerframe::LayerCollection::from_path(&args.in_path)?;
    let target = args.target.unwrap_or(args.reference);

    let raster = layerframe::RasterOpts::default()
        .with_normalize_alpha(!args.no_alpha_normalize)
        .with_clip_shapes(!args.legacy_shapes)
        .with_font(load_font(args.font.as_deref())?);
    let opts = layerframe::PipelineOpts::default()
        .with_raster(raster)
        .with_threads(args.threads);

    let overlays =
        layerframe::adjust_and_rasterize(&collection, target, args.reference, &opts)?;

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;

    let mut report = Vec::with_capacity(overlays.len());
    for (index, o) in overlays.iter().enumerate() {
        write_png(&args.out_dir.join(format!("layer_{index}.png")), &o.bitmap)?;
        report.push(OverlayReport {
            index,
            offset: o.offset,
            width: o.bitmap.width,
            height: o.bitmap.height,
            anchor: o.anchor,
        });
    }

    if args.merged {
        let all: Vec<layerframe::TextureOverlay> = overlays.into_iter().map(Into::into).collect();
        let merged = layerframe::merge_overlays(&all, target)?;
        let path = args.out_dir.join("merged.png");
        write_png(&path, &merged.bitmap)?;
        eprintln!("wrote {}", path.display());
    }

    serde_json::to_writer_pretty(std::io::stdout().lock(), &report)
        .context("write overlay report")?;
    println!();
    eprintln!("wrote {} layer(s) to {}", report.len(), args.out_dir.display());
    Ok(())
}
