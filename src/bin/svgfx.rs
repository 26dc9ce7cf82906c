use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use svgfx::{FilterDocument, FilterRegistry, ImageBuffer, SvgEngine};

#[derive(Parser, Debug)]
#[command(name = "svgfx", version)]
struct Cli {
    /// Log level for diagnostics on stderr.
    #[arg(long, global = true, default_value = "warn")]
    log: tracing::Level,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Apply a named filter to a PNG.
    Apply(ApplyArgs),
    /// Rasterize an SVG, optionally running it through a filter.
    Render(RenderArgs),
}

#[derive(Parser, Debug)]
struct ApplyArgs {
    /// Filter document (JSON).
    #[arg(long)]
    filters: PathBuf,

    /// Filter to execute.
    #[arg(long)]
    name: String,

    /// Source image.
    #[arg(long)]
    source: PathBuf,

    /// Background image; transparent when omitted.
    #[arg(long)]
    background: Option<PathBuf>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input SVG.
    #[arg(long)]
    svg: PathBuf,

    #[arg(long)]
    width: u32,

    #[arg(long)]
    height: u32,

    /// Disable antialiasing.
    #[arg(long, default_value_t = false)]
    no_aa: bool,

    /// Filter document (JSON); requires `--name`.
    #[arg(long, requires = "name")]
    filters: Option<PathBuf>,

    #[arg(long, requires = "filters")]
    name: Option<String>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(cli.log)
        .with_writer(std::io::stderr)
        .init();

    match cli.cmd {
        Command::Apply(args) => cmd_apply(args),
        Command::Render(args) => cmd_render(args),
    }
}

fn load_png(path: &Path) -> anyhow::Result<ImageBuffer> {
    let img = image::open(path).with_context(|| format!("read image '{}'", path.display()))?;
    Ok(ImageBuffer::from_rgba_image(&img.to_rgba8()))
}

fn load_filter(path: &Path, name: &str) -> anyhow::Result<FilterRegistry> {
    let doc = FilterDocument::from_path(path)
        .with_context(|| format!("load filter document '{}'", path.display()))?;
    let mut registry = FilterRegistry::new();
    doc.install(&mut registry)?;
    if !registry.set_filter(name) {
        anyhow::bail!(
            "filter '{name}' not found in '{}' (available: {})",
            path.display(),
            registry.names().join(", ")
        );
    }
    Ok(registry)
}

fn run_filter(registry: &FilterRegistry, bg: &ImageBuffer, src: &ImageBuffer) -> ImageBuffer {
    // `load_filter` always leaves a filter selected.
    registry
        .execute(bg, src)
        .unwrap_or_else(|| src.transparent_like())
}

fn write_png(out: &Path, buf: &ImageBuffer) -> anyhow::Result<()> {
    if let Some(parent) = out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    let rgba = buf.to_rgba_image();
    image::save_buffer_with_format(
        out,
        rgba.as_raw(),
        buf.width(),
        buf.height(),
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", out.display()))?;
    eprintln!("wrote {}", out.display());
    Ok(())
}

fn cmd_apply(args: ApplyArgs) -> anyhow::Result<()> {
    let registry = load_filter(&args.filters, &args.name)?;
    let source = load_png(&args.source)?;
    let background = match &args.background {
        Some(path) => load_png(path)?,
        None => source.transparent_like(),
    };
    let out = run_filter(&registry, &background, &source);
    write_png(&args.out, &out)
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(&args.svg)
        .with_context(|| format!("read svg '{}'", args.svg.display()))?;

    let mut engine = SvgEngine::new();
    let handle = engine.create();
    engine.set_antialiasing(handle, !args.no_aa)?;
    engine
        .parse(handle, &text)
        .with_context(|| format!("parse svg '{}'", args.svg.display()))?;

    let mut source = ImageBuffer::new(args.width, args.height)?;
    engine.render(handle, &mut source)?;
    engine.destroy(handle);

    let out = match (&args.filters, &args.name) {
        (Some(filters), Some(name)) => {
            let registry = load_filter(filters, name)?;
            run_filter(&registry, &source.transparent_like(), &source)
        }
        _ => source,
    };
    write_png(&args.out, &out)
}
