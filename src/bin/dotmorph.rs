use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "dotmorph", version)]
struct Cli {
    /// Log verbosity: -v for debug, -vv for trace.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Simulate a scenario at a scroll position and write the final frame as a PNG.
    Frame(FrameArgs),
    /// Sample and fit points from an SVG file and write them as JSON.
    Sample(SampleArgs),
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Input scenario JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Scroll offset held for the whole run.
    #[arg(long, default_value_t = 0.0)]
    scroll: f64,

    /// Simulated time before the frame is captured.
    #[arg(long, default_value_t = 3000.0)]
    time_ms: f64,

    /// Simulation frame rate.
    #[arg(long, default_value_t = 60.0)]
    fps: f64,

    /// Draw dots statically at their homes.
    #[arg(long)]
    reduced_motion: bool,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct SampleArgs {
    /// Input SVG file.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Number of points.
    #[arg(long, default_value_t = 900)]
    count: usize,

    /// Destination width in pixels.
    #[arg(long, default_value_t = 800.0)]
    width: f64,

    /// Destination height in pixels.
    #[arg(long, default_value_t = 600.0)]
    height: f64,

    /// Inner padding of the destination.
    #[arg(long, default_value_t = 0.0)]
    padding: f64,

    /// Fraction of points taken from outlines.
    #[arg(long, default_value_t = 0.6)]
    outline_ratio: f64,

    /// Output JSON path; stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(serde::Serialize)]
struct SampleOutput<'a> {
    url: &'a str,
    width: f64,
    height: f64,
    count: usize,
    points: &'a [dotmorph::Point],
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Sample(args) => cmd_sample(args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    anyhow::ensure!(
        args.fps.is_finite() && args.fps > 0.0,
        "--fps must be a positive number"
    );
    let scenario = dotmorph::Scenario::from_path(&args.in_path)?;
    let mut engine = scenario.engine.clone();
    engine.inline_loads = true;
    engine.render.reduced_motion |= args.reduced_motion;

    let canvas = scenario.canvas;
    let viewport = dotmorph::StaticViewport::new(f64::from(canvas.width), f64::from(canvas.height));
    viewport.set_scroll(args.scroll);
    let source = dotmorph::FsSvgSource::new(scenario.asset_root());

    let mut session = dotmorph::MorphSession::new(
        canvas,
        engine,
        Arc::new(source),
        Box::new(viewport),
        Box::new(dotmorph::ManualScheduler::new()),
    )?;
    for scene in scenario.scenes {
        session.mount_scene(scene);
    }

    let frame_ms = 1000.0 / args.fps;
    let frames = (args.time_ms.max(0.0) / frame_ms).ceil() as u64;
    for i in 0..=frames {
        session.on_frame(i as f64 * frame_ms);
    }
    let frame = session.render();
    tracing::debug!(
        frames,
        blend = ?session.last_blend(),
        "simulation finished"
    );

    create_parent_dir(&args.out)?;
    image::save_buffer_with_format(
        &args.out,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_sample(args: SampleArgs) -> anyhow::Result<()> {
    anyhow::ensure!(args.count > 0, "--count must be >= 1");
    let root = args.in_path.parent().unwrap_or_else(|| Path::new("."));
    let name = args
        .in_path
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("invalid svg path '{}'", args.in_path.display()))?;

    let source = dotmorph::FsSvgSource::new(root);
    let cache = dotmorph::SampleCache::new(Arc::new(source), dotmorph::CacheOpts::default());
    let req = dotmorph::FitRequest {
        url: name.to_string(),
        count: args.count,
        dest: dotmorph::Rect::new(0.0, 0.0, args.width, args.height),
        padding: args.padding,
        offset: dotmorph::Vec2::ZERO,
        outline_ratio: args.outline_ratio,
    };
    let points = cache.get_fitted_points(&req)?;

    let out = SampleOutput {
        url: name,
        width: args.width,
        height: args.height,
        count: points.len(),
        points: &points,
    };
    match &args.out {
        Some(path) => {
            create_parent_dir(path)?;
            let f = std::fs::File::create(path)
                .with_context(|| format!("create '{}'", path.display()))?;
            serde_json::to_writer_pretty(std::io::BufWriter::new(f), &out)
                .with_context(|| format!("write json '{}'", path.display()))?;
            eprintln!("wrote {}", path.display());
        }
        None => {
            serde_json::to_writer_pretty(std::io::stdout().lock(), &out)
                .context("write json to stdout")?;
            println!();
        }
    }
    Ok(())
}

fn create_parent_dir(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    Ok(())
}
