use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use rand::SeedableRng as _;
use rand::rngs::StdRng;

use contrail::{BackdropConfig, BackdropSession, Rgb8, Viewport};

#[derive(Parser, Debug)]
#[command(name = "contrail", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the backdrop after N frame steps as a single PNG.
    Frame(FrameArgs),
    /// Render a run of consecutive frames as numbered PNGs.
    Sequence(SequenceArgs),
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Frame steps to advance before capturing.
    #[arg(long, default_value_t = 1)]
    steps: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct SequenceArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Number of frames to write.
    #[arg(long, default_value_t = 60)]
    frames: u64,

    /// Output directory for frame_NNNNN.png files.
    #[arg(long)]
    out_dir: PathBuf,
}

#[derive(Parser, Debug)]
struct CommonArgs {
    /// Viewport width in pixels.
    #[arg(long, default_value_t = 1280)]
    width: u32,

    /// Viewport height in pixels.
    #[arg(long, default_value_t = 720)]
    height: u32,

    /// Seed for the route layout; omit for a fresh layout each run.
    #[arg(long)]
    seed: Option<u64>,

    /// Backdrop config JSON; defaults to the stock look.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Opaque background the premultiplied frame is flattened onto, as R,G,B.
    #[arg(long, default_value = "0,8,20", value_parser = parse_rgb)]
    background: Rgb8,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Sequence(args) => cmd_sequence(args),
    }
}

fn read_config(path: Option<&Path>) -> anyhow::Result<BackdropConfig> {
    let Some(path) = path else {
        return Ok(BackdropConfig::default());
    };
    let f = File::open(path).with_context(|| format!("open config '{}'", path.display()))?;
    let r = BufReader::new(f);
    let config: BackdropConfig =
        serde_json::from_reader(r).with_context(|| "parse config JSON")?;
    Ok(config)
}

fn bind_session(common: &CommonArgs) -> anyhow::Result<BackdropSession> {
    let config = read_config(common.config.as_deref())?;
    let viewport = Viewport::new(common.width, common.height);
    let session = match common.seed {
        Some(seed) => {
            BackdropSession::bind_with_rng(viewport, config, &mut StdRng::seed_from_u64(seed))?
        }
        None => BackdropSession::bind(viewport, config)?,
    };
    Ok(session)
}

fn save_png(session: &BackdropSession, background: Rgb8, out: &Path) -> anyhow::Result<()> {
    if let Some(parent) = out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    let surface = session.surface();
    let flat = surface.to_rgba8_over(background);
    image::save_buffer_with_format(
        out,
        &flat,
        surface.width(),
        surface.height(),
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", out.display()))?;
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let mut session = bind_session(&args.common)?;
    session.run_frames(args.steps)?;
    save_png(&session, args.common.background, &args.out)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_sequence(args: SequenceArgs) -> anyhow::Result<()> {
    let mut session = bind_session(&args.common)?;
    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;

    for i in 0..args.frames {
        session.run_frames(1)?;
        let out = args.out_dir.join(format!("frame_{i:05}.png"));
        save_png(&session, args.common.background, &out)?;
    }

    let stats = session.unbind();
    eprintln!(
        "wrote {} frames to {} ({} rendered, {} skipped)",
        args.frames,
        args.out_dir.display(),
        stats.frames_rendered,
        stats.frames_skipped
    );
    Ok(())
}

fn parse_rgb(s: &str) -> Result<Rgb8, String> {
    let parts: Vec<&str> = s.split(',').collect();
    let [r, g, b] = parts.as_slice() else {
        return Err("expected R,G,B".to_string());
    };
    let parse = |v: &str| v.trim().parse::<u8>().map_err(|e| e.to_string());
    Ok(Rgb8::new(parse(r)?, parse(g)?, parse(b)?))
}
