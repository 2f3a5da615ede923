use std::path::PathBuf;

use anyhow::Context as _;
use clap::{ArgAction, Parser};
use metamorph::{
    Ease, ImageDirSink, LineFile, RenderThreading, SequenceOpts, WarpSettings, generate_frames,
    load_morph_inputs, morph_frame, save_image, write_line_file,
};

#[derive(Parser, Debug)]
#[command(name = "metamorph", version, about = "Feature-line image morphing")]
struct Cli {
    /// Run configuration (`key=value` or `.json`).
    #[arg(default_value = "config.txt")]
    config: PathBuf,

    /// Frame count K; K + 1 frames are written.
    #[arg(long)]
    frames: Option<u32>,

    /// Directory the frames are written to.
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Easing curve (`smoothstep`, `linear`, `in_out_cubic`, ...).
    #[arg(long)]
    ease: Option<Ease>,

    /// Weight offset `a`.
    #[arg(short = 'a', allow_negative_numbers = true)]
    a: Option<f64>,

    /// Weight falloff exponent `b`.
    #[arg(short = 'b', allow_negative_numbers = true)]
    b: Option<f64>,

    /// Segment-length exponent `p`.
    #[arg(short = 'p', allow_negative_numbers = true)]
    p: Option<f64>,

    /// Enable frame-level parallelism.
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// Override rayon worker threads (parallel mode only).
    #[arg(long)]
    threads: Option<usize>,

    /// Render chunk size (parallel mode only).
    #[arg(long, default_value_t = 64)]
    chunk_size: usize,

    /// Render one frame at morph parameter T in [0, 1] (no easing) instead of the sequence.
    #[arg(long, value_name = "T", requires = "out")]
    single_frame: Option<f64>,

    /// Output image for `--single-frame`.
    #[arg(long, requires = "single_frame")]
    out: Option<PathBuf>,

    /// Write the loaded feature lines to the config's `savefile`.
    #[arg(long, default_value_t = false)]
    save_lines: bool,

    /// More log output (`-v` info, `-vv` debug).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let inputs = load_morph_inputs(&cli.config)
        .with_context(|| format!("load morph inputs from '{}'", cli.config.display()))?;
    let config = &inputs.config;

    if cli.save_lines {
        let path = config
            .savefile
            .as_ref()
            .context("--save-lines needs a 'savefile' entry in the config")?;
        let lines = LineFile {
            source_image: Some(inputs.source_path.clone()),
            target_image: Some(inputs.target_path.clone()),
            features: inputs.features.clone(),
        };
        std::fs::write(path, write_line_file(&lines))
            .with_context(|| format!("write line file '{}'", path.display()))?;
        eprintln!("wrote {}", path.display());
    }

    let mut overrides = config.clone();
    overrides.a = cli.a.or(config.a);
    overrides.b = cli.b.or(config.b);
    overrides.p = cli.p.or(config.p);
    let params = overrides.warp_params().context("invalid warp weights")?;

    let opts = SequenceOpts {
        frames: cli.frames.or(config.frames).unwrap_or(30),
        ease: cli.ease.or(config.ease).unwrap_or_default(),
        warp: WarpSettings {
            params,
            ..WarpSettings::default()
        },
        threading: RenderThreading {
            parallel: cli.parallel,
            chunk_size: cli.chunk_size,
            threads: cli.threads,
        },
    };

    if let (Some(t), Some(out)) = (cli.single_frame, cli.out.as_ref()) {
        let frame = morph_frame(
            &inputs.source,
            &inputs.target,
            &inputs.features,
            t,
            &opts.warp,
        )
        .with_context(|| format!("render frame at t={t}"))?;
        save_image(&frame, out).with_context(|| format!("write '{}'", out.display()))?;
        eprintln!("wrote {}", out.display());
        return Ok(());
    }

    let out_dir = cli
        .out_dir
        .or_else(|| config.output_dir.clone())
        .unwrap_or_else(|| PathBuf::from("."));
    let mut sink = ImageDirSink::new(&out_dir);
    let stats = generate_frames(
        &inputs.source,
        &inputs.target,
        &inputs.features,
        &opts,
        &mut sink,
    )
    .context("render frame sequence")?;

    if stats.frames_failed > 0 {
        tracing::warn!(
            failed = stats.frames_failed,
            total = stats.frames_total,
            "some frames could not be written"
        );
    }
    eprintln!(
        "wrote {} of {} frames to {}",
        stats.frames_written,
        stats.frames_total,
        out_dir.display()
    );
    Ok(())
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        _ => tracing::Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .init();
}
