use rayon::prelude::*;

use crate::{
    animation::ease::Ease,
    features::model::FeatureSet,
    foundation::{
        core::FrameIndex,
        error::{MorphError, MorphResult},
    },
    raster::buffer::Image,
    sequence::sink::{FrameSink, SinkConfig},
    warp::{field::WarpSettings, morph::morph_frame},
};

/// Frame-level parallelism for [`generate_frames`].
#[derive(Clone, Debug)]
pub struct RenderThreading {
    /// Render the frames of one chunk concurrently.
    pub parallel: bool,
    /// Frames rendered per chunk; also the most frames alive at once. `0` is treated as `1`.
    pub chunk_size: usize,
    /// Worker count for the dedicated pool. `None` lets rayon decide.
    pub threads: Option<usize>,
}

impl Default for RenderThreading {
    fn default() -> Self {
        Self {
            parallel: false,
            chunk_size: 64,
            threads: None,
        }
    }
}

/// Options for [`generate_frames`].
#[derive(Clone, Debug)]
pub struct SequenceOpts {
    /// Number of steps K; the sequence has K + 1 frames.
    pub frames: u32,
    /// Easing applied to `i / K` before morphing.
    pub ease: Ease,
    /// Field warp parameters.
    pub warp: WarpSettings,
    /// Frame-level threading.
    pub threading: RenderThreading,
}

impl Default for SequenceOpts {
    fn default() -> Self {
        Self {
            frames: 30,
            ease: Ease::Smoothstep,
            warp: WarpSettings::default(),
            threading: RenderThreading::default(),
        }
    }
}

/// Outcome counters of one [`generate_frames`] run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SequenceStats {
    /// K + 1.
    pub frames_total: u64,
    /// Frames the sink accepted.
    pub frames_written: u64,
    /// Frames the sink rejected; the run continued past them.
    pub frames_failed: u64,
}

/// Linear sequence parameter `i / K`.
pub fn frame_t(i: u64, frames: u32) -> f64 {
    if frames == 0 {
        return 0.0;
    }
    (i as f64 / f64::from(frames)).clamp(0.0, 1.0)
}

/// Render frame `idx` of the sequence described by `opts`.
pub fn render_frame(
    source: &Image,
    target: &Image,
    features: &FeatureSet,
    idx: FrameIndex,
    opts: &SequenceOpts,
) -> MorphResult<Image> {
    let t = opts.ease.apply(frame_t(idx.0, opts.frames));
    morph_frame(source, target, features, t, &opts.warp)
}

/// Render frames `0..=K` and hand them to `sink` in index order.
///
/// Rendering errors abort the run. A failed `push_frame` is logged and counted, and the sequence
/// moves on to the next frame.
#[tracing::instrument(level = "debug", skip_all, fields(frames = opts.frames))]
pub fn generate_frames(
    source: &Image,
    target: &Image,
    features: &FeatureSet,
    opts: &SequenceOpts,
    sink: &mut dyn FrameSink,
) -> MorphResult<SequenceStats> {
    if opts.frames == 0 {
        return Err(MorphError::validation("frame count K must be >= 1"));
    }
    features.validate()?;
    opts.warp.params.validate()?;

    let frames_total = u64::from(opts.frames) + 1;
    let (width, height) = (
        source.width().min(target.width()),
        source.height().min(target.height()),
    );
    sink.begin(SinkConfig {
        width,
        height,
        frames_total,
    })?;

    let mut stats = SequenceStats {
        frames_total,
        ..SequenceStats::default()
    };

    if !opts.threading.parallel {
        for i in 0..frames_total {
            let idx = FrameIndex(i);
            let frame = render_frame(source, target, features, idx, opts)?;
            push(sink, idx, &frame, &mut stats);
        }
        sink.end()?;
        return Ok(stats);
    }

    let pool = build_thread_pool(opts.threading.threads)?;
    let chunk_size = normalized_chunk_size(opts.threading.chunk_size);

    let mut chunk_start = 0;
    while chunk_start < frames_total {
        let chunk_end = (chunk_start + chunk_size).min(frames_total);
        let indices = (chunk_start..chunk_end).map(FrameIndex).collect::<Vec<_>>();
        let rendered = pool.install(|| {
            indices
                .par_iter()
                .map(|&idx| render_frame(source, target, features, idx, opts))
                .collect::<Vec<_>>()
        });
        for (idx, frame) in indices.into_iter().zip(rendered) {
            push(sink, idx, &frame?, &mut stats);
        }
        chunk_start = chunk_end;
    }

    sink.end()?;
    Ok(stats)
}

fn push(sink: &mut dyn FrameSink, idx: FrameIndex, frame: &Image, stats: &mut SequenceStats) {
    match sink.push_frame(idx, frame) {
        Ok(()) => {
            stats.frames_written += 1;
            tracing::info!(frame = idx.0, total = stats.frames_total, "frame written");
        }
        Err(e) => {
            stats.frames_failed += 1;
            tracing::warn!(frame = idx.0, error = %e, "skipping frame");
        }
    }
}

fn build_thread_pool(threads: Option<usize>) -> MorphResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(MorphError::validation(
            "render threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| {
            MorphError::Other(anyhow::anyhow!("failed to build rayon thread pool: {e}"))
        })
}

fn normalized_chunk_size(chunk_size: usize) -> u64 {
    if chunk_size == 0 {
        1
    } else {
        chunk_size as u64
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sequence/pipeline.rs"]
mod tests;
