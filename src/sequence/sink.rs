use std::path::{Path, PathBuf};

use crate::{
    foundation::{
        core::FrameIndex,
        error::{MorphError, MorphResult},
    },
    raster::{buffer::Image, codec::save_image},
};

/// Configuration provided to a [`FrameSink`] before the first frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkConfig {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Number of frames that will be pushed (K + 1).
    pub frames_total: u64,
}

/// Consumer of rendered frames.
///
/// Ordering contract: `push_frame` is called in strictly increasing [`FrameIndex`] order. A
/// failed `push_frame` does not end the sequence; the next frame is still pushed.
pub trait FrameSink: Send {
    /// Called once before any frames are pushed. Errors abort the run.
    fn begin(&mut self, cfg: SinkConfig) -> MorphResult<()>;
    /// Persist one frame. The frame is dropped by the caller afterwards.
    fn push_frame(&mut self, idx: FrameIndex, frame: &Image) -> MorphResult<()>;
    /// Called once after the last frame.
    fn end(&mut self) -> MorphResult<()>;
}

/// `<prefix><index zero-padded to 3 digits, or more for long sequences>.<extension>`.
pub fn frame_file_name(
    prefix: &str,
    idx: FrameIndex,
    frames_total: u64,
    extension: &str,
) -> String {
    let last = frames_total.saturating_sub(1);
    let width = last.to_string().len().max(3);
    format!("{prefix}{:0width$}.{extension}", idx.0)
}

/// Writes each frame as a numbered image file in a directory (`frame000.png`, ...).
#[derive(Debug, Clone)]
pub struct ImageDirSink {
    dir: PathBuf,
    prefix: String,
    extension: String,
    frames_total: u64,
    written: Vec<PathBuf>,
}

impl ImageDirSink {
    /// Sink writing `frameNNN.png` into `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            prefix: "frame".to_string(),
            extension: "png".to_string(),
            frames_total: 0,
            written: Vec::new(),
        }
    }

    /// Replace the `frame` file name prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Replace the `png` extension; it selects the codec.
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Output directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Files written successfully so far, in order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    /// Path frame `idx` is written to.
    pub fn frame_path(&self, idx: FrameIndex) -> PathBuf {
        self.dir.join(frame_file_name(
            &self.prefix,
            idx,
            self.frames_total,
            &self.extension,
        ))
    }
}

impl FrameSink for ImageDirSink {
    fn begin(&mut self, cfg: SinkConfig) -> MorphResult<()> {
        std::fs::create_dir_all(&self.dir).map_err(|e| {
            MorphError::io(format!("create output dir '{}'", self.dir.display()), e)
        })?;
        self.frames_total = cfg.frames_total;
        self.written.clear();
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &Image) -> MorphResult<()> {
        let path = self.frame_path(idx);
        save_image(frame, &path)?;
        tracing::debug!(path = %path.display(), "wrote frame");
        self.written.push(path);
        Ok(())
    }

    fn end(&mut self) -> MorphResult<()> {
        Ok(())
    }
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(FrameIndex, Image)>,
}

impl InMemorySink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the sink configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    /// Borrow the captured frames.
    pub fn frames(&self) -> &[(FrameIndex, Image)] {
        &self.frames
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> MorphResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &Image) -> MorphResult<()> {
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> MorphResult<()> {
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sequence/sink.rs"]
mod tests;
