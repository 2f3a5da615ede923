//! Metamorph morphs one raster image into another with feature-line field warping
//! (Beier-Neely).
//!
//! Corresponding directed line segments drawn on the two images steer an inverse mapping: every
//! output pixel is pulled from a weighted blend of per-line displacements, then the two warped
//! images are cross-dissolved. The public API is layered:
//!
//! - Load inputs with [`load_morph_inputs`] (config file, line-editor file, two images)
//! - Render a single frame with [`morph_frame`], or the primitives [`field_warp`],
//!   [`sample_bilinear`] and [`cross_dissolve`]
//! - Stream an eased `0..=K` sequence into a [`FrameSink`] with [`generate_frames`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod animation;
mod features;
mod foundation;
mod raster;
mod sequence;
mod warp;

pub use crate::foundation::core::{FrameIndex, Point, Rgba8, RgbaF, Vec2, perp};
pub use crate::foundation::error::{MorphError, MorphResult};
pub use crate::foundation::math::lerp;

pub use crate::animation::ease::Ease;
pub use crate::features::config::MorphConfig;
pub use crate::features::inputs::{MorphInputs, load_morph_inputs};
pub use crate::features::line_file::{ImageChoice, LineFile, parse_line_file, write_line_file};
pub use crate::features::model::{Feature, FeatureSet};
pub use crate::raster::buffer::Image;
pub use crate::raster::codec::{decode_image, image_format_for_path, load_image, save_image};
pub use crate::sequence::pipeline::{
    RenderThreading, SequenceOpts, SequenceStats, frame_t, generate_frames, render_frame,
};
pub use crate::sequence::sink::{
    FrameSink, ImageDirSink, InMemorySink, SinkConfig, frame_file_name,
};
pub use crate::warp::blend::cross_dissolve;
pub use crate::warp::field::{WarpParams, WarpSettings, feature_weight, field_warp, source_point};
pub use crate::warp::morph::morph_frame;
pub use crate::warp::sample::sample_bilinear;
