use std::path::{Path, PathBuf};

use crate::{
    features::{config::MorphConfig, line_file::LineFile, model::FeatureSet},
    foundation::error::{MorphError, MorphResult},
    raster::{buffer::Image, codec::load_image},
};

/// Everything a morph run needs, loaded and validated.
#[derive(Clone, Debug)]
pub struct MorphInputs {
    /// The configuration the inputs were loaded from (paths already resolved).
    pub config: MorphConfig,
    /// Resolved path of the source image.
    pub source_path: PathBuf,
    /// Resolved path of the target image.
    pub target_path: PathBuf,
    /// Source image.
    pub source: Image,
    /// Target image.
    pub target: Image,
    /// Validated feature correspondences.
    pub features: FeatureSet,
}

/// Load the config at `config_path`, its line file, and both images.
///
/// Image names in the line file take precedence over the config's `background1`/`background2`.
/// Any failure is returned; no partial inputs are produced.
#[tracing::instrument]
pub fn load_morph_inputs(config_path: &Path) -> MorphResult<MorphInputs> {
    let config = MorphConfig::from_path(config_path)?;
    let line_path = config.loadfile.clone().ok_or_else(|| {
        MorphError::validation(format!(
            "config '{}' does not name a line file ('loadfile')",
            config_path.display()
        ))
    })?;

    let mut lines = LineFile::from_path(&line_path)?;
    lines.resolve_paths(line_path.parent().unwrap_or_else(|| Path::new("")));

    let source_path = lines
        .source_image
        .take()
        .or_else(|| config.background1.clone())
        .ok_or_else(|| MorphError::validation("no source image ('background1') was given"))?;
    let target_path = lines
        .target_image
        .take()
        .or_else(|| config.background2.clone())
        .ok_or_else(|| MorphError::validation("no target image ('background2') was given"))?;

    lines.features.validate()?;
    tracing::debug!(
        features = lines.features.len(),
        source = %source_path.display(),
        target = %target_path.display(),
        "loaded feature lines"
    );

    let source = load_image(&source_path)?;
    let target = load_image(&target_path)?;

    Ok(MorphInputs {
        config,
        source_path,
        target_path,
        source,
        target,
        features: lines.features,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/features/inputs.rs"]
mod tests;
