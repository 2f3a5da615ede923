use crate::{
    features::model::FeatureSet,
    foundation::error::{MorphError, MorphResult},
    raster::buffer::Image,
    warp::{
        blend::cross_dissolve,
        field::{WarpSettings, field_warp},
    },
};

/// One morphed frame at `t` in `[0, 1]`.
///
/// Both images are warped toward the feature geometry interpolated at `t` (the source from its
/// own lines, the target from its own lines) and the two warps are cross-dissolved by `t`.
/// At `t = 0` the result is the source warped onto its own lines, at `t = 1` the target.
pub fn morph_frame(
    source: &Image,
    target: &Image,
    features: &FeatureSet,
    t: f64,
    settings: &WarpSettings,
) -> MorphResult<Image> {
    if !t.is_finite() {
        return Err(MorphError::validation(format!(
            "morph t must be finite, got {t}"
        )));
    }
    let t = t.clamp(0.0, 1.0);

    let toward_source = features.interpolate(t);
    let toward_target = features.swapped().interpolate(1.0 - t);

    let from_source = field_warp(source, &features.source, &toward_source, settings)?;
    let from_target = field_warp(target, &features.target, &toward_target, settings)?;

    cross_dissolve(&from_source, &from_target, t as f32)
}

#[cfg(test)]
#[path = "../../tests/unit/warp/morph.rs"]
mod tests;
