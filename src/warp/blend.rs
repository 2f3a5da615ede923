use crate::{
    foundation::{
        core::{Rgba8, RgbaF},
        error::{MorphError, MorphResult},
    },
    raster::buffer::Image,
};

/// Per-pixel `a + t * (b - a)` on all four channels, `t` clamped to `[0, 1]`.
///
/// The output covers the overlap of the two images (component-wise minimum size); pixels
/// outside the smaller image are dropped. `t = 0` reproduces `a` and `t = 1` reproduces `b`
/// exactly over that overlap.
pub fn cross_dissolve(a: &Image, b: &Image, t: f32) -> MorphResult<Image> {
    if !t.is_finite() {
        return Err(MorphError::validation(format!(
            "cross-dissolve t must be finite, got {t}"
        )));
    }
    let t = t.clamp(0.0, 1.0);
    let width = a.width().min(b.width());
    let height = a.height().min(b.height());
    let mut out = Image::new(width, height)?;

    let row_bytes = width as usize * 4;
    let rows = out
        .data_mut()
        .chunks_exact_mut(row_bytes)
        .zip(a.as_raw().chunks_exact(a.stride()))
        .zip(b.as_raw().chunks_exact(b.stride()));
    for ((dst, ra), rb) in rows {
        for ((d, pa), pb) in dst
            .chunks_exact_mut(4)
            .zip(ra[..row_bytes].chunks_exact(4))
            .zip(rb[..row_bytes].chunks_exact(4))
        {
            let ca = RgbaF::from(Rgba8::from_array([pa[0], pa[1], pa[2], pa[3]]));
            let cb = RgbaF::from(Rgba8::from_array([pb[0], pb[1], pb[2], pb[3]]));
            d.copy_from_slice(&Rgba8::from(ca.lerp(cb, t)).to_array());
        }
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/warp/blend.rs"]
mod tests;
