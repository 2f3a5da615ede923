//! Beier-Neely field warping.
//!
//! Every output pixel `X` is inverse-mapped into the input image. Each line pair `i` gives
//! `X` local coordinates `(u, v)` against the destination segment `P_i -> Q_i` (where the
//! feature should appear in the output) and rebuilds that position against the source segment
//! `P'_i -> Q'_i` (where the feature sits in the input):
//!
//! ```text
//! u   = (X - P) . (Q - P) / |Q - P|^2
//! v   = (X - P) . perp(Q - P) / |Q - P|
//! X'i = P' + u (Q' - P') + v perp(Q' - P') / |Q' - P'|
//! ```
//!
//! The displacements `X'i - X` are averaged with weights `(|Q - P|^p / (a + dist))^b`, where
//! `dist` is the distance from `X` to the destination segment. The averaged point is sampled
//! bilinearly; points outside the input leave the output pixel at
//! [`Rgba8::TRANSPARENT`](crate::Rgba8::TRANSPARENT).

use rayon::prelude::*;

use crate::{
    features::model::Feature,
    foundation::{
        core::{Point, Vec2, perp},
        error::{MorphError, MorphResult},
    },
    raster::buffer::Image,
    warp::sample::sample_bilinear,
};

/// Weighting constants from Beier & Neely (1992), section 3.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct WarpParams {
    /// Offset added to the distance; keeps weights finite on the line itself. Must be > 0.
    pub a: f64,
    /// Falloff exponent: how fast a line's pull fades with distance.
    pub b: f64,
    /// Segment length exponent: `0` weighs all lines equally, `1` favours long lines.
    pub p: f64,
}

impl Default for WarpParams {
    fn default() -> Self {
        Self {
            a: 0.5,
            b: 1.0,
            p: 0.2,
        }
    }
}

impl WarpParams {
    /// All finite, `a > 0`.
    pub fn validate(&self) -> MorphResult<()> {
        if !(self.a.is_finite() && self.b.is_finite() && self.p.is_finite()) {
            return Err(MorphError::validation("warp params a, b, p must be finite"));
        }
        if self.a <= 0.0 {
            return Err(MorphError::validation(format!(
                "warp param a must be > 0, got {}",
                self.a
            )));
        }
        Ok(())
    }
}

/// Weight parameters plus how the pixel loop is scheduled.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WarpSettings {
    /// Weighting constants.
    pub params: WarpParams,
    /// Process output rows on the current rayon pool. Output is identical either way.
    pub parallel_rows: bool,
}

impl Default for WarpSettings {
    fn default() -> Self {
        Self {
            params: WarpParams::default(),
            parallel_rows: true,
        }
    }
}

/// Influence of one line on a point at distance `dist` from it.
///
/// Largest at `dist == 0` (for `b > 0`) and tends to zero as `dist` grows.
pub fn feature_weight(length: f64, dist: f64, params: &WarpParams) -> f64 {
    weight_from_length_term(length.powf(params.p), dist, params)
}

fn weight_from_length_term(length_term: f64, dist: f64, params: &WarpParams) -> f64 {
    (length_term / (params.a + dist)).powf(params.b)
}

/// Line pair with the per-line terms hoisted out of the pixel loop.
#[derive(Clone, Copy, Debug)]
struct LinePair {
    dst_p: Point,
    dst_q: Point,
    dst_dir: Vec2,
    dst_len: f64,
    dst_len_sq: f64,
    src_p: Point,
    src_dir: Vec2,
    src_perp_unit: Vec2,
    length_term: f64,
}

impl LinePair {
    fn new(src: &Feature, dst: &Feature, params: &WarpParams) -> Self {
        let dst_dir = dst.vector();
        let dst_len_sq = dst_dir.dot(dst_dir);
        let dst_len = dst_len_sq.sqrt();
        let src_dir = src.vector();
        Self {
            dst_p: dst.p,
            dst_q: dst.q,
            dst_dir,
            dst_len,
            dst_len_sq,
            src_p: src.p,
            src_dir,
            src_perp_unit: perp(src_dir) / src_dir.length(),
            length_term: dst_len.powf(params.p),
        }
    }

    /// Returns `(X'i - X, weight_i)`.
    fn contribution(&self, x: Point, params: &WarpParams) -> (Vec2, f64) {
        let px = x - self.dst_p;
        let u = px.dot(self.dst_dir) / self.dst_len_sq;
        let v = px.dot(perp(self.dst_dir)) / self.dst_len;

        let mapped = self.src_p + self.src_dir * u + self.src_perp_unit * v;

        let dist = if u < 0.0 {
            x.distance(self.dst_p)
        } else if u > 1.0 {
            x.distance(self.dst_q)
        } else {
            v.abs()
        };
        (
            mapped - x,
            weight_from_length_term(self.length_term, dist, params),
        )
    }
}

fn line_pairs(
    source_lines: &[Feature],
    dest_lines: &[Feature],
    params: &WarpParams,
) -> MorphResult<Vec<LinePair>> {
    params.validate()?;
    if source_lines.is_empty() {
        return Err(MorphError::validation(
            "field warp needs at least one line pair",
        ));
    }
    if source_lines.len() != dest_lines.len() {
        return Err(MorphError::validation(format!(
            "field warp line count mismatch: {} source, {} destination",
            source_lines.len(),
            dest_lines.len()
        )));
    }
    source_lines
        .iter()
        .zip(dest_lines)
        .enumerate()
        .map(|(i, (src, dst))| {
            src.validate()
                .and_then(|()| dst.validate())
                .map_err(|e| e.with_context(format!("line pair #{i}")))?;
            Ok(LinePair::new(src, dst, params))
        })
        .collect()
}

/// The input-image position output point `x` samples from.
///
/// May be non-finite if every weight underflows to zero.
pub fn source_point(
    x: Point,
    source_lines: &[Feature],
    dest_lines: &[Feature],
    params: &WarpParams,
) -> MorphResult<Point> {
    let pairs = line_pairs(source_lines, dest_lines, params)?;
    Ok(weighted_source_point(x, &pairs, params))
}

fn weighted_source_point(x: Point, pairs: &[LinePair], params: &WarpParams) -> Point {
    let mut d_sum = Vec2::ZERO;
    let mut weight_sum = 0.0;
    for pair in pairs {
        let (d, w) = pair.contribution(x, params);
        d_sum += d * w;
        weight_sum += w;
    }
    x + d_sum / weight_sum
}

/// Warp `image` so that each `source_lines[i]` (in the input) lands on `dest_lines[i]` in the
/// output. The output has the input's dimensions.
///
/// Errors on an empty or mismatched line list, a zero-length segment on either side, or invalid
/// params.
pub fn field_warp(
    image: &Image,
    source_lines: &[Feature],
    dest_lines: &[Feature],
    settings: &WarpSettings,
) -> MorphResult<Image> {
    let params = settings.params;
    let pairs = line_pairs(source_lines, dest_lines, &params)?;
    let mut out = Image::new(image.width(), image.height())?;
    let stride = out.stride();

    let warp_row = |(y, row): (usize, &mut [u8])| {
        for (x, px) in row.chunks_exact_mut(4).enumerate() {
            let at = weighted_source_point(Point::new(x as f64, y as f64), &pairs, &params);
            if in_bounds(image, at) {
                px.copy_from_slice(&sample_bilinear(image, at).to_array());
            }
        }
    };

    if settings.parallel_rows {
        out.data_mut()
            .par_chunks_mut(stride)
            .enumerate()
            .for_each(warp_row);
    } else {
        out.data_mut()
            .chunks_mut(stride)
            .enumerate()
            .for_each(warp_row);
    }
    Ok(out)
}

/// `[0, width) x [0, height)`; NaN is outside.
fn in_bounds(image: &Image, at: Point) -> bool {
    at.x >= 0.0
        && at.x < f64::from(image.width())
        && at.y >= 0.0
        && at.y < f64::from(image.height())
}

#[cfg(test)]
#[path = "../../tests/unit/warp/field.rs"]
mod tests;
