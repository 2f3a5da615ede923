use crate::foundation::{
    core::{Point, Vec2},
    error::{MorphError, MorphResult},
};

/// A directed line segment `P -> Q` marking a landmark, in pixel units from the lower-left corner.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Feature {
    /// Start point.
    pub p: Point,
    /// End point.
    pub q: Point,
}

impl Feature {
    /// Segment from `p` to `q`. Call [`Feature::validate`] before warping with it.
    pub fn new(p: Point, q: Point) -> Self {
        Self { p, q }
    }

    /// `Q - P`.
    pub fn vector(&self) -> Vec2 {
        self.q - self.p
    }

    /// Euclidean length of the segment.
    pub fn length(&self) -> f64 {
        self.vector().length()
    }

    /// Endpoint-wise interpolation toward `other`.
    pub fn lerp(&self, other: &Feature, t: f64) -> Feature {
        Feature {
            p: self.p.lerp(other.p, t),
            q: self.q.lerp(other.q, t),
        }
    }

    /// Reject non-finite endpoints and zero-length segments.
    pub fn validate(&self) -> MorphResult<()> {
        if !(self.p.is_finite() && self.q.is_finite()) {
            return Err(MorphError::validation(format!(
                "feature {self} has non-finite coordinates"
            )));
        }
        let v = self.vector();
        if v.dot(v) < f64::MIN_POSITIVE {
            return Err(MorphError::validation(format!(
                "feature {self} has zero length"
            )));
        }
        Ok(())
    }
}

impl std::fmt::Display for Feature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({},{})->({},{})",
            self.p.x, self.p.y, self.q.x, self.q.y
        )
    }
}

/// Index-aligned features on the source and target images: `source[i]` corresponds to
/// `target[i]`.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FeatureSet {
    /// Features drawn on the source image.
    pub source: Vec<Feature>,
    /// Corresponding features drawn on the target image.
    pub target: Vec<Feature>,
}

impl FeatureSet {
    /// Pair up two feature lists. Call [`FeatureSet::validate`] before morphing.
    pub fn new(source: Vec<Feature>, target: Vec<Feature>) -> Self {
        Self { source, target }
    }

    /// The same features drawn identically on both images.
    pub fn shared(features: Vec<Feature>) -> Self {
        Self {
            source: features.clone(),
            target: features,
        }
    }

    /// Number of correspondences (the source count; equal to the target count once valid).
    pub fn len(&self) -> usize {
        self.source.len()
    }

    /// `true` when there are no source features.
    pub fn is_empty(&self) -> bool {
        self.source.is_empty()
    }

    /// At least one pair, equal counts, every feature non-degenerate, and no pair whose
    /// interpolated segment passes through zero length for some `t` in `[0, 1]`.
    pub fn validate(&self) -> MorphResult<()> {
        if self.source.is_empty() || self.target.is_empty() {
            return Err(MorphError::validation(
                "at least one feature pair is required to morph",
            ));
        }
        if self.source.len() != self.target.len() {
            return Err(MorphError::validation(format!(
                "feature count mismatch: {} on source, {} on target",
                self.source.len(),
                self.target.len()
            )));
        }
        for (side, list) in [("source", &self.source), ("target", &self.target)] {
            for (i, f) in list.iter().enumerate() {
                f.validate()
                    .map_err(|e| e.with_context(format!("{side} feature #{i}")))?;
            }
        }
        for (i, (s, d)) in self.source.iter().zip(&self.target).enumerate() {
            // d_s + t (d_t - d_s) hits zero exactly when the directions are opposite.
            let (ds, dt) = (s.vector(), d.vector());
            if ds.cross(dt) == 0.0 && ds.dot(dt) < 0.0 {
                return Err(MorphError::validation(format!(
                    "feature pair #{i}: target {d} reverses source {s}, so the line collapses \
                     mid-morph"
                )));
            }
        }
        Ok(())
    }

    /// Per-index interpolation from source geometry (`t = 0`) to target geometry (`t = 1`).
    pub fn interpolate(&self, t: f64) -> Vec<Feature> {
        self.source
            .iter()
            .zip(&self.target)
            .map(|(s, d)| s.lerp(d, t))
            .collect()
    }

    /// Exchange the roles of source and target.
    pub fn swapped(&self) -> FeatureSet {
        FeatureSet {
            source: self.target.clone(),
            target: self.source.clone(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/features/model.rs"]
mod tests;
