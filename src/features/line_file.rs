//! Line-editor files: which images were edited and the feature lines drawn on each.
//!
//! ```text
//! background1=face_a.png
//! line=120,200:180,204
//! background2=face_b.png
//! line=118,190:176,199
//! ```
//!
//! `line=` entries that appear before any `background` directive apply to both images.

use std::{
    fmt::Write as _,
    path::{Path, PathBuf},
};

use crate::{
    features::model::{Feature, FeatureSet},
    foundation::{
        core::Point,
        error::{MorphError, MorphResult},
    },
};

/// Which feature list subsequent `line=` entries are appended to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageChoice {
    /// The source image (`background1`).
    Source,
    /// The target image (`background2`).
    Target,
    /// Both images.
    Both,
}

/// Parsed contents of a line-editor file.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LineFile {
    /// Path given by `background1`, if any.
    pub source_image: Option<PathBuf>,
    /// Path given by `background2`, if any.
    pub target_image: Option<PathBuf>,
    /// Features in file order. Not validated.
    pub features: FeatureSet,
}

impl LineFile {
    /// Read and parse a line-editor file from disk.
    pub fn from_path(path: &Path) -> MorphResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| MorphError::io(format!("read line file '{}'", path.display()), e))?;
        parse_line_file(&text).map_err(|e| e.with_context(format!("'{}'", path.display())))
    }

    /// Rebase relative image paths onto `base`.
    pub fn resolve_paths(&mut self, base: &Path) {
        for slot in [&mut self.source_image, &mut self.target_image] {
            if let Some(p) = slot.as_mut() {
                *p = resolve_relative(base, p);
            }
        }
    }
}

/// Parse line-editor text. Unknown keys and blank lines are skipped.
pub fn parse_line_file(text: &str) -> MorphResult<LineFile> {
    let mut out = LineFile::default();
    let mut choice = ImageChoice::Both;

    for (n, raw) in text.lines().enumerate() {
        let line = raw.trim_end_matches('\r');
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        match key.trim() {
            "background1" => {
                out.source_image = non_empty_path(value);
                choice = ImageChoice::Source;
            }
            "background2" => {
                out.target_image = non_empty_path(value);
                choice = ImageChoice::Target;
            }
            "line" => {
                let feature = parse_line_value(value)
                    .map_err(|e| e.with_context(format!("line {}", n + 1)))?;
                if matches!(choice, ImageChoice::Source | ImageChoice::Both) {
                    out.features.source.push(feature);
                }
                if matches!(choice, ImageChoice::Target | ImageChoice::Both) {
                    out.features.target.push(feature);
                }
            }
            _ => {}
        }
    }
    Ok(out)
}

/// Serialize in the line editor's own format. Coordinates are truncated to integers.
pub fn write_line_file(file: &LineFile) -> String {
    let mut out = String::new();
    let sections = [
        ("background1", &file.source_image, &file.features.source),
        ("background2", &file.target_image, &file.features.target),
    ];
    for (key, image, lines) in sections {
        let name = image
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        let _ = writeln!(out, "{key}={name}");
        for f in lines {
            let _ = writeln!(
                out,
                "line={},{}:{},{}",
                f.p.x as i64, f.p.y as i64, f.q.x as i64, f.q.y as i64
            );
        }
    }
    out
}

/// Join `path` onto `base` unless it is already absolute.
pub(crate) fn resolve_relative(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

fn non_empty_path(value: &str) -> Option<PathBuf> {
    let value = value.trim();
    (!value.is_empty()).then(|| PathBuf::from(value))
}

fn parse_line_value(value: &str) -> MorphResult<Feature> {
    let (p, q) = value
        .split_once(':')
        .ok_or_else(|| MorphError::parse(format!("expected 'x1,y1:x2,y2', got '{value}'")))?;
    Ok(Feature::new(parse_point(p)?, parse_point(q)?))
}

fn parse_point(s: &str) -> MorphResult<Point> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| MorphError::parse(format!("expected 'x,y', got '{s}'")))?;
    Ok(Point::new(parse_coord(x)?, parse_coord(y)?))
}

fn parse_coord(s: &str) -> MorphResult<f64> {
    let s = s.trim();
    s.parse::<f64>()
        .map_err(|_| MorphError::parse(format!("invalid coordinate '{s}'")))
}

#[cfg(test)]
#[path = "../../tests/unit/features/line_file.rs"]
mod tests;
