use std::path::{Path, PathBuf};

use crate::{
    animation::ease::Ease,
    features::line_file::resolve_relative,
    foundation::error::{MorphError, MorphResult},
    warp::field::WarpParams,
};

/// Run configuration: which images and line file to morph, plus optional overrides.
///
/// The on-disk form is `key=value` lines (`config.txt`); a `.json` path is read with serde.
/// Both forms ignore unknown keys.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MorphConfig {
    /// Source image.
    pub background1: Option<PathBuf>,
    /// Target image.
    pub background2: Option<PathBuf>,
    /// Line-editor file holding the feature lines.
    pub loadfile: Option<PathBuf>,
    /// Where `--save-lines` writes the loaded features.
    pub savefile: Option<PathBuf>,
    /// Frame count K; K + 1 frames are written.
    pub frames: Option<u32>,
    /// Weight offset `a`.
    pub a: Option<f64>,
    /// Weight falloff exponent `b`.
    pub b: Option<f64>,
    /// Segment-length exponent `p`.
    pub p: Option<f64>,
    /// Easing curve.
    pub ease: Option<Ease>,
    /// Directory frames are written to.
    pub output_dir: Option<PathBuf>,
}

impl MorphConfig {
    /// Parse `key=value` text. CRLF, blank lines and unknown keys are tolerated.
    pub fn parse(text: &str) -> MorphResult<Self> {
        let mut cfg = MorphConfig::default();
        for (n, raw) in text.lines().enumerate() {
            let line = raw.trim_end_matches('\r');
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let (key, value) = (key.trim(), value.trim());
            let at = |e: MorphError| e.with_context(format!("line {}", n + 1));
            match key {
                "background1" => cfg.background1 = path_value(value),
                "background2" => cfg.background2 = path_value(value),
                "loadfile" => cfg.loadfile = path_value(value),
                "savefile" => cfg.savefile = path_value(value),
                "output_dir" => cfg.output_dir = path_value(value),
                "frames" => cfg.frames = Some(number(key, value).map_err(at)?),
                "a" => cfg.a = Some(number(key, value).map_err(at)?),
                "b" => cfg.b = Some(number(key, value).map_err(at)?),
                "p" => cfg.p = Some(number(key, value).map_err(at)?),
                "ease" => cfg.ease = Some(value.parse().map_err(at)?),
                other => tracing::debug!(key = other, "ignoring unknown config key"),
            }
        }
        Ok(cfg)
    }

    /// Parse the JSON form.
    pub fn from_json(text: &str) -> MorphResult<Self> {
        serde_json::from_str(text).map_err(|e| MorphError::parse(format!("config json: {e}")))
    }

    /// Read a config file and resolve its relative paths against the file's directory.
    pub fn from_path(path: &Path) -> MorphResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| MorphError::io(format!("read config '{}'", path.display()), e))?;
        let is_json = path
            .extension()
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        let mut cfg = if is_json {
            Self::from_json(&text)
        } else {
            Self::parse(&text)
        }
        .map_err(|e| e.with_context(format!("'{}'", path.display())))?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        for slot in [
            &mut cfg.background1,
            &mut cfg.background2,
            &mut cfg.loadfile,
            &mut cfg.savefile,
            &mut cfg.output_dir,
        ] {
            if let Some(p) = slot.as_mut() {
                *p = resolve_relative(base, p);
            }
        }
        Ok(cfg)
    }

    /// Default weights with any `a`/`b`/`p` overrides applied, validated.
    pub fn warp_params(&self) -> MorphResult<WarpParams> {
        let d = WarpParams::default();
        let params = WarpParams {
            a: self.a.unwrap_or(d.a),
            b: self.b.unwrap_or(d.b),
            p: self.p.unwrap_or(d.p),
        };
        params.validate()?;
        Ok(params)
    }
}

fn path_value(value: &str) -> Option<PathBuf> {
    (!value.is_empty()).then(|| PathBuf::from(value))
}

fn number<T: std::str::FromStr>(key: &str, value: &str) -> MorphResult<T> {
    value
        .parse()
        .map_err(|_| MorphError::parse(format!("invalid value '{value}' for '{key}'")))
}

#[cfg(test)]
#[path = "../../tests/unit/features/config.rs"]
mod tests;
