use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::cache::store::CacheOpts;
use crate::foundation::core::Canvas;
use crate::foundation::error::{DotmorphError, DotmorphResult};
use crate::render::config::RenderConfig;
use crate::scene::config::SceneConfig;
use crate::sim::config::SimConfig;

/// Engine-wide configuration. Every field has a default, so `{}` is a valid document.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Particle physics.
    pub sim: SimConfig,
    /// Appearance.
    pub render: RenderConfig,
    /// Sample cache bounds.
    pub cache: CacheOpts,
    /// Trailing-edge window for viewport resizes.
    pub resize_throttle_ms: f64,
    /// Run target loads on the calling thread instead of the worker pool.
    pub inline_loads: bool,
    /// Worker threads for target loads. `None` uses rayon defaults.
    pub loader_threads: Option<usize>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sim: SimConfig::default(),
            render: RenderConfig::default(),
            cache: CacheOpts::default(),
            resize_throttle_ms: 150.0,
            inline_loads: false,
            loader_threads: None,
        }
    }
}

impl EngineConfig {
    /// Parse engine configuration from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> DotmorphResult<Self> {
        let cfg: Self = serde_json::from_reader(r)
            .map_err(|e| DotmorphError::config(format!("parse engine config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse engine configuration from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> DotmorphResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            DotmorphError::config(format!("open engine config '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Check every section.
    pub fn validate(&self) -> DotmorphResult<()> {
        self.sim.validate()?;
        self.render.validate()?;
        if !self.resize_throttle_ms.is_finite() || self.resize_throttle_ms < 0.0 {
            return Err(DotmorphError::config(
                "resize_throttle_ms must be finite and >= 0",
            ));
        }
        if self.loader_threads == Some(0) {
            return Err(DotmorphError::config(
                "loader_threads must be >= 1 when set",
            ));
        }
        Ok(())
    }
}

/// A self-contained page description: canvas, engine settings and the scenes to mount.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Scenario {
    /// Viewport size.
    pub canvas: Canvas,
    /// Engine settings.
    #[serde(default)]
    pub engine: EngineConfig,
    /// Scenes in document order.
    #[serde(default)]
    pub scenes: Vec<SceneConfig>,
    /// Directory SVG locators resolve against. Relative paths are taken from the scenario
    /// file's directory.
    #[serde(default)]
    pub asset_root: Option<PathBuf>,
}

impl Scenario {
    /// Parse a scenario from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> DotmorphResult<Self> {
        let s: Self = serde_json::from_reader(r)
            .map_err(|e| DotmorphError::config(format!("parse scenario JSON: {e}")))?;
        Canvas::new(s.canvas.width, s.canvas.height)?;
        s.engine.validate()?;
        Ok(s)
    }

    /// Parse a scenario file. A relative or missing `asset_root` is resolved against the file's
    /// directory.
    pub fn from_path(path: impl AsRef<Path>) -> DotmorphResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            DotmorphError::config(format!("open scenario '{}': {e}", path.display()))
        })?;
        let mut s = Self::from_reader(BufReader::new(f))?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        s.asset_root = Some(match s.asset_root.take() {
            Some(root) if root.is_absolute() => root,
            Some(root) => base.join(root),
            None => base.to_path_buf(),
        });
        Ok(s)
    }

    /// Asset root, defaulting to the working directory.
    pub fn asset_root(&self) -> &Path {
        self.asset_root.as_deref().unwrap_or_else(|| Path::new("."))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/config.rs"]
mod tests;
