//! Project configuration loader and per-run inlining options.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::host::MarkerSyntax;
use crate::minify::SvgMinifyOptions;

const DEFAULT_CONFIG_FILE: &str = "inline.config.json";

/// Options for a single inlining run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InlineOptions {
  /// Directories searched for referenced assets. `None` turns the run into a no-op.
  pub assets: Option<Vec<PathBuf>>,
  /// Whether resolved assets pass through the minifier before being inlined.
  pub minify: bool,
}

impl InlineOptions {
  /// Options searching `assets` without minification.
  pub fn new(assets: Vec<PathBuf>) -> Self {
    Self {
      assets: Some(assets),
      minify: false,
    }
  }

  /// Toggle minification of resolved assets.
  pub fn with_minify(mut self, minify: bool) -> Self {
    self.minify = minify;
    self
  }
}

/// Discoverable project configuration describing where assets live and how to inline them.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct InlineConfig {
  /// Asset directories, relative to the project directory unless absolute.
  pub assets: Option<Vec<String>>,
  /// Whether resolved assets are minified.
  pub minify: bool,
  /// Passes applied by the SVG minifier.
  pub minifier: SvgMinifyOptions,
  /// Delimiters surrounding marker tags.
  pub marker: MarkerSyntax,
}

impl InlineConfig {
  /// Load `inline.config.json` from `project_dir`.
  ///
  /// A missing file yields the defaults. A malformed one is reported with a warning and
  /// also yields the defaults.
  pub fn discover(project_dir: &Path) -> Self {
    let candidate = project_dir.join(DEFAULT_CONFIG_FILE);
    match Self::from_path(&candidate) {
      Some(config) => config,
      None => {
        if candidate.exists() {
          tracing::warn!(
            "ignoring unreadable configuration at {}",
            candidate.display()
          );
        }
        Self::default()
      }
    }
  }

  /// Read configuration from a specific JSON file.
  pub fn from_path(path: &Path) -> Option<Self> {
    let content = fs::read_to_string(path).ok()?;
    serde_json::from_str(&content).ok()
  }

  /// Convert into run options, resolving asset directories against `project_dir`.
  pub fn to_options(&self, project_dir: &Path) -> InlineOptions {
    InlineOptions {
      assets: self.assets.as_ref().map(|dirs| {
        dirs
          .iter()
          .map(|dir| project_dir.join(dir))
          .collect()
      }),
      minify: self.minify,
    }
  }
}
