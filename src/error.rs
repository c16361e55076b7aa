//! Error types surfaced by an inlining run.

use std::path::PathBuf;

/// Result alias used across the crate.
pub type InlineResult<T> = Result<T, InlineError>;

/// Failures that abort an inlining run.
///
/// Every variant is terminal: no document is rewritten once one of these is produced.
#[derive(Debug, thiserror::Error)]
pub enum InlineError {
  /// A referenced asset could not be located in any search directory.
  #[error("dependency not found: {name} (searched {})", display_dirs(.search_dirs))]
  DependencyNotFound {
    /// Asset name as written in the marker.
    name: String,
    /// Directories that were searched.
    search_dirs: Vec<PathBuf>,
  },

  /// The located asset could not be read as text.
  #[error("failed to read dependency {name} at {}", .path.display())]
  Read {
    /// Asset name as written in the marker.
    name: String,
    /// Resolved path of the asset.
    path: PathBuf,
    /// Source I/O error.
    #[source]
    source: std::io::Error,
  },

  /// The minifier rejected the asset content.
  #[error("failed to minify dependency {name}")]
  Minify {
    /// Asset name as written in the marker.
    name: String,
    /// Error reported by the minifier.
    #[source]
    source: anyhow::Error,
  },

  /// The tag extractor produced a pattern that does not compile.
  #[error("invalid marker pattern for {name}")]
  InvalidPattern {
    /// Asset name as written in the marker.
    name: String,
    /// Source regex error.
    #[source]
    source: regex::Error,
  },

  /// A reference had no resolved content when substitution ran.
  #[error("dependency {name} was referenced but never resolved")]
  Unresolved {
    /// Asset name as written in the marker.
    name: String,
  },

  /// A host capability failed.
  #[error("host capability failed")]
  Host(#[from] anyhow::Error),
}

impl InlineError {
  /// Asset name associated with the failure, when there is one.
  pub fn asset_name(&self) -> Option<&str> {
    match self {
      Self::DependencyNotFound { name, .. }
      | Self::Read { name, .. }
      | Self::Minify { name, .. }
      | Self::InvalidPattern { name, .. }
      | Self::Unresolved { name } => Some(name.as_str()),
      Self::Host(_) => None,
    }
  }

  /// Check if this is a not-found failure.
  pub fn is_not_found(&self) -> bool {
    matches!(self, Self::DependencyNotFound { .. })
  }
}

fn display_dirs(dirs: &[PathBuf]) -> String {
  dirs
    .iter()
    .map(|dir| dir.display().to_string())
    .collect::<Vec<_>>()
    .join(", ")
}
