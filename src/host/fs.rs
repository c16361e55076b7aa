//! Filesystem-backed host used by the command line and by library callers without a pipeline.

use std::path::{Component, Path, PathBuf};

use anyhow::Context;

use super::{InlineHost, MarkerSyntax};

const ASSET_EXTENSION: &str = "svg";

/// Host that resolves assets on the local filesystem and reports progress through `tracing`.
#[derive(Debug, Clone, Default)]
pub struct FsHost {
  syntax: MarkerSyntax,
}

impl FsHost {
  /// Create a host recognising markers written with `syntax`.
  pub fn new(syntax: MarkerSyntax) -> Self {
    Self { syntax }
  }

  /// Marker delimiters recognised by this host.
  pub fn syntax(&self) -> &MarkerSyntax {
    &self.syntax
  }
}

impl InlineHost for FsHost {
  fn log(&self, message: &str) {
    tracing::info!("{message}");
  }

  async fn find_asset(&self, name: &str, search_dirs: &[PathBuf]) -> anyhow::Result<Option<PathBuf>> {
    let candidates = asset_candidates(name);
    if candidates.is_empty() {
      tracing::debug!("refusing to resolve asset name {name:?} outside the search directories");
      return Ok(None);
    }

    for dir in search_dirs {
      for candidate in &candidates {
        let path = dir.join(candidate);
        match tokio::fs::metadata(&path).await {
          Ok(metadata) if metadata.is_file() => return Ok(Some(path)),
          Ok(_) => continue,
          Err(err) if err.kind() == std::io::ErrorKind::NotFound => continue,
          Err(err) => {
            return Err(err).with_context(|| format!("failed to inspect {}", path.display()));
          }
        }
      }
    }

    Ok(None)
  }

  fn tag_pattern(&self, marker: &str, reference: &str) -> anyhow::Result<String> {
    Ok(self.syntax.reference_pattern(marker, reference))
  }

  fn tag_list(&self, marker: &str, content: &str) -> anyhow::Result<Vec<String>> {
    self
      .syntax
      .extract(marker, content)
      .with_context(|| format!("invalid marker syntax {:?}", self.syntax))
  }
}

/// Relative paths tried, in order, for an asset name.
///
/// Names that would escape the search directory produce no candidates.
fn asset_candidates(name: &str) -> Vec<PathBuf> {
  let trimmed = name.trim();
  if trimmed.is_empty() {
    return Vec::new();
  }

  let relative = Path::new(trimmed);
  let escapes = relative
    .components()
    .any(|component| !matches!(component, Component::Normal(_) | Component::CurDir));
  if escapes {
    return Vec::new();
  }

  let mut candidates = vec![relative.to_path_buf()];
  let has_extension = relative
    .extension()
    .is_some_and(|ext| ext.eq_ignore_ascii_case(ASSET_EXTENSION));
  if !has_extension {
    candidates.push(PathBuf::from(format!("{trimmed}.{ASSET_EXTENSION}")));
  }

  candidates
}
