//! Capabilities the host pipeline supplies to an inlining run.
//!
//! The transform only depends on the [`InlineHost`] trait: any pipeline that can log, locate
//! assets, and find marker tags in its documents can drive it. [`FsHost`] is the stock
//! implementation backed by the local filesystem and the `<!-- inlineSVG: name -->` syntax.

mod fs;
mod markers;

use std::path::{Path, PathBuf};

pub use fs::FsHost;
pub use markers::MarkerSyntax;

/// Marker name recognised by the tag extractor.
pub const MARKER_NAME: &str = "inlineSVG";

/// Capability set required from the host pipeline.
#[allow(async_fn_in_trait)]
pub trait InlineHost {
  /// Report progress to the host's observer.
  fn log(&self, message: &str);

  /// Locate an asset by name inside the provided search directories.
  ///
  /// Returns `Ok(None)` when no directory contains the asset.
  async fn find_asset(&self, name: &str, search_dirs: &[PathBuf]) -> anyhow::Result<Option<PathBuf>>;

  /// Pattern matching every marker occurrence that references `reference`.
  fn tag_pattern(&self, marker: &str, reference: &str) -> anyhow::Result<String>;

  /// Asset references named by `marker` tags in `content`, in document order.
  fn tag_list(&self, marker: &str, content: &str) -> anyhow::Result<Vec<String>>;

  /// Load the text content of a located asset.
  async fn read_asset(&self, path: &Path) -> std::io::Result<String> {
    tokio::fs::read_to_string(path).await
  }
}

impl<H: InlineHost> InlineHost for &H {
  fn log(&self, message: &str) {
    (**self).log(message)
  }

  async fn find_asset(&self, name: &str, search_dirs: &[PathBuf]) -> anyhow::Result<Option<PathBuf>> {
    (**self).find_asset(name, search_dirs).await
  }

  fn tag_pattern(&self, marker: &str, reference: &str) -> anyhow::Result<String> {
    (**self).tag_pattern(marker, reference)
  }

  fn tag_list(&self, marker: &str, content: &str) -> anyhow::Result<Vec<String>> {
    (**self).tag_list(marker, content)
  }

  async fn read_asset(&self, path: &Path) -> std::io::Result<String> {
    (**self).read_asset(path).await
  }
}
