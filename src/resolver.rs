//! Concurrent resolution of every distinct asset referenced by a document set.

use std::path::PathBuf;

use futures::future::try_join_all;

use crate::error::{InlineError, InlineResult};
use crate::host::InlineHost;
use crate::minify::ContentMinifier;
use crate::models::{DependencySet, ReferenceIndex};

/// Locates, loads and optionally minifies the assets named by a [`ReferenceIndex`].
pub struct DependencyResolver<'a, H, M> {
  host: &'a H,
  minifier: &'a M,
  minify: bool,
}

impl<'a, H: InlineHost, M: ContentMinifier> DependencyResolver<'a, H, M> {
  /// Create a resolver. `minifier` only runs when `minify` is set.
  pub fn new(host: &'a H, minifier: &'a M, minify: bool) -> Self {
    Self {
      host,
      minifier,
      minify,
    }
  }

  /// Resolve each distinct asset in `index` exactly once.
  ///
  /// All lookups run concurrently. The first failure aborts the whole resolution and the
  /// remaining in-flight lookups are dropped.
  pub async fn resolve(
    &self,
    index: &ReferenceIndex,
    search_dirs: &[PathBuf],
  ) -> InlineResult<DependencySet> {
    let names = index.unique_names();
    tracing::debug!(
      "resolving {} unique dependencies from {} references",
      names.len(),
      index.total_references()
    );

    let resolved = try_join_all(
      names
        .into_iter()
        .map(|name| self.resolve_dependency(name, search_dirs)),
    )
    .await?;

    Ok(resolved.into_iter().collect())
  }

  async fn resolve_dependency(
    &self,
    name: String,
    search_dirs: &[PathBuf],
  ) -> InlineResult<(String, String)> {
    let Some(path) = self.host.find_asset(&name, search_dirs).await? else {
      return Err(InlineError::DependencyNotFound {
        name,
        search_dirs: search_dirs.to_vec(),
      });
    };

    let loaded = self.host.read_asset(&path).await;
    let raw = match loaded {
      Ok(raw) => raw,
      Err(source) => {
        return Err(InlineError::Read { name, path, source });
      }
    };

    let content = if self.minify {
      match self.minifier.minify(&raw).await {
        Ok(content) => content,
        Err(source) => return Err(InlineError::Minify { name, source }),
      }
    } else {
      raw
    };

    tracing::trace!("resolved {name} from {}", path.display());
    Ok((name, content))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::BTreeMap;
  use std::path::Path;
  use std::sync::Mutex;

  #[derive(Default)]
  struct MapHost {
    assets: BTreeMap<String, String>,
    unreadable: Vec<String>,
    failing_lookup: Option<String>,
    lookups: Mutex<Vec<String>>,
    reads: Mutex<Vec<PathBuf>>,
  }

  impl MapHost {
    fn with_assets(assets: &[(&str, &str)]) -> Self {
      Self {
        assets: assets
          .iter()
          .map(|(name, content)| (name.to_string(), content.to_string()))
          .collect(),
        ..Self::default()
      }
    }
  }

  impl InlineHost for MapHost {
    fn log(&self, _message: &str) {}

    async fn find_asset(&self, name: &str, _search_dirs: &[PathBuf]) -> anyhow::Result<Option<PathBuf>> {
      self.lookups.lock().unwrap().push(name.to_string());
      if self.failing_lookup.as_deref() == Some(name) {
        anyhow::bail!("registry timed out");
      }
      Ok(self.assets.contains_key(name).then(|| PathBuf::from(name)))
    }

    fn tag_pattern(&self, _marker: &str, reference: &str) -> anyhow::Result<String> {
      Ok(regex::escape(reference))
    }

    fn tag_list(&self, _marker: &str, _content: &str) -> anyhow::Result<Vec<String>> {
      Ok(Vec::new())
    }

    async fn read_asset(&self, path: &Path) -> std::io::Result<String> {
      self.reads.lock().unwrap().push(path.to_path_buf());
      let key = path.to_string_lossy();
      if self.unreadable.contains(&key.to_string()) {
        return Err(std::io::Error::from(std::io::ErrorKind::InvalidData));
      }
      self
        .assets
        .get(key.as_ref())
        .cloned()
        .ok_or_else(|| std::io::Error::from(std::io::ErrorKind::NotFound))
    }
  }

  struct Upper;

  impl ContentMinifier for Upper {
    async fn minify(&self, content: &str) -> anyhow::Result<String> {
      Ok(content.to_uppercase())
    }
  }

  struct Broken;

  impl ContentMinifier for Broken {
    async fn minify(&self, _content: &str) -> anyhow::Result<String> {
      Err(anyhow::anyhow!("unsupported markup"))
    }
  }

  fn index(entries: &[(&str, &[&str])]) -> ReferenceIndex {
    let mut index = ReferenceIndex::default();
    for (document, references) in entries {
      index.insert(*document, references.iter().map(|r| r.to_string()).collect());
    }
    index
  }

  #[tokio::test]
  async fn resolves_each_unique_name_once() {
    let host = MapHost::with_assets(&[("icon", "<svg>i</svg>"), ("logo", "<svg>l</svg>")]);
    let index = index(&[
      ("a.html", &["icon", "logo", "icon"]),
      ("b.html", &["icon"]),
      ("c.html", &[]),
    ]);

    let deps = DependencyResolver::new(&host, &Upper, false)
      .resolve(&index, &[PathBuf::from("assets")])
      .await
      .unwrap();

    assert_eq!(deps.len(), 2);
    assert_eq!(deps.get("icon"), Some("<svg>i</svg>"));
    assert_eq!(deps.get("logo"), Some("<svg>l</svg>"));

    let mut lookups = host.lookups.lock().unwrap().clone();
    lookups.sort();
    assert_eq!(lookups, vec!["icon".to_string(), "logo".to_string()]);
    assert_eq!(host.reads.lock().unwrap().len(), 2);
  }

  #[tokio::test]
  async fn applies_minifier_only_when_enabled() {
    let host = MapHost::with_assets(&[("icon", "<svg>i</svg>")]);
    let index = index(&[("a.html", &["icon"])]);
    let dirs = [PathBuf::from("assets")];

    let raw = DependencyResolver::new(&host, &Upper, false)
      .resolve(&index, &dirs)
      .await
      .unwrap();
    let minified = DependencyResolver::new(&host, &Upper, true)
      .resolve(&index, &dirs)
      .await
      .unwrap();

    assert_eq!(raw.get("icon"), Some("<svg>i</svg>"));
    assert_eq!(minified.get("icon"), Some("<SVG>I</SVG>"));
  }

  #[tokio::test]
  async fn missing_dependency_names_the_asset() {
    let host = MapHost::with_assets(&[("icon", "<svg/>")]);
    let index = index(&[("a.html", &["icon", "ghost"])]);

    let error = DependencyResolver::new(&host, &Upper, false)
      .resolve(&index, &[PathBuf::from("assets")])
      .await
      .unwrap_err();

    assert!(error.is_not_found());
    assert_eq!(error.asset_name(), Some("ghost"));
    assert!(error.to_string().contains("ghost"));
  }

  #[tokio::test]
  async fn minifier_failures_are_fatal() {
    let host = MapHost::with_assets(&[("icon", "<svg/>")]);
    let index = index(&[("a.html", &["icon"])]);

    let error = DependencyResolver::new(&host, &Broken, true)
      .resolve(&index, &[])
      .await
      .unwrap_err();

    assert!(matches!(error, InlineError::Minify { ref name, .. } if name == "icon"));
  }

  #[tokio::test]
  async fn read_failures_keep_name_and_path() {
    let host = MapHost {
      unreadable: vec!["icon".to_string()],
      ..MapHost::with_assets(&[("icon", "<svg/>")])
    };
    let index = index(&[("a.html", &["icon"])]);

    let error = DependencyResolver::new(&host, &Upper, false)
      .resolve(&index, &[PathBuf::from("assets")])
      .await
      .unwrap_err();

    match error {
      InlineError::Read { name, path, source } => {
        assert_eq!(name, "icon");
        assert_eq!(path, PathBuf::from("icon"));
        assert_eq!(source.kind(), std::io::ErrorKind::InvalidData);
      }
      other => panic!("expected a read failure, got {other:?}"),
    }
  }

  #[tokio::test]
  async fn lookup_failures_become_host_errors() {
    let host = MapHost {
      failing_lookup: Some("icon".to_string()),
      ..MapHost::with_assets(&[("icon", "<svg/>")])
    };
    let index = index(&[("a.html", &["icon"])]);

    let error = DependencyResolver::new(&host, &Upper, false)
      .resolve(&index, &[PathBuf::from("assets")])
      .await
      .unwrap_err();

    assert!(matches!(error, InlineError::Host(ref source) if source.to_string() == "registry timed out"));
    assert!(host.reads.lock().unwrap().is_empty());
  }

  #[tokio::test]
  async fn empty_index_resolves_nothing() {
    let host = MapHost::default();
    let deps = DependencyResolver::new(&host, &Upper, true)
      .resolve(&ReferenceIndex::default(), &[])
      .await
      .unwrap();

    assert!(deps.is_empty());
    assert!(host.lookups.lock().unwrap().is_empty());
  }
}
