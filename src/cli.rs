//! Command line front end inlining assets into documents on disk.

use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::builder::InlineBuilder;
use crate::config::InlineConfig;
use crate::host::FsHost;
use crate::minify::SvgMinifier;
use crate::models::{DocumentMap, InlineReport};

/// Inline `<!-- inlineSVG: name -->` markers with the referenced SVG files.
#[derive(Debug, Parser)]
#[command(name = "svg-inliner", version, about)]
pub struct Cli {
  /// Project directory holding `inline.config.json`.
  #[arg(long, value_name = "DIR", default_value = ".")]
  pub project: PathBuf,

  /// Asset directory to search, in priority order. Replaces the configured list.
  #[arg(long = "assets", value_name = "DIR")]
  pub assets: Vec<PathBuf>,

  /// Minify SVG content before inlining it.
  #[arg(long)]
  pub minify: bool,

  /// Write rewritten documents below this directory instead of in place.
  #[arg(long, value_name = "DIR")]
  pub out_dir: Option<PathBuf>,

  /// Log filter directive, e.g. `debug`. Falls back to `RUST_LOG`, then `info`.
  #[arg(long, value_name = "FILTER")]
  pub log: Option<String>,

  /// Documents to process.
  #[arg(required = true, value_name = "FILE")]
  pub files: Vec<PathBuf>,
}

impl Cli {
  /// Run the transform over the requested files and write back changed documents.
  pub async fn execute(self) -> Result<InlineReport> {
    let config = InlineConfig::discover(&self.project);
    let mut options = config.to_options(&self.project);
    if !self.assets.is_empty() {
      options.assets = Some(self.assets.clone());
    }
    options.minify |= self.minify;

    let mut documents = DocumentMap::new();
    for file in &self.files {
      let content = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("failed to read {}", file.display()))?;
      documents.insert(file.to_string_lossy().into_owned(), content);
    }
    let originals = documents.clone();

    let builder = InlineBuilder::new(FsHost::new(config.marker.clone()))
      .with_minifier(SvgMinifier::new(config.minifier.clone()));
    let report = builder
      .run(&mut documents, &options)
      .await
      .context("failed to inline assets")?;

    let mut writes = Vec::new();
    for (document, content) in &documents {
      if originals.get(document) == Some(content) {
        continue;
      }

      let source = Path::new(document);
      let target = match &self.out_dir {
        Some(out_dir) => mirrored_path(out_dir, &self.project, source)?,
        None => source.to_path_buf(),
      };
      writes.push((target, content));
    }

    for (target, content) in writes {
      if let Some(parent) = target.parent() {
        tokio::fs::create_dir_all(parent)
          .await
          .with_context(|| format!("failed to create {}", parent.display()))?;
      }
      tokio::fs::write(&target, content)
        .await
        .with_context(|| format!("failed to write {}", target.display()))?;
      tracing::debug!("wrote {}", target.display());
    }

    tracing::info!(
      "inlined {} assets across {} documents ({} substitutions)",
      report.dependencies,
      report.documents_rewritten,
      report.substitutions
    );
    Ok(report)
  }
}

/// Install the `tracing` subscriber used by the binary.
pub fn init_logging(filter: Option<&str>) {
  let filter = match filter {
    Some(directive) => EnvFilter::new(directive),
    None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
  };

  let _ = tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_target(false)
    .try_init();
}

/// Location of `source` below `out_dir`, keeping its path relative to the project.
///
/// Sources outside the project have no place in the mirrored tree and are rejected.
fn mirrored_path(out_dir: &Path, project: &Path, source: &Path) -> Result<PathBuf> {
  let relative = source.strip_prefix(project).unwrap_or(source);
  let mut mirrored = out_dir.to_path_buf();
  for component in relative.components() {
    match component {
      Component::Normal(part) => mirrored.push(part),
      Component::CurDir => {}
      Component::ParentDir | Component::RootDir | Component::Prefix(_) => bail!(
        "{} lies outside project directory {}",
        source.display(),
        project.display()
      ),
    }
  }
  Ok(mirrored)
}
