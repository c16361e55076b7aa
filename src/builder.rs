//! Inlining orchestrator sequencing extraction, resolution and substitution.

use crate::config::InlineOptions;
use crate::error::InlineResult;
use crate::host::{InlineHost, MARKER_NAME};
use crate::minify::{ContentMinifier, SvgMinifier};
use crate::models::{DocumentMap, InlineReport, ReferenceIndex};
use crate::resolver::DependencyResolver;
use crate::substitution::substitute;

/// High-level helper for inlining referenced assets into a document collection.
pub struct InlineBuilder<H, M = SvgMinifier> {
  host: H,
  minifier: M,
}

impl<H: InlineHost> InlineBuilder<H> {
  /// Create a builder for the provided host using the default SVG minifier.
  pub fn new(host: H) -> Self {
    Self {
      host,
      minifier: SvgMinifier::default(),
    }
  }
}

impl<H: InlineHost, M: ContentMinifier> InlineBuilder<H, M> {
  /// Replace the minifier applied when [`InlineOptions::minify`] is set.
  pub fn with_minifier<N: ContentMinifier>(self, minifier: N) -> InlineBuilder<H, N> {
    InlineBuilder {
      host: self.host,
      minifier,
    }
  }

  /// Host capabilities driving this builder.
  pub fn host(&self) -> &H {
    &self.host
  }

  /// Inline every referenced asset into `documents`.
  ///
  /// Without asset directories the call logs a notice and returns without touching any
  /// document. Otherwise every distinct asset is resolved before the first document is
  /// rewritten, so a failure leaves the collection exactly as it was.
  pub async fn run(
    &self,
    documents: &mut DocumentMap,
    options: &InlineOptions,
  ) -> InlineResult<InlineReport> {
    let Some(search_dirs) = options.assets.as_deref() else {
      self.host.log("No assets provided.");
      return Ok(InlineReport::default());
    };

    let index = self.extract_references(documents)?;
    tracing::debug!(
      "extracted {} references from {} documents",
      index.total_references(),
      index.len()
    );

    let dependencies = DependencyResolver::new(&self.host, &self.minifier, options.minify)
      .resolve(&index, search_dirs)
      .await?;

    let mut rewritten = Vec::new();
    let mut progress = Vec::new();
    for (document, references) in index.iter() {
      let Some(content) = documents.get(document) else {
        continue;
      };

      let updated = substitute(
        &self.host,
        MARKER_NAME,
        document,
        content,
        references,
        &dependencies,
        |name, document| progress.push(format!("InlineSVG: {name} in {document}")),
      )?;

      if let Some(updated) = updated {
        rewritten.push((document.to_string(), updated));
      }
    }

    let report = InlineReport {
      documents_rewritten: rewritten.len(),
      substitutions: progress.len(),
      dependencies: dependencies.len(),
    };

    // Commit only once every document has been rewritten successfully.
    for (document, content) in rewritten {
      documents.insert(document, content);
    }
    for line in &progress {
      self.host.log(line);
    }

    tracing::debug!(
      "inlined {} dependencies into {} documents",
      report.dependencies,
      report.documents_rewritten
    );
    Ok(report)
  }

  fn extract_references(&self, documents: &DocumentMap) -> InlineResult<ReferenceIndex> {
    let mut index = ReferenceIndex::default();
    for (document, content) in documents {
      let references = self.host.tag_list(MARKER_NAME, content)?;
      index.insert(document.clone(), references);
    }
    Ok(index)
  }
}
