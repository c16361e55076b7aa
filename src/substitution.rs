//! Replacement of marker occurrences with resolved asset content.

use regex::{NoExpand, Regex};

use crate::error::{InlineError, InlineResult};
use crate::host::InlineHost;
use crate::models::DependencySet;

/// Rewrite `content` by replacing every marker for each reference with its resolved content.
///
/// References are applied in order and each replacement sees the output of the previous one.
/// Every occurrence of a reference's pattern is replaced; a pattern without matches is a
/// no-op. Inserted content is never re-scanned for markers. `report` is invoked with the
/// asset name and `document` after each reference is applied.
///
/// Returns `None` when `references` is empty, leaving the document untouched.
pub fn substitute<H, F>(
  host: &H,
  marker: &str,
  document: &str,
  content: &str,
  references: &[String],
  dependencies: &DependencySet,
  mut report: F,
) -> InlineResult<Option<String>>
where
  H: InlineHost,
  F: FnMut(&str, &str),
{
  if references.is_empty() {
    return Ok(None);
  }

  let mut current = content.to_string();
  for reference in references {
    let replacement = dependencies
      .get(reference)
      .ok_or_else(|| InlineError::Unresolved {
        name: reference.clone(),
      })?;

    let pattern = host.tag_pattern(marker, reference)?;
    let pattern = Regex::new(&pattern).map_err(|source| InlineError::InvalidPattern {
      name: reference.clone(),
      source,
    })?;

    current = pattern
      .replace_all(&current, NoExpand(replacement))
      .into_owned();

    report(reference, document);
  }

  Ok(Some(current))
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::path::PathBuf;

  struct LiteralHost;

  impl InlineHost for LiteralHost {
    fn log(&self, _message: &str) {}

    async fn find_asset(&self, _name: &str, _search_dirs: &[PathBuf]) -> anyhow::Result<Option<PathBuf>> {
      Ok(None)
    }

    fn tag_pattern(&self, marker: &str, reference: &str) -> anyhow::Result<String> {
      Ok(regex::escape(&format!("[{marker}:{reference}]")))
    }

    fn tag_list(&self, _marker: &str, _content: &str) -> anyhow::Result<Vec<String>> {
      Ok(Vec::new())
    }
  }

  fn deps(entries: &[(&str, &str)]) -> DependencySet {
    entries
      .iter()
      .map(|(name, content)| (name.to_string(), content.to_string()))
      .collect()
  }

  fn refs(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
  }

  #[test]
  fn replaces_every_occurrence_in_reference_order() {
    let dependencies = deps(&[("a", "<svg>A</svg>"), ("b", "<svg>B</svg>")]);
    let mut reported = Vec::new();

    let rewritten = substitute(
      &LiteralHost,
      "m",
      "page.html",
      "1[m:a] 2[m:b] 3[m:a]",
      &refs(&["a", "b", "a"]),
      &dependencies,
      |name, document| reported.push(format!("{name}@{document}")),
    )
    .unwrap();

    assert_eq!(
      rewritten.as_deref(),
      Some("1<svg>A</svg> 2<svg>B</svg> 3<svg>A</svg>")
    );
    assert_eq!(reported, vec!["a@page.html", "b@page.html", "a@page.html"]);
  }

  #[test]
  fn empty_reference_list_is_a_noop() {
    let mut calls = 0;
    let rewritten = substitute(
      &LiteralHost,
      "m",
      "page.html",
      "[m:a]",
      &[],
      &DependencySet::default(),
      |_, _| calls += 1,
    )
    .unwrap();

    assert!(rewritten.is_none());
    assert_eq!(calls, 0);
  }

  #[test]
  fn inserted_content_is_not_rescanned() {
    let dependencies = deps(&[("a", "[m:b]"), ("b", "<svg>B</svg>")]);

    let rewritten = substitute(
      &LiteralHost,
      "m",
      "page.html",
      "[m:b][m:a]",
      &refs(&["b", "a"]),
      &dependencies,
      |_, _| {},
    )
    .unwrap();

    assert_eq!(rewritten.as_deref(), Some("<svg>B</svg>[m:b]"));
  }

  #[test]
  fn replacement_text_is_inserted_literally() {
    let dependencies = deps(&[("a", "<text>$1 ${name} $$</text>")]);

    let rewritten = substitute(
      &LiteralHost,
      "m",
      "page.html",
      "<p>[m:a]</p>",
      &refs(&["a"]),
      &dependencies,
      |_, _| {},
    )
    .unwrap();

    assert_eq!(rewritten.as_deref(), Some("<p><text>$1 ${name} $$</text></p>"));
  }

  #[test]
  fn unmatched_pattern_still_reports() {
    let dependencies = deps(&[("a", "<svg/>")]);
    let mut calls = 0;

    let rewritten = substitute(
      &LiteralHost,
      "m",
      "page.html",
      "no markers here",
      &refs(&["a"]),
      &dependencies,
      |_, _| calls += 1,
    )
    .unwrap();

    assert_eq!(rewritten.as_deref(), Some("no markers here"));
    assert_eq!(calls, 1);
  }

  #[test]
  fn unresolved_reference_is_an_error() {
    let error = substitute(
      &LiteralHost,
      "m",
      "page.html",
      "[m:a]",
      &refs(&["a"]),
      &DependencySet::default(),
      |_, _| {},
    )
    .unwrap_err();

    assert!(matches!(error, InlineError::Unresolved { ref name } if name == "a"));
  }
}
