//! Data structures produced while inlining assets into a document set.

use std::collections::{BTreeMap, BTreeSet};

/// Keyed collection of documents: document path mapped to its text content.
///
/// The transform borrows the collection mutably for the duration of one run and rewrites
/// entries in place by key.
pub type DocumentMap = BTreeMap<String, String>;

/// Marker references discovered in each document, keyed by document path.
///
/// Each list keeps the order in which the tag extractor reported the references, repeats
/// included, since substitution walks the list in that order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceIndex {
  references: BTreeMap<String, Vec<String>>,
}

impl ReferenceIndex {
  /// Record the references found in a single document.
  pub fn insert(&mut self, document: impl Into<String>, references: Vec<String>) {
    self.references.insert(document.into(), references);
  }

  /// References recorded for a document, if it was visited.
  pub fn get(&self, document: &str) -> Option<&[String]> {
    self.references.get(document).map(Vec::as_slice)
  }

  /// Iterate documents together with their ordered reference lists.
  pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
    self
      .references
      .iter()
      .map(|(document, references)| (document.as_str(), references.as_slice()))
  }

  /// Distinct asset names referenced anywhere in the document set.
  pub fn unique_names(&self) -> BTreeSet<String> {
    self.references.values().flatten().cloned().collect()
  }

  /// Total number of references across all documents, repeats included.
  pub fn total_references(&self) -> usize {
    self.references.values().map(Vec::len).sum()
  }

  /// Number of visited documents.
  pub fn len(&self) -> usize {
    self.references.len()
  }

  /// Returns `true` when no document was visited.
  pub fn is_empty(&self) -> bool {
    self.references.is_empty()
  }
}

/// Resolved content for every distinct asset referenced by the document set.
///
/// Holds exactly one entry per asset name regardless of how often it is referenced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencySet {
  contents: BTreeMap<String, String>,
}

impl DependencySet {
  /// Resolved content for an asset name.
  pub fn get(&self, name: &str) -> Option<&str> {
    self.contents.get(name).map(String::as_str)
  }

  /// Number of resolved assets.
  pub fn len(&self) -> usize {
    self.contents.len()
  }

  /// Returns `true` when nothing was resolved.
  pub fn is_empty(&self) -> bool {
    self.contents.is_empty()
  }
}

impl FromIterator<(String, String)> for DependencySet {
  fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
    Self {
      contents: iter.into_iter().collect(),
    }
  }
}

/// Summary of a completed inlining run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InlineReport {
  /// Documents whose content was committed back to the collection.
  pub documents_rewritten: usize,
  /// References processed across all documents, repeats included.
  pub substitutions: usize,
  /// Distinct assets resolved.
  pub dependencies: usize,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn unique_names_deduplicate_across_documents() {
    let mut index = ReferenceIndex::default();
    index.insert("a.html", vec!["icon".into(), "logo".into(), "icon".into()]);
    index.insert("b.html", vec!["icon".into()]);
    index.insert("c.html", Vec::new());

    let names: Vec<String> = index.unique_names().into_iter().collect();
    assert_eq!(names, vec!["icon".to_string(), "logo".to_string()]);
    assert_eq!(index.total_references(), 4);
    assert_eq!(index.len(), 3);
  }

  #[test]
  fn keeps_reference_order_per_document() {
    let mut index = ReferenceIndex::default();
    index.insert("page.html", vec!["b".into(), "a".into(), "b".into()]);

    assert_eq!(
      index.get("page.html").unwrap(),
      &["b".to_string(), "a".to_string(), "b".to_string()]
    );
    assert!(index.get("missing.html").is_none());
  }

  #[test]
  fn dependency_set_collects_pairs() {
    let deps: DependencySet = vec![("icon".to_string(), "<svg/>".to_string())]
      .into_iter()
      .collect();

    assert_eq!(deps.get("icon"), Some("<svg/>"));
    assert_eq!(deps.len(), 1);
    assert!(deps.get("logo").is_none());
  }
}
