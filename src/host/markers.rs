use regex::Regex;
use serde::Deserialize;

/// Delimiters surrounding a marker tag, e.g. `<!--` and `-->` for `<!-- inlineSVG: icon -->`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MarkerSyntax {
  /// Text opening a marker.
  pub open: String,
  /// Text closing a marker.
  pub close: String,
}

impl Default for MarkerSyntax {
  fn default() -> Self {
    Self {
      open: "<!--".into(),
      close: "-->".into(),
    }
  }
}

impl MarkerSyntax {
  /// Pattern matching any `marker` tag and capturing the referenced asset as `name`.
  pub fn list_pattern(&self, marker: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!(
      r"{}\s*{}\s*:\s*(?P<name>[^\s<>]+?)\s*{}",
      regex::escape(&self.open),
      regex::escape(marker),
      regex::escape(&self.close)
    ))
  }

  /// Pattern source matching every `marker` tag that references `reference`.
  pub fn reference_pattern(&self, marker: &str, reference: &str) -> String {
    format!(
      r"{}\s*{}\s*:\s*{}\s*{}",
      regex::escape(&self.open),
      regex::escape(marker),
      regex::escape(reference),
      regex::escape(&self.close)
    )
  }

  /// Asset references named by `marker` tags in `content`, in document order.
  pub fn extract(&self, marker: &str, content: &str) -> Result<Vec<String>, regex::Error> {
    let pattern = self.list_pattern(marker)?;
    Ok(
      pattern
        .captures_iter(content)
        .filter_map(|caps| caps.name("name"))
        .map(|name| name.as_str().to_string())
        .collect(),
    )
  }
}
