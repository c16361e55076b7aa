//! Pattern-based SVG minifier operating on raw markup.

use std::ops::Range;
use std::sync::OnceLock;

use regex::{Captures, Regex};

use super::{ContentMinifier, SvgMinifyOptions};

const CONTAINER_ELEMENTS: &[&str] = &["a", "defs", "g", "marker", "switch", "symbol"];
const TEXT_ELEMENTS: &[&str] = &["text", "tspan"];
const SPACE_PRESERVING_ELEMENTS: &[&str] = &["text", "tspan", "textPath"];

struct Patterns {
  proc_inst: Regex,
  doctype: Regex,
  comment: Regex,
  element_open: Regex,
  hidden_attr: Regex,
  tag: Regex,
  attribute: Regex,
  root_svg: Regex,
  empty_element: Regex,
  between_tags: Regex,
  preserve_space: Regex,
}

fn patterns() -> &'static Patterns {
  static PATTERNS: OnceLock<Patterns> = OnceLock::new();
  PATTERNS.get_or_init(|| Patterns {
    proc_inst: Regex::new(r"(?s)<\?xml\s.*?\?>").expect("invalid processing instruction regex"),
    doctype: Regex::new(r"(?is)<!DOCTYPE[^\[>]*(?:\[.*?\])?\s*>").expect("invalid doctype regex"),
    comment: Regex::new(r"(?s)<!--(?:[^!].*?)?-->").expect("invalid comment regex"),
    element_open: Regex::new(r"<(?P<name>[A-Za-z][\w:.-]*)(?:\s[^>]*|/)?>")
      .expect("invalid element regex"),
    hidden_attr: Regex::new(
      r#"\s(?:display\s*=\s*["']\s*none\s*["']|visibility\s*=\s*["']\s*hidden\s*["']|opacity\s*=\s*["']\s*0(?:\.0*)?\s*["'])"#,
    )
    .expect("invalid hidden attribute regex"),
    tag: Regex::new(r"<[A-Za-z][^>]*>").expect("invalid tag regex"),
    attribute: Regex::new(
      r#"(?P<lead>\s+)(?P<name>[A-Za-z_:][\w:.-]*)\s*=\s*(?:"(?P<dq>[^"]*)"|'(?P<sq>[^']*)')"#,
    )
    .expect("invalid attribute regex"),
    root_svg: Regex::new(r"<svg\b[^>]*>").expect("invalid root svg regex"),
    empty_element: Regex::new(
      r"<(?P<name>[A-Za-z][\w:.-]*)(?:\s[^>]*?)?(?:/>|>\s*</(?P<close>[A-Za-z][\w:.-]*)\s*>)",
    )
    .expect("invalid empty element regex"),
    between_tags: Regex::new(r">\s+<").expect("invalid whitespace regex"),
    preserve_space: Regex::new(r#"\sxml:space\s*=\s*["']preserve["']"#)
      .expect("invalid xml:space regex"),
  })
}

/// SVG minifier configured through an explicit [`SvgMinifyOptions`] value.
#[derive(Debug, Clone, Default)]
pub struct SvgMinifier {
  options: SvgMinifyOptions,
}

impl SvgMinifier {
  /// Create a minifier applying the passes enabled in `options`.
  pub fn new(options: SvgMinifyOptions) -> Self {
    Self { options }
  }

  /// Passes applied by this minifier.
  pub fn options(&self) -> &SvgMinifyOptions {
    &self.options
  }

  /// Minify SVG markup synchronously.
  pub fn minify_str(&self, content: &str) -> String {
    let patterns = patterns();
    let options = &self.options;
    let mut text = content.to_string();

    if options.remove_xml_proc_inst {
      text = patterns.proc_inst.replace_all(&text, "").into_owned();
    }
    if options.remove_doctype {
      text = patterns.doctype.replace_all(&text, "").into_owned();
    }
    if options.remove_comments {
      text = patterns.comment.replace_all(&text, "").into_owned();
    }

    if options.remove_metadata || options.remove_title || options.remove_desc {
      text = strip_elements(&text, &patterns.element_open, |name, _| match name {
        "metadata" => options.remove_metadata,
        "title" => options.remove_title,
        "desc" => options.remove_desc,
        _ => false,
      });
    }

    if options.remove_hidden_elems {
      text = strip_elements(&text, &patterns.element_open, |_, tag| {
        patterns.hidden_attr.is_match(tag)
      });
    }

    if options.cleanup_attrs || options.remove_xmlns || options.remove_empty_attrs {
      text = patterns
        .tag
        .replace_all(&text, |caps: &Captures| self.rewrite_attributes(&caps[0]))
        .into_owned();
    }

    if options.remove_dimensions {
      text = remove_root_dimensions(&text);
    }

    if options.remove_empty_text || options.remove_empty_containers {
      text = self.remove_empty_elements(text);
    }

    if options.collapse_whitespace {
      text = collapse_whitespace(&text).trim().to_string();
    }

    text
  }

  fn rewrite_attributes(&self, tag: &str) -> String {
    let options = &self.options;
    let is_svg_root = tag
      .strip_prefix("<svg")
      .is_some_and(|rest| rest.starts_with(|c: char| c.is_whitespace() || c == '>' || c == '/'));

    patterns()
      .attribute
      .replace_all(tag, |caps: &Captures| {
        let name = &caps["name"];
        if options.remove_xmlns && is_svg_root && name == "xmlns" {
          return String::new();
        }

        let (quote, raw) = match caps.name("dq") {
          Some(value) => ('"', value.as_str()),
          None => ('\'', caps.name("sq").map_or("", |value| value.as_str())),
        };
        let value = if options.cleanup_attrs {
          raw.split_whitespace().collect::<Vec<_>>().join(" ")
        } else {
          raw.to_string()
        };

        if options.remove_empty_attrs && value.is_empty() {
          return String::new();
        }

        let lead = if options.cleanup_attrs {
          " "
        } else {
          &caps["lead"]
        };
        format!("{lead}{name}={quote}{value}{quote}")
      })
      .into_owned()
  }

  fn remove_empty_elements(&self, mut text: String) -> String {
    let options = &self.options;
    let is_removable = |name: &str, tag: &str| {
      (options.remove_empty_containers
        && CONTAINER_ELEMENTS.contains(&name)
        && !tag.contains("filter="))
        || (options.remove_empty_text && TEXT_ELEMENTS.contains(&name))
    };

    // Removing an empty child can leave its parent empty, so repeat until stable.
    loop {
      let next = patterns()
        .empty_element
        .replace_all(&text, |caps: &Captures| {
          let name = &caps["name"];
          let closes_same = caps
            .name("close")
            .is_none_or(|close| close.as_str() == name);
          if closes_same && is_removable(name, &caps[0]) {
            String::new()
          } else {
            caps[0].to_string()
          }
        })
        .into_owned();

      if next == text {
        return next;
      }
      text = next;
    }
  }
}

impl ContentMinifier for SvgMinifier {
  async fn minify(&self, content: &str) -> anyhow::Result<String> {
    Ok(self.minify_str(content))
  }
}

/// Remove every element whose opening tag satisfies `remove`, including its children.
///
/// Elements without a matching closing tag are left in place.
fn strip_elements(text: &str, open: &Regex, remove: impl Fn(&str, &str) -> bool) -> String {
  let mut out = String::with_capacity(text.len());
  let mut cursor = 0;

  while let Some(caps) = open.captures_at(text, cursor) {
    let (Some(whole), Some(name)) = (caps.get(0), caps.name("name")) else {
      break;
    };

    if !remove(name.as_str(), whole.as_str()) {
      out.push_str(&text[cursor..whole.end()]);
      cursor = whole.end();
      continue;
    }

    let end = if whole.as_str().ends_with("/>") {
      Some(whole.end())
    } else {
      find_element_end(text, name.as_str(), whole.end())
    };

    match end {
      Some(end) => {
        out.push_str(&text[cursor..whole.start()]);
        cursor = end;
      }
      None => {
        out.push_str(&text[cursor..whole.end()]);
        cursor = whole.end();
      }
    }
  }

  out.push_str(&text[cursor..]);
  out
}

/// Remove whitespace between tags, except inside text content and `xml:space="preserve"`.
fn collapse_whitespace(text: &str) -> String {
  let patterns = patterns();
  let preserved = preserved_ranges(text);

  patterns
    .between_tags
    .replace_all(text, |caps: &Captures| {
      let Some(gap) = caps.get(0) else {
        return String::new();
      };
      let inside = preserved
        .iter()
        .any(|range| range.start <= gap.start() && gap.end() <= range.end);
      if inside {
        gap.as_str().to_string()
      } else {
        "><".to_string()
      }
    })
    .into_owned()
}

/// Byte ranges of elements whose whitespace is significant when rendered.
fn preserved_ranges(text: &str) -> Vec<Range<usize>> {
  let patterns = patterns();
  let mut ranges = Vec::new();
  let mut cursor = 0;

  while let Some(caps) = patterns.element_open.captures_at(text, cursor) {
    let (Some(whole), Some(name)) = (caps.get(0), caps.name("name")) else {
      break;
    };
    let preserves = SPACE_PRESERVING_ELEMENTS.contains(&name.as_str())
      || patterns.preserve_space.is_match(whole.as_str());

    if !preserves || whole.as_str().ends_with("/>") {
      cursor = whole.end();
      continue;
    }

    let end = find_element_end(text, name.as_str(), whole.end()).unwrap_or(text.len());
    ranges.push(whole.start()..end);
    cursor = end;
  }

  ranges
}

/// Byte offset just past the closing tag balancing an element opened before `from`.
fn find_element_end(text: &str, name: &str, from: usize) -> Option<usize> {
  let open = format!("<{name}");
  let close = format!("</{name}");
  let mut depth = 1usize;
  let mut cursor = from;

  while depth > 0 {
    let rest = &text[cursor..];
    let close_at = rest.find(&close)?;

    match rest[..close_at].find(&open) {
      Some(offset) => {
        let start = cursor + offset;
        let tag_end = start + text[start..].find('>')? + 1;
        if is_name_boundary(text, start + open.len()) && !text[..tag_end].ends_with("/>") {
          depth += 1;
        }
        cursor = tag_end;
      }
      None => {
        let start = cursor + close_at;
        let tag_end = start + text[start..].find('>')? + 1;
        if is_name_boundary(text, start + close.len()) {
          depth -= 1;
        }
        cursor = tag_end;
      }
    }
  }

  Some(cursor)
}

fn is_name_boundary(text: &str, at: usize) -> bool {
  text[at..]
    .chars()
    .next()
    .is_none_or(|c| c.is_whitespace() || c == '>' || c == '/')
}

/// Drop `width`/`height` from the root `<svg>` tag, deriving a `viewBox` when none exists.
fn remove_root_dimensions(text: &str) -> String {
  let patterns = patterns();
  let Some(root) = patterns.root_svg.find(text) else {
    return text.to_string();
  };
  let tag = root.as_str();

  let mut width = None;
  let mut height = None;
  let mut has_view_box = false;
  for caps in patterns.attribute.captures_iter(tag) {
    let value = caps
      .name("dq")
      .or_else(|| caps.name("sq"))
      .map_or("", |value| value.as_str());
    match &caps["name"] {
      "width" => width = plain_length(value),
      "height" => height = plain_length(value),
      "viewBox" => has_view_box = true,
      _ => {}
    }
  }

  let view_box = if has_view_box {
    None
  } else {
    match (width, height) {
      (Some(width), Some(height)) => Some(format!(" viewBox=\"0 0 {width} {height}\"")),
      _ => return text.to_string(),
    }
  };

  let mut rewritten = patterns
    .attribute
    .replace_all(tag, |caps: &Captures| match &caps["name"] {
      "width" | "height" => String::new(),
      _ => caps[0].to_string(),
    })
    .into_owned();

  if let Some(view_box) = view_box {
    let insert_at = if rewritten.ends_with("/>") {
      rewritten.len() - 2
    } else {
      rewritten.len() - 1
    };
    rewritten.insert_str(insert_at, &view_box);
  }

  format!("{}{}{}", &text[..root.start()], rewritten, &text[root.end()..])
}

/// Numeric length in user units, accepting an optional `px` suffix.
fn plain_length(value: &str) -> Option<String> {
  let value = value.trim();
  let number = value.strip_suffix("px").unwrap_or(value);
  number.parse::<f64>().ok().map(|_| number.to_string())
}
