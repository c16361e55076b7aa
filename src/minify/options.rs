use serde::Deserialize;

/// Passes applied by [`super::SvgMinifier`]. Every pass is enabled by default.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SvgMinifyOptions {
  /// Collapse newlines and repeated spaces inside attribute values and trim them.
  pub cleanup_attrs: bool,
  /// Drop the default `xmlns` declaration, which is redundant for inline SVG.
  pub remove_xmlns: bool,
  /// Drop `width`/`height` on the root `<svg>` element when a `viewBox` is present.
  pub remove_dimensions: bool,
  /// Drop `<!DOCTYPE ...>` declarations.
  pub remove_doctype: bool,
  /// Drop `<?xml ...?>` processing instructions.
  pub remove_xml_proc_inst: bool,
  /// Drop comments, except ones starting with `<!--!`.
  pub remove_comments: bool,
  /// Drop `<metadata>` elements.
  pub remove_metadata: bool,
  /// Drop `<title>` elements.
  pub remove_title: bool,
  /// Drop `<desc>` elements.
  pub remove_desc: bool,
  /// Drop attributes with empty values.
  pub remove_empty_attrs: bool,
  /// Drop elements hidden through `display="none"`, `visibility="hidden"` or `opacity="0"`.
  pub remove_hidden_elems: bool,
  /// Drop `<text>` and `<tspan>` elements without content.
  pub remove_empty_text: bool,
  /// Drop container elements (`<g>`, `<defs>`, ...) without children.
  pub remove_empty_containers: bool,
  /// Remove whitespace between tags.
  pub collapse_whitespace: bool,
}

impl Default for SvgMinifyOptions {
  fn default() -> Self {
    Self {
      cleanup_attrs: true,
      remove_xmlns: true,
      remove_dimensions: true,
      remove_doctype: true,
      remove_xml_proc_inst: true,
      remove_comments: true,
      remove_metadata: true,
      remove_title: true,
      remove_desc: true,
      remove_empty_attrs: true,
      remove_hidden_elems: true,
      remove_empty_text: true,
      remove_empty_containers: true,
      collapse_whitespace: true,
    }
  }
}

impl SvgMinifyOptions {
  /// Options with every pass disabled.
  pub fn none() -> Self {
    Self {
      cleanup_attrs: false,
      remove_xmlns: false,
      remove_dimensions: false,
      remove_doctype: false,
      remove_xml_proc_inst: false,
      remove_comments: false,
      remove_metadata: false,
      remove_title: false,
      remove_desc: false,
      remove_empty_attrs: false,
      remove_hidden_elems: false,
      remove_empty_text: false,
      remove_empty_containers: false,
      collapse_whitespace: false,
    }
  }
}
