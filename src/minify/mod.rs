//! Content minification applied to resolved assets before they are inlined.
//!
//! The minifier is an explicit value handed to the resolver rather than shared global state,
//! so each run decides which passes apply through [`SvgMinifyOptions`].

mod options;
mod svg;

pub use options::SvgMinifyOptions;
pub use svg::SvgMinifier;

/// Transform turning raw asset text into a smaller equivalent.
#[allow(async_fn_in_trait)]
pub trait ContentMinifier {
  /// Minify `content`, returning the text to inline.
  async fn minify(&self, content: &str) -> anyhow::Result<String>;
}

impl<M: ContentMinifier> ContentMinifier for &M {
  async fn minify(&self, content: &str) -> anyhow::Result<String> {
    (**self).minify(content).await
  }
}
