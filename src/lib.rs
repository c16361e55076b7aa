#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod builder;
pub mod cli;
pub mod config;
pub mod error;
pub mod host;
pub mod minify;
pub mod models;
pub mod resolver;
pub mod substitution;

pub use builder::InlineBuilder;
pub use config::{InlineConfig, InlineOptions};
pub use error::{InlineError, InlineResult};
pub use host::{FsHost, InlineHost, MARKER_NAME, MarkerSyntax};
pub use minify::{ContentMinifier, SvgMinifier, SvgMinifyOptions};
pub use models::{DependencySet, DocumentMap, InlineReport, ReferenceIndex};
