//! Document generation module
//!
//! - `markdown`: Lay out the combined Markdown document

mod markdown;

pub use markdown::{
    derive_title, language_hint, CombinedDocument, MarkdownGenerator, TIMESTAMP_FORMAT,
    TITLE_PREFIX,
};
