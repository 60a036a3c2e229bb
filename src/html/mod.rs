//! Server-side HTML rendering
//!
//! [`HtmlDocument`] is the shell every response page is wrapped in;
//! pages such as [`ErrorPage`] render into a [`Page`] that the shell embeds.

pub mod document;
pub mod error_page;
pub mod escape;
pub mod url;

pub use document::HtmlDocument;
pub use error_page::ErrorPage;
pub use escape::{escape_html, serialize_state};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Stylesheet and script URLs, keyed by entry name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assets {
    #[serde(default)]
    pub styles: BTreeMap<String, String>,
    #[serde(default)]
    pub javascript: BTreeMap<String, String>,
}

/// A rendered page: its `<title>` and its markup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub title: String,
    pub body: String,
}
