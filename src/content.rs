//! Content document parsing: the authored XML that drives the widget.
//!
//! Expected layout:
//!
//! ```xml
//! <submit_and_compare>
//!   <body>...prompt markup...</body>
//!   <explanation>...our answer...</explanation>
//!   <demandhint>
//!     <hint>...</hint>
//!   </demandhint>
//! </submit_and_compare>
//! ```
//!
//! Extraction is text-content extraction (tags stripped, inner text
//! concatenated), not HTML-safe serialization. Parsing is pure and safe to
//! re-run per render; a malformed document never yields partial content.

use roxmltree::{Document, Node};
use thiserror::Error;
use tracing::instrument;

/// Required root element of the content document.
pub const ROOT_TAG: &str = "submit_and_compare";

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("malformed content document: {0}")]
    Xml(#[from] roxmltree::Error),
    #[error("content document root must be <submit_and_compare>, found <{0}>")]
    WrongRoot(String),
    #[error("content document is missing required <{0}> node")]
    MissingNode(&'static str),
    #[error("content document has more than one <{0}> node")]
    DuplicateNode(&'static str),
}

/// Immutable per-version document: prompt, explanation, and demand hints.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContentDocument {
    pub prompt: String,
    pub explanation: String,
    pub hints: Vec<String>,
}

impl ContentDocument {
    /// Parse the authored XML. Missing or duplicated required nodes are
    /// errors; callers must not fall back to partial content.
    #[instrument(level = "debug", skip(raw), fields(raw_len = raw.len()))]
    pub fn parse(raw: &str) -> Result<Self, ParseError> {
        let doc = Document::parse(raw)?;
        let root = doc.root_element();
        if root.tag_name().name() != ROOT_TAG {
            return Err(ParseError::WrongRoot(root.tag_name().name().to_string()));
        }

        let prompt = text_of_single(root, "body")?;
        let explanation = text_of_single(root, "explanation")?;

        let hints = root
            .children()
            .filter(|n| n.has_tag_name("demandhint"))
            .flat_map(|container| {
                container
                    .children()
                    .filter(|n| n.has_tag_name("hint"))
                    .collect::<Vec<_>>()
            })
            .map(text_content)
            .collect();

        Ok(Self {
            prompt,
            explanation,
            hints,
        })
    }

    /// Hints decorated with their 1-based ordinal and the total count, the
    /// way the frontend cycles through them on button click.
    pub fn decorated_hints(&self) -> Vec<String> {
        let total = self.hints.len();
        self.hints
            .iter()
            .enumerate()
            .map(|(i, hint)| format!("Hint ({} of {}): {}", i + 1, total, hint))
            .collect()
    }
}

/// Concatenated text of every text node under `node`, tags stripped.
fn text_content(node: Node<'_, '_>) -> String {
    node.descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect()
}

fn text_of_single<'a, 'i>(root: Node<'a, 'i>, tag: &'static str) -> Result<String, ParseError> {
    let mut matches = root.children().filter(|n| n.has_tag_name(tag));
    let node = matches.next().ok_or(ParseError::MissingNode(tag))?;
    if matches.next().is_some() {
        return Err(ParseError::DuplicateNode(tag));
    }
    Ok(text_content(node))
}
