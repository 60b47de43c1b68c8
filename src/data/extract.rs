//! Mention extraction from raw text records

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static MENTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@([A-Za-z0-9_]+)").unwrap_or_else(|_| panic!("Invalid Regex")));

/// One input row: an author and the text they posted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// User id of the author
    pub author: String,

    /// Free text; `None` when the cell was null
    pub text: Option<String>,
}

impl Record {
    pub fn new(author: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            text: Some(text.into()),
        }
    }

    /// A record whose text cell was missing
    pub fn without_text(author: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            text: None,
        }
    }
}

/// A single directed reference from an author to a mentioned handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Mention<'a> {
    pub author: &'a str,
    pub handle: &'a str,
}

/// Lazily yield one `Mention` per `@handle` occurrence across `records`.
///
/// Repeated handles inside the same text each produce a mention. Records
/// without text contribute nothing.
pub fn extract_mentions(records: &[Record]) -> impl Iterator<Item = Mention<'_>> + '_ {
    records.iter().flat_map(|record| {
        let author = record.author.as_str();
        record
            .text
            .as_deref()
            .into_iter()
            .flat_map(move |text| mentions_in(author, text))
    })
}

/// Mentions found in a single piece of text
pub fn mentions_in<'a>(author: &'a str, text: &'a str) -> impl Iterator<Item = Mention<'a>> + 'a {
    MENTION_RE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(move |m| Mention {
            author,
            handle: m.as_str(),
        })
}
