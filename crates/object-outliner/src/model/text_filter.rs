//! Free-text search over per-object searchable strings.
//!
//! Query syntax:
//!
//! - whitespace separates terms, and every term must match (token-AND)
//! - `"quoted phrase"` is a single term that may contain spaces
//! - a term prefixed with `-` must not match
//!
//! A term matches when it is a case-insensitive substring of any of the
//! object's searchable strings.
//!
//! ```
//! use object_outliner::model::TextQuery;
//!
//! let query = TextQuery::parse("actor -\"static mesh\"");
//! assert!(query.matches(["Actor", "BP_Door"]));
//! assert!(!query.matches(["StaticMeshActor", "Static Mesh Actor"]));
//! ```

use std::sync::Arc;

use object_outliner_core::logging::targets;
use object_outliner_core::{ObjectRef, Signal};
use parking_lot::RwLock;

/// Produces the searchable strings of an object, appending them to the buffer.
pub type StringifyFn = Arc<dyn Fn(ObjectRef<'_>, &mut Vec<String>) + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Term {
    /// Lowercased needle.
    needle: String,
    negated: bool,
}

/// A parsed search query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextQuery {
    terms: Vec<Term>,
}

impl TextQuery {
    /// Parses raw search text.
    pub fn parse(text: &str) -> Self {
        let mut terms = Vec::new();
        let mut chars = text.chars().peekable();

        loop {
            while chars.next_if(|c| c.is_whitespace()).is_some() {}
            if chars.peek().is_none() {
                break;
            }

            let negated = chars.next_if_eq(&'-').is_some();
            let mut needle = String::new();
            if chars.next_if_eq(&'"').is_some() {
                for c in chars.by_ref() {
                    if c == '"' {
                        break;
                    }
                    needle.push(c);
                }
            } else {
                while let Some(c) = chars.next_if(|c| !c.is_whitespace()) {
                    needle.push(c);
                }
            }

            // A lone "-" or empty quotes carries no constraint.
            if !needle.is_empty() {
                terms.push(Term {
                    needle: needle.to_lowercase(),
                    negated,
                });
            }
        }

        Self { terms }
    }

    /// Returns `true` if the query has no terms.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Number of parsed terms.
    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    /// Tests a list of searchable strings.
    pub fn matches<I, S>(&self, strings: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if self.terms.is_empty() {
            return true;
        }

        let haystacks: Vec<String> = strings
            .into_iter()
            .map(|s| s.as_ref().to_lowercase())
            .collect();

        self.terms.iter().all(|term| {
            let found = haystacks.iter().any(|h| h.contains(&term.needle));
            found != term.negated
        })
    }
}

/// Search box state: raw text, its parsed query and a stringify function.
pub struct TextFilter {
    raw_text: RwLock<String>,
    query: RwLock<TextQuery>,
    stringify: StringifyFn,
    /// Emitted with the new raw text whenever it changes.
    changed: Signal<String>,
}

impl TextFilter {
    /// Creates an empty filter using `stringify` to collect searchable strings.
    pub fn new<F>(stringify: F) -> Self
    where
        F: Fn(ObjectRef<'_>, &mut Vec<String>) + Send + Sync + 'static,
    {
        Self {
            raw_text: RwLock::new(String::new()),
            query: RwLock::new(TextQuery::default()),
            stringify: Arc::new(stringify),
            changed: Signal::new(),
        }
    }

    /// Filter over the outliner's searchable strings: class name, then object name.
    pub fn for_outliner() -> Self {
        Self::new(|object, out| {
            out.push(object.class_name().to_string());
            out.push(object.name().to_string());
        })
    }

    /// The signal emitted when the raw text changes.
    pub fn changed(&self) -> &Signal<String> {
        &self.changed
    }

    /// The text as typed, for highlighting.
    pub fn raw_text(&self) -> String {
        self.raw_text.read().clone()
    }

    /// Replaces the search text. Returns `true` if it changed.
    pub fn set_raw_text(&self, text: impl Into<String>) -> bool {
        let text = text.into();
        {
            let mut raw = self.raw_text.write();
            if *raw == text {
                return false;
            }
            *self.query.write() = TextQuery::parse(&text);
            raw.clone_from(&text);
        }
        tracing::debug!(target: targets::FILTER, text = %text, "search text changed");
        self.changed.emit(text);
        true
    }

    /// Returns `true` if the query constrains anything.
    pub fn is_active(&self) -> bool {
        !self.query.read().is_empty()
    }

    /// Tests an object.
    ///
    /// An inactive filter passes everything; an active one rejects a missing object.
    pub fn passes(&self, object: Option<ObjectRef<'_>>) -> bool {
        let query = self.query.read();
        if query.is_empty() {
            return true;
        }
        let Some(object) = object else {
            return false;
        };

        let mut strings = Vec::new();
        (self.stringify)(object, &mut strings);
        query.matches(&strings)
    }
}

impl Default for TextFilter {
    fn default() -> Self {
        Self::for_outliner()
    }
}

static_assertions::assert_impl_all!(TextFilter: Send, Sync);
