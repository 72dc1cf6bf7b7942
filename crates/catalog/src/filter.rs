//! BookFilter: narrows the sorted view by genre, title and author.
//!
//! Genre is an exact, case-sensitive match (it comes from a fixed selector).
//! Title and author are case-insensitive substring searches. An empty
//! criterion is no criterion. Filtering never touches the index; it only
//! reads [`AvlIndex::materialize`], so results stay in ascending title order
//! and keep their position and balance annotations.

use alloc::string::String;
use alloc::vec::Vec;

use crate::index::{BookIndex, Entry};
use crate::record::Book;

/// Conjunction of optional genre / title / author criteria.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookFilter {
    genre: Option<String>,
    title: Option<String>,
    author: Option<String>,
}

impl BookFilter {
    /// A filter that accepts every book.
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep only books whose genre equals `genre` exactly.
    #[must_use]
    pub fn genre(mut self, genre: &str) -> Self {
        self.genre = non_empty(genre).map(String::from);
        self
    }

    /// Keep only books whose title contains `needle`, ignoring case.
    #[must_use]
    pub fn title(mut self, needle: &str) -> Self {
        self.title = non_empty(needle).map(str::to_lowercase);
        self
    }

    /// Keep only books whose author contains `needle`, ignoring case.
    #[must_use]
    pub fn author(mut self, needle: &str) -> Self {
        self.author = non_empty(needle).map(str::to_lowercase);
        self
    }

    /// Returns `true` when no criterion is set.
    pub fn is_empty(&self) -> bool {
        self.genre.is_none() && self.title.is_none() && self.author.is_none()
    }

    /// Returns `true` when `book` satisfies every active criterion.
    pub fn matches(&self, book: &Book) -> bool {
        if let Some(genre) = &self.genre {
            if book.genre.as_str() != genre.as_str() {
                return false;
            }
        }
        if let Some(needle) = &self.title {
            if !contains_ignore_case(book.title.as_str(), needle) {
                return false;
            }
        }
        if let Some(needle) = &self.author {
            if !contains_ignore_case(book.author.as_str(), needle) {
                return false;
            }
        }
        true
    }

    /// Materialise `index` and keep the entries that match.
    ///
    /// The entries borrow only the index, so they may outlive the filter.
    pub fn apply<'f, 'i: 'f>(
        &'f self,
        index: &'i BookIndex,
    ) -> impl Iterator<Item = Entry<'i, Book>> + 'f {
        index.materialize().filter(move |e| self.matches(e.record))
    }
}

/// Distinct genres in the order they first appear in the sorted view.
pub fn genres(index: &BookIndex) -> Vec<&str> {
    let mut seen: Vec<&str> = Vec::new();
    for entry in index.materialize() {
        let genre = entry.record.genre.as_str();
        if !genre.is_empty() && !seen.contains(&genre) {
            seen.push(genre);
        }
    }
    seen
}

fn non_empty(s: &str) -> Option<&str> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

/// `needle` must already be lowercase.
fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}
