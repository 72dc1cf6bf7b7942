//! Book: the catalogue record, and the `Keyed` trait the index orders by.

use core::fmt;

use heapless::String;
use serde::Serialize;

use crate::config::{
    AUTHOR_CAPACITY, GENRE_CAPACITY, IMAGE_CAPACITY, LINK_CAPACITY, TITLE_CAPACITY,
};
use crate::index::{Entry, Position};

/// A record that exposes a totally ordered key.
///
/// The index inspects nothing but the key; everything else in the record is
/// opaque payload. `Ord` is required so that every pair of keys compares, which
/// is what keeps the binary-search property well defined.
pub trait Keyed {
    /// The ordering key type.
    type Key: Ord + ?Sized;

    /// Borrow the key this record is ordered by.
    fn key(&self) -> &Self::Key;
}

impl Keyed for alloc::string::String {
    type Key = str;

    fn key(&self) -> &str {
        self.as_str()
    }
}

impl Keyed for &str {
    type Key = str;

    fn key(&self) -> &str {
        self
    }
}

/// Names a [`Book`] field, for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// Book title (the ordering key)
    Title,
    /// Author name
    Author,
    /// Genre label
    Genre,
    /// Cover image reference
    Image,
    /// Download link
    Link,
}

impl Field {
    /// Field name as it appears in the catalogue JSON.
    pub const fn as_str(self) -> &'static str {
        match self {
            Field::Title => "name",
            Field::Author => "author",
            Field::Genre => "genre",
            Field::Image => "image",
            Field::Link => "link",
        }
    }

    /// Capacity in UTF-8 bytes.
    pub const fn capacity(self) -> usize {
        match self {
            Field::Title => TITLE_CAPACITY,
            Field::Author => AUTHOR_CAPACITY,
            Field::Genre => GENRE_CAPACITY,
            Field::Image => IMAGE_CAPACITY,
            Field::Link => LINK_CAPACITY,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error building a [`Book`] from raw strings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    /// A field does not fit its fixed capacity.
    #[error("field `{field}` is {len} bytes, capacity is {capacity}")]
    TooLong {
        /// Offending field.
        field: Field,
        /// Actual length in bytes.
        len: usize,
        /// Capacity in bytes.
        capacity: usize,
    },
}

/// A single catalogue entry.
///
/// Immutable once built. The title is the ordering key; the index never looks
/// at the other fields. Serialises with the catalogue's JSON field names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Book {
    /// Display title (up to 512 UTF-8 bytes)
    #[serde(rename = "name")]
    pub title: String<TITLE_CAPACITY>,
    /// Author name (up to 256 UTF-8 bytes)
    pub author: String<AUTHOR_CAPACITY>,
    /// Genre label (up to 128 UTF-8 bytes)
    pub genre: String<GENRE_CAPACITY>,
    /// Cover image reference (up to 1024 bytes)
    pub image: String<IMAGE_CAPACITY>,
    /// Download link (up to 1024 bytes)
    pub link: String<LINK_CAPACITY>,
}

impl Book {
    /// Build a `Book`, rejecting any field that exceeds its capacity.
    ///
    /// Title emptiness is not checked here; the loader owns that policy.
    pub fn try_new(
        title: &str,
        author: &str,
        genre: &str,
        image: &str,
        link: &str,
    ) -> Result<Self, RecordError> {
        Ok(Book {
            title: fit(Field::Title, title)?,
            author: fit(Field::Author, author)?,
            genre: fit(Field::Genre, genre)?,
            image: fit(Field::Image, image)?,
            link: fit(Field::Link, link)?,
        })
    }

    /// A `Book` with only the title set.
    pub fn titled(title: &str) -> Result<Self, RecordError> {
        Book::try_new(title, "", "", "", "")
    }
}

impl Keyed for Book {
    type Key = str;

    fn key(&self) -> &str {
        self.title.as_str()
    }
}

fn fit<const N: usize>(field: Field, value: &str) -> Result<String<N>, RecordError> {
    String::try_from(value).map_err(|_| RecordError::TooLong {
        field,
        len: value.len(),
        capacity: N,
    })
}

/// A book annotated with its index metadata, flattened for serialisation.
///
/// Serialises as the book's own fields plus `position` and `balance`.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Annotated<'a> {
    /// The stored record.
    #[serde(flatten)]
    pub book: &'a Book,
    /// Insertion-sequence number.
    pub position: Position,
    /// Balance factor at materialisation time.
    pub balance: i8,
}

impl<'a> From<Entry<'a, Book>> for Annotated<'a> {
    fn from(entry: Entry<'a, Book>) -> Self {
        Annotated {
            book: entry.record,
            position: entry.position,
            balance: entry.balance,
        }
    }
}
