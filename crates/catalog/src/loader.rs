//! Loader: reads the catalogue batch from JSON and validates it at the boundary.
//!
//! The file is a JSON array of `{ name, author, genre, image, link }` objects,
//! `name` being the title. Records are returned in file order; that order
//! decides tree shape and positions, never the sorted view.
//!
//! A record with an empty (or whitespace-only) title is rejected here rather
//! than handed to the index, since it has no meaningful place in the ordering.

use std::path::Path;

use serde::Deserialize;

use crate::index::{BookIndex, IndexError};
use crate::record::{Book, Field, RecordError};

/// Error type for catalogue loading.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The catalogue file could not be read.
    #[error("cannot read catalogue: {0}")]
    Io(#[from] std::io::Error),
    /// The content is not a JSON array of book objects.
    #[error("malformed catalogue JSON: {0}")]
    Parse(#[from] serde_json::Error),
    /// Record `index` has an empty title.
    #[error("record {index}: missing title")]
    MissingTitle {
        /// Zero-based record number in the file.
        index: usize,
    },
    /// Record `index` has a field longer than its capacity.
    #[error("record {index}: field `{field}` exceeds {capacity} bytes")]
    FieldTooLong {
        /// Zero-based record number in the file.
        index: usize,
        /// Offending field.
        field: Field,
        /// Capacity in bytes.
        capacity: usize,
    },
    /// The index refused a record.
    #[error(transparent)]
    Index(#[from] IndexError),
}

#[derive(Deserialize)]
struct RawBook {
    name: String,
    author: String,
    genre: String,
    image: String,
    link: String,
}

impl RawBook {
    fn validate(self, index: usize) -> Result<Book, LoadError> {
        if self.name.trim().is_empty() {
            return Err(LoadError::MissingTitle { index });
        }
        Book::try_new(&self.name, &self.author, &self.genre, &self.image, &self.link).map_err(
            |e| match e {
                RecordError::TooLong {
                    field, capacity, ..
                } => LoadError::FieldTooLong {
                    index,
                    field,
                    capacity,
                },
            },
        )
    }
}

/// Decode and validate a catalogue from JSON text.
pub fn parse_books(json: &str) -> Result<Vec<Book>, LoadError> {
    let raw: Vec<RawBook> = serde_json::from_str(json)?;
    let books = raw
        .into_iter()
        .enumerate()
        .map(|(i, r)| r.validate(i))
        .collect::<Result<Vec<_>, _>>()?;
    tracing::debug!(count = books.len(), "catalogue parsed");
    Ok(books)
}

/// Read, decode and validate the catalogue at `path`.
pub fn load_books(path: impl AsRef<Path>) -> Result<Vec<Book>, LoadError> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path)?;
    tracing::debug!(path = %path.display(), bytes = json.len(), "catalogue read");
    parse_books(&json)
}

/// Read the catalogue at `path` and insert every record in file order.
pub fn load_index(path: impl AsRef<Path>) -> Result<BookIndex, LoadError> {
    let books = load_books(path)?;
    Ok(BookIndex::from_records(books)?)
}
