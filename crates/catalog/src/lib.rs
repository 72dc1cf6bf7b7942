//! Book catalogue: AVL-balanced title index, filtering and tree layout.
//!
//! # Modules
//!
//! - [`record`]: `Book` record and the `Keyed` ordering trait
//! - [`index`]: `AvlIndex<R>` height-balanced ordered index
//! - [`filter`]: genre / title / author narrowing of the sorted view
//! - [`layout`]: diagram geometry for the tree shape (`std` only)
//! - [`loader`]: JSON batch loading with boundary validation (`std` only)
//! - [`config`]: named constants

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]
#![deny(clippy::expect_used)]

extern crate alloc;

pub mod config;
pub mod filter;
pub mod index;
#[cfg(feature = "std")]
pub mod layout;
#[cfg(feature = "std")]
pub mod loader;
pub mod record;

// Top-level re-exports for convenience
pub use filter::{genres, BookFilter};
pub use index::{AvlIndex, BookIndex, Entry, IndexError, Insertion, Materialize, NodeRef, Position};
#[cfg(feature = "std")]
pub use layout::{layout, Edge, LayoutConfig, PlacedNode, TreeLayout, Viewport};
#[cfg(feature = "std")]
pub use loader::{load_books, load_index, parse_books, LoadError};
pub use record::{Annotated, Book, Field, Keyed, RecordError};
