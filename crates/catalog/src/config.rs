//! Catalogue configuration and constants
//!
//! Central values shared by the index, the loader and the layout code.
//! Nothing here is read at runtime from the environment; the CLI layers its
//! own arguments on top of these defaults.

/// The application name
pub const APP_NAME: &str = "Bookshelf";

/// Where the batch loader looks for the catalogue when no path is given.
pub const DEFAULT_BOOKS_PATH: &str = "data/books.json";

// ---------------------------------------------------------------------------
// Record field capacities (UTF-8 bytes)
// ---------------------------------------------------------------------------
// Catalogue text is often Cyrillic, two bytes per character.

/// Title capacity. The title is also the ordering key.
pub const TITLE_CAPACITY: usize = 512;
/// Author name capacity.
pub const AUTHOR_CAPACITY: usize = 256;
/// Genre label capacity.
pub const GENRE_CAPACITY: usize = 128;
/// Cover image reference capacity.
pub const IMAGE_CAPACITY: usize = 1024;
/// Download link capacity.
pub const LINK_CAPACITY: usize = 1024;

// ---------------------------------------------------------------------------
// Tree layout
// ---------------------------------------------------------------------------

/// Horizontal offset between the root and its children.
pub const LAYOUT_DX: f32 = 800.0;
/// Vertical distance between tree levels.
pub const LAYOUT_DY: f32 = 1000.0;
/// Horizontal coordinate of the root node.
pub const LAYOUT_ORIGIN_X: f32 = 0.0;
/// Vertical coordinate of the root node.
pub const LAYOUT_ORIGIN_Y: f32 = 20.0;
/// Each level's horizontal offset is the parent's divided by this factor.
pub const LAYOUT_SPREAD: f32 = 1.5;

// ---------------------------------------------------------------------------
// Viewport zoom
// ---------------------------------------------------------------------------

/// Scale the diagram opens at.
pub const ZOOM_INITIAL: f32 = 0.75;
/// Scale change per wheel notch.
pub const ZOOM_STEP: f32 = 0.1;
/// Smallest allowed scale.
pub const ZOOM_MIN: f32 = 0.5;
/// Largest allowed scale.
pub const ZOOM_MAX: f32 = 2.0;

// ---------------------------------------------------------------------------
// Index limits
// ---------------------------------------------------------------------------

/// Tallest tree the index can reach.
///
/// Positions are `u32`, so the index holds at most `u32::MAX` nodes. The
/// sparsest AVL tree of height `h` has `F(h + 2) - 1` nodes (Fibonacci), and
/// `F(48) - 1` already exceeds `u32::MAX`, so height 46 is unreachable.
pub const MAX_HEIGHT: u8 = 45;
