// Desktop tooling crate: unwrap/expect/panic acceptable in non-library code.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod genres;
mod list;
mod search;
mod tree;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use catalog::{config, BookIndex};
use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "catalog")]
#[command(about = "Book catalogue backed by an AVL title index", long_about = None)]
#[command(version)]
struct Cli {
    /// Catalogue file: JSON array of {name, author, genre, image, link}
    #[arg(long, global = true, env = "CATALOG_BOOKS", default_value = config::DEFAULT_BOOKS_PATH)]
    books: PathBuf,
    /// Log more (-v debug, -vv trace). Without it RUST_LOG applies, default warn.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every book in title order with its position and balance
    List {
        /// Print the annotated list as JSON
        #[arg(long)]
        json: bool,
    },
    /// Narrow the list by genre (exact), title or author (substring, any case)
    Search {
        #[arg(long)]
        genre: Option<String>,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        author: Option<String>,
        /// Print the annotated list as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the distinct genres
    Genres,
    /// Print the tree shape and its diagram coordinates
    Tree {
        /// Horizontal offset from the root to its children
        #[arg(long, default_value_t = config::LAYOUT_DX)]
        dx: f32,
        /// Vertical distance between levels
        #[arg(long, default_value_t = config::LAYOUT_DY)]
        dy: f32,
        /// Print the shape only, without node coordinates and edges
        #[arg(long)]
        shape_only: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let index = open(&cli.books)?;

    match cli.command {
        Commands::List { json } => list::run(&index, json),
        Commands::Search {
            genre,
            title,
            author,
            json,
        } => search::run(
            &index,
            genre.as_deref(),
            title.as_deref(),
            author.as_deref(),
            json,
        ),
        Commands::Genres => genres::run(&index),
        Commands::Tree { dx, dy, shape_only } => tree::run(&index, dx, dy, shape_only),
    }
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Load the catalogue at `path` and build the index in file order.
fn open(path: &Path) -> Result<BookIndex> {
    let index = catalog::load_index(path)
        .with_context(|| format!("Failed to load catalogue from {}", path.display()))?;
    tracing::info!(books = index.len(), height = index.height(), "catalogue loaded");
    Ok(index)
}
