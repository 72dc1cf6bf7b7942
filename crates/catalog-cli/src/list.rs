//! catalog list: print the sorted, annotated view of the whole catalogue.

use anyhow::Result;
use catalog::{config, Annotated, Book, BookIndex, Entry};
use colored::Colorize;

pub fn run(index: &BookIndex, json: bool) -> Result<()> {
    let entries: Vec<Entry<'_, Book>> = index.materialize().collect();
    print_entries(&entries, json)
}

/// Print `entries` as a table, or as a JSON array of annotated books.
pub(crate) fn print_entries(entries: &[Entry<'_, Book>], json: bool) -> Result<()> {
    if json {
        let annotated: Vec<Annotated<'_>> = entries.iter().copied().map(Annotated::from).collect();
        println!("{}", serde_json::to_string_pretty(&annotated)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("{}", "No books found".yellow());
        return Ok(());
    }

    println!("{}", " pos  bal  title / author / genre".bold());
    for entry in entries {
        println!("{}", format_row(entry));
    }
    println!();
    println!("{}", footer(entries.len()).green());
    Ok(())
}

pub(crate) fn footer(count: usize) -> String {
    format!("{}: {count} books", config::APP_NAME)
}

pub(crate) fn format_row(entry: &Entry<'_, Book>) -> String {
    let book = entry.record;
    format!(
        "{:>4}  {:>3}  {} / {} / {}",
        entry.position.get(),
        entry.balance,
        book.title,
        book.author,
        book.genre,
    )
}
