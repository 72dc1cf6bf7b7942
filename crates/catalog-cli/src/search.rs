//! catalog search: filter the sorted view by genre, title and author.

use anyhow::Result;
use catalog::{BookFilter, BookIndex};

use crate::list;

pub fn run(
    index: &BookIndex,
    genre: Option<&str>,
    title: Option<&str>,
    author: Option<&str>,
    json: bool,
) -> Result<()> {
    let filter = build_filter(genre, title, author);
    tracing::debug!(active = !filter.is_empty(), "filter built");
    let hits: Vec<_> = filter.apply(index).collect();
    list::print_entries(&hits, json)
}

fn build_filter(genre: Option<&str>, title: Option<&str>, author: Option<&str>) -> BookFilter {
    let mut filter = BookFilter::new();
    if let Some(g) = genre {
        filter = filter.genre(g);
    }
    if let Some(t) = title {
        filter = filter.title(t);
    }
    if let Some(a) = author {
        filter = filter.author(a);
    }
    filter
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog::Book;

    #[test]
    fn no_flags_means_no_filter() {
        assert!(build_filter(None, None, None).is_empty());
    }

    #[test]
    fn flags_combine() {
        let index = BookIndex::from_records([
            Book::try_new("Dead Souls", "Gogol Nick", "Satire", "", "").unwrap(),
            Book::try_new("The Overcoat", "Gogol Nick", "Satire", "", "").unwrap(),
            Book::try_new("Solaris", "Lem Stanislaw", "Science Fiction", "", "").unwrap(),
        ])
        .unwrap();
        let filter = build_filter(Some("Satire"), Some("SOULS"), None);
        let hits: Vec<_> = filter
            .apply(&index)
            .map(|e| e.record.title.as_str())
            .collect();
        assert_eq!(hits, vec!["Dead Souls"]);
    }
}
