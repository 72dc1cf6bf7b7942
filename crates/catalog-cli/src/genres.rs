//! catalog genres: the distinct genres, as a genre selector would offer them.

use anyhow::Result;
use catalog::BookIndex;
use colored::Colorize;

pub fn run(index: &BookIndex) -> Result<()> {
    let genres = catalog::genres(index);
    if genres.is_empty() {
        println!("{}", "No genres found".yellow());
        return Ok(());
    }
    for genre in genres {
        println!("{genre}");
    }
    Ok(())
}
