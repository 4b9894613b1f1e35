//! The full "server" catalog, built from an embedded book list.
//!
//! Each line is `Title - Author,ISBN`. Titles may contain commas and dashes,
//! so the line is split on its *last* comma and the title on its *last*
//! `" - "`. Either half may be wrapped in double quotes.

use crate::Catalog;
use crate::consts::CSV_HEADER_REGEX;
use shelf_models::{Author, AuthorId, Book};
use std::collections::HashMap;

pub(crate) const BOOK_LIST: &str = include_str!("../data/server.csv");

const UNKNOWN: &str = "Unknown";
const FIRST_AUTHOR_ID: AuthorId = 1001;
const FIRST_BOOK_ID: u64 = 5001;

#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Entry {
    pub title: String,
    pub author: String,
    pub isbn: String,
}

fn unquote(s: &str) -> &str {
    let s = s.trim();
    let s = s.strip_prefix('"').unwrap_or(s);
    s.strip_suffix('"').unwrap_or(s)
}

pub(crate) fn parse(csv: &str) -> Vec<Entry> {
    let mut lines = csv.lines().map(str::trim).filter(|l| !l.is_empty()).peekable();
    if lines.next_if(|l| CSV_HEADER_REGEX.is_match(l)).is_some() {
        tracing::trace!("Skipping book list header");
    }
    lines
        .map(|line| {
            let (left, right) = line.rsplit_once(',').unwrap_or((line, ""));
            let title_author = unquote(left);
            let (title, author) = match title_author.rsplit_once(" - ") {
                Some((title, author)) => (unquote(title), unquote(author)),
                None => (title_author, UNKNOWN),
            };
            Entry {
                title: title.to_string(),
                author: if author.is_empty() { UNKNOWN } else { author }.to_string(),
                isbn: unquote(right).to_string(),
            }
        })
        .collect()
}

fn cover_url(isbn: &str) -> String {
    if isbn.is_empty() {
        String::new()
    } else {
        format!("https://covers.openlibrary.org/b/isbn/{isbn}-L.jpg")
    }
}

pub(crate) fn build(entries: &[Entry]) -> Catalog {
    // Author names are matched exactly here; the list is curated.
    let mut ids: HashMap<&str, AuthorId> = HashMap::new();
    let mut authors = Vec::new();
    for entry in entries {
        ids.entry(entry.author.as_str()).or_insert_with(|| {
            let id = FIRST_AUTHOR_ID + authors.len() as AuthorId;
            authors.push(Author { id: Some(id), name: entry.author.clone(), ..Default::default() });
            id
        });
    }
    let books = entries
        .iter()
        .zip(FIRST_BOOK_ID..)
        .map(|(entry, id)| Book {
            id: Some(id),
            title: entry.title.clone(),
            author_id: ids[entry.author.as_str()],
            author: Some(entry.author.clone()),
            isbn: entry.isbn.clone(),
            cover_url: cover_url(&entry.isbn),
            ..Default::default()
        })
        .collect();
    Catalog { authors, books }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn entry(title: &str, author: &str, isbn: &str) -> Entry {
        Entry { title: title.to_string(), author: author.to_string(), isbn: isbn.to_string() }
    }

    #[rstest]
    #[case("Piranesi - Susanna Clarke,9781635575637", entry("Piranesi", "Susanna Clarke", "9781635575637"))]
    #[case("Foundation, Book One - Isaac Asimov,0553293354", entry("Foundation, Book One", "Isaac Asimov", "0553293354"))]
    #[case("Flowers for Algernon,9780156030083", entry("Flowers for Algernon", "Unknown", "9780156030083"))]
    #[case(r#""Dune - Part One - Frank Herbert",123"#, entry("Dune - Part One", "Frank Herbert", "123"))]
    #[case("No ISBN - Anon", entry("No ISBN", "Anon", ""))]
    #[case("Empty Author - ,42", entry("Empty Author -", "Unknown", "42"))]
    fn test_parse_line(#[case] line: &str, #[case] expected: Entry) {
        assert_eq!(parse(line), vec![expected]);
    }

    #[rstest]
    #[case("Book,ISBN\nA - B,1")]
    #[case("book isbn\r\nA - B,1\r\n")]
    #[case("\n\nA - B,1\n\n")]
    fn test_header_and_blank_lines(#[case] csv: &str) {
        assert_eq!(parse(csv), vec![entry("A", "B", "1")]);
    }

    #[test]
    fn test_identifier_offsets() {
        let catalog = build(&parse("One - A,1\nTwo - B,2\nThree - A,"));
        let author_ids: Vec<_> = catalog.authors.iter().map(|a| a.id).collect();
        assert_eq!(author_ids, [Some(1001), Some(1002)]);
        let books: Vec<_> = catalog.books.iter().map(|b| (b.id, b.author_id)).collect();
        assert_eq!(books, [(Some(5001), 1001), (Some(5002), 1002), (Some(5003), 1001)]);
        assert_eq!(catalog.books[0].cover_url, "https://covers.openlibrary.org/b/isbn/1-L.jpg");
        assert_eq!(catalog.books[2].cover_url, "");
    }

    #[test]
    fn test_bundled_list() {
        let catalog = build(&parse(BOOK_LIST));
        assert_eq!(catalog.books.len(), 22);
        assert_eq!(catalog.authors.len(), 14);
        let jemisin = catalog.books.iter().filter(|b| b.author.as_deref() == Some("N. K. Jemisin")).count();
        assert_eq!(jemisin, 3);
        assert!(catalog.books.iter().any(|b| b.title == "Jonathan Strange & Mr Norrell"));
    }
}
