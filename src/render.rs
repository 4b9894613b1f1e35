//! Text and JSON output.

use serde_json::{Value, json};
use shelf_library::query::credited_author;
use shelf_library::validate::error::ErrorKind as Problem;
use shelf_library::{Import, OperationResult, Snapshot, SyncMeta};
use shelf_lookup::Candidate;
use shelf_models::{Author, Book, SeedSource};
use time::format_description::well_known::Rfc3339;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    Text,
    Json,
}

impl Output {
    pub fn from_flag(json: bool) -> Self {
        if json { Self::Json } else { Self::Text }
    }

    pub fn meta(self, meta: &SyncMeta) {
        match self {
            Self::Json => print_json(&meta_json(meta)),
            Self::Text => println!("{}", meta_line(meta)),
        }
    }

    pub fn snapshot(self, snapshot: &Snapshot) {
        match self {
            Self::Json => print_json(&json!({
                "authors": snapshot.authors,
                "books": snapshot.books,
                "meta": meta_json(&snapshot.meta),
            })),
            Self::Text => {
                println!("{} authors, {} books", snapshot.authors.len(), snapshot.books.len());
                println!("{}", meta_line(&snapshot.meta));
            },
        }
    }

    pub fn books(self, rows: &[(&Book, Option<&Author>)]) {
        match self {
            Self::Json => {
                let rows: Vec<Value> = rows
                    .iter()
                    .map(|(book, author)| json!({ "book": book, "author": author, "credit": credited_author(book, *author) }))
                    .collect();
                print_json(&Value::Array(rows));
            },
            Self::Text if rows.is_empty() => println!("No books found"),
            Self::Text => rows.iter().for_each(|(book, author)| println!("{}", book_line(book, *author))),
        }
    }

    pub fn authors(self, rows: &[(&Author, usize)]) {
        match self {
            Self::Json => {
                let rows: Vec<Value> = rows.iter().map(|(author, books)| json!({ "author": author, "books": books })).collect();
                print_json(&Value::Array(rows));
            },
            Self::Text if rows.is_empty() => println!("No authors found"),
            Self::Text => rows.iter().for_each(|(author, books)| println!("{}", author_line(author, *books))),
        }
    }

    pub fn author_result(self, verb: &str, result: &OperationResult<Author>) {
        match self {
            Self::Json => print_json(&json!({ "author": result.entity, "meta": meta_json(result.meta()) })),
            Self::Text => {
                println!("{verb} author {}: {}", id_label(result.entity.id), result.entity);
                println!("{}", meta_line(result.meta()));
            },
        }
    }

    pub fn book_result(self, verb: &str, result: &OperationResult<Book>) {
        match self {
            Self::Json => print_json(&json!({ "book": result.entity, "meta": meta_json(result.meta()) })),
            Self::Text => {
                println!("{verb} book {}: {}", id_label(result.entity.id), result.entity.title);
                println!("{}", meta_line(result.meta()));
            },
        }
    }

    pub fn seed(self, seed: SeedSource) {
        match self {
            Self::Json => print_json(&json!({ "seed": seed.as_str(), "label": seed.label() })),
            Self::Text => println!("{} ({})", seed.label(), seed.as_str()),
        }
    }

    pub fn candidates(self, candidates: &[Candidate]) {
        match self {
            Self::Json => {
                let rows: Vec<Value> = candidates.iter().map(candidate_json).collect();
                print_json(&Value::Array(rows));
            },
            Self::Text if candidates.is_empty() => println!("No results"),
            Self::Text => {
                for (n, candidate) in candidates.iter().enumerate() {
                    println!("{:>3}. {}", n + 1, candidate_line(candidate));
                }
            },
        }
    }

    pub fn import(self, import: &Import) {
        match (self, import) {
            (Self::Json, Import::AlreadyExists(book)) => print_json(&json!({ "alreadyExists": book })),
            (Self::Json, Import::Imported { book, author }) => print_json(&json!({
                "book": book.entity,
                "author": author.as_ref().map(|a| &a.entity),
                "meta": meta_json(book.meta()),
            })),
            (Self::Text, Import::AlreadyExists(book)) => {
                println!("Already in the catalog as book {}: {}", id_label(book.id), book.title);
            },
            (Self::Text, Import::Imported { book, author }) => {
                if let Some(author) = author {
                    println!("Added author {}: {}", id_label(author.entity.id), author.entity);
                }
                println!("Added book {}: {}", id_label(book.entity.id), book.entity.title);
                println!("{}", meta_line(book.meta()));
            },
        }
    }
}

/// Validation problems go to stderr as text whatever the output format.
pub fn problems(problems: &[Problem]) {
    for problem in problems {
        eprintln!("  - {problem}");
    }
}

fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{text}"),
        Err(err) => tracing::error!(error = %err, "Could not serialize output"),
    }
}

fn timestamp(meta: &SyncMeta) -> String {
    meta.timestamp.format(&Rfc3339).unwrap_or_else(|_| meta.timestamp.unix_timestamp().to_string())
}

fn meta_json(meta: &SyncMeta) -> Value {
    json!({
        "timestamp": timestamp(meta),
        "latencyMs": u64::try_from(meta.latency.as_millis()).unwrap_or(u64::MAX),
        "fallbackUsed": meta.fallback_used,
    })
}

pub fn meta_line(meta: &SyncMeta) -> String {
    let status = if meta.fallback_used { "offline, using cached data" } else { "in sync" };
    format!("[{status}; {}ms at {}]", meta.latency.as_millis(), timestamp(meta))
}

fn id_label(id: Option<u64>) -> String {
    id.map_or_else(|| "?".to_string(), |id| format!("#{id}"))
}

pub fn book_line(book: &Book, author: Option<&Author>) -> String {
    let year = match book.published_year {
        0 => String::new(),
        year => format!(" ({year})"),
    };
    format!("{:>6}  {}{year}, {}", id_label(book.id), book.title, credited_author(book, author))
}

pub fn author_line(author: &Author, books: usize) -> String {
    let noun = if books == 1 { "book" } else { "books" };
    format!("{:>6}  {author}, {books} {noun}", id_label(author.id))
}

fn candidate_line(candidate: &Candidate) -> String {
    let mut line = format!("{}, {}", candidate.title, candidate.author_label());
    if candidate.published_year != 0 {
        line.push_str(&format!(" ({})", candidate.published_year));
    }
    if !candidate.isbn.is_empty() {
        line.push_str(&format!(" [ISBN {}]", candidate.isbn));
    }
    line
}

fn candidate_json(candidate: &Candidate) -> Value {
    json!({
        "sourceId": candidate.source_id,
        "title": candidate.title,
        "authors": candidate.authors,
        "isbn": candidate.isbn,
        "publishedYear": candidate.published_year,
        "coverUrl": candidate.cover_url,
        "description": candidate.description,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelf_models::{NewAuthor, NewBook};
    use std::time::Duration;

    #[test]
    fn test_lines() {
        let author = NewAuthor { birth_year: 1947, ..NewAuthor::new("Octavia E. Butler") }.with_id(2);
        let book = NewBook { published_year: 1979, ..NewBook::new("Kindred", 2) }.with_id(3);
        assert_eq!(book_line(&book, Some(&author)), "    #3  Kindred (1979), Octavia E. Butler");
        assert_eq!(author_line(&author, 1), "    #2  Octavia E. Butler (b. 1947), 1 book");
        let undated = NewBook::new("Untitled", 2).with_id(12);
        assert_eq!(book_line(&undated, Some(&author)), "   #12  Untitled, Octavia E. Butler");
    }

    #[test]
    fn test_book_line_without_author() {
        let imported = Book { author: Some("Free Text".to_string()), ..NewBook::new("Imported", 0).with_id(4) };
        assert_eq!(book_line(&imported, None), "    #4  Imported, Free Text");
        let orphaned = NewBook { published_year: 2001, ..NewBook::new("Orphaned", 99) }.with_id(5);
        assert_eq!(book_line(&orphaned, None), "    #5  Orphaned (2001), Unknown author");
    }

    #[test]
    fn test_meta() {
        let meta = SyncMeta::now(Duration::from_millis(212), true);
        assert!(meta_line(&meta).starts_with("[offline, using cached data; 212ms at "));
        let value = meta_json(&meta);
        assert_eq!(value["latencyMs"], 212);
        assert_eq!(value["fallbackUsed"], true);
    }

    #[test]
    fn test_candidate_line() {
        let candidate = Candidate {
            title: "Dune".to_string(),
            authors: vec!["Frank Herbert".to_string()],
            isbn: "9780441172719".to_string(),
            published_year: 1965,
            ..Default::default()
        };
        assert_eq!(candidate_line(&candidate), "Dune, Frank Herbert (1965) [ISBN 9780441172719]");
        assert_eq!(candidate_line(&Candidate { title: "Anon".to_string(), ..Default::default() }), "Anon, Unknown Author");
    }
}
