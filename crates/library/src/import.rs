//! Accepting metadata lookup candidates into the catalog.

use crate::gateway::{Gateway, OperationResult};
use crate::validate::{book_problems, error::ErrorKind as Problem};
use shelf_lookup::Candidate;
use shelf_models::{Author, Book, NewAuthor, UNKNOWN_AUTHOR, match_key, normalize_isbn};
use tracing::instrument;

/// What happened to an accepted [`Candidate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Import {
    /// The book was created; `author` is set when its author had to be
    /// created too.
    Imported {
        book: OperationResult<Book>,
        author: Option<OperationResult<Author>>,
    },
    /// The catalog already has this book.
    AlreadyExists(Book),
}

/// An existing book matching the candidate's ISBN, or its title when the
/// candidate has no ISBN.
///
/// This is a heuristic: two editions sharing a title are treated as one.
pub fn find_duplicate<'a>(books: &'a [Book], candidate: &Candidate) -> Option<&'a Book> {
    let isbn = normalize_isbn(&candidate.isbn);
    if isbn.is_empty() {
        let title = match_key(&candidate.title);
        return books.iter().find(|b| match_key(&b.title) == title);
    }
    books.iter().find(|b| b.normalized_isbn() == isbn)
}

/// The author credited as `name`, compared case-insensitively.
///
/// Distinct people sharing a name are merged.
pub fn find_author<'a>(authors: &'a [Author], name: &str) -> Option<&'a Author> {
    let name = match_key(name);
    authors.iter().find(|a| a.id.is_some() && match_key(&a.name) == name)
}

/// Everything wrong with the book an import of `candidate` would create.
///
/// A duplicate has no problems since importing it changes nothing. The
/// author is not checked because an import creates it when missing.
pub fn import_problems(candidate: &Candidate, authors: &[Author], books: &[Book], current_year: i32) -> Vec<Problem> {
    if find_duplicate(books, candidate).is_some() {
        return Vec::new();
    }
    let mut problems = book_problems(&candidate.to_new_book(0), authors, books, None, current_year);
    problems.retain(|problem| !matches!(problem, Problem::AuthorRequired | Problem::UnknownAuthor(_)));
    problems
}

impl Gateway {
    /// Add a looked-up book, reusing (or creating) its author.
    #[instrument(skip_all, fields(title = %candidate.title, isbn = %candidate.isbn))]
    pub async fn import_candidate(&self, candidate: &Candidate) -> Import {
        let snapshot = self.local_snapshot().await;
        if let Some(existing) = find_duplicate(&snapshot.books, candidate) {
            tracing::info!(id = ?existing.id, "Book already in library");
            return Import::AlreadyExists(existing.clone());
        }

        let name = candidate.primary_author().unwrap_or(UNKNOWN_AUTHOR);
        let (author_id, author) = match find_author(&snapshot.authors, name).and_then(|a| a.id) {
            Some(id) => (id, None),
            None => {
                let created = self.create_author(NewAuthor::new(name)).await;
                (created.entity.id.unwrap_or_default(), Some(created))
            },
        };
        let book = self.create_book(candidate.to_new_book(author_id)).await;
        Import::Imported { book, author }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::tests::{offline, online};
    use rstest::rstest;
    use shelf_lookup::{MetadataLookup, StaticLookup};
    use shelf_models::NewBook;

    const YEAR: i32 = 2026;

    fn candidate(title: &str, author: Option<&str>, isbn: &str) -> Candidate {
        Candidate {
            title: title.to_string(),
            authors: author.map(|a| vec![a.to_string()]).unwrap_or_default(),
            isbn: isbn.to_string(),
            published_date: Some("2020-05-01".to_string()),
            published_year: 2020,
            cover_url: "http://books.google.com/cover?id=1".to_string(),
            ..Default::default()
        }
    }

    #[rstest]
    #[case("978-0-441-01359-3", "Unrelated", true)]
    #[case("9780441013593", "Unrelated", true)]
    #[case("9780000000000", "Dune", false)]
    #[case("", "  dune ", true)]
    #[case("", "Dune Messiah", false)]
    fn test_find_duplicate(#[case] isbn: &str, #[case] title: &str, #[case] duplicate: bool) {
        let books = vec![
            NewBook { isbn: "0441013597".to_string(), ..NewBook::new("Dune", 1) }.with_id(1),
            NewBook { isbn: "978-0441013593".to_string(), ..NewBook::new("Dune", 1) }.with_id(2),
        ];
        assert_eq!(find_duplicate(&books, &candidate(title, None, isbn)).is_some(), duplicate);
    }

    #[rstest]
    #[case(candidate("First Light", Some("John Roe"), "978-1111111111"), vec![])]
    #[case(candidate("First Light", None, "978-1111111111"), vec![])]
    #[case(
        Candidate { published_year: 0, ..candidate("First Light", Some("John Roe"), "") },
        vec![Problem::IsbnRequired, Problem::PublishedYear(YEAR)],
    )]
    #[case(candidate("First Light", Some("John Roe"), "not an isbn"), vec![Problem::IsbnFormat])]
    #[case(candidate(" ", Some("John Roe"), "978-1111111111"), vec![Problem::TitleRequired])]
    #[case(Candidate { published_year: 0, ..candidate("Dune", None, "") }, vec![])]
    fn test_import_problems(#[case] candidate: Candidate, #[case] expected: Vec<Problem>) {
        let authors = vec![NewAuthor::new("Frank Herbert").with_id(1)];
        let books = vec![NewBook { isbn: "0441013597".to_string(), ..NewBook::new("Dune", 1) }.with_id(1)];
        assert_eq!(import_problems(&candidate, &authors, &books, YEAR), expected);
    }

    #[tokio::test]
    async fn test_reuses_author_case_insensitively() {
        let h = offline().await;
        let jane = h.gateway.create_author(NewAuthor::new("Jane Doe")).await.entity;

        let import = h.gateway.import_candidate(&candidate("First Light", Some("JANE DOE"), "978-1111111111")).await;
        let Import::Imported { book, author } = import else {
            panic!("expected an import");
        };
        assert!(author.is_none());
        assert_eq!(book.entity.author_id, jane.id.unwrap());
        assert_eq!(book.entity.cover_url, "https://books.google.com/cover?id=1");
        assert_eq!(book.entity.published_year, 2020);
        assert_eq!(book.snapshot.authors.iter().filter(|a| match_key(&a.name) == "jane doe").count(), 1);
    }

    #[tokio::test]
    async fn test_creates_missing_author() {
        let h = online().await;
        let import = h.gateway.import_candidate(&candidate("First Light", Some("John Roe"), "")).await;
        let Import::Imported { book, author: Some(author) } = import else {
            panic!("expected an import with a new author");
        };
        assert_eq!(author.entity.name, "John Roe");
        assert_eq!(book.entity.author_id, author.entity.id.unwrap());
        assert!(book.snapshot.author(book.entity.author_id).is_some());
    }

    #[tokio::test]
    async fn test_unknown_author_placeholder() {
        let h = offline().await;
        let Import::Imported { author: Some(author), .. } =
            h.gateway.import_candidate(&candidate("Anonymous Pamphlet", None, "")).await
        else {
            panic!("expected an import with a new author");
        };
        assert_eq!(author.entity.name, UNKNOWN_AUTHOR);

        // The placeholder is reused afterwards.
        let import = h.gateway.import_candidate(&candidate("Another Pamphlet", None, "")).await;
        assert!(matches!(import, Import::Imported { author: None, .. }));
    }

    #[tokio::test]
    async fn test_duplicate_is_not_imported() {
        let h = offline().await;
        let first = candidate("First Light", Some("Jane Doe"), "978-1111111111");
        assert!(matches!(h.gateway.import_candidate(&first).await, Import::Imported { .. }));
        let books = h.gateway.local_snapshot().await.books.len();

        let again = candidate("First Light (Reissue)", Some("Jane Doe"), "9781111111111");
        let Import::AlreadyExists(existing) = h.gateway.import_candidate(&again).await else {
            panic!("expected a duplicate");
        };
        assert_eq!(existing.title, "First Light");
        assert_eq!(h.gateway.local_snapshot().await.books.len(), books);
    }

    #[tokio::test]
    async fn test_lookup_then_import() {
        let h = offline().await;
        let lookup = StaticLookup::new(vec![candidate("The Dispossessed", Some("ursula k. le guin"), "978-0061054884")]);
        let results = lookup.by_isbn("9780061054884").await;
        let Import::Imported { book, author } = h.gateway.import_candidate(&results[0]).await else {
            panic!("expected an import");
        };
        assert!(author.is_none());
        assert_eq!(book.entity.author_id, 1);
        assert_eq!(book.entity.id, Some(6));
    }
}
