//! Filtering and ordering snapshots for display.

use shelf_models::{Author, AuthorId, Book, UNKNOWN_AUTHOR, match_key};
use std::cmp::Ordering;

/// Books published within this many years of today count as modern.
pub const MODERN_WINDOW: i32 = 30;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BookSort {
    /// Most recently added first (highest identifier).
    #[default]
    Recent,
    TitleAsc,
    TitleDesc,
    YearNew,
    YearOld,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Era {
    Modern,
    Classic,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthorSort {
    #[default]
    Alphabetical,
    /// Most primary-author credits first.
    BooksDesc,
    BirthNew,
    BirthOld,
}

/// Which books to list, and in what order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookQuery {
    /// Case-insensitive substring of the title or the credited author.
    pub search: String,
    pub author_id: Option<AuthorId>,
    pub era: Option<Era>,
    pub sort: BookSort,
}

impl BookQuery {
    /// Matching books with their resolved author, if any. Books whose author
    /// is missing from `authors` are still listed and searched by
    /// [`credited_author`].
    pub fn apply<'a>(&self, authors: &'a [Author], books: &'a [Book], current_year: i32) -> Vec<(&'a Book, Option<&'a Author>)> {
        let search = match_key(&self.search);
        let cutoff = current_year - MODERN_WINDOW;
        let mut matches: Vec<_> = books
            .iter()
            .map(|book| (book, authors.iter().find(|a| a.id == Some(book.author_id))))
            .filter(|(book, author)| {
                search.is_empty()
                    || match_key(&book.title).contains(&search)
                    || match_key(credited_author(book, *author)).contains(&search)
            })
            .filter(|(book, _)| self.author_id.is_none_or(|id| book.author_id == id))
            .filter(|(book, _)| match self.era {
                None => true,
                Some(Era::Modern) => book.published_year >= cutoff,
                Some(Era::Classic) => book.published_year < cutoff,
            })
            .collect();
        matches.sort_by(|(a, _), (b, _)| match self.sort {
            BookSort::Recent => b.id.cmp(&a.id),
            BookSort::TitleAsc => by_title(a, b),
            BookSort::TitleDesc => by_title(b, a),
            BookSort::YearNew => b.published_year.cmp(&a.published_year),
            BookSort::YearOld => a.published_year.cmp(&b.published_year),
        });
        matches
    }
}

/// The name to show for a book's author: the resolved author, else the
/// free-text credit from imported data, else a placeholder.
pub fn credited_author<'a>(book: &'a Book, author: Option<&'a Author>) -> &'a str {
    match (author, book.author.as_deref()) {
        (Some(author), _) => &author.name,
        (None, Some(name)) if !name.trim().is_empty() => name,
        (None, _) => UNKNOWN_AUTHOR,
    }
}

fn by_title(a: &Book, b: &Book) -> Ordering {
    match_key(&a.title).cmp(&match_key(&b.title)).then_with(|| a.title.cmp(&b.title))
}

/// Which authors to list, and in what order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorQuery {
    /// Case-insensitive substring of the name or bio.
    pub search: String,
    pub sort: AuthorSort,
}

impl AuthorQuery {
    /// Matching authors with the number of books crediting them as primary
    /// author.
    pub fn apply<'a>(&self, authors: &'a [Author], books: &[Book]) -> Vec<(&'a Author, usize)> {
        let search = match_key(&self.search);
        let mut matches: Vec<_> = authors
            .iter()
            .filter(|a| search.is_empty() || match_key(&a.name).contains(&search) || match_key(&a.bio).contains(&search))
            .map(|a| (a, book_count(a, books)))
            .collect();
        matches.sort_by(|(a, a_books), (b, b_books)| match self.sort {
            AuthorSort::Alphabetical => match_key(&a.name).cmp(&match_key(&b.name)),
            AuthorSort::BooksDesc => b_books.cmp(a_books),
            AuthorSort::BirthNew => b.birth_year.cmp(&a.birth_year),
            AuthorSort::BirthOld => a.birth_year.cmp(&b.birth_year),
        });
        matches
    }
}

fn book_count(author: &Author, books: &[Book]) -> usize {
    match author.id {
        Some(id) => books.iter().filter(|b| b.author_id == id).count(),
        None => 0,
    }
}
