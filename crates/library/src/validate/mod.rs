//! Input checks for the presentation layer.
//!
//! The gateway stores whatever it's given; these helpers are how a front end
//! decides whether to hand a draft over in the first place. The `*_problems`
//! functions list everything wrong with a draft, the others fail on the first
//! problem with an [`Validation`](LibraryErrorKind::Validation) error wrapping
//! it.

pub mod error;

use crate::current_year;
use crate::error::{ErrorKind as LibraryErrorKind, Result as LibraryResult};
use crate::validate::error::ErrorKind;
use exn::ResultExt;
use regex::Regex;
use shelf_models::{Author, Book, BookId, NewAuthor, NewBook, normalize_isbn};
use std::sync::LazyLock;

macro_rules! regex {
    ($name:ident, $regex:expr) => {
        static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($regex).unwrap());
    };
}

regex!(ISBN_REGEX, r"^[0-9-]+$");
regex!(URL_REGEX, r"^https?://.+");

pub const EARLIEST_YEAR: i32 = 1000;

fn year_in_range(year: i32, current_year: i32) -> bool {
    (EARLIEST_YEAR..=current_year).contains(&year)
}

/// Everything wrong with an author draft. A birth year of `0` means unknown
/// and is accepted.
pub fn author_problems(draft: &NewAuthor, current_year: i32) -> Vec<ErrorKind> {
    let mut problems = Vec::new();
    if draft.name.trim().is_empty() {
        problems.push(ErrorKind::NameRequired);
    }
    if draft.birth_year != 0 && !year_in_range(draft.birth_year, current_year) {
        problems.push(ErrorKind::BirthYear(current_year));
    }
    problems
}

/// Everything wrong with a book draft.
///
/// `editing` is the identifier of the book being edited, if any, so that it
/// doesn't count as its own duplicate.
pub fn book_problems(
    draft: &NewBook,
    authors: &[Author],
    books: &[Book],
    editing: Option<BookId>,
    current_year: i32,
) -> Vec<ErrorKind> {
    let mut problems = Vec::new();
    if draft.title.trim().is_empty() {
        problems.push(ErrorKind::TitleRequired);
    }
    if draft.author_id == 0 {
        problems.push(ErrorKind::AuthorRequired);
    } else if !authors.iter().any(|a| a.id == Some(draft.author_id)) {
        problems.push(ErrorKind::UnknownAuthor(draft.author_id));
    }

    let isbn = draft.isbn.trim();
    if isbn.is_empty() {
        problems.push(ErrorKind::IsbnRequired);
    } else if !ISBN_REGEX.is_match(isbn) {
        problems.push(ErrorKind::IsbnFormat);
    } else {
        let normalized = normalize_isbn(isbn);
        if books.iter().any(|b| (editing.is_none() || b.id != editing) && b.normalized_isbn() == normalized) {
            problems.push(ErrorKind::DuplicateIsbn(isbn.to_string()));
        }
    }

    if !year_in_range(draft.published_year, current_year) {
        problems.push(ErrorKind::PublishedYear(current_year));
    }
    let cover = draft.cover_url.trim();
    if !cover.is_empty() && !URL_REGEX.is_match(cover) {
        problems.push(ErrorKind::CoverUrl);
    }
    problems
}

fn first(problems: Vec<ErrorKind>) -> LibraryResult<()> {
    match problems.into_iter().next() {
        None => Ok(()),
        Some(problem) => Err::<(), _>(exn::Exn::from(problem)).or_raise(|| LibraryErrorKind::Validation),
    }
}

pub fn author(draft: &NewAuthor) -> LibraryResult<()> {
    first(author_problems(draft, current_year()))
}

pub fn book(draft: &NewBook, authors: &[Author], books: &[Book], editing: Option<BookId>) -> LibraryResult<()> {
    first(book_problems(draft, authors, books, editing, current_year()))
}
