//! The compact demo library.
//!
//! Entries are kept in the shape a metadata provider hands them out (free-text
//! author names, raw published dates) and normalized into authors and books
//! when the catalog is built.

use crate::Catalog;
use crate::consts::YEAR_REGEX;
use shelf_models::{Author, AuthorId, Book, BookMetadata, UNKNOWN_AUTHOR, match_key};
use std::collections::HashMap;

const NO_DESCRIPTION: &str = "Description not provided.";

/// A catalogue entry before authors are resolved to identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBook {
    pub title: &'static str,
    pub subtitle: Option<&'static str>,
    /// Empty for anonymous works; they're credited to [`UNKNOWN_AUTHOR`].
    pub authors: &'static [&'static str],
    pub published_date: Option<&'static str>,
    pub description: Option<&'static str>,
    pub categories: &'static [&'static str],
    pub page_count: Option<u32>,
    pub language: Option<&'static str>,
    pub preview_link: Option<&'static str>,
    pub info_link: Option<&'static str>,
    pub thumbnail: Option<&'static str>,
    pub small_thumbnail: Option<&'static str>,
    pub isbn: Option<&'static str>,
}
impl RawBook {
    pub const fn new(title: &'static str) -> Self {
        Self {
            title,
            subtitle: None,
            authors: &[],
            published_date: None,
            description: None,
            categories: &[],
            page_count: None,
            language: None,
            preview_link: None,
            info_link: None,
            thumbnail: None,
            small_thumbnail: None,
            isbn: None,
        }
    }
}

pub(crate) const ENTRIES: &[RawBook] = &[
    RawBook {
        authors: &["Ursula K. Le Guin"],
        published_date: Some("1968"),
        description: Some(
            "Ged, the greatest sorcerer in all Earthsea, was called Sparrowhawk in his reckless youth. \
             Hungry for power and knowledge, he tampered with long-held secrets and loosed a terrible \
             shadow upon the world.",
        ),
        categories: &["Fiction", "Fantasy"],
        page_count: Some(183),
        language: Some("en"),
        thumbnail: Some("https://covers.openlibrary.org/b/isbn/9780547773742-L.jpg"),
        small_thumbnail: Some("https://covers.openlibrary.org/b/isbn/9780547773742-S.jpg"),
        isbn: Some("9780547773742"),
        ..RawBook::new("A Wizard of Earthsea")
    },
    RawBook {
        authors: &["Ursula K. Le Guin"],
        published_date: Some("1969-03"),
        description: Some(
            "A lone human ambassador is sent to Winter, an alien world whose inhabitants can choose \
             and change their gender.",
        ),
        categories: &["Fiction", "Science Fiction"],
        page_count: Some(304),
        language: Some("en"),
        thumbnail: Some("https://covers.openlibrary.org/b/isbn/9780441478125-L.jpg"),
        isbn: Some("9780441478125"),
        ..RawBook::new("The Left Hand of Darkness")
    },
    RawBook {
        authors: &["Octavia E. Butler"],
        published_date: Some("1979-06-01"),
        description: Some(
            "Dana, a modern black woman, is celebrating her twenty-sixth birthday with her new husband \
             when she is snatched abruptly from her home in California and transported to the \
             antebellum South.",
        ),
        categories: &["Fiction"],
        page_count: Some(264),
        language: Some("en"),
        thumbnail: Some("https://covers.openlibrary.org/b/isbn/9780807083697-L.jpg"),
        isbn: Some("9780807083697"),
        ..RawBook::new("Kindred")
    },
    RawBook {
        authors: &["octavia e. butler"],
        published_date: Some("1993"),
        subtitle: Some("Earthseed, book one"),
        categories: &["Fiction", "Science Fiction"],
        page_count: Some(345),
        language: Some("en"),
        small_thumbnail: Some("https://covers.openlibrary.org/b/isbn/9781538732182-S.jpg"),
        isbn: Some("9781538732182"),
        ..RawBook::new("Parable of the Sower")
    },
    RawBook {
        authors: &["Italo Calvino"],
        published_date: Some("c. 1972"),
        description: Some(
            "Marco Polo describes to Kublai Khan the cities he has visited on his expeditions, each \
             one stranger than the last.",
        ),
        categories: &["Fiction"],
        page_count: Some(165),
        language: Some("en"),
        info_link: Some("https://openlibrary.org/isbn/9780156453806"),
        thumbnail: Some("https://covers.openlibrary.org/b/isbn/9780156453806-L.jpg"),
        isbn: Some("9780156453806"),
        ..RawBook::new("Invisible Cities")
    },
];

/// Case-insensitive name → author map, assigning identifiers in order of
/// first appearance.
#[derive(Default)]
struct AuthorDirectory {
    index: HashMap<String, usize>,
    authors: Vec<Author>,
}
impl AuthorDirectory {
    fn ensure(&mut self, name: &str) -> (AuthorId, String) {
        let name = match name.trim() {
            "" => UNKNOWN_AUTHOR,
            trimmed => trimmed,
        };
        if let Some(&i) = self.index.get(&match_key(name)) {
            let author = &self.authors[i];
            return (author.id.unwrap_or_default(), author.name.clone());
        }
        let id = self.authors.len() as AuthorId + 1;
        self.index.insert(match_key(name), self.authors.len());
        self.authors.push(Author { id: Some(id), name: name.to_string(), ..Default::default() });
        (id, name.to_string())
    }

    fn into_sorted(mut self) -> Vec<Author> {
        self.authors.sort_by(|a, b| a.name.cmp(&b.name));
        self.authors
    }
}

pub(crate) fn parse_year(date: Option<&str>) -> i32 {
    date.and_then(|d| YEAR_REGEX.find(d)).and_then(|m| m.as_str().parse().ok()).unwrap_or(0)
}

fn description(raw: &RawBook) -> String {
    [raw.description, raw.subtitle]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|s| !s.is_empty())
        .unwrap_or(NO_DESCRIPTION)
        .to_string()
}

pub(crate) fn build(entries: &[RawBook]) -> Catalog {
    let mut directory = AuthorDirectory::default();
    let books = entries
        .iter()
        .zip(1..)
        .map(|(raw, id)| {
            let names: &[&str] = if raw.authors.is_empty() { &[UNKNOWN_AUTHOR] } else { raw.authors };
            let (author_ids, author_names): (Vec<_>, Vec<_>) = names.iter().map(|n| directory.ensure(n)).unzip();
            Book {
                id: Some(id),
                title: raw.title.to_string(),
                author_id: author_ids[0],
                author: Some(author_names.join(", ")),
                author_ids,
                author_names,
                isbn: raw.isbn.unwrap_or_default().to_string(),
                published_year: parse_year(raw.published_date),
                description: description(raw),
                cover_url: raw.thumbnail.or(raw.small_thumbnail).unwrap_or_default().to_string(),
                metadata: BookMetadata {
                    page_count: raw.page_count,
                    language: raw.language.map(str::to_string),
                    categories: raw.categories.iter().map(|c| c.to_string()).collect(),
                    info_link: raw.info_link.map(str::to_string),
                    preview_link: raw.preview_link.map(str::to_string),
                    published_date: raw.published_date.map(str::to_string),
                    thumbnail: raw.small_thumbnail.map(str::to_string),
                },
            }
        })
        .collect();
    Catalog { authors: directory.into_sorted(), books }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Some("1968"), 1968)]
    #[case(Some("1969-03"), 1969)]
    #[case(Some("c. 1972"), 1972)]
    #[case(Some("circa 72"), 0)]
    #[case(Some(""), 0)]
    #[case(None, 0)]
    fn test_parse_year(#[case] date: Option<&str>, #[case] expected: i32) {
        assert_eq!(parse_year(date), expected);
    }

    #[test]
    fn test_bundled_entries() {
        let catalog = build(ENTRIES);
        let names: Vec<_> = catalog.authors.iter().map(|a| (a.id, a.name.as_str())).collect();
        // Identifiers follow first appearance, the list is sorted by name.
        assert_eq!(names, [(Some(3), "Italo Calvino"), (Some(2), "Octavia E. Butler"), (Some(1), "Ursula K. Le Guin")]);

        let sower = catalog.books.iter().find(|b| b.title == "Parable of the Sower").unwrap();
        assert_eq!(sower.author_id, 2);
        assert_eq!(sower.author.as_deref(), Some("Octavia E. Butler"));
        assert_eq!(sower.description, "Earthseed, book one");
        assert_eq!(sower.cover_url, "https://covers.openlibrary.org/b/isbn/9781538732182-S.jpg");
        assert_eq!(sower.published_year, 1993);
    }

    #[test]
    fn test_book_ids_follow_entry_order() {
        let catalog = build(ENTRIES);
        let ids: Vec<_> = catalog.books.iter().map(|b| b.id).collect();
        assert_eq!(ids, [Some(1), Some(2), Some(3), Some(4), Some(5)]);
    }

    #[test]
    fn test_anonymous_entries_use_placeholder() {
        let entries = [
            RawBook::new("Beowulf"),
            RawBook { authors: &["  "], ..RawBook::new("The Cloud of Unknowing") },
            RawBook { authors: &["Jane Doe", "John Roe"], ..RawBook::new("Co-written") },
        ];
        let catalog = build(&entries);
        assert_eq!(catalog.authors.len(), 3);
        assert_eq!(catalog.books[0].author_id, catalog.books[1].author_id);
        assert_eq!(catalog.author(catalog.books[0].author_id).unwrap().name, UNKNOWN_AUTHOR);
        assert_eq!(catalog.books[0].description, NO_DESCRIPTION);

        let co = &catalog.books[2];
        assert_eq!(co.author_ids, [2, 3]);
        assert_eq!(co.author.as_deref(), Some("Jane Doe, John Roe"));
    }

    #[test]
    fn test_no_placeholder_without_anonymous_entries() {
        let catalog = build(ENTRIES);
        assert!(catalog.authors.iter().all(|a| a.name != UNKNOWN_AUTHOR));
    }
}
