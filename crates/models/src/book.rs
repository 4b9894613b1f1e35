use crate::author::AuthorId;
use serde::{Deserialize, Serialize};

pub type BookId = u64;

/// Optional metadata, mostly carried over from external lookups and the
/// bundled seed catalogs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_link: Option<String>,
    /// Raw published date as reported by the source (`"2004"`, `"2004-05-01"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

/// A catalogued book.
///
/// `author_id` is the primary author and should resolve to an [`Author`](crate::Author)
/// for records created internally. Imported records may only carry the
/// free-text `author` name until they're reconciled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<BookId>,
    pub title: String,
    #[serde(default)]
    pub author_id: AuthorId,
    /// Co-authors (including the primary author), for display.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub author_ids: Vec<AuthorId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub author_names: Vec<String>,
    /// Free-text author name from imported data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default)]
    pub isbn: String,
    /// `0` when unknown.
    #[serde(default)]
    pub published_year: i32,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub cover_url: String,
    #[serde(flatten)]
    pub metadata: BookMetadata,
}
impl Book {
    pub fn apply(&mut self, patch: &BookPatch) {
        patch.apply(self);
    }

    /// Replace this record with `other`, keeping the current identifier if
    /// `other` does not carry one.
    pub fn reconcile(&mut self, other: Book) {
        let id = other.id.or(self.id);
        *self = Book { id, ..other };
    }

    /// ISBN reduced to its significant characters (digits and check `X`).
    pub fn normalized_isbn(&self) -> String {
        normalize_isbn(&self.isbn)
    }
}

/// ISBN reduced to digits and an upper-case check `X`.
pub fn normalize_isbn(isbn: &str) -> String {
    isbn.chars().filter(|c| c.is_ascii_digit() || *c == 'X' || *c == 'x').map(|c| c.to_ascii_uppercase()).collect()
}

/// A book that has not been persisted yet; also the remote payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBook {
    pub title: String,
    #[serde(default)]
    pub author_id: AuthorId,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub author_ids: Vec<AuthorId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub author_names: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default)]
    pub isbn: String,
    #[serde(default)]
    pub published_year: i32,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub cover_url: String,
    #[serde(flatten)]
    pub metadata: BookMetadata,
}
impl NewBook {
    pub fn new(title: impl Into<String>, author_id: AuthorId) -> Self {
        Self { title: title.into(), author_id, ..Default::default() }
    }

    pub fn with_id(self, id: BookId) -> Book {
        Book {
            id: Some(id),
            title: self.title,
            author_id: self.author_id,
            author_ids: self.author_ids,
            author_names: self.author_names,
            author: self.author,
            isbn: self.isbn,
            published_year: self.published_year,
            description: self.description,
            cover_url: self.cover_url,
            metadata: self.metadata,
        }
    }

    pub fn normalized_isbn(&self) -> String {
        normalize_isbn(&self.isbn)
    }
}
impl From<&Book> for NewBook {
    fn from(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            author_id: book.author_id,
            author_ids: book.author_ids.clone(),
            author_names: book.author_names.clone(),
            author: book.author.clone(),
            isbn: book.isbn.clone(),
            published_year: book.published_year,
            description: book.description.clone(),
            cover_url: book.cover_url.clone(),
            metadata: book.metadata.clone(),
        }
    }
}

/// Partial update for a [`Book`]: `Some` fields override, `None` fields are
/// retained. Metadata is replaced as a whole when supplied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookPatch {
    pub title: Option<String>,
    pub author_id: Option<AuthorId>,
    pub author_ids: Option<Vec<AuthorId>>,
    pub author_names: Option<Vec<String>>,
    pub author: Option<Option<String>>,
    pub isbn: Option<String>,
    pub published_year: Option<i32>,
    pub description: Option<String>,
    pub cover_url: Option<String>,
    pub metadata: Option<BookMetadata>,
}
impl BookPatch {
    pub fn apply(&self, book: &mut Book) {
        if let Some(title) = &self.title {
            book.title.clone_from(title);
        }
        if let Some(author_id) = self.author_id {
            book.author_id = author_id;
        }
        if let Some(ids) = &self.author_ids {
            book.author_ids.clone_from(ids);
        }
        if let Some(names) = &self.author_names {
            book.author_names.clone_from(names);
        }
        if let Some(author) = &self.author {
            book.author.clone_from(author);
        }
        if let Some(isbn) = &self.isbn {
            book.isbn.clone_from(isbn);
        }
        if let Some(year) = self.published_year {
            book.published_year = year;
        }
        if let Some(description) = &self.description {
            book.description.clone_from(description);
        }
        if let Some(cover) = &self.cover_url {
            book.cover_url.clone_from(cover);
        }
        if let Some(metadata) = &self.metadata {
            book.metadata.clone_from(metadata);
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
impl From<Book> for BookPatch {
    fn from(book: Book) -> Self {
        Self {
            title: Some(book.title),
            author_id: Some(book.author_id),
            author_ids: Some(book.author_ids),
            author_names: Some(book.author_names),
            author: Some(book.author),
            isbn: Some(book.isbn),
            published_year: Some(book.published_year),
            description: Some(book.description),
            cover_url: Some(book.cover_url),
            metadata: Some(book.metadata),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn kindred() -> Book {
        Book {
            id: Some(3),
            title: "Kindred".to_string(),
            author_id: 2,
            isbn: "978-0-8070-8305-4".to_string(),
            published_year: 1979,
            description: "A time-travel slave narrative.".to_string(),
            cover_url: "https://covers.openlibrary.org/b/isbn/9780807083054-L.jpg".to_string(),
            metadata: BookMetadata { page_count: Some(264), language: Some("en".to_string()), ..Default::default() },
            ..Default::default()
        }
    }

    #[test]
    fn test_patch_merges_shallowly() {
        let mut book = kindred();
        book.apply(&BookPatch { title: Some("Kindred (25th Anniversary)".to_string()), ..Default::default() });
        assert_eq!(book.title, "Kindred (25th Anniversary)");
        assert_eq!(book.author_id, 2);
        assert_eq!(book.metadata.page_count, Some(264));
    }

    #[test]
    fn test_patch_can_clear_free_text_author() {
        let mut book = Book { author: Some("Octavia Butler".to_string()), ..kindred() };
        book.apply(&BookPatch { author: Some(None), ..Default::default() });
        assert_eq!(book.author, None);
    }

    #[test]
    fn test_round_trip_through_draft() {
        let book = kindred();
        assert_eq!(NewBook::from(&book).with_id(3), book);
    }

    #[test]
    fn test_metadata_is_flattened() {
        let json = serde_json::to_value(kindred()).unwrap();
        assert_eq!(json["pageCount"], 264);
        assert_eq!(json["authorId"], 2);
        assert_eq!(json["publishedYear"], 1979);
        assert!(json.get("authorIds").is_none());
        assert!(json.get("metadata").is_none());
    }

    #[test]
    fn test_reads_minimal_remote_record() {
        let book: Book = serde_json::from_str(r#"{"id":12,"title":"Dune","authorId":4,"isbn":"0-441-17271-7"}"#).unwrap();
        assert_eq!(book.id, Some(12));
        assert_eq!(book.published_year, 0);
        assert_eq!(book.metadata, BookMetadata::default());
    }

    #[rstest]
    #[case("978-0-8070-8305-4", "9780807083054")]
    #[case("0-8044-2957-x", "080442957X")]
    #[case(" 978 0 441 ", "9780441")]
    #[case("", "")]
    fn test_normalize_isbn(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(normalize_isbn(input), expected);
    }
}
