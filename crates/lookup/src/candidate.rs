use shelf_models::{AuthorId, BookMetadata, NewBook};

/// Shown in place of an author name when the provider lists none.
pub const UNKNOWN_AUTHOR_LABEL: &str = "Unknown Author";

/// A book as reported by a metadata provider, not yet in the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Candidate {
    /// Provider-specific volume identifier.
    pub source_id: String,
    pub title: String,
    pub authors: Vec<String>,
    pub description: String,
    /// ISBN-13 when available, otherwise ISBN-10, otherwise empty.
    pub isbn: String,
    pub published_date: Option<String>,
    /// `0` when the published date doesn't start with a year.
    pub published_year: i32,
    pub cover_url: String,
    pub metadata: BookMetadata,
}

impl Candidate {
    /// First listed author, if any.
    pub fn primary_author(&self) -> Option<&str> {
        self.authors.first().map(String::as_str).map(str::trim).filter(|a| !a.is_empty())
    }

    pub fn author_label(&self) -> &str {
        self.primary_author().unwrap_or(UNKNOWN_AUTHOR_LABEL)
    }

    /// Draft book credited to `author_id`, cover upgraded to HTTPS.
    pub fn to_new_book(&self, author_id: AuthorId) -> NewBook {
        NewBook {
            title: self.title.clone(),
            author_id,
            author: self.primary_author().map(str::to_string),
            isbn: self.isbn.clone(),
            published_year: self.published_year,
            description: self.description.clone(),
            cover_url: secure_url(&self.cover_url),
            metadata: BookMetadata { published_date: self.published_date.clone(), ..self.metadata.clone() },
            ..Default::default()
        }
    }
}

/// Rewrite `http://` links to `https://`; anything else is left alone.
pub(crate) fn secure_url(url: &str) -> String {
    match url.strip_prefix("http://") {
        Some(rest) => format!("https://{rest}"),
        None => url.to_string(),
    }
}

/// Year from the first four characters of a published date.
pub(crate) fn leading_year(date: &str) -> i32 {
    date.get(..4).and_then(|y| y.parse().ok()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("http://books.google.com/x?id=1", "https://books.google.com/x?id=1")]
    #[case("https://already.secure/", "https://already.secure/")]
    #[case("", "")]
    fn test_secure_url(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(secure_url(input), expected);
    }

    #[rstest]
    #[case("2005-11-15", 2005)]
    #[case("1999", 1999)]
    #[case("199", 0)]
    #[case("c. 1850", 0)]
    #[case("", 0)]
    fn test_leading_year(#[case] date: &str, #[case] expected: i32) {
        assert_eq!(leading_year(date), expected);
    }

    #[test]
    fn test_author_label() {
        let mut candidate = Candidate::default();
        assert_eq!(candidate.primary_author(), None);
        assert_eq!(candidate.author_label(), UNKNOWN_AUTHOR_LABEL);
        candidate.authors = vec!["Jane Doe".to_string(), "John Roe".to_string()];
        assert_eq!(candidate.author_label(), "Jane Doe");
    }

    #[test]
    fn test_to_new_book() {
        let candidate = Candidate {
            title: "The Google Story".to_string(),
            authors: vec!["David A. Vise".to_string()],
            isbn: "9780553804577".to_string(),
            published_date: Some("2005-11-15".to_string()),
            published_year: 2005,
            cover_url: "http://books.google.com/cover".to_string(),
            ..Default::default()
        };
        let book = candidate.to_new_book(7);
        assert_eq!(book.author_id, 7);
        assert_eq!(book.author.as_deref(), Some("David A. Vise"));
        assert_eq!(book.cover_url, "https://books.google.com/cover");
        assert_eq!(book.metadata.published_date.as_deref(), Some("2005-11-15"));
    }
}
