//! Canned metadata lookup for testing.

use crate::error::{ErrorKind, Result};
use crate::{Candidate, MetadataLookup};
use async_trait::async_trait;
use shelf_models::match_key;

/// Answers lookups from a fixed list of candidates.
///
/// ISBN lookups ignore hyphens; title lookups match case-insensitive
/// substrings. A failing lookup returns [`Network`](ErrorKind::Network) for
/// everything.
#[derive(Debug, Clone, Default)]
pub struct StaticLookup {
    candidates: Vec<Candidate>,
    failing: bool,
}

impl StaticLookup {
    pub fn new(candidates: Vec<Candidate>) -> Self {
        Self { candidates, failing: false }
    }

    pub fn failing() -> Self {
        Self { candidates: Vec::new(), failing: true }
    }

    fn check(&self) -> Result<()> {
        if self.failing {
            exn::bail!(ErrorKind::Network);
        }
        Ok(())
    }
}

fn digits(isbn: &str) -> String {
    isbn.chars().filter(|c| c.is_ascii_alphanumeric()).collect()
}

#[async_trait]
impl MetadataLookup for StaticLookup {
    async fn try_by_isbn(&self, isbn: &str) -> Result<Vec<Candidate>> {
        self.check()?;
        let isbn = digits(isbn);
        Ok(self.candidates.iter().filter(|c| !isbn.is_empty() && digits(&c.isbn) == isbn).cloned().collect())
    }

    async fn try_by_title(&self, title: &str) -> Result<Vec<Candidate>> {
        self.check()?;
        let title = match_key(title);
        Ok(self.candidates.iter().filter(|c| !title.is_empty() && match_key(&c.title).contains(&title)).cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup() -> StaticLookup {
        StaticLookup::new(vec![Candidate {
            title: "The Dispossessed".to_string(),
            isbn: "978-0061054884".to_string(),
            ..Default::default()
        }])
    }

    #[tokio::test]
    async fn test_isbn() {
        assert_eq!(lookup().by_isbn("9780061054884").await.len(), 1);
        assert!(lookup().by_isbn("").await.is_empty());
    }

    #[tokio::test]
    async fn test_title() {
        assert_eq!(lookup().by_title("dispossessed").await.len(), 1);
        assert!(lookup().by_title("Earthsea").await.is_empty());
    }

    #[tokio::test]
    async fn test_failing() {
        let lookup = StaticLookup::failing();
        assert!(lookup.try_by_title("anything").await.is_err());
        assert!(lookup.by_title("anything").await.is_empty());
    }
}
