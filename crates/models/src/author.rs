use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

pub type AuthorId = u64;

/// A person credited on one or more books.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    /// Assigned by the cache (optimistically) or the remote catalog.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<AuthorId>,
    pub name: String,
    #[serde(default)]
    pub bio: String,
    /// `0` when unknown.
    #[serde(default)]
    pub birth_year: i32,
    #[serde(default)]
    pub country: String,
}
impl Author {
    /// Apply a patch in place (shallow merge).
    pub fn apply(&mut self, patch: &AuthorPatch) {
        patch.apply(self);
    }

    /// Replace this record with `other`, keeping the current identifier if
    /// `other` does not carry one.
    pub fn reconcile(&mut self, other: Author) {
        let id = other.id.or(self.id);
        *self = Author { id, ..other };
    }
}

impl Display for Author {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self.birth_year {
            0 => write!(f, "{}", self.name),
            year => write!(f, "{} (b. {})", self.name, year),
        }
    }
}

/// An author that has not been persisted yet.
///
/// Also the payload sent to the remote catalog on create and update (the
/// identifier travels in the URL, never the body).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAuthor {
    pub name: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub birth_year: i32,
    #[serde(default)]
    pub country: String,
}
impl NewAuthor {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Default::default() }
    }

    pub fn with_id(self, id: AuthorId) -> Author {
        Author {
            id: Some(id),
            name: self.name,
            bio: self.bio,
            birth_year: self.birth_year,
            country: self.country,
        }
    }
}
impl From<&Author> for NewAuthor {
    fn from(author: &Author) -> Self {
        Self {
            name: author.name.clone(),
            bio: author.bio.clone(),
            birth_year: author.birth_year,
            country: author.country.clone(),
        }
    }
}

/// Partial update for an [`Author`]: `Some` fields override, `None` fields
/// are retained.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorPatch {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub birth_year: Option<i32>,
    pub country: Option<String>,
}
impl AuthorPatch {
    pub fn apply(&self, author: &mut Author) {
        if let Some(name) = &self.name {
            author.name.clone_from(name);
        }
        if let Some(bio) = &self.bio {
            author.bio.clone_from(bio);
        }
        if let Some(year) = self.birth_year {
            author.birth_year = year;
        }
        if let Some(country) = &self.country {
            author.country.clone_from(country);
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
impl From<Author> for AuthorPatch {
    fn from(author: Author) -> Self {
        Self {
            name: Some(author.name),
            bio: Some(author.bio),
            birth_year: Some(author.birth_year),
            country: Some(author.country),
        }
    }
}
