//! Google Books volumes API client.

use crate::candidate::{leading_year, secure_url};
use crate::error::{ErrorKind, Result};
use crate::{Candidate, MetadataLookup};
use async_trait::async_trait;
use exn::ResultExt;
use reqwest::Client;
use serde::Deserialize;
use shelf_models::BookMetadata;
use std::time::Duration;

#[derive(Debug, Default, Deserialize)]
struct VolumesResponse {
    #[serde(default)]
    items: Vec<Volume>,
}

#[derive(Debug, Default, Deserialize)]
struct Volume {
    #[serde(default)]
    id: String,
    #[serde(default, rename = "volumeInfo")]
    info: VolumeInfo,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VolumeInfo {
    #[serde(default)]
    title: String,
    #[serde(default)]
    authors: Vec<String>,
    published_date: Option<String>,
    #[serde(default)]
    description: String,
    #[serde(default)]
    industry_identifiers: Vec<IndustryIdentifier>,
    page_count: Option<u32>,
    #[serde(default)]
    categories: Vec<String>,
    language: Option<String>,
    image_links: Option<ImageLinks>,
    preview_link: Option<String>,
    info_link: Option<String>,
}

#[derive(Debug, Deserialize)]
struct IndustryIdentifier {
    #[serde(rename = "type")]
    kind: String,
    identifier: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImageLinks {
    thumbnail: Option<String>,
    small_thumbnail: Option<String>,
}

impl VolumeInfo {
    fn identifier(&self, kind: &str) -> Option<&str> {
        self.industry_identifiers.iter().find(|i| i.kind == kind).map(|i| i.identifier.as_str())
    }

    fn isbn(&self) -> Option<&str> {
        self.identifier("ISBN_13").or_else(|| self.identifier("ISBN_10"))
    }
}

impl From<Volume> for Candidate {
    fn from(volume: Volume) -> Self {
        let info = volume.info;
        let isbn = info.isbn().unwrap_or_default().to_string();
        let links = info.image_links.unwrap_or_default();
        let thumbnail = links.thumbnail.or(links.small_thumbnail);
        Candidate {
            source_id: volume.id,
            title: info.title,
            authors: info.authors,
            description: info.description,
            isbn,
            published_year: info.published_date.as_deref().map(leading_year).unwrap_or(0),
            published_date: info.published_date,
            cover_url: thumbnail.as_deref().map(secure_url).unwrap_or_default(),
            metadata: BookMetadata {
                page_count: info.page_count,
                language: info.language,
                categories: info.categories,
                info_link: info.info_link,
                preview_link: info.preview_link,
                published_date: None,
                thumbnail,
            },
        }
    }
}

/// Client for the Google Books volumes search.
#[derive(Debug, Clone)]
pub struct GoogleBooks {
    client: Client,
    base_url: String,
    country: String,
    max_results: u8,
}

impl GoogleBooks {
    /// # Errors
    ///
    /// Returns [`Client`](ErrorKind::Client) if the HTTP client cannot be
    /// constructed.
    pub fn new(base_url: impl Into<String>, country: impl Into<String>, max_results: u8, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build().or_raise(|| ErrorKind::Client)?;
        Ok(Self { client, base_url: base_url.into(), country: country.into(), max_results })
    }

    async fn search(&self, query: String) -> Result<Vec<Candidate>> {
        let max_results = self.max_results.to_string();
        let request = self
            .client
            .get(&self.base_url)
            .query(&[("q", query.as_str()), ("country", self.country.as_str()), ("maxResults", max_results.as_str())]);
        let response = request.send().await.or_raise(|| ErrorKind::Network)?;
        let status = response.status();
        if !status.is_success() {
            exn::bail!(ErrorKind::Status(status.as_u16()));
        }
        let body: VolumesResponse = response.json().await.or_raise(|| ErrorKind::Decode)?;
        tracing::debug!(query = %query, results = body.items.len(), "Metadata lookup");
        Ok(body.items.into_iter().map(Candidate::from).collect())
    }
}

#[async_trait]
impl MetadataLookup for GoogleBooks {
    async fn try_by_isbn(&self, isbn: &str) -> Result<Vec<Candidate>> {
        let isbn: String = isbn.chars().filter(|c| !c.is_whitespace() && *c != '-').collect();
        if isbn.is_empty() {
            return Ok(Vec::new());
        }
        self.search(format!("isbn:{isbn}")).await
    }

    async fn try_by_title(&self, title: &str) -> Result<Vec<Candidate>> {
        let title = title.trim();
        if title.is_empty() {
            return Ok(Vec::new());
        }
        self.search(format!("intitle:{title}")).await
    }
}
