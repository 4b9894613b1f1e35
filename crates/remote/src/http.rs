//! REST/JSON remote catalog client.

use crate::RemoteCatalog;
use crate::error::{ErrorKind, Result};
use async_trait::async_trait;
use exn::ResultExt;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use shelf_models::{Author, AuthorId, Book, BookId, NewAuthor, NewBook};
use std::time::Duration;

/// Remote catalog reached over HTTP.
///
/// Resources live at `{base}/authors` and `{base}/books`: `GET` lists, `GET
/// /{id}` fetches one, `POST` creates, `PUT /{id}` updates and `DELETE /{id}`
/// removes. Any non-2xx response is an error.
#[derive(Debug, Clone)]
pub struct HttpCatalog {
    client: Client,
    base_url: String,
}

impl HttpCatalog {
    /// # Errors
    ///
    /// Returns [`Client`](ErrorKind::Client) if the HTTP client cannot be
    /// constructed.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .or_raise(|| ErrorKind::Client)?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    fn url(&self, resource: &str, id: Option<u64>) -> String {
        match id {
            Some(id) => format!("{}/{resource}/{id}", self.base_url),
            None => format!("{}/{resource}", self.base_url),
        }
    }

    fn classify(err: &reqwest::Error) -> ErrorKind {
        if let Some(status) = err.status() {
            ErrorKind::Status(status.as_u16())
        } else if err.is_timeout() {
            ErrorKind::Timeout
        } else if err.is_decode() {
            ErrorKind::Decode
        } else {
            ErrorKind::Network
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<reqwest::Response> {
        let response = request.send().await.and_then(reqwest::Response::error_for_status);
        match response {
            Ok(response) => Ok(response),
            Err(e) => {
                let kind = Self::classify(&e);
                tracing::debug!(error = %e, "Remote catalog request failed");
                Err(e).or_raise(|| kind)
            },
        }
    }

    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = self.send(request).await?;
        response.json().await.or_raise(|| ErrorKind::Decode)
    }
}

#[async_trait]
impl RemoteCatalog for HttpCatalog {
    fn name(&self) -> &str {
        &self.base_url
    }

    async fn list_authors(&self) -> Result<Vec<Author>> {
        self.fetch(self.client.get(self.url("authors", None))).await
    }

    async fn get_author(&self, id: AuthorId) -> Result<Author> {
        self.fetch(self.client.get(self.url("authors", Some(id)))).await
    }

    async fn create_author(&self, author: &NewAuthor) -> Result<Author> {
        self.fetch(self.client.post(self.url("authors", None)).json(author)).await
    }

    async fn update_author(&self, id: AuthorId, author: &NewAuthor) -> Result<Author> {
        self.fetch(self.client.put(self.url("authors", Some(id))).json(author)).await
    }

    async fn delete_author(&self, id: AuthorId) -> Result<()> {
        self.send(self.client.delete(self.url("authors", Some(id)))).await?;
        Ok(())
    }

    async fn list_books(&self) -> Result<Vec<Book>> {
        self.fetch(self.client.get(self.url("books", None))).await
    }

    async fn get_book(&self, id: BookId) -> Result<Book> {
        self.fetch(self.client.get(self.url("books", Some(id)))).await
    }

    async fn create_book(&self, book: &NewBook) -> Result<Book> {
        self.fetch(self.client.post(self.url("books", None)).json(book)).await
    }

    async fn update_book(&self, id: BookId, book: &NewBook) -> Result<Book> {
        self.fetch(self.client.put(self.url("books", Some(id))).json(book)).await
    }

    async fn delete_book(&self, id: BookId) -> Result<()> {
        self.send(self.client.delete(self.url("books", Some(id)))).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Answer a single HTTP request with a canned response; the handle yields
    /// the raw request that was received.
    async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                request.extend_from_slice(&buf[..n]);
                let text = String::from_utf8_lossy(&request).to_string();
                if let Some(end) = text.find("\r\n\r\n") {
                    let length = text
                        .lines()
                        .find_map(|l| l.to_ascii_lowercase().strip_prefix("content-length:").map(|v| v.trim().to_string()))
                        .and_then(|v| v.parse::<usize>().ok())
                        .unwrap_or(0);
                    if request.len() >= end + 4 + length {
                        break;
                    }
                }
                if n == 0 {
                    break;
                }
            }
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            String::from_utf8_lossy(&request).to_string()
        });
        (base_url, handle)
    }

    fn catalog(base_url: &str) -> HttpCatalog {
        HttpCatalog::new(base_url, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_urls() {
        let remote = catalog("https://api.example.com/v1/");
        assert_eq!(remote.url("authors", None), "https://api.example.com/v1/authors");
        assert_eq!(remote.url("books", Some(7)), "https://api.example.com/v1/books/7");
    }

    #[tokio::test]
    async fn test_list_books() {
        let (base_url, server) = serve_once("200 OK", r#"[{"id":1,"title":"Kindred","authorId":2}]"#).await;
        let books = catalog(&base_url).list_books().await.unwrap();
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].author_id, 2);
        assert!(server.await.unwrap().starts_with("GET /books HTTP/1.1"));
    }

    #[tokio::test]
    async fn test_create_author_sends_payload_without_id() {
        let (base_url, server) = serve_once("201 Created", r#"{"id":42,"name":"Jane Doe"}"#).await;
        let created = catalog(&base_url).create_author(&NewAuthor::new("Jane Doe")).await.unwrap();
        assert_eq!(created.id, Some(42));
        let request = server.await.unwrap();
        assert!(request.starts_with("POST /authors HTTP/1.1"));
        assert!(request.to_ascii_lowercase().contains("content-type: application/json"));
        assert!(request.contains(r#""name":"Jane Doe""#));
        assert!(!request.contains(r#""id""#));
    }

    #[tokio::test]
    async fn test_update_puts_to_id() {
        let (base_url, server) = serve_once("200 OK", r#"{"title":"Renamed","authorId":1}"#).await;
        let updated = catalog(&base_url).update_book(9, &NewBook::new("Renamed", 1)).await.unwrap();
        assert_eq!(updated.id, None);
        assert!(server.await.unwrap().starts_with("PUT /books/9 HTTP/1.1"));
    }

    #[tokio::test]
    async fn test_delete_ignores_body() {
        let (base_url, server) = serve_once("204 No Content", "").await;
        catalog(&base_url).delete_author(3).await.unwrap();
        assert!(server.await.unwrap().starts_with("DELETE /authors/3 HTTP/1.1"));
    }

    #[tokio::test]
    async fn test_non_success_status() {
        let (base_url, _server) = serve_once("503 Service Unavailable", r#"{"error":"down"}"#).await;
        let err = catalog(&base_url).list_authors().await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::Status(503)));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_bad_body() {
        let (base_url, _server) = serve_once("200 OK", r#"{"not":"a list"}"#).await;
        let err = catalog(&base_url).list_authors().await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::Decode));
    }

    #[tokio::test]
    async fn test_unreachable() {
        // Bind then drop to get a port nothing listens on.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);
        let err = catalog(&base_url).list_books().await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::Network));
    }
}
