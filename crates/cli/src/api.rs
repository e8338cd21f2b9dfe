//! Blocking HTTP client for the catalog API.

use catalog_app::{Book, BookUpdate, DeleteConfirmation};
use reqwest::blocking::{Client, Response};
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),
    #[error("{status}: {message}")]
    Status { status: StatusCode, message: String },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("invalid API URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// Operations the client performs against the catalog.
pub trait CatalogApi {
    fn list_books(&self, min_rating: Option<f64>) -> Result<Vec<Book>, ApiError>;
    fn get_book(&self, id: &str) -> Result<Book, ApiError>;
    fn update_book(&self, id: &str, update: &BookUpdate) -> Result<Book, ApiError>;
    fn delete_book(&self, id: &str) -> Result<DeleteConfirmation, ApiError>;
}

/// reqwest-backed [`CatalogApi`] rooted at the service base URL.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url).map_err(|e| ApiError::InvalidUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl {
                url: base_url.to_string(),
                reason: "not a base URL".to_string(),
            });
        }

        let client = Client::builder().build()?;
        Ok(Self { client, base_url })
    }

    /// `<base>/book` or `<base>/book/<id>`, with the id percent-encoded.
    pub fn book_url(&self, id: Option<&str>) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("book");
            if let Some(id) = id {
                segments.push(id);
            }
        }
        url
    }
}

/// Pull the human-readable message out of an error body.
fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| {
            if body.is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            } else {
                body.to_string()
            }
        })
}

fn parse<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json()?);
    }

    let body = response.text().unwrap_or_default();
    let message = error_message(status, &body);
    if status == StatusCode::NOT_FOUND {
        Err(ApiError::NotFound(message))
    } else {
        Err(ApiError::Status { status, message })
    }
}

impl CatalogApi for ApiClient {
    fn list_books(&self, min_rating: Option<f64>) -> Result<Vec<Book>, ApiError> {
        let mut request = self.client.get(self.book_url(None));
        if let Some(rating) = min_rating {
            request = request.query(&[("rating", rating)]);
        }
        parse(request.send()?)
    }

    fn get_book(&self, id: &str) -> Result<Book, ApiError> {
        parse(self.client.get(self.book_url(Some(id))).send()?)
    }

    fn update_book(&self, id: &str, update: &BookUpdate) -> Result<Book, ApiError> {
        parse(
            self.client
                .put(self.book_url(Some(id)))
                .json(update)
                .send()?,
        )
    }

    fn delete_book(&self, id: &str) -> Result<DeleteConfirmation, ApiError> {
        parse(self.client.delete(self.book_url(Some(id))).send()?)
    }
}
