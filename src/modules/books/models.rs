use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Highest allowed `average_rating`.
pub const MAX_RATING: f64 = 5.0;

/// A stored book document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    /// Store identifier; never changes after creation
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub authors: Vec<String>,
    /// Mean reader rating, 0 to 5
    #[serde(default)]
    pub average_rating: f64,
    #[serde(default)]
    pub isbn: String,
    #[serde(default)]
    pub isbn13: String,
    #[serde(default)]
    pub language_code: String,
    #[serde(default)]
    pub num_pages: u64,
    #[serde(default)]
    pub ratings_count: u64,
    #[serde(default)]
    pub text_reviews_count: u64,
    #[serde(default)]
    pub publication_date: String,
    #[serde(default)]
    pub publisher: String,
}

/// Request model for creating a book. `_id` is generated when omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewBook {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub average_rating: f64,
    #[serde(default)]
    pub isbn: String,
    #[serde(default)]
    pub isbn13: String,
    #[serde(default)]
    pub language_code: String,
    #[serde(default)]
    pub num_pages: u64,
    #[serde(default)]
    pub ratings_count: u64,
    #[serde(default)]
    pub text_reviews_count: u64,
    #[serde(default)]
    pub publication_date: String,
    #[serde(default)]
    pub publisher: String,
}

/// Fields to merge onto a stored book. The identifier is not a member.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authors: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isbn13: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_pages: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ratings_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_reviews_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publication_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
}

/// Payload returned by a successful delete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteConfirmation {
    pub message: String,
}

impl DeleteConfirmation {
    pub fn for_id(id: &str) -> Self {
        Self {
            message: format!("Book with ID {id} has been deleted successfully"),
        }
    }
}

impl Book {
    /// Overwrite every field present in `update`; absent fields are kept.
    pub fn apply(&mut self, update: BookUpdate) {
        let BookUpdate {
            title,
            authors,
            average_rating,
            isbn,
            isbn13,
            language_code,
            num_pages,
            ratings_count,
            text_reviews_count,
            publication_date,
            publisher,
        } = update;

        if let Some(v) = title {
            self.title = v;
        }
        if let Some(v) = authors {
            self.authors = v;
        }
        if let Some(v) = average_rating {
            self.average_rating = v;
        }
        if let Some(v) = isbn {
            self.isbn = v;
        }
        if let Some(v) = isbn13 {
            self.isbn13 = v;
        }
        if let Some(v) = language_code {
            self.language_code = v;
        }
        if let Some(v) = num_pages {
            self.num_pages = v;
        }
        if let Some(v) = ratings_count {
            self.ratings_count = v;
        }
        if let Some(v) = text_reviews_count {
            self.text_reviews_count = v;
        }
        if let Some(v) = publication_date {
            self.publication_date = v;
        }
        if let Some(v) = publisher {
            self.publisher = v;
        }
    }
}

/// Whether `rating` lies within the 0 to 5 scale.
pub fn rating_in_range(rating: f64) -> bool {
    rating.is_finite() && (0.0..=MAX_RATING).contains(&rating)
}

fn rating_issue(rating: f64) -> Option<Value> {
    (!rating_in_range(rating)).then(|| {
        json!({
            "field": "average_rating",
            "error": format!("must be between 0 and {MAX_RATING}"),
        })
    })
}

fn title_issue(title: &str) -> Option<Value> {
    title
        .trim()
        .is_empty()
        .then(|| json!({"field": "title", "error": "must not be blank"}))
}

impl NewBook {
    /// Field problems that make this payload unacceptable.
    pub fn validation_issues(&self) -> Vec<Value> {
        [title_issue(&self.title), rating_issue(self.average_rating)]
            .into_iter()
            .flatten()
            .collect()
    }
}

impl BookUpdate {
    /// Field problems that make this payload unacceptable.
    pub fn validation_issues(&self) -> Vec<Value> {
        [
            self.title.as_deref().and_then(title_issue),
            self.average_rating.and_then(rating_issue),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}
