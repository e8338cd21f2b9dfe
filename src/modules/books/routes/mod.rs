//! HTTP handlers for the `/book` endpoints.

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use catalog_db::StoreError;
use catalog_http::error::AppError;
use serde::Deserialize;
use serde_json::json;

use super::models::{Book, BookUpdate, DeleteConfirmation, NewBook};
use super::repository::BookRepository;

/// Query parameters accepted by the list endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub rating: f64,
}

pub fn router(repository: BookRepository) -> Router {
    Router::new()
        .route("/", post(create_book).get(list_books))
        .route(
            "/{id}",
            get(find_book).put(update_book).delete(delete_book),
        )
        .with_state(repository)
}

fn not_found(id: &str) -> AppError {
    AppError::not_found(format!("Book with ID {id} not found"))
}

fn store_error(err: StoreError) -> AppError {
    match err {
        StoreError::DuplicateId(id) => AppError::conflict(
            vec![json!({"field": "_id", "value": id})],
            format!("Book with ID {id} already exists"),
        ),
        StoreError::InvalidId => AppError::validation(
            vec![json!({"field": "_id", "error": "must be a string"})],
            "Invalid book identifier",
        ),
        other => AppError::Internal(other.into()),
    }
}

fn reject_invalid(issues: Vec<serde_json::Value>) -> Result<(), AppError> {
    if issues.is_empty() {
        Ok(())
    } else {
        Err(AppError::validation(issues, "Invalid book fields"))
    }
}

async fn create_book(
    State(repository): State<BookRepository>,
    Json(book): Json<NewBook>,
) -> Result<(StatusCode, Json<Book>), AppError> {
    reject_invalid(book.validation_issues())?;

    let created = repository
        .insert(&book)
        .await
        .map_err(store_error)?
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("inserted book could not be read back")))?;

    tracing::info!(book_id = %created.id, "book created");
    Ok((StatusCode::CREATED, Json(created)))
}

async fn list_books(
    State(repository): State<BookRepository>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Vec<Book>>, AppError> {
    let Query(params) = params.map_err(|rejection| AppError::bad_request(rejection.body_text()))?;
    let books = repository.list(params.rating).await.map_err(store_error)?;
    tracing::debug!(rating = params.rating, count = books.len(), "books listed");
    Ok(Json(books))
}

async fn find_book(
    State(repository): State<BookRepository>,
    Path(id): Path<String>,
) -> Result<Json<Book>, AppError> {
    repository
        .find(&id)
        .await
        .map_err(store_error)?
        .map(Json)
        .ok_or_else(|| not_found(&id))
}

async fn update_book(
    State(repository): State<BookRepository>,
    Path(id): Path<String>,
    Json(update): Json<BookUpdate>,
) -> Result<Json<Book>, AppError> {
    reject_invalid(update.validation_issues())?;

    let mut book = repository
        .find(&id)
        .await
        .map_err(store_error)?
        .ok_or_else(|| not_found(&id))?;

    book.apply(update);

    if !repository.replace(&book).await.map_err(store_error)? {
        return Err(not_found(&id));
    }

    tracing::info!(book_id = %id, "book updated");
    Ok(Json(book))
}

async fn delete_book(
    State(repository): State<BookRepository>,
    Path(id): Path<String>,
) -> Result<Json<DeleteConfirmation>, AppError> {
    if !repository.delete(&id).await.map_err(store_error)? {
        return Err(not_found(&id));
    }

    tracing::info!(book_id = %id, "book deleted");
    Ok(Json(DeleteConfirmation::for_id(&id)))
}
