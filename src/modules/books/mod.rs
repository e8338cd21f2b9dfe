pub mod models;
pub mod repository;
pub mod routes;

use anyhow::Context;
use async_trait::async_trait;
use axum::Router;
use catalog_db::Store;
use catalog_kernel::{InitCtx, Module};

use repository::BookRepository;

/// Book catalog module: CRUD over the books collection, mounted at `/book`
pub struct BooksModule {
    repository: BookRepository,
}

impl BooksModule {
    pub fn new(store: Store, collection: impl Into<String>) -> Self {
        Self {
            repository: BookRepository::new(store, collection),
        }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    fn base_path(&self) -> String {
        "/book".to_string()
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        let stored = self
            .repository
            .count()
            .await
            .context("failed to count stored books")?;

        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            collection = %ctx.settings.database.collection,
            stored,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.repository.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let error = json_response("Book not found", "ErrorResponse");
        let invalid = json_response("Invalid book fields", "ErrorResponse");
        let book = |description: &str| json_response(description, "Book");
        let id_param = serde_json::json!([{
            "name": "id",
            "in": "path",
            "required": true,
            "schema": { "type": "string" }
        }]);

        Some(serde_json::json!({
            "paths": {
                "/": {
                    "post": {
                        "summary": "Post a new book",
                        "tags": ["Books"],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/NewBook" }
                                }
                            }
                        },
                        "responses": {
                            "201": book("Created book"),
                            "409": json_response("Identifier already in use", "ErrorResponse"),
                            "422": invalid.clone()
                        }
                    },
                    "get": {
                        "summary": "Get all books",
                        "tags": ["Books"],
                        "parameters": [{
                            "name": "rating",
                            "in": "query",
                            "required": false,
                            "description": "Minimum average rating (0 to 5)",
                            "schema": { "type": "number", "format": "double", "default": 0 }
                        }],
                        "responses": {
                            "200": {
                                "description": "Books rated at least `rating`",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "array",
                                            "items": { "$ref": "#/components/schemas/Book" }
                                        }
                                    }
                                }
                            }
                        }
                    }
                },
                "/{id}": {
                    "get": {
                        "summary": "Get a single book by id",
                        "tags": ["Books"],
                        "parameters": id_param.clone(),
                        "responses": {
                            "200": book("Book"),
                            "404": error.clone()
                        }
                    },
                    "put": {
                        "summary": "Update a book by id",
                        "tags": ["Books"],
                        "parameters": id_param.clone(),
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/BookUpdate" }
                                }
                            }
                        },
                        "responses": {
                            "200": book("Updated book"),
                            "404": error.clone(),
                            "422": invalid
                        }
                    },
                    "delete": {
                        "summary": "Delete a book",
                        "tags": ["Books"],
                        "parameters": id_param,
                        "responses": {
                            "200": json_response("Deletion confirmation", "DeleteConfirmation"),
                            "404": error
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Book": book_schema(true),
                    "NewBook": book_schema(false),
                    "BookUpdate": {
                        "type": "object",
                        "description": "Any subset of book fields; `_id` is ignored",
                        "properties": book_properties()
                    },
                    "DeleteConfirmation": {
                        "type": "object",
                        "properties": { "message": { "type": "string" } },
                        "required": ["message"]
                    }
                }
            }
        }))
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

/// JSON response object whose body is the named component schema.
fn json_response(description: &str, schema: &str) -> serde_json::Value {
    serde_json::json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": { "$ref": format!("#/components/schemas/{schema}") }
            }
        }
    })
}

fn book_properties() -> serde_json::Value {
    let text = serde_json::json!({ "type": "string" });
    let count = serde_json::json!({ "type": "integer", "format": "int64", "minimum": 0 });
    serde_json::json!({
        "title": text,
        "authors": { "type": "array", "items": { "type": "string" } },
        "average_rating": { "type": "number", "format": "double", "minimum": 0, "maximum": 5 },
        "isbn": text,
        "isbn13": text,
        "language_code": text,
        "num_pages": count,
        "ratings_count": count,
        "text_reviews_count": count,
        "publication_date": text,
        "publisher": text
    })
}

fn book_schema(stored: bool) -> serde_json::Value {
    let mut properties = book_properties();
    properties["_id"] = serde_json::json!({
        "type": "string",
        "description": "Store identifier, generated when omitted on create"
    });
    let required = if stored { vec!["_id", "title"] } else { vec!["title"] };
    serde_json::json!({
        "type": "object",
        "properties": properties,
        "required": required
    })
}

/// Create a new instance of the books module
pub fn create_module(store: Store, collection: impl Into<String>) -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(BooksModule::new(store, collection))
}
