//! Test doubles for the API and the operator.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::io;

use catalog_app::{Book, BookUpdate, DeleteConfirmation};
use reqwest::StatusCode;

use crate::api::{ApiError, CatalogApi};
use crate::prompt::Prompter;

pub fn dune() -> Book {
    Book {
        id: "b-1".to_string(),
        title: "Dune".to_string(),
        authors: vec!["Frank Herbert".to_string(), "Brian Herbert".to_string()],
        average_rating: 4.8,
        isbn: "0441013597".to_string(),
        isbn13: "9780441013593".to_string(),
        language_code: "eng".to_string(),
        num_pages: 412,
        ratings_count: 1200,
        text_reviews_count: 85,
        publication_date: "1965-08-01".to_string(),
        publisher: "Chilton Books".to_string(),
    }
}

/// Answers prompts from a script; once exhausted every question gets "no".
pub struct ScriptedPrompter {
    answers: VecDeque<String>,
    pub prompts: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            prompts: Vec::new(),
        }
    }
}

impl Prompter for ScriptedPrompter {
    fn confirm(&mut self, prompt: &str) -> io::Result<bool> {
        self.prompts.push(prompt.to_string());
        Ok(self.answers.pop_front().is_some_and(|a| a == "y"))
    }

    fn input(&mut self, prompt: &str) -> io::Result<String> {
        self.prompts.push(prompt.to_string());
        self.answers
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "script exhausted"))
    }
}

/// In-memory catalog that records each call it receives.
#[derive(Default)]
pub struct FakeApi {
    books: RefCell<Vec<Book>>,
    calls: RefCell<Vec<String>>,
    failures: HashMap<&'static str, fn() -> ApiError>,
}

impl FakeApi {
    pub fn with_books(books: impl IntoIterator<Item = Book>) -> Self {
        Self {
            books: RefCell::new(books.into_iter().collect()),
            ..Self::default()
        }
    }

    /// Make every `operation` call ("list", "get", "update" or "delete")
    /// fail with the error `make` builds.
    pub fn failing(mut self, operation: &'static str, make: fn() -> ApiError) -> Self {
        self.failures.insert(operation, make);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn book(&self, id: &str) -> Option<Book> {
        self.books.borrow().iter().find(|b| b.id == id).cloned()
    }

    fn record(&self, operation: &'static str, target: &str) -> Result<(), ApiError> {
        self.calls.borrow_mut().push(format!("{operation} {target}"));
        match self.failures.get(operation) {
            Some(make) => Err(make()),
            None => Ok(()),
        }
    }
}

pub fn server_error() -> ApiError {
    ApiError::Status {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        message: "store unavailable".to_string(),
    }
}

/// A real `reqwest` error, built without touching the network.
pub fn transport_error() -> ApiError {
    let error = reqwest::blocking::Client::new()
        .get("not a url")
        .send()
        .unwrap_err();
    ApiError::Transport(error)
}

fn not_found(id: &str) -> ApiError {
    ApiError::NotFound(format!("Book with ID {id} not found"))
}

impl CatalogApi for FakeApi {
    fn list_books(&self, min_rating: Option<f64>) -> Result<Vec<Book>, ApiError> {
        self.record("list", &format!("{min_rating:?}"))?;
        let min = min_rating.unwrap_or(0.0);
        Ok(self
            .books
            .borrow()
            .iter()
            .filter(|b| b.average_rating >= min)
            .cloned()
            .collect())
    }

    fn get_book(&self, id: &str) -> Result<Book, ApiError> {
        self.record("get", id)?;
        self.book(id).ok_or_else(|| not_found(id))
    }

    fn update_book(&self, id: &str, update: &BookUpdate) -> Result<Book, ApiError> {
        self.record("update", id)?;
        let mut books = self.books.borrow_mut();
        let book = books
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| not_found(id))?;
        book.apply(update.clone());
        Ok(book.clone())
    }

    fn delete_book(&self, id: &str) -> Result<DeleteConfirmation, ApiError> {
        self.record("delete", id)?;
        let mut books = self.books.borrow_mut();
        let position = books
            .iter()
            .position(|b| b.id == id)
            .ok_or_else(|| not_found(id))?;
        books.remove(position);
        Ok(DeleteConfirmation::for_id(id))
    }
}
