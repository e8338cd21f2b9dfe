//! The four client actions. Each prints to `out` and logs through `tracing`.
//!
//! Answers from the service (not found, rejected input, server errors) are
//! printed and the action ends normally. A request that never got an answer
//! aborts the command.

use std::io::Write;

use anyhow::{anyhow, Context};
use catalog_app::{Book, BookUpdate};
use serde_json::Value;

use crate::api::{ApiError, CatalogApi};
use crate::fields::{Field, BOOK_FIELDS};
use crate::output::print_book;
use crate::prompt::Prompter;

/// Result of the per-field dialogue.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldEdit {
    Keep,
    Accept(Value),
}

fn report(error: ApiError, out: &mut dyn Write) -> anyhow::Result<()> {
    if let ApiError::Transport(_) = error {
        return Err(error.into());
    }
    writeln!(out, "Error: {error}")?;
    Ok(())
}

/// List books rated at least `rating`.
pub fn search(api: &dyn CatalogApi, rating: Option<f64>, out: &mut dyn Write) -> anyhow::Result<()> {
    match api.list_books(rating) {
        Ok(books) => {
            tracing::info!(rating = ?rating, count = books.len(), "books listed");
            for book in &books {
                print_book(out, book)?;
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "search failed");
            report(e, out)?;
        }
    }
    Ok(())
}

pub fn get(api: &dyn CatalogApi, id: &str, out: &mut dyn Write) -> anyhow::Result<()> {
    match api.get_book(id) {
        Ok(book) => print_book(out, &book)?,
        Err(e) => {
            tracing::error!(book_id = id, error = %e, "get failed");
            report(e, out)?;
        }
    }
    Ok(())
}

/// Ask whether to change one field; reask after input that does not parse.
pub fn edit_field(
    field: &Field,
    prompter: &mut dyn Prompter,
    out: &mut dyn Write,
) -> anyhow::Result<FieldEdit> {
    let parse = field.kind.parser();
    loop {
        let wants_edit = prompter
            .confirm(&format!("Do you want to update the value of '{}'?", field.name))?;
        if !wants_edit {
            return Ok(FieldEdit::Keep);
        }

        let raw = prompter.input(&format!("Enter new value for <{}>", field.name))?;
        match parse(&raw) {
            Ok(value) => return Ok(FieldEdit::Accept(value)),
            Err(e) => writeln!(out, "Error: '{}' {e}", field.name)?,
        }
    }
}

/// Walk every field of `book`. Returns the fully merged record when at
/// least one field was accepted, `None` when all were kept.
pub fn collect_changes(
    book: &Book,
    prompter: &mut dyn Prompter,
    out: &mut dyn Write,
) -> anyhow::Result<Option<BookUpdate>> {
    let Value::Object(mut doc) = serde_json::to_value(book)? else {
        return Err(anyhow!("book did not serialize to an object"));
    };
    doc.remove("_id");

    let mut changed = false;
    for field in BOOK_FIELDS {
        if let FieldEdit::Accept(value) = edit_field(field, prompter, out)? {
            doc.insert(field.name.to_string(), value);
            changed = true;
        }
    }

    if !changed {
        return Ok(None);
    }
    let update = serde_json::from_value(Value::Object(doc))
        .context("edited fields do not form a valid book")?;
    Ok(Some(update))
}

pub fn update(
    api: &dyn CatalogApi,
    prompter: &mut dyn Prompter,
    id: &str,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let book = match api.get_book(id) {
        Ok(book) => book,
        Err(e) => {
            tracing::error!(book_id = id, error = %e, "update lookup failed");
            return report(e, out);
        }
    };

    writeln!(out, "Current book details:")?;
    print_book(out, &book)?;

    let Some(changes) = collect_changes(&book, prompter, out)? else {
        writeln!(out, "No changes were made.")?;
        return Ok(());
    };

    match api.update_book(id, &changes) {
        Ok(updated) => {
            tracing::info!(book_id = id, "book updated");
            writeln!(out, "\nBook updated successfully:\n")?;
            print_book(out, &updated)?;
        }
        Err(e) => {
            tracing::error!(book_id = id, error = %e, "update failed");
            report(e, out)?;
        }
    }
    Ok(())
}

/// Show the book, then delete it. A failing delete is returned as an error.
pub fn delete(api: &dyn CatalogApi, id: &str, out: &mut dyn Write) -> anyhow::Result<()> {
    let book = match api.get_book(id) {
        Ok(book) => book,
        Err(e) => {
            tracing::error!(book_id = id, error = %e, "delete lookup failed");
            return report(e, out);
        }
    };

    writeln!(out, "Deleting book with id: {id}\n")?;
    print_book(out, &book)?;

    let confirmation = api
        .delete_book(id)
        .with_context(|| format!("failed to delete book {id}"))?;
    tracing::info!(book_id = id, message = %confirmation.message, "book deleted");
    writeln!(out, "\nBook deleted successfully\n")?;
    Ok(())
}
