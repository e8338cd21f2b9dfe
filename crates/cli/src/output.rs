use std::io::Write;

use anyhow::Context;
use catalog_app::Book;
use serde_json::Value;

use crate::fields::BOOK_FIELDS;

const SEPARATOR_WIDTH: usize = 50;

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(render).collect::<Vec<_>>().join(", "),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Print `_id` and every book field as `name: value`, then a separator line.
pub fn print_book(out: &mut dyn Write, book: &Book) -> anyhow::Result<()> {
    let value = serde_json::to_value(book).context("failed to render book")?;

    writeln!(out, "_id: {}", book.id)?;
    for field in BOOK_FIELDS {
        writeln!(out, "{}: {}", field.name, render(&value[field.name]))?;
    }
    writeln!(out, "{}", "=".repeat(SEPARATOR_WIDTH))?;
    Ok(())
}
