//! Command-line client for the book catalog API.
//!
//! - `args`: clap definitions and flag-combination checks.
//! - `api`: the [`api::CatalogApi`] seam and its reqwest implementation.
//! - `fields`: editable fields and input coercion.
//! - `actions`: search/get/update/delete flows.

pub mod actions;
pub mod api;
pub mod args;
pub mod fields;
pub mod output;
pub mod prompt;

#[cfg(test)]
pub(crate) mod testing;
