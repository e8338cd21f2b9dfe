//! Book catalog service library
//!
//! Provides the catalog modules; the `catalog-app` binary wires them into the HTTP server.

pub mod modules;

pub use modules::books::models::{Book, BookUpdate, DeleteConfirmation, NewBook};
