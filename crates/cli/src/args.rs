//! Command-line arguments and the checks clap cannot express.
use clap::{Parser, ValueEnum};
use thiserror::Error;

/// Command-line client for the book catalog.
#[derive(Debug, Parser)]
#[command(
    name = "client",
    about = "Search, inspect, edit and delete books through the catalog API",
    version
)]
pub struct Cli {
    /// Action to perform on the books catalog.
    #[arg(value_enum)]
    pub action: Action,

    /// Book ID the action applies to (get, update, delete).
    #[arg(short = 'i', long)]
    pub id: Option<String>,

    /// Only list books whose average rating is at or above this value, 0 to 5 (search).
    #[arg(short = 'r', long)]
    pub rating: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Action {
    Search,
    Get,
    Update,
    Delete,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Action::Search => "search",
            Action::Get => "get",
            Action::Update => "update",
            Action::Delete => "delete",
        };
        f.write_str(name)
    }
}

/// A validated invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Search { rating: Option<f64> },
    Get { id: String },
    Update { id: String },
    Delete { id: String },
}

#[derive(Error, Debug, PartialEq)]
pub enum UsageError {
    #[error("Can't use arg id with action {0}")]
    IdNotAllowed(Action),
    #[error("Rating arg can only be used with search action")]
    RatingNotAllowed,
    #[error("Action {0} requires an id (-i/--id)")]
    MissingId(Action),
}

impl Cli {
    /// Reject flag combinations that do not fit the action.
    pub fn command(self) -> Result<Command, UsageError> {
        if self.id.is_some() && self.action == Action::Search {
            return Err(UsageError::IdNotAllowed(self.action));
        }
        if self.rating.is_some() && self.action != Action::Search {
            return Err(UsageError::RatingNotAllowed);
        }

        let id = || self.id.clone().ok_or(UsageError::MissingId(self.action));
        Ok(match self.action {
            Action::Search => Command::Search {
                rating: self.rating,
            },
            Action::Get => Command::Get { id: id()? },
            Action::Update => Command::Update { id: id()? },
            Action::Delete => Command::Delete { id: id()? },
        })
    }
}
