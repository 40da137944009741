//! Book (catalog entry) model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Book model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author: String,
    /// ISBN, unique across the catalog
    pub isbn: String,
    /// False while the book is out on loan
    pub available: bool,
    pub publication_date: Option<NaiveDate>,
    pub description: Option<String>,
}

/// Book query parameters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct BookQuery {
    /// Only books with this availability
    pub available: Option<bool>,
    /// Search in title, author and ISBN
    pub search: Option<String>,
}

fn default_available() -> bool {
    true
}

/// Create book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[validate(length(min = 1, max = 200, message = "Title must be 1 to 200 characters"))]
    pub title: String,
    #[validate(length(min = 1, max = 100, message = "Author must be 1 to 100 characters"))]
    pub author: String,
    #[validate(length(min = 1, max = 20, message = "ISBN must be 1 to 20 characters"))]
    pub isbn: String,
    #[serde(default = "default_available")]
    pub available: bool,
    pub publication_date: Option<NaiveDate>,
    pub description: Option<String>,
}

/// Update book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateBook {
    #[validate(length(min = 1, max = 200, message = "Title must be 1 to 200 characters"))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 100, message = "Author must be 1 to 100 characters"))]
    pub author: Option<String>,
    #[validate(length(min = 1, max = 20, message = "ISBN must be 1 to 20 characters"))]
    pub isbn: Option<String>,
    pub available: Option<bool>,
    pub publication_date: Option<NaiveDate>,
    pub description: Option<String>,
}

impl Book {
    /// Apply an update request onto the stored record
    pub fn apply(&mut self, update: UpdateBook) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(author) = update.author {
            self.author = author;
        }
        if let Some(isbn) = update.isbn {
            self.isbn = isbn;
        }
        if let Some(available) = update.available {
            self.available = available;
        }
        if update.publication_date.is_some() {
            self.publication_date = update.publication_date;
        }
        if update.description.is_some() {
            self.description = update.description;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_book_defaults_to_available() {
        let book: CreateBook = serde_json::from_str(
            r#"{"title": "Ficciones", "author": "Jorge Luis Borges", "isbn": "9788420633121"}"#,
        )
        .unwrap();
        assert!(book.available);
        assert!(book.validate().is_ok());
    }

    #[test]
    fn test_create_book_rejects_long_isbn() {
        let book: CreateBook = serde_json::from_str(
            r#"{"title": "Ficciones", "author": "Borges", "isbn": "978842063312197884206"}"#,
        )
        .unwrap();
        assert!(book.validate().is_err());
    }
}
