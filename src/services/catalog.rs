//! Catalog management service

use validator::Validate;

use crate::{
    error::AppResult,
    models::book::{Book, BookQuery, CreateBook, UpdateBook},
    policy::PolicyError,
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Search books with filters
    pub async fn search_books(&self, query: &BookQuery) -> AppResult<Vec<Book>> {
        self.repository.books.search(query).await
    }

    pub async fn get_book(&self, id: i32) -> AppResult<Book> {
        self.repository.books.get_by_id(id).await
    }

    /// Add a book to the catalog. The ISBN must be unique.
    pub async fn create_book(&self, book: CreateBook) -> AppResult<Book> {
        book.validate()?;

        if self.repository.books.isbn_exists(&book.isbn, None).await? {
            return Err(PolicyError::DuplicateIsbn(book.isbn).into());
        }

        let created = self.repository.books.create(&book).await?;
        tracing::info!("Catalog: added '{}' (ISBN {})", created.title, created.isbn);
        Ok(created)
    }

    pub async fn update_book(&self, id: i32, update: UpdateBook) -> AppResult<Book> {
        update.validate()?;

        let mut book = self.repository.books.get_by_id(id).await?;
        if let Some(ref isbn) = update.isbn {
            if self.repository.books.isbn_exists(isbn, Some(id)).await? {
                return Err(PolicyError::DuplicateIsbn(isbn.clone()).into());
            }
        }

        book.apply(update);
        self.repository.books.update(&book).await
    }

    pub async fn delete_book(&self, id: i32) -> AppResult<()> {
        self.repository.books.delete(id).await?;
        tracing::info!("Catalog: deleted book id={}", id);
        Ok(())
    }
}
