//! Books repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{or_conflict, AppError, AppResult},
    models::book::{Book, BookQuery, CreateBook},
    policy::PolicyError,
};

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get book by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Book> {
        sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// Check if an ISBN is already used by another book
    pub async fn isbn_exists(&self, isbn: &str, exclude_id: Option<i32>) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM books WHERE isbn = $1 AND ($2::INTEGER IS NULL OR id != $2))",
        )
        .bind(isbn)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    /// Search books by availability and free text
    pub async fn search(&self, query: &BookQuery) -> AppResult<Vec<Book>> {
        let pattern = query
            .search
            .as_ref()
            .map(|s| format!("%{}%", s.to_lowercase()));

        let books = sqlx::query_as::<_, Book>(
            r#"
            SELECT * FROM books
            WHERE ($1::BOOLEAN IS NULL OR available = $1)
              AND ($2::TEXT IS NULL
                   OR LOWER(title) LIKE $2
                   OR LOWER(author) LIKE $2
                   OR isbn LIKE $2)
            ORDER BY title
            "#,
        )
        .bind(query.available)
        .bind(pattern)
        .fetch_all(&self.pool)
        .await?;

        Ok(books)
    }

    /// Books with the given availability
    pub async fn list_by_availability(&self, available: bool) -> AppResult<Vec<Book>> {
        self.search(&BookQuery {
            available: Some(available),
            search: None,
        })
        .await
    }

    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Create a new book
    pub async fn create(&self, book: &CreateBook) -> AppResult<Book> {
        let created = sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (title, author, isbn, available, publication_date, description)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.isbn)
        .bind(book.available)
        .bind(book.publication_date)
        .bind(&book.description)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| or_conflict(e, PolicyError::DuplicateIsbn(book.isbn.clone())))?;

        Ok(created)
    }

    /// Persist every column of an existing book
    pub async fn update(&self, book: &Book) -> AppResult<Book> {
        let updated = sqlx::query_as::<_, Book>(
            r#"
            UPDATE books
            SET title = $2, author = $3, isbn = $4, available = $5,
                publication_date = $6, description = $7
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(book.id)
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.isbn)
        .bind(book.available)
        .bind(book.publication_date)
        .bind(&book.description)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| or_conflict(e, PolicyError::DuplicateIsbn(book.isbn.clone())))?
        .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", book.id)))?;

        Ok(updated)
    }

    /// Delete a book, cascading to its loans and reservations
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book with id {} not found", id)));
        }
        Ok(())
    }
}
