use crate::{Error, error::Result, parse_id};
use futures::{StreamExt as _, TryStreamExt as _};
use garde::Validate;
use libcat_types::STATUS_AVAILABLE;
use serde::{Deserialize, Serialize};
use sqlx::Pool;
use tracing::debug;

#[derive(Debug, Serialize, Deserialize, Clone, Validate)]
pub struct CreateBook {
    #[garde(length(min = 1, max = 511))]
    pub title: String,
    #[garde(length(min = 1, max = 255))]
    pub author: String,
    #[serde(rename = "ISBN")]
    #[garde(length(min = 1, max = 32))]
    pub isbn: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, sqlx::FromRow)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    #[serde(rename = "ISBN")]
    pub isbn: String,
    pub status: String,
    pub borrower: Option<String>,
}

impl Book {
    pub fn is_available(&self) -> bool {
        self.status == STATUS_AVAILABLE
    }
}

pub type BookRepository = BookRepositoryImpl<Pool<crate::ChosenDB>>;

pub struct BookRepositoryImpl<E> {
    executor: E,
}

impl<'c, E> BookRepositoryImpl<E>
where
    for<'a> &'a E: sqlx::Executor<'c, Database = crate::ChosenDB>,
{
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    /// New book starts as available with no borrower, fails on duplicate ISBN
    pub async fn create(&self, payload: CreateBook) -> Result<Book> {
        let result = sqlx::query("INSERT INTO book (title, author, isbn) VALUES (?, ?, ?)")
            .bind(&payload.title)
            .bind(&payload.author)
            .bind(&payload.isbn)
            .execute(&self.executor)
            .await?;

        let id = result.last_insert_rowid();
        debug!("Created book {id} with ISBN {}", payload.isbn);
        self.get(id).await
    }

    pub async fn get(&self, id: i64) -> Result<Book> {
        const SQL: &str = "SELECT id, title, author, isbn, status, borrower FROM book WHERE id = ?";
        sqlx::query_as::<_, Book>(SQL)
            .bind(id)
            .fetch_optional(&self.executor)
            .await?
            .ok_or_else(|| Error::RecordNotFound("Book".to_string()))
    }

    /// Lookup by id as received from outside, unparsable id is just not found
    pub async fn find(&self, id: &str) -> Result<Option<Book>> {
        match parse_id(id) {
            Some(id) => match self.get(id).await {
                Ok(book) => Ok(Some(book)),
                Err(Error::RecordNotFound(_)) => Ok(None),
                Err(e) => Err(e),
            },
            None => Ok(None),
        }
    }

    pub async fn find_by_isbn(&self, isbn: &str) -> Result<Option<Book>> {
        const SQL: &str =
            "SELECT id, title, author, isbn, status, borrower FROM book WHERE isbn = ?";
        let book = sqlx::query_as::<_, Book>(SQL)
            .bind(isbn)
            .fetch_optional(&self.executor)
            .await?;
        Ok(book)
    }

    pub async fn list_available(&self) -> Result<Vec<Book>> {
        const SQL: &str =
            "SELECT id, title, author, isbn, status, borrower FROM book WHERE status = ? ORDER BY id";
        let records = sqlx::query_as::<_, Book>(SQL)
            .bind(STATUS_AVAILABLE)
            .fetch(&self.executor)
            .try_collect::<Vec<_>>()
            .await?;
        Ok(records)
    }

    pub async fn list(&self, limit: usize) -> Result<Vec<Book>> {
        const SQL: &str = "SELECT id, title, author, isbn, status, borrower FROM book ORDER BY id";
        let records = sqlx::query_as::<_, Book>(SQL)
            .fetch(&self.executor)
            .take(limit)
            .try_collect::<Vec<_>>()
            .await?;
        Ok(records)
    }

    pub async fn count(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT count(*) FROM book")
            .fetch_one(&self.executor)
            .await?;
        Ok(count as u64)
    }

    /// Persists all mutable fields of the book as they are now
    pub async fn save(&self, book: &Book) -> Result<Book> {
        let result = sqlx::query(
            "UPDATE book SET title = ?, author = ?, isbn = ?, status = ?, borrower = ? WHERE id = ?",
        )
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.isbn)
        .bind(&book.status)
        .bind(&book.borrower)
        .bind(book.id)
        .execute(&self.executor)
        .await?;

        if result.rows_affected() == 0 {
            Err(Error::RecordNotFound("Book".to_string()))
        } else {
            self.get(book.id).await
        }
    }

    /// Deletes book whose id equals `id_or_isbn`, or failing that the first book (lowest id)
    /// with that ISBN
    pub async fn delete_by_id_or_isbn(&self, id_or_isbn: &str) -> Result<Book> {
        const SQL: &str = r#"
        DELETE FROM book WHERE id =
            (SELECT id FROM book WHERE id = ? OR isbn = ? ORDER BY id = ? DESC, id LIMIT 1)
        RETURNING id, title, author, isbn, status, borrower
        "#;
        let id = parse_id(id_or_isbn);
        let deleted = sqlx::query_as::<_, Book>(SQL)
            .bind(id)
            .bind(id_or_isbn)
            .bind(id)
            .fetch_optional(&self.executor)
            .await?;

        match deleted {
            Some(book) => {
                debug!("Deleted book {} ({})", book.id, book.isbn);
                Ok(book)
            }
            None => Err(Error::RecordNotFound("Book".to_string())),
        }
    }
}
