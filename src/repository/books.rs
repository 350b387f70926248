//! Books repository for database operations

use chrono::Utc;
use sqlx::{Pool, Sqlite};

use crate::{
    error::AppResult,
    models::book::{Book, BookFilters, UpdateBook},
};

/// Bind value for dynamically assembled filter conditions
enum BindValue {
    Text(String),
    Int(i64),
}

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Sqlite>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Insert a book and return its id
    pub async fn create(
        &self,
        title: &str,
        author: &str,
        year: Option<i32>,
        isbn: Option<&str>,
    ) -> AppResult<i64> {
        let now = Utc::now();

        let result = sqlx::query(
            "INSERT INTO books (title, author, year, isbn, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(title)
        .bind(author)
        .bind(year)
        .bind(isbn)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Get book by ID
    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(book)
    }

    /// Filtered listing with the total count under the same predicate.
    ///
    /// Filters combine with AND; author and title are case-insensitive
    /// substring matches, year is exact. `pagination` is `(page, per_page)`;
    /// when absent the full filtered set is returned. The count ignores the
    /// page window so callers can derive total pages.
    pub async fn search(
        &self,
        filters: &BookFilters,
        pagination: Option<(i64, i64)>,
    ) -> AppResult<(Vec<Book>, i64)> {
        let mut conditions: Vec<&str> = Vec::new();
        let mut binds: Vec<BindValue> = Vec::new();

        if let Some(ref author) = filters.author {
            conditions.push("LOWER(author) LIKE LOWER(?)");
            binds.push(BindValue::Text(format!("%{}%", author)));
        }

        if let Some(year) = filters.year {
            conditions.push("year = ?");
            binds.push(BindValue::Int(year as i64));
        }

        if let Some(ref title) = filters.title {
            conditions.push("LOWER(title) LIKE LOWER(?)");
            binds.push(BindValue::Text(format!("%{}%", title)));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        };

        // Count total under the same filter predicate
        let count_query = format!("SELECT COUNT(*) FROM books{}", where_clause);
        let mut count_builder = sqlx::query_scalar::<_, i64>(&count_query);
        for bind in &binds {
            count_builder = match bind {
                BindValue::Text(v) => count_builder.bind(v),
                BindValue::Int(v) => count_builder.bind(v),
            };
        }
        let total = count_builder.fetch_one(&self.pool).await?;

        let mut select_query = format!(
            "SELECT * FROM books{} ORDER BY created_at DESC, id DESC",
            where_clause
        );
        if let Some((page, per_page)) = pagination {
            let offset = (page - 1) * per_page;
            select_query.push_str(&format!(" LIMIT {} OFFSET {}", per_page, offset));
        }

        let mut select_builder = sqlx::query_as::<_, Book>(&select_query);
        for bind in &binds {
            select_builder = match bind {
                BindValue::Text(v) => select_builder.bind(v),
                BindValue::Int(v) => select_builder.bind(v),
            };
        }
        let books = select_builder.fetch_all(&self.pool).await?;

        Ok((books, total))
    }

    /// Partial update inside a transaction. Omitted fields keep their
    /// stored values. Returns whether a matching row existed.
    pub async fn update(&self, id: i64, patch: &UpdateBook) -> AppResult<bool> {
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(current) = current else {
            return Ok(false);
        };

        let title = patch.title.as_deref().unwrap_or(&current.title);
        let author = patch.author.as_deref().unwrap_or(&current.author);
        let year = patch.year.or(current.year);
        let isbn = patch.isbn.as_deref().or(current.isbn.as_deref());

        sqlx::query("UPDATE books SET title = ?, author = ?, year = ?, isbn = ? WHERE id = ?")
            .bind(title)
            .bind(author)
            .bind(year)
            .bind(isbn)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(true)
    }

    /// Delete a book. Returns whether a matching row existed.
    pub async fn delete(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM books WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
