//! Book catalog service

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::book::{
        Book, BookListing, BookQuery, CreateBook, PaginatedBooks, UpdateBook, DEFAULT_PAGE,
        DEFAULT_PER_PAGE,
    },
    repository::Repository,
    validation,
};

const ERROR_BOOK_NOT_FOUND: &str = "Book not found";

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
}

impl BooksService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Validate and persist a new book, returning its id.
    ///
    /// Creation takes the strict year range; updates only forbid future
    /// years, so a pre-1000 year can be patched in but not created.
    pub async fn create_book(&self, payload: CreateBook) -> AppResult<i64> {
        payload.validate()?;
        if let Some(year) = payload.year {
            validation::validate_year(year)?;
        }

        let book_id = self
            .repository
            .books
            .create(
                payload.title.trim(),
                payload.author.trim(),
                payload.year,
                payload.isbn.as_deref(),
            )
            .await
            .map_err(|e| e.mask_internal(AppError::Validation("Error creating book".to_string())))?;

        tracing::debug!(book_id, "book created");

        Ok(book_id)
    }

    /// List books, paginated when either pagination parameter was given.
    ///
    /// Without pagination parameters the full filtered set is returned and
    /// the response carries no pagination metadata.
    pub async fn list_books(&self, query: &BookQuery) -> AppResult<BookListing> {
        if !query.is_paginated() {
            let (books, _) = self
                .repository
                .books
                .search(&query.filters, None)
                .await
                .map_err(|e| {
                    e.mask_internal(AppError::Validation("Error fetching books".to_string()))
                })?;
            return Ok(BookListing::All(books));
        }

        let page = query.page.unwrap_or(DEFAULT_PAGE);
        let per_page = query.per_page.unwrap_or(DEFAULT_PER_PAGE);

        let (books, total) = self
            .repository
            .books
            .search(&query.filters, Some((page, per_page)))
            .await
            .map_err(|e| e.mask_internal(AppError::Validation("Error fetching books".to_string())))?;

        let total_pages = if total > 0 {
            (total + per_page - 1) / per_page
        } else {
            0
        };

        Ok(BookListing::Paginated(PaginatedBooks {
            books,
            total,
            page,
            per_page,
            total_pages,
            filters: query.filters.clone(),
        }))
    }

    /// Get a book by id
    pub async fn get_book(&self, id: i64) -> AppResult<Book> {
        self.repository
            .books
            .find_by_id(id)
            .await
            .map_err(|e| e.mask_internal(AppError::NotFound(ERROR_BOOK_NOT_FOUND.to_string())))?
            .ok_or_else(|| AppError::NotFound(ERROR_BOOK_NOT_FOUND.to_string()))
    }

    /// Partial update: fields omitted from the payload keep stored values
    pub async fn update_book(&self, id: i64, payload: UpdateBook) -> AppResult<()> {
        payload.validate()?;
        if let Some(year) = payload.year {
            validation::validate_year_not_future(year)?;
        }

        let patch = UpdateBook {
            title: payload.title.map(|t| t.trim().to_string()),
            author: payload.author.map(|a| a.trim().to_string()),
            year: payload.year,
            isbn: payload.isbn,
        };

        let updated = self
            .repository
            .books
            .update(id, &patch)
            .await
            .map_err(|e| e.mask_internal(AppError::Validation("Error updating book".to_string())))?;

        if updated {
            Ok(())
        } else {
            Err(AppError::NotFound(ERROR_BOOK_NOT_FOUND.to_string()))
        }
    }

    /// Delete a book
    pub async fn delete_book(&self, id: i64) -> AppResult<()> {
        let deleted = self
            .repository
            .books
            .delete(id)
            .await
            .map_err(|e| e.mask_internal(AppError::NotFound(ERROR_BOOK_NOT_FOUND.to_string())))?;

        if deleted {
            Ok(())
        } else {
            Err(AppError::NotFound(ERROR_BOOK_NOT_FOUND.to_string()))
        }
    }
}
