//! Book catalog endpoints

use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::{
    error::AppResult,
    models::book::{Book, BookList, BookListing, BookQuery, CreateBook, UpdateBook},
};

use super::AuthenticatedUser;

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Serialize)]
pub struct BookCreatedResponse {
    pub message: String,
    pub book_id: i64,
}

#[derive(Serialize)]
pub struct BookResponse {
    pub book: Book,
}

/// Create a new book
pub async fn create_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_user): AuthenticatedUser,
    Json(payload): Json<CreateBook>,
) -> AppResult<(StatusCode, Json<BookCreatedResponse>)> {
    let book_id = state.services.books.create_book(payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(BookCreatedResponse {
            message: "Book created successfully".to_string(),
            book_id,
        }),
    ))
}

/// List books with optional filters and pagination.
///
/// The query string is parsed by hand so malformed parameters produce the
/// same `{error}` body as every other validation failure.
pub async fn list_books(
    State(state): State<crate::AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> AppResult<Response> {
    let query = BookQuery::from_params(&params)?;
    let listing = state.services.books.list_books(&query).await?;

    Ok(match listing {
        BookListing::All(books) => Json(BookList { books }).into_response(),
        BookListing::Paginated(page) => Json(page).into_response(),
    })
}

/// Get book details by ID
pub async fn get_book(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<BookResponse>> {
    let book = state.services.books.get_book(id).await?;

    Ok(Json(BookResponse { book }))
}

/// Update an existing book (partial patch)
pub async fn update_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_user): AuthenticatedUser,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateBook>,
) -> AppResult<Json<MessageResponse>> {
    state.services.books.update_book(id, payload).await?;

    Ok(Json(MessageResponse {
        message: "Book updated successfully".to_string(),
    }))
}

/// Delete a book
pub async fn delete_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_user): AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<Json<MessageResponse>> {
    state.services.books.delete_book(id).await?;

    Ok(Json(MessageResponse {
        message: "Book deleted successfully".to_string(),
    }))
}
