//! HTTP handlers for `/api/books`.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use libris_http::error::{AppError, ErrorResponse};
use mongodb::bson::oid::ObjectId;
use utoipa::OpenApi;
use utoipa_axum::{router::OpenApiRouter, routes};

use super::models::{self, Book, BookUpdate, DeleteResult, InsertResult, NewBook};
use super::repository::SharedBookRepository;

#[derive(OpenApi)]
#[openapi(
    tags((name = "Books", description = "CRUD over the books collection")),
    components(schemas(
        models::Author,
        models::AuthorUpdate,
        Book,
        BookUpdate,
        NewBook,
        InsertResult,
        DeleteResult,
        ErrorResponse
    ))
)]
struct BooksApi;

/// Routes and their documentation, relative to the module mount point
pub fn router() -> OpenApiRouter<SharedBookRepository> {
    OpenApiRouter::with_openapi(BooksApi::openapi())
        .routes(routes!(list_books, create_book))
        .routes(routes!(health_check))
        .routes(routes!(get_book, update_book, delete_book))
}

fn book_id(raw: &str) -> Result<ObjectId, AppError> {
    models::parse_book_id(raw)
        .ok_or_else(|| AppError::bad_request(format!("'{}' is not a valid book id", raw)))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Books",
    responses(
        (status = 200, description = "Every stored book, in no particular order", body = [Book]),
        (status = 500, description = "Database failure", body = ErrorResponse)
    )
)]
pub async fn list_books(
    State(repository): State<SharedBookRepository>,
) -> Result<Json<Vec<Book>>, AppError> {
    let books = repository.list().await?;
    tracing::debug!(count = books.len(), "listed books");
    Ok(Json(books))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Books",
    params(("id" = String, Path, description = "Book ObjectId as 24 hex characters")),
    responses(
        (status = 200, description = "The book", body = Book),
        (status = 400, description = "Malformed id", body = ErrorResponse),
        (status = 404, description = "No book with this id", body = ErrorResponse),
        (status = 500, description = "Database failure", body = ErrorResponse)
    )
)]
pub async fn get_book(
    State(repository): State<SharedBookRepository>,
    Path(id): Path<String>,
) -> Result<Json<Book>, AppError> {
    let id = book_id(&id)?;
    Ok(Json(repository.get(id).await?))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Books",
    request_body = NewBook,
    responses(
        (status = 200, description = "Identifier assigned to the new book", body = InsertResult),
        (status = 400, description = "Malformed JSON body", body = ErrorResponse),
        (status = 422, description = "Body does not match the book schema", body = ErrorResponse),
        (status = 500, description = "Database failure", body = ErrorResponse)
    )
)]
pub async fn create_book(
    State(repository): State<SharedBookRepository>,
    payload: Result<Json<NewBook>, JsonRejection>,
) -> Result<Json<InsertResult>, AppError> {
    let Json(book) = payload?;
    let result = repository.insert(book).await?;
    tracing::info!(book_id = %result.inserted_id, "book created");
    Ok(Json(result))
}

/// Responds with the book as it was before the update
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Books",
    params(("id" = String, Path, description = "Book ObjectId as 24 hex characters")),
    request_body = BookUpdate,
    responses(
        (status = 200, description = "The book before the update was applied", body = Book),
        (status = 400, description = "Malformed id or JSON body", body = ErrorResponse),
        (status = 404, description = "No book with this id", body = ErrorResponse),
        (status = 422, description = "Body does not match the update schema", body = ErrorResponse),
        (status = 500, description = "Database failure", body = ErrorResponse)
    )
)]
pub async fn update_book(
    State(repository): State<SharedBookRepository>,
    Path(id): Path<String>,
    payload: Result<Json<BookUpdate>, JsonRejection>,
) -> Result<Json<Book>, AppError> {
    let id = book_id(&id)?;
    let Json(update) = payload?;

    let mut previous = repository.update(id, update).await?;
    previous.id = id.to_hex();
    tracing::info!(book_id = %previous.id, "book updated");
    Ok(Json(previous))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Books",
    params(("id" = String, Path, description = "Book ObjectId as 24 hex characters")),
    responses(
        (status = 200, description = "Number of deleted books, 0 for unknown ids", body = DeleteResult),
        (status = 400, description = "Malformed id", body = ErrorResponse),
        (status = 500, description = "Database failure", body = ErrorResponse)
    )
)]
pub async fn delete_book(
    State(repository): State<SharedBookRepository>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResult>, AppError> {
    let id = book_id(&id)?;
    let result = repository.delete(id).await?;
    tracing::info!(book_id = %id, deleted = result.deleted_count, "book delete processed");
    Ok(Json(result))
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "Books",
    responses(
        (status = 200, description = "Storage is reachable", body = String),
        (status = 500, description = "Storage is unreachable", body = ErrorResponse)
    )
)]
pub async fn health_check(
    State(repository): State<SharedBookRepository>,
) -> Result<&'static str, AppError> {
    repository.ping().await?;
    Ok("books module is healthy")
}
