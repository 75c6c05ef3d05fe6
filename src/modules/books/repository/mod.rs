//! Storage seam for the books module.

mod memory;
mod mongo;

pub use memory::InMemoryBookRepository;
pub use mongo::MongoBookRepository;

use std::sync::Arc;

use async_trait::async_trait;
use libris_http::error::AppError;
use mongodb::bson::oid::ObjectId;
use thiserror::Error;

use super::models::{Book, BookUpdate, DeleteResult, InsertResult, NewBook};

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Shared handle injected into the book handlers
pub type SharedBookRepository = Arc<dyn BookRepository>;

#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("book {0} not found")]
    NotFound(ObjectId),

    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(id) => AppError::not_found(format!("book {} not found", id)),
            RepositoryError::Database(e) => AppError::Internal(anyhow::Error::new(e)),
        }
    }
}

/// One call per operation; no operation spans more than one database round trip
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Every stored book, in storage order
    async fn list(&self) -> RepositoryResult<Vec<Book>>;

    async fn get(&self, id: ObjectId) -> RepositoryResult<Book>;

    async fn insert(&self, book: NewBook) -> RepositoryResult<InsertResult>;

    /// Apply `update` and return the book as it was before the change
    async fn update(&self, id: ObjectId, update: BookUpdate) -> RepositoryResult<Book>;

    /// Removing an unknown id is not an error; it reports zero deletions
    async fn delete(&self, id: ObjectId) -> RepositoryResult<DeleteResult>;

    async fn ping(&self) -> RepositoryResult<()>;
}
