use std::collections::BTreeMap;

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use tokio::sync::RwLock;

use super::{BookRepository, RepositoryError, RepositoryResult};
use crate::modules::books::models::{
    Book, BookDocument, BookUpdate, DeleteResult, InsertResult, NewBook,
};

/// Process-local book store used by the test suites; same semantics as the
/// MongoDB one.
#[derive(Debug, Default)]
pub struct InMemoryBookRepository {
    books: RwLock<BTreeMap<ObjectId, BookDocument>>,
}

impl InMemoryBookRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.books.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.books.read().await.is_empty()
    }
}

#[async_trait]
impl BookRepository for InMemoryBookRepository {
    async fn list(&self) -> RepositoryResult<Vec<Book>> {
        let books = self.books.read().await;
        Ok(books
            .iter()
            .map(|(id, document)| document.clone().into_book(*id))
            .collect())
    }

    async fn get(&self, id: ObjectId) -> RepositoryResult<Book> {
        self.books
            .read()
            .await
            .get(&id)
            .cloned()
            .map(|document| document.into_book(id))
            .ok_or(RepositoryError::NotFound(id))
    }

    async fn insert(&self, book: NewBook) -> RepositoryResult<InsertResult> {
        let id = ObjectId::new();
        let mut document = BookDocument::from(book);
        document.id = Some(id);
        self.books.write().await.insert(id, document);

        Ok(InsertResult {
            inserted_id: id.to_hex(),
            acknowledged: true,
        })
    }

    async fn update(&self, id: ObjectId, update: BookUpdate) -> RepositoryResult<Book> {
        let mut books = self.books.write().await;
        let document = books.get_mut(&id).ok_or(RepositoryError::NotFound(id))?;

        let previous = document.clone();
        update.apply(document);
        Ok(previous.into_book(id))
    }

    async fn delete(&self, id: ObjectId) -> RepositoryResult<DeleteResult> {
        let removed = self.books.write().await.remove(&id);
        Ok(DeleteResult {
            deleted_count: u64::from(removed.is_some()),
        })
    }

    async fn ping(&self) -> RepositoryResult<()> {
        Ok(())
    }
}
