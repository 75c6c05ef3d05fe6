use async_trait::async_trait;
use libris_db::Database;
use mongodb::{
    bson::{doc, oid::ObjectId, Document, RawDocument},
    options::ReturnDocument,
    Collection,
};

use super::{BookRepository, RepositoryError, RepositoryResult};
use crate::modules::books::models::{
    Book, BookDocument, BookUpdate, DeleteResult, InsertResult, NewBook,
};

/// Books stored in a MongoDB collection
#[derive(Clone, Debug)]
pub struct MongoBookRepository {
    database: Database,
    collection: Collection<BookDocument>,
}

impl MongoBookRepository {
    pub fn new(database: Database, collection: &str) -> Self {
        let collection = database.collection(collection);
        Self {
            database,
            collection,
        }
    }
}

fn by_id(id: ObjectId) -> Document {
    doc! { "_id": id }
}

/// Decode one listed document. A corrupt document costs one entry, not the
/// whole listing.
fn decode_listed(raw: &RawDocument) -> Option<Book> {
    let raw_id = raw.get_object_id("_id").ok();

    match mongodb::bson::from_slice::<BookDocument>(raw.as_bytes()) {
        Ok(document) => match document.id {
            Some(id) => Some(document.into_book(id)),
            None => {
                tracing::warn!("skipping stored book without an _id");
                None
            }
        },
        Err(err) => {
            tracing::warn!(
                book_id = ?raw_id.map(|id| id.to_hex()),
                error = %err,
                "skipping book that failed to decode"
            );
            None
        }
    }
}

#[async_trait]
impl BookRepository for MongoBookRepository {
    async fn list(&self) -> RepositoryResult<Vec<Book>> {
        let mut cursor = self.collection.find(doc! {}).await?;
        let mut books = Vec::new();

        while cursor.advance().await? {
            books.extend(decode_listed(cursor.current()));
        }

        Ok(books)
    }

    async fn get(&self, id: ObjectId) -> RepositoryResult<Book> {
        self.collection
            .find_one(by_id(id))
            .await?
            .map(|document| document.into_book(id))
            .ok_or(RepositoryError::NotFound(id))
    }

    async fn insert(&self, book: NewBook) -> RepositoryResult<InsertResult> {
        let result = self.collection.insert_one(BookDocument::from(book)).await?;

        let inserted_id = match result.inserted_id.as_object_id() {
            Some(id) => id.to_hex(),
            None => result.inserted_id.to_string(),
        };
        tracing::debug!(book_id = %inserted_id, "book inserted");

        Ok(InsertResult {
            inserted_id,
            acknowledged: true,
        })
    }

    async fn update(&self, id: ObjectId, update: BookUpdate) -> RepositoryResult<Book> {
        let previous = match update.to_update_document() {
            Some(changes) => {
                self.collection
                    .find_one_and_update(by_id(id), changes)
                    .return_document(ReturnDocument::Before)
                    .await?
            }
            None => self.collection.find_one(by_id(id)).await?,
        };

        previous
            .map(|document| document.into_book(id))
            .ok_or(RepositoryError::NotFound(id))
    }

    async fn delete(&self, id: ObjectId) -> RepositoryResult<DeleteResult> {
        let result = self.collection.delete_one(by_id(id)).await?;
        Ok(DeleteResult {
            deleted_count: result.deleted_count,
        })
    }

    async fn ping(&self) -> RepositoryResult<()> {
        self.database.ping().await.map_err(RepositoryError::from)
    }
}
