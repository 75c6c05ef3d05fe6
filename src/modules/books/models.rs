use mongodb::bson::{doc, oid::ObjectId, Document};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Author record nested in every book
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Author {
    pub firstname: String,
    pub lastname: String,
}

/// Book as returned by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Book {
    /// Database-assigned identifier, 24 hex characters
    #[serde(rename = "_id")]
    #[schema(example = "65f1c2a47b3e9d0012ab34cd")]
    pub id: String,
    #[schema(example = "0-553-21311-3")]
    pub isbn: String,
    #[schema(example = "Dune")]
    pub title: String,
    pub author: Author,
}

/// Book as stored in the collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub isbn: String,
    pub title: String,
    pub author: Author,
}

impl BookDocument {
    /// API view of this document with the given identifier
    pub fn into_book(self, id: ObjectId) -> Book {
        Book {
            id: id.to_hex(),
            isbn: self.isbn,
            title: self.title,
            author: self.author,
        }
    }
}

/// Request body for creating a book. Client-supplied ids are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct NewBook {
    pub isbn: String,
    pub title: String,
    pub author: Author,
}

impl From<NewBook> for BookDocument {
    fn from(book: NewBook) -> Self {
        Self {
            id: None,
            isbn: book.isbn,
            title: book.title,
            author: book.author,
        }
    }
}

/// Partial author change; absent names are left untouched
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AuthorUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firstname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lastname: Option<String>,
}

/// Request body for updating a book; only supplied fields change
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BookUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<AuthorUpdate>,
}

impl BookUpdate {
    /// Fields for a `$set` operator, using dotted paths for author names
    pub fn set_fields(&self) -> Document {
        let mut fields = Document::new();
        if let Some(isbn) = &self.isbn {
            fields.insert("isbn", isbn.as_str());
        }
        if let Some(title) = &self.title {
            fields.insert("title", title.as_str());
        }
        if let Some(author) = &self.author {
            if let Some(firstname) = &author.firstname {
                fields.insert("author.firstname", firstname.as_str());
            }
            if let Some(lastname) = &author.lastname {
                fields.insert("author.lastname", lastname.as_str());
            }
        }
        fields
    }

    /// Update document for the driver, `None` when nothing would change
    pub fn to_update_document(&self) -> Option<Document> {
        let fields = self.set_fields();
        if fields.is_empty() {
            None
        } else {
            Some(doc! { "$set": fields })
        }
    }

    /// Apply the change to an in-memory document
    pub fn apply(&self, book: &mut BookDocument) {
        if let Some(isbn) = &self.isbn {
            book.isbn = isbn.clone();
        }
        if let Some(title) = &self.title {
            book.title = title.clone();
        }
        if let Some(author) = &self.author {
            if let Some(firstname) = &author.firstname {
                book.author.firstname = firstname.clone();
            }
            if let Some(lastname) = &author.lastname {
                book.author.lastname = lastname.clone();
            }
        }
    }
}

/// Outcome of a create request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InsertResult {
    pub inserted_id: String,
    pub acknowledged: bool,
}

/// Outcome of a delete request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResult {
    pub deleted_count: u64,
}

/// Parse a path segment into an ObjectId
pub fn parse_book_id(raw: &str) -> Option<ObjectId> {
    ObjectId::parse_str(raw).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dune() -> BookDocument {
        BookDocument {
            id: Some(ObjectId::new()),
            isbn: "0-553-21311-3".to_string(),
            title: "Dune".to_string(),
            author: Author {
                firstname: "Frank".to_string(),
                lastname: "Herbert".to_string(),
            },
        }
    }

    #[test]
    fn new_book_ignores_client_id() {
        let body = json!({
            "_id": "65f1c2a47b3e9d0012ab34cd",
            "isbn": "0-553-21311-3",
            "title": "Dune",
            "author": {"firstname": "Frank", "lastname": "Herbert"}
        });
        let new_book: NewBook = serde_json::from_value(body).unwrap();
        let document = BookDocument::from(new_book);
        assert_eq!(document.id, None);
    }

    #[test]
    fn new_book_requires_every_field() {
        let body = json!({"title": "Dune"});
        assert!(serde_json::from_value::<NewBook>(body).is_err());
    }

    #[test]
    fn stored_document_omits_unset_id() {
        let mut document = dune();
        document.id = None;
        let bson = mongodb::bson::to_document(&document).unwrap();
        assert!(!bson.contains_key("_id"));
        assert_eq!(bson.get_document("author").unwrap().get_str("lastname").unwrap(), "Herbert");
    }

    #[test]
    fn book_serializes_id_as_hex() {
        let document = dune();
        let id = document.id.unwrap();
        let value = serde_json::to_value(document.into_book(id)).unwrap();
        assert_eq!(value["_id"], id.to_hex());
        assert_eq!(value["author"]["firstname"], "Frank");
    }

    #[test]
    fn update_sets_only_supplied_fields() {
        let update: BookUpdate = serde_json::from_value(json!({
            "title": "Dune Messiah",
            "author": {"lastname": "H."}
        }))
        .unwrap();

        let set = update.to_update_document().unwrap();
        let fields = set.get_document("$set").unwrap();
        assert_eq!(fields.get_str("title").unwrap(), "Dune Messiah");
        assert_eq!(fields.get_str("author.lastname").unwrap(), "H.");
        assert!(!fields.contains_key("isbn"));
        assert!(!fields.contains_key("author.firstname"));

        let mut document = dune();
        update.apply(&mut document);
        assert_eq!(document.title, "Dune Messiah");
        assert_eq!(document.isbn, "0-553-21311-3");
        assert_eq!(document.author.firstname, "Frank");
        assert_eq!(document.author.lastname, "H.");
    }

    #[test]
    fn empty_update_builds_no_document() {
        assert!(BookUpdate::default().to_update_document().is_none());
    }

    #[test]
    fn result_payloads_use_camel_case() {
        let inserted = InsertResult {
            inserted_id: "abc".to_string(),
            acknowledged: true,
        };
        assert_eq!(
            serde_json::to_value(inserted).unwrap(),
            json!({"insertedId": "abc", "acknowledged": true})
        );
        assert_eq!(
            serde_json::to_value(DeleteResult { deleted_count: 0 }).unwrap(),
            json!({"deletedCount": 0})
        );
    }

    #[test]
    fn book_id_must_be_hex() {
        assert!(parse_book_id("65f1c2a47b3e9d0012ab34cd").is_some());
        assert!(parse_book_id("not-an-id").is_none());
        assert!(parse_book_id("").is_none());
    }
}
