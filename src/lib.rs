//! # mongo-data-api
//!
//! A fluent async client for the MongoDB Data API.
//!
//! Chained calls select a database and a collection; each operation is then
//! turned into a JSON envelope, POSTed to `<endpoint>/action/<operation>`
//! with the `apiKey` header, and the response is decoded into typed results.
//!
//! ## Features
//!
//! - Copy-on-branch handles: `client.database()` and `db.collection()`
//!   return new values and never mutate their parent
//! - Typed reads (`Vec<T>`) and typed write results
//! - Pluggable HTTP transport, `reqwest` by default
//! - Structured logging through `tracing`
//!
//! ## Quick Start
//!
//! ```ignore
//! use mongo_data_api::{bson::doc, object_id, ClientConfig, FindOptions, MongoClient};
//! use serde::{Serialize, Deserialize};
//!
//! #[derive(Debug, Serialize, Deserialize)]
//! struct User {
//!     name: String,
//!     email: String,
//! }
//!
//! #[tokio::main]
//! async fn main() -> mongo_data_api::Result<()> {
//!     let client = MongoClient::new(ClientConfig::new(
//!         "https://data.mongodb-api.com/app/data-abcde/endpoint/data/v1",
//!         std::env::var("MONGODB_API_KEY").unwrap_or_default(),
//!         "Cluster0",
//!     ))?;
//!
//!     let users = client.database("mydb").collection::<User>("users");
//!
//!     // Insert a document
//!     users.insert_one(User {
//!         name: "John".to_string(),
//!         email: "john@example.com".to_string(),
//!     }).await?;
//!
//!     // Find documents
//!     let options = FindOptions::builder().limit(10).build();
//!     let results: Vec<User> = users.find_with_options(doc! { "name": "John" }, options).await?;
//!
//!     // Update a document by id
//!     users.update_one(
//!         doc! { "_id": object_id("656a1ac0ad868f2b83dfb585") },
//!         doc! { "$set": { "name": "Jane" } },
//!     ).await?;
//!
//!     // Delete a document
//!     users.delete_one(doc! { "email": "john@example.com" }).await?;
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod collection;
pub mod connection;
pub mod db;
pub mod error;
pub mod operation;
pub mod transport;

// Re-export main types
pub use client::{
    ClientConfig, ClientConfigBuilder, Client, MongoClient, RequestOptions, RequestOptionsBuilder,
};
pub use collection::{
    Collection, DeleteResult, FindOptions, FindOptionsBuilder, InsertManyResult, InsertOneResult,
    UpdateResult,
};
pub use connection::Connection;
pub use db::Database;
pub use error::{ErrorKind, MongoError, Result};
pub use operation::{Namespace, Operation, OperationRequest};
pub use transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};

// Re-export bson for convenience
pub use bson;
pub use bson::doc;

use bson::Document;

/// Prelude module for common imports.
pub mod prelude {
    pub use super::client::{Client, ClientConfig, MongoClient, RequestOptions};
    pub use super::collection::{
        Collection, DeleteResult, FindOptions, InsertManyResult, InsertOneResult, UpdateResult,
    };
    pub use super::db::Database;
    pub use super::error::{ErrorKind, MongoError, Result};
    pub use super::object_id;
    pub use bson::{doc, Document};
    pub use serde::{Deserialize, Serialize};
}

/// Wrap a hex string as an extended-JSON object id, `{"$oid": hex}`.
///
/// The string is not checked; use `bson::oid::ObjectId::parse_str` when
/// validation is wanted.
///
/// ```ignore
/// let filter = doc! { "_id": object_id("656a1ac0ad868f2b83dfb585") };
/// ```
pub fn object_id(hex: &str) -> Document {
    doc! { "$oid": hex }
}

/// Get the SDK version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::document_to_json;
    use serde_json::json;

    #[test]
    fn test_version() {
        assert_eq!(version(), "0.1.0");
    }

    #[test]
    fn test_object_id_wire_shape() {
        let oid = object_id("656a1ac0ad868f2b83dfb585");
        assert_eq!(oid, doc! { "$oid": "656a1ac0ad868f2b83dfb585" });
        assert_eq!(
            document_to_json(&oid),
            json!({ "$oid": "656a1ac0ad868f2b83dfb585" })
        );
    }

    #[test]
    fn test_object_id_is_not_validated() {
        let oid = object_id("not-hex");
        assert_eq!(document_to_json(&oid), json!({ "$oid": "not-hex" }));
    }

    #[test]
    fn test_object_id_embedded_in_filter() {
        let filter = doc! { "_id": object_id("656a1ac0ad868f2b83dfb585") };
        assert_eq!(
            document_to_json(&filter),
            json!({ "_id": { "$oid": "656a1ac0ad868f2b83dfb585" } })
        );
    }

    #[test]
    fn test_prelude_imports() {
        use crate::prelude::*;

        let _: Result<()> = Ok(());
        let _doc: Document = doc! { "_id": object_id("656a1ac0ad868f2b83dfb585") };
    }
}
