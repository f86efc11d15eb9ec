//! Database handle for selecting collections.

use crate::collection::Collection;
use crate::connection::Connection;
use crate::operation::Namespace;
use bson::Document;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

/// A handle to a database on the Data API.
///
/// Handles are plain values: selecting a collection returns a new
/// [`Collection`] and leaves this handle untouched.
///
/// # Example
///
/// ```ignore
/// let db = client.database("mydb");
/// let orders = db.collection_with_doc("orders");
/// let archive = db.collection_with_doc("orders_archive");
/// ```
#[derive(Debug, Clone)]
pub struct Database {
    /// Database name.
    pub(crate) name: String,
    /// Shared connection identity.
    pub(crate) connection: Arc<Connection>,
}

impl Database {
    /// Create a new database handle.
    pub(crate) fn new(name: String, connection: Arc<Connection>) -> Self {
        Self { name, connection }
    }

    /// Get the database name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the shared connection identity.
    pub fn connection(&self) -> &Arc<Connection> {
        &self.connection
    }

    /// Get a handle to a collection with a specific type.
    ///
    /// The type only shapes how documents are encoded and decoded; nothing
    /// is checked against the server.
    ///
    /// # Example
    ///
    /// ```ignore
    /// use serde::{Serialize, Deserialize};
    ///
    /// #[derive(Debug, Serialize, Deserialize)]
    /// struct User {
    ///     name: String,
    ///     email: String,
    /// }
    ///
    /// let users = db.collection::<User>("users");
    /// ```
    pub fn collection<T>(&self, name: &str) -> Collection<T>
    where
        T: Serialize + DeserializeOwned + Send + Sync,
    {
        Collection::new(
            Namespace::new(self.name.clone(), name),
            self.connection.clone(),
        )
    }

    /// Get a handle to a collection with Document type.
    pub fn collection_with_doc(&self, name: &str) -> Collection<Document> {
        self.collection(name)
    }
}
