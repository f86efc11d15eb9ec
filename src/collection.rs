//! Collection struct with CRUD operations.

use crate::connection::Connection;
use crate::error::{MongoError, Result};
use crate::operation::{Namespace, OperationRequest};
use bson::{Bson, Document};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// Result of an insert_one operation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertOneResult {
    /// The ID of the inserted document.
    pub inserted_id: Bson,
}

/// Result of an insert_many operation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertManyResult {
    /// IDs of the inserted documents, in input order.
    pub inserted_ids: Vec<Bson>,
}

/// Result of an update operation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResult {
    /// Number of documents matched.
    pub matched_count: u64,
    /// Number of documents modified.
    pub modified_count: u64,
    /// The ID of the upserted document, if any.
    #[serde(default)]
    pub upserted_id: Option<Bson>,
}

/// Result of a delete operation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResult {
    /// Number of documents deleted.
    pub deleted_count: u64,
}

/// Options for find operations.
#[derive(Debug, Clone, Default)]
pub struct FindOptions {
    /// Maximum number of documents to return.
    pub limit: Option<i64>,
    /// Number of documents to skip.
    pub skip: Option<u64>,
    /// Sort order.
    pub sort: Option<Document>,
    /// Projection (fields to include/exclude).
    pub projection: Option<Document>,
}

impl FindOptions {
    /// Create new find options.
    pub fn builder() -> FindOptionsBuilder {
        FindOptionsBuilder::default()
    }
}

/// Builder for FindOptions.
#[derive(Debug, Clone, Default)]
pub struct FindOptionsBuilder {
    options: FindOptions,
}

impl FindOptionsBuilder {
    /// Set the limit.
    pub fn limit(mut self, limit: i64) -> Self {
        self.options.limit = Some(limit);
        self
    }

    /// Set the number of documents to skip.
    pub fn skip(mut self, skip: u64) -> Self {
        self.options.skip = Some(skip);
        self
    }

    /// Set the sort order.
    pub fn sort(mut self, sort: Document) -> Self {
        self.options.sort = Some(sort);
        self
    }

    /// Set the projection.
    pub fn projection(mut self, projection: Document) -> Self {
        self.options.projection = Some(projection);
        self
    }

    /// Build the options.
    pub fn build(self) -> FindOptions {
        self.options
    }
}

/// A handle to a collection on the Data API.
///
/// # Type Parameters
///
/// * `T` - The type of documents in this collection. It decides how
///   inserted documents are encoded and found documents decoded; it is not
///   enforced by the server.
///
/// # Example
///
/// ```ignore
/// use mongo_data_api::{bson::doc, ClientConfig, MongoClient};
/// use serde::{Serialize, Deserialize};
///
/// #[derive(Debug, Serialize, Deserialize)]
/// struct User {
///     name: String,
///     email: String,
/// }
///
/// let client = MongoClient::new(ClientConfig::from_env()?)?;
/// let users = client.database("mydb").collection::<User>("users");
///
/// users
///     .insert_one(User { name: "John".to_string(), email: "john@example.com".to_string() })
///     .await?;
/// ```
pub struct Collection<T> {
    /// Database and collection names.
    pub(crate) namespace: Namespace,
    /// Shared connection identity.
    pub(crate) connection: Arc<Connection>,
    /// Type marker.
    _marker: PhantomData<T>,
}

impl<T> Collection<T> {
    /// Create a new collection handle.
    pub(crate) fn new(namespace: Namespace, connection: Arc<Connection>) -> Self {
        Self {
            namespace,
            connection,
            _marker: PhantomData,
        }
    }

    /// Get the collection name.
    pub fn name(&self) -> &str {
        self.namespace.collection()
    }

    /// Get the database name.
    pub fn database_name(&self) -> &str {
        self.namespace.database()
    }

    /// Get the target namespace (displayed as `db.collection`).
    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    /// Get the shared connection identity.
    pub fn connection(&self) -> &Arc<Connection> {
        &self.connection
    }

    /// Clone this collection with a new type parameter.
    pub fn clone_with_type<U>(&self) -> Collection<U> {
        Collection::new(self.namespace.clone(), self.connection.clone())
    }

    /// Dispatch a prebuilt request and return the normalized response.
    ///
    /// The body's `documents` field is returned when present; any other
    /// body comes back exactly as the endpoint sent it.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let raw = collection
    ///     .execute(OperationRequest::DeleteMany { filter: doc! { "archived": true } })
    ///     .await?;
    /// println!("{}", raw["deletedCount"]);
    /// ```
    pub async fn execute(&self, request: OperationRequest) -> Result<JsonValue> {
        self.connection.dispatch(&self.namespace, &request).await
    }
}

impl<T> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self::new(self.namespace.clone(), self.connection.clone())
    }
}

impl<T> fmt::Debug for Collection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collection")
            .field("namespace", &self.namespace.to_string())
            .finish()
    }
}

impl<T: Serialize + DeserializeOwned + Send + Sync> Collection<T> {
    /// Insert a single document.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let result = collection.insert_one(doc! { "name": "John" }).await?;
    /// println!("Inserted ID: {:?}", result.inserted_id);
    /// ```
    pub async fn insert_one(&self, doc: impl Into<T>) -> Result<InsertOneResult> {
        let document: T = doc.into();
        let document = serde_json::to_value(&document)?;
        let result = self.execute(OperationRequest::InsertOne { document }).await?;
        decode(result)
    }

    /// Insert multiple documents.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let docs = vec![
    ///     doc! { "name": "John" },
    ///     doc! { "name": "Jane" },
    /// ];
    /// let result = collection.insert_many(docs).await?;
    /// ```
    pub async fn insert_many(&self, docs: impl IntoIterator<Item = T>) -> Result<InsertManyResult> {
        let documents: Vec<JsonValue> = docs
            .into_iter()
            .map(|d| serde_json::to_value(&d))
            .collect::<std::result::Result<_, _>>()?;

        let result = self
            .execute(OperationRequest::InsertMany { documents })
            .await?;
        decode(result)
    }

    /// Find documents matching a filter.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let users: Vec<User> = collection.find(doc! { "status": "active" }).await?;
    /// ```
    pub async fn find(&self, filter: impl Into<Option<Document>>) -> Result<Vec<T>> {
        self.find_with_options(filter, None).await
    }

    /// Find documents with options.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let options = FindOptions::builder()
    ///     .sort(doc! { "createdAt": -1 })
    ///     .limit(10)
    ///     .build();
    /// let latest = collection.find_with_options(None, options).await?;
    /// ```
    pub async fn find_with_options(
        &self,
        filter: impl Into<Option<Document>>,
        options: impl Into<Option<FindOptions>>,
    ) -> Result<Vec<T>> {
        let options = options.into().unwrap_or_default();
        let request = OperationRequest::Find {
            filter: filter.into().unwrap_or_default(),
            projection: options.projection.unwrap_or_default(),
            sort: options.sort,
            limit: options.limit,
            skip: options.skip,
        };

        let documents = self.execute(request).await?;
        decode(documents)
    }

    /// Update a single document.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let result = collection.update_one(
    ///     doc! { "_id": object_id("656a1ac0ad868f2b83dfb585") },
    ///     doc! { "$set": { "name": "Jane" } },
    /// ).await?;
    /// ```
    pub async fn update_one(&self, filter: Document, update: Document) -> Result<UpdateResult> {
        let result = self
            .execute(OperationRequest::UpdateOne { filter, update })
            .await?;
        decode(result)
    }

    /// Update multiple documents.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let result = collection.update_many(
    ///     doc! { "status": "pending" },
    ///     doc! { "$set": { "status": "processed" } },
    /// ).await?;
    /// ```
    pub async fn update_many(&self, filter: Document, update: Document) -> Result<UpdateResult> {
        let result = self
            .execute(OperationRequest::UpdateMany { filter, update })
            .await?;
        decode(result)
    }

    /// Delete a single document.
    pub async fn delete_one(&self, filter: Document) -> Result<DeleteResult> {
        let result = self.execute(OperationRequest::DeleteOne { filter }).await?;
        decode(result)
    }

    /// Delete multiple documents.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let result = collection.delete_many(doc! { "status": "deleted" }).await?;
    /// ```
    pub async fn delete_many(&self, filter: Document) -> Result<DeleteResult> {
        let result = self.execute(OperationRequest::DeleteMany { filter }).await?;
        decode(result)
    }

    /// Run an aggregation pipeline.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let pipeline = vec![
    ///     doc! { "$match": { "status": "active" } },
    ///     doc! { "$group": { "_id": "$category", "count": { "$sum": 1 } } },
    /// ];
    /// let groups = collection.aggregate(pipeline).await?;
    /// ```
    pub async fn aggregate(
        &self,
        pipeline: impl IntoIterator<Item = Document>,
    ) -> Result<Vec<Document>> {
        let request = OperationRequest::Aggregate {
            pipeline: pipeline.into_iter().collect(),
        };
        let documents = self.execute(request).await?;
        decode(documents)
    }
}

fn decode<R: DeserializeOwned>(value: JsonValue) -> Result<R> {
    serde_json::from_value(value).map_err(|e| MongoError::Deserialization(e.to_string()))
}
