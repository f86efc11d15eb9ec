//! Operation envelopes sent to the Data API.

use crate::error::{MongoError, Result};
use bson::{Bson, Document};
use serde_json::{Map as JsonMap, Value as JsonValue};
use std::fmt;

/// The operations understood by the endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Query documents.
    Find,
    /// Run an aggregation pipeline.
    Aggregate,
    /// Insert a single document.
    InsertOne,
    /// Insert several documents.
    InsertMany,
    /// Update the first matching document.
    UpdateOne,
    /// Update every matching document.
    UpdateMany,
    /// Delete the first matching document.
    DeleteOne,
    /// Delete every matching document.
    DeleteMany,
}

impl Operation {
    /// Every supported operation.
    pub const ALL: [Operation; 8] = [
        Operation::Find,
        Operation::Aggregate,
        Operation::InsertOne,
        Operation::InsertMany,
        Operation::UpdateOne,
        Operation::UpdateMany,
        Operation::DeleteOne,
        Operation::DeleteMany,
    ];

    /// Action name appended to the base URL.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Find => "find",
            Operation::Aggregate => "aggregate",
            Operation::InsertOne => "insertOne",
            Operation::InsertMany => "insertMany",
            Operation::UpdateOne => "updateOne",
            Operation::UpdateMany => "updateMany",
            Operation::DeleteOne => "deleteOne",
            Operation::DeleteMany => "deleteMany",
        }
    }

    /// Whether the operation returns a `documents` array.
    pub fn is_read(&self) -> bool {
        matches!(self, Operation::Find | Operation::Aggregate)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The database and collection an operation targets.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Namespace {
    database: String,
    collection: String,
}

impl Namespace {
    /// Create a namespace.
    pub fn new(database: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            collection: collection.into(),
        }
    }

    /// Database name.
    pub fn database(&self) -> &str {
        &self.database
    }

    /// Collection name.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Fails unless both names are set.
    pub fn validate(&self) -> Result<()> {
        if self.database.is_empty() || self.collection.is_empty() {
            return Err(MongoError::scope("Database or collection not specified"));
        }
        Ok(())
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.database, self.collection)
    }
}

/// A single operation and its payload.
///
/// Building a request has no side effects; it only becomes a network call
/// when handed to [`Collection::execute`](crate::Collection::execute) or one
/// of the typed collection methods.
#[derive(Debug, Clone, PartialEq)]
pub enum OperationRequest {
    /// `find`: `{filter, projection, sort?, limit?, skip?}`.
    Find {
        /// Query filter.
        filter: Document,
        /// Fields to include or exclude.
        projection: Document,
        /// Sort order.
        sort: Option<Document>,
        /// Maximum number of documents.
        limit: Option<i64>,
        /// Number of documents to skip.
        skip: Option<u64>,
    },
    /// `aggregate`: `{pipeline}`.
    Aggregate {
        /// Ordered pipeline stages.
        pipeline: Vec<Document>,
    },
    /// `insertOne`: `{document}`.
    InsertOne {
        /// Document to insert, already encoded.
        document: JsonValue,
    },
    /// `insertMany`: `{documents}`.
    InsertMany {
        /// Documents to insert, already encoded.
        documents: Vec<JsonValue>,
    },
    /// `updateOne`: `{filter, update}`.
    UpdateOne {
        /// Query filter.
        filter: Document,
        /// Update document.
        update: Document,
    },
    /// `updateMany`: `{filter, update}`.
    UpdateMany {
        /// Query filter.
        filter: Document,
        /// Update document.
        update: Document,
    },
    /// `deleteOne`: `{filter}`.
    DeleteOne {
        /// Query filter.
        filter: Document,
    },
    /// `deleteMany`: `{filter}`.
    DeleteMany {
        /// Query filter.
        filter: Document,
    },
}

impl OperationRequest {
    /// The operation this request performs.
    pub fn operation(&self) -> Operation {
        match self {
            OperationRequest::Find { .. } => Operation::Find,
            OperationRequest::Aggregate { .. } => Operation::Aggregate,
            OperationRequest::InsertOne { .. } => Operation::InsertOne,
            OperationRequest::InsertMany { .. } => Operation::InsertMany,
            OperationRequest::UpdateOne { .. } => Operation::UpdateOne,
            OperationRequest::UpdateMany { .. } => Operation::UpdateMany,
            OperationRequest::DeleteOne { .. } => Operation::DeleteOne,
            OperationRequest::DeleteMany { .. } => Operation::DeleteMany,
        }
    }

    /// The operation-specific part of the wire body.
    pub fn payload(&self) -> JsonMap<String, JsonValue> {
        let mut payload = JsonMap::new();
        match self {
            OperationRequest::Find {
                filter,
                projection,
                sort,
                limit,
                skip,
            } => {
                payload.insert("filter".to_string(), document_to_json(filter));
                payload.insert("projection".to_string(), document_to_json(projection));
                if let Some(sort) = sort {
                    payload.insert("sort".to_string(), document_to_json(sort));
                }
                if let Some(limit) = limit {
                    payload.insert("limit".to_string(), JsonValue::from(*limit));
                }
                if let Some(skip) = skip {
                    payload.insert("skip".to_string(), JsonValue::from(*skip));
                }
            }
            OperationRequest::Aggregate { pipeline } => {
                let stages = pipeline.iter().map(document_to_json).collect();
                payload.insert("pipeline".to_string(), JsonValue::Array(stages));
            }
            OperationRequest::InsertOne { document } => {
                payload.insert("document".to_string(), document.clone());
            }
            OperationRequest::InsertMany { documents } => {
                payload.insert(
                    "documents".to_string(),
                    JsonValue::Array(documents.clone()),
                );
            }
            OperationRequest::UpdateOne { filter, update }
            | OperationRequest::UpdateMany { filter, update } => {
                payload.insert("filter".to_string(), document_to_json(filter));
                payload.insert("update".to_string(), document_to_json(update));
            }
            OperationRequest::DeleteOne { filter } | OperationRequest::DeleteMany { filter } => {
                payload.insert("filter".to_string(), document_to_json(filter));
            }
        }
        payload
    }

    /// The complete wire body: routing fields followed by the payload.
    pub fn envelope(&self, data_source: &str, namespace: &Namespace) -> JsonValue {
        let mut body = JsonMap::new();
        body.insert("dataSource".to_string(), JsonValue::from(data_source));
        body.insert("database".to_string(), JsonValue::from(namespace.database()));
        body.insert(
            "collection".to_string(),
            JsonValue::from(namespace.collection()),
        );
        body.extend(self.payload());
        JsonValue::Object(body)
    }
}

/// Encode a BSON document as relaxed extended JSON.
pub(crate) fn document_to_json(doc: &Document) -> JsonValue {
    Bson::Document(doc.clone()).into_relaxed_extjson()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;
    use serde_json::json;

    #[test]
    fn test_operation_names() {
        let names: Vec<&str> = Operation::ALL.iter().map(Operation::name).collect();
        assert_eq!(
            names,
            vec![
                "find",
                "aggregate",
                "insertOne",
                "insertMany",
                "updateOne",
                "updateMany",
                "deleteOne",
                "deleteMany",
            ]
        );
        assert_eq!(Operation::InsertMany.to_string(), "insertMany");
    }

    #[test]
    fn test_is_read() {
        assert!(Operation::Find.is_read());
        assert!(Operation::Aggregate.is_read());
        assert!(!Operation::InsertOne.is_read());
        assert!(!Operation::DeleteMany.is_read());
    }

    #[test]
    fn test_namespace() {
        let ns = Namespace::new("shop", "orders");
        assert_eq!(ns.database(), "shop");
        assert_eq!(ns.collection(), "orders");
        assert_eq!(ns.to_string(), "shop.orders");
        assert!(ns.validate().is_ok());
    }

    #[test]
    fn test_namespace_requires_both_names() {
        for ns in [
            Namespace::new("", "orders"),
            Namespace::new("shop", ""),
            Namespace::new("", ""),
        ] {
            let err = ns.validate().unwrap_err();
            assert!(matches!(err, MongoError::Scope(_)));
            assert!(err.to_string().contains("Database or collection not specified"));
        }
    }

    #[test]
    fn test_find_payload_omits_unset_options() {
        let request = OperationRequest::Find {
            filter: doc! { "status": "active" },
            projection: Document::new(),
            sort: None,
            limit: None,
            skip: None,
        };
        assert_eq!(
            JsonValue::Object(request.payload()),
            json!({ "filter": { "status": "active" }, "projection": {} })
        );
    }

    #[test]
    fn test_find_payload_with_options() {
        let request = OperationRequest::Find {
            filter: Document::new(),
            projection: doc! { "name": 1 },
            sort: Some(doc! { "createdAt": -1 }),
            limit: Some(10),
            skip: Some(20),
        };
        assert_eq!(
            JsonValue::Object(request.payload()),
            json!({
                "filter": {},
                "projection": { "name": 1 },
                "sort": { "createdAt": -1 },
                "limit": 10,
                "skip": 20,
            })
        );
    }

    #[test]
    fn test_write_payloads() {
        let update = OperationRequest::UpdateMany {
            filter: doc! { "qty": { "$lt": 5 } },
            update: doc! { "$set": { "reorder": true } },
        };
        assert_eq!(update.operation(), Operation::UpdateMany);
        assert_eq!(
            JsonValue::Object(update.payload()),
            json!({
                "filter": { "qty": { "$lt": 5 } },
                "update": { "$set": { "reorder": true } },
            })
        );

        let delete = OperationRequest::DeleteOne {
            filter: doc! { "sku": "A-1" },
        };
        assert_eq!(
            JsonValue::Object(delete.payload()),
            json!({ "filter": { "sku": "A-1" } })
        );

        let insert = OperationRequest::InsertMany {
            documents: vec![json!({ "a": 1 }), json!({ "a": 2 })],
        };
        assert_eq!(
            JsonValue::Object(insert.payload()),
            json!({ "documents": [{ "a": 1 }, { "a": 2 }] })
        );
    }

    #[test]
    fn test_aggregate_payload_keeps_stage_order() {
        let request = OperationRequest::Aggregate {
            pipeline: vec![
                doc! { "$match": { "status": "A" } },
                doc! { "$group": { "_id": "$cust_id", "total": { "$sum": "$amount" } } },
                doc! { "$sort": { "total": -1 } },
            ],
        };
        let payload = request.payload();
        let stages = payload["pipeline"].as_array().unwrap();
        assert_eq!(stages.len(), 3);
        assert!(stages[0].get("$match").is_some());
        assert!(stages[1].get("$group").is_some());
        assert!(stages[2].get("$sort").is_some());
    }

    #[test]
    fn test_envelope_routing_fields() {
        let request = OperationRequest::DeleteMany {
            filter: doc! { "archived": true },
        };
        let body = request.envelope("Cluster0", &Namespace::new("shop", "orders"));
        assert_eq!(
            body,
            json!({
                "dataSource": "Cluster0",
                "database": "shop",
                "collection": "orders",
                "filter": { "archived": true },
            })
        );
    }

    #[test]
    fn test_object_ids_encode_as_extended_json() {
        let oid = bson::oid::ObjectId::parse_str("656a1ac0ad868f2b83dfb585").unwrap();
        let json = document_to_json(&doc! { "_id": oid });
        assert_eq!(json, json!({ "_id": { "$oid": "656a1ac0ad868f2b83dfb585" } }));
    }
}
