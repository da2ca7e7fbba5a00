//! Resources returned by the service.

use serde::{Deserialize, Serialize};

/// System properties every resource carries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    /// User chosen id.
    pub id: String,
    /// Self-link of the resource.
    #[serde(rename = "_self", default, skip_serializing_if = "String::is_empty")]
    pub self_link: String,
    /// Etag used for optimistic concurrency.
    #[serde(rename = "_etag", default, skip_serializing_if = "String::is_empty")]
    pub etag: String,
    /// Resource id assigned by the service.
    #[serde(rename = "_rid", default, skip_serializing_if = "String::is_empty")]
    pub rid: String,
    /// Last modified time in seconds since epoch.
    #[serde(rename = "_ts", default, skip_serializing_if = "Option::is_none")]
    pub ts: Option<i64>,
}

impl Resource {
    /// Create a resource with only its id set, as used when creating one.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }
}

/// A database.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Database {
    #[serde(flatten)]
    pub resource: Resource,
    /// Link of the collections feed.
    #[serde(rename = "_colls", default, skip_serializing_if = "String::is_empty")]
    pub colls: String,
    /// Link of the users feed.
    #[serde(rename = "_users", default, skip_serializing_if = "String::is_empty")]
    pub users: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexingPolicy {
    pub indexing_mode: String,
    pub automatic: bool,
}

impl Default for IndexingPolicy {
    fn default() -> Self {
        Self {
            indexing_mode: "consistent".to_string(),
            automatic: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartitionKeyDefinition {
    /// Json paths of the partition key, such as `/tenant`.
    pub paths: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// A collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    #[serde(flatten)]
    pub resource: Resource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indexing_policy: Option<IndexingPolicy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partition_key: Option<PartitionKeyDefinition>,
    #[serde(rename = "_docs", default, skip_serializing_if = "String::is_empty")]
    pub docs: String,
    #[serde(rename = "_udfs", default, skip_serializing_if = "String::is_empty")]
    pub udfs: String,
    #[serde(rename = "_sprocs", default, skip_serializing_if = "String::is_empty")]
    pub sprocs: String,
    #[serde(rename = "_triggers", default, skip_serializing_if = "String::is_empty")]
    pub triggers: String,
    #[serde(rename = "_conflicts", default, skip_serializing_if = "String::is_empty")]
    pub conflicts: String,
}

/// A document: system properties plus the user's own fields.
///
/// ```
/// use documentdb::Document;
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct User {
///     email: String,
/// }
///
/// let doc: Document<User> =
///     serde_json::from_str(r#"{"id":"1","_rid":"b5NCAA==","email":"a@b.c"}"#).unwrap();
/// assert_eq!(doc.resource.id, "1");
/// assert_eq!(doc.body.email, "a@b.c");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document<T> {
    #[serde(flatten)]
    pub resource: Resource,
    #[serde(rename = "_attachments", default, skip_serializing_if = "String::is_empty")]
    pub attachments: String,
    #[serde(flatten)]
    pub body: T,
}

/// A stored procedure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredProcedure {
    #[serde(flatten)]
    pub resource: Resource,
    /// Javascript source of the procedure.
    pub body: String,
}

/// A user defined function.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserDefinedFunction {
    #[serde(flatten)]
    pub resource: Resource,
    /// Javascript source of the function.
    pub body: String,
}

/// A range of the partition key space served by one physical partition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartitionKeyRange {
    #[serde(flatten)]
    pub resource: Resource,
    pub min_inclusive: String,
    pub max_exclusive: String,
}

/// A page of databases.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Databases {
    #[serde(rename = "_count", default)]
    pub count: usize,
    #[serde(rename = "Databases", default)]
    pub databases: Vec<Database>,
}

/// A page of collections.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Collections {
    #[serde(rename = "_count", default)]
    pub count: usize,
    #[serde(rename = "DocumentCollections", default)]
    pub collections: Vec<Collection>,
}

/// A page of documents.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Documents<T> {
    #[serde(rename = "_count", default)]
    pub count: usize,
    #[serde(rename = "Documents")]
    pub documents: Vec<T>,
}

/// A page of stored procedures.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StoredProcedures {
    #[serde(rename = "_count", default)]
    pub count: usize,
    #[serde(rename = "StoredProcedures", default)]
    pub stored_procedures: Vec<StoredProcedure>,
}

/// A page of user defined functions.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct UserDefinedFunctions {
    #[serde(rename = "_count", default)]
    pub count: usize,
    #[serde(rename = "UserDefinedFunctions", default)]
    pub user_defined_functions: Vec<UserDefinedFunction>,
}

/// A page of partition key ranges.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PartitionKeyRanges {
    #[serde(rename = "_count", default)]
    pub count: usize,
    #[serde(rename = "PartitionKeyRanges", default)]
    pub partition_key_ranges: Vec<PartitionKeyRange>,
}
