use crate::constants::*;
use documentdb_core::{Error, Result};
use http::request::Parts;
use http::{header, HeaderValue};
use serde::{Deserialize, Serialize};

/// Consistency level override for a single request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Consistency {
    /// Strong consistency.
    Strong,
    /// Bounded staleness.
    Bounded,
    /// Session consistency.
    Session,
    /// Eventual consistency.
    Eventual,
}

impl Consistency {
    /// The header value of this level.
    pub fn as_str(&self) -> &'static str {
        match self {
            Consistency::Strong => "strong",
            Consistency::Bounded => "bounded",
            Consistency::Session => "session",
            Consistency::Eventual => "eventual",
        }
    }
}

/// CallOption adjusts the headers of a single request.
///
/// Options are applied after the default headers, in the order given, and
/// only ever touch headers. The first option that fails aborts the rest.
///
/// ```
/// use documentdb::{CallOption, Consistency};
///
/// let opts = vec![
///     CallOption::partition_key("tenant-1"),
///     CallOption::ConsistencyLevel(Consistency::Session),
///     CallOption::Limit(100),
/// ];
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "option", content = "value", rename_all = "snake_case")]
pub enum CallOption {
    /// Partition key the request targets.
    ///
    /// Sent as a JSON array: scalar values are wrapped, arrays are sent
    /// as-is.
    PartitionKey(serde_json::Value),
    /// Create the document, or replace it when it exists already.
    Upsert,
    /// Maximum number of items per page.
    Limit(usize),
    /// Continuation token of the page to read. Empty tokens are ignored.
    Continuation(String),
    /// Consistency level override, which must be the same or weaker than the
    /// account's level.
    ConsistencyLevel(Consistency),
    /// Session token for session consistency.
    SessionToken(String),
    /// Allow a query to fan out to all partitions.
    CrossPartition,
    /// Only apply the operation if the resource etag matches.
    IfMatch(String),
    /// Only return the resource if its etag changed.
    IfNoneMatch(String),
    /// Only return the resource if it was modified after this RFC 1123 date.
    IfModifiedSince(String),
    /// Restrict a feed read to one partition key range.
    PartitionKeyRangeId(String),
    /// Read the collection's change feed instead of its documents.
    ChangeFeed,
}

impl CallOption {
    /// Build a [`CallOption::PartitionKey`] from any json value.
    pub fn partition_key(value: impl Into<serde_json::Value>) -> Self {
        CallOption::PartitionKey(value.into())
    }

    /// Write this option into the request headers.
    pub fn apply(&self, req: &mut Parts) -> Result<()> {
        match self {
            CallOption::PartitionKey(value) => {
                let pk = match value {
                    serde_json::Value::Array(_) => serde_json::to_string(value),
                    v => serde_json::to_string(&[v]),
                }
                .map_err(|e| {
                    Error::request_invalid("failed to serialize partition key").with_source(e)
                })?;
                req.headers
                    .insert(X_MS_DOCUMENTDB_PARTITIONKEY, header_value(&pk)?);
            }
            CallOption::Upsert => {
                req.headers
                    .insert(X_MS_DOCUMENTDB_IS_UPSERT, HeaderValue::from_static("true"));
            }
            CallOption::Limit(limit) => {
                req.headers.insert(X_MS_MAX_ITEM_COUNT, HeaderValue::from(*limit));
            }
            CallOption::Continuation(token) => {
                if !token.is_empty() {
                    req.headers.insert(X_MS_CONTINUATION, header_value(token)?);
                }
            }
            CallOption::ConsistencyLevel(level) => {
                req.headers.insert(
                    X_MS_CONSISTENCY_LEVEL,
                    HeaderValue::from_static(level.as_str()),
                );
            }
            CallOption::SessionToken(token) => {
                req.headers.insert(X_MS_SESSION_TOKEN, header_value(token)?);
            }
            CallOption::CrossPartition => {
                req.headers.insert(
                    X_MS_DOCUMENTDB_QUERY_ENABLECROSSPARTITION,
                    HeaderValue::from_static("True"),
                );
            }
            CallOption::IfMatch(etag) => {
                req.headers.insert(header::IF_MATCH, header_value(etag)?);
            }
            CallOption::IfNoneMatch(etag) => {
                req.headers.insert(header::IF_NONE_MATCH, header_value(etag)?);
            }
            CallOption::IfModifiedSince(date) => {
                req.headers
                    .insert(header::IF_MODIFIED_SINCE, header_value(date)?);
            }
            CallOption::PartitionKeyRangeId(id) => {
                req.headers
                    .insert(X_MS_DOCUMENTDB_PARTITIONKEYRANGEID, header_value(id)?);
            }
            CallOption::ChangeFeed => {
                req.headers
                    .insert(A_IM, HeaderValue::from_static("Incremental feed"));
            }
        }

        Ok(())
    }
}

/// Apply options in order, stopping at the first failure.
pub fn apply_options(req: &mut Parts, opts: &[CallOption]) -> Result<()> {
    opts.iter().try_for_each(|opt| opt.apply(req))
}

fn header_value(v: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(v)
        .map_err(|e| Error::request_invalid(format!("invalid header value: {v:?}")).with_source(e))
}
