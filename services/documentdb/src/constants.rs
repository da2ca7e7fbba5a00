use percent_encoding::{AsciiSet, CONTROLS};

// Headers used by the documentdb REST protocol.
pub const X_MS_DATE: &str = "x-ms-date";
pub const X_MS_VERSION: &str = "x-ms-version";
pub const X_MS_DOCUMENTDB_ISQUERY: &str = "x-ms-documentdb-isquery";
pub const X_MS_DOCUMENTDB_IS_UPSERT: &str = "x-ms-documentdb-is-upsert";
pub const X_MS_DOCUMENTDB_PARTITIONKEY: &str = "x-ms-documentdb-partitionkey";
pub const X_MS_MAX_ITEM_COUNT: &str = "x-ms-max-item-count";
pub const X_MS_CONTINUATION: &str = "x-ms-continuation";
pub const X_MS_CONSISTENCY_LEVEL: &str = "x-ms-consistency-level";
pub const X_MS_SESSION_TOKEN: &str = "x-ms-session-token";
pub const X_MS_DOCUMENTDB_QUERY_ENABLECROSSPARTITION: &str =
    "x-ms-documentdb-query-enablecrosspartition";
pub const X_MS_ACTIVITY_ID: &str = "x-ms-activity-id";
pub const X_MS_REQUEST_CHARGE: &str = "x-ms-request-charge";
pub const X_MS_DOCUMENTDB_PARTITIONKEYRANGEID: &str = "x-ms-documentdb-partitionkeyrangeid";
pub const A_IM: &str = "a-im";

/// Protocol version sent in `x-ms-version`.
pub const SUPPORTED_VERSION: &str = "2017-02-22";

/// AsciiSet for resource link paths.
///
/// Encodes controls, space and the characters not allowed in a path, but
/// keeps `/` and the `=`/`+` of base64 resource ids as they are.
pub static LINK_PATH_ENCODE_SET: AsciiSet = CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

pub const CONTENT_TYPE_QUERY_JSON: &str = "application/query+json";
pub const CONTENT_TYPE_JSON: &str = "application/json";

// Env values used by config and credential providers.
pub const DOCUMENTDB_ENDPOINT: &str = "DOCUMENTDB_ENDPOINT";
pub const DOCUMENTDB_MASTER_KEY: &str = "DOCUMENTDB_MASTER_KEY";
pub const DOCUMENTDB_USER_AGENT: &str = "DOCUMENTDB_USER_AGENT";
