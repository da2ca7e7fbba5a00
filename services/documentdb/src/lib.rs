//! DocumentDB client with master key authorization
//!
//! This crate turns operations on databases, collections, documents, stored
//! procedures and user defined functions into signed HTTP requests:
//!
//! - [`ResourceLink`] derives the resource type and id a request is signed
//!   for, from either a self-link or a named link
//! - [`RequestSigner`] computes the HMAC-SHA256 signature and writes the
//!   default headers
//! - [`Client`] dispatches requests and classifies responses
//! - [`DocumentDb`] is the typed facade on top of any [`ClientApi`]
//!
//! # Example
//!
//! ```rust,no_run
//! use documentdb::{Client, Config, Database, DocumentDb, Query};
//! use documentdb_core::{Context, OsEnv};
//! use documentdb_http_send_reqwest::ReqwestHttpSend;
//!
//! #[tokio::main]
//! async fn main() -> documentdb_core::Result<()> {
//!     let ctx = Context::new()
//!         .with_http_send(ReqwestHttpSend::default())
//!         .with_env(OsEnv);
//!
//!     // Endpoint and master key come from DOCUMENTDB_ENDPOINT and
//!     // DOCUMENTDB_MASTER_KEY unless set explicitly.
//!     let config = Config::default().from_env(&ctx);
//!     let db = DocumentDb::new(Client::from_config(ctx, config)?);
//!
//!     let database: Database = db.read_database("dbs/mydb", &[]).await?;
//!     println!("database: {}", database.resource.id);
//!
//!     let query = Query::new("SELECT * FROM root r WHERE r.id = @id").with_parameter("@id", "1");
//!     let docs = db
//!         .query_documents::<serde_json::Value>("dbs/mydb/colls/mycoll", &query, &[])
//!         .await?;
//!     println!("found {} documents", docs.body().count);
//!
//!     Ok(())
//! }
//! ```

mod constants;

mod config;
pub use config::Config;

mod key;
pub use key::{KeyDecodeError, MasterKey};

mod link;
pub use link::ResourceLink;

mod sign_request;
pub use sign_request::RequestSigner;

mod options;
pub use options::{apply_options, CallOption, Consistency};

mod response;
pub use response::{classify, Expect, RequestError, Response};

mod client;
pub use client::{Client, ClientApi};

mod query;
pub use query::{Parameter, Query};

mod models;
pub use models::*;

mod document_db;
pub use document_db::DocumentDb;

mod iterator;
pub use iterator::DocumentIterator;

mod provide_credential;
pub use provide_credential::*;
