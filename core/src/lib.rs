//! Core components for talking to DocumentDB style services.
//!
//! This crate provides the foundational types and traits shared by the
//! documentdb client crates.
//!
//! ## Overview
//!
//! - **Context**: holds the transport ([`HttpSend`]) and environment ([`Env`]) implementations
//! - **Traits**: credential loading ([`ProvideCredential`]) and request signing ([`SignRequest`])
//! - **Signer**: the orchestrator that caches a credential and signs requests with it
//! - **Error**: one error type with an [`ErrorKind`] shared by every crate
//!
//! ## Example
//!
//! ```no_run
//! use documentdb_core::{Context, Error, ProvideCredential, Result, SignRequest, Signer, SigningCredential};
//! use async_trait::async_trait;
//! use http::request::Parts;
//!
//! #[derive(Clone, Debug)]
//! struct MyCredential {
//!     secret: String,
//! }
//!
//! impl SigningCredential for MyCredential {
//!     fn is_valid(&self) -> bool {
//!         !self.secret.is_empty()
//!     }
//! }
//!
//! #[derive(Debug)]
//! struct MyLoader;
//!
//! #[async_trait]
//! impl ProvideCredential for MyLoader {
//!     type Credential = MyCredential;
//!
//!     async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
//!         Ok(ctx.env_var("MY_SECRET").map(|secret| MyCredential { secret }))
//!     }
//! }
//!
//! #[derive(Debug)]
//! struct MyBuilder;
//!
//! #[async_trait]
//! impl SignRequest for MyBuilder {
//!     type Credential = MyCredential;
//!
//!     async fn sign_request(
//!         &self,
//!         _ctx: &Context,
//!         req: &mut Parts,
//!         credential: Option<&Self::Credential>,
//!     ) -> Result<()> {
//!         let cred = credential.ok_or_else(|| Error::request_invalid("credential is required"))?;
//!         req.headers.insert("x-secret", cred.secret.parse()?);
//!         Ok(())
//!     }
//! }
//!
//! # async fn example() -> Result<()> {
//! let signer = Signer::new(Context::default(), MyLoader, MyBuilder);
//!
//! let mut parts = http::Request::get("https://example.com")
//!     .body(())?
//!     .into_parts()
//!     .0;
//! signer.sign(&mut parts).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Utilities
//!
//! - [`hash`]: base64 and HMAC-SHA256 helpers
//! - [`time`]: RFC 1123 date handling
//! - [`utils`]: redaction of secrets in `Debug` output

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod hash;
pub mod time;
pub mod utils;

mod error;
pub use error::{Error, ErrorKind, Result};

mod context;
pub use context::{Context, Env, HttpSend, NoopEnv, NoopHttpSend, OsEnv, StaticEnv};

mod api;
pub use api::{ProvideCredential, SignRequest, SigningCredential};
mod signer;
pub use signer::Signer;
