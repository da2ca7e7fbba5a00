//! [`HttpSend`] implementation backed by [`reqwest`].
//!
//! ```no_run
//! use documentdb_core::{Context, OsEnv};
//! use documentdb_http_send_reqwest::ReqwestHttpSend;
//!
//! let ctx = Context::new()
//!     .with_http_send(ReqwestHttpSend::default())
//!     .with_env(OsEnv);
//! ```

use async_trait::async_trait;
use bytes::Bytes;
use documentdb_core::{Error, HttpSend, Result};
use http_body_util::BodyExt;
use reqwest::{Client, Request};

/// ReqwestHttpSend sends requests through a shared [`reqwest::Client`].
///
/// Connection pooling, TLS and timeouts are whatever the wrapped client is
/// configured with.
#[derive(Debug, Default)]
pub struct ReqwestHttpSend {
    client: Client,
}

impl ReqwestHttpSend {
    /// Create a new ReqwestHttpSend with a reqwest::Client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpSend for ReqwestHttpSend {
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        let req = Request::try_from(req).map_err(|e| {
            Error::request_invalid("failed to convert request for reqwest").with_source(e)
        })?;
        let resp: http::Response<_> = self
            .client
            .execute(req)
            .await
            .map_err(|e| Error::transport("failed to send request").with_source(e))?
            .into();

        let (parts, body) = resp.into_parts();
        let bs = BodyExt::collect(body)
            .await
            .map(|buf| buf.to_bytes())
            .map_err(|e| Error::transport("failed to read response body").with_source(e))?;
        Ok(http::Response::from_parts(parts, bs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use documentdb_core::{Context, ErrorKind};

    #[tokio::test]
    async fn test_unreachable_endpoint_is_transport_error() {
        let ctx = Context::new().with_http_send(ReqwestHttpSend::default());
        // Port 9 (discard) on localhost is expected to refuse connections.
        let req = http::Request::get("http://127.0.0.1:9/dbs")
            .body(Bytes::new())
            .unwrap();

        let err = ctx.http_send(req).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
    }
}
