use crate::constants::*;
use crate::options::apply_options;
use crate::response::classify;
use crate::{
    CallOption, Config, EnvCredentialProvider, Expect, MasterKey, Query, RequestSigner,
    ResourceLink, Response, StaticCredentialProvider,
};
use async_trait::async_trait;
use bytes::Bytes;
use documentdb_core::{Context, Error, Result, Signer};
use http::request::Parts;
use http::{header, HeaderValue, Method, StatusCode};
use log::debug;
use percent_encoding::utf8_percent_encode;
use std::fmt::Debug;

/// ClientApi is the set of raw operations on resource links.
///
/// Bodies go in and out as json bytes; [`DocumentDb`](crate::DocumentDb)
/// adds the typed layer on top. Implement this trait to stub out the
/// service in tests.
#[async_trait]
pub trait ClientApi: Debug + Send + Sync + 'static {
    /// GET the resource or feed, expecting `200 OK`.
    async fn read(&self, link: &str, opts: &[CallOption]) -> Result<Response<Bytes>>;

    /// DELETE the resource, expecting `204 No Content`.
    async fn delete(&self, link: &str, opts: &[CallOption]) -> Result<Response<()>>;

    /// POST a query to the feed, expecting `200 OK`.
    async fn query(&self, link: &str, query: &Query, opts: &[CallOption])
        -> Result<Response<Bytes>>;

    /// POST a new resource to the feed, expecting `201 Created`.
    async fn create(&self, link: &str, body: Bytes, opts: &[CallOption])
        -> Result<Response<Bytes>>;

    /// POST a resource with upsert enabled, expecting any 2xx status.
    async fn upsert(&self, link: &str, body: Bytes, opts: &[CallOption])
        -> Result<Response<Bytes>>;

    /// PUT the resource, expecting `200 OK`.
    async fn replace(&self, link: &str, body: Bytes, opts: &[CallOption])
        -> Result<Response<Bytes>>;

    /// POST to a stored procedure, expecting `200 OK`.
    async fn execute(&self, link: &str, body: Bytes, opts: &[CallOption])
        -> Result<Response<Bytes>>;
}

/// Client sends signed requests to a documentdb endpoint.
///
/// ```no_run
/// use documentdb::{Client, ClientApi, Config};
/// use documentdb_core::{Context, OsEnv};
/// use documentdb_http_send_reqwest::ReqwestHttpSend;
///
/// # async fn example() -> documentdb_core::Result<()> {
/// let ctx = Context::new()
///     .with_http_send(ReqwestHttpSend::default())
///     .with_env(OsEnv);
/// let config = Config::default().from_env(&ctx);
/// let client = Client::from_config(ctx, config)?;
///
/// let resp = client.read("/dbs/mydb/", &[]).await?;
/// println!("{}", String::from_utf8_lossy(resp.body()));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Client {
    endpoint: String,
    signer: Signer<MasterKey>,
}

/// Body of an outgoing request.
enum Payload {
    Empty,
    Json(Bytes),
    Query(Bytes),
}

impl Client {
    /// Create a client for `endpoint` that signs requests with `signer`.
    pub fn new(endpoint: impl Into<String>, signer: Signer<MasterKey>) -> Self {
        Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            signer,
        }
    }

    /// Create a client from config.
    ///
    /// The endpoint is required. The master key is taken from config when
    /// set, or loaded from `DOCUMENTDB_MASTER_KEY` on first use otherwise.
    pub fn from_config(ctx: Context, config: Config) -> Result<Self> {
        let endpoint = match config.endpoint {
            Some(endpoint) if !endpoint.is_empty() => endpoint,
            _ => return Err(Error::config_invalid("endpoint is required")),
        };
        endpoint.parse::<http::Uri>().map_err(|e| {
            Error::config_invalid(format!("endpoint {endpoint} is not a valid uri")).with_source(e)
        })?;

        let mut builder = RequestSigner::new();
        if let Some(user_agent) = config.user_agent {
            builder = builder.with_user_agent(user_agent);
        }

        let signer = match config.master_key {
            Some(key) => Signer::new(ctx, StaticCredentialProvider::new(&key), builder),
            None => Signer::new(ctx, EnvCredentialProvider::new(), builder),
        };

        Ok(Self::new(endpoint, signer))
    }

    /// The endpoint requests are sent to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn build(&self, method: Method, link: &str, payload: &Payload) -> Result<Parts> {
        // The link is signed as given; only the wire path is escaped.
        let path = utf8_percent_encode(link.trim_start_matches('/'), &LINK_PATH_ENCODE_SET);
        let uri = format!("{}/{}", self.endpoint, path);
        let (mut parts, _) = http::Request::builder()
            .method(method)
            .uri(uri)
            .body(())?
            .into_parts();

        if let Payload::Json(_) = payload {
            parts.headers.insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static(CONTENT_TYPE_JSON),
            );
        }
        parts.extensions.insert(ResourceLink::parse(link));

        Ok(parts)
    }

    async fn send(
        &self,
        method: Method,
        link: &str,
        payload: Payload,
        opts: &[CallOption],
        expect: Expect,
    ) -> Result<Response<Bytes>> {
        let mut parts = self.build(method, link, &payload)?;

        self.signer.sign(&mut parts).await?;
        apply_options(&mut parts, opts)?;

        let body = match payload {
            Payload::Empty => Bytes::new(),
            Payload::Json(body) => body,
            Payload::Query(body) => {
                parts.headers.insert(
                    header::CONTENT_TYPE,
                    HeaderValue::from_static(CONTENT_TYPE_QUERY_JSON),
                );
                parts
                    .headers
                    .insert(X_MS_DOCUMENTDB_ISQUERY, HeaderValue::from_static("true"));
                parts
                    .headers
                    .insert(header::CONTENT_LENGTH, HeaderValue::from(body.len()));
                body
            }
        };

        debug!("sending request: {} {}", parts.method, parts.uri);
        let resp = self
            .signer
            .context()
            .http_send(http::Request::from_parts(parts, body))
            .await?;
        debug!("got response: {}", resp.status());

        classify(resp, expect)
    }
}

#[async_trait]
impl ClientApi for Client {
    async fn read(&self, link: &str, opts: &[CallOption]) -> Result<Response<Bytes>> {
        self.send(
            Method::GET,
            link,
            Payload::Empty,
            opts,
            Expect::Status(StatusCode::OK),
        )
        .await
    }

    async fn delete(&self, link: &str, opts: &[CallOption]) -> Result<Response<()>> {
        let resp = self
            .send(
                Method::DELETE,
                link,
                Payload::Empty,
                opts,
                Expect::Status(StatusCode::NO_CONTENT),
            )
            .await?;
        Ok(resp.discard())
    }

    async fn query(
        &self,
        link: &str,
        query: &Query,
        opts: &[CallOption],
    ) -> Result<Response<Bytes>> {
        let body = serde_json::to_vec(query)
            .map_err(|e| Error::request_invalid("failed to serialize query").with_source(e))?;
        self.send(
            Method::POST,
            link,
            Payload::Query(body.into()),
            opts,
            Expect::Status(StatusCode::OK),
        )
        .await
    }

    async fn create(
        &self,
        link: &str,
        body: Bytes,
        opts: &[CallOption],
    ) -> Result<Response<Bytes>> {
        self.send(
            Method::POST,
            link,
            Payload::Json(body),
            opts,
            Expect::Status(StatusCode::CREATED),
        )
        .await
    }

    async fn upsert(
        &self,
        link: &str,
        body: Bytes,
        opts: &[CallOption],
    ) -> Result<Response<Bytes>> {
        let mut opts = opts.to_vec();
        opts.push(CallOption::Upsert);
        self.send(
            Method::POST,
            link,
            Payload::Json(body),
            &opts,
            Expect::Success,
        )
        .await
    }

    async fn replace(
        &self,
        link: &str,
        body: Bytes,
        opts: &[CallOption],
    ) -> Result<Response<Bytes>> {
        self.send(
            Method::PUT,
            link,
            Payload::Json(body),
            opts,
            Expect::Status(StatusCode::OK),
        )
        .await
    }

    async fn execute(
        &self,
        link: &str,
        body: Bytes,
        opts: &[CallOption],
    ) -> Result<Response<Bytes>> {
        self.send(
            Method::POST,
            link,
            Payload::Json(body),
            opts,
            Expect::Status(StatusCode::OK),
        )
        .await
    }
}
