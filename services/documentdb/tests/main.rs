use std::collections::VecDeque;
use std::env;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::TimeZone;
use documentdb::{
    CallOption, Client, ClientApi, Config, Consistency, Database, DocumentDb, DocumentIterator,
    Query, RequestError, RequestSigner, StaticCredentialProvider,
};
use documentdb_core::{Context, ErrorKind, HttpSend, OsEnv, Result, Signer};
use documentdb_http_send_reqwest::ReqwestHttpSend;
use http::StatusCode;
use log::{debug, warn};
use pretty_assertions::assert_eq;
use serde_json::json;

const KEY: &str = "YXJpZWwNCg==";

/// MockHttpSend records every request and answers with queued responses.
///
/// Once the queue is empty it answers `200 OK` with an empty json object.
#[derive(Debug, Clone, Default)]
struct MockHttpSend {
    requests: Arc<Mutex<Vec<http::Request<Bytes>>>>,
    responses: Arc<Mutex<VecDeque<http::Response<Bytes>>>>,
}

impl MockHttpSend {
    fn respond(&self, status: u16, headers: &[(&str, &str)], body: &str) -> &Self {
        let mut builder = http::Response::builder().status(status);
        for (k, v) in headers {
            builder = builder.header(*k, *v);
        }
        let resp = builder.body(Bytes::from(body.to_string())).unwrap();
        self.responses.lock().unwrap().push_back(resp);
        self
    }

    fn requests(&self) -> std::sync::MutexGuard<'_, Vec<http::Request<Bytes>>> {
        self.requests.lock().unwrap()
    }
}

#[async_trait]
impl HttpSend for MockHttpSend {
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        debug!("mock got request: {:?}", req);
        self.requests.lock().unwrap().push(req);

        let resp = self.responses.lock().unwrap().pop_front();
        Ok(resp.unwrap_or_else(|| {
            http::Response::builder()
                .status(StatusCode::OK)
                .body(Bytes::from_static(b"{}"))
                .unwrap()
        }))
    }
}

fn init_client(key: &str) -> (Client, MockHttpSend) {
    let _ = env_logger::builder().is_test(true).try_init();

    let mock = MockHttpSend::default();
    let ctx = Context::new().with_http_send(mock.clone());
    let builder = RequestSigner::new()
        .with_user_agent("documentdb-test/0.1")
        .with_time(chrono::Utc.with_ymd_and_hms(2006, 1, 2, 15, 4, 5).unwrap());
    let signer = Signer::new(ctx, StaticCredentialProvider::new(key), builder);

    (Client::new("https://localhost:8081/", signer), mock)
}

fn header<'a>(req: &'a http::Request<Bytes>, name: &str) -> Option<&'a str> {
    req.headers().get(name).map(|v| v.to_str().unwrap())
}

#[tokio::test]
async fn test_read_sends_signed_request() -> Result<()> {
    let (client, mock) = init_client(KEY);
    mock.respond(200, &[], r#"{"id":"mydb","_rid":"b5NCAA=="}"#);

    let resp = client.read("/dbs/b5NCAA==/", &[]).await?;
    assert_eq!(resp.status(), StatusCode::OK);

    let reqs = mock.requests();
    let req = &reqs[0];
    assert_eq!(req.method(), http::Method::GET);
    assert_eq!(req.uri().to_string(), "https://localhost:8081/dbs/b5NCAA==/");
    assert_eq!(header(req, "x-ms-date"), Some("Mon, 02 Jan 2006 15:04:05 GMT"));
    assert_eq!(header(req, "x-ms-version"), Some("2017-02-22"));
    assert_eq!(header(req, "user-agent"), Some("documentdb-test/0.1"));
    assert_eq!(
        header(req, "authorization"),
        Some("type%3Dmaster%26ver%3D1.0%26sig%3DUwJGanHcPIsq%2BElhd5bk0GIBVa0qXAL2tEMvKRZDhh4%3D")
    );
    assert!(req.body().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_named_link_with_space_is_escaped_on_the_wire() -> Result<()> {
    let (client, mock) = init_client(KEY);

    client.read("dbs/my db", &[]).await?;

    let reqs = mock.requests();
    let req = &reqs[0];
    assert_eq!(req.uri().to_string(), "https://localhost:8081/dbs/my%20db");
    // Signed over the raw id `dbs/my db`, not the escaped path.
    assert_eq!(
        header(req, "authorization"),
        Some("type%3Dmaster%26ver%3D1.0%26sig%3DTWLAHT1OjO2zXq1d6UjRBlLQJjfBlz4NfMZbhUrHfVk%3D")
    );
    Ok(())
}

#[tokio::test]
async fn test_unexpected_status_carries_service_error() {
    let (client, mock) = init_client(KEY);
    mock.respond(500, &[], r#"{"code":"500","message":"DocumentDB error"}"#);

    let err = client.read("/dbs/b5NCAA==/", &[]).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::UnexpectedStatus);
    assert_eq!(err.to_string(), "500, DocumentDB error");
    let body = err.downcast_ref::<RequestError>().unwrap();
    assert_eq!(body.code, "500");
    assert_eq!(body.message, "DocumentDB error");
}

#[tokio::test]
async fn test_query_headers() -> Result<()> {
    let (client, mock) = init_client(KEY);
    let query = Query::new("SELECT * FROM root r WHERE r.id = @id").with_parameter("@id", "1");

    client
        .query(
            "dbs/mydb/colls/mycoll/docs",
            &query,
            &[CallOption::CrossPartition],
        )
        .await?;

    let reqs = mock.requests();
    let req = &reqs[0];
    assert_eq!(req.method(), http::Method::POST);
    assert_eq!(header(req, "content-type"), Some("application/query+json"));
    assert_eq!(header(req, "x-ms-documentdb-isquery"), Some("true"));
    assert_eq!(
        header(req, "content-length"),
        Some(req.body().len().to_string().as_str())
    );
    assert_eq!(
        header(req, "x-ms-documentdb-query-enablecrosspartition"),
        Some("True")
    );
    let sent: Query = serde_json::from_slice(req.body()).unwrap();
    assert_eq!(sent, query);
    Ok(())
}

#[tokio::test]
async fn test_create_expects_created() {
    let (client, mock) = init_client(KEY);
    mock.respond(201, &[], r#"{"id":"1"}"#)
        .respond(200, &[], r#"{"id":"1"}"#);

    let body = Bytes::from_static(br#"{"id":"1"}"#);
    client
        .create("dbs/mydb/colls/mycoll/docs", body.clone(), &[])
        .await
        .unwrap();

    let err = client
        .create("dbs/mydb/colls/mycoll/docs", body, &[])
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnexpectedStatus);
    assert_eq!(err.to_string(), r#"200, {"id":"1"}"#);

    let reqs = mock.requests();
    assert_eq!(header(&reqs[0], "content-type"), Some("application/json"));
    assert_eq!(reqs[0].body().as_ref(), br#"{"id":"1"}"#);
}

#[tokio::test]
async fn test_upsert_accepts_any_success() -> Result<()> {
    let (client, mock) = init_client(KEY);
    mock.respond(201, &[], "{}").respond(200, &[], "{}");

    let body = Bytes::from_static(br#"{"id":"1"}"#);
    client
        .upsert("dbs/mydb/colls/mycoll/docs", body.clone(), &[])
        .await?;
    client
        .upsert("dbs/mydb/colls/mycoll/docs", body, &[])
        .await?;

    for req in mock.requests().iter() {
        assert_eq!(req.method(), http::Method::POST);
        assert_eq!(header(req, "x-ms-documentdb-is-upsert"), Some("true"));
    }
    Ok(())
}

#[tokio::test]
async fn test_replace_and_execute() -> Result<()> {
    let (client, mock) = init_client(KEY);

    client
        .replace(
            "dbs/mydb/colls/mycoll/docs/1",
            Bytes::from_static(b"{}"),
            &[CallOption::IfMatch("\"etag\"".to_string())],
        )
        .await?;
    client
        .execute(
            "dbs/mydb/colls/mycoll/sprocs/hello",
            Bytes::from_static(br#"["ariel"]"#),
            &[],
        )
        .await?;

    let reqs = mock.requests();
    assert_eq!(reqs[0].method(), http::Method::PUT);
    assert_eq!(header(&reqs[0], "if-match"), Some("\"etag\""));
    assert_eq!(reqs[1].method(), http::Method::POST);
    assert_eq!(
        reqs[1].uri().path(),
        "/dbs/mydb/colls/mycoll/sprocs/hello"
    );
    Ok(())
}

#[tokio::test]
async fn test_delete_expects_no_content() {
    let (client, mock) = init_client(KEY);
    mock.respond(204, &[], "").respond(404, &[], r#"{"code":"NotFound","message":"Resource Not Found"}"#);

    let resp = client.delete("dbs/mydb", &[]).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let err = client.delete("dbs/mydb", &[]).await.unwrap_err();
    assert_eq!(err.to_string(), "NotFound, Resource Not Found");
    assert_eq!(mock.requests()[0].method(), http::Method::DELETE);
}

#[tokio::test]
async fn test_options_follow_default_headers_in_order() -> Result<()> {
    let (client, mock) = init_client(KEY);

    client
        .read(
            "dbs/mydb/colls/mycoll/docs",
            &[
                CallOption::Continuation("first".to_string()),
                CallOption::ConsistencyLevel(Consistency::Session),
                CallOption::partition_key("tenant-1"),
                CallOption::Continuation("second".to_string()),
            ],
        )
        .await?;

    let reqs = mock.requests();
    let req = &reqs[0];
    assert_eq!(header(req, "x-ms-continuation"), Some("second"));
    assert_eq!(header(req, "x-ms-consistency-level"), Some("session"));
    assert_eq!(
        header(req, "x-ms-documentdb-partitionkey"),
        Some(r#"["tenant-1"]"#)
    );
    assert!(header(req, "authorization").is_some());
    Ok(())
}

#[tokio::test]
async fn test_failed_option_aborts_send() {
    let (client, mock) = init_client(KEY);

    let err = client
        .read(
            "dbs/mydb",
            &[
                CallOption::Limit(10),
                CallOption::IfNoneMatch("bad\r\netag".to_string()),
            ],
        )
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::RequestInvalid);
    assert!(mock.requests().is_empty());
}

#[tokio::test]
async fn test_invalid_key_aborts_send() {
    let (client, mock) = init_client("not base64!");

    let err = client.read("dbs/mydb", &[]).await.unwrap_err();

    assert!(err.is_credential_error());
    assert!(mock.requests().is_empty());
}

#[tokio::test]
async fn test_transport_error_is_propagated() {
    let client = Client::from_config(
        Context::new(),
        Config::default()
            .with_endpoint("https://localhost:8081")
            .with_master_key(KEY),
    )
    .unwrap();

    let err = client.read("dbs/mydb", &[]).await.unwrap_err();
    assert!(err.is_transport_error());
}

#[tokio::test]
async fn test_document_iterator_follows_continuation() -> Result<()> {
    let (client, mock) = init_client(KEY);
    mock.respond(
        200,
        &[("x-ms-continuation", "-RID:b5NCAJuVNXs=#RT:1")],
        r#"{"_count":2,"Documents":[{"id":"1"},{"id":"2"}]}"#,
    )
    .respond(200, &[], r#"{"_count":1,"Documents":[{"id":"3"}]}"#);

    let db = DocumentDb::new(client);
    let mut iter = DocumentIterator::<serde_json::Value>::new(
        "dbs/mydb/colls/mycoll",
        Query::new("SELECT * FROM root"),
        vec![CallOption::Limit(2)],
    );

    let first = iter.next_page(&db).await?.unwrap();
    assert_eq!(first, vec![json!({"id": "1"}), json!({"id": "2"})]);
    assert_eq!(iter.continuation(), Some("-RID:b5NCAJuVNXs=#RT:1"));

    let second = iter.next_page(&db).await?.unwrap();
    assert_eq!(second, vec![json!({"id": "3"})]);
    assert!(iter.is_done());

    assert_eq!(iter.next_page(&db).await?, None);

    let reqs = mock.requests();
    assert_eq!(reqs.len(), 2);
    assert_eq!(header(&reqs[0], "x-ms-continuation"), None);
    assert_eq!(
        header(&reqs[1], "x-ms-continuation"),
        Some("-RID:b5NCAJuVNXs=#RT:1")
    );
    assert_eq!(header(&reqs[1], "x-ms-max-item-count"), Some("2"));
    Ok(())
}

#[tokio::test]
async fn test_read_database_live() -> Result<()> {
    let _ = env_logger::builder().is_test(true).try_init();
    let _ = dotenv::dotenv();

    if env::var("DOCUMENTDB_TEST").ok().as_deref() != Some("on") {
        warn!("DOCUMENTDB_TEST is not set, skipped");
        return Ok(());
    }

    let ctx = Context::new()
        .with_http_send(ReqwestHttpSend::default())
        .with_env(OsEnv);
    let config = Config::default().from_env(&ctx);
    let db = DocumentDb::new(Client::from_config(ctx, config)?);

    let name = env::var("DOCUMENTDB_TEST_DATABASE").expect("env DOCUMENTDB_TEST_DATABASE must set");
    let database: Database = db.read_database(&format!("dbs/{name}"), &[]).await?;
    debug!("got database: {:?}", database);
    assert_eq!(database.resource.id, name);
    Ok(())
}
