use crate::constants::*;
use bytes::Bytes;
use documentdb_core::{Error, Result};
use http::{header, HeaderMap, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// The status a call expects from the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expect {
    /// Exactly this status code.
    Status(StatusCode),
    /// Any 2xx status code.
    Success,
}

impl Expect {
    /// Whether `status` satisfies the expectation.
    pub fn matches(&self, status: StatusCode) -> bool {
        match self {
            Expect::Status(code) => *code == status,
            Expect::Success => status.is_success(),
        }
    }
}

/// RequestError is the error body returned by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{code}, {message}")]
pub struct RequestError {
    /// Service error code, such as `NotFound`.
    pub code: String,
    /// Human readable message.
    pub message: String,
}

/// A successful response.
#[derive(Debug, Clone)]
pub struct Response<T> {
    status: StatusCode,
    headers: HeaderMap,
    body: T,
}

impl<T> Response<T> {
    /// The status code of the response.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// The response headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Borrow the body.
    pub fn body(&self) -> &T {
        &self.body
    }

    /// Take the body, dropping the metadata.
    pub fn into_body(self) -> T {
        self.body
    }

    /// Split the response into its metadata and body.
    pub fn into_parts(self) -> (StatusCode, HeaderMap, T) {
        (self.status, self.headers, self.body)
    }

    /// Continuation token of the next page, if there is one.
    pub fn continuation(&self) -> Option<&str> {
        self.header_str(X_MS_CONTINUATION)
            .filter(|token| !token.is_empty())
    }

    /// Session token to pass along for session consistency.
    pub fn session_token(&self) -> Option<&str> {
        self.header_str(X_MS_SESSION_TOKEN)
    }

    /// Request units consumed by the call.
    pub fn request_charge(&self) -> Option<f64> {
        self.header_str(X_MS_REQUEST_CHARGE)?.parse().ok()
    }

    /// Activity id the service assigned to the call.
    pub fn activity_id(&self) -> Option<&str> {
        self.header_str(X_MS_ACTIVITY_ID)
    }

    /// Etag of the returned resource.
    pub fn etag(&self) -> Option<&str> {
        self.header_str(header::ETAG.as_str())
    }

    fn header_str(&self, name: &str) -> Option<&str> {
        self.headers.get(name)?.to_str().ok()
    }

    fn map<U>(self, f: impl FnOnce(T) -> U) -> Response<U> {
        Response {
            status: self.status,
            headers: self.headers,
            body: f(self.body),
        }
    }
}

impl Response<Bytes> {
    /// Decode the body as json.
    pub fn json<T: DeserializeOwned>(self) -> Result<Response<T>> {
        let body: T = serde_json::from_slice(&self.body).map_err(|e| {
            Error::decode(format!(
                "failed to decode response body as {}",
                std::any::type_name::<T>()
            ))
            .with_source(e)
        })?;
        Ok(self.map(|_| body))
    }

    /// Drop the body, keeping the metadata.
    pub fn discard(self) -> Response<()> {
        self.map(|_| ())
    }
}

/// Turn a raw response into a [`Response`], or an error if the status does
/// not match the expectation.
///
/// Error bodies are decoded as [`RequestError`] and attached to the returned
/// error as its source. Bodies that are not a service error fall back to the
/// status code and the body text.
pub fn classify(resp: http::Response<Bytes>, expect: Expect) -> Result<Response<Bytes>> {
    let (parts, body) = resp.into_parts();

    if expect.matches(parts.status) {
        return Ok(Response {
            status: parts.status,
            headers: parts.headers,
            body,
        });
    }

    let err = serde_json::from_slice::<RequestError>(&body).unwrap_or_else(|_| RequestError {
        code: parts.status.as_u16().to_string(),
        message: String::from_utf8_lossy(&body).into_owned(),
    });

    Err(Error::unexpected_status(err.to_string()).with_source(err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use documentdb_core::ErrorKind;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use test_case::test_case;

    fn raw(status: u16, body: &str) -> http::Response<Bytes> {
        http::Response::builder()
            .status(status)
            .header(X_MS_CONTINUATION, "-RID:abc==#RT:1")
            .header(X_MS_SESSION_TOKEN, "0:42")
            .header(X_MS_REQUEST_CHARGE, "2.38")
            .header(X_MS_ACTIVITY_ID, "a0a0a0a0-0000-0000-0000-000000000000")
            .header(header::ETAG, "\"00000100-0000-0000-0000-000000000000\"")
            .body(Bytes::from(body.to_string()))
            .unwrap()
    }

    #[test_case(Expect::Status(StatusCode::OK), 200, true; "exact match")]
    #[test_case(Expect::Status(StatusCode::CREATED), 200, false; "exact mismatch")]
    #[test_case(Expect::Success, 201, true; "success created")]
    #[test_case(Expect::Success, 204, true; "success no content")]
    #[test_case(Expect::Success, 304, false; "not modified")]
    #[test_case(Expect::Success, 409, false; "conflict")]
    fn test_expect(expect: Expect, status: u16, matches: bool) {
        let status = StatusCode::from_u16(status).unwrap();
        assert_eq!(expect.matches(status), matches);
    }

    #[test]
    fn test_classify_success() {
        let resp = classify(raw(200, r#"{"id":"mydb"}"#), Expect::Status(StatusCode::OK))
            .unwrap()
            .json::<serde_json::Value>()
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.body(), &json!({"id": "mydb"}));
        assert_eq!(resp.continuation(), Some("-RID:abc==#RT:1"));
        assert_eq!(resp.session_token(), Some("0:42"));
        assert_eq!(resp.request_charge(), Some(2.38));
        assert_eq!(
            resp.activity_id(),
            Some("a0a0a0a0-0000-0000-0000-000000000000")
        );
        assert_eq!(resp.etag(), Some("\"00000100-0000-0000-0000-000000000000\""));
    }

    #[test]
    fn test_classify_service_error() {
        let err = classify(
            raw(500, r#"{"code":"500","message":"DocumentDB error"}"#),
            Expect::Status(StatusCode::OK),
        )
        .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::UnexpectedStatus);
        assert_eq!(err.to_string(), "500, DocumentDB error");
        assert_eq!(
            err.downcast_ref::<RequestError>(),
            Some(&RequestError {
                code: "500".to_string(),
                message: "DocumentDB error".to_string(),
            })
        );
    }

    #[test]
    fn test_classify_plain_error_body() {
        let err = classify(raw(502, "Bad Gateway"), Expect::Success).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::UnexpectedStatus);
        assert_eq!(err.to_string(), "502, Bad Gateway");
    }

    #[test]
    fn test_json_decode_error() {
        let err = classify(raw(200, "not json"), Expect::Success)
            .unwrap()
            .json::<RequestError>()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
    }

    #[test]
    fn test_discard() {
        let resp = classify(raw(204, ""), Expect::Status(StatusCode::NO_CONTENT))
            .unwrap()
            .discard();
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        assert_eq!(resp.body(), &());
    }

    #[test]
    fn test_empty_continuation_is_none() {
        let resp = http::Response::builder()
            .status(200)
            .header(X_MS_CONTINUATION, "")
            .body(Bytes::new())
            .unwrap();
        let resp = classify(resp, Expect::Success).unwrap();
        assert_eq!(resp.continuation(), None);
    }
}
