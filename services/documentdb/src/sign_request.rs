use crate::constants::*;
use crate::{MasterKey, ResourceLink};
use async_trait::async_trait;
use documentdb_core::hash::base64_hmac_sha256;
use documentdb_core::time::{format_http_date, now, DateTime};
use documentdb_core::{Context, Error, Result, SignRequest};
use http::request::Parts;
use http::{header, HeaderValue, Method};
use log::debug;
use std::sync::Mutex;

/// Upper bound of idle buffers kept around for reuse.
const MAX_POOLED_BUFFERS: usize = 16;

/// RequestSigner that implements master key authorization.
///
/// It writes the default headers every request needs:
///
/// - `x-ms-date`: the signing time in RFC 1123 format
/// - `x-ms-version`: the supported protocol version
/// - `user-agent`: when configured
/// - `authorization`: `type=master&ver=1.0&sig=<signature>`, url escaped
///
/// The resource being signed for is taken from the [`ResourceLink`] stored in
/// the request extensions, or parsed from the request path if there is none.
#[derive(Debug)]
pub struct RequestSigner {
    user_agent: Option<String>,
    time: Option<DateTime>,
    buffers: BufferPool,
}

impl RequestSigner {
    /// Create a new request signer.
    pub fn new() -> Self {
        Self {
            user_agent: None,
            time: None,
            buffers: BufferPool::default(),
        }
    }

    /// Send this user agent with every request.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Specify the signing time.
    ///
    /// # Note
    ///
    /// We should always take current time to sign requests.
    /// Only use this function for testing.
    pub fn with_time(mut self, time: DateTime) -> Self {
        self.time = Some(time);
        self
    }

    /// Compute the signature of a request.
    ///
    /// The canonical string is
    ///
    /// ```text
    /// lower(method) + "\n" +
    /// lower(resource_type) + "\n" +
    /// resource_id + "\n" +
    /// lower(rfc1123(timestamp)) + "\n" +
    /// lower(date_header) + "\n"
    /// ```
    ///
    /// signed with HMAC-SHA256 keyed by the decoded master key and returned
    /// base64 encoded. The resource id keeps its case. Fails only when the
    /// master key is not valid base64.
    pub fn sign(
        &self,
        key: &MasterKey,
        method: &Method,
        resource_type: &str,
        resource_id: &str,
        timestamp: DateTime,
        date_header: &str,
    ) -> Result<String> {
        self.sign_formatted(
            key,
            method,
            resource_type,
            resource_id,
            &format_http_date(timestamp),
            date_header,
        )
    }

    fn sign_formatted(
        &self,
        key: &MasterKey,
        method: &Method,
        resource_type: &str,
        resource_id: &str,
        x_ms_date: &str,
        date_header: &str,
    ) -> Result<String> {
        let salt = key.salt()?;

        let mut buf = self.buffers.get();
        write_string_to_sign(
            &mut buf,
            method.as_str(),
            resource_type,
            resource_id,
            x_ms_date,
            date_header,
        );
        debug!("string to sign: {:?}", &buf);

        let signature = base64_hmac_sha256(salt, buf.as_bytes());
        self.buffers.put(buf);

        Ok(signature)
    }
}

impl Default for RequestSigner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SignRequest for RequestSigner {
    type Credential = MasterKey;

    async fn sign_request(
        &self,
        _: &Context,
        req: &mut Parts,
        credential: Option<&Self::Credential>,
    ) -> Result<()> {
        let Some(key) = credential else {
            return Err(Error::request_invalid("credential is required"));
        };

        let parsed;
        let link = match req.extensions.get::<ResourceLink>() {
            Some(link) => link,
            None => {
                parsed = ResourceLink::parse(req.uri.path());
                &parsed
            }
        };

        let x_ms_date = format_http_date(self.time.unwrap_or_else(now));
        let date_header = match req.headers.get(header::DATE) {
            Some(v) => v.to_str()?,
            None => "",
        };

        // Everything that can fail happens before the first header is
        // written, so a failed signing leaves the request untouched.
        let signature = self.sign_formatted(
            key,
            &req.method,
            link.resource_type(),
            link.resource_id(),
            &x_ms_date,
            date_header,
        )?;
        let authorization = {
            let token = format!("type=master&ver=1.0&sig={signature}");
            let escaped: String = form_urlencoded::byte_serialize(token.as_bytes()).collect();
            let mut value = HeaderValue::from_str(&escaped)?;
            value.set_sensitive(true);
            value
        };
        let x_ms_date = HeaderValue::from_str(&x_ms_date)?;
        let user_agent = self
            .user_agent
            .as_deref()
            .map(HeaderValue::from_str)
            .transpose()?;

        req.headers.insert(X_MS_DATE, x_ms_date);
        req.headers
            .insert(X_MS_VERSION, HeaderValue::from_static(SUPPORTED_VERSION));
        if let Some(user_agent) = user_agent {
            req.headers.insert(header::USER_AGENT, user_agent);
        }
        req.headers.insert(header::AUTHORIZATION, authorization);

        Ok(())
    }
}

/// Write the canonical string into `buf`, which must be empty.
fn write_string_to_sign(
    buf: &mut String,
    method: &str,
    resource_type: &str,
    resource_id: &str,
    x_ms_date: &str,
    date_header: &str,
) {
    push_lowercase(buf, method);
    buf.push('\n');
    push_lowercase(buf, resource_type);
    buf.push('\n');
    buf.push_str(resource_id);
    buf.push('\n');
    push_lowercase(buf, x_ms_date);
    buf.push('\n');
    push_lowercase(buf, date_header);
    buf.push('\n');
}

fn push_lowercase(buf: &mut String, s: &str) {
    buf.extend(s.chars().flat_map(char::to_lowercase));
}

/// Scratch buffers for canonical strings.
///
/// Buffers are cleared on checkout; a buffer that still held the previous
/// string would corrupt the next signature.
#[derive(Debug, Default)]
struct BufferPool {
    buffers: Mutex<Vec<String>>,
}

impl BufferPool {
    fn get(&self) -> String {
        let mut buf = self
            .buffers
            .lock()
            .expect("lock poisoned")
            .pop()
            .unwrap_or_else(|| String::with_capacity(128));
        buf.clear();
        buf
    }

    fn put(&self, buf: String) {
        let mut buffers = self.buffers.lock().expect("lock poisoned");
        if buffers.len() < MAX_POOLED_BUFFERS {
            buffers.push(buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use documentdb_core::ErrorKind;
    use pretty_assertions::assert_eq;

    const KEY: &str = "YXJpZWwNCg==";

    fn fixed_time() -> DateTime {
        chrono::Utc.with_ymd_and_hms(2006, 1, 2, 15, 4, 5).unwrap()
    }

    fn parts(method: Method, uri: &str) -> Parts {
        http::Request::builder()
            .method(method)
            .uri(uri)
            .body(())
            .unwrap()
            .into_parts()
            .0
    }

    #[test]
    fn test_string_to_sign() {
        let mut buf = String::new();
        write_string_to_sign(
            &mut buf,
            "GET",
            "DBS",
            "b5NCAA==",
            "Mon, 02 Jan 2006 15:04:05 GMT",
            "",
        );
        assert_eq!(buf, "get\ndbs\nb5NCAA==\nmon, 02 jan 2006 15:04:05 gmt\n\n");
    }

    #[test]
    fn test_sign_golden() {
        let signer = RequestSigner::new();
        let key = MasterKey::new(KEY);

        let cases = [
            (
                Method::GET,
                "dbs",
                "b5NCAA==",
                "",
                "UwJGanHcPIsq+Elhd5bk0GIBVa0qXAL2tEMvKRZDhh4=",
            ),
            (
                Method::POST,
                "docs",
                "dbs/mydb/colls/mycoll",
                "",
                "M/v1s/78yvG0eSOOCJTQeEsFXPPPYKM0cPUwX99P6Qw=",
            ),
            (
                Method::GET,
                "colls",
                "XYZ12345",
                "Mon, 02 Jan 2006 15:04:05 GMT",
                "+9EYUkLzJ0yMHTKurzKWfkt9YtPFawCZLhi2neJueEU=",
            ),
        ];

        for (method, typ, id, date, expected) in cases {
            let sig = signer
                .sign(&key, &method, typ, id, fixed_time(), date)
                .unwrap();
            assert_eq!(sig, expected, "{method} {typ} {id}");
        }
    }

    #[test]
    fn test_pooled_buffers_match_fresh_buffers() {
        let pooled = RequestSigner::new();
        let key = MasterKey::new(KEY);

        // Warm the pool with a longer string than the ones that follow.
        pooled
            .sign(
                &key,
                &Method::POST,
                "docs",
                "dbs/a-very-long-database-name/colls/a-very-long-collection-name",
                fixed_time(),
                "",
            )
            .unwrap();

        for (typ, id) in [("dbs", "b5NCAA=="), ("colls", "XYZ12345")] {
            let fresh = RequestSigner::new()
                .sign(&key, &Method::GET, typ, id, fixed_time(), "")
                .unwrap();
            let reused = pooled
                .sign(&key, &Method::GET, typ, id, fixed_time(), "")
                .unwrap();
            assert_eq!(reused, fresh);
        }
    }

    #[test]
    fn test_sign_invalid_key() {
        let signer = RequestSigner::new();
        let key = MasterKey::new("not base64!");

        let err = signer
            .sign(&key, &Method::GET, "dbs", "", fixed_time(), "")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CredentialInvalid);
    }

    #[tokio::test]
    async fn test_sign_request_default_headers() {
        let signer = RequestSigner::new()
            .with_user_agent("documentdb-test/1.0")
            .with_time(fixed_time());
        let mut req = parts(Method::GET, "https://localhost:8081/dbs/b5NCAA==/");
        req.extensions.insert(ResourceLink::parse("/dbs/b5NCAA==/"));

        signer
            .sign_request(&Context::new(), &mut req, Some(&MasterKey::new(KEY)))
            .await
            .unwrap();

        assert_eq!(req.headers[X_MS_DATE], "Mon, 02 Jan 2006 15:04:05 GMT");
        assert_eq!(req.headers[X_MS_VERSION], SUPPORTED_VERSION);
        assert_eq!(req.headers[header::USER_AGENT], "documentdb-test/1.0");
        assert_eq!(
            req.headers[header::AUTHORIZATION],
            "type%3Dmaster%26ver%3D1.0%26sig%3DUwJGanHcPIsq%2BElhd5bk0GIBVa0qXAL2tEMvKRZDhh4%3D"
        );
        assert!(req.headers[header::AUTHORIZATION].is_sensitive());
    }

    #[tokio::test]
    async fn test_sign_request_round_trip() {
        let key = MasterKey::new(KEY);
        let signer = RequestSigner::new();
        let mut req = parts(Method::POST, "https://localhost:8081/dbs/mydb/colls/mycoll/docs");
        req.headers
            .insert(header::DATE, HeaderValue::from_static("Tue, 03 Jan 2006 10:00:00 GMT"));

        signer
            .sign_request(&Context::new(), &mut req, Some(&key))
            .await
            .unwrap();

        // Rebuild the canonical string from what was sent and verify the token.
        let mut canonical = String::new();
        write_string_to_sign(
            &mut canonical,
            "POST",
            "docs",
            "dbs/mydb/colls/mycoll",
            req.headers[X_MS_DATE].to_str().unwrap(),
            "Tue, 03 Jan 2006 10:00:00 GMT",
        );
        let expected = base64_hmac_sha256(key.salt().unwrap(), canonical.as_bytes());
        let token: String = form_urlencoded::parse(
            format!("t={}", req.headers[header::AUTHORIZATION].to_str().unwrap()).as_bytes(),
        )
        .map(|(_, v)| v.into_owned())
        .collect();
        assert_eq!(token, format!("type=master&ver=1.0&sig={expected}"));
    }

    #[tokio::test]
    async fn test_sign_request_failure_leaves_headers_untouched() {
        let signer = RequestSigner::new().with_user_agent("documentdb-test/1.0");
        let mut req = parts(Method::GET, "https://localhost:8081/dbs/");

        let err = signer
            .sign_request(&Context::new(), &mut req, Some(&MasterKey::new("%%%")))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CredentialInvalid);
        assert!(req.headers.is_empty());

        let err = signer
            .sign_request(&Context::new(), &mut req, None)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RequestInvalid);
        assert!(req.headers.is_empty());
    }
}
