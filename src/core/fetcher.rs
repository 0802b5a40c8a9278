use crate::adapters::http::ReqwestTransport;
use crate::config::{FetchConfig, DEFAULT_BASE_URL};
use crate::core::{HttpRequest, HttpResponse, HttpTransport, Record, Result};
use crate::utils::error::FetchError;
use std::io::BufReader;
use url::Url;

/// Newest repositories first; the API does the ordering.
pub const REPOS_QUERY: &str = "sort=created&direction=desc";

/// Lists a user's repositories through an injected [`HttpTransport`].
#[derive(Debug, Clone)]
pub struct RepoFetcher<T: HttpTransport> {
    transport: T,
    base_url: String,
}

impl RepoFetcher<ReqwestTransport> {
    pub fn from_config(config: &FetchConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(config)?;
        Ok(Self::new(transport).with_base_url(config.base_url.clone()))
    }
}

impl<T: HttpTransport> RepoFetcher<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// `{base}/users/{username}/repos?sort=created&direction=desc`, with the
    /// username percent-encoded as a single path segment.
    pub fn repos_url(&self, username: &str) -> Result<Url> {
        let build_error = |reason: String| FetchError::RequestBuild {
            url: format!(
                "{}/users/{}/repos?{}",
                self.base_url.trim_end_matches('/'),
                username,
                REPOS_QUERY
            ),
            reason,
        };

        // url 會靜默丟棄 "." 與 ".." 路徑段
        if username == "." || username == ".." {
            return Err(build_error(
                "username cannot be a dot path segment".to_string(),
            ));
        }

        let mut url = Url::parse(&self.base_url).map_err(|e| build_error(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| build_error("base URL cannot carry path segments".to_string()))?
            .pop_if_empty()
            .extend(["users", username, "repos"]);
        url.set_query(Some(REPOS_QUERY));

        Ok(url)
    }

    /// Issues exactly one GET and decodes the body as a JSON array of objects.
    ///
    /// The status code is never inspected: an error-shaped body such as
    /// `{"message":"Not Found"}` fails as [`FetchError::Decode`].
    pub fn get_repos(&self, username: &str) -> Result<Vec<Record>> {
        let url = self.repos_url(username)?;

        tracing::debug!("Making API request to: {}", url);
        let response = self.transport.execute(HttpRequest::get(url))?;
        tracing::debug!("API response status: {}", response.status);

        let records = decode_records(response)?;
        tracing::debug!("Decoded {} repositories for {}", records.len(), username);

        Ok(records)
    }
}

// Takes ownership so the body is dropped on every return path.
// Anything but whitespace after the closing `]` is a decode error.
fn decode_records(response: HttpResponse) -> Result<Vec<Record>> {
    let reader = BufReader::new(response.body);
    Ok(serde_json::from_reader(reader)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Method;
    use crate::utils::error::TransportError;
    use std::io::{Cursor, Read};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};

    type MockDo = Box<dyn Fn() -> std::result::Result<HttpResponse, TransportError> + Send + Sync>;

    /// Test double that records every request and replays a canned outcome.
    struct MockTransport {
        mock_do: MockDo,
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl MockTransport {
        fn new(
            mock_do: impl Fn() -> std::result::Result<HttpResponse, TransportError>
                + Send
                + Sync
                + 'static,
        ) -> Arc<Self> {
            Arc::new(Self {
                mock_do: Box::new(mock_do),
                requests: Mutex::new(Vec::new()),
            })
        }

        fn responding(status: u16, body: &'static str) -> Arc<Self> {
            Self::new(move || Ok(HttpResponse::from_bytes(status, body)))
        }

        fn requests(&self) -> Vec<HttpRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl HttpTransport for MockTransport {
        fn execute(&self, request: HttpRequest) -> std::result::Result<HttpResponse, TransportError> {
            self.requests.lock().unwrap().push(request);
            (self.mock_do)()
        }
    }

    /// Body reader that reports when it has been released.
    struct TrackedBody {
        inner: Cursor<Vec<u8>>,
        released: Arc<AtomicBool>,
    }

    impl Read for TrackedBody {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            self.inner.read(buf)
        }
    }

    impl Drop for TrackedBody {
        fn drop(&mut self) {
            self.released.store(true, Ordering::SeqCst);
        }
    }

    fn tracked_transport(body: &'static str) -> (Arc<MockTransport>, Arc<AtomicBool>) {
        let released = Arc::new(AtomicBool::new(false));
        let flag = released.clone();
        let transport = MockTransport::new(move || {
            Ok(HttpResponse::new(
                200,
                TrackedBody {
                    inner: Cursor::new(body.as_bytes().to_vec()),
                    released: flag.clone(),
                },
            ))
        });
        (transport, released)
    }

    #[test]
    fn test_get_repos_success() {
        let transport = MockTransport::responding(200, r#"[{
            "full_name": "mock-repo"
        }]"#);
        let fetcher = RepoFetcher::new(transport.clone());

        let result = fetcher.get_repos("atkinsonbg").unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].full_name(), Some("mock-repo"));
        assert_eq!(transport.requests().len(), 1);
    }

    #[test]
    fn test_get_repos_request_target() {
        let transport = MockTransport::responding(200, "[]");
        let fetcher = RepoFetcher::new(transport.clone());

        fetcher.get_repos("atkinsonbg").unwrap();

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, Method::Get);
        assert_eq!(
            requests[0].url.as_str(),
            "https://api.github.com/users/atkinsonbg/repos?sort=created&direction=desc"
        );
    }

    #[test]
    fn test_transport_error_propagates_regardless_of_status() {
        let transport =
            MockTransport::new(|| Err(TransportError::with_status("Mock Error", 404)));
        let fetcher = RepoFetcher::new(transport.clone());

        let err = fetcher
            .get_repos("atkinsonbgthisusershouldnotexist")
            .unwrap_err();

        match err {
            FetchError::Transport(inner) => {
                assert_eq!(inner.to_string(), "Mock Error");
                assert_eq!(inner.status(), Some(404));
            }
            other => panic!("expected transport error, got {:?}", other),
        }
        assert_eq!(transport.requests().len(), 1);
    }

    #[test]
    fn test_object_body_is_decode_error() {
        let transport = MockTransport::responding(200, r#"{
            "full_name": "mock-repo"
        }"#);
        let fetcher = RepoFetcher::new(transport);

        assert!(matches!(
            fetcher.get_repos("atkinsonbg"),
            Err(FetchError::Decode(_))
        ));
    }

    #[test]
    fn test_malformed_and_non_object_bodies_are_decode_errors() {
        for body in [r#"[{"full_name": "#, "[1, 2]", "\"text\"", "null", ""] {
            let fetcher = RepoFetcher::new(MockTransport::responding(200, body));
            assert!(
                matches!(fetcher.get_repos("anyuser"), Err(FetchError::Decode(_))),
                "body {:?} should fail to decode",
                body
            );
        }
    }

    #[test]
    fn test_empty_array_is_empty_list() {
        let fetcher = RepoFetcher::new(MockTransport::responding(200, "[]"));
        assert!(fetcher.get_repos("anyuser").unwrap().is_empty());
    }

    #[test]
    fn test_order_is_preserved() {
        let fetcher = RepoFetcher::new(MockTransport::responding(
            200,
            r#"[{"id":1},{"id":2},{"id":3}]"#,
        ));

        let ids: Vec<i64> = fetcher
            .get_repos("anyuser")
            .unwrap()
            .iter()
            .map(|r| r.get("id").and_then(|v| v.as_i64()).unwrap())
            .collect();

        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_status_code_is_not_inspected() {
        let fetcher = RepoFetcher::new(MockTransport::responding(500, r#"[{"id":1}]"#));
        assert_eq!(fetcher.get_repos("anyuser").unwrap().len(), 1);

        let fetcher =
            RepoFetcher::new(MockTransport::responding(404, r#"{"message":"Not Found"}"#));
        assert!(matches!(
            fetcher.get_repos("ghost"),
            Err(FetchError::Decode(_))
        ));
    }

    #[test]
    fn test_records_keep_nested_values() {
        let fetcher = RepoFetcher::new(MockTransport::responding(
            200,
            r#"[{"owner":{"login":"a"},"topics":["x","y"],"fork":false,"homepage":null}]"#,
        ));

        let records = fetcher.get_repos("a").unwrap();
        let rec = &records[0];
        assert_eq!(rec.get("owner").unwrap()["login"], "a");
        assert_eq!(rec.get("topics").unwrap().as_array().unwrap().len(), 2);
        assert_eq!(rec.get("fork").unwrap().as_bool(), Some(false));
        assert!(rec.get("homepage").unwrap().is_null());
        assert!(rec.get("missing").is_none());
    }

    #[test]
    fn test_body_released_on_success_and_failure() {
        let (transport, released) = tracked_transport(r#"[{"id":1}]"#);
        RepoFetcher::new(transport).get_repos("a").unwrap();
        assert!(released.load(Ordering::SeqCst));

        let (transport, released) = tracked_transport(r#"{"id":1}"#);
        assert!(RepoFetcher::new(transport).get_repos("a").is_err());
        assert!(released.load(Ordering::SeqCst));
    }

    #[test]
    fn test_invalid_base_url_is_request_build_error() {
        for base in ["not a url", "mailto:someone@example.com"] {
            let transport = MockTransport::responding(200, "[]");
            let fetcher = RepoFetcher::new(transport.clone()).with_base_url(base);

            let err = fetcher.get_repos("atkinsonbg").unwrap_err();
            assert!(
                matches!(err, FetchError::RequestBuild { .. }),
                "base {:?} gave {:?}",
                base,
                err
            );
            assert!(transport.requests().is_empty());
        }
    }

    #[test]
    fn test_username_is_encoded_as_one_segment() {
        let fetcher = RepoFetcher::new(MockTransport::responding(200, "[]"));
        let url = fetcher.repos_url("a b/c?d").unwrap();

        assert_eq!(
            url.as_str(),
            "https://api.github.com/users/a%20b%2Fc%3Fd/repos?sort=created&direction=desc"
        );
        assert_eq!(url.query(), Some(REPOS_QUERY));

        let url = fetcher.repos_url("a.b").unwrap();
        assert_eq!(url.path(), "/users/a.b/repos");
    }

    #[test]
    fn test_dot_usernames_are_request_build_errors() {
        for username in [".", ".."] {
            let transport = MockTransport::responding(200, "[]");
            let fetcher = RepoFetcher::new(transport.clone());

            assert!(matches!(
                fetcher.repos_url(username),
                Err(FetchError::RequestBuild { .. })
            ));
            assert!(matches!(
                fetcher.get_repos(username),
                Err(FetchError::RequestBuild { .. })
            ));
            assert!(transport.requests().is_empty());
        }
    }

    #[test]
    fn test_trailing_data_after_array_is_decode_error() {
        let fetcher = RepoFetcher::new(MockTransport::responding(200, "[] x"));
        assert!(matches!(
            fetcher.get_repos("anyuser"),
            Err(FetchError::Decode(_))
        ));

        let fetcher = RepoFetcher::new(MockTransport::responding(200, "[]\n  "));
        assert!(fetcher.get_repos("anyuser").unwrap().is_empty());
    }

    #[test]
    fn test_enterprise_base_url_keeps_prefix() {
        let fetcher = RepoFetcher::new(MockTransport::responding(200, "[]"))
            .with_base_url("https://github.example.com/api/v3/");

        assert_eq!(
            fetcher.repos_url("octocat").unwrap().as_str(),
            "https://github.example.com/api/v3/users/octocat/repos?sort=created&direction=desc"
        );
    }
}
