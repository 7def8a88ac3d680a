// API client module: a small blocking HTTP client for the repository hooks
// endpoints of the GitHub REST API. Every call performs exactly one request
// and turns any status outside 200/201/204 into `HooksError::Api`.
//
// The network sits behind the `Transport` trait so the client logic (URL
// building, status classification, JSON decoding) can be exercised without
// a server.

use crate::config::{AuthSection, Config};
use crate::error::{HooksError, Result};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Base of every hooks URL unless `GITHUB_API_URL` says otherwise.
pub const DEFAULT_BASE_URL: &str = "https://api.github.com/repos/";

/// Environment variable overriding [`DEFAULT_BASE_URL`].
pub const BASE_URL_ENV: &str = "GITHUB_API_URL";

/// Status codes treated as success for every call type.
pub const SUCCESS_CODES: [u16; 3] = [200, 201, 204];

const USER_AGENT: &str = concat!("github-hooks/", env!("CARGO_PKG_VERSION"));

/// A hook as returned by GitHub. Only the fields the client reads are typed;
/// everything else lands in `extra` so an edit can send it back untouched.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Hook {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub events: Vec<String>,
    #[serde(default)]
    pub config: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Hook {
    /// One-line summary used by `ls`: `{id}: {name} ({events})`, with the
    /// events sorted for display only.
    pub fn summary(&self) -> String {
        let mut events: Vec<&str> = self.events.iter().map(String::as_str).collect();
        events.sort_unstable();
        format!("{}: {} ({})", self.id, self.name, events.join(","))
    }

    /// Replace the events and merge `options` over the existing config.
    /// Caller values win; keys the caller does not mention are kept.
    pub fn apply_edit(mut self, events: Vec<String>, options: BTreeMap<String, String>) -> Self {
        let mut config = self.config.take().unwrap_or_default();
        for (key, value) in options {
            config.insert(key, Value::String(value));
        }
        self.events = events;
        self.config = Some(config);
        self
    }
}

/// Payload for creating a hook.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct NewHook {
    pub name: String,
    pub events: Vec<String>,
    pub config: BTreeMap<String, String>,
}

/// Status and raw body of a finished request.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Performs a single authenticated request. Implemented over reqwest for
/// real use and by recording fakes in tests.
pub trait Transport {
    fn send(
        &self,
        method: Method,
        url: &str,
        auth: &AuthSection,
        body: Option<&Value>,
    ) -> Result<HttpResponse>;
}

/// Production transport backed by a reqwest blocking client.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()?;
        Ok(HttpTransport { client })
    }
}

impl Transport for HttpTransport {
    fn send(
        &self,
        method: Method,
        url: &str,
        auth: &AuthSection,
        body: Option<&Value>,
    ) -> Result<HttpResponse> {
        let mut req = self
            .client
            .request(method, url)
            .basic_auth(&auth.user, Some(&auth.password));
        if let Some(body) = body {
            req = req.json(body);
        }
        let res = req.send()?;
        let status = res.status().as_u16();
        let body = res.text()?;
        Ok(HttpResponse { status, body })
    }
}

/// Hooks client for the repositories of one GitHub user.
pub struct ApiClient<T = HttpTransport> {
    transport: T,
    config: Config,
    base_url: String,
}

impl ApiClient<HttpTransport> {
    /// Create a client over HTTP, using `GITHUB_API_URL` as base URL when
    /// set and the public GitHub API otherwise.
    pub fn from_env(config: Config) -> Result<Self> {
        let base_url = base_url_or_default(std::env::var(BASE_URL_ENV).ok());
        Ok(ApiClient::with_transport(config, &base_url, HttpTransport::new()?))
    }
}

/// A blank override counts as unset.
fn base_url_or_default(value: Option<String>) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
}

impl<T: Transport> ApiClient<T> {
    pub fn with_transport(config: Config, base_url: &str, transport: T) -> Self {
        let mut base_url = base_url.to_string();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        ApiClient {
            transport,
            config,
            base_url,
        }
    }

    #[cfg(test)]
    pub(crate) fn transport(&self) -> &T {
        &self.transport
    }

    /// `{base}{user}/{repo}/hooks`
    pub fn repo_url(&self, repo: &str) -> String {
        format!("{}{}/{}/hooks", self.base_url, self.config.github_user(), repo)
    }

    /// `{base}{user}/{repo}/hooks/{id}`
    pub fn hook_url(&self, repo: &str, hook_id: &str) -> String {
        format!("{}/{}", self.repo_url(repo), hook_id)
    }

    /// Send one request and classify its status.
    fn request(&self, method: Method, url: &str, body: Option<&Value>) -> Result<HttpResponse> {
        debug!(%method, url, "sending request");
        let res = self.transport.send(method, url, &self.config.auth, body)?;
        debug!(status = res.status, "response received");
        if !SUCCESS_CODES.contains(&res.status) {
            warn!(status = res.status, url, "request rejected");
            return Err(HooksError::Api {
                status: res.status,
                body: res.body,
            });
        }
        Ok(res)
    }

    pub fn list_hooks(&self, repo: &str) -> Result<Vec<Hook>> {
        let res = self.request(Method::GET, &self.repo_url(repo), None)?;
        Ok(serde_json::from_str(&res.body)?)
    }

    /// Raw JSON body of a single hook, as GitHub sent it.
    pub fn show_hook(&self, repo: &str, hook_id: &str) -> Result<String> {
        let res = self.request(Method::GET, &self.hook_url(repo, hook_id), None)?;
        Ok(res.body)
    }

    pub fn get_hook(&self, repo: &str, hook_id: &str) -> Result<Hook> {
        Ok(serde_json::from_str(&self.show_hook(repo, hook_id)?)?)
    }

    pub fn create_hook(&self, repo: &str, hook: &NewHook) -> Result<Hook> {
        let body = serde_json::to_value(hook)?;
        let res = self.request(Method::POST, &self.repo_url(repo), Some(&body))?;
        Ok(serde_json::from_str(&res.body)?)
    }

    /// Fetch the hook, apply the new events and merged config, PATCH it back.
    pub fn edit_hook(
        &self,
        repo: &str,
        hook_id: &str,
        events: Vec<String>,
        options: BTreeMap<String, String>,
    ) -> Result<()> {
        let hook = self.get_hook(repo, hook_id)?.apply_edit(events, options);
        let body = serde_json::to_value(&hook)?;
        self.request(Method::PATCH, &self.hook_url(repo, hook_id), Some(&body))?;
        Ok(())
    }

    pub fn delete_hook(&self, repo: &str, hook_id: &str) -> Result<()> {
        self.request(Method::DELETE, &self.hook_url(repo, hook_id), None)?;
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::config::GithubSection;
    use serde_json::json;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    /// One request as seen by [`FakeTransport`].
    #[derive(Debug, Clone)]
    pub struct Recorded {
        pub method: Method,
        pub url: String,
        pub user: String,
        pub body: Option<Value>,
    }

    /// Replays canned responses in order and records every request.
    #[derive(Default)]
    pub struct FakeTransport {
        responses: RefCell<VecDeque<HttpResponse>>,
        pub requests: RefCell<Vec<Recorded>>,
    }

    impl FakeTransport {
        pub fn respond(self, status: u16, body: &str) -> Self {
            self.responses.borrow_mut().push_back(HttpResponse {
                status,
                body: body.to_string(),
            });
            self
        }
    }

    impl Transport for FakeTransport {
        fn send(
            &self,
            method: Method,
            url: &str,
            auth: &AuthSection,
            body: Option<&Value>,
        ) -> Result<HttpResponse> {
            self.requests.borrow_mut().push(Recorded {
                method,
                url: url.to_string(),
                user: auth.user.clone(),
                body: body.cloned(),
            });
            Ok(self
                .responses
                .borrow_mut()
                .pop_front()
                .expect("no canned response left"))
        }
    }

    pub fn test_config() -> Config {
        Config {
            auth: AuthSection {
                user: "bot".into(),
                password: "pw".into(),
            },
            github: GithubSection {
                user: "octo".into(),
            },
        }
    }

    pub fn client(transport: FakeTransport) -> ApiClient<FakeTransport> {
        ApiClient::with_transport(test_config(), "https://api.test/repos", transport)
    }

    #[test]
    fn builds_urls_from_user_and_repo() {
        let api = client(FakeTransport::default());
        assert_eq!(api.repo_url("site"), "https://api.test/repos/octo/site/hooks");
        assert_eq!(api.hook_url("site", "42"), "https://api.test/repos/octo/site/hooks/42");
    }

    #[test]
    fn default_base_url_is_github() {
        let api =
            ApiClient::with_transport(test_config(), DEFAULT_BASE_URL, FakeTransport::default());
        assert_eq!(api.repo_url("r"), "https://api.github.com/repos/octo/r/hooks");
    }

    #[test]
    fn blank_base_url_override_falls_back_to_github() {
        assert_eq!(base_url_or_default(None), DEFAULT_BASE_URL);
        assert_eq!(base_url_or_default(Some(String::new())), DEFAULT_BASE_URL);
        assert_eq!(base_url_or_default(Some("  ".into())), DEFAULT_BASE_URL);
        assert_eq!(
            base_url_or_default(Some("https://ghe.example.com/api/v3/repos".into())),
            "https://ghe.example.com/api/v3/repos"
        );
    }

    #[test]
    fn accepts_only_known_success_codes() {
        for status in SUCCESS_CODES {
            let api = client(FakeTransport::default().respond(status, ""));
            assert!(api.delete_hook("r", "1").is_ok(), "status {status}");
        }
        let api = client(FakeTransport::default().respond(202, "queued"));
        let err = api.delete_hook("r", "1").unwrap_err();
        assert!(matches!(err, HooksError::Api { status: 202, .. }));
    }

    #[test]
    fn api_error_carries_status_and_body() {
        let api = client(FakeTransport::default().respond(404, r#"{"message":"Not Found"}"#));
        let err = api.list_hooks("missing").unwrap_err();
        let msg = err.to_string();
        assert!(err.is_api());
        assert!(msg.contains("404"), "{msg}");
        assert!(msg.contains(r#"{"message":"Not Found"}"#), "{msg}");
    }

    #[test]
    fn sends_basic_auth_user() {
        let api = client(FakeTransport::default().respond(200, "[]"));
        api.list_hooks("r").unwrap();
        let reqs = api.transport().requests.borrow();
        assert_eq!(reqs[0].user, "bot");
        assert_eq!(reqs[0].method, Method::GET);
    }

    #[test]
    fn summary_sorts_events_for_display() {
        let hook: Hook = serde_json::from_value(json!({
            "id": 7, "name": "web", "events": ["push", "issues", "create"]
        }))
        .unwrap();
        assert_eq!(hook.summary(), "7: web (create,issues,push)");
        assert_eq!(hook.events, vec!["push", "issues", "create"]);
    }

    #[test]
    fn apply_edit_merges_config_and_keeps_other_fields() {
        let hook: Hook = serde_json::from_value(json!({
            "id": 3,
            "name": "irc",
            "events": ["push"],
            "active": true,
            "config": {"a": "1", "b": "2"},
            "url": "https://api.test/repos/octo/r/hooks/3"
        }))
        .unwrap();
        let options = BTreeMap::from([
            ("b".to_string(), "9".to_string()),
            ("c".to_string(), "3".to_string()),
        ]);
        let edited = serde_json::to_value(hook.apply_edit(vec!["issues".into()], options)).unwrap();
        assert_eq!(edited["config"], json!({"a": "1", "b": "9", "c": "3"}));
        assert_eq!(edited["events"], json!(["issues"]));
        assert_eq!(edited["active"], json!(true));
        assert_eq!(edited["url"], json!("https://api.test/repos/octo/r/hooks/3"));
    }

    #[test]
    fn apply_edit_on_null_config_uses_caller_options() {
        let hook: Hook =
            serde_json::from_value(json!({"id": 1, "name": "web", "config": null})).unwrap();
        let options = BTreeMap::from([("url".to_string(), "http://x".to_string())]);
        let edited = hook.apply_edit(vec!["push".into()], options);
        assert_eq!(Value::Object(edited.config.unwrap()), json!({"url": "http://x"}));
    }
}
