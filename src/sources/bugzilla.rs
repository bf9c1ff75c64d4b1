//! Bugzilla REST client.
use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;
use serde_json::{Value, json};
use tracing::{debug, info, warn};
use url::Url;
use zeroize::Zeroizing;

use super::{BugSource, Result};
use crate::config::with_trailing_slash;
use crate::logic::query::Query;
use crate::state::{Bug, BugList};

/// Header carrying the API key on authenticated requests.
const API_KEY_HEADER: &str = "X-BUGZILLA-API-KEY";

/// Thin async client over the Bugzilla REST API.
#[derive(Clone, Debug)]
pub struct BugzillaClient {
    http: reqwest::Client,
    base: Url,
}

impl BugzillaClient {
    /// What: Build a client for the REST endpoint at `api_base`.
    ///
    /// Inputs:
    /// - `api_base`: REST root such as `https://bugzilla.mozilla.org/rest`; a trailing
    ///   slash is added when missing so relative joins keep the last segment.
    ///
    /// Output:
    /// - Client with connection pooling and request timeouts.
    ///
    /// # Errors
    /// - Returns `Err` when the base URL does not parse or the HTTP client cannot be built.
    pub fn new(api_base: &str) -> Result<Self> {
        let base = Url::parse(&with_trailing_slash(api_base))?;
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(15))
            .timeout(Duration::from_secs(60))
            .user_agent(format!("triagedash/{}", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http, base })
    }

    /// `GET` URL for a search.
    ///
    /// # Errors
    /// - Returns `Err` when the `bug` endpoint cannot be joined onto the base URL.
    pub fn search_url(&self, query: &Query) -> Result<Url> {
        let mut url = self.base.join("bug")?;
        url.set_query(Some(&query.to_query_string()));
        Ok(url)
    }

    /// `PUT` URL for updating bug `id`.
    ///
    /// # Errors
    /// - Returns `Err` when the bug path cannot be joined onto the base URL.
    pub fn bug_url(&self, id: u64) -> Result<Url> {
        Ok(self.base.join(&format!("bug/{id}"))?)
    }
}

/// What: Turn a non-success response into an error message.
///
/// Inputs:
/// - `status`: HTTP status code.
/// - `body`: Response body text.
///
/// Output:
/// - `"HTTP {status}: {message}"` using Bugzilla's JSON `message` when present,
///   else a short preview of the body.
fn failure_message(status: u16, body: &str) -> String {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| body.chars().take(200).collect());
    if message.trim().is_empty() {
        format!("HTTP {status}")
    } else {
        format!("HTTP {status}: {}", message.trim())
    }
}

impl BugSource for BugzillaClient {
    fn search(&self, query: Query) -> BoxFuture<'static, Result<Vec<Bug>>> {
        let http = self.http.clone();
        let url = self.search_url(&query);
        async move {
            let url = url?;
            debug!(url = %url, "[Bugzilla] search request");
            let resp = http.get(url).send().await?;
            let status = resp.status();
            let body = resp.text().await?;
            info!(
                status = status.as_u16(),
                bytes = body.len(),
                "[Bugzilla] search response"
            );
            if !status.is_success() {
                let msg = failure_message(status.as_u16(), &body);
                warn!(status = status.as_u16(), error = %msg, "[Bugzilla] search failed");
                return Err(msg.into());
            }
            let list: BugList = serde_json::from_str(&body)?;
            Ok(list.bugs)
        }
        .boxed()
    }

    fn update_priority(
        &self,
        id: u64,
        priority: String,
        api_key: Zeroizing<String>,
    ) -> BoxFuture<'static, Result<()>> {
        let http = self.http.clone();
        let url = self.bug_url(id);
        async move {
            let url = url?;
            info!(bug = id, priority = %priority, "[Bugzilla] updating priority");
            let resp = http
                .put(url)
                .header(API_KEY_HEADER, api_key.as_str())
                .json(&json!({ "priority": priority }))
                .send()
                .await?;
            let status = resp.status();
            if status.is_success() {
                return Ok(());
            }
            let body = resp.text().await.unwrap_or_default();
            let msg = failure_message(status.as_u16(), &body);
            warn!(
                bug = id,
                status = status.as_u16(),
                error = %msg,
                "[Bugzilla] priority update failed"
            );
            Err(msg.into())
        }
        .boxed()
    }
}
