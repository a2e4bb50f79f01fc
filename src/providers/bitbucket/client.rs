use std::time::Duration;

use log::debug;
use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use url::Url;

use crate::auth::BasicAuth;
use crate::error::{ObserverError, Result};

use super::types::{PipelinePage, PipelineRun};

/// Runs requested per repository; only the newest one is used.
const PAGE_LEN: u32 = 100;
const SORT_NEWEST_FIRST: &str = "-created_on";

/// HTTP client for the Bitbucket pipelines API.
///
/// The underlying connection pool is shared by every request of every poll.
#[derive(Clone)]
pub struct BitbucketClient {
    client: Client,
}

impl BitbucketClient {
    /// Builds a client with the given user agent and per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialized.
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| ObserverError::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client })
    }

    /// `{server}/2.0/repositories/{tenant}/{repository}/pipelines/?pagelen=100&sort=-created_on`
    pub fn pipelines_url(server_url: &str, tenant: &str, repository: &str) -> Result<Url> {
        let mut url = Url::parse(server_url)
            .map_err(|e| ObserverError::Config(format!("Invalid server URL '{server_url}': {e}")))?;

        url.path_segments_mut()
            .map_err(|()| ObserverError::Config(format!("Server URL cannot be a base: {server_url}")))?
            .pop_if_empty()
            .extend(["2.0", "repositories", tenant, repository, "pipelines", ""]);

        url.query_pairs_mut()
            .append_pair("pagelen", &PAGE_LEN.to_string())
            .append_pair("sort", SORT_NEWEST_FIRST);

        Ok(url)
    }

    /// Fetches the newest pipeline run of a repository.
    ///
    /// # Errors
    ///
    /// - `Transport` if the request cannot be sent or the body cannot be read
    /// - `Upstream` for any non-success status code
    /// - `Decode` if the body is not a pipeline page or its newest run is malformed
    /// - `EmptyResult` if the page holds no runs
    pub(super) async fn fetch_latest_pipeline(&self, url: Url, auth: &BasicAuth) -> Result<PipelineRun> {
        debug!("GET {url} as {}", auth.login());

        let response = self
            .client
            .get(url)
            .header(AUTHORIZATION, auth.header_value())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            return Err(ObserverError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        let page: PipelinePage = serde_json::from_str(&body)?;
        let newest = page
            .values
            .into_iter()
            .next()
            .ok_or(ObserverError::EmptyResult)?;

        Ok(serde_json::from_value(newest)?)
    }
}
