use chrono::Utc;
use futures::stream::{self, StreamExt};
use log::{debug, info, warn};

use crate::auth::{BasicAuth, CredentialStore};
use crate::error::{ObserverError, Result};
use crate::models::{DevOpsSystem, ObservedItem, StatusRecord, BITBUCKET_SERVER_TYPE};
use crate::providers::StatusProvider;

use super::client::BitbucketClient;
use super::normalize::{fallback_record, to_status_record};
use super::types::PipelineRun;

/// Bitbucket Pipelines status provider.
///
/// Reports the newest pipeline run of every observed repository. Each
/// repository yields exactly one record; any failure to obtain pipeline
/// data degrades to an `Unknown` record built from configuration.
pub struct BitbucketStatusProvider<C> {
    client: BitbucketClient,
    credentials: C,
    max_concurrent_requests: usize,
}

impl<C: CredentialStore> BitbucketStatusProvider<C> {
    /// Creates a provider that polls repositories one at a time.
    pub fn new(client: BitbucketClient, credentials: C) -> Self {
        Self {
            client,
            credentials,
            max_concurrent_requests: 1,
        }
    }

    /// Allows up to `limit` requests in flight per system. Output order
    /// still follows configuration order.
    pub fn with_max_concurrent_requests(mut self, limit: usize) -> Self {
        self.max_concurrent_requests = limit.max(1);
        self
    }

    async fn fetch_latest(&self, system: &DevOpsSystem, item: &ObservedItem) -> Result<PipelineRun> {
        let url = BitbucketClient::pipelines_url(
            &system.server_url,
            &system.tenant,
            &item.repository_name,
        )?;
        let auth = BasicAuth::resolve(&self.credentials, &system.guid);

        self.client.fetch_latest_pipeline(url, &auth).await
    }

    async fn status_for(&self, system: &DevOpsSystem, item: &ObservedItem) -> StatusRecord {
        match self.fetch_latest(system, item).await {
            Ok(run) => {
                let record = to_status_record(run, item, Utc::now());
                debug!(
                    "{}/{}: build #{} is {:?}",
                    system.tenant, item.repository_name, record.build_number, record.status
                );
                record
            }
            Err(ObserverError::EmptyResult) => {
                info!(
                    "{}/{}: no pipeline runs yet, reporting Unknown",
                    system.tenant, item.repository_name
                );
                fallback_record(item)
            }
            Err(e) => {
                warn!(
                    "{}/{}: {} ({e}), reporting Unknown",
                    system.tenant,
                    item.repository_name,
                    e.kind()
                );
                fallback_record(item)
            }
        }
    }
}

impl<C: CredentialStore> StatusProvider for BitbucketStatusProvider<C> {
    fn server_type(&self) -> &'static str {
        BITBUCKET_SERVER_TYPE
    }

    async fn get_status_list(&self, system: &DevOpsSystem) -> Vec<StatusRecord> {
        info!(
            "Polling {} repositories on {} (tenant: {})",
            system.observed_automations.len(),
            system.display_name(),
            system.tenant
        );

        // `buffered` yields in input order regardless of completion order.
        stream::iter(&system.observed_automations)
            .map(|item| self.status_for(system, item))
            .buffered(self.max_concurrent_requests)
            .collect::<Vec<_>>()
            .await
    }
}
