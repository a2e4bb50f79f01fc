use chrono::{DateTime, Utc};
use log::debug;

use crate::models::{DevOpsStatus, ObservedItem, StatusRecord, BITBUCKET_SERVER_TYPE};

use super::types::{PipelineResult, PipelineRun, PipelineState};

/// Maps a Bitbucket pipeline state onto the canonical status.
pub fn map_status(state: &PipelineState) -> DevOpsStatus {
    match state {
        PipelineState::InProgress => DevOpsStatus::InProgress,
        PipelineState::Completed(PipelineResult::Successful) => DevOpsStatus::Success,
        PipelineState::Completed(PipelineResult::Failed) => DevOpsStatus::Fail,
        PipelineState::Completed(PipelineResult::Error) => DevOpsStatus::Error,
        PipelineState::Completed(PipelineResult::Other(result)) => {
            debug!("Unmapped pipeline result {result:?}");
            DevOpsStatus::Unknown
        }
        PipelineState::Unknown => DevOpsStatus::Unknown,
    }
}

/// Builds the record for a repository from its newest pipeline run.
///
/// A successful run stamps `last_seen_successful_build` with `observed_at`,
/// the moment the success was seen rather than when the build finished.
/// The alias always comes from the observed item.
pub fn to_status_record(
    run: PipelineRun,
    item: &ObservedItem,
    observed_at: DateTime<Utc>,
) -> StatusRecord {
    let repository = run.repository.unwrap_or_default();
    let status = map_status(&run.state);

    StatusRecord {
        repository_name: repository.full_name,
        short_name: repository.name,
        branch: run.target.and_then(|t| t.ref_name).unwrap_or_default(),
        alias: item.alias.clone(),
        git_server_type: BITBUCKET_SERVER_TYPE.to_string(),
        build_number: run.build_number,
        build_time: run.created_on,
        last_seen_successful_build: (status == DevOpsStatus::Success).then_some(observed_at),
        id: repository.uuid,
        status,
    }
}

/// Record used whenever no pipeline data could be obtained.
pub fn fallback_record(item: &ObservedItem) -> StatusRecord {
    StatusRecord {
        repository_name: item.repository_name.clone(),
        branch: item.repository_branch.clone(),
        alias: item.alias.clone(),
        git_server_type: BITBUCKET_SERVER_TYPE.to_string(),
        ..StatusRecord::default()
    }
}
