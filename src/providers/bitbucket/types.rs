use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

/// Page of pipeline runs returned by `/pipelines/`.
///
/// Entries stay undecoded; only the newest one is turned into a
/// [`PipelineRun`], so a malformed older run cannot spoil the page.
#[derive(Debug, Default, Deserialize)]
pub struct PipelinePage {
    #[serde(default)]
    pub values: Vec<serde_json::Value>,
}

/// One pipeline execution as reported by Bitbucket.
#[derive(Debug, Default, Deserialize)]
pub struct PipelineRun {
    #[serde(default)]
    pub repository: Option<RepositoryRef>,
    #[serde(default)]
    pub target: Option<PipelineTarget>,
    #[serde(default)]
    pub build_number: u64,
    #[serde(default)]
    pub created_on: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_state")]
    pub state: PipelineState,
}

#[derive(Debug, Default, Deserialize)]
pub struct RepositoryRef {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub uuid: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct PipelineTarget {
    #[serde(default)]
    pub ref_name: Option<String>,
}

/// Pipeline lifecycle state, decoded once from the nested `state` object.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PipelineState {
    InProgress,
    Completed(PipelineResult),
    /// Absent state or a name this provider does not map (e.g. `PENDING`)
    #[default]
    Unknown,
}

/// Outcome of a `COMPLETED` pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineResult {
    Successful,
    Failed,
    Error,
    /// Absent result or an unmapped name (e.g. `STOPPED`)
    Other(Option<String>),
}

#[derive(Deserialize)]
struct RawState {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    result: Option<RawResult>,
}

#[derive(Deserialize)]
struct RawResult {
    #[serde(default)]
    name: Option<String>,
}

impl From<RawState> for PipelineState {
    fn from(raw: RawState) -> Self {
        match raw.name.as_deref() {
            Some("IN_PROGRESS") => PipelineState::InProgress,
            Some("COMPLETED") => {
                let result = raw.result.and_then(|r| r.name);
                PipelineState::Completed(match result.as_deref() {
                    Some("SUCCESSFUL") => PipelineResult::Successful,
                    Some("FAILED") => PipelineResult::Failed,
                    Some("ERROR") => PipelineResult::Error,
                    _ => PipelineResult::Other(result),
                })
            }
            _ => PipelineState::Unknown,
        }
    }
}

fn deserialize_state<'de, D>(deserializer: D) -> Result<PipelineState, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawState>::deserialize(deserializer)?;
    Ok(raw.map(PipelineState::from).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_of(json: &str) -> PipelineState {
        let run: PipelineRun = serde_json::from_str(json).unwrap();
        run.state
    }

    #[test]
    fn test_decodes_full_pipeline_run() {
        let page: PipelinePage = serde_json::from_str(
            r#"{
              "pagelen": 100,
              "values": [{
                "uuid": "{9d2b}",
                "build_number": 42,
                "created_on": "2024-03-01T10:15:30.123456+00:00",
                "repository": {"full_name": "acme/api", "name": "api", "uuid": "{r-1}"},
                "target": {"ref_name": "main", "type": "pipeline_ref_target"},
                "state": {"name": "COMPLETED", "result": {"name": "SUCCESSFUL"}}
              }]
            }"#,
        )
        .unwrap();

        let run: PipelineRun = serde_json::from_value(page.values[0].clone()).unwrap();
        assert_eq!(run.build_number, 42);
        assert_eq!(run.repository.as_ref().unwrap().full_name, "acme/api");
        assert_eq!(
            run.target.as_ref().unwrap().ref_name.as_deref(),
            Some("main")
        );
        assert!(run.created_on.is_some());
        assert_eq!(
            run.state,
            PipelineState::Completed(PipelineResult::Successful)
        );
    }

    #[test]
    fn test_in_progress_ignores_result() {
        assert_eq!(
            state_of(r#"{"state": {"name": "IN_PROGRESS", "result": {"name": "FAILED"}}}"#),
            PipelineState::InProgress
        );
    }

    #[test]
    fn test_completed_without_result_is_other() {
        assert_eq!(
            state_of(r#"{"state": {"name": "COMPLETED"}}"#),
            PipelineState::Completed(PipelineResult::Other(None))
        );
    }

    #[test]
    fn test_completed_stopped_keeps_name() {
        assert_eq!(
            state_of(r#"{"state": {"name": "COMPLETED", "result": {"name": "STOPPED"}}}"#),
            PipelineState::Completed(PipelineResult::Other(Some("STOPPED".to_string())))
        );
    }

    #[test]
    fn test_null_or_missing_state_is_unknown() {
        assert_eq!(state_of(r#"{"state": null}"#), PipelineState::Unknown);
        assert_eq!(state_of("{}"), PipelineState::Unknown);
        assert_eq!(
            state_of(r#"{"state": {"name": "PENDING"}}"#),
            PipelineState::Unknown
        );
    }

    #[test]
    fn test_page_tolerates_malformed_older_runs() {
        let page: PipelinePage = serde_json::from_str(
            r#"{"values": [{"build_number": 5}, {"build_number": null}, "garbage"]}"#,
        )
        .unwrap();

        assert_eq!(page.values.len(), 3);
    }

    #[test]
    fn test_missing_values_decodes_as_empty_page() {
        let page: PipelinePage = serde_json::from_str(r#"{"size": 0}"#).unwrap();
        assert!(page.values.is_empty());
    }
}
