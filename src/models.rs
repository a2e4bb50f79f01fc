use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Type tag written into every record produced by the Bitbucket provider.
pub const BITBUCKET_SERVER_TYPE: &str = "Bitbucket";

/// One CI backend to poll.
///
/// Loaded from the `[[systems]]` section of the configuration file and
/// treated as read-only for the duration of a poll.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DevOpsSystem {
    /// Stable identifier, also the prefix of the credential keys
    pub guid: String,

    /// Optional display name for output
    #[serde(default)]
    pub name: Option<String>,

    /// Server base URL (e.g., <https://api.bitbucket.org>)
    #[serde(default = "default_server_url")]
    pub server_url: String,

    /// Workspace that owns the observed repositories
    pub tenant: String,

    /// Repositories to report on, in display order
    #[serde(default)]
    pub observed_automations: Vec<ObservedItem>,
}

impl DevOpsSystem {
    /// Name used when rendering this system.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.guid)
    }
}

fn default_server_url() -> String {
    "https://api.bitbucket.org".to_string()
}

/// A repository/branch pair the operator wants tracked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ObservedItem {
    pub repository_name: String,
    #[serde(default)]
    pub repository_branch: String,
    /// Operator-chosen label, copied verbatim into every record
    #[serde(default)]
    pub alias: String,
}

/// Canonical pipeline status shared by all providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DevOpsStatus {
    #[default]
    Unknown,
    InProgress,
    Success,
    Fail,
    Error,
}

impl DevOpsStatus {
    pub const ALL: [DevOpsStatus; 5] = [
        DevOpsStatus::Success,
        DevOpsStatus::InProgress,
        DevOpsStatus::Fail,
        DevOpsStatus::Error,
        DevOpsStatus::Unknown,
    ];

    pub fn label(self) -> &'static str {
        match self {
            DevOpsStatus::Unknown => "Unknown",
            DevOpsStatus::InProgress => "In progress",
            DevOpsStatus::Success => "Success",
            DevOpsStatus::Fail => "Fail",
            DevOpsStatus::Error => "Error",
        }
    }
}

/// Normalized status of one observed repository.
///
/// Build fields stay at their defaults when no pipeline data could be read.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StatusRecord {
    pub repository_name: String,
    pub short_name: String,
    pub branch: String,
    pub alias: String,
    pub git_server_type: String,
    pub build_number: u64,
    pub build_time: Option<DateTime<Utc>>,
    pub last_seen_successful_build: Option<DateTime<Utc>>,
    /// Stable repository identifier reported by the server
    pub id: String,
    pub status: DevOpsStatus,
}

/// Records of one system from a single poll, as written by the CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemReport {
    pub system: String,
    pub guid: String,
    pub tenant: String,
    pub server_type: String,
    pub collected_at: DateTime<Utc>,
    pub records: Vec<StatusRecord>,
}

impl SystemReport {
    /// Number of records carrying the given status.
    pub fn count(&self, status: DevOpsStatus) -> usize {
        self.records.iter().filter(|r| r.status == status).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_record_default_is_unknown_and_empty() {
        let record = StatusRecord::default();

        assert_eq!(record.status, DevOpsStatus::Unknown);
        assert_eq!(record.build_number, 0);
        assert!(record.build_time.is_none());
        assert!(record.last_seen_successful_build.is_none());
        assert!(record.id.is_empty());
    }

    #[test]
    fn test_system_deserializes_with_default_server_url() {
        let system: DevOpsSystem = toml::from_str(
            r#"
guid = "6f1c"
tenant = "acme"

[[observed-automations]]
repository-name = "api"
repository-branch = "main"
alias = "API"
"#,
        )
        .unwrap();

        assert_eq!(system.server_url, "https://api.bitbucket.org");
        assert_eq!(system.display_name(), "6f1c");
        assert_eq!(system.observed_automations.len(), 1);
        assert_eq!(system.observed_automations[0].alias, "API");
    }

    #[test]
    fn test_status_serializes_as_variant_name() {
        let json = serde_json::to_string(&DevOpsStatus::InProgress).unwrap();
        assert_eq!(json, "\"InProgress\"");
    }
}
