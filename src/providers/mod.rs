pub mod bitbucket;

use crate::models::{DevOpsSystem, StatusRecord};

/// Contract shared by every CI status provider.
///
/// Implementations return exactly one record per observed item of the
/// system, in configuration order, and absorb all fetch failures.
#[allow(async_fn_in_trait)]
pub trait StatusProvider {
    /// Tag written into `StatusRecord::git_server_type`.
    fn server_type(&self) -> &'static str;

    async fn get_status_list(&self, system: &DevOpsSystem) -> Vec<StatusRecord>;
}
