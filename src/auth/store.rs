use std::collections::HashMap;

use indexmap::IndexMap;

/// Key/value lookup for provider credentials.
///
/// Keys follow the `"{system-guid}:{name}"` convention.
pub trait CredentialStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
}

impl CredentialStore for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}

impl CredentialStore for IndexMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        IndexMap::get(self, key).cloned()
    }
}

/// Reads credentials from environment variables.
///
/// The `:` separator is not portable in variable names, so `sys:Password`
/// is looked up as `sys__Password`.
#[derive(Debug, Clone, Copy)]
pub struct EnvCredentials {
    lookup: fn(&str) -> Option<String>,
}

fn read_process_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

impl EnvCredentials {
    /// Resolves variable names through `lookup` instead of the process
    /// environment.
    pub fn with_lookup(lookup: fn(&str) -> Option<String>) -> Self {
        Self { lookup }
    }

    pub fn variable_name(key: &str) -> String {
        key.replace(':', "__")
    }
}

impl Default for EnvCredentials {
    fn default() -> Self {
        Self::with_lookup(read_process_env)
    }
}

impl CredentialStore for EnvCredentials {
    fn get(&self, key: &str) -> Option<String> {
        (self.lookup)(&Self::variable_name(key))
    }
}

/// First store wins; the second is consulted only on a miss.
impl<A: CredentialStore, B: CredentialStore> CredentialStore for (A, B) {
    fn get(&self, key: &str) -> Option<String> {
        self.0.get(key).or_else(|| self.1.get(key))
    }
}
