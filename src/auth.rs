mod basic;
mod store;

pub use basic::BasicAuth;
pub use store::{CredentialStore, EnvCredentials};
