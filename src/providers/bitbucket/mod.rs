mod client;
mod normalize;
mod provider;
mod types;

pub use client::BitbucketClient;
pub use provider::BitbucketStatusProvider;
