pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::cli::CliConfig;

pub use crate::adapters::http::ReqwestTransport;
pub use crate::config::FetchConfig;
pub use crate::core::fetcher::RepoFetcher;
pub use crate::domain::model::{Record, RepoSummary};
pub use crate::domain::ports::{HttpRequest, HttpResponse, HttpTransport, Method};
pub use crate::utils::error::{FetchError, Result, TransportError};

/// Lists `username`'s repositories over the network with default settings.
///
/// Builds a fresh [`ReqwestTransport`] per call; use [`RepoFetcher`] to
/// inject another transport or reuse a client.
pub fn get_repos(username: &str) -> Result<Vec<Record>> {
    RepoFetcher::from_config(&FetchConfig::default())?.get_repos(username)
}
