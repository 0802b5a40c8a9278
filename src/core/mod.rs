pub mod fetcher;

pub use crate::domain::model::{Record, RepoSummary};
pub use crate::domain::ports::{HttpRequest, HttpResponse, HttpTransport, Method};
pub use crate::utils::error::Result;
