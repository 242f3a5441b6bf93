//! GitHub REST API integration: wire types, error mapping, the
//! [`ActivitySource`] seam consumed by the scan engine, and its octocrab
//! implementation.

pub mod client;
pub mod error;
pub mod source;
pub mod stream;
pub mod types;

pub use client::GitHubSource;
pub use error::GitHubError;
pub use source::{ActivitySource, PAGE_SIZE};
pub use stream::IssueStream;
