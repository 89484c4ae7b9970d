//! Registry implementations for fetching releases

pub mod github;

pub use github::GitHubRegistry;
