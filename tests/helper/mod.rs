#![allow(dead_code)]

pub mod github;

pub use github::{mock_releases, release_json, test_config, test_fetcher};
