//! Documentation versioning backed by GitHub releases
//!
//! - [`version`]: semantic versions, release selection, cache and fetcher
//! - [`site`]: versioning state, content collections, switcher and routing
//! - [`changelog`]: version labels derived from a changelog directory
//! - [`config`]: configuration file and well-known paths
//! - [`logger`]: tracing subscriber setup

pub mod changelog;
pub mod config;
pub mod logger;
pub mod site;
pub mod version;
