//! Version resolution from GitHub releases
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Registry   │────▶│  Selector   │────▶│   Version   │
//! │  (fetch)    │     │(group, max) │     │  (derive)   │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!        ▲                   │                   │
//!        │                   ▼                   ▼
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Fetcher   │────▶│   Semver    │     │    Cache    │
//! │(orchestrate)│     │(parse, cmp) │     │   (file)    │
//! └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`semver`]: tag parsing and version ordering
//! - [`release`]: raw GitHub release records
//! - [`selector`]: filtering, grouping and latest-per-major selection
//! - [`types`]: the [`types::Version`] exposed to the site
//! - [`cache`]: file-backed, time-expiring version cache
//! - [`registry`]: trait for fetching releases
//! - [`registries`]: concrete registry implementations (GitHub)
//! - [`fetcher`]: cache, fetch, select and persist in one call
//! - [`error`]: error types for cache and registry operations

pub mod cache;
pub mod error;
pub mod fetcher;
pub mod registries;
pub mod registry;
pub mod release;
pub mod selector;
pub mod semver;
pub mod types;
