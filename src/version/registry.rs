//! Registry trait for fetching releases from a remote source

#[cfg(test)]
use mockall::automock;

use crate::version::error::RegistryError;
use crate::version::release::Release;

/// Trait for fetching the releases of a repository
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait ReleaseRegistry: Send + Sync {
    /// Fetches all releases of `owner/repo`
    ///
    /// # Returns
    /// * `Ok(Vec<Release>)` - Releases in the order the remote returned them
    /// * `Err(RegistryError)` - If the request fails or the status is an error
    async fn fetch_releases(&self, owner: &str, repo: &str) -> Result<Vec<Release>, RegistryError>;
}
