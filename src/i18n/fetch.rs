//! Bundle fetching
//!
//! Defines the interface every bundle source must implement, plus the
//! file-system source used by the server.

use crate::error::{LocaleError, LocaleResult};
use crate::i18n::bundle::{Bundle, BundleId, BundleKind};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Source of locale bundles and translation catalogs.
///
/// Each call resolves exactly once: with the bundle, or with an error.
#[async_trait]
pub trait BundleFetcher: Send + Sync {
    /// Fetch a single bundle
    async fn fetch_bundle(&self, id: &BundleId) -> LocaleResult<Bundle>;

    /// On-disk location of a bundle, if the source can be watched for changes
    fn bundle_path(&self, _id: &BundleId) -> Option<PathBuf> {
        None
    }
}

/// Reads bundles as JSON files below a root directory
///
/// Layout: `polyfill.json` and `<kind>/<language>.json`.
#[derive(Debug, Clone)]
pub struct FsBundleFetcher {
    root: PathBuf,
}

impl FsBundleFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, id: &BundleId) -> PathBuf {
        match (&id.kind, &id.language) {
            (BundleKind::Polyfill, _) | (_, None) => {
                self.root.join(format!("{}.json", id.kind.dir_name()))
            }
            (kind, Some(language)) => self
                .root
                .join(kind.dir_name())
                .join(format!("{}.json", language)),
        }
    }
}

#[async_trait]
impl BundleFetcher for FsBundleFetcher {
    async fn fetch_bundle(&self, id: &BundleId) -> LocaleResult<Bundle> {
        let path = self.path_for(id);
        tracing::trace!(bundle = %id, path = %path.display(), "Fetching bundle");

        let contents = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| LocaleError::LoadFailed {
                bundle: id.to_string(),
                reason: format!("{}: {}", path.display(), e),
            })?;

        let payload = serde_json::from_str(&contents).map_err(|e| LocaleError::InvalidBundle {
            bundle: id.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Bundle::new(id.clone(), payload))
    }

    fn bundle_path(&self, id: &BundleId) -> Option<PathBuf> {
        Some(self.path_for(id))
    }
}
