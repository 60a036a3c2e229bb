//! Catalog hot reloading
//!
//! In development mode the catalog file of the active language is polled for
//! modification and a callback runs once per change. Only one language is
//! watched at a time.

use crate::i18n::bundle::BundleId;
use crate::i18n::catalog::catalog_language;
use crate::i18n::fetch::BundleFetcher;
use crate::i18n::registry::LocaleRegistry;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// A running watch; dropping it stops the polling task
#[derive(Debug)]
pub struct WatchHandle {
    path: PathBuf,
    task: JoinHandle<()>,
}

impl WatchHandle {
    fn spawn<F>(path: PathBuf, interval: Duration, on_change: F) -> Self
    where
        F: Fn() + Send + 'static,
    {
        let watched = path.clone();
        let task = tokio::spawn(async move {
            let mut last_modified = modified_time(&watched).await;
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                let current = modified_time(&watched).await;
                if current > last_modified {
                    tracing::debug!(path = %watched.display(), "Catalog changed");
                    last_modified = current;
                    on_change();
                }
            }
        });

        Self { path, task }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for WatchHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn modified_time(path: &Path) -> Option<SystemTime> {
    tokio::fs::metadata(path).await.ok()?.modified().ok()
}

/// File holding the catalog of the registry's active language, if the
/// fetcher reads from disk
pub fn catalog_path(registry: &LocaleRegistry, fetcher: &dyn BundleFetcher) -> Option<PathBuf> {
    let language = catalog_language(registry.active_language());
    fetcher.bundle_path(&BundleId::translation(language))
}

/// Development-only watcher for the active catalog
#[derive(Debug)]
pub struct CatalogWatcher {
    enabled: bool,
    interval: Duration,
    current: Option<WatchHandle>,
}

impl CatalogWatcher {
    pub fn new(development: bool, interval: Duration) -> Self {
        Self {
            enabled: development,
            interval,
            current: None,
        }
    }

    /// A watcher that never watches (production builds)
    pub fn disabled() -> Self {
        Self::new(false, Duration::from_secs(1))
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Watches the catalog of the registry's active language
    ///
    /// Returns the watched path, or `None` when disabled or when the fetcher
    /// has no file to watch. A previous watch is stopped. Must be called
    /// from within a tokio runtime.
    pub fn watch<F>(
        &mut self,
        registry: &LocaleRegistry,
        fetcher: &dyn BundleFetcher,
        on_change: F,
    ) -> Option<&Path>
    where
        F: Fn() + Send + 'static,
    {
        if !self.enabled {
            return None;
        }

        let path = catalog_path(registry, fetcher)?;

        tracing::info!(path = %path.display(), "Watching translation catalog");
        self.current = Some(WatchHandle::spawn(path, self.interval, on_change));
        self.current.as_ref().map(WatchHandle::path)
    }

    pub fn watched_path(&self) -> Option<&Path> {
        self.current.as_ref().map(WatchHandle::path)
    }

    pub fn stop(&mut self) {
        self.current = None;
    }
}

impl Default for CatalogWatcher {
    fn default() -> Self {
        Self::disabled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::fetch::FsBundleFetcher;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tempfile::TempDir;

    fn write_catalog(root: &Path, language: &str) -> PathBuf {
        let dir = root.join("translations");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(format!("{}.json", language));
        std::fs::write(&path, "{}").unwrap();
        path
    }

    fn touch(path: &Path, offset: Duration) {
        let file = std::fs::OpenOptions::new().write(true).open(path).unwrap();
        file.set_modified(SystemTime::now() + offset).unwrap();
    }

    async fn wait_for(counter: &AtomicUsize, expected: usize) -> bool {
        for _ in 0..200 {
            if counter.load(Ordering::SeqCst) >= expected {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        false
    }

    #[tokio::test]
    async fn test_disabled_is_noop() {
        let dir = TempDir::new().unwrap();
        write_catalog(dir.path(), "en");
        let fetcher = FsBundleFetcher::new(dir.path());

        let mut watcher = CatalogWatcher::disabled();
        assert!(watcher
            .watch(&LocaleRegistry::new(), &fetcher, || {})
            .is_none());
        assert!(watcher.watched_path().is_none());
    }

    #[tokio::test]
    async fn test_watches_active_language() {
        let dir = TempDir::new().unwrap();
        write_catalog(dir.path(), "en");
        let ru = write_catalog(dir.path(), "ru");
        let fetcher = FsBundleFetcher::new(dir.path());

        let mut registry = LocaleRegistry::new();
        registry.set_active_language("ru-RU");

        let mut watcher = CatalogWatcher::new(true, Duration::from_millis(10));
        let watched = watcher.watch(&registry, &fetcher, || {}).map(Path::to_path_buf);
        assert_eq!(watched, Some(ru));
    }

    #[tokio::test]
    async fn test_callback_runs_on_change() {
        let dir = TempDir::new().unwrap();
        let path = write_catalog(dir.path(), "en");
        let fetcher = FsBundleFetcher::new(dir.path());

        let changes = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&changes);

        let mut watcher = CatalogWatcher::new(true, Duration::from_millis(10));
        watcher.watch(&LocaleRegistry::new(), &fetcher, move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        // Let the task record the initial modification time
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(changes.load(Ordering::SeqCst), 0);

        touch(&path, Duration::from_secs(10));
        assert!(wait_for(&changes, 1).await);

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(changes.load(Ordering::SeqCst), 1);

        touch(&path, Duration::from_secs(20));
        assert!(wait_for(&changes, 2).await);
    }

    #[tokio::test]
    async fn test_new_watch_replaces_previous() {
        let dir = TempDir::new().unwrap();
        let en = write_catalog(dir.path(), "en");
        write_catalog(dir.path(), "ru");
        let fetcher = FsBundleFetcher::new(dir.path());

        let en_changes = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&en_changes);

        let mut registry = LocaleRegistry::new();
        let mut watcher = CatalogWatcher::new(true, Duration::from_millis(10));
        watcher.watch(&registry, &fetcher, move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        registry.set_active_language("ru");
        watcher.watch(&registry, &fetcher, || {});
        tokio::time::sleep(Duration::from_millis(30)).await;

        touch(&en, Duration::from_secs(10));
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(en_changes.load(Ordering::SeqCst), 0);
        assert!(watcher.watched_path().unwrap().ends_with("ru.json"));

        watcher.stop();
        assert!(watcher.watched_path().is_none());
    }
}
