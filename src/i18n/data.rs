//! Locale data loading

use crate::error::LocaleResult;
use crate::i18n::bundle::{branch_language, bundle_set, BundleSet};
use crate::i18n::fetch::BundleFetcher;
use crate::i18n::locale::primary_language;
use crate::i18n::registry::LocaleRegistry;
use crate::i18n::support::NativeSupport;
use futures::future::try_join_all;

/// Fetches and installs the locale data serving `tag`
///
/// All bundles of the selected chunk are requested together and installed
/// only once every one of them arrived; a failed fetch installs nothing.
/// A chunk that is already installed is not fetched again.
pub async fn load_locale_data(
    registry: &mut LocaleRegistry,
    support: &NativeSupport,
    fetcher: &dyn BundleFetcher,
    tag: &str,
) -> LocaleResult<BundleSet> {
    let branch = branch_language(tag);
    if primary_language(tag) != branch {
        tracing::debug!(tag, fallback = branch, "No dedicated locale data, using fallback");
    }

    let set = bundle_set(tag, !support.is_supported(branch));

    if registry.chunk_loaded(set.language, set.chunk) {
        tracing::trace!(chunk = set.chunk, "Locale data already installed");
        return Ok(set);
    }

    let bundles = try_join_all(set.bundles.iter().map(|id| fetcher.fetch_bundle(id))).await?;

    for bundle in bundles {
        registry.install(set.language, bundle);
    }
    registry.mark_chunk_loaded(set.language, set.chunk);

    tracing::debug!(
        tag,
        chunk = set.chunk,
        bundles = set.bundles.len(),
        "Locale data for \"{}\" has been downloaded",
        tag
    );

    Ok(set)
}
