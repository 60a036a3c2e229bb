//! Polyfill loading

use crate::error::LocaleResult;
use crate::i18n::bundle::BundleId;
use crate::i18n::fetch::BundleFetcher;
use crate::i18n::registry::LocaleRegistry;
use crate::i18n::support::NativeSupport;

/// Outcome of [`ensure_polyfill`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolyfillStatus {
    /// Native support covers the language; nothing was fetched
    Native,
    /// Needed, but installed earlier in this process
    AlreadyInstalled,
    /// Needed and fetched by this call
    Installed,
}

impl PolyfillStatus {
    /// Whether the language needs the polyfill
    pub fn was_needed(self) -> bool {
        !matches!(self, PolyfillStatus::Native)
    }
}

/// Makes sure `tag` can be formatted, fetching the polyfill at most once
pub async fn ensure_polyfill(
    registry: &mut LocaleRegistry,
    support: &NativeSupport,
    fetcher: &dyn BundleFetcher,
    tag: &str,
) -> LocaleResult<PolyfillStatus> {
    if support.is_supported(tag) {
        return Ok(PolyfillStatus::Native);
    }

    if registry.polyfill_installed() {
        return Ok(PolyfillStatus::AlreadyInstalled);
    }

    tracing::debug!(
        tag,
        "Native formatting for \"{}\" not available, downloading the polyfill",
        tag
    );

    let bundle = fetcher.fetch_bundle(&BundleId::polyfill()).await?;
    registry.install_polyfill(bundle);

    tracing::debug!(tag, "Polyfill for \"{}\" has been loaded", tag);
    Ok(PolyfillStatus::Installed)
}
