//! Application state for the Calculator Engine API.

use std::sync::Arc;

use crate::config::ConfigLoader;
use crate::models::Locale;

/// Shared application state.
///
/// Holds the calculator catalog, which is loaded once at startup and
/// read-only afterwards.
#[derive(Clone)]
pub struct AppState {
    /// The loaded calculator catalog.
    config: Arc<ConfigLoader>,
}

impl AppState {
    /// Creates a new application state with the given configuration loader.
    pub fn new(config: ConfigLoader) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Returns a reference to the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// Resolves the response locale, restricted to the site's locales.
    pub fn negotiate_locale(&self, requested: Option<&str>, accept_language: Option<&str>) -> Locale {
        Locale::negotiate_within(
            requested,
            accept_language,
            self.config.default_locale(),
            &self.config.site().locales,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_is_clone() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }

    #[test]
    fn test_negotiate_locale_prefers_query() {
        let state = AppState::new(ConfigLoader::load("./config").unwrap());
        assert_eq!(state.negotiate_locale(Some("pt-BR"), Some("de")), Locale::Pt);
        assert_eq!(state.negotiate_locale(None, Some("de-AT,de;q=0.9")), Locale::De);
        assert_eq!(state.negotiate_locale(Some("xx"), None), Locale::En);
    }

    #[test]
    fn test_negotiate_locale_skips_locales_the_site_does_not_offer() {
        let full = ConfigLoader::load("./config").unwrap();
        let mut site = full.site().clone();
        site.locales = vec![Locale::En, Locale::Es];
        let state = AppState::new(ConfigLoader::from_parts(site, full.calculators().to_vec()).unwrap());

        // German is a known locale but not offered; the header decides
        assert_eq!(state.negotiate_locale(Some("de"), Some("es-MX")), Locale::Es);
        assert_eq!(state.negotiate_locale(Some("de"), Some("fr, es;q=0.4")), Locale::Es);
        assert_eq!(state.negotiate_locale(Some("de"), Some("fr")), Locale::En);
    }
}
