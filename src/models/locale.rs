//! Supported display languages and request locale negotiation.

use serde::{Deserialize, Serialize};

/// A display language supported by the calculator catalog.
///
/// # Example
///
/// ```
/// use calculator_engine::models::Locale;
///
/// assert_eq!(Locale::from_tag("pt-BR"), Some(Locale::Pt));
/// assert_eq!(Locale::from_tag("ja"), None);
/// assert_eq!(Locale::Es.as_code(), "es");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// English.
    En,
    /// Spanish.
    Es,
    /// Portuguese.
    Pt,
    /// French.
    Fr,
    /// German.
    De,
}

impl Locale {
    /// All supported locales, in catalog order.
    pub const ALL: [Locale; 5] = [Locale::En, Locale::Es, Locale::Pt, Locale::Fr, Locale::De];

    /// Returns the two-letter language code.
    pub fn as_code(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Es => "es",
            Locale::Pt => "pt",
            Locale::Fr => "fr",
            Locale::De => "de",
        }
    }

    /// Parses a language tag such as `es`, `pt-BR` or `de_DE`.
    ///
    /// Only the primary subtag is considered and matching is case-insensitive.
    pub fn from_tag(tag: &str) -> Option<Locale> {
        let primary = tag
            .trim()
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();

        Locale::ALL
            .into_iter()
            .find(|locale| locale.as_code() == primary)
    }

    /// Resolves the locale for a request.
    ///
    /// An explicit `query` locale wins when it is supported, then the
    /// highest-weighted supported entry of the `Accept-Language` header,
    /// then `default`.
    ///
    /// # Example
    ///
    /// ```
    /// use calculator_engine::models::Locale;
    ///
    /// let locale = Locale::negotiate(None, Some("ja, fr-CA;q=0.8, en;q=0.5"), Locale::En);
    /// assert_eq!(locale, Locale::Fr);
    /// ```
    pub fn negotiate(query: Option<&str>, accept_language: Option<&str>, default: Locale) -> Locale {
        Locale::negotiate_within(query, accept_language, default, &Locale::ALL)
    }

    /// Like [`Locale::negotiate`], but only locales in `available` are
    /// considered at each step.
    ///
    /// # Example
    ///
    /// ```
    /// use calculator_engine::models::Locale;
    ///
    /// let site = [Locale::En, Locale::Es];
    /// let locale = Locale::negotiate_within(Some("de"), Some("es"), Locale::En, &site);
    /// assert_eq!(locale, Locale::Es);
    /// ```
    pub fn negotiate_within(
        query: Option<&str>,
        accept_language: Option<&str>,
        default: Locale,
        available: &[Locale],
    ) -> Locale {
        if let Some(locale) = query
            .and_then(Locale::from_tag)
            .filter(|locale| available.contains(locale))
        {
            return locale;
        }

        accept_language
            .and_then(|header| parse_accept_language(header, available))
            .unwrap_or(default)
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_code())
    }
}

/// Picks the best supported locale from an `Accept-Language` header value.
fn parse_accept_language(header: &str, available: &[Locale]) -> Option<Locale> {
    let mut candidates: Vec<(f32, usize, Locale)> = header
        .split(',')
        .enumerate()
        .filter_map(|(position, entry)| {
            let mut parts = entry.split(';');
            let locale = Locale::from_tag(parts.next()?).filter(|l| available.contains(l))?;
            let quality = parts
                .find_map(|param| param.trim().strip_prefix("q="))
                .and_then(|q| q.trim().parse::<f32>().ok())
                .unwrap_or(1.0);
            (quality > 0.0).then_some((quality, position, locale))
        })
        .collect();

    // Highest quality first; header order breaks ties.
    candidates.sort_by(|a, b| b.0.total_cmp(&a.0).then(a.1.cmp(&b.1)));
    candidates.first().map(|(_, _, locale)| *locale)
}
