use std::collections::HashSet;

use tracing::debug;

use crate::error::LangfulError;

/// Normalize a locale identifier to the catalog file naming style.
///
/// - Drops encoding/modifier suffixes (`en_US.UTF-8`, `de_DE@euro`).
/// - Converts `-` to `_` (`en-US` -> `en_us`).
/// - Lowercases and trims whitespace.
pub fn normalize_locale(s: &str) -> String {
    let s = s.trim();
    let s = s.split(['.', '@']).next().unwrap_or_default();
    s.trim().replace('-', "_").to_lowercase()
}

/// Source of the operating system's preferred locale.
pub trait SystemLocale {
    fn system_locale(&self) -> Option<String>;
}

/// Queries the OS through `sys-locale`.
#[derive(Clone, Copy, Debug, Default)]
pub struct OsLocale;

impl SystemLocale for OsLocale {
    #[cfg(feature = "system-locale")]
    fn system_locale(&self) -> Option<String> {
        sys_locale::get_locale()
    }

    #[cfg(not(feature = "system-locale"))]
    fn system_locale(&self) -> Option<String> {
        None
    }
}

/// A fixed answer, for tests and for callers that detect the locale themselves.
#[derive(Clone, Debug, Default)]
pub struct FixedLocale(pub Option<String>);

impl SystemLocale for FixedLocale {
    fn system_locale(&self) -> Option<String> {
        self.0.clone()
    }
}

/// Ordered locale candidates: empty entries dropped, first occurrence wins.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FallbackChain(Vec<String>);

impl FallbackChain {
    pub fn new<I, S>(candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out = Vec::new();
        let mut seen = HashSet::new();
        for c in candidates {
            let c = c.as_ref();
            if c.is_empty() {
                continue;
            }
            if seen.insert(c.to_string()) {
                out.push(c.to_string());
            }
        }
        Self(out)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// First candidate accepted by `is_available`.
    pub fn first_available(&self, is_available: impl Fn(&str) -> bool) -> Option<&str> {
        self.iter().find(|c| is_available(c))
    }

    /// Like [`Self::first_available`], failing with `NoLocale` when nothing matches.
    pub fn resolve(&self, is_available: impl Fn(&str) -> bool) -> Result<String, LangfulError> {
        self.first_available(is_available)
            .map(str::to_string)
            .ok_or_else(|| LangfulError::NoLocale {
                tried: self.0.clone(),
            })
    }
}

/// Chooses the active locale: override, then system, then default.
#[derive(Clone, Debug)]
pub struct LocaleResolver {
    override_locale: Option<String>,
    system: Option<String>,
    default: String,
}

impl LocaleResolver {
    pub fn new(default: impl Into<String>) -> Self {
        Self {
            override_locale: None,
            system: None,
            default: default.into(),
        }
    }

    /// Resolver whose system candidate comes from `source` (normalized).
    pub fn detect(default: impl Into<String>, source: &impl SystemLocale) -> Self {
        let mut resolver = Self::new(default);
        resolver.system = source
            .system_locale()
            .map(|l| normalize_locale(&l))
            .filter(|l| !l.is_empty());
        debug!(system = ?resolver.system, "LocaleResolver: detected system locale");
        resolver
    }

    pub fn override_locale(&self) -> Option<&str> {
        self.override_locale.as_deref()
    }

    pub fn system_locale(&self) -> Option<&str> {
        self.system.as_deref()
    }

    pub fn default_locale(&self) -> &str {
        &self.default
    }

    pub fn set_override(&mut self, locale: impl Into<String>) {
        let locale = locale.into();
        debug!("LocaleResolver::set_override: {:?} -> {}", self.override_locale, locale);
        self.override_locale = Some(locale);
    }

    pub fn clear_override(&mut self) -> Option<String> {
        self.override_locale.take()
    }

    pub fn set_system(&mut self, locale: Option<String>) {
        self.system = locale;
    }

    pub fn set_default(&mut self, locale: impl Into<String>) {
        self.default = locale.into();
    }

    pub fn chain(&self) -> FallbackChain {
        FallbackChain::new([
            self.override_locale.as_deref().unwrap_or_default(),
            self.system.as_deref().unwrap_or_default(),
            self.default.as_str(),
        ])
    }

    pub fn resolve(&self, is_available: impl Fn(&str) -> bool) -> Result<String, LangfulError> {
        self.chain().resolve(is_available)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn normalize() {
        assert_eq!(normalize_locale("en-US"), "en_us");
        assert_eq!(normalize_locale(" de_DE.UTF-8 "), "de_de");
        assert_eq!(normalize_locale("sr_RS@latin"), "sr_rs");
        assert_eq!(normalize_locale(""), "");
    }

    #[test]
    fn chain_drops_empty_and_duplicates() {
        let chain = FallbackChain::new(["fr", "", "en", "fr", "default"]);
        assert_eq!(chain.as_slice(), ["fr", "en", "default"]);
    }

    #[test]
    fn chain_resolves_first_present() {
        let chain = FallbackChain::new(["fr", "", "en", "fr", "default"]);
        let present = ["default", "en"];
        assert_eq!(chain.resolve(|l| present.contains(&l)).unwrap(), "en");
    }

    #[test]
    fn chain_without_match_is_not_found() {
        let chain = FallbackChain::new(["fr", "en"]);
        let err = chain.resolve(|l| l == "de").unwrap_err();
        assert!(err.is_not_found());
        match err {
            LangfulError::NoLocale { tried } => assert_eq!(tried, vec!["fr", "en"]),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn override_takes_priority_until_cleared() {
        let mut r = LocaleResolver::detect("en_us", &FixedLocale(Some("ko-KR".into())));
        assert_eq!(r.chain().as_slice(), ["ko_kr", "en_us"]);

        r.set_override("fr");
        assert_eq!(r.chain().as_slice(), ["fr", "ko_kr", "en_us"]);
        assert_eq!(r.resolve(|l| l != "nope").unwrap(), "fr");

        assert_eq!(r.clear_override().as_deref(), Some("fr"));
        assert_eq!(r.resolve(|l| l == "en_us").unwrap(), "en_us");
    }

    #[test]
    fn missing_system_locale_is_skipped() {
        let r = LocaleResolver::detect("en_us", &FixedLocale(None));
        assert_eq!(r.system_locale(), None);
        assert_eq!(r.chain().as_slice(), ["en_us"]);
    }
}
