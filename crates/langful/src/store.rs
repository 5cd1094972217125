use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::codec::{Entries, Format};
use crate::config::LangfulConfig;
use crate::error::LangfulError;
use crate::guard::SaveGuard;
use crate::locale::{FallbackChain, FixedLocale, LocaleResolver, OsLocale};
use crate::resource::LanguageResource;
use crate::template::{self, DEFAULT_DELIMITER};
use crate::value::Value;

/// All loaded locales, keyed by locale id (the catalog file stem).
///
/// Methods taking `locale: Option<&str>` act on the active locale when
/// given `None`.
#[derive(Clone, Debug)]
pub struct LocaleStore {
    languages: IndexMap<String, LanguageResource>,
    /// Backing file per locale. Absent for memory-only locales.
    paths: HashMap<String, PathBuf>,
    resolver: LocaleResolver,
    delimiter: char,
}

impl Default for LocaleStore {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_LOCALE)
    }
}

impl LocaleStore {
    /// Empty in-memory store. The system locale is detected from the OS.
    pub fn new(default_locale: impl Into<String>) -> Self {
        Self::with_resolver(LocaleResolver::detect(default_locale, &OsLocale))
    }

    pub fn with_resolver(resolver: LocaleResolver) -> Self {
        Self {
            languages: IndexMap::new(),
            paths: HashMap::new(),
            resolver,
            delimiter: DEFAULT_DELIMITER,
        }
    }

    /// Store populated from every catalog in `dir`.
    pub fn open(
        dir: impl AsRef<Path>,
        default_locale: impl Into<String>,
    ) -> Result<Self, LangfulError> {
        let mut store = Self::new(default_locale);
        store.load_directory(dir)?;
        Ok(store)
    }

    pub fn from_config(config: &LangfulConfig) -> Result<Self, LangfulError> {
        let resolver = if config.detect_system_locale {
            LocaleResolver::detect(config.default_locale.as_str(), &OsLocale)
        } else {
            LocaleResolver::detect(config.default_locale.as_str(), &FixedLocale(None))
        };
        let mut store = Self::with_resolver(resolver);
        store.delimiter = config.delimiter;
        if let Some(locale) = config.locale.as_deref().filter(|l| !l.is_empty()) {
            store.set_locale(locale);
        }
        if let Some(dir) = &config.path {
            store.load_directory(dir)?;
        }
        Ok(store)
    }

    // ---------------------------------------------------------------------
    // Loading and saving
    // ---------------------------------------------------------------------

    /// Load every `.json` and `.lang` file in `dir` (not recursive).
    ///
    /// When both `name.json` and `name.lang` exist the JSON file wins.
    /// Files that fail to load are logged and skipped. Returns the number of
    /// locales loaded.
    pub fn load_directory(&mut self, dir: impl AsRef<Path>) -> Result<usize, LangfulError> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(LangfulError::Config(format!(
                "`{}` does not exist or is not a directory",
                dir.display()
            )));
        }

        let read = fs::read_dir(dir).map_err(|e| LangfulError::io(dir, e))?;
        let candidates = catalog_candidates(dir, read.map(|entry| entry.map(|e| e.path())));

        let mut claimed = std::collections::HashSet::new();
        let mut loaded = 0;
        for pass in Format::ALL {
            for (format, stem, path) in &candidates {
                if *format != pass || claimed.contains(stem) {
                    continue;
                }
                match self.load(path) {
                    Ok(_) => {
                        claimed.insert(stem.clone());
                        loaded += 1;
                    }
                    Err(e) => {
                        warn!(path = %path.display(), error = %e, "LocaleStore: skipping catalog");
                    }
                }
            }
        }
        debug!(dir = %dir.display(), loaded, "LocaleStore::load_directory");
        Ok(loaded)
    }

    /// Load a single catalog file. The locale id is the file stem and the
    /// extension selects the format. Returns the locale id.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<String, LangfulError> {
        let path = path.as_ref();
        let format = Format::from_path(path)?;
        let locale = path
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                LangfulError::Config(format!("`{}` has no usable file name", path.display()))
            })?
            .to_string();

        let bytes = fs::read(path).map_err(|e| LangfulError::io(path, e))?;
        let resource = LanguageResource::decode(format, &bytes)?;
        debug!(
            locale = %locale,
            format = %format,
            entries = resource.len(),
            "LocaleStore::load"
        );
        self.languages.insert(locale.clone(), resource);
        self.paths.insert(locale.clone(), path.to_path_buf());
        Ok(locale)
    }

    /// Write one locale to disk, using its own path and format unless
    /// overridden. Returns the path written.
    pub fn save(
        &self,
        locale: Option<&str>,
        path: Option<&Path>,
        format: Option<Format>,
    ) -> Result<PathBuf, LangfulError> {
        let locale = self.get_locale(locale)?;
        let resource = self.resource(&locale)?;
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => self.paths.get(&locale).cloned().ok_or_else(|| {
                LangfulError::Config(format!("locale `{locale}` has no backing file"))
            })?,
        };
        let format = format.unwrap_or(resource.format);
        let text = format.encode(&resource.entries)?;
        fs::write(&path, text).map_err(|e| LangfulError::io(&path, e))?;
        debug!(locale = %locale, path = %path.display(), format = %format, "LocaleStore::save");
        Ok(path)
    }

    /// Save every locale, optionally into `dir` (created if missing) as
    /// `<original stem>.<current format>`. Returns the number of files written.
    pub fn save_all(&self, dir: Option<&Path>) -> Result<usize, LangfulError> {
        if let Some(dir) = dir {
            if !dir.exists() {
                fs::create_dir_all(dir).map_err(|e| LangfulError::io(dir, e))?;
            } else if !dir.is_dir() {
                return Err(LangfulError::Config(format!(
                    "`{}` exists but is not a directory",
                    dir.display()
                )));
            }
        }

        let mut written = 0;
        for (locale, resource) in &self.languages {
            let target = match (dir, self.paths.get(locale)) {
                // Keep the original stem, but the extension follows the
                // current format so the file loads back as the same locale.
                (Some(dir), orig) => {
                    let stem = orig
                        .and_then(|p| p.file_stem())
                        .and_then(|s| s.to_str())
                        .unwrap_or(locale);
                    dir.join(format!("{stem}.{}", resource.format.extension()))
                }
                (None, Some(orig)) => orig.clone(),
                (None, None) => {
                    debug!(locale = %locale, "LocaleStore::save_all: memory-only, skipped");
                    continue;
                }
            };
            match self.save(Some(locale.as_str()), Some(target.as_path()), None) {
                Ok(_) => written += 1,
                Err(e) => {
                    warn!(
                        locale = %locale,
                        path = %target.display(),
                        error = %e,
                        "LocaleStore: save failed"
                    );
                }
            }
        }
        Ok(written)
    }

    /// Borrow the store through a guard that calls [`Self::save_all`] when
    /// it goes out of scope.
    pub fn scoped(&mut self, dir: Option<PathBuf>) -> SaveGuard<'_> {
        SaveGuard::new(self, dir)
    }

    // ---------------------------------------------------------------------
    // Locale selection
    // ---------------------------------------------------------------------

    /// The active locale: the first of override, system and default
    /// locales that is loaded.
    pub fn locale(&self) -> Result<String, LangfulError> {
        self.resolver.resolve(|l| self.languages.contains_key(l))
    }

    pub fn get_locale(&self, locale: Option<&str>) -> Result<String, LangfulError> {
        match locale {
            Some(l) => Ok(l.to_string()),
            None => self.locale(),
        }
    }

    pub fn set_locale(&mut self, locale: impl Into<String>) {
        self.resolver.set_override(locale);
    }

    pub fn remove_locale(&mut self) {
        self.resolver.clear_override();
    }

    /// Resolve the active locale, then clear the override.
    pub fn pop_locale(&mut self) -> Result<String, LangfulError> {
        let locale = self.locale()?;
        self.remove_locale();
        Ok(locale)
    }

    pub fn fallback_chain(&self) -> FallbackChain {
        self.resolver.chain()
    }

    pub fn resolver(&self) -> &LocaleResolver {
        &self.resolver
    }

    pub fn resolver_mut(&mut self) -> &mut LocaleResolver {
        &mut self.resolver
    }

    /// Whether the configured default locale is loaded.
    pub fn has_default_locale(&self) -> bool {
        self.languages.contains_key(self.resolver.default_locale())
    }

    // ---------------------------------------------------------------------
    // Entries
    // ---------------------------------------------------------------------

    pub fn get(&self, key: &str, locale: Option<&str>) -> Result<&Value, LangfulError> {
        let locale = self.get_locale(locale)?;
        let resource = self.resource(&locale)?;
        resource
            .get(key)
            .ok_or_else(|| LangfulError::MissingKey { locale, key: key.to_string() })
    }

    /// The value for `key` rendered as text.
    pub fn get_str(&self, key: &str, locale: Option<&str>) -> Result<String, LangfulError> {
        self.get(key, locale).map(Value::to_string)
    }

    /// Insert or replace an entry, returning the previous value.
    pub fn set(
        &mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
        locale: Option<&str>,
    ) -> Result<Option<Value>, LangfulError> {
        let locale = self.get_locale(locale)?;
        Ok(self.resource_mut(&locale)?.insert(key, value))
    }

    pub fn remove(&mut self, key: &str, locale: Option<&str>) -> Result<(), LangfulError> {
        self.pop(key, locale).map(|_| ())
    }

    pub fn pop(&mut self, key: &str, locale: Option<&str>) -> Result<Value, LangfulError> {
        let locale = self.get_locale(locale)?;
        self.resource_mut(&locale)?
            .remove(key)
            .ok_or_else(|| LangfulError::MissingKey { locale, key: key.to_string() })
    }

    // ---------------------------------------------------------------------
    // Resources
    // ---------------------------------------------------------------------

    pub fn get_resource(&self, locale: Option<&str>) -> Result<&LanguageResource, LangfulError> {
        let locale = self.get_locale(locale)?;
        self.resource(&locale)
    }

    pub fn get_resource_mut(
        &mut self,
        locale: Option<&str>,
    ) -> Result<&mut LanguageResource, LangfulError> {
        let locale = self.get_locale(locale)?;
        self.resource_mut(&locale)
    }

    /// The active locale's resource.
    pub fn language(&self) -> Result<&LanguageResource, LangfulError> {
        self.get_resource(None)
    }

    /// Insert or replace a locale. Returns the previous resource, if any.
    pub fn set_resource(
        &mut self,
        entries: Entries,
        format: Format,
        locale: Option<&str>,
    ) -> Result<Option<LanguageResource>, LangfulError> {
        let locale = self.get_locale(locale)?;
        debug!(locale = %locale, format = %format, "LocaleStore::set_resource");
        Ok(self
            .languages
            .insert(locale, LanguageResource::with_entries(format, entries)))
    }

    pub fn remove_resource(&mut self, locale: Option<&str>) -> Result<(), LangfulError> {
        self.pop_resource(locale).map(|_| ())
    }

    /// Remove a locale (and its backing path binding), returning its data.
    pub fn pop_resource(&mut self, locale: Option<&str>) -> Result<LanguageResource, LangfulError> {
        let locale = self.get_locale(locale)?;
        let resource = self
            .languages
            .shift_remove(&locale)
            .ok_or_else(|| LangfulError::UnknownLocale(locale.clone()))?;
        self.paths.remove(&locale);
        Ok(resource)
    }

    // ---------------------------------------------------------------------
    // Format and backing path
    // ---------------------------------------------------------------------

    pub fn get_type(&self, locale: Option<&str>) -> Result<Format, LangfulError> {
        Ok(self.get_resource(locale)?.format)
    }

    pub fn set_type(&mut self, format: Format, locale: Option<&str>) -> Result<(), LangfulError> {
        self.get_resource_mut(locale)?.format = format;
        Ok(())
    }

    /// Reset a locale to the default (JSON) format, returning the old one.
    pub fn remove_type(&mut self, locale: Option<&str>) -> Result<Format, LangfulError> {
        let resource = self.get_resource_mut(locale)?;
        Ok(std::mem::take(&mut resource.format))
    }

    pub fn pop_type(&mut self, locale: Option<&str>) -> Result<Format, LangfulError> {
        self.remove_type(locale)
    }

    pub fn get_path(&self, locale: Option<&str>) -> Result<Option<&Path>, LangfulError> {
        let locale = self.get_locale(locale)?;
        self.resource(&locale)?;
        Ok(self.paths.get(&locale).map(PathBuf::as_path))
    }

    pub fn set_path(
        &mut self,
        path: impl Into<PathBuf>,
        locale: Option<&str>,
    ) -> Result<(), LangfulError> {
        let locale = self.get_locale(locale)?;
        self.resource(&locale)?;
        self.paths.insert(locale, path.into());
        Ok(())
    }

    /// Detach a locale from its file; it becomes memory-only.
    pub fn remove_path(&mut self, locale: Option<&str>) -> Result<Option<PathBuf>, LangfulError> {
        let locale = self.get_locale(locale)?;
        self.resource(&locale)?;
        Ok(self.paths.remove(&locale))
    }

    // ---------------------------------------------------------------------
    // Templates
    // ---------------------------------------------------------------------

    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    pub fn set_delimiter(&mut self, delimiter: char) {
        self.delimiter = delimiter;
    }

    /// Fill the placeholders of the template stored under `key` with `args`
    /// in order. See [`template::substitute_positional`].
    pub fn replace<S: AsRef<str>>(
        &self,
        key: &str,
        args: &[S],
        locale: Option<&str>,
    ) -> Result<String, LangfulError> {
        self.replace_with(key, args, locale, self.delimiter)
    }

    pub fn replace_with<S: AsRef<str>>(
        &self,
        key: &str,
        args: &[S],
        locale: Option<&str>,
        delimiter: char,
    ) -> Result<String, LangfulError> {
        let tmpl = self.get_str(key, locale)?;
        template::substitute_positional(&tmpl, args, delimiter)
    }

    /// Replace every `%key%` in `text` with that key's value.
    pub fn replace_str(&self, text: &str, locale: Option<&str>) -> Result<String, LangfulError> {
        self.replace_str_with(text, locale, self.delimiter)
    }

    pub fn replace_str_with(
        &self,
        text: &str,
        locale: Option<&str>,
        delimiter: char,
    ) -> Result<String, LangfulError> {
        let locale = self.get_locale(locale)?;
        template::expand_keys(text, delimiter, |key| {
            self.get_str(key, Some(locale.as_str()))
        })
    }

    // ---------------------------------------------------------------------
    // Collection surface
    // ---------------------------------------------------------------------

    pub fn contains(&self, locale: &str) -> bool {
        self.languages.contains_key(locale)
    }

    pub fn len(&self) -> usize {
        self.languages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }

    pub fn locales(&self) -> impl Iterator<Item = &str> {
        self.languages.keys().map(String::as_str)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.locales()
    }

    pub fn values(&self) -> impl Iterator<Item = &LanguageResource> {
        self.languages.values()
    }

    pub fn items(&self) -> impl Iterator<Item = (&str, &LanguageResource)> {
        self.iter()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &LanguageResource)> {
        self.languages.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Snapshot of every locale's entries.
    pub fn to_map(&self) -> IndexMap<String, Entries> {
        self.languages
            .iter()
            .map(|(k, v)| (k.clone(), v.entries.clone()))
            .collect()
    }

    fn resource(&self, locale: &str) -> Result<&LanguageResource, LangfulError> {
        self.languages
            .get(locale)
            .ok_or_else(|| LangfulError::UnknownLocale(locale.to_string()))
    }

    fn resource_mut(&mut self, locale: &str) -> Result<&mut LanguageResource, LangfulError> {
        self.languages
            .get_mut(locale)
            .ok_or_else(|| LangfulError::UnknownLocale(locale.to_string()))
    }
}

/// Catalog files among directory entries, sorted by path. Unreadable
/// entries are logged and skipped.
fn catalog_candidates(
    dir: &Path,
    entries: impl Iterator<Item = std::io::Result<PathBuf>>,
) -> Vec<(Format, String, PathBuf)> {
    let mut candidates = Vec::new();
    for entry in entries {
        let path = match entry {
            Ok(path) => path,
            Err(e) => {
                warn!(
                    dir = %dir.display(),
                    error = %e,
                    "LocaleStore: skipping unreadable directory entry"
                );
                continue;
            }
        };
        if !path.is_file() {
            continue;
        }
        let Ok(format) = Format::from_path(&path) else {
            continue;
        };
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        candidates.push((format, stem.to_string(), path));
    }
    candidates.sort_by(|a, b| a.2.cmp(&b.2));
    candidates
}

impl fmt::Display for LocaleStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let map = self.to_map();
        match serde_json::to_string(&map) {
            Ok(s) => f.write_str(&s),
            Err(_) => Err(fmt::Error),
        }
    }
}

impl<'a> IntoIterator for &'a LocaleStore {
    type Item = (&'a String, &'a LanguageResource);
    type IntoIter = indexmap::map::Iter<'a, String, LanguageResource>;

    fn into_iter(self) -> Self::IntoIter {
        self.languages.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn store() -> LocaleStore {
        let mut store = LocaleStore::with_resolver(LocaleResolver::detect(
            "en_us",
            &FixedLocale(Some("fr_FR".into())),
        ));
        let mut en = Entries::new();
        en.insert("greet".into(), Value::from("Hello %1%, you are %2%"));
        en.insert("app".into(), Value::from("Langful"));
        en.insert("count".into(), Value::from(3));
        store.set_resource(en, Format::Json, Some("en_us")).unwrap();
        store
    }

    #[test]
    fn positional_replace_pads_with_last_arg() {
        let store = store();
        assert_eq!(
            store.replace("greet", &["Bob"], Some("en_us")).unwrap(),
            "Hello Bob, you are Bob"
        );
    }

    #[test]
    fn replace_missing_key_and_missing_args() {
        let store = store();
        let err = store.replace("nope", &["x"], None).unwrap_err();
        assert!(matches!(err, LangfulError::MissingKey { .. }));

        let none: Vec<String> = Vec::new();
        let err = store.replace("greet", &none, None).unwrap_err();
        assert!(matches!(err, LangfulError::MissingArgument));
    }

    #[test]
    fn replace_str_uses_the_given_locale() {
        let mut store = store();
        let mut fr = Entries::new();
        fr.insert("app".into(), Value::from("Langfulle"));
        store.set_resource(fr, Format::Lang, Some("fr_fr")).unwrap();

        // System locale `fr_FR` normalizes to `fr_fr`, which is now loaded.
        assert_eq!(store.locale().unwrap(), "fr_fr");
        assert_eq!(store.replace_str("%app% 100%%", None).unwrap(), "Langfulle 100%");
        assert_eq!(
            store.replace_str("%app% has %count%", Some("en_us")).unwrap(),
            "Langful has 3"
        );
    }

    #[test]
    fn entry_operations() {
        let mut store = store();
        assert_eq!(store.locale().unwrap(), "en_us");
        assert_eq!(store.set("title", "Home", None).unwrap(), None);
        assert_eq!(store.get("title", None).unwrap(), &Value::from("Home"));
        assert_eq!(store.pop("title", None).unwrap(), Value::from("Home"));

        let err = store.get("title", None).unwrap_err();
        assert!(err.is_not_found());
        assert!(store.remove("title", None).unwrap_err().is_not_found());
        assert!(store.get("app", Some("de")).unwrap_err().is_not_found());
        assert!(store.set("k", "v", Some("de")).unwrap_err().is_not_found());
    }

    #[test]
    fn type_and_path_operations() {
        let mut store = store();
        assert_eq!(store.get_type(None).unwrap(), Format::Json);
        store.set_type(Format::Lang, None).unwrap();
        assert_eq!(store.pop_type(None).unwrap(), Format::Lang);
        assert_eq!(store.get_type(None).unwrap(), Format::Json);

        assert_eq!(store.get_path(None).unwrap(), None);
        store.set_path("lang/en_us.json", None).unwrap();
        assert_eq!(
            store.get_path(None).unwrap(),
            Some(Path::new("lang/en_us.json"))
        );
        assert_eq!(
            store.remove_path(None).unwrap(),
            Some(PathBuf::from("lang/en_us.json"))
        );
        assert!(store.set_path("x.json", Some("zz")).is_err());
    }

    #[test]
    fn override_and_pop_locale() {
        let mut store = store();
        store
            .set_resource(Entries::new(), Format::Json, Some("ja"))
            .unwrap();
        store.set_locale("ja");
        assert_eq!(store.fallback_chain().as_slice(), ["ja", "fr_fr", "en_us"]);
        assert_eq!(store.pop_locale().unwrap(), "ja");
        assert_eq!(store.locale().unwrap(), "en_us");
    }

    #[test]
    fn resource_operations_and_collection_surface() {
        let mut store = store();
        store
            .set_resource(Entries::new(), Format::Lang, Some("de"))
            .unwrap();
        assert_eq!(store.len(), 2);
        assert!(store.contains("de"));
        assert_eq!(store.keys().collect::<Vec<_>>(), vec!["en_us", "de"]);
        assert!(store.has_default_locale());

        let de = store.pop_resource(Some("de")).unwrap();
        assert_eq!(de.format, Format::Lang);
        assert!(!store.contains("de"));
        assert!(store.remove_resource(Some("de")).unwrap_err().is_not_found());

        store.remove_resource(None).unwrap();
        assert!(store.is_empty());
        assert!(!store.has_default_locale());
        assert!(store.locale().unwrap_err().is_not_found());
    }

    #[test]
    fn unreadable_entry_does_not_abort_scan() {
        let tmp = tempfile::tempdir().unwrap();
        let good = tmp.path().join("en_us.lang");
        fs::write(&good, "k = v\n").unwrap();

        let entries = vec![
            Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied")),
            Ok(good.clone()),
            Ok(tmp.path().join("gone.json")),
        ];
        let candidates = catalog_candidates(tmp.path(), entries.into_iter());
        assert_eq!(
            candidates,
            vec![(Format::Lang, "en_us".to_string(), good)]
        );
    }

    #[test]
    fn display_renders_all_locales() {
        let mut store = LocaleStore::with_resolver(LocaleResolver::new("en_us"));
        let mut en = Entries::new();
        en.insert("a".into(), Value::from("x"));
        en.insert("n".into(), Value::from(1));
        store.set_resource(en, Format::Json, Some("en_us")).unwrap();
        assert_eq!(store.to_string(), r#"{"en_us":{"a":"x","n":1}}"#);
    }
}
