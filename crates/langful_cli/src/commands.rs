//! Subcommand implementations

use anyhow::{Context, Result};
use langful::{Format, LangfulConfig, LocaleStore, Value};
use std::path::Path;
use tracing::info;

pub fn open_store(config: &LangfulConfig) -> Result<LocaleStore> {
    let store = LocaleStore::from_config(config).with_context(|| match &config.path {
        Some(dir) => format!("Failed to load catalogs from {}", dir.display()),
        None => "Failed to create catalog store".to_string(),
    })?;
    info!(locales = store.len(), "catalogs loaded");
    Ok(store)
}

pub fn list(store: &LocaleStore) -> Result<()> {
    let active = store.locale().ok();
    for (locale, resource) in store.iter() {
        let marker = if active.as_deref() == Some(locale) { "*" } else { " " };
        let path = store
            .get_path(Some(locale))?
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(memory)".to_string());
        println!(
            "{marker} {locale:<12} {:<5} {:>5} entries  {path}",
            resource.format.extension(),
            resource.len()
        );
    }
    if active.is_none() {
        println!(
            "no active locale (tried {:?})",
            store.fallback_chain().as_slice()
        );
    }
    Ok(())
}

pub fn get(store: &LocaleStore, key: &str) -> Result<()> {
    println!("{}", store.get(key, None)?);
    Ok(())
}

pub fn set(store: &mut LocaleStore, key: String, value: &str, int: bool) -> Result<()> {
    let value = if int {
        Value::Int(
            value
                .parse()
                .with_context(|| format!("`{value}` is not an integer"))?,
        )
    } else {
        Value::from(value)
    };

    let locale = store.locale()?;
    let previous = store.set(key.as_str(), value, Some(locale.as_str()))?;
    save_locale(store, &locale)?;
    match previous {
        Some(old) => println!("{locale}: {key} (was {old})"),
        None => println!("{locale}: {key} (new)"),
    }
    Ok(())
}

pub fn remove(store: &mut LocaleStore, key: &str) -> Result<()> {
    let locale = store.locale()?;
    let old = store.pop(key, Some(locale.as_str()))?;
    save_locale(store, &locale)?;
    println!("{locale}: removed {key} (was {old})");
    Ok(())
}

/// Persist only the edited locale; other catalogs stay byte-for-byte as they are.
fn save_locale(store: &LocaleStore, locale: &str) -> Result<()> {
    let path = store
        .save(Some(locale), None, None)
        .with_context(|| format!("Failed to save locale `{locale}`"))?;
    info!(locale, path = %path.display(), "catalog saved");
    Ok(())
}

pub fn render(store: &LocaleStore, key: &str, args: &[String]) -> Result<()> {
    println!("{}", store.replace(key, args, None)?);
    Ok(())
}

pub fn expand(store: &LocaleStore, text: &str) -> Result<()> {
    println!("{}", store.replace_str(text, None)?);
    Ok(())
}

pub fn convert(store: &LocaleStore, locale: &str, to: Format, out: Option<&Path>) -> Result<()> {
    let dir = match out {
        Some(dir) => dir.to_path_buf(),
        None => store
            .get_path(Some(locale))?
            .and_then(Path::parent)
            .map(Path::to_path_buf)
            .with_context(|| format!("locale `{locale}` has no file; pass --out"))?,
    };
    let target = dir.join(format!("{locale}.{}", to.extension()));
    let written = store
        .save(Some(locale), Some(target.as_path()), Some(to))
        .with_context(|| format!("Failed to write {}", target.display()))?;
    println!("{}", written.display());
    Ok(())
}

pub fn export(store: &LocaleStore, dir: &Path) -> Result<()> {
    let written = store
        .save_all(Some(dir))
        .with_context(|| format!("Failed to export to {}", dir.display()))?;
    println!("{written} catalog(s) written to {}", dir.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;

    fn open(dir: &Path) -> LocaleStore {
        let config = LangfulConfig {
            path: Some(dir.to_path_buf()),
            detect_system_locale: false,
            ..Default::default()
        };
        open_store(&config).unwrap()
    }

    #[test]
    fn editing_one_locale_leaves_other_files_untouched() {
        let tmp = tempfile::tempdir().unwrap();
        let fr = tmp.path().join("fr.lang");
        fs::write(tmp.path().join("en_us.json"), r#"{"greet": "Hello"}"#).unwrap();
        fs::write(&fr, "greet = Salut\n").unwrap();

        for i in 0..3 {
            let mut store = open(tmp.path());
            set(&mut store, format!("k{i}"), "v", false).unwrap();
        }
        let mut store = open(tmp.path());
        remove(&mut store, "k0").unwrap();

        assert_eq!(fs::read_to_string(&fr).unwrap(), "greet = Salut\n");
        assert_eq!(
            fs::read_to_string(tmp.path().join("en_us.json")).unwrap(),
            "{\n    \"greet\": \"Hello\",\n    \"k1\": \"v\",\n    \"k2\": \"v\"\n}"
        );
    }

    #[test]
    fn set_int_rejects_non_numbers() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("en_us.json"), "{}").unwrap();
        let mut store = open(tmp.path());

        assert!(set(&mut store, "n".into(), "abc", true).is_err());
        set(&mut store, "n".into(), "42", true).unwrap();
        assert_eq!(store.get("n", None).unwrap(), &Value::Int(42));
    }
}
