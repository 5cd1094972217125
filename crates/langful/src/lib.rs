//! langful: localization resources on disk
//!
//! - Catalogs: one file per locale, `.json` or `.lang`, stem = locale id
//! - Active locale: override -> system locale -> configured default
//! - Templates: `%`-delimited placeholders filled positionally or by key
//!
//! ```
//! use langful::{Entries, Format, LocaleResolver, LocaleStore, Value};
//!
//! let mut store = LocaleStore::with_resolver(LocaleResolver::new("en_us"));
//! let mut en = Entries::new();
//! en.insert("greet".into(), Value::from("Hello %name%!"));
//! store.set_resource(en, Format::Json, Some("en_us")).unwrap();
//!
//! assert_eq!(store.replace("greet", &["Ann"], None).unwrap(), "Hello Ann!");
//! ```

mod codec;
mod config;
mod error;
mod guard;
mod locale;
mod resource;
mod store;
pub mod template;
mod value;

pub use codec::{CodecError, Entries, Format};
pub use config::{LangfulConfig, CONFIG_FILE, DEFAULT_DIR, DEFAULT_LOCALE};
pub use error::LangfulError;
pub use guard::SaveGuard;
pub use locale::{
    normalize_locale, FallbackChain, FixedLocale, LocaleResolver, OsLocale, SystemLocale,
};
pub use resource::LanguageResource;
pub use store::LocaleStore;
pub use value::Value;
