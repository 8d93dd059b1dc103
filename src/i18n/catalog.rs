//! Translation catalog: lazy, cached access to per-locale namespace files.
//!
//! Assets live at `{locales_dir}/{locale}/{namespace}.json` as nested JSON
//! string trees addressed by dotted key paths. Lookups degrade gracefully:
//! a missing file yields an empty namespace, a missing key falls back to the
//! default locale and finally to the raw key itself. Nothing in here returns
//! an error to the caller.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use regex::Regex;
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use crate::config::Config;

/// Internal failure modes when reading a namespace file. Absorbed inside
/// `Catalog::load`; callers only ever see an empty namespace.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read translation file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid translation JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A loaded `(locale, namespace)` translation mapping.
#[derive(Debug, Default)]
pub struct Namespace {
    root: Value,
}

impl Namespace {
    fn empty() -> Self {
        Self { root: Value::Null }
    }

    /// Walk a dotted key path through the nested tree. Every intermediate
    /// segment must resolve to an object and the terminal segment to a
    /// string; anything else is a miss.
    pub fn lookup(&self, dotted_key: &str) -> Option<&str> {
        let mut current = &self.root;
        for part in dotted_key.split('.') {
            current = current.as_object()?.get(part)?;
        }
        current.as_str()
    }

    pub fn is_empty(&self) -> bool {
        match self.root.as_object() {
            Some(map) => map.is_empty(),
            None => true,
        }
    }
}

/// Read-through cache of translation namespaces, keyed by
/// `(locale, namespace)`.
///
/// Entries are immutable once loaded, so concurrent requests racing on the
/// same key at worst load the file twice; both end up caching identical
/// content.
pub struct Catalog {
    config: Arc<Config>,
    cache: RwLock<HashMap<(String, String), Arc<Namespace>>>,
}

impl Catalog {
    pub fn new(config: Arc<Config>) -> Self {
        Self {
            config,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Load the mapping for `(locale, namespace)`, coercing an unsupported
    /// locale to the default. Missing or malformed files produce an empty
    /// namespace and a warning, never an error.
    pub fn load(&self, locale: &str, namespace: &str) -> Arc<Namespace> {
        let locale = self.coerce(locale);
        let key = (locale.to_string(), namespace.to_string());

        if let Some(cached) = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return Arc::clone(cached);
        }

        let loaded = Arc::new(self.read_namespace(locale, namespace));
        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        let entry = cache.entry(key).or_insert(loaded);
        Arc::clone(entry)
    }

    /// Build a `Translator` bound to one `(locale, namespace)` pair, with an
    /// optional key prefix. When the locale is not the default, the default
    /// locale's namespace is loaded alongside as a fallback.
    pub fn translator(&self, locale: &str, namespace: &str, key_prefix: Option<&str>) -> Translator {
        let locale = self.coerce(locale);
        let fallback = if locale != self.config.default_locale {
            Some(self.load(&self.config.default_locale, namespace))
        } else {
            None
        };
        Translator {
            primary: self.load(locale, namespace),
            fallback,
            key_prefix: key_prefix.map(str::to_string),
        }
    }

    fn coerce<'a>(&'a self, locale: &'a str) -> &'a str {
        if self.config.is_supported(locale) {
            locale
        } else {
            &self.config.default_locale
        }
    }

    fn read_namespace(&self, locale: &str, namespace: &str) -> Namespace {
        let path = Path::new(&self.config.locales_dir)
            .join(locale)
            .join(format!("{namespace}.json"));
        match read_namespace_file(&path) {
            Ok(loaded) => loaded,
            Err(err) => {
                warn!(
                    "No translations for {}/{} ({}): {}",
                    locale,
                    namespace,
                    path.display(),
                    err
                );
                Namespace::empty()
            }
        }
    }
}

fn read_namespace_file(path: &Path) -> Result<Namespace, CatalogError> {
    let raw = fs::read_to_string(path)?;
    let root: Value = serde_json::from_str(&raw)?;
    Ok(Namespace { root })
}

/// Translation lookup bound to a `(locale, namespace)` pair.
///
/// `t` / `t_with` try, in order: the prefixed key in the primary namespace,
/// the bare key in the primary namespace, both again in the default-locale
/// namespace, and finally return the raw key so the caller always gets a
/// displayable string.
pub struct Translator {
    primary: Arc<Namespace>,
    fallback: Option<Arc<Namespace>>,
    key_prefix: Option<String>,
}

impl Translator {
    pub fn t(&self, key: &str) -> String {
        self.t_with(key, &[])
    }

    pub fn t_with(&self, key: &str, vars: &[(&str, &str)]) -> String {
        let resolved = self.lookup(key).unwrap_or(key);
        interpolate(resolved, vars)
    }

    fn lookup(&self, key: &str) -> Option<&str> {
        self.lookup_in(&self.primary, key).or_else(|| {
            self.fallback
                .as_ref()
                .and_then(|namespace| self.lookup_in(namespace, key))
        })
    }

    fn lookup_in<'a>(&self, namespace: &'a Namespace, key: &str) -> Option<&'a str> {
        if let Some(prefix) = &self.key_prefix {
            if let Some(value) = namespace.lookup(&format!("{prefix}.{key}")) {
                return Some(value);
            }
        }
        namespace.lookup(key)
    }
}

// Placeholder pattern, cached for the process lifetime.
static PLACEHOLDER_REGEX: OnceLock<Regex> = OnceLock::new();

fn placeholder_regex() -> &'static Regex {
    PLACEHOLDER_REGEX.get_or_init(|| Regex::new(r"\{(\w+)\}").expect("placeholder regex is valid"))
}

/// Replace every `{name}` placeholder with the matching variable's value.
/// Placeholders with no matching variable are left intact verbatim.
fn interpolate(template: &str, vars: &[(&str, &str)]) -> String {
    if vars.is_empty() || !template.contains('{') {
        return template.to_string();
    }
    placeholder_regex()
        .replace_all(template, |captures: &regex::Captures| {
            let name = &captures[1];
            match vars.iter().find(|(var, _)| *var == name) {
                Some((_, value)) => (*value).to_string(),
                None => captures[0].to_string(),
            }
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_config(locales_dir: &Path) -> Arc<Config> {
        Arc::new(Config {
            default_locale: "en".to_string(),
            supported_locales: vec!["en".to_string(), "fa".to_string()],
            cookie_name: "locale".to_string(),
            cookie_max_age_secs: 2_592_000,
            locales_dir: locales_dir.to_str().expect("utf-8 path").to_string(),
            port: 8080,
        })
    }

    fn write_namespace(dir: &Path, locale: &str, namespace: &str, json: &str) {
        let locale_dir = dir.join(locale);
        fs::create_dir_all(&locale_dir).expect("create locale dir");
        fs::write(locale_dir.join(format!("{namespace}.json")), json).expect("write namespace");
    }

    fn test_catalog(dir: &TempDir) -> Catalog {
        Catalog::new(test_config(dir.path()))
    }

    // ==================== Dotted Lookup Tests ====================

    #[test]
    fn test_nested_lookup() {
        let dir = TempDir::new().expect("tempdir");
        write_namespace(dir.path(), "en", "home", r#"{"a": {"b": {"c": "deep"}}}"#);
        let catalog = test_catalog(&dir);

        let namespace = catalog.load("en", "home");
        assert_eq!(namespace.lookup("a.b.c"), Some("deep"));
        assert_eq!(namespace.lookup("a.b"), None, "non-terminal is not a string");
        assert_eq!(namespace.lookup("a.b.c.d"), None, "cannot descend into a string");
        assert_eq!(namespace.lookup("missing"), None);
    }

    #[test]
    fn test_flat_lookup() {
        let dir = TempDir::new().expect("tempdir");
        write_namespace(dir.path(), "en", "home", r#"{"greeting": "Hi"}"#);
        let catalog = test_catalog(&dir);

        assert_eq!(catalog.load("en", "home").lookup("greeting"), Some("Hi"));
    }

    // ==================== Prefix and Fallback Tests ====================

    #[test]
    fn test_prefixed_lookup_with_interpolation() {
        let dir = TempDir::new().expect("tempdir");
        write_namespace(dir.path(), "en", "home", r#"{"a": {"b": "hello {name}"}}"#);
        let catalog = test_catalog(&dir);

        let translator = catalog.translator("en", "home", Some("a"));
        assert_eq!(translator.t_with("b", &[("name", "Sam")]), "hello Sam");
    }

    #[test]
    fn test_prefixed_key_beats_bare_key() {
        let dir = TempDir::new().expect("tempdir");
        write_namespace(
            dir.path(),
            "en",
            "home",
            r#"{"title": "bare", "hero": {"title": "prefixed"}}"#,
        );
        let catalog = test_catalog(&dir);

        let translator = catalog.translator("en", "home", Some("hero"));
        assert_eq!(translator.t("title"), "prefixed");
    }

    #[test]
    fn test_bare_key_fallback_when_prefix_misses() {
        let dir = TempDir::new().expect("tempdir");
        write_namespace(dir.path(), "en", "home", r#"{"title": "bare"}"#);
        let catalog = test_catalog(&dir);

        let translator = catalog.translator("en", "home", Some("hero"));
        assert_eq!(translator.t("title"), "bare");
    }

    #[test]
    fn test_total_miss_returns_raw_key() {
        let dir = TempDir::new().expect("tempdir");
        write_namespace(dir.path(), "en", "home", r#"{}"#);
        let catalog = test_catalog(&dir);

        let translator = catalog.translator("en", "home", Some("hero"));
        assert_eq!(translator.t("missing.key"), "missing.key");
    }

    #[test]
    fn test_cross_locale_fallback() {
        let dir = TempDir::new().expect("tempdir");
        write_namespace(dir.path(), "en", "home", r#"{"greeting": "Hi"}"#);
        write_namespace(dir.path(), "fa", "home", r#"{"farewell": "بدرود"}"#);
        let catalog = test_catalog(&dir);

        let translator = catalog.translator("fa", "home", None);
        assert_eq!(translator.t("farewell"), "بدرود");
        // fa lacks the key; the default locale's namespace supplies it.
        assert_eq!(translator.t("greeting"), "Hi");
    }

    #[test]
    fn test_default_locale_has_no_fallback_pass() {
        let dir = TempDir::new().expect("tempdir");
        write_namespace(dir.path(), "en", "home", r#"{}"#);
        let catalog = test_catalog(&dir);

        let translator = catalog.translator("en", "home", None);
        assert!(translator.fallback.is_none());
        assert_eq!(translator.t("anything"), "anything");
    }

    // ==================== Interpolation Tests ====================

    #[test]
    fn test_interpolation_replaces_all_occurrences() {
        assert_eq!(
            interpolate("{a} and {b} and {a}", &[("a", "1"), ("b", "2")]),
            "1 and 2 and 1"
        );
    }

    #[test]
    fn test_interpolation_leaves_unknown_placeholders() {
        assert_eq!(
            interpolate("hello {name}, {missing}", &[("name", "Sam")]),
            "hello Sam, {missing}"
        );
    }

    #[test]
    fn test_interpolation_without_vars_is_verbatim() {
        assert_eq!(interpolate("hello {name}", &[]), "hello {name}");
    }

    // ==================== Degradation Tests ====================

    #[test]
    fn test_missing_file_yields_empty_namespace() {
        let dir = TempDir::new().expect("tempdir");
        let catalog = test_catalog(&dir);

        let namespace = catalog.load("en", "nope");
        assert!(namespace.is_empty());
        assert_eq!(namespace.lookup("anything"), None);
    }

    #[test]
    fn test_malformed_json_yields_empty_namespace() {
        let dir = TempDir::new().expect("tempdir");
        write_namespace(dir.path(), "en", "home", "{not json");
        let catalog = test_catalog(&dir);

        assert!(catalog.load("en", "home").is_empty());
    }

    #[test]
    fn test_unsupported_locale_coerces_to_default() {
        let dir = TempDir::new().expect("tempdir");
        write_namespace(dir.path(), "en", "home", r#"{"greeting": "Hi"}"#);
        let catalog = test_catalog(&dir);

        let namespace = catalog.load("de", "home");
        assert_eq!(namespace.lookup("greeting"), Some("Hi"));
    }

    // ==================== Cache Tests ====================

    #[test]
    fn test_cache_returns_same_namespace() {
        let dir = TempDir::new().expect("tempdir");
        write_namespace(dir.path(), "en", "home", r#"{"greeting": "Hi"}"#);
        let catalog = test_catalog(&dir);

        let first = catalog.load("en", "home");
        let second = catalog.load("en", "home");
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_cache_survives_file_removal() {
        let dir = TempDir::new().expect("tempdir");
        write_namespace(dir.path(), "en", "home", r#"{"greeting": "Hi"}"#);
        let catalog = test_catalog(&dir);

        assert_eq!(catalog.load("en", "home").lookup("greeting"), Some("Hi"));
        fs::remove_file(dir.path().join("en").join("home.json")).expect("remove");
        // Assets are load-time-immutable; the cache keeps serving.
        assert_eq!(catalog.load("en", "home").lookup("greeting"), Some("Hi"));
    }
}
