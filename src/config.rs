use anyhow::{bail, Result};

/// Seconds in 30 days, the default lifetime of the locale cookie.
const DEFAULT_COOKIE_MAX_AGE: u64 = 60 * 60 * 24 * 30;

#[derive(Debug, Clone)]
pub struct Config {
    // Locale negotiation
    pub default_locale: String,
    pub supported_locales: Vec<String>,

    // Cookie contract
    pub cookie_name: String,
    pub cookie_max_age_secs: u64,

    // Translation assets
    pub locales_dir: String,

    // Server
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let default_locale = std::env::var("DEFAULT_LOCALE")
            .unwrap_or_else(|_| "en".to_string())
            .trim()
            .to_ascii_lowercase();

        let supported_raw =
            std::env::var("SUPPORTED_LOCALES").unwrap_or_else(|_| "en,fa".to_string());
        let mut supported_locales: Vec<String> = Vec::new();
        for code in supported_raw.split(',') {
            let code = code.trim().to_ascii_lowercase();
            if !code.is_empty() && !supported_locales.contains(&code) {
                supported_locales.push(code);
            }
        }

        if supported_locales.is_empty() {
            bail!("SUPPORTED_LOCALES must contain at least one locale code");
        }
        if !supported_locales.contains(&default_locale) {
            bail!(
                "DEFAULT_LOCALE '{}' is not listed in SUPPORTED_LOCALES ({})",
                default_locale,
                supported_locales.join(", ")
            );
        }

        Ok(Self {
            default_locale,
            supported_locales,

            cookie_name: std::env::var("LOCALE_COOKIE_NAME")
                .unwrap_or_else(|_| "locale".to_string()),
            cookie_max_age_secs: std::env::var("LOCALE_COOKIE_MAX_AGE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_COOKIE_MAX_AGE),

            locales_dir: std::env::var("LOCALES_DIR").unwrap_or_else(|_| "locales".to_string()),

            port: std::env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),
        })
    }

    /// Check whether a locale code is in the supported set.
    ///
    /// Matching is exact: codes are stored lowercased, and callers are
    /// expected to lowercase header-derived input before checking.
    pub fn is_supported(&self, code: &str) -> bool {
        self.supported_locales.iter().any(|locale| locale == code)
    }
}
