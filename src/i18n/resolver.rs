//! Locale resolution: decide the effective locale for a request.
//!
//! The resolver is a pure function over the request's URL path, cookie value,
//! and Accept-Language header. It never fails: when no source yields a
//! supported locale, the configured default wins, so routing stays available
//! no matter how malformed the input is.

use crate::config::Config;

/// What the caller must do with the request after resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// The URL already carries a supported locale prefix; continue as-is.
    Proceed,
    /// The URL is missing a locale prefix; send a 302 to the contained path.
    Redirect(String),
}

/// Outcome of resolving a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// The effective locale for this request, always a supported code.
    pub locale: String,
    pub action: Action,
}

/// Resolve the effective locale for a request and decide whether its URL
/// needs to be normalized onto a `/{locale}/...` prefix.
///
/// Sources are consulted in strict priority order, short-circuiting on the
/// first supported candidate:
///
/// 1. the first URL path segment,
/// 2. the locale cookie,
/// 3. the Accept-Language header (first supported entry),
/// 4. the configured default.
///
/// A URL whose first segment is a supported locale is authoritative and is
/// never redirected, even when cookie or header prefer a different locale.
/// Any other URL redirects to `/{locale}` followed by the original path,
/// with a trailing slash preserved.
///
/// # Arguments
/// * `path` - The request path (e.g., "/fa/about")
/// * `cookie_locale` - Value of the locale cookie, if the request carried one
/// * `accept_language` - Raw Accept-Language header value, if present
///
/// # Returns
/// A `Resolution` holding the effective locale and the required action.
pub fn resolve(
    path: &str,
    cookie_locale: Option<&str>,
    accept_language: Option<&str>,
    config: &Config,
) -> Resolution {
    let first_segment = path.split('/').find(|segment| !segment.is_empty());
    let url_locale = first_segment.filter(|segment| config.is_supported(segment));

    let locale = match url_locale {
        Some(locale) => locale.to_string(),
        None => preferred_locale(cookie_locale, accept_language, config),
    };

    let action = match url_locale {
        Some(_) => Action::Proceed,
        None => Action::Redirect(redirect_target(path, &locale)),
    };

    Resolution { locale, action }
}

/// Resolve a locale from cookie and Accept-Language alone, without URL
/// involvement. Used by callers outside the routing path that only need a
/// display locale, never a redirect.
pub fn preferred_locale(
    cookie_locale: Option<&str>,
    accept_language: Option<&str>,
    config: &Config,
) -> String {
    if let Some(cookie) = cookie_locale {
        if config.is_supported(cookie) {
            return cookie.to_string();
        }
    }
    if let Some(header) = accept_language {
        if let Some(locale) = first_supported(header, config) {
            return locale;
        }
    }
    config.default_locale.clone()
}

/// Rewrite a path so that its first segment is `new_locale`, replacing an
/// existing supported prefix or prepending one when absent. An unsupported
/// `new_locale` coerces to the default. Used to build language-switcher
/// links that keep the visitor on the current page.
pub fn switch_locale_path(path: &str, new_locale: &str, config: &Config) -> String {
    let locale = if config.is_supported(new_locale) {
        new_locale
    } else {
        &config.default_locale
    };

    let segments: Vec<&str> = path.split('/').filter(|segment| !segment.is_empty()).collect();
    let rest = match segments.first() {
        Some(first) if config.is_supported(first) => &segments[1..],
        _ => &segments[..],
    };

    let mut target = format!("/{locale}");
    for segment in rest {
        target.push('/');
        target.push_str(segment);
    }
    if !rest.is_empty() && path.ends_with('/') {
        target.push('/');
    }
    target
}

/// Parse an Accept-Language value and return the first entry present in the
/// supported set. Quality values are stripped, entries are trimmed and
/// lowercased; anything unparseable is skipped rather than rejected.
fn first_supported(header: &str, config: &Config) -> Option<String> {
    header
        .split(',')
        .map(|entry| {
            entry
                .split(';')
                .next()
                .unwrap_or(entry)
                .trim()
                .to_ascii_lowercase()
        })
        .find(|tag| !tag.is_empty() && config.is_supported(tag))
}

/// Build the normalized redirect path: `/{locale}` followed by every
/// original segment, preserving a trailing slash.
fn redirect_target(path: &str, locale: &str) -> String {
    let rest = path.trim_start_matches('/');
    if rest.is_empty() {
        format!("/{locale}")
    } else {
        format!("/{locale}/{rest}")
    }
}
