//! Internationalization (i18n) module for locale negotiation and
//! translation lookup.
//!
//! Everything request-locale-related lives here:
//!
//! - `resolver`: pure locale resolution (URL segment > cookie >
//!   Accept-Language > default) and URL normalization decisions
//! - `middleware`: the axum layer that applies resolution to every request,
//!   issues normalization redirects, and keeps the locale cookie in sync
//! - `catalog`: cached, per-namespace translation lookup with dotted keys,
//!   `{var}` interpolation, and default-locale fallback
//!
//! # Example
//!
//! ```rust,ignore
//! use locale_gateway::i18n::{resolve, Action};
//!
//! let resolution = resolve("/about", Some("fa"), None, &config);
//! assert_eq!(resolution.action, Action::Redirect("/fa/about".into()));
//! ```

mod catalog;
mod middleware;
mod resolver;

pub use catalog::{Catalog, CatalogError, Namespace, Translator};
pub use middleware::{locale_middleware, ResolvedLocale};
pub use resolver::{preferred_locale, resolve, switch_locale_path, Action, Resolution};
