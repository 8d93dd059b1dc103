//! Request middleware that applies locale resolution to every request.
//!
//! On a pass-through the resolved locale is attached as a request extension;
//! on a redirect the inner service never runs. Either way the locale cookie
//! is (re)written on the response so URL, cookie, and preference converge.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{
        header::{ACCEPT_LANGUAGE, COOKIE, LOCATION, SET_COOKIE},
        HeaderMap, HeaderValue, StatusCode,
    },
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::config::Config;
use crate::i18n::resolver::{resolve, Action};

/// The locale resolved for the current request, available to handlers as an
/// `Extension` once the middleware has run.
#[derive(Debug, Clone)]
pub struct ResolvedLocale(pub String);

/// Resolve the request locale, normalize the URL, and sync the cookie.
pub async fn locale_middleware(
    State(config): State<Arc<Config>>,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    let cookie_locale = cookie_value(request.headers(), &config.cookie_name);
    let accept_language = request
        .headers()
        .get(ACCEPT_LANGUAGE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    let resolution = resolve(
        &path,
        cookie_locale.as_deref(),
        accept_language.as_deref(),
        &config,
    );

    let mut response = match resolution.action {
        Action::Redirect(target) => {
            // The redirect target is a path; carry the query string along.
            let location = match request.uri().query() {
                Some(query) => format!("{target}?{query}"),
                None => target,
            };
            debug!("Normalizing {} -> {} (locale {})", path, location, resolution.locale);
            (StatusCode::FOUND, [(LOCATION, location)]).into_response()
        }
        Action::Proceed => {
            debug!("Request {} resolved to locale {}", path, resolution.locale);
            request
                .extensions_mut()
                .insert(ResolvedLocale(resolution.locale.clone()));
            next.run(request).await
        }
    };

    if let Ok(cookie) = HeaderValue::from_str(&locale_cookie(&config, &resolution.locale)) {
        response.headers_mut().append(SET_COOKIE, cookie);
    }
    response
}

/// Extract a single cookie's value from the raw `Cookie` header.
fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    let raw = headers.get(COOKIE)?.to_str().ok()?;
    raw.split(';').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        if key.trim() == name {
            Some(value.trim().to_string())
        } else {
            None
        }
    })
}

fn locale_cookie(config: &Config, locale: &str) -> String {
    format!(
        "{}={}; Path=/; Max-Age={}; SameSite=Lax",
        config.cookie_name, locale, config.cookie_max_age_secs
    )
}
