//! HTTP surface: router assembly and the demo page handlers.
//!
//! Every page lives under a `/{locale}/...` prefix; the locale middleware
//! rewrites anything else before a handler runs. `/healthz` sits outside the
//! localized subtree and is never redirected.

use std::sync::Arc;

use axum::{
    extract::{OriginalUri, State},
    http::StatusCode,
    middleware,
    response::{Html, IntoResponse, Response},
    routing::get,
    Extension, Json, Router,
};
use serde::Serialize;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::i18n::{locale_middleware, switch_locale_path, Catalog, ResolvedLocale, Translator};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub catalog: Arc<Catalog>,
}

pub fn build_router(state: AppState) -> Router {
    let localized = Router::new()
        .route("/:locale", get(home))
        .route("/:locale/", get(home))
        .route("/:locale/about", get(about))
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(
            Arc::clone(&state.config),
            locale_middleware,
        ))
        .with_state(state);

    Router::new()
        .route("/healthz", get(healthz))
        .merge(localized)
        .layer(TraceLayer::new_for_http())
}

async fn home(
    State(state): State<AppState>,
    Extension(ResolvedLocale(locale)): Extension<ResolvedLocale>,
    OriginalUri(uri): OriginalUri,
) -> Html<String> {
    let common = state.catalog.translator(&locale, "common", None);
    let hero = state.catalog.translator(&locale, "home", Some("hero"));

    let site_name = common.t("site.name");
    let main = format!(
        "<h1>{}</h1>\n<p>{}</p>",
        hero.t_with("title", &[("site", &site_name)]),
        hero.t("intro"),
    );
    render_page(&state, &locale, uri.path(), &common, &main)
}

async fn about(
    State(state): State<AppState>,
    Extension(ResolvedLocale(locale)): Extension<ResolvedLocale>,
    OriginalUri(uri): OriginalUri,
) -> Html<String> {
    let common = state.catalog.translator(&locale, "common", None);
    let about = state.catalog.translator(&locale, "common", Some("about"));

    let main = format!(
        "<h1>{}</h1>\n<p>{}</p>",
        about.t("title"),
        about.t_with("body", &[("cookie", &state.config.cookie_name)]),
    );
    render_page(&state, &locale, uri.path(), &common, &main)
}

async fn not_found(
    State(state): State<AppState>,
    Extension(ResolvedLocale(locale)): Extension<ResolvedLocale>,
    OriginalUri(uri): OriginalUri,
) -> Response {
    let common = state.catalog.translator(&locale, "common", None);
    let path = escape_html(uri.path());
    let main = format!(
        "<h1>{}</h1>\n<p>{}</p>",
        common.t("not_found.title"),
        common.t_with("not_found.body", &[("path", &path)]),
    );
    let page = render_page(&state, &locale, uri.path(), &common, &main);
    (StatusCode::NOT_FOUND, page).into_response()
}

#[derive(Serialize)]
struct Health {
    status: &'static str,
}

async fn healthz() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Wrap page content in the shared chrome: nav, language switcher, footer.
fn render_page(
    state: &AppState,
    locale: &str,
    path: &str,
    common: &Translator,
    main: &str,
) -> Html<String> {
    let mut switcher = String::new();
    for other in &state.config.supported_locales {
        if other == locale {
            continue;
        }
        // Label each link in the target language's own name.
        let label = state
            .catalog
            .translator(other, "common", Some("locale"))
            .t("native_name");
        let href = switch_locale_path(path, other, &state.config);
        switcher.push_str(&format!("<a href=\"{href}\" rel=\"alternate\">{label}</a> "));
    }

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="{locale}" dir="{dir}">
<head>
<meta charset="utf-8">
<title>{title}</title>
</head>
<body>
<nav>
<a href="/{locale}">{nav_home}</a>
<a href="/{locale}/about">{nav_about}</a>
{switcher}
</nav>
<main>
{main}
</main>
<footer>
<p>{footer}</p>
</footer>
</body>
</html>
"#,
        dir = common.t("locale.dir"),
        title = common.t("site.name"),
        nav_home = common.t("nav.home"),
        nav_about = common.t("nav.about"),
        footer = common.t_with("footer.note", &[("locale", locale)]),
    ))
}

fn escape_html(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
