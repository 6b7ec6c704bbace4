use axum::{
    extract::State,
    http::{HeaderMap, StatusCode, Uri, header},
    response::Response,
};
use axum_extra::extract::CookieJar;
use url::Url;

use crate::{
    application::{
        bootstrap::PageRender, chrome::build_chrome, error::ErrorReport,
    },
    domain::{
        page::PageKind,
        theme::{THEME_COOKIE, Theme},
    },
    presentation::views::{
        DiagnosticTemplate, SitePageTemplate, render_not_found_response,
        render_template_response,
    },
};

use super::{HttpState, content_health_response};

const FORWARDED_PROTO: &str = "x-forwarded-proto";

pub(super) async fn home(
    State(state): State<HttpState>,
    jar: CookieJar,
    headers: HeaderMap,
    uri: Uri,
) -> Response {
    render(&state, PageKind::Home, &jar, &headers, &uri).await
}

pub(super) async fn about(
    State(state): State<HttpState>,
    jar: CookieJar,
    headers: HeaderMap,
    uri: Uri,
) -> Response {
    render(&state, PageKind::About, &jar, &headers, &uri).await
}

pub(super) async fn articles(
    State(state): State<HttpState>,
    jar: CookieJar,
    headers: HeaderMap,
    uri: Uri,
) -> Response {
    render(&state, PageKind::Articles, &jar, &headers, &uri).await
}

pub(super) async fn gallery(
    State(state): State<HttpState>,
    jar: CookieJar,
    headers: HeaderMap,
    uri: Uri,
) -> Response {
    render(&state, PageKind::Gallery, &jar, &headers, &uri).await
}

pub(super) async fn contact(
    State(state): State<HttpState>,
    jar: CookieJar,
    headers: HeaderMap,
    uri: Uri,
) -> Response {
    render(&state, PageKind::Contact, &jar, &headers, &uri).await
}

pub(super) async fn health(State(state): State<HttpState>) -> Response {
    content_health_response(state.bootstrap.store().load().await.map(|_| ()))
}

pub(super) async fn not_found(State(state): State<HttpState>, jar: CookieJar) -> Response {
    let document = state.bootstrap.store().load().await.ok();
    let chrome = build_chrome(document.as_deref(), PageKind::Home, stored_theme(&jar));
    render_not_found_response(chrome)
}

async fn render(
    state: &HttpState,
    kind: PageKind,
    jar: &CookieJar,
    headers: &HeaderMap,
    uri: &Uri,
) -> Response {
    let page_url = request_url(headers, uri);
    match state
        .bootstrap
        .render_page(kind, uri.path(), page_url.as_ref(), stored_theme(jar))
        .await
    {
        PageRender::Page(page) => {
            render_template_response(SitePageTemplate { view: page.view }, StatusCode::OK)
        }
        PageRender::Diagnostic(view) => {
            let detail = view
                .content
                .detail
                .clone()
                .unwrap_or_else(|| view.content.message.clone());
            let mut response = render_template_response(
                DiagnosticTemplate { view: *view },
                StatusCode::SERVICE_UNAVAILABLE,
            );
            ErrorReport::from_message(
                "infra::http::public::render",
                StatusCode::SERVICE_UNAVAILABLE,
                detail,
            )
            .attach(&mut response);
            response
        }
    }
}

fn stored_theme(jar: &CookieJar) -> Option<Theme> {
    jar.get(THEME_COOKIE)
        .and_then(|cookie| Theme::parse(cookie.value()))
}

/// Reconstruct the address the visitor requested.
fn request_url(headers: &HeaderMap, uri: &Uri) -> Option<Url> {
    let scheme = headers
        .get(FORWARDED_PROTO)
        .and_then(|value| value.to_str().ok())
        .filter(|value| matches!(*value, "http" | "https"))
        .unwrap_or("http");
    let host = headers
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("localhost");
    let path = uri
        .path_and_query()
        .map(|value| value.as_str())
        .unwrap_or("/");

    Url::parse(&format!("{scheme}://{host}{path}")).ok()
}
