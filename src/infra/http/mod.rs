mod middleware;
mod public;
mod ui;

use std::sync::Arc;

use axum::{
    Router,
    extract::FromRef,
    http::StatusCode,
    middleware::from_fn,
    response::{IntoResponse, Response},
    routing::{get, post},
};

use crate::{
    application::{
        bootstrap::Bootstrap, contact::ContactService, content::ContentError,
        error::ErrorReport, lightbox::LightboxService,
    },
    infra::assets::{SiteAssets, serve_public, serve_site_asset},
};

use middleware::{log_responses, set_request_context};

const DATASTAR_REQUEST_HEADER: &str = "datastar-request";

#[derive(Clone)]
pub struct HttpState {
    pub bootstrap: Arc<Bootstrap>,
    pub lightbox: Arc<LightboxService>,
    pub contact: Arc<ContactService>,
    pub site_assets: SiteAssets,
}

impl FromRef<HttpState> for SiteAssets {
    fn from_ref(state: &HttpState) -> Self {
        state.site_assets.clone()
    }
}

pub fn build_router(state: HttpState) -> Router {
    let pages = Router::new()
        .route("/", get(public::home))
        .route("/index.html", get(public::home))
        .route("/about", get(public::about))
        .route("/about.html", get(public::about))
        .route("/articles", get(public::articles))
        .route("/articles.html", get(public::articles))
        .route("/gallery", get(public::gallery))
        .route("/gallery.html", get(public::gallery))
        .route("/contact", get(public::contact))
        .route("/contact.html", get(public::contact))
        .fallback(public::not_found);

    let interactive = Router::new()
        .route("/ui/lightbox/open/{tile}", get(ui::lightbox_open))
        .route("/ui/lightbox/navigate", get(ui::lightbox_navigate))
        .route("/ui/lightbox/close", get(ui::lightbox_close))
        .route("/ui/theme/{theme}", get(ui::set_theme))
        .route("/ui/contact", post(ui::contact_submit));

    let static_routes = Router::new()
        .route("/_health", get(public::health))
        .route("/assets/{*path}", get(serve_site_asset))
        .route("/static/{*path}", get(serve_public));

    pages
        .merge(interactive)
        .merge(static_routes)
        .with_state(state)
        .layer(from_fn(log_responses))
        .layer(from_fn(set_request_context))
}

fn content_health_response(result: Result<(), ContentError>) -> Response {
    match result {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => {
            let mut response = StatusCode::SERVICE_UNAVAILABLE.into_response();
            ErrorReport::from_error(
                "infra::http::content_health",
                StatusCode::SERVICE_UNAVAILABLE,
                &err,
            )
            .attach(&mut response);
            response
        }
    }
}
