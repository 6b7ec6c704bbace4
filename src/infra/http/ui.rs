//! Datastar endpoints behind the lightbox, theme toggle and contact form.

use axum::{
    Form,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{
    CookieJar,
    cookie::{Cookie, SameSite},
};
use serde::Deserialize;
use serde_json::json;

use crate::{
    application::{
        contact::ContactSubmission,
        error::HttpError,
        lightbox::{LightboxUpdate, OpenRequest},
        stream::StreamBuilder,
    },
    domain::{
        gallery::TileId,
        page::PageContext,
        theme::{THEME_COOKIE, Theme},
    },
};

use super::HttpState;

const THEME_COOKIE_MAX_AGE_DAYS: i64 = 365;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct OpenQuery {
    page: Option<PageContext>,
    index: Option<usize>,
    total: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub(super) struct NavigateQuery {
    #[serde(default = "listing")]
    page: PageContext,
    index: usize,
    dir: i64,
}

fn listing() -> PageContext {
    PageContext::Listing
}

pub(super) async fn lightbox_open(
    State(state): State<HttpState>,
    Path(tile): Path<String>,
    Query(query): Query<OpenQuery>,
) -> Result<Response, HttpError> {
    let Some(tile) = TileId::parse(&tile) else {
        return Err(HttpError::new(
            "infra::http::ui::lightbox_open",
            StatusCode::NOT_FOUND,
            "Unknown gallery tile",
            format!("`{tile}` is not a tile id"),
        ));
    };

    let update = state
        .lightbox
        .open(OpenRequest {
            tile,
            page: query.page,
            index: query.index,
            total: query.total,
        })
        .await?;
    Ok(stream_or_empty(update))
}

pub(super) async fn lightbox_navigate(
    State(state): State<HttpState>,
    Query(query): Query<NavigateQuery>,
) -> Result<Response, HttpError> {
    let update = state
        .lightbox
        .navigate(query.page, query.index, query.dir)
        .await?;
    Ok(stream_or_empty(update))
}

pub(super) async fn lightbox_close(State(state): State<HttpState>) -> Result<Response, HttpError> {
    Ok(state.lightbox.close()?.into_stream().into_response())
}

/// Persist the visitor's choice and flip the `dark` signal.
pub(super) async fn set_theme(jar: CookieJar, Path(theme): Path<String>) -> Result<Response, HttpError> {
    let Some(theme) = Theme::parse(&theme) else {
        return Err(HttpError::new(
            "infra::http::ui::set_theme",
            StatusCode::NOT_FOUND,
            "Unknown theme",
            format!("`{theme}` is not a theme"),
        ));
    };

    let cookie = Cookie::build((THEME_COOKIE, theme.as_str()))
        .path("/")
        .same_site(SameSite::Lax)
        .max_age(time::Duration::days(THEME_COOKIE_MAX_AGE_DAYS));
    let jar = jar.add(cookie);

    let mut stream = StreamBuilder::new();
    stream.push_signals(&json!({ "dark": theme.is_dark() }).to_string());
    Ok((jar, stream.into_response()).into_response())
}

pub(super) async fn contact_submit(
    State(state): State<HttpState>,
    Form(submission): Form<ContactSubmission>,
) -> Result<Response, HttpError> {
    let outcome = state.contact.submit(submission).await;
    Ok(outcome.into_stream()?.into_response())
}

fn stream_or_empty(update: Option<LightboxUpdate>) -> Response {
    match update {
        Some(update) => update.into_stream().into_response(),
        None => StreamBuilder::new().into_response(),
    }
}
