//! Static asset serving: the embedded stylesheet bundle and the site's own
//! `assets/` tree on disk.

use std::{
    borrow::Cow,
    io::ErrorKind,
    path::{Component, Path as FsPath, PathBuf},
};

use axum::{
    body::Body,
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use include_dir::{Dir, include_dir};
use mime_guess::{Mime, MimeGuess};
use tracing::error;

use crate::application::error::ErrorReport;

static STATIC_PUBLIC_ASSETS: Dir<'_> = include_dir!("$OUT_DIR/static_public");

const EMBEDDED_CACHE_CONTROL: &str = "public, max-age=31536000, immutable";
const SITE_CACHE_CONTROL: &str = "public, max-age=300";

/// The bundle served under `/static`.
pub fn public_bundle() -> &'static Dir<'static> {
    &STATIC_PUBLIC_ASSETS
}

/// Serve embedded public static assets.
pub async fn serve_public(path: Option<Path<String>>) -> Response {
    const SOURCE: &str = "infra::assets::serve_public";

    let captured = path.map(|Path(value)| value);
    let Some(candidate) = sanitize(captured.as_deref()) else {
        return not_found_response(SOURCE);
    };
    match STATIC_PUBLIC_ASSETS.get_file(&candidate) {
        Some(file) => Asset {
            contents: Cow::Borrowed(file.contents()),
            mime: mime_guess::from_path(&candidate),
            cache_control: EMBEDDED_CACHE_CONTROL,
        }
        .into_response(),
        None => not_found_response(SOURCE),
    }
}

/// Files under the site root's `assets/` directory: content document and images.
#[derive(Debug, Clone)]
pub struct SiteAssets {
    root: PathBuf,
}

impl SiteAssets {
    pub fn new(site_root: impl Into<PathBuf>) -> Self {
        Self {
            root: site_root.into().join("assets"),
        }
    }

    /// Map a request path onto the asset directory, rejecting anything that
    /// could leave it.
    pub fn resolve(&self, requested: &str) -> Option<PathBuf> {
        let candidate = sanitize(Some(requested))?;
        let relative = FsPath::new(&candidate);
        if relative
            .components()
            .any(|component| !matches!(component, Component::Normal(_)))
        {
            return None;
        }
        Some(self.root.join(relative))
    }

    pub async fn read(&self, requested: &str) -> Result<Option<(Vec<u8>, MimeGuess)>, std::io::Error> {
        let Some(path) = self.resolve(requested) else {
            return Ok(None);
        };
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some((bytes, mime_guess::from_path(&path)))),
            Err(err) if matches!(err.kind(), ErrorKind::NotFound | ErrorKind::IsADirectory) => {
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }
}

/// Serve a file from the site's asset directory.
pub async fn serve_site_asset(State(assets): State<SiteAssets>, Path(path): Path<String>) -> Response {
    const SOURCE: &str = "infra::assets::serve_site_asset";

    match assets.read(&path).await {
        Ok(Some((bytes, mime))) => Asset {
            contents: Cow::Owned(bytes),
            mime,
            cache_control: SITE_CACHE_CONTROL,
        }
        .into_response(),
        Ok(None) => not_found_response(SOURCE),
        Err(err) => {
            error!(
                target = "folio::assets",
                path = %path,
                error = %err,
                "failed to read site asset"
            );
            let mut response = StatusCode::INTERNAL_SERVER_ERROR.into_response();
            ErrorReport::from_error(SOURCE, StatusCode::INTERNAL_SERVER_ERROR, &err)
                .attach(&mut response);
            response
        }
    }
}

fn sanitize(path: Option<&str>) -> Option<String> {
    let candidate = path.unwrap_or_default().trim_start_matches('/');
    if candidate.is_empty()
        || candidate.ends_with('/')
        || candidate.contains("..")
        || candidate.contains('\\')
    {
        // Directory listings and traversal are never served.
        return None;
    }
    Some(candidate.to_string())
}

fn not_found_response(source: &'static str) -> Response {
    let mut response = StatusCode::NOT_FOUND.into_response();
    ErrorReport::from_message(source, StatusCode::NOT_FOUND, "Static asset not found")
        .attach(&mut response);
    response
}

struct Asset<'a> {
    contents: Cow<'a, [u8]>,
    mime: MimeGuess,
    cache_control: &'static str,
}

impl IntoResponse for Asset<'static> {
    fn into_response(self) -> Response {
        let mime = self.mime.first_or_octet_stream();
        let bytes = match self.contents {
            Cow::Borrowed(slice) => Bytes::from_static(slice),
            Cow::Owned(bytes) => Bytes::from(bytes),
        };
        build_response(bytes, mime, self.cache_control)
    }
}

fn build_response(bytes: Bytes, mime: Mime, cache_control: &'static str) -> Response {
    let len = bytes.len();
    let mut response = Response::new(Body::from(bytes));
    *response.status_mut() = StatusCode::OK;

    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(mime.as_ref()) {
        headers.insert(header::CONTENT_TYPE, value);
    }
    if let Ok(value) = HeaderValue::from_str(&len.to_string()) {
        headers.insert(header::CONTENT_LENGTH, value);
    }
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static(cache_control));

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn traversal_is_rejected() {
        let assets = SiteAssets::new("/srv/site");
        assert!(assets.resolve("../secret").is_none());
        assert!(assets.resolve("images/../../etc/passwd").is_none());
        assert!(assets.resolve("images\\..\\x").is_none());
        assert!(assets.resolve("").is_none());
        assert!(assets.resolve("images/").is_none());
        assert_eq!(
            assets.resolve("/images/gallery/a.jpg"),
            Some(PathBuf::from("/srv/site/assets/images/gallery/a.jpg"))
        );
    }

    #[tokio::test]
    async fn missing_file_is_none() {
        let root = tempfile::tempdir().expect("root");
        let assets = SiteAssets::new(root.path());
        assert!(assets.read("data/data.json").await.expect("io ok").is_none());
    }

    #[test]
    fn bundle_contains_stylesheet() {
        assert!(public_bundle().get_file("site.css").is_some());
    }
}
