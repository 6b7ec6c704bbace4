use std::{
    fs,
    path::Path,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

use folio::{
    application::{
        bootstrap::Bootstrap,
        contact::{
            ContactRelay, ContactService, ContactSubmission, INCOMPLETE_MESSAGE, RelayError,
            RelayResponse,
        },
        content::ContentStore,
        lightbox::LightboxService,
    },
    domain::gallery::TileId,
    infra::{
        assets::SiteAssets,
        content_source::FsContentSource,
        http::{HttpState, build_router},
    },
};

const DOCUMENT: &str = r#"{
    "home": {"headline": "Meera Iyer", "subline": "Producer"},
    "about": {"work": {"experiences": [{"role": "Editor", "company": "Daily"}]}},
    "articles": [
        {"title": "One", "link": "https://example.com/1"},
        {"title": "Two", "link": "https://example.com/2"},
        {"title": "Three", "link": "https://example.com/3"},
        {"title": "Four", "link": "https://example.com/4"}
    ],
    "gallery": ["a.jpg", "b.jpg", "c.jpg", "d.jpg", "e.jpg"],
    "contact": {"access_key": "key-123", "subject": "Hello", "from_name": "Site"}
}"#;

#[derive(Default)]
struct RecordingRelay {
    submissions: Mutex<Vec<ContactSubmission>>,
    reject: bool,
}

#[async_trait]
impl ContactRelay for RecordingRelay {
    async fn submit(&self, submission: &ContactSubmission) -> Result<RelayResponse, RelayError> {
        self.submissions
            .lock()
            .expect("relay lock")
            .push(submission.clone());
        Ok(RelayResponse {
            success: !self.reject,
            message: None,
        })
    }
}

struct TestSite {
    _dir: TempDir,
    router: Router,
    relay: Arc<RecordingRelay>,
}

fn site_with(document: Option<&str>, relay: RecordingRelay) -> TestSite {
    let dir = tempfile::tempdir().expect("tempdir");
    let data_dir = dir.path().join("assets/data");
    fs::create_dir_all(&data_dir).expect("data dir");
    if let Some(document) = document {
        fs::write(data_dir.join("data.json"), document).expect("write document");
    }
    fs::write(dir.path().join("secret.txt"), "outside assets").expect("write secret");

    let relay = Arc::new(relay);
    let router = build_router(state_for(dir.path(), relay.clone()));
    TestSite {
        _dir: dir,
        router,
        relay,
    }
}

fn state_for(root: &Path, relay: Arc<RecordingRelay>) -> HttpState {
    let source = FsContentSource::new(root.join("assets/data/data.json"));
    let store = Arc::new(ContentStore::new(Arc::new(source)));
    HttpState {
        bootstrap: Arc::new(Bootstrap::new(store.clone())),
        lightbox: Arc::new(LightboxService::new(store)),
        contact: Arc::new(ContactService::new(relay)),
        site_assets: SiteAssets::new(root),
    }
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, axum::http::HeaderMap, String) {
    let response = router
        .clone()
        .oneshot(request)
        .await
        .expect("router response");
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    (status, headers, String::from_utf8_lossy(&bytes).into_owned())
}

async fn get(router: &Router, uri: &str) -> (StatusCode, axum::http::HeaderMap, String) {
    let request = Request::get(uri).body(Body::empty()).expect("request");
    send(router, request).await
}

fn tile(name: &str) -> TileId {
    TileId::for_url(&format!("assets/images/gallery/{name}"))
}

#[tokio::test]
async fn every_page_renders() {
    let site = site_with(Some(DOCUMENT), RecordingRelay::default());
    for uri in [
        "/",
        "/index.html",
        "/about.html",
        "/articles.html",
        "/gallery.html",
        "/contact.html",
    ] {
        let (status, headers, body) = get(&site.router, uri).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
        let content_type = headers
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();
        assert!(content_type.starts_with("text/html"), "{uri}");
        assert!(body.contains("id=\"image-lightbox\""), "{uri}");
        assert!(body.contains("Meera Iyer"), "{uri}");
    }
}

#[tokio::test]
async fn home_hosts_landing_regions() {
    let site = site_with(Some(DOCUMENT), RecordingRelay::default());
    let (_, _, body) = get(&site.router, "/").await;

    for anchor in ["id=\"home\"", "id=\"gallery\"", "id=\"articles\"", "id=\"contact\""] {
        assert!(body.contains(anchor), "missing {anchor}");
    }
    assert!(!body.contains("id=\"work\""));
    assert!(body.contains("value=\"key-123\""));
}

#[tokio::test]
async fn landing_caps_gallery_and_listing_shows_all() {
    let site = site_with(Some(DOCUMENT), RecordingRelay::default());

    let (_, _, landing) = get(&site.router, "/").await;
    assert_eq!(landing.matches("data-image-url=").count(), 3);
    assert!(landing.contains("gallery.html"));

    let (_, _, listing) = get(&site.router, "/gallery.html").await;
    assert_eq!(listing.matches("data-image-url=").count(), 5);
    assert!(listing.contains("assets/images/gallery/e.jpg"));
}

#[tokio::test]
async fn lightbox_opens_on_clicked_tile() {
    let site = site_with(Some(DOCUMENT), RecordingRelay::default());
    let uri = format!(
        "/ui/lightbox/open/{}?page=listing&index=1&total=5",
        tile("b.jpg")
    );
    let (status, headers, body) = get(&site.router, &uri).await;

    assert_eq!(status, StatusCode::OK);
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    assert!(content_type.starts_with("text/event-stream"));
    assert!(body.contains("datastar-patch-elements"));
    assert!(body.contains("assets/images/gallery/b.jpg"));
    assert!(body.contains("2 / 5"));
    assert!(body.contains("lightboxOpen"));
}

#[tokio::test]
async fn lightbox_recovers_tiles_without_page_context() {
    let site = site_with(Some(DOCUMENT), RecordingRelay::default());
    let uri = format!("/ui/lightbox/open/{}", tile("d.jpg"));
    let (status, _, body) = get(&site.router, &uri).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("assets/images/gallery/d.jpg"));
    assert!(body.contains("4 / 5"));
}

#[tokio::test]
async fn lightbox_navigation_wraps_at_both_ends() {
    let site = site_with(Some(DOCUMENT), RecordingRelay::default());

    let (status, _, forward) = get(
        &site.router,
        "/ui/lightbox/navigate?page=listing&index=4&dir=1",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(forward.contains("assets/images/gallery/a.jpg"));
    assert!(forward.contains("1 / 5"));

    let (_, _, backward) = get(
        &site.router,
        "/ui/lightbox/navigate?page=listing&index=0&dir=-1",
    )
    .await;
    assert!(backward.contains("assets/images/gallery/e.jpg"));
    assert!(backward.contains("5 / 5"));
}

#[tokio::test]
async fn landing_navigation_stays_within_visible_tiles() {
    let site = site_with(Some(DOCUMENT), RecordingRelay::default());
    let (_, _, body) = get(
        &site.router,
        "/ui/lightbox/navigate?page=landing&index=2&dir=1",
    )
    .await;

    assert!(body.contains("assets/images/gallery/a.jpg"));
    assert!(body.contains("1 / 3"));
}

#[tokio::test]
async fn lightbox_close_restores_hidden_container() {
    let site = site_with(Some(DOCUMENT), RecordingRelay::default());
    let (status, _, body) = get(&site.router, "/ui/lightbox/close").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("hidden"));
    assert!(body.contains("\"lightboxOpen\":false"));
}

#[tokio::test]
async fn unknown_tile_is_not_found() {
    let site = site_with(Some(DOCUMENT), RecordingRelay::default());
    let (status, _, _) = get(&site.router, "/ui/lightbox/open/not-a-tile").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn theme_choice_is_stored_in_cookie() {
    let site = site_with(Some(DOCUMENT), RecordingRelay::default());
    let (status, headers, body) = get(&site.router, "/ui/theme/dark").await;

    assert_eq!(status, StatusCode::OK);
    let cookie = headers
        .get(header::SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .expect("set-cookie");
    assert!(cookie.starts_with("theme=dark"));
    assert!(body.contains("\"dark\":true"));

    let request = Request::get("/")
        .header(header::COOKIE, "theme=dark")
        .body(Body::empty())
        .expect("request");
    let (_, _, page) = send(&site.router, request).await;
    assert!(page.contains("class=\"theme-dark\""));

    let (status, _, _) = get(&site.router, "/ui/theme/sepia").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

fn contact_request(body: &str) -> Request<Body> {
    Request::post("/ui/contact")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .expect("request")
}

#[tokio::test]
async fn contact_submission_is_relayed() {
    let site = site_with(Some(DOCUMENT), RecordingRelay::default());
    let (status, _, body) = send(
        &site.router,
        contact_request(
            "access_key=key-123&subject=Hello&from_name=Site&name=Ada&email=ada%40example.com&message=Hi+there",
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("#form-message"));
    assert!(body.contains("Your message has been sent successfully."));
    assert!(body.contains("contact-form"));

    let submissions = site.relay.submissions.lock().expect("relay lock");
    assert_eq!(submissions.len(), 1);
    assert_eq!(submissions[0].email, "ada@example.com");
    assert_eq!(submissions[0].message, "Hi there");
    assert_eq!(submissions[0].access_key, "key-123");
}

#[tokio::test]
async fn rejected_contact_keeps_form() {
    let relay = RecordingRelay {
        reject: true,
        ..RecordingRelay::default()
    };
    let site = site_with(Some(DOCUMENT), relay);
    let (_, _, body) = send(
        &site.router,
        contact_request("name=Ada&email=ada%40example.com&message=Hi"),
    )
    .await;

    assert!(body.contains("form-message-error"));
    assert!(!body.contains("reset()"));
}

#[tokio::test]
async fn incomplete_contact_never_reaches_relay() {
    let site = site_with(Some(DOCUMENT), RecordingRelay::default());
    let (_, _, body) = send(&site.router, contact_request("name=Ada&email=&message=")).await;

    assert!(body.contains(INCOMPLETE_MESSAGE));
    assert!(site.relay.submissions.lock().expect("relay lock").is_empty());
}

#[tokio::test]
async fn missing_document_renders_diagnostic() {
    let site = site_with(None, RecordingRelay::default());

    let (status, _, body) = get(&site.router, "/").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body.contains("Error Loading Portfolio"));
    assert!(body.contains("Error details:"));
    assert!(body.contains("location.reload()"));

    let (status, _, _) = get(&site.router, "/_health").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn health_reports_loaded_content() {
    let site = site_with(Some(DOCUMENT), RecordingRelay::default());
    let (status, _, _) = get(&site.router, "/_health").await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn site_assets_are_served_without_traversal() {
    let site = site_with(Some(DOCUMENT), RecordingRelay::default());

    let (status, headers, body) = get(&site.router, "/assets/data/data.json").await;
    assert_eq!(status, StatusCode::OK);
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    assert!(content_type.starts_with("application/json"));
    assert!(body.contains("Meera Iyer"));

    let (status, _, _) = get(&site.router, "/assets/..%2Fsecret.txt").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn bundled_stylesheet_is_served() {
    let site = site_with(Some(DOCUMENT), RecordingRelay::default());
    let (status, _, body) = get(&site.router, "/static/site.css").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(".lightbox"));
}

#[tokio::test]
async fn unknown_path_renders_not_found_page() {
    let site = site_with(Some(DOCUMENT), RecordingRelay::default());
    let (status, _, body) = get(&site.router, "/does-not-exist").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("Page Not Found"));
    assert!(body.contains("index.html"));
}

#[tokio::test]
async fn broken_images_fall_back_per_tile() {
    let site = site_with(Some(DOCUMENT), RecordingRelay::default());
    let (_, _, body) = get(&site.router, "/gallery.html").await;

    let tiles: Vec<&str> = body
        .split("<a class=\"gallery-tile\"")
        .skip(1)
        .map(|tile| tile.split("</a>").next().unwrap_or_default())
        .collect();
    assert_eq!(tiles.len(), 5);
    for tile in tiles {
        assert!(tile.contains("/ui/lightbox/open/"));
        let img = tile
            .split("<img")
            .nth(1)
            .and_then(|rest| rest.split('>').next())
            .expect("tile image");
        assert!(img.contains("onerror="), "{img}");
        assert!(img.contains("static/images/image-unavailable.svg"), "{img}");
        assert!(img.contains("is-broken"), "{img}");
    }

    let (status, headers, svg) = get(&site.router, "/static/images/image-unavailable.svg").await;
    assert_eq!(status, StatusCode::OK);
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    assert!(content_type.starts_with("image/svg+xml"));
    assert!(svg.contains("<svg"));
}
