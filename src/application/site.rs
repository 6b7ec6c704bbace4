//! Static export of the rendered site.

use std::{
    fs,
    path::{Path, PathBuf},
};

use askama::Template;
use include_dir::Dir;
use tracing::info;
use url::Url;

use crate::{
    application::{
        bootstrap::{Bootstrap, PageRender},
        error::AppError,
    },
    domain::page::PageKind,
    infra::error::InfraError,
    presentation::views::SitePageTemplate,
};

/// Directory under the site root that is copied verbatim.
pub const SITE_ASSET_DIR: &str = "assets";
/// Directory the embedded stylesheet bundle is written to.
pub const STATIC_OUTPUT_DIR: &str = "static";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportSummary {
    pub pages: usize,
    pub static_files: usize,
    pub site_files: usize,
}

/// Render every page into `out_dir` next to the assets they reference.
///
/// Exported pages have no server behind them: tiles link to their images,
/// the theme toggle is client-only and the contact form posts to
/// `contact_endpoint` directly.
pub async fn export_site(
    bootstrap: &Bootstrap,
    bundle: &Dir<'_>,
    site_root: &Path,
    out_dir: &Path,
    contact_endpoint: &Url,
) -> Result<ExportSummary, AppError> {
    // Fail before touching the output directory when content is broken.
    bootstrap.store().load().await?;

    fs::create_dir_all(out_dir).map_err(InfraError::Io)?;
    let out_dir = std::path::absolute(out_dir).map_err(InfraError::Io)?;

    let mut summary = ExportSummary::default();
    for kind in PageKind::ALL {
        let target = out_dir.join(kind.file_name());
        let page_url = Url::from_file_path(&target).map_err(|()| {
            AppError::unexpected(format!("`{}` is not a valid file path", target.display()))
        })?;

        let path = format!("/{}", kind.file_name());
        let mut page = match bootstrap.render_page(kind, &path, Some(&page_url), None).await {
            PageRender::Page(page) => page,
            PageRender::Diagnostic(view) => {
                return Err(AppError::unexpected(format!(
                    "content became unavailable while exporting: {}",
                    view.content.message
                )));
            }
        };

        page.view.live = false;
        page.view.content.detach(contact_endpoint.as_str());

        let html = SitePageTemplate { view: page.view }
            .render()
            .map_err(|err| AppError::unexpected(format!("failed to render {path}: {err}")))?;
        fs::write(&target, html).map_err(InfraError::Io)?;
        summary.pages += 1;
    }

    let static_dir = out_dir.join(STATIC_OUTPUT_DIR);
    fs::create_dir_all(&static_dir).map_err(InfraError::Io)?;
    bundle.extract(&static_dir).map_err(InfraError::Io)?;
    summary.static_files = count_files(bundle);

    let assets = site_root.join(SITE_ASSET_DIR);
    if assets.is_dir() {
        summary.site_files = copy_tree(&assets, &out_dir.join(SITE_ASSET_DIR))?;
    }

    info!(
        target = "folio::site",
        out_dir = %out_dir.display(),
        pages = summary.pages,
        static_files = summary.static_files,
        site_files = summary.site_files,
        "site exported"
    );

    Ok(summary)
}

fn count_files(dir: &Dir<'_>) -> usize {
    dir.files().count() + dir.dirs().map(count_files).sum::<usize>()
}

fn copy_tree(source: &Path, destination: &Path) -> Result<usize, AppError> {
    let mut copied = 0;
    let mut pending: Vec<PathBuf> = vec![source.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let relative = dir.strip_prefix(source).unwrap_or(Path::new(""));
        fs::create_dir_all(destination.join(relative)).map_err(InfraError::Io)?;

        for entry in fs::read_dir(&dir).map_err(InfraError::Io)? {
            let entry = entry.map_err(InfraError::Io)?;
            let path = entry.path();
            let file_type = entry.file_type().map_err(InfraError::Io)?;
            if file_type.is_dir() {
                pending.push(path);
            } else if file_type.is_file() {
                let relative = path.strip_prefix(source).unwrap_or(&path);
                fs::copy(&path, destination.join(relative)).map_err(InfraError::Io)?;
                copied += 1;
            }
        }
    }

    Ok(copied)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        application::content::ContentStore, domain::content::ContentDocument,
        infra::assets::public_bundle,
    };

    #[tokio::test]
    async fn export_writes_every_page_and_copies_assets() {
        let site = tempfile::tempdir().expect("site dir");
        let gallery = site.path().join("assets/images/gallery");
        fs::create_dir_all(&gallery).expect("gallery dir");
        fs::write(gallery.join("a.jpg"), b"jpeg").expect("image");

        let out = tempfile::tempdir().expect("out dir");
        let document = ContentDocument::from_slice(
            br#"{"home": {"headline": "Meera"}, "gallery": ["a.jpg"]}"#,
        )
        .expect("valid json");
        let bootstrap = Bootstrap::new(Arc::new(ContentStore::from_document(document)));

        let relay = Url::parse("https://relay.example.com/submit").expect("relay url");
        let summary = export_site(&bootstrap, public_bundle(), site.path(), out.path(), &relay)
            .await
            .expect("exported");

        assert_eq!(summary.pages, PageKind::ALL.len());
        assert_eq!(summary.site_files, 1);
        assert!(out.path().join("assets/images/gallery/a.jpg").is_file());
        assert!(out.path().join("static/site.css").is_file());

        let gallery_page =
            fs::read_to_string(out.path().join("gallery.html")).expect("gallery page");
        assert!(gallery_page.contains("assets/images/gallery/a.jpg"));
        assert!(gallery_page.contains("Meera"));
        assert!(gallery_page.contains("class=\"gallery-tile\" href=\"assets/images/gallery/a.jpg\""));
        assert!(!gallery_page.contains("/ui/lightbox"));
        assert!(!gallery_page.contains("/ui/theme"));

        let contact_page =
            fs::read_to_string(out.path().join("contact.html")).expect("contact page");
        assert!(contact_page.contains("action=\"https://relay.example.com/submit\""));
        assert!(!contact_page.contains("/ui/contact"));
    }

    #[test]
    fn copy_tree_preserves_nesting() {
        let source = tempfile::tempdir().expect("source");
        fs::create_dir_all(source.path().join("data/nested")).expect("dirs");
        fs::write(source.path().join("data/nested/x.txt"), "x").expect("file");
        fs::write(source.path().join("top.txt"), "t").expect("file");

        let target = tempfile::tempdir().expect("target");
        let copied = copy_tree(source.path(), target.path()).expect("copied");
        assert_eq!(copied, 2);
        assert!(target.path().join("data/nested/x.txt").is_file());
    }
}
