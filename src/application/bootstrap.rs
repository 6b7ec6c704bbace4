//! Page bootstrap: load content, run the renderers a page hosts, and report
//! which regions were produced.

use std::{collections::BTreeSet, sync::Arc};

use tracing::{debug, warn};
use url::Url;

use crate::{
    application::{
        chrome::build_chrome,
        content::{ContentError, ContentStore},
        context::RenderContext,
        sections,
    },
    domain::{
        page::{PageContext, PageKind, Section},
        theme::Theme,
    },
    presentation::views::{CommandHint, DiagnosticView, LayoutContext, PageSectionsView},
};

const DIAGNOSTIC_TITLE: &str = "Error Loading Portfolio";
const FILE_SCHEME_MESSAGE: &str = "This page must be served via HTTP/HTTPS. Browsers block local file access for security reasons. To fix this, run a local server:";
const FILE_SCHEME_HINT: &str = "Then open http://localhost:8000 in your browser.";
const LOAD_FAILURE_MESSAGE: &str = "Please check that assets/data/data.json exists and is valid.";

const LOCAL_SERVER_COMMANDS: [CommandHint; 5] = [
    CommandHint {
        label: "This site's own server",
        command: "folio serve",
    },
    CommandHint {
        label: "Python 3",
        command: "python -m http.server 8000",
    },
    CommandHint {
        label: "Python 2",
        command: "python -m SimpleHTTPServer 8000",
    },
    CommandHint {
        label: "Node.js",
        command: "npx http-server -p 8000",
    },
    CommandHint {
        label: "PHP",
        command: "php -S localhost:8000",
    },
];

/// Anchors of the regions a render actually produced.
///
/// Stands in for "rendering is complete": fragment navigation resolves
/// against this set instead of waiting for elements to appear.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderOutcome {
    anchors: BTreeSet<&'static str>,
}

impl RenderOutcome {
    fn record(&mut self, section: Section) {
        self.anchors.insert(section.anchor());
    }

    pub fn anchors(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.anchors.iter().copied()
    }

    pub fn contains(&self, section: Section) -> bool {
        self.anchors.contains(section.anchor())
    }

    /// Resolve `#anchor` (or a bare anchor) to a rendered region.
    pub fn resolve_fragment(&self, fragment: &str) -> Option<&'static str> {
        let wanted = fragment.strip_prefix('#').unwrap_or(fragment);
        if wanted.is_empty() {
            return None;
        }
        self.anchors.get(wanted).copied()
    }
}

pub struct RenderedPage {
    pub view: LayoutContext<PageSectionsView>,
    pub outcome: RenderOutcome,
}

pub enum PageRender {
    Page(Box<RenderedPage>),
    Diagnostic(Box<LayoutContext<DiagnosticView>>),
}

#[derive(Clone)]
pub struct Bootstrap {
    store: Arc<ContentStore>,
}

impl Bootstrap {
    pub fn new(store: Arc<ContentStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<ContentStore> {
        &self.store
    }

    /// Render `kind` as requested at `path`.
    ///
    /// `page_url` is the address the visitor used, when known; it only shapes
    /// the diagnostic shown when the content cannot be loaded.
    pub async fn render_page(
        &self,
        kind: PageKind,
        path: &str,
        page_url: Option<&Url>,
        theme: Option<Theme>,
    ) -> PageRender {
        let document = match self.store.load().await {
            Ok(document) => document,
            Err(err) => {
                warn!(
                    target = "folio::bootstrap",
                    page = kind.title(),
                    error = %err,
                    "rendering diagnostic instead of page"
                );
                let chrome = build_chrome(None, kind, theme);
                let view = diagnostic_view(page_url, &err);
                return PageRender::Diagnostic(Box::new(LayoutContext::new(chrome, view)));
            }
        };

        let chrome = build_chrome(Some(&document), kind, theme);
        let mut ctx = RenderContext::new(document, PageContext::from_path(path));
        let (sections, outcome) = render_sections(&mut ctx, kind);

        debug!(
            target = "folio::bootstrap",
            page = kind.title(),
            context = ctx.page().as_str(),
            anchors = ?outcome.anchors,
            "page rendered"
        );

        PageRender::Page(Box::new(RenderedPage {
            view: LayoutContext::new(chrome, sections),
            outcome,
        }))
    }
}

/// Run every renderer `kind` hosts, in document order.
pub fn render_sections(ctx: &mut RenderContext, kind: PageKind) -> (PageSectionsView, RenderOutcome) {
    let mut view = PageSectionsView::default();
    let mut outcome = RenderOutcome::default();

    for section in kind.sections() {
        let rendered = match section {
            Section::Hero => {
                view.hero = sections::render_hero(ctx);
                view.hero.is_some()
            }
            Section::Social => {
                view.social = sections::render_social(ctx);
                view.social.is_some()
            }
            Section::Intro => {
                view.intro = sections::render_intro(ctx);
                view.intro.is_some()
            }
            Section::Work => {
                view.work = sections::render_work(ctx);
                view.work.is_some()
            }
            Section::Education => {
                view.education = sections::render_education(ctx);
                view.education.is_some()
            }
            Section::Skills => {
                view.skills = sections::render_skills(ctx);
                view.skills.is_some()
            }
            Section::Articles => {
                view.articles = sections::render_articles(ctx);
                view.articles.is_some()
            }
            Section::Gallery => {
                view.gallery = sections::render_gallery(ctx);
                view.gallery.is_some()
            }
            Section::Newsletter => {
                view.newsletter = sections::render_newsletter(ctx);
                view.newsletter.is_some()
            }
            Section::Contact => {
                view.contact = Some(sections::render_contact(ctx));
                true
            }
        };
        if rendered {
            outcome.record(*section);
        }
    }

    (view, outcome)
}

/// Diagnostic content for a failed load.
///
/// An unknown `page_url` is treated like any served page.
pub fn diagnostic_view(page_url: Option<&Url>, err: &ContentError) -> DiagnosticView {
    if page_url.is_some_and(|url| url.scheme() == "file") {
        return DiagnosticView {
            title: DIAGNOSTIC_TITLE,
            message: FILE_SCHEME_MESSAGE.to_string(),
            detail: None,
            commands: LOCAL_SERVER_COMMANDS.to_vec(),
            open_hint: Some(FILE_SCHEME_HINT),
        };
    }

    DiagnosticView {
        title: DIAGNOSTIC_TITLE,
        message: LOAD_FAILURE_MESSAGE.to_string(),
        detail: Some(format!("Error details: {err}")),
        commands: Vec::new(),
        open_hint: None,
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::{
        application::content::ContentSource,
        domain::content::ContentDocument,
    };

    struct Missing;

    #[async_trait]
    impl ContentSource for Missing {
        fn location(&self) -> String {
            "site/assets/data/data.json".to_string()
        }

        async fn fetch(&self) -> Result<Vec<u8>, ContentError> {
            Err(ContentError::Status {
                location: self.location(),
                status: 404,
            })
        }
    }

    fn bootstrap(json: &str) -> Bootstrap {
        let document = ContentDocument::from_slice(json.as_bytes()).expect("valid json");
        Bootstrap::new(Arc::new(ContentStore::from_document(document)))
    }

    fn http_url(path: &str) -> Url {
        Url::parse("http://localhost:3000")
            .and_then(|base| base.join(path))
            .expect("valid url")
    }

    #[tokio::test]
    async fn home_renders_hosted_regions_only() {
        let bootstrap = bootstrap(
            r#"{"home": {"headline": "Hi"}, "gallery": ["a.jpg"], "about": {"work": {"experiences": []}}}"#,
        );
        let PageRender::Page(page) = bootstrap
            .render_page(PageKind::Home, "/", Some(&http_url("/")), None)
            .await
        else {
            panic!("expected page");
        };

        assert!(page.view.content.hero.is_some());
        assert!(page.view.content.work.is_none());
        assert!(page.outcome.contains(Section::Gallery));
        assert!(page.outcome.contains(Section::Contact));
        assert!(!page.outcome.contains(Section::Articles));
        assert_eq!(page.view.brand.title, "Hi");
    }

    #[tokio::test]
    async fn fragment_resolves_only_for_rendered_regions() {
        let bootstrap = bootstrap(r#"{"about": {"work": {"experiences": []}}}"#);
        let PageRender::Page(page) = bootstrap
            .render_page(PageKind::About, "/about.html", None, None)
            .await
        else {
            panic!("expected page");
        };

        assert_eq!(page.outcome.resolve_fragment("#work"), Some("work"));
        assert_eq!(page.outcome.resolve_fragment("work"), Some("work"));
        assert_eq!(page.outcome.resolve_fragment("#skills"), None);
        assert_eq!(page.outcome.resolve_fragment("#"), None);
    }

    #[tokio::test]
    async fn load_failure_yields_diagnostic_with_details() {
        let bootstrap = Bootstrap::new(Arc::new(ContentStore::new(Arc::new(Missing))));
        let PageRender::Diagnostic(view) = bootstrap
            .render_page(PageKind::Home, "/", Some(&http_url("/")), Some(Theme::Light))
            .await
        else {
            panic!("expected diagnostic");
        };

        assert_eq!(view.content.title, "Error Loading Portfolio");
        assert!(view.content.commands.is_empty());
        let detail = view.content.detail.as_deref().expect("detail");
        assert!(detail.starts_with("Error details:"));
        assert!(detail.contains("404"));
        assert_eq!(view.brand.title, "Portfolio");
    }

    #[test]
    fn file_scheme_diagnostic_lists_local_servers() {
        let url = Url::parse("file:///home/me/site/index.html").expect("file url");
        let err = ContentError::Transport {
            location: "assets/data/data.json".to_string(),
            message: "blocked".to_string(),
        };
        let view = diagnostic_view(Some(&url), &err);
        assert!(view.message.contains("HTTP/HTTPS"));
        assert!(view.detail.is_none());
        assert!(
            view.commands
                .iter()
                .any(|hint| hint.command == "python -m http.server 8000")
        );
        assert_eq!(view.open_hint, Some(FILE_SCHEME_HINT));
    }

    #[tokio::test]
    async fn landing_path_caps_gallery() {
        let bootstrap = bootstrap(r#"{"gallery": ["a.jpg", "b.jpg", "c.jpg", "d.jpg", "e.jpg"]}"#);
        let PageRender::Page(landing) = bootstrap
            .render_page(PageKind::Gallery, "/index.html", None, None)
            .await
        else {
            panic!("expected page");
        };
        let PageRender::Page(listing) = bootstrap
            .render_page(PageKind::Gallery, "/gallery.html", None, None)
            .await
        else {
            panic!("expected page");
        };

        let count = |page: &RenderedPage| {
            page.view
                .content
                .gallery
                .as_ref()
                .map(|gallery| gallery.tiles.len())
        };
        assert_eq!(count(&landing), Some(3));
        assert_eq!(count(&listing), Some(5));
    }
}
