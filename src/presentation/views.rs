use crate::application::error::{ErrorReport, HttpError};
use askama::{Error as AskamaError, Template};
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("{public_message}")]
pub struct TemplateRenderError {
    pub(crate) source: &'static str,
    pub(crate) public_message: &'static str,
    #[source]
    pub(crate) error: AskamaError,
}

impl TemplateRenderError {
    pub fn new(source: &'static str, public_message: &'static str, error: AskamaError) -> Self {
        Self {
            source,
            public_message,
            error,
        }
    }
}

impl From<TemplateRenderError> for HttpError {
    fn from(err: TemplateRenderError) -> Self {
        let TemplateRenderError {
            source,
            public_message,
            error,
        } = err;

        HttpError::from_error(
            source,
            StatusCode::INTERNAL_SERVER_ERROR,
            public_message,
            &error,
        )
    }
}

pub fn render_template<T: Template>(template: T) -> Result<Html<String>, HttpError> {
    template.render().map(Html).map_err(|err| {
        TemplateRenderError::new(
            "presentation::views::render_template",
            "Template rendering failed",
            err,
        )
        .into()
    })
}

pub fn render_template_response<T: Template>(template: T, status: StatusCode) -> Response {
    match render_template(template) {
        Ok(html) => (status, html).into_response(),
        Err(err) => err.into_response(),
    }
}

/// Render a fragment for an SSE patch, tagging failures with `source`.
pub fn render_fragment<T: Template>(template: &T, source: &'static str) -> Result<String, HttpError> {
    template.render().map_err(|err| {
        TemplateRenderError::new(source, "Template rendering failed", err).into()
    })
}

pub fn render_not_found_response(chrome: LayoutChrome) -> Response {
    let content = ErrorPageView::not_found();
    let view = LayoutContext::new(chrome, content);
    let mut response = render_template_response(ErrorTemplate { view }, StatusCode::NOT_FOUND);
    ErrorReport::from_message(
        "presentation::views::render_not_found_response",
        StatusCode::NOT_FOUND,
        "Resource not found",
    )
    .attach(&mut response);
    response
}

#[derive(Clone)]
pub struct NavigationView {
    pub entries: Vec<NavigationLinkView>,
}

#[derive(Clone)]
pub struct NavigationLinkView {
    pub label: &'static str,
    pub href: &'static str,
    pub active: bool,
}

#[derive(Clone)]
pub struct FooterView {
    pub copy: String,
}

#[derive(Clone)]
pub struct BrandView {
    pub title: String,
    pub href: &'static str,
}

#[derive(Clone)]
pub struct PageMetaView {
    pub title: String,
    pub description: String,
}

/// Initial theme state for the document root.
#[derive(Clone)]
pub struct ThemeView {
    /// `Some` when the visitor stored an explicit choice.
    pub stored: Option<&'static str>,
}

impl ThemeView {
    pub fn root_class(&self) -> &'static str {
        match self.stored {
            Some("dark") => "theme-dark",
            Some(_) => "theme-light",
            None => "",
        }
    }

    /// Expression seeding the `dark` signal.
    pub fn signal_expr(&self) -> &'static str {
        match self.stored {
            Some("dark") => "true",
            Some(_) => "false",
            None => "window.matchMedia('(prefers-color-scheme: dark)').matches",
        }
    }
}

#[derive(Clone)]
pub struct LayoutChrome {
    pub brand: BrandView,
    pub navigation: NavigationView,
    pub footer: FooterView,
    pub meta: PageMetaView,
    pub theme: ThemeView,
}

#[derive(Clone)]
pub struct LayoutContext<T> {
    pub brand: BrandView,
    pub navigation: NavigationView,
    pub footer: FooterView,
    pub meta: PageMetaView,
    pub theme: ThemeView,
    /// `false` for pages written to disk, which have no `/ui` endpoints.
    pub live: bool,
    pub content: T,
}

impl<T> LayoutContext<T> {
    pub fn new(chrome: LayoutChrome, content: T) -> Self {
        Self {
            brand: chrome.brand,
            navigation: chrome.navigation,
            footer: chrome.footer,
            meta: chrome.meta,
            theme: chrome.theme,
            live: true,
            content,
        }
    }
}

#[derive(Clone)]
pub struct HeroView {
    pub headline: String,
    pub subline: Option<String>,
}

#[derive(Clone)]
pub struct SocialLinkView {
    pub name: String,
    pub href: String,
    pub icon: &'static str,
}

#[derive(Clone)]
pub struct SocialView {
    pub links: Vec<SocialLinkView>,
}

#[derive(Clone)]
pub struct IntroView {
    pub title: String,
    pub description_html: Option<String>,
}

#[derive(Clone)]
pub struct BadgeView {
    pub label: String,
    pub class: &'static str,
}

#[derive(Clone)]
pub struct ExperienceView {
    pub role: Option<String>,
    pub company: Option<String>,
    pub timeframe: Option<String>,
    pub badges: Vec<BadgeView>,
    pub achievements_html: Vec<String>,
}

#[derive(Clone)]
pub struct WorkView {
    pub title: String,
    pub experiences: Vec<ExperienceView>,
}

#[derive(Clone)]
pub struct InstitutionView {
    pub name: String,
    pub years: Option<String>,
    pub ongoing: bool,
    pub description_html: Option<String>,
}

impl InstitutionView {
    /// The badge is redundant when the years line already reads "Ongoing".
    pub fn shows_ongoing_badge(&self) -> bool {
        self.ongoing && self.years.as_deref() != Some("Ongoing")
    }
}

#[derive(Clone)]
pub struct EducationView {
    pub title: String,
    pub institutions: Vec<InstitutionView>,
}

#[derive(Clone)]
pub struct SkillView {
    pub title: String,
    pub description_html: Option<String>,
    pub icon: &'static str,
    pub tools: Vec<String>,
}

#[derive(Clone)]
pub struct SkillsView {
    pub title: String,
    pub items: Vec<SkillView>,
}

#[derive(Clone)]
pub struct ArticleCard {
    pub title: String,
    pub excerpt_html: Option<String>,
    pub href: String,
    pub date: Option<String>,
    pub lang: Option<&'static str>,
}

#[derive(Clone)]
pub struct ArticlesView {
    pub cards: Vec<ArticleCard>,
    pub empty_message: Option<&'static str>,
    pub show_all_link: bool,
}

#[derive(Clone)]
pub struct GalleryTileView {
    pub id: String,
    pub url: String,
    pub alt: String,
    pub caption: Option<String>,
    pub index: usize,
    pub total: usize,
}

#[derive(Clone)]
pub struct GalleryView {
    pub tiles: Vec<GalleryTileView>,
    pub page: &'static str,
    pub empty_message: Option<&'static str>,
    pub show_all_link: bool,
    /// Tiles open the lightbox; otherwise they are plain image links.
    pub live: bool,
}

#[derive(Clone)]
pub struct NewsletterView {
    pub title: String,
    pub description: Option<String>,
}

#[derive(Clone)]
pub struct ContactView {
    pub access_key: String,
    pub subject: String,
    pub from_name: String,
    pub action: String,
    /// Submit through datastar; otherwise a plain form post to `action`.
    pub live: bool,
}

/// All regions a page may host, in document order. Absent regions render nothing.
#[derive(Clone, Default)]
pub struct PageSectionsView {
    pub hero: Option<HeroView>,
    pub social: Option<SocialView>,
    pub intro: Option<IntroView>,
    pub work: Option<WorkView>,
    pub education: Option<EducationView>,
    pub skills: Option<SkillsView>,
    pub articles: Option<ArticlesView>,
    pub gallery: Option<GalleryView>,
    pub newsletter: Option<NewsletterView>,
    pub contact: Option<ContactView>,
}

impl PageSectionsView {
    /// Detach interactive regions from the server; the contact form posts
    /// straight to `contact_action`.
    pub fn detach(&mut self, contact_action: &str) {
        if let Some(gallery) = self.gallery.as_mut() {
            gallery.live = false;
        }
        if let Some(contact) = self.contact.as_mut() {
            contact.live = false;
            contact.action = contact_action.to_string();
        }
    }
}

#[derive(Template)]
#[template(path = "page.html")]
pub struct SitePageTemplate {
    pub view: LayoutContext<PageSectionsView>,
}

#[derive(Template)]
#[template(path = "partials/gallery_grid.html")]
pub struct GalleryGridTemplate<'a> {
    pub gallery: &'a GalleryView,
}

/// Open-state lightbox markup.
#[derive(Clone)]
pub struct LightboxView {
    pub url: String,
    pub alt: String,
    pub caption: Option<String>,
    pub position: usize,
    pub total: usize,
    pub show_controls: bool,
    pub prev_href: String,
    pub next_href: String,
    pub close_href: &'static str,
}

#[derive(Template)]
#[template(path = "partials/lightbox.html")]
pub struct LightboxTemplate {
    pub view: Option<LightboxView>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMessageKind {
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct FormMessageView {
    pub kind: FormMessageKind,
    pub message: String,
}

impl FormMessageView {
    pub fn is_success(&self) -> bool {
        self.kind == FormMessageKind::Success
    }
}

#[derive(Template)]
#[template(path = "partials/form_message.html")]
pub struct FormMessageTemplate {
    pub view: FormMessageView,
}

#[derive(Clone)]
pub struct CommandHint {
    pub label: &'static str,
    pub command: &'static str,
}

/// Shown in place of the page when the content document cannot be loaded.
#[derive(Clone)]
pub struct DiagnosticView {
    pub title: &'static str,
    pub message: String,
    pub detail: Option<String>,
    pub commands: Vec<CommandHint>,
    pub open_hint: Option<&'static str>,
}

#[derive(Template)]
#[template(path = "diagnostic.html")]
pub struct DiagnosticTemplate {
    pub view: LayoutContext<DiagnosticView>,
}

pub struct ErrorPageView {
    pub title: String,
    pub message: String,
    pub primary_action: Option<ErrorAction>,
}

impl ErrorPageView {
    pub fn not_found() -> Self {
        Self {
            title: "Page Not Found".to_string(),
            message: "The page you requested does not exist. Try returning to the homepage."
                .to_string(),
            primary_action: Some(ErrorAction::home()),
        }
    }
}

pub struct ErrorAction {
    pub href: String,
    pub label: String,
}

impl ErrorAction {
    pub fn home() -> Self {
        Self {
            href: "index.html".to_string(),
            label: "Back to home".to_string(),
        }
    }
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub view: LayoutContext<ErrorPageView>,
}
