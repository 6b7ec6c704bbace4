//! Page kinds, the sections each one hosts, and the landing/listing policy.

use serde::{Deserialize, Serialize};

/// Number of gallery tiles and article cards shown on a landing page.
pub const LANDING_LIMIT: usize = 3;

/// Whether a page is the site's entry point or a dedicated listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PageContext {
    #[default]
    Landing,
    Listing,
}

impl PageContext {
    /// Classify a request path. Root, empty, directory-style and `index.html`
    /// paths are landing pages; anything else is a listing.
    pub fn from_path(path: &str) -> Self {
        if path.is_empty() || path == "/" || path.ends_with('/') || path.ends_with("index.html") {
            PageContext::Landing
        } else {
            PageContext::Listing
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PageContext::Landing => "landing",
            PageContext::Listing => "listing",
        }
    }

    /// Apply the landing cap to an already ordered list.
    pub fn limit<T>(self, mut items: Vec<T>) -> Vec<T> {
        if self == PageContext::Landing {
            items.truncate(LANDING_LIMIT);
        }
        items
    }
}

/// Regions a page can host. Each maps to one section renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Hero,
    Social,
    Intro,
    Work,
    Education,
    Skills,
    Articles,
    Gallery,
    Newsletter,
    Contact,
}

impl Section {
    /// Element id of the region, usable as a URL fragment.
    pub fn anchor(self) -> &'static str {
        match self {
            Section::Hero => "home",
            Section::Social => "social-links",
            Section::Intro => "about",
            Section::Work => "work",
            Section::Education => "education",
            Section::Skills => "skills",
            Section::Articles => "articles",
            Section::Gallery => "gallery",
            Section::Newsletter => "newsletter",
            Section::Contact => "contact",
        }
    }
}

/// The site's pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageKind {
    Home,
    About,
    Articles,
    Gallery,
    Contact,
}

impl PageKind {
    pub const ALL: [PageKind; 5] = [
        PageKind::Home,
        PageKind::About,
        PageKind::Articles,
        PageKind::Gallery,
        PageKind::Contact,
    ];

    pub fn sections(self) -> &'static [Section] {
        match self {
            PageKind::Home => &[
                Section::Hero,
                Section::Social,
                Section::Articles,
                Section::Gallery,
                Section::Newsletter,
                Section::Contact,
            ],
            PageKind::About => &[
                Section::Intro,
                Section::Work,
                Section::Education,
                Section::Skills,
            ],
            PageKind::Articles => &[Section::Articles],
            PageKind::Gallery => &[Section::Gallery],
            PageKind::Contact => &[Section::Contact],
        }
    }

    pub fn hosts(self, section: Section) -> bool {
        self.sections().contains(&section)
    }

    /// Canonical route of the page.
    pub fn route(self) -> &'static str {
        match self {
            PageKind::Home => "/",
            PageKind::About => "/about",
            PageKind::Articles => "/articles",
            PageKind::Gallery => "/gallery",
            PageKind::Contact => "/contact",
        }
    }

    /// File name used by the static export.
    pub fn file_name(self) -> &'static str {
        match self {
            PageKind::Home => "index.html",
            PageKind::About => "about.html",
            PageKind::Articles => "articles.html",
            PageKind::Gallery => "gallery.html",
            PageKind::Contact => "contact.html",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            PageKind::Home => "Home",
            PageKind::About => "About",
            PageKind::Articles => "Articles",
            PageKind::Gallery => "Gallery",
            PageKind::Contact => "Contact",
        }
    }
}
