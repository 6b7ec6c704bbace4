use time::OffsetDateTime;

use crate::domain::{content::ContentDocument, page::PageKind, theme::Theme};
use crate::presentation::views::{
    BrandView, FooterView, LayoutChrome, NavigationLinkView, NavigationView, PageMetaView,
    ThemeView,
};

const DEFAULT_BRAND: &str = "Portfolio";

/// Assemble the layout chrome shared by every page.
///
/// `document` is absent when the content failed to load; the chrome then
/// falls back to generic labels.
pub fn build_chrome(
    document: Option<&ContentDocument>,
    active: PageKind,
    theme: Option<Theme>,
) -> LayoutChrome {
    let home = document.and_then(|document| document.home.as_ref());
    let brand = home
        .and_then(|home| home.headline.as_deref())
        .map(str::trim)
        .filter(|headline| !headline.is_empty())
        .unwrap_or(DEFAULT_BRAND)
        .to_string();
    let description = home
        .and_then(|home| home.subline.as_deref())
        .map(str::trim)
        .unwrap_or_default()
        .to_string();

    let entries = PageKind::ALL
        .iter()
        .map(|kind| NavigationLinkView {
            label: kind.title(),
            href: kind.file_name(),
            active: *kind == active,
        })
        .collect();

    let title = match active {
        PageKind::Home => brand.clone(),
        other => format!("{} | {brand}", other.title()),
    };

    LayoutChrome {
        footer: FooterView {
            copy: format!("© {} {brand}", OffsetDateTime::now_utc().year()),
        },
        brand: BrandView {
            title: brand,
            href: PageKind::Home.file_name(),
        },
        navigation: NavigationView { entries },
        meta: PageMetaView { title, description },
        theme: ThemeView {
            stored: theme.map(Theme::as_str),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brand_comes_from_headline() {
        let document =
            ContentDocument::from_slice(br#"{"home": {"headline": "Asha Verma", "subline": "Journalist"}}"#)
                .expect("valid json");
        let chrome = build_chrome(Some(&document), PageKind::Gallery, Some(Theme::Dark));
        assert_eq!(chrome.brand.title, "Asha Verma");
        assert_eq!(chrome.meta.title, "Gallery | Asha Verma");
        assert_eq!(chrome.meta.description, "Journalist");
        assert!(chrome.footer.copy.ends_with("Asha Verma"));
        assert_eq!(chrome.theme.root_class(), "theme-dark");

        let active: Vec<_> = chrome
            .navigation
            .entries
            .iter()
            .filter(|entry| entry.active)
            .map(|entry| entry.href)
            .collect();
        assert_eq!(active, vec!["gallery.html"]);
    }

    #[test]
    fn missing_document_uses_generic_brand() {
        let chrome = build_chrome(None, PageKind::Home, None);
        assert_eq!(chrome.brand.title, "Portfolio");
        assert_eq!(chrome.meta.title, "Portfolio");
        assert_eq!(chrome.navigation.entries.len(), PageKind::ALL.len());
        assert_eq!(chrome.theme.root_class(), "");
    }
}
