//! Per-render context shared by the section renderers and the lightbox.

use std::{cell::RefCell, rc::Rc, sync::Arc};

use lol_html::{RewriteStrSettings, element, rewrite_str};
use tracing::warn;

use crate::domain::{
    content::ContentDocument,
    gallery::{GalleryList, ImageDescriptor},
    lightbox::GallerySource,
    page::PageContext,
};

/// Everything one render needs: the document, the page context, and what the
/// gallery renderer produced.
pub struct RenderContext {
    document: Arc<ContentDocument>,
    page: PageContext,
    gallery: Option<GalleryList>,
    tile_markup: Option<String>,
}

impl RenderContext {
    pub fn new(document: Arc<ContentDocument>, page: PageContext) -> Self {
        Self {
            document,
            page,
            gallery: None,
            tile_markup: None,
        }
    }

    pub fn document(&self) -> &ContentDocument {
        &self.document
    }

    pub fn page(&self) -> PageContext {
        self.page
    }

    /// Record the list the gallery renderer displayed.
    pub fn store_gallery(&mut self, list: GalleryList) {
        self.gallery = Some(list);
    }

    /// Attach already rendered gallery tiles, used when no stored list exists.
    pub fn attach_tile_markup(&mut self, markup: String) {
        self.tile_markup = Some(markup);
    }
}

impl GallerySource for RenderContext {
    fn stored_images(&self) -> Option<&GalleryList> {
        self.gallery.as_ref()
    }

    fn rendered_tiles(&self) -> GalleryList {
        match self.tile_markup.as_deref() {
            Some(markup) => scan_tiles(markup),
            None => GalleryList::default(),
        }
    }
}

/// Rebuild a gallery list from tile markup carrying `data-image-url` and
/// `data-image-alt`, in document order.
pub fn scan_tiles(markup: &str) -> GalleryList {
    let found = Rc::new(RefCell::new(Vec::new()));

    let result = rewrite_str(
        markup,
        RewriteStrSettings {
            element_content_handlers: vec![element!("img[data-image-url]", {
                let found = Rc::clone(&found);
                move |el| {
                    if let Some(url) = el.get_attribute("data-image-url") {
                        let url = decode_entities(&url);
                        if !url.trim().is_empty() {
                            let alt = el
                                .get_attribute("data-image-alt")
                                .map(|alt| decode_entities(&alt))
                                .unwrap_or_default();
                            let caption = el
                                .get_attribute("data-image-caption")
                                .map(|caption| decode_entities(&caption))
                                .filter(|caption| !caption.is_empty());
                            found
                                .borrow_mut()
                                .push(ImageDescriptor::new(url, alt, caption));
                        }
                    }
                    Ok(())
                }
            })],
            ..RewriteStrSettings::new()
        },
    );

    if let Err(err) = result {
        warn!(
            target = "folio::gallery",
            error = %err,
            "failed to scan rendered gallery tiles"
        );
        return GalleryList::default();
    }

    let images = found.take();
    GalleryList::new(images)
}

/// Undo attribute escaping in one left-to-right pass; decoded text is never
/// rescanned, so `&#38;amp;` yields `&amp;`.
fn decode_entities(value: &str) -> String {
    if !value.contains('&') {
        return value.to_string();
    }

    let mut decoded = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(start) = rest.find('&') {
        decoded.push_str(&rest[..start]);
        let candidate = &rest[start..];
        match candidate.find(';').and_then(|end| {
            entity_char(&candidate[1..end]).map(|ch| (ch, end))
        }) {
            Some((ch, end)) => {
                decoded.push(ch);
                rest = &candidate[end + 1..];
            }
            None => {
                decoded.push('&');
                rest = &candidate[1..];
            }
        }
    }
    decoded.push_str(rest);
    decoded
}

fn entity_char(name: &str) -> Option<char> {
    match name {
        "amp" | "#38" => Some('&'),
        "lt" | "#60" => Some('<'),
        "gt" | "#62" => Some('>'),
        "quot" | "#34" => Some('"'),
        "#39" | "#x27" => Some('\''),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        application::sections::gallery_view,
        presentation::views::{GalleryGridTemplate, render_fragment},
    };

    #[test]
    fn scanning_reads_tiles_in_order() {
        let markup = r#"
            <div class="gallery-grid">
              <a href="a.jpg"><img src="a.jpg" data-image-url="assets/images/gallery/a.jpg" data-image-alt="a"></a>
              <img src="decor.svg">
              <a href="b"><img data-image-url="https://drive.google.com/uc?export=view&amp;id=X" data-image-alt="Tom &amp; Jerry" data-image-caption="cap"></a>
            </div>"#;
        let list = scan_tiles(markup);
        assert_eq!(list.len(), 2);
        let second = list.get(1).expect("second tile");
        assert_eq!(second.url, "https://drive.google.com/uc?export=view&id=X");
        assert_eq!(second.alt, "Tom & Jerry");
        assert_eq!(second.caption.as_deref(), Some("cap"));
        assert_eq!(list.get(0).map(|img| img.alt.as_str()), Some("a"));
    }

    #[test]
    fn context_without_markup_has_no_tiles() {
        let ctx = RenderContext::new(Arc::new(ContentDocument::default()), PageContext::Listing);
        assert!(ctx.stored_images().is_none());
        assert!(ctx.rendered_tiles().is_empty());
    }

    #[test]
    fn decode_handles_common_entities() {
        assert_eq!(decode_entities("a &amp;lt; b"), "a &lt; b");
        assert_eq!(decode_entities("&#39;x&#x27; &quot;y&#34;"), "'x' \"y\"");
        assert_eq!(decode_entities("a&#38;b &#60;i&#62;"), "a&b <i>");
        assert_eq!(decode_entities("Fish &#38;amp; Chips"), "Fish &amp; Chips");
        assert_eq!(decode_entities("&#38;#39;"), "&#39;");
        assert_eq!(decode_entities("AT&T &unknown; &"), "AT&T &unknown; &");
    }

    #[test]
    fn scanning_rendered_grid_reproduces_stored_list() {
        let document = ContentDocument::from_slice(
            br#"{"gallery": [
                {"url": "https://example.com/a.jpg?w=1&amp;h=2", "alt": "Fish &amp; Chips", "caption": "<salt & vinegar>"},
                {"url": "https://example.com/b.jpg?w=1&h=2", "alt": "Tom's \"catch\""}
            ]}"#,
        )
        .expect("valid json");
        let entries = document.gallery.clone().unwrap_or_default();
        let stored = GalleryList::for_context(&entries, PageContext::Listing);
        let view = gallery_view(&stored, PageContext::Listing, stored.len());
        let markup = render_fragment(&GalleryGridTemplate { gallery: &view }, "context::tests")
            .expect("grid renders");

        let scanned = scan_tiles(&markup);
        assert_eq!(scanned.len(), stored.len());
        for (found, expected) in scanned.iter().zip(stored.iter()) {
            assert_eq!(found.url, expected.url);
            assert_eq!(found.alt, expected.alt);
            assert_eq!(found.caption, expected.caption);
            assert_eq!(found.id, expected.id);
        }
        assert_eq!(
            scanned.position_of_url("https://example.com/a.jpg?w=1&amp;h=2"),
            Some(0)
        );
    }
}
