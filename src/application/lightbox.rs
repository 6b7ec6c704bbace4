//! Server side of the lightbox: turns viewer transitions into datastar patches.

use std::sync::Arc;

use axum::http::StatusCode;
use datastar::prelude::ElementPatchMode;
use metrics::counter;
use serde_json::json;
use tracing::debug;

use crate::{
    application::{
        content::ContentStore, context::RenderContext, error::HttpError, sections,
        stream::StreamBuilder,
    },
    domain::{
        gallery::{GalleryList, TileId},
        lightbox::{Direction, GallerySource, Lightbox, LightboxFrame},
        page::PageContext,
    },
    presentation::views::{GalleryGridTemplate, LightboxTemplate, LightboxView, render_fragment},
};

const SOURCE: &str = "application::lightbox::LightboxService";
const METRIC_LIGHTBOX_EVENTS: &str = "folio_lightbox_events_total";

pub const LIGHTBOX_SELECTOR: &str = "#image-lightbox";
pub const CLOSE_HREF: &str = "/ui/lightbox/close";

/// Markup replacing the lightbox container plus the resulting open state.
#[derive(Debug, Clone)]
pub struct LightboxUpdate {
    pub markup: String,
    pub open: bool,
}

impl LightboxUpdate {
    pub fn into_stream(self) -> StreamBuilder {
        let mut stream = StreamBuilder::new();
        stream.push_patch(self.markup, LIGHTBOX_SELECTOR, ElementPatchMode::Outer);
        stream.push_signals(&json!({ "lightboxOpen": self.open }).to_string());
        stream
    }
}

/// Request to open the viewer on a tile.
#[derive(Debug, Clone, Copy)]
pub struct OpenRequest {
    pub tile: TileId,
    /// Context the tile was rendered in. Absent means the tiles must be
    /// recovered from rendered markup.
    pub page: Option<PageContext>,
    pub index: Option<usize>,
    pub total: Option<usize>,
}

#[derive(Clone)]
pub struct LightboxService {
    store: Arc<ContentStore>,
}

impl LightboxService {
    pub fn new(store: Arc<ContentStore>) -> Self {
        Self { store }
    }

    /// Open on the tile. `None` when there is nothing to show.
    pub async fn open(&self, request: OpenRequest) -> Result<Option<LightboxUpdate>, HttpError> {
        let document = self.store.load().await.map_err(|err| {
            HttpError::from_error(
                SOURCE,
                StatusCode::SERVICE_UNAVAILABLE,
                "Site content is temporarily unavailable",
                &err,
            )
        })?;

        let page = request.page.unwrap_or(PageContext::Listing);
        let mut ctx = RenderContext::new(document, page);
        if request.page.is_some() {
            sections::render_gallery(&mut ctx);
        } else {
            let entries = ctx.document().gallery.clone().unwrap_or_default();
            let list = GalleryList::for_context(&entries, page);
            let view = sections::gallery_view(&list, page, list.len());
            let markup = render_fragment(&GalleryGridTemplate { gallery: &view }, SOURCE)?;
            ctx.attach_tile_markup(markup);
        }

        let resolved = match ctx.stored_images() {
            Some(list) => list.clone(),
            None => ctx.rendered_tiles(),
        };
        let url = resolved
            .find(request.tile)
            .map(|(_, image)| image.url.clone());
        let index = request.index.unwrap_or(0);
        let total = request.total.unwrap_or(resolved.len());

        let mut lightbox = Lightbox::new();
        let Some(outcome) = lightbox.open(&ctx, url.as_deref(), index, total) else {
            counter!(METRIC_LIGHTBOX_EVENTS, "action" => "open_empty").increment(1);
            return Ok(None);
        };

        debug!(
            target = "folio::lightbox",
            tile = %request.tile,
            index = outcome.index,
            total_mismatch = outcome.total_mismatch,
            from_fallback = outcome.from_fallback,
            "lightbox opened"
        );
        counter!(METRIC_LIGHTBOX_EVENTS, "action" => "open").increment(1);

        render_open(&lightbox, page).map(Some)
    }

    /// Step from `index` in `step` direction. `None` when the move is a no-op.
    pub async fn navigate(
        &self,
        page: PageContext,
        index: usize,
        step: i64,
    ) -> Result<Option<LightboxUpdate>, HttpError> {
        let Some(direction) = Direction::from_step(step) else {
            return Ok(None);
        };

        let document = self.store.load().await.map_err(|err| {
            HttpError::from_error(
                SOURCE,
                StatusCode::SERVICE_UNAVAILABLE,
                "Site content is temporarily unavailable",
                &err,
            )
        })?;
        let entries = document.gallery.as_deref().unwrap_or_default();
        let list = GalleryList::for_context(entries, page);

        let mut lightbox = Lightbox::resume(list, index);
        if lightbox.navigate(direction).is_none() {
            return Ok(None);
        }
        counter!(METRIC_LIGHTBOX_EVENTS, "action" => "navigate").increment(1);

        render_open(&lightbox, page).map(Some)
    }

    pub fn close(&self) -> Result<LightboxUpdate, HttpError> {
        counter!(METRIC_LIGHTBOX_EVENTS, "action" => "close").increment(1);
        let markup = render_fragment(&LightboxTemplate { view: None }, SOURCE)?;
        Ok(LightboxUpdate {
            markup,
            open: false,
        })
    }
}

fn render_open(lightbox: &Lightbox, page: PageContext) -> Result<LightboxUpdate, HttpError> {
    let Some(frame) = lightbox.frame() else {
        return Err(HttpError::new(
            SOURCE,
            StatusCode::INTERNAL_SERVER_ERROR,
            "Lightbox could not be rendered",
            "viewer reported open without a frame",
        ));
    };
    let view = lightbox_view(&frame, page);
    let markup = render_fragment(&LightboxTemplate { view: Some(view) }, SOURCE)?;
    Ok(LightboxUpdate {
        markup,
        open: frame.scroll_locked,
    })
}

fn lightbox_view(frame: &LightboxFrame<'_>, page: PageContext) -> LightboxView {
    let navigate = |dir: i64| {
        format!(
            "/ui/lightbox/navigate?page={}&index={}&dir={dir}",
            page.as_str(),
            frame.index
        )
    };
    LightboxView {
        url: frame.image.url.clone(),
        alt: frame.image.alt.clone(),
        caption: frame.image.caption.clone(),
        position: frame.index + 1,
        total: frame.total,
        show_controls: frame.show_controls,
        prev_href: navigate(Direction::Previous.step()),
        next_href: navigate(Direction::Next.step()),
        close_href: CLOSE_HREF,
    }
}
