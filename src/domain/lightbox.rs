//! Lightbox viewer state machine.
//!
//! The viewer is either closed or open on one image of a gallery list.
//! Navigation wraps in both directions; every operation on an empty or
//! single-image list that would be meaningless is a no-op.

use super::gallery::{GalleryList, ImageDescriptor};

/// Step applied by `navigate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

impl Direction {
    /// Interpret a signed step. Only `-1` and `1` are meaningful.
    pub fn from_step(step: i64) -> Option<Self> {
        match step {
            -1 => Some(Direction::Previous),
            1 => Some(Direction::Next),
            _ => None,
        }
    }

    pub fn step(self) -> i64 {
        match self {
            Direction::Previous => -1,
            Direction::Next => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewerState {
    #[default]
    Closed,
    Open {
        current_index: usize,
    },
}

/// Where the viewer gets its authoritative image list from.
///
/// The stored list is what the gallery renderer produced for the current
/// render; the rendered tiles are the fallback when no renderer ran in the
/// same context.
pub trait GallerySource {
    fn stored_images(&self) -> Option<&GalleryList>;

    fn rendered_tiles(&self) -> GalleryList;
}

/// Result of a successful `open`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenOutcome {
    pub index: usize,
    /// The caller's notion of the list length disagreed with the resolved list.
    pub total_mismatch: bool,
    /// The list came from scanning rendered tiles rather than the renderer.
    pub from_fallback: bool,
}

/// Everything needed to draw the open viewer.
#[derive(Debug, Clone, Copy)]
pub struct LightboxFrame<'a> {
    pub image: &'a ImageDescriptor,
    pub index: usize,
    pub total: usize,
    pub show_controls: bool,
    pub scroll_locked: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Lightbox {
    images: GalleryList,
    state: ViewerState,
}

impl Lightbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild an open viewer from state carried in rendered markup.
    ///
    /// Returns a closed viewer when the list is empty; an out-of-range index
    /// is clamped to the last image.
    pub fn resume(images: GalleryList, current_index: usize) -> Self {
        if images.is_empty() {
            return Self {
                images,
                state: ViewerState::Closed,
            };
        }
        let current_index = current_index.min(images.len() - 1);
        Self {
            images,
            state: ViewerState::Open { current_index },
        }
    }

    pub fn state(&self) -> ViewerState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, ViewerState::Open { .. })
    }

    pub fn images(&self) -> &GalleryList {
        &self.images
    }

    /// Open on the image whose URL is `url`, or on `index` when the URL is
    /// not in the resolved list. An empty list leaves the viewer closed.
    pub fn open<S: GallerySource + ?Sized>(
        &mut self,
        source: &S,
        url: Option<&str>,
        index: usize,
        total: usize,
    ) -> Option<OpenOutcome> {
        let (images, from_fallback) = match source.stored_images() {
            Some(list) if !list.is_empty() => (list.clone(), false),
            _ => (source.rendered_tiles(), true),
        };
        if images.is_empty() {
            return None;
        }

        let index = url
            .and_then(|url| images.position_of_url(url))
            .unwrap_or_else(|| index.min(images.len() - 1));
        let total_mismatch = total != images.len();

        self.images = images;
        self.state = ViewerState::Open {
            current_index: index,
        };

        Some(OpenOutcome {
            index,
            total_mismatch,
            from_fallback,
        })
    }

    /// Move one image in `direction`, wrapping at both ends.
    ///
    /// Returns the new index, or `None` when the viewer is closed or there is
    /// nothing to move between.
    pub fn navigate(&mut self, direction: Direction) -> Option<usize> {
        let ViewerState::Open { current_index } = self.state else {
            return None;
        };
        let len = self.images.len();
        if len < 2 {
            return None;
        }

        let next = match direction {
            Direction::Next => (current_index + 1) % len,
            Direction::Previous => (current_index + len - 1) % len,
        };
        self.state = ViewerState::Open {
            current_index: next,
        };
        Some(next)
    }

    /// Close the viewer. Returns whether it was open.
    pub fn close(&mut self) -> bool {
        let was_open = self.is_open();
        self.state = ViewerState::Closed;
        was_open
    }

    pub fn frame(&self) -> Option<LightboxFrame<'_>> {
        let ViewerState::Open { current_index } = self.state else {
            return None;
        };
        let image = self.images.get(current_index)?;
        Some(LightboxFrame {
            image,
            index: current_index,
            total: self.images.len(),
            show_controls: self.images.len() > 1,
            scroll_locked: true,
        })
    }
}
