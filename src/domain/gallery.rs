//! Gallery normalization: content entries into an ordered list of image descriptors.

use std::fmt;

use sha2::{Digest, Sha256};

use super::content::{GalleryEntry, LegacyImage};
use super::page::PageContext;

/// Directory, relative to the site root, that bare gallery filenames resolve against.
pub const GALLERY_ASSET_DIR: &str = "assets/images/gallery";

/// Alt text used when a legacy entry carries none.
pub const DEFAULT_ALT: &str = "Gallery image";

const SHARE_LINK_MARKER: &str = "drive.google.com/file/d/";
const SHARE_LINK_SEGMENT: &str = "/file/d/";
const DIRECT_VIEW_PREFIX: &str = "https://drive.google.com/uc?export=view&id=";

/// Stable identifier of a gallery tile, derived from the image's display URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileId([u8; 6]);

impl TileId {
    pub fn for_url(url: &str) -> Self {
        let digest = Sha256::digest(url.as_bytes());
        let mut bytes = [0u8; 6];
        bytes.copy_from_slice(&digest[..6]);
        Self(bytes)
    }

    /// Parse the hex form produced by `Display`.
    pub fn parse(value: &str) -> Option<Self> {
        let decoded = hex::decode(value).ok()?;
        let bytes: [u8; 6] = decoded.try_into().ok()?;
        Some(Self(bytes))
    }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

/// A displayable gallery image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageDescriptor {
    pub id: TileId,
    pub url: String,
    pub alt: String,
    pub caption: Option<String>,
}

impl ImageDescriptor {
    pub fn new(url: String, alt: String, caption: Option<String>) -> Self {
        Self {
            id: TileId::for_url(&url),
            url,
            alt,
            caption,
        }
    }

    /// Descriptor for a bare filename inside the gallery asset directory.
    pub fn from_filename(filename: &str) -> Self {
        Self::new(
            format!("{GALLERY_ASSET_DIR}/{filename}"),
            alt_from_filename(filename),
            None,
        )
    }

    fn from_legacy(image: &LegacyImage) -> Option<Self> {
        let url = image.url.as_deref().filter(|url| !url.trim().is_empty())?;
        let alt = image
            .alt
            .clone()
            .filter(|alt| !alt.is_empty())
            .unwrap_or_else(|| DEFAULT_ALT.to_string());
        let caption = image.caption.clone().filter(|caption| !caption.is_empty());
        Some(Self::new(rewrite_share_url(url), alt, caption))
    }
}

/// Which of the two content formats a gallery array uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GalleryShape {
    Filenames,
    Legacy,
}

impl GalleryShape {
    /// The first entry decides the shape of the whole array.
    pub fn detect(entries: &[GalleryEntry]) -> Option<Self> {
        match entries.first()? {
            GalleryEntry::File(_) => Some(GalleryShape::Filenames),
            _ => Some(GalleryShape::Legacy),
        }
    }
}

/// Ordered list of gallery images for one render.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GalleryList {
    images: Vec<ImageDescriptor>,
}

impl GalleryList {
    pub fn new(images: Vec<ImageDescriptor>) -> Self {
        Self { images }
    }

    /// Normalize raw entries. Filename arrays are filtered and sorted by name;
    /// legacy arrays keep source order and drop entries without a URL.
    pub fn from_entries(entries: &[GalleryEntry]) -> Self {
        let images = match GalleryShape::detect(entries) {
            None => Vec::new(),
            Some(GalleryShape::Filenames) => {
                let mut names: Vec<&str> = entries
                    .iter()
                    .filter_map(|entry| match entry {
                        GalleryEntry::File(name) if !name.trim().is_empty() => Some(name.as_str()),
                        _ => None,
                    })
                    .collect();
                names.sort_unstable();
                names
                    .into_iter()
                    .map(ImageDescriptor::from_filename)
                    .collect()
            }
            Some(GalleryShape::Legacy) => entries
                .iter()
                .filter_map(|entry| match entry {
                    GalleryEntry::Legacy(image) => ImageDescriptor::from_legacy(image),
                    _ => None,
                })
                .collect(),
        };

        Self { images }
    }

    /// Normalize then apply the page-context cap. The cap runs after sorting,
    /// so a landing page always shows the lexicographically first filenames.
    pub fn for_context(entries: &[GalleryEntry], page: PageContext) -> Self {
        let list = Self::from_entries(entries);
        Self {
            images: page.limit(list.images),
        }
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ImageDescriptor> {
        self.images.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ImageDescriptor> {
        self.images.iter()
    }

    pub fn position_of_url(&self, url: &str) -> Option<usize> {
        self.images.iter().position(|image| image.url == url)
    }

    /// Look up a tile by identifier, returning its position and descriptor.
    pub fn find(&self, id: TileId) -> Option<(usize, &ImageDescriptor)> {
        self.images
            .iter()
            .enumerate()
            .find(|(_, image)| image.id == id)
    }
}

/// Rewrite a file-sharing link into a directly fetchable image URL.
///
/// `…drive.google.com/file/d/<id>…` becomes the canonical direct-view form for
/// `<id>`. Links already in direct or content-host form, and anything else,
/// pass through unchanged, so the rewrite is idempotent.
pub fn rewrite_share_url(url: &str) -> String {
    if url.contains(SHARE_LINK_MARKER) {
        let id = url.match_indices(SHARE_LINK_SEGMENT).find_map(|(start, _)| {
            let rest = &url[start + SHARE_LINK_SEGMENT.len()..];
            let end = rest
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '-'))
                .unwrap_or(rest.len());
            (end > 0).then(|| &rest[..end])
        });
        if let Some(id) = id {
            return format!("{DIRECT_VIEW_PREFIX}{id}");
        }
    }
    url.to_string()
}

/// Display label for a filename: the name without its final extension.
pub fn alt_from_filename(filename: &str) -> String {
    match filename.rfind('.') {
        Some(dot) if dot + 1 < filename.len() && !filename[dot + 1..].contains('/') => {
            filename[..dot].to_string()
        }
        _ => filename.to_string(),
    }
}
