//! Typed shape of the portfolio content document (`assets/data/data.json`).
//!
//! Every field is optional. Renderers treat an absent or empty field as
//! "nothing to render", so deserialization is deliberately lenient: unknown
//! keys are ignored and the gallery accepts both historical entry shapes.

use serde::{Deserialize, Serialize};

/// Root of the content document.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ContentDocument {
    pub home: Option<HomeContent>,
    pub social: Option<Vec<SocialLink>>,
    pub about: Option<AboutContent>,
    pub articles: Option<Vec<Article>>,
    pub gallery: Option<Vec<GalleryEntry>>,
    pub contact: Option<ContactContent>,
    pub newsletter: Option<NewsletterContent>,
}

impl ContentDocument {
    /// Parse a document from raw JSON bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct HomeContent {
    pub headline: Option<String>,
    pub subline: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SocialLink {
    pub name: String,
    pub icon: String,
    pub link: String,
}

impl SocialLink {
    /// Icon glyph for the link; unknown icons fall back to a generic link glyph.
    pub fn icon_name(&self) -> &'static str {
        match self.icon.as_str() {
            "linkedin" => "linkedin",
            "twitter" | "x" => "twitter",
            "email" | "mail" => "mail",
            "github" => "github",
            "instagram" => "instagram",
            _ => "link",
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AboutContent {
    pub intro: Option<IntroContent>,
    pub work: Option<WorkContent>,
    pub education: Option<EducationContent>,
    pub skills: Option<SkillsContent>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct IntroContent {
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct WorkContent {
    pub title: Option<String>,
    pub experiences: Vec<Experience>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Experience {
    pub company: Option<String>,
    pub timeframe: Option<String>,
    pub role: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<OneOrMany>,
    pub achievements: Vec<String>,
}

/// A field that older documents store as a single string and newer ones as a list.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            OneOrMany::One(value) => vec![value],
            OneOrMany::Many(values) => values,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct EducationContent {
    pub title: Option<String>,
    pub institutions: Vec<Institution>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Institution {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SkillsContent {
    pub title: Option<String>,
    pub items: Vec<Skill>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Skill {
    pub title: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub tools: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Article {
    pub title: Option<String>,
    pub excerpt: Option<String>,
    pub link: Option<String>,
    pub date: Option<String>,
}

/// One entry of the `gallery` array.
///
/// Current documents list bare filenames; older ones list objects carrying an
/// explicit URL. Anything else is kept as `Other` so one malformed entry does
/// not reject the whole document.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum GalleryEntry {
    File(String),
    Legacy(LegacyImage),
    Other(serde_json::Value),
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct LegacyImage {
    pub url: Option<String>,
    pub alt: Option<String>,
    pub caption: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ContactContent {
    pub access_key: Option<String>,
    pub subject: Option<String>,
    pub from_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct NewsletterContent {
    pub display: bool,
    pub title: Option<String>,
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_parses_to_empty_document() {
        let doc = ContentDocument::from_slice(b"{}").expect("parse");
        assert!(doc.home.is_none());
        assert!(doc.gallery.is_none());
        assert!(doc.articles.is_none());
    }

    #[test]
    fn gallery_accepts_both_entry_shapes() {
        let doc = ContentDocument::from_slice(
            br#"{"gallery": ["a.jpg", {"url": "https://example.com/x.png", "alt": "x"}, null]}"#,
        )
        .expect("parse");
        let gallery = doc.gallery.expect("gallery present");
        assert!(matches!(&gallery[0], GalleryEntry::File(name) if name == "a.jpg"));
        assert!(matches!(&gallery[1], GalleryEntry::Legacy(img) if img.alt.as_deref() == Some("x")));
        assert!(matches!(&gallery[2], GalleryEntry::Other(_)));
    }

    #[test]
    fn experience_type_accepts_string_or_list() {
        let doc = ContentDocument::from_slice(
            br#"{"about": {"work": {"experiences": [
                {"role": "Editor", "type": "Print"},
                {"role": "Anchor", "type": ["Television", "Digital"]}
            ]}}}"#,
        )
        .expect("parse");
        let work = doc.about.and_then(|about| about.work).expect("work");
        let first = work.experiences[0].kind.clone().expect("type").into_vec();
        let second = work.experiences[1].kind.clone().expect("type").into_vec();
        assert_eq!(first, vec!["Print".to_string()]);
        assert_eq!(second, vec!["Television".to_string(), "Digital".to_string()]);
    }

    #[test]
    fn social_icons_map_to_known_glyphs() {
        let link = |icon: &str| SocialLink {
            name: "n".into(),
            icon: icon.into(),
            link: "#".into(),
        };
        assert_eq!(link("x").icon_name(), "twitter");
        assert_eq!(link("email").icon_name(), "mail");
        assert_eq!(link("mastodon").icon_name(), "link");
    }
}
