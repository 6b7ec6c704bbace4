//! Derived display values for the biography sections.

/// Icons a skill may name; anything else renders as `star`.
const SKILL_ICONS: &[&str] = &["search", "video", "pen-tool", "check-circle", "camera", "edit"];
const DEFAULT_SKILL_ICON: &str = "star";
const ONGOING: &str = "Ongoing";

/// Display form of an education entry's name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EducationEntry {
    pub name: String,
    pub years: Option<String>,
    pub ongoing: bool,
}

impl EducationEntry {
    /// Split a raw name such as `"MA in Hindi (2016-2018)"` into its display
    /// name and year range.
    pub fn parse(raw: &str) -> Self {
        let lowered = raw.to_ascii_lowercase();
        let ongoing = lowered.contains("pursuing") || lowered.contains("present");

        let years = match year_range(raw) {
            Some((start, end)) => Some(format!("{start} - {end}")),
            None if ongoing => Some(ONGOING.to_string()),
            None => None,
        };

        let without_groups = collapse_whitespace(&strip_parenthesized(raw));
        let name = strip_status_suffix(&without_groups).trim().to_string();

        Self {
            name,
            years,
            ongoing,
        }
    }
}

/// First `(YYYY-YYYY)` group in the text.
fn year_range(text: &str) -> Option<(&str, &str)> {
    let bytes = text.as_bytes();
    text.match_indices('(').find_map(|(open, _)| {
        let group = bytes.get(open..open + 11)?;
        let digits = |range: std::ops::Range<usize>| group[range].iter().all(u8::is_ascii_digit);
        let well_formed = digits(1..5) && group[5] == b'-' && digits(6..10) && group[10] == b')';
        well_formed.then(|| (&text[open + 1..open + 5], &text[open + 6..open + 10]))
    })
}

/// Replace every closed `( … )` group with a space.
fn strip_parenthesized(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(open) = rest.find('(') {
        match rest[open..].find(')') {
            Some(close) => {
                out.push_str(&rest[..open]);
                out.push(' ');
                rest = &rest[open + close + 1..];
            }
            None => break,
        }
    }
    out.push_str(rest);
    out
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Remove the first `- Pursuing` / `- Present` marker, case-insensitively.
fn strip_status_suffix(text: &str) -> String {
    let lowered = text.to_ascii_lowercase();
    let marker = ["pursuing", "present"]
        .iter()
        .filter_map(|word| {
            lowered.match_indices(word).find_map(|(at, matched)| {
                let before = text[..at].trim_end();
                let dash = before.strip_suffix('-')?;
                Some((dash.trim_end().len(), at + matched.len()))
            })
        })
        .min_by_key(|(start, _)| *start);

    match marker {
        Some((start, end)) => format!("{}{}", &text[..start], &text[end..]),
        None => text.to_string(),
    }
}

/// Style class for a work-experience type badge.
pub fn type_badge_class(kind: &str) -> &'static str {
    match kind {
        "Television" => "badge-blue",
        "Print" => "badge-purple",
        "Digital" => "badge-green",
        "Organization" => "badge-orange",
        "Social Impact" => "badge-pink",
        _ => "badge-grey",
    }
}

pub fn skill_icon(icon: Option<&str>) -> &'static str {
    icon.and_then(|icon| SKILL_ICONS.iter().find(|known| **known == icon))
        .copied()
        .unwrap_or(DEFAULT_SKILL_ICON)
}
