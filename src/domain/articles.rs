use time::Date;
use time::macros::format_description;

/// Whether the text contains any Devanagari character (U+0900..=U+097F).
pub fn contains_devanagari(text: &str) -> bool {
    text.chars().any(|c| ('\u{0900}'..='\u{097F}').contains(&c))
}

/// Format an ISO `YYYY-MM-DD` date as `Month D, YYYY`.
///
/// Values that are not ISO dates are shown as written.
pub fn display_date(raw: &str) -> String {
    let format = format_description!("[year]-[month]-[day]");
    match Date::parse(raw.trim(), &format) {
        Ok(date) => format!("{} {}, {}", date.month(), date.day(), date.year()),
        Err(_) => raw.trim().to_string(),
    }
}
