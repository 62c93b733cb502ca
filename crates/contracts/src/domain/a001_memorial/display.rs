//! Правила отображения полей мемориала.
//!
//! Используются и сервером (канонические значения в ответах), и клиентом
//! (оптимистичное отображение до ответа сервера), поэтому живут в contracts.

use chrono::NaiveDate;

/// Формат даты на странице: "March 05, 1950"
pub const DATE_DISPLAY_FORMAT: &str = "%B %d, %Y";

/// Формат даты в формах и запросах
pub const DATE_INPUT_FORMAT: &str = "%Y-%m-%d";

pub const DEFAULT_QUOTE_PREFIX: &str = "In Loving Memory of";

/// Non-empty trimmed parts joined with a single space
pub fn full_name(first: &str, middle: &str, last: &str) -> String {
    [first, middle, last]
        .iter()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_DISPLAY_FORMAT).to_string()
}

pub fn format_dates(date_of_birth: NaiveDate, date_of_death: Option<NaiveDate>) -> String {
    match date_of_death {
        Some(death) => format!("{} - {}", format_date(date_of_birth), format_date(death)),
        None => format_date(date_of_birth),
    }
}

pub fn parse_input_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value.trim(), DATE_INPUT_FORMAT)
        .map_err(|_| "Invalid date format. Use YYYY-MM-DD.".to_string())
}

/// "In Loving Memory of " + first token of the displayed name
pub fn default_quote(name_display: &str) -> String {
    match name_display.split_whitespace().next() {
        Some(first) => format!("{} {}", DEFAULT_QUOTE_PREFIX, first),
        None => DEFAULT_QUOTE_PREFIX.to_string(),
    }
}

pub fn quote_or_default(quote: &str, name_display: &str) -> String {
    let quote = quote.trim();
    if quote.is_empty() {
        default_quote(name_display)
    } else {
        quote.to_string()
    }
}

/// HTML fragment for the biography block: text escaped, newlines as `<br>`
pub fn biography_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.replace("\r\n", "\n").chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '\n' => out.push_str("<br>"),
            c => out.push(c),
        }
    }
    out
}
