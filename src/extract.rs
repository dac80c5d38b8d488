//! Pure text extraction helpers: title normalization and regex field parsers.
//!
//! Everything in this module is a pure function over a string or element —
//! no network, no shared state. The card extractor and the link indexer both
//! go through [`normalize_title`], which keeps their matching keys aligned.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::ElementRef;

/// Characters kept by the normalizer: word characters, whitespace, Hangul.
static TITLE_STRIP: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s가-힣]").unwrap());
static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Dot-separated date as printed on listing cards, e.g. `2025.5.6`.
static CARD_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{4})\.(\d{1,2})\.(\d{1,2})").unwrap());

/// Date with any of `-`, `.`, `/` as separator, used on article pages.
static ANY_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{4})[-./](\d{1,2})[-./](\d{1,2})").unwrap());

/// Read time as printed on cards, e.g. `5분`.
static READ_TIME: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d{1,2}분)").unwrap());

/// `By <name>` byline; captures up to the next whitespace or end of text.
static AUTHOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"By\s+(.+?)(?:\s|$)").unwrap());

/// Canonicalize a title into a matching key.
///
/// Lowercases, strips everything outside word characters / whitespace /
/// Hangul, collapses whitespace runs to single spaces, trims, and truncates
/// to the first 50 characters. Idempotent: normalizing an already-normalized
/// key returns it unchanged.
pub fn normalize_title(title: &str) -> String {
    let lowered = title.to_lowercase();
    let stripped = TITLE_STRIP.replace_all(&lowered, "");
    let collapsed = WHITESPACE_RUN.replace_all(&stripped, " ");
    collapsed.trim().chars().take(50).collect()
}

/// Zero-pad the three capture groups of a date match into `YYYY-MM-DD`.
fn pad_date(year: &str, month: &str, day: &str) -> String {
    format!("{}-{:0>2}-{:0>2}", year, month, day)
}

/// Find a `YYYY.M.D` card date anywhere in `text`, reformatted zero-padded.
pub fn parse_card_date(text: &str) -> Option<String> {
    CARD_DATE
        .captures(text)
        .map(|c| pad_date(&c[1], &c[2], &c[3]))
}

/// Find a date with `-`, `.` or `/` separators anywhere in `text`.
pub fn parse_any_date(text: &str) -> Option<String> {
    ANY_DATE
        .captures(text)
        .map(|c| pad_date(&c[1], &c[2], &c[3]))
}

/// Find a read-time marker like `5분` anywhere in `text`.
pub fn parse_read_time(text: &str) -> Option<String> {
    READ_TIME.captures(text).map(|c| c[1].to_string())
}

/// Extract the first token of a `By <name>` byline.
pub fn parse_author(text: &str) -> Option<String> {
    AUTHOR
        .captures(text)
        .map(|c| c[1].trim().to_string())
        .filter(|a| !a.is_empty())
}

/// Visible text of an element with whitespace normalized: text nodes joined
/// and runs of whitespace collapsed to single spaces.
pub fn element_text(el: &ElementRef) -> String {
    el.text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    #[test]
    fn test_normalize_lowercases_and_strips_punctuation() {
        assert_eq!(
            normalize_title("AI, Cloud & Security: What's Next?"),
            "ai cloud security whats next"
        );
    }

    #[test]
    fn test_normalize_keeps_hangul() {
        assert_eq!(normalize_title("클라우드 보안 전략!"), "클라우드 보안 전략");
    }

    #[test]
    fn test_normalize_collapses_whitespace() {
        assert_eq!(normalize_title("  a \t b\n\nc  "), "a b c");
    }

    #[test]
    fn test_normalize_truncates_to_50_chars() {
        let long = "word ".repeat(30);
        let key = normalize_title(&long);
        assert_eq!(key.chars().count(), 50);
    }

    #[test]
    fn test_normalize_idempotent() {
        let inputs = [
            "Hello,  WORLD!!",
            "클라우드 네이티브 전환",
            "Mixed 한글 and English: a very long title that goes on and on and on",
            "",
        ];
        for input in inputs {
            let once = normalize_title(input);
            assert_eq!(normalize_title(&once), once, "input: {input:?}");
        }
    }

    #[test]
    fn test_normalize_deterministic() {
        let input = "Same Input, Same Key?";
        assert_eq!(normalize_title(input), normalize_title(input));
    }

    #[test]
    fn test_parse_card_date_zero_pads() {
        assert_eq!(
            parse_card_date("news · 2025.5.6 · 5분").as_deref(),
            Some("2025-05-06")
        );
        assert_eq!(
            parse_card_date("2024.12.31").as_deref(),
            Some("2024-12-31")
        );
        assert_eq!(parse_card_date("no date here"), None);
    }

    #[test]
    fn test_parse_any_date_accepts_all_separators() {
        assert_eq!(parse_any_date("2025-5-6").as_deref(), Some("2025-05-06"));
        assert_eq!(parse_any_date("2025.5.6").as_deref(), Some("2025-05-06"));
        assert_eq!(parse_any_date("2025/05/06").as_deref(), Some("2025-05-06"));
        assert_eq!(parse_any_date("published today"), None);
    }

    #[test]
    fn test_parse_read_time() {
        assert_eq!(parse_read_time("읽는 시간 12분").as_deref(), Some("12분"));
        assert_eq!(parse_read_time("no marker"), None);
    }

    #[test]
    fn test_parse_author_takes_first_token() {
        assert_eq!(parse_author("By Kim 2025.5.6").as_deref(), Some("Kim"));
        assert_eq!(parse_author("By Lee").as_deref(), Some("Lee"));
        assert_eq!(parse_author("written by nobody capitalized"), None);
    }

    #[test]
    fn test_element_text_normalizes_whitespace() {
        let html = Html::parse_fragment("<div> one\n  <span>two</span>\tthree </div>");
        let sel = Selector::parse("div").unwrap();
        let el = html.select(&sel).next().unwrap();
        assert_eq!(element_text(&el), "one two three");
    }
}
