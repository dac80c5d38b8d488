//! Data models for crawl results and site analysis.
//!
//! This module defines the structures handed from the crawl/analysis core to
//! the formatting layer:
//! - [`NewsItem`]: one article teaser extracted from a listing card
//! - [`CrawlResult`]: aggregate result of one crawl call (also the failure shape)
//! - [`CrawlSummary`]: derived statistics over the deduplicated article list
//! - [`ArticleContent`]: full-text body fetched from one article page
//! - [`SiteAnalysis`]: output of the generic website analyzer
//!
//! All mappings that feed ordered output (category histogram, distributions,
//! tag counts) use [`IndexMap`] so iteration order stays insertion order and
//! sort ties break deterministically.

use chrono::Local;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Timestamp format used on result envelopes, e.g. `2025-05-06 14:30:00`.
pub const RESULT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One news article extracted from a listing card.
///
/// `title` is the only required field; a card without a title never becomes a
/// `NewsItem`. Everything else is best-effort: each optional field is filled
/// by the first selector-cascade candidate that matches, and left `None`
/// otherwise.
///
/// Within one [`CrawlResult`], `title` uniquely identifies an item — dedup is
/// by literal title equality, first seen wins.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NewsItem {
    /// Article headline as displayed on the card.
    pub title: String,
    /// Destination URL recovered from the link index, when a match was found.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Content type label, e.g. "news" or "feature".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    /// Teaser text, only kept when longer than 20 characters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Author name parsed from a `By <name>` byline.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Publication date, zero-padded `YYYY-MM-DD`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publish_date: Option<String>,
    /// Estimated read time as printed on the card, e.g. "5분".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_time: Option<String>,
    /// Topic tags in discovery order.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Absolute URL of the card image.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Alt text of the card image, captured as-is (may be empty).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_alt: Option<String>,
    /// Full article body, present only when content collection ran.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_content: Option<String>,
    /// Length of `full_content` in characters; 0 when not collected.
    #[serde(default)]
    pub content_length: usize,
    /// When this item was extracted (RFC 3339).
    pub crawled_at: String,
    /// Constant source label.
    pub source: String,
}

impl NewsItem {
    /// Create an item carrying only the required fields, stamped with the
    /// current time and the given source label.
    pub fn new(title: String, source: &str) -> Self {
        Self {
            title,
            url: None,
            content_type: None,
            description: None,
            author: None,
            publish_date: None,
            read_time: None,
            tags: Vec::new(),
            image_url: None,
            image_alt: None,
            full_content: None,
            content_length: 0,
            crawled_at: Local::now().to_rfc3339(),
            source: source.to_string(),
        }
    }
}

/// Derived statistics over a deduplicated article list.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CrawlSummary {
    /// Number of articles in `news_list`.
    pub total_articles: usize,
    /// Article count per publish date, with an `"Unknown"` bucket.
    pub date_distribution: IndexMap<String, usize>,
    /// Article count per content type, with an `"Unknown"` bucket.
    pub content_type_distribution: IndexMap<String, usize>,
    /// Lexicographic maximum of all present publish dates; empty if none.
    pub latest_date: String,
    /// Number of articles carrying an image URL.
    pub has_images: usize,
}

/// Aggregate result of one crawl call.
///
/// This is the terminal hand-off value to the formatting layer. Failures are
/// reported through the same shape: `success` is false, `error` carries a
/// human-readable message, and `news_list` is empty.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CrawlResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// When the crawl finished, `YYYY-MM-DD HH:MM:SS`.
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Number of listing pages visited (category crawl only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pages_crawled: Option<u32>,
    pub total_news: usize,
    pub news_list: Vec<NewsItem>,
    /// Tag histogram across all articles, sorted descending by count.
    #[serde(default)]
    pub categories: IndexMap<String, usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<CrawlSummary>,
    pub content_included: bool,
}

impl CrawlResult {
    /// Build the structured failure value returned when the page fetch
    /// itself fails.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            timestamp: Local::now().format(RESULT_TIMESTAMP_FORMAT).to_string(),
            source: None,
            url: None,
            pages_crawled: None,
            total_news: 0,
            news_list: Vec::new(),
            categories: IndexMap::new(),
            summary: None,
            content_included: false,
        }
    }
}

/// Full-text content fetched from one article page.
///
/// Fields the page didn't yield stay empty rather than absent — the caller
/// merges non-empty values back into the owning [`NewsItem`].
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ArticleContent {
    pub url: String,
    pub title: String,
    pub content: String,
    pub publish_date: String,
    pub author: String,
    pub tags: Vec<String>,
    pub category: String,
    pub crawled_at: String,
}

/// Website metadata from `<title>` and meta tags.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BasicInfo {
    pub title: String,
    pub description: String,
    pub keywords: String,
}

/// Word-level statistics over the page's visible text.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TextStats {
    pub total_words: usize,
    pub unique_words: usize,
    /// Most frequent words longer than 2 characters, descending.
    pub most_common_words: Vec<(String, usize)>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MediaStats {
    pub total_images: usize,
    pub images_with_alt: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LinkStats {
    pub total_links: usize,
    pub internal_links: usize,
    pub external_links: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ContentAnalysis {
    pub text_stats: TextStats,
    pub media_stats: MediaStats,
    pub link_stats: LinkStats,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StructuralElements {
    pub tables: usize,
    pub forms: usize,
    pub lists: usize,
    pub headings: usize,
    pub paragraphs: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StructureAnalysis {
    /// Tag name → occurrence count, top 15 descending.
    pub tag_distribution: IndexMap<String, usize>,
    pub structural_elements: StructuralElements,
}

/// A structural pattern suggesting extractable data (table, list, repeated
/// class, form).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DataOpportunity {
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub potential_data: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DataOpportunities {
    pub total_opportunities: usize,
    pub opportunities: Vec<DataOpportunity>,
    pub recommendations: Vec<String>,
}

/// Output of the generic website analyzer.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SiteAnalysis {
    pub url: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub basic_info: Option<BasicInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_analysis: Option<ContentAnalysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub structure_analysis: Option<StructureAnalysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_opportunities: Option<DataOpportunities>,
}

impl SiteAnalysis {
    pub fn failure(url: &str, error: impl Into<String>) -> Self {
        Self {
            url: url.to_string(),
            success: false,
            error: Some(error.into()),
            status_code: None,
            timestamp: Local::now().format(RESULT_TIMESTAMP_FORMAT).to_string(),
            basic_info: None,
            content_analysis: None,
            structure_analysis: None,
            data_opportunities: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_news_item_defaults() {
        let item = NewsItem::new("Test headline".to_string(), "ITWorld");
        assert_eq!(item.title, "Test headline");
        assert_eq!(item.source, "ITWorld");
        assert!(item.url.is_none());
        assert!(item.tags.is_empty());
        assert_eq!(item.content_length, 0);
        assert!(!item.crawled_at.is_empty());
    }

    #[test]
    fn test_news_item_optional_fields_omitted_from_json() {
        let item = NewsItem::new("Short".to_string(), "ITWorld");
        let json = serde_json::to_string(&item).unwrap();
        assert!(json.contains("\"title\":\"Short\""));
        assert!(!json.contains("\"url\""));
        assert!(!json.contains("\"full_content\""));
        assert!(json.contains("\"content_length\":0"));
    }

    #[test]
    fn test_failure_result_shape() {
        let result = CrawlResult::failure("could not reach the main page");
        assert!(!result.success);
        assert_eq!(
            result.error.as_deref(),
            Some("could not reach the main page")
        );
        assert!(result.news_list.is_empty());
        assert_eq!(result.total_news, 0);
        assert!(!result.timestamp.is_empty());
    }

    #[test]
    fn test_crawl_result_roundtrip() {
        let mut item = NewsItem::new("Roundtrip".to_string(), "ITWorld");
        item.tags = vec!["ai".to_string(), "cloud".to_string()];
        let result = CrawlResult {
            success: true,
            error: None,
            timestamp: "2025-05-06 10:00:00".to_string(),
            source: Some("ITWorld main page".to_string()),
            url: Some("https://www.itworld.co.kr".to_string()),
            pages_crawled: None,
            total_news: 1,
            news_list: vec![item],
            categories: IndexMap::from([("ai".to_string(), 1)]),
            summary: None,
            content_included: false,
        };

        let json = serde_json::to_string(&result).unwrap();
        let back: CrawlResult = serde_json::from_str(&json).unwrap();
        assert!(back.success);
        assert_eq!(back.news_list.len(), 1);
        assert_eq!(back.news_list[0].tags, vec!["ai", "cloud"]);
        assert_eq!(back.categories.get("ai"), Some(&1));
    }

    #[test]
    fn test_categories_preserve_insertion_order_in_json() {
        let categories: IndexMap<String, usize> = IndexMap::from([
            ("security".to_string(), 3),
            ("ai".to_string(), 2),
            ("cloud".to_string(), 1),
        ]);
        let json = serde_json::to_string(&categories).unwrap();
        assert_eq!(json, r#"{"security":3,"ai":2,"cloud":1}"#);
    }

    #[test]
    fn test_site_analysis_failure() {
        let analysis = SiteAnalysis::failure("https://example.com", "timed out");
        assert!(!analysis.success);
        assert_eq!(analysis.error.as_deref(), Some("timed out"));
        assert!(analysis.basic_info.is_none());
        let json = serde_json::to_string(&analysis).unwrap();
        assert!(!json.contains("status_code"));
    }
}
