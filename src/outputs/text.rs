//! Console renditions of crawl results and site analyses.
//!
//! All functions here are pure string builders; callers decide where the
//! text goes. A failed result renders through the same entry points as a
//! successful one.

use crate::models::{CrawlResult, SiteAnalysis};

const WIDE_RULE: &str =
    "================================================================================";
const RULE: &str = "======================================================================";
const THIN_RULE: &str = "------------------------------";

/// Compact report: crawl info, category distribution, summary statistics,
/// and a preview of the first five articles.
pub fn format_summary(result: &CrawlResult) -> String {
    if !result.success {
        return format_error(result);
    }

    let mut out = Vec::new();
    out.push(RULE.to_string());
    out.push("ITWorld news crawl results".to_string());
    out.push(RULE.to_string());
    out.push(String::new());

    out.push("Crawl info".to_string());
    out.push(THIN_RULE.to_string());
    out.push(format!(
        "Source: {}",
        result.source.as_deref().unwrap_or("Unknown")
    ));
    out.push(format!("URL: {}", result.url.as_deref().unwrap_or("N/A")));
    out.push(format!("Collected at: {}", result.timestamp));
    out.push(format!("Total articles: {}", result.total_news));
    if let Some(pages) = result.pages_crawled {
        out.push(format!("Pages crawled: {pages}"));
    }
    out.push(String::new());

    if !result.categories.is_empty() {
        out.push("Category distribution".to_string());
        out.push(THIN_RULE.to_string());
        for (category, count) in result.categories.iter().take(10) {
            out.push(format!("  - {category}: {count}"));
        }
        if result.categories.len() > 10 {
            out.push(format!(
                "  ... and {} more categories",
                result.categories.len() - 10
            ));
        }
        out.push(String::new());
    }

    if let Some(summary) = &result.summary {
        out.push("Summary statistics".to_string());
        out.push(THIN_RULE.to_string());
        out.push(format!("Total articles: {}", summary.total_articles));
        out.push(format!("Articles with images: {}", summary.has_images));
        let latest = if summary.latest_date.is_empty() {
            "N/A"
        } else {
            &summary.latest_date
        };
        out.push(format!("Latest article date: {latest}"));

        if result.content_included {
            let with_content = result
                .news_list
                .iter()
                .filter(|n| n.full_content.is_some())
                .count();
            let total_length: usize = result.news_list.iter().map(|n| n.content_length).sum();
            out.push(format!("Articles with body text: {with_content}"));
            out.push(format!("Total body length: {total_length} chars"));
        }

        if !summary.content_type_distribution.is_empty() {
            out.push("Content types:".to_string());
            for (content_type, count) in &summary.content_type_distribution {
                out.push(format!("  - {content_type}: {count}"));
            }
        }
        out.push(String::new());
    }

    if !result.news_list.is_empty() {
        out.push("Latest news preview (top 5)".to_string());
        out.push(THIN_RULE.to_string());
        for (i, news) in result.news_list.iter().take(5).enumerate() {
            out.push(format!("{}. {}", i + 1, news.title));
            if let Some(content_type) = &news.content_type {
                out.push(format!("   type: {content_type}"));
            }
            if !news.tags.is_empty() {
                let tags: Vec<&str> = news.tags.iter().take(3).map(String::as_str).collect();
                out.push(format!("   tags: {}", tags.join(", ")));
            }
            if let Some(date) = &news.publish_date {
                out.push(format!("   date: {date}"));
            }
            out.push(String::new());
        }
    }

    out.push(RULE.to_string());
    out.join("\n")
}

/// Full per-article listing, capped at `max_articles`.
pub fn format_detailed(result: &CrawlResult, max_articles: usize) -> String {
    if !result.success {
        return format_error(result);
    }
    if result.news_list.is_empty() {
        return "No news collected.".to_string();
    }

    let shown = max_articles.min(result.news_list.len());
    let mut out = Vec::new();
    out.push(WIDE_RULE.to_string());
    out.push(format!("ITWorld news detail listing (top {shown})"));
    out.push(WIDE_RULE.to_string());
    out.push(String::new());

    for (i, news) in result.news_list.iter().take(max_articles).enumerate() {
        out.push(format!("Article #{}", i + 1));
        out.push("--------------------------------------------------".to_string());
        out.push(format!("Title: {}", news.title));
        if let Some(url) = &news.url {
            out.push(format!("URL: {url}"));
        }
        if let Some(content_type) = &news.content_type {
            out.push(format!("Type: {content_type}"));
        }
        if let Some(description) = &news.description {
            out.push(format!("Description: {}", clip(description, 200)));
        }
        if let Some(author) = &news.author {
            out.push(format!("Author: {author}"));
        }
        if let Some(date) = &news.publish_date {
            out.push(format!("Published: {date}"));
        }
        if let Some(read_time) = &news.read_time {
            out.push(format!("Read time: {read_time}"));
        }
        if !news.tags.is_empty() {
            out.push(format!("Tags: {}", news.tags.join(", ")));
        }
        if news.image_url.is_some() {
            out.push("Image: yes".to_string());
        }
        if let Some(content) = &news.full_content {
            if !content.is_empty() {
                out.push(format!("Body (first 300 chars):\n{}", clip(content, 300)));
                out.push(format!("Full body length: {} chars", content.chars().count()));
            }
        }
        out.push(format!("Collected at: {}", news.crawled_at));
        out.push(String::new());
    }

    if result.news_list.len() > max_articles {
        out.push(format!(
            "... {} more articles not shown",
            result.news_list.len() - max_articles
        ));
    }
    out.push(WIDE_RULE.to_string());
    out.join("\n")
}

/// Error banner for a failed crawl.
pub fn format_error(result: &CrawlResult) -> String {
    let mut out = Vec::new();
    out.push(RULE.to_string());
    out.push("News crawl failed".to_string());
    out.push(RULE.to_string());
    out.push(String::new());
    out.push(format!(
        "Error: {}",
        result.error.as_deref().unwrap_or("Unknown error")
    ));
    out.push(format!("Time: {}", result.timestamp));
    out.push(String::new());
    out.push("Suggestions:".to_string());
    out.push("  - Check your network connection".to_string());
    out.push("  - Check that the website is reachable".to_string());
    out.push("  - Try again in a moment".to_string());
    out.push(RULE.to_string());
    out.join("\n")
}

/// Console report for a website analysis.
pub fn format_analysis(analysis: &SiteAnalysis) -> String {
    let mut out = Vec::new();
    out.push(RULE.to_string());
    out.push(format!("Website analysis: {}", analysis.url));
    out.push(RULE.to_string());
    out.push(String::new());

    if !analysis.success {
        out.push(format!(
            "Analysis failed: {}",
            analysis.error.as_deref().unwrap_or("Unknown error")
        ));
        out.push(RULE.to_string());
        return out.join("\n");
    }

    if let Some(status) = analysis.status_code {
        out.push(format!("Status code: {status}"));
    }
    out.push(format!("Analyzed at: {}", analysis.timestamp));
    out.push(String::new());

    if let Some(info) = &analysis.basic_info {
        out.push("Basic info".to_string());
        out.push(THIN_RULE.to_string());
        out.push(format!("Title: {}", info.title));
        out.push(format!("Description: {}", clip(&info.description, 150)));
        out.push(format!("Keywords: {}", clip(&info.keywords, 150)));
        out.push(String::new());
    }

    if let Some(content) = &analysis.content_analysis {
        out.push("Content".to_string());
        out.push(THIN_RULE.to_string());
        out.push(format!(
            "Words: {} total, {} unique",
            content.text_stats.total_words, content.text_stats.unique_words
        ));
        if !content.text_stats.most_common_words.is_empty() {
            let top: Vec<String> = content
                .text_stats
                .most_common_words
                .iter()
                .take(5)
                .map(|(w, c)| format!("{w} ({c})"))
                .collect();
            out.push(format!("Top words: {}", top.join(", ")));
        }
        out.push(format!(
            "Images: {} total, {} with alt text",
            content.media_stats.total_images, content.media_stats.images_with_alt
        ));
        out.push(format!(
            "Links: {} total ({} internal, {} external)",
            content.link_stats.total_links,
            content.link_stats.internal_links,
            content.link_stats.external_links
        ));
        out.push(String::new());
    }

    if let Some(structure) = &analysis.structure_analysis {
        out.push("Structure".to_string());
        out.push(THIN_RULE.to_string());
        let elements = &structure.structural_elements;
        out.push(format!(
            "Tables: {}, forms: {}, lists: {}, headings: {}, paragraphs: {}",
            elements.tables, elements.forms, elements.lists, elements.headings, elements.paragraphs
        ));
        if !structure.tag_distribution.is_empty() {
            let tags: Vec<String> = structure
                .tag_distribution
                .iter()
                .take(10)
                .map(|(tag, count)| format!("{tag} ({count})"))
                .collect();
            out.push(format!("Top tags: {}", tags.join(", ")));
        }
        out.push(String::new());
    }

    if let Some(data) = &analysis.data_opportunities {
        out.push(format!(
            "Data opportunities ({})",
            data.total_opportunities
        ));
        out.push(THIN_RULE.to_string());
        for opportunity in &data.opportunities {
            out.push(format!(
                "  - [{}] {}",
                opportunity.kind, opportunity.description
            ));
        }
        if !data.recommendations.is_empty() {
            out.push("Recommendations:".to_string());
            for recommendation in &data.recommendations {
                out.push(format!("  - {recommendation}"));
            }
        }
        out.push(String::new());
    }

    out.push(RULE.to_string());
    out.join("\n")
}

/// Clip to `max` characters with a trailing ellipsis. Char-boundary safe.
fn clip(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let clipped: String = s.chars().take(max).collect();
        format!("{clipped}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CrawlSummary, NewsItem};
    use indexmap::IndexMap;

    fn sample_result() -> CrawlResult {
        let mut first = NewsItem::new("AI spending keeps climbing".to_string(), "ITWorld");
        first.content_type = Some("news".to_string());
        first.tags = vec!["ai".to_string(), "cloud".to_string()];
        first.publish_date = Some("2025-05-06".to_string());
        first.image_url = Some("https://www.itworld.co.kr/img/a.jpg".to_string());
        let second = NewsItem::new("Kubernetes cost controls".to_string(), "ITWorld");

        CrawlResult {
            success: true,
            error: None,
            timestamp: "2025-05-06 14:30:00".to_string(),
            source: Some("ITWorld main page".to_string()),
            url: Some("https://www.itworld.co.kr".to_string()),
            pages_crawled: None,
            total_news: 2,
            news_list: vec![first, second],
            categories: IndexMap::from([("ai".to_string(), 1), ("cloud".to_string(), 1)]),
            summary: Some(CrawlSummary {
                total_articles: 2,
                date_distribution: IndexMap::from([
                    ("2025-05-06".to_string(), 1),
                    ("Unknown".to_string(), 1),
                ]),
                content_type_distribution: IndexMap::from([
                    ("news".to_string(), 1),
                    ("Unknown".to_string(), 1),
                ]),
                latest_date: "2025-05-06".to_string(),
                has_images: 1,
            }),
            content_included: false,
        }
    }

    #[test]
    fn test_summary_contains_key_sections() {
        let text = format_summary(&sample_result());
        assert!(text.contains("ITWorld news crawl results"));
        assert!(text.contains("Total articles: 2"));
        assert!(text.contains("  - ai: 1"));
        assert!(text.contains("Latest article date: 2025-05-06"));
        assert!(text.contains("1. AI spending keeps climbing"));
    }

    #[test]
    fn test_summary_of_failure_renders_error() {
        let result = CrawlResult::failure("could not reach the main page");
        let text = format_summary(&result);
        assert!(text.contains("News crawl failed"));
        assert!(text.contains("could not reach the main page"));
    }

    #[test]
    fn test_detailed_caps_article_count() {
        let text = format_detailed(&sample_result(), 1);
        assert!(text.contains("Article #1"));
        assert!(!text.contains("Article #2"));
        assert!(text.contains("... 1 more articles not shown"));
    }

    #[test]
    fn test_detailed_empty_list() {
        let mut result = sample_result();
        result.news_list.clear();
        assert_eq!(format_detailed(&result, 10), "No news collected.");
    }

    #[test]
    fn test_clip_respects_char_boundaries() {
        assert_eq!(clip("안녕하세요", 3), "안녕하...");
        assert_eq!(clip("short", 10), "short");
    }

    #[test]
    fn test_format_analysis_failure() {
        let analysis = crate::models::SiteAnalysis::failure("https://x.test", "timed out");
        let text = format_analysis(&analysis);
        assert!(text.contains("Analysis failed: timed out"));
    }
}
