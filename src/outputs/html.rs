//! Self-contained HTML report for crawl results.
//!
//! Produces a single file with inline CSS and a small script: a header,
//! stat boxes, the top categories, and one block per article. Articles with
//! collected body text get a preview and a click-to-expand full view. All
//! interpolated page data is HTML-escaped.

use std::error::Error;
use std::fmt::Write as _;
use std::path::PathBuf;

use chrono::Local;
use tokio::fs;
use tracing::{info, instrument};

use crate::models::{CrawlResult, NewsItem};
use crate::utils::{clean_existing_files, ensure_writable_dir, file_timestamp, today_data_dir};

const FILE_PREFIX: &str = "itworld_news_report_";

const STYLE: &str = r#"
        body { font-family: 'Malgun Gothic', Arial, sans-serif; margin: 40px; line-height: 1.6; background-color: #f8f9fa; }
        .header { background: #2c3e50; color: white; padding: 20px; border-radius: 8px; margin-bottom: 30px; text-align: center; }
        .summary { background: #ffffff; padding: 20px; border-radius: 8px; margin-bottom: 30px; box-shadow: 0 2px 4px rgba(0,0,0,0.1); }
        .news-item { border: 1px solid #ddd; margin-bottom: 20px; padding: 20px; border-radius: 8px; background: white; box-shadow: 0 1px 3px rgba(0,0,0,0.1); }
        .news-title { font-size: 1.3em; font-weight: bold; color: #2c3e50; margin-bottom: 10px; }
        .news-meta { color: #7f8c8d; font-size: 0.9em; margin-bottom: 10px; }
        .news-description { margin-bottom: 10px; color: #34495e; }
        .news-content { margin-top: 15px; padding: 15px; background: #f8f9fa; border-radius: 5px; }
        .tags { margin-top: 10px; }
        .tag { background: #3498db; color: white; padding: 3px 8px; border-radius: 3px; font-size: 0.8em; margin-right: 5px; }
        .stats { display: flex; justify-content: space-between; margin-bottom: 20px; flex-wrap: wrap; }
        .stat-box { background: white; border: 1px solid #ddd; padding: 15px; border-radius: 8px; text-align: center; flex: 1; margin: 5px; min-width: 150px; }
        .stat-number { font-size: 2em; font-weight: bold; color: #2c3e50; }
        .stat-label { color: #7f8c8d; font-size: 0.9em; }
        a { color: #3498db; text-decoration: none; }
        a:hover { text-decoration: underline; }
        .content-toggle { cursor: pointer; color: #3498db; font-size: 0.9em; margin-top: 10px; }
        .content-toggle:hover { text-decoration: underline; }
        .full-content { display: none; max-height: 300px; overflow-y: auto; }
"#;

const SCRIPT: &str = r#"
        function toggleContent(id) {
            var content = document.getElementById('content-' + id);
            var toggle = document.getElementById('toggle-' + id);
            if (content.style.display === 'block') {
                content.style.display = 'none';
                toggle.textContent = 'Show full body';
            } else {
                content.style.display = 'block';
                toggle.textContent = 'Hide full body';
            }
        }
"#;

/// Write the report to
/// `{base_dir}/ITWorld_YYYYMMDD/itworld_news_report_{ts}.html`.
#[instrument(level = "info", skip(result), fields(base_dir))]
pub async fn save_report(result: &CrawlResult, base_dir: &str) -> Result<PathBuf, Box<dyn Error>> {
    let dir = today_data_dir(base_dir);
    ensure_writable_dir(&dir).await?;
    clean_existing_files(&dir, FILE_PREFIX, "html").await?;

    let path = dir.join(format!("{FILE_PREFIX}{}.html", file_timestamp()));
    fs::write(&path, render(result)).await?;
    info!(path = %path.display(), "Wrote HTML report");
    Ok(path)
}

pub(crate) fn render(result: &CrawlResult) -> String {
    let mut html = String::new();
    let today = Local::now().format("%Y-%m-%d");

    let _ = write!(
        html,
        r#"<!DOCTYPE html>
<html lang="ko">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>ITWorld news report - {today}</title>
    <style>{STYLE}</style>
    <script>{SCRIPT}</script>
</head>
<body>
    <div class="header">
        <h1>ITWorld news report</h1>
        <p>Collected: {timestamp}</p>
        <p>Source: {source}</p>
    </div>
"#,
        timestamp = escape(&result.timestamp),
        source = escape(result.source.as_deref().unwrap_or("N/A")),
    );

    html.push_str("    <div class=\"summary\">\n        <h2>Collection summary</h2>\n        <div class=\"stats\">\n");
    let (has_images, latest_date) = match &result.summary {
        Some(summary) => (
            summary.has_images,
            if summary.latest_date.is_empty() {
                "N/A".to_string()
            } else {
                summary.latest_date.clone()
            },
        ),
        None => (0, "N/A".to_string()),
    };
    stat_box(&mut html, &result.total_news.to_string(), "Total articles");
    stat_box(&mut html, &has_images.to_string(), "With images");
    stat_box(&mut html, &result.categories.len().to_string(), "Categories");
    stat_box(&mut html, &escape(&latest_date), "Latest date");

    if result.content_included {
        let with_content = result
            .news_list
            .iter()
            .filter(|n| n.full_content.is_some())
            .count();
        let total_length: usize = result.news_list.iter().map(|n| n.content_length).sum();
        stat_box(&mut html, &with_content.to_string(), "Bodies collected");
        stat_box(&mut html, &total_length.to_string(), "Total body chars");
    }
    html.push_str("        </div>\n");

    if !result.categories.is_empty() {
        html.push_str("        <h3>Top categories</h3>\n        <p>");
        for (category, count) in result.categories.iter().take(10) {
            let _ = write!(
                html,
                "<span class=\"tag\">{} ({count})</span>",
                escape(category)
            );
        }
        html.push_str("</p>\n");
    }
    html.push_str("    </div>\n\n    <h2>Articles</h2>\n");

    for (i, news) in result.news_list.iter().enumerate() {
        article_block(&mut html, i, news);
    }

    html.push_str("</body>\n</html>\n");
    html
}

fn stat_box(html: &mut String, number: &str, label: &str) {
    let _ = write!(
        html,
        "            <div class=\"stat-box\">\n                <div class=\"stat-number\">{number}</div>\n                <div class=\"stat-label\">{label}</div>\n            </div>\n"
    );
}

fn article_block(html: &mut String, index: usize, news: &NewsItem) {
    let url = news.url.as_deref().unwrap_or("#");
    let mut meta: Vec<String> = Vec::new();
    if let Some(content_type) = &news.content_type {
        meta.push(escape(content_type));
    }
    if let Some(date) = &news.publish_date {
        meta.push(escape(date));
    }
    if let Some(author) = &news.author {
        meta.push(escape(author));
    }
    if news.content_length > 0 {
        meta.push(format!("{} chars", news.content_length));
    }

    let _ = write!(
        html,
        r#"    <div class="news-item">
        <div class="news-title">
            <a href="{url}" target="_blank">{title}</a>
        </div>
        <div class="news-meta">{meta}</div>
"#,
        url = escape(url),
        title = escape(&news.title),
        meta = meta.join(" | "),
    );

    if let Some(description) = &news.description {
        let _ = write!(
            html,
            "        <div class=\"news-description\">{}</div>\n",
            escape(description)
        );
    }

    html.push_str("        <div class=\"tags\">");
    for tag in &news.tags {
        let _ = write!(html, "<span class=\"tag\">{}</span>", escape(tag));
    }
    html.push_str("</div>\n");

    if let Some(content) = news.full_content.as_deref().filter(|c| !c.is_empty()) {
        let preview: String = content.chars().take(200).collect();
        let ellipsis = if content.chars().count() > 200 { "..." } else { "" };
        let _ = write!(
            html,
            r#"        <div class="news-content">
            <strong>Body preview:</strong><br>
            {preview}{ellipsis}
            <div class="content-toggle" id="toggle-{index}" onclick="toggleContent({index})">Show full body</div>
            <div class="full-content" id="content-{index}">
                <hr>
                <strong>Full body:</strong><br>
                {full}
            </div>
        </div>
"#,
            preview = escape(&preview),
            full = escape(content).replace('\n', "<br>"),
        );
    }

    html.push_str("    </div>\n");
}

/// Escape the five HTML metacharacters.
fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    fn sample_result() -> CrawlResult {
        let mut news = NewsItem::new("Tags <b>& more</b>".to_string(), "ITWorld");
        news.url = Some("https://www.itworld.co.kr/article/1".to_string());
        news.description = Some("A \"quoted\" teaser".to_string());
        news.tags = vec!["ai".to_string()];
        news.full_content = Some("First line\nSecond line".to_string());
        news.content_length = 22;

        CrawlResult {
            success: true,
            error: None,
            timestamp: "2025-05-06 14:30:00".to_string(),
            source: Some("ITWorld main page".to_string()),
            url: Some("https://www.itworld.co.kr".to_string()),
            pages_crawled: None,
            total_news: 1,
            news_list: vec![news],
            categories: IndexMap::from([("ai".to_string(), 1)]),
            summary: None,
            content_included: true,
        }
    }

    #[test]
    fn test_render_escapes_untrusted_text() {
        let html = render(&sample_result());
        assert!(html.contains("Tags &lt;b&gt;&amp; more&lt;/b&gt;"));
        assert!(html.contains("A &quot;quoted&quot; teaser"));
        assert!(!html.contains("Tags <b>"));
    }

    #[test]
    fn test_render_includes_toggle_for_body() {
        let html = render(&sample_result());
        assert!(html.contains("toggleContent(0)"));
        assert!(html.contains("id=\"content-0\""));
        assert!(html.contains("First line<br>Second line"));
    }

    #[test]
    fn test_render_without_body_has_no_toggle() {
        let mut result = sample_result();
        result.news_list[0].full_content = None;
        result.content_included = false;
        let html = render(&result);
        assert!(!html.contains("content-toggle\" id="));
    }

    #[test]
    fn test_stat_boxes_present() {
        let html = render(&sample_result());
        assert!(html.contains("Total articles"));
        assert!(html.contains("Bodies collected"));
        assert!(html.contains("Latest date"));
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("a&b<c>'d'\"e\""), "a&amp;b&lt;c&gt;&#39;d&#39;&quot;e&quot;");
    }
}
