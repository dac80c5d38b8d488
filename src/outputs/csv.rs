//! CSV output for crawl results.
//!
//! Flattens the article list into one row per article under a fixed
//! 14-column header. Tags are joined with `", "`; absent optional fields
//! become empty cells. Quoting follows RFC 4180: a field is quoted only
//! when it contains a comma, quote, or line break, and embedded quotes are
//! doubled.

use std::error::Error;
use std::fmt::Write as _;
use std::path::PathBuf;

use tokio::fs;
use tracing::{info, instrument, warn};

use crate::models::{CrawlResult, NewsItem};
use crate::utils::{clean_existing_files, ensure_writable_dir, file_timestamp, today_data_dir};

const FILE_PREFIX: &str = "itworld_news_";

const HEADER: [&str; 14] = [
    "title",
    "url",
    "content_type",
    "description",
    "author",
    "publish_date",
    "read_time",
    "tags",
    "image_url",
    "image_alt",
    "full_content",
    "content_length",
    "crawled_at",
    "source",
];

/// Write the article list to `{base_dir}/ITWorld_YYYYMMDD/itworld_news_{ts}.csv`.
///
/// Returns `Ok(None)` without touching the filesystem when the result holds
/// no articles.
#[instrument(level = "info", skip(result), fields(base_dir))]
pub async fn save_result(
    result: &CrawlResult,
    base_dir: &str,
) -> Result<Option<PathBuf>, Box<dyn Error>> {
    if result.news_list.is_empty() {
        warn!("No articles to write; skipping CSV output");
        return Ok(None);
    }

    let dir = today_data_dir(base_dir);
    ensure_writable_dir(&dir).await?;
    clean_existing_files(&dir, FILE_PREFIX, "csv").await?;

    let path = dir.join(format!("{FILE_PREFIX}{}.csv", file_timestamp()));
    fs::write(&path, render(&result.news_list)).await?;
    info!(path = %path.display(), rows = result.news_list.len(), "Wrote CSV output");
    Ok(Some(path))
}

/// Render header plus one row per article.
pub(crate) fn render(news_list: &[NewsItem]) -> String {
    let mut out = String::new();
    write_row(&mut out, HEADER.iter().map(|h| h.to_string()));
    for news in news_list {
        write_row(&mut out, row_fields(news));
    }
    out
}

fn row_fields(news: &NewsItem) -> impl Iterator<Item = String> + '_ {
    let opt = |field: &Option<String>| field.clone().unwrap_or_default();
    [
        news.title.clone(),
        opt(&news.url),
        opt(&news.content_type),
        opt(&news.description),
        opt(&news.author),
        opt(&news.publish_date),
        opt(&news.read_time),
        news.tags.join(", "),
        opt(&news.image_url),
        opt(&news.image_alt),
        opt(&news.full_content),
        news.content_length.to_string(),
        news.crawled_at.clone(),
        news.source.clone(),
    ]
    .into_iter()
}

fn needs_quotes(field: &str) -> bool {
    field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r')
}

fn write_row(out: &mut String, fields: impl Iterator<Item = String>) {
    let mut first = true;
    for field in fields {
        if !first {
            out.push(',');
        } else {
            first = false;
        }
        if needs_quotes(&field) {
            let _ = write!(out, "\"{}\"", field.replace('"', "\"\""));
        } else {
            out.push_str(&field);
        }
    }
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_row() {
        let rendered = render(&[]);
        assert_eq!(
            rendered.lines().next().unwrap(),
            "title,url,content_type,description,author,publish_date,read_time,tags,\
             image_url,image_alt,full_content,content_length,crawled_at,source"
        );
    }

    #[test]
    fn test_row_field_order_and_tag_join() {
        let mut news = NewsItem::new("Plain title".to_string(), "ITWorld");
        news.url = Some("https://www.itworld.co.kr/article/1".to_string());
        news.tags = vec!["ai".to_string(), "cloud".to_string()];
        news.crawled_at = "2025-05-06T14:30:00+09:00".to_string();

        let rendered = render(&[news]);
        let row = rendered.lines().nth(1).unwrap();
        assert_eq!(
            row,
            "Plain title,https://www.itworld.co.kr/article/1,,,,,,\"ai, cloud\",,,,0,\
             2025-05-06T14:30:00+09:00,ITWorld"
        );
    }

    #[test]
    fn test_quoting_commas_quotes_and_newlines() {
        let mut news = NewsItem::new("Hello, \"world\"".to_string(), "ITWorld");
        news.full_content = Some("line one\nline two".to_string());
        news.crawled_at = "t".to_string();

        let rendered = render(&[news]);
        assert!(rendered.contains("\"Hello, \"\"world\"\"\""));
        assert!(rendered.contains("\"line one\nline two\""));
    }

    #[test]
    fn test_row_count_matches_input() {
        let items: Vec<NewsItem> = (0..3)
            .map(|i| {
                let mut n = NewsItem::new(format!("Title {i}"), "ITWorld");
                n.crawled_at = "t".to_string();
                n
            })
            .collect();
        let rendered = render(&items);
        assert_eq!(rendered.lines().count(), 4);
    }
}
