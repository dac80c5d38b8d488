//! JSON output for crawl results.
//!
//! Writes the full [`CrawlResult`] envelope — article list, category
//! histogram, summary — as pretty-printed JSON into the dated data
//! directory, replacing any JSON file from an earlier run the same day.

use std::error::Error;
use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{info, instrument};

use crate::models::CrawlResult;
use crate::utils::{clean_existing_files, ensure_writable_dir, file_timestamp, today_data_dir};

const FILE_PREFIX: &str = "itworld_news_";

/// Write `result` to `{base_dir}/ITWorld_YYYYMMDD/itworld_news_{ts}.json`
/// and return the path.
#[instrument(level = "info", skip(result), fields(base_dir))]
pub async fn save_result(result: &CrawlResult, base_dir: &str) -> Result<PathBuf, Box<dyn Error>> {
    let dir = today_data_dir(base_dir);
    ensure_writable_dir(&dir).await?;
    clean_existing_files(&dir, FILE_PREFIX, "json").await?;

    let path = dir.join(format!("{FILE_PREFIX}{}.json", file_timestamp()));
    write_result(result, &path).await?;
    info!(path = %path.display(), "Wrote JSON output");
    Ok(path)
}

async fn write_result(result: &CrawlResult, path: &Path) -> Result<(), Box<dyn Error>> {
    let json = serde_json::to_string_pretty(result)?;
    fs::write(path, json).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewsItem;

    #[tokio::test]
    async fn test_write_result_roundtrip() {
        let mut result = CrawlResult::failure("unused");
        result.success = true;
        result.error = None;
        result.news_list = vec![NewsItem::new("JSON roundtrip".to_string(), "ITWorld")];
        result.total_news = 1;

        let path = std::env::temp_dir().join(format!("itworld_json_{}.json", std::process::id()));
        write_result(&result, &path).await.unwrap();

        let raw = fs::read_to_string(&path).await.unwrap();
        let back: CrawlResult = serde_json::from_str(&raw).unwrap();
        assert!(back.success);
        assert_eq!(back.news_list[0].title, "JSON roundtrip");
        let _ = fs::remove_file(&path).await;
    }
}
