//! # ITWorld News Crawler
//!
//! A crawler for the ITWorld Korea news site that extracts article teasers
//! from listing pages, recovers their URLs through fuzzy title matching,
//! optionally fetches full article bodies, and renders the aggregated
//! result as console text, JSON, CSV, or an HTML report. A separate mode
//! analyzes the structure of an arbitrary website.
//!
//! ## Usage
//!
//! ```sh
//! itworld_news --main-page --save-json
//! itworld_news -c https://www.itworld.co.kr/ai -p 5 -f --save-html
//! itworld_news --article https://www.itworld.co.kr/article/12345
//! itworld_news --analyze example.com
//! ```
//!
//! ## Architecture
//!
//! 1. **Fetching**: one shared HTTP client with retry and backoff
//! 2. **Extraction**: selector cascades over listing cards, plus a
//!    title-to-URL link index for cards whose title is not itself a link
//! 3. **Aggregation**: title dedup, category histogram, summary statistics
//! 4. **Output**: console renditions and optional JSON/CSV/HTML files

use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod cli;
mod crawler;
mod extract;
mod fetch;
mod models;
mod outputs;
mod utils;

use cli::Cli;
use crawler::analyzer::SiteAnalyzer;
use crawler::news::NewsCrawler;
use models::CrawlResult;
use outputs::{csv, html, json, text};
use utils::truncate_for_log;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("itworld_news starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let mode_count = [
        args.main_page,
        args.category.is_some(),
        args.article.is_some(),
        args.analyze.is_some(),
    ]
    .iter()
    .filter(|selected| **selected)
    .count();
    if mode_count != 1 {
        error!("Exactly one of --main-page, --category, --article, --analyze must be given");
        return Err("exactly one mode flag is required".into());
    }

    if let Some(url) = &args.analyze {
        let analyzer = SiteAnalyzer::new(args.timeout, args.retries)?;
        let analysis = analyzer.analyze(url).await;
        println!("{}", text::format_analysis(&analysis));
    } else if let Some(url) = &args.article {
        let crawler = NewsCrawler::new(args.timeout, args.retries)?;
        let content = crawler.get_article_content(url).await?;
        debug!(body = %truncate_for_log(&content.content, 200), "Fetched article body");
        println!("Title: {}", content.title);
        if !content.author.is_empty() {
            println!("Author: {}", content.author);
        }
        if !content.publish_date.is_empty() {
            println!("Published: {}", content.publish_date);
        }
        if !content.tags.is_empty() {
            println!("Tags: {}", content.tags.join(", "));
        }
        println!(
            "Body ({} chars):\n{}",
            content.content.chars().count(),
            content.content
        );
    } else {
        let crawler = NewsCrawler::new(args.timeout, args.retries)?;
        let result = if args.main_page {
            crawler.crawl_main_page(args.include_content).await
        } else {
            let url = args.category.as_deref().unwrap_or_default();
            crawler
                .crawl_category(url, args.pages, args.include_content)
                .await
        };

        if args.detailed {
            println!("{}", text::format_detailed(&result, args.max_display));
        } else {
            println!("{}", text::format_summary(&result));
        }

        save_outputs(&args, &result).await?;
    }

    info!(elapsed = ?start_time.elapsed(), "itworld_news finished");
    Ok(())
}

/// Write whichever file formats were requested. A failed crawl is still
/// saved as JSON (the failure envelope is useful downstream) but produces
/// no CSV or HTML.
async fn save_outputs(args: &Cli, result: &CrawlResult) -> Result<(), Box<dyn Error>> {
    if args.save_json {
        let path = json::save_result(result, &args.output_dir).await?;
        println!("JSON saved: {}", path.display());
    }
    if !result.success {
        return Ok(());
    }
    if args.save_csv {
        match csv::save_result(result, &args.output_dir).await? {
            Some(path) => println!("CSV saved: {}", path.display()),
            None => println!("CSV skipped: no articles collected"),
        }
    }
    if args.save_html {
        let path = html::save_report(result, &args.output_dir).await?;
        println!("HTML report saved: {}", path.display());
    }
    Ok(())
}
