//! Command-line interface definitions for the ITWorld news crawler.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Exactly one mode flag selects what to do; the remaining options tune the
//! crawl and pick output formats.

use clap::Parser;

/// Command-line arguments for the crawler.
///
/// # Examples
///
/// ```sh
/// # Crawl the main page and print a summary
/// itworld_news --main-page
///
/// # Crawl a category, 5 pages, with article bodies, saving everything
/// itworld_news -c https://www.itworld.co.kr/ai -p 5 -f \
///     --save-json --save-csv --save-html
///
/// # Analyze an arbitrary site
/// itworld_news --analyze example.com
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Crawl the ITWorld main page
    #[arg(short, long)]
    pub main_page: bool,

    /// Crawl a category listing at this URL
    #[arg(short, long, value_name = "URL")]
    pub category: Option<String>,

    /// Number of listing pages to crawl in category mode
    #[arg(short, long, default_value_t = 3)]
    pub pages: u32,

    /// Also fetch the full body of each collected article
    #[arg(short = 'f', long)]
    pub include_content: bool,

    /// Fetch and display a single article at this URL
    #[arg(long, value_name = "URL")]
    pub article: Option<String>,

    /// Analyze an arbitrary website's structure at this URL
    #[arg(long, value_name = "URL")]
    pub analyze: Option<String>,

    /// Save the crawl result as JSON
    #[arg(long)]
    pub save_json: bool,

    /// Save the article list as CSV
    #[arg(long)]
    pub save_csv: bool,

    /// Save an HTML report
    #[arg(long)]
    pub save_html: bool,

    /// Print the detailed per-article listing instead of the summary
    #[arg(short, long)]
    pub detailed: bool,

    /// Maximum number of articles in the detailed listing
    #[arg(short = 'n', long, default_value_t = 10)]
    pub max_display: usize,

    /// HTTP request timeout in seconds
    #[arg(short, long, default_value_t = 15)]
    pub timeout: u64,

    /// Maximum fetch attempts per request
    #[arg(long, default_value_t = 3)]
    pub retries: u32,

    /// Base directory for saved output
    #[arg(short, long, default_value = "./data")]
    pub output_dir: String,
}
