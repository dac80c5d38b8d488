//! Output generation modules for console, JSON, CSV, and HTML formats.
//!
//! This module contains submodules responsible for rendering crawl results:
//!
//! # Submodules
//!
//! - [`text`]: Console renditions — summary, detailed listing, analysis report
//! - [`json`]: Writes the full [`crate::models::CrawlResult`] as pretty JSON
//! - [`csv`]: Flattens the article list into a 14-column CSV
//! - [`html`]: Self-contained HTML report with collapsible article bodies
//!
//! # Output Structure
//!
//! File writers share one dated directory per day and keep at most one file
//! per format in it:
//!
//! ```text
//! data/
//! └── ITWorld_20250506/
//!     ├── itworld_news_20250506_143000.json
//!     ├── itworld_news_20250506_143000.csv
//!     └── itworld_news_report_20250506_143000.html
//! ```

pub mod csv;
pub mod html;
pub mod json;
pub mod text;
