//! Crawl and analysis engines.
//!
//! # Submodules
//!
//! - [`news`]: the ITWorld news crawler — link indexing, card extraction with
//!   selector cascades, title→URL matching, dedup, summary statistics, and
//!   optional full-content collection
//! - [`analyzer`]: the generic website analyzer — text/link/media statistics,
//!   structure breakdown, and data-opportunity detection for an arbitrary page
//!
//! Both engines share the [`crate::fetch::Fetcher`] transport and keep all
//! requests strictly sequential. During bulk content collection a fixed
//! one-second pause is inserted between requests to avoid hammering the
//! origin server.

pub mod analyzer;
pub mod news;
