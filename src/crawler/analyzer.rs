//! Generic website analyzer.
//!
//! Unlike the news crawler, which is tuned to one page shape, this module
//! takes any URL and reports what the page is made of: basic metadata, text
//! and link statistics, tag distribution, and "data opportunities" —
//! structural patterns (tables, long lists, repeated CSS classes, forms)
//! that suggest the page carries extractable data.

use std::collections::HashSet;
use std::error::Error;

use chrono::Local;
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use tracing::{info, instrument};

use crate::extract::element_text;
use crate::fetch::Fetcher;
use crate::models::{
    BasicInfo, ContentAnalysis, DataOpportunities, DataOpportunity, LinkStats, MediaStats,
    SiteAnalysis, StructuralElements, StructureAnalysis, TextStats, RESULT_TIMESTAMP_FORMAT,
};

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").unwrap());

/// Analyzer over arbitrary pages; shares the crawler's HTTP transport.
#[derive(Debug)]
pub struct SiteAnalyzer {
    fetcher: Fetcher,
}

impl SiteAnalyzer {
    pub fn new(timeout_secs: u64, max_retries: u32) -> Result<Self, Box<dyn Error>> {
        Ok(Self {
            fetcher: Fetcher::new(timeout_secs, max_retries)?,
        })
    }

    /// Fetch `url` (scheme-less input gets `https://` prepended) and analyze
    /// the returned document. Fetch failure yields a structured failure
    /// value, not an error.
    #[instrument(level = "info", skip(self))]
    pub async fn analyze(&self, url: &str) -> SiteAnalysis {
        let url = if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else {
            format!("https://{url}")
        };
        info!(%url, "Analyzing website");

        let page = match self.fetcher.get(&url).await {
            Ok(page) => page,
            Err(e) => return SiteAnalysis::failure(&url, format!("could not reach the site: {e}")),
        };

        let doc = Html::parse_document(&page.body);
        let analysis = SiteAnalysis {
            url,
            success: true,
            error: None,
            status_code: Some(page.status),
            timestamp: Local::now().format(RESULT_TIMESTAMP_FORMAT).to_string(),
            basic_info: Some(extract_basic_info(&doc)),
            content_analysis: Some(analyze_content(&doc)),
            structure_analysis: Some(analyze_structure(&doc)),
            data_opportunities: Some(identify_data_opportunities(&doc)),
        };
        info!("Website analysis complete");
        analysis
    }
}

/// Page title and meta description/keywords, with explicit "not found"
/// placeholders so the report never shows blanks.
pub(crate) fn extract_basic_info(doc: &Html) -> BasicInfo {
    let title_sel = Selector::parse("title").unwrap();
    let description_sel = Selector::parse(r#"meta[name="description"]"#).unwrap();
    let keywords_sel = Selector::parse(r#"meta[name="keywords"]"#).unwrap();

    let title = doc
        .select(&title_sel)
        .next()
        .map(|t| element_text(&t))
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| "No title found".to_string());
    let description = doc
        .select(&description_sel)
        .next()
        .and_then(|m| m.value().attr("content"))
        .map(str::to_string)
        .unwrap_or_else(|| "No description found".to_string());
    let keywords = doc
        .select(&keywords_sel)
        .next()
        .and_then(|m| m.value().attr("content"))
        .map(str::to_string)
        .unwrap_or_else(|| "No keywords found".to_string());

    BasicInfo {
        title,
        description,
        keywords,
    }
}

/// Word, image, and link statistics over the whole document.
pub(crate) fn analyze_content(doc: &Html) -> ContentAnalysis {
    let text = doc.root_element().text().collect::<Vec<_>>().join(" ");
    let lowered = text.to_lowercase();
    let words: Vec<&str> = WORD.find_iter(&lowered).map(|m| m.as_str()).collect();
    let unique: HashSet<&str> = words.iter().copied().collect();

    let img_sel = Selector::parse("img").unwrap();
    let images: Vec<_> = doc.select(&img_sel).collect();
    let images_with_alt = images
        .iter()
        .filter(|img| img.value().attr("alt").is_some_and(|a| !a.is_empty()))
        .count();

    let link_sel = Selector::parse("a[href]").unwrap();
    let hrefs: Vec<&str> = doc
        .select(&link_sel)
        .filter_map(|a| a.value().attr("href"))
        .collect();
    let internal_links = hrefs.iter().filter(|h| is_internal_link(h)).count();

    ContentAnalysis {
        text_stats: TextStats {
            total_words: words.len(),
            unique_words: unique.len(),
            most_common_words: most_common_words(&words, 10),
        },
        media_stats: MediaStats {
            total_images: images.len(),
            images_with_alt,
        },
        link_stats: LinkStats {
            total_links: hrefs.len(),
            internal_links,
            external_links: hrefs.len() - internal_links,
        },
    }
}

/// Tag distribution (top 15) and counts of the main structural elements.
pub(crate) fn analyze_structure(doc: &Html) -> StructureAnalysis {
    let any_sel = Selector::parse("*").unwrap();
    let mut tag_counts: IndexMap<String, usize> = IndexMap::new();
    for el in doc.select(&any_sel) {
        *tag_counts.entry(el.value().name().to_string()).or_insert(0) += 1;
    }
    tag_counts.sort_by(|_, a, _, b| b.cmp(a));
    tag_counts.truncate(15);

    let count = |selector: &str| {
        let sel = Selector::parse(selector).unwrap();
        doc.select(&sel).count()
    };

    StructureAnalysis {
        tag_distribution: tag_counts,
        structural_elements: StructuralElements {
            tables: count("table"),
            forms: count("form"),
            lists: count("ul, ol"),
            headings: count("h1, h2, h3, h4, h5, h6"),
            paragraphs: count("p"),
        },
    }
}

/// Structural patterns worth scraping: tables, lists with more than three
/// items, CSS classes repeated more than three times, and forms.
pub(crate) fn identify_data_opportunities(doc: &Html) -> DataOpportunities {
    let mut opportunities = Vec::new();

    let table_sel = Selector::parse("table").unwrap();
    let tr_sel = Selector::parse("tr").unwrap();
    let th_sel = Selector::parse("th").unwrap();
    let td_sel = Selector::parse("td").unwrap();
    for (i, table) in doc.select(&table_sel).enumerate() {
        let rows = table.select(&tr_sel).count();
        let mut cols = table.select(&th_sel).count();
        if cols == 0 {
            cols = table.select(&td_sel).count();
        }
        if rows > 0 && cols > 0 {
            opportunities.push(DataOpportunity {
                kind: "table".to_string(),
                description: format!("Table #{} ({} rows x {} cols)", i + 1, rows, cols),
                potential_data: "structured tabular data".to_string(),
            });
        }
    }

    let list_sel = Selector::parse("ul, ol").unwrap();
    let li_sel = Selector::parse("li").unwrap();
    for (i, list) in doc.select(&list_sel).enumerate() {
        let items = list.select(&li_sel).count();
        if items > 3 {
            opportunities.push(DataOpportunity {
                kind: "list".to_string(),
                description: format!("List #{} ({} items)", i + 1, items),
                potential_data: "list-style data".to_string(),
            });
        }
    }

    for (class, count) in find_repeated_classes(doc) {
        if count > 3 {
            opportunities.push(DataOpportunity {
                kind: "repeated_pattern".to_string(),
                description: format!("Repeated pattern: .{class} ({count} elements)"),
                potential_data: "repeated structured content".to_string(),
            });
        }
    }

    let form_sel = Selector::parse("form").unwrap();
    let input_sel = Selector::parse("input, select, textarea").unwrap();
    for (i, form) in doc.select(&form_sel).enumerate() {
        let inputs = form.select(&input_sel).count();
        if inputs > 0 {
            opportunities.push(DataOpportunity {
                kind: "form".to_string(),
                description: format!("Form #{} ({} input fields)", i + 1, inputs),
                potential_data: "user input structure".to_string(),
            });
        }
    }

    let recommendations = generate_recommendations(&opportunities);
    DataOpportunities {
        total_opportunities: opportunities.len(),
        opportunities,
        recommendations,
    }
}

/// Most frequent words longer than two characters, descending; ties keep
/// first-seen order.
fn most_common_words(words: &[&str], limit: usize) -> Vec<(String, usize)> {
    let mut counts: IndexMap<&str, usize> = IndexMap::new();
    for word in words {
        if word.chars().count() > 2 {
            *counts.entry(word).or_insert(0) += 1;
        }
    }
    counts.sort_by(|_, a, _, b| b.cmp(a));
    counts
        .into_iter()
        .take(limit)
        .map(|(w, c)| (w.to_string(), c))
        .collect()
}

fn is_internal_link(href: &str) -> bool {
    if href.is_empty() {
        return false;
    }
    href.starts_with('/') || href.starts_with('#') || !href.starts_with("http")
}

/// Class name → occurrence count for classes appearing more than once,
/// in first-seen order.
fn find_repeated_classes(doc: &Html) -> IndexMap<String, usize> {
    let class_sel = Selector::parse("[class]").unwrap();
    let mut counts: IndexMap<String, usize> = IndexMap::new();
    for el in doc.select(&class_sel) {
        for class in el.value().classes() {
            *counts.entry(class.to_string()).or_insert(0) += 1;
        }
    }
    counts.retain(|_, count| *count > 1);
    counts
}

fn generate_recommendations(opportunities: &[DataOpportunity]) -> Vec<String> {
    let count_of = |kind: &str| opportunities.iter().filter(|o| o.kind == kind).count();
    let mut recommendations = Vec::new();

    let tables = count_of("table");
    if tables > 0 {
        recommendations.push(format!(
            "{tables} table(s) found; well suited to structured data extraction."
        ));
    }
    let lists = count_of("list");
    if lists > 0 {
        recommendations.push(format!(
            "{lists} list(s) found; list data collection is possible."
        ));
    }
    let patterns = count_of("repeated_pattern");
    if patterns > 0 {
        recommendations.push(format!(
            "{patterns} repeated pattern(s) found; favorable for bulk collection."
        ));
    }
    if opportunities.is_empty() {
        recommendations
            .push("No obvious data patterns found; consider plain text extraction.".to_string());
    }

    recommendations
}
