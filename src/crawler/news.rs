//! ITWorld news crawler.
//!
//! The listing pages are card-based: each article teaser is a `div.card`
//! subtree, but the card itself rarely carries its own link. Destination URLs
//! are recovered in two passes: first every `/article/` anchor on the page is
//! collected into a title→URL index, then each extracted card title is
//! matched against that index — exactly first, falling back to a three-word
//! prefix match.
//!
//! Field extraction runs through selector cascades: an ordered list of
//! candidates per field where the first hit wins and a miss simply leaves the
//! field empty. Only a missing title discards a card.

use std::error::Error;
use std::time::Duration;

use chrono::Local;
use indexmap::IndexMap;
use itertools::Itertools;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::extract::{
    element_text, normalize_title, parse_any_date, parse_author, parse_card_date, parse_read_time,
};
use crate::fetch::Fetcher;
use crate::models::{
    ArticleContent, CrawlResult, CrawlSummary, NewsItem, RESULT_TIMESTAMP_FORMAT,
};

/// Homepage of the target site; article hrefs resolve against this.
pub const DEFAULT_BASE_URL: &str = "https://www.itworld.co.kr";

/// Source label stamped on every extracted item.
const SOURCE_LABEL: &str = "ITWorld";

/// Minimum spacing between consecutive requests during bulk collection.
/// Politeness policy toward the origin server; do not remove.
const REQUEST_DELAY: Duration = Duration::from_secs(1);

/// Mapping from normalized title to absolute article URL, in discovery
/// order. Later links with the same key overwrite earlier ones.
pub type LinkIndex = IndexMap<String, String>;

static CARD_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("div.card").unwrap());
static ARTICLE_LINK_SEL: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"a[href*="/article/"]"#).unwrap());
static CONTENT_ROW_SEL: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.content-row-article").unwrap());
static ROW_MAIN_CARD_SEL: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.content-row-article__main div.card").unwrap());
static ROW_SECONDARY_CARD_SEL: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.content-row-article__secondary div.card").unwrap());
static INFO_SEL: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"div[class*="info"], span[class*="info"]"#).unwrap());
static IMG_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("img").unwrap());

/// Card field cascades, in candidate order. First hit wins.
const CARD_TITLE_SELECTORS: &[&str] = &["h3.card__title", "div.card__title"];
const CARD_HEADING_FALLBACKS: &[&str] = &["h2", "h3", "h4"];
const CONTENT_TYPE_SELECTORS: &[&str] = &[
    "span.card__content-type",
    "div.card__content-type",
    ".content-type",
    ".post-type",
];
const DESCRIPTION_SELECTORS: &[&str] = &[
    "p.card__description",
    "div.card__description",
    ".description",
    ".excerpt",
    "p",
];
const TAG_SELECTORS: &[&str] = &["div.card__tags span.tag", ".tags .tag", ".category", ".topic"];

/// Article-page cascades used by full-content collection.
const ARTICLE_TITLE_SELECTORS: &[&str] = &[
    "h1.article-title",
    "h1.post-title",
    ".article-header h1",
    ".content-header h1",
    "h1",
    ".page-title h1",
];
const BODY_CONTAINER_SELECTORS: &[&str] = &[
    ".article-content",
    ".post-content",
    ".content-body",
    ".article-body",
    ".story-body",
    r#"[data-module="ArticleBody"]"#,
    ".entry-content",
    "article .content",
    ".main-content",
];
const ARTICLE_AUTHOR_SELECTORS: &[&str] = &[
    ".article-author",
    ".author-name",
    ".byline .author",
    ".post-author",
    r#"[rel="author"]"#,
];
const ARTICLE_DATE_SELECTORS: &[&str] = &[
    ".article-date",
    ".publish-date",
    ".post-date",
    "time[datetime]",
    ".date-published",
];
const ARTICLE_TAG_SELECTORS: &[&str] =
    &[".article-tags a", ".post-categories a", ".tags a", ".category a"];

/// Elements excluded from body text: boilerplate by tag name or class.
const BOILERPLATE_TAGS: &[&str] = &["script", "style", "aside", "nav", "footer"];
const BOILERPLATE_CLASSES: &[&str] =
    &["advertisement", "ad", "social-share", "related-articles", "comments"];

/// Paragraphs containing any of these markers are dropped as sponsored text.
const AD_MARKERS: &[&str] = &["advertisement", "광고", "sponsored", "후원"];

/// The crawl engine. Holds the shared HTTP client and the site base URL;
/// all requests are sequential.
#[derive(Debug)]
pub struct NewsCrawler {
    base_url: Url,
    fetcher: Fetcher,
}

impl NewsCrawler {
    pub fn new(timeout_secs: u64, max_retries: u32) -> Result<Self, Box<dyn Error>> {
        Ok(Self {
            base_url: Url::parse(DEFAULT_BASE_URL)?,
            fetcher: Fetcher::new(timeout_secs, max_retries)?,
        })
    }

    /// Crawl the main page: build the link index, extract cards from the main
    /// grid and the additional content rows, dedup by title, and aggregate.
    ///
    /// With `include_content` the deduplicated articles' bodies are fetched
    /// one by one afterwards.
    #[instrument(level = "info", skip(self))]
    pub async fn crawl_main_page(&self, include_content: bool) -> CrawlResult {
        info!(url = %self.base_url, "Crawling main page news");

        let page = match self.fetcher.get(self.base_url.as_str()).await {
            Ok(page) => page,
            Err(e) => {
                return CrawlResult::failure(format!("could not reach the main page: {e}"));
            }
        };

        // Parse scope: Html is not kept across await points.
        let news_list = {
            let doc = Html::parse_document(&page.body);
            let links = self.build_link_index(&doc);
            self.collect_from_document(&doc, &links)
        };

        let mut unique = dedupe_by_title(news_list);
        if include_content {
            self.collect_article_contents(&mut unique).await;
        }

        let categories = extract_categories(&unique);
        let summary = generate_summary(&unique);
        info!(count = unique.len(), "Main page crawl complete");

        CrawlResult {
            success: true,
            error: None,
            timestamp: Local::now().format(RESULT_TIMESTAMP_FORMAT).to_string(),
            source: Some(format!("{SOURCE_LABEL} main page")),
            url: Some(self.base_url.to_string()),
            pages_crawled: None,
            total_news: unique.len(),
            news_list: unique,
            categories,
            summary,
            content_included: include_content,
        }
    }

    /// Crawl a category listing over up to `max_pages` pages
    /// (`?page=N` from the second page on), pausing between pages.
    ///
    /// Stops early when a page fetch fails or a page carries no cards;
    /// whatever was collected up to that point is still returned.
    #[instrument(level = "info", skip(self), fields(url = category_url))]
    pub async fn crawl_category(
        &self,
        category_url: &str,
        max_pages: u32,
        include_content: bool,
    ) -> CrawlResult {
        info!(max_pages, "Crawling category news");

        let mut all_news: Vec<NewsItem> = Vec::new();
        let mut pages_crawled = 0u32;

        for page_no in 1..=max_pages.max(1) {
            let page_url = if page_no > 1 {
                format!("{category_url}?page={page_no}")
            } else {
                category_url.to_string()
            };

            // Counts the attempted page even when its fetch fails.
            pages_crawled = page_no;

            let page = match self.fetcher.get(&page_url).await {
                Ok(page) => page,
                Err(e) => {
                    warn!(page = page_no, error = %e, "Category page fetch failed; stopping");
                    break;
                }
            };

            let (card_count, mut page_items) = {
                let doc = Html::parse_document(&page.body);
                let links = self.build_link_index(&doc);
                let cards: Vec<ElementRef> = doc.select(&CARD_SEL).collect();
                let items: Vec<NewsItem> = cards
                    .iter()
                    .filter_map(|card| self.extract_news_from_card(card, &links))
                    .collect();
                (cards.len(), items)
            };

            if card_count == 0 {
                warn!(page = page_no, "No news cards on category page; stopping");
                break;
            }
            debug!(page = page_no, cards = card_count, extracted = page_items.len(), "Category page processed");
            all_news.append(&mut page_items);

            sleep(REQUEST_DELAY).await;
        }

        let mut unique = dedupe_by_title(all_news);
        if include_content {
            self.collect_article_contents(&mut unique).await;
        }

        let categories = extract_categories(&unique);
        let summary = generate_summary(&unique);
        info!(count = unique.len(), pages = pages_crawled, "Category crawl complete");

        CrawlResult {
            success: true,
            error: None,
            timestamp: Local::now().format(RESULT_TIMESTAMP_FORMAT).to_string(),
            source: Some(format!("{SOURCE_LABEL} category")),
            url: Some(category_url.to_string()),
            pages_crawled: Some(pages_crawled),
            total_news: unique.len(),
            news_list: unique,
            categories,
            summary,
            content_included: include_content,
        }
    }

    /// Fetch one article page and extract its full content fields.
    pub async fn get_article_content(
        &self,
        article_url: &str,
    ) -> Result<ArticleContent, Box<dyn Error>> {
        let page = self.fetcher.get(article_url).await?;
        let doc = Html::parse_document(&page.body);
        Ok(self.extract_article_content(&doc, article_url))
    }

    /// Scan the document for `/article/` anchors and build the title→URL
    /// index. Anchor text of 10 characters or fewer is skipped (icon-only
    /// and "read more" links); keys are normalized titles; collisions are
    /// last-write-wins.
    pub(crate) fn build_link_index(&self, doc: &Html) -> LinkIndex {
        let mut links = LinkIndex::new();
        for anchor in doc.select(&ARTICLE_LINK_SEL) {
            let Some(href) = anchor.value().attr("href") else {
                continue;
            };
            let text = element_text(&anchor);
            if text.chars().count() <= 10 {
                continue;
            }
            if let Ok(absolute) = self.base_url.join(href) {
                links.insert(normalize_title(&text), absolute.to_string());
            }
        }
        info!(count = links.len(), "Built title-to-URL link index");
        links
    }

    /// Extract cards from the main grid, then from the per-row main and
    /// secondary sections, skipping titles already collected.
    pub(crate) fn collect_from_document(&self, doc: &Html, links: &LinkIndex) -> Vec<NewsItem> {
        let mut news_list: Vec<NewsItem> = Vec::new();

        for (i, card) in doc.select(&CARD_SEL).enumerate() {
            if let Some(item) = self.extract_news_from_card(&card, links) {
                debug!(index = i + 1, title = %item.title, "Extracted news card");
                news_list.push(item);
            }
        }

        for row in doc.select(&CONTENT_ROW_SEL) {
            let main_card = row.select(&ROW_MAIN_CARD_SEL).next();
            let secondary_cards = row.select(&ROW_SECONDARY_CARD_SEL);
            for card in main_card.into_iter().chain(secondary_cards) {
                if let Some(item) = self.extract_news_from_card(&card, links) {
                    if !news_list.iter().any(|n| n.title == item.title) {
                        news_list.push(item);
                    }
                }
            }
        }

        news_list
    }

    /// Extract one article record from a card subtree. Returns `None` when
    /// no title can be found — the subtree is not a real article card.
    pub(crate) fn extract_news_from_card(
        &self,
        card: &ElementRef,
        links: &LinkIndex,
    ) -> Option<NewsItem> {
        let title = cascade_first_text(card, CARD_TITLE_SELECTORS, None).or_else(|| {
            CARD_HEADING_FALLBACKS.iter().find_map(|tag| {
                let sel = Selector::parse(tag).unwrap();
                card.select(&sel).next().map(|h| element_text(&h)).filter(|t| t.chars().count() > 10)
            })
        })?;

        let mut item = NewsItem::new(title, SOURCE_LABEL);

        let key = normalize_title(&item.title);
        match match_title_to_url(&key, links) {
            Some(url) => {
                debug!(title = %item.title, %url, "Matched card title to link index");
                item.url = Some(url);
            }
            None => debug!(title = %item.title, "No link index match for card title"),
        }

        item.content_type = cascade_first_text(card, CONTENT_TYPE_SELECTORS, None);
        item.description = cascade_first_text(card, DESCRIPTION_SELECTORS, Some(20));
        item.tags = cascade_tags(card, TAG_SELECTORS);

        // Date, read time, and byline live in loosely "info"-classed
        // elements; later matches overwrite earlier ones.
        for info in card.select(&INFO_SEL) {
            let text = element_text(&info);
            if let Some(date) = parse_card_date(&text) {
                item.publish_date = Some(date);
            }
            if let Some(read_time) = parse_read_time(&text) {
                item.read_time = Some(read_time);
            }
            if text.contains("By") {
                if let Some(author) = parse_author(&text) {
                    item.author = Some(author);
                }
            }
        }

        // Fall back to the card's full text for anything still missing.
        if item.publish_date.is_none() || item.author.is_none() {
            let card_text = element_text(card);
            if item.publish_date.is_none() {
                item.publish_date = parse_card_date(&card_text);
            }
            if item.author.is_none() {
                item.author = parse_author(&card_text);
            }
        }

        if let Some(img) = card.select(&IMG_SEL).next() {
            // Lazy-loading leaves src empty and parks the real URL in
            // data-src, so an empty src counts as absent.
            let src = img
                .value()
                .attr("src")
                .filter(|s| !s.is_empty())
                .or_else(|| img.value().attr("data-src"))
                .filter(|s| !s.is_empty());
            if let Some(src) = src {
                if let Ok(absolute) = self.base_url.join(src) {
                    item.image_url = Some(absolute.to_string());
                    item.image_alt = Some(img.value().attr("alt").unwrap_or("").to_string());
                }
            }
        }

        Some(item)
    }

    /// Fetch each article's body sequentially, pausing [`REQUEST_DELAY`]
    /// between requests. Items without a URL are skipped; a failed fetch
    /// leaves that one item with empty content and moves on.
    async fn collect_article_contents(&self, news_list: &mut [NewsItem]) {
        info!(count = news_list.len(), "Collecting full article contents");
        let total = news_list.len();

        for (i, news) in news_list.iter_mut().enumerate() {
            let Some(url) = news.url.clone() else {
                warn!(index = i + 1, title = %news.title, "No URL; cannot fetch article body");
                continue;
            };

            debug!(index = i + 1, total, title = %news.title, "Fetching article content");
            let fetched = self.get_article_content(&url).await;
            apply_article_content(news, fetched);

            sleep(REQUEST_DELAY).await;
        }
    }

    /// Extract title, body, author, date, and tags from an article page.
    ///
    /// Body extraction tries the known container selectors first, excluding
    /// boilerplate subtrees; when none yields text it falls back to `<main>`
    /// or `<article>` (else the whole document) and takes at most the first
    /// ten paragraphs longer than 50 characters.
    pub(crate) fn extract_article_content(&self, doc: &Html, article_url: &str) -> ArticleContent {
        let root = doc.root_element();
        let mut content = ArticleContent {
            url: article_url.to_string(),
            crawled_at: Local::now().to_rfc3339(),
            ..ArticleContent::default()
        };

        content.title = cascade_first_text(&root, ARTICLE_TITLE_SELECTORS, None).unwrap_or_default();
        content.content = extract_body_text(&root);
        content.author =
            cascade_first_text(&root, ARTICLE_AUTHOR_SELECTORS, None).unwrap_or_default();

        for selector in ARTICLE_DATE_SELECTORS {
            let sel = Selector::parse(selector).unwrap();
            if let Some(el) = root.select(&sel).next() {
                let date_text = el
                    .value()
                    .attr("datetime")
                    .map(str::to_string)
                    .unwrap_or_else(|| element_text(&el));
                if let Some(date) = parse_any_date(&date_text) {
                    content.publish_date = date;
                    break;
                }
            }
        }

        content.tags = cascade_tags(&root, ARTICLE_TAG_SELECTORS);
        content
    }
}

/// Merge a per-article fetch outcome into its listing item. A failure
/// degrades to empty content with `content_length` 0 — never an error.
pub(crate) fn apply_article_content(
    news: &mut NewsItem,
    fetched: Result<ArticleContent, Box<dyn Error>>,
) {
    match fetched {
        Ok(content) => {
            news.content_length = content.content.chars().count();
            if news.author.is_none() && !content.author.is_empty() {
                news.author = Some(content.author);
            }
            if news.publish_date.is_none() && !content.publish_date.is_empty() {
                news.publish_date = Some(content.publish_date);
            }
            info!(title = %news.title, chars = news.content_length, "Collected article content");
            news.full_content = Some(content.content);
        }
        Err(e) => {
            warn!(title = %news.title, error = %e, "Content fetch failed; leaving content empty");
            news.full_content = Some(String::new());
            news.content_length = 0;
        }
    }
}

/// Resolve a normalized title against the link index: exact key first, then
/// — for titles of at least three words — the first indexed title containing
/// all of the query's first three words, in index insertion order.
pub(crate) fn match_title_to_url(clean_title: &str, links: &LinkIndex) -> Option<String> {
    if let Some(url) = links.get(clean_title) {
        return Some(url.clone());
    }

    let words: Vec<&str> = clean_title.split_whitespace().collect();
    if words.len() >= 3 {
        for (key, url) in links {
            if words[..3].iter().all(|w| key.contains(w)) {
                return Some(url.clone());
            }
        }
    }

    None
}

/// First-seen-wins dedup by literal title equality, order preserved.
pub(crate) fn dedupe_by_title(news_list: Vec<NewsItem>) -> Vec<NewsItem> {
    news_list
        .into_iter()
        .unique_by(|n| n.title.clone())
        .collect()
}

/// Flatten tags across all items into a histogram sorted descending by
/// count; ties keep first-seen order.
pub(crate) fn extract_categories(news_list: &[NewsItem]) -> IndexMap<String, usize> {
    let mut categories: IndexMap<String, usize> = IndexMap::new();
    for news in news_list {
        for tag in &news.tags {
            *categories.entry(tag.clone()).or_insert(0) += 1;
        }
    }
    categories.sort_by(|_, a, _, b| b.cmp(a));
    categories
}

/// Summary statistics over the deduplicated list; `None` when empty.
pub(crate) fn generate_summary(news_list: &[NewsItem]) -> Option<CrawlSummary> {
    if news_list.is_empty() {
        return None;
    }

    let mut dates: IndexMap<String, usize> = IndexMap::new();
    let mut content_types: IndexMap<String, usize> = IndexMap::new();
    for news in news_list {
        let date = news.publish_date.clone().unwrap_or_else(|| "Unknown".to_string());
        *dates.entry(date).or_insert(0) += 1;
        let content_type = news
            .content_type
            .clone()
            .unwrap_or_else(|| "Unknown".to_string());
        *content_types.entry(content_type).or_insert(0) += 1;
    }

    // Zero-padded YYYY-MM-DD compares correctly as a string.
    let latest_date = news_list
        .iter()
        .filter_map(|n| n.publish_date.as_deref())
        .max()
        .unwrap_or("")
        .to_string();
    let has_images = news_list.iter().filter(|n| n.image_url.is_some()).count();

    Some(CrawlSummary {
        total_articles: news_list.len(),
        date_distribution: dates,
        content_type_distribution: content_types,
        latest_date,
        has_images,
    })
}

/// Try each selector in order; return the first matched element's text.
/// With `min_chars` set, text at or below the gate moves on to the next
/// candidate instead of matching.
fn cascade_first_text(
    scope: &ElementRef,
    selectors: &[&str],
    min_chars: Option<usize>,
) -> Option<String> {
    for selector in selectors {
        let sel = Selector::parse(selector).unwrap();
        if let Some(el) = scope.select(&sel).next() {
            let text = element_text(&el);
            match min_chars {
                Some(gate) if text.chars().count() <= gate => continue,
                _ => return Some(text),
            }
        }
    }
    None
}

/// Try each selector in order; the first candidate matching any elements
/// supplies the whole tag list (non-empty texts, document order).
fn cascade_tags(scope: &ElementRef, selectors: &[&str]) -> Vec<String> {
    for selector in selectors {
        let sel = Selector::parse(selector).unwrap();
        let mut matched_any = false;
        let tags: Vec<String> = scope
            .select(&sel)
            .inspect(|_| matched_any = true)
            .map(|el| element_text(&el))
            .filter(|t| !t.is_empty())
            .collect();
        if matched_any {
            return tags;
        }
    }
    Vec::new()
}

/// Body text from the first container selector that yields paragraphs,
/// excluding boilerplate subtrees and sponsored text; falls back to plain
/// `<p>` collection when no container works out.
fn extract_body_text(root: &ElementRef) -> String {
    let para_sel = Selector::parse("p, div").unwrap();

    for selector in BODY_CONTAINER_SELECTORS {
        let sel = Selector::parse(selector).unwrap();
        if let Some(container) = root.select(&sel).next() {
            let parts: Vec<String> = container
                .select(&para_sel)
                .filter(|p| !is_boilerplate(p, &container))
                .map(|p| element_text(&p))
                .filter(|t| t.chars().count() > 20 && !contains_ad_marker(t))
                .collect();
            if !parts.is_empty() {
                return parts.join("\n\n");
            }
        }
    }

    // Fallback: main or article scope, longer paragraphs only, capped.
    let main_sel = Selector::parse("main").unwrap();
    let article_sel = Selector::parse("article").unwrap();
    let scope = root
        .select(&main_sel)
        .next()
        .or_else(|| root.select(&article_sel).next())
        .unwrap_or(*root);

    let p_sel = Selector::parse("p").unwrap();
    let parts: Vec<String> = scope
        .select(&p_sel)
        .map(|p| element_text(&p))
        .filter(|t| t.chars().count() > 50)
        .take(10)
        .collect();
    parts.join("\n\n")
}

/// Whether `el` or any ancestor strictly below `container` is boilerplate
/// (blocked tag name or class). The parsed tree is immutable, so unwanted
/// subtrees are skipped at collection time instead of being removed.
fn is_boilerplate(el: &ElementRef, container: &ElementRef) -> bool {
    let mut node = **el;
    loop {
        if node.id() == container.id() {
            return false;
        }
        if let Some(elem) = ElementRef::wrap(node) {
            if BOILERPLATE_TAGS.contains(&elem.value().name()) {
                return true;
            }
            if elem
                .value()
                .classes()
                .any(|c| BOILERPLATE_CLASSES.contains(&c))
            {
                return true;
            }
        }
        match node.parent() {
            Some(parent) => node = parent,
            None => return false,
        }
    }
}

fn contains_ad_marker(text: &str) -> bool {
    let lowered = text.to_lowercase();
    AD_MARKERS.iter().any(|marker| lowered.contains(marker))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn crawler() -> NewsCrawler {
        NewsCrawler::new(15, 3).unwrap()
    }

    fn item(title: &str, tags: &[&str], date: Option<&str>) -> NewsItem {
        let mut item = NewsItem::new(title.to_string(), SOURCE_LABEL);
        item.tags = tags.iter().map(|t| t.to_string()).collect();
        item.publish_date = date.map(|d| d.to_string());
        item
    }

    #[test]
    fn test_build_link_index_skips_short_anchor_text() {
        let c = crawler();
        let doc = Html::parse_document(
            r#"<html><body>
                <a href="/article/1">Kubernetes cost controls arrive</a>
                <a href="/article/2">Read more</a>
                <a href="/news/ignored">Not an article link at all</a>
            </body></html>"#,
        );
        let links = c.build_link_index(&doc);
        assert_eq!(links.len(), 1);
        assert_eq!(
            links.get("kubernetes cost controls arrive").map(String::as_str),
            Some("https://www.itworld.co.kr/article/1")
        );
    }

    #[test]
    fn test_build_link_index_last_write_wins() {
        let c = crawler();
        let doc = Html::parse_document(
            r#"<html><body>
                <a href="/article/old">Same headline repeated here</a>
                <a href="/article/new">Same headline repeated here</a>
            </body></html>"#,
        );
        let links = c.build_link_index(&doc);
        assert_eq!(links.len(), 1);
        assert!(links["same headline repeated here"].ends_with("/article/new"));
    }

    #[test]
    fn test_matcher_exact_match_takes_precedence() {
        let mut links = LinkIndex::new();
        // A partial candidate inserted first would win iteration order.
        links.insert(
            "cloud native security strategies for enterprises".to_string(),
            "https://example.com/partial".to_string(),
        );
        links.insert(
            "cloud native security".to_string(),
            "https://example.com/exact".to_string(),
        );
        assert_eq!(
            match_title_to_url("cloud native security", &links).as_deref(),
            Some("https://example.com/exact")
        );
    }

    #[test]
    fn test_matcher_partial_needs_three_words() {
        let mut links = LinkIndex::new();
        links.insert(
            "cloud security report published".to_string(),
            "https://example.com/a".to_string(),
        );
        // Two-word query: partial matching must not trigger.
        assert_eq!(match_title_to_url("cloud security", &links), None);
        // Three words, all contained: first insertion-order hit wins.
        assert_eq!(
            match_title_to_url("cloud security report update extra", &links).as_deref(),
            Some("https://example.com/a")
        );
    }

    #[test]
    fn test_matcher_never_errors_on_empty_input() {
        let links = LinkIndex::new();
        assert_eq!(match_title_to_url("", &links), None);
    }

    #[test]
    fn test_extract_card_full_fields() {
        let c = crawler();
        let doc = Html::parse_document(
            r#"<div class="card">
                <h3 class="card__title">Generative AI reshapes the enterprise stack</h3>
                <span class="card__content-type">news</span>
                <p class="card__description">A long enough description explaining what this article covers.</p>
                <div class="card__tags"><span class="tag">ai</span><span class="tag">cloud</span></div>
                <div class="card__info">By Kim 2025.5.6 · 7분</div>
                <img src="/images/a.jpg" alt="stack diagram">
            </div>"#,
        );
        let card = doc.select(&CARD_SEL).next().unwrap();
        let links = LinkIndex::new();
        let item = c.extract_news_from_card(&card, &links).unwrap();

        assert_eq!(item.title, "Generative AI reshapes the enterprise stack");
        assert_eq!(item.content_type.as_deref(), Some("news"));
        assert!(item.description.unwrap().starts_with("A long enough"));
        assert_eq!(item.tags, vec!["ai", "cloud"]);
        assert_eq!(item.publish_date.as_deref(), Some("2025-05-06"));
        assert_eq!(item.read_time.as_deref(), Some("7분"));
        assert_eq!(item.author.as_deref(), Some("Kim"));
        assert_eq!(
            item.image_url.as_deref(),
            Some("https://www.itworld.co.kr/images/a.jpg")
        );
        assert_eq!(item.image_alt.as_deref(), Some("stack diagram"));
        assert!(item.url.is_none());
        assert_eq!(item.source, "ITWorld");
    }

    #[test]
    fn test_extract_card_without_title_is_discarded() {
        let c = crawler();
        let doc = Html::parse_document(
            r#"<div class="card"><p>Just a paragraph, no headline anywhere.</p></div>"#,
        );
        let card = doc.select(&CARD_SEL).next().unwrap();
        assert!(c.extract_news_from_card(&card, &LinkIndex::new()).is_none());
    }

    #[test]
    fn test_extract_card_heading_fallback_requires_length() {
        let c = crawler();
        // h2 text is too short; h3 qualifies.
        let doc = Html::parse_document(
            r#"<div class="card"><h2>Short</h2><h3>A sufficiently long headline</h3></div>"#,
        );
        let card = doc.select(&CARD_SEL).next().unwrap();
        let item = c.extract_news_from_card(&card, &LinkIndex::new()).unwrap();
        assert_eq!(item.title, "A sufficiently long headline");
    }

    #[test]
    fn test_extract_card_description_gate() {
        let c = crawler();
        // Each candidate inspects only its first match; a short dedicated
        // description falls through to the next selector, and the generic
        // `p` fallback also takes the first paragraph only.
        let doc = Html::parse_document(
            r#"<div class="card">
                <h3 class="card__title">Headline long enough to qualify</h3>
                <p class="card__description">too short</p>
                <p>This generic paragraph is comfortably over twenty characters.</p>
            </div>"#,
        );
        let card = doc.select(&CARD_SEL).next().unwrap();
        let item = c.extract_news_from_card(&card, &LinkIndex::new()).unwrap();
        assert_eq!(item.description, None);

        let doc = Html::parse_document(
            r#"<div class="card">
                <h3 class="card__title">Headline long enough to qualify</h3>
                <div><p>This generic paragraph is comfortably over twenty characters.</p></div>
            </div>"#,
        );
        let card = doc.select(&CARD_SEL).next().unwrap();
        let item = c.extract_news_from_card(&card, &LinkIndex::new()).unwrap();
        assert_eq!(
            item.description.as_deref(),
            Some("This generic paragraph is comfortably over twenty characters.")
        );
    }

    #[test]
    fn test_extract_card_lazy_image_uses_data_src() {
        let c = crawler();
        let doc = Html::parse_document(
            r#"<div class="card">
                <h3 class="card__title">Headline long enough to qualify</h3>
                <img src="" data-src="/images/lazy.jpg" alt="lazy">
            </div>"#,
        );
        let card = doc.select(&CARD_SEL).next().unwrap();
        let item = c.extract_news_from_card(&card, &LinkIndex::new()).unwrap();
        assert_eq!(
            item.image_url.as_deref(),
            Some("https://www.itworld.co.kr/images/lazy.jpg")
        );
        assert_eq!(item.image_alt.as_deref(), Some("lazy"));
    }

    #[test]
    fn test_card_date_from_full_text_fallback() {
        let c = crawler();
        let doc = Html::parse_document(
            r#"<div class="card">
                <h3 class="card__title">Headline long enough to qualify</h3>
                <p>Published 2024.12.3 somewhere in the body text.</p>
            </div>"#,
        );
        let card = doc.select(&CARD_SEL).next().unwrap();
        let item = c.extract_news_from_card(&card, &LinkIndex::new()).unwrap();
        assert_eq!(item.publish_date.as_deref(), Some("2024-12-03"));
    }

    #[test]
    fn test_dedupe_first_seen_wins() {
        let a = item("Same title", &["first"], None);
        let b = item("Other title", &[], None);
        let c = item("Same title", &["second"], None);
        let deduped = dedupe_by_title(vec![a, b, c]);
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].title, "Same title");
        assert_eq!(deduped[0].tags, vec!["first"]);
        assert_eq!(deduped[1].title, "Other title");
    }

    #[test]
    fn test_category_histogram() {
        let news = vec![
            item("First article title", &["ai", "cloud"], None),
            item("Second article title", &["ai"], None),
            item("Third article title", &[], None),
        ];
        let categories = extract_categories(&news);
        assert_eq!(categories.len(), 2);
        let pairs: Vec<(&str, usize)> =
            categories.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        assert_eq!(pairs, vec![("ai", 2), ("cloud", 1)]);
    }

    #[test]
    fn test_summary_latest_date_and_unknown_bucket() {
        let news = vec![
            item("A first title", &[], Some("2024-01-05")),
            item("A second title", &[], Some("2024-03-01")),
            item("A third title", &[], None),
        ];
        let summary = generate_summary(&news).unwrap();
        assert_eq!(summary.latest_date, "2024-03-01");
        assert_eq!(summary.total_articles, 3);
        assert_eq!(summary.date_distribution.get("Unknown"), Some(&1));
        assert_eq!(summary.date_distribution.get("2024-01-05"), Some(&1));
        assert_eq!(summary.has_images, 0);
    }

    #[test]
    fn test_summary_empty_list_is_none() {
        assert!(generate_summary(&[]).is_none());
    }

    #[test]
    fn test_end_to_end_exact_and_partial_match() {
        let c = crawler();
        let doc = Html::parse_document(
            r#"<html><body>
                <nav>
                    <a href="/article/100">Cloud spending hits record highs</a>
                    <a href="/article/200">Quantum networking pilots expand across Europe this year</a>
                </nav>
                <div class="card">
                    <h3 class="card__title">Cloud spending hits record highs</h3>
                </div>
                <div class="card">
                    <h3 class="card__title">Quantum networking pilots gather momentum</h3>
                </div>
            </body></html>"#,
        );
        let links = c.build_link_index(&doc);
        let news = dedupe_by_title(c.collect_from_document(&doc, &links));

        assert_eq!(news.len(), 2);
        // Exact normalized-title match.
        assert!(news[0].url.as_deref().unwrap().ends_with("/article/100"));
        // First three words ("quantum networking pilots") found as substrings.
        assert!(news[1].url.as_deref().unwrap().ends_with("/article/200"));
    }

    #[test]
    fn test_content_row_cards_merged_without_duplicates() {
        let c = crawler();
        let doc = Html::parse_document(
            r#"<html><body>
                <div class="card"><h3 class="card__title">Main grid story headline</h3></div>
                <div class="content-row-article">
                    <div class="content-row-article__main">
                        <div class="card"><h3 class="card__title">Main grid story headline</h3></div>
                    </div>
                    <div class="content-row-article__secondary">
                        <div class="card"><h3 class="card__title">Sidebar story headline one</h3></div>
                        <div class="card"><h3 class="card__title">Sidebar story headline two</h3></div>
                    </div>
                </div>
            </body></html>"#,
        );
        // The flat card pass also sees the row cards; the final dedup is
        // what collapses the repeat.
        let news = dedupe_by_title(c.collect_from_document(&doc, &LinkIndex::new()));
        let titles: Vec<&str> = news.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "Main grid story headline",
                "Sidebar story headline one",
                "Sidebar story headline two",
            ]
        );
    }

    #[tokio::test]
    async fn test_category_crawl_counts_attempted_page_on_fetch_failure() {
        // Nothing listens on this port, so page 1 fails immediately.
        let c = NewsCrawler::new(1, 1).unwrap();
        let result = c
            .crawl_category("http://127.0.0.1:9/category", 3, false)
            .await;
        assert!(result.success);
        assert_eq!(result.pages_crawled, Some(1));
        assert!(result.news_list.is_empty());
    }

    #[test]
    fn test_apply_article_content_success_backfills() {
        let mut news = item("A backfilled title", &[], None);
        let fetched = ArticleContent {
            content: "Body text".to_string(),
            author: "Lee".to_string(),
            publish_date: "2025-01-02".to_string(),
            ..ArticleContent::default()
        };
        apply_article_content(&mut news, Ok(fetched));
        assert_eq!(news.full_content.as_deref(), Some("Body text"));
        assert_eq!(news.content_length, 9);
        assert_eq!(news.author.as_deref(), Some("Lee"));
        assert_eq!(news.publish_date.as_deref(), Some("2025-01-02"));
    }

    #[test]
    fn test_apply_article_content_failure_degrades() {
        let mut ok1 = item("First of three", &[], None);
        let mut failed = item("Second of three", &[], None);
        let mut ok2 = item("Third of three", &[], None);

        let body = ArticleContent {
            content: "Collected body".to_string(),
            ..ArticleContent::default()
        };
        apply_article_content(&mut ok1, Ok(body.clone()));
        apply_article_content(&mut failed, Err("connection reset".into()));
        apply_article_content(&mut ok2, Ok(body));

        assert_eq!(ok1.content_length, 14);
        assert_eq!(failed.content_length, 0);
        assert_eq!(failed.full_content.as_deref(), Some(""));
        assert_eq!(ok2.content_length, 14);
    }

    #[test]
    fn test_extract_article_content_filters_boilerplate() {
        let c = crawler();
        let doc = Html::parse_document(
            r#"<html><body>
                <h1 class="article-title">The article headline</h1>
                <div class="article-content">
                    <p>The opening paragraph carries the real substance of this story.</p>
                    <aside><p>Subscribe to our newsletter for more content daily.</p></aside>
                    <div class="ad"><p>This sponsored placement should never appear in output.</p></div>
                    <p>This text mentions 광고 and must be dropped by the marker filter.</p>
                    <p>A closing paragraph that also belongs in the extracted body.</p>
                </div>
                <div class="article-author">Park</div>
                <time datetime="2025-03-04">March 4</time>
            </body></html>"#,
        );
        let content = c.extract_article_content(&doc, "https://www.itworld.co.kr/article/9");

        assert_eq!(content.title, "The article headline");
        assert!(content.content.contains("opening paragraph"));
        assert!(content.content.contains("closing paragraph"));
        assert!(!content.content.contains("newsletter"));
        assert!(!content.content.contains("sponsored placement"));
        assert!(!content.content.contains("광고"));
        assert_eq!(content.author, "Park");
        assert_eq!(content.publish_date, "2025-03-04");
    }

    #[test]
    fn test_extract_article_content_paragraph_fallback() {
        let c = crawler();
        let long_p = "word ".repeat(15);
        let html = format!(
            "<html><body><main>{}</main></body></html>",
            format!("<p>{long_p}</p>").repeat(12)
        );
        let doc = Html::parse_document(&html);
        let content = c.extract_article_content(&doc, "https://www.itworld.co.kr/article/10");
        // Capped at the first ten qualifying paragraphs.
        assert_eq!(content.content.split("\n\n").count(), 10);
    }
}
