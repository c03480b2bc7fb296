//! Probable lineup extraction
//!
//! Two-stage scrape. Stage A fetches the rolling index page and collects
//! links to match preview articles. Stage B fetches every preview page
//! concurrently; inside each page, a bold marker of the form
//! `"<Team> possible starting lineup:"` anchors the lineup text, which is
//! usually the next non-empty paragraph. A link that errors in stage B
//! simply contributes no records.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use futures::future::join_all;
use scraper::{Html, Selector};
use tracing::{debug, info, warn};

use crate::fetch::PageFetcher;
use crate::harvest::{Harvest, RecordSource, SourceFailure};
use crate::records::LineupRecord;
use crate::strategy::{element_text, first_plausible, following_siblings, ExtractStrategy};

pub const DEFAULT_BASE_URL: &str = "https://www.sportsmole.co.uk";

/// Marker phrase anchoring one team's lineup inside a preview article.
const LINEUP_MARKER: &str = "possible starting lineup:";

/// Link titles on the index page that lead to preview articles.
const PREVIEW_TITLE_PREFIX: &str = "Preview:";

const LINEUP_STRATEGIES: &[ExtractStrategy] = &[
    // The lineup normally sits in the first non-empty paragraph after the
    // marker.
    ExtractStrategy {
        name: "following-paragraph",
        run: following_paragraph,
    },
    // Some layouts inline the lineup in the marker's own container.
    ExtractStrategy {
        name: "container-remainder",
        run: container_remainder,
    },
];

fn following_paragraph(marker: &scraper::ElementRef) -> Option<String> {
    following_siblings(marker)
        .filter(|el| el.value().name() == "p")
        .map(|el| element_text(&el).trim().to_string())
        .find(|text| !text.is_empty())
}

fn container_remainder(marker: &scraper::ElementRef) -> Option<String> {
    let container = marker.parent().and_then(scraper::ElementRef::wrap)?;
    let own = element_text(marker);
    let remainder = element_text(&container).replacen(&own, "", 1);
    let remainder = remainder.trim();
    (!remainder.is_empty()).then(|| remainder.to_string())
}

/// A lineup line is plausible only if it lists several players.
fn has_player_delimiter(text: &str) -> bool {
    text.contains(|c: char| c == ',' || c == ';')
}

/// Extractor for probable lineups from match preview articles.
pub struct LineupScraper {
    fetcher: Arc<dyn PageFetcher>,
    base_url: String,
}

impl LineupScraper {
    pub fn new(fetcher: Arc<dyn PageFetcher>, base_url: impl Into<String>) -> Self {
        LineupScraper {
            fetcher,
            base_url: base_url.into(),
        }
    }

    /// Index URL with a timestamp query so intermediaries serve the
    /// latest listing.
    fn index_url(&self) -> String {
        format!(
            "{}/index_rhs.html?{}",
            self.base_url.trim_end_matches('/'),
            Utc::now().timestamp_millis()
        )
    }
}

#[async_trait]
impl RecordSource<LineupRecord> for LineupScraper {
    async fn collect(&self) -> Harvest<LineupRecord> {
        let index_url = self.index_url();
        let index_html = match self.fetcher.fetch(&index_url).await {
            Ok(html) => html,
            Err(e) => {
                warn!(event = "scrape.index_failed", url = %index_url, error = %e);
                return Harvest::live(
                    Vec::new(),
                    vec![SourceFailure {
                        source: index_url,
                        reason: e.to_string(),
                    }],
                );
            }
        };

        let links = parse_preview_links(&index_html, &self.base_url);
        info!(event = "scrape.previews_found", links = links.len());
        if links.is_empty() {
            warn!(event = "scrape.no_preview_links");
            return Harvest::live(Vec::new(), Vec::new());
        }

        let fetches = links.iter().map(|link| async move {
            match self.fetcher.fetch(link).await {
                Ok(html) => Ok(parse_preview_page(&html, link)),
                Err(e) => {
                    warn!(event = "scrape.preview_failed", url = %link, error = %e);
                    Err(SourceFailure {
                        source: link.clone(),
                        reason: e.to_string(),
                    })
                }
            }
        });

        let mut records = Vec::new();
        let mut failures = Vec::new();
        for outcome in join_all(fetches).await {
            match outcome {
                Ok(mut page_records) => records.append(&mut page_records),
                Err(failure) => failures.push(failure),
            }
        }

        info!(event = "scrape.lineups_done", records = records.len(), failed_pages = failures.len());
        Harvest::live(records, failures)
    }
}

/// Collect absolute preview-article links from the index page.
pub fn parse_preview_links(html: &str, base_url: &str) -> Vec<String> {
    let doc = Html::parse_document(html);
    let anchors = Selector::parse("a").unwrap();

    let mut links = Vec::new();
    for anchor in doc.select(&anchors) {
        let Some(title) = anchor.value().attr("data-title") else {
            continue;
        };
        if !title.starts_with(PREVIEW_TITLE_PREFIX) {
            continue;
        }
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        if href.starts_with("http") {
            links.push(href.to_string());
        } else {
            links.push(format!("{}{}", base_url.trim_end_matches('/'), href));
        }
    }
    links
}

/// Extract every marker-anchored lineup from one preview article.
pub fn parse_preview_page(html: &str, source_url: &str) -> Vec<LineupRecord> {
    let doc = Html::parse_document(html);
    let markers = Selector::parse("strong").unwrap();

    let mut records = Vec::new();
    for marker in doc.select(&markers) {
        let marker_text = element_text(&marker).trim().to_string();
        if !marker_text.contains(LINEUP_MARKER) {
            continue;
        }

        let team = marker_text.replace(LINEUP_MARKER, "").trim().to_string();
        if team.is_empty() {
            continue;
        }

        match first_plausible(&marker, LINEUP_STRATEGIES, &has_player_delimiter) {
            Some(lineup) => {
                debug!(event = "scrape.lineup_extracted", team = %team);
                records.push(LineupRecord {
                    team,
                    lineup,
                    source_url: source_url.to_string(),
                });
            }
            None => {
                debug!(event = "scrape.lineup_missing", team = %team);
            }
        }
    }
    records
}
