//! Injury list extraction
//!
//! Each league has one listing page. Team names sit in `h3` headings;
//! the injury rows for a team follow its heading as siblings until the
//! next heading. Rows carry the `inj-row` class and hold one player's
//! data as newline-separated text.
//!
//! All league pages are fetched concurrently and settled together: a
//! league that fails contributes a failure reason, never an abort. If
//! every league fails, a single placeholder record is emitted so the
//! display layer still has something to render, flagged as fallback data.

use std::sync::Arc;

use futures::future::join_all;
use scraper::{Html, Selector};
use tracing::{info, warn};

use crate::fetch::PageFetcher;
use crate::harvest::{Harvest, RecordSource, SourceFailure};
use crate::records::{InjuryRecord, FIELD_ABSENT};
use crate::strategy::{
    element_text, first_plausible, following_siblings, has_class, ExtractStrategy,
};

use async_trait::async_trait;

/// Headings containing any of these are page furniture, not team names.
const STOP_WORDS: &[&str] = &[
    "injuries",
    "suspensions",
    "premier",
    "liga",
    "bundesliga",
    "serie",
    "ligue",
    "la liga",
    "serie a",
    "news",
    "updates",
];

/// A row is plausible once it splits into at least this many lines
/// (player, position, and the stat columns between them and the injury).
const MIN_ROW_LINES: usize = 4;

const ROW_STRATEGIES: &[ExtractStrategy] = &[
    ExtractStrategy {
        name: "first-div-text",
        run: row_first_div_text,
    },
    ExtractStrategy {
        name: "row-own-text",
        run: row_own_text,
    },
];

fn row_first_div_text(row: &scraper::ElementRef) -> Option<String> {
    let div = Selector::parse("div").unwrap();
    row.select(&div).next().map(|el| element_text(&el))
}

fn row_own_text(row: &scraper::ElementRef) -> Option<String> {
    Some(element_text(row))
}

/// One league injury page to scrape.
#[derive(Debug, Clone)]
pub struct LeagueSource {
    /// League slug, used as the record's league key
    pub slug: String,
    pub url: String,
}

impl LeagueSource {
    pub fn new(slug: impl Into<String>, url: impl Into<String>) -> Self {
        LeagueSource {
            slug: slug.into(),
            url: url.into(),
        }
    }

    /// The league pages scraped by default.
    pub fn defaults() -> Vec<LeagueSource> {
        [
            "england-premier-league",
            "spain-la-liga",
            "italy-serie-a",
            "germany-bundesliga",
            "france-ligue-1",
            "uefa-europa-league",
            "uefa-champions-league",
        ]
        .iter()
        .map(|slug| {
            LeagueSource::new(
                *slug,
                format!("https://www.sportsgambler.com/injuries/football/{slug}/"),
            )
        })
        .collect()
    }
}

/// Extractor for league injury listings.
pub struct InjuryScraper {
    fetcher: Arc<dyn PageFetcher>,
    sources: Vec<LeagueSource>,
}

impl InjuryScraper {
    pub fn new(fetcher: Arc<dyn PageFetcher>, sources: Vec<LeagueSource>) -> Self {
        InjuryScraper { fetcher, sources }
    }
}

#[async_trait]
impl RecordSource<InjuryRecord> for InjuryScraper {
    async fn collect(&self) -> Harvest<InjuryRecord> {
        let fetches = self.sources.iter().map(|source| async move {
            match self.fetcher.fetch(&source.url).await {
                Ok(html) => {
                    let records = parse_league_page(&html, &source.slug);
                    info!(
                        event = "scrape.league_done",
                        league = %source.slug,
                        records = records.len(),
                    );
                    Ok(records)
                }
                Err(e) => {
                    warn!(event = "scrape.league_failed", league = %source.slug, error = %e);
                    Err(SourceFailure {
                        source: source.slug.clone(),
                        reason: e.to_string(),
                    })
                }
            }
        });

        let mut records = Vec::new();
        let mut failures = Vec::new();
        for outcome in join_all(fetches).await {
            match outcome {
                Ok(mut league_records) => records.append(&mut league_records),
                Err(failure) => failures.push(failure),
            }
        }

        if !self.sources.is_empty() && failures.len() == self.sources.len() {
            warn!(event = "scrape.all_leagues_failed", leagues = failures.len());
            return Harvest::fallback(vec![placeholder_record()], failures);
        }

        Harvest::live(records, failures)
    }
}

/// Parse one league listing page into records.
pub fn parse_league_page(html: &str, league: &str) -> Vec<InjuryRecord> {
    let doc = Html::parse_document(html);
    let headings = Selector::parse("h3").unwrap();

    let mut records = Vec::new();
    for heading in doc.select(&headings) {
        let team = element_text(&heading).trim().to_string();
        if !is_team_heading(&team) {
            continue;
        }

        for sibling in following_siblings(&heading) {
            if sibling.value().name() == "h3" {
                break;
            }
            if !has_class(&sibling, "inj-row") {
                continue;
            }
            if let Some(record) = parse_injury_row(&sibling, league, &team) {
                records.push(record);
            }
        }
    }
    records
}

fn is_team_heading(text: &str) -> bool {
    if text.is_empty() {
        return false;
    }
    let folded = text.to_lowercase();
    !STOP_WORDS.iter().any(|word| folded.contains(word))
}

/// Extract one player record from an `inj-row` element.
///
/// Expected line layout: name, position, appearance stats, then injury
/// info and expected return in positions 5 and 6. Sources sometimes omit
/// the trailing columns or fill them with `-`; both collapse to `N/A`.
fn parse_injury_row(row: &scraper::ElementRef, league: &str, team: &str) -> Option<InjuryRecord> {
    let text = first_plausible(row, ROW_STRATEGIES, &|text| {
        row_lines(text).len() >= MIN_ROW_LINES
    })?;
    let lines = row_lines(&text);

    let player_name = lines.first()?.to_string();
    let position = lines
        .get(1)
        .map_or_else(|| FIELD_ABSENT.to_string(), |s| s.to_string());
    let info = field_or_absent(lines.get(5));
    let expected_return = field_or_absent(lines.get(6));

    Some(InjuryRecord {
        league: league.to_string(),
        team: team.to_string(),
        player_name,
        position,
        info,
        expected_return,
    })
}

fn row_lines(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

fn field_or_absent(line: Option<&&str>) -> String {
    match line {
        Some(&value) if !value.is_empty() && value != "-" => value.to_string(),
        _ => FIELD_ABSENT.to_string(),
    }
}

fn placeholder_record() -> InjuryRecord {
    InjuryRecord {
        league: "england-premier-league".to_string(),
        team: "Manchester United".to_string(),
        player_name: "Sample Player".to_string(),
        position: "Midfielder".to_string(),
        info: "Connection error - demo data".to_string(),
        expected_return: FIELD_ABSENT.to_string(),
    }
}
