//! Fault-tolerant source extraction for teamsheet.
//!
//! Each external site is scraped by a category-specific extractor that
//! never lets a failure escape its boundary:
//! - [`InjuryScraper`]: one listing page per league, team headings anchor
//!   sibling walks over injury rows
//! - [`LineupScraper`]: two stages, where an index page yields preview links
//!   each preview page yields marker-anchored lineup paragraphs
//!
//! Fetching goes through the injectable [`PageFetcher`] seam; parsing runs
//! an ordered list of extraction strategies so that shifting markup
//! degrades results instead of hard-failing them. Every pass settles all
//! of its concurrent fetches and reports per-source failures out of band
//! in the returned [`Harvest`].

pub mod error;
pub mod fakes;
pub mod fetch;
pub mod harvest;
pub mod injuries;
pub mod lineups;
pub mod records;
pub mod strategy;

pub use error::ScrapeError;
pub use fetch::{HttpFetcher, PageFetcher};
pub use harvest::{Harvest, HarvestOrigin, RecordSource, SourceFailure};
pub use injuries::{InjuryScraper, LeagueSource};
pub use lineups::LineupScraper;
pub use records::{InjuryRecord, LineupRecord};
