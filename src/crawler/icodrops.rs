//! Event extraction from icodrops.com
//!
//! The list phase walks the active and ended category pages, then visits
//! every event's detail page for its project website and end date. A single
//! malformed listing is logged and skipped; a failed category page is fatal
//! for the whole phase.

use crate::event::{EventStatus, IcoEvent, Traffic, PENDING, TBA};
use crate::normalize::{date_from_days_left, parse_money_to_millions, MonthWalker};
use crate::page::{dom, PageError, PageReader};
use crate::{ParseError, Result};
use chrono::NaiveDate;
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;

/// The one event source this extractor understands.
pub const ICODROPS_SOURCE: &str = "icodrops.com";

/// Failure of a single event's extraction; never aborts the phase.
#[derive(Debug, Error)]
pub enum ItemError {
    #[error("missing element {0:?}")]
    MissingElement(&'static str),

    #[error("missing attribute {0:?}")]
    MissingAttribute(&'static str),

    #[error("event has no detail page url")]
    MissingDetailUrl,

    #[error("unexpected date text {0:?}")]
    BadDateText(String),

    #[error(transparent)]
    Date(#[from] ParseError),

    #[error("detail page fetch failed: {0}")]
    Fetch(#[from] PageError),
}

/// Pre-parsed CSS selectors for the icodrops page structure.
struct Selectors {
    listing: Selector,
    card: Selector,
    main_info: Selector,
    anchor: Selector,
    raised: Selector,
    span: Selector,
    right_col: Selector,
    sale_date: Selector,
    strong: Selector,
}

impl Selectors {
    fn new() -> std::result::Result<Self, PageError> {
        Ok(Self {
            listing: dom::selector("div.all")?,
            card: dom::selector("div.a_ico")?,
            main_info: dom::selector("div.ico-main-info")?,
            anchor: dom::selector("a")?,
            raised: dom::selector("div#new_column_categ_invisted")?,
            span: dom::selector("span")?,
            right_col: dom::selector("div.ico-right-col")?,
            sale_date: dom::selector("div.sale-date")?,
            strong: dom::selector("strong")?,
        })
    }
}

fn category_url(status: EventStatus) -> String {
    format!(
        "https://icodrops.com/category/{}-ico/",
        status.category_slug()
    )
}

/// Crawls the full, deadline-truncated event list from icodrops.com.
///
/// Walks the active and ended category pages for name, detail-page URL and
/// raised amount, then visits each detail page for the project website and
/// end date. Ended events carry no explicit year; `start_year` seeds the
/// [`MonthWalker`] rollover heuristic (the current year in production).
///
/// The list is truncated at the first event whose parsed end date falls
/// before `deadline`; `"TBA"` dates never trigger truncation.
pub async fn crawl_event_list<R: PageReader>(
    reader: &R,
    deadline: NaiveDate,
    start_year: i32,
) -> Result<Vec<IcoEvent>> {
    let selectors = Selectors::new()?;
    let mut events = Vec::new();

    for status in [EventStatus::Active, EventStatus::Ended] {
        let url = category_url(status);
        tracing::info!("Crawling {} ICO events from {}", status, ICODROPS_SOURCE);

        let body = reader.fetch_page(&url).await?;
        let document = Html::parse_document(&body);
        let listing = dom::select_first(document.root_element(), &selectors.listing).ok_or(
            PageError::MissingElement {
                url: url.clone(),
                selector: "div.all".to_string(),
            },
        )?;

        let cards = dom::select_all(listing, &selectors.card);
        tracing::info!("Total {} {} ICO events", cards.len(), status);

        for card in cards {
            let mut event = IcoEvent::new(status);
            if let Err(e) = fill_card(&mut event, card, &selectors) {
                tracing::warn!("Failed to extract {} listing card: {}", status, e);
            }
            // A malformed listing is kept with whatever fields it got.
            events.push(event);
        }
    }

    let mut walker = MonthWalker::new(start_year);
    let mut crop = None;
    for (index, event) in events.iter_mut().enumerate() {
        tracing::info!("Crawling {:?} website url and end date", event.name);
        match fill_detail(reader, event, &mut walker, &selectors).await {
            Ok(()) => {
                if ends_before(event, deadline) {
                    crop = Some(index);
                    break;
                }
            }
            Err(e) => tracing::warn!("Failed to extract details for {:?}: {}", event.name, e),
        }
    }

    if let Some(index) = crop {
        tracing::info!(
            "Reached deadline cutoff, dropping {} older events",
            events.len() - index
        );
        events.truncate(index);
    }

    Ok(events)
}

/// Extracts name, detail-page URL and raised amount from one listing card.
fn fill_card(
    event: &mut IcoEvent,
    card: ElementRef<'_>,
    selectors: &Selectors,
) -> std::result::Result<(), ItemError> {
    let main_info = dom::select_first(card, &selectors.main_info)
        .ok_or(ItemError::MissingElement("div.ico-main-info"))?;
    let name_link =
        dom::select_first(main_info, &selectors.anchor).ok_or(ItemError::MissingElement("a"))?;
    event.name = Some(dom::text(name_link));
    event.ico_url =
        Some(dom::attribute(name_link, "href").ok_or(ItemError::MissingAttribute("href"))?);

    let raised_element = dom::select_first(card, &selectors.raised)
        .and_then(|cell| dom::select_first(cell, &selectors.span))
        .ok_or(ItemError::MissingElement("div#new_column_categ_invisted span"))?;
    let raised_text = dom::text(raised_element);
    event.raised =
        Some(parse_money_to_millions(&raised_text).unwrap_or_else(|| PENDING.to_string()));

    Ok(())
}

/// Extracts the project website and end date from an event's detail page.
///
/// A dated event also gets the `{success: false}` traffic placeholder the
/// enrichment phase looks for.
async fn fill_detail<R: PageReader>(
    reader: &R,
    event: &mut IcoEvent,
    walker: &mut MonthWalker,
    selectors: &Selectors,
) -> std::result::Result<(), ItemError> {
    let ico_url = event.ico_url.as_deref().ok_or(ItemError::MissingDetailUrl)?;
    let body = reader.fetch_page(ico_url).await?;
    let document = Html::parse_document(&body);
    let root = document.root_element();

    let website_link = dom::select_first(root, &selectors.right_col)
        .and_then(|col| dom::select_first(col, &selectors.anchor))
        .ok_or(ItemError::MissingElement("div.ico-right-col a"))?;
    event.url =
        Some(dom::attribute(website_link, "href").ok_or(ItemError::MissingAttribute("href"))?);

    let sale_date = dom::select_first(root, &selectors.sale_date)
        .ok_or(ItemError::MissingElement("div.sale-date"))?;

    // Active events show either "IS ACTIVE" or a days-left counter inside
    // <strong>; ended events show "DD MONTHNAME" with no year.
    let end_date = match event.status {
        EventStatus::Active => {
            let raw = dom::text(
                dom::select_first(sale_date, &selectors.strong)
                    .ok_or(ItemError::MissingElement("strong"))?,
            );
            if raw == "IS ACTIVE" {
                TBA.to_string()
            } else {
                let days = raw
                    .split_whitespace()
                    .next()
                    .and_then(|token| token.parse::<u64>().ok())
                    .ok_or_else(|| ItemError::BadDateText(raw.clone()))?;
                date_from_days_left(days)
            }
        }
        EventStatus::Ended => {
            let raw = dom::text(sale_date);
            let mut parts = raw.split_whitespace();
            let day = parts
                .next()
                .and_then(|token| token.parse::<u32>().ok())
                .ok_or_else(|| ItemError::BadDateText(raw.clone()))?;
            let month = parts
                .next()
                .ok_or_else(|| ItemError::BadDateText(raw.clone()))?;
            walker.date_for(month, day)?
        }
    };

    event.end_date = Some(end_date);
    event.traffic = Some(Traffic::failure());
    Ok(())
}

/// True when the event has a parseable end date before the deadline.
fn ends_before(event: &IcoEvent, deadline: NaiveDate) -> bool {
    event
        .end_date
        .as_deref()
        .and_then(|text| NaiveDate::parse_from_str(text, "%Y/%m/%d").ok())
        .map_or(false, |date| date < deadline)
}
