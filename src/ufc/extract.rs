use scraper::{ElementRef, Html, Selector};
use thiserror::Error;

use super::{Event, Fight, FightCard, Fighter, UNRANKED};

/// Structural failures on fields the event model can't do without.
/// Optional markup (prelim tiers, fighter ranks) never produces one of these.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("required element not found: {0}")]
    MissingElement(&'static str),
    #[error("attribute '{attr}' not found on {element}")]
    MissingAttribute {
        element: &'static str,
        attr: &'static str,
    },
    #[error("invalid broadcast timestamp: '{0}'")]
    InvalidTimestamp(String),
}

/// Extracts the relative link to the soonest event from the events listing
/// page, e.g. `/event/ufc-300`.
pub fn latest_event_path(html: &str) -> Result<String, ScrapeError> {
    let document = Html::parse_document(html);
    let selector = Selector::parse(".c-card-event--result__logo a").unwrap();

    let link = document
        .select(&selector)
        .next()
        .ok_or(ScrapeError::MissingElement("next event link"))?;

    let href = link
        .value()
        .attr("href")
        .ok_or(ScrapeError::MissingAttribute {
            element: "next event link",
            attr: "href",
        })?;

    Ok(href.to_string())
}

pub fn parse_event(url: &str, html: &str) -> Result<Event, ScrapeError> {
    let document = Html::parse_document(html);
    let root = document.root_element();

    let name = first_text(
        select_one(root, ".field--name-node-title > h1", "event name")?,
        "event name",
    )?;

    let image = select_one(root, ".c-hero__image", "event image")?
        .value()
        .attr("src")
        .ok_or(ScrapeError::MissingAttribute {
            element: "event image",
            attr: "src",
        })?;
    // The query string carries resize parameters we don't want.
    let image_url = image.split('?').next().unwrap_or(image).to_string();

    let main_card = parse_card_section(root, ".main-card")?
        .ok_or(ScrapeError::MissingElement("main card"))?;
    let prelims = parse_card_section(root, ".fight-card-prelims")?;
    let early_prelims = parse_card_section(root, ".fight-card-prelims-early")?;

    Ok(Event {
        url: url.to_string(),
        name,
        image_url,
        main_card,
        prelims,
        early_prelims,
    })
}

/// A missing section, or a section without a broadcast time, yields `None`;
/// malformed fight rows inside a present section are hard errors.
fn parse_card_section(
    root: ElementRef,
    section_selector: &str,
) -> Result<Option<FightCard>, ScrapeError> {
    let selector = Selector::parse(section_selector).unwrap();

    let section = match root.select(&selector).next() {
        Some(section) => section,
        None => return Ok(None),
    };

    parse_card(section)
}

pub fn parse_card(section: ElementRef) -> Result<Option<FightCard>, ScrapeError> {
    let time_selector = Selector::parse(".c-event-fight-card-broadcaster__time").unwrap();

    let time = match section.select(&time_selector).next() {
        Some(time) => time,
        None => return Ok(None),
    };

    let raw_timestamp = time
        .value()
        .attr("data-timestamp")
        .ok_or(ScrapeError::MissingAttribute {
            element: "broadcast time",
            attr: "data-timestamp",
        })?;

    let start_time = raw_timestamp
        .parse()
        .map_err(|_| ScrapeError::InvalidTimestamp(raw_timestamp.to_string()))?;

    let fight_selector = Selector::parse(".c-listing-fight").unwrap();
    let fights = section
        .select(&fight_selector)
        .map(parse_fight)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Some(FightCard { start_time, fights }))
}

fn parse_fight(row: ElementRef) -> Result<Fight, ScrapeError> {
    let red = parse_fighter(select_one(
        row,
        ".c-listing-fight__corner--red",
        "red corner",
    )?)?;
    let blue = parse_fighter(select_one(
        row,
        ".c-listing-fight__corner--blue",
        "blue corner",
    )?)?;
    let weight_class = first_text(
        select_one(row, ".c-listing-fight__class", "weight class")?,
        "weight class",
    )?;

    Ok(Fight {
        red,
        blue,
        weight_class,
    })
}

fn parse_fighter(corner: ElementRef) -> Result<Fighter, ScrapeError> {
    let rank_selector = Selector::parse(".js-listing-fight__corner-rank > span").unwrap();

    // Unranked fighters simply have no rank element.
    let rank = corner
        .select(&rank_selector)
        .next()
        .and_then(|rank| rank.text().map(str::trim).find(|text| !text.is_empty()))
        .map(str::to_string)
        .unwrap_or_else(|| UNRANKED.to_string());

    let first_name = first_text(
        select_one(corner, ".c-listing-fight__corner-given-name", "given name")?,
        "given name",
    )?;
    let last_name = first_text(
        select_one(
            corner,
            ".c-listing-fight__corner-family-name",
            "family name",
        )?,
        "family name",
    )?;

    Ok(Fighter {
        first_name,
        last_name,
        rank,
    })
}

fn select_one<'a>(
    scope: ElementRef<'a>,
    css: &str,
    what: &'static str,
) -> Result<ElementRef<'a>, ScrapeError> {
    let selector = Selector::parse(css).unwrap();
    scope
        .select(&selector)
        .next()
        .ok_or(ScrapeError::MissingElement(what))
}

fn first_text(element: ElementRef, what: &'static str) -> Result<String, ScrapeError> {
    element
        .text()
        .map(str::trim)
        .find(|text| !text.is_empty())
        .map(str::to_string)
        .ok_or(ScrapeError::MissingElement(what))
}
