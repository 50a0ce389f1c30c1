use chrono::{DateTime, TimeZone, Utc};
use itertools::Itertools;

use crate::config::CardScope;
use crate::telegram_utils::html_escape;

use super::{CardKind, Event, Fight, FightCard, Fighter};

/// One HTML page per card the event actually has, in tier order. Page footers
/// run 1/N through N/N.
pub fn event_pages(event: &Event, scope: CardScope) -> Vec<String> {
    let cards: Vec<(CardKind, &FightCard)> = CardKind::ALL
        .iter()
        .copied()
        .filter(|kind| scope == CardScope::AllTiers || *kind == CardKind::Main)
        .filter_map(|kind| kind.card(event).map(|card| (kind, card)))
        .collect();

    let total = cards.len();

    cards
        .into_iter()
        .enumerate()
        .map(|(index, (kind, card))| render_card(event, kind, card, index + 1, total))
        .collect()
}

fn render_card(
    event: &Event,
    kind: CardKind,
    card: &FightCard,
    page: usize,
    total: usize,
) -> String {
    let title = format!("{} - {}", event.name, kind.title());
    let fights = card.fights.iter().map(format_fight).join("\n\n");

    // The zero-width-space link makes Telegram render the promo image as the
    // message preview.
    format!(
        "<a href=\"{url}\"><b>{title}</b></a><a href=\"{image}\">&#8203;</a>\n{start}\n\n{fights}\n\n{page}/{total}",
        url = html_escape(&event.url),
        title = html_escape(&title),
        image = html_escape(&event.image_url),
        start = format_start_time(card.start_time),
    )
}

fn format_fight(fight: &Fight) -> String {
    let headline = format!(
        "{} vs. {}",
        fighter_line(&fight.red),
        fighter_line(&fight.blue)
    );

    format!(
        "<b>{}</b>\n{}",
        html_escape(&headline),
        html_escape(&fight.weight_class)
    )
}

fn fighter_line(fighter: &Fighter) -> String {
    format!(
        "{} {} {}",
        fighter.rank, fighter.first_name, fighter.last_name
    )
}

fn format_start_time(timestamp: i64) -> String {
    match Utc.timestamp_opt(timestamp, 0).single() {
        Some(start) => format!(
            "{}\n{}",
            start.format("%A, %e %B %Y %H:%M UTC"),
            format_relative(start, Utc::now())
        ),
        None => String::new(),
    }
}

fn format_relative(start: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let delta = start - now;
    let in_future = delta >= chrono::Duration::zero();
    let delta = if in_future { delta } else { -delta };

    let amount = if delta.num_days() >= 1 {
        format!("{} days", delta.num_days())
    } else if delta.num_hours() >= 1 {
        format!("{} hours", delta.num_hours())
    } else if delta.num_minutes() >= 1 {
        format!("{} minutes", delta.num_minutes())
    } else {
        return "now".to_string();
    };

    if in_future {
        format!("in {}", amount)
    } else {
        format!("{} ago", amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ufc::UNRANKED;

    fn fighter(first: &str, last: &str, rank: &str) -> Fighter {
        Fighter {
            first_name: first.to_string(),
            last_name: last.to_string(),
            rank: rank.to_string(),
        }
    }

    fn card(start_time: i64) -> FightCard {
        FightCard {
            start_time,
            fights: vec![Fight {
                red: fighter("Bo", "Nickal", UNRANKED),
                blue: fighter("Paul", "Craig", "#14"),
                weight_class: "Middleweight".to_string(),
            }],
        }
    }

    fn event(prelims: Option<FightCard>, early_prelims: Option<FightCard>) -> Event {
        Event {
            url: "https://www.ufc.com/event/ufc-300".to_string(),
            name: "UFC 300: Pereira vs Hill".to_string(),
            image_url: "https://example.com/promo.jpg".to_string(),
            main_card: card(1700000000),
            prelims,
            early_prelims,
        }
    }

    #[test]
    fn one_page_per_present_card() {
        let full = event(Some(card(1699990000)), Some(card(1699980000)));
        let pages = event_pages(&full, CardScope::AllTiers);

        assert_eq!(pages.len(), 3);
        assert!(pages[0].ends_with("1/3"));
        assert!(pages[1].ends_with("2/3"));
        assert!(pages[2].ends_with("3/3"));
    }

    #[test]
    fn absent_cards_produce_no_page() {
        let main_only = event(None, None);
        let pages = event_pages(&main_only, CardScope::AllTiers);

        assert_eq!(pages.len(), 1);
        assert!(pages[0].ends_with("1/1"));
    }

    #[test]
    fn main_only_scope_ignores_prelims() {
        let full = event(Some(card(1699990000)), Some(card(1699980000)));
        let pages = event_pages(&full, CardScope::MainOnly);

        assert_eq!(pages.len(), 1);
        assert!(pages[0].contains("Main Card"));
        assert!(pages[0].ends_with("1/1"));
    }

    #[test]
    fn fight_line_includes_ranks_and_names() {
        let pages = event_pages(&event(None, None), CardScope::AllTiers);

        assert!(pages[0].contains("U Bo Nickal vs. #14 Paul Craig"));
        assert!(pages[0].contains("Middleweight"));
    }

    #[test]
    fn page_links_event_and_image() {
        let pages = event_pages(&event(None, None), CardScope::AllTiers);

        assert!(pages[0].contains("href=\"https://www.ufc.com/event/ufc-300\""));
        assert!(pages[0].contains("href=\"https://example.com/promo.jpg\""));
    }

    #[test]
    fn urls_are_escaped_in_attributes() {
        let mut hostile = event(None, None);
        hostile.url = "https://www.ufc.com/event/x?a=\"1\"&b=2".to_string();
        hostile.image_url = "https://example.com/promo.jpg?w=1&h=2".to_string();

        let pages = event_pages(&hostile, CardScope::AllTiers);

        assert!(pages[0].contains("href=\"https://www.ufc.com/event/x?a=&quot;1&quot;&amp;b=2\""));
        assert!(pages[0].contains("href=\"https://example.com/promo.jpg?w=1&amp;h=2\""));
        assert!(!pages[0].contains("a=\"1\""));
    }

    #[test]
    fn relative_time_future_days() {
        let now = Utc.timestamp_opt(1700000000, 0).unwrap();
        let start = now + chrono::Duration::days(3);
        assert_eq!(format_relative(start, now), "in 3 days");
    }

    #[test]
    fn relative_time_past_hours() {
        let now = Utc.timestamp_opt(1700000000, 0).unwrap();
        let start = now - chrono::Duration::hours(5);
        assert_eq!(format_relative(start, now), "5 hours ago");
    }

    #[test]
    fn relative_time_now() {
        let now = Utc.timestamp_opt(1700000000, 0).unwrap();
        assert_eq!(format_relative(now + chrono::Duration::seconds(30), now), "now");
    }
}
