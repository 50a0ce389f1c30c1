pub mod extract;
pub mod fetch;
pub mod render;

/// Rank shown when the source lists no ranking for a fighter.
pub const UNRANKED: &str = "U";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fighter {
    pub first_name: String,
    pub last_name: String,
    pub rank: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fight {
    pub red: Fighter,
    pub blue: Fighter,
    pub weight_class: String,
}

/// One tier of an event: broadcast start (epoch seconds) plus its fights,
/// in announced order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FightCard {
    pub start_time: i64,
    pub fights: Vec<Fight>,
}

/// A scraped UFC event. The main card always exists; the prelim tiers are
/// absent when the event doesn't have them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Event {
    pub url: String,
    pub name: String,
    pub image_url: String,
    pub main_card: FightCard,
    pub prelims: Option<FightCard>,
    pub early_prelims: Option<FightCard>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CardKind {
    Main,
    Prelims,
    EarlyPrelims,
}

impl CardKind {
    pub const ALL: [CardKind; 3] = [CardKind::Main, CardKind::Prelims, CardKind::EarlyPrelims];

    pub fn title(&self) -> &'static str {
        match self {
            CardKind::Main => "Main Card",
            CardKind::Prelims => "Prelims",
            CardKind::EarlyPrelims => "Early Prelims",
        }
    }

    pub fn card<'a>(&self, event: &'a Event) -> Option<&'a FightCard> {
        match self {
            CardKind::Main => Some(&event.main_card),
            CardKind::Prelims => event.prelims.as_ref(),
            CardKind::EarlyPrelims => event.early_prelims.as_ref(),
        }
    }
}
