use std::str::FromStr;

use anyhow::Context;

/// Which card tiers the event pager shows.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CardScope {
    AllTiers,
    MainOnly,
}

impl FromStr for CardScope {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(CardScope::AllTiers),
            "main" => Ok(CardScope::MainOnly),
            _ => Err(anyhow::anyhow!("Invalid card scope: {}", s)),
        }
    }
}

impl CardScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            CardScope::AllTiers => "all",
            CardScope::MainOnly => "main",
        }
    }
}

#[derive(Copy, Clone, Debug)]
pub struct Config {
    pub card_scope: CardScope,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let card_scope = match std::env::var("UFC_CARD_TIERS") {
            Ok(value) => value
                .parse()
                .with_context(|| format!("UFC_CARD_TIERS: use 'all' or 'main', got '{value}'"))?,
            Err(_) => CardScope::AllTiers,
        };

        Ok(Self { card_scope })
    }
}
