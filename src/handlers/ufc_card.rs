use std::sync::Arc;

use anyhow::Context;
use teloxide::prelude::*;

use crate::{
    config::Config,
    pager::{self, PagerMap},
    ufc::{fetch::EventFetcher, render},
};

pub async fn handle_ufc_card(
    bot: &AutoSend<Bot>,
    message: &Message,
    fetcher: Arc<EventFetcher>,
    pager_map: PagerMap,
    config: Config,
) -> anyhow::Result<()> {
    let owner = match message.from() {
        Some(user) => user.id,
        None => return Ok(()),
    };

    let event = fetcher
        .next_event()
        .await
        .context("Failed to fetch the next event")?;

    let pages = render::event_pages(&event, config.card_scope);

    pager::run_pager(bot, message.chat.id, owner, pages, pager_map).await
}
