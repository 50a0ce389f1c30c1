use std::sync::Arc;

use anyhow::Context;
use teloxide::{prelude::*, types::ParseMode, utils::command::BotCommands};

use crate::{
    config::Config,
    handlers::{self, LastGreetedMap},
    pager::PagerMap,
    ufc::fetch::EventFetcher,
    Command,
};

pub async fn handle_command(
    bot: AutoSend<Bot>,
    message: Message,
    command: Command,
    config: Config,
    fetcher: Arc<EventFetcher>,
    pager_map: PagerMap,
    last_greeted: LastGreetedMap,
) -> anyhow::Result<()> {
    let chat_id = message.chat.id;

    let result = match command {
        Command::Hello => handlers::handle_hello(&bot, &message, last_greeted)
            .await
            .context("handle_hello"),
        Command::Roll(dice) => handlers::handle_roll(&bot, chat_id, &dice)
            .await
            .context("handle_roll"),
        Command::HttpCat(code) => handlers::handle_http_cat(&bot, chat_id, &code)
            .await
            .context("handle_http_cat"),
        Command::UfcCard => handlers::handle_ufc_card(&bot, &message, fetcher, pager_map, config)
            .await
            .context("handle_ufc_card"),
        Command::Help => send_help(&bot, &message).await.context("send_help"),
    };

    match result {
        Ok(()) => Ok(()),
        Err(err) => {
            log::error!("{:#}", err);
            bot.send_message(
                chat_id,
                format!(
                    "Something went wrong :(\nMaybe this helps:\n<pre>{:#}</pre>",
                    err
                ),
            )
            .parse_mode(ParseMode::Html)
            .await?;
            Ok(())
        }
    }
}

async fn send_help(bot: &AutoSend<Bot>, message: &Message) -> anyhow::Result<()> {
    bot.send_message(message.chat.id, Command::descriptions().to_string())
        .await?;

    Ok(())
}
