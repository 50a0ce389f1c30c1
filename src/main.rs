use std::sync::Arc;

use anyhow::Context;
use chrono::{DateTime, Utc};
use teloxide::{
    dispatching::{UpdateFilterExt, UpdateHandler},
    prelude::*,
    types::Update,
    utils::command::BotCommands,
};

use crate::{
    command_handler::handle_command, config::Config, handlers::create_last_greeted_map,
    pager::create_pager_map, ufc::fetch::EventFetcher,
};

mod command_handler;
mod config;
mod dice;
mod handlers;
mod pager;
mod telegram_utils;
mod ufc;

#[derive(BotCommands, Clone)]
#[command(rename = "lowercase", description = "Supported commands:")]
enum Command {
    #[command(description = "Say hello")]
    Hello,

    #[command(description = "Roll dice in NdN format")]
    Roll(String),

    #[command(description = "Explain an HTTP code with a cat photo")]
    HttpCat(String),

    #[command(description = "Show the card for the next UFC event")]
    UfcCard,

    #[command(description = "Show this help")]
    Help,
}

fn handler(start_time: DateTime<Utc>) -> UpdateHandler<anyhow::Error> {
    dptree::entry()
        .branch(
            Update::filter_message()
                .chain(dptree::filter(move |message: Message| {
                    // Ignore messages older than start_time to prevent massive spam
                    message.date > start_time
                }))
                .chain(teloxide::filter_command::<Command, _>())
                .chain(dptree::endpoint(handle_command)),
        )
        .branch(Update::filter_callback_query().chain(dptree::endpoint(pager::handle_callback)))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    pretty_env_logger::init();

    log::info!("Starting cagebot...");

    let config = Config::from_env()?;
    log::info!("Showing card tiers: {}", config.card_scope.as_str());

    let start_time = Utc::now();

    let token =
        std::env::var("TELEGRAM_TOKEN").context("TELEGRAM_TOKEN not found in environment")?;

    let bot = Bot::new(token).auto_send();

    bot.set_my_commands(Command::bot_commands()).await?;

    log::info!("Commands registered & Telegram connection established.");

    let fetcher = Arc::new(EventFetcher::new()?);
    let pager_map = create_pager_map();
    let last_greeted = create_last_greeted_map();

    // https://github.com/teloxide/teloxide/blob/86657f55ffa1f10baa18a6fdca2c72c30db33519/src/dispatching/repls/commands_repl.rs#L82
    let ignore_update = |_upd| Box::pin(async {});

    let mut dispatcher = Dispatcher::builder(bot, handler(start_time))
        .default_handler(ignore_update)
        .dependencies(dptree::deps![config, fetcher, pager_map, last_greeted])
        .build();

    dispatcher.setup_ctrlc_handler().dispatch().await;

    Ok(())
}
