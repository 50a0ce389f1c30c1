use std::collections::HashMap;
use std::sync::Arc;

use teloxide::{
    prelude::*,
    types::{ChatId, UserId},
};
use tokio::sync::RwLock;

/// Remembers who was greeted last in each chat, so back-to-back greetings
/// from the same user get called out.
pub type LastGreetedMap = Arc<RwLock<HashMap<ChatId, UserId>>>;

pub fn create_last_greeted_map() -> LastGreetedMap {
    Arc::new(RwLock::new(HashMap::new()))
}

pub async fn handle_hello(
    bot: &AutoSend<Bot>,
    message: &Message,
    last_greeted: LastGreetedMap,
) -> anyhow::Result<()> {
    let user = match message.from() {
        Some(user) => user,
        None => return Ok(()),
    };
    let chat_id = message.chat.id;

    let repeat = {
        let mut map = last_greeted.write().await;
        map.insert(chat_id, user.id) == Some(user.id)
    };

    let text = if repeat {
        format!("Hello {}... This feels familiar.", user.first_name)
    } else {
        format!("Hello {}", user.first_name)
    };

    bot.send_message(chat_id, text).await?;

    Ok(())
}
