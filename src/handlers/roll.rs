use teloxide::prelude::*;

use crate::dice;

pub async fn handle_roll(
    bot: &AutoSend<Bot>,
    chat_id: ChatId,
    dice_arg: &str,
) -> anyhow::Result<()> {
    let spec = match dice::parse_spec(dice_arg) {
        Some(spec) => spec,
        None => {
            bot.send_message(chat_id, "Format has to be in NdN!")
                .await?;
            return Ok(());
        }
    };

    let results = dice::roll(spec, &mut rand::thread_rng());

    bot.send_message(chat_id, dice::format_rolls(&results))
        .await?;

    Ok(())
}
