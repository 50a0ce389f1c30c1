use std::collections::HashSet;

use anyhow::Context;
use once_cell::sync::Lazy;
use rand::seq::SliceRandom;
use reqwest::Url;
use teloxide::{prelude::*, types::InputFile};

// Codes https://http.cat has a photo for.
const VALID_HTTP_CODES: [u16; 60] = [
    100, 101, 102, 200, 201, 202, 204, 206, 207, 300, 301, 302, 303, 304, 305, 307, 308, 400, 401,
    402, 403, 404, 405, 406, 408, 409, 410, 411, 412, 413, 414, 415, 416, 417, 418, 420, 421, 422,
    423, 424, 425, 426, 429, 431, 444, 450, 451, 499, 500, 501, 502, 503, 504, 506, 507, 508, 509,
    510, 511, 599,
];

static VALID_HTTP_CODE_SET: Lazy<HashSet<u16>> =
    Lazy::new(|| VALID_HTTP_CODES.iter().copied().collect());

fn cat_image_url(code: u16) -> anyhow::Result<Url> {
    Url::parse(&format!("https://http.cat/{code}.jpg")).context("Failed to build http.cat URL")
}

pub async fn handle_http_cat(
    bot: &AutoSend<Bot>,
    chat_id: ChatId,
    code_arg: &str,
) -> anyhow::Result<()> {
    let code_arg = code_arg.trim();

    let code = if code_arg.is_empty() {
        *VALID_HTTP_CODES
            .choose(&mut rand::thread_rng())
            .expect("Expected the code list to be non-empty")
    } else {
        let code = code_arg
            .parse::<u16>()
            .ok()
            .filter(|code| VALID_HTTP_CODE_SET.contains(code));

        match code {
            Some(code) => code,
            None => {
                bot.send_message(chat_id, "Sorry, no photo for that cat.")
                    .await?;
                return Ok(());
            }
        }
    };

    bot.send_photo(chat_id, InputFile::url(cat_image_url(code)?))
        .await?;

    Ok(())
}
