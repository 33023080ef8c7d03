use anyhow::Result;
use teloxide::prelude::*;

use crate::commands::main_menu;
use crate::guards;

pub async fn handle_start(bot: Bot, msg: Message) -> Result<()> {
    let telegram_id = msg.from.as_ref().map_or(0, |user| user.id.0 as i64);
    if !guards::is_owner(telegram_id) {
        return Ok(());
    }

    bot.send_message(msg.chat.id, "👋 Wallet admin panel")
        .reply_markup(main_menu())
        .await?;

    Ok(())
}
