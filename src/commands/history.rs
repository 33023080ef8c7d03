use anyhow::Result;
use std::sync::Arc;
use teloxide::{
    prelude::*,
    types::{InlineKeyboardButton, InlineKeyboardMarkup},
};

use crate::commands::main_menu;
use crate::di::ServiceContainer;
use crate::entity::TxType;
use crate::interactor::db;

const HISTORY_PAGE: i64 = 10;

pub async fn show_history(
    bot: &Bot,
    chat_id: ChatId,
    services: &Arc<ServiceContainer>,
) -> Result<()> {
    let pool = services.db_pool();
    let transactions = db::get_transactions(&pool, None, HISTORY_PAGE, 0).await?;

    if transactions.is_empty() {
        bot.send_message(chat_id, "Transaction history is empty")
            .reply_markup(main_menu())
            .await?;
        return Ok(());
    }

    let mut text = String::from("Recent transactions:\n\n");
    for tx in &transactions {
        let sign = if tx.tx_type == TxType::Income { "+" } else { "-" };
        text.push_str(&format!(
            "{} {}{:.2} USD | fee {:.2} | {} | {}\n",
            tx.token,
            sign,
            tx.amount,
            tx.fee,
            tx.date.format("%d.%m.%Y %H:%M"),
            tx.status,
        ));
    }

    bot.send_message(chat_id, text)
        .reply_markup(main_menu())
        .await?;

    Ok(())
}

/// The reset wipes history, zeroes balances and disables custom tokens, so it
/// requires its own confirmation step.
pub async fn ask_clear_history(bot: &Bot, chat_id: ChatId) -> Result<()> {
    let keyboard = InlineKeyboardMarkup::new(vec![vec![
        InlineKeyboardButton::callback("🧹 Yes, wipe everything", "clear_confirm"),
        InlineKeyboardButton::callback("❌ Cancel", "cancel"),
    ]]);

    bot.send_message(
        chat_id,
        "This deletes all transactions, zeroes every balance, clears addresses and \
         disables custom tokens. Continue?",
    )
    .reply_markup(keyboard)
    .await?;

    Ok(())
}

pub async fn clear_history(
    bot: &Bot,
    chat_id: ChatId,
    services: &Arc<ServiceContainer>,
) -> Result<()> {
    services.token_interactor().reset_all().await?;

    bot.send_message(chat_id, "🧹 Wallet reset complete")
        .reply_markup(main_menu())
        .await?;

    Ok(())
}
