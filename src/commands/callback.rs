use anyhow::Result;
use log::info;
use std::sync::Arc;
use teloxide::prelude::*;

use crate::commands::{history, income, main_menu, send, tokens, MyDialogue};
use crate::di::ServiceContainer;
use crate::entity::State;
use crate::guards;

// Main callback handler function
pub async fn handle_callback(
    bot: Bot,
    q: CallbackQuery,
    dialogue: MyDialogue,
    services: Arc<ServiceContainer>,
) -> Result<()> {
    let Some(callback_data) = q.data.clone() else {
        return Ok(());
    };

    let chat_id = match q.message {
        Some(ref msg) => msg.chat().id,
        None => return Ok(()),
    };

    let telegram_id = q.from.id.0 as i64;
    if !guards::is_owner(telegram_id) {
        return Ok(());
    }

    info!("Callback '{}' from operator {}", callback_data, telegram_id);

    // Stop the loading animation
    if let Err(err) = bot.answer_callback_query(q.id.clone()).await {
        info!("Failed to answer callback query: {}", err);
    }

    if callback_data == "menu" {
        dialogue.update(State::Start).await?;
        bot.send_message(chat_id, "Wallet admin panel")
            .reply_markup(main_menu())
            .await?;
    } else if callback_data == "cancel" {
        // Discards any draft: nothing reached the store yet
        dialogue.update(State::Start).await?;
        bot.send_message(chat_id, "Cancelled")
            .reply_markup(main_menu())
            .await?;
    } else if callback_data == "tokens" {
        tokens::show_token_list(&bot, chat_id, &services).await?;
    } else if let Some(id) = parse_id(&callback_data, "token_") {
        tokens::show_token_detail(&bot, chat_id, id, &services).await?;
    } else if let Some(id) = parse_id(&callback_data, "toggle_") {
        tokens::handle_toggle(&bot, chat_id, id, &services).await?;
    } else if let Some(id) = parse_id(&callback_data, "editaddr_") {
        tokens::start_edit_address(&bot, chat_id, id, dialogue).await?;
    } else if callback_data == "income" {
        income::show_token_choice(&bot, chat_id, &services).await?;
    } else if let Some(id) = parse_id(&callback_data, "income_") {
        income::start_income(&bot, chat_id, id, dialogue).await?;
    } else if callback_data == "send" {
        send::show_token_choice(&bot, chat_id, &services).await?;
    } else if callback_data == "send_confirm" {
        if let Some(state) = dialogue.get().await? {
            send::confirm_send(&bot, chat_id, state, dialogue, &services).await?;
        }
    } else if let Some(id) = parse_id(&callback_data, "send_") {
        send::start_send(&bot, chat_id, id, dialogue).await?;
    } else if callback_data == "history" {
        history::show_history(&bot, chat_id, &services).await?;
    } else if callback_data == "clear_history" {
        history::ask_clear_history(&bot, chat_id).await?;
    } else if callback_data == "clear_confirm" {
        history::clear_history(&bot, chat_id, &services).await?;
    }

    Ok(())
}

fn parse_id(data: &str, prefix: &str) -> Option<i64> {
    data.strip_prefix(prefix)?.parse().ok()
}
