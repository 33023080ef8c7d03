use anyhow::Result;
use std::sync::Arc;
use teloxide::{
    prelude::*,
    types::{InlineKeyboardButton, InlineKeyboardMarkup},
};

use crate::commands::MyDialogue;
use crate::di::ServiceContainer;
use crate::entity::{State, WalletError};
use crate::utils::{format_balance, shorten_address};

/// Token management keyboard: locked system coins first, then custom tokens.
pub async fn show_token_list(
    bot: &Bot,
    chat_id: ChatId,
    services: &Arc<ServiceContainer>,
) -> Result<()> {
    let tokens = services.token_interactor().list_tokens().await?;

    let mut rows: Vec<Vec<InlineKeyboardButton>> = Vec::new();
    for token in tokens.iter().filter(|t| t.locked) {
        rows.push(vec![InlineKeyboardButton::callback(
            format!("🔒 {}", token.name),
            format!("token_{}", token.id),
        )]);
    }
    for token in tokens.iter().filter(|t| !t.locked) {
        let mark = if token.enabled { "✅" } else { "❌" };
        rows.push(vec![InlineKeyboardButton::callback(
            format!("{} {}", mark, token.name),
            format!("token_{}", token.id),
        )]);
    }
    rows.push(vec![InlineKeyboardButton::callback("⬅️ Back", "menu")]);

    bot.send_message(chat_id, "Token management")
        .reply_markup(InlineKeyboardMarkup::new(rows))
        .await?;

    Ok(())
}

pub async fn show_token_detail(
    bot: &Bot,
    chat_id: ChatId,
    token_id: i64,
    services: &Arc<ServiceContainer>,
) -> Result<()> {
    let token = services.token_interactor().get_token(token_id).await?;

    let address = if token.address.is_empty() {
        "no address".to_string()
    } else {
        shorten_address(&token.address)
    };
    let status = if token.is_active() { "active" } else { "disabled" };
    let text = format!(
        "{} ({})\nNetwork: {}\nStatus: {}\nAddress: {}\nBalance: {} USD",
        token.name,
        token.full_name,
        token.network,
        status,
        address,
        format_balance(token.balance),
    );

    let mut rows = Vec::new();
    if !token.locked {
        rows.push(vec![InlineKeyboardButton::callback(
            "Toggle enabled",
            format!("toggle_{}", token.id),
        )]);
    }
    rows.push(vec![InlineKeyboardButton::callback(
        "Edit address",
        format!("editaddr_{}", token.id),
    )]);
    rows.push(vec![InlineKeyboardButton::callback("⬅️ Back", "tokens")]);

    bot.send_message(chat_id, text)
        .reply_markup(InlineKeyboardMarkup::new(rows))
        .await?;

    Ok(())
}

pub async fn handle_toggle(
    bot: &Bot,
    chat_id: ChatId,
    token_id: i64,
    services: &Arc<ServiceContainer>,
) -> Result<()> {
    let interactor = services.token_interactor();
    let token = interactor.get_token(token_id).await?;

    match interactor.set_enabled(token_id, !token.enabled).await {
        Ok(()) => show_token_detail(bot, chat_id, token_id, services).await?,
        Err(WalletError::TokenLocked) => {
            bot.send_message(chat_id, "This token is locked and cannot be toggled")
                .await?;
        }
        Err(e) => return Err(e.into()),
    }

    Ok(())
}

pub async fn start_edit_address(
    bot: &Bot,
    chat_id: ChatId,
    token_id: i64,
    dialogue: MyDialogue,
) -> Result<()> {
    dialogue
        .update(State::AwaitingTokenAddress { token_id })
        .await?;

    bot.send_message(chat_id, "Enter the new wallet address for this token:")
        .await?;

    Ok(())
}

pub async fn receive_token_address(
    bot: Bot,
    msg: Message,
    state: State,
    dialogue: MyDialogue,
    services: Arc<ServiceContainer>,
) -> Result<()> {
    let State::AwaitingTokenAddress { token_id } = state else {
        return Ok(());
    };

    let Some(address) = msg.text() else {
        bot.send_message(msg.chat.id, "Please send the address as text:")
            .await?;
        return Ok(());
    };

    match services
        .token_interactor()
        .set_address(token_id, address)
        .await
    {
        Ok(()) => {
            dialogue.update(State::Start).await?;
            show_token_detail(&bot, msg.chat.id, token_id, &services).await?;
        }
        Err(WalletError::InvalidAddress) => {
            bot.send_message(
                msg.chat.id,
                "That doesn't look like a valid address, try again:",
            )
            .await?;
        }
        Err(e) => return Err(e.into()),
    }

    Ok(())
}
